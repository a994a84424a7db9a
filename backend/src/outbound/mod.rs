//! Outbound adapters implementing domain ports.
//!
//! - **memory**: `DashMap`-backed user store, account store and ledger.
//! - **token**: HS256 JSON Web Tokens for identity resolution.
//!
//! Adapters translate between domain types and their storage or wire form.
//! Business rules stay in the domain.

pub mod memory;
pub mod token;
