//! Dynamic filter composition and pagination for soft-deleting record stores.
//!
//! This crate has zero internal deps so it can be used by any persistence
//! backend. The PostgreSQL collaborator lives in `sift-db`.

pub mod config;
pub mod error;
pub mod filter;
pub mod memory;
pub mod pagination;
pub mod query;
pub mod types;
