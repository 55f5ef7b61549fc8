//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **persistence**: PostgreSQL-backed repositories using Diesel ORM
//! - **memory**: process-local store used without a database and in tests
//! - **security**: Argon2id password hashing
//!
//! Adapters convert between domain types and infrastructure representations
//! and contain no business logic.

pub mod memory;
pub mod persistence;
pub mod security;
