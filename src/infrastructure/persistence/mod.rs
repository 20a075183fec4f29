//! PostgreSQL repository implementations.
//!
//! Queries are bound at runtime through SQLx; the schema lives in
//! `migrations/` and is applied with [`crate::server::run_migrations`].
//!
//! # Repositories
//!
//! - [`PgLinkRepository`] - Link storage and retrieval
//! - [`PgClickRepository`] - Click recording and counting

pub mod pg_click_repository;
pub mod pg_link_repository;

pub use pg_click_repository::PgClickRepository;
pub use pg_link_repository::PgLinkRepository;
