//! Repository trait definitions for the domain layer.
//!
//! These traits are the only contract the core has with storage. Concrete
//! implementations live in `crate::infrastructure::persistence`; mock
//! implementations are generated by `mockall` for unit tests.
//!
//! # Available Repositories
//!
//! - [`LinkRepository`] - Link registry (create, lookup by code, list)
//! - [`ClickRepository`] - Click registry (create, count)

pub mod click_repository;
pub mod link_repository;

pub use click_repository::ClickRepository;
pub use link_repository::LinkRepository;

#[cfg(test)]
pub use click_repository::MockClickRepository;
#[cfg(test)]
pub use link_repository::MockLinkRepository;
