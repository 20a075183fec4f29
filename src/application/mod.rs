//! Application layer services implementing business logic.
//!
//! Services coordinate repository calls and the domain rules around them, and
//! give HTTP handlers and CLI commands a single entry point.
//!
//! # Available Services
//!
//! - [`services::link_service::LinkService`] - Short link creation and retrieval
//! - [`services::stats_service::StatsService`] - Click statistics

pub mod services;
