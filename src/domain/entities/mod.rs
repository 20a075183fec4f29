//! Core domain entities.
//!
//! - [`Link`] - A shortened URL mapping
//! - [`Click`] - A recorded redirect of a shortened link
//!
//! Creation payloads live next to their entity (`NewLink`, `NewClick`).

pub mod click;
pub mod link;

pub use click::{Click, NewClick};
pub use link::{Link, NewLink};
