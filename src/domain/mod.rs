//! Domain layer containing business entities and logic.
//!
//! Nothing here depends on the HTTP or persistence layers; storage is reached
//! only through the traits in [`repositories`].
//!
//! # Architecture
//!
//! - [`entities`] - Core business data structures
//! - [`repositories`] - Data access trait definitions
//! - [`click_event`] - Click record handed from the redirect path to workers
//! - [`click_queue`] - Bounded, non-blocking click buffer
//! - [`click_worker`] - Worker pool persisting buffered clicks
//! - [`availability`] - Periodic reachability monitoring of link targets
//!
//! # Click Processing Flow
//!
//! 1. HTTP handler resolves the short code and answers with a redirect
//! 2. A [`click_event::ClickEvent`] is offered to the [`click_queue::ClickQueue`];
//!    it is dropped if the queue is full
//! 3. A [`click_worker::ClickWorkerPool`] worker takes the event
//! 4. The click is stored via [`repositories::ClickRepository`]

pub mod availability;
pub mod click_event;
pub mod click_queue;
pub mod click_worker;
pub mod entities;
pub mod repositories;
