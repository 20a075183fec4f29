//! Background availability monitoring of link targets.
//!
//! - [`store`] - Per-link last-known reachability, guarded by a mutex
//! - [`probe`] - `HEAD`-based reachability probes
//! - [`monitor`] - The periodic check loop and transition detection
//!
//! Each link moves between [`AvailabilityState::Accessible`] and
//! [`AvailabilityState::Inaccessible`]. The first observation of a link only
//! sets its baseline; later observations that differ from the stored state
//! produce a [`Transition`] notification.

pub mod monitor;
pub mod probe;
pub mod store;

pub use monitor::{AvailabilityMonitor, CycleReport, Transition};
pub use probe::{DEFAULT_PROBE_TIMEOUT, HttpProber, Prober};
pub use store::{AvailabilityState, AvailabilityStore};
