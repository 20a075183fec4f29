//! Utility functions for code generation and database error inspection.
//!
//! - [`code_generator`] - Cryptographically secure short code generation
//! - [`db_error`] - Recognising unique constraint violations

pub mod code_generator;
pub mod db_error;
