//! Error types for the Shotgun gateway.
//!
//! This module provides a unified error type for all gateway operations.

mod shotgun_error;

pub use shotgun_error::{RemoteError, RemoteErrorBody, ShotgunError};
