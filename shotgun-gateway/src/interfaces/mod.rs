//! Interface definitions for the Shotgun gateway.
//!
//! This module defines the abstract `Transport` and `QueryGateway` traits that
//! allow for dependency injection and swappable HTTP backends.

mod query_gateway;
mod transport;

pub use query_gateway::QueryGateway;
pub use transport::{ApiRequest, ApiResponse, HttpMethod, Transport};
