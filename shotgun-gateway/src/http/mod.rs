//! HTTP transport implementation.
//!
//! This module provides the concrete implementation of `Transport` using reqwest.

mod reqwest_transport;

pub use reqwest_transport::ReqwestTransport;
