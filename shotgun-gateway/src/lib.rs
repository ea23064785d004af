//! # Shotgun Gateway
//!
//! This crate provides the authenticated query gateway for the Shotgun REST
//! API. It includes the error types, the `Transport` and `QueryGateway`
//! interfaces, a reqwest-backed transport, a mock transport for tests, and
//! typed accessors for the entities the activity pipeline touches.

pub mod auth;
pub mod client;
pub mod config;
pub mod entities;
pub mod errors;
pub mod http;
pub mod interfaces;
pub mod mock;
pub mod query;

pub use auth::AccessToken;
pub use client::ShotgunClient;
pub use config::ShotgunConfig;
pub use entities::attachments::AttachmentData;
pub use entities::event_log::EventData;
pub use entities::notes::NoteData;
pub use entities::versions::VersionData;
pub use errors::{RemoteError, RemoteErrorBody, ShotgunError};
pub use http::ReqwestTransport;
pub use interfaces::{ApiRequest, ApiResponse, HttpMethod, QueryGateway, Transport};
pub use mock::MockTransport;
pub use query::{Filters, PageParam, SortDirection, SortParam};
