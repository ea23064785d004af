//! # Activity Stream Shared
//!
//! This crate defines shared data structures and types used across the activity stream
//! pipeline. It includes the raw feed envelope as returned by the remote service, the typed
//! projections of the polymorphic "primary entity" payloads, and the normalized
//! `ActivityItem` emitted by the pipeline.

pub mod types;

pub use types::activity_item::{ActivityFeedPage, ActivityItem};
pub use types::link_field::LinkField;
pub use types::nullable::null_as_default;
pub use types::payloads::{
    decode_payload, AttachmentRef, MovieField, NotePayload, PayloadTag, VersionPayload,
};
pub use types::update_entry::{
    ActivityStreamData, ActivityStreamResponse, ActivityType, Actor, RawUpdateEntry, UpdateMeta,
};
