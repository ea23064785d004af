//! This module defines the core data structures and types used across the activity stream.
//! It re-exports the feed envelope, payload projections and the normalized activity item.

pub mod activity_item;
pub mod link_field;
pub mod nullable;
pub mod payloads;
pub mod update_entry;

pub use activity_item::{ActivityFeedPage, ActivityItem};
pub use link_field::LinkField;
pub use payloads::{NotePayload, VersionPayload};
pub use update_entry::{ActivityType, Actor, RawUpdateEntry};
