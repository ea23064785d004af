//! Processor module for the activity stream pipeline.
//!
//! Routes raw feed updates to the normalizer for their entity type and turns
//! accepted payloads into display-ready activity items.

mod dispatcher;
mod note;
mod version;

pub use dispatcher::{EntityProcessor, UpdateKind};
pub use note::NoteNormalizer;
pub use version::normalize_version;
