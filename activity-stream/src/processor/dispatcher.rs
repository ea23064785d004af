//! Update dispatcher.

use std::sync::Arc;

use tracing::{debug, instrument};

use activity_stream_shared::{ActivityItem, RawUpdateEntry};

use crate::processor::note::NoteNormalizer;
use crate::processor::version::normalize_version;
use crate::resolver::AttachmentResolver;

/// Entity types the pipeline knows how to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateKind {
    Version,
    Note,
    /// Any other entity type; dropped without error.
    Unsupported,
}

impl UpdateKind {
    /// Classify an update by the entity type named in its metadata.
    pub fn of(entry: &RawUpdateEntry) -> Self {
        match entry.meta.entity_type.as_str() {
            "Version" => Self::Version,
            "Note" => Self::Note,
            _ => Self::Unsupported,
        }
    }
}

/// Processor that turns raw feed updates into activity items.
///
/// Returns `None` for anything that should not be shown: unsupported entity
/// types and payloads rejected by a normalizer.
pub struct EntityProcessor {
    notes: NoteNormalizer,
}

impl EntityProcessor {
    /// Create a processor whose Note normalizer resolves attachments through
    /// `resolver`, with at most `max_concurrent_lookups` lookups in flight.
    pub fn new(resolver: Arc<dyn AttachmentResolver>, max_concurrent_lookups: usize) -> Self {
        Self {
            notes: NoteNormalizer::new(resolver, max_concurrent_lookups),
        }
    }

    /// Process a single feed update.
    #[instrument(skip(self, entry), fields(update_id = entry.id, entity_type = %entry.meta.entity_type))]
    pub async fn process(&self, entry: &RawUpdateEntry) -> Option<ActivityItem> {
        match UpdateKind::of(entry) {
            UpdateKind::Version => normalize_version(entry),
            UpdateKind::Note => self.notes.normalize(entry).await,
            UpdateKind::Unsupported => {
                debug!("Update skipped because its entity type is not rendered");
                None
            }
        }
    }
}
