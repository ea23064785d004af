//! Note normalizer.

use std::sync::Arc;

use futures::future::join_all;
use tokio::sync::Semaphore;
use tracing::{debug, warn};

use activity_stream_shared::{decode_payload, ActivityItem, NotePayload, RawUpdateEntry};

use crate::resolver::AttachmentResolver;

/// Builds activity items from Note updates, resolving attachment links.
pub struct NoteNormalizer {
    resolver: Arc<dyn AttachmentResolver>,
    lookup_permits: Arc<Semaphore>,
}

impl NoteNormalizer {
    pub fn new(resolver: Arc<dyn AttachmentResolver>, max_concurrent_lookups: usize) -> Self {
        Self {
            resolver,
            lookup_permits: Arc::new(Semaphore::new(max_concurrent_lookups.max(1))),
        }
    }

    /// Build an activity item from a Note update.
    ///
    /// Returns `None` when the payload is not tagged `Note`, cannot be decoded
    /// or has no name. Attachments whose lookup fails are left out of the
    /// item's links; they never reject the Note.
    pub async fn normalize(&self, entry: &RawUpdateEntry) -> Option<ActivityItem> {
        let payload = match decode_payload::<NotePayload>(&entry.primary_entity) {
            Ok(Some(payload)) => payload,
            Ok(None) => {
                debug!(update_id = entry.id, "Record is not a Note entity, skipping");
                return None;
            }
            Err(e) => {
                debug!(update_id = entry.id, error = %e, "Note payload could not be decoded, skipping");
                return None;
            }
        };

        if payload.name.is_empty() {
            debug!(update_id = entry.id, "Note record has no name, skipping");
            return None;
        }

        if payload.subject.is_empty() && payload.body.is_empty() {
            debug!(
                update_id = entry.id,
                note_id = payload.id,
                "Note record has no interesting data"
            );
        }

        let mut item = ActivityItem::from_entry(entry, &payload.entity_type, payload.id);
        item.title = note_title(&payload, &entry.created_by.name);
        item.description = if payload.body.is_empty() {
            payload.name.clone()
        } else {
            payload.body.clone()
        };
        item.user_groups = payload.user_groups.iter().map(|group| group.id).collect();

        let lookups = payload
            .attachments
            .iter()
            .map(|attachment| self.resolve_link(entry.id, attachment.id));
        item.links = join_all(lookups).await.into_iter().flatten().collect();

        Some(item)
    }

    async fn resolve_link(&self, update_id: i64, attachment_id: i64) -> Option<String> {
        let _permit = self.lookup_permits.acquire().await.ok()?;

        match self.resolver.resolve_attachment_url(attachment_id).await {
            Ok(url) => Some(url),
            Err(e) => {
                warn!(update_id, attachment_id, error = %e, "Failed to retrieve attachment");
                None
            }
        }
    }
}

/// The subject, or a title naming the note's targets (or its author).
fn note_title(payload: &NotePayload, actor: &str) -> String {
    if !payload.subject.is_empty() {
        return payload.subject.clone();
    }

    let mut title = String::from("Note(s): ");
    for link in &payload.links {
        title.push_str(&link.name);
        title.push_str(", ");
    }
    if payload.links.is_empty() {
        title.push_str("from ");
        title.push_str(actor);
    }
    title
}
