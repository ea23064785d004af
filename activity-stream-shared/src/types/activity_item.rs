//! Normalized activity items.
//!
//! This module defines the uniform, display-ready output of the pipeline.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::types::update_entry::{ActivityType, Actor, RawUpdateEntry};

/// Display-ready representation of one feed update.
///
/// `links` and `media` keep insertion order. An item is only ever built by a
/// normalizer that accepted its payload, and `title` is never empty.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ActivityItem {
    /// Id of the feed update this item was built from.
    pub id: i64,
    #[serde(rename = "type")]
    pub activity_type: ActivityType,
    pub entity_type: String,
    pub entity_id: i64,
    pub created_at: String,
    pub created_by: Actor,
    pub title: String,
    pub description: String,
    #[serde(rename = "attachments")]
    pub links: Vec<String>,
    pub media: Vec<String>,
    pub user_groups: BTreeSet<i64>,
}

impl ActivityItem {
    /// Start an item from the update-level fields of a raw entry.
    ///
    /// Entity type and id are taken from the accepted payload rather than the
    /// update metadata.
    pub fn from_entry(entry: &RawUpdateEntry, entity_type: &str, entity_id: i64) -> Self {
        Self {
            id: entry.id,
            activity_type: entry.update_type.clone(),
            entity_type: entity_type.to_string(),
            entity_id,
            created_at: entry.created_at.clone(),
            created_by: entry.created_by.clone(),
            ..Default::default()
        }
    }
}

/// Result of one activity stream fetch.
///
/// Items keep the remote ordering (most recent first). The update id bounds
/// come straight from the envelope so callers can persist their own cursor.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ActivityFeedPage {
    pub items: Vec<ActivityItem>,
    pub latest_update_id: i64,
    pub earliest_update_id: i64,
}

impl ActivityFeedPage {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ActivityItem> {
        self.items.iter()
    }
}

impl IntoIterator for ActivityFeedPage {
    type Item = ActivityItem;
    type IntoIter = std::vec::IntoIter<ActivityItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}
