//! Parameters of one activity stream fetch.

use crate::errors::ActivityError;

/// Fields requested for Note updates.
pub(crate) const NOTE_ENTITY_FIELDS: &str =
    "subject,content,attachments,note_links,user.HumanUser.groups";

/// Fields requested for Version updates.
pub(crate) const VERSION_ENTITY_FIELDS: &str =
    "sg_version_number,description,sg_download_uri,sg_uploaded_movie,entity,sg_task,user.HumanUser.groups";

/// Which page of which entity's activity stream to fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedQuery {
    /// Type of the root entity, e.g. `Project` or `Shot`.
    pub entity_type: String,
    pub entity_id: i64,
    /// Maximum number of updates returned by the remote side.
    pub page_size: i64,
    /// Only updates newer than this id are requested when positive.
    pub since_id: i64,
}

impl FeedQuery {
    /// Query for the most recent page.
    pub fn new(entity_type: impl Into<String>, entity_id: i64, page_size: i64) -> Self {
        Self {
            entity_type: entity_type.into(),
            entity_id,
            page_size,
            since_id: 0,
        }
    }

    /// Only request updates newer than `since_id`.
    pub fn since(mut self, since_id: i64) -> Self {
        self.since_id = since_id;
        self
    }

    pub fn validate(&self) -> Result<(), ActivityError> {
        if self.entity_type.trim().is_empty() {
            return Err(ActivityError::invalid_query("entity_type must not be empty"));
        }
        if self.page_size <= 0 {
            return Err(ActivityError::invalid_query(format!(
                "page_size must be > 0, got {}",
                self.page_size
            )));
        }
        Ok(())
    }

    /// Path of the activity stream endpoint below the base URL.
    pub(crate) fn path(&self) -> String {
        format!("entity/{}/{}/activity_stream", self.entity_type, self.entity_id)
    }

    /// Query string parameters, in request order.
    pub(crate) fn params(&self) -> Vec<(String, String)> {
        let mut params = vec![("limit".to_string(), self.page_size.to_string())];
        if self.since_id > 0 {
            params.push(("min_id".to_string(), self.since_id.to_string()));
        }
        params.push(("entity_fields[Note]".to_string(), NOTE_ENTITY_FIELDS.to_string()));
        params.push(("entity_fields[Version]".to_string(), VERSION_ENTITY_FIELDS.to_string()));
        params
    }
}
