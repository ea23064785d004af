//! Version normalizer.

use tracing::debug;

use activity_stream_shared::{decode_payload, ActivityItem, ActivityType, RawUpdateEntry, VersionPayload};

/// Build an activity item from a Version update.
///
/// Returns `None` when the payload is not tagged `Version`, cannot be decoded
/// or has no name. Versions without a download or movie URL are kept.
pub fn normalize_version(entry: &RawUpdateEntry) -> Option<ActivityItem> {
    let payload = match decode_payload::<VersionPayload>(&entry.primary_entity) {
        Ok(Some(payload)) => payload,
        Ok(None) => {
            debug!(update_id = entry.id, "Record is not a Version entity, skipping");
            return None;
        }
        Err(e) => {
            debug!(update_id = entry.id, error = %e, "Version payload could not be decoded, skipping");
            return None;
        }
    };

    if payload.name.is_empty() {
        debug!(update_id = entry.id, "Version record has no name, skipping");
        return None;
    }

    if payload.download_url.is_empty() && payload.movie.url.is_empty() {
        debug!(
            update_id = entry.id,
            version_id = payload.id,
            "Version record has no interesting data"
        );
    }

    let actor = entry.created_by.name.as_str();
    let mut item = ActivityItem::from_entry(entry, &payload.entity_type, payload.id);
    item.title = version_title(&entry.update_type, &payload.name, actor);
    item.description = version_description(&payload, actor);

    if !payload.download_url.is_empty() {
        item.links.push(payload.download_url.clone());
    }
    if !payload.movie.url.is_empty() {
        item.media.push(payload.movie.url.clone());
    }
    item.user_groups = payload.user_groups.iter().map(|group| group.id).collect();

    Some(item)
}

fn version_title(kind: &ActivityType, name: &str, actor: &str) -> String {
    match kind {
        ActivityType::Create => format!("New Version: {}", name),
        ActivityType::Update => format!("Updated Version: {}", name),
        ActivityType::Delete => format!("Removed Version: {}", name),
        ActivityType::Other(_) => format!("Version from {}", actor),
    }
}

/// Task and parent entity lines, followed by the Version's own description.
///
/// Missing links only drop their line; with neither link present the
/// description falls back to naming the actor.
fn version_description(payload: &VersionPayload, actor: &str) -> String {
    let mut lines = Vec::with_capacity(2);
    if let Some(task) = &payload.task {
        lines.push(format!("Task: {} ", task.name));
    }
    if let Some(parent) = &payload.entity {
        lines.push(format!("{}: {}", parent.entity_type, parent.name));
    }

    if lines.is_empty() {
        return format!("Version update from {}", actor);
    }

    let mut description = lines.join("\n");
    if !payload.description.is_empty() {
        description.push_str("\n ");
        description.push_str(&payload.description);
    }
    description
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn entry(update_type: &str, primary_entity: Value) -> RawUpdateEntry {
        serde_json::from_value(json!({
            "id": 501,
            "update_type": update_type,
            "meta": {"type": "new_entity", "entity_type": "Version", "entity_id": 11},
            "created_at": "2024-03-01T10:00:00Z",
            "read": false,
            "created_by": {"id": 3, "name": "Jane Doe", "type": "HumanUser"},
            "primary_entity": primary_entity
        }))
        .unwrap()
    }

    fn full_payload() -> Value {
        json!({
            "id": 11,
            "type": "Version",
            "name": "v003",
            "sg_version_number": 3,
            "description": "first pass",
            "sg_download_uri": "https://files.example.com/v003.mov",
            "sg_uploaded_movie": {"url": "https://media.example.com/v003.mp4"},
            "entity": {"id": 7, "type": "Shot", "name": "SH010"},
            "sg_task": {"id": 42, "type": "Task", "name": "Comp"},
            "user.HumanUser.groups": [{"id": 2, "type": "Group"}, {"id": 1, "type": "Group"}]
        })
    }

    #[test]
    fn test_create_version() {
        let item = normalize_version(&entry("create", full_payload())).unwrap();

        assert_eq!(item.id, 501);
        assert_eq!(item.title, "New Version: v003");
        assert_eq!(item.description, "Task: Comp \nShot: SH010\n first pass");
        assert_eq!(item.entity_type, "Version");
        assert_eq!(item.entity_id, 11);
        assert_eq!(item.created_at, "2024-03-01T10:00:00Z");
        assert_eq!(item.created_by.name, "Jane Doe");
        assert_eq!(item.links, vec!["https://files.example.com/v003.mov"]);
        assert_eq!(item.media, vec!["https://media.example.com/v003.mp4"]);
        assert_eq!(item.user_groups.iter().copied().collect::<Vec<_>>(), vec![1, 2]);
    }

    #[test]
    fn test_titles_by_update_kind() {
        let title = |kind: &str| normalize_version(&entry(kind, full_payload())).unwrap().title;

        assert_eq!(title("update"), "Updated Version: v003");
        assert_eq!(title("delete"), "Removed Version: v003");
        assert_eq!(title("archive"), "Version from Jane Doe");
    }

    #[test]
    fn test_rejects_mismatched_tag() {
        let mut payload = full_payload();
        payload["type"] = json!("Task");
        assert!(normalize_version(&entry("create", payload)).is_none());
    }

    #[test]
    fn test_rejects_empty_name() {
        let mut payload = full_payload();
        payload["name"] = json!("");
        assert!(normalize_version(&entry("create", payload.clone())).is_none());

        payload["name"] = Value::Null;
        assert!(normalize_version(&entry("create", payload)).is_none());
    }

    #[test]
    fn test_rejects_undecodable_payload() {
        let mut payload = full_payload();
        payload["sg_version_number"] = json!("three");
        assert!(normalize_version(&entry("create", payload)).is_none());
    }

    #[test]
    fn test_sparse_version_is_kept() {
        let payload = json!({"id": 12, "type": "Version", "name": "v004"});
        let item = normalize_version(&entry("create", payload)).unwrap();

        assert_eq!(item.title, "New Version: v004");
        assert_eq!(item.description, "Version update from Jane Doe");
        assert!(item.links.is_empty());
        assert!(item.media.is_empty());
        assert!(item.user_groups.is_empty());
    }

    #[test]
    fn test_description_with_task_only() {
        let payload = json!({
            "id": 12,
            "type": "Version",
            "name": "v004",
            "description": "",
            "sg_task": {"id": 42, "type": "Task", "name": "Comp"},
            "entity": null
        });
        let item = normalize_version(&entry("update", payload)).unwrap();
        assert_eq!(item.description, "Task: Comp ");
    }

    #[test]
    fn test_description_with_parent_only() {
        let payload = json!({
            "id": 12,
            "type": "Version",
            "name": "v004",
            "description": "lighting tweak",
            "entity": {"id": 9, "type": "Asset", "name": "Robot"}
        });
        let item = normalize_version(&entry("update", payload)).unwrap();
        assert_eq!(item.description, "Asset: Robot\n lighting tweak");
    }
}
