use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use tasklist_types::{ItemPatch, ItemStatus, NewItem, Patch, Priority, TodoItem};

use super::{ValidationError, char_len};

pub const MAX_ITEM_TEXT_CHARS: usize = 500;
pub const MAX_DESCRIPTION_CHARS: usize = 2000;
pub const MAX_TAG_CHARS: usize = 50;

/// Tags as supplied by a caller: either "a, b, c" or ["a", "b", "c"].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum TagsInput {
    Text(String),
    List(Vec<String>),
}

/// Split, trim, drop empty pieces and de-duplicate (first occurrence wins).
///
/// An empty string means "no tags". Any other input that normalizes to
/// nothing (e.g. "   " or " , ,") is rejected.
pub fn normalize_tags(input: TagsInput) -> Result<Vec<String>, ValidationError> {
    let pieces: Vec<String> = match input {
        TagsInput::Text(text) if text.is_empty() => return Ok(Vec::new()),
        TagsInput::Text(text) => text.split(',').map(str::to_string).collect(),
        TagsInput::List(list) => list,
    };
    normalize_tag_list(pieces)
}

pub fn normalize_tag_list(pieces: Vec<String>) -> Result<Vec<String>, ValidationError> {
    let had_input = !pieces.is_empty();

    let mut tags: Vec<String> = Vec::with_capacity(pieces.len());
    for piece in pieces {
        let tag = piece.trim();
        if tag.is_empty() {
            continue;
        }
        if char_len(tag) > MAX_TAG_CHARS {
            return Err(ValidationError::new(format!(
                "Tags must be at most {} characters",
                MAX_TAG_CHARS
            )));
        }
        if !tags.iter().any(|existing| existing == tag) {
            tags.push(tag.to_string());
        }
    }

    if had_input && tags.is_empty() {
        return Err(ValidationError::new(
            "Tags must contain at least one non-empty tag",
        ));
    }
    Ok(tags)
}

pub fn normalize_text(raw: &str) -> Result<String, ValidationError> {
    let text = raw.trim();
    if text.is_empty() {
        return Err(ValidationError::new("Item text must not be empty"));
    }
    if char_len(text) > MAX_ITEM_TEXT_CHARS {
        return Err(ValidationError::new(format!(
            "Item text must be at most {} characters",
            MAX_ITEM_TEXT_CHARS
        )));
    }
    Ok(text.to_string())
}

/// Blank descriptions are stored as absent.
pub fn normalize_description(raw: &str) -> Result<Option<String>, ValidationError> {
    let description = raw.trim();
    if description.is_empty() {
        return Ok(None);
    }
    if char_len(description) > MAX_DESCRIPTION_CHARS {
        return Err(ValidationError::new(format!(
            "Description must be at most {} characters",
            MAX_DESCRIPTION_CHARS
        )));
    }
    Ok(Some(description.to_string()))
}

/// Item creation as accepted from a caller (keys already in wire case).
#[derive(Debug, Clone, Deserialize)]
pub struct CreateItemRequest {
    pub text: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub tags: Option<TagsInput>,
    #[serde(default)]
    pub status: Option<ItemStatus>,
    #[serde(default)]
    pub priority: Option<Priority>,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
}

impl CreateItemRequest {
    pub fn normalize(self) -> Result<NewItem, ValidationError> {
        Ok(NewItem {
            text: normalize_text(&self.text)?,
            description: match self.description {
                Some(description) => normalize_description(&description)?,
                None => None,
            },
            tags: match self.tags {
                Some(tags) => normalize_tags(tags)?,
                None => Vec::new(),
            },
            status: self.status.unwrap_or_default(),
            priority: self.priority,
            due_date: self.due_date,
        })
    }
}

/// Partial item update as accepted from a caller.
///
/// Every field is tri-state; see [`Patch`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateItemRequest {
    #[serde(default)]
    pub text: Patch<String>,
    #[serde(default)]
    pub description: Patch<String>,
    #[serde(default)]
    pub tags: Patch<TagsInput>,
    #[serde(default)]
    pub status: Patch<ItemStatus>,
    #[serde(default)]
    pub priority: Patch<Priority>,
    #[serde(default)]
    pub due_date: Patch<NaiveDate>,
}

impl UpdateItemRequest {
    pub fn normalize(self) -> Result<ItemPatch, ValidationError> {
        let patch = ItemPatch {
            text: match self.text {
                Patch::Null => return Err(ValidationError::new("Item text cannot be cleared")),
                other => other.try_map(|text| normalize_text(&text))?,
            },
            description: normalize_description_patch(self.description)?,
            tags: match self.tags {
                // Tags are a list, never null: clearing means the empty list
                Patch::Null => Patch::Value(Vec::new()),
                other => other.try_map(normalize_tags)?,
            },
            status: match self.status {
                Patch::Null => return Err(ValidationError::new("Item status cannot be cleared")),
                other => other,
            },
            priority: self.priority,
            due_date: self.due_date,
        };

        if patch.is_empty() {
            return Err(ValidationError::new(
                "Update must include at least one field",
            ));
        }
        Ok(patch)
    }
}

fn normalize_description_patch(patch: Patch<String>) -> Result<Patch<String>, ValidationError> {
    Ok(match patch {
        Patch::Absent => Patch::Absent,
        Patch::Null => Patch::Null,
        Patch::Value(raw) => normalize_description(&raw)?.into(),
    })
}

/// Store-side re-validation of a creation body.
pub fn validate_new_item(item: NewItem) -> Result<NewItem, ValidationError> {
    Ok(NewItem {
        text: normalize_text(&item.text)?,
        description: match item.description {
            Some(description) => normalize_description(&description)?,
            None => None,
        },
        tags: normalize_tag_list(item.tags)?,
        ..item
    })
}

/// Store-side re-validation of a patch.
pub fn validate_patch(patch: ItemPatch) -> Result<ItemPatch, ValidationError> {
    if patch.is_empty() {
        return Err(ValidationError::new(
            "Update must include at least one field",
        ));
    }
    Ok(ItemPatch {
        text: match patch.text {
            Patch::Null => return Err(ValidationError::new("Item text cannot be cleared")),
            other => other.try_map(|text| normalize_text(&text))?,
        },
        description: normalize_description_patch(patch.description)?,
        tags: match patch.tags {
            Patch::Null => Patch::Value(Vec::new()),
            other => other.try_map(normalize_tag_list)?,
        },
        status: match patch.status {
            Patch::Null => return Err(ValidationError::new("Item status cannot be cleared")),
            other => other,
        },
        ..patch
    })
}

/// Apply a validated patch in place. Fields absent from the patch are not touched.
pub fn apply_patch(item: &mut TodoItem, patch: ItemPatch, now: DateTime<Utc>) {
    if let Patch::Value(text) = patch.text {
        item.text = text;
    }
    patch.description.apply_to(&mut item.description);
    if let Patch::Value(tags) = patch.tags {
        item.tags = tags;
    }
    if let Patch::Value(status) = patch.status {
        item.status = status;
    }
    patch.priority.apply_to(&mut item.priority);
    patch.due_date.apply_to(&mut item.due_date);
    item.updated_at = now;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tasklist_types::UserId;

    fn sample_item() -> TodoItem {
        let now = Utc::now();
        TodoItem {
            id: 1,
            list_id: 1,
            text: "Milk".to_string(),
            description: Some("2 litres".to_string()),
            tags: vec!["dairy".to_string(), "urgent".to_string()],
            status: ItemStatus::NotStarted,
            priority: Some(Priority::High),
            due_date: NaiveDate::from_ymd_opt(2026, 10, 20),
            created_by: UserId::new("alice").unwrap(),
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    #[test]
    fn test_comma_separated_tags() {
        let tags = normalize_tags(TagsInput::Text("dairy, urgent".into())).unwrap();
        assert_eq!(tags, vec!["dairy", "urgent"]);
    }

    #[test]
    fn test_tags_drop_empty_pieces_and_duplicates() {
        let tags = normalize_tags(TagsInput::Text(" a ,, b, a ,".into())).unwrap();
        assert_eq!(tags, vec!["a", "b"]);
    }

    #[test]
    fn test_empty_tags_mean_no_tags() {
        assert!(normalize_tags(TagsInput::Text("".into())).unwrap().is_empty());
        assert!(normalize_tags(TagsInput::List(vec![])).unwrap().is_empty());
    }

    #[test]
    fn test_whitespace_only_tags_are_rejected() {
        assert!(normalize_tags(TagsInput::Text("   ".into())).is_err());
        assert!(normalize_tags(TagsInput::Text("\t".into())).is_err());
    }

    #[test]
    fn test_separators_only_is_rejected() {
        assert!(normalize_tags(TagsInput::Text(" , ,".into())).is_err());
        assert!(normalize_tags(TagsInput::List(vec![" ".into(), "".into()])).is_err());
    }

    #[test]
    fn test_tag_length_limit() {
        let long = "x".repeat(MAX_TAG_CHARS + 1);
        assert!(normalize_tags(TagsInput::Text(long)).is_err());
    }

    #[test]
    fn test_tags_accept_array_input() {
        let request: CreateItemRequest =
            serde_json::from_value(json!({ "text": "Milk", "tags": [" dairy", "urgent "] }))
                .unwrap();
        assert_eq!(request.normalize().unwrap().tags, vec!["dairy", "urgent"]);
    }

    #[test]
    fn test_text_limits() {
        assert!(normalize_text("  ").is_err());
        assert!(normalize_text(&"a".repeat(MAX_ITEM_TEXT_CHARS)).is_ok());
        assert!(normalize_text(&"a".repeat(MAX_ITEM_TEXT_CHARS + 1)).is_err());
    }

    #[test]
    fn test_description_limits() {
        assert_eq!(normalize_description("   ").unwrap(), None);
        assert!(normalize_description(&"d".repeat(MAX_DESCRIPTION_CHARS + 1)).is_err());
    }

    #[test]
    fn test_create_defaults_status() {
        let request: CreateItemRequest =
            serde_json::from_value(json!({ "text": "Milk" })).unwrap();
        let item = request.normalize().unwrap();
        assert_eq!(item.status, ItemStatus::NotStarted);
        assert!(item.tags.is_empty());
    }

    #[test]
    fn test_update_priority_null_vs_absent() {
        let clear: UpdateItemRequest =
            serde_json::from_value(json!({ "priority": null })).unwrap();
        assert_eq!(clear.normalize().unwrap().priority, Patch::Null);

        let untouched: UpdateItemRequest =
            serde_json::from_value(json!({ "status": "completed" })).unwrap();
        assert_eq!(untouched.normalize().unwrap().priority, Patch::Absent);
    }

    #[test]
    fn test_update_rejects_clearing_text_or_status() {
        let request: UpdateItemRequest = serde_json::from_value(json!({ "text": null })).unwrap();
        assert!(request.normalize().is_err());
        let request: UpdateItemRequest =
            serde_json::from_value(json!({ "status": null })).unwrap();
        assert!(request.normalize().is_err());
    }

    #[test]
    fn test_empty_update_rejected() {
        assert!(UpdateItemRequest::default().normalize().is_err());
    }

    #[test]
    fn test_apply_status_only_leaves_other_fields() {
        let mut item = sample_item();
        let before = item.clone();
        let patch = ItemPatch {
            status: Patch::Value(ItemStatus::InProgress),
            ..Default::default()
        };
        apply_patch(&mut item, patch, Utc::now());

        assert_eq!(item.status, ItemStatus::InProgress);
        assert_eq!(item.text, before.text);
        assert_eq!(item.description, before.description);
        assert_eq!(item.tags, before.tags);
        assert_eq!(item.priority, before.priority);
        assert_eq!(item.due_date, before.due_date);
    }

    #[test]
    fn test_apply_clears_priority_and_due_date() {
        let mut item = sample_item();
        let patch = ItemPatch {
            priority: Patch::Null,
            due_date: Patch::Null,
            ..Default::default()
        };
        apply_patch(&mut item, patch, Utc::now());
        assert_eq!(item.priority, None);
        assert_eq!(item.due_date, None);
        assert_eq!(item.tags, vec!["dairy", "urgent"]);
    }

    #[test]
    fn test_store_revalidates_patch() {
        let patch = ItemPatch {
            text: Patch::Value("   ".to_string()),
            ..Default::default()
        };
        assert!(validate_patch(patch).is_err());
        assert!(validate_patch(ItemPatch::default()).is_err());
    }
}
