// ============================================================================
// Wire Key Translation
// ============================================================================
//
// The store speaks snake_case (`owner_id`, `due_date`), callers speak
// camelCase (`ownerId`, `dueDate`). Translation only rewrites object keys,
// recursively; values (including enum strings such as "not_started") pass
// through untouched.
//
// Every key the wire types declare has the form `[a-z][a-z0-9]*(_[a-z][a-z0-9]*)*`.
// For such keys `snake_case(camel_case(k)) == k`, which makes the two
// directions inverse on every payload shape the proxy exchanges.
//
// ============================================================================

use serde_json::{Map, Value};

pub fn camel_case(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    let mut upper_next = false;
    for ch in key.chars() {
        if ch == '_' {
            upper_next = true;
        } else if upper_next {
            out.extend(ch.to_uppercase());
            upper_next = false;
        } else {
            out.push(ch);
        }
    }
    out
}

pub fn snake_case(key: &str) -> String {
    let mut out = String::with_capacity(key.len() + 4);
    for (i, ch) in key.chars().enumerate() {
        if ch.is_uppercase() {
            if i > 0 {
                out.push('_');
            }
            out.extend(ch.to_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}

/// Store payload -> caller payload
pub fn to_camel_case_keys(value: Value) -> Value {
    rename_keys(value, &camel_case)
}

/// Caller payload -> store payload
pub fn to_snake_case_keys(value: Value) -> Value {
    rename_keys(value, &snake_case)
}

fn rename_keys(value: Value, rename: &dyn Fn(&str) -> String) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(key, value)| (rename(&key), rename_keys(value, rename)))
                .collect::<Map<String, Value>>(),
        ),
        Value::Array(values) => Value::Array(
            values
                .into_iter()
                .map(|value| rename_keys(value, rename))
                .collect(),
        ),
        scalar => scalar,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};
    use serde_json::json;
    use tasklist_types::{DeletedItem, ItemStatus, Priority, TodoItem, TodoList, UserId};

    #[test]
    fn test_key_casing() {
        assert_eq!(camel_case("owner_id"), "ownerId");
        assert_eq!(camel_case("restorable_until"), "restorableUntil");
        assert_eq!(camel_case("text"), "text");
        assert_eq!(snake_case("dueDate"), "due_date");
        assert_eq!(snake_case("deletedItems"), "deleted_items");
        assert_eq!(snake_case("tags"), "tags");
    }

    #[test]
    fn test_values_are_not_rewritten() {
        let translated = to_camel_case_keys(json!({ "status": "not_started", "list_id": 3 }));
        assert_eq!(translated, json!({ "status": "not_started", "listId": 3 }));
    }

    #[test]
    fn test_nested_arrays_and_objects() {
        let translated = to_camel_case_keys(json!([
            { "created_by": "a", "tags": ["due_soon"] },
            { "nested": { "updated_at": null } }
        ]));
        assert_eq!(
            translated,
            json!([
                { "createdBy": "a", "tags": ["due_soon"] },
                { "nested": { "updatedAt": null } }
            ])
        );
    }

    #[test]
    fn test_round_trip_on_store_payloads() {
        let now = Utc::now();
        let item = TodoItem {
            id: 7,
            list_id: 2,
            text: "Milk".to_string(),
            description: None,
            tags: vec!["dairy".to_string(), "urgent".to_string()],
            status: ItemStatus::InProgress,
            priority: Some(Priority::Low),
            due_date: NaiveDate::from_ymd_opt(2026, 1, 31),
            created_by: UserId::new("alice").unwrap(),
            created_at: now,
            updated_at: now,
            deleted_at: Some(now),
        };
        let list = TodoList {
            id: 2,
            name: "Groceries".to_string(),
            owner_id: UserId::new("alice").unwrap(),
            created_at: now,
            updated_at: now,
        };
        let deleted = DeletedItem {
            id: 7,
            list_id: 2,
            deleted_at: now,
            restorable_until: now,
        };

        for payload in [
            serde_json::to_value(&item).unwrap(),
            serde_json::to_value(vec![list]).unwrap(),
            serde_json::to_value(&deleted).unwrap(),
        ] {
            let caller = to_camel_case_keys(payload.clone());
            assert_eq!(to_snake_case_keys(caller), payload);
        }
    }
}
