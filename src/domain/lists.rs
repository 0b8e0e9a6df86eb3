use tasklist_error::{AppError, AppResult};
use tasklist_types::{NewList, TodoList, UserId};

use super::{ValidationError, char_len};

pub const MAX_LIST_NAME_CHARS: usize = 255;

/// Trim and check a list name. Trimming is part of normalization.
pub fn normalize_name(raw: &str) -> Result<String, ValidationError> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(ValidationError::new("List name must not be empty"));
    }
    if char_len(name) > MAX_LIST_NAME_CHARS {
        return Err(ValidationError::new(format!(
            "List name must be at most {} characters",
            MAX_LIST_NAME_CHARS
        )));
    }
    Ok(name.to_string())
}

pub fn normalize_new_list(body: NewList) -> Result<NewList, ValidationError> {
    Ok(NewList {
        name: normalize_name(&body.name)?,
    })
}

pub fn is_owner(list: &TodoList, requester: &UserId) -> bool {
    &list.owner_id == requester
}

/// Resolve access to a list: existence first, then ownership.
///
/// A missing list is always NotFound, never Forbidden, so "no such list"
/// and "not yours" stay distinguishable.
pub fn authorize<'a>(list: Option<&'a TodoList>, requester: &UserId) -> AppResult<&'a TodoList> {
    let list = list.ok_or_else(|| AppError::not_found("List not found"))?;
    if !is_owner(list, requester) {
        return Err(AppError::forbidden("You don't have access to this list"));
    }
    Ok(list)
}
