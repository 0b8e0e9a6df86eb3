// ============================================================================
// In-Memory Store
// ============================================================================
//
// Reference backing store. All lists and items live behind one RwLock,
// which is the single serialization point for concurrent writers (last
// write wins, no versioning).
//
// Every write is re-validated with the domain rules; failures surface as
// 422. Access is resolved existence first, then ownership.
//
// Soft-deleted items stay in `items` with `deleted_at` set until the purge
// task moves them to `tombstones`. A tombstone remembers just enough to keep
// answering 410 (or 403) for a late restore instead of 404.
//
// Tombstones are only dropped together with their list. The map grows with
// every purged item for as long as the process runs; that is what keeps a
// late restore answering 410.
//
// ============================================================================

use chrono::Duration;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tokio::sync::RwLock;

use tasklist_error::{AppError, AppResult};
use tasklist_types::{
    DeletedItem, DeletedList, ItemPatch, NewItem, NewList, Patch, TodoItem, TodoList, UserId,
};

use crate::domain::items::{apply_patch, validate_new_item, validate_patch};
use crate::domain::lists::{self, authorize};
use crate::domain::{UndoState, restorable_until, undo_state};
use crate::store_service::clock::Clock;

const ITEM_NOT_FOUND: &str = "Item not found";
const ITEM_NOT_DELETED: &str = "Item was not deleted";
const UNDO_EXPIRED: &str = "Undo timeout expired - item cannot be restored";
const RESTORE_FORBIDDEN: &str = "You don't have permission to restore this item";

#[derive(Debug, Clone)]
struct Tombstone {
    list_id: i64,
    owner_id: UserId,
}

#[derive(Default)]
struct StoreState {
    lists: BTreeMap<i64, TodoList>,
    items: BTreeMap<i64, TodoItem>,
    tombstones: HashMap<i64, Tombstone>,
    last_list_id: i64,
    last_item_id: i64,
}

impl StoreState {
    fn next_list_id(&mut self) -> i64 {
        self.last_list_id += 1;
        self.last_list_id
    }

    fn next_item_id(&mut self) -> i64 {
        self.last_item_id += 1;
        self.last_item_id
    }

    /// Active item plus a check that `requester` owns its list
    fn authorize_item(&self, item_id: i64, requester: &UserId) -> AppResult<&TodoItem> {
        let item = self
            .items
            .get(&item_id)
            .filter(|item| !item.is_deleted())
            .ok_or_else(|| AppError::not_found(ITEM_NOT_FOUND))?;
        authorize(self.lists.get(&item.list_id), requester)?;
        Ok(item)
    }

    fn item_mut(&mut self, item_id: i64) -> AppResult<&mut TodoItem> {
        self.items
            .get_mut(&item_id)
            .ok_or_else(|| AppError::not_found(ITEM_NOT_FOUND))
    }
}

pub struct MemoryStore {
    state: RwLock<StoreState>,
    clock: Arc<dyn Clock>,
    undo_window: Duration,
}

impl MemoryStore {
    pub fn new(clock: Arc<dyn Clock>, undo_window: Duration) -> Self {
        Self {
            state: RwLock::new(StoreState::default()),
            clock,
            undo_window,
        }
    }

    // ===== Lists =====

    /// Lists owned by `owner`, most recently updated first
    pub async fn list_lists(&self, owner: &UserId) -> Vec<TodoList> {
        let state = self.state.read().await;
        let mut lists: Vec<TodoList> = state
            .lists
            .values()
            .filter(|list| lists::is_owner(list, owner))
            .cloned()
            .collect();
        lists.sort_by(|a, b| b.updated_at.cmp(&a.updated_at).then(b.id.cmp(&a.id)));
        lists
    }

    pub async fn create_list(&self, owner: &UserId, body: NewList) -> AppResult<TodoList> {
        let body = lists::normalize_new_list(body).map_err(|e| e.into_unprocessable())?;
        let now = self.clock.now();

        let mut state = self.state.write().await;
        let list = TodoList {
            id: state.next_list_id(),
            name: body.name,
            owner_id: owner.clone(),
            created_at: now,
            updated_at: now,
        };
        state.lists.insert(list.id, list.clone());
        Ok(list)
    }

    pub async fn get_list(&self, owner: &UserId, list_id: i64) -> AppResult<TodoList> {
        let state = self.state.read().await;
        authorize(state.lists.get(&list_id), owner).cloned()
    }

    pub async fn rename_list(
        &self,
        owner: &UserId,
        list_id: i64,
        body: NewList,
    ) -> AppResult<TodoList> {
        let body = lists::normalize_new_list(body).map_err(|e| e.into_unprocessable())?;
        let now = self.clock.now();

        let mut state = self.state.write().await;
        authorize(state.lists.get(&list_id), owner)?;
        let list = state
            .lists
            .get_mut(&list_id)
            .ok_or_else(|| AppError::not_found("List not found"))?;
        list.name = body.name;
        list.updated_at = now;
        Ok(list.clone())
    }

    /// Delete a list and every item in it, soft-deleted ones included
    pub async fn delete_list(&self, owner: &UserId, list_id: i64) -> AppResult<DeletedList> {
        let mut state = self.state.write().await;
        authorize(state.lists.get(&list_id), owner)?;

        state.lists.remove(&list_id);
        let mut deleted_items = 0;
        state.items.retain(|_, item| {
            if item.list_id != list_id {
                return true;
            }
            if !item.is_deleted() {
                deleted_items += 1;
            }
            false
        });
        state.tombstones.retain(|_, tombstone| tombstone.list_id != list_id);

        Ok(DeletedList {
            id: list_id,
            deleted_items,
        })
    }

    // ===== Items =====

    /// Active items of a list, oldest first
    pub async fn list_items(&self, owner: &UserId, list_id: i64) -> AppResult<Vec<TodoItem>> {
        let state = self.state.read().await;
        authorize(state.lists.get(&list_id), owner)?;

        let mut items: Vec<TodoItem> = state
            .items
            .values()
            .filter(|item| item.list_id == list_id && !item.is_deleted())
            .cloned()
            .collect();
        items.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(items)
    }

    pub async fn create_item(
        &self,
        owner: &UserId,
        list_id: i64,
        body: NewItem,
    ) -> AppResult<TodoItem> {
        let body = validate_new_item(body).map_err(|e| e.into_unprocessable())?;
        let now = self.clock.now();

        let mut state = self.state.write().await;
        authorize(state.lists.get(&list_id), owner)?;

        let item = TodoItem {
            id: state.next_item_id(),
            list_id,
            text: body.text,
            description: body.description,
            tags: body.tags,
            status: body.status,
            priority: body.priority,
            due_date: body.due_date,
            created_by: owner.clone(),
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        state.items.insert(item.id, item.clone());
        Ok(item)
    }

    pub async fn update_item(
        &self,
        owner: &UserId,
        item_id: i64,
        patch: ItemPatch,
    ) -> AppResult<TodoItem> {
        let patch = validate_patch(patch).map_err(|e| e.into_unprocessable())?;
        let now = self.clock.now();

        let mut state = self.state.write().await;
        state.authorize_item(item_id, owner)?;
        let item = state.item_mut(item_id)?;
        apply_patch(item, patch, now);
        Ok(item.clone())
    }

    /// completed -> not_started, anything else -> completed
    pub async fn toggle_item(&self, owner: &UserId, item_id: i64) -> AppResult<TodoItem> {
        let now = self.clock.now();

        let mut state = self.state.write().await;
        let status = state.authorize_item(item_id, owner)?.status.toggled();
        let item = state.item_mut(item_id)?;
        apply_patch(
            item,
            ItemPatch {
                status: Patch::Value(status),
                ..Default::default()
            },
            now,
        );
        Ok(item.clone())
    }

    /// Soft delete. Deleting an already deleted item reports not found.
    pub async fn delete_item(&self, owner: &UserId, item_id: i64) -> AppResult<DeletedItem> {
        let now = self.clock.now();

        let mut state = self.state.write().await;
        state.authorize_item(item_id, owner)?;
        let item = state.item_mut(item_id)?;
        item.deleted_at = Some(now);

        Ok(DeletedItem {
            id: item.id,
            list_id: item.list_id,
            deleted_at: now,
            restorable_until: restorable_until(now, self.undo_window),
        })
    }

    /// Un-hide a soft-deleted item while the undo window is open.
    ///
    /// Only `deleted_at` is cleared; every other field keeps its current value.
    pub async fn restore_item(&self, owner: &UserId, item_id: i64) -> AppResult<TodoItem> {
        let now = self.clock.now();
        let mut state = self.state.write().await;

        let Some(item) = state.items.get(&item_id) else {
            return match state.tombstones.get(&item_id) {
                Some(tombstone) if &tombstone.owner_id != owner => {
                    Err(AppError::forbidden(RESTORE_FORBIDDEN))
                }
                Some(_) => Err(AppError::undo_expired(UNDO_EXPIRED)),
                None => Err(AppError::not_found(ITEM_NOT_FOUND)),
            };
        };

        let list = state
            .lists
            .get(&item.list_id)
            .ok_or_else(|| AppError::not_found(ITEM_NOT_FOUND))?;
        if !lists::is_owner(list, owner) {
            return Err(AppError::forbidden(RESTORE_FORBIDDEN));
        }

        match undo_state(item.deleted_at, now, self.undo_window) {
            UndoState::Active => Err(AppError::not_found(ITEM_NOT_DELETED)),
            UndoState::Expired => Err(AppError::undo_expired(UNDO_EXPIRED)),
            UndoState::Restorable { remaining } => {
                tracing::debug!(
                    item_id = item_id,
                    remaining_ms = remaining.num_milliseconds(),
                    "Restoring soft-deleted item"
                );
                let item = state.item_mut(item_id)?;
                item.deleted_at = None;
                Ok(item.clone())
            }
        }
    }

    // ===== Storage reclamation =====

    /// Drop soft-deleted items whose window has elapsed, keeping a tombstone
    pub async fn purge_expired(&self) -> usize {
        let now = self.clock.now();
        let mut state = self.state.write().await;

        let expired: Vec<i64> = state
            .items
            .values()
            .filter(|item| undo_state(item.deleted_at, now, self.undo_window) == UndoState::Expired)
            .map(|item| item.id)
            .collect();

        for item_id in &expired {
            let Some(item) = state.items.remove(item_id) else {
                continue;
            };
            let Some(owner_id) = state.lists.get(&item.list_id).map(|l| l.owner_id.clone()) else {
                continue;
            };
            state.tombstones.insert(
                item.id,
                Tombstone {
                    list_id: item.list_id,
                    owner_id,
                },
            );
        }
        expired.len()
    }

    /// (lists, active items, soft-deleted items, tombstones)
    pub async fn counts(&self) -> (usize, usize, usize, usize) {
        let state = self.state.read().await;
        let deleted = state.items.values().filter(|item| item.is_deleted()).count();
        (
            state.lists.len(),
            state.items.len() - deleted,
            deleted,
            state.tombstones.len(),
        )
    }
}
