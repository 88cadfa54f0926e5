//! Keyed CRUD storage for todos and the single viewer.
//!
//! # Design
//! `TodoStore` is the narrow interface the rest of the crate consumes, so
//! resolvers and operations can run against any backing store. `MemoryStore`
//! keeps todos in a map keyed by local id plus a separate insertion-order
//! list, which is the ordering every listing (and therefore every cursor)
//! follows.
//!
//! All state sits behind one `RwLock`. Reads share the lock; each mutation,
//! including the multi-item `mark_all_todos` and `remove_completed_todos`,
//! runs under a single write acquisition so concurrent mutations never
//! interleave.

use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use uuid::Uuid;

use crate::error::StoreError;
use crate::types::{Todo, TodoStatus, User, VIEWER_ID};

/// Handle injected into resolvers and the graph schema.
pub type SharedStore = Arc<dyn TodoStore>;

/// Storage operations over todos and the viewer.
///
/// `rename_todo`, `set_todo_complete` and `remove_todo` return whether the
/// id existed; an unknown id is a no-op, not an error.
pub trait TodoStore: Send + Sync {
    fn get_todo(&self, id: &str) -> Result<Option<Todo>, StoreError>;

    /// Todos matching `status`, in insertion order.
    fn list_todos(&self, status: TodoStatus) -> Result<Vec<Todo>, StoreError>;

    fn get_user(&self, id: &str) -> Result<Option<User>, StoreError>;

    fn get_viewer(&self) -> Result<User, StoreError>;

    /// Insert a todo and return its fresh local id.
    fn add_todo(&self, text: &str, complete: bool) -> Result<String, StoreError>;

    fn rename_todo(&self, id: &str, text: &str) -> Result<bool, StoreError>;

    fn set_todo_complete(&self, id: &str, complete: bool) -> Result<bool, StoreError>;

    /// Set every todo to `complete`; returns the ids that changed.
    fn mark_all_todos(&self, complete: bool) -> Result<Vec<String>, StoreError>;

    fn remove_todo(&self, id: &str) -> Result<bool, StoreError>;

    /// Remove every completed todo; returns the removed ids.
    fn remove_completed_todos(&self) -> Result<Vec<String>, StoreError>;
}

#[derive(Debug)]
struct Inner {
    todos: HashMap<String, Todo>,
    order: Vec<String>,
    users: HashMap<String, User>,
}

impl Inner {
    fn ordered(&self) -> impl Iterator<Item = &Todo> {
        self.order.iter().filter_map(|id| self.todos.get(id))
    }
}

/// In-memory `TodoStore` seeded with the fixed viewer.
#[derive(Debug)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        let viewer = User {
            id: VIEWER_ID.to_string(),
        };
        Self {
            inner: RwLock::new(Inner {
                todos: HashMap::new(),
                order: Vec::new(),
                users: HashMap::from([(viewer.id.clone(), viewer)]),
            }),
        }
    }

    pub fn shared() -> SharedStore {
        Arc::new(Self::new())
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Inner>, StoreError> {
        self.inner.read().map_err(|_| StoreError::Poisoned)
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Inner>, StoreError> {
        self.inner.write().map_err(|_| StoreError::Poisoned)
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TodoStore for MemoryStore {
    fn get_todo(&self, id: &str) -> Result<Option<Todo>, StoreError> {
        Ok(self.read()?.todos.get(id).cloned())
    }

    fn list_todos(&self, status: TodoStatus) -> Result<Vec<Todo>, StoreError> {
        let inner = self.read()?;
        Ok(inner
            .ordered()
            .filter(|todo| status.matches(todo))
            .cloned()
            .collect())
    }

    fn get_user(&self, id: &str) -> Result<Option<User>, StoreError> {
        Ok(self.read()?.users.get(id).cloned())
    }

    fn get_viewer(&self) -> Result<User, StoreError> {
        self.get_user(VIEWER_ID)?
            .ok_or_else(|| StoreError::MissingViewer(VIEWER_ID.to_string()))
    }

    fn add_todo(&self, text: &str, complete: bool) -> Result<String, StoreError> {
        let todo = Todo {
            id: Uuid::new_v4().to_string(),
            text: text.to_string(),
            complete,
        };
        let id = todo.id.clone();

        let mut inner = self.write()?;
        inner.order.push(id.clone());
        inner.todos.insert(id.clone(), todo);
        tracing::debug!(todo_id = %id, complete, "added todo");
        Ok(id)
    }

    fn rename_todo(&self, id: &str, text: &str) -> Result<bool, StoreError> {
        let mut inner = self.write()?;
        let Some(todo) = inner.todos.get_mut(id) else {
            return Ok(false);
        };
        todo.text = text.to_string();
        tracing::debug!(todo_id = %id, "renamed todo");
        Ok(true)
    }

    fn set_todo_complete(&self, id: &str, complete: bool) -> Result<bool, StoreError> {
        let mut inner = self.write()?;
        let Some(todo) = inner.todos.get_mut(id) else {
            return Ok(false);
        };
        todo.complete = complete;
        tracing::debug!(todo_id = %id, complete, "changed todo status");
        Ok(true)
    }

    fn mark_all_todos(&self, complete: bool) -> Result<Vec<String>, StoreError> {
        let mut inner = self.write()?;
        let Inner { todos, order, .. } = &mut *inner;

        let mut changed = Vec::new();
        for id in order.iter() {
            if let Some(todo) = todos.get_mut(id) {
                if todo.complete != complete {
                    todo.complete = complete;
                    changed.push(id.clone());
                }
            }
        }
        tracing::debug!(complete, changed = changed.len(), "marked all todos");
        Ok(changed)
    }

    fn remove_todo(&self, id: &str) -> Result<bool, StoreError> {
        let mut inner = self.write()?;
        if inner.todos.remove(id).is_none() {
            return Ok(false);
        }
        inner.order.retain(|existing| existing != id);
        tracing::debug!(todo_id = %id, "removed todo");
        Ok(true)
    }

    fn remove_completed_todos(&self) -> Result<Vec<String>, StoreError> {
        let mut inner = self.write()?;
        let removed: Vec<String> = inner
            .ordered()
            .filter(|todo| todo.complete)
            .map(|todo| todo.id.clone())
            .collect();

        for id in &removed {
            inner.todos.remove(id);
        }
        let Inner { todos, order, .. } = &mut *inner;
        order.retain(|id| todos.contains_key(id));
        tracing::debug!(removed = removed.len(), "removed completed todos");
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(todos: &[Todo]) -> Vec<&str> {
        todos.iter().map(|todo| todo.text.as_str()).collect()
    }

    #[test]
    fn viewer_is_seeded() {
        let store = MemoryStore::new();
        assert_eq!(store.get_viewer().unwrap().id, VIEWER_ID);
        assert_eq!(store.get_user(VIEWER_ID).unwrap().unwrap().id, "me");
        assert!(store.get_user("someone-else").unwrap().is_none());
    }

    #[test]
    fn add_assigns_distinct_ids_and_keeps_order() {
        let store = MemoryStore::new();
        let a = store.add_todo("first", false).unwrap();
        let b = store.add_todo("second", true).unwrap();
        let c = store.add_todo("third", false).unwrap();
        assert_ne!(a, b);
        assert_ne!(b, c);

        let todos = store.list_todos(TodoStatus::Any).unwrap();
        assert_eq!(texts(&todos), vec!["first", "second", "third"]);
        assert_eq!(store.get_todo(&b).unwrap().unwrap().text, "second");
    }

    #[test]
    fn list_filters_by_status() {
        let store = MemoryStore::new();
        store.add_todo("open", false).unwrap();
        store.add_todo("done", true).unwrap();

        let completed = store.list_todos(TodoStatus::Completed).unwrap();
        let incomplete = store.list_todos(TodoStatus::Incomplete).unwrap();
        assert_eq!(texts(&completed), vec!["done"]);
        assert_eq!(texts(&incomplete), vec!["open"]);
    }

    #[test]
    fn rename_and_status_change_in_place() {
        let store = MemoryStore::new();
        let id = store.add_todo("draft", false).unwrap();

        assert!(store.rename_todo(&id, "final").unwrap());
        assert!(store.set_todo_complete(&id, true).unwrap());

        let todo = store.get_todo(&id).unwrap().unwrap();
        assert_eq!(todo.text, "final");
        assert!(todo.complete);
    }

    #[test]
    fn unknown_ids_are_no_ops() {
        let store = MemoryStore::new();
        store.add_todo("keep", false).unwrap();

        assert!(!store.rename_todo("missing", "x").unwrap());
        assert!(!store.set_todo_complete("missing", true).unwrap());
        assert!(!store.remove_todo("missing").unwrap());
        assert_eq!(store.list_todos(TodoStatus::Any).unwrap().len(), 1);
    }

    #[test]
    fn mark_all_reports_only_changed_ids() {
        let store = MemoryStore::new();
        let a = store.add_todo("a", false).unwrap();
        store.add_todo("b", true).unwrap();
        let c = store.add_todo("c", false).unwrap();

        assert_eq!(store.mark_all_todos(true).unwrap(), vec![a, c]);
        assert!(store.mark_all_todos(true).unwrap().is_empty());
        assert_eq!(store.list_todos(TodoStatus::Completed).unwrap().len(), 3);
    }

    #[test]
    fn remove_drops_from_listing() {
        let store = MemoryStore::new();
        let a = store.add_todo("a", false).unwrap();
        store.add_todo("b", false).unwrap();

        assert!(store.remove_todo(&a).unwrap());
        assert!(store.get_todo(&a).unwrap().is_none());
        assert_eq!(texts(&store.list_todos(TodoStatus::Any).unwrap()), vec!["b"]);
    }

    #[test]
    fn remove_completed_returns_removed_ids_in_order() {
        let store = MemoryStore::new();
        let a = store.add_todo("a", true).unwrap();
        store.add_todo("b", false).unwrap();
        let c = store.add_todo("c", true).unwrap();

        assert_eq!(store.remove_completed_todos().unwrap(), vec![a, c]);
        assert_eq!(texts(&store.list_todos(TodoStatus::Any).unwrap()), vec!["b"]);
    }

    #[test]
    fn concurrent_adds_are_not_lost() {
        let store = MemoryStore::shared();
        let handles: Vec<_> = (0..8)
            .map(|worker| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || {
                    for i in 0..25 {
                        store.add_todo(&format!("{worker}-{i}"), false).unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(store.list_todos(TodoStatus::Any).unwrap().len(), 200);
    }

    #[test]
    fn poisoned_lock_surfaces_as_store_error() {
        let store = Arc::new(MemoryStore::new());
        let poisoner = Arc::clone(&store);
        let _ = std::thread::spawn(move || {
            let _guard = poisoner.inner.write().unwrap();
            panic!("poison the lock");
        })
        .join();

        assert_eq!(store.list_todos(TodoStatus::Any), Err(StoreError::Poisoned));
        assert_eq!(store.add_todo("x", false), Err(StoreError::Poisoned));
    }
}
