//! In-memory todo store, scoped per owner.
//!
//! Every operation takes the caller's [`Identity`] explicitly and only sees
//! records owned by it. A todo owned by someone else is indistinguishable
//! from one that does not exist.

use parking_lot::Mutex;
use std::collections::BTreeMap;

use crate::auth::Identity;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Todo {
    pub id: u64,
    pub title: String,
    pub is_completed: bool,
    pub owner_username: String,
}

struct Inner {
    // BTreeMap keyed by id; ids are assigned monotonically, so iteration
    // order is insertion order
    todos: BTreeMap<u64, Todo>,
    next_id: u64,
}

pub struct TodoStore {
    inner: Mutex<Inner>,
}

impl TodoStore {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                todos: BTreeMap::new(),
                // Ids are 1-based and never reused, even after deletes
                next_id: 1,
            }),
        }
    }

    /// Insert a new todo owned by `identity` and return its id.
    pub fn create(&self, identity: &Identity, title: String, is_completed: bool) -> u64 {
        let mut inner = self.inner.lock();
        let id = inner.next_id;
        inner.next_id += 1;

        inner.todos.insert(
            id,
            Todo {
                id,
                title,
                is_completed,
                owner_username: identity.username.clone(),
            },
        );
        id
    }

    /// All todos owned by `identity`, in insertion order.
    pub fn get_all(&self, identity: &Identity) -> Vec<Todo> {
        self.inner
            .lock()
            .todos
            .values()
            .filter(|t| t.owner_username == identity.username)
            .cloned()
            .collect()
    }

    pub fn get_by_id(&self, identity: &Identity, id: u64) -> Option<Todo> {
        self.inner
            .lock()
            .todos
            .get(&id)
            .filter(|t| t.owner_username == identity.username)
            .cloned()
    }

    /// Replace title and completion flag in place, preserving id and owner.
    /// Returns false (leaving the store untouched) when no owned todo
    /// matches.
    pub fn update(&self, identity: &Identity, id: u64, title: String, is_completed: bool) -> bool {
        let mut inner = self.inner.lock();
        match inner.todos.get_mut(&id) {
            Some(todo) if todo.owner_username == identity.username => {
                todo.title = title;
                todo.is_completed = is_completed;
                true
            }
            _ => false,
        }
    }

    /// Remove the owned todo matching `id`; false when none matched.
    pub fn delete(&self, identity: &Identity, id: u64) -> bool {
        let mut inner = self.inner.lock();
        match inner.todos.get(&id) {
            Some(todo) if todo.owner_username == identity.username => {
                inner.todos.remove(&id);
                true
            }
            _ => false,
        }
    }
}
