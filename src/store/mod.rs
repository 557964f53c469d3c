pub mod todos;
pub mod users;

use std::sync::Arc;

use crate::config;
use crate::store::todos::TodoStore;
use crate::store::users::UserStore;

/// Shared application state handed to every handler. Both stores are
/// process-memory only; contents are lost on restart.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<UserStore>,
    pub todos: Arc<TodoStore>,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            users: Arc::new(UserStore::new(config::config().security.bcrypt_cost)),
            todos: Arc::new(TodoStore::new()),
        }
    }
}
