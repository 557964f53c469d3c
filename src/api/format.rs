//! Wire representation of todos, converted by hand rather than through any
//! reflection-based mapper. The owner never leaves the process.

use serde::Serialize;

use crate::store::todos::Todo;

/// What clients see: `{"id": 1, "title": "...", "isCompleted": false}`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoApi {
    pub id: u64,
    pub title: String,
    pub is_completed: bool,
}

pub fn todo_to_api(todo: &Todo) -> TodoApi {
    TodoApi {
        id: todo.id,
        title: todo.title.clone(),
        is_completed: todo.is_completed,
    }
}

pub fn todos_to_api(todos: &[Todo]) -> Vec<TodoApi> {
    todos.iter().map(todo_to_api).collect()
}
