//! Todo-list operations and viewer queries.
//!
//! Each mutation input is an `Operation`; ids in inputs are global ids and
//! must decode to a `Todo`. An id that does not resolve to a stored todo
//! leaves the store untouched and yields an empty outcome field.

use serde::{Deserialize, Serialize};

use crate::connection::{cursor_for_object, paginate, Connection, ConnectionArgs, Edge};
use crate::error::RelayError;
use crate::mutation::Operation;
use crate::node::{NodeResolver, NodeType};
use crate::store::TodoStore;
use crate::types::{Todo, TodoStatus};

fn todo_local_id(global_id: &str) -> Option<String> {
    NodeResolver::local_id_for(global_id, NodeType::Todo)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddTodo {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddTodoOutcome {
    pub todo_id: String,
}

impl Operation for AddTodo {
    const NAME: &'static str = "addTodo";
    type Output = AddTodoOutcome;

    fn apply(self, store: &dyn TodoStore) -> Result<Self::Output, RelayError> {
        let todo_id = store.add_todo(&self.text, false)?;
        Ok(AddTodoOutcome { todo_id })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeTodoStatus {
    pub id: String,
    pub complete: bool,
}

/// Outcome of an operation on a single todo; `None` if it was not found.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoOutcome {
    pub todo_id: Option<String>,
}

impl Operation for ChangeTodoStatus {
    const NAME: &'static str = "changeTodoStatus";
    type Output = TodoOutcome;

    fn apply(self, store: &dyn TodoStore) -> Result<Self::Output, RelayError> {
        let todo_id = match todo_local_id(&self.id) {
            Some(id) if store.set_todo_complete(&id, self.complete)? => Some(id),
            _ => None,
        };
        Ok(TodoOutcome { todo_id })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenameTodo {
    pub id: String,
    pub text: String,
}

impl Operation for RenameTodo {
    const NAME: &'static str = "renameTodo";
    type Output = TodoOutcome;

    fn apply(self, store: &dyn TodoStore) -> Result<Self::Output, RelayError> {
        let todo_id = match todo_local_id(&self.id) {
            Some(id) if store.rename_todo(&id, &self.text)? => Some(id),
            _ => None,
        };
        Ok(TodoOutcome { todo_id })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkAllTodos {
    pub complete: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkAllTodosOutcome {
    pub changed_todo_ids: Vec<String>,
}

impl Operation for MarkAllTodos {
    const NAME: &'static str = "markAllTodos";
    type Output = MarkAllTodosOutcome;

    fn apply(self, store: &dyn TodoStore) -> Result<Self::Output, RelayError> {
        let changed_todo_ids = store.mark_all_todos(self.complete)?;
        Ok(MarkAllTodosOutcome { changed_todo_ids })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoveCompletedTodos {}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveCompletedTodosOutcome {
    pub deleted_todo_ids: Vec<String>,
}

impl Operation for RemoveCompletedTodos {
    const NAME: &'static str = "removeCompletedTodos";
    type Output = RemoveCompletedTodosOutcome;

    fn apply(self, store: &dyn TodoStore) -> Result<Self::Output, RelayError> {
        let deleted_todo_ids = store.remove_completed_todos()?;
        Ok(RemoveCompletedTodosOutcome { deleted_todo_ids })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoveTodo {
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveTodoOutcome {
    pub deleted_todo_id: Option<String>,
}

impl Operation for RemoveTodo {
    const NAME: &'static str = "removeTodo";
    type Output = RemoveTodoOutcome;

    fn apply(self, store: &dyn TodoStore) -> Result<Self::Output, RelayError> {
        let deleted_todo_id = match todo_local_id(&self.id) {
            Some(id) if store.remove_todo(&id)? => Some(id),
            _ => None,
        };
        Ok(RemoveTodoOutcome { deleted_todo_id })
    }
}

/// The viewer's todos matching `status`, paginated by `args`.
pub fn todos_connection(
    store: &dyn TodoStore,
    status: TodoStatus,
    args: &ConnectionArgs,
) -> Result<Connection<Todo>, RelayError> {
    let todos = store.list_todos(status)?;
    paginate(todos, args)
}

pub fn total_count(store: &dyn TodoStore) -> Result<usize, RelayError> {
    Ok(store.list_todos(TodoStatus::Any)?.len())
}

pub fn completed_count(store: &dyn TodoStore) -> Result<usize, RelayError> {
    Ok(store.list_todos(TodoStatus::Completed)?.len())
}

/// Edge for `todo_id` positioned within the unfiltered todo list.
pub fn todo_edge(store: &dyn TodoStore, todo_id: &str) -> Result<Option<Edge<Todo>>, RelayError> {
    let todos = store.list_todos(TodoStatus::Any)?;
    let Some(cursor) = cursor_for_object(&todos, |todo| todo.id == todo_id) else {
        return Ok(None);
    };
    let node = todos.into_iter().find(|todo| todo.id == todo_id);
    Ok(node.map(|node| Edge { node, cursor }))
}
