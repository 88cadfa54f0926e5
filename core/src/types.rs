//! Domain records for the todo list.
//!
//! # Design
//! Local ids are plain strings owned by the store. They only become global
//! ids at the API boundary (see `global_id`), so nothing here knows about
//! type names or encodings.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Local id of the single fixed viewer.
pub const VIEWER_ID: &str = "me";

/// A single todo item.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Todo {
    pub id: String,
    pub text: String,
    pub complete: bool,
}

/// The user owning the todo list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub id: String,
}

/// Filter applied when listing todos.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum TodoStatus {
    #[default]
    Any,
    Completed,
    Incomplete,
}

impl TodoStatus {
    /// Parse a status argument as sent by clients.
    ///
    /// Unrecognised values select every todo, the same as `"any"`.
    pub fn from_arg(arg: &str) -> Self {
        match arg {
            "completed" => TodoStatus::Completed,
            "incomplete" => TodoStatus::Incomplete,
            _ => TodoStatus::Any,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TodoStatus::Any => "any",
            TodoStatus::Completed => "completed",
            TodoStatus::Incomplete => "incomplete",
        }
    }

    pub fn matches(self, todo: &Todo) -> bool {
        match self {
            TodoStatus::Any => true,
            TodoStatus::Completed => todo.complete,
            TodoStatus::Incomplete => !todo.complete,
        }
    }
}

impl fmt::Display for TodoStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
