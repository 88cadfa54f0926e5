//! Polymorphic lookup of objects by global id.
//!
//! # Design
//! `Node` is an explicit tagged union over every identifiable type, and
//! `NodeType` is its tag. `NodeResolver` owns a tag-to-fetcher table built
//! once at construction; `resolve_node` decodes the id, maps the type name to
//! a tag and calls the registered fetcher. Malformed ids and unknown type
//! names are "not found", while store failures propagate.

use std::collections::HashMap;

use crate::error::{RelayError, StoreError};
use crate::global_id::{encode_pair, from_global_id, GlobalId};
use crate::store::{SharedStore, TodoStore};
use crate::types::{Todo, User};

/// Type tag of an identifiable object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeType {
    Todo,
    User,
}

impl NodeType {
    pub const ALL: [NodeType; 2] = [NodeType::Todo, NodeType::User];

    /// Type name embedded in global ids.
    pub const fn type_name(self) -> &'static str {
        match self {
            NodeType::Todo => "Todo",
            NodeType::User => "User",
        }
    }

    pub fn from_type_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|tag| tag.type_name() == name)
    }

    /// Global id of the object of this type with `local_id`.
    ///
    /// Type names never contain `:` and the store never issues an empty
    /// local id, so the pair always decodes.
    pub fn global_id(self, local_id: &str) -> String {
        encode_pair(self.type_name(), local_id)
    }
}

/// Any object reachable through `node`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Todo(Todo),
    User(User),
}

impl Node {
    pub fn node_type(&self) -> NodeType {
        match self {
            Node::Todo(_) => NodeType::Todo,
            Node::User(_) => NodeType::User,
        }
    }

    pub fn local_id(&self) -> &str {
        match self {
            Node::Todo(todo) => &todo.id,
            Node::User(user) => &user.id,
        }
    }

    pub fn global_id(&self) -> String {
        self.node_type().global_id(self.local_id())
    }
}

impl From<Todo> for Node {
    fn from(todo: Todo) -> Self {
        Node::Todo(todo)
    }
}

impl From<User> for Node {
    fn from(user: User) -> Self {
        Node::User(user)
    }
}

type Fetcher = fn(&dyn TodoStore, &str) -> Result<Option<Node>, StoreError>;

fn fetch_todo(store: &dyn TodoStore, id: &str) -> Result<Option<Node>, StoreError> {
    Ok(store.get_todo(id)?.map(Node::Todo))
}

fn fetch_user(store: &dyn TodoStore, id: &str) -> Result<Option<Node>, StoreError> {
    Ok(store.get_user(id)?.map(Node::User))
}

/// Resolves global ids to nodes against an injected store.
pub struct NodeResolver {
    store: SharedStore,
    fetchers: HashMap<NodeType, Fetcher>,
}

impl NodeResolver {
    pub fn new(store: SharedStore) -> Self {
        let fetchers = NodeType::ALL
            .into_iter()
            .map(|tag| {
                let fetcher: Fetcher = match tag {
                    NodeType::Todo => fetch_todo,
                    NodeType::User => fetch_user,
                };
                (tag, fetcher)
            })
            .collect();
        Self { store, fetchers }
    }

    /// Look up the object behind `opaque_id`.
    ///
    /// Returns `Ok(None)` for malformed ids, unknown type names and ids that
    /// are not in the store.
    pub fn resolve_node(&self, opaque_id: &str) -> Result<Option<Node>, RelayError> {
        let Ok(global_id) = from_global_id(opaque_id) else {
            tracing::debug!(id = opaque_id, "ignoring malformed global id");
            return Ok(None);
        };
        let Some(fetcher) = NodeType::from_type_name(global_id.type_name())
            .and_then(|tag| self.fetchers.get(&tag))
        else {
            return Ok(None);
        };
        Ok(fetcher(self.store.as_ref(), global_id.local_id())?)
    }

    /// Type tag used to pick the concrete type behind the `Node` interface.
    pub fn resolve_type(node: &Node) -> NodeType {
        node.node_type()
    }

    /// Local id behind `opaque_id` if it decodes to an object of type
    /// `expected`. The object is not required to exist.
    pub fn local_id_for(opaque_id: &str, expected: NodeType) -> Option<String> {
        from_global_id(opaque_id)
            .ok()
            .filter(|global_id| global_id.type_name() == expected.type_name())
            .map(GlobalId::into_local_id)
    }
}
