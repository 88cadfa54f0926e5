//! Relay-style API core for the todo list.
//!
//! # Overview
//! Implements the parts of a Relay graph API that carry real logic, with no
//! schema framework or transport attached:
//! - opaque global ids (`global_id`),
//! - polymorphic node lookup (`node`),
//! - cursor pagination (`connection`),
//! - the client-mutation-id envelope (`mutation`) and the todo operations
//!   that run inside it (`ops`).
//!
//! # Design
//! - All state lives in a `TodoStore` injected as `SharedStore`; the other
//!   components are stateless.
//! - Everything is synchronous. Pagination works on a snapshot listed from
//!   the store, so no lock is held while slicing.
//! - The graph surface (see the server crate) is a thin rendering of these
//!   functions, so each piece is unit-testable without building a schema.

pub mod connection;
pub mod error;
pub mod global_id;
pub mod mutation;
pub mod node;
pub mod ops;
pub mod store;
pub mod types;

pub use connection::{paginate, Connection, ConnectionArgs, Edge, PageInfo};
pub use error::{RelayError, StoreError};
pub use global_id::{from_global_id, to_global_id, GlobalId};
pub use mutation::{execute, MutationInput, MutationPayload, Operation};
pub use node::{Node, NodeResolver, NodeType};
pub use store::{MemoryStore, SharedStore, TodoStore};
pub use types::{Todo, TodoStatus, User, VIEWER_ID};
