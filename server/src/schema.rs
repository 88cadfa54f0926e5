//! GraphQL rendering of the relay core.
//!
//! # Design
//! Every resolver is a thin adapter over `relay_todo_core`: ids are encoded
//! and decoded by the core, connections come from `ops::todos_connection`,
//! and mutations run through `relay_todo_core::execute`. Mutation payloads
//! keep only the ids the operation produced; the objects behind them are
//! loaded lazily per field, so a store failure becomes an error on that
//! field and leaves sibling fields intact.

use async_graphql::extensions::Tracing;
use async_graphql::{
    Context, EmptySubscription, InputObject, Interface, Object, Result, Schema, SimpleObject, ID,
};
use relay_todo_core::ops::{
    self, AddTodo, AddTodoOutcome, ChangeTodoStatus, MarkAllTodos, MarkAllTodosOutcome,
    RemoveCompletedTodos, RemoveCompletedTodosOutcome, RemoveTodo, RemoveTodoOutcome, RenameTodo,
    TodoOutcome,
};
use relay_todo_core::{
    execute, Connection, ConnectionArgs, Edge, MutationInput, MutationPayload, Node, NodeResolver,
    NodeType, PageInfo, SharedStore, Todo, TodoStatus, User,
};

pub type TodoSchema = Schema<Query, Mutation, EmptySubscription>;

/// Build the schema over `store`.
pub fn build_schema(store: SharedStore) -> TodoSchema {
    let resolver = NodeResolver::new(store.clone());
    Schema::build(Query, Mutation, EmptySubscription)
        .extension(Tracing)
        .data(store)
        .data(resolver)
        .finish()
}

fn store<'a>(ctx: &Context<'a>) -> Result<&'a SharedStore> {
    ctx.data::<SharedStore>()
}

fn viewer(ctx: &Context<'_>) -> Result<UserObject> {
    Ok(UserObject(store(ctx)?.get_viewer()?))
}

fn find_todo(ctx: &Context<'_>, todo_id: Option<&str>) -> Result<Option<TodoObject>> {
    let Some(todo_id) = todo_id else {
        return Ok(None);
    };
    Ok(store(ctx)?.get_todo(todo_id)?.map(TodoObject))
}

fn count(n: usize) -> Result<i32> {
    Ok(i32::try_from(n)?)
}

// ---------------------------------------------------------------------------
// Object types
// ---------------------------------------------------------------------------

pub struct TodoObject(Todo);

#[Object(name = "Todo")]
impl TodoObject {
    async fn id(&self) -> ID {
        ID(NodeType::Todo.global_id(&self.0.id))
    }

    async fn text(&self) -> &str {
        &self.0.text
    }

    async fn complete(&self) -> bool {
        self.0.complete
    }
}

pub struct UserObject(User);

#[Object(name = "User")]
impl UserObject {
    async fn id(&self) -> ID {
        ID(NodeType::User.global_id(&self.0.id))
    }

    async fn todos(
        &self,
        ctx: &Context<'_>,
        #[graphql(default_with = "String::from(\"any\")")] status: String,
        before: Option<String>,
        after: Option<String>,
        first: Option<i32>,
        last: Option<i32>,
    ) -> Result<TodoConnection> {
        let args = ConnectionArgs {
            before,
            after,
            first: first.map(i64::from),
            last: last.map(i64::from),
        };
        let connection =
            ops::todos_connection(store(ctx)?.as_ref(), TodoStatus::from_arg(&status), &args)?;
        Ok(connection.into())
    }

    async fn total_count(&self, ctx: &Context<'_>) -> Result<i32> {
        count(ops::total_count(store(ctx)?.as_ref())?)
    }

    async fn completed_count(&self, ctx: &Context<'_>) -> Result<i32> {
        count(ops::completed_count(store(ctx)?.as_ref())?)
    }
}

#[derive(Interface)]
#[graphql(name = "Node", field(name = "id", ty = "ID"))]
pub enum NodeInterface {
    Todo(TodoObject),
    User(UserObject),
}

impl From<Node> for NodeInterface {
    fn from(node: Node) -> Self {
        match node {
            Node::Todo(todo) => NodeInterface::Todo(TodoObject(todo)),
            Node::User(user) => NodeInterface::User(UserObject(user)),
        }
    }
}

#[derive(SimpleObject)]
#[graphql(name = "PageInfo")]
pub struct PageInfoObject {
    has_next_page: bool,
    has_previous_page: bool,
    start_cursor: Option<String>,
    end_cursor: Option<String>,
}

impl From<PageInfo> for PageInfoObject {
    fn from(info: PageInfo) -> Self {
        Self {
            has_next_page: info.has_next_page,
            has_previous_page: info.has_previous_page,
            start_cursor: info.start_cursor,
            end_cursor: info.end_cursor,
        }
    }
}

#[derive(SimpleObject)]
pub struct TodoEdge {
    node: TodoObject,
    cursor: String,
}

impl From<Edge<TodoObject>> for TodoEdge {
    fn from(edge: Edge<TodoObject>) -> Self {
        Self {
            node: edge.node,
            cursor: edge.cursor,
        }
    }
}

#[derive(SimpleObject)]
pub struct TodoConnection {
    edges: Vec<TodoEdge>,
    page_info: PageInfoObject,
}

impl From<Connection<Todo>> for TodoConnection {
    fn from(connection: Connection<Todo>) -> Self {
        let connection = connection.map(TodoObject);
        Self {
            edges: connection.edges.into_iter().map(TodoEdge::from).collect(),
            page_info: connection.page_info.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Query
// ---------------------------------------------------------------------------

pub struct Query;

#[Object]
impl Query {
    async fn viewer(&self, ctx: &Context<'_>) -> Result<UserObject> {
        viewer(ctx)
    }

    /// Fetch any object by its global id.
    async fn node(&self, ctx: &Context<'_>, id: ID) -> Result<Option<NodeInterface>> {
        let resolver = ctx.data::<NodeResolver>()?;
        Ok(resolver.resolve_node(&id)?.map(NodeInterface::from))
    }
}

// ---------------------------------------------------------------------------
// Mutation inputs
// ---------------------------------------------------------------------------

#[derive(InputObject)]
pub struct AddTodoInput {
    client_mutation_id: Option<String>,
    text: String,
}

impl From<AddTodoInput> for MutationInput<AddTodo> {
    fn from(input: AddTodoInput) -> Self {
        MutationInput {
            client_mutation_id: input.client_mutation_id,
            fields: AddTodo { text: input.text },
        }
    }
}

#[derive(InputObject)]
pub struct ChangeTodoStatusInput {
    client_mutation_id: Option<String>,
    id: ID,
    complete: bool,
}

impl From<ChangeTodoStatusInput> for MutationInput<ChangeTodoStatus> {
    fn from(input: ChangeTodoStatusInput) -> Self {
        MutationInput {
            client_mutation_id: input.client_mutation_id,
            fields: ChangeTodoStatus {
                id: input.id.0,
                complete: input.complete,
            },
        }
    }
}

#[derive(InputObject)]
pub struct MarkAllTodosInput {
    client_mutation_id: Option<String>,
    complete: bool,
}

impl From<MarkAllTodosInput> for MutationInput<MarkAllTodos> {
    fn from(input: MarkAllTodosInput) -> Self {
        MutationInput {
            client_mutation_id: input.client_mutation_id,
            fields: MarkAllTodos {
                complete: input.complete,
            },
        }
    }
}

#[derive(InputObject)]
pub struct RemoveCompletedTodosInput {
    client_mutation_id: Option<String>,
}

impl From<RemoveCompletedTodosInput> for MutationInput<RemoveCompletedTodos> {
    fn from(input: RemoveCompletedTodosInput) -> Self {
        MutationInput {
            client_mutation_id: input.client_mutation_id,
            fields: RemoveCompletedTodos {},
        }
    }
}

#[derive(InputObject)]
pub struct RemoveTodoInput {
    client_mutation_id: Option<String>,
    id: ID,
}

impl From<RemoveTodoInput> for MutationInput<RemoveTodo> {
    fn from(input: RemoveTodoInput) -> Self {
        MutationInput {
            client_mutation_id: input.client_mutation_id,
            fields: RemoveTodo { id: input.id.0 },
        }
    }
}

#[derive(InputObject)]
pub struct RenameTodoInput {
    client_mutation_id: Option<String>,
    id: ID,
    text: String,
}

impl From<RenameTodoInput> for MutationInput<RenameTodo> {
    fn from(input: RenameTodoInput) -> Self {
        MutationInput {
            client_mutation_id: input.client_mutation_id,
            fields: RenameTodo {
                id: input.id.0,
                text: input.text,
            },
        }
    }
}

// ---------------------------------------------------------------------------
// Mutation payloads
// ---------------------------------------------------------------------------

pub struct AddTodoPayload(MutationPayload<AddTodoOutcome>);

#[Object]
impl AddTodoPayload {
    async fn client_mutation_id(&self) -> Option<String> {
        self.0.client_mutation_id.clone()
    }

    /// Edge for the new todo, positioned within the viewer's full list.
    async fn todo_edge(&self, ctx: &Context<'_>) -> Result<Option<TodoEdge>> {
        let edge = ops::todo_edge(store(ctx)?.as_ref(), &self.0.result.todo_id)?;
        Ok(edge.map(|edge| TodoEdge::from(edge.map(TodoObject))))
    }

    async fn viewer(&self, ctx: &Context<'_>) -> Result<UserObject> {
        viewer(ctx)
    }
}

pub struct ChangeTodoStatusPayload(MutationPayload<TodoOutcome>);

#[Object]
impl ChangeTodoStatusPayload {
    async fn client_mutation_id(&self) -> Option<String> {
        self.0.client_mutation_id.clone()
    }

    async fn todo(&self, ctx: &Context<'_>) -> Result<Option<TodoObject>> {
        find_todo(ctx, self.0.result.todo_id.as_deref())
    }

    async fn viewer(&self, ctx: &Context<'_>) -> Result<UserObject> {
        viewer(ctx)
    }
}

pub struct RenameTodoPayload(MutationPayload<TodoOutcome>);

#[Object]
impl RenameTodoPayload {
    async fn client_mutation_id(&self) -> Option<String> {
        self.0.client_mutation_id.clone()
    }

    async fn todo(&self, ctx: &Context<'_>) -> Result<Option<TodoObject>> {
        find_todo(ctx, self.0.result.todo_id.as_deref())
    }

    async fn viewer(&self, ctx: &Context<'_>) -> Result<UserObject> {
        viewer(ctx)
    }
}

pub struct MarkAllTodosPayload(MutationPayload<MarkAllTodosOutcome>);

#[Object]
impl MarkAllTodosPayload {
    async fn client_mutation_id(&self) -> Option<String> {
        self.0.client_mutation_id.clone()
    }

    async fn changed_todos(&self, ctx: &Context<'_>) -> Result<Vec<TodoObject>> {
        let store = store(ctx)?;
        let mut todos = Vec::with_capacity(self.0.result.changed_todo_ids.len());
        for id in &self.0.result.changed_todo_ids {
            if let Some(todo) = store.get_todo(id)? {
                todos.push(TodoObject(todo));
            }
        }
        Ok(todos)
    }

    async fn viewer(&self, ctx: &Context<'_>) -> Result<UserObject> {
        viewer(ctx)
    }
}

pub struct RemoveCompletedTodosPayload(MutationPayload<RemoveCompletedTodosOutcome>);

#[Object]
impl RemoveCompletedTodosPayload {
    async fn client_mutation_id(&self) -> Option<String> {
        self.0.client_mutation_id.clone()
    }

    async fn deleted_todo_ids(&self) -> Vec<ID> {
        self.0
            .result
            .deleted_todo_ids
            .iter()
            .map(|id| ID(NodeType::Todo.global_id(id)))
            .collect()
    }

    async fn viewer(&self, ctx: &Context<'_>) -> Result<UserObject> {
        viewer(ctx)
    }
}

pub struct RemoveTodoPayload(MutationPayload<RemoveTodoOutcome>);

#[Object]
impl RemoveTodoPayload {
    async fn client_mutation_id(&self) -> Option<String> {
        self.0.client_mutation_id.clone()
    }

    async fn deleted_todo_id(&self) -> Option<ID> {
        self.0
            .result
            .deleted_todo_id
            .as_deref()
            .map(|id| ID(NodeType::Todo.global_id(id)))
    }

    async fn viewer(&self, ctx: &Context<'_>) -> Result<UserObject> {
        viewer(ctx)
    }
}

// ---------------------------------------------------------------------------
// Mutation
// ---------------------------------------------------------------------------

pub struct Mutation;

#[Object]
impl Mutation {
    async fn add_todo(&self, ctx: &Context<'_>, input: AddTodoInput) -> Result<AddTodoPayload> {
        let payload = execute::<AddTodo>(store(ctx)?.as_ref(), input.into())?;
        Ok(AddTodoPayload(payload))
    }

    async fn change_todo_status(
        &self,
        ctx: &Context<'_>,
        input: ChangeTodoStatusInput,
    ) -> Result<ChangeTodoStatusPayload> {
        let payload = execute::<ChangeTodoStatus>(store(ctx)?.as_ref(), input.into())?;
        Ok(ChangeTodoStatusPayload(payload))
    }

    async fn mark_all_todos(
        &self,
        ctx: &Context<'_>,
        input: MarkAllTodosInput,
    ) -> Result<MarkAllTodosPayload> {
        let payload = execute::<MarkAllTodos>(store(ctx)?.as_ref(), input.into())?;
        Ok(MarkAllTodosPayload(payload))
    }

    async fn remove_completed_todos(
        &self,
        ctx: &Context<'_>,
        input: RemoveCompletedTodosInput,
    ) -> Result<RemoveCompletedTodosPayload> {
        let payload = execute::<RemoveCompletedTodos>(store(ctx)?.as_ref(), input.into())?;
        Ok(RemoveCompletedTodosPayload(payload))
    }

    async fn remove_todo(
        &self,
        ctx: &Context<'_>,
        input: RemoveTodoInput,
    ) -> Result<RemoveTodoPayload> {
        let payload = execute::<RemoveTodo>(store(ctx)?.as_ref(), input.into())?;
        Ok(RemoveTodoPayload(payload))
    }

    async fn rename_todo(
        &self,
        ctx: &Context<'_>,
        input: RenameTodoInput,
    ) -> Result<RenameTodoPayload> {
        let payload = execute::<RenameTodo>(store(ctx)?.as_ref(), input.into())?;
        Ok(RenameTodoPayload(payload))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use relay_todo_core::{MemoryStore, StoreError, TodoStore};
    use serde_json::json;
    use std::sync::Arc;

    /// Delegates to a `MemoryStore` but fails every listing.
    struct ListingFails(MemoryStore);

    impl TodoStore for ListingFails {
        fn get_todo(&self, id: &str) -> Result<Option<Todo>, StoreError> {
            self.0.get_todo(id)
        }
        fn list_todos(&self, _status: TodoStatus) -> Result<Vec<Todo>, StoreError> {
            Err(StoreError::Poisoned)
        }
        fn get_user(&self, id: &str) -> Result<Option<User>, StoreError> {
            self.0.get_user(id)
        }
        fn get_viewer(&self) -> Result<User, StoreError> {
            self.0.get_viewer()
        }
        fn add_todo(&self, text: &str, complete: bool) -> Result<String, StoreError> {
            self.0.add_todo(text, complete)
        }
        fn rename_todo(&self, id: &str, text: &str) -> Result<bool, StoreError> {
            self.0.rename_todo(id, text)
        }
        fn set_todo_complete(&self, id: &str, complete: bool) -> Result<bool, StoreError> {
            self.0.set_todo_complete(id, complete)
        }
        fn mark_all_todos(&self, complete: bool) -> Result<Vec<String>, StoreError> {
            self.0.mark_all_todos(complete)
        }
        fn remove_todo(&self, id: &str) -> Result<bool, StoreError> {
            self.0.remove_todo(id)
        }
        fn remove_completed_todos(&self) -> Result<Vec<String>, StoreError> {
            self.0.remove_completed_todos()
        }
    }

    async fn run(schema: &TodoSchema, query: &str) -> serde_json::Value {
        let response = schema.execute(query).await;
        assert!(response.errors.is_empty(), "{:?}", response.errors);
        response.data.into_json().unwrap()
    }

    #[tokio::test]
    async fn sdl_exposes_relay_shapes() {
        let sdl = build_schema(MemoryStore::shared()).sdl();
        assert!(sdl.contains("interface Node"));
        assert!(sdl.contains("type TodoConnection"));
        assert!(sdl.contains("type PageInfo"));
        assert!(sdl.contains("addTodo("));
        assert!(sdl.contains("type AddTodoPayload"));
    }

    #[tokio::test]
    async fn node_resolves_todo_and_viewer() {
        let store = MemoryStore::shared();
        let id = store.add_todo("walk dog", false).unwrap();
        let schema = build_schema(store);

        let todo_gid = NodeType::Todo.global_id(&id);
        let query = format!(
            r#"{{ node(id: "{todo_gid}") {{ __typename id ... on Todo {{ text complete }} }} }}"#
        );
        let data = run(&schema, &query).await;
        assert_eq!(
            data["node"],
            json!({ "__typename": "Todo", "id": todo_gid, "text": "walk dog", "complete": false })
        );

        let user_gid = NodeType::User.global_id("me");
        let query = format!(r#"{{ node(id: "{user_gid}") {{ __typename id }} }}"#);
        let data = run(&schema, &query).await;
        assert_eq!(data["node"]["__typename"], "User");
    }

    #[tokio::test]
    async fn malformed_node_id_is_null() {
        let schema = build_schema(MemoryStore::shared());
        let data = run(&schema, r#"{ node(id: "%%%") { id } }"#).await;
        assert!(data["node"].is_null());
    }

    #[tokio::test]
    async fn store_failure_errors_only_the_failing_field() {
        let inner = MemoryStore::new();
        let id = inner.add_todo("walk dog", false).unwrap();
        let schema = build_schema(Arc::new(ListingFails(inner)));

        let todo_gid = NodeType::Todo.global_id(&id);
        let query = format!(r#"{{ viewer {{ id totalCount }} node(id: "{todo_gid}") {{ id }} }}"#);
        let response = schema.execute(query).await;

        assert_eq!(response.errors.len(), 1, "{:?}", response.errors);
        let error = &response.errors[0];
        assert!(error.message.contains("poisoned"), "{}", error.message);
        assert_eq!(
            serde_json::to_value(&error.path).unwrap(),
            json!(["viewer", "totalCount"])
        );

        let data = response.data.into_json().unwrap();
        assert_eq!(data["viewer"]["id"], NodeType::User.global_id("me"));
        assert_eq!(data["node"]["id"], todo_gid);
    }

    #[tokio::test]
    async fn status_defaults_to_any() {
        let store = MemoryStore::shared();
        store.add_todo("a", true).unwrap();
        store.add_todo("b", false).unwrap();
        let schema = build_schema(store);

        let data = run(
            &schema,
            r#"{ viewer { all: todos { edges { node { text } } }
                          done: todos(status: "completed") { edges { node { text } } }
                          totalCount completedCount } }"#,
        )
        .await;
        assert_eq!(data["viewer"]["all"]["edges"].as_array().unwrap().len(), 2);
        assert_eq!(data["viewer"]["done"]["edges"][0]["node"]["text"], "a");
        assert_eq!(data["viewer"]["totalCount"], 2);
        assert_eq!(data["viewer"]["completedCount"], 1);
    }

    #[tokio::test]
    async fn negative_first_is_a_visible_error() {
        let schema = build_schema(MemoryStore::shared());
        let response = schema
            .execute("{ viewer { todos(first: -1) { edges { cursor } } } }")
            .await;
        assert_eq!(response.errors.len(), 1);
        assert!(response.errors[0].message.contains("first"));
    }

    #[tokio::test]
    async fn rename_with_wrong_type_returns_null_todo() {
        let store = MemoryStore::shared();
        let id = store.add_todo("keep", false).unwrap();
        let schema = build_schema(store.clone());

        let user_typed = NodeType::User.global_id(&id);
        let query = format!(
            r#"mutation {{ renameTodo(input: {{ id: "{user_typed}", text: "x", clientMutationId: "c1" }}) {{
                clientMutationId todo {{ text }} }} }}"#
        );
        let data = run(&schema, &query).await;
        assert_eq!(data["renameTodo"]["clientMutationId"], "c1");
        assert!(data["renameTodo"]["todo"].is_null());
        assert_eq!(store.get_todo(&id).unwrap().unwrap().text, "keep");
    }
}
