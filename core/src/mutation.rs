//! Client-mutation-id envelope around domain operations.
//!
//! # Design
//! Every mutation accepts `{clientMutationId?, ...fields}` and answers with
//! `{clientMutationId?, ...result}`. The envelope strips the id, hands the
//! remaining fields to the domain function and copies the id into the
//! payload verbatim. The id is never inspected or stored.
//!
//! Domain functions are expressed as `Operation` implementations: the input
//! struct is the operation and `apply` is a plain function over it and a
//! store handle, independent of any schema framework.

use serde::{Deserialize, Serialize};

use crate::error::RelayError;
use crate::store::TodoStore;

/// Mutation request: correlation token plus domain fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MutationInput<T> {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_mutation_id: Option<String>,
    #[serde(flatten)]
    pub fields: T,
}

impl<T> MutationInput<T> {
    pub fn new(fields: T) -> Self {
        Self {
            client_mutation_id: None,
            fields,
        }
    }

    pub fn with_client_mutation_id(mut self, id: impl Into<String>) -> Self {
        self.client_mutation_id = Some(id.into());
        self
    }
}

/// Mutation response: the echoed token plus the domain result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MutationPayload<R> {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_mutation_id: Option<String>,
    #[serde(flatten)]
    pub result: R,
}

/// A domain mutation over the store.
pub trait Operation {
    /// Mutation name as exposed on the graph API.
    const NAME: &'static str;

    type Output;

    fn apply(self, store: &dyn TodoStore) -> Result<Self::Output, RelayError>;
}

/// Run `domain_fn` inside the envelope.
pub fn run<T, R, E>(
    input: MutationInput<T>,
    domain_fn: impl FnOnce(T) -> Result<R, E>,
) -> Result<MutationPayload<R>, E> {
    let MutationInput {
        client_mutation_id,
        fields,
    } = input;
    let result = domain_fn(fields)?;
    Ok(MutationPayload {
        client_mutation_id,
        result,
    })
}

/// Run operation `O` against `store` inside the envelope.
pub fn execute<O: Operation>(
    store: &dyn TodoStore,
    input: MutationInput<O>,
) -> Result<MutationPayload<O::Output>, RelayError> {
    let _span = tracing::info_span!("mutation", name = O::NAME).entered();
    run(input, |operation| operation.apply(store)).inspect_err(|err| {
        tracing::warn!(error = %err, "mutation failed");
    })
}
