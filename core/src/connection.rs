//! Cursor pagination over ordered sequences.
//!
//! # Design
//! `paginate` is a pure function of a snapshot of the sequence: callers list
//! the items, release any lock, then slice. Cursors encode the item's offset
//! in the *original* sequence, so a cursor taken from one page stays valid
//! for the next request against the same ordering.
//!
//! Slicing order:
//! 1. `after` / `before` narrow the window when their cursor points at an
//!    element of the sequence. A cursor that points nowhere is ignored.
//! 2. `first` keeps the front of the window, then `last` keeps the back of
//!    what remains.
//!
//! `has_previous_page` / `has_next_page` are set by either source: a
//! matching `after` / `before` boundary, or trimming by `last` / `first`.

use base64::engine::general_purpose;
use base64::Engine as _;
use serde::{Deserialize, Serialize};

use crate::error::RelayError;

const CURSOR_PREFIX: &str = "arrayconnection:";

/// Pagination arguments accepted by every connection field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionArgs {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub before: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub after: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last: Option<i64>,
}

impl ConnectionArgs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn before(mut self, cursor: impl Into<String>) -> Self {
        self.before = Some(cursor.into());
        self
    }

    pub fn after(mut self, cursor: impl Into<String>) -> Self {
        self.after = Some(cursor.into());
        self
    }

    pub fn first(mut self, count: i64) -> Self {
        self.first = Some(count);
        self
    }

    pub fn last(mut self, count: i64) -> Self {
        self.last = Some(count);
        self
    }
}

/// Whether more items exist around the returned window.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub has_next_page: bool,
    pub has_previous_page: bool,
    pub start_cursor: Option<String>,
    pub end_cursor: Option<String>,
}

/// A node paired with its cursor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Edge<T> {
    pub node: T,
    pub cursor: String,
}

impl<T> Edge<T> {
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Edge<U> {
        Edge {
            node: f(self.node),
            cursor: self.cursor,
        }
    }
}

/// One page of an ordered sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection<T> {
    pub edges: Vec<Edge<T>>,
    pub page_info: PageInfo,
}

impl<T> Connection<T> {
    /// Convert every node, keeping cursors and page info.
    pub fn map<U>(self, mut f: impl FnMut(T) -> U) -> Connection<U> {
        Connection {
            edges: self.edges.into_iter().map(|edge| edge.map(&mut f)).collect(),
            page_info: self.page_info,
        }
    }

    pub fn nodes(&self) -> impl Iterator<Item = &T> {
        self.edges.iter().map(|edge| &edge.node)
    }
}

/// Cursor for the element at `offset` of a sequence.
pub fn offset_to_cursor(offset: usize) -> String {
    general_purpose::STANDARD.encode(format!("{CURSOR_PREFIX}{offset}"))
}

/// Offset encoded in `cursor`, or `None` if it is not a cursor.
pub fn cursor_to_offset(cursor: &str) -> Option<usize> {
    let bytes = general_purpose::STANDARD.decode(cursor).ok()?;
    let decoded = String::from_utf8(bytes).ok()?;
    decoded.strip_prefix(CURSOR_PREFIX)?.parse().ok()
}

/// Cursor of the first element of `sequence` matching `predicate`.
pub fn cursor_for_object<T>(sequence: &[T], predicate: impl FnMut(&T) -> bool) -> Option<String> {
    sequence.iter().position(predicate).map(offset_to_cursor)
}

/// Slice `sequence` according to `args`.
///
/// Fails with `InvalidPaginationArgument` if `first` or `last` is negative.
pub fn paginate<T>(sequence: Vec<T>, args: &ConnectionArgs) -> Result<Connection<T>, RelayError> {
    let first = non_negative("first", args.first)?;
    let last = non_negative("last", args.last)?;
    let len = sequence.len();

    let mut start = 0;
    let mut end = len;
    let mut has_previous_page = false;
    let mut has_next_page = false;

    if let Some(offset) = offset_within(args.after.as_deref(), len) {
        start = offset + 1;
        has_previous_page = true;
    }
    if let Some(offset) = offset_within(args.before.as_deref(), len) {
        end = offset;
        has_next_page = true;
    }
    // `after` at or past `before` leaves nothing between them.
    end = end.max(start);

    if let Some(first) = first {
        if end - start > first {
            end = start + first;
            has_next_page = true;
        }
    }
    if let Some(last) = last {
        if end - start > last {
            start = end - last;
            has_previous_page = true;
        }
    }

    let edges: Vec<Edge<T>> = sequence
        .into_iter()
        .enumerate()
        .skip(start)
        .take(end - start)
        .map(|(offset, node)| Edge {
            node,
            cursor: offset_to_cursor(offset),
        })
        .collect();

    let page_info = PageInfo {
        has_next_page,
        has_previous_page,
        start_cursor: edges.first().map(|edge| edge.cursor.clone()),
        end_cursor: edges.last().map(|edge| edge.cursor.clone()),
    };

    Ok(Connection { edges, page_info })
}

fn non_negative(name: &'static str, value: Option<i64>) -> Result<Option<usize>, RelayError> {
    match value {
        None => Ok(None),
        Some(value) if value < 0 => Err(RelayError::InvalidPaginationArgument { name, value }),
        Some(value) => Ok(Some(usize::try_from(value).unwrap_or(usize::MAX))),
    }
}

fn offset_within(cursor: Option<&str>, len: usize) -> Option<usize> {
    cursor
        .and_then(cursor_to_offset)
        .filter(|offset| *offset < len)
}
