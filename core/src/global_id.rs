//! Opaque global ids for objects reachable through `node`.
//!
//! # Design
//! A global id is the standard base64 encoding of `"<TypeName>:<localId>"`.
//! The type name is recoverable from the id alone, which is what lets the
//! node resolver dispatch without a lookup table of issued ids. Decoding
//! splits at the first `:`, so local ids may themselves contain `:` while
//! type names may not.

use std::fmt;
use std::str::FromStr;

use base64::engine::general_purpose;
use base64::Engine as _;

use crate::error::RelayError;

const SEPARATOR: char = ':';

/// A validated `(type name, local id)` pair.
///
/// Both parts are non-empty and the type name has no `:`, so every
/// `GlobalId` encodes to a string that decodes back to the same pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GlobalId {
    type_name: String,
    local_id: String,
}

impl GlobalId {
    pub fn new(
        type_name: impl Into<String>,
        local_id: impl Into<String>,
    ) -> Result<Self, RelayError> {
        let type_name = type_name.into();
        let local_id = local_id.into();
        if type_name.is_empty() || type_name.contains(SEPARATOR) || local_id.is_empty() {
            let raw = format!("{type_name}{SEPARATOR}{local_id}");
            return Err(RelayError::InvalidGlobalId(raw));
        }
        Ok(Self {
            type_name,
            local_id,
        })
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn local_id(&self) -> &str {
        &self.local_id
    }

    pub fn into_local_id(self) -> String {
        self.local_id
    }

    /// Encode this pair as an opaque id.
    pub fn encode(&self) -> String {
        encode_pair(&self.type_name, &self.local_id)
    }
}

impl fmt::Display for GlobalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

impl FromStr for GlobalId {
    type Err = RelayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        from_global_id(s)
    }
}

/// Encode `(type_name, local_id)` as an opaque global id.
///
/// Fails with `InvalidGlobalId` if either part is empty or the type name
/// contains `:`.
pub fn to_global_id(type_name: &str, local_id: &str) -> Result<String, RelayError> {
    GlobalId::new(type_name, local_id).map(|id| id.encode())
}

/// Encoding for pairs the caller already knows to be valid.
pub(crate) fn encode_pair(type_name: &str, local_id: &str) -> String {
    general_purpose::STANDARD.encode(format!("{type_name}{SEPARATOR}{local_id}"))
}

/// Decode an opaque global id back into its type name and local id.
pub fn from_global_id(opaque_id: &str) -> Result<GlobalId, RelayError> {
    let invalid = || RelayError::InvalidGlobalId(opaque_id.to_string());

    let bytes = general_purpose::STANDARD
        .decode(opaque_id)
        .map_err(|_| invalid())?;
    let decoded = String::from_utf8(bytes).map_err(|_| invalid())?;
    let (type_name, local_id) = decoded.split_once(SEPARATOR).ok_or_else(invalid)?;

    GlobalId::new(type_name, local_id).map_err(|_| invalid())
}
