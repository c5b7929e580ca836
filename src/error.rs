// Configuration errors raised while building the dictionary
//
// Resolution misses and degenerate text are routine outcomes, not errors;
// only a broken configuration stops a run.

use crate::entities::RegistryKind;
use crate::remap::AliasCollision;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DictionaryError {
    #[error("failed to read {kind} registry {path:?}")]
    Io {
        kind: RegistryKind,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed {kind} registry {origin}: {source}")]
    Malformed {
        kind: RegistryKind,
        origin: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("{kind} registry {location}: missing required field `{field}`")]
    MissingField {
        kind: RegistryKind,
        location: String,
        field: &'static str,
    },

    #[error("{kind} registry: duplicate canonical name {name:?}")]
    DuplicateName { kind: RegistryKind, name: String },

    #[error("card issuer {issuer:?} is not registered in the bank registry")]
    UnknownIssuer { issuer: String },

    #[error("alias collision: {0}")]
    AliasCollision(AliasCollision),
}
