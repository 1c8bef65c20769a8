use crate::graph::NodeId;
use crate::property::ValueKind;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error("property at '{keypath}' holds a {found} value, provider supplies {expected}")]
    TypeMismatch {
        keypath: String,
        expected: ValueKind,
        found: ValueKind,
    },

    #[error("invalid keypath '{0}'")]
    InvalidKeypath(String),

    #[error("no node with id {0:?}")]
    UnknownNode(NodeId),
}
