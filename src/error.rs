use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Kind of reference record an identifier failed to resolve against.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceKind {
    Crop,
    Location,
    IrrigationMethod,
}

impl Display for ReferenceKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Crop => write!(f, "crop"),
            Self::Location => write!(f, "location"),
            Self::IrrigationMethod => write!(f, "irrigation method"),
        }
    }
}

/// Deterministic input-validation failures of the budget engine. There are no
/// transient variants: the same inputs always fail the same way.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum EngineError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("unknown {kind}: {id}")]
    UnknownReference { kind: ReferenceKind, id: String },

    #[error("degenerate input: {0}")]
    DegenerateInput(String),
}

impl EngineError {
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    pub fn unknown(kind: ReferenceKind, id: impl Into<String>) -> Self {
        Self::UnknownReference {
            kind,
            id: id.into(),
        }
    }

    pub fn degenerate(message: impl Into<String>) -> Self {
        Self::DegenerateInput(message.into())
    }
}
