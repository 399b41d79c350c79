use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
#[cfg_attr(feature = "rich-errors", derive(miette::Diagnostic))]
pub enum FlagError {
    #[error("Invalid value '{value}' for flag '{flag}': {reason}")]
    Parse {
        flag: String,
        value: String,
        reason: String,
    },

    #[error("Flag '{flag}' expects {expected} but the config file supplies {found}")]
    ShapeMismatch {
        flag: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("Failed to read {path}: {source}")]
    FileAccess {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to decode {path}: {reason}")]
    Decode { path: PathBuf, reason: String },

    #[error("Unknown flag: -{0}")]
    UnknownFlag(String),

    #[error("Flag needs an argument: -{0}")]
    MissingValue(String),

    #[error("Help requested")]
    HelpRequested,

    #[error("Failed to move {from} to {to}: {source}")]
    Migration {
        from: PathBuf,
        to: PathBuf,
        source: std::io::Error,
    },

    #[error("Could not resolve {} flag(s) from the config file", .0.len())]
    Resolve(#[cfg_attr(feature = "rich-errors", related)] Vec<FlagError>),
}

impl FlagError {
    /// Name of the flag the error is about, if it concerns a single flag.
    pub fn flag(&self) -> Option<&str> {
        match self {
            FlagError::Parse { flag, .. } | FlagError::ShapeMismatch { flag, .. } => Some(flag),
            FlagError::UnknownFlag(name) | FlagError::MissingValue(name) => Some(name),
            _ => None,
        }
    }
}
