//! Error types for table properties parsing
//!
//! Syntax irregularities in a properties line are never errors. The only
//! construction-time failure is a rejected value conversion; the remaining
//! variants come from the typed accessors on [`TableProperties`].
//!
//! [`TableProperties`]: crate::properties::TableProperties

use std::fmt;
use thiserror::Error;

use crate::parser::TargetKind;

/// Main error type for table properties operations
#[derive(Debug, Error)]
pub enum PropertiesError {
    /// A value converter rejected a resolved value
    #[error("Cannot convert value of property '{key}' at offset {offset}: {source}")]
    Conversion {
        key: String,
        offset: usize,
        #[source]
        source: ConversionError,
    },

    /// A mandatory property is absent
    #[error("Property '{key}' is not set")]
    MissingProperty { key: String },

    /// A mandatory property is present but blank
    #[error("Property '{key}' is blank")]
    BlankProperty { key: String },

    /// A resolved value could not be read as the requested Rust type
    #[error("Deserialization error: {0}")]
    Deserialize(String),
}

/// Failure reported by a [`ValueConverter`](crate::parser::ValueConverter)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("'{value}' is not a valid {target}: {message}")]
pub struct ConversionError {
    /// Kind the value was being converted to
    pub target: TargetKind,
    /// The rejected input value
    pub value: String,
    /// Human readable reason
    pub message: String,
}

impl ConversionError {
    /// Creates a new conversion error
    pub fn new(target: TargetKind, value: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            target,
            value: value.into(),
            message: message.into(),
        }
    }
}

impl PropertiesError {
    /// Returns the property key the error relates to, if any
    pub fn key(&self) -> Option<&str> {
        match self {
            PropertiesError::Conversion { key, .. }
            | PropertiesError::MissingProperty { key }
            | PropertiesError::BlankProperty { key } => Some(key),
            PropertiesError::Deserialize(_) => None,
        }
    }

    /// Returns true if the error was raised while building the properties
    pub fn is_construction_error(&self) -> bool {
        matches!(self, PropertiesError::Conversion { .. })
    }
}

impl serde::de::Error for PropertiesError {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        PropertiesError::Deserialize(msg.to_string())
    }
}
