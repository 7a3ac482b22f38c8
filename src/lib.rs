//! # Table Properties
//!
//! Parser for the one-line properties header of a tabular examples block.
//!
//! ## Overview
//!
//! A tabular test-data block may start with a line of comma separated
//! `key=value` pairs configuring how the rest of the block is read:
//!
//! ```text
//! {headerSeparator=!, valueSeparator=!, transformer=FROM_LANDSCAPE}
//! ```
//!
//! This crate turns the content of such a line into an immutable
//! [`TableProperties`] value. Splitting the table body into rows and
//! running named transformers is left to the caller.
//!
//! ## Syntax
//!
//! - Segments are separated by commas. A comma preceded by `\` is kept as a
//!   literal comma, and commas inside `{...}` groups never split, so values
//!   may carry nested property lists verbatim.
//! - The first `=` of a segment separates key and value. A segment without
//!   `=` is a key with an empty value.
//! - Values are trimmed unless the key lists decorators:
//!   `{key|uppercase|verbatim}`. Decorators run left to right; the built-in
//!   ones are `trim`, `verbatim`, `uppercase` and `lowercase`.
//!
//! ## Basic Usage
//!
//! ```rust
//! use table_properties::TableProperties;
//!
//! let properties = TableProperties::new(
//!     "valueSeparator=!, {title|uppercase}= orders , tables={a=1, b=2}",
//! );
//!
//! assert_eq!(properties.value_separator(), "!");
//! assert_eq!(properties.header_separator(), "|");
//! assert_eq!(properties.get("title"), Some(" ORDERS "));
//! assert_eq!(properties.get("tables"), Some("{a=1, b=2}"));
//! ```
//!
//! ## Value Conversion
//!
//! A [`ValueConverter`] sees every decorated value before it is stored. A
//! rejected value aborts construction:
//!
//! ```rust
//! use table_properties::{ConversionError, SeparatorDefaults, TableProperties, TargetKind};
//!
//! let expand = |value: &str, target: TargetKind| -> Result<String, ConversionError> {
//!     match value {
//!         "<missing>" => Err(ConversionError::new(target, value, "unresolved placeholder")),
//!         other => Ok(other.replace("<env>", "staging")),
//!     }
//! };
//!
//! let properties = TableProperties::with_converter(
//!     "dataset=<env>-orders",
//!     &SeparatorDefaults::default(),
//!     &expand,
//! )?;
//! assert_eq!(properties.get("dataset"), Some("staging-orders"));
//!
//! assert!(TableProperties::with_converter("x=<missing>", &SeparatorDefaults::default(), &expand).is_err());
//! # Ok::<(), table_properties::PropertiesError>(())
//! ```
//!
//! ## Typed Access
//!
//! ```rust
//! use serde::Deserialize;
//! use table_properties::TableProperties;
//!
//! #[derive(Deserialize)]
//! #[serde(rename_all = "camelCase")]
//! struct Layout {
//!     meta_by_row: bool,
//!     columns: Option<usize>,
//! }
//!
//! let properties = TableProperties::new("metaByRow=true, columns=3");
//! let layout: Layout = properties.deserialize()?;
//! assert!(layout.meta_by_row);
//! assert_eq!(layout.columns, Some(3));
//!
//! let columns: usize = properties.mandatory_non_blank("columns")?;
//! assert_eq!(columns, 3);
//! # Ok::<(), table_properties::PropertiesError>(())
//! ```

pub mod decorator;
pub mod deserializer;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod properties;


pub use decorator::{Decorator, DecoratorChain, DecoratorFn, DecoratorRegistry};
pub use deserializer::{PropertiesDeserializer, ValueDeserializer};
pub use error::{ConversionError, PropertiesError};
pub use lexer::{Segment, SegmentLexer, split_key_value};
pub use parser::{
    ChainedValueConverter, DefaultDecoration, MapValueConverter, ParserConfig, PropertiesParser,
    ResolvedProperty, TargetKind, ValueConverter, resolve_key,
};
pub use properties::{SeparatorDefaults, TableProperties, TablePropertiesBuilder};
