//! Table properties
//!
//! [`TableProperties`] is the immutable result of parsing one table header
//! line. Besides the flat property map it exposes the separators and flags
//! the table reader needs, each resolved from an override in the map, then
//! from caller supplied defaults, then from the built-in defaults.

use crate::deserializer::{PropertiesDeserializer, ValueDeserializer};
use crate::error::PropertiesError;
use crate::parser::{ParserConfig, PropertiesParser, ValueConverter};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use tracing::debug;

pub const ROW_SEPARATOR: &str = "\n";
pub const DEFAULT_HEADER_SEPARATOR: &str = "|";
pub const DEFAULT_VALUE_SEPARATOR: &str = "|";
pub const DEFAULT_IGNORABLE_SEPARATOR: &str = "|--";
pub const DEFAULT_COMMENT_SEPARATOR: &str = "#";
pub const DEFAULT_TRIM: bool = true;
pub const DEFAULT_META_BY_ROW: bool = false;

pub const HEADER_SEPARATOR_KEY: &str = "headerSeparator";
pub const VALUE_SEPARATOR_KEY: &str = "valueSeparator";
pub const IGNORABLE_SEPARATOR_KEY: &str = "ignorableSeparator";
pub const COMMENT_SEPARATOR_KEY: &str = "commentSeparator";
pub const TRIM_KEY: &str = "trim";
pub const META_BY_ROW_KEY: &str = "metaByRow";
pub const TRANSFORMER_KEY: &str = "transformer";

/// Caller supplied separator defaults, used when the line does not override them
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeparatorDefaults {
    pub header: Option<String>,
    pub value: Option<String>,
    pub ignorable: Option<String>,
}

impl SeparatorDefaults {
    /// Creates defaults for all three separators
    pub fn new(
        header: impl Into<String>,
        value: impl Into<String>,
        ignorable: impl Into<String>,
    ) -> Self {
        Self {
            header: Some(header.into()),
            value: Some(value.into()),
            ignorable: Some(ignorable.into()),
        }
    }

    pub fn with_header(mut self, header: impl Into<String>) -> Self {
        self.header = Some(header.into());
        self
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn with_ignorable(mut self, ignorable: impl Into<String>) -> Self {
        self.ignorable = Some(ignorable.into());
        self
    }
}

/// Parsed configuration of a single table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableProperties {
    header_separator: String,
    value_separator: String,
    ignorable_separator: String,
    comment_separator: String,
    trim: bool,
    meta_by_row: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    transformer: Option<String>,
    properties: IndexMap<String, String>,
}

impl TableProperties {
    /// Parses a properties line with the built-in defaults
    pub fn new(input: &str) -> Self {
        Self::with_defaults(input, &SeparatorDefaults::default())
    }

    /// Parses a properties line with caller supplied separator defaults
    pub fn with_defaults(input: &str, defaults: &SeparatorDefaults) -> Self {
        let properties = PropertiesParser::new(input).collect_properties();
        Self::from_properties_with_defaults(properties, defaults)
    }

    /// Parses a properties line, converting every resolved value.
    ///
    /// Fails without returning partial properties if the converter rejects
    /// any value.
    pub fn with_converter(
        input: &str,
        defaults: &SeparatorDefaults,
        converter: &dyn ValueConverter,
    ) -> Result<Self, PropertiesError> {
        Self::builder(input)
            .with_defaults(defaults.clone())
            .with_converter(converter)
            .build()
    }

    /// Returns a builder for full control over parsing
    pub fn builder(input: &str) -> TablePropertiesBuilder<'_> {
        TablePropertiesBuilder::new(input)
    }

    /// Builds properties from an existing map with the built-in defaults
    pub fn from_properties(properties: IndexMap<String, String>) -> Self {
        Self::from_properties_with_defaults(properties, &SeparatorDefaults::default())
    }

    /// Builds properties from an existing map, bypassing parsing
    pub fn from_properties_with_defaults(
        properties: IndexMap<String, String>,
        defaults: &SeparatorDefaults,
    ) -> Self {
        let separator = |key: &str, default: &Option<String>, builtin: &str| {
            properties
                .get(key)
                .or(default.as_ref())
                .cloned()
                .unwrap_or_else(|| builtin.to_string())
        };
        let flag = |key: &str, builtin: bool| {
            properties
                .get(key)
                .map_or(builtin, |value| value.eq_ignore_ascii_case("true"))
        };

        let table_properties = Self {
            header_separator: separator(
                HEADER_SEPARATOR_KEY,
                &defaults.header,
                DEFAULT_HEADER_SEPARATOR,
            ),
            value_separator: separator(
                VALUE_SEPARATOR_KEY,
                &defaults.value,
                DEFAULT_VALUE_SEPARATOR,
            ),
            ignorable_separator: separator(
                IGNORABLE_SEPARATOR_KEY,
                &defaults.ignorable,
                DEFAULT_IGNORABLE_SEPARATOR,
            ),
            comment_separator: separator(COMMENT_SEPARATOR_KEY, &None, DEFAULT_COMMENT_SEPARATOR),
            trim: flag(TRIM_KEY, DEFAULT_TRIM),
            meta_by_row: flag(META_BY_ROW_KEY, DEFAULT_META_BY_ROW),
            transformer: properties.get(TRANSFORMER_KEY).cloned(),
            properties,
        };

        debug!(
            properties = table_properties.properties.len(),
            transformer = ?table_properties.transformer,
            "Built table properties"
        );
        table_properties
    }

    /// Row separator; always a newline
    pub fn row_separator(&self) -> &'static str {
        ROW_SEPARATOR
    }

    pub fn header_separator(&self) -> &str {
        &self.header_separator
    }

    pub fn value_separator(&self) -> &str {
        &self.value_separator
    }

    pub fn ignorable_separator(&self) -> &str {
        &self.ignorable_separator
    }

    pub fn comment_separator(&self) -> &str {
        &self.comment_separator
    }

    /// Whether table cells are trimmed
    pub fn is_trim(&self) -> bool {
        self.trim
    }

    /// Whether meta information is given per row
    pub fn is_meta_by_row(&self) -> bool {
        self.meta_by_row
    }

    /// Name of the transformer to apply to the table, if any
    pub fn transformer(&self) -> Option<&str> {
        self.transformer.as_deref()
    }

    /// All resolved properties in input order
    pub fn properties(&self) -> &IndexMap<String, String> {
        &self.properties
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.properties.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.properties
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }

    /// Reads a property as a typed value, if present
    pub fn get_as<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, PropertiesError> {
        self.get(key)
            .map(|value| T::deserialize(ValueDeserializer::new(key, value)))
            .transpose()
    }

    /// Reads a property that must be present and non-blank
    pub fn mandatory_non_blank<T: DeserializeOwned>(&self, key: &str) -> Result<T, PropertiesError> {
        let value = self
            .get(key)
            .ok_or_else(|| PropertiesError::MissingProperty {
                key: key.to_string(),
            })?;
        if value.trim().is_empty() {
            return Err(PropertiesError::BlankProperty {
                key: key.to_string(),
            });
        }
        T::deserialize(ValueDeserializer::new(key, value))
    }

    /// Deserializes the whole property map into a typed value
    pub fn deserialize<'de, T: Deserialize<'de>>(&'de self) -> Result<T, PropertiesError> {
        T::deserialize(PropertiesDeserializer::new(&self.properties))
    }
}

impl Default for TableProperties {
    fn default() -> Self {
        Self::from_properties(IndexMap::new())
    }
}

impl From<IndexMap<String, String>> for TableProperties {
    fn from(properties: IndexMap<String, String>) -> Self {
        Self::from_properties(properties)
    }
}

/// Builder for parsing a properties line with custom settings
pub struct TablePropertiesBuilder<'a> {
    input: &'a str,
    parser_config: Option<ParserConfig>,
    defaults: SeparatorDefaults,
    converter: Option<&'a dyn ValueConverter>,
}

impl<'a> TablePropertiesBuilder<'a> {
    /// Creates a new builder
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            parser_config: None,
            defaults: SeparatorDefaults::default(),
            converter: None,
        }
    }

    /// Sets the parser configuration
    pub fn with_parser_config(mut self, config: ParserConfig) -> Self {
        self.parser_config = Some(config);
        self
    }

    /// Sets the separator defaults
    pub fn with_defaults(mut self, defaults: SeparatorDefaults) -> Self {
        self.defaults = defaults;
        self
    }

    /// Sets the converter applied to every resolved value
    pub fn with_converter(mut self, converter: &'a dyn ValueConverter) -> Self {
        self.converter = Some(converter);
        self
    }

    /// Parses the input and builds the properties
    pub fn build(self) -> Result<TableProperties, PropertiesError> {
        let parser =
            PropertiesParser::with_config(self.input, self.parser_config.unwrap_or_default());
        let properties = match self.converter {
            Some(converter) => parser.collect_converted(converter)?,
            None => parser.collect_properties(),
        };
        Ok(TableProperties::from_properties_with_defaults(
            properties,
            &self.defaults,
        ))
    }
}
