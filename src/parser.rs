//! Properties parser
//!
//! Consumes segments from the [`SegmentLexer`], resolves the key and its
//! decorator chain and decorates the raw value. Conversion through a
//! [`ValueConverter`] happens after decoration and is the only step that
//! can fail.

use crate::decorator::{Decorator, DecoratorChain, DecoratorRegistry};
use crate::error::{ConversionError, PropertiesError};
use crate::lexer::SegmentLexer;
use indexmap::IndexMap;
use std::collections::HashMap;
use std::fmt;
use tracing::{trace, warn};

const DECORATED_KEY_OPEN: char = '{';
const DECORATED_KEY_CLOSE: char = '}';
const DECORATOR_SEPARATOR: char = '|';

/// Decorator applied to values whose key carries no explicit decorators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DefaultDecoration {
    /// Strip surrounding whitespace
    #[default]
    Trim,
    /// Keep the value exactly as written
    Verbatim,
}

impl DefaultDecoration {
    /// Returns the policy matching a global trim flag
    pub fn from_trim(trim: bool) -> Self {
        if trim {
            DefaultDecoration::Trim
        } else {
            DefaultDecoration::Verbatim
        }
    }

    /// Returns the decorator implementing this policy
    pub fn decorator(self) -> Decorator {
        match self {
            DefaultDecoration::Trim => Decorator::trim(),
            DefaultDecoration::Verbatim => Decorator::verbatim(),
        }
    }
}

/// Configuration options for the parser
#[derive(Debug, Clone, Default)]
pub struct ParserConfig {
    /// Implicit decoration of undecorated keys
    pub default_decoration: DefaultDecoration,
    /// Decorators available to `{key|name}` keys
    pub registry: DecoratorRegistry,
}

impl ParserConfig {
    /// Creates a new parser configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the implicit decoration of undecorated keys
    pub fn with_default_decoration(mut self, decoration: DefaultDecoration) -> Self {
        self.default_decoration = decoration;
        self
    }

    /// Sets the implicit decoration from a trim flag
    pub fn with_default_trim(self, trim: bool) -> Self {
        self.with_default_decoration(DefaultDecoration::from_trim(trim))
    }

    /// Replaces the decorator registry
    pub fn with_registry(mut self, registry: DecoratorRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Registers an additional decorator
    pub fn with_decorator(mut self, name: &'static str, transform: fn(&str) -> String) -> Self {
        self.registry.register(name, transform);
        self
    }
}

/// Kind a value is converted to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum TargetKind {
    String,
}

impl fmt::Display for TargetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetKind::String => f.write_str("string"),
        }
    }
}

/// Trait for converting resolved values before they are stored
pub trait ValueConverter {
    /// Converts a decorated value to the target kind
    fn convert(&self, value: &str, target: TargetKind) -> Result<String, ConversionError>;
}

impl<F> ValueConverter for F
where
    F: Fn(&str, TargetKind) -> Result<String, ConversionError>,
{
    fn convert(&self, value: &str, target: TargetKind) -> Result<String, ConversionError> {
        self(value, target)
    }
}

/// Map-based converter; values without an entry pass through unchanged
#[derive(Debug, Clone, Default)]
pub struct MapValueConverter {
    conversions: HashMap<String, String>,
}

impl MapValueConverter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a converter from an existing map
    pub fn from_map(conversions: HashMap<String, String>) -> Self {
        Self { conversions }
    }

    /// Adds a conversion
    pub fn insert(&mut self, from: impl Into<String>, to: impl Into<String>) {
        self.conversions.insert(from.into(), to.into());
    }
}

impl ValueConverter for MapValueConverter {
    fn convert(&self, value: &str, _target: TargetKind) -> Result<String, ConversionError> {
        Ok(self
            .conversions
            .get(value)
            .cloned()
            .unwrap_or_else(|| value.to_string()))
    }
}

/// Applies converters in order, each consuming the previous output
#[derive(Default)]
pub struct ChainedValueConverter {
    converters: Vec<Box<dyn ValueConverter>>,
}

impl ChainedValueConverter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a converter to the end of the chain
    pub fn add_converter(&mut self, converter: Box<dyn ValueConverter>) {
        self.converters.push(converter);
    }

    pub fn from_converters(converters: Vec<Box<dyn ValueConverter>>) -> Self {
        Self { converters }
    }
}

impl ValueConverter for ChainedValueConverter {
    fn convert(&self, value: &str, target: TargetKind) -> Result<String, ConversionError> {
        let mut result = value.to_string();
        for converter in &self.converters {
            result = converter.convert(&result, target)?;
        }
        Ok(result)
    }
}

/// Resolves a key part into the bare key and its decorator chain.
///
/// `{key|uppercase|trim}` yields `key` with the listed decorators; unknown
/// decorator names are skipped, which leaves the value unchanged at that
/// position. Any other key part is taken as-is and gets the single implicit
/// decorator chosen by `policy`.
pub fn resolve_key(
    key_part: &str,
    registry: &DecoratorRegistry,
    policy: DefaultDecoration,
) -> (String, DecoratorChain) {
    let key_part = key_part.trim();
    let interior = key_part
        .strip_prefix(DECORATED_KEY_OPEN)
        .and_then(|rest| rest.strip_suffix(DECORATED_KEY_CLOSE));

    let Some(interior) = interior else {
        return (
            key_part.to_string(),
            DecoratorChain::single(policy.decorator()),
        );
    };

    let mut tokens = interior.split(DECORATOR_SEPARATOR);
    let key = tokens.next().unwrap_or_default().trim().to_string();
    let mut chain = DecoratorChain::new();
    for name in tokens {
        match registry.get(name) {
            Some(decorator) => chain.push(decorator),
            None => warn!(key = %key, decorator = name.trim(), "Skipping unknown decorator"),
        }
    }
    (key, chain)
}

/// A fully resolved `key=value` pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedProperty {
    pub key: String,
    pub value: String,
    /// Decorators that produced `value`
    pub decorators: DecoratorChain,
    /// Byte offset of the segment in the input
    pub offset: usize,
}

impl ResolvedProperty {
    /// Passes the decorated value through a converter
    pub fn convert(self, converter: &dyn ValueConverter) -> Result<Self, PropertiesError> {
        match converter.convert(&self.value, TargetKind::String) {
            Ok(value) => Ok(Self { value, ..self }),
            Err(source) => Err(PropertiesError::Conversion {
                key: self.key,
                offset: self.offset,
                source,
            }),
        }
    }
}

/// Parser producing resolved properties from a properties line
#[derive(Debug, Clone)]
pub struct PropertiesParser<'a> {
    lexer: SegmentLexer<'a>,
    config: ParserConfig,
}

impl<'a> PropertiesParser<'a> {
    /// Creates a parser with the default configuration
    pub fn new(input: &'a str) -> Self {
        Self::with_config(input, ParserConfig::default())
    }

    /// Creates a parser with a custom configuration
    pub fn with_config(input: &'a str, config: ParserConfig) -> Self {
        Self {
            lexer: SegmentLexer::new(input),
            config,
        }
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Collects the remaining properties into a map.
    ///
    /// Later duplicate keys overwrite earlier ones but keep the position of
    /// the first occurrence.
    pub fn collect_properties(self) -> IndexMap<String, String> {
        self.map(|property| (property.key, property.value))
            .collect()
    }

    /// Collects the remaining properties, converting every value.
    ///
    /// The first rejected value aborts parsing.
    pub fn collect_converted(
        self,
        converter: &dyn ValueConverter,
    ) -> Result<IndexMap<String, String>, PropertiesError> {
        let mut properties = IndexMap::new();
        for property in self {
            let property = property.convert(converter)?;
            properties.insert(property.key, property.value);
        }
        Ok(properties)
    }
}

impl Iterator for PropertiesParser<'_> {
    type Item = ResolvedProperty;

    fn next(&mut self) -> Option<ResolvedProperty> {
        let segment = self.lexer.next()?;
        let (key_part, value_part) = segment.key_value();
        let (key, decorators) = resolve_key(
            key_part,
            &self.config.registry,
            self.config.default_decoration,
        );
        let value = decorators.apply(value_part.unwrap_or_default());

        trace!(
            key = %key,
            decorators = ?decorators.names().collect::<Vec<_>>(),
            offset = segment.offset,
            "Resolved property"
        );

        Some(ResolvedProperty {
            key,
            value,
            decorators,
            offset: segment.offset,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolve(key_part: &str) -> (String, Vec<&'static str>) {
        let (key, chain) = resolve_key(
            key_part,
            &DecoratorRegistry::with_builtins(),
            DefaultDecoration::Trim,
        );
        (key, chain.names().collect())
    }

    #[test]
    fn test_plain_key_gets_default_decoration() {
        assert_eq!(resolve("key"), ("key".to_string(), vec!["trim"]));

        let (key, chain) = resolve_key(
            " key ",
            &DecoratorRegistry::with_builtins(),
            DefaultDecoration::Verbatim,
        );
        assert_eq!(key, "key");
        assert_eq!(chain.names().collect::<Vec<_>>(), vec!["verbatim"]);
    }

    #[test]
    fn test_decorated_key() {
        assert_eq!(
            resolve("{key|uppercase|verbatim}"),
            ("key".to_string(), vec!["uppercase", "verbatim"])
        );
        assert_eq!(
            resolve("{ key | LowerCase | TRIM }"),
            ("key".to_string(), vec!["lowercase", "trim"])
        );
    }

    #[test]
    fn test_decorated_key_without_decorators_is_verbatim() {
        let (key, chain) = resolve_key(
            "{key}",
            &DecoratorRegistry::with_builtins(),
            DefaultDecoration::Trim,
        );
        assert_eq!(key, "key");
        assert!(chain.is_empty());
        assert_eq!(chain.apply(" v "), " v ");
    }

    #[test]
    fn test_unknown_decorator_is_skipped() {
        assert_eq!(
            resolve("{key|reverse|uppercase}"),
            ("key".to_string(), vec!["uppercase"])
        );
    }

    #[test]
    fn test_partially_braced_key_is_taken_verbatim() {
        assert_eq!(resolve("{key|trim"), ("{key|trim".to_string(), vec!["trim"]));
        assert_eq!(resolve("key|trim}"), ("key|trim}".to_string(), vec!["trim"]));
    }

    #[test]
    fn test_default_decoration_from_trim() {
        assert_eq!(DefaultDecoration::from_trim(true), DefaultDecoration::Trim);
        assert_eq!(
            DefaultDecoration::from_trim(false),
            DefaultDecoration::Verbatim
        );
    }

    #[test]
    fn test_parse_properties() {
        let properties = PropertiesParser::new("a= 1 , {b|verbatim}= 2 ,c").collect_properties();
        assert_eq!(properties.get("a").map(String::as_str), Some("1"));
        assert_eq!(properties.get("b").map(String::as_str), Some(" 2 "));
        assert_eq!(properties.get("c").map(String::as_str), Some(""));
    }

    #[test]
    fn test_duplicate_keys_overwrite() {
        let properties = PropertiesParser::new("a=1,b=2,a=3").collect_properties();
        assert_eq!(properties.get("a").map(String::as_str), Some("3"));
        assert_eq!(properties.keys().collect::<Vec<_>>(), vec!["a", "b"]);
    }

    #[test]
    fn test_parser_yields_resolved_properties() {
        let resolved: Vec<ResolvedProperty> = PropertiesParser::new("x=1, {y|uppercase}=b").collect();
        assert_eq!(resolved.len(), 2);
        assert_eq!(resolved[1].key, "y");
        assert_eq!(resolved[1].value, "B");
        assert_eq!(resolved[1].offset, 4);
        assert_eq!(resolved[1].decorators.names().collect::<Vec<_>>(), vec!["uppercase"]);
    }

    #[test]
    fn test_verbatim_config_keeps_whitespace() {
        let properties =
            PropertiesParser::with_config("a= 1 ", ParserConfig::new().with_default_trim(false))
                .collect_properties();
        assert_eq!(properties.get("a").map(String::as_str), Some(" 1 "));
    }

    #[test]
    fn test_converter_sees_decorated_value() {
        let converter = |value: &str, _: TargetKind| -> Result<String, ConversionError> {
            Ok(format!("<{}>", value))
        };
        let properties = PropertiesParser::new("{a|uppercase|trim}= x ")
            .collect_converted(&converter)
            .unwrap();
        assert_eq!(properties.get("a").map(String::as_str), Some("<X>"));
    }

    #[test]
    fn test_conversion_error_aborts() {
        let converter = |value: &str, target: TargetKind| -> Result<String, ConversionError> {
            if value == "bad" {
                Err(ConversionError::new(target, value, "rejected"))
            } else {
                Ok(value.to_string())
            }
        };
        let err = PropertiesParser::new("a=1, b=bad, c=3")
            .collect_converted(&converter)
            .unwrap_err();
        match err {
            PropertiesError::Conversion { key, offset, source } => {
                assert_eq!(key, "b");
                assert_eq!(offset, 4);
                assert_eq!(source.value, "bad");
            }
            other => panic!("Expected Conversion error, got {:?}", other),
        }
    }

    #[test]
    fn test_map_value_converter() {
        let mut converter = MapValueConverter::new();
        converter.insert("value", "converted");
        assert_eq!(
            converter.convert("value", TargetKind::String),
            Ok("converted".to_string())
        );
        assert_eq!(
            converter.convert("other", TargetKind::String),
            Ok("other".to_string())
        );
    }

    #[test]
    fn test_chained_value_converter() {
        let mut first = MapValueConverter::new();
        first.insert("a", "b");
        let mut second = MapValueConverter::new();
        second.insert("b", "c");

        let mut chained = ChainedValueConverter::new();
        chained.add_converter(Box::new(first));
        chained.add_converter(Box::new(second));
        assert_eq!(chained.convert("a", TargetKind::String), Ok("c".to_string()));
        assert_eq!(chained.convert("z", TargetKind::String), Ok("z".to_string()));
    }
}
