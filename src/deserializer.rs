//! Serde deserializers over resolved property values
//!
//! Property values are always strings. These deserializers parse them on
//! demand into whatever the target type asks for, so a struct can declare
//! `rows: usize` or `enabled: bool` and read them straight out of a
//! [`TableProperties`](crate::properties::TableProperties).

use crate::error::PropertiesError;
use indexmap::IndexMap;
use serde::de::value::BorrowedStrDeserializer;
use serde::de::{self, DeserializeSeed, Visitor};
use std::fmt::Display;
use std::str::FromStr;

/// Deserializer for a single property value
pub struct ValueDeserializer<'de> {
    key: &'de str,
    value: &'de str,
}

impl<'de> ValueDeserializer<'de> {
    pub fn new(key: &'de str, value: &'de str) -> Self {
        Self { key, value }
    }

    fn invalid(&self, expected: &str) -> PropertiesError {
        PropertiesError::Deserialize(format!(
            "invalid value '{}' for property '{}', expected {}",
            self.value, self.key, expected
        ))
    }

    fn parse<T>(&self, expected: &str) -> Result<T, PropertiesError>
    where
        T: FromStr,
        T::Err: Display,
    {
        self.value
            .trim()
            .parse()
            .map_err(|_| self.invalid(expected))
    }
}

macro_rules! deserialize_parsed {
    ($($method:ident => $visit:ident($expected:literal)),* $(,)?) => {
        $(
            fn $method<V>(self, visitor: V) -> Result<V::Value, Self::Error>
            where
                V: Visitor<'de>,
            {
                visitor.$visit(self.parse($expected)?)
            }
        )*
    };
}

impl<'de> de::Deserializer<'de> for ValueDeserializer<'de> {
    type Error = PropertiesError;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        visitor.visit_borrowed_str(self.value)
    }

    fn deserialize_bool<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        let value = self.value.trim();
        if value.eq_ignore_ascii_case("true") {
            visitor.visit_bool(true)
        } else if value.eq_ignore_ascii_case("false") {
            visitor.visit_bool(false)
        } else {
            Err(self.invalid("a boolean"))
        }
    }

    deserialize_parsed! {
        deserialize_i8 => visit_i8("an integer"),
        deserialize_i16 => visit_i16("an integer"),
        deserialize_i32 => visit_i32("an integer"),
        deserialize_i64 => visit_i64("an integer"),
        deserialize_i128 => visit_i128("an integer"),
        deserialize_u8 => visit_u8("an unsigned integer"),
        deserialize_u16 => visit_u16("an unsigned integer"),
        deserialize_u32 => visit_u32("an unsigned integer"),
        deserialize_u64 => visit_u64("an unsigned integer"),
        deserialize_u128 => visit_u128("an unsigned integer"),
        deserialize_f32 => visit_f32("a number"),
        deserialize_f64 => visit_f64("a number"),
    }

    fn deserialize_char<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        let mut chars = self.value.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => visitor.visit_char(c),
            _ => Err(self.invalid("a single character")),
        }
    }

    fn deserialize_option<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        if self.value.is_empty() {
            visitor.visit_none()
        } else {
            visitor.visit_some(self)
        }
    }

    fn deserialize_unit<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        if self.value.is_empty() {
            visitor.visit_unit()
        } else {
            Err(self.invalid("an empty value"))
        }
    }

    fn deserialize_unit_struct<V>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        self.deserialize_unit(visitor)
    }

    fn deserialize_newtype_struct<V>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_enum<V>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        // only unit variants can be spelled as a plain value
        visitor.visit_enum(BorrowedStrDeserializer::<PropertiesError>::new(
            self.value.trim(),
        ))
    }

    serde::forward_to_deserialize_any! {
        str string bytes byte_buf seq tuple tuple_struct map struct
        identifier ignored_any
    }
}

/// Map deserializer over all resolved properties
pub struct PropertiesDeserializer<'de> {
    entries: indexmap::map::Iter<'de, String, String>,
    current: Option<(&'de str, &'de str)>,
}

impl<'de> PropertiesDeserializer<'de> {
    pub fn new(properties: &'de IndexMap<String, String>) -> Self {
        Self {
            entries: properties.iter(),
            current: None,
        }
    }
}

impl<'de> de::Deserializer<'de> for PropertiesDeserializer<'de> {
    type Error = PropertiesError;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        visitor.visit_map(self)
    }

    serde::forward_to_deserialize_any! {
        bool i8 i16 i32 i64 i128 u8 u16 u32 u64 u128 f32 f64 char str string
        bytes byte_buf option unit unit_struct newtype_struct seq tuple
        tuple_struct map struct enum identifier ignored_any
    }
}

impl<'de> de::MapAccess<'de> for PropertiesDeserializer<'de> {
    type Error = PropertiesError;

    fn next_key_seed<K>(&mut self, seed: K) -> Result<Option<K::Value>, Self::Error>
    where
        K: DeserializeSeed<'de>,
    {
        match self.entries.next() {
            Some((key, value)) => {
                self.current = Some((key.as_str(), value.as_str()));
                seed.deserialize(BorrowedStrDeserializer::<PropertiesError>::new(key.as_str()))
                    .map(Some)
            }
            None => Ok(None),
        }
    }

    fn next_value_seed<V>(&mut self, seed: V) -> Result<V::Value, Self::Error>
    where
        V: DeserializeSeed<'de>,
    {
        match self.current.take() {
            Some((key, value)) => seed.deserialize(ValueDeserializer::new(key, value)),
            None => Err(PropertiesError::Deserialize(
                "No value available for map entry".to_string(),
            )),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.entries.len())
    }
}
