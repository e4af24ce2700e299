//! Discover the root element name a type deserializes from.
//!
//! The XML codec names the root element after the serde name of the type
//! (the struct name, or the `rename` given to it). The name is not available
//! through the `Deserialize` trait, but the derived implementation passes it to
//! the deserializer, so a deserializer that stops at the first call reveals it.

use serde::de::{self, Deserialize, Deserializer, Visitor};

/// The root element names a type accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RootName<'a> {
    /// A single name, from the configuration or a struct's serde name.
    Named(&'a str),
    /// An externally tagged enum: the root element is named after the variant.
    Variants(&'static [&'static str]),
}

impl RootName<'_> {
    /// Check whether an element with `local_name` can hold the type.
    pub fn accepts(&self, local_name: &str) -> bool {
        match self {
            RootName::Named(name) => *name == local_name,
            RootName::Variants(variants) => variants.iter().any(|variant| *variant == local_name),
        }
    }
}

impl core::fmt::Display for RootName<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            RootName::Named(name) => write!(f, "<{name}>"),
            RootName::Variants(variants) => write!(f, "one of {variants:?}"),
        }
    }
}

/// Determine the root element name of `Value`, if it has one.
///
/// Options and boxes are looked through. Types that deserialize without a name,
/// like primitives, sequences, maps and internally tagged enums, return `None`.
pub fn probe<'de, Value: Deserialize<'de>>() -> Option<RootName<'static>> {
    match Value::deserialize(Probe) {
        Err(Found::Struct(name)) => Some(RootName::Named(name)),
        Err(Found::Enum(variants)) => Some(RootName::Variants(variants)),
        Err(Found::Nothing) | Ok(_) => None,
    }
}

/// The last path segment of the Rust type name, without generic arguments.
///
/// This is what serde names a struct unless it is renamed.
pub fn short_type_name(type_name: &'static str) -> &'static str {
    let without_generics = type_name.split('<').next().unwrap_or(type_name);
    without_generics.rsplit("::").next().unwrap_or(without_generics)
}

//------------------------------------------------------------------------------
// Probe deserializer
//------------------------------------------------------------------------------

struct Probe;

#[derive(Debug)]
enum Found {
    Struct(&'static str),
    Enum(&'static [&'static str]),
    Nothing,
}

impl core::fmt::Display for Found {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{self:?}")
    }
}

impl core::error::Error for Found {}

impl de::Error for Found {
    fn custom<T: core::fmt::Display>(_msg: T) -> Self {
        Found::Nothing
    }
}

impl<'de> Deserializer<'de> for Probe {
    type Error = Found;

    fn deserialize_any<V: Visitor<'de>>(self, _visitor: V) -> Result<V::Value, Found> {
        Err(Found::Nothing)
    }

    fn deserialize_option<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Found> {
        visitor.visit_some(self)
    }

    fn deserialize_unit_struct<V: Visitor<'de>>(self, name: &'static str, _visitor: V) -> Result<V::Value, Found> {
        Err(Found::Struct(name))
    }

    fn deserialize_newtype_struct<V: Visitor<'de>>(self, name: &'static str, _visitor: V) -> Result<V::Value, Found> {
        Err(Found::Struct(name))
    }

    fn deserialize_tuple_struct<V: Visitor<'de>>(
        self,
        name: &'static str,
        _len: usize,
        _visitor: V,
    ) -> Result<V::Value, Found> {
        Err(Found::Struct(name))
    }

    fn deserialize_struct<V: Visitor<'de>>(
        self,
        name: &'static str,
        _fields: &'static [&'static str],
        _visitor: V,
    ) -> Result<V::Value, Found> {
        Err(Found::Struct(name))
    }

    fn deserialize_enum<V: Visitor<'de>>(
        self,
        _name: &'static str,
        variants: &'static [&'static str],
        _visitor: V,
    ) -> Result<V::Value, Found> {
        Err(Found::Enum(variants))
    }

    serde::forward_to_deserialize_any! {
        bool i8 i16 i32 i64 i128 u8 u16 u32 u64 u128 f32 f64 char str string
        bytes byte_buf unit seq tuple map identifier ignored_any
    }
}
