//! Per-parser configuration: features and pass-through properties.
//!
//! Each [`PullParser`](crate::PullParser) owns its own `ParserConfig`; nothing
//! is shared between parser instances. Features are the XmlPull boolean
//! switches, recognized only through [`FEATURES`]. Properties are arbitrary
//! keys; the ones in [`keys`] are read by the underlying stream reader when
//! input is bound, everything else is stored untouched.

use std::collections::HashMap;

use phf::phf_map;

use crate::error::{Error, Result};

/// XmlPull feature: report namespace URIs and hide `xmlns` attributes.
pub const PROCESS_NAMESPACES: &str = "http://xmlpull.org/v1/doc/features.html#process-namespaces";

/// Property keys understood by the stream reader.
pub mod keys {
    /// Resolve prefixes to namespace URIs (default `true`).
    pub const NAMESPACE_AWARE: &str = "xmlpull.stream.namespace-aware";
    /// Merge adjacent text and CDATA into one CHARACTERS event (default `true`).
    pub const COALESCING: &str = "xmlpull.stream.coalescing";
    /// Reject end tags that do not match their start tag (default `true`).
    pub const CHECK_END_NAMES: &str = "xmlpull.stream.check-end-names";
    /// Reject comments containing `--` (default `false`).
    pub const CHECK_COMMENTS: &str = "xmlpull.stream.check-comments";
}

/// Feature identifier -> stream reader property key.
pub static FEATURES: phf::Map<&'static str, &'static str> = phf_map! {
    "http://xmlpull.org/v1/doc/features.html#process-namespaces" => keys::NAMESPACE_AWARE,
};

/// Property value.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    Bool(bool),
    Integer(i64),
    String(String),
}

impl PropertyValue {
    /// Try to get as boolean.
    #[inline]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            PropertyValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Try to get as integer.
    #[inline]
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            PropertyValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Try to get as string.
    #[inline]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropertyValue::String(s) => Some(s),
            _ => None,
        }
    }
}

impl From<bool> for PropertyValue {
    fn from(value: bool) -> Self {
        PropertyValue::Bool(value)
    }
}

impl From<i64> for PropertyValue {
    fn from(value: i64) -> Self {
        PropertyValue::Integer(value)
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        PropertyValue::String(value.to_owned())
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        PropertyValue::String(value)
    }
}

/// Property store for one parser.
#[derive(Debug, Clone, PartialEq)]
pub struct ParserConfig {
    properties: HashMap<String, PropertyValue>,
}

impl ParserConfig {
    /// Create a configuration with the reader defaults.
    pub fn new() -> Self {
        let mut properties = HashMap::new();
        properties.insert(keys::NAMESPACE_AWARE.to_owned(), PropertyValue::Bool(true));
        properties.insert(keys::COALESCING.to_owned(), PropertyValue::Bool(true));
        properties.insert(keys::CHECK_END_NAMES.to_owned(), PropertyValue::Bool(true));
        properties.insert(keys::CHECK_COMMENTS.to_owned(), PropertyValue::Bool(false));
        Self { properties }
    }

    /// Builder form of [`set`](Self::set).
    pub fn with(mut self, key: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        self.set(key, value);
        self
    }

    /// Store a property. No validation: unknown keys are kept as given.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<PropertyValue>) {
        self.properties.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&PropertyValue> {
        self.properties.get(key)
    }

    /// Boolean property, `false` when absent or not a boolean.
    pub fn flag(&self, key: &str) -> bool {
        self.get(key).and_then(PropertyValue::as_bool).unwrap_or(false)
    }

    /// Enable or disable a recognized feature.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] if `id` is not in [`FEATURES`].
    pub fn set_feature(&mut self, id: &str, enabled: bool) -> Result<()> {
        let key = FEATURES
            .get(id)
            .ok_or_else(|| Error::Configuration(format!("unrecognized feature: {id}")))?;
        self.set(*key, enabled);
        Ok(())
    }

    /// Current value of a feature; `false` for unknown features and non-boolean values.
    pub fn feature(&self, id: &str) -> bool {
        FEATURES.get(id).is_some_and(|key| self.flag(key))
    }

    pub fn namespace_aware(&self) -> bool {
        self.flag(keys::NAMESPACE_AWARE)
    }

    pub fn coalescing(&self) -> bool {
        self.flag(keys::COALESCING)
    }
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self::new()
    }
}
