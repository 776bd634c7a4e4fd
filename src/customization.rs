//! Customization

use std::{
    collections::{BTreeMap, btree_map},
    fmt::{Display, Formatter, Result as FmtResult},
};

use serde::{Deserialize, Serialize};

/// A customization option name.
///
/// The storefront exposes colour, finish and size. Any other name is kept
/// verbatim so that it still distinguishes one cart line from another.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CustomizationOption {
    /// `color`
    Color,

    /// `finish`
    Finish,

    /// `size`
    Size,

    /// Any option name the storefront does not know about.
    Other(String),
}

impl CustomizationOption {
    /// The option name as it appears on the wire.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Color => "color",
            Self::Finish => "finish",
            Self::Size => "size",
            Self::Other(name) => name,
        }
    }
}

impl From<&str> for CustomizationOption {
    fn from(value: &str) -> Self {
        match value {
            "color" => Self::Color,
            "finish" => Self::Finish,
            "size" => Self::Size,
            other => Self::Other(other.to_string()),
        }
    }
}

impl From<String> for CustomizationOption {
    fn from(value: String) -> Self {
        match value.as_str() {
            "color" => Self::Color,
            "finish" => Self::Finish,
            "size" => Self::Size,
            _ => Self::Other(value),
        }
    }
}

impl From<CustomizationOption> for String {
    fn from(value: CustomizationOption) -> Self {
        match value {
            CustomizationOption::Other(name) => name,
            known => known.as_str().to_string(),
        }
    }
}

impl Display for CustomizationOption {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

/// The customization choices attached to a cart line or order item.
///
/// Backed by an ordered map, so two customizations built in a different order
/// compare equal and serialise identically.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Customization(BTreeMap<CustomizationOption, String>);

impl Customization {
    /// An empty customization.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    #[must_use]
    pub fn with(mut self, option: impl Into<CustomizationOption>, value: impl Into<String>) -> Self {
        self.insert(option, value);
        self
    }

    /// Set an option, returning the previous value if there was one.
    pub fn insert(
        &mut self,
        option: impl Into<CustomizationOption>,
        value: impl Into<String>,
    ) -> Option<String> {
        self.0.insert(option.into(), value.into())
    }

    /// Look up an option.
    pub fn get(&self, option: &CustomizationOption) -> Option<&str> {
        self.0.get(option).map(String::as_str)
    }

    /// Iterate options in canonical order.
    pub fn iter(&self) -> btree_map::Iter<'_, CustomizationOption, String> {
        self.0.iter()
    }

    /// Number of options set.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when no options are set.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for Customization
where
    K: Into<CustomizationOption>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(option, value)| (option.into(), value.into()))
                .collect(),
        )
    }
}

impl<'a> IntoIterator for &'a Customization {
    type Item = (&'a CustomizationOption, &'a String);
    type IntoIter = btree_map::Iter<'a, CustomizationOption, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
