//! Typed configuration map used to construct scene objects.
//!
//! A [`PropertyList`] associates names with typed values. Objects read their
//! parameters through the typed getters, either requiring a value to be
//! present (`color`) or falling back to a default (`color_or`). A value that is
//! present but has another type is always an error.

use crate::{math::Vec3, Color3};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Errors raised while reading properties.
#[derive(Debug, thiserror::Error)]
pub enum PropertyError {
    /// The requested property does not exist and no default was given.
    #[error("Property \"{0}\" has not been specified")]
    NotFound(String),

    /// The property exists but holds a value of another type.
    #[error("Property \"{name}\" has type {actual}, expected {expected}")]
    TypeMismatch {
        /// Name of the property.
        name: String,
        /// Type requested by the caller.
        expected: &'static str,
        /// Type of the stored value.
        actual: &'static str,
    },

    /// Failed to read a property list from disk.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to parse a property list.
    #[error("Malformed property list: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// A single typed property value.
///
/// Serialized with lowercase external tags, so in YAML a color reads
/// `albedo: !color [0.5, 0.5, 0.5]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Property {
    /// Boolean value.
    Boolean(bool),
    /// Signed integer value.
    Integer(i32),
    /// Floating point value.
    Float(f32),
    /// String value.
    String(String),
    /// Linear RGB color.
    Color(Color3),
    /// Position in space.
    Point(Vec3),
    /// Direction or displacement.
    Vector(Vec3),
}

impl Property {
    /// Returns the name of the type of the stored value.
    pub const fn type_name(&self) -> &'static str {
        match self {
            Property::Boolean(_) => "boolean",
            Property::Integer(_) => "integer",
            Property::Float(_) => "float",
            Property::String(_) => "string",
            Property::Color(_) => "color",
            Property::Point(_) => "point",
            Property::Vector(_) => "vector",
        }
    }
}

/// Ordered collection of named properties.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PropertyList {
    props: BTreeMap<String, Property>,
}

impl PropertyList {
    /// Creates an empty property list.
    pub fn new() -> Self { Self::default() }

    /// Sets a property, replacing any previous value with the same name.
    pub fn set(&mut self, name: impl Into<String>, value: Property) {
        let name = name.into();
        if self.props.contains_key(&name) {
            log::warn!("Property \"{}\" was specified multiple times!", name);
        }
        self.props.insert(name, value);
    }

    /// Returns the raw property with the given name.
    pub fn get(&self, name: &str) -> Option<&Property> { self.props.get(name) }

    /// Returns whether a property with the given name exists.
    pub fn contains(&self, name: &str) -> bool { self.props.contains_key(name) }

    /// Returns the number of properties.
    pub fn len(&self) -> usize { self.props.len() }

    /// Returns whether the list holds no property.
    pub fn is_empty(&self) -> bool { self.props.is_empty() }

    /// Iterates over the properties in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Property)> {
        self.props.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Parses a property list from a YAML document.
    pub fn from_yaml_str(s: &str) -> Result<Self, PropertyError> {
        Ok(serde_yaml::from_str(s)?)
    }

    /// Loads a property list from a YAML file.
    pub fn load_yaml(path: impl AsRef<std::path::Path>) -> Result<Self, PropertyError> {
        let path = path.as_ref();
        log::debug!("Loading property list from {}", path.display());
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }
}

macro_rules! impl_typed_accessors {
    ($($variant:ident($ty:ty) as $kind:literal => $get:ident, $get_or:ident, $set:ident;)*) => {
        impl PropertyList {
            $(
                #[doc = concat!("Returns the ", $kind, " property with the given name.")]
                pub fn $get(&self, name: &str) -> Result<$ty, PropertyError> {
                    match self.props.get(name) {
                        Some(Property::$variant(value)) => Ok(value.clone()),
                        Some(other) => Err(PropertyError::TypeMismatch {
                            name: name.to_owned(),
                            expected: $kind,
                            actual: other.type_name(),
                        }),
                        None => Err(PropertyError::NotFound(name.to_owned())),
                    }
                }

                #[doc = concat!(
                    "Returns the ", $kind, " property with the given name, or `default` if absent."
                )]
                pub fn $get_or(&self, name: &str, default: $ty) -> Result<$ty, PropertyError> {
                    match self.$get(name) {
                        Err(PropertyError::NotFound(_)) => Ok(default),
                        other => other,
                    }
                }

                #[doc = concat!("Sets a ", $kind, " property.")]
                pub fn $set(&mut self, name: impl Into<String>, value: $ty) {
                    self.set(name, Property::$variant(value));
                }
            )*
        }
    };
}

impl_typed_accessors! {
    Boolean(bool) as "boolean" => boolean, boolean_or, set_boolean;
    Integer(i32) as "integer" => integer, integer_or, set_integer;
    Float(f32) as "float" => float, float_or, set_float;
    String(String) as "string" => string, string_or, set_string;
    Color(Color3) as "color" => color, color_or, set_color;
    Point(Vec3) as "point" => point, point_or, set_point;
    Vector(Vec3) as "vector" => vector, vector_or, set_vector;
}
