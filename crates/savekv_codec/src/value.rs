//! Tagged value type held by a [`Store`](crate::Store).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Tag written in place of a kind name for values that could not be encoded.
///
/// [`Value`] is a closed enum so the encoders in this crate never emit it,
/// but payloads produced by other writers may contain it.
pub const UNKNOWN_TAG: &str = "unknown";

const AXES: [&str; 3] = ["x", "y", "z"];

/// A two-component float vector.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vector2 {
    /// X component.
    pub x: f32,
    /// Y component.
    pub y: f32,
}

impl Vector2 {
    /// The zero vector.
    pub const ZERO: Self = Self::new(0.0, 0.0);

    /// Creates a vector from its components.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl From<[f32; 2]> for Vector2 {
    fn from([x, y]: [f32; 2]) -> Self {
        Self::new(x, y)
    }
}

impl From<(f32, f32)> for Vector2 {
    fn from((x, y): (f32, f32)) -> Self {
        Self::new(x, y)
    }
}

/// A three-component float vector.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vector3 {
    /// X component.
    pub x: f32,
    /// Y component.
    pub y: f32,
    /// Z component.
    pub z: f32,
}

impl Vector3 {
    /// The zero vector.
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);

    /// Creates a vector from its components.
    #[must_use]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

impl From<[f32; 3]> for Vector3 {
    fn from([x, y, z]: [f32; 3]) -> Self {
        Self::new(x, y, z)
    }
}

impl From<(f32, f32, f32)> for Vector3 {
    fn from((x, y, z): (f32, f32, f32)) -> Self {
        Self::new(x, y, z)
    }
}

/// The six kinds a [`Value`] can take.
///
/// Each kind has a lowercase tag that is written as the first column of
/// every persisted row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    /// `bool`
    Bool,
    /// `int`
    Int,
    /// `float`
    Float,
    /// `string`
    String,
    /// `vector2`
    Vector2,
    /// `vector3`
    Vector3,
}

impl ValueKind {
    /// Every kind, in tag order.
    pub const ALL: [ValueKind; 6] = [
        ValueKind::Bool,
        ValueKind::Int,
        ValueKind::Float,
        ValueKind::String,
        ValueKind::Vector2,
        ValueKind::Vector3,
    ];

    /// Returns the persisted tag for this kind.
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            ValueKind::Bool => "bool",
            ValueKind::Int => "int",
            ValueKind::Float => "float",
            ValueKind::String => "string",
            ValueKind::Vector2 => "vector2",
            ValueKind::Vector3 => "vector3",
        }
    }

    /// Looks up a kind by its tag. Matching is case-sensitive.
    #[must_use]
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.tag() == tag)
    }

    /// Parses the formatted text of a field into a value of this kind.
    ///
    /// This is the inverse of [`Value`]'s `Display` rendering:
    /// - `bool` accepts exactly `true` or `false`
    /// - `int` is a base-10 signed 32-bit integer
    /// - `float` is a decimal 32-bit float
    /// - `string` is taken verbatim
    /// - `vector2`/`vector3` are comma-separated floats, each trimmed
    ///
    /// # Errors
    ///
    /// Returns [`ParseValueError`] if the text is not valid for this kind.
    pub fn parse(self, raw: &str) -> Result<Value, ParseValueError> {
        let fail = |reason: String| ParseValueError {
            kind: self,
            raw: raw.to_string(),
            reason,
        };

        match self {
            ValueKind::Bool => match raw {
                "true" => Ok(Value::Bool(true)),
                "false" => Ok(Value::Bool(false)),
                _ => Err(fail("expected `true` or `false`".to_string())),
            },
            ValueKind::Int => raw
                .parse()
                .map(Value::Int)
                .map_err(|_| fail("not a base-10 32-bit integer".to_string())),
            ValueKind::Float => raw
                .parse()
                .map(Value::Float)
                .map_err(|_| fail("not a decimal float".to_string())),
            ValueKind::String => Ok(Value::String(raw.to_string())),
            ValueKind::Vector2 => parse_components::<2>(raw)
                .map(|c| Value::Vector2(c.into()))
                .map_err(fail),
            ValueKind::Vector3 => parse_components::<3>(raw)
                .map(|c| Value::Vector3(c.into()))
                .map_err(fail),
        }
    }
}

fn parse_components<const N: usize>(raw: &str) -> Result<[f32; N], String> {
    let parts: Vec<&str> = raw.split(',').collect();
    if parts.len() != N {
        return Err(format!(
            "expected {N} comma-separated components, found {}",
            parts.len()
        ));
    }

    let mut components = [0.0f32; N];
    for (axis, (slot, part)) in components.iter_mut().zip(&parts).enumerate() {
        *slot = part
            .trim()
            .parse()
            .map_err(|_| format!("component {} is not a float", AXES[axis]))?;
    }
    Ok(components)
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for ValueKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_tag(s).ok_or_else(|| format!("unknown value kind: {s}"))
    }
}

/// Failure to parse a field's text as a particular kind.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid {kind} value {raw:?}: {reason}")]
pub struct ParseValueError {
    /// The kind the text was parsed as.
    pub kind: ValueKind,
    /// The offending text.
    pub raw: String,
    /// What was wrong with it.
    pub reason: String,
}

/// A stored value.
///
/// Rendering with `Display` produces the canonical field text written by
/// both codecs: booleans as `true`/`false`, numbers in shortest round-trip
/// decimal form, vectors as comma-joined components with no brackets, and
/// strings verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum Value {
    /// Boolean value.
    Bool(bool),
    /// Signed 32-bit integer.
    Int(i32),
    /// 32-bit float.
    Float(f32),
    /// UTF-8 text.
    String(String),
    /// Two-component float vector.
    Vector2(Vector2),
    /// Three-component float vector.
    Vector3(Vector3),
}

impl Value {
    /// Returns the kind of this value.
    #[must_use]
    pub const fn kind(&self) -> ValueKind {
        match self {
            Value::Bool(_) => ValueKind::Bool,
            Value::Int(_) => ValueKind::Int,
            Value::Float(_) => ValueKind::Float,
            Value::String(_) => ValueKind::String,
            Value::Vector2(_) => ValueKind::Vector2,
            Value::Vector3(_) => ValueKind::Vector3,
        }
    }

    /// Returns the persisted tag of this value's kind.
    #[must_use]
    pub const fn tag(&self) -> &'static str {
        self.kind().tag()
    }

    /// Get this value as a boolean, if it is one.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Get this value as an integer, if it is one.
    pub fn as_int(&self) -> Option<i32> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Get this value as a float, if it is one.
    pub fn as_float(&self) -> Option<f32> {
        match self {
            Value::Float(n) => Some(*n),
            _ => None,
        }
    }

    /// Get this value as a string slice, if it is text.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Get this value as a 2-vector, if it is one.
    pub fn as_vector2(&self) -> Option<Vector2> {
        match self {
            Value::Vector2(v) => Some(*v),
            _ => None,
        }
    }

    /// Get this value as a 3-vector, if it is one.
    pub fn as_vector3(&self) -> Option<Vector3> {
        match self {
            Value::Vector3(v) => Some(*v),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(n) => write!(f, "{n}"),
            Value::Float(n) => write!(f, "{n}"),
            Value::String(s) => f.write_str(s),
            Value::Vector2(v) => write!(f, "{},{}", v.x, v.y),
            Value::Vector3(v) => write!(f, "{},{},{}", v.x, v.y, v.z),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Int(n)
    }
}

impl From<f32> for Value {
    fn from(n: f32) -> Self {
        Value::Float(n)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<Vector2> for Value {
    fn from(v: Vector2) -> Self {
        Value::Vector2(v)
    }
}

impl From<Vector3> for Value {
    fn from(v: Vector3) -> Self {
        Value::Vector3(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_are_lowercase_kind_names() {
        let tags: Vec<&str> = ValueKind::ALL.iter().map(|k| k.tag()).collect();
        assert_eq!(
            tags,
            vec!["bool", "int", "float", "string", "vector2", "vector3"]
        );
        for kind in ValueKind::ALL {
            assert_eq!(ValueKind::from_tag(kind.tag()), Some(kind));
        }
    }

    #[test]
    fn tag_lookup_is_case_sensitive() {
        assert_eq!(ValueKind::from_tag("Bool"), None);
        assert_eq!(ValueKind::from_tag("unknown"), None);
        assert_eq!(ValueKind::from_tag(""), None);
    }

    #[test]
    fn formatting_matches_field_text() {
        assert_eq!(Value::Bool(true).to_string(), "true");
        assert_eq!(Value::Bool(false).to_string(), "false");
        assert_eq!(Value::Int(-42).to_string(), "-42");
        assert_eq!(Value::Float(0.75).to_string(), "0.75");
        assert_eq!(Value::Float(3.0).to_string(), "3");
        assert_eq!(Value::from(Vector2::new(1.0, -2.5)).to_string(), "1,-2.5");
        assert_eq!(
            Value::from(Vector3::new(0.5, 0.0, 10.25)).to_string(),
            "0.5,0,10.25"
        );
        assert_eq!(Value::from("a b").to_string(), "a b");
    }

    #[test]
    fn parse_bool_is_exact() {
        assert_eq!(ValueKind::Bool.parse("true"), Ok(Value::Bool(true)));
        assert_eq!(ValueKind::Bool.parse("false"), Ok(Value::Bool(false)));
        assert!(ValueKind::Bool.parse("True").is_err());
        assert!(ValueKind::Bool.parse("notabool").is_err());
    }

    #[test]
    fn parse_numbers() {
        assert_eq!(ValueKind::Int.parse("-17"), Ok(Value::Int(-17)));
        assert!(ValueKind::Int.parse("1.5").is_err());
        assert!(ValueKind::Int.parse("99999999999").is_err());
        assert_eq!(ValueKind::Float.parse("0.75"), Ok(Value::Float(0.75)));
        assert_eq!(ValueKind::Float.parse("2"), Ok(Value::Float(2.0)));
        assert!(ValueKind::Float.parse("abc").is_err());
    }

    #[test]
    fn parse_vectors_trim_components() {
        assert_eq!(
            ValueKind::Vector2.parse(" 1.0 , -2.5"),
            Ok(Value::Vector2(Vector2::new(1.0, -2.5)))
        );
        assert_eq!(
            ValueKind::Vector3.parse("1,2,3"),
            Ok(Value::Vector3(Vector3::new(1.0, 2.0, 3.0)))
        );
    }

    #[test]
    fn parse_vectors_reject_wrong_arity() {
        let err = ValueKind::Vector2.parse("1.0").unwrap_err();
        assert_eq!(err.kind, ValueKind::Vector2);
        assert!(err.reason.contains("found 1"));

        assert!(ValueKind::Vector2.parse("1,2,3").is_err());
        assert!(ValueKind::Vector3.parse("1,2").is_err());
    }

    #[test]
    fn parse_vectors_name_bad_component() {
        let err = ValueKind::Vector3.parse("1,2,zed").unwrap_err();
        assert!(err.reason.contains("component z"));
    }

    #[test]
    fn parse_string_is_verbatim() {
        assert_eq!(
            ValueKind::String.parse("  keep, spaces "),
            Ok(Value::String("  keep, spaces ".to_string()))
        );
    }

    #[test]
    fn value_accessors() {
        assert_eq!(Value::Bool(true).as_bool(), Some(true));
        assert_eq!(Value::Int(42).as_bool(), None);
        assert_eq!(Value::Int(42).as_int(), Some(42));
        assert_eq!(Value::Float(1.5).as_float(), Some(1.5));
        assert_eq!(Value::from("hi").as_str(), Some("hi"));
        assert_eq!(
            Value::from(Vector2::ZERO).as_vector2(),
            Some(Vector2::ZERO)
        );
        assert_eq!(Value::from(Vector2::ZERO).as_vector3(), None);
    }
}
