use std::fmt;

use indexmap::IndexMap;

/// Payload-free discriminant of a [`Value`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
	/// Explicit null.
	Null,
	/// Boolean scalar.
	Bool,
	/// Signed 64-bit integer scalar.
	Int,
	/// 64-bit float scalar.
	Float,
	/// UTF-8 string scalar.
	Text,
	/// Ordered sequence.
	Array,
	/// Keyed mapping.
	Object,
}

impl ValueKind {
	/// Lowercase name used in diagnostics and CLI output.
	pub fn name(self) -> &'static str {
		match self {
			Self::Null => "null",
			Self::Bool => "bool",
			Self::Int => "int",
			Self::Float => "float",
			Self::Text => "string",
			Self::Array => "array",
			Self::Object => "object",
		}
	}
}

impl fmt::Display for ValueKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.name())
	}
}

/// Semi-structured value tree node.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
	/// Explicit null marker.
	#[default]
	Null,
	/// Boolean scalar.
	Bool(bool),
	/// Signed integer scalar.
	Int(i64),
	/// Floating point scalar.
	Float(f64),
	/// UTF-8 string.
	Text(Box<str>),
	/// Heterogeneous sequence.
	Array(Vec<Value>),
	/// Key/value mapping with unique keys.
	Object(ObjectValue),
}

impl Value {
	/// Build a text node.
	pub fn text(text: impl Into<Box<str>>) -> Self {
		Self::Text(text.into())
	}

	/// Build an object node from key/value pairs; later duplicates replace earlier ones.
	pub fn object<K: Into<Box<str>>>(entries: impl IntoIterator<Item = (K, Value)>) -> Self {
		Self::Object(entries.into_iter().collect())
	}

	/// Build an array node.
	pub fn array(items: impl IntoIterator<Item = Value>) -> Self {
		Self::Array(items.into_iter().collect())
	}

	/// Active variant.
	pub fn kind(&self) -> ValueKind {
		match self {
			Self::Null => ValueKind::Null,
			Self::Bool(_) => ValueKind::Bool,
			Self::Int(_) => ValueKind::Int,
			Self::Float(_) => ValueKind::Float,
			Self::Text(_) => ValueKind::Text,
			Self::Array(_) => ValueKind::Array,
			Self::Object(_) => ValueKind::Object,
		}
	}

	/// True only for [`Value::Null`].
	pub fn is_null(&self) -> bool {
		matches!(self, Self::Null)
	}

	/// Boolean payload, if this is a bool.
	pub fn as_bool(&self) -> Option<bool> {
		match self {
			Self::Bool(value) => Some(*value),
			_ => None,
		}
	}

	/// Integer payload, if this is an int.
	pub fn as_i64(&self) -> Option<i64> {
		match self {
			Self::Int(value) => Some(*value),
			_ => None,
		}
	}

	/// Float payload, if this is a float.
	pub fn as_f64(&self) -> Option<f64> {
		match self {
			Self::Float(value) => Some(*value),
			_ => None,
		}
	}

	/// String payload, if this is text.
	pub fn as_str(&self) -> Option<&str> {
		match self {
			Self::Text(value) => Some(value),
			_ => None,
		}
	}

	/// Elements, if this is an array.
	pub fn as_array(&self) -> Option<&[Value]> {
		match self {
			Self::Array(items) => Some(items),
			_ => None,
		}
	}

	/// Mapping, if this is an object.
	pub fn as_object(&self) -> Option<&ObjectValue> {
		match self {
			Self::Object(object) => Some(object),
			_ => None,
		}
	}
}

impl From<bool> for Value {
	fn from(value: bool) -> Self {
		Self::Bool(value)
	}
}

impl From<i64> for Value {
	fn from(value: i64) -> Self {
		Self::Int(value)
	}
}

impl From<i32> for Value {
	fn from(value: i32) -> Self {
		Self::Int(i64::from(value))
	}
}

impl From<f64> for Value {
	fn from(value: f64) -> Self {
		Self::Float(value)
	}
}

impl From<&str> for Value {
	fn from(value: &str) -> Self {
		Self::Text(value.into())
	}
}

impl From<String> for Value {
	fn from(value: String) -> Self {
		Self::Text(value.into_boxed_str())
	}
}

impl From<Vec<Value>> for Value {
	fn from(items: Vec<Value>) -> Self {
		Self::Array(items)
	}
}

impl From<ObjectValue> for Value {
	fn from(object: ObjectValue) -> Self {
		Self::Object(object)
	}
}

/// One key/value pair of an [`ObjectValue`].
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
	/// Member key.
	pub key: Box<str>,
	/// Member payload.
	pub value: Value,
}

/// Insertion-ordered mapping with unique keys.
///
/// Equality ignores order: two objects are equal when they hold the same keys
/// with equal values.
#[derive(Debug, Clone, Default)]
pub struct ObjectValue {
	entries: IndexMap<Box<str>, Value>,
}

impl ObjectValue {
	/// Empty object.
	pub fn new() -> Self {
		Self::default()
	}

	/// Empty object with room for `capacity` entries.
	pub fn with_capacity(capacity: usize) -> Self {
		Self {
			entries: IndexMap::with_capacity(capacity),
		}
	}

	/// Number of entries.
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	/// True when the object has no entries.
	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// Member value for `key`.
	pub fn get(&self, key: &str) -> Option<&Value> {
		self.entries.get(key)
	}

	/// True when `key` is present.
	pub fn contains_key(&self, key: &str) -> bool {
		self.entries.contains_key(key)
	}

	/// Insert or replace `key`, keeping the original position on replace.
	pub fn insert(&mut self, key: impl Into<Box<str>>, value: Value) -> Option<Value> {
		self.entries.insert(key.into(), value)
	}

	/// Keys in insertion order.
	pub fn keys(&self) -> impl Iterator<Item = &str> {
		self.entries.keys().map(|key| &**key)
	}

	/// Key/value pairs in insertion order.
	pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
		self.entries.iter().map(|(key, value)| (&**key, value))
	}

	/// Consume into entries in insertion order.
	pub fn into_entries(self) -> Vec<Entry> {
		self.entries.into_iter().map(|(key, value)| Entry { key, value }).collect()
	}
}

impl PartialEq for ObjectValue {
	fn eq(&self, other: &Self) -> bool {
		self.len() == other.len() && self.iter().all(|(key, value)| other.get(key) == Some(value))
	}
}

impl<K: Into<Box<str>>> FromIterator<(K, Value)> for ObjectValue {
	fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
		let mut object = Self::new();
		for (key, value) in iter {
			object.insert(key, value);
		}
		object
	}
}

#[cfg(test)]
mod tests {
	use super::{ObjectValue, Value, ValueKind};

	#[test]
	fn insert_replaces_in_place() {
		let mut object = ObjectValue::new();
		object.insert("a", Value::Int(1));
		object.insert("b", Value::Int(2));
		let previous = object.insert("a", Value::Int(3));

		assert_eq!(previous, Some(Value::Int(1)));
		assert_eq!(object.keys().collect::<Vec<_>>(), vec!["a", "b"]);
		assert_eq!(object.get("a"), Some(&Value::Int(3)));
	}

	#[test]
	fn object_equality_ignores_order() {
		let left = Value::object([("a", Value::Int(1)), ("b", Value::Bool(true))]);
		let right = Value::object([("b", Value::Bool(true)), ("a", Value::Int(1))]);
		assert_eq!(left, right);

		let shorter = Value::object([("a", Value::Int(1))]);
		assert_ne!(left, shorter);
	}

	#[test]
	fn accessors_match_only_their_kind() {
		let value = Value::text("hi");
		assert_eq!(value.kind(), ValueKind::Text);
		assert_eq!(value.as_str(), Some("hi"));
		assert_eq!(value.as_i64(), None);
		assert!(!value.is_null());
		assert!(Value::default().is_null());
		assert_eq!(Value::Float(1.0).as_i64(), None);
		assert_eq!(ValueKind::Object.to_string(), "object");
	}

	#[test]
	fn large_objects_keep_order_and_lookup() {
		let object: ObjectValue = (0..20_000).map(|index| (format!("k{index}"), Value::Int(index))).collect();
		assert_eq!(object.len(), 20_000);
		assert_eq!(object.get("k19999"), Some(&Value::Int(19_999)));
		assert_eq!(object.keys().nth(3), Some("k3"));
	}
}
