use std::fmt;

use serde::de::{self, MapAccess, SeqAccess, Visitor};
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::codec::{ObjectValue, Value, ValueKind};

impl Serialize for Value {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		match self {
			Self::Null => serializer.serialize_unit(),
			Self::Bool(value) => serializer.serialize_bool(*value),
			Self::Int(value) => serializer.serialize_i64(*value),
			Self::Float(value) => serializer.serialize_f64(*value),
			Self::Text(value) => serializer.serialize_str(value),
			Self::Array(items) => {
				let mut seq = serializer.serialize_seq(Some(items.len()))?;
				for item in items {
					seq.serialize_element(item)?;
				}
				seq.end()
			}
			Self::Object(object) => object.serialize(serializer),
		}
	}
}

/// Keys are written in insertion order.
impl Serialize for ObjectValue {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		let mut map = serializer.serialize_map(Some(self.len()))?;
		for (key, value) in self.iter() {
			map.serialize_entry(key, value)?;
		}
		map.end()
	}
}

impl Serialize for ValueKind {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		serializer.serialize_str(self.name())
	}
}

struct ValueVisitor;

impl<'de> Visitor<'de> for ValueVisitor {
	type Value = Value;

	fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str("any JSON-like value")
	}

	fn visit_unit<E: de::Error>(self) -> Result<Value, E> {
		Ok(Value::Null)
	}

	fn visit_none<E: de::Error>(self) -> Result<Value, E> {
		Ok(Value::Null)
	}

	fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Value, D::Error> {
		Value::deserialize(deserializer)
	}

	fn visit_bool<E: de::Error>(self, value: bool) -> Result<Value, E> {
		Ok(Value::Bool(value))
	}

	fn visit_i64<E: de::Error>(self, value: i64) -> Result<Value, E> {
		Ok(Value::Int(value))
	}

	fn visit_u64<E: de::Error>(self, value: u64) -> Result<Value, E> {
		Ok(i64::try_from(value).map_or(Value::Float(value as f64), Value::Int))
	}

	fn visit_f64<E: de::Error>(self, value: f64) -> Result<Value, E> {
		Ok(Value::Float(value))
	}

	fn visit_str<E: de::Error>(self, value: &str) -> Result<Value, E> {
		Ok(Value::text(value))
	}

	fn visit_string<E: de::Error>(self, value: String) -> Result<Value, E> {
		Ok(Value::text(value))
	}

	fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Value, A::Error> {
		let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
		while let Some(item) = seq.next_element()? {
			items.push(item);
		}
		Ok(Value::Array(items))
	}

	fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Value, A::Error> {
		let mut object = ObjectValue::with_capacity(map.size_hint().unwrap_or(0));
		while let Some((key, value)) = map.next_entry::<String, Value>()? {
			object.insert(key, value);
		}
		Ok(Value::Object(object))
	}
}

impl<'de> Deserialize<'de> for Value {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		deserializer.deserialize_any(ValueVisitor)
	}
}

#[cfg(test)]
mod tests {
	use crate::codec::{Value, ValueKind};

	#[test]
	fn parse_keeps_key_order_and_widens_large_integers() {
		let value: Value = serde_json::from_str(r#"{"z":1,"a":[true,null,"x"],"big":18446744073709551615}"#).expect("parse");
		let object = value.as_object().expect("object");
		let keys: Vec<&str> = object.keys().collect();
		assert_eq!(keys, vec!["z", "a", "big"]);
		assert_eq!(object.get("big"), Some(&Value::Float(u64::MAX as f64)));
		assert_eq!(object.get("a"), Some(&Value::array([Value::Bool(true), Value::Null, Value::text("x")])));
	}

	#[test]
	fn serialize_writes_insertion_order() {
		let value = Value::object([("b", Value::Int(2)), ("a", Value::Float(1.5))]);
		assert_eq!(serde_json::to_string(&value).expect("json"), r#"{"b":2,"a":1.5}"#);
	}

	#[test]
	fn kinds_serialize_as_names() {
		assert_eq!(serde_json::to_string(&ValueKind::Text).expect("json"), r#""string""#);
	}
}
