use std::fmt;
use std::str::FromStr;

use tracing::debug;

use crate::codec::{CodecError, Decode, DecodeOptions, DecodeSession, Encode, EncodeSession, FormatOptions, Result, Value};

/// Output shape requested from [`encode_as`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Representation {
	/// UTF-8 JSON bytes.
	Bytes,
	/// JSON text.
	Text,
	/// The flattened tree itself.
	Value,
}

impl Representation {
	/// Lowercase name accepted by [`FromStr`].
	pub fn name(self) -> &'static str {
		match self {
			Self::Bytes => "bytes",
			Self::Text => "text",
			Self::Value => "value",
		}
	}
}

impl fmt::Display for Representation {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.name())
	}
}

impl FromStr for Representation {
	type Err = CodecError;

	fn from_str(name: &str) -> Result<Self> {
		match name {
			"bytes" => Ok(Self::Bytes),
			"text" => Ok(Self::Text),
			"value" => Ok(Self::Value),
			_ => Err(CodecError::UnsupportedRepresentation { name: name.to_owned() }),
		}
	}
}

/// Encoded result in the requested representation.
#[derive(Debug, Clone, PartialEq)]
pub enum Output {
	/// UTF-8 JSON bytes.
	Bytes(Vec<u8>),
	/// JSON text.
	Text(String),
	/// Flattened tree.
	Value(Value),
}

/// Encode `value` and shape the flattened tree as `representation`.
pub fn encode_as<T: Encode + ?Sized>(value: &T, representation: Representation, format: &FormatOptions) -> Result<Output> {
	let tree = to_value(value)?;
	debug!(%representation, "encoded tree");
	Ok(match representation {
		Representation::Value => Output::Value(format.apply(tree)),
		Representation::Text => Output::Text(format.write_string(tree)?),
		Representation::Bytes => Output::Bytes(format.write_string(tree)?.into_bytes()),
	})
}

/// Encode `value` into a flattened tree.
pub fn to_value<T: Encode + ?Sized>(value: &T) -> Result<Value> {
	EncodeSession::new().encode(value)
}

/// Encode `value` as compact JSON text.
pub fn to_string<T: Encode + ?Sized>(value: &T) -> Result<String> {
	FormatOptions::compact().write_string(to_value(value)?)
}

/// Encode `value` as compact JSON bytes.
pub fn to_vec<T: Encode + ?Sized>(value: &T) -> Result<Vec<u8>> {
	to_string(value).map(String::into_bytes)
}

/// Decode `T` from a tree with default options and `T`'s aliases.
pub fn from_value<T: Decode>(value: &Value) -> Result<T> {
	from_value_with(value, &DecodeOptions::default())
}

/// Decode `T` from a tree with explicit options and `T`'s aliases.
pub fn from_value_with<T: Decode>(value: &Value, options: &DecodeOptions) -> Result<T> {
	DecodeSession::with_options(value, T::key_aliases(), options.clone()).decode()
}

/// Parse JSON text and decode `T` from it.
pub fn from_str<T: Decode>(text: &str) -> Result<T> {
	let value: Value = serde_json::from_str(text)?;
	from_value(&value)
}

/// Parse JSON bytes and decode `T` from them.
pub fn from_slice<T: Decode>(bytes: &[u8]) -> Result<T> {
	let value: Value = serde_json::from_slice(bytes)?;
	from_value(&value)
}
