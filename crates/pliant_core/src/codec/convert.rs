use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::codec::{Decode, Decoder, Encode, Encoder, KeyAliases, ObjectValue, Result, Value};

macro_rules! scalar_conversions {
	($($ty:ty),* $(,)?) => {$(
		impl Decode for $ty {
			fn decode(decoder: &Decoder<'_>) -> Result<Self> {
				Ok(decoder.scalar()?.read())
			}
		}

		impl Encode for $ty {
			fn encode(&self, encoder: &Encoder<'_>) -> Result<()> {
				encoder.scalar()?.write_scalar(*self)
			}
		}
	)*};
}

scalar_conversions!(bool, i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64);

impl Decode for String {
	fn decode(decoder: &Decoder<'_>) -> Result<Self> {
		Ok(decoder.scalar()?.read())
	}
}

impl Encode for String {
	fn encode(&self, encoder: &Encoder<'_>) -> Result<()> {
		encoder.scalar()?.write_scalar(self.as_str())
	}
}

impl Encode for str {
	fn encode(&self, encoder: &Encoder<'_>) -> Result<()> {
		encoder.scalar()?.write_scalar(self)
	}
}

impl Decode for () {
	fn decode(_decoder: &Decoder<'_>) -> Result<Self> {
		Ok(())
	}
}

impl Encode for () {
	fn encode(&self, encoder: &Encoder<'_>) -> Result<()> {
		encoder.scalar()?.write_null()
	}
}

/// Walks the node through containers so every member is visited with its path.
impl Decode for Value {
	fn decode(decoder: &Decoder<'_>) -> Result<Self> {
		match decoder.node() {
			Value::Array(_) => {
				let mut items = decoder.unkeyed()?;
				let mut out = Vec::with_capacity(items.remaining());
				while !items.is_at_end() {
					out.push(items.read_structured()?);
				}
				Ok(Value::Array(out))
			}
			Value::Object(_) => {
				let members = decoder.keyed()?;
				let mut object = ObjectValue::with_capacity(members.len());
				for key in members.keys() {
					object.insert(key, members.read_structured(key)?);
				}
				Ok(Value::Object(object))
			}
			_ => Ok(decoder.scalar()?.node().clone()),
		}
	}
}

impl Encode for Value {
	fn encode(&self, encoder: &Encoder<'_>) -> Result<()> {
		match self {
			Value::Array(items) => {
				let mut out = encoder.unkeyed()?;
				for item in items {
					out.push(item)?;
				}
				Ok(())
			}
			Value::Object(object) => {
				let mut out = encoder.keyed()?;
				for (key, value) in object.iter() {
					out.write(key, value)?;
				}
				Ok(())
			}
			scalar => encoder.scalar()?.write_scalar(scalar.clone()),
		}
	}
}

impl<T: Encode + ?Sized> Encode for &T {
	fn encode(&self, encoder: &Encoder<'_>) -> Result<()> {
		(**self).encode(encoder)
	}
}

/// Wrappers and collections forward the alias table of the type they hold.
impl<T: Decode> Decode for Option<T> {
	fn decode(decoder: &Decoder<'_>) -> Result<Self> {
		if decoder.is_null() {
			return Ok(None);
		}
		T::decode(decoder).map(Some)
	}

	fn key_aliases() -> KeyAliases {
		T::key_aliases()
	}
}

impl<T: Encode> Encode for Option<T> {
	fn encode(&self, encoder: &Encoder<'_>) -> Result<()> {
		match self {
			Some(value) => value.encode(encoder),
			None => encoder.scalar()?.write_null(),
		}
	}
}

impl<T: Decode> Decode for Box<T> {
	fn decode(decoder: &Decoder<'_>) -> Result<Self> {
		T::decode(decoder).map(Box::new)
	}

	fn key_aliases() -> KeyAliases {
		T::key_aliases()
	}
}

impl<T: Encode + ?Sized> Encode for Box<T> {
	fn encode(&self, encoder: &Encoder<'_>) -> Result<()> {
		(**self).encode(encoder)
	}
}

impl<T: Decode> Decode for Vec<T> {
	fn decode(decoder: &Decoder<'_>) -> Result<Self> {
		let mut items = decoder.unkeyed()?;
		let mut out = Vec::with_capacity(items.remaining());
		while !items.is_at_end() {
			out.push(items.read_structured()?);
		}
		Ok(out)
	}

	fn key_aliases() -> KeyAliases {
		T::key_aliases()
	}
}

impl<T: Encode> Encode for Vec<T> {
	fn encode(&self, encoder: &Encoder<'_>) -> Result<()> {
		self.as_slice().encode(encoder)
	}
}

impl<T: Encode> Encode for [T] {
	fn encode(&self, encoder: &Encoder<'_>) -> Result<()> {
		let mut out = encoder.unkeyed()?;
		for item in self {
			out.push(item)?;
		}
		Ok(())
	}
}

impl<T: Decode> Decode for BTreeMap<String, T> {
	fn decode(decoder: &Decoder<'_>) -> Result<Self> {
		let members = decoder.keyed()?;
		members.keys().map(|key| Ok((key.to_owned(), members.read_structured(key)?))).collect()
	}

	fn key_aliases() -> KeyAliases {
		T::key_aliases()
	}
}

impl<T: Encode> Encode for BTreeMap<String, T> {
	fn encode(&self, encoder: &Encoder<'_>) -> Result<()> {
		let mut out = encoder.keyed()?;
		for (key, value) in self {
			out.write(key, value)?;
		}
		Ok(())
	}
}

impl<T: Decode, S: BuildHasher + Default> Decode for HashMap<String, T, S> {
	fn decode(decoder: &Decoder<'_>) -> Result<Self> {
		let members = decoder.keyed()?;
		members.keys().map(|key| Ok((key.to_owned(), members.read_structured(key)?))).collect()
	}

	fn key_aliases() -> KeyAliases {
		T::key_aliases()
	}
}

impl<T: Encode, S: BuildHasher> Encode for HashMap<String, T, S> {
	fn encode(&self, encoder: &Encoder<'_>) -> Result<()> {
		let mut keys: Vec<&String> = self.keys().collect();
		keys.sort();
		let mut out = encoder.keyed()?;
		for key in keys {
			out.write(key, &self[key])?;
		}
		Ok(())
	}
}

// Types with a canonical text form are written as that string rather than structurally.

impl Encode for Path {
	fn encode(&self, encoder: &Encoder<'_>) -> Result<()> {
		encoder.scalar()?.write_scalar(self.to_string_lossy().into_owned())
	}
}

impl Encode for PathBuf {
	fn encode(&self, encoder: &Encoder<'_>) -> Result<()> {
		self.as_path().encode(encoder)
	}
}

impl Decode for PathBuf {
	fn decode(decoder: &Decoder<'_>) -> Result<Self> {
		Ok(PathBuf::from(decoder.scalar()?.read::<String>()))
	}
}

impl Encode for IpAddr {
	fn encode(&self, encoder: &Encoder<'_>) -> Result<()> {
		encoder.scalar()?.write_scalar(self.to_string())
	}
}

impl Decode for IpAddr {
	fn decode(decoder: &Decoder<'_>) -> Result<Self> {
		let text: String = decoder.scalar()?.read();
		Ok(text.parse().unwrap_or_else(|_| {
			debug!(path = %decoder.current_path(), "unparsable address, using unspecified");
			IpAddr::V4(Ipv4Addr::UNSPECIFIED)
		}))
	}
}

impl Encode for SocketAddr {
	fn encode(&self, encoder: &Encoder<'_>) -> Result<()> {
		encoder.scalar()?.write_scalar(self.to_string())
	}
}

impl Decode for SocketAddr {
	fn decode(decoder: &Decoder<'_>) -> Result<Self> {
		let text: String = decoder.scalar()?.read();
		Ok(text.parse().unwrap_or_else(|_| {
			debug!(path = %decoder.current_path(), "unparsable socket address, using unspecified");
			SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), 0)
		}))
	}
}

#[cfg(test)]
mod tests;
