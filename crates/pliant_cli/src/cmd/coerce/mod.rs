use std::path::PathBuf;

use clap::ValueEnum;
use pliant::codec::{DecodeSession, Decoder, FieldPath, IntoValue, PathSegment, Result, ScalarDecoder, Value, ValueKind};
use tracing::debug;

use crate::cmd::util::{display_path, emit_json, load_document, parse_aliases};

#[derive(clap::Args)]
pub struct Args {
	pub path: PathBuf,
	/// Field path such as `items[0].name`.
	#[arg(long)]
	pub at: String,
	#[arg(long = "as", value_enum)]
	pub target: TargetType,
	/// Alias declaration `canonical=alt,alt`; repeatable.
	#[arg(long = "alias")]
	pub aliases: Vec<String>,
	#[arg(long)]
	pub json: bool,
}

/// Scalar type the addressed member is coerced into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TargetType {
	Bool,
	I8,
	I16,
	I32,
	I64,
	U8,
	U16,
	U32,
	U64,
	F32,
	F64,
	String,
	/// Report whether the member is null instead of converting it.
	Null,
}

impl TargetType {
	pub fn name(self) -> &'static str {
		match self {
			Self::Bool => "bool",
			Self::I8 => "i8",
			Self::I16 => "i16",
			Self::I32 => "i32",
			Self::I64 => "i64",
			Self::U8 => "u8",
			Self::U16 => "u16",
			Self::U32 => "u32",
			Self::U64 => "u64",
			Self::F32 => "f32",
			Self::F64 => "f64",
			Self::String => "string",
			Self::Null => "null",
		}
	}

	fn read(self, scalar: &ScalarDecoder<'_>) -> Value {
		match self {
			Self::Bool => scalar.read::<bool>().into_value(),
			Self::I8 => scalar.read::<i8>().into_value(),
			Self::I16 => scalar.read::<i16>().into_value(),
			Self::I32 => scalar.read::<i32>().into_value(),
			Self::I64 => scalar.read::<i64>().into_value(),
			Self::U8 => scalar.read::<u8>().into_value(),
			Self::U16 => scalar.read::<u16>().into_value(),
			Self::U32 => scalar.read::<u32>().into_value(),
			Self::U64 => scalar.read::<u64>().into_value(),
			Self::F32 => scalar.read::<f32>().into_value(),
			Self::F64 => scalar.read::<f64>().into_value(),
			Self::String => scalar.read::<String>().into_value(),
			Self::Null => scalar.check_null().into_value(),
		}
	}
}

/// Member reached by a field path walk.
#[derive(Debug, Clone, PartialEq)]
pub struct Coerced {
	/// Path rendered by the decode session at the leaf.
	pub path: String,
	/// Kind of the member before coercion.
	pub source: ValueKind,
	/// Coerced result.
	pub value: Value,
}

/// Coerce the member at a field path and print it.
pub fn run(args: Args) -> Result<()> {
	let Args {
		path,
		at,
		target,
		aliases,
		json,
	} = args;

	let field_path = FieldPath::parse(&at)?;
	let aliases = parse_aliases(&aliases)?;
	let document = load_document(&path)?;

	let session = DecodeSession::new(&document, aliases);
	let coerced = coerce_at(&session.decoder(), &field_path, target)?;
	debug!(path = %coerced.path, source = %coerced.source, target = target.name(), "coerced member");

	if json {
		return emit_json(&CoerceJson {
			path: coerced.path,
			source: coerced.source.name(),
			target: target.name(),
			value: coerced.value,
		});
	}

	match coerced.value {
		Value::Text(text) => println!("{text}"),
		other => println!("{}", serde_json::to_string(&other)?),
	}
	Ok(())
}

/// Walk `field_path` through decode containers and coerce the member found there.
///
/// Missing members resolve the same way typed decoding does, so a path that
/// does not exist still yields the fallback for `target`.
pub fn coerce_at(decoder: &Decoder<'_>, field_path: &FieldPath, target: TargetType) -> Result<Coerced> {
	walk(decoder, &field_path.segments, target)
}

fn walk(decoder: &Decoder<'_>, segments: &[PathSegment], target: TargetType) -> Result<Coerced> {
	let Some((head, rest)) = segments.split_first() else {
		let scalar = decoder.scalar()?;
		return Ok(Coerced {
			path: display_path(&decoder.current_path()).to_owned(),
			source: scalar.node().kind(),
			value: target.read(&scalar),
		});
	};

	match head {
		PathSegment::Field(name) => decoder.keyed()?.read_with(name, |child| walk(child, rest, target)),
		PathSegment::Index(index) => {
			let mut items = decoder.unkeyed()?;
			for _ in 0..*index {
				items.skip()?;
			}
			items.read_with(|child| walk(child, rest, target))
		}
	}
}

#[derive(serde::Serialize)]
struct CoerceJson {
	path: String,
	source: &'static str,
	target: &'static str,
	value: Value,
}

#[cfg(test)]
mod tests;
