use std::path::PathBuf;

use pliant::codec::{Decode, Decoder, Result, Value, ValueKind, from_value};

use crate::cmd::util::{display_path, emit_json, load_document};

#[derive(clap::Args)]
pub struct Args {
	pub path: PathBuf,
	#[arg(long)]
	pub json: bool,
}

/// One scalar or empty container reached while walking a document.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct Leaf {
	pub path: String,
	pub kind: ValueKind,
}

/// Every leaf of a document in visitation order.
#[derive(Debug, Default)]
pub struct Outline {
	pub leaves: Vec<Leaf>,
}

impl Decode for Outline {
	fn decode(decoder: &Decoder<'_>) -> Result<Self> {
		let mut outline = Self::default();
		outline.visit(decoder)?;
		Ok(outline)
	}
}

impl Outline {
	fn visit(&mut self, decoder: &Decoder<'_>) -> Result<()> {
		match decoder.node() {
			Value::Object(object) if !object.is_empty() => {
				let fields = decoder.keyed()?;
				for key in fields.keys() {
					fields.read_with(key, |child| self.visit(child))?;
				}
			}
			Value::Array(items) if !items.is_empty() => {
				let mut items = decoder.unkeyed()?;
				while !items.is_at_end() {
					items.read_with(|child| self.visit(child))?;
				}
			}
			node => self.leaves.push(Leaf {
				path: decoder.current_path(),
				kind: node.kind(),
			}),
		}
		Ok(())
	}
}

/// List leaf paths of a document.
pub fn run(args: Args) -> Result<()> {
	let Args { path, json } = args;

	let document = load_document(&path)?;
	let outline: Outline = from_value(&document)?;

	if json {
		return emit_json(&PathsJson {
			count: outline.leaves.len(),
			leaves: outline.leaves,
		});
	}

	for leaf in &outline.leaves {
		println!("{}\t{}", display_path(&leaf.path), leaf.kind);
	}
	Ok(())
}

#[derive(serde::Serialize)]
struct PathsJson {
	count: usize,
	leaves: Vec<Leaf>,
}
