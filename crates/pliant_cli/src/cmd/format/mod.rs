use std::io::Write;
use std::path::PathBuf;

use pliant::codec::{FormatOptions, KeyStyle, Output, Representation, Result, Value, encode_as, from_value};

use crate::cmd::util::load_document;

#[derive(clap::Args)]
pub struct Args {
	pub path: PathBuf,
	#[arg(long)]
	pub pretty: bool,
	#[arg(long = "sort-keys")]
	pub sort_keys: bool,
	#[arg(long = "snake-case")]
	pub snake_case: bool,
	/// Output representation: `text`, `bytes`, or `value`.
	#[arg(long, default_value = "text")]
	pub output: String,
}

impl Args {
	fn format_options(&self) -> FormatOptions {
		FormatOptions {
			pretty: self.pretty,
			sort_keys: self.sort_keys,
			key_style: if self.snake_case { KeyStyle::SnakeCase } else { KeyStyle::Preserve },
		}
	}
}

/// Decode a document into a tree, encode it back, and print it.
pub fn run(args: Args) -> Result<()> {
	let representation: Representation = args.output.parse()?;
	let format = args.format_options();

	let document = load_document(&args.path)?;
	let decoded: Value = from_value(&document)?;

	match encode_as(&decoded, representation, &format)? {
		Output::Text(text) => println!("{text}"),
		Output::Bytes(bytes) => {
			let mut stdout = std::io::stdout().lock();
			stdout.write_all(&bytes)?;
			stdout.write_all(b"\n")?;
		}
		Output::Value(value) => println!("{value:#?}"),
	}
	Ok(())
}
