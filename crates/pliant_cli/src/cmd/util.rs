use std::path::Path;

use pliant::codec::{CodecError, KeyAliases, Result, Value};
use serde::Serialize;

/// Read and parse a JSON document into a value tree.
pub(crate) fn load_document(path: &Path) -> Result<Value> {
	let bytes = std::fs::read(path)?;
	Ok(serde_json::from_slice(&bytes)?)
}

/// Parse `canonical=alt,alt` alias declarations into one table.
pub(crate) fn parse_aliases(declarations: &[String]) -> Result<KeyAliases> {
	declarations.iter().try_fold(KeyAliases::none(), |aliases, declaration| {
		let (canonical, alternates) = parse_alias(declaration)?;
		Ok(aliases.with(canonical, alternates))
	})
}

fn parse_alias(declaration: &str) -> Result<(&str, Vec<&str>)> {
	let invalid = || CodecError::InvalidAlias {
		alias: declaration.to_owned(),
	};
	let (canonical, rest) = declaration.split_once('=').ok_or_else(invalid)?;
	let canonical = canonical.trim();
	let alternates: Vec<&str> = rest.split(',').map(str::trim).collect();
	if canonical.is_empty() || alternates.iter().any(|alternate| alternate.is_empty()) {
		return Err(invalid());
	}
	Ok((canonical, alternates))
}

/// Print `payload` as pretty JSON on stdout.
pub(crate) fn emit_json<T: Serialize>(payload: &T) -> Result<()> {
	println!("{}", serde_json::to_string_pretty(payload)?);
	Ok(())
}

/// Render a path for humans; the root has an empty path.
pub(crate) fn display_path(path: &str) -> &str {
	if path.is_empty() { "(root)" } else { path }
}
