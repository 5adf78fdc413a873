use crate::codec::{ObjectValue, Result, Value};

/// Key rewriting applied to every object in a finished tree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum KeyStyle {
	/// Keys are written as encoded.
	#[default]
	Preserve,
	/// `camelCase` keys become `snake_case`; acronym runs stay one word.
	SnakeCase,
}

/// Output options for serializing a flattened tree.
#[derive(Debug, Clone, Default)]
pub struct FormatOptions {
	/// Indent nested structures.
	pub pretty: bool,
	/// Order object keys lexicographically instead of by insertion.
	pub sort_keys: bool,
	/// Key rewriting.
	pub key_style: KeyStyle,
}

impl FormatOptions {
	/// Single-line output in insertion order.
	pub fn compact() -> Self {
		Self::default()
	}

	/// Indented output in insertion order.
	pub fn pretty() -> Self {
		Self {
			pretty: true,
			..Self::default()
		}
	}

	/// True when [`FormatOptions::apply`] would leave the tree unchanged.
	pub fn is_identity(&self) -> bool {
		!self.sort_keys && self.key_style == KeyStyle::Preserve
	}

	/// Rewrite keys and ordering of every object in `value`.
	///
	/// When two keys collapse to the same rewritten name the later one wins.
	pub fn apply(&self, value: Value) -> Value {
		if self.is_identity() {
			return value;
		}
		self.rewrite(value)
	}

	/// Serialize `value` to JSON text after [`FormatOptions::apply`].
	pub fn write_string(&self, value: Value) -> Result<String> {
		let value = self.apply(value);
		let text = if self.pretty {
			serde_json::to_string_pretty(&value)?
		} else {
			serde_json::to_string(&value)?
		};
		Ok(text)
	}

	fn rewrite(&self, value: Value) -> Value {
		match value {
			Value::Array(items) => Value::Array(items.into_iter().map(|item| self.rewrite(item)).collect()),
			Value::Object(object) => Value::Object(self.rewrite_object(object)),
			scalar => scalar,
		}
	}

	fn rewrite_object(&self, object: ObjectValue) -> ObjectValue {
		let mut entries = object.into_entries();
		if self.sort_keys {
			entries.sort_by(|left, right| self.key(&left.key).cmp(&self.key(&right.key)));
		}
		let mut out = ObjectValue::with_capacity(entries.len());
		for entry in entries {
			out.insert(self.key(&entry.key), self.rewrite(entry.value));
		}
		out
	}

	fn key(&self, key: &str) -> String {
		match self.key_style {
			KeyStyle::Preserve => key.to_owned(),
			KeyStyle::SnakeCase => snake_case(key),
		}
	}
}

/// Convert a `camelCase` key to `snake_case`.
///
/// An uppercase run is one word; its last letter starts the next word when a
/// lowercase letter follows, so `myURLProperty` becomes `my_url_property`.
pub fn snake_case(key: &str) -> String {
	let chars: Vec<char> = key.chars().collect();
	let mut out = String::with_capacity(key.len() + 4);
	for (index, &ch) in chars.iter().enumerate() {
		if !ch.is_uppercase() {
			out.push(ch);
			continue;
		}
		let prev = index.checked_sub(1).map(|at| chars[at]);
		let next = chars.get(index + 1).copied();
		let boundary = match prev {
			Some(prev) if prev.is_lowercase() || prev.is_ascii_digit() => true,
			Some(prev) if prev.is_uppercase() => next.is_some_and(char::is_lowercase),
			_ => false,
		};
		if boundary && !out.ends_with('_') {
			out.push('_');
		}
		out.extend(ch.to_lowercase());
	}
	out
}
