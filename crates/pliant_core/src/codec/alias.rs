use std::collections::HashMap;

/// Canonical field name to ordered alternate input keys.
///
/// Consulted by keyed decoding only when the canonical key is missing from a
/// non-empty object; the first alternate present wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyAliases {
	table: HashMap<Box<str>, Vec<Box<str>>>,
}

impl KeyAliases {
	/// Table without aliases.
	pub fn none() -> Self {
		Self::default()
	}

	/// Add alternates for `canonical`, appending to any already declared.
	pub fn with<I, S>(mut self, canonical: &str, alternates: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<Box<str>>,
	{
		self.table.entry(canonical.into()).or_default().extend(alternates.into_iter().map(Into::into));
		self
	}

	/// Alternates declared for `canonical`, in lookup order.
	pub fn alternates(&self, canonical: &str) -> &[Box<str>] {
		self.table.get(canonical).map(Vec::as_slice).unwrap_or(&[])
	}

	/// True when no alias is declared.
	pub fn is_empty(&self) -> bool {
		self.table.is_empty()
	}
}

impl<K, I, S> FromIterator<(K, I)> for KeyAliases
where
	K: AsRef<str>,
	I: IntoIterator<Item = S>,
	S: Into<Box<str>>,
{
	fn from_iter<T: IntoIterator<Item = (K, I)>>(iter: T) -> Self {
		iter.into_iter().fold(Self::none(), |aliases, (canonical, alternates)| aliases.with(canonical.as_ref(), alternates))
	}
}

#[cfg(test)]
mod tests {
	use super::KeyAliases;

	#[test]
	fn alternates_keep_declaration_order() {
		let aliases = KeyAliases::none().with("name", ["n", "fullName"]).with("name", ["label"]);
		let names: Vec<&str> = aliases.alternates("name").iter().map(AsRef::as_ref).collect();
		assert_eq!(names, vec!["n", "fullName", "label"]);
		assert!(aliases.alternates("missing").is_empty());
	}

	#[test]
	fn collects_from_pairs() {
		let aliases: KeyAliases = [("id", vec!["ID", "identifier"])].into_iter().collect();
		assert_eq!(aliases.alternates("id").len(), 2);
		assert!(!aliases.is_empty());
		assert!(KeyAliases::none().is_empty());
	}
}
