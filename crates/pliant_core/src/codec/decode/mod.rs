use std::cell::Cell;
use std::fmt;
use std::sync::LazyLock;

use tracing::debug;

use crate::codec::{Coerce, CodecError, KeyAliases, ObjectValue, PathFrame, PathSegment, PathStack, Result, Value};

/// Placeholder resolved for every missing key.
static MISSING: LazyLock<Value> = LazyLock::new(|| Value::Object(ObjectValue::new()));
static EMPTY_OBJECT: LazyLock<ObjectValue> = LazyLock::new(ObjectValue::new);
static NULL: Value = Value::Null;

/// Runtime limits for decode sessions.
#[derive(Debug, Clone)]
pub struct DecodeOptions {
	/// Maximum number of live path segments before nested decoding fails.
	pub max_depth: u32,
}

impl Default for DecodeOptions {
	fn default() -> Self {
		Self { max_depth: 128 }
	}
}

impl DecodeOptions {
	/// Preset for untrusted input where deep nesting is suspicious.
	pub fn shallow() -> Self {
		Self { max_depth: 16 }
	}
}

/// A type that can rebuild itself from a [`Decoder`].
pub trait Decode: Sized {
	/// Read `Self` from the decoder's node.
	fn decode(decoder: &Decoder<'_>) -> Result<Self>;

	/// Alternate input keys accepted for this type's fields.
	///
	/// The top-level type's table is installed for the session. A nested type
	/// decoded through `read_structured` or `read_optional` replaces the
	/// inherited table for its own subtree when its table is non-empty, and
	/// inherits the enclosing one otherwise.
	fn key_aliases() -> KeyAliases {
		KeyAliases::none()
	}
}

/// Owner of the path stack and alias table for one top-level decode call.
#[derive(Debug)]
pub struct DecodeSession<'v> {
	root: &'v Value,
	path: PathStack,
	aliases: KeyAliases,
	options: DecodeOptions,
	claimed: Cell<bool>,
}

impl<'v> DecodeSession<'v> {
	/// Session over `root` with default options.
	pub fn new(root: &'v Value, aliases: KeyAliases) -> Self {
		Self::with_options(root, aliases, DecodeOptions::default())
	}

	/// Session over `root` with explicit options.
	pub fn with_options(root: &'v Value, aliases: KeyAliases, options: DecodeOptions) -> Self {
		Self {
			root,
			path: PathStack::new(),
			aliases,
			options,
			claimed: Cell::new(false),
		}
	}

	/// Root decoder.
	///
	/// A session opens exactly one top-level container across all of its root
	/// decoders; a second claim fails with an invariant violation.
	pub fn decoder(&self) -> Decoder<'_> {
		Decoder {
			session_claim: Some(&self.claimed),
			..Decoder::over(self.root, self.scope())
		}
	}

	/// Decode `T` from the root node.
	pub fn decode<T: Decode>(&self) -> Result<T> {
		T::decode(&self.decoder())
	}

	/// Live traversal path.
	pub fn path(&self) -> &PathStack {
		&self.path
	}

	fn scope(&self) -> Scope<'_> {
		Scope {
			path: &self.path,
			aliases: &self.aliases,
			options: &self.options,
		}
	}
}

/// Borrowed session state shared by every decoder and container of a session.
#[derive(Clone, Copy)]
struct Scope<'a> {
	path: &'a PathStack,
	aliases: &'a KeyAliases,
	options: &'a DecodeOptions,
}

impl<'a> Scope<'a> {
	fn nested(self, node: &'a Value) -> Result<Decoder<'a>> {
		self.check_depth()?;
		Ok(Decoder::over(node, self))
	}

	/// Decode `T` at `node`, with `T`'s own alias table when it declares one.
	fn decode<T: Decode>(self, node: &'a Value) -> Result<T> {
		self.check_depth()?;
		let own = T::key_aliases();
		if own.is_empty() {
			return T::decode(&Decoder::over(node, self));
		}
		let scope = Scope {
			path: self.path,
			aliases: &own,
			options: self.options,
		};
		T::decode(&Decoder::over(node, scope))
	}

	fn check_depth(self) -> Result<()> {
		if self.path.depth() > self.options.max_depth as usize {
			return Err(CodecError::DepthExceeded {
				path: self.path.render(),
				max_depth: self.options.max_depth,
			});
		}
		Ok(())
	}
}

/// Decoding view over one node.
pub struct Decoder<'a> {
	node: &'a Value,
	scope: Scope<'a>,
	claimed: Cell<bool>,
	session_claim: Option<&'a Cell<bool>>,
}

impl<'a> Decoder<'a> {
	fn over(node: &'a Value, scope: Scope<'a>) -> Self {
		Self {
			node,
			scope,
			claimed: Cell::new(false),
			session_claim: None,
		}
	}

	/// Node this decoder reads from.
	pub fn node(&self) -> &'a Value {
		self.node
	}

	/// True when the node is null.
	pub fn is_null(&self) -> bool {
		self.node.is_null()
	}

	/// Rendered traversal path of this node.
	pub fn current_path(&self) -> String {
		self.scope.path.render()
	}

	/// Build a conversion failure carrying the current path.
	pub fn error(&self, message: impl fmt::Display) -> CodecError {
		CodecError::Custom {
			path: self.current_path(),
			message: message.to_string(),
		}
	}

	/// Keyed view; non-object nodes read as an empty object.
	pub fn keyed(&self) -> Result<KeyedDecoder<'a>> {
		self.claim()?;
		Ok(KeyedDecoder::over(self.node, self.scope, None))
	}

	/// Positional view; non-array nodes read as an empty sequence.
	pub fn unkeyed(&self) -> Result<UnkeyedDecoder<'a>> {
		self.claim()?;
		Ok(UnkeyedDecoder::over(self.node, self.scope, None))
	}

	/// Single-value view over the node itself.
	pub fn scalar(&self) -> Result<ScalarDecoder<'a>> {
		self.claim()?;
		Ok(ScalarDecoder {
			node: self.node,
			scope: self.scope,
		})
	}

	fn claim(&self) -> Result<()> {
		if self.claimed.replace(true) {
			return Err(CodecError::InvariantViolation {
				path: self.current_path(),
				reason: "decoder already handed out a container",
			});
		}
		if self.session_claim.is_some_and(|claimed| claimed.replace(true)) {
			return Err(CodecError::InvariantViolation {
				path: self.current_path(),
				reason: "session already opened a top-level container",
			});
		}
		Ok(())
	}
}

impl fmt::Debug for Decoder<'_> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Decoder")
			.field("kind", &self.node.kind())
			.field("path", &self.current_path())
			.finish()
	}
}

/// Name-addressed view over an object node.
pub struct KeyedDecoder<'a> {
	node: &'a Value,
	object: &'a ObjectValue,
	scope: Scope<'a>,
	_frame: Option<PathFrame<'a>>,
}

impl<'a> KeyedDecoder<'a> {
	fn over(node: &'a Value, scope: Scope<'a>, frame: Option<PathFrame<'a>>) -> Self {
		Self {
			node,
			object: node.as_object().unwrap_or(&*EMPTY_OBJECT),
			scope,
			_frame: frame,
		}
	}

	/// Keys present in the node, in input order.
	pub fn keys(&self) -> impl Iterator<Item = &'a str> + use<'a> {
		self.object.keys()
	}

	/// Number of keys present.
	pub fn len(&self) -> usize {
		self.object.len()
	}

	/// True when the canonical `key` is present; aliases are not consulted.
	pub fn contains(&self, key: &str) -> bool {
		self.object.contains_key(key)
	}

	/// Coerce member `key` into `T`; missing members coerce from the placeholder.
	pub fn read<T: Coerce>(&self, key: &str) -> T {
		let _frame = self.scope.path.push(PathSegment::field(key));
		T::coerce(self.locate(key))
	}

	/// True only when member `key` resolves to null.
	pub fn check_null(&self, key: &str) -> bool {
		let _frame = self.scope.path.push(PathSegment::field(key));
		self.locate(key).is_null()
	}

	/// Decode member `key` through `T`'s own logic.
	pub fn read_structured<T: Decode>(&self, key: &str) -> Result<T> {
		let _frame = self.scope.path.push(PathSegment::field(key));
		self.scope.decode(self.locate(key))
	}

	/// Decode member `key` with a closure over a nested decoder.
	pub fn read_with<T>(&self, key: &str, read: impl FnOnce(&Decoder<'a>) -> Result<T>) -> Result<T> {
		let _frame = self.scope.path.push(PathSegment::field(key));
		let decoder = self.scope.nested(self.locate(key))?;
		read(&decoder)
	}

	/// `None` when `key` is absent (after alias lookup) or null.
	pub fn read_optional<T: Decode>(&self, key: &str) -> Result<Option<T>> {
		let _frame = self.scope.path.push(PathSegment::field(key));
		match self.lookup(key) {
			None | Some(Value::Null) => Ok(None),
			Some(node) => self.scope.decode(node).map(Some),
		}
	}

	/// Keyed view over member `key`; its segment stays pushed while the view lives.
	pub fn nested_keyed(&self, key: &str) -> Result<KeyedDecoder<'a>> {
		let frame = self.scope.path.push(PathSegment::field(key));
		self.scope.check_depth()?;
		Ok(KeyedDecoder::over(self.locate(key), self.scope, Some(frame)))
	}

	/// Positional view over member `key`; its segment stays pushed while the view lives.
	pub fn nested_unkeyed(&self, key: &str) -> Result<UnkeyedDecoder<'a>> {
		let frame = self.scope.path.push(PathSegment::field(key));
		self.scope.check_depth()?;
		Ok(UnkeyedDecoder::over(self.locate(key), self.scope, Some(frame)))
	}

	/// Fresh decoder over this whole object, for layered decoding of base data.
	pub fn super_decoder(&self) -> Decoder<'a> {
		Decoder::over(self.node, self.scope)
	}

	/// Fresh decoder over member `key`, or null when it is absent.
	pub fn super_decoder_for(&self, key: &str) -> Decoder<'a> {
		Decoder::over(self.object.get(key).unwrap_or(&NULL), self.scope)
	}

	fn lookup(&self, key: &str) -> Option<&'a Value> {
		let object = self.object;
		if let Some(value) = object.get(key) {
			return Some(value);
		}
		if object.is_empty() {
			return None;
		}
		for alternate in self.scope.aliases.alternates(key) {
			if let Some(value) = object.get(alternate) {
				debug!(path = %self.scope.path.render(), alias = %alternate, "resolved key via alias");
				return Some(value);
			}
		}
		None
	}

	fn locate(&self, key: &str) -> &'a Value {
		self.lookup(key).unwrap_or_else(|| {
			debug!(path = %self.scope.path.render(), "key not found, using default");
			&*MISSING
		})
	}
}

impl fmt::Debug for KeyedDecoder<'_> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("KeyedDecoder").field("keys", &self.object.len()).finish()
	}
}

/// Sequential view over an array node.
pub struct UnkeyedDecoder<'a> {
	node: &'a Value,
	items: &'a [Value],
	index: usize,
	scope: Scope<'a>,
	_frame: Option<PathFrame<'a>>,
}

impl<'a> UnkeyedDecoder<'a> {
	fn over(node: &'a Value, scope: Scope<'a>, frame: Option<PathFrame<'a>>) -> Self {
		Self {
			node,
			items: node.as_array().unwrap_or(&[]),
			index: 0,
			scope,
			_frame: frame,
		}
	}

	/// Total element count; always known for a materialized tree.
	pub fn count(&self) -> Option<usize> {
		Some(self.items.len())
	}

	/// Elements not yet consumed.
	pub fn remaining(&self) -> usize {
		self.items.len().saturating_sub(self.index)
	}

	/// True once every element has been consumed.
	pub fn is_at_end(&self) -> bool {
		self.index >= self.items.len()
	}

	/// Index of the next element.
	pub fn current_index(&self) -> usize {
		self.index
	}

	/// Coerce the next element into `T`.
	pub fn read<T: Coerce>(&mut self) -> Result<T> {
		let path = self.scope.path;
		let _frame = path.push(PathSegment::Index(self.index));
		Ok(T::coerce(self.next_item()?))
	}

	/// Consume the next element without reading it.
	pub fn skip(&mut self) -> Result<()> {
		let path = self.scope.path;
		let _frame = path.push(PathSegment::Index(self.index));
		self.next_item().map(|_| ())
	}

	/// True when the next element is null; a null element is consumed, anything else is left in place.
	pub fn check_null(&mut self) -> Result<bool> {
		let path = self.scope.path;
		let _frame = path.push(PathSegment::Index(self.index));
		let items = self.items;
		let Some(item) = items.get(self.index) else {
			return Err(self.exhausted());
		};
		if item.is_null() {
			self.index += 1;
			return Ok(true);
		}
		Ok(false)
	}

	/// Decode the next element through `T`'s own logic.
	pub fn read_structured<T: Decode>(&mut self) -> Result<T> {
		let path = self.scope.path;
		let _frame = path.push(PathSegment::Index(self.index));
		let item = self.next_item()?;
		self.scope.decode(item)
	}

	/// Decode the next element with a closure over a nested decoder.
	pub fn read_with<T>(&mut self, read: impl FnOnce(&Decoder<'a>) -> Result<T>) -> Result<T> {
		let path = self.scope.path;
		let _frame = path.push(PathSegment::Index(self.index));
		let item = self.next_item()?;
		let decoder = self.scope.nested(item)?;
		read(&decoder)
	}

	/// Keyed view over the next element.
	pub fn nested_keyed(&mut self) -> Result<KeyedDecoder<'a>> {
		let path = self.scope.path;
		let frame = path.push(PathSegment::Index(self.index));
		let item = self.next_item()?;
		self.scope.check_depth()?;
		Ok(KeyedDecoder::over(item, self.scope, Some(frame)))
	}

	/// Positional view over the next element.
	pub fn nested_unkeyed(&mut self) -> Result<UnkeyedDecoder<'a>> {
		let path = self.scope.path;
		let frame = path.push(PathSegment::Index(self.index));
		let item = self.next_item()?;
		self.scope.check_depth()?;
		Ok(UnkeyedDecoder::over(item, self.scope, Some(frame)))
	}

	/// Fresh decoder over the whole sequence.
	pub fn super_decoder(&self) -> Decoder<'a> {
		Decoder::over(self.node, self.scope)
	}

	fn next_item(&mut self) -> Result<&'a Value> {
		let items = self.items;
		let Some(item) = items.get(self.index) else {
			return Err(self.exhausted());
		};
		self.index += 1;
		Ok(item)
	}

	fn exhausted(&self) -> CodecError {
		CodecError::StructuralExhaustion {
			path: self.scope.path.render(),
			index: self.index,
		}
	}
}

impl fmt::Debug for UnkeyedDecoder<'_> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("UnkeyedDecoder")
			.field("len", &self.items.len())
			.field("index", &self.index)
			.finish()
	}
}

/// Single-value view over one node.
pub struct ScalarDecoder<'a> {
	node: &'a Value,
	scope: Scope<'a>,
}

impl<'a> ScalarDecoder<'a> {
	/// Coerce the node into `T`.
	pub fn read<T: Coerce>(&self) -> T {
		T::coerce(self.node)
	}

	/// True only when the node is null.
	pub fn check_null(&self) -> bool {
		self.node.is_null()
	}

	/// Decode the node through `T`'s own logic, for wrapper types.
	pub fn read_structured<T: Decode>(&self) -> Result<T> {
		self.scope.decode(self.node)
	}

	/// Node this view reads from.
	pub fn node(&self) -> &'a Value {
		self.node
	}
}

impl fmt::Debug for ScalarDecoder<'_> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ScalarDecoder").field("kind", &self.node.kind()).finish()
	}
}

#[cfg(test)]
mod tests;
