use std::cell::{Cell, RefCell};
use std::fmt;

use indexmap::IndexMap;

use crate::codec::{CodecError, IntoValue, ObjectValue, PathRestore, PathSegment, PathStack, Result, Value, render_path};

/// A type that can describe itself to an [`Encoder`].
pub trait Encode {
	/// Write `self` into the encoder's node.
	fn encode(&self, encoder: &Encoder<'_>) -> Result<()>;
}

type NodeId = usize;

/// Value or not-yet-flattened child container stored in a parent.
#[derive(Debug)]
enum Slot {
	Literal(Value),
	Child(NodeId),
}

#[derive(Debug)]
enum Node {
	Keyed(IndexMap<Box<str>, Slot>),
	Unkeyed(Vec<Slot>),
	Scalar(Option<Slot>),
}

/// Session-owned storage for every container of one encode call.
#[derive(Debug, Default)]
struct Arena {
	nodes: RefCell<Vec<Node>>,
}

impl Arena {
	fn alloc(&self, node: Node) -> NodeId {
		let mut nodes = self.nodes.borrow_mut();
		nodes.push(node);
		nodes.len() - 1
	}

	fn with_node<R>(&self, id: NodeId, f: impl FnOnce(&mut Node) -> R) -> R {
		f(&mut self.nodes.borrow_mut()[id])
	}

	fn flatten(&self, id: NodeId) -> Value {
		let nodes = self.nodes.borrow();
		flatten_node(&nodes, id)
	}
}

fn flatten_node(nodes: &[Node], id: NodeId) -> Value {
	match &nodes[id] {
		Node::Keyed(entries) => {
			let mut object = ObjectValue::with_capacity(entries.len());
			for (key, slot) in entries {
				object.insert(key.clone(), flatten_slot(nodes, slot));
			}
			Value::Object(object)
		}
		Node::Unkeyed(slots) => Value::Array(slots.iter().map(|slot| flatten_slot(nodes, slot)).collect()),
		Node::Scalar(slot) => slot.as_ref().map_or(Value::Null, |slot| flatten_slot(nodes, slot)),
	}
}

fn flatten_slot(nodes: &[Node], slot: &Slot) -> Value {
	match slot {
		Slot::Literal(value) => value.clone(),
		Slot::Child(id) => flatten_node(nodes, *id),
	}
}

/// Owner of the path stack and container arena for one top-level encode call.
#[derive(Debug, Default)]
pub struct EncodeSession {
	path: PathStack,
	arena: Arena,
	claimed: Cell<bool>,
}

impl EncodeSession {
	/// Fresh session.
	pub fn new() -> Self {
		Self::default()
	}

	/// Root encoder.
	///
	/// A session opens exactly one top-level container across all of its root
	/// encoders; a second claim fails with an invariant violation.
	pub fn encoder(&self) -> Encoder<'_> {
		Encoder {
			session_claim: Some(&self.claimed),
			..Encoder::new(self.scope())
		}
	}

	/// Encode `value` and flatten the result; a session encodes one value.
	pub fn encode<T: Encode + ?Sized>(&self, value: &T) -> Result<Value> {
		let encoder = self.encoder();
		value.encode(&encoder)?;
		Ok(encoder.finish())
	}

	/// Live traversal path.
	pub fn path(&self) -> &PathStack {
		&self.path
	}

	fn scope(&self) -> Scope<'_> {
		Scope {
			path: &self.path,
			arena: &self.arena,
		}
	}
}

#[derive(Clone, Copy)]
struct Scope<'a> {
	path: &'a PathStack,
	arena: &'a Arena,
}

impl<'a> Scope<'a> {
	/// Encode `value` through a child encoder and return the slot that will hold it.
	fn encode_child<T: Encode + ?Sized>(self, value: &T) -> Result<Slot> {
		let child = Encoder::new(self);
		value.encode(&child)?;
		Ok(child.into_slot())
	}
}

/// Encoding sink for one node.
pub struct Encoder<'a> {
	scope: Scope<'a>,
	root: Cell<Option<NodeId>>,
	session_claim: Option<&'a Cell<bool>>,
}

impl<'a> Encoder<'a> {
	fn new(scope: Scope<'a>) -> Self {
		Self {
			scope,
			root: Cell::new(None),
			session_claim: None,
		}
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

	/// Claim a keyed container for this node.
	pub fn keyed(&self) -> Result<KeyedEncoder<'a>> {
		let id = self.claim(Node::Keyed(IndexMap::new()))?;
		Ok(KeyedEncoder {
			id,
			scope: self.scope,
			prefix: self.scope.path.snapshot(),
		})
	}

	/// Claim a positional container for this node.
	pub fn unkeyed(&self) -> Result<UnkeyedEncoder<'a>> {
		let id = self.claim(Node::Unkeyed(Vec::new()))?;
		Ok(UnkeyedEncoder {
			id,
			scope: self.scope,
			prefix: self.scope.path.snapshot(),
		})
	}

	/// Claim a single-value container for this node.
	pub fn scalar(&self) -> Result<ScalarEncoder<'a>> {
		let id = self.claim(Node::Scalar(None))?;
		Ok(ScalarEncoder {
			id,
			scope: self.scope,
			prefix: self.scope.path.snapshot(),
		})
	}

	/// Flatten everything written through this encoder; `Null` when no container was claimed.
	pub fn finish(self) -> Value {
		match self.root.get() {
			Some(id) => self.scope.arena.flatten(id),
			None => Value::Null,
		}
	}

	fn claim(&self, node: Node) -> Result<NodeId> {
		if self.root.get().is_some() {
			return Err(CodecError::InvariantViolation {
				path: self.current_path(),
				reason: "encoder already handed out a container",
			});
		}
		if self.session_claim.is_some_and(|claimed| claimed.replace(true)) {
			return Err(CodecError::InvariantViolation {
				path: self.current_path(),
				reason: "session already opened a top-level container",
			});
		}
		let id = self.scope.arena.alloc(node);
		self.root.set(Some(id));
		Ok(id)
	}

	fn into_slot(self) -> Slot {
		match self.root.get() {
			Some(id) => Slot::Child(id),
			None => Slot::Literal(Value::Null),
		}
	}
}

impl fmt::Debug for Encoder<'_> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Encoder")
			.field("claimed", &self.root.get().is_some())
			.field("path", &self.current_path())
			.finish()
	}
}

/// Name-addressed accumulator for an object node.
///
/// The container remembers its own path, so writes stay correctly addressed
/// while sibling or child containers are alive.
pub struct KeyedEncoder<'a> {
	id: NodeId,
	scope: Scope<'a>,
	prefix: Vec<PathSegment>,
}

impl<'a> KeyedEncoder<'a> {
	/// Store a scalar under `key`.
	pub fn write_scalar(&mut self, key: &str, value: impl IntoValue) {
		let _path = self.enter(key);
		self.insert(key, Slot::Literal(value.into_value()));
	}

	/// Store null under `key`.
	pub fn write_null(&mut self, key: &str) {
		self.write_scalar(key, Value::Null);
	}

	/// Encode `value` under `key` through its own logic.
	pub fn write<T: Encode + ?Sized>(&mut self, key: &str, value: &T) -> Result<()> {
		let _path = self.enter(key);
		let slot = self.scope.encode_child(value)?;
		self.insert(key, slot);
		Ok(())
	}

	/// Encode `value` under `key` only when it is present.
	pub fn write_if_present<T: Encode>(&mut self, key: &str, value: Option<&T>) -> Result<()> {
		match value {
			Some(value) => self.write(key, value),
			None => Ok(()),
		}
	}

	/// Register a keyed child under `key`; it is flattened when this container is.
	pub fn nested_keyed(&mut self, key: &str) -> KeyedEncoder<'a> {
		let id = self.scope.arena.alloc(Node::Keyed(IndexMap::new()));
		self.insert(key, Slot::Child(id));
		KeyedEncoder {
			id,
			scope: self.scope,
			prefix: self.child_prefix(key),
		}
	}

	/// Register a positional child under `key`; it is flattened when this container is.
	pub fn nested_unkeyed(&mut self, key: &str) -> UnkeyedEncoder<'a> {
		let id = self.scope.arena.alloc(Node::Unkeyed(Vec::new()));
		self.insert(key, Slot::Child(id));
		UnkeyedEncoder {
			id,
			scope: self.scope,
			prefix: self.child_prefix(key),
		}
	}

	fn child_prefix(&self, key: &str) -> Vec<PathSegment> {
		let mut prefix = self.prefix.clone();
		prefix.push(PathSegment::field(key));
		prefix
	}

	fn enter(&self, key: &str) -> PathRestore<'a> {
		self.scope.path.enter(self.child_prefix(key))
	}

	fn insert(&self, key: &str, slot: Slot) {
		self.scope.arena.with_node(self.id, |node| {
			if let Node::Keyed(entries) = node {
				entries.insert(key.into(), slot);
			}
		});
	}
}

impl fmt::Debug for KeyedEncoder<'_> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("KeyedEncoder").field("id", &self.id).finish()
	}
}

/// Positional accumulator for an array node.
pub struct UnkeyedEncoder<'a> {
	id: NodeId,
	scope: Scope<'a>,
	prefix: Vec<PathSegment>,
}

impl<'a> UnkeyedEncoder<'a> {
	/// Number of elements appended so far.
	pub fn count(&self) -> usize {
		self.scope.arena.with_node(self.id, |node| match node {
			Node::Unkeyed(slots) => slots.len(),
			_ => 0,
		})
	}

	/// Append a scalar.
	pub fn push_scalar(&mut self, value: impl IntoValue) {
		let _path = self.enter();
		self.append(Slot::Literal(value.into_value()));
	}

	/// Append null.
	pub fn push_null(&mut self) {
		self.push_scalar(Value::Null);
	}

	/// Append `value` encoded through its own logic.
	pub fn push<T: Encode + ?Sized>(&mut self, value: &T) -> Result<()> {
		let _path = self.enter();
		let slot = self.scope.encode_child(value)?;
		self.append(slot);
		Ok(())
	}

	/// Append a keyed child flattened together with this container.
	pub fn nested_keyed(&mut self) -> KeyedEncoder<'a> {
		let prefix = self.next_prefix();
		let id = self.scope.arena.alloc(Node::Keyed(IndexMap::new()));
		self.append(Slot::Child(id));
		KeyedEncoder {
			id,
			scope: self.scope,
			prefix,
		}
	}

	/// Append a positional child flattened together with this container.
	pub fn nested_unkeyed(&mut self) -> UnkeyedEncoder<'a> {
		let prefix = self.next_prefix();
		let id = self.scope.arena.alloc(Node::Unkeyed(Vec::new()));
		self.append(Slot::Child(id));
		UnkeyedEncoder {
			id,
			scope: self.scope,
			prefix,
		}
	}

	fn next_prefix(&self) -> Vec<PathSegment> {
		let mut prefix = self.prefix.clone();
		prefix.push(PathSegment::Index(self.count()));
		prefix
	}

	fn enter(&self) -> PathRestore<'a> {
		self.scope.path.enter(self.next_prefix())
	}

	fn append(&self, slot: Slot) {
		self.scope.arena.with_node(self.id, |node| {
			if let Node::Unkeyed(slots) = node {
				slots.push(slot);
			}
		});
	}
}

impl fmt::Debug for UnkeyedEncoder<'_> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("UnkeyedEncoder").field("id", &self.id).field("count", &self.count()).finish()
	}
}

/// Accumulator holding at most one value.
pub struct ScalarEncoder<'a> {
	id: NodeId,
	scope: Scope<'a>,
	prefix: Vec<PathSegment>,
}

impl ScalarEncoder<'_> {
	/// Store a scalar; a second write is rejected.
	pub fn write_scalar(&mut self, value: impl IntoValue) -> Result<()> {
		self.store(Slot::Literal(value.into_value()))
	}

	/// Store null.
	pub fn write_null(&mut self) -> Result<()> {
		self.write_scalar(Value::Null)
	}

	/// Store `value` encoded through its own logic.
	pub fn write<T: Encode + ?Sized>(&mut self, value: &T) -> Result<()> {
		let slot = {
			let _path = self.scope.path.enter(self.prefix.clone());
			self.scope.encode_child(value)?
		};
		self.store(slot)
	}

	fn store(&self, slot: Slot) -> Result<()> {
		let stored = self.scope.arena.with_node(self.id, |node| match node {
			Node::Scalar(held @ None) => {
				*held = Some(slot);
				true
			}
			_ => false,
		});
		if !stored {
			return Err(CodecError::InvariantViolation {
				path: render_path(&self.prefix),
				reason: "scalar container already holds a value",
			});
		}
		Ok(())
	}
}

impl fmt::Debug for ScalarEncoder<'_> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ScalarEncoder").field("id", &self.id).finish()
	}
}
