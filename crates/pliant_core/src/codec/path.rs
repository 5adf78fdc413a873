use std::cell::RefCell;
use std::{fmt, mem};

use tracing::trace;

use crate::codec::{CodecError, Result};

/// One step of a traversal path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
	/// Named object member.
	Field(Box<str>),
	/// Zero-based sequence position.
	Index(usize),
}

impl PathSegment {
	/// Field segment from any string-like key.
	pub fn field(name: impl Into<Box<str>>) -> Self {
		Self::Field(name.into())
	}
}

impl fmt::Display for PathSegment {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Field(name) => f.write_str(name),
			Self::Index(index) => write!(f, "[{index}]"),
		}
	}
}

/// Render segments as `field.field[index].field`.
pub fn render_path(segments: &[PathSegment]) -> String {
	let mut out = String::new();
	for segment in segments {
		if matches!(segment, PathSegment::Field(_)) && !out.is_empty() {
			out.push('.');
		}
		out.push_str(&segment.to_string());
	}
	out
}

/// Parsed field path expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldPath {
	/// Ordered sequence of path segments.
	pub segments: Vec<PathSegment>,
}

impl FieldPath {
	/// Parse dotted field syntax with optional `[index]` selectors.
	///
	/// A path may start with an index (`[0].name`) to address root arrays.
	pub fn parse(input: &str) -> Result<Self> {
		if input.is_empty() {
			return Err(CodecError::InvalidFieldPath { path: input.to_owned() });
		}

		let bytes = input.as_bytes();
		let mut idx = 0_usize;
		let mut segments = Vec::new();

		while idx < bytes.len() {
			let start = idx;
			while idx < bytes.len() && is_ident_byte(bytes[idx]) {
				idx += 1;
			}

			if idx > start {
				segments.push(PathSegment::field(&input[start..idx]));
			} else if bytes[idx] != b'[' || !segments.is_empty() {
				return Err(CodecError::InvalidFieldPath { path: input.to_owned() });
			}

			while idx < bytes.len() && bytes[idx] == b'[' {
				idx += 1;
				let n_start = idx;
				while idx < bytes.len() && bytes[idx].is_ascii_digit() {
					idx += 1;
				}
				if idx == n_start || idx >= bytes.len() || bytes[idx] != b']' {
					return Err(CodecError::InvalidFieldPath { path: input.to_owned() });
				}

				let number = input[n_start..idx]
					.parse::<usize>()
					.map_err(|_| CodecError::InvalidFieldPath { path: input.to_owned() })?;
				segments.push(PathSegment::Index(number));
				idx += 1;
			}

			if idx < bytes.len() {
				if bytes[idx] != b'.' {
					return Err(CodecError::InvalidFieldPath { path: input.to_owned() });
				}
				idx += 1;
				if idx >= bytes.len() {
					return Err(CodecError::InvalidFieldPath { path: input.to_owned() });
				}
			}
		}

		Ok(Self { segments })
	}
}

impl fmt::Display for FieldPath {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&render_path(&self.segments))
	}
}

fn is_ident_byte(byte: u8) -> bool {
	byte.is_ascii_alphanumeric() || byte == b'_' || byte == b'-'
}

/// Traversal-scoped stack of path segments shared by a session and its containers.
#[derive(Debug, Default)]
pub struct PathStack {
	segments: RefCell<Vec<PathSegment>>,
}

impl PathStack {
	/// Empty stack.
	pub fn new() -> Self {
		Self::default()
	}

	/// Push `segment` and return a frame that restores the stack when dropped.
	///
	/// Every push emits a `trace` event carrying the rendered path.
	pub fn push(&self, segment: PathSegment) -> PathFrame<'_> {
		let depth = {
			let mut segments = self.segments.borrow_mut();
			let depth = segments.len();
			segments.push(segment);
			depth
		};
		trace!(path = %self.render(), "visit");
		PathFrame { stack: self, depth }
	}

	/// Replace the live segments with `segments` until the returned guard drops.
	///
	/// Used by containers that remember their own position instead of holding a
	/// frame, so interleaved writes from sibling containers each see their path.
	pub fn enter(&self, segments: Vec<PathSegment>) -> PathRestore<'_> {
		let saved = self.segments.replace(segments);
		trace!(path = %self.render(), "visit");
		PathRestore { stack: self, saved }
	}

	/// Number of live segments.
	pub fn depth(&self) -> usize {
		self.segments.borrow().len()
	}

	/// True when no segment is live.
	pub fn is_empty(&self) -> bool {
		self.segments.borrow().is_empty()
	}

	/// Copy of the live segments.
	pub fn snapshot(&self) -> Vec<PathSegment> {
		self.segments.borrow().clone()
	}

	/// Render the live segments as `field.field[index].field`.
	pub fn render(&self) -> String {
		render_path(&self.segments.borrow())
	}
}

/// Scoped ownership of one pushed segment.
///
/// Dropping the frame truncates the stack back to the depth it had before the
/// push, so early returns through `?` keep the stack consistent.
#[derive(Debug)]
#[must_use = "the segment is popped as soon as the frame is dropped"]
pub struct PathFrame<'a> {
	stack: &'a PathStack,
	depth: usize,
}

impl Drop for PathFrame<'_> {
	fn drop(&mut self) {
		self.stack.segments.borrow_mut().truncate(self.depth);
	}
}

/// Guard returned by [`PathStack::enter`]; puts the previous segments back on drop.
#[derive(Debug)]
#[must_use = "the previous path is restored as soon as the guard is dropped"]
pub struct PathRestore<'a> {
	stack: &'a PathStack,
	saved: Vec<PathSegment>,
}

impl Drop for PathRestore<'_> {
	fn drop(&mut self) {
		*self.stack.segments.borrow_mut() = mem::take(&mut self.saved);
	}
}
