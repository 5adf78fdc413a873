use thiserror::Error;

/// Crate-local result type.
pub type Result<T> = std::result::Result<T, CodecError>;

/// Coarse classification of a [`CodecError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
	/// A required positional element was absent.
	StructuralExhaustion,
	/// Programmer error such as claiming two containers on one session.
	InvariantViolation,
	/// A type's own conversion logic failed.
	NestedConversion,
	/// Text/byte representation or IO failure outside the value tree.
	Representation,
}

/// Errors produced while decoding, encoding, and formatting value trees.
///
/// Type mismatches are never reported here; the coercion matrix absorbs them.
#[derive(Debug, Error)]
pub enum CodecError {
	/// An unkeyed container was read past its last element.
	#[error("sequence exhausted at `{path}`: no element at index {index}")]
	StructuralExhaustion {
		/// Rendered path including the missing index.
		path: String,
		/// Index that was requested.
		index: usize,
	},
	/// Session or container misuse.
	#[error("invariant violated at `{path}`: {reason}")]
	InvariantViolation {
		/// Rendered path at the point of misuse.
		path: String,
		/// Short description of the violated rule.
		reason: &'static str,
	},
	/// Nested decoding went deeper than the configured limit.
	#[error("decode depth exceeded at `{path}` (max={max_depth})")]
	DepthExceeded {
		/// Rendered path where the limit was hit.
		path: String,
		/// Configured depth ceiling.
		max_depth: u32,
	},
	/// Requested output representation name is unknown.
	#[error("unsupported output representation: {name}")]
	UnsupportedRepresentation {
		/// User-provided representation name.
		name: String,
	},
	/// Failure raised by a type's own `Decode`/`Encode` logic.
	#[error("{message} (at `{path}`)")]
	Custom {
		/// Rendered path where the failure was raised.
		path: String,
		/// Failure description.
		message: String,
	},
	/// Field path expression syntax is invalid.
	#[error("invalid field path: {path}")]
	InvalidFieldPath {
		/// Original user-provided path string.
		path: String,
	},
	/// Alias declaration is not `canonical=alternate[,alternate...]`.
	#[error("invalid alias declaration: {alias}")]
	InvalidAlias {
		/// Original user-provided declaration.
		alias: String,
	},
	/// Text could not be parsed or the tree could not be written.
	#[error("json: {0}")]
	Json(#[from] serde_json::Error),
	/// Filesystem or stream IO failure.
	#[error("io: {0}")]
	Io(#[from] std::io::Error),
}

impl CodecError {
	/// Classification used by callers that branch on failure class.
	pub fn kind(&self) -> ErrorKind {
		match self {
			Self::StructuralExhaustion { .. } => ErrorKind::StructuralExhaustion,
			Self::InvariantViolation { .. } | Self::DepthExceeded { .. } | Self::UnsupportedRepresentation { .. } => ErrorKind::InvariantViolation,
			Self::Custom { .. } => ErrorKind::NestedConversion,
			Self::InvalidFieldPath { .. } | Self::InvalidAlias { .. } | Self::Json(_) | Self::Io(_) => ErrorKind::Representation,
		}
	}

	/// Rendered traversal path attached to the error, when it has one.
	pub fn path(&self) -> Option<&str> {
		match self {
			Self::StructuralExhaustion { path, .. } | Self::InvariantViolation { path, .. } | Self::DepthExceeded { path, .. } | Self::Custom { path, .. } => {
				Some(path)
			}
			_ => None,
		}
	}
}
