mod alias;
mod coerce;
mod convert;
mod decode;
mod encode;
mod entry;
mod error;
mod format;
mod path;
mod serde_impl;
mod value;

/// Per-type alternate key table.
pub use alias::KeyAliases;
/// Lenient scalar coercion matrix and the reverse scalar-to-value mapping.
pub use coerce::{Coerce, IntoValue, coerce, is_null};
/// Decode session, containers, options, and the `Decode` trait.
pub use decode::{Decode, DecodeOptions, DecodeSession, Decoder, KeyedDecoder, ScalarDecoder, UnkeyedDecoder};
/// Encode session, containers, and the `Encode` trait.
pub use encode::{Encode, EncodeSession, Encoder, KeyedEncoder, ScalarEncoder, UnkeyedEncoder};
/// Top-level conversion entry points and output representations.
pub use entry::{Output, Representation, encode_as, from_slice, from_str, from_value, from_value_with, to_string, to_value, to_vec};
/// Error and result aliases.
pub use error::{CodecError, ErrorKind, Result};
/// Output formatting options applied to finished trees.
pub use format::{FormatOptions, KeyStyle, snake_case};
/// Path segments, parsed field paths, and the traversal path stack.
pub use path::{FieldPath, PathFrame, PathRestore, PathSegment, PathStack, render_path};
/// Value tree types.
pub use value::{Entry, ObjectValue, Value, ValueKind};
