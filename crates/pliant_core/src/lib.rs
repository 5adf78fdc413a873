//! Public library API for tolerant conversion between typed data and a generic value tree.

/// Value tree, coercion matrix, path tracking, and decode/encode sessions.
pub mod codec;
