// Copyright 2019-2021 Parity Technologies (UK) Ltd.
// This file is part of chainschema.
//
// chainschema is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// chainschema is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with chainschema.  If not, see <http://www.gnu.org/licenses/>.

//! Given a [`SchemaSet`] and a [`Schema`] from it, this module decodes SCALE encoded bytes into a [`Value`].
//!
//! See [`decode_value`] to decode from a cursor, and [`decode_all`] to decode a complete buffer and
//! find out whether any bytes were left over.

mod decode_value;

use crate::schema::{Schema, SchemaSet, UInt};
use crate::value::Value;
use std::fmt;

/// How deep schema nodes may nest before decoding gives up, unless configured otherwise.
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// The most elements a sequence of a zero sized type may claim. Such elements consume no input,
/// so the input length can't bound how many of them a length prefix asks for.
pub const MAX_ZERO_SIZED_ELEMENTS: usize = 1 << 16;

/// Knobs for the decode engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeOptions {
	/// The maximum number of nested schema nodes entered while decoding a single value.
	pub max_depth: usize,
}

impl Default for DecodeOptions {
	fn default() -> Self {
		DecodeOptions { max_depth: DEFAULT_MAX_DEPTH }
	}
}

/// An error decoding a value, along with where in the value it happened.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}{}", DisplayPath(.path))]
pub struct DecodeError {
	kind: DecodeErrorKind,
	path: Vec<PathSegment>,
}

impl DecodeError {
	pub fn kind(&self) -> &DecodeErrorKind {
		&self.kind
	}

	/// The location of the failure, outermost segment first. Empty if it failed at the root.
	pub fn path(&self) -> &[PathSegment] {
		&self.path
	}

	pub fn into_kind(self) -> DecodeErrorKind {
		self.kind
	}

	pub(crate) fn at(mut self, segment: PathSegment) -> Self {
		self.path.insert(0, segment);
		self
	}
}

impl From<DecodeErrorKind> for DecodeError {
	fn from(kind: DecodeErrorKind) -> Self {
		DecodeError { kind, path: Vec::new() }
	}
}

/// What went wrong while decoding.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeErrorKind {
	#[error("Ran out of data: needed {needed} bytes but only {remaining} remain")]
	Truncated { needed: usize, remaining: usize },
	#[error("Invalid encoding: {0}")]
	InvalidEncoding(InvalidEncoding),
	#[error("No variant alternative has index {0}")]
	UnknownVariant(u32),
	#[error("Cannot find type '{0}' in the schema set")]
	UnknownSchemaRef(String),
	#[error("Exceeded the maximum nesting depth of {0}")]
	DepthLimitExceeded(usize),
}

/// Bytes that can never be produced by a correct encoder.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidEncoding {
	#[error("option presence byte must be 0 or 1, got {0}")]
	OptionPresence(u8),
	#[error("bool must be 0 or 1, got {0}")]
	Bool(u8),
	#[error("string is not valid utf8: {0}")]
	Utf8(std::str::Utf8Error),
	#[error("compact prefix {0:#04x} describes more than 16 bytes")]
	CompactPrefix(u8),
	#[error("compact integer does not use its shortest form")]
	NonCanonicalCompact,
	#[error("compact integer {value} does not fit into {target}")]
	CompactOutOfRange { value: u128, target: UInt },
	#[error("sequence of {len} zero sized elements exceeds the limit of {}", MAX_ZERO_SIZED_ELEMENTS)]
	ZeroSizedSequence { len: usize },
}

/// One step on the way from the root value to the point of failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
	/// A named struct or variant field.
	Field(String),
	/// A tuple, array or sequence element, or an unnamed variant field.
	Index(usize),
	/// The variant alternative that was selected.
	Variant(String),
}

impl fmt::Display for PathSegment {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			PathSegment::Field(name) => write!(f, ".{}", name),
			PathSegment::Index(idx) => write!(f, "[{}]", idx),
			PathSegment::Variant(name) => write!(f, "::{}", name),
		}
	}
}

struct DisplayPath<'a>(&'a [PathSegment]);

impl fmt::Display for DisplayPath<'_> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		if self.0.is_empty() {
			return Ok(());
		}
		f.write_str(" at ")?;
		for segment in self.0 {
			write!(f, "{}", segment)?;
		}
		Ok(())
	}
}

/// Bytes left over after decoding a complete value. This is not an error; the value decoded fine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("{count} bytes were left over after decoding")]
pub struct TrailingBytes {
	pub count: usize,
}

/// The result of [`decode_all`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoded {
	pub value: Value,
	pub trailing: Option<TrailingBytes>,
}

/// Decode a single [`Value`] shaped like `schema` from the front of `data`, advancing the cursor
/// past the bytes consumed. Any [`Schema::Ref`] is resolved against `set`.
pub fn decode_value(set: &SchemaSet, schema: &Schema, data: &mut &[u8]) -> Result<Value, DecodeError> {
	decode_value_with(set, schema, data, &DecodeOptions::default())
}

/// Like [`decode_value`], but with explicit [`DecodeOptions`].
pub fn decode_value_with(
	set: &SchemaSet,
	schema: &Schema,
	data: &mut &[u8],
	options: &DecodeOptions,
) -> Result<Value, DecodeError> {
	log::trace!("decoding {} from set '{}' ({} bytes)", schema.describe(), set.name(), data.len());
	decode_value::decode(set, schema, data, options)
}

/// Decode a complete buffer. Leftover bytes are reported in [`Decoded::trailing`] rather than as an error.
pub fn decode_all(set: &SchemaSet, schema: &Schema, bytes: &[u8]) -> Result<Decoded, DecodeError> {
	decode_all_with(set, schema, bytes, &DecodeOptions::default())
}

/// Like [`decode_all`], but with explicit [`DecodeOptions`].
pub fn decode_all_with(
	set: &SchemaSet,
	schema: &Schema,
	bytes: &[u8],
	options: &DecodeOptions,
) -> Result<Decoded, DecodeError> {
	let cursor = &mut &*bytes;
	let value = decode_value_with(set, schema, cursor, options)?;
	let trailing = if cursor.is_empty() { None } else { Some(TrailingBytes { count: cursor.len() }) };
	Ok(Decoded { value, trailing })
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn errors_display_their_path() {
		let err = DecodeError::from(DecodeErrorKind::UnknownVariant(7))
			.at(PathSegment::Index(2))
			.at(PathSegment::Variant("Transact".into()))
			.at(PathSegment::Field("message".into()));
		assert_eq!(
			err.path(),
			&[
				PathSegment::Field("message".into()),
				PathSegment::Variant("Transact".into()),
				PathSegment::Index(2)
			]
		);
		assert_eq!(err.to_string(), "No variant alternative has index 7 at .message::Transact[2]");
	}

	#[test]
	fn root_errors_have_no_path() {
		let err = DecodeError::from(DecodeErrorKind::Truncated { needed: 4, remaining: 1 });
		assert!(err.path().is_empty());
		assert_eq!(err.to_string(), "Ran out of data: needed 4 bytes but only 1 remain");
	}
}
