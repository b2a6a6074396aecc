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

/*!
The in-memory description of how some SCALE encoded bytes are laid out.

A [`Schema`] is a node in a type tree. Trees may point at named entries of their
enclosing [`SchemaSet`] through [`Schema::Ref`], which is resolved lazily while
decoding; this is how recursive types (eg an instruction whose variant holds a
list of instructions) are expressed.
*/

mod set;

pub use set::{SchemaError, SchemaSet, SchemaSetBuilder};

use derive_more::Display;

/// The shape of some encoded data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Schema {
	/// A leaf value; see [`PrimitiveKind`].
	Primitive(PrimitiveKind),
	/// Named fields, decoded in declaration order.
	Struct(Vec<Field>),
	/// A closed tagged union.
	Variant(VariantDef),
	/// A presence byte followed by the inner value if the byte is `1`.
	Option(Box<Schema>),
	/// A compact encoded length followed by that many elements.
	Sequence(Box<Schema>),
	/// Exactly `len` elements with no length prefix.
	Array { len: usize, inner: Box<Schema> },
	/// A fixed number of heterogeneous, positional elements.
	Tuple(Vec<Schema>),
	/// A reference to a named entry of the enclosing [`SchemaSet`].
	Ref(String),
}

impl Schema {
	pub fn bool() -> Schema {
		Schema::Primitive(PrimitiveKind::Bool)
	}
	pub fn u8() -> Schema {
		Schema::Primitive(PrimitiveKind::U8)
	}
	pub fn u16() -> Schema {
		Schema::Primitive(PrimitiveKind::U16)
	}
	pub fn u32() -> Schema {
		Schema::Primitive(PrimitiveKind::U32)
	}
	pub fn u64() -> Schema {
		Schema::Primitive(PrimitiveKind::U64)
	}
	pub fn u128() -> Schema {
		Schema::Primitive(PrimitiveKind::U128)
	}
	pub fn compact(width: UInt) -> Schema {
		Schema::Primitive(PrimitiveKind::Compact(width))
	}
	pub fn bytes() -> Schema {
		Schema::Primitive(PrimitiveKind::Bytes)
	}
	pub fn fixed_bytes(len: usize) -> Schema {
		Schema::Primitive(PrimitiveKind::FixedBytes(len))
	}
	pub fn str() -> Schema {
		Schema::Primitive(PrimitiveKind::Str)
	}
	pub fn option(inner: Schema) -> Schema {
		Schema::Option(Box::new(inner))
	}
	pub fn sequence(inner: Schema) -> Schema {
		Schema::Sequence(Box::new(inner))
	}
	pub fn array(len: usize, inner: Schema) -> Schema {
		Schema::Array { len, inner: Box::new(inner) }
	}
	pub fn tuple(elements: Vec<Schema>) -> Schema {
		Schema::Tuple(elements)
	}
	pub fn reference(name: impl Into<String>) -> Schema {
		Schema::Ref(name.into())
	}

	/// A struct from `(name, schema)` pairs, in declaration order.
	pub fn named_struct<S: Into<String>>(fields: impl IntoIterator<Item = (S, Schema)>) -> Schema {
		Schema::Struct(fields.into_iter().map(|(name, schema)| Field::new(name, schema)).collect())
	}

	/// A variant with a single byte tag.
	pub fn variant(alternatives: Vec<Alternative>) -> Schema {
		Schema::Variant(VariantDef { tag: TagWidth::U8, alternatives })
	}

	/// A short description of the node, used in error messages.
	pub fn describe(&self) -> String {
		match self {
			Schema::Primitive(kind) => kind.to_string(),
			Schema::Struct(_) => "struct".to_string(),
			Schema::Variant(_) => "variant".to_string(),
			Schema::Option(_) => "option".to_string(),
			Schema::Sequence(_) => "sequence".to_string(),
			Schema::Array { len, .. } => format!("array of {}", len),
			Schema::Tuple(els) => format!("{}-tuple", els.len()),
			Schema::Ref(name) => format!("ref '{}'", name),
		}
	}
}

/// The leaf types understood by [`crate::primitive`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum PrimitiveKind {
	#[display(fmt = "bool")]
	Bool,
	#[display(fmt = "u8")]
	U8,
	#[display(fmt = "u16")]
	U16,
	#[display(fmt = "u32")]
	U32,
	#[display(fmt = "u64")]
	U64,
	#[display(fmt = "u128")]
	U128,
	#[display(fmt = "i8")]
	I8,
	#[display(fmt = "i16")]
	I16,
	#[display(fmt = "i32")]
	I32,
	#[display(fmt = "i64")]
	I64,
	#[display(fmt = "i128")]
	I128,
	/// A compact encoded unsigned integer which must fit in the given width.
	#[display(fmt = "Compact<{}>", _0)]
	Compact(UInt),
	/// Compact length prefixed raw bytes.
	#[display(fmt = "bytes")]
	Bytes,
	/// Exactly `N` raw bytes.
	#[display(fmt = "[u8; {}]", _0)]
	FixedBytes(usize),
	/// Compact length prefixed UTF-8.
	#[display(fmt = "str")]
	Str,
}

/// Unsigned integer widths, used by compact integers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display)]
pub enum UInt {
	#[display(fmt = "u8")]
	U8,
	#[display(fmt = "u16")]
	U16,
	#[display(fmt = "u32")]
	U32,
	#[display(fmt = "u64")]
	U64,
	#[display(fmt = "u128")]
	U128,
}

impl UInt {
	pub fn max_value(self) -> u128 {
		match self {
			UInt::U8 => u8::MAX as u128,
			UInt::U16 => u16::MAX as u128,
			UInt::U32 => u32::MAX as u128,
			UInt::U64 => u64::MAX as u128,
			UInt::U128 => u128::MAX,
		}
	}
}

/// A named field of a struct or of a struct-like variant alternative.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
	pub name: String,
	pub schema: Schema,
}

impl Field {
	pub fn new(name: impl Into<String>, schema: Schema) -> Field {
		Field { name: name.into(), schema }
	}
}

/// The fields carried by a variant alternative.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fields {
	/// No associated data, eg `None`.
	Unit,
	/// Struct-like, eg `Transfer { dest, value }`.
	Named(Vec<Field>),
	/// Positional, eg `Some(u8)`.
	Unnamed(Vec<Schema>),
}

impl Fields {
	pub fn len(&self) -> usize {
		match self {
			Fields::Unit => 0,
			Fields::Named(fields) => fields.len(),
			Fields::Unnamed(fields) => fields.len(),
		}
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// Iterate over the schema of each field in order.
	pub fn schemas(&self) -> Box<dyn Iterator<Item = &Schema> + '_> {
		match self {
			Fields::Unit => Box::new(std::iter::empty()),
			Fields::Named(fields) => Box::new(fields.iter().map(|f| &f.schema)),
			Fields::Unnamed(fields) => Box::new(fields.iter()),
		}
	}
}

/// The width of the tag that selects a variant alternative. Tags are little endian.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum TagWidth {
	#[display(fmt = "u8")]
	U8,
	#[display(fmt = "u16")]
	U16,
	#[display(fmt = "u32")]
	U32,
}

impl TagWidth {
	pub fn max_value(self) -> u32 {
		match self {
			TagWidth::U8 => u8::MAX as u32,
			TagWidth::U16 => u16::MAX as u32,
			TagWidth::U32 => u32::MAX,
		}
	}
}

impl Default for TagWidth {
	fn default() -> Self {
		TagWidth::U8
	}
}

/// A closed, exhaustively enumerated tagged union.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantDef {
	pub tag: TagWidth,
	pub alternatives: Vec<Alternative>,
}

impl VariantDef {
	pub fn new(tag: TagWidth, alternatives: Vec<Alternative>) -> VariantDef {
		VariantDef { tag, alternatives }
	}

	/// Find the alternative selected by a decoded tag.
	pub fn by_index(&self, index: u32) -> Option<&Alternative> {
		self.alternatives.iter().find(|a| a.index == index)
	}

	pub fn by_name(&self, name: &str) -> Option<&Alternative> {
		self.alternatives.iter().find(|a| a.name == name)
	}
}

/// One alternative of a [`VariantDef`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alternative {
	pub index: u32,
	pub name: String,
	pub fields: Fields,
}

impl Alternative {
	pub fn unit(index: u32, name: impl Into<String>) -> Alternative {
		Alternative { index, name: name.into(), fields: Fields::Unit }
	}

	pub fn unnamed(index: u32, name: impl Into<String>, fields: Vec<Schema>) -> Alternative {
		Alternative { index, name: name.into(), fields: Fields::Unnamed(fields) }
	}

	pub fn named<S: Into<String>>(
		index: u32,
		name: impl Into<String>,
		fields: impl IntoIterator<Item = (S, Schema)>,
	) -> Alternative {
		let fields = fields.into_iter().map(|(n, s)| Field::new(n, s)).collect();
		Alternative { index, name: name.into(), fields: Fields::Named(fields) }
	}
}
