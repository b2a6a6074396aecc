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

//! The JSON shape of a type expression, and its conversion into a [`Schema`].

use chainschema_core::schema::{Alternative, Field, Fields, PrimitiveKind, Schema, TagWidth, UInt, VariantDef};
use serde::Deserialize;

/// A type expression: either a bare name, or a single-key object describing a node.
///
/// Bare names are primitives (`"u32"`, `"bytes"`, ...) if they match one, and references
/// to another type in the same schema set otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum TypeExpr {
	Name(String),
	Node(Box<NodeExpr>),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NodeExpr {
	Ref(String),
	Compact(UIntExpr),
	FixedBytes(usize),
	Option(TypeExpr),
	Sequence(TypeExpr),
	Array {
		len: usize,
		#[serde(rename = "type")]
		ty: TypeExpr,
	},
	Tuple(Vec<TypeExpr>),
	Struct(Vec<FieldExpr>),
	Variant(VariantExpr),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UIntExpr {
	U8,
	U16,
	U32,
	U64,
	U128,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TagExpr {
	#[default]
	U8,
	U16,
	U32,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FieldExpr {
	pub name: String,
	#[serde(rename = "type")]
	pub ty: TypeExpr,
}

/// Either a bare list of alternatives (with a `u8` tag), or an object naming the tag width.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum VariantExpr {
	List(Vec<AlternativeExpr>),
	Tagged {
		#[serde(default)]
		tag: TagExpr,
		alternatives: Vec<AlternativeExpr>,
	},
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AlternativeExpr {
	/// Defaults to the alternative's position in the list.
	#[serde(default)]
	pub index: Option<u32>,
	pub name: String,
	#[serde(default)]
	pub fields: Option<FieldsExpr>,
}

// Named is tried first; a list of type expressions never has `name` keys.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum FieldsExpr {
	Named(Vec<FieldExpr>),
	Unnamed(Vec<TypeExpr>),
}

fn primitive_by_name(name: &str) -> Option<PrimitiveKind> {
	let kind = match name {
		"bool" => PrimitiveKind::Bool,
		"u8" => PrimitiveKind::U8,
		"u16" => PrimitiveKind::U16,
		"u32" => PrimitiveKind::U32,
		"u64" => PrimitiveKind::U64,
		"u128" => PrimitiveKind::U128,
		"i8" => PrimitiveKind::I8,
		"i16" => PrimitiveKind::I16,
		"i32" => PrimitiveKind::I32,
		"i64" => PrimitiveKind::I64,
		"i128" => PrimitiveKind::I128,
		"str" => PrimitiveKind::Str,
		"bytes" => PrimitiveKind::Bytes,
		_ => return None,
	};
	Some(kind)
}

impl From<UIntExpr> for UInt {
	fn from(expr: UIntExpr) -> Self {
		match expr {
			UIntExpr::U8 => UInt::U8,
			UIntExpr::U16 => UInt::U16,
			UIntExpr::U32 => UInt::U32,
			UIntExpr::U64 => UInt::U64,
			UIntExpr::U128 => UInt::U128,
		}
	}
}

impl From<TagExpr> for TagWidth {
	fn from(expr: TagExpr) -> Self {
		match expr {
			TagExpr::U8 => TagWidth::U8,
			TagExpr::U16 => TagWidth::U16,
			TagExpr::U32 => TagWidth::U32,
		}
	}
}

impl TypeExpr {
	pub fn to_schema(&self) -> Schema {
		match self {
			TypeExpr::Name(name) => match primitive_by_name(name) {
				Some(kind) => Schema::Primitive(kind),
				None => Schema::Ref(name.clone()),
			},
			TypeExpr::Node(node) => node.to_schema(),
		}
	}
}

impl NodeExpr {
	pub fn to_schema(&self) -> Schema {
		match self {
			NodeExpr::Ref(name) => Schema::Ref(name.clone()),
			NodeExpr::Compact(width) => Schema::compact((*width).into()),
			NodeExpr::FixedBytes(len) => Schema::fixed_bytes(*len),
			NodeExpr::Option(inner) => Schema::option(inner.to_schema()),
			NodeExpr::Sequence(inner) => Schema::sequence(inner.to_schema()),
			NodeExpr::Array { len, ty } => Schema::array(*len, ty.to_schema()),
			NodeExpr::Tuple(elements) => Schema::Tuple(elements.iter().map(TypeExpr::to_schema).collect()),
			NodeExpr::Struct(fields) => Schema::Struct(fields.iter().map(FieldExpr::to_field).collect()),
			NodeExpr::Variant(variant) => Schema::Variant(variant.to_def()),
		}
	}
}

impl FieldExpr {
	fn to_field(&self) -> Field {
		Field::new(self.name.clone(), self.ty.to_schema())
	}
}

impl VariantExpr {
	fn to_def(&self) -> VariantDef {
		let (tag, alternatives) = match self {
			VariantExpr::List(alts) => (TagExpr::U8, alts),
			VariantExpr::Tagged { tag, alternatives } => (*tag, alternatives),
		};
		let alternatives = alternatives
			.iter()
			.enumerate()
			.map(|(pos, alt)| {
				let index = alt.index.unwrap_or(pos as u32);
				let fields = match &alt.fields {
					None => Fields::Unit,
					Some(FieldsExpr::Named(fields)) if fields.is_empty() => Fields::Unit,
					Some(FieldsExpr::Named(fields)) => Fields::Named(fields.iter().map(FieldExpr::to_field).collect()),
					Some(FieldsExpr::Unnamed(types)) => {
						Fields::Unnamed(types.iter().map(TypeExpr::to_schema).collect())
					}
				};
				Alternative { index, name: alt.name.clone(), fields }
			})
			.collect();
		VariantDef::new(tag.into(), alternatives)
	}
}
