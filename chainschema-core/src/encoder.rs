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

//! The inverse of [`crate::decoder`]: SCALE encode a [`Value`] according to a [`Schema`].
//!
//! This is mostly useful for building test inputs and for tooling that needs to produce bytes
//! which the decoder will accept.

use crate::schema::{Field, Fields, PrimitiveKind, Schema, SchemaSet, TagWidth};
use crate::value::{Composite, Primitive, Value};
use codec::{Compact, Encode};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EncodeError {
	#[error("Expected a value matching {expected}, got a {got}")]
	TypeMismatch { expected: String, got: &'static str },
	#[error("Value does not fit into {0}")]
	OutOfRange(PrimitiveKind),
	#[error("No variant alternative named '{0}'")]
	UnknownVariant(String),
	#[error("Cannot find type '{0}' in the schema set")]
	UnknownSchemaRef(String),
	#[error("Expected {expected} elements, got {got}")]
	LengthMismatch { expected: usize, got: usize },
	#[error("Missing field '{0}'")]
	MissingField(String),
	#[error("Variant index {index} does not fit into a {width} tag")]
	TagOutOfRange { index: u32, width: TagWidth },
}

/// Encode `value` as `schema` into the `out` buffer.
pub fn encode_value(set: &SchemaSet, schema: &Schema, value: &Value, out: &mut Vec<u8>) -> Result<(), EncodeError> {
	match schema {
		Schema::Primitive(kind) => match value {
			Value::Primitive(prim) => encode_primitive(kind, prim, out),
			other => Err(mismatch(schema, other)),
		},
		Schema::Struct(fields) => match value {
			Value::Composite(composite) => encode_named_fields(set, fields, composite, out),
			other => Err(mismatch(schema, other)),
		},
		Schema::Variant(def) => {
			let variant = match value {
				Value::Variant(variant) => variant,
				other => return Err(mismatch(schema, other)),
			};
			let alternative =
				def.by_name(&variant.name).ok_or_else(|| EncodeError::UnknownVariant(variant.name.clone()))?;
			encode_tag(alternative.index, def.tag, out)?;
			match &alternative.fields {
				Fields::Unit if variant.values.is_empty() => Ok(()),
				Fields::Unit => Err(EncodeError::LengthMismatch { expected: 0, got: variant.values.len() }),
				Fields::Named(fields) => encode_named_fields(set, fields, &variant.values, out),
				Fields::Unnamed(schemas) => encode_unnamed_fields(set, schemas, &variant.values, out),
			}
		}
		Schema::Option(inner) => match value {
			Value::Option(None) => {
				out.push(0);
				Ok(())
			}
			Value::Option(Some(val)) => {
				out.push(1);
				encode_value(set, inner, val, out)
			}
			other => Err(mismatch(schema, other)),
		},
		Schema::Sequence(inner) => match value {
			Value::Sequence(vals) => {
				Compact(vals.len() as u64).encode_to(out);
				vals.iter().try_for_each(|val| encode_value(set, inner, val, out))
			}
			other => Err(mismatch(schema, other)),
		},
		Schema::Array { len, inner } => match value {
			Value::Sequence(vals) if vals.len() == *len => {
				vals.iter().try_for_each(|val| encode_value(set, inner, val, out))
			}
			Value::Sequence(vals) => Err(EncodeError::LengthMismatch { expected: *len, got: vals.len() }),
			other => Err(mismatch(schema, other)),
		},
		Schema::Tuple(schemas) => match value {
			Value::Composite(composite) => encode_unnamed_fields(set, schemas, composite, out),
			other => Err(mismatch(schema, other)),
		},
		Schema::Ref(name) => {
			let resolved = set.resolve(name).ok_or_else(|| EncodeError::UnknownSchemaRef(name.clone()))?;
			encode_value(set, resolved, value, out)
		}
	}
}

/// Encode `value` as `schema`, returning the bytes.
pub fn encode_to_vec(set: &SchemaSet, schema: &Schema, value: &Value) -> Result<Vec<u8>, EncodeError> {
	let mut out = Vec::new();
	encode_value(set, schema, value, &mut out)?;
	Ok(out)
}

fn encode_tag(index: u32, width: TagWidth, out: &mut Vec<u8>) -> Result<(), EncodeError> {
	let out_of_range = |_| EncodeError::TagOutOfRange { index, width };
	match width {
		TagWidth::U8 => u8::try_from(index).map_err(out_of_range)?.encode_to(out),
		TagWidth::U16 => u16::try_from(index).map_err(out_of_range)?.encode_to(out),
		TagWidth::U32 => index.encode_to(out),
	}
	Ok(())
}

fn mismatch(schema: &Schema, value: &Value) -> EncodeError {
	EncodeError::TypeMismatch { expected: schema.describe(), got: value.kind() }
}

fn encode_named_fields(
	set: &SchemaSet,
	fields: &[Field],
	composite: &Composite,
	out: &mut Vec<u8>,
) -> Result<(), EncodeError> {
	match composite {
		Composite::Named(_) => fields.iter().try_for_each(|field| {
			let val = composite.field(&field.name).ok_or_else(|| EncodeError::MissingField(field.name.clone()))?;
			encode_value(set, &field.schema, val, out)
		}),
		// Positional values are accepted as long as there's one per field.
		Composite::Unnamed(vals) => {
			if vals.len() != fields.len() {
				return Err(EncodeError::LengthMismatch { expected: fields.len(), got: vals.len() });
			}
			fields.iter().zip(vals).try_for_each(|(field, val)| encode_value(set, &field.schema, val, out))
		}
	}
}

fn encode_unnamed_fields(
	set: &SchemaSet,
	schemas: &[Schema],
	composite: &Composite,
	out: &mut Vec<u8>,
) -> Result<(), EncodeError> {
	if composite.len() != schemas.len() {
		return Err(EncodeError::LengthMismatch { expected: schemas.len(), got: composite.len() });
	}
	schemas.iter().zip(composite.values()).try_for_each(|(schema, val)| encode_value(set, schema, val, out))
}

fn encode_primitive(kind: &PrimitiveKind, prim: &Primitive, out: &mut Vec<u8>) -> Result<(), EncodeError> {
	let out_of_range = || EncodeError::OutOfRange(*kind);
	let mismatch = || EncodeError::TypeMismatch { expected: kind.to_string(), got: prim.kind() };

	match (*kind, prim) {
		(PrimitiveKind::Bool, Primitive::Bool(b)) => b.encode_to(out),
		(PrimitiveKind::Str, Primitive::Str(s)) => s.encode_to(out),
		(PrimitiveKind::Bytes, Primitive::Bytes(b)) => b.encode_to(out),
		(PrimitiveKind::FixedBytes(len), Primitive::Bytes(b)) => {
			if b.len() != len {
				return Err(EncodeError::LengthMismatch { expected: len, got: b.len() });
			}
			out.extend_from_slice(b);
		}
		(PrimitiveKind::Compact(width), prim) => {
			let val = prim.as_u128().ok_or_else(mismatch)?;
			if val > width.max_value() {
				return Err(out_of_range());
			}
			Compact(val).encode_to(out);
		}
		(PrimitiveKind::U8, prim) => unsigned::<u8>(prim, out).ok_or_else(mismatch)?.map_err(|_| out_of_range())?,
		(PrimitiveKind::U16, prim) => unsigned::<u16>(prim, out).ok_or_else(mismatch)?.map_err(|_| out_of_range())?,
		(PrimitiveKind::U32, prim) => unsigned::<u32>(prim, out).ok_or_else(mismatch)?.map_err(|_| out_of_range())?,
		(PrimitiveKind::U64, prim) => unsigned::<u64>(prim, out).ok_or_else(mismatch)?.map_err(|_| out_of_range())?,
		(PrimitiveKind::U128, prim) => {
			unsigned::<u128>(prim, out).ok_or_else(mismatch)?.map_err(|_| out_of_range())?
		}
		(PrimitiveKind::I8, prim) => signed::<i8>(prim, out).ok_or_else(mismatch)?.map_err(|_| out_of_range())?,
		(PrimitiveKind::I16, prim) => signed::<i16>(prim, out).ok_or_else(mismatch)?.map_err(|_| out_of_range())?,
		(PrimitiveKind::I32, prim) => signed::<i32>(prim, out).ok_or_else(mismatch)?.map_err(|_| out_of_range())?,
		(PrimitiveKind::I64, prim) => signed::<i64>(prim, out).ok_or_else(mismatch)?.map_err(|_| out_of_range())?,
		(PrimitiveKind::I128, prim) => signed::<i128>(prim, out).ok_or_else(mismatch)?.map_err(|_| out_of_range())?,
		_ => return Err(mismatch()),
	}
	Ok(())
}

/// Encode any unsigned primitive as `T`. `None` if `prim` isn't unsigned, `Some(Err)` if it doesn't fit.
fn unsigned<T: TryFrom<u128> + Encode>(prim: &Primitive, out: &mut Vec<u8>) -> Option<Result<(), T::Error>> {
	let val = prim.as_u128()?;
	Some(T::try_from(val).map(|v| v.encode_to(out)))
}

fn signed<T: TryFrom<i128> + Encode>(prim: &Primitive, out: &mut Vec<u8>) -> Option<Result<(), T::Error>> {
	let val = prim.as_i128()?;
	Some(T::try_from(val).map(|v| v.encode_to(out)))
}
