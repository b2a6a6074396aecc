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

use super::{DecodeError, DecodeErrorKind, DecodeOptions, InvalidEncoding, PathSegment, MAX_ZERO_SIZED_ELEMENTS};
use crate::primitive::{self, decode_len, decode_primitive};
use crate::schema::{Field, Fields, Schema, SchemaSet, TagWidth, VariantDef};
use crate::value::{Composite, Value, Variant};

/// State shared by one top level decode.
struct Decoder<'a> {
	set: &'a SchemaSet,
	max_depth: usize,
	depth: usize,
}

pub fn decode(
	set: &SchemaSet,
	schema: &Schema,
	data: &mut &[u8],
	options: &DecodeOptions,
) -> Result<Value, DecodeError> {
	let mut decoder = Decoder { set, max_depth: options.max_depth, depth: 0 };
	decoder.decode_schema(data, schema)
}

impl<'a> Decoder<'a> {
	fn decode_schema(&mut self, data: &mut &[u8], schema: &Schema) -> Result<Value, DecodeError> {
		if self.depth >= self.max_depth {
			return Err(DecodeErrorKind::DepthLimitExceeded(self.max_depth).into());
		}
		self.depth += 1;
		let res = self.decode_node(data, schema);
		self.depth -= 1;
		res
	}

	fn decode_node(&mut self, data: &mut &[u8], schema: &Schema) -> Result<Value, DecodeError> {
		match schema {
			Schema::Primitive(kind) => Ok(Value::Primitive(decode_primitive(data, kind)?)),
			Schema::Struct(fields) => self.decode_named_fields(data, fields).map(Value::Composite),
			Schema::Variant(def) => self.decode_variant(data, def).map(Value::Variant),
			Schema::Option(inner) => self.decode_option(data, inner),
			Schema::Sequence(inner) => self.decode_sequence(data, inner),
			Schema::Array { len, inner } => self.decode_array(data, *len, inner),
			Schema::Tuple(elements) => self.decode_unnamed_fields(data, elements).map(Value::Composite),
			Schema::Ref(name) => {
				let set = self.set;
				let resolved = set.resolve(name).ok_or_else(|| DecodeErrorKind::UnknownSchemaRef(name.clone()))?;
				self.decode_schema(data, resolved)
			}
		}
	}

	fn decode_named_fields(&mut self, data: &mut &[u8], fields: &[Field]) -> Result<Composite, DecodeError> {
		let mut vals = Vec::with_capacity(fields.len());
		for field in fields {
			let val = self
				.decode_schema(data, &field.schema)
				.map_err(|e| e.at(PathSegment::Field(field.name.clone())))?;
			vals.push((field.name.clone(), val));
		}
		Ok(Composite::Named(vals))
	}

	fn decode_unnamed_fields(&mut self, data: &mut &[u8], schemas: &[Schema]) -> Result<Composite, DecodeError> {
		let mut vals = Vec::with_capacity(schemas.len());
		for (idx, schema) in schemas.iter().enumerate() {
			let val = self.decode_schema(data, schema).map_err(|e| e.at(PathSegment::Index(idx)))?;
			vals.push(val);
		}
		Ok(Composite::Unnamed(vals))
	}

	fn decode_variant(&mut self, data: &mut &[u8], def: &VariantDef) -> Result<Variant, DecodeError> {
		let index = decode_tag(data, def.tag)?;
		let alternative = def.by_index(index).ok_or(DecodeErrorKind::UnknownVariant(index))?;

		let values = match &alternative.fields {
			Fields::Unit => Ok(Composite::Unnamed(Vec::new())),
			Fields::Named(fields) => self.decode_named_fields(data, fields),
			Fields::Unnamed(schemas) => self.decode_unnamed_fields(data, schemas),
		}
		.map_err(|e| e.at(PathSegment::Variant(alternative.name.clone())))?;

		Ok(Variant { name: alternative.name.clone(), values })
	}

	fn decode_option(&mut self, data: &mut &[u8], inner: &Schema) -> Result<Value, DecodeError> {
		match primitive::decode_u8(data)? {
			0 => Ok(Value::Option(None)),
			1 => self.decode_schema(data, inner).map(|val| Value::Option(Some(Box::new(val)))),
			b => Err(DecodeErrorKind::InvalidEncoding(InvalidEncoding::OptionPresence(b)).into()),
		}
	}

	fn decode_sequence(&mut self, data: &mut &[u8], inner: &Schema) -> Result<Value, DecodeError> {
		let len = decode_len(data)?;
		let mut vals = Vec::with_capacity(len.min(data.len()));
		for idx in 0..len {
			let before = data.len();
			let val = self.decode_schema(data, inner).map_err(|e| e.at(PathSegment::Index(idx)))?;
			// Whether an element consumes input depends only on its schema, so the first one tells.
			if idx == 0 && data.len() == before && len > MAX_ZERO_SIZED_ELEMENTS {
				return Err(DecodeErrorKind::InvalidEncoding(InvalidEncoding::ZeroSizedSequence { len }).into());
			}
			vals.push(val);
		}
		Ok(Value::Sequence(vals))
	}

	/// Arrays take their length from the schema, so there is nothing to bound here.
	fn decode_array(&mut self, data: &mut &[u8], len: usize, inner: &Schema) -> Result<Value, DecodeError> {
		let mut vals = Vec::with_capacity(len.min(data.len()));
		for idx in 0..len {
			vals.push(self.decode_schema(data, inner).map_err(|e| e.at(PathSegment::Index(idx)))?);
		}
		Ok(Value::Sequence(vals))
	}
}

fn decode_tag(data: &mut &[u8], width: TagWidth) -> Result<u32, DecodeErrorKind> {
	match width {
		TagWidth::U8 => primitive::decode_u8(data).map(u32::from),
		TagWidth::U16 => primitive::decode_u16(data).map(u32::from),
		TagWidth::U32 => primitive::decode_u32(data),
	}
}
