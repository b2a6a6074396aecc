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

//! A [`serde::Deserializer`] implementation for [`Value`], so that decoded values can be
//! turned into concrete Rust types.

use super::{Composite, Primitive, Value, Variant};
use serde::{
	de::{
		self,
		value::{MapDeserializer, SeqDeserializer, StringDeserializer},
		DeserializeSeed, EnumAccess, IntoDeserializer, Unexpected, VariantAccess, Visitor,
	},
	forward_to_deserialize_any, Deserializer,
};
use std::fmt::Display;

/// An opaque error describing why a [`Value`] could not be deserialized into some type.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct Error(String);

impl de::Error for Error {
	fn custom<T: Display>(msg: T) -> Self {
		Error(msg.to_string())
	}
}

impl<'de> IntoDeserializer<'de, Error> for Value {
	type Deserializer = Value;
	fn into_deserializer(self) -> Self::Deserializer {
		self
	}
}

fn visit_values<'de, V: Visitor<'de>>(values: Vec<Value>, visitor: V) -> Result<V::Value, Error> {
	let mut seq = SeqDeserializer::<_, Error>::new(values.into_iter());
	let out = visitor.visit_seq(&mut seq)?;
	seq.end()?;
	Ok(out)
}

fn visit_bytes_as_seq<'de, V: Visitor<'de>>(bytes: Vec<u8>, visitor: V) -> Result<V::Value, Error> {
	let mut seq = SeqDeserializer::<_, Error>::new(bytes.into_iter());
	let out = visitor.visit_seq(&mut seq)?;
	seq.end()?;
	Ok(out)
}

fn visit_composite<'de, V: Visitor<'de>>(composite: Composite, visitor: V) -> Result<V::Value, Error> {
	match composite {
		Composite::Named(values) => {
			let mut map = MapDeserializer::<_, Error>::new(values.into_iter());
			let out = visitor.visit_map(&mut map)?;
			map.end()?;
			Ok(out)
		}
		Composite::Unnamed(values) => visit_values(values, visitor),
	}
}

fn visit_primitive<'de, V: Visitor<'de>>(primitive: Primitive, visitor: V) -> Result<V::Value, Error> {
	match primitive {
		Primitive::Bool(v) => visitor.visit_bool(v),
		Primitive::U8(v) => visitor.visit_u8(v),
		Primitive::U16(v) => visitor.visit_u16(v),
		Primitive::U32(v) => visitor.visit_u32(v),
		Primitive::U64(v) => visitor.visit_u64(v),
		// Most visitors don't understand 128 bit numbers, so hand them
		// a 64 bit one if the value fits.
		Primitive::U128(v) => match u64::try_from(v) {
			Ok(v) => visitor.visit_u64(v),
			Err(_) => visitor.visit_u128(v),
		},
		Primitive::I8(v) => visitor.visit_i8(v),
		Primitive::I16(v) => visitor.visit_i16(v),
		Primitive::I32(v) => visitor.visit_i32(v),
		Primitive::I64(v) => visitor.visit_i64(v),
		Primitive::I128(v) => match i64::try_from(v) {
			Ok(v) => visitor.visit_i64(v),
			Err(_) => visitor.visit_i128(v),
		},
		Primitive::Str(v) => visitor.visit_string(v),
		Primitive::Bytes(v) => visitor.visit_byte_buf(v),
	}
}

impl<'de> Deserializer<'de> for Value {
	type Error = Error;

	fn deserialize_any<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Self::Error> {
		match self {
			Value::Composite(composite) => visit_composite(composite, visitor),
			Value::Variant(variant) => visitor.visit_enum(variant),
			Value::Sequence(values) => visit_values(values, visitor),
			Value::Option(Some(value)) => visitor.visit_some(*value),
			Value::Option(None) => visitor.visit_none(),
			Value::Primitive(primitive) => visit_primitive(primitive, visitor),
		}
	}

	fn deserialize_option<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Self::Error> {
		match self {
			Value::Option(Some(value)) => visitor.visit_some(*value),
			Value::Option(None) => visitor.visit_none(),
			other => visitor.visit_some(other),
		}
	}

	fn deserialize_enum<V: Visitor<'de>>(
		self,
		_name: &'static str,
		_variants: &'static [&'static str],
		visitor: V,
	) -> Result<V::Value, Self::Error> {
		match self {
			Value::Variant(variant) => visitor.visit_enum(variant),
			Value::Primitive(Primitive::Str(name)) => {
				let name: StringDeserializer<Error> = name.into_deserializer();
				visitor.visit_enum(name)
			}
			other => Err(de::Error::invalid_type(Unexpected::Other(other.kind()), &"a variant")),
		}
	}

	fn deserialize_newtype_struct<V: Visitor<'de>>(
		self,
		_name: &'static str,
		visitor: V,
	) -> Result<V::Value, Self::Error> {
		match self {
			// A single-field tuple is the encoded form of most newtype wrappers.
			Value::Composite(Composite::Unnamed(mut values)) if values.len() == 1 => {
				visitor.visit_newtype_struct(values.remove(0))
			}
			other => visitor.visit_newtype_struct(other),
		}
	}

	fn deserialize_seq<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Self::Error> {
		match self {
			Value::Sequence(values) | Value::Composite(Composite::Unnamed(values)) => visit_values(values, visitor),
			Value::Primitive(Primitive::Bytes(bytes)) => visit_bytes_as_seq(bytes, visitor),
			other => other.deserialize_any(visitor),
		}
	}

	fn deserialize_tuple<V: Visitor<'de>>(self, _len: usize, visitor: V) -> Result<V::Value, Self::Error> {
		self.deserialize_seq(visitor)
	}

	fn deserialize_tuple_struct<V: Visitor<'de>>(
		self,
		_name: &'static str,
		_len: usize,
		visitor: V,
	) -> Result<V::Value, Self::Error> {
		self.deserialize_seq(visitor)
	}

	fn deserialize_bytes<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Self::Error> {
		match self {
			Value::Primitive(Primitive::Bytes(bytes)) => visitor.visit_byte_buf(bytes),
			other => other.deserialize_any(visitor),
		}
	}

	fn deserialize_byte_buf<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Self::Error> {
		self.deserialize_bytes(visitor)
	}

	fn deserialize_unit<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Self::Error> {
		match self {
			Value::Composite(composite) if composite.is_empty() => visitor.visit_unit(),
			other => other.deserialize_any(visitor),
		}
	}

	fn deserialize_unit_struct<V: Visitor<'de>>(
		self,
		_name: &'static str,
		visitor: V,
	) -> Result<V::Value, Self::Error> {
		self.deserialize_unit(visitor)
	}

	forward_to_deserialize_any! {
		bool i8 i16 i32 i64 i128 u8 u16 u32 u64 u128 f32 f64 char str string
		map struct identifier ignored_any
	}
}

impl<'de> EnumAccess<'de> for Variant {
	type Error = Error;
	type Variant = VariantValues;

	fn variant_seed<V: DeserializeSeed<'de>>(self, seed: V) -> Result<(V::Value, Self::Variant), Self::Error> {
		let name: StringDeserializer<Error> = self.name.into_deserializer();
		let name = seed.deserialize(name)?;
		Ok((name, VariantValues(self.values)))
	}
}

/// The values of a variant, handed to serde once the alternative has been identified.
pub struct VariantValues(Composite);

impl<'de> VariantAccess<'de> for VariantValues {
	type Error = Error;

	fn unit_variant(self) -> Result<(), Self::Error> {
		if self.0.is_empty() {
			Ok(())
		} else {
			Err(de::Error::invalid_length(self.0.len(), &"a unit variant"))
		}
	}

	fn newtype_variant_seed<T: DeserializeSeed<'de>>(self, seed: T) -> Result<T::Value, Self::Error> {
		let value = match self.0 {
			Composite::Unnamed(mut values) if values.len() == 1 => values.remove(0),
			other => Value::Composite(other),
		};
		seed.deserialize(value)
	}

	fn tuple_variant<V: Visitor<'de>>(self, _len: usize, visitor: V) -> Result<V::Value, Self::Error> {
		visit_composite(self.0, visitor)
	}

	fn struct_variant<V: Visitor<'de>>(
		self,
		_fields: &'static [&'static str],
		visitor: V,
	) -> Result<V::Value, Self::Error> {
		visit_composite(self.0, visitor)
	}
}
