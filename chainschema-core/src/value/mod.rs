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
This module exposes the [`Value`] type and related subtypes, which are the runtime
representation of decoded data (much like `serde_json::Value` is a runtime representation
of JSON data). A [`Value`] tree mirrors the [`crate::Schema`] that produced it.
*/

mod deserializer;
mod serialize;

use serde::de::DeserializeOwned;
use std::fmt::{self, Debug};

/// A decoded value.
#[derive(Clone, PartialEq, Eq)]
pub enum Value {
	/// A struct (named fields) or a tuple (unnamed fields).
	Composite(Composite),
	/// The alternative of a closed tagged union that was selected by its tag.
	Variant(Variant),
	/// The elements of a sequence or fixed-size array, in order.
	Sequence(Vec<Value>),
	/// An optional value.
	Option(Option<Box<Value>>),
	/// Any of the leaf values we can have.
	Primitive(Primitive),
}

impl Value {
	pub fn bool(val: bool) -> Value {
		Value::Primitive(Primitive::Bool(val))
	}
	pub fn u8(val: u8) -> Value {
		Value::Primitive(Primitive::U8(val))
	}
	pub fn u16(val: u16) -> Value {
		Value::Primitive(Primitive::U16(val))
	}
	pub fn u32(val: u32) -> Value {
		Value::Primitive(Primitive::U32(val))
	}
	pub fn u64(val: u64) -> Value {
		Value::Primitive(Primitive::U64(val))
	}
	pub fn u128(val: u128) -> Value {
		Value::Primitive(Primitive::U128(val))
	}
	pub fn i32(val: i32) -> Value {
		Value::Primitive(Primitive::I32(val))
	}
	pub fn i64(val: i64) -> Value {
		Value::Primitive(Primitive::I64(val))
	}
	pub fn str(val: impl Into<String>) -> Value {
		Value::Primitive(Primitive::Str(val.into()))
	}
	pub fn bytes(val: impl Into<Vec<u8>>) -> Value {
		Value::Primitive(Primitive::Bytes(val.into()))
	}

	/// A struct-like composite from `(name, value)` pairs.
	pub fn named_composite<S: Into<String>>(fields: impl IntoIterator<Item = (S, Value)>) -> Value {
		Value::Composite(Composite::Named(fields.into_iter().map(|(k, v)| (k.into(), v)).collect()))
	}

	/// A tuple-like composite.
	pub fn unnamed_composite(values: Vec<Value>) -> Value {
		Value::Composite(Composite::Unnamed(values))
	}

	pub fn variant(name: impl Into<String>, values: Composite) -> Value {
		Value::Variant(Variant { name: name.into(), values })
	}

	/// A variant alternative with no associated data.
	pub fn unit_variant(name: impl Into<String>) -> Value {
		Value::variant(name, Composite::Unnamed(Vec::new()))
	}

	pub fn sequence(values: Vec<Value>) -> Value {
		Value::Sequence(values)
	}

	pub fn some(val: Value) -> Value {
		Value::Option(Some(Box::new(val)))
	}

	pub fn none() -> Value {
		Value::Option(None)
	}

	/// Return any unsigned integer primitive widened to a `u128`.
	pub fn as_u128(&self) -> Option<u128> {
		match self {
			Value::Primitive(p) => p.as_u128(),
			_ => None,
		}
	}

	pub fn as_bool(&self) -> Option<bool> {
		match self {
			Value::Primitive(Primitive::Bool(b)) => Some(*b),
			_ => None,
		}
	}

	pub fn as_str(&self) -> Option<&str> {
		match self {
			Value::Primitive(Primitive::Str(s)) => Some(s),
			_ => None,
		}
	}

	pub fn as_bytes(&self) -> Option<&[u8]> {
		match self {
			Value::Primitive(Primitive::Bytes(b)) => Some(b),
			_ => None,
		}
	}

	pub fn as_variant(&self) -> Option<&Variant> {
		match self {
			Value::Variant(v) => Some(v),
			_ => None,
		}
	}

	pub fn as_sequence(&self) -> Option<&[Value]> {
		match self {
			Value::Sequence(values) => Some(values),
			_ => None,
		}
	}

	/// Look up a named field of a struct, or of the fields of a struct-like variant.
	pub fn field(&self, name: &str) -> Option<&Value> {
		match self {
			Value::Composite(c) => c.field(name),
			Value::Variant(v) => v.values.field(name),
			_ => None,
		}
	}

	/// A short name for the kind of value this is, used in error messages.
	pub fn kind(&self) -> &'static str {
		match self {
			Value::Composite(Composite::Named(_)) => "struct",
			Value::Composite(Composite::Unnamed(_)) => "tuple",
			Value::Variant(_) => "variant",
			Value::Sequence(_) => "sequence",
			Value::Option(_) => "option",
			Value::Primitive(p) => p.kind(),
		}
	}
}

impl Debug for Value {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Value::Composite(val) => Debug::fmt(val, f),
			Value::Variant(val) => Debug::fmt(val, f),
			Value::Sequence(vals) => f.debug_list().entries(vals).finish(),
			Value::Option(Some(val)) => f.debug_tuple("Some").field(val).finish(),
			Value::Option(None) => f.write_str("None"),
			Value::Primitive(val) => Debug::fmt(val, f),
		}
	}
}

/// A named or unnamed struct-like or tuple-like set of values.
/// This is used to represent structs and tuples on their own, or
/// as the values carried by a specific [`Variant`].
#[derive(Clone, PartialEq, Eq)]
pub enum Composite {
	/// Eg `{ foo: 2, bar: false }`
	Named(Vec<(String, Value)>),
	/// Eg `(2, false)`
	Unnamed(Vec<Value>),
}

impl Composite {
	/// Return the number of values stored in this composite type.
	pub fn len(&self) -> usize {
		match self {
			Composite::Named(values) => values.len(),
			Composite::Unnamed(values) => values.len(),
		}
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	pub fn field(&self, name: &str) -> Option<&Value> {
		match self {
			Composite::Named(values) => values.iter().find(|(k, _)| k == name).map(|(_, v)| v),
			Composite::Unnamed(_) => None,
		}
	}

	/// Iterate over the values, ignoring any names.
	pub fn values(&self) -> Box<dyn Iterator<Item = &Value> + '_> {
		match self {
			Composite::Named(values) => Box::new(values.iter().map(|(_, v)| v)),
			Composite::Unnamed(values) => Box::new(values.iter()),
		}
	}
}

impl Debug for Composite {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Composite::Named(fields) => {
				let mut struc = f.debug_struct("");
				for (name, val) in fields {
					struc.field(name, val);
				}
				struc.finish()
			}
			Composite::Unnamed(fields) => {
				let mut struc = f.debug_tuple("");
				for val in fields {
					struc.field(val);
				}
				struc.finish()
			}
		}
	}
}

impl From<Composite> for Value {
	fn from(val: Composite) -> Self {
		Value::Composite(val)
	}
}

/// This represents the value of a specific variant from an enum, and contains
/// the name of the variant, and the named/unnamed values associated with it.
#[derive(Clone, PartialEq, Eq)]
pub struct Variant {
	/// The name of the variant.
	pub name: String,
	/// Values for each of the named or unnamed fields associated with this variant.
	pub values: Composite,
}

impl Debug for Variant {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.name)?;
		f.write_str(" ")?;
		Debug::fmt(&self.values, f)
	}
}

impl From<Variant> for Value {
	fn from(val: Variant) -> Self {
		Value::Variant(val)
	}
}

/// A "primitive" value (this includes strings and byte strings).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Primitive {
	Bool(bool),
	U8(u8),
	U16(u16),
	U32(u32),
	U64(u64),
	U128(u128),
	I8(i8),
	I16(i16),
	I32(i32),
	I64(i64),
	I128(i128),
	Str(String),
	/// Raw bytes, either length prefixed or of a fixed size.
	Bytes(Vec<u8>),
}

impl Primitive {
	/// Return any unsigned integer widened to a `u128`.
	pub fn as_u128(&self) -> Option<u128> {
		match *self {
			Primitive::U8(v) => Some(v.into()),
			Primitive::U16(v) => Some(v.into()),
			Primitive::U32(v) => Some(v.into()),
			Primitive::U64(v) => Some(v.into()),
			Primitive::U128(v) => Some(v),
			_ => None,
		}
	}

	/// Return any signed integer widened to an `i128`.
	pub fn as_i128(&self) -> Option<i128> {
		match *self {
			Primitive::I8(v) => Some(v.into()),
			Primitive::I16(v) => Some(v.into()),
			Primitive::I32(v) => Some(v.into()),
			Primitive::I64(v) => Some(v.into()),
			Primitive::I128(v) => Some(v),
			_ => None,
		}
	}

	pub fn kind(&self) -> &'static str {
		match self {
			Primitive::Bool(_) => "bool",
			Primitive::U8(_) => "u8",
			Primitive::U16(_) => "u16",
			Primitive::U32(_) => "u32",
			Primitive::U64(_) => "u64",
			Primitive::U128(_) => "u128",
			Primitive::I8(_) => "i8",
			Primitive::I16(_) => "i16",
			Primitive::I32(_) => "i32",
			Primitive::I64(_) => "i64",
			Primitive::I128(_) => "i128",
			Primitive::Str(_) => "str",
			Primitive::Bytes(_) => "bytes",
		}
	}
}

impl From<Primitive> for Value {
	fn from(val: Primitive) -> Self {
		Value::Primitive(val)
	}
}

/// An opaque error that is returned if we cannot deserialize the [`Value`] type.
pub use deserializer::Error as DeserializeError;

/// Attempt to deserialize a [`Value`] into some type that has [`serde::Deserialize`] implemented on it.
///
/// Variants map onto Rust enums by alternative name, structs onto structs or maps, tuples and
/// sequences onto tuples, arrays or `Vec`s, and byte strings onto `Vec<u8>` or `[u8; N]`.
pub fn from_value<T: DeserializeOwned>(value: Value) -> Result<T, DeserializeError> {
	T::deserialize(value)
}
