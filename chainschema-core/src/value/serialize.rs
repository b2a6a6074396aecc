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

use super::{Composite, Primitive, Value, Variant};
use serde::{
	ser::{SerializeMap, SerializeSeq},
	Serialize, Serializer,
};

impl Serialize for Value {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		match self {
			Value::Composite(val) => val.serialize(serializer),
			Value::Variant(val) => val.serialize(serializer),
			Value::Sequence(vals) => {
				let mut seq = serializer.serialize_seq(Some(vals.len()))?;
				for val in vals {
					seq.serialize_element(val)?;
				}
				seq.end()
			}
			Value::Option(Some(val)) => serializer.serialize_some(val),
			Value::Option(None) => serializer.serialize_none(),
			Value::Primitive(val) => val.serialize(serializer),
		}
	}
}

impl Serialize for Composite {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		match self {
			Composite::Named(vals) => {
				let mut map = serializer.serialize_map(Some(vals.len()))?;
				for (key, val) in vals {
					map.serialize_entry(key, val)?;
				}
				map.end()
			}
			Composite::Unnamed(vals) => {
				let mut seq = serializer.serialize_seq(Some(vals.len()))?;
				for val in vals {
					seq.serialize_element(val)?;
				}
				seq.end()
			}
		}
	}
}

impl Serialize for Primitive {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		// Delegate to the serialization strategy used by the primitive types.
		match self {
			Primitive::Bool(v) => v.serialize(serializer),
			Primitive::U8(v) => v.serialize(serializer),
			Primitive::U16(v) => v.serialize(serializer),
			Primitive::U32(v) => v.serialize(serializer),
			Primitive::U64(v) => v.serialize(serializer),
			Primitive::U128(v) => v.serialize(serializer),
			Primitive::I8(v) => v.serialize(serializer),
			Primitive::I16(v) => v.serialize(serializer),
			Primitive::I32(v) => v.serialize(serializer),
			Primitive::I64(v) => v.serialize(serializer),
			Primitive::I128(v) => v.serialize(serializer),
			Primitive::Str(v) => v.serialize(serializer),
			Primitive::Bytes(v) => serializer.serialize_str(&format!("0x{}", hex::encode(v))),
		}
	}
}

impl Serialize for Variant {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		// We can't use the enum serializing in the serde data model because that requires static
		// strs and enum indexes, which we don't have (since this is a runtime value), so we serialize
		// as a map with a name and the values.
		let mut map = serializer.serialize_map(Some(2))?;
		map.serialize_entry("name", &self.name)?;
		map.serialize_entry("values", &self.values)?;
		map.end()
	}
}

#[cfg(test)]
mod test {
	use super::*;
	use serde_json::json;

	fn assert_value(value: Value, expected: serde_json::Value) {
		let val = serde_json::to_value(&value).expect("can serialize to serde_json::Value");
		assert_eq!(val, expected);
	}

	#[test]
	fn serialize_primitives() {
		assert_value(Value::u8(1), json!(1));
		assert_value(Value::u32(1), json!(1));
		assert_value(Value::u64(1), json!(1));
		assert_value(Value::i32(-7), json!(-7));
		assert_value(Value::bool(true), json!(true));
		assert_value(Value::str("hello"), json!("hello"));
		assert_value(Value::bytes(vec![0xab, 0xcd]), json!("0xabcd"));
	}

	#[test]
	fn serialize_composites_and_options() {
		assert_value(
			Value::named_composite([("a", Value::u32(1)), ("b", Value::some(Value::bytes(vec![1, 2])))]),
			json!({ "a": 1, "b": "0x0102" }),
		);
		assert_value(Value::named_composite([("b", Value::none())]), json!({ "b": null }));
		assert_value(Value::unnamed_composite(vec![Value::bool(false), Value::str("x")]), json!([false, "x"]));
		assert_value(Value::sequence(vec![Value::u8(1), Value::u8(2)]), json!([1, 2]));
	}

	#[test]
	fn serialize_variants() {
		assert_value(
			Value::variant("Transfer", Composite::Named(vec![("value".into(), Value::u64(5))])),
			json!({ "name": "Transfer", "values": { "value": 5 } }),
		);
		assert_value(Value::unit_variant("ClearOrigin"), json!({ "name": "ClearOrigin", "values": [] }));
	}
}
