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

use chainschema_core::{
	decoder::{self, decode_all, decode_value},
	encoder::encode_to_vec,
	schema::{Alternative, Fields, PrimitiveKind, TagWidth, UInt, VariantDef},
	value::{from_value, Primitive},
	Composite, DecodeErrorKind, DecodeOptions, InvalidEncoding, PathSegment, Schema, SchemaSet, TrailingBytes,
	Value,
};
use codec::{Compact, Encode};

macro_rules! bytes {
	($name:ident = $hex:literal) => {
		let hex_str = $hex.strip_prefix("0x").expect("0x should prefix hex encoded bytes");
		let $name = hex::decode(hex_str).expect("valid bytes from hex");
	};
}

fn empty_set() -> SchemaSet {
	SchemaSet::builder("empty").build().expect("empty set is valid")
}

/// `Xcm` is a list of instructions, and some instructions carry a nested `Xcm`.
fn xcm_set() -> SchemaSet {
	SchemaSet::builder("xcm")
		.with("Xcm", Schema::sequence(Schema::reference("Instruction")))
		.with(
			"Instruction",
			Schema::variant(vec![
				Alternative::unit(0, "ClearOrigin"),
				Alternative::named(1, "Transact", [("weight", Schema::u64()), ("call", Schema::bytes())]),
				Alternative::unnamed(2, "SetErrorHandler", vec![Schema::reference("Xcm")]),
			]),
		)
		.build()
		.expect("valid xcm set")
}

/// Bytes for `k` nested `SetErrorHandler`s around an empty program.
fn nested_xcm(k: usize) -> Vec<u8> {
	let mut bytes = Vec::new();
	for _ in 0..k {
		bytes.extend([0x04, 0x02]);
	}
	bytes.push(0x00);
	bytes
}

#[test]
fn struct_with_present_option() {
	let set = empty_set();
	let schema = Schema::named_struct([("a", Schema::u32()), ("b", Schema::option(Schema::bytes()))]);

	let decoded = decode_all(&set, &schema, &[0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0xAB, 0xCD]).unwrap();
	assert_eq!(
		decoded.value,
		Value::named_composite([("a", Value::u32(1)), ("b", Value::some(Value::bytes([0xAB, 0xCD])))])
	);
	assert_eq!(decoded.trailing, None);

	// A first byte of 0x02 selects the four byte compact mode, which runs out of input.
	let err = decode_all(&set, &schema, &[0x01, 0x00, 0x00, 0x00, 0x01, 0x02, 0xAB, 0xCD]).unwrap_err();
	assert_eq!(err.kind(), &DecodeErrorKind::Truncated { needed: 4, remaining: 3 });
	assert_eq!(err.path(), &[PathSegment::Field("b".into())]);
}

#[test]
fn struct_with_absent_option() {
	let set = empty_set();
	let schema = Schema::named_struct([("a", Schema::u32()), ("b", Schema::option(Schema::bytes()))]);

	let decoded = decode_all(&set, &schema, &[0x01, 0x00, 0x00, 0x00, 0x00]).unwrap();
	assert_eq!(decoded.value, Value::named_composite([("a", Value::u32(1)), ("b", Value::none())]));

	let err = decode_all(&set, &schema, &[0x01, 0x00, 0x00, 0x00, 0x02]).unwrap_err();
	assert_eq!(err.kind(), &DecodeErrorKind::InvalidEncoding(InvalidEncoding::OptionPresence(2)));
}

#[test]
fn undeclared_variant_tags_are_rejected() {
	let set = empty_set();
	let schema =
		Schema::variant(vec![Alternative::unit(0, "None"), Alternative::unnamed(1, "Some", vec![Schema::u8()])]);

	assert_eq!(
		decode_value(&set, &schema, &mut &[0x01, 0x07][..]).unwrap(),
		Value::variant("Some", Composite::Unnamed(vec![Value::u8(7)]))
	);
	let err = decode_value(&set, &schema, &mut &[0x02][..]).unwrap_err();
	assert_eq!(err.kind(), &DecodeErrorKind::UnknownVariant(2));

	// Sparse indexes: only the declared tags decode, whatever lies between them.
	let sparse =
		Schema::variant(vec![Alternative::unit(0, "A"), Alternative::unit(5, "B"), Alternative::unit(255, "C")]);
	for tag in 0..=255u8 {
		let res = decode_value(&set, &sparse, &mut &[tag][..]);
		match tag {
			0 | 5 | 255 => assert!(res.is_ok(), "tag {} should decode", tag),
			_ => assert_eq!(res.unwrap_err().kind(), &DecodeErrorKind::UnknownVariant(tag as u32)),
		}
	}
}

#[test]
fn wide_variant_tags_are_little_endian() {
	let set = empty_set();
	let schema = Schema::Variant(VariantDef::new(
		TagWidth::U16,
		vec![Alternative { index: 0x0102, name: "Wide".into(), fields: Fields::Unnamed(vec![Schema::bool()]) }],
	));
	let value = decode_value(&set, &schema, &mut &[0x02, 0x01, 0x01][..]).unwrap();
	assert_eq!(value, Value::variant("Wide", Composite::Unnamed(vec![Value::bool(true)])));
}

#[test]
fn agrees_with_derived_encodings() {
	#[derive(Encode)]
	enum MultiAddress {
		#[codec(index = 0)]
		Id([u8; 32]),
		#[codec(index = 3)]
		Address20([u8; 20]),
	}

	#[derive(Encode)]
	struct Transfer {
		dest: MultiAddress,
		#[codec(compact)]
		value: u128,
		memo: Option<String>,
		tips: Vec<(u32, bool)>,
	}

	let set = SchemaSet::builder("balances")
		.with(
			"MultiAddress",
			Schema::variant(vec![
				Alternative::unnamed(0, "Id", vec![Schema::fixed_bytes(32)]),
				Alternative::unnamed(3, "Address20", vec![Schema::fixed_bytes(20)]),
			]),
		)
		.with(
			"Transfer",
			Schema::named_struct([
				("dest", Schema::reference("MultiAddress")),
				("value", Schema::compact(UInt::U128)),
				("memo", Schema::option(Schema::str())),
				("tips", Schema::sequence(Schema::tuple(vec![Schema::u32(), Schema::bool()]))),
			]),
		)
		.build()
		.unwrap();

	let transfer = Transfer {
		dest: MultiAddress::Address20([7; 20]),
		value: 12_345_678_901_234_567_890,
		memo: Some("rent".into()),
		tips: vec![(1, true), (70_000, false)],
	};
	let bytes = transfer.encode();

	let decoded = decode_all(&set, &Schema::reference("Transfer"), &bytes).unwrap();
	assert_eq!(decoded.trailing, None);
	assert_eq!(
		decoded.value,
		Value::named_composite([
			("dest", Value::variant("Address20", Composite::Unnamed(vec![Value::bytes([7; 20])]))),
			("value", Value::u128(12_345_678_901_234_567_890)),
			("memo", Value::some(Value::str("rent"))),
			(
				"tips",
				Value::sequence(vec![
					Value::unnamed_composite(vec![Value::u32(1), Value::bool(true)]),
					Value::unnamed_composite(vec![Value::u32(70_000), Value::bool(false)]),
				])
			),
		])
	);

	// And the encoder writes the same bytes back.
	assert_eq!(encode_to_vec(&set, &Schema::reference("Transfer"), &decoded.value).unwrap(), bytes);
}

#[test]
fn compact_fields_at_width_boundaries() {
	let set = empty_set();
	let schema = Schema::compact(UInt::U32);
	for val in [0u32, 63, 64, 16_383, 16_384, (1 << 30) - 1, 1 << 30, u32::MAX] {
		let bytes = Compact(val).encode();
		assert_eq!(decode_value(&set, &schema, &mut &*bytes).unwrap(), Value::u32(val), "value {}", val);
	}

	let too_big = Compact(u64::from(u32::MAX) + 1).encode();
	let err = decode_value(&set, &schema, &mut &*too_big).unwrap_err();
	assert_eq!(
		err.kind(),
		&DecodeErrorKind::InvalidEncoding(InvalidEncoding::CompactOutOfRange {
			value: u128::from(u32::MAX) + 1,
			target: UInt::U32
		})
	);
}

#[test]
fn truncated_sequences_report_the_element() {
	let set = empty_set();
	let schema = Schema::sequence(Schema::u16());

	bytes!(data = "0x0c01000200ff");
	let err = decode_value(&set, &schema, &mut &*data).unwrap_err();
	assert_eq!(err.kind(), &DecodeErrorKind::Truncated { needed: 2, remaining: 1 });
	assert_eq!(err.path(), &[PathSegment::Index(2)]);
}

#[test]
fn huge_length_claims_fail_without_allocating() {
	let set = empty_set();
	let mut data = Compact(u32::MAX).encode();
	data.extend([1, 2, 3]);

	let err = decode_value(&set, &Schema::sequence(Schema::u16()), &mut &*data).unwrap_err();
	assert_eq!(err.kind(), &DecodeErrorKind::Truncated { needed: 2, remaining: 1 });

	let err = decode_value(&set, &Schema::sequence(Schema::tuple(vec![])), &mut &*data).unwrap_err();
	assert_eq!(
		err.kind(),
		&DecodeErrorKind::InvalidEncoding(InvalidEncoding::ZeroSizedSequence { len: u32::MAX as usize })
	);

	let schema = Schema::tuple(vec![Schema::sequence(Schema::tuple(vec![])), Schema::u32()]);
	let mut data = Compact(3u32).encode();
	data.extend(7u32.encode());
	let value = decode_value(&set, &schema, &mut &*data).unwrap();
	assert_eq!(
		value,
		Value::unnamed_composite(vec![
			Value::sequence(vec![Value::unnamed_composite(vec![]); 3]),
			Value::u32(7)
		])
	);
}

#[test]
fn zero_sized_elements_decode_without_input() {
	let set = empty_set();
	let unit = || Value::unnamed_composite(vec![]);

	// Arrays take their length from the schema, not from the input.
	let decoded = decode_all(&set, &Schema::array(2, Schema::named_struct::<&str>([])), &[]).unwrap();
	assert_eq!(decoded.value, Value::sequence(vec![Value::named_composite::<&str>([]); 2]));
	assert_eq!(decoded.trailing, None);

	let schema = Schema::sequence(Schema::tuple(vec![]));
	let units = Value::sequence(vec![unit(); 5]);
	let bytes = encode_to_vec(&set, &schema, &units).unwrap();
	assert_eq!(bytes, vec![0x14]);
	assert_eq!(decode_all(&set, &schema, &bytes).unwrap().value, units);

	let at_limit = Compact(decoder::MAX_ZERO_SIZED_ELEMENTS as u32).encode();
	let value = decode_all(&set, &schema, &at_limit).unwrap().value;
	assert_eq!(value.as_sequence().map(|vals| vals.len()), Some(decoder::MAX_ZERO_SIZED_ELEMENTS));

	let over_limit = Compact(decoder::MAX_ZERO_SIZED_ELEMENTS as u32 + 1).encode();
	let err = decode_all(&set, &schema, &over_limit).unwrap_err();
	assert_eq!(
		err.kind(),
		&DecodeErrorKind::InvalidEncoding(InvalidEncoding::ZeroSizedSequence {
			len: decoder::MAX_ZERO_SIZED_ELEMENTS + 1
		})
	);
}

/// Every primitive at its extremes, and every kind of schema node, survives encoding and decoding.
#[test]
fn encoded_values_decode_to_themselves() {
	let set = SchemaSet::builder("shapes")
		.with("Byte", Schema::u8())
		.with(
			"Wide",
			Schema::Variant(VariantDef::new(
				TagWidth::U32,
				vec![
					Alternative::unit(0, "Low"),
					Alternative::unnamed(0x0102_0304, "Mid", vec![Schema::u16(), Schema::reference("Byte")]),
					Alternative::named(u32::MAX, "High", [("flag", Schema::bool())]),
				],
			)),
		)
		.build()
		.unwrap();

	let prim = |p: Primitive| Value::Primitive(p);
	let cases: Vec<(Schema, Value)> = vec![
		(Schema::bool(), Value::bool(false)),
		(Schema::bool(), Value::bool(true)),
		(Schema::u8(), Value::u8(u8::MAX)),
		(Schema::u16(), Value::u16(0)),
		(Schema::u16(), Value::u16(u16::MAX)),
		(Schema::u32(), Value::u32(u32::MAX)),
		(Schema::u64(), Value::u64(0)),
		(Schema::u64(), Value::u64(u64::MAX)),
		(Schema::u128(), Value::u128(u128::MAX)),
		(Schema::Primitive(PrimitiveKind::I8), prim(Primitive::I8(i8::MIN))),
		(Schema::Primitive(PrimitiveKind::I8), prim(Primitive::I8(i8::MAX))),
		(Schema::Primitive(PrimitiveKind::I16), prim(Primitive::I16(i16::MIN))),
		(Schema::Primitive(PrimitiveKind::I16), prim(Primitive::I16(i16::MAX))),
		(Schema::Primitive(PrimitiveKind::I32), Value::i32(i32::MIN)),
		(Schema::Primitive(PrimitiveKind::I32), Value::i32(i32::MAX)),
		(Schema::Primitive(PrimitiveKind::I64), Value::i64(i64::MIN)),
		(Schema::Primitive(PrimitiveKind::I64), Value::i64(i64::MAX)),
		(Schema::Primitive(PrimitiveKind::I128), prim(Primitive::I128(i128::MIN))),
		(Schema::Primitive(PrimitiveKind::I128), prim(Primitive::I128(i128::MAX))),
		(Schema::compact(UInt::U8), Value::u8(u8::MAX)),
		(Schema::compact(UInt::U16), Value::u16(u16::MAX)),
		(Schema::compact(UInt::U32), Value::u32(0)),
		(Schema::compact(UInt::U64), Value::u64(u64::MAX)),
		(Schema::compact(UInt::U128), Value::u128(u128::MAX)),
		(Schema::bytes(), Value::bytes(vec![])),
		(Schema::bytes(), Value::bytes(vec![0xab; 70])),
		(Schema::fixed_bytes(0), Value::bytes(vec![])),
		(Schema::fixed_bytes(32), Value::bytes([7u8; 32])),
		(Schema::str(), Value::str("")),
		(Schema::str(), Value::str("ünïcödé")),
		(Schema::option(Schema::u32()), Value::none()),
		(Schema::option(Schema::u32()), Value::some(Value::u32(9))),
		(Schema::sequence(Schema::u16()), Value::sequence(vec![])),
		(Schema::sequence(Schema::u16()), Value::sequence(vec![Value::u16(1), Value::u16(2)])),
		(Schema::sequence(Schema::tuple(vec![])), Value::sequence(vec![Value::unnamed_composite(vec![]); 3])),
		(Schema::array(0, Schema::u8()), Value::sequence(vec![])),
		(
			Schema::array(3, Schema::Primitive(PrimitiveKind::I32)),
			Value::sequence(vec![Value::i32(-1), Value::i32(0), Value::i32(1)]),
		),
		(Schema::tuple(vec![]), Value::unnamed_composite(vec![])),
		(
			Schema::tuple(vec![Schema::u8(), Schema::str()]),
			Value::unnamed_composite(vec![Value::u8(1), Value::str("a")]),
		),
		(
			Schema::named_struct([("a", Schema::u32()), ("b", Schema::option(Schema::bytes()))]),
			Value::named_composite([("a", Value::u32(1)), ("b", Value::some(Value::bytes([0xab, 0xcd])))]),
		),
		(Schema::reference("Byte"), Value::u8(3)),
		(Schema::reference("Wide"), Value::unit_variant("Low")),
		(
			Schema::reference("Wide"),
			Value::variant("Mid", Composite::Unnamed(vec![Value::u16(u16::MAX), Value::u8(0)])),
		),
		(
			Schema::reference("Wide"),
			Value::variant("High", Composite::Named(vec![("flag".into(), Value::bool(true))])),
		),
	];

	for (schema, value) in cases {
		let bytes = encode_to_vec(&set, &schema, &value).unwrap();
		let decoded = decode_all(&set, &schema, &bytes).unwrap();
		assert_eq!(decoded.value, value, "{} from {:?}", schema.describe(), bytes);
		assert_eq!(decoded.trailing, None, "{}", schema.describe());
	}

	// Four byte tags are little endian.
	let high = Value::variant("High", Composite::Named(vec![("flag".into(), Value::bool(false))]));
	assert_eq!(encode_to_vec(&set, &Schema::reference("Wide"), &high).unwrap(), vec![0xff, 0xff, 0xff, 0xff, 0x00]);
	bytes!(mid = "0x040302010100ff");
	assert_eq!(
		decode_all(&set, &Schema::reference("Wide"), &mid).unwrap().value,
		Value::variant("Mid", Composite::Unnamed(vec![Value::u16(1), Value::u8(0xff)]))
	);
}

#[test]
fn recursive_schemas_decode_nested_input() {
	let _ = pretty_env_logger::try_init();
	let set = xcm_set();
	let schema = Schema::reference("Xcm");

	for k in [0, 1, 5, 40] {
		let decoded = decode_all(&set, &schema, &nested_xcm(k)).unwrap();
		assert_eq!(decoded.trailing, None);

		let mut depth = 0;
		let mut current = &decoded.value;
		while let Some([instruction]) = current.as_sequence() {
			let variant = instruction.as_variant().unwrap();
			assert_eq!(variant.name, "SetErrorHandler");
			current = variant.values.values().next().unwrap();
			depth += 1;
		}
		assert_eq!(depth, k);
		assert_eq!(current.as_sequence(), Some(&[][..]));
	}
}

#[test]
fn recursive_schemas_fail_on_truncated_input() {
	let _ = pretty_env_logger::try_init();
	let set = xcm_set();
	let mut bytes = nested_xcm(10);
	bytes.pop();

	let err = decode_all(&set, &Schema::reference("Xcm"), &bytes).unwrap_err();
	assert_eq!(err.kind(), &DecodeErrorKind::Truncated { needed: 1, remaining: 0 });
	// Ten levels of (element 0, SetErrorHandler, field 0).
	assert_eq!(err.path().len(), 30);
	assert_eq!(
		err.path()[..3],
		[PathSegment::Index(0), PathSegment::Variant("SetErrorHandler".into()), PathSegment::Index(0)]
	);
}

#[test]
fn nesting_beyond_the_depth_limit_is_an_error() {
	let set = xcm_set();
	let options = DecodeOptions { max_depth: 16 };

	assert!(decoder::decode_all_with(&set, &Schema::reference("Xcm"), &nested_xcm(3), &options).is_ok());

	let err = decoder::decode_all_with(&set, &Schema::reference("Xcm"), &nested_xcm(10), &options).unwrap_err();
	assert_eq!(err.kind(), &DecodeErrorKind::DepthLimitExceeded(16));
}

#[test]
fn errors_point_at_the_failing_field() {
	let _ = pretty_env_logger::try_init();
	let set = xcm_set();
	// [ClearOrigin, Transact { weight: 5, call: <claims 4 bytes, has 1> }]
	let mut bytes = vec![0x08, 0x00, 0x01];
	bytes.extend(5u64.encode());
	bytes.extend([0x10, 0xff]);

	let err = decode_all(&set, &Schema::reference("Xcm"), &bytes).unwrap_err();
	assert_eq!(err.kind(), &DecodeErrorKind::Truncated { needed: 4, remaining: 1 });
	assert_eq!(
		err.path(),
		&[PathSegment::Index(1), PathSegment::Variant("Transact".into()), PathSegment::Field("call".into())]
	);
	assert_eq!(err.to_string(), "Ran out of data: needed 4 bytes but only 1 remain at [1]::Transact.call");
}

#[test]
fn trailing_bytes_are_reported_not_fatal() {
	let set = empty_set();
	let decoded = decode_all(&set, &Schema::bool(), &[0x01, 0xde, 0xad]).unwrap();
	assert_eq!(decoded.value, Value::bool(true));
	assert_eq!(decoded.trailing, Some(TrailingBytes { count: 2 }));
}

#[test]
fn unknown_references_in_unchecked_schemas() {
	let set = empty_set();
	let err = decode_value(&set, &Schema::reference("Nope"), &mut &[0u8][..]).unwrap_err();
	assert_eq!(err.kind(), &DecodeErrorKind::UnknownSchemaRef("Nope".into()));
}

#[test]
fn decoded_values_deserialize_into_rust_types() {
	#[derive(Debug, PartialEq, serde::Deserialize)]
	enum Instruction {
		ClearOrigin,
		Transact { weight: u64, call: Vec<u8> },
		SetErrorHandler(Vec<Instruction>),
	}

	let set = xcm_set();
	let mut bytes = vec![0x08, 0x02, 0x04, 0x00, 0x01];
	bytes.extend(9u64.encode());
	bytes.extend(vec![1u8, 2].encode());

	let decoded = decode_all(&set, &Schema::reference("Xcm"), &bytes).unwrap();
	let program: Vec<Instruction> = from_value(decoded.value).unwrap();
	assert_eq!(
		program,
		vec![
			Instruction::SetErrorHandler(vec![Instruction::ClearOrigin]),
			Instruction::Transact { weight: 9, call: vec![1, 2] },
		]
	);
}
