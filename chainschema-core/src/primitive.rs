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

//! Decoding of the SCALE wire primitives: fixed-width little endian integers, booleans,
//! compact integers, and length prefixed or fixed-size byte strings.
//!
//! Every function takes a cursor (`&mut &[u8]`) which is advanced past the bytes consumed.

use crate::decoder::{DecodeErrorKind, InvalidEncoding};
use crate::schema::{PrimitiveKind, UInt};
use crate::value::Primitive;

/// Split `len` bytes off the front of the cursor.
pub fn take<'a>(data: &mut &'a [u8], len: usize) -> Result<&'a [u8], DecodeErrorKind> {
	if data.len() < len {
		return Err(DecodeErrorKind::Truncated { needed: len, remaining: data.len() });
	}
	let (head, rest) = data.split_at(len);
	*data = rest;
	Ok(head)
}

fn take_array<const N: usize>(data: &mut &[u8]) -> Result<[u8; N], DecodeErrorKind> {
	let mut out = [0u8; N];
	out.copy_from_slice(take(data, N)?);
	Ok(out)
}

macro_rules! fixed_width {
	($($name:ident => $ty:ty),* $(,)?) => {
		$(
			pub fn $name(data: &mut &[u8]) -> Result<$ty, DecodeErrorKind> {
				take_array(data).map(<$ty>::from_le_bytes)
			}
		)*
	};
}

fixed_width! {
	decode_u8 => u8,
	decode_u16 => u16,
	decode_u32 => u32,
	decode_u64 => u64,
	decode_u128 => u128,
	decode_i8 => i8,
	decode_i16 => i16,
	decode_i32 => i32,
	decode_i64 => i64,
	decode_i128 => i128,
}

pub fn decode_bool(data: &mut &[u8]) -> Result<bool, DecodeErrorKind> {
	match decode_u8(data)? {
		0 => Ok(false),
		1 => Ok(true),
		b => Err(DecodeErrorKind::InvalidEncoding(InvalidEncoding::Bool(b))),
	}
}

/// Decode a compact encoded unsigned integer.
///
/// The low two bits of the first byte select the mode:
///
/// - `0b00`: single byte, value in the upper six bits (0..=63).
/// - `0b01`: two bytes, little endian, value in the upper fourteen bits (64..=2^14-1).
/// - `0b10`: four bytes, little endian, value in the upper thirty bits (2^14..=2^30-1).
/// - `0b11`: the upper six bits plus four give the number of little endian bytes that follow.
///
/// Values must use the smallest mode (and in big integer mode, the fewest bytes) able to hold
/// them, otherwise they are rejected as [`InvalidEncoding::NonCanonicalCompact`].
pub fn decode_compact(data: &mut &[u8]) -> Result<u128, DecodeErrorKind> {
	let prefix = *data.first().ok_or(DecodeErrorKind::Truncated { needed: 1, remaining: 0 })?;
	let non_canonical = DecodeErrorKind::InvalidEncoding(InvalidEncoding::NonCanonicalCompact);

	match prefix & 0b11 {
		0b00 => {
			*data = &data[1..];
			Ok(u128::from(prefix >> 2))
		}
		0b01 => {
			let val = u16::from_le_bytes(take_array(data)?) >> 2;
			if val <= 0b0011_1111 {
				return Err(non_canonical);
			}
			Ok(val.into())
		}
		0b10 => {
			let val = u32::from_le_bytes(take_array(data)?) >> 2;
			if val <= 0b0011_1111_1111_1111 {
				return Err(non_canonical);
			}
			Ok(val.into())
		}
		_ => {
			let len = usize::from(prefix >> 2) + 4;
			if len > 16 {
				return Err(DecodeErrorKind::InvalidEncoding(InvalidEncoding::CompactPrefix(prefix)));
			}
			take(data, 1)?;
			let bytes = take(data, len)?;
			let mut buf = [0u8; 16];
			buf[..len].copy_from_slice(bytes);
			let val = u128::from_le_bytes(buf);

			let canonical = if len == 4 { val > u128::from(u32::MAX >> 2) } else { bytes[len - 1] != 0 };
			if !canonical {
				return Err(non_canonical);
			}
			Ok(val)
		}
	}
}

/// Decode a compact integer which must fit into `width`.
pub fn decode_compact_as(data: &mut &[u8], width: UInt) -> Result<u128, DecodeErrorKind> {
	let val = decode_compact(data)?;
	if val > width.max_value() {
		return Err(DecodeErrorKind::InvalidEncoding(InvalidEncoding::CompactOutOfRange { value: val, target: width }));
	}
	Ok(val)
}

/// Decode a compact length prefix. Lengths that don't fit in a `usize` saturate, so that
/// they surface as [`DecodeErrorKind::Truncated`] once we try to read that much.
pub fn decode_len(data: &mut &[u8]) -> Result<usize, DecodeErrorKind> {
	decode_compact(data).map(|len| usize::try_from(len).unwrap_or(usize::MAX))
}

pub fn decode_bytes(data: &mut &[u8]) -> Result<Vec<u8>, DecodeErrorKind> {
	let len = decode_len(data)?;
	take(data, len).map(|b| b.to_vec())
}

pub fn decode_str(data: &mut &[u8]) -> Result<String, DecodeErrorKind> {
	let bytes = decode_bytes(data)?;
	String::from_utf8(bytes).map_err(|e| DecodeErrorKind::InvalidEncoding(InvalidEncoding::Utf8(e.utf8_error())))
}

/// Decode a single primitive value of the given kind.
pub fn decode_primitive(data: &mut &[u8], kind: &PrimitiveKind) -> Result<Primitive, DecodeErrorKind> {
	let val = match *kind {
		PrimitiveKind::Bool => Primitive::Bool(decode_bool(data)?),
		PrimitiveKind::U8 => Primitive::U8(decode_u8(data)?),
		PrimitiveKind::U16 => Primitive::U16(decode_u16(data)?),
		PrimitiveKind::U32 => Primitive::U32(decode_u32(data)?),
		PrimitiveKind::U64 => Primitive::U64(decode_u64(data)?),
		PrimitiveKind::U128 => Primitive::U128(decode_u128(data)?),
		PrimitiveKind::I8 => Primitive::I8(decode_i8(data)?),
		PrimitiveKind::I16 => Primitive::I16(decode_i16(data)?),
		PrimitiveKind::I32 => Primitive::I32(decode_i32(data)?),
		PrimitiveKind::I64 => Primitive::I64(decode_i64(data)?),
		PrimitiveKind::I128 => Primitive::I128(decode_i128(data)?),
		PrimitiveKind::Compact(width) => {
			// The range check in `decode_compact_as` makes each cast lossless.
			let val = decode_compact_as(data, width)?;
			match width {
				UInt::U8 => Primitive::U8(val as u8),
				UInt::U16 => Primitive::U16(val as u16),
				UInt::U32 => Primitive::U32(val as u32),
				UInt::U64 => Primitive::U64(val as u64),
				UInt::U128 => Primitive::U128(val),
			}
		}
		PrimitiveKind::Bytes => Primitive::Bytes(decode_bytes(data)?),
		PrimitiveKind::FixedBytes(len) => Primitive::Bytes(take(data, len)?.to_vec()),
		PrimitiveKind::Str => Primitive::Str(decode_str(data)?),
	};
	Ok(val)
}
