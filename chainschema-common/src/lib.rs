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

//! Common types shared by the schema registry, the table loader and the decoder facade.

#![forbid(unsafe_code)]
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::{fmt, str::FromStr};

/// A content hash identifying one historical shape of a call or event
/// within the type system of a chain's runtime.
///
/// Fingerprints are opaque: they are only ever compared for equality. The text
/// form is `0x` followed by 64 lowercase hex digits.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Fingerprint([u8; Fingerprint::LEN]);

impl Fingerprint {
	/// Number of bytes in a fingerprint.
	pub const LEN: usize = 32;

	pub const fn from_bytes(bytes: [u8; Fingerprint::LEN]) -> Self {
		Fingerprint(bytes)
	}

	pub fn as_bytes(&self) -> &[u8; Fingerprint::LEN] {
		&self.0
	}

	/// Parse a fingerprint from hex, with or without a leading `0x`.
	pub fn from_hex(s: &str) -> Result<Self, FingerprintError> {
		let s = s.strip_prefix("0x").unwrap_or(s);
		let bytes = hex::decode(s)?;
		let bytes: [u8; Fingerprint::LEN] = bytes
			.as_slice()
			.try_into()
			.map_err(|_| FingerprintError::Length { expected: Fingerprint::LEN, got: bytes.len() })?;
		Ok(Fingerprint(bytes))
	}
}

impl From<[u8; Fingerprint::LEN]> for Fingerprint {
	fn from(bytes: [u8; Fingerprint::LEN]) -> Self {
		Fingerprint(bytes)
	}
}

impl FromStr for Fingerprint {
	type Err = FingerprintError;
	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Fingerprint::from_hex(s)
	}
}

impl fmt::Display for Fingerprint {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "0x{}", hex::encode(self.0))
	}
}

impl fmt::Debug for Fingerprint {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "Fingerprint({})", self)
	}
}

impl Serialize for Fingerprint {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		serializer.serialize_str(&self.to_string())
	}
}

impl<'de> Deserialize<'de> for Fingerprint {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		let s = String::deserialize(deserializer)?;
		s.parse().map_err(de::Error::custom)
	}
}

/// Returned when a string cannot be parsed into a [`Fingerprint`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FingerprintError {
	#[error("fingerprint is not valid hex: {0}")]
	Hex(#[from] hex::FromHexError),
	#[error("fingerprint must be {expected} bytes long, got {got}")]
	Length { expected: usize, got: usize },
}
