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

//! Decode named, versioned items (calls and events) for any number of chains.
//!
//! A [`Decoder`] holds one [`VersionRegistry`] per chain. Each registry maps an item name and
//! the [`Fingerprint`] of its type description to the schema that was in use, so the caller
//! only needs to know which fingerprint a runtime declares for an item to decode its bytes.
//!
//! ```rust
//! use chainschema::{Decoder, Fingerprint, SchemaRoot, Value};
//! use chainschema::schema::{Schema, SchemaSet, UInt};
//! use std::sync::Arc;
//!
//! let set = SchemaSet::builder("v1")
//!     .with("Remark", Schema::named_struct([("remark", Schema::bytes()), ("tip", Schema::compact(UInt::U64))]))
//!     .build()
//!     .unwrap();
//! let fingerprint = Fingerprint::from_bytes([1; 32]);
//!
//! let mut decoder = Decoder::new();
//! decoder
//!     .register("polkadot", "System.remark", fingerprint, SchemaRoot::named(Arc::new(set), "Remark").unwrap())
//!     .unwrap();
//!
//! let item = decoder.decode_item("polkadot", "System.remark", &fingerprint, &[0x08, 0xbe, 0xef, 0x04]).unwrap();
//! assert_eq!(item.value.field("remark"), Some(&Value::bytes([0xbe, 0xef])));
//! assert_eq!(item.value.field("tip"), Some(&Value::u64(1)));
//! assert!(item.trailing.is_none());
//! ```

#![forbid(unsafe_code)]
#[deny(unused)]
mod error;
pub mod types;

use std::collections::HashMap;

pub use self::error::Error;
pub use chainschema_common::Fingerprint;
pub use chainschema_core::{decoder, schema, value, DecodeOptions, SchemaRoot, Value, VersionRegistry};
pub use types::DecodedItem;

#[derive(Debug, Clone, Default)]
pub struct Decoder {
	chains: HashMap<String, VersionRegistry>,
	options: DecodeOptions,
}

impl Decoder {
	pub fn new() -> Self {
		Self::default()
	}

	/// Create a decoder which applies `options` to every decode.
	pub fn with_options(options: DecodeOptions) -> Self {
		Self { chains: HashMap::new(), options }
	}

	/// Register one version of an item, creating the chain's registry if need be.
	pub fn register(
		&mut self,
		chain: &str,
		item_name: impl Into<String>,
		fingerprint: Fingerprint,
		schema: SchemaRoot,
	) -> Result<(), Error> {
		let registry = self.chains.entry(chain.to_string()).or_insert_with(|| VersionRegistry::new(chain));
		registry.register(item_name, fingerprint, schema)?;
		Ok(())
	}

	/// Install a complete registry for a chain which has not been registered yet.
	pub fn register_chain(&mut self, registry: VersionRegistry) -> Result<(), Error> {
		if self.chains.contains_key(registry.chain()) {
			return Err(Error::DuplicateChain(registry.chain().to_string()));
		}
		log::debug!("Registered chain '{}' with {} versioned items", registry.chain(), registry.len());
		self.chains.insert(registry.chain().to_string(), registry);
		Ok(())
	}

	/// Load one chain's tables from JSON and register them.
	#[cfg(feature = "json")]
	pub fn register_tables(&mut self, json: &str) -> Result<(), Error> {
		let registry = chainschema_json::load_tables(json).map_err(|e| Error::Tables(Box::new(e)))?;
		self.register_chain(registry)
	}

	/// Decode the bytes of an item, using the schema registered for the given fingerprint.
	///
	/// Bytes left over after decoding don't fail the decode; they are logged and reported
	/// in [`DecodedItem::trailing`].
	pub fn decode_item(
		&self,
		chain: &str,
		item_name: &str,
		fingerprint: &Fingerprint,
		data: &[u8],
	) -> Result<DecodedItem, Error> {
		let registry = self.chains.get(chain).ok_or_else(|| Error::UnknownChain(chain.to_string()))?;
		let entry = registry
			.resolve(item_name, fingerprint)
			.ok_or_else(|| Error::UnsupportedVersion { item_name: item_name.to_string(), fingerprint: *fingerprint })?;

		let decoded = entry.schema.decode_all(data, &self.options).map_err(|source| Error::Decode {
			item_name: item_name.to_string(),
			fingerprint: *fingerprint,
			source,
		})?;

		if let Some(trailing) = decoded.trailing {
			log::warn!("{}: decoding {} ({}) left {} bytes unconsumed", chain, item_name, fingerprint, trailing.count);
		}
		Ok(DecodedItem { value: decoded.value, trailing: decoded.trailing })
	}

	pub fn has_chain(&self, chain: &str) -> bool {
		self.chains.contains_key(chain)
	}

	pub fn registry(&self, chain: &str) -> Option<&VersionRegistry> {
		self.chains.get(chain)
	}

	pub fn options(&self) -> &DecodeOptions {
		&self.options
	}
}
