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

//! A per chain table that maps an item name and a [`Fingerprint`] to the schema that describes
//! the item's encoding. Lookups are exact; there is no notion of a "closest" version.

use crate::decoder::{self, DecodeError, DecodeOptions, Decoded};
use crate::schema::{Schema, SchemaError, SchemaSet};
use chainschema_common::Fingerprint;
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
	#[error("chain '{chain}' already has a schema registered for '{item_name}' with fingerprint {fingerprint}")]
	DuplicateEntry { chain: String, item_name: String, fingerprint: Fingerprint },
}

/// A root [`Schema`] along with the [`SchemaSet`] its references resolve against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaRoot {
	set: Arc<SchemaSet>,
	root: Schema,
}

impl SchemaRoot {
	/// Pair a root schema with its set, checking that every reference in it resolves.
	pub fn new(set: Arc<SchemaSet>, root: Schema) -> Result<SchemaRoot, SchemaError> {
		set.validate_schema("<root>", &root)?;
		Ok(SchemaRoot { set, root })
	}

	/// Use a named type from the set as the root.
	pub fn named(set: Arc<SchemaSet>, name: &str) -> Result<SchemaRoot, SchemaError> {
		if !set.contains(name) {
			return Err(SchemaError::UnresolvedRef {
				set: set.name().to_string(),
				from: "<root>".to_string(),
				name: name.to_string(),
			});
		}
		Ok(SchemaRoot { root: Schema::Ref(name.to_string()), set })
	}

	pub fn set(&self) -> &SchemaSet {
		&self.set
	}

	pub fn root(&self) -> &Schema {
		&self.root
	}

	/// Decode a complete buffer with this schema.
	pub fn decode_all(&self, bytes: &[u8], options: &DecodeOptions) -> Result<Decoded, DecodeError> {
		decoder::decode_all_with(&self.set, &self.root, bytes, options)
	}
}

/// One historical shape of one named item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionedEntry {
	pub item_name: String,
	pub fingerprint: Fingerprint,
	pub schema: SchemaRoot,
}

/// Every known version of every item for a single chain.
#[derive(Debug, Clone, Default)]
pub struct VersionRegistry {
	chain: String,
	items: HashMap<String, Vec<VersionedEntry>>,
}

impl VersionRegistry {
	pub fn new(chain: impl Into<String>) -> VersionRegistry {
		VersionRegistry { chain: chain.into(), items: HashMap::new() }
	}

	pub fn chain(&self) -> &str {
		&self.chain
	}

	/// Add a version of an item. Registering the same `(item_name, fingerprint)` twice is an
	/// error, even if the schemas are identical.
	pub fn register(
		&mut self,
		item_name: impl Into<String>,
		fingerprint: Fingerprint,
		schema: SchemaRoot,
	) -> Result<(), RegistryError> {
		let item_name = item_name.into();
		let entries = self.items.entry(item_name.clone()).or_default();
		if entries.iter().any(|e| e.fingerprint == fingerprint) {
			return Err(RegistryError::DuplicateEntry { chain: self.chain.clone(), item_name, fingerprint });
		}

		log::debug!("{}: registered {} version {}", self.chain, item_name, fingerprint);
		entries.push(VersionedEntry { item_name, fingerprint, schema });
		Ok(())
	}

	/// Find the entry whose fingerprint matches exactly.
	pub fn resolve(&self, item_name: &str, fingerprint: &Fingerprint) -> Option<&VersionedEntry> {
		self.items.get(item_name)?.iter().find(|e| &e.fingerprint == fingerprint)
	}

	/// All registered versions of an item, in registration order.
	pub fn versions(&self, item_name: &str) -> &[VersionedEntry] {
		self.items.get(item_name).map(|v| v.as_slice()).unwrap_or_default()
	}

	pub fn item_names(&self) -> impl Iterator<Item = &str> {
		self.items.keys().map(|k| k.as_str())
	}

	/// The total number of versioned entries.
	pub fn len(&self) -> usize {
		self.items.values().map(|v| v.len()).sum()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}
}
