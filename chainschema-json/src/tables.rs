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

use crate::{definitions::TypeExpr, Error};
use chainschema_common::Fingerprint;
use chainschema_core::{SchemaRoot, SchemaSet, VersionRegistry};
use serde::{
	de::{Deserializer, MapAccess, Visitor},
	Deserialize,
};
use std::{collections::HashMap, fmt, marker::PhantomData, sync::Arc};

/// Everything known about one chain: its schema sets, and the items that use them.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainTables {
	pub chain: String,
	#[serde(default)]
	pub schema_sets: Entries<TypeTable>,
	#[serde(default)]
	pub items: Vec<ItemExpr>,
}

/// One versioned item.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemExpr {
	pub name: String,
	pub fingerprint: Fingerprint,
	pub schema_set: String,
	#[serde(rename = "type")]
	pub ty: TypeExpr,
}

/// The entries of a JSON object, in document order. Unlike a map, duplicate keys are kept
/// so that they can be reported instead of silently overwritten.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entries<T>(pub Vec<(String, T)>);

/// The named types of one schema set.
pub type TypeTable = Entries<TypeExpr>;

impl<T> Default for Entries<T> {
	fn default() -> Self {
		Entries(Vec::new())
	}
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Entries<T> {
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: Deserializer<'de>,
	{
		struct EntriesVisitor<T>(PhantomData<T>);

		impl<'de, T: Deserialize<'de>> Visitor<'de> for EntriesVisitor<T> {
			type Value = Entries<T>;

			fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
				formatter.write_str("a map of names to definitions")
			}

			fn visit_map<V>(self, mut map: V) -> Result<Entries<T>, V::Error>
			where
				V: MapAccess<'de>,
			{
				let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
				while let Some(entry) = map.next_entry::<String, T>()? {
					entries.push(entry);
				}
				Ok(Entries(entries))
			}
		}

		deserializer.deserialize_map(EntriesVisitor(PhantomData))
	}
}

impl TypeTable {
	/// Build and validate a [`SchemaSet`] called `name` from these types.
	pub fn build(&self, name: &str) -> Result<SchemaSet, Error> {
		let mut builder = SchemaSet::builder(name);
		for (ty_name, ty) in &self.0 {
			builder.insert(ty_name.clone(), ty.to_schema());
		}
		builder.build().map_err(|source| Error::Schema { set: name.to_string(), source })
	}
}

impl ChainTables {
	/// Construct this struct from JSON
	pub fn from_json(raw_json: &str) -> Result<Self, Error> {
		let tables: ChainTables = serde_json::from_str(raw_json)?;
		Ok(tables)
	}

	/// Build every schema set, then register every item against the set it names.
	pub fn into_registry(self) -> Result<VersionRegistry, Error> {
		let mut sets = HashMap::with_capacity(self.schema_sets.0.len());
		for (name, table) in &self.schema_sets.0 {
			if sets.contains_key(name) {
				return Err(Error::DuplicateSchemaSet(name.clone()));
			}
			sets.insert(name.clone(), Arc::new(table.build(name)?));
		}

		let mut registry = VersionRegistry::new(self.chain.clone());
		for item in self.items {
			let set = sets
				.get(&item.schema_set)
				.ok_or_else(|| Error::UnknownSchemaSet { item: item.name.clone(), set: item.schema_set.clone() })?;
			let root = SchemaRoot::new(Arc::clone(set), item.ty.to_schema())
				.map_err(|source| Error::Schema { set: item.schema_set.clone(), source })?;
			registry.register(item.name, item.fingerprint, root)?;
		}

		log::debug!(
			"Loaded tables for '{}': {} schema sets, {} versioned items",
			registry.chain(),
			sets.len(),
			registry.len()
		);
		Ok(registry)
	}
}
