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

use super::{Fields, Schema, TagWidth, VariantDef};
use std::collections::{HashMap, HashSet};

/// Errors raised while building a [`SchemaSet`] or checking a schema against one.
/// These indicate a problem with the tables describing a chain, not with encoded data.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
	#[error("schema set '{set}' defines type '{name}' more than once")]
	DuplicateType { set: String, name: String },
	#[error("'{from}' refers to '{name}', which is not defined in schema set '{set}'")]
	UnresolvedRef { set: String, from: String, name: String },
	#[error("variant in '{from}' declares tag index {index} more than once")]
	DuplicateVariantIndex { from: String, index: u32 },
	#[error("variant in '{from}' declares alternative '{name}' more than once")]
	DuplicateVariantName { from: String, name: String },
	#[error("variant in '{from}' declares tag index {index}, which does not fit in a {width} tag")]
	VariantIndexOutOfRange { from: String, index: u32, width: TagWidth },
	#[error("type '{0}' contains itself without consuming any input")]
	UnguardedRecursion(String),
}

/// An immutable, named collection of [`Schema`]s for one runtime version of one chain.
///
/// [`Schema::Ref`] names are resolved only within the set that holds them. A set is
/// validated once when it is built and never mutated afterwards, so it can be shared
/// freely (usually behind an [`std::sync::Arc`]) between decode calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaSet {
	name: String,
	types: HashMap<String, Schema>,
}

impl SchemaSet {
	/// Start building a new set.
	pub fn builder(name: impl Into<String>) -> SchemaSetBuilder {
		SchemaSetBuilder { name: name.into(), types: HashMap::new(), duplicates: Vec::new() }
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	/// Look up a named type.
	pub fn resolve(&self, name: &str) -> Option<&Schema> {
		self.types.get(name)
	}

	pub fn contains(&self, name: &str) -> bool {
		self.types.contains_key(name)
	}

	pub fn len(&self) -> usize {
		self.types.len()
	}

	pub fn is_empty(&self) -> bool {
		self.types.is_empty()
	}

	pub fn type_names(&self) -> impl Iterator<Item = &str> {
		self.types.keys().map(|k| k.as_str())
	}

	/// Check a schema which is not itself part of the set (eg the root of a registry entry)
	/// against it: every reference must resolve and every variant must be well formed.
	pub fn validate_schema(&self, from: &str, schema: &Schema) -> Result<(), SchemaError> {
		validate_node(&self.name, &self.types, from, schema)
	}
}

/// Collects named types and validates them into a [`SchemaSet`].
#[derive(Debug, Clone)]
pub struct SchemaSetBuilder {
	name: String,
	types: HashMap<String, Schema>,
	duplicates: Vec<String>,
}

impl SchemaSetBuilder {
	/// Add a named type. Defining a name twice is reported by [`SchemaSetBuilder::build`].
	pub fn insert(&mut self, name: impl Into<String>, schema: Schema) -> &mut Self {
		let name = name.into();
		if self.types.contains_key(&name) {
			self.duplicates.push(name);
		} else {
			self.types.insert(name, schema);
		}
		self
	}

	/// Like [`SchemaSetBuilder::insert`], but by value for chaining.
	pub fn with(mut self, name: impl Into<String>, schema: Schema) -> Self {
		self.insert(name, schema);
		self
	}

	/// Validate the collected types and freeze them into a [`SchemaSet`].
	pub fn build(self) -> Result<SchemaSet, SchemaError> {
		if let Some(name) = self.duplicates.into_iter().next() {
			return Err(SchemaError::DuplicateType { set: self.name, name });
		}

		// Sorted so that the first error reported doesn't depend on hash order.
		let mut names: Vec<&String> = self.types.keys().collect();
		names.sort();
		for name in names {
			validate_node(&self.name, &self.types, name, &self.types[name])?;
		}
		check_unguarded_recursion(&self.types)?;

		log::trace!("Built schema set '{}' with {} types", self.name, self.types.len());
		Ok(SchemaSet { name: self.name, types: self.types })
	}
}

fn validate_node(set: &str, types: &HashMap<String, Schema>, from: &str, schema: &Schema) -> Result<(), SchemaError> {
	match schema {
		Schema::Primitive(_) => Ok(()),
		Schema::Struct(fields) => fields.iter().try_for_each(|f| validate_node(set, types, from, &f.schema)),
		Schema::Variant(def) => validate_variant(set, types, from, def),
		Schema::Option(inner) | Schema::Sequence(inner) | Schema::Array { inner, .. } => {
			validate_node(set, types, from, inner)
		}
		Schema::Tuple(elements) => elements.iter().try_for_each(|s| validate_node(set, types, from, s)),
		Schema::Ref(name) if types.contains_key(name) => Ok(()),
		Schema::Ref(name) => {
			Err(SchemaError::UnresolvedRef { set: set.to_string(), from: from.to_string(), name: name.clone() })
		}
	}
}

fn validate_variant(
	set: &str,
	types: &HashMap<String, Schema>,
	from: &str,
	def: &VariantDef,
) -> Result<(), SchemaError> {
	let mut indexes = HashSet::new();
	let mut names = HashSet::new();
	for alt in &def.alternatives {
		if alt.index > def.tag.max_value() {
			return Err(SchemaError::VariantIndexOutOfRange {
				from: from.to_string(),
				index: alt.index,
				width: def.tag,
			});
		}
		if !indexes.insert(alt.index) {
			return Err(SchemaError::DuplicateVariantIndex { from: from.to_string(), index: alt.index });
		}
		if !names.insert(alt.name.as_str()) {
			return Err(SchemaError::DuplicateVariantName { from: from.to_string(), name: alt.name.clone() });
		}
		alt.fields.schemas().try_for_each(|s| validate_node(set, types, from, s))?;
	}
	Ok(())
}

/// Collect the names reachable from `schema` without passing through a node
/// that consumes input before descending (option, sequence and variant all do).
fn collect_unguarded_refs<'a>(schema: &'a Schema, out: &mut Vec<&'a str>) {
	match schema {
		Schema::Ref(name) => out.push(name),
		Schema::Struct(fields) => fields.iter().for_each(|f| collect_unguarded_refs(&f.schema, out)),
		Schema::Tuple(elements) => elements.iter().for_each(|s| collect_unguarded_refs(s, out)),
		Schema::Array { len, inner } if *len > 0 => collect_unguarded_refs(inner, out),
		Schema::Array { .. }
		| Schema::Primitive(_)
		| Schema::Option(_)
		| Schema::Sequence(_)
		| Schema::Variant(_) => {}
	}
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Visit {
	InProgress,
	Done,
}

fn check_unguarded_recursion(types: &HashMap<String, Schema>) -> Result<(), SchemaError> {
	let edges: HashMap<&str, Vec<&str>> = types
		.iter()
		.map(|(name, schema)| {
			let mut refs = Vec::new();
			collect_unguarded_refs(schema, &mut refs);
			(name.as_str(), refs)
		})
		.collect();

	let mut names: Vec<&str> = edges.keys().copied().collect();
	names.sort_unstable();

	let mut state = HashMap::new();
	for name in names {
		visit(name, &edges, &mut state)?;
	}
	Ok(())
}

fn visit<'a>(
	name: &'a str,
	edges: &HashMap<&'a str, Vec<&'a str>>,
	state: &mut HashMap<&'a str, Visit>,
) -> Result<(), SchemaError> {
	match state.get(name) {
		Some(Visit::Done) => return Ok(()),
		Some(Visit::InProgress) => return Err(SchemaError::UnguardedRecursion(name.to_string())),
		None => {}
	}
	state.insert(name, Visit::InProgress);
	for next in edges.get(name).into_iter().flatten() {
		visit(*next, edges, state)?;
	}
	state.insert(name, Visit::Done);
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::schema::{Alternative, UInt};

	fn instruction_set() -> SchemaSetBuilder {
		SchemaSet::builder("xcm")
			.with("Xcm", Schema::sequence(Schema::reference("Instruction")))
			.with(
				"Instruction",
				Schema::variant(vec![
					Alternative::unit(0, "ClearOrigin"),
					Alternative::unnamed(1, "SetErrorHandler", vec![Schema::reference("Xcm")]),
					Alternative::named(
						2,
						"Transact",
						[("weight", Schema::compact(UInt::U64)), ("call", Schema::bytes())],
					),
				]),
			)
	}

	#[test]
	fn guarded_recursion_is_accepted() {
		let set = instruction_set().build().expect("valid set");
		assert_eq!(set.name(), "xcm");
		assert_eq!(set.len(), 2);
		assert!(set.resolve("Instruction").is_some());
		assert!(set.resolve("Missing").is_none());
	}

	#[test]
	fn unresolved_refs_are_rejected() {
		let err = SchemaSet::builder("v1")
			.with("Call", Schema::named_struct([("dest", Schema::reference("AccountId"))]))
			.build()
			.unwrap_err();
		assert_eq!(
			err,
			SchemaError::UnresolvedRef { set: "v1".into(), from: "Call".into(), name: "AccountId".into() }
		);
	}

	#[test]
	fn unguarded_recursion_is_rejected() {
		let err = SchemaSet::builder("v1")
			.with("A", Schema::named_struct([("b", Schema::reference("B"))]))
			.with("B", Schema::tuple(vec![Schema::u8(), Schema::reference("A")]))
			.build()
			.unwrap_err();
		assert_eq!(err, SchemaError::UnguardedRecursion("A".into()));

		let err = SchemaSet::builder("v1").with("Loop", Schema::reference("Loop")).build().unwrap_err();
		assert_eq!(err, SchemaError::UnguardedRecursion("Loop".into()));
	}

	#[test]
	fn bad_variants_are_rejected() {
		let dup = Schema::variant(vec![Alternative::unit(0, "A"), Alternative::unit(0, "B")]);
		let err = SchemaSet::builder("v1").with("E", dup).build().unwrap_err();
		assert_eq!(err, SchemaError::DuplicateVariantIndex { from: "E".into(), index: 0 });

		let wide = Schema::variant(vec![Alternative::unit(256, "A")]);
		let err = SchemaSet::builder("v1").with("E", wide).build().unwrap_err();
		assert!(matches!(err, SchemaError::VariantIndexOutOfRange { index: 256, .. }));
	}

	#[test]
	fn duplicate_names_are_rejected() {
		let err = SchemaSet::builder("v1").with("A", Schema::u8()).with("A", Schema::u16()).build().unwrap_err();
		assert_eq!(err, SchemaError::DuplicateType { set: "v1".into(), name: "A".into() });
	}

	#[test]
	fn roots_are_checked_against_the_set() {
		let set = instruction_set().build().unwrap();
		assert!(set.validate_schema("<root>", &Schema::reference("Xcm")).is_ok());
		assert!(matches!(
			set.validate_schema("<root>", &Schema::option(Schema::reference("Nope"))),
			Err(SchemaError::UnresolvedRef { .. })
		));
	}
}
