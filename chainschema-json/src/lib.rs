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

//! Load the declarative tables that describe a chain (its schema sets and the versioned
//! items that point into them) from JSON into a [`VersionRegistry`].
//!
//! ```json
//! {
//!   "chain": "kusama",
//!   "schemaSets": {
//!     "v9030": {
//!       "AccountId": { "fixedBytes": 32 },
//!       "Transfer": { "struct": [
//!         { "name": "dest", "type": "AccountId" },
//!         { "name": "value", "type": { "compact": "u128" } }
//!       ] }
//!     }
//!   },
//!   "items": [
//!     { "name": "Balances.transfer", "fingerprint": "0x…", "schemaSet": "v9030", "type": "Transfer" }
//!   ]
//! }
//! ```

mod definitions;
mod error;
mod tables;

pub use chainschema_core::VersionRegistry;
pub use definitions::{AlternativeExpr, FieldExpr, FieldsExpr, NodeExpr, TagExpr, TypeExpr, UIntExpr, VariantExpr};
pub use error::Error;
pub use tables::{ChainTables, Entries, ItemExpr, TypeTable};

/// Parse one chain's tables and build its registry.
pub fn load_tables(json: &str) -> Result<VersionRegistry, Error> {
	ChainTables::from_json(json)?.into_registry()
}
