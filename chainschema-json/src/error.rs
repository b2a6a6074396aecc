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

use chainschema_core::{RegistryError, SchemaError};

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Failed to parse chain tables: {0}")]
	Json(#[from] serde_json::Error),
	#[error("Invalid schema set '{set}': {source}")]
	Schema { set: String, source: SchemaError },
	#[error("Schema set '{0}' is defined more than once")]
	DuplicateSchemaSet(String),
	#[error("Item '{item}' refers to unknown schema set '{set}'")]
	UnknownSchemaSet { item: String, set: String },
	#[error(transparent)]
	Registry(#[from] RegistryError),
}
