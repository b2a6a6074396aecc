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

use chainschema_common::Fingerprint;
use chainschema_core::{DecodeError, RegistryError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
	#[error("Chain '{0}' not registered with decoder")]
	UnknownChain(String),
	#[error("No schema registered for '{item_name}' with fingerprint {fingerprint}")]
	UnsupportedVersion { item_name: String, fingerprint: Fingerprint },
	#[error("Decoding '{item_name}' ({fingerprint}) failed: {source}")]
	Decode {
		item_name: String,
		fingerprint: Fingerprint,
		#[source]
		source: DecodeError,
	},
	#[error("Chain '{0}' is already registered")]
	DuplicateChain(String),
	#[error(transparent)]
	Registry(#[from] RegistryError),
	/// Only produced when loading tables through the `json` feature.
	#[error("Failed to load chain tables: {0}")]
	Tables(#[source] Box<dyn std::error::Error + Send + Sync + 'static>),
}
