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

//! A crate to decode SCALE encoded call and event data against versioned, fingerprint-selected schemas.
//!
//! - [`schema`] describes the shape of encoded data as a tree of [`Schema`] nodes collected into a [`SchemaSet`].
//! - [`decoder`] walks a schema and a byte cursor to produce a [`Value`].
//! - [`registry`] maps an item name and a [`Fingerprint`] to the schema that applies to it.

#![forbid(unsafe_code)]

pub mod decoder;
pub mod encoder;
pub mod primitive;
pub mod registry;
pub mod schema;
pub mod value;

pub use chainschema_common::Fingerprint;
pub use decoder::{DecodeError, DecodeErrorKind, DecodeOptions, Decoded, InvalidEncoding, PathSegment, TrailingBytes};
pub use registry::{RegistryError, SchemaRoot, VersionRegistry, VersionedEntry};
pub use schema::{Schema, SchemaError, SchemaSet};
pub use value::{Composite, Primitive, Value, Variant};
