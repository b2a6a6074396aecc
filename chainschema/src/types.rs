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

use chainschema_core::{TrailingBytes, Value};

/// A successfully decoded item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedItem {
	pub value: Value,
	/// Set if the input held more bytes than the item's schema consumed.
	pub trailing: Option<TrailingBytes>,
}

impl DecodedItem {
	pub fn into_value(self) -> Value {
		self.value
	}
}
