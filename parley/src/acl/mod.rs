// Parley: Translating Network Device CLI Dialects
// Copyright (C) 2021  Parley Contributors
//
// This program is free software; you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation; either version 2 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along
// with this program; if not, write to the Free Software Foundation, Inc.,
// 51 Franklin Street, Fifth Floor, Boston, MA 02110-1301 USA.

//! # Access-List Translation Unit
//!
//! The densest unit in the library. The read path locates one numbered line inside the output of
//! `show access-lists <name>` and consumes it token by token in the device's fixed argument
//! order; the write path renders one command block per entry, choosing among mutually exclusive
//! command shapes based on the entry's protocol.
//!
//! Three set types are supported: extended IPv4, standard IPv4 (source-only matches with an
//! optional wildcard mask) and IPv6. Entries are keyed by their sequence id, which is also the
//! device's evaluation order. An update re-renders the entry under the same sequence id, because
//! resubmitting a numbered line replaces it on the device.

pub mod parser;
pub mod types;
pub mod writer;

pub use parser::{find_entry_line, list_entry_lines, parse_entry_line, AclEntryReader};
pub use types::{
    AclEntry, AclSet, AclType, AddressFamilyPayload, ForwardingAction, Protocol, Transport,
};
pub use writer::{render_delete, render_entry, render_entry_line, AclEntryWriter, AclSetWriter};
