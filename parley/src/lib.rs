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

#![deny(missing_docs, missing_debug_implementations)]

//! # Parley
//!
//! Parley is a library of per-vendor *translation units*: pairs of a READ path, which issues a
//! `show ...` command against a device shell and scrapes the free-text output into structured
//! configuration records, and a WRITE path, which renders structured records (diff-aware against
//! a prior snapshot) back into the literal command blocks the device shell accepts.
//!
//! The library itself never opens a connection. Everything that talks to a device does so through
//! the [`cli::Cli`] collaborator trait, a synchronous `execute(command) -> output` contract. This
//! keeps every translation unit fully testable by feeding literal strings and comparing literal
//! output.
//!
//! The representative dialect implemented here is an IOS-style command shell. Three units are
//! provided:
//!
//! - [`acl`]: access-list entries (extended IPv4, standard IPv4, IPv6), the densest unit, with
//!   port/TTL range codecs in [`interval`].
//! - [`bgp`]: `router bgp` neighbor and address-family configuration, including the global
//!   versus neighbor AFI/SAFI containment checker.
//! - [`platform`]: a read-only `show version` inventory scrape.
//!
//! ## Example usage
//!
//! The following example reads two access-list entries out of a recorded transcript:
//!
//! ```rust
//! use parley::acl::{AclEntryReader, AclType, ForwardingAction, Protocol};
//! use parley::cli::TranscriptCli;
//! use parley::translate::ListReader;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut cli = TranscriptCli::new();
//!     cli.respond(
//!         "show access-lists TEST",
//!         "ip access-list extended TEST\n\
//!          10 permit tcp any host 10.0.0.1 eq www\n\
//!          20 deny ip any any\n",
//!     );
//!
//!     let reader = AclEntryReader::new("TEST", AclType::Ipv4Extended);
//!     assert_eq!(reader.list_keys(&mut cli)?, vec![10, 20]);
//!
//!     let entry = reader.read(&mut cli, &10)?.expect("entry 10 exists");
//!     assert_eq!(entry.action, Some(ForwardingAction::Accept));
//!     assert_eq!(entry.protocol, Protocol::Tcp);
//!     Ok(())
//! }
//! ```

pub mod acl;
pub mod bgp;
pub mod cli;
mod error;
pub mod interval;
pub mod platform;
mod test;
pub mod translate;

pub use error::{Error, ParseError, ReadError, RenderError, WriteError};
