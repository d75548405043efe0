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

//! Module containing all error types shared between the translation units.
//!
//! Errors follow a fixed taxonomy. A record or line that is simply *absent* is never an error
//! (readers return `Ok(None)`). Device output that is recognized but invalid fails the operation
//! with a [`ParseError`], because silently defaulting a half-understood rule would make the write
//! path render wrong commands later. Benign unknowns (an unrecognized forwarding action, an
//! unknown ICMP type name) are logged and leave the field unset; they live inside the record
//! types, not here.

use crate::acl::AclType;
use crate::bgp::checker::CheckError;
use crate::cli::TransportError;
use thiserror::Error;

/// Errors raised while parsing device output into structured records.
///
/// Every variant aborts the surrounding read or write operation. None of these are retried.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    /// The protocol literal is not one the unit can represent.
    #[error("Unknown protocol literal: {0:?}")]
    UnknownProtocol(String),
    /// A port or TTL clause used a keyword outside of eq/neq/lt/gt/range.
    #[error("Unknown range keyword: {0:?}")]
    UnknownRangeKeyword(String),
    /// A range clause is structurally broken (missing bound, inverted bounds, bound outside of
    /// the keyword's allowed positions).
    #[error("Malformed range clause: {0}")]
    MalformedRange(String),
    /// A numeric value lies outside of the domain of its clause.
    #[error("Value {value} is outside of the domain [{min}, {max}]")]
    OutOfDomain {
        /// The offending value, as found on the line.
        value: u32,
        /// Lower domain bound.
        min: u16,
        /// Upper domain bound.
        max: u16,
    },
    /// A named service could not be resolved to a port number.
    #[error("Unknown service name: {0:?}")]
    UnknownServiceName(String),
    /// An address token is neither `any`, `host <addr>` nor a prefix.
    #[error("Invalid address: {0:?}")]
    InvalidAddress(String),
    /// A token did not parse as a number.
    #[error("Invalid number: {0:?}")]
    InvalidNumber(String),
    /// The line ended although the grammar still expects a token.
    #[error("Unexpected end of line, expecting {0}")]
    UnexpectedEndOfLine(&'static str),
    /// An `address-family` clause names a family the unit does not know.
    #[error("Unknown address family: {0:?}")]
    UnknownAddressFamily(String),
    /// A `router bgp` section header could not be parsed.
    #[error("Malformed router bgp header: {0:?}")]
    MalformedBgpHeader(String),
}

/// Errors raised while rendering structured records into command text.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RenderError {
    /// The interval covers the full domain or is otherwise not expressible as one of the five
    /// keyword forms. Callers must omit the clause instead of encoding it.
    #[error("Interval [{lower}, {upper}] has no device keyword form")]
    UnencodableInterval {
        /// Lower bound of the offending interval.
        lower: u16,
        /// Upper bound of the offending interval.
        upper: u16,
    },
    /// The entry's forwarding action could not be represented on read, so the rule cannot be
    /// rendered without guessing.
    #[error("Entry {0} has no representable forwarding action")]
    MissingAction(u32),
}

/// Errors raised by the read path of a translation unit.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReadError {
    /// The transport collaborator failed. Fatal for the current operation.
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),
    /// The device output was recognized as invalid.
    #[error("Cannot parse device output: {0}")]
    Parse(#[from] ParseError),
}

/// Errors raised by the write path of a translation unit.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum WriteError {
    /// The transport collaborator failed, before or during transmission of the block.
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),
    /// A write-side precondition read failed to parse.
    #[error("Cannot parse device output: {0}")]
    Parse(#[from] ParseError),
    /// The record references an access list that does not exist on the device. Raised before any
    /// command is sent.
    #[error("Access list {name:?} ({acl_type}) does not exist on the device")]
    MissingAclSet {
        /// Name of the missing set.
        name: String,
        /// Type of the missing set.
        acl_type: AclType,
    },
    /// A cross-record consistency check rejected the new configuration.
    #[error("{0}")]
    Check(#[from] CheckError),
    /// The record contains a value with no device syntax.
    #[error("Cannot render record: {0}")]
    Render(#[from] RenderError),
}

/// Main error type, aggregating every failure a translation unit can produce.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    /// Error on the read path.
    #[error("Read error: {0}")]
    Read(#[from] ReadError),
    /// Error on the write path.
    #[error("Write error: {0}")]
    Write(#[from] WriteError),
}

impl From<TransportError> for Error {
    fn from(cause: TransportError) -> Self {
        Self::Read(ReadError::Transport(cause))
    }
}

impl From<ParseError> for Error {
    fn from(cause: ParseError) -> Self {
        Self::Read(ReadError::Parse(cause))
    }
}
