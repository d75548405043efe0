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

//! # Translation Contracts
//!
//! The external dispatch framework addresses configuration by path and hands the units either a
//! key to read or a before/after pair to write. This module pins those two contracts down as
//! traits, plus the [`Modifier`] type that carries a single before/after change.
//!
//! Readers reconstruct records from device text on every call. There is no cache: the device's
//! running configuration is the only store, and absence of a record is `Ok(None)`, never an
//! error.

use crate::cli::Cli;
use crate::error::{ReadError, WriteError};

/// Read direction of a translation unit: enumerate the keys of a list on the device, and read
/// one record per key.
pub trait ListReader<C: Cli> {
    /// Key identifying one record within the list (e.g. a sequence number).
    type Key;
    /// The structured record this unit produces.
    type Record;

    /// List the keys of all records currently present on the device, in device order.
    fn list_keys(&self, cli: &mut C) -> Result<Vec<Self::Key>, ReadError>;

    /// Read the record stored under `key`. Returns `Ok(None)` if the record does not exist.
    fn read(&self, cli: &mut C, key: &Self::Key) -> Result<Option<Self::Record>, ReadError>;
}

/// Write direction of a translation unit.
///
/// A writer renders a record into a literal command block and sends it through the [`Cli`]. A
/// write either fully succeeds (the entire block is accepted) or fails before or during
/// transmission; no partial-apply recovery is attempted at this layer.
pub trait Writer<C: Cli> {
    /// The structured record this unit consumes.
    type Record;

    /// Create the record on the device.
    fn write(&self, cli: &mut C, record: &Self::Record) -> Result<(), WriteError>;

    /// Replace the record stored under the same key, diff-aware where the dialect allows it.
    fn update(
        &self,
        cli: &mut C,
        before: &Self::Record,
        after: &Self::Record,
    ) -> Result<(), WriteError>;

    /// Remove the record. Keyed on the record's identity only; this must succeed even when the
    /// last known record is incomplete.
    fn delete(&self, cli: &mut C, record: &Self::Record) -> Result<(), WriteError>;
}

/// A single change to one record, as handed down by the dispatch framework. The modifier either
/// inserts a new record, removes an existing one, or replaces an existing record with a new
/// version under the same key.
#[derive(Debug, Clone, PartialEq)]
pub enum Modifier<R> {
    /// Insert a new record.
    Insert(R),
    /// Remove an existing record.
    Remove(R),
    /// Replace an existing record.
    Update {
        /// The record as it was before the change.
        from: R,
        /// The record replacing it.
        to: R,
    },
}

impl<R> Modifier<R> {
    /// The record this modifier leaves on the device (the removed one for `Remove`).
    pub fn record(&self) -> &R {
        match self {
            Self::Insert(r) => r,
            Self::Remove(r) => r,
            Self::Update { to, .. } => to,
        }
    }

    /// Reverses the modifier. An insert becomes a remove, and viceversa. An update swaps its two
    /// records.
    pub fn reverse(self) -> Self {
        match self {
            Self::Insert(r) => Self::Remove(r),
            Self::Remove(r) => Self::Insert(r),
            Self::Update { from, to } => Self::Update { from: to, to: from },
        }
    }
}

/// Dispatch a [`Modifier`] onto the three writer operations.
pub fn apply<C, W>(writer: &W, cli: &mut C, modifier: &Modifier<W::Record>) -> Result<(), WriteError>
where
    C: Cli,
    W: Writer<C>,
{
    match modifier {
        Modifier::Insert(r) => writer.write(cli, r),
        Modifier::Remove(r) => writer.delete(cli, r),
        Modifier::Update { from, to } => writer.update(cli, from, to),
    }
}
