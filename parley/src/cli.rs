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

//! # CLI Collaborator
//!
//! This module defines the single seam between the translation units and the outside world: the
//! [`Cli`] trait. A `Cli` executes one command (or one multi-line command block) against a device
//! shell and hands back the raw terminal output. The contract is synchronous, ordered and
//! reliable. Timeouts, retries and session management belong to the implementation behind the
//! trait, never to the translation units.
//!
//! The module also provides [`TranscriptCli`], an offline implementation that replays recorded
//! `show` output and keeps a transcript of every command block it was handed. The test suite and
//! the `parley_main` binary are built on it.

use std::collections::HashMap;

use thiserror::Error;

/// Transport failures, raised by a [`Cli`] implementation.
///
/// Any of these is fatal for the current read or write operation. The translation units never
/// retry; a failed command block fails the entire operation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransportError {
    /// The session to the device is gone.
    #[error("Connection to the device was lost")]
    ConnectionLost,
    /// The device shell rejected the command block.
    #[error("Device rejected the command block: {0:?}")]
    CommandRejected(String),
}

/// A synchronous command channel to one device shell.
///
/// Implementations execute the command string as-is (multi-line blocks are one transcript, the
/// device processes the lines in the order written) and return everything the shell printed back.
pub trait Cli {
    /// Execute a command or command block and return the raw output.
    fn execute(&mut self, command: &str) -> Result<String, TransportError>;
}

/// Offline [`Cli`] built from recorded transcripts.
///
/// Commands with a registered response return that response; every other command returns an empty
/// string, which is how a real shell answers a `show` filter that matches nothing. The read path
/// treats empty output as "not found", so an unprepared `TranscriptCli` behaves like an
/// unconfigured device.
///
/// All executed commands are recorded in order and can be inspected with [`TranscriptCli::sent`],
/// which is what the write-path tests compare against literally.
#[derive(Debug, Default)]
pub struct TranscriptCli {
    responses: HashMap<String, String>,
    sent: Vec<String>,
    fail_on: Option<String>,
}

impl TranscriptCli {
    /// Create a transcript shell with no recorded responses.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the output to replay for an exact command string.
    pub fn respond(&mut self, command: impl Into<String>, output: impl Into<String>) -> &mut Self {
        self.responses.insert(command.into(), output.into());
        self
    }

    /// Make the given command fail with [`TransportError::ConnectionLost`].
    pub fn fail_on(&mut self, command: impl Into<String>) -> &mut Self {
        self.fail_on = Some(command.into());
        self
    }

    /// All commands executed so far, in order.
    pub fn sent(&self) -> &[String] {
        &self.sent
    }
}

impl Cli for TranscriptCli {
    fn execute(&mut self, command: &str) -> Result<String, TransportError> {
        self.sent.push(command.to_string());
        if self.fail_on.as_deref() == Some(command) {
            return Err(TransportError::ConnectionLost);
        }
        Ok(self.responses.get(command).cloned().unwrap_or_default())
    }
}
