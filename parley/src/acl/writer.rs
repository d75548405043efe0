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

//! # Access-List Write Path
//!
//! Rendering is deterministic, side-effect-free text generation. Every command shape is an
//! explicit function from record to line; there is no template interpreter. Shape selection keys
//! on the entry's resolved protocol (and the owning set's type), and every entry produced by the
//! line parser round-trips into exactly one shape.
//!
//! Deletion uses a distinct template keyed on the sequence id only, so it succeeds even when the
//! last known record is incomplete.

use crate::acl::types::{AclEntry, AclSet, AclType, AddressFamilyPayload, Protocol, Transport};
use crate::cli::Cli;
use crate::error::{RenderError, WriteError};
use crate::interval::{encode, PORT_DOMAIN, TTL_DOMAIN};
use crate::translate::Writer;

use ipnet::{Ipv4Net, Ipv6Net};
use std::net::Ipv4Addr;

/// Render the single command line of an entry, without the surrounding block.
///
/// Fails with [`RenderError::MissingAction`] for an entry whose forwarding action could not be
/// represented on read; such a rule must never be guessed at.
///
/// # Panics
///
/// Panics if the entry matches none of the command shapes (port matches on a portless protocol,
/// an ICMP type on a non-ICMP entry, a transport block in a standard list). The line parser
/// never produces such an entry; hitting this is a contract violation in the caller, not a user
/// error.
pub fn render_entry_line(entry: &AclEntry, acl_type: AclType) -> Result<String, RenderError> {
    let action = entry.action.ok_or(RenderError::MissingAction(entry.sequence_id))?;
    let mut parts = vec![entry.sequence_id.to_string(), action.token().to_string()];

    if acl_type == AclType::Ipv4Standard {
        assert!(
            entry.transport.is_none() && entry.icmp_type.is_none() && entry.hop_range.is_none(),
            "entry {} carries extended matches but belongs to a standard list",
            entry.sequence_id
        );
        parts.push(standard_source_repr(entry));
        return Ok(parts.join(" "));
    }

    let ipv6 = entry.payload.is_ipv6();
    parts.push(entry.protocol.token(ipv6).to_string());

    match entry.protocol {
        Protocol::Tcp | Protocol::Udp => {
            let transport = entry.transport.clone().unwrap_or_default();
            parts.push(source_repr(&entry.payload));
            if let Some(ref port) = transport.source_port {
                parts.push(encode(port, PORT_DOMAIN)?);
            }
            parts.push(destination_repr(&entry.payload));
            if let Some(ref port) = transport.destination_port {
                parts.push(encode(port, PORT_DOMAIN)?);
            }
        }
        Protocol::Icmp => {
            assert_no_ports(entry);
            parts.push(source_repr(&entry.payload));
            parts.push(destination_repr(&entry.payload));
            if let Some(msg_type) = entry.icmp_type {
                parts.push(msg_type.to_string());
            }
        }
        Protocol::Ip => {
            assert_no_ports(entry);
            assert!(
                entry.icmp_type.is_none(),
                "entry {} carries an ICMP type but its protocol has no ICMP command shape",
                entry.sequence_id
            );
            parts.push(source_repr(&entry.payload));
            parts.push(destination_repr(&entry.payload));
        }
    }

    if entry.transport.as_ref().map(|t| t.established).unwrap_or(false) {
        parts.push("established".to_string());
    }
    if let Some(ref range) = entry.hop_range {
        parts.push(format!("ttl {}", encode(range, TTL_DOMAIN)?));
    }

    Ok(parts.join(" "))
}

fn assert_no_ports(entry: &AclEntry) {
    let has_ports = entry
        .transport
        .as_ref()
        .map(|t: &Transport| t.source_port.is_some() || t.destination_port.is_some())
        .unwrap_or(false);
    assert!(
        !has_ports,
        "entry {} carries port matches but its protocol has no port-bearing command shape",
        entry.sequence_id
    );
}

/// Render the full command block creating or replacing an entry.
pub fn render_entry(
    set_name: &str,
    acl_type: AclType,
    entry: &AclEntry,
) -> Result<String, RenderError> {
    Ok(command_block(set_name, acl_type, &render_entry_line(entry, acl_type)?))
}

/// Render the command block deleting the entry with the given sequence id.
pub fn render_delete(set_name: &str, acl_type: AclType, sequence_id: u32) -> String {
    command_block(set_name, acl_type, &format!("no {}", sequence_id))
}

fn command_block(set_name: &str, acl_type: AclType, line: &str) -> String {
    format!("configure terminal\n{}\n{}\nend\n", acl_type.header(set_name), line)
}

fn standard_source_repr(entry: &AclEntry) -> String {
    match &entry.payload {
        AddressFamilyPayload::V4 { source, source_wildcard: Some(wildcard), .. } => {
            format!("{} {}", source.addr(), wildcard)
        }
        AddressFamilyPayload::V4 { source, source_wildcard: None, .. } => v4_repr(source),
        AddressFamilyPayload::V6 { .. } => {
            panic!("entry {} is IPv6 but belongs to a standard IPv4 list", entry.sequence_id)
        }
    }
}

fn source_repr(payload: &AddressFamilyPayload) -> String {
    match payload {
        AddressFamilyPayload::V4 { source, source_wildcard, .. } => {
            wildcarded_v4_repr(source, source_wildcard.as_ref())
        }
        AddressFamilyPayload::V6 { source, .. } => v6_repr(source),
    }
}

fn destination_repr(payload: &AddressFamilyPayload) -> String {
    match payload {
        AddressFamilyPayload::V4 { destination, destination_wildcard, .. } => {
            wildcarded_v4_repr(destination, destination_wildcard.as_ref())
        }
        AddressFamilyPayload::V6 { destination, .. } => v6_repr(destination),
    }
}

fn wildcarded_v4_repr(net: &Ipv4Net, wildcard: Option<&Ipv4Addr>) -> String {
    match wildcard {
        Some(w) => format!("{} {}", net.addr(), w),
        None => v4_repr(net),
    }
}

fn v4_repr(net: &Ipv4Net) -> String {
    if net.prefix_len() == 0 {
        "any".to_string()
    } else if net.prefix_len() == 32 {
        format!("host {}", net.addr())
    } else {
        net.to_string()
    }
}

fn v6_repr(net: &Ipv6Net) -> String {
    if net.prefix_len() == 0 {
        "any".to_string()
    } else if net.prefix_len() == 128 {
        format!("host {}", net.addr())
    } else {
        net.to_string()
    }
}

/// Write path of the access-list entry unit.
///
/// `write` and `update` confirm the owning set exists on the device before anything is sent, so
/// the device never sees a block it would reject. An update re-renders the after-record under
/// the unchanged sequence id; resubmitting a numbered line replaces it.
#[derive(Debug, Clone)]
pub struct AclEntryWriter {
    set_name: String,
    acl_type: AclType,
}

impl AclEntryWriter {
    /// Writer for the entries of the given set.
    pub fn new(set_name: impl Into<String>, acl_type: AclType) -> Self {
        Self { set_name: set_name.into(), acl_type }
    }

    fn ensure_set_exists<C: Cli>(&self, cli: &mut C) -> Result<(), WriteError> {
        let output = cli.execute("show running-config | include access-list")?;
        let header = self.acl_type.header(&self.set_name);
        if output.lines().any(|line| line.trim() == header) {
            Ok(())
        } else {
            Err(WriteError::MissingAclSet {
                name: self.set_name.clone(),
                acl_type: self.acl_type,
            })
        }
    }
}

impl<C: Cli> Writer<C> for AclEntryWriter {
    type Record = AclEntry;

    fn write(&self, cli: &mut C, record: &AclEntry) -> Result<(), WriteError> {
        self.ensure_set_exists(cli)?;
        let block = render_entry(&self.set_name, self.acl_type, record)?;
        cli.execute(&block)?;
        Ok(())
    }

    fn update(&self, cli: &mut C, _before: &AclEntry, after: &AclEntry) -> Result<(), WriteError> {
        self.ensure_set_exists(cli)?;
        let block = render_entry(&self.set_name, self.acl_type, after)?;
        cli.execute(&block)?;
        Ok(())
    }

    fn delete(&self, cli: &mut C, record: &AclEntry) -> Result<(), WriteError> {
        cli.execute(&render_delete(&self.set_name, self.acl_type, record.sequence_id))?;
        Ok(())
    }
}

/// Write path of the access-list container itself.
#[derive(Debug, Clone, Default)]
pub struct AclSetWriter;

impl AclSetWriter {
    /// Create the set writer.
    pub fn new() -> Self {
        Self
    }
}

impl<C: Cli> Writer<C> for AclSetWriter {
    type Record = AclSet;

    fn write(&self, cli: &mut C, record: &AclSet) -> Result<(), WriteError> {
        let block = format!(
            "configure terminal\n{}\nend\n",
            record.acl_type.header(&record.name)
        );
        cli.execute(&block)?;
        Ok(())
    }

    /// Name and type are the key of a set, so there is nothing to change on the container
    /// itself; entry changes go through [`AclEntryWriter`].
    fn update(&self, _cli: &mut C, _before: &AclSet, _after: &AclSet) -> Result<(), WriteError> {
        Ok(())
    }

    fn delete(&self, cli: &mut C, record: &AclSet) -> Result<(), WriteError> {
        let block = format!(
            "configure terminal\nno {}\nend\n",
            record.acl_type.header(&record.name)
        );
        cli.execute(&block)?;
        Ok(())
    }
}
