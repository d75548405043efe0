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

//! Module containing the access-list data model.
//!
//! Entities here have no persistence of their own. The device's running configuration is the
//! store; every entry is reconstructed from device text on each read, rendered fresh on each
//! write, and never mutated in place.

use crate::interval::Interval;
use ipnet::{Ipv4Net, Ipv6Net};
use std::fmt;
use std::net::{Ipv4Addr, Ipv6Addr};

/// Type of an access list. Together with the name, this is the key of a set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AclType {
    /// IPv4 list matching on the full five-tuple plus TTL.
    Ipv4Extended,
    /// IPv4 list matching on the source only, with an optional wildcard mask.
    Ipv4Standard,
    /// IPv6 list.
    Ipv6,
}

impl AclType {
    /// Returns true if sets of this type hold IPv6 entries.
    pub fn is_ipv6(&self) -> bool {
        matches!(self, Self::Ipv6)
    }

    /// The configuration-mode header line opening a set of this type.
    pub(crate) fn header(&self, name: &str) -> String {
        match self {
            Self::Ipv4Extended => format!("ip access-list extended {}", name),
            Self::Ipv4Standard => format!("ip access-list standard {}", name),
            Self::Ipv6 => format!("ipv6 access-list {}", name),
        }
    }
}

impl fmt::Display for AclType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ipv4Extended => write!(f, "ipv4 extended"),
            Self::Ipv4Standard => write!(f, "ipv4 standard"),
            Self::Ipv6 => write!(f, "ipv6"),
        }
    }
}

/// What happens to a packet matching the entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForwardingAction {
    /// The packet is forwarded (`permit`).
    Accept,
    /// The packet is discarded (`deny`).
    Drop,
}

impl ForwardingAction {
    /// The device keyword for this action.
    pub fn token(&self) -> &'static str {
        match self {
            Self::Accept => "permit",
            Self::Drop => "deny",
        }
    }
}

/// Canonical protocol identifier of an entry.
///
/// The v6 spellings `ipv6` and `icmpv6` map onto [`Protocol::Ip`] and [`Protocol::Icmp`]; the
/// address family is carried by the payload, not the protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Protocol {
    /// Any IP traffic.
    Ip,
    /// TCP.
    Tcp,
    /// UDP.
    Udp,
    /// ICMP or ICMPv6.
    Icmp,
}

impl Protocol {
    /// Returns true if entries with this protocol may carry port matches.
    pub fn has_ports(&self) -> bool {
        matches!(self, Self::Tcp | Self::Udp)
    }

    /// The device keyword for this protocol, in the spelling of the given family.
    pub fn token(&self, ipv6: bool) -> &'static str {
        match (self, ipv6) {
            (Self::Ip, false) => "ip",
            (Self::Ip, true) => "ipv6",
            (Self::Tcp, _) => "tcp",
            (Self::Udp, _) => "udp",
            (Self::Icmp, false) => "icmp",
            (Self::Icmp, true) => "icmpv6",
        }
    }
}

/// The header-match block of an entry. Exactly one address family is populated, consistent with
/// the type of the owning set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddressFamilyPayload {
    /// IPv4 source/destination matches.
    V4 {
        /// Source prefix. `any` is the default route, `host a` is `a/32`.
        source: Ipv4Net,
        /// Wildcard mask accompanying the source in standard lists.
        source_wildcard: Option<Ipv4Addr>,
        /// Destination prefix.
        destination: Ipv4Net,
        /// Wildcard mask accompanying the destination.
        destination_wildcard: Option<Ipv4Addr>,
    },
    /// IPv6 source/destination matches.
    V6 {
        /// Source prefix. `any` is the default route, `host a` is `a/128`.
        source: Ipv6Net,
        /// Destination prefix.
        destination: Ipv6Net,
    },
}

impl AddressFamilyPayload {
    /// IPv4 payload matching any source and any destination.
    pub fn any_v4() -> Self {
        Self::V4 {
            source: any_v4_net(),
            source_wildcard: None,
            destination: any_v4_net(),
            destination_wildcard: None,
        }
    }

    /// IPv6 payload matching any source and any destination.
    pub fn any_v6() -> Self {
        Self::V6 { source: any_v6_net(), destination: any_v6_net() }
    }

    /// Returns true if the payload is IPv6.
    pub fn is_ipv6(&self) -> bool {
        matches!(self, Self::V6 { .. })
    }
}

/// The IPv4 default route, the prefix form of `any`.
pub(crate) fn any_v4_net() -> Ipv4Net {
    Ipv4Net::new(Ipv4Addr::UNSPECIFIED, 0).unwrap()
}

/// The IPv6 default route, the prefix form of `any`.
pub(crate) fn any_v6_net() -> Ipv6Net {
    Ipv6Net::new(Ipv6Addr::UNSPECIFIED, 0).unwrap()
}

/// Transport-layer matches of an entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transport {
    /// Source port clause.
    pub source_port: Option<Interval>,
    /// Destination port clause.
    pub destination_port: Option<Interval>,
    /// Match only packets belonging to an established connection.
    pub established: bool,
}

/// One access-list rule.
///
/// An absent `action` means the device line used a forwarding action this unit cannot represent.
/// Such an entry must be surfaced as-is, never guessed at, and the writer refuses to render it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AclEntry {
    /// Ordering key, unique within the owning set. Lower values are evaluated first.
    pub sequence_id: u32,
    /// Forwarding action, if representable.
    pub action: Option<ForwardingAction>,
    /// Canonical protocol.
    pub protocol: Protocol,
    /// Header matches of exactly one address family.
    pub payload: AddressFamilyPayload,
    /// Transport matches, present when any port or established match is configured.
    pub transport: Option<Transport>,
    /// ICMP message type, for ICMP entries.
    pub icmp_type: Option<u8>,
    /// TTL / hop-limit interval match.
    pub hop_range: Option<Interval>,
    /// Hop-limit ceiling. Populated alongside `hop_range` whenever the range starts at zero,
    /// since the device also expresses such a range as a single hop-limit value.
    pub hop_limit: Option<u8>,
}

impl AclEntry {
    /// Create an entry with the mandatory fields set and every optional match absent.
    pub fn new(
        sequence_id: u32,
        action: ForwardingAction,
        protocol: Protocol,
        payload: AddressFamilyPayload,
    ) -> Self {
        Self {
            sequence_id,
            action: Some(action),
            protocol,
            payload,
            transport: None,
            icmp_type: None,
            hop_range: None,
            hop_limit: None,
        }
    }
}

/// A named, typed, ordered collection of entries, keyed by `(name, type)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AclSet {
    /// Name of the set.
    pub name: String,
    /// Type of the set.
    pub acl_type: AclType,
    /// Entries in evaluation order. Sequence ids are unique within the set.
    pub entries: Vec<AclEntry>,
}

impl AclSet {
    /// Create an empty set.
    pub fn new(name: impl Into<String>, acl_type: AclType) -> Self {
        Self { name: name.into(), acl_type, entries: Vec::new() }
    }

    /// The key of this set.
    pub fn key(&self) -> (&str, AclType) {
        (&self.name, self.acl_type)
    }
}
