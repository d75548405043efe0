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

//! # Access-List Read Path
//!
//! The locator finds the one line of `show access-lists` output belonging to a sequence id; the
//! line parser then consumes that line as an ordered queue of whitespace-separated tokens, in
//! the device's fixed argument order:
//!
//! ```text
//! [seq] action protocol srcAddr [srcPortClause] dstAddr [dstPortClause] [icmpType] [options...]
//! ```
//!
//! Standard IPv4 lists use the reduced grammar `[seq] action srcAddr [wildcard]`.
//!
//! Each sub-parser peeks at the next token to decide whether its optional clause is present and
//! consumes only on a match, so an absent clause leaves the queue untouched for the next field.
//! A literal the unit recognizes as invalid (an unknown protocol, a broken range clause) fails
//! the parse; a benign unknown (a strange forwarding action, an unknown ICMP type name) is
//! logged and leaves its field unset.

use crate::acl::types::{
    any_v4_net, any_v6_net, AclEntry, AclType, AddressFamilyPayload, ForwardingAction, Protocol,
    Transport,
};
use crate::cli::Cli;
use crate::error::{ParseError, ReadError};
use crate::interval::{self, Interval, PORT_DOMAIN, TTL_DOMAIN};
use crate::translate::ListReader;

use ipnet::{Ipv4Net, Ipv6Net};
use log::warn;
use regex::Regex;
use std::net::{Ipv4Addr, Ipv6Addr};

/// Find the single output line describing the entry with the given sequence id.
///
/// The match is anchored at the start of a line (leading whitespace allowed), so an id never
/// matches inside an unrelated line. Lines whose second token is `remark` are comments, not
/// rules, and are never returned. An absent id yields `None`; absence is not an error.
pub fn find_entry_line(output: &str, sequence_id: u32) -> Option<String> {
    let re = Regex::new(&format!(r"(?m)^\s*{} .*$", sequence_id)).unwrap();
    let result = re
        .find_iter(output)
        .map(|m| m.as_str().trim())
        .find(|line| !is_remark(line))
        .map(String::from);
    result
}

/// List every `(sequence id, line)` pair in the output, in device order, skipping remarks.
pub fn list_entry_lines(output: &str) -> Vec<(u32, String)> {
    let re = Regex::new(r"(?m)^\s*(\d+)\s+\S.*$").unwrap();
    re.captures_iter(output)
        .filter_map(|caps| {
            let line = caps.get(0).unwrap().as_str().trim();
            if is_remark(line) {
                return None;
            }
            caps[1].parse().ok().map(|id| (id, line.to_string()))
        })
        .collect()
}

fn is_remark(line: &str) -> bool {
    line.split_whitespace().nth(1) == Some("remark")
}

/// Parse one located line into an [`AclEntry`].
///
/// The line may or may not carry its leading sequence id (lines produced by the locator do); a
/// line without one yields an entry with sequence id 0.
pub fn parse_entry_line(line: &str, acl_type: AclType) -> Result<AclEntry, ParseError> {
    let mut tokens = Tokens::new(line);

    let sequence_id = match tokens.peek() {
        Some(tok) if tok.chars().all(|c| c.is_ascii_digit()) => {
            tokens.next();
            tok.parse().map_err(|_| ParseError::InvalidNumber(tok.to_string()))?
        }
        _ => 0,
    };
    let action = parse_action(&mut tokens)?;

    match acl_type {
        AclType::Ipv4Standard => parse_standard_entry(&mut tokens, sequence_id, action),
        _ => parse_extended_entry(&mut tokens, acl_type, sequence_id, action),
    }
}

fn parse_action(tokens: &mut Tokens) -> Result<Option<ForwardingAction>, ParseError> {
    match tokens.expect("forwarding action")? {
        "permit" => Ok(Some(ForwardingAction::Accept)),
        "deny" => Ok(Some(ForwardingAction::Drop)),
        other => {
            warn!("Unrecognized forwarding action {:?}, leaving the action unset", other);
            Ok(None)
        }
    }
}

fn parse_standard_entry(
    tokens: &mut Tokens,
    sequence_id: u32,
    action: Option<ForwardingAction>,
) -> Result<AclEntry, ParseError> {
    let (source, source_wildcard) = parse_standard_source(tokens)?;
    while let Some(tok) = tokens.next() {
        match tok {
            "log" => {}
            other => warn!("Ignoring unrecognized trailing token {:?}", other),
        }
    }
    Ok(AclEntry {
        sequence_id,
        action,
        protocol: Protocol::Ip,
        payload: AddressFamilyPayload::V4 {
            source,
            source_wildcard,
            destination: any_v4_net(),
            destination_wildcard: None,
        },
        transport: None,
        icmp_type: None,
        hop_range: None,
        hop_limit: None,
    })
}

fn parse_extended_entry(
    tokens: &mut Tokens,
    acl_type: AclType,
    sequence_id: u32,
    action: Option<ForwardingAction>,
) -> Result<AclEntry, ParseError> {
    let ipv6 = acl_type.is_ipv6();
    let protocol = parse_protocol(tokens.expect("protocol")?)?;

    // addresses and port clauses, in fixed order
    let (payload, source_port, destination_port) = if ipv6 {
        let source = parse_v6_address(tokens)?;
        let source_port = parse_port_clause(tokens, protocol)?;
        let destination = parse_v6_address(tokens)?;
        let destination_port = parse_port_clause(tokens, protocol)?;
        (AddressFamilyPayload::V6 { source, destination }, source_port, destination_port)
    } else {
        let source = parse_v4_address(tokens)?;
        let source_port = parse_port_clause(tokens, protocol)?;
        let destination = parse_v4_address(tokens)?;
        let destination_port = parse_port_clause(tokens, protocol)?;
        (
            AddressFamilyPayload::V4 {
                source,
                source_wildcard: None,
                destination,
                destination_wildcard: None,
            },
            source_port,
            destination_port,
        )
    };

    let icmp_type =
        if protocol == Protocol::Icmp { parse_icmp_type(tokens, ipv6) } else { None };

    // trailing options, order-independent on the device
    let mut established = false;
    let mut hop_range: Option<Interval> = None;
    while let Some(tok) = tokens.next() {
        match tok {
            "established" => established = true,
            "ttl" => hop_range = Some(parse_ttl_body(tokens)?),
            "log" => {}
            other => warn!("Ignoring unrecognized trailing token {:?}", other),
        }
    }

    // a range starting at zero is also expressible as a single hop-limit ceiling
    let hop_limit = match hop_range {
        Some(ref range) if range.lower() == TTL_DOMAIN.min => Some(range.upper() as u8),
        _ => None,
    };

    let transport = if source_port.is_some() || destination_port.is_some() || established {
        Some(Transport { source_port, destination_port, established })
    } else {
        None
    };

    Ok(AclEntry {
        sequence_id,
        action,
        protocol,
        payload,
        transport,
        icmp_type,
        hop_range,
        hop_limit,
    })
}

fn parse_protocol(token: &str) -> Result<Protocol, ParseError> {
    match token {
        "ip" | "ipv4" | "ipv6" => Ok(Protocol::Ip),
        "tcp" => Ok(Protocol::Tcp),
        "udp" => Ok(Protocol::Udp),
        "icmp" | "icmpv6" => Ok(Protocol::Icmp),
        other => Err(ParseError::UnknownProtocol(other.to_string())),
    }
}

fn parse_v4_address(tokens: &mut Tokens) -> Result<Ipv4Net, ParseError> {
    match tokens.expect("address")? {
        "any" => Ok(any_v4_net()),
        "host" => {
            let tok = tokens.expect("host address")?;
            let addr: Ipv4Addr =
                tok.parse().map_err(|_| ParseError::InvalidAddress(tok.to_string()))?;
            Ok(Ipv4Net::new(addr, 32).unwrap())
        }
        tok if tok.contains('/') => {
            tok.parse().map_err(|_| ParseError::InvalidAddress(tok.to_string()))
        }
        tok => {
            let addr: Ipv4Addr =
                tok.parse().map_err(|_| ParseError::InvalidAddress(tok.to_string()))?;
            Ok(Ipv4Net::new(addr, 32).unwrap())
        }
    }
}

fn parse_v6_address(tokens: &mut Tokens) -> Result<Ipv6Net, ParseError> {
    match tokens.expect("address")? {
        "any" => Ok(any_v6_net()),
        "host" => {
            let tok = tokens.expect("host address")?;
            let addr: Ipv6Addr =
                tok.parse().map_err(|_| ParseError::InvalidAddress(tok.to_string()))?;
            Ok(Ipv6Net::new(addr, 128).unwrap())
        }
        tok if tok.contains('/') => {
            tok.parse().map_err(|_| ParseError::InvalidAddress(tok.to_string()))
        }
        tok => {
            let addr: Ipv6Addr =
                tok.parse().map_err(|_| ParseError::InvalidAddress(tok.to_string()))?;
            Ok(Ipv6Net::new(addr, 128).unwrap())
        }
    }
}

/// Standard-list source: the usual three forms, plus a bare address followed by a dotted
/// wildcard mask.
fn parse_standard_source(
    tokens: &mut Tokens,
) -> Result<(Ipv4Net, Option<Ipv4Addr>), ParseError> {
    match tokens.expect("source address")? {
        "any" => Ok((any_v4_net(), None)),
        "host" => {
            let tok = tokens.expect("host address")?;
            let addr: Ipv4Addr =
                tok.parse().map_err(|_| ParseError::InvalidAddress(tok.to_string()))?;
            Ok((Ipv4Net::new(addr, 32).unwrap(), None))
        }
        tok if tok.contains('/') => {
            let net = tok.parse().map_err(|_| ParseError::InvalidAddress(tok.to_string()))?;
            Ok((net, None))
        }
        tok => {
            let addr: Ipv4Addr =
                tok.parse().map_err(|_| ParseError::InvalidAddress(tok.to_string()))?;
            let wildcard = match tokens.peek().and_then(|w| w.parse::<Ipv4Addr>().ok()) {
                Some(w) => {
                    tokens.next();
                    Some(w)
                }
                None => None,
            };
            Ok((Ipv4Net::new(addr, 32).unwrap(), wildcard))
        }
    }
}

/// Port clause. Only consumed when the peeked token is one of the five interval keywords, and
/// only attempted for protocols that carry ports; a keyword after a portless protocol falls
/// through to the address parser and fails there.
fn parse_port_clause(
    tokens: &mut Tokens,
    protocol: Protocol,
) -> Result<Option<Interval>, ParseError> {
    if !protocol.has_ports() {
        return Ok(None);
    }
    match tokens.peek() {
        Some("eq") | Some("neq") | Some("lt") | Some("gt") | Some("range") => {}
        _ => return Ok(None),
    }
    let keyword = tokens.next().unwrap();
    let first = port_value(tokens.expect("port")?)?;
    let second = if keyword == "range" {
        Some(port_value(tokens.expect("second range bound")?)?)
    } else {
        None
    };
    interval::decode(keyword, first, second, PORT_DOMAIN).map(Some)
}

fn port_value(token: &str) -> Result<u16, ParseError> {
    if token.chars().all(|c| c.is_ascii_digit()) {
        token.parse().map_err(|_| ParseError::InvalidNumber(token.to_string()))
    } else {
        service_port(token).ok_or_else(|| ParseError::UnknownServiceName(token.to_string()))
    }
}

/// ICMP message type: a bounded integer, or a name from the family's fixed table. Unknown names
/// are consumed and leave the field unset; the rest of the rule is still useful.
fn parse_icmp_type(tokens: &mut Tokens, ipv6: bool) -> Option<u8> {
    match tokens.peek() {
        None | Some("ttl") | Some("established") | Some("log") => return None,
        Some(_) => {}
    }
    let tok = tokens.next().unwrap();
    if tok.chars().all(|c| c.is_ascii_digit()) {
        match tok.parse::<u16>() {
            Ok(n) if n <= 255 => return Some(n as u8),
            _ => {
                warn!("ICMP message type {:?} is out of range, leaving the type unset", tok);
                return None;
            }
        }
    }
    let number = if ipv6 { icmpv6_type_number(tok) } else { icmp_type_number(tok) };
    if number.is_none() {
        warn!("Unknown ICMP message type {:?}, leaving the type unset", tok);
    }
    number
}

fn parse_ttl_body(tokens: &mut Tokens) -> Result<Interval, ParseError> {
    let keyword = tokens.expect("ttl comparator")?;
    let first = number(tokens.expect("ttl value")?)?;
    let second = if keyword == "range" {
        Some(number(tokens.expect("second range bound")?)?)
    } else {
        None
    };
    interval::decode(keyword, first, second, TTL_DOMAIN)
}

fn number(token: &str) -> Result<u16, ParseError> {
    token.parse().map_err(|_| ParseError::InvalidNumber(token.to_string()))
}

/// Well-known service names, resolved before numeric comparison. The table mirrors what the
/// device prints in place of a number.
fn service_port(name: &str) -> Option<u16> {
    match name {
        "ftp-data" => Some(20),
        "ftp" => Some(21),
        "ssh" => Some(22),
        "telnet" => Some(23),
        "smtp" => Some(25),
        "domain" => Some(53),
        "bootps" => Some(67),
        "bootpc" => Some(68),
        "tftp" => Some(69),
        "www" => Some(80),
        "pop3" => Some(110),
        "ntp" => Some(123),
        "snmp" => Some(161),
        "bgp" => Some(179),
        "https" => Some(443),
        "syslog" => Some(514),
        _ => None,
    }
}

fn icmp_type_number(name: &str) -> Option<u8> {
    match name {
        "echo-reply" => Some(0),
        "unreachable" => Some(3),
        "source-quench" => Some(4),
        "redirect" => Some(5),
        "echo" => Some(8),
        "router-advertisement" => Some(9),
        "router-solicitation" => Some(10),
        "time-exceeded" => Some(11),
        "parameter-problem" => Some(12),
        "timestamp-request" => Some(13),
        "timestamp-reply" => Some(14),
        _ => None,
    }
}

fn icmpv6_type_number(name: &str) -> Option<u8> {
    match name {
        "unreachable" => Some(1),
        "packet-too-big" => Some(2),
        "time-exceeded" => Some(3),
        "parameter-problem" => Some(4),
        "echo" => Some(128),
        "echo-reply" => Some(129),
        "router-solicitation" => Some(133),
        "router-advertisement" => Some(134),
        "neighbor-solicitation" => Some(135),
        "neighbor-advertisement" => Some(136),
        "redirect" => Some(137),
        _ => None,
    }
}

/// The line as an ordered queue of whitespace-separated tokens.
struct Tokens<'a> {
    iter: std::iter::Peekable<std::str::SplitWhitespace<'a>>,
}

impl<'a> Tokens<'a> {
    fn new(line: &'a str) -> Self {
        Self { iter: line.split_whitespace().peekable() }
    }

    fn peek(&mut self) -> Option<&'a str> {
        self.iter.peek().copied()
    }

    #[allow(clippy::should_implement_trait)]
    fn next(&mut self) -> Option<&'a str> {
        self.iter.next()
    }

    fn expect(&mut self, what: &'static str) -> Result<&'a str, ParseError> {
        self.next().ok_or(ParseError::UnexpectedEndOfLine(what))
    }
}

/// Read path of the access-list unit: one `show` round-trip per operation, no caching.
#[derive(Debug, Clone)]
pub struct AclEntryReader {
    set_name: String,
    acl_type: AclType,
}

impl AclEntryReader {
    /// Reader for the entries of the given set.
    pub fn new(set_name: impl Into<String>, acl_type: AclType) -> Self {
        Self { set_name: set_name.into(), acl_type }
    }

    fn show_command(&self) -> String {
        format!("show access-lists {}", self.set_name)
    }
}

impl<C: Cli> ListReader<C> for AclEntryReader {
    type Key = u32;
    type Record = AclEntry;

    fn list_keys(&self, cli: &mut C) -> Result<Vec<u32>, ReadError> {
        let output = cli.execute(&self.show_command())?;
        Ok(list_entry_lines(&output).into_iter().map(|(id, _)| id).collect())
    }

    fn read(&self, cli: &mut C, key: &u32) -> Result<Option<AclEntry>, ReadError> {
        let output = cli.execute(&self.show_command())?;
        match find_entry_line(&output, *key) {
            None => Ok(None),
            Some(line) => Ok(Some(parse_entry_line(&line, self.acl_type)?)),
        }
    }
}
