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

//! # BGP Read Path
//!
//! Scrapes the `router bgp` section of `show running-config` output for one network instance.
//! Some dialects wrap `address-family` clauses onto shared physical lines; a preprocessing pass
//! first folds every occurrence onto its own line. The pass is idempotent and never alters token
//! content, only line breaks. After that the section is a plain line-oriented block: global
//! `address-family` headers open a sub-block, `neighbor ... activate` lines inside it assign the
//! family, and everything else is a neighbor or peer-group attribute.

use crate::bgp::types::{AfiSafi, AsId, BgpConfig, Neighbor, NetworkInstance};
use crate::cli::Cli;
use crate::error::{ParseError, ReadError};
use crate::translate::ListReader;

use log::debug;
use regex::Regex;
use std::net::IpAddr;

/// Fold every `address-family` clause onto its own line. Idempotent; token content is untouched.
pub(crate) fn normalize_address_families(output: &str) -> String {
    let re = Regex::new(r"([^\n])\s+address-family").unwrap();
    re.replace_all(output, "$1\naddress-family").into_owned()
}

/// Extract the `router bgp` section belonging to the given instance, header included. The
/// section ends at the first line that is not indented (the `!` separator or the next section).
pub(crate) fn bgp_section(output: &str, vrf: &NetworkInstance) -> Option<String> {
    let header_re = Regex::new(r"^router bgp (\d+)(?: vrf (\S+))?\s*$").unwrap();
    let mut collected: Vec<&str> = Vec::new();
    let mut in_section = false;
    for line in output.lines() {
        if in_section {
            if line.starts_with(char::is_whitespace) {
                collected.push(line);
            } else {
                break;
            }
        } else if let Some(caps) = header_re.captures(line) {
            let matches = match (caps.get(2), vrf) {
                (None, NetworkInstance::Default) => true,
                (Some(name), NetworkInstance::Named(wanted)) => name.as_str() == wanted,
                _ => false,
            };
            if matches {
                in_section = true;
                collected.push(line);
            }
        }
    }
    if in_section {
        Some(collected.join("\n"))
    } else {
        None
    }
}

/// Parse one extracted `router bgp` section (header included) into a [`BgpConfig`].
pub fn parse_bgp_config(section: &str) -> Result<BgpConfig, ParseError> {
    let normalized = normalize_address_families(section);
    let mut lines = normalized.lines().map(str::trim);

    let header = lines
        .next()
        .ok_or(ParseError::MalformedBgpHeader(String::new()))?;
    let mut config = parse_header(header)?;

    let mut current_af: Option<AfiSafi> = None;
    for line in lines {
        if line.is_empty() || line == "!" {
            continue;
        }
        if line == "exit-address-family" || line == "exit" {
            current_af = None;
            continue;
        }
        if let Some(rest) = line.strip_prefix("bgp router-id ") {
            let rest = rest.trim();
            config.router_id =
                Some(rest.parse().map_err(|_| ParseError::InvalidAddress(rest.to_string()))?);
            continue;
        }
        if let Some(rest) = line.strip_prefix("address-family ") {
            let family = parse_afi_safi(rest)?;
            config.afi_safis.insert(family);
            current_af = Some(family);
            continue;
        }
        if let Some(rest) = line.strip_prefix("neighbor ") {
            parse_neighbor_line(&mut config, current_af, rest)?;
            continue;
        }
        debug!("Ignoring unhandled configuration line {:?}", line);
    }
    Ok(config)
}

fn parse_header(header: &str) -> Result<BgpConfig, ParseError> {
    let re = Regex::new(r"^router bgp (\d+)(?: vrf (\S+))?\s*$").unwrap();
    let caps = re
        .captures(header)
        .ok_or_else(|| ParseError::MalformedBgpHeader(header.to_string()))?;
    let as_id = caps[1]
        .parse()
        .map_err(|_| ParseError::MalformedBgpHeader(header.to_string()))?;
    let vrf = match caps.get(2) {
        Some(name) => NetworkInstance::Named(name.as_str().to_string()),
        None => NetworkInstance::Default,
    };
    Ok(BgpConfig::new(AsId(as_id), vrf))
}

fn parse_afi_safi(rest: &str) -> Result<AfiSafi, ParseError> {
    let mut tokens = rest.split_whitespace();
    let afi = tokens.next().ok_or(ParseError::UnexpectedEndOfLine("address family"))?;
    let safi = tokens.next();
    if tokens.next().is_some() {
        return Err(ParseError::UnknownAddressFamily(rest.to_string()));
    }
    AfiSafi::from_tokens(afi, safi)
        .ok_or_else(|| ParseError::UnknownAddressFamily(rest.to_string()))
}

/// One `neighbor <id> <subcommand> ...` line. An id that parses as an address belongs to a
/// neighbor; anything else names a peer-group.
fn parse_neighbor_line(
    config: &mut BgpConfig,
    current_af: Option<AfiSafi>,
    rest: &str,
) -> Result<(), ParseError> {
    let mut tokens = rest.split_whitespace();
    let id = tokens.next().ok_or(ParseError::UnexpectedEndOfLine("neighbor id"))?;
    let sub = tokens.next().ok_or(ParseError::UnexpectedEndOfLine("neighbor subcommand"))?;

    // activate outside of an address-family block configures the device's default family
    let family = current_af.unwrap_or(AfiSafi::Ipv4Unicast);

    match id.parse::<IpAddr>() {
        Ok(address) => {
            let neighbor = config.neighbor_entry(address);
            match sub {
                "remote-as" => {
                    let tok = tokens.next().ok_or(ParseError::UnexpectedEndOfLine("AS number"))?;
                    neighbor.remote_as = Some(AsId(
                        tok.parse().map_err(|_| ParseError::InvalidNumber(tok.to_string()))?,
                    ));
                }
                "peer-group" => match tokens.next() {
                    Some(group) => neighbor.peer_group = Some(group.to_string()),
                    None => debug!("Neighbor {} declared as a peer-group, ignoring", id),
                },
                "update-source" => {
                    let source =
                        tokens.next().ok_or(ParseError::UnexpectedEndOfLine("update source"))?;
                    neighbor.update_source = Some(source.to_string());
                }
                "route-reflector-client" => neighbor.route_reflector_client = true,
                "activate" => {
                    neighbor.afi_safis.insert(family);
                }
                other => debug!("Ignoring neighbor option {:?}", other),
            }
        }
        Err(_) => {
            let group = config.peer_group_entry(id);
            match sub {
                // the bare form declares the group
                "peer-group" => {}
                "remote-as" => {
                    let tok = tokens.next().ok_or(ParseError::UnexpectedEndOfLine("AS number"))?;
                    group.remote_as = Some(AsId(
                        tok.parse().map_err(|_| ParseError::InvalidNumber(tok.to_string()))?,
                    ));
                }
                "activate" => {
                    group.afi_safis.insert(family);
                }
                other => debug!("Ignoring peer-group option {:?}", other),
            }
        }
    }
    Ok(())
}

/// Read the BGP configuration of one instance. A missing `router bgp` section is `Ok(None)`.
pub fn read_bgp_config<C: Cli>(
    cli: &mut C,
    vrf: &NetworkInstance,
) -> Result<Option<BgpConfig>, ReadError> {
    let output = cli.execute("show running-config router bgp")?;
    match bgp_section(&output, vrf) {
        None => Ok(None),
        Some(section) => Ok(Some(parse_bgp_config(&section)?)),
    }
}

/// Read path over the neighbors of one instance, keyed by peering address.
#[derive(Debug, Clone)]
pub struct BgpNeighborReader {
    vrf: NetworkInstance,
}

impl BgpNeighborReader {
    /// Reader for the neighbors of the given instance.
    pub fn new(vrf: NetworkInstance) -> Self {
        Self { vrf }
    }
}

impl<C: Cli> ListReader<C> for BgpNeighborReader {
    type Key = IpAddr;
    type Record = Neighbor;

    fn list_keys(&self, cli: &mut C) -> Result<Vec<IpAddr>, ReadError> {
        Ok(read_bgp_config(cli, &self.vrf)?
            .map(|config| config.neighbors.iter().map(|n| n.address).collect())
            .unwrap_or_default())
    }

    fn read(&self, cli: &mut C, key: &IpAddr) -> Result<Option<Neighbor>, ReadError> {
        Ok(read_bgp_config(cli, &self.vrf)?
            .and_then(|config| config.neighbors.into_iter().find(|n| n.address == *key)))
    }
}
