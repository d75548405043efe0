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

//! Module containing the BGP configuration data model.

use std::collections::BTreeSet;
use std::fmt;
use std::net::{IpAddr, Ipv4Addr};

/// AS Number.
#[derive(PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Clone, Copy)]
pub struct AsId(pub u32);

impl fmt::Display for AsId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A network instance (VRF). The default instance is the device's global routing table.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum NetworkInstance {
    /// The default (global) instance.
    Default,
    /// A named VRF.
    Named(String),
}

impl NetworkInstance {
    /// Returns true for the default instance.
    pub fn is_default(&self) -> bool {
        matches!(self, Self::Default)
    }
}

impl fmt::Display for NetworkInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Default => write!(f, "default"),
            Self::Named(name) => write!(f, "{}", name),
        }
    }
}

/// One (AFI, SAFI) pair, the device's namespace for a kind of route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AfiSafi {
    /// IPv4 unicast.
    Ipv4Unicast,
    /// IPv6 unicast.
    Ipv6Unicast,
    /// VPNv4 unicast.
    Vpnv4Unicast,
    /// VPNv6 unicast.
    Vpnv6Unicast,
}

impl AfiSafi {
    /// Returns true for the VPN families, which are exempt from the neighbor-activation
    /// requirement under the default VRF.
    pub fn is_vpn(&self) -> bool {
        matches!(self, Self::Vpnv4Unicast | Self::Vpnv6Unicast)
    }

    /// The device spelling of this family, as printed after `address-family`.
    pub fn token(&self) -> &'static str {
        match self {
            Self::Ipv4Unicast => "ipv4 unicast",
            Self::Ipv6Unicast => "ipv6 unicast",
            Self::Vpnv4Unicast => "vpnv4 unicast",
            Self::Vpnv6Unicast => "vpnv6 unicast",
        }
    }

    /// Parse the device spelling. A missing SAFI token defaults to unicast, matching how the
    /// shell abbreviates its own output.
    pub fn from_tokens(afi: &str, safi: Option<&str>) -> Option<Self> {
        if safi.map(|s| s != "unicast").unwrap_or(false) {
            return None;
        }
        match afi {
            "ipv4" => Some(Self::Ipv4Unicast),
            "ipv6" => Some(Self::Ipv6Unicast),
            "vpnv4" => Some(Self::Vpnv4Unicast),
            "vpnv6" => Some(Self::Vpnv6Unicast),
            _ => None,
        }
    }
}

impl fmt::Display for AfiSafi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.token())
    }
}

/// One BGP neighbor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Neighbor {
    /// Peering address, the neighbor's key.
    pub address: IpAddr,
    /// Remote AS number.
    pub remote_as: Option<AsId>,
    /// Name of the peer-group this neighbor inherits from.
    pub peer_group: Option<String>,
    /// Interface or address used as the session source.
    pub update_source: Option<String>,
    /// Whether this neighbor is a route-reflector client.
    pub route_reflector_client: bool,
    /// Address families activated for this neighbor.
    pub afi_safis: BTreeSet<AfiSafi>,
}

impl Neighbor {
    /// A neighbor with only the peering address set.
    pub fn new(address: IpAddr) -> Self {
        Self {
            address,
            remote_as: None,
            peer_group: None,
            update_source: None,
            route_reflector_client: false,
            afi_safis: BTreeSet::new(),
        }
    }
}

/// A named peer-group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeerGroup {
    /// Group name, the group's key.
    pub name: String,
    /// Remote AS number configured on the group.
    pub remote_as: Option<AsId>,
    /// Address families activated for the group.
    pub afi_safis: BTreeSet<AfiSafi>,
}

impl PeerGroup {
    /// A peer-group with only the name set.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), remote_as: None, afi_safis: BTreeSet::new() }
    }
}

/// The BGP configuration of one network instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BgpConfig {
    /// Local AS number.
    pub as_id: AsId,
    /// The instance this configuration belongs to.
    pub vrf: NetworkInstance,
    /// Router id, if explicitly configured.
    pub router_id: Option<Ipv4Addr>,
    /// Address families configured at global scope.
    pub afi_safis: BTreeSet<AfiSafi>,
    /// All neighbors, in device order.
    pub neighbors: Vec<Neighbor>,
    /// All peer-groups, in device order.
    pub peer_groups: Vec<PeerGroup>,
}

impl BgpConfig {
    /// An empty configuration for the given AS and instance.
    pub fn new(as_id: AsId, vrf: NetworkInstance) -> Self {
        Self {
            as_id,
            vrf,
            router_id: None,
            afi_safis: BTreeSet::new(),
            neighbors: Vec::new(),
            peer_groups: Vec::new(),
        }
    }

    /// The union of the address families activated under any neighbor or peer-group.
    pub fn specific_afi_safis(&self) -> BTreeSet<AfiSafi> {
        self.neighbors
            .iter()
            .flat_map(|n| n.afi_safis.iter())
            .chain(self.peer_groups.iter().flat_map(|g| g.afi_safis.iter()))
            .copied()
            .collect()
    }

    /// A clone of this configuration with the given neighbor inserted or replaced.
    pub fn with_neighbor(&self, neighbor: Neighbor) -> Self {
        let mut config = self.clone();
        match config.neighbors.iter().position(|n| n.address == neighbor.address) {
            Some(pos) => config.neighbors[pos] = neighbor,
            None => config.neighbors.push(neighbor),
        }
        config
    }

    /// The neighbor with the given address, creating it if absent.
    pub(crate) fn neighbor_entry(&mut self, address: IpAddr) -> &mut Neighbor {
        match self.neighbors.iter().position(|n| n.address == address) {
            Some(pos) => &mut self.neighbors[pos],
            None => {
                self.neighbors.push(Neighbor::new(address));
                self.neighbors.last_mut().unwrap()
            }
        }
    }

    /// The peer-group with the given name, creating it if absent.
    pub(crate) fn peer_group_entry(&mut self, name: &str) -> &mut PeerGroup {
        match self.peer_groups.iter().position(|g| g.name == name) {
            Some(pos) => &mut self.peer_groups[pos],
            None => {
                self.peer_groups.push(PeerGroup::new(name));
                self.peer_groups.last_mut().unwrap()
            }
        }
    }
}
