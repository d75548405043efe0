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

//! # BGP Translation Unit
//!
//! Reads and writes the `router bgp` block of one network instance (VRF): the global
//! address-family set, neighbors, and peer-groups. Next to the usual parse/render pair this unit
//! carries the one piece of real invariant logic in the library, the [`checker`]: the global
//! address-family set must contain everything activated on a neighbor or peer-group, and (apart
//! from VPN families under the default VRF) everything configured globally must be activated
//! somewhere. Writers run the check before sending anything, so a violating block never reaches
//! the device.

pub mod checker;
pub mod parser;
pub mod types;
pub mod writer;

pub use checker::{check_afi_safi, CheckError};
pub use parser::{parse_bgp_config, read_bgp_config, BgpNeighborReader};
pub use types::{AfiSafi, AsId, BgpConfig, Neighbor, NetworkInstance, PeerGroup};
pub use writer::{
    render_global_afi_safis, render_neighbor, render_neighbor_delete, GlobalAfiSafiWriter,
    NeighborWriter,
};
