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

//! # AFI/SAFI Consistency Checker
//!
//! Validates the two-way containment invariant between the global address-family set and the
//! union of the families activated under neighbors and peer-groups:
//!
//! 1. Everything activated for a neighbor or peer-group must be configured globally.
//! 2. Everything configured globally must be activated for some neighbor or peer-group, except
//!    the VPN families under the default VRF (a route reflector legitimately carries VPN tables
//!    without activating them towards every peer). Under a named VRF nothing is exempt.
//!
//! Violations are user-facing configuration errors, not internal bugs, and the error message is
//! the operator's primary debugging aid: it names the AS, the VRF and the exact missing
//! families.

use crate::bgp::types::{AfiSafi, AsId, BgpConfig, NetworkInstance};

use itertools::Itertools;
use maplit::btreeset;
use std::collections::BTreeSet;
use thiserror::Error;

/// Violation of the AFI/SAFI containment invariant.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CheckError {
    /// Check 1 failed: a neighbor or peer-group activates a family missing at global scope.
    #[error(
        "router bgp {}: address families [{}] are activated for a neighbor or peer-group \
         but are not configured globally",
        .as_id,
        family_list(.families)
    )]
    NotConfiguredGlobally {
        /// The offending AS.
        as_id: AsId,
        /// Families activated somewhere but absent from the global configuration.
        families: Vec<AfiSafi>,
    },
    /// Check 2 failed: a global family is activated for no neighbor or peer-group.
    #[error(
        "router bgp {} (vrf {}): global address families [{}] are not activated for any \
         neighbor or peer-group",
        .as_id,
        .vrf,
        family_list(.families)
    )]
    NotActivatedForNeighbors {
        /// The offending AS.
        as_id: AsId,
        /// The instance under which the check ran.
        vrf: NetworkInstance,
        /// Global families no neighbor or peer-group activates.
        families: Vec<AfiSafi>,
    },
}

fn family_list(families: &[AfiSafi]) -> String {
    families.iter().map(|f| f.token()).join(", ")
}

/// Run both containment checks over a full configuration snapshot.
///
/// Cost is proportional to the total neighbor count; the check runs synchronously inline with
/// every neighbor or peer-group create/update that touches address families.
pub fn check_afi_safi(config: &BgpConfig) -> Result<(), CheckError> {
    let specific = config.specific_afi_safis();

    let missing_globally: Vec<AfiSafi> =
        specific.iter().filter(|f| !config.afi_safis.contains(f)).copied().collect();
    if !missing_globally.is_empty() {
        return Err(CheckError::NotConfiguredGlobally {
            as_id: config.as_id,
            families: missing_globally,
        });
    }

    let exempt: BTreeSet<AfiSafi> = if config.vrf.is_default() {
        btreeset! { AfiSafi::Vpnv4Unicast, AfiSafi::Vpnv6Unicast }
    } else {
        BTreeSet::new()
    };
    let missing_specific: Vec<AfiSafi> = config
        .afi_safis
        .iter()
        .filter(|f| !exempt.contains(f) && !specific.contains(f))
        .copied()
        .collect();
    if !missing_specific.is_empty() {
        return Err(CheckError::NotActivatedForNeighbors {
            as_id: config.as_id,
            vrf: config.vrf.clone(),
            families: missing_specific,
        });
    }

    Ok(())
}
