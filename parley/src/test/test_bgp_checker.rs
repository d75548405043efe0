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

use crate::bgp::{
    check_afi_safi, AfiSafi::*, AsId, BgpConfig, CheckError, Neighbor, NetworkInstance, PeerGroup,
};

use maplit::btreeset;

fn config(vrf: NetworkInstance) -> BgpConfig {
    let mut config = BgpConfig::new(AsId(65001), vrf);
    config.afi_safis = btreeset! { Ipv4Unicast, Vpnv4Unicast };
    let mut neighbor = Neighbor::new("10.0.1.2".parse().unwrap());
    neighbor.remote_as = Some(AsId(65002));
    neighbor.afi_safis = btreeset! { Ipv4Unicast };
    config.neighbors.push(neighbor);
    config
}

#[test]
fn vpn_families_are_exempt_under_the_default_vrf() {
    assert_eq!(check_afi_safi(&config(NetworkInstance::Default)), Ok(()));
}

#[test]
fn vpn_families_are_not_exempt_under_a_named_vrf() {
    let vrf = NetworkInstance::Named("CUST1".to_string());
    assert_eq!(
        check_afi_safi(&config(vrf.clone())),
        Err(CheckError::NotActivatedForNeighbors {
            as_id: AsId(65001),
            vrf,
            families: vec![Vpnv4Unicast],
        })
    );
}

#[test]
fn neighbor_family_missing_from_global_scope() {
    let mut config = config(NetworkInstance::Default);
    config.neighbors[0].afi_safis.insert(Ipv6Unicast);
    assert_eq!(
        check_afi_safi(&config),
        Err(CheckError::NotConfiguredGlobally {
            as_id: AsId(65001),
            families: vec![Ipv6Unicast],
        })
    );
}

#[test]
fn peer_group_families_count_as_specific() {
    let mut config = config(NetworkInstance::Default);
    config.afi_safis.insert(Ipv6Unicast);
    // no neighbor activates ipv6, but a peer-group does
    let mut group = PeerGroup::new("SPINES");
    group.afi_safis = btreeset! { Ipv6Unicast };
    config.peer_groups.push(group);
    assert_eq!(check_afi_safi(&config), Ok(()));
}

#[test]
fn global_family_without_any_activation() {
    let mut config = config(NetworkInstance::Default);
    config.afi_safis.insert(Ipv6Unicast);
    assert_eq!(
        check_afi_safi(&config),
        Err(CheckError::NotActivatedForNeighbors {
            as_id: AsId(65001),
            vrf: NetworkInstance::Default,
            families: vec![Ipv6Unicast],
        })
    );
}

#[test]
fn error_messages_name_the_as_and_families() {
    let vrf = NetworkInstance::Named("CUST1".to_string());
    let message = check_afi_safi(&config(vrf)).unwrap_err().to_string();
    assert!(message.contains("router bgp 65001"), "{}", message);
    assert!(message.contains("vrf CUST1"), "{}", message);
    assert!(message.contains("vpnv4 unicast"), "{}", message);
}

#[test]
fn empty_configuration_passes() {
    let config = BgpConfig::new(AsId(65001), NetworkInstance::Default);
    assert_eq!(check_afi_safi(&config), Ok(()));
}
