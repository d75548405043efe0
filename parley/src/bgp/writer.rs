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

//! # BGP Write Path
//!
//! Renders neighbor and global address-family changes into command blocks. Rendering is
//! diff-aware: an attribute line is emitted in its set form when the after value is present, in
//! its `no` form when only the before value was, and not at all when unchanged. The enclosing
//! scaffold (`configure terminal` / `router bgp <as>` / `end`) is always emitted, even when the
//! diff is empty, so scaffold-only blocks are never silently dropped.
//!
//! Writers run the AFI/SAFI containment check against the intended configuration before sending
//! anything; a violating block never reaches the device.

use crate::bgp::checker::check_afi_safi;
use crate::bgp::types::{AfiSafi, AsId, BgpConfig, Neighbor, NetworkInstance};
use crate::cli::Cli;
use crate::error::WriteError;
use crate::translate::Writer;

use std::collections::BTreeSet;
use std::net::IpAddr;

fn router_bgp_line(as_id: AsId, vrf: &NetworkInstance) -> String {
    match vrf {
        NetworkInstance::Default => format!("router bgp {}", as_id),
        NetworkInstance::Named(name) => format!("router bgp {} vrf {}", as_id, name),
    }
}

fn finish_block(lines: Vec<String>) -> String {
    let mut block = lines.join("\n");
    block.push('\n');
    block
}

/// Emit an attribute line: set form when the after value is present (and changed), `no` form
/// when only the before value was.
fn diff_attr<T, S, U>(
    lines: &mut Vec<String>,
    before: Option<&T>,
    after: Option<&T>,
    set: S,
    unset: U,
) where
    T: PartialEq,
    S: Fn(&T) -> String,
    U: Fn(&T) -> String,
{
    match (before, after) {
        (Some(b), Some(a)) if b == a => {}
        (_, Some(a)) => lines.push(set(a)),
        (Some(b), None) => lines.push(unset(b)),
        (None, None) => {}
    }
}

/// Render the command block creating or updating one neighbor. `before` is the neighbor's prior
/// state for updates, `None` for a fresh create.
pub fn render_neighbor(
    as_id: AsId,
    vrf: &NetworkInstance,
    after: &Neighbor,
    before: Option<&Neighbor>,
) -> String {
    let mut lines = vec!["configure terminal".to_string(), router_bgp_line(as_id, vrf)];
    let id = after.address.to_string();

    diff_attr(
        &mut lines,
        before.and_then(|b| b.remote_as.as_ref()),
        after.remote_as.as_ref(),
        |v| format!("neighbor {} remote-as {}", id, v),
        |v| format!("no neighbor {} remote-as {}", id, v),
    );
    diff_attr(
        &mut lines,
        before.and_then(|b| b.peer_group.as_ref()),
        after.peer_group.as_ref(),
        |v| format!("neighbor {} peer-group {}", id, v),
        |v| format!("no neighbor {} peer-group {}", id, v),
    );
    diff_attr(
        &mut lines,
        before.and_then(|b| b.update_source.as_ref()),
        after.update_source.as_ref(),
        |v| format!("neighbor {} update-source {}", id, v),
        |v| format!("no neighbor {} update-source {}", id, v),
    );
    match (before.map(|b| b.route_reflector_client).unwrap_or(false), after.route_reflector_client)
    {
        (false, true) => lines.push(format!("neighbor {} route-reflector-client", id)),
        (true, false) => lines.push(format!("no neighbor {} route-reflector-client", id)),
        _ => {}
    }

    let empty = BTreeSet::new();
    let before_families = before.map(|b| &b.afi_safis).unwrap_or(&empty);
    for family in after.afi_safis.difference(before_families) {
        lines.push(format!("address-family {}", family));
        lines.push(format!("neighbor {} activate", id));
        lines.push("exit-address-family".to_string());
    }
    for family in before_families.difference(&after.afi_safis) {
        lines.push(format!("address-family {}", family));
        lines.push(format!("no neighbor {} activate", id));
        lines.push("exit-address-family".to_string());
    }

    lines.push("end".to_string());
    finish_block(lines)
}

/// Render the command block removing one neighbor. Keyed on the peering address only.
pub fn render_neighbor_delete(as_id: AsId, vrf: &NetworkInstance, address: IpAddr) -> String {
    finish_block(vec![
        "configure terminal".to_string(),
        router_bgp_line(as_id, vrf),
        format!("no neighbor {}", address),
        "end".to_string(),
    ])
}

/// Render the command block moving the global address-family set from `before` to `after`. An
/// empty diff still emits the scaffold.
pub fn render_global_afi_safis(
    as_id: AsId,
    vrf: &NetworkInstance,
    before: &BTreeSet<AfiSafi>,
    after: &BTreeSet<AfiSafi>,
) -> String {
    let mut lines = vec!["configure terminal".to_string(), router_bgp_line(as_id, vrf)];
    for family in after.difference(before) {
        lines.push(format!("address-family {}", family));
        lines.push("exit-address-family".to_string());
    }
    for family in before.difference(after) {
        lines.push(format!("no address-family {}", family));
    }
    lines.push("end".to_string());
    finish_block(lines)
}

/// Write path for neighbors. Holds the intended configuration of the instance so the containment
/// check can run against the full snapshot before anything is sent.
#[derive(Debug, Clone)]
pub struct NeighborWriter<'a> {
    config: &'a BgpConfig,
}

impl<'a> NeighborWriter<'a> {
    /// Writer over the given intended configuration.
    pub fn new(config: &'a BgpConfig) -> Self {
        Self { config }
    }
}

impl<'a, C: Cli> Writer<C> for NeighborWriter<'a> {
    type Record = Neighbor;

    fn write(&self, cli: &mut C, record: &Neighbor) -> Result<(), WriteError> {
        check_afi_safi(&self.config.with_neighbor(record.clone()))?;
        cli.execute(&render_neighbor(self.config.as_id, &self.config.vrf, record, None))?;
        Ok(())
    }

    fn update(&self, cli: &mut C, before: &Neighbor, after: &Neighbor) -> Result<(), WriteError> {
        check_afi_safi(&self.config.with_neighbor(after.clone()))?;
        cli.execute(&render_neighbor(
            self.config.as_id,
            &self.config.vrf,
            after,
            Some(before),
        ))?;
        Ok(())
    }

    fn delete(&self, cli: &mut C, record: &Neighbor) -> Result<(), WriteError> {
        cli.execute(&render_neighbor_delete(
            self.config.as_id,
            &self.config.vrf,
            record.address,
        ))?;
        Ok(())
    }
}

/// Write path for the global address-family set of one instance.
#[derive(Debug, Clone)]
pub struct GlobalAfiSafiWriter {
    as_id: AsId,
    vrf: NetworkInstance,
}

impl GlobalAfiSafiWriter {
    /// Writer for the given AS and instance.
    pub fn new(as_id: AsId, vrf: NetworkInstance) -> Self {
        Self { as_id, vrf }
    }
}

impl<C: Cli> Writer<C> for GlobalAfiSafiWriter {
    type Record = BTreeSet<AfiSafi>;

    fn write(&self, cli: &mut C, record: &BTreeSet<AfiSafi>) -> Result<(), WriteError> {
        let before = BTreeSet::new();
        cli.execute(&render_global_afi_safis(self.as_id, &self.vrf, &before, record))?;
        Ok(())
    }

    fn update(
        &self,
        cli: &mut C,
        before: &BTreeSet<AfiSafi>,
        after: &BTreeSet<AfiSafi>,
    ) -> Result<(), WriteError> {
        cli.execute(&render_global_afi_safis(self.as_id, &self.vrf, before, after))?;
        Ok(())
    }

    fn delete(&self, cli: &mut C, record: &BTreeSet<AfiSafi>) -> Result<(), WriteError> {
        let after = BTreeSet::new();
        cli.execute(&render_global_afi_safis(self.as_id, &self.vrf, record, &after))?;
        Ok(())
    }
}
