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

use parley::acl::{AclEntryReader, AclType};
use parley::bgp::{check_afi_safi, read_bgp_config, NetworkInstance};
use parley::cli::TranscriptCli;
use parley::translate::ListReader;

use clap::{Parser, Subcommand};
use log::*;
use std::error::Error;
use std::fs::read_to_string;
use std::path::PathBuf;

/// Drive the translation units against recorded device transcripts.
#[derive(Parser)]
#[clap(name = "parley_main")]
struct Args {
    #[clap(subcommand)]
    cmd: MainCommand,
}

#[derive(Subcommand)]
enum MainCommand {
    /// Parse every access-list entry out of a recorded `show access-lists` transcript
    ParseAcl {
        /// File holding the transcript
        #[clap(long)]
        file: PathBuf,
        /// Name of the access list
        #[clap(long)]
        name: String,
        /// Kind of the list: ipv4-extended, ipv4-standard or ipv6
        #[clap(long, default_value = "ipv4-extended")]
        kind: String,
    },
    /// Check AFI/SAFI containment of a recorded `show running-config` transcript
    CheckBgp {
        /// File holding the transcript
        #[clap(long)]
        file: PathBuf,
        /// VRF to check; the default instance if omitted
        #[clap(long)]
        vrf: Option<String>,
    },
}

fn main() -> Result<(), Box<dyn Error>> {
    pretty_env_logger::init();
    let args = Args::parse();

    match args.cmd {
        MainCommand::ParseAcl { file, name, kind } => {
            let acl_type = match kind.as_str() {
                "ipv4-extended" => AclType::Ipv4Extended,
                "ipv4-standard" => AclType::Ipv4Standard,
                "ipv6" => AclType::Ipv6,
                other => return Err(format!("Unknown access-list kind: {}", other).into()),
            };

            let mut cli = TranscriptCli::new();
            cli.respond(format!("show access-lists {}", name), read_to_string(&file)?);

            let reader = AclEntryReader::new(name.as_str(), acl_type);
            let keys = reader.list_keys(&mut cli)?;
            info!("Access list {} holds {} entries", name, keys.len());
            for key in keys {
                match reader.read(&mut cli, &key)? {
                    Some(entry) => println!("{:#?}", entry),
                    None => warn!("Entry {} disappeared between list and read", key),
                }
            }
        }
        MainCommand::CheckBgp { file, vrf } => {
            let vrf = vrf.map(NetworkInstance::Named).unwrap_or(NetworkInstance::Default);

            let mut cli = TranscriptCli::new();
            cli.respond("show running-config router bgp", read_to_string(&file)?);

            let config = match read_bgp_config(&mut cli, &vrf)? {
                Some(config) => config,
                None => {
                    return Err(format!("No router bgp section found for vrf {}", vrf).into())
                }
            };
            info!(
                "Parsed router bgp {} with {} neighbors and {} peer-groups",
                config.as_id,
                config.neighbors.len(),
                config.peer_groups.len()
            );
            match check_afi_safi(&config) {
                Ok(()) => println!(
                    "AFI/SAFI containment holds for router bgp {} (vrf {})",
                    config.as_id, config.vrf
                ),
                Err(e) => return Err(e.into()),
            }
        }
    }

    Ok(())
}
