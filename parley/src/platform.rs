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

//! # Platform Inventory
//!
//! A read-only scrape of the `show version` banner. The banner is free text with no line keyed
//! by a record id, so this unit has no locator; each field is fished out with its own pattern
//! and missing fields simply stay unset.

use crate::cli::Cli;
use crate::error::ReadError;

use regex::Regex;

/// Inventory facts scraped from the version banner.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Version {
    /// Hardware platform, e.g. `CSR1000V`.
    pub platform: Option<String>,
    /// Operating system version string.
    pub os_version: Option<String>,
    /// Chassis serial number.
    pub serial_number: Option<String>,
}

/// Scrape a version banner. Returns `None` when no recognizable field is present.
pub fn parse_version(output: &str) -> Option<Version> {
    let version_re = Regex::new(r"(?m)Version ([^,\s]+)").unwrap();
    let platform_re = Regex::new(r"(?m)^cisco (\S+) ").unwrap();
    let serial_re = Regex::new(r"(?m)^Processor board ID (\S+)").unwrap();

    let version = Version {
        platform: platform_re.captures(output).map(|c| c[1].to_string()),
        os_version: version_re.captures(output).map(|c| c[1].to_string()),
        serial_number: serial_re.captures(output).map(|c| c[1].to_string()),
    };
    if version == Version::default() {
        None
    } else {
        Some(version)
    }
}

/// Issue `show version` and scrape the banner. A wholly unrecognized banner is `Ok(None)`.
pub fn read_version<C: Cli>(cli: &mut C) -> Result<Option<Version>, ReadError> {
    let output = cli.execute("show version")?;
    Ok(parse_version(&output))
}
