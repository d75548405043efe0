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

use crate::error::{ParseError, RenderError};
use crate::interval::{decode, encode, Interval, PORT_DOMAIN, TTL_DOMAIN};

#[test]
fn ttl_boundaries() {
    assert_eq!(decode("neq", 0, None, TTL_DOMAIN).unwrap(), Interval::closed(1, 255));
    assert_eq!(decode("neq", 255, None, TTL_DOMAIN).unwrap(), Interval::closed(0, 254));
    assert_eq!(decode("lt", 10, None, TTL_DOMAIN).unwrap(), Interval::closed(0, 9));
    assert_eq!(decode("gt", 245, None, TTL_DOMAIN).unwrap(), Interval::closed(246, 255));
    assert_eq!(decode("range", 0, Some(10), TTL_DOMAIN).unwrap(), Interval::closed(0, 10));
    assert_eq!(decode("eq", 64, None, TTL_DOMAIN).unwrap(), Interval::closed(64, 64));
}

#[test]
fn ttl_neq_interior_is_inverted() {
    let interval = decode("neq", 22, None, TTL_DOMAIN).unwrap();
    assert_eq!(interval, Interval::NotEqual(22));
    // the legacy object model stores the excluded value as the inverted pair [n+1, n-1]
    assert_eq!(interval.lower(), 23);
    assert_eq!(interval.upper(), 21);
}

#[test]
fn port_boundaries() {
    assert_eq!(decode("neq", 0, None, PORT_DOMAIN).unwrap(), Interval::closed(1, 65535));
    assert_eq!(decode("neq", 65535, None, PORT_DOMAIN).unwrap(), Interval::closed(0, 65534));
    assert_eq!(decode("lt", 1024, None, PORT_DOMAIN).unwrap(), Interval::closed(0, 1023));
    assert_eq!(decode("gt", 1023, None, PORT_DOMAIN).unwrap(), Interval::closed(1024, 65535));
    assert_eq!(
        decode("range", 8000, Some(8080), PORT_DOMAIN).unwrap(),
        Interval::closed(8000, 8080)
    );
    assert_eq!(decode("neq", 80, None, PORT_DOMAIN).unwrap(), Interval::NotEqual(80));
}

#[test]
fn malformed_clauses() {
    assert_eq!(
        decode("lt", 0, None, TTL_DOMAIN).unwrap_err(),
        ParseError::MalformedRange("lt 0".to_string())
    );
    assert_eq!(
        decode("gt", 255, None, TTL_DOMAIN).unwrap_err(),
        ParseError::MalformedRange("gt 255".to_string())
    );
    assert_eq!(
        decode("range", 10, Some(5), TTL_DOMAIN).unwrap_err(),
        ParseError::MalformedRange("range 10 5".to_string())
    );
    assert_eq!(
        decode("range", 10, None, TTL_DOMAIN).unwrap_err(),
        ParseError::UnexpectedEndOfLine("second range bound")
    );
    assert_eq!(
        decode("between", 1, Some(2), TTL_DOMAIN).unwrap_err(),
        ParseError::UnknownRangeKeyword("between".to_string())
    );
    assert_eq!(
        decode("eq", 300, None, TTL_DOMAIN).unwrap_err(),
        ParseError::OutOfDomain { value: 300, min: 0, max: 255 }
    );
}

#[test]
fn encode_keyword_forms() {
    assert_eq!(encode(&Interval::closed(80, 80), PORT_DOMAIN).unwrap(), "eq 80");
    assert_eq!(encode(&Interval::NotEqual(22), TTL_DOMAIN).unwrap(), "neq 22");
    assert_eq!(encode(&Interval::closed(0, 9), TTL_DOMAIN).unwrap(), "lt 10");
    assert_eq!(encode(&Interval::closed(246, 255), TTL_DOMAIN).unwrap(), "gt 245");
    assert_eq!(encode(&Interval::closed(3, 10), TTL_DOMAIN).unwrap(), "range 3 10");
    // a boundary neq decodes to a closed interval and re-encodes as the one-sided form
    assert_eq!(encode(&Interval::closed(1, 255), TTL_DOMAIN).unwrap(), "gt 0");
}

#[test]
fn full_domain_is_unencodable() {
    assert_eq!(
        encode(&Interval::closed(0, 255), TTL_DOMAIN).unwrap_err(),
        RenderError::UnencodableInterval { lower: 0, upper: 255 }
    );
    assert_eq!(
        encode(&Interval::closed(0, 65535), PORT_DOMAIN).unwrap_err(),
        RenderError::UnencodableInterval { lower: 0, upper: 65535 }
    );
}

/// For every encodable interval, decoding the encoded clause yields the interval back.
#[test]
fn decode_encode_identity() {
    let intervals = vec![
        Interval::closed(0, 0),
        Interval::closed(0, 9),
        Interval::closed(1, 255),
        Interval::closed(3, 10),
        Interval::closed(64, 64),
        Interval::closed(0, 254),
        Interval::closed(255, 255),
        Interval::NotEqual(1),
        Interval::NotEqual(22),
        Interval::NotEqual(254),
    ];
    for interval in intervals {
        let clause = encode(&interval, TTL_DOMAIN).unwrap();
        let mut tokens = clause.split_whitespace();
        let keyword = tokens.next().unwrap();
        let first: u16 = tokens.next().unwrap().parse().unwrap();
        let second: Option<u16> = tokens.next().map(|t| t.parse().unwrap());
        assert_eq!(decode(keyword, first, second, TTL_DOMAIN).unwrap(), interval);
    }
}
