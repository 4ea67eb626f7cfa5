// klist inspection - read keytab entries through the MIT `klist` tool
// Copyright (C) 2025 Marc Rivero (@seifreed)
// Licensed under GPL-3.0

use crate::Result;
use crate::credentials::keytab::{KEYTAB_VERSION_2, Keytab, KeytabEntry, Principal};
use crate::error::CheckerError;
use chrono::{Local, NaiveDateTime, TimeZone, Utc};
use std::process::Command;

// Two digit years first: %Y would happily read "24" as the year 24
const TIMESTAMP_FORMATS: &[&str] = &["%m/%d/%y %H:%M:%S", "%m/%d/%Y %H:%M:%S"];

/// Run `klist -t -k <path>` and parse its listing
pub fn inspect(path: &str) -> Result<Keytab> {
    if path.is_empty() {
        return Err(CheckerError::CredentialMissing {
            what: "keytab path".to_string(),
        });
    }

    let output = Command::new("klist")
        .args(["-t", "-k", path])
        .output()
        .map_err(|e| CheckerError::CredentialIo {
            path: path.to_string(),
            source: e,
        })?;

    if !output.status.success() {
        return Err(CheckerError::format(
            path,
            format!(
                "klist exited with {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            ),
        ));
    }

    parse_listing(path, &String::from_utf8_lossy(&output.stdout))
}

/// Parse `klist -t -k` output
///
/// ```text
/// Keytab name: FILE:agg.keytab
/// KVNO Timestamp           Principal
/// ---- ------------------- ------------------------------------------------------
///    1 11/16/2022 14:34:08 xxx@CERN.CH
/// ```
///
/// Timestamps are printed in local time. Keys are not part of the listing, so
/// entries come back with an empty key and enctype 0.
pub fn parse_listing(path: &str, listing: &str) -> Result<Keytab> {
    let mut entries = Vec::new();

    for line in listing.lines() {
        let line = line.trim();
        if line.is_empty()
            || line.starts_with("Keytab")
            || line.starts_with("KVNO")
            || line.starts_with('-')
        {
            continue;
        }

        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() < 4 {
            return Err(CheckerError::format(
                path,
                format!("unexpected klist row: {}", line),
            ));
        }

        let kvno = fields[0].parse::<u32>().map_err(|e| {
            CheckerError::format(path, format!("invalid kvno in klist row '{}': {}", line, e))
        })?;

        let stamp = format!("{} {}", fields[1], fields[2]);
        let naive = TIMESTAMP_FORMATS
            .iter()
            .find_map(|layout| NaiveDateTime::parse_from_str(&stamp, layout).ok())
            .ok_or_else(|| {
                CheckerError::format(path, format!("invalid klist timestamp '{}'", stamp))
            })?;

        let timestamp = Local
            .from_local_datetime(&naive)
            .earliest()
            .ok_or_else(|| {
                CheckerError::format(path, format!("nonexistent local time '{}'", stamp))
            })?
            .with_timezone(&Utc);

        entries.push(KeytabEntry {
            principal: Principal::parse(fields[3]),
            timestamp,
            kvno,
            enctype: 0,
            key: Vec::new(),
        });
    }

    Ok(Keytab {
        path: path.to_string(),
        version: KEYTAB_VERSION_2,
        entries,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const LISTING: &str = "Keytab name: FILE:agg.keytab
KVNO Timestamp           Principal
---- ------------------- ------------------------------------------------------
   1 11/16/2022 14:34:08 agg@CERN.CH
   2 11/17/2022 09:00:00 HTTP/agg.cern.ch@CERN.CH (aes256-cts-hmac-sha1-96)
";

    #[test]
    fn test_parse_listing() {
        let keytab = parse_listing("agg.keytab", LISTING).unwrap();
        assert_eq!(keytab.entries.len(), 2);

        let first = &keytab.entries[0];
        assert_eq!(first.kvno, 1);
        assert_eq!(first.principal.label(), "agg");
        assert_eq!(first.principal.realm, "CERN.CH");

        let expected = Local
            .with_ymd_and_hms(2022, 11, 16, 14, 34, 8)
            .earliest()
            .unwrap()
            .with_timezone(&Utc);
        assert_eq!(first.timestamp, expected);

        let second = &keytab.entries[1];
        assert_eq!(second.principal.label(), "HTTP,agg.cern.ch");
    }

    #[test]
    fn test_parse_two_digit_year() {
        let keytab = parse_listing("a.keytab", "   3 01/02/24 03:04:05 svc@EXAMPLE.ORG").unwrap();

        let expected = Local
            .with_ymd_and_hms(2024, 1, 2, 3, 4, 5)
            .earliest()
            .unwrap()
            .with_timezone(&Utc);
        assert_eq!(keytab.entries[0].timestamp, expected);
    }

    #[test]
    fn test_parse_listing_rejects_garbage() {
        let err = parse_listing("a.keytab", "   x 11/16/2022 14:34:08 agg@CERN.CH").unwrap_err();
        assert!(err.to_string().contains("invalid kvno"));

        let err = parse_listing("a.keytab", "   1 2022-11-16 14:34:08 agg@CERN.CH").unwrap_err();
        assert!(err.to_string().contains("invalid klist timestamp"));
    }

    #[test]
    fn test_inspect_empty_path() {
        let err = inspect("").unwrap_err();
        assert!(matches!(err, CheckerError::CredentialMissing { .. }));
    }
}
