// Keytab Parser - MIT Kerberos keytab binary format
// Copyright (C) 2025 Marc Rivero (@seifreed)
// Licensed under GPL-3.0

use crate::Result;
use crate::credentials::read_source_file;
use crate::error::CheckerError;
use chrono::{DateTime, Utc};
use std::fmt;

/// First byte of every keytab file
pub const KEYTAB_MAGIC: u8 = 0x05;

/// Version 1 keytabs use host byte order and count the realm as a component
pub const KEYTAB_VERSION_1: u8 = 0x01;

/// Version 2 keytabs are big-endian and carry a name type
pub const KEYTAB_VERSION_2: u8 = 0x02;

/// Kerberos principal name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub realm: String,
    pub components: Vec<String>,
    pub name_type: u32,
}

impl Principal {
    /// Parse a `name/instance@REALM` string
    pub fn parse(value: &str) -> Self {
        let (name, realm) = value.rsplit_once('@').unwrap_or((value, ""));

        Self {
            realm: realm.to_string(),
            components: name.split('/').map(str::to_string).collect(),
            name_type: 1,
        }
    }

    /// Components joined with `,`, the form used in alerts and metric labels
    pub fn label(&self) -> String {
        self.components.join(",")
    }
}

impl fmt::Display for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.components.join("/"))?;
        if !self.realm.is_empty() {
            write!(f, "@{}", self.realm)?;
        }
        Ok(())
    }
}

/// Single keytab entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeytabEntry {
    pub principal: Principal,
    /// Time the key was written to the keytab
    pub timestamp: DateTime<Utc>,
    pub kvno: u32,
    pub enctype: u16,
    pub key: Vec<u8>,
}

/// Parsed keytab, entries in file order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Keytab {
    pub path: String,
    pub version: u8,
    pub entries: Vec<KeytabEntry>,
}

impl Keytab {
    /// Read and parse a keytab file
    pub fn from_file(path: &str) -> Result<Self> {
        let data = read_source_file(path, "keytab")?;
        Self::parse(path, &data)
    }

    /// Parse keytab bytes; `path` is only used in error messages
    pub fn parse(path: &str, data: &[u8]) -> Result<Self> {
        if data.len() < 2 || data[0] != KEYTAB_MAGIC {
            return Err(CheckerError::format(path, "not a keytab file"));
        }

        let version = data[1];
        let big_endian = match version {
            KEYTAB_VERSION_1 => cfg!(target_endian = "big"),
            KEYTAB_VERSION_2 => true,
            other => {
                return Err(CheckerError::format(
                    path,
                    format!("unsupported keytab version {:#04x}", other),
                ));
            }
        };

        let mut reader = ByteReader::new(path, &data[2..], big_endian);
        let mut entries = Vec::new();

        // Records end at EOF or at a zero length marker
        while reader.remaining() >= 4 {
            let length = reader.read_i32()?;
            if length == 0 {
                break;
            }

            if length < 0 {
                // Hole left behind by a deleted entry
                reader.skip(length.unsigned_abs() as usize)?;
                continue;
            }

            let record = reader.read_bytes(length as usize)?;
            let mut record_reader = ByteReader::new(path, record, big_endian);
            entries.push(parse_entry(&mut record_reader, version)?);
        }

        Ok(Self {
            path: path.to_string(),
            version,
            entries,
        })
    }

    /// Encode as a version 2 keytab
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = vec![KEYTAB_MAGIC, KEYTAB_VERSION_2];

        for entry in &self.entries {
            let mut record = Vec::new();
            put_u16(&mut record, entry.principal.components.len() as u16);
            put_counted(&mut record, entry.principal.realm.as_bytes());
            for component in &entry.principal.components {
                put_counted(&mut record, component.as_bytes());
            }
            record.extend_from_slice(&entry.principal.name_type.to_be_bytes());
            record.extend_from_slice(&(entry.timestamp.timestamp().max(0) as u32).to_be_bytes());
            record.push((entry.kvno & 0xff) as u8);
            put_u16(&mut record, entry.enctype);
            put_counted(&mut record, &entry.key);
            record.extend_from_slice(&entry.kvno.to_be_bytes());

            out.extend_from_slice(&(record.len() as i32).to_be_bytes());
            out.extend_from_slice(&record);
        }

        out
    }
}

fn parse_entry(reader: &mut ByteReader<'_>, version: u8) -> Result<KeytabEntry> {
    let mut component_count = reader.read_u16()?;
    if version == KEYTAB_VERSION_1 {
        component_count = component_count
            .checked_sub(1)
            .ok_or_else(|| reader.error("principal without realm"))?;
    }

    let realm = reader.read_string()?;
    let components = (0..component_count)
        .map(|_| reader.read_string())
        .collect::<Result<Vec<_>>>()?;

    let name_type = if version == KEYTAB_VERSION_1 {
        0
    } else {
        reader.read_u32()?
    };

    let raw_timestamp = reader.read_u32()?;
    let timestamp = DateTime::from_timestamp(i64::from(raw_timestamp), 0)
        .ok_or_else(|| reader.error("timestamp out of range"))?;

    let kvno8 = reader.read_u8()?;
    let enctype = reader.read_u16()?;
    let key_length = reader.read_u16()? as usize;
    let key = reader.read_bytes(key_length)?.to_vec();

    // Newer writers append a 32-bit kvno that supersedes the 8-bit one
    let mut kvno = u32::from(kvno8);
    if reader.remaining() >= 4 {
        let kvno32 = reader.read_u32()?;
        if kvno32 != 0 {
            kvno = kvno32;
        }
    }

    Ok(KeytabEntry {
        principal: Principal {
            realm,
            components,
            name_type,
        },
        timestamp,
        kvno,
        enctype,
        key,
    })
}

fn put_u16(out: &mut Vec<u8>, value: u16) {
    out.extend_from_slice(&value.to_be_bytes());
}

fn put_counted(out: &mut Vec<u8>, data: &[u8]) {
    put_u16(out, data.len() as u16);
    out.extend_from_slice(data);
}

/// Bounds-checked cursor over keytab bytes
struct ByteReader<'a> {
    path: &'a str,
    data: &'a [u8],
    cursor: usize,
    big_endian: bool,
}

impl<'a> ByteReader<'a> {
    fn new(path: &'a str, data: &'a [u8], big_endian: bool) -> Self {
        Self {
            path,
            data,
            cursor: 0,
            big_endian,
        }
    }

    fn remaining(&self) -> usize {
        self.data.len() - self.cursor
    }

    fn error(&self, details: &str) -> CheckerError {
        CheckerError::format(self.path, format!("{} at offset {}", details, self.cursor))
    }

    fn read_bytes(&mut self, len: usize) -> Result<&'a [u8]> {
        if self.remaining() < len {
            return Err(self.error("truncated keytab"));
        }
        let data: &'a [u8] = self.data;
        let bytes = &data[self.cursor..self.cursor + len];
        self.cursor += len;
        Ok(bytes)
    }

    fn skip(&mut self, len: usize) -> Result<()> {
        self.read_bytes(len).map(|_| ())
    }

    fn read_u8(&mut self) -> Result<u8> {
        Ok(self.read_bytes(1)?[0])
    }

    fn read_u16(&mut self) -> Result<u16> {
        let b = self.read_bytes(2)?;
        let raw = [b[0], b[1]];
        Ok(if self.big_endian {
            u16::from_be_bytes(raw)
        } else {
            u16::from_le_bytes(raw)
        })
    }

    fn read_u32(&mut self) -> Result<u32> {
        let b = self.read_bytes(4)?;
        let raw = [b[0], b[1], b[2], b[3]];
        Ok(if self.big_endian {
            u32::from_be_bytes(raw)
        } else {
            u32::from_le_bytes(raw)
        })
    }

    fn read_i32(&mut self) -> Result<i32> {
        self.read_u32().map(|v| v as i32)
    }

    fn read_string(&mut self) -> Result<String> {
        let len = self.read_u16()? as usize;
        let bytes = self.read_bytes(len)?;
        Ok(String::from_utf8_lossy(bytes).into_owned())
    }
}
