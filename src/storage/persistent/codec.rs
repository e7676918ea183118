//! On-disk snapshot format.
//!
//! ```text
//! [magic "JTMS"][format version u8][body length u32 LE][JSON body][crc32 LE]
//! ```
//!
//! The checksum covers the body only. A file whose header, length or
//! checksum does not line up is rejected as a whole.

use std::io::{Error as IoError, ErrorKind, Read, Result as IoResult, Write};

use chrono::{DateTime, Utc};
use crc32fast::Hasher;
use serde::{Deserialize, Serialize};

use crate::graph::Graph;
use crate::term::Iri;

const MAGIC: [u8; 4] = *b"JTMS";

/// Bumped whenever the body layout changes.
const FORMAT_VERSION: u8 = 1;

/// One named graph inside a snapshot.
#[derive(Debug, Serialize, Deserialize)]
pub(super) struct NamedGraph {
    pub name: Iri,
    pub triples: Graph,
}

/// Every graph of a store at one point in time.
#[derive(Debug, Serialize, Deserialize)]
pub(super) struct Snapshot {
    pub saved_at: DateTime<Utc>,
    pub graphs: Vec<NamedGraph>,
}

fn invalid(message: String) -> IoError {
    IoError::new(ErrorKind::InvalidData, message)
}

fn checksum(body: &[u8]) -> u32 {
    let mut hasher = Hasher::new();
    hasher.update(body);
    hasher.finalize()
}

/// Writes `snapshot` as a complete file image.
pub(super) fn write_snapshot(
    writer: &mut impl Write,
    snapshot: &Snapshot,
    max_size: u64,
) -> IoResult<()> {
    let body = serde_json::to_vec(snapshot)
        .map_err(|e| invalid(format!("snapshot serialization failed: {e}")))?;
    let len = u32::try_from(body.len())
        .ok()
        .filter(|&len| u64::from(len) <= max_size)
        .ok_or_else(|| {
            invalid(format!(
                "snapshot of {} bytes exceeds the {max_size} byte limit",
                body.len()
            ))
        })?;

    writer.write_all(&MAGIC)?;
    writer.write_all(&[FORMAT_VERSION])?;
    writer.write_all(&len.to_le_bytes())?;
    writer.write_all(&body)?;
    writer.write_all(&checksum(&body).to_le_bytes())?;
    Ok(())
}

/// Reads and verifies a file image written by [`write_snapshot`].
pub(super) fn read_snapshot(reader: &mut impl Read, max_size: u64) -> IoResult<Snapshot> {
    let mut magic = [0u8; 4];
    reader.read_exact(&mut magic)?;
    if magic != MAGIC {
        return Err(invalid(format!("not a snapshot file (magic {magic:?})")));
    }

    let mut version = [0u8; 1];
    reader.read_exact(&mut version)?;
    if version[0] != FORMAT_VERSION {
        return Err(invalid(format!(
            "unsupported snapshot format {} (expected {FORMAT_VERSION})",
            version[0]
        )));
    }

    let mut len = [0u8; 4];
    reader.read_exact(&mut len)?;
    let len = u32::from_le_bytes(len);
    if u64::from(len) > max_size {
        return Err(invalid(format!(
            "snapshot body of {len} bytes exceeds the {max_size} byte limit"
        )));
    }

    let mut body = vec![0u8; len as usize];
    reader.read_exact(&mut body)?;
    let mut stored = [0u8; 4];
    reader.read_exact(&mut stored)?;
    let stored = u32::from_le_bytes(stored);
    let computed = checksum(&body);
    if stored != computed {
        return Err(invalid(format!(
            "snapshot CRC mismatch: stored={stored:08x}, computed={computed:08x}"
        )));
    }

    serde_json::from_slice(&body)
        .map_err(|e| invalid(format!("snapshot body is not readable: {e}")))
}
