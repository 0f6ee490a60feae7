//! Entry codec: the append-time encoder and the backward-scan decoder.
//!
//! An entry is self-delimited by its trailing info block. The encoder only
//! ever appends; the decoder starts from an entry's *end* offset, reads the
//! info block, and walks the body forward to recover name and payload
//! position. Paddings are recomputed from absolute offsets on both sides.

use crate::error::Result;
use crate::format::{self, Info, INFO_BYTES};
use std::io::{Read, Seek, SeekFrom, Write};

/// One decoded entry, as seen by the backward scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrailingEntry {
    /// UTF-8 name, exactly `namelen` bytes of it (embedded NULs legal).
    pub name: String,
    /// Absolute byte offset of the payload's first byte.
    pub offset: u64,
    /// Payload length in bytes.
    pub size: u64,
    /// Timestamp recorded at append time.
    pub stamp: u64,
    /// Total entry length; the scan steps back by this much.
    pub filelen: u64,
}

/// Outcome of probing for an entry ending at a given offset.
#[derive(Debug)]
pub enum Decoded {
    /// A well-formed entry ends at the probed offset.
    Entry(TrailingEntry),
    /// The bytes before the probed offset carry no magic. This is the
    /// clean end of the scan: either the container's foreign prefix or
    /// the start of the file.
    Foreign,
    /// A magic-valid info block whose lengths cannot fit the file. The
    /// scan stops here and keeps whatever it has built so far.
    Corrupt(&'static str),
}

/// Appends one entry to `w` and returns the number of bytes written.
///
/// `w` must be positioned at end-of-file; every offset-keyed padding is
/// derived from the current stream position. The name is written without
/// interpretation, followed by a single separator NUL that is not counted
/// in `namelen`.
pub fn append_entry<W: Write + Seek>(
    w: &mut W,
    name: &str,
    payload: &[u8],
    stamp: u64,
) -> Result<u64> {
    let start = w.stream_position()?;
    let mut pos = start;

    pos += format::write_padding(w, pos)?;
    w.write_all(name.as_bytes())?;
    pos += name.len() as u64;
    w.write_all(&[0])?;
    pos += 1;

    pos += format::write_padding(w, pos)?;
    w.write_all(payload)?;
    pos += payload.len() as u64;

    pos += format::write_padding(w, pos)?;
    let info = Info {
        stamp,
        namelen: name.len() as u64,
        datalen: payload.len() as u64,
        filelen: pos + INFO_BYTES - start,
        magic: format::MAGIC,
    };
    format::write_info(w, &info)?;
    Ok(pos + INFO_BYTES - start)
}

/// Decodes the entry ending at absolute offset `end`, which must be at
/// least [`INFO_BYTES`].
///
/// Only genuine I/O failures become errors; a missing magic or an
/// impossible length is a normal [`Decoded`] outcome, because the scan
/// cannot tell corruption apart from the start of a foreign prefix.
pub fn read_trailing_entry<R: Read + Seek>(r: &mut R, end: u64) -> Result<Decoded> {
    debug_assert!(end >= INFO_BYTES);
    let body_end = end - INFO_BYTES;

    r.seek(SeekFrom::Start(body_end))?;
    let info = format::read_info(r)?;
    if !format::is_magic(info.magic) {
        return Ok(Decoded::Foreign);
    }
    if info.filelen < INFO_BYTES {
        return Ok(Decoded::Corrupt("entry shorter than its info block"));
    }
    let Some(start) = end.checked_sub(info.filelen) else {
        return Ok(Decoded::Corrupt("entry length reaches past file start"));
    };

    // Walk the body forward from the entry's first byte.
    let mut pos = start + format::padding_for(start);
    if info.namelen > body_end.saturating_sub(pos) {
        return Ok(Decoded::Corrupt("name does not fit inside entry"));
    }
    r.seek(SeekFrom::Start(pos))?;
    let mut name_buf = vec![0u8; info.namelen as usize];
    r.read_exact(&mut name_buf)?;
    let Ok(name) = String::from_utf8(name_buf) else {
        return Ok(Decoded::Corrupt("name is not valid UTF-8"));
    };
    pos += info.namelen + 1; // separator NUL
    pos += format::padding_for(pos);

    if info.datalen > body_end.saturating_sub(pos) {
        return Ok(Decoded::Corrupt("payload does not fit inside entry"));
    }
    let offset = pos;
    pos += info.datalen;
    pos += format::padding_for(pos);
    if pos != body_end {
        return Ok(Decoded::Corrupt("entry framing does not close at its info block"));
    }

    Ok(Decoded::Entry(TrailingEntry {
        name,
        offset,
        size: info.datalen,
        stamp: info.stamp,
        filelen: info.filelen,
    }))
}
