//! Container framing constants and info-block read/write helpers.
//!
//! The info block is always the **last 40 bytes** of an entry:
//!
//! ```text
//! [stamp: u64 LE][namelen: u64 LE][datalen: u64 LE][filelen: u64 LE][magic: u64 LE]
//! ```

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::io::{Read, Result as IoResult, Write};

/// Magic sentinel closing every entry. Its little-endian byte
/// representation spells the ASCII text `journey1`.
pub const MAGIC: u64 = 0x3179_656E_7275_6F6A;

/// The magic as written by a producer of opposite endianness. Accepted on
/// read so archives stay readable across hosts.
pub const MAGIC_SWAPPED: u64 = 0x6A6F_7572_6E65_7931;

/// Size of the info block in bytes: five `u64` fields.
pub const INFO_BYTES: u64 = 8 * 5;

/// Returns `true` if `word` is the magic in either byte order.
pub fn is_magic(word: u64) -> bool {
    word == MAGIC || word == MAGIC_SWAPPED
}

/// Number of zero bytes needed to advance `offset` to the next multiple
/// of 8. Zero when `offset` is already 8-aligned.
///
/// Paddings are keyed on the *absolute* file offset, so a reader can
/// recompute them without any stored alignment metadata.
pub fn padding_for(offset: u64) -> u64 {
    (((offset + 8) & !7) - offset) % 8
}

/// Writes the padding for `offset` to `w` and returns its length.
pub fn write_padding<W: Write>(w: &mut W, offset: u64) -> IoResult<u64> {
    let pad = padding_for(offset);
    w.write_all(&[0u8; 8][..pad as usize])?;
    Ok(pad)
}

/// The fixed-size info block closing every entry.
///
/// `filelen` is the total length of the entry, from the first padding byte
/// through the last magic byte. It is the authoritative step for backward
/// traversal: the previous entry ends exactly `filelen` bytes before this
/// entry's end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Info {
    /// Seconds since epoch, chosen by the caller at append time.
    pub stamp: u64,
    /// Length of the name in bytes, not counting the separator NUL.
    pub namelen: u64,
    /// Length of the payload in bytes.
    pub datalen: u64,
    /// Total entry length, paddings and this block included.
    pub filelen: u64,
    /// Sentinel, [`MAGIC`] on write.
    pub magic: u64,
}

/// Writes an info block to `w`.
pub fn write_info<W: Write>(w: &mut W, info: &Info) -> IoResult<()> {
    w.write_u64::<LittleEndian>(info.stamp)?;
    w.write_u64::<LittleEndian>(info.namelen)?;
    w.write_u64::<LittleEndian>(info.datalen)?;
    w.write_u64::<LittleEndian>(info.filelen)?;
    w.write_u64::<LittleEndian>(info.magic)?;
    Ok(())
}

/// Reads an info block from `r`. The magic is returned as stored; callers
/// decide what a mismatch means.
pub fn read_info<R: Read>(r: &mut R) -> IoResult<Info> {
    Ok(Info {
        stamp: r.read_u64::<LittleEndian>()?,
        namelen: r.read_u64::<LittleEndian>()?,
        datalen: r.read_u64::<LittleEndian>()?,
        filelen: r.read_u64::<LittleEndian>()?,
        magic: r.read_u64::<LittleEndian>()?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn magic_spells_journey1() {
        assert_eq!(&MAGIC.to_le_bytes(), b"journey1");
        assert_eq!(MAGIC_SWAPPED, u64::from_be_bytes(*b"journey1"));
    }

    #[test]
    fn both_byte_orders_accepted() {
        assert!(is_magic(MAGIC));
        assert!(is_magic(MAGIC_SWAPPED));
        assert!(!is_magic(0));
        assert!(!is_magic(MAGIC + 1));
    }

    #[test]
    fn padding_table() {
        for (offset, pad) in [
            (0u64, 0u64),
            (1, 7),
            (2, 6),
            (3, 5),
            (4, 4),
            (5, 3),
            (6, 2),
            (7, 1),
            (8, 0),
            (9, 7),
            (16, 0),
            (1025, 7),
        ] {
            assert_eq!(padding_for(offset), pad, "offset {offset}");
            assert_eq!((offset + pad) % 8, 0, "offset {offset}");
        }
    }

    #[test]
    fn write_padding_emits_zeroes() {
        let mut buf = Vec::new();
        let pad = write_padding(&mut buf, 3).unwrap();
        assert_eq!(pad, 5);
        assert_eq!(buf, vec![0u8; 5]);

        buf.clear();
        assert_eq!(write_padding(&mut buf, 64).unwrap(), 0);
        assert!(buf.is_empty());
    }

    #[test]
    fn info_roundtrip() {
        let info = Info {
            stamp: 500,
            namelen: 9,
            datalen: 8,
            filelen: 72,
            magic: MAGIC,
        };
        let mut buf = Vec::new();
        write_info(&mut buf, &info).unwrap();
        assert_eq!(buf.len() as u64, INFO_BYTES);

        let back = read_info(&mut Cursor::new(buf)).unwrap();
        assert_eq!(back, info);
    }
}
