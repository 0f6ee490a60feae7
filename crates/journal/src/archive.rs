//! The archive object: owns a container path and the toc built by `load`.

use crate::entry::{self, Decoded};
use crate::error::{JournalError, Result};
use crate::format::INFO_BYTES;
use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use toc::{Toc, TocEntry};

/// How many payload bytes the verbose load shows per entry.
const BRIEF_BYTES: u64 = 16;

/// A journey container on disk plus its in-memory table of contents.
///
/// The file is **not** held open between operations. `load`, `read` and
/// `append` each open their own handle and release it before returning,
/// so an `append` from another process interleaves at entry granularity
/// and becomes visible at the next `load`.
///
/// `append` never touches the in-memory toc; call [`load`](Journal::load)
/// again to observe new entries.
#[derive(Debug)]
pub struct Journal {
    /// Path of the container file.
    path: PathBuf,
    /// Surviving revision per name, rebuilt by every `load`.
    toc: Toc,
}

impl Journal {
    /// Creates an archive object for the container at `path`.
    ///
    /// Pure bookkeeping: the filesystem is not touched and the file need
    /// not exist yet. An empty path is rejected.
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if path.as_os_str().is_empty() {
            return Err(JournalError::InvalidArgument("container path is empty"));
        }
        Ok(Self {
            path: path.to_path_buf(),
            toc: Toc::new(),
        })
    }

    /// Resets the toc and adopts a new container path.
    ///
    /// An empty path fails and leaves the archive unchanged.
    pub fn init(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if path.as_os_str().is_empty() {
            return Err(JournalError::InvalidArgument("container path is empty"));
        }
        self.path = path.to_path_buf();
        self.toc.clear();
        Ok(())
    }

    /// Path of the container file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The toc built by the most recent `load`.
    pub fn toc(&self) -> &Toc {
        &self.toc
    }

    /// Rebuilds the toc from entries whose stamp falls inside
    /// `[beg_stamp, end_stamp]` (inclusive).
    ///
    /// Entries are visited from end-of-file backwards, newest first, and
    /// the first record seen for a name wins. The walk stops cleanly at
    /// the first missing magic, which is how a foreign prefix (or the
    /// start of the file) announces itself. Payload bytes are never read.
    ///
    /// Returns the number of entries visited.
    ///
    /// # Errors
    ///
    /// Fails on a reversed window, on I/O errors, and when not a single
    /// well-formed entry was seen.
    pub fn load(&mut self, beg_stamp: u64, end_stamp: u64) -> Result<usize> {
        self.load_inner(beg_stamp, end_stamp, None)
    }

    /// Like [`load`](Journal::load), but writes a human-readable line per
    /// visited entry to `sink`, including whether it was inscribed and a
    /// hex/ASCII brief of up to 16 payload bytes.
    ///
    /// This is the only load mode that reads payload bytes.
    pub fn load_verbose(
        &mut self,
        beg_stamp: u64,
        end_stamp: u64,
        sink: &mut dyn Write,
    ) -> Result<usize> {
        self.load_inner(beg_stamp, end_stamp, Some(sink))
    }

    fn load_inner(
        &mut self,
        beg_stamp: u64,
        end_stamp: u64,
        mut sink: Option<&mut dyn Write>,
    ) -> Result<usize> {
        if beg_stamp > end_stamp {
            return Err(JournalError::InvalidArgument("timestamp window is reversed"));
        }
        self.toc.clear();

        let mut file = File::open(&self.path)?;
        let mut end = file.metadata()?.len();
        let mut count = 0usize;

        while end >= INFO_BYTES {
            let e = match entry::read_trailing_entry(&mut file, end)? {
                Decoded::Entry(e) => e,
                Decoded::Foreign => break,
                Decoded::Corrupt(reason) => {
                    if let Some(sink) = sink.as_deref_mut() {
                        writeln!(sink, "scan ended: {reason}")?;
                    }
                    break;
                }
            };

            let in_window = beg_stamp <= e.stamp && e.stamp <= end_stamp;
            let inscribed = in_window
                && self.toc.inscribe(
                    &e.name,
                    TocEntry {
                        offset: e.offset,
                        size: e.size,
                        stamp: e.stamp,
                    },
                );

            if let Some(sink) = sink.as_deref_mut() {
                let brief = payload_brief(&mut file, e.offset, e.size)?;
                writeln!(
                    sink,
                    "{} '{}' {} bytes stamp {} {}",
                    if inscribed { "inscribed" } else { "skipped" },
                    e.name,
                    e.size,
                    e.stamp,
                    brief,
                )?;
            }

            count += 1;
            end -= e.filelen;
        }

        if count == 0 {
            return Err(JournalError::NoEntries);
        }
        Ok(count)
    }

    /// Returns a copy of the payload inscribed for `name`.
    pub fn read(&self, name: &str) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        self.read_into(&mut buf, name)?;
        Ok(buf)
    }

    /// Reads the payload inscribed for `name` into `buf`, reusing its
    /// allocation. On any failure `buf` is left empty.
    pub fn read_into(&self, buf: &mut Vec<u8>, name: &str) -> Result<()> {
        buf.clear();
        let entry = self
            .toc
            .get(name)
            .ok_or_else(|| JournalError::NotFound(name.to_owned()))?;

        let mut file = File::open(&self.path)?;
        file.seek(SeekFrom::Start(entry.offset))?;
        buf.resize(entry.size as usize, 0);
        if let Err(err) = file.read_exact(buf) {
            buf.clear();
            return Err(err.into());
        }
        Ok(())
    }

    /// Appends one entry to the container, creating the file if needed.
    ///
    /// The name must be non-empty; an empty payload and a zero stamp are
    /// both legal. The in-memory toc is left untouched.
    pub fn append(&self, name: &str, payload: &[u8], stamp: u64) -> Result<()> {
        if name.is_empty() {
            return Err(JournalError::InvalidArgument("entry name is empty"));
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        // append mode reports position 0 until the first write; the
        // encoder needs the true end offset for its padding math
        file.seek(SeekFrom::End(0))?;
        entry::append_entry(&mut file, name, payload, stamp)?;
        Ok(())
    }

    /// Writes a fresh container at `new_path` holding exactly one entry
    /// per name currently in the toc, preserving each stamp.
    ///
    /// Callers pick the surviving revisions with the window they pass to
    /// `load` beforehand. The old container is not deleted.
    ///
    /// # Errors
    ///
    /// Fails if the toc is empty and on the first read or append error.
    pub fn compact(&self, new_path: impl AsRef<Path>) -> Result<()> {
        if self.toc.is_empty() {
            return Err(JournalError::EmptyToc);
        }
        let fresh = Journal::new(new_path)?;
        // one staging buffer, grown to the largest payload
        let mut staging = Vec::new();
        for (name, info) in self.toc.iter() {
            self.read_into(&mut staging, name)?;
            fresh.append(name, &staging, info.stamp)?;
        }
        Ok(())
    }
}

/// Reads up to [`BRIEF_BYTES`] payload bytes and renders them as hex plus
/// a printable-ASCII gutter.
fn payload_brief(file: &mut File, offset: u64, size: u64) -> Result<String> {
    use std::fmt::Write as _;

    let take = size.min(BRIEF_BYTES) as usize;
    let mut bytes = vec![0u8; take];
    file.seek(SeekFrom::Start(offset))?;
    file.read_exact(&mut bytes)?;

    let mut hex = String::new();
    let mut ascii = String::new();
    for b in bytes {
        let _ = write!(hex, "{b:02x} ");
        ascii.push(if (0x20..0x7f).contains(&b) { b as char } else { '.' });
    }
    Ok(format!("{hex}|{ascii}|"))
}
