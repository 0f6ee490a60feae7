//! # Journal — the journey backup container
//!
//! A header-less, append-only archive format for named blobs. New
//! revisions of a blob are added by appending; older revisions stay
//! recoverable until a compaction pass discards them.
//!
//! There is no global header or footer: the file is parsed by reading the
//! *last* fixed-size info block and walking backwards entry-by-entry. Two
//! valid containers joined end-to-end therefore remain valid, and
//! arbitrary unrecognized bytes before the first entry are tolerated.
//!
//! ## Entry layout
//!
//! ```text
//! ┌───────────────────────────────────────────────┐
//! │ pad      (0..=7 zero bytes, aligns to 8)      │
//! │ name     (namelen bytes UTF-8) | NUL          │
//! │ pad      (0..=7 zero bytes, aligns to 8)      │
//! │ payload  (datalen bytes, opaque)              │
//! │ pad      (0..=7 zero bytes, aligns to 8)      │
//! ├───────────────────────────────────────────────┤
//! │ INFO BLOCK (always last 40 bytes)             │
//! │                                               │
//! │ stamp | namelen | datalen | filelen | magic   │
//! │ (five u64 LE; magic = "journey1")             │
//! └───────────────────────────────────────────────┘
//! ```
//!
//! Paddings are sized from the absolute file offset, so every name and
//! payload starts 8-aligned and readers recompute the paddings without
//! stored metadata. `filelen` covers the whole entry, info block
//! included, and is the step size for the backward walk.
//!
//! ## Usage
//!
//! ```no_run
//! use journal::Journal;
//!
//! # fn main() -> Result<(), journal::JournalError> {
//! let mut j = Journal::new("backup.joy")?;
//! j.append("hello.txt", b"world", 500)?;
//! j.load(0, 1000)?;
//! assert_eq!(j.read("hello.txt")?, b"world");
//! # Ok(())
//! # }
//! ```

mod archive;
mod entry;
mod error;
mod format;

pub use archive::Journal;
pub use error::{JournalError, Result};
pub use format::{INFO_BYTES, MAGIC, MAGIC_SWAPPED};
