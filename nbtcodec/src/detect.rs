//! Best-effort answer to "is this blob NBT?" within a time budget.
//!
//! Used to classify files by content. The blob is decoded as usual, but
//! under a deadline, and the way the decode ends decides the verdict:
//!
//! * a complete document is [`Verdict::Nbt`],
//! * running out of time is [`Verdict::LikelyNbt`], since no structural error
//!   was seen before the deadline,
//! * running out of input part way through is [`Verdict::TruncatedPrefix`],
//!   the blob is a consistent prefix of a document,
//! * any structural error, or an empty input, is [`Verdict::NotNbt`].
//!
//! Garbage is the expected input here. Classification never panics, and stops
//! at the first structural error, which for random bytes is almost always the
//! very first type id.

use std::io::{self, Read};
use std::time::Duration;

use log::trace;

use crate::compression::Compression;
use crate::de::decode_raw;
use crate::deadline::Deadline;
use crate::error::ErrorKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// The whole document decoded.
    Nbt,
    /// The deadline passed while the data still looked valid.
    LikelyNbt,
    /// The input ended part way through an otherwise consistent document.
    TruncatedPrefix { consumed: u64 },
    /// The data is not NBT.
    NotNbt,
}

impl Verdict {
    /// Whether the blob should be treated as NBT.
    pub fn is_nbt(self) -> bool {
        !matches!(self, Verdict::NotNbt)
    }
}

/// Classify a blob, spending at most roughly `budget` on it.
///
/// There is no minimum size for [`Verdict::TruncatedPrefix`]. Any input that
/// runs out before the document closes, without a structural error first, is
/// a truncated prefix, even a single byte such as `[10]`. Only an input that
/// decompresses to nothing at all is [`Verdict::NotNbt`] for lack of data.
/// Callers that want stronger evidence can check `consumed`.
pub fn classify(bytes: &[u8], budget: Duration) -> Verdict {
    let deadline = Deadline::after(budget);
    let compression = Compression::sniff(bytes);
    let mut counted = Counted::new(compression.wrap_reader(bytes));

    let verdict = match decode_raw(&mut counted, &deadline) {
        Ok(_) => Verdict::Nbt,
        Err(e) => {
            trace!("classification stopped: {}", e);
            match e.kind() {
                ErrorKind::ParseTimeout => Verdict::LikelyNbt,
                // Nothing was read at all, so there is no evidence either way.
                ErrorKind::UnexpectedEof if counted.count == 0 => Verdict::NotNbt,
                ErrorKind::UnexpectedEof => Verdict::TruncatedPrefix {
                    consumed: counted.count,
                },
                _ => Verdict::NotNbt,
            }
        }
    };

    trace!(
        "classified {} bytes ({:?}) as {:?} in {:?}",
        bytes.len(),
        compression,
        verdict,
        deadline.elapsed()
    );

    verdict
}

/// Whether a blob is plausibly NBT, spending at most roughly `budget` on it.
pub fn detect(bytes: &[u8], budget: Duration) -> bool {
    classify(bytes, budget).is_nbt()
}

/// Counts how many bytes the decoder has pulled through.
struct Counted<R> {
    inner: R,
    count: u64,
}

impl<R> Counted<R> {
    fn new(inner: R) -> Self {
        Self { inner, count: 0 }
    }
}

impl<R: Read> Read for Counted<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        self.count += n as u64;
        Ok(n)
    }
}
