//! Detection and handling of gzip framing around NBT documents.
//!
//! Files such as `level.dat` and player data are gzipped; data embedded in
//! region files or sent over the network usually is not. The decoder sniffs
//! the first two bytes and reports what it found so the caller can write the
//! document back the same way.

use std::io::{self, Cursor, Read, Write};

use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use log::trace;

use crate::error::Result;

/// The two bytes every gzip stream starts with.
pub const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// How a document is framed on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Compression {
    /// Plain NBT bytes.
    #[default]
    None,
    /// A gzip stream wrapping the NBT bytes.
    Gzip,
}

impl Compression {
    /// Classify a buffer by its leading bytes. Only the magic number is
    /// inspected; a gzip header followed by garbage still sniffs as gzip.
    pub fn sniff(bytes: &[u8]) -> Self {
        if bytes.starts_with(&GZIP_MAGIC) {
            Compression::Gzip
        } else {
            Compression::None
        }
    }

    pub fn is_compressed(self) -> bool {
        self == Compression::Gzip
    }

    /// Classify a reader by its leading bytes, and return a reader that yields
    /// the uncompressed NBT. The sniffed bytes are not lost.
    pub fn sniff_reader<'a, R: Read + 'a>(mut reader: R) -> Result<(Self, Box<dyn Read + 'a>)> {
        let mut magic = [0u8; 2];
        let mut filled = 0;

        while filled < magic.len() {
            match reader.read(&mut magic[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }

        let compression = Self::sniff(&magic[..filled]);
        let rejoined = Cursor::new(magic).take(filled as u64).chain(reader);

        Ok((compression, compression.wrap_reader(rejoined)))
    }

    /// Wrap a reader positioned at the start of the document so that it yields
    /// uncompressed NBT.
    pub fn wrap_reader<'a, R: Read + 'a>(self, reader: R) -> Box<dyn Read + 'a> {
        match self {
            Compression::None => Box::new(reader),
            Compression::Gzip => {
                trace!("gzip magic found, decompressing");
                Box::new(GzDecoder::new(reader))
            }
        }
    }

    /// Run `write` against a writer that applies this compression, then
    /// finish the stream.
    pub(crate) fn write_with<W, F>(self, writer: W, write: F) -> Result<W>
    where
        W: Write,
        F: FnOnce(&mut dyn Write) -> Result<()>,
    {
        match self {
            Compression::None => {
                let mut writer = writer;
                write(&mut writer)?;
                Ok(writer)
            }
            Compression::Gzip => {
                let mut encoder = GzEncoder::new(writer, flate2::Compression::default());
                write(&mut encoder)?;
                Ok(encoder.finish()?)
            }
        }
    }
}
