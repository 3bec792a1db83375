//! nbtcodec reads and writes the binary NBT format used by *Minecraft: Java
//! Edition* for world, player and structure data, and can cheaply guess
//! whether an arbitrary file is NBT at all.
//!
//! * For decoding, with or without gzip, see [`decode`] and the [`de`] module.
//! * For encoding see [`encode`] and the [`ser`] module.
//! * For classifying unknown data see [`detect`][`detect()`] and the
//!   [`detect`][`mod@detect`] module.
//! * The in-memory tree is made of [`Tag`]s, under a [`RootCompound`].
//!
//! # Quick example
//!
//! Read a possibly gzipped file, change a value and write it back in the same
//! form it was read in.
//!
//! ```no_run
//! use nbtcodec::{decode, encode, Tag};
//! use std::time::Duration;
//!
//! # fn main() -> nbtcodec::error::Result<()> {
//! let bytes = std::fs::read("level.dat")?;
//! let (mut root, compression) = decode(&bytes, None)?;
//!
//! root.body.insert("Difficulty".to_owned(), Tag::Byte(3));
//!
//! let bytes = encode(&root, compression)?;
//! std::fs::write("level.dat", bytes)?;
//! # Ok(())
//! # }
//! ```
//!
//! # Untrusted input
//!
//! Decoding and encoding never recurse per level of nesting, and lengths read
//! from the input are not trusted for allocation, so hostile data produces an
//! error rather than a crash. A deadline bounds how long a decode may take.

use std::io::{Read, Write};
use std::time::Duration;

pub mod compression;
pub mod de;
pub mod deadline;
pub mod detect;
pub mod error;
pub mod ser;

mod macros;
mod read_nbt;
mod registry;
mod stream;
mod tag;
mod walk;

pub use compression::Compression;
pub use de::DecodeOpts;
pub use detect::{classify, detect, Verdict};
pub use registry::TagType;
pub use tag::*;

use crate::error::Result;

#[cfg(test)]
mod test;

/// Decode a document that may or may not be gzipped, giving up with a
/// `ParseTimeout` error once `deadline` has passed.
///
/// The returned [`Compression`] says whether gzip framing was found.
pub fn decode(bytes: &[u8], deadline: Option<Duration>) -> Result<(RootCompound, Compression)> {
    let opts = match deadline {
        Some(deadline) => DecodeOpts::new().deadline(deadline),
        None => DecodeOpts::new(),
    };
    decode_with_opts(bytes, opts)
}

pub fn decode_with_opts(bytes: &[u8], opts: DecodeOpts) -> Result<(RootCompound, Compression)> {
    let deadline = opts.start();
    let compression = Compression::sniff(bytes);
    let root = de::decode_raw(compression.wrap_reader(bytes), &deadline)?;
    Ok((root, compression))
}

/// Like [`decode_with_opts`] but for any reader.
pub fn decode_reader<R: Read>(reader: R, opts: DecodeOpts) -> Result<(RootCompound, Compression)> {
    let deadline = opts.start();
    let (compression, reader) = Compression::sniff_reader(reader)?;
    let root = de::decode_raw(reader, &deadline)?;
    Ok((root, compression))
}

/// Encode a document, gzipping it if asked to.
pub fn encode(root: &RootCompound, compression: Compression) -> Result<Vec<u8>> {
    encode_to_writer(Vec::new(), root, compression)
}

/// Encode a document into a writer, returning the writer once the document
/// (and any gzip trailer) has been written.
pub fn encode_to_writer<W: Write>(
    writer: W,
    root: &RootCompound,
    compression: Compression,
) -> Result<W> {
    compression.write_with(writer, |w| ser::to_writer(w, root))
}
