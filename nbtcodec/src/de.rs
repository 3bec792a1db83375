//! Decoding of uncompressed NBT into a [`RootCompound`].
//!
//! Most callers want [`decode`][`crate::decode`], which also handles gzip.
//! The functions here expect the raw NBT bytes.
//!
//! ```
//! use nbtcodec::de::{from_bytes, DecodeOpts};
//! use std::time::Duration;
//!
//! // A root compound named "" holding one int, "int" = 0xdead.
//! let bytes = [10, 0, 0, 3, 0, 3, 105, 110, 116, 0, 0, 222, 173, 0];
//!
//! let root = from_bytes(&bytes, DecodeOpts::new().deadline(Duration::from_secs(1))).unwrap();
//! assert_eq!(root.name, "");
//! assert_eq!(root.body["int"].as_i64(), Some(0xdead));
//! ```
//!
//! # Deadlines
//!
//! A deadline is checked once before every token: every compound entry, every
//! list element, and every container end. Arrays are also checked every few
//! thousand elements while they are read. When it passes, decoding stops with
//! an error of kind [`ParseTimeout`][`crate::error::ErrorKind::ParseTimeout`]
//! and the partial tree is dropped. The check is cooperative, a read that
//! blocks inside the source is not interrupted.

use std::io::Read;
use std::time::Duration;

use crate::deadline::Deadline;
use crate::error::{Error, Result};
use crate::read_nbt::prealloc;
use crate::stream::{Name, Parser, Token};
use crate::{Compound, List, RootCompound, Tag, TagType};

/// Options for decoding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DecodeOpts {
    deadline: Option<Duration>,
}

impl DecodeOpts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Give up with a timeout error once this much time has passed since the
    /// decode call started.
    pub fn deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn get_deadline(&self) -> Option<Duration> {
        self.deadline
    }

    pub(crate) fn start(&self) -> Deadline {
        Deadline::from_budget(self.deadline)
    }
}

/// Decode a root compound from uncompressed bytes.
pub fn from_bytes(input: &[u8], opts: DecodeOpts) -> Result<RootCompound> {
    decode_raw(input, &opts.start())
}

/// Decode a root compound from an uncompressed reader. Bytes after the root
/// compound are left unread.
pub fn from_reader<R: Read>(reader: R, opts: DecodeOpts) -> Result<RootCompound> {
    decode_raw(reader, &opts.start())
}

/// A container that has been opened but not yet closed.
enum Frame {
    Compound(Name, Compound),
    List(Name, TagType, Vec<Tag>),
}

pub(crate) fn decode_raw<R: Read>(reader: R, deadline: &Deadline) -> Result<RootCompound> {
    let mut parser = Parser::new(reader, *deadline);

    deadline.check()?;
    let root_name = parser.root()?;

    let mut frames = vec![Frame::Compound(None, Compound::new())];

    loop {
        deadline.check()?;

        let (name, tag) = match parser.next()? {
            Token::Value(name, tag) => (name, tag),
            Token::Compound(name) => {
                frames.push(Frame::Compound(name, Compound::new()));
                continue;
            }
            Token::List(name, element, len) => {
                frames.push(Frame::List(name, element, Vec::with_capacity(prealloc(len))));
                continue;
            }
            Token::CompoundEnd => match frames.pop() {
                Some(Frame::Compound(_, body)) if frames.is_empty() => {
                    return Ok(RootCompound {
                        name: root_name,
                        body,
                    });
                }
                Some(Frame::Compound(name, body)) => (name, Tag::Compound(body)),
                _ => return Err(Error::malformed("end tag outside of compound")),
            },
            Token::ListEnd => match frames.pop() {
                Some(Frame::List(name, element, items)) => {
                    (name, Tag::List(List::from_parts(element, items)))
                }
                _ => return Err(Error::malformed("list ended outside of list")),
            },
        };

        attach(&mut frames, name, tag)?;
    }
}

fn attach(frames: &mut [Frame], name: Name, tag: Tag) -> Result<()> {
    match (frames.last_mut(), name) {
        // Last write wins for repeated keys. The key keeps the position it was
        // first seen at.
        (Some(Frame::Compound(_, body)), Some(name)) => {
            body.insert(name, tag);
            Ok(())
        }
        (Some(Frame::List(_, _, items)), None) => {
            items.push(tag);
            Ok(())
        }
        _ => Err(Error::malformed("value outside of a container")),
    }
}
