//! Tokenizes NBT data without building a tree.
//!
//! The parser keeps an explicit stack of the lists and compounds it is inside,
//! so arbitrarily deep input never deepens the call stack.

use std::io::Read;

use crate::deadline::Deadline;
use crate::error::{Error, Result};
use crate::read_nbt::ReadNbt;
use crate::registry::{read_payload, Payload};
use crate::{Tag, TagType};

/// An optional `String`. Elements of a list have no name.
pub(crate) type Name = Option<String>;

/// A shallow piece of NBT.
///
/// Leaves are complete. Lists and compounds only produce their header, followed
/// later by their contents and then a matching `ListEnd` or `CompoundEnd`.
#[derive(Debug, PartialEq)]
pub(crate) enum Token {
    Value(Name, Tag),
    List(Name, TagType, usize),
    ListEnd,
    Compound(Name),
    CompoundEnd,
}

#[derive(Debug, Clone, Copy)]
enum Layer {
    List(TagType, usize),
    Compound,
}

/// Parser can take any reader and parse it as NBT data. Does not do
/// decompression.
pub(crate) struct Parser<R: Read> {
    reader: R,
    layers: Vec<Layer>,
    deadline: Deadline,
}

impl<R: Read> Parser<R> {
    /// The deadline is polled while reading long arrays. Checking between
    /// tokens is up to the caller.
    pub fn new(reader: R, deadline: Deadline) -> Self {
        Self {
            reader,
            layers: Vec::new(),
            deadline,
        }
    }

    /// Read the header of the root compound and return its name. Anything
    /// other than a compound at the top of the document is rejected before its
    /// name or payload are read.
    pub fn root(&mut self) -> Result<String> {
        if !self.layers.is_empty() {
            return Err(Error::malformed("root already read"));
        }

        if self.reader.read_tag_type()? != TagType::Compound {
            return Err(Error::no_root_compound());
        }

        let name = self.reader.read_size_prefixed_string()?;
        self.layers.push(Layer::Compound);
        Ok(name)
    }

    /// Parse the next token from the input.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Result<Token> {
        match self.layers.last_mut() {
            Some(Layer::List(_, 0)) => {
                self.layers.pop();
                return Ok(Token::ListEnd);
            }
            Some(Layer::List(element, remaining)) => {
                *remaining -= 1;
                let element = *element;
                return self.read_payload(element, None);
            }
            Some(Layer::Compound) => {}
            None => return Err(Error::malformed("read past end of document")),
        }

        let tag_type = self.reader.read_tag_type()?;

        if tag_type == TagType::End {
            // End tags have no name or value. The only open layer here is a
            // compound, which this closes.
            self.layers.pop();
            return Ok(Token::CompoundEnd);
        }

        let name = Some(self.reader.read_size_prefixed_string()?);
        self.read_payload(tag_type, name)
    }

    fn read_payload(&mut self, tag_type: TagType, name: Name) -> Result<Token> {
        Ok(match read_payload(&mut self.reader, tag_type, &self.deadline)? {
            Payload::Value(tag) => Token::Value(name, tag),
            Payload::List(element, len) => {
                self.layers.push(Layer::List(element, len));
                Token::List(name, element, len)
            }
            Payload::Compound => {
                self.layers.push(Layer::Compound);
                Token::Compound(name)
            }
        })
    }
}
