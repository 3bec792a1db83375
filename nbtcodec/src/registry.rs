//! Mapping between the one-byte type ids on the wire and [`Tag`] variants.

use std::convert::TryFrom;
use std::io::Read;

use byteorder::{BigEndian, ReadBytesExt};

use crate::deadline::Deadline;
use crate::error::{Error, Result};
use crate::read_nbt::ReadNbt;
use crate::Tag;

/// An NBT type id. This does not carry the value or the name of the data.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
#[cfg_attr(feature = "arbitrary1", derive(arbitrary::Arbitrary))]
#[repr(u8)]
pub enum TagType {
    /// Represents the end of a Compound object.
    End = 0,
    /// Equivalent to i8.
    Byte = 1,
    /// Equivalent to i16.
    Short = 2,
    /// Equivalent to i32.
    Int = 3,
    /// Equivalent to i64
    Long = 4,
    /// Equivalent to f32.
    Float = 5,
    /// Equivalent to f64.
    Double = 6,
    /// Represents as array of Byte (i8).
    ByteArray = 7,
    /// Represents a Unicode string.
    String = 8,
    /// Represents a list of other objects, all of the same type.
    List = 9,
    /// Represents a struct-like structure.
    Compound = 10,
    /// Represents as array of Int (i32).
    IntArray = 11,
    /// Represents as array of Long (i64).
    LongArray = 12,
}

// Written out by hand rather than derived with a crate. The set of ids is
// fixed by the format, unknown ids are an error rather than something to
// carry along.
impl TryFrom<u8> for TagType {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        use TagType::*;
        Ok(match value {
            0 => End,
            1 => Byte,
            2 => Short,
            3 => Int,
            4 => Long,
            5 => Float,
            6 => Double,
            7 => ByteArray,
            8 => String,
            9 => List,
            10 => Compound,
            11 => IntArray,
            12 => LongArray,
            13..=u8::MAX => return Err(Error::invalid_tag(value)),
        })
    }
}

impl From<TagType> for u8 {
    fn from(tag: TagType) -> Self {
        match tag {
            TagType::End => 0,
            TagType::Byte => 1,
            TagType::Short => 2,
            TagType::Int => 3,
            TagType::Long => 4,
            TagType::Float => 5,
            TagType::Double => 6,
            TagType::ByteArray => 7,
            TagType::String => 8,
            TagType::List => 9,
            TagType::Compound => 10,
            TagType::IntArray => 11,
            TagType::LongArray => 12,
        }
    }
}

impl Tag {
    /// The type id this tag is written with.
    pub fn tag_type(&self) -> TagType {
        match self {
            Tag::Byte(_) => TagType::Byte,
            Tag::Short(_) => TagType::Short,
            Tag::Int(_) => TagType::Int,
            Tag::Long(_) => TagType::Long,
            Tag::Float(_) => TagType::Float,
            Tag::Double(_) => TagType::Double,
            Tag::ByteArray(_) => TagType::ByteArray,
            Tag::String(_) => TagType::String,
            Tag::List(_) => TagType::List,
            Tag::Compound(_) => TagType::Compound,
            Tag::IntArray(_) => TagType::IntArray,
            Tag::LongArray(_) => TagType::LongArray,
        }
    }
}

/// What follows a type id on the wire. Leaves are read whole; containers only
/// have their header read, the caller is responsible for their contents.
#[derive(Debug, PartialEq)]
pub(crate) enum Payload {
    Value(Tag),
    List(TagType, usize),
    Compound,
}

/// Read the payload for a tag of the given type.
/// Arrays poll `deadline` as they go, since one can be most of the document.
pub(crate) fn read_payload<R: Read + ?Sized>(
    reader: &mut R,
    tag_type: TagType,
    deadline: &Deadline,
) -> Result<Payload> {
    Ok(match tag_type {
        TagType::End => return Err(Error::malformed("invalid nbt: end tag has no payload")),
        TagType::Byte => Payload::Value(Tag::Byte(reader.read_i8()?)),
        TagType::Short => Payload::Value(Tag::Short(reader.read_i16::<BigEndian>()?)),
        TagType::Int => Payload::Value(Tag::Int(reader.read_i32::<BigEndian>()?)),
        TagType::Long => Payload::Value(Tag::Long(reader.read_i64::<BigEndian>()?)),
        TagType::Float => Payload::Value(Tag::Float(reader.read_f32::<BigEndian>()?)),
        TagType::Double => Payload::Value(Tag::Double(reader.read_f64::<BigEndian>()?)),
        TagType::String => Payload::Value(Tag::String(reader.read_size_prefixed_string()?)),
        TagType::ByteArray => {
            let len = reader.read_len()?;
            Payload::Value(Tag::ByteArray(reader.read_byte_array(len, deadline)?))
        }
        TagType::IntArray => {
            let len = reader.read_len()?;
            Payload::Value(Tag::IntArray(reader.read_int_array(len, deadline)?))
        }
        TagType::LongArray => {
            let len = reader.read_len()?;
            Payload::Value(Tag::LongArray(reader.read_long_array(len, deadline)?))
        }
        TagType::List => {
            let element = reader.read_tag_type()?;
            let len = reader.read_len()?;
            if element == TagType::End && len > 0 {
                return Err(Error::malformed(
                    "invalid nbt: list of end tags must be empty",
                ));
            }
            Payload::List(element, len)
        }
        TagType::Compound => Payload::Compound,
    })
}
