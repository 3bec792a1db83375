//! Encoding of a [`RootCompound`] into uncompressed NBT. Use
//! [`to_bytes`][`crate::ser::to_bytes`] or
//! [`to_writer`][`crate::ser::to_writer`], or
//! [`encode`][`crate::encode`] to choose compression.
//!
//! The output is exactly what the decoder accepts: decoding it gives back an
//! equal tree, and re-encoding a decoded document reproduces its bytes.
//!
//! Writing only fails if the writer does, or if a string or array is too long
//! to have its length represented on the wire.
mod write_nbt;

use std::io::Write;

use byteorder::{BigEndian, WriteBytesExt};

use crate::error::Result;
use crate::walk::{Step, Walk};
use crate::{RootCompound, Tag, TagType};

use self::write_nbt::WriteNbt;

/// Write the root compound to the writer as uncompressed NBT.
pub fn to_writer<W: Write>(mut writer: W, root: &RootCompound) -> Result<()> {
    writer.write_tag(TagType::Compound)?;
    writer.write_size_prefixed_str(&root.name)?;

    for step in Walk::compound(&root.body) {
        let (key, tag) = match step {
            Step::Leaf(key, tag) | Step::Open(key, tag) => (key, tag),
            Step::Close(TagType::Compound) => {
                writer.write_tag(TagType::End)?;
                continue;
            }
            Step::Close(_) => continue,
        };

        // List elements carry neither type nor name, the list header already
        // gave the type.
        if let Some(key) = key {
            writer.write_tag(tag.tag_type())?;
            writer.write_size_prefixed_str(key)?;
        }

        match tag {
            Tag::Byte(v) => writer.write_i8(*v)?,
            Tag::Short(v) => writer.write_i16::<BigEndian>(*v)?,
            Tag::Int(v) => writer.write_i32::<BigEndian>(*v)?,
            Tag::Long(v) => writer.write_i64::<BigEndian>(*v)?,
            Tag::Float(v) => writer.write_f32::<BigEndian>(*v)?,
            Tag::Double(v) => writer.write_f64::<BigEndian>(*v)?,
            Tag::String(v) => writer.write_size_prefixed_str(v)?,
            Tag::ByteArray(v) => writer.write_byte_array(v)?,
            Tag::IntArray(v) => writer.write_int_array(v)?,
            Tag::LongArray(v) => writer.write_long_array(v)?,
            Tag::List(list) => {
                writer.write_tag(list.element_type())?;
                writer.write_len(list.len())?;
            }
            Tag::Compound(_) => {}
        }
    }

    // The walk does not close the root itself.
    writer.write_tag(TagType::End)?;
    Ok(())
}

/// Write the root compound as uncompressed NBT into a new buffer.
pub fn to_bytes(root: &RootCompound) -> Result<Vec<u8>> {
    let mut result = vec![];
    to_writer(&mut result, root)?;
    Ok(result)
}
