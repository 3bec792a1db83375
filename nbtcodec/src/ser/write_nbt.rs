use std::convert::TryInto;
use std::io::Write;

use byteorder::{BigEndian, WriteBytesExt};

use crate::error::{Error, Result};
use crate::TagType;

pub(crate) trait WriteNbt: Write {
    fn write_tag(&mut self, tag: TagType) -> Result<()> {
        self.write_u8(tag.into())?;
        Ok(())
    }

    fn write_size_prefixed_str(&mut self, key: &str) -> Result<()> {
        let key = cesu8::to_java_cesu8(key);
        let len: u16 = key.len().try_into().map_err(|_| {
            Error::malformed(format!("string too long: {} bytes", key.len()))
        })?;
        self.write_u16::<BigEndian>(len)?;
        self.write_all(&key)?;
        Ok(())
    }

    fn write_len(&mut self, len: usize) -> Result<()> {
        self.write_i32::<BigEndian>(
            len.try_into()
                .map_err(|_| Error::malformed(format!("len too large: {}", len)))?,
        )?;

        Ok(())
    }

    fn write_byte_array(&mut self, data: &[i8]) -> Result<()> {
        self.write_len(data.len())?;
        let bytes: Vec<u8> = data.iter().map(|b| *b as u8).collect();
        self.write_all(&bytes)?;
        Ok(())
    }

    fn write_int_array(&mut self, data: &[i32]) -> Result<()> {
        self.write_len(data.len())?;
        for i in data {
            self.write_i32::<BigEndian>(*i)?;
        }
        Ok(())
    }

    fn write_long_array(&mut self, data: &[i64]) -> Result<()> {
        self.write_len(data.len())?;
        for i in data {
            self.write_i64::<BigEndian>(*i)?;
        }
        Ok(())
    }
}

impl<T> WriteNbt for T where T: Write + ?Sized {}
