use std::borrow::Cow;
use std::convert::TryFrom;
use std::io::Read;

use byteorder::{BigEndian, ReadBytesExt};

use crate::deadline::Deadline;
use crate::error::{Error, Result};
use crate::TagType;

/// Upper bound on how many elements we reserve space for ahead of reading
/// them. Lengths come from the input, so trusting them would let a few bytes
/// of hostile data request gigabytes of memory.
const PREALLOC_LIMIT: usize = 4096;

/// How much of an array is read between deadline checks.
const BYTE_CHUNK: usize = 64 * 1024;
const ELEMENT_CHUNK: usize = 16 * 1024;

pub(crate) trait ReadNbt: Read {
    fn read_tag_type(&mut self) -> Result<TagType> {
        let id = self.read_u8()?;
        TagType::try_from(id)
    }

    /// Read a string in the Java form, where NUL is `C0 80` and characters
    /// outside the BMP are surrogate pairs. Plain UTF-8 spellings of those
    /// characters are rejected, so every string read here is written back
    /// byte for byte.
    fn read_size_prefixed_string(&mut self) -> Result<String> {
        let len = self.read_u16::<BigEndian>()? as usize;

        let mut buf = vec![0; len];
        self.read_exact(&mut buf[..])?;

        // A raw NUL or a four byte sequence never appears in the Java form.
        if buf.iter().any(|&b| b == 0 || b >= 0xf0) {
            return Err(Error::nonunicode_string(&buf[..]));
        }

        match cesu8::from_java_cesu8(&buf[..]) {
            Ok(Cow::Borrowed(s)) => Ok(s.to_owned()),
            Ok(Cow::Owned(s)) if cesu8::to_java_cesu8(&s)[..] == buf[..] => Ok(s),
            _ => Err(Error::nonunicode_string(&buf[..])),
        }
    }

    /// Read an i32 length prefix, rejecting negative values.
    fn read_len(&mut self) -> Result<usize> {
        let len = self.read_i32::<BigEndian>()?;
        usize::try_from(len).map_err(|_| Error::negative_len(len))
    }

    fn read_byte_array(&mut self, len: usize, deadline: &Deadline) -> Result<Vec<i8>> {
        // read_to_end only grows the buffer as data actually arrives.
        let mut buf = Vec::with_capacity(prealloc(len));
        while buf.len() < len {
            deadline.check()?;
            let chunk = (len - buf.len()).min(BYTE_CHUNK) as u64;
            let read = Read::take(&mut *self, chunk).read_to_end(&mut buf)?;
            if read == 0 {
                return Err(Error::unexpected_eof());
            }
        }

        Ok(buf.into_iter().map(|b| b as i8).collect())
    }

    fn read_int_array(&mut self, len: usize, deadline: &Deadline) -> Result<Vec<i32>> {
        let mut buf = Vec::with_capacity(prealloc(len));
        for i in 0..len {
            if i % ELEMENT_CHUNK == 0 {
                deadline.check()?;
            }
            buf.push(self.read_i32::<BigEndian>()?);
        }
        Ok(buf)
    }

    fn read_long_array(&mut self, len: usize, deadline: &Deadline) -> Result<Vec<i64>> {
        let mut buf = Vec::with_capacity(prealloc(len));
        for i in 0..len {
            if i % ELEMENT_CHUNK == 0 {
                deadline.check()?;
            }
            buf.push(self.read_i64::<BigEndian>()?);
        }
        Ok(buf)
    }
}

impl<T> ReadNbt for T where T: Read + ?Sized {}

pub(crate) fn prealloc(len: usize) -> usize {
    len.min(PREALLOC_LIMIT)
}
