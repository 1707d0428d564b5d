//! Object naming.
//!
//! An object's id is the SHA-1 of its frame: `"{type} {len}\0"` followed by the content.
//! The same frame is hashed whether the content arrives as a slice or as a stream, so
//! both paths always agree.

use std::io::{self, Read, Write};

use sha1::{Digest as _, Sha1};

use crate::digest::Digest;
use crate::error::{Error, Result};
use crate::object_type::ObjectType;

/// Size of the scratch buffer content is streamed through.
pub const BUFFER_SIZE: usize = 8192;

/// Build the frame header for an object, e.g. `b"blob 6\0"`.
pub fn header(ty: ObjectType, len: u64) -> Vec<u8> {
    let mut header = Vec::with_capacity(ty.name().len() + 22);
    header.extend_from_slice(ty.name().as_bytes());
    header.push(b' ');
    header.extend_from_slice(len.to_string().as_bytes());
    header.push(b'\0');
    header
}

/// Compute the id of in-memory content.
pub fn id_for(ty: ObjectType, data: &[u8]) -> Digest {
    let mut hasher = Sha1::new();
    hasher.update(header(ty, data.len() as u64));
    hasher.update(data);
    Digest::from_hasher(hasher)
}

/// Computes object ids for streamed content through a reusable scratch buffer.
///
/// Not meant to be shared between threads; give each thread its own.
pub struct ObjectHasher {
    buf: Box<[u8]>,
}

impl Default for ObjectHasher {
    fn default() -> Self {
        Self::new()
    }
}

impl ObjectHasher {
    pub fn new() -> Self {
        Self {
            buf: vec![0; BUFFER_SIZE].into_boxed_slice(),
        }
    }

    /// Compute the id of in-memory content. See [`id_for`].
    pub fn id_for(&self, ty: ObjectType, data: &[u8]) -> Digest {
        id_for(ty, data)
    }

    /// Compute the id of exactly `len` bytes read from `reader`.
    ///
    /// Never reads past `len`. Fails with [`Error::UnexpectedEndOfInput`] if the reader
    /// runs dry first.
    pub fn id_for_stream<R: Read + ?Sized>(
        &mut self,
        ty: ObjectType,
        len: u64,
        reader: &mut R,
    ) -> Result<Digest> {
        self.frame_into(ty, len, reader, &mut io::sink())
    }

    /// Hash the frame of `len` bytes from `reader`, copying every framed byte (header
    /// included) into `sink` as it goes.
    pub fn frame_into<R, W>(
        &mut self,
        ty: ObjectType,
        len: u64,
        reader: &mut R,
        sink: &mut W,
    ) -> Result<Digest>
    where
        R: Read + ?Sized,
        W: Write + ?Sized,
    {
        let mut hasher = Sha1::new();

        let header = header(ty, len);
        hasher.update(&header);
        sink.write_all(&header)?;

        copy_exact(reader, len, &mut self.buf, |chunk| {
            hasher.update(chunk);
            sink.write_all(chunk)
        })?;

        Ok(Digest::from_hasher(hasher))
    }
}

/// Feed exactly `len` bytes from `reader` to `f`, at most `buf.len()` at a time.
fn copy_exact<R, F>(reader: &mut R, mut len: u64, buf: &mut [u8], mut f: F) -> Result<()>
where
    R: Read + ?Sized,
    F: FnMut(&[u8]) -> io::Result<()>,
{
    while len > 0 {
        let want = len.min(buf.len() as u64) as usize;
        let n = match reader.read(&mut buf[..want]) {
            Ok(0) => return Err(Error::UnexpectedEndOfInput { missing: len }),
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        };
        f(&buf[..n])?;
        len -= n as u64;
    }
    Ok(())
}
