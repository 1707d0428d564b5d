use std::io::{ErrorKind, Read};

use camino::{Utf8Path, Utf8PathBuf};
use flate2::read::ZlibDecoder;
use tracing::*;

use crate::digest::Digest;
use crate::error::Error;
use crate::object_type::ObjectType;
use crate::Result;

/// Where loose objects live, and whether one is already there.
pub trait ObjectDatabase {
    /// The directory temporary files are staged in. Must be on the same filesystem as
    /// every path returned by [`ObjectDatabase::path_for`].
    fn root(&self) -> &Utf8Path;

    fn path_for(&self, oid: &Digest) -> Utf8PathBuf;

    fn has_object(&self, oid: &Digest) -> bool {
        self.path_for(oid).is_file()
    }
}

/// A `.git/objects` directory of zlib-compressed loose objects, fanned out into
/// subdirectories by the first byte of their id.
#[derive(Debug, Clone)]
pub struct LooseObjectDirectory {
    root: Utf8PathBuf,
}

impl ObjectDatabase for LooseObjectDirectory {
    fn root(&self) -> &Utf8Path {
        &self.root
    }

    fn path_for(&self, oid: &Digest) -> Utf8PathBuf {
        let mut path = self.root.to_owned();
        let oid = oid.to_hex();
        let (prefix, suffix) = oid.split_at(2);
        path.push(prefix);
        path.push(suffix);
        path
    }
}

impl<D: ObjectDatabase + ?Sized> ObjectDatabase for &D {
    fn root(&self) -> &Utf8Path {
        (**self).root()
    }

    fn path_for(&self, oid: &Digest) -> Utf8PathBuf {
        (**self).path_for(oid)
    }

    fn has_object(&self, oid: &Digest) -> bool {
        (**self).has_object(oid)
    }
}

impl LooseObjectDirectory {
    pub fn new(objects_dir: impl Into<Utf8PathBuf>) -> Self {
        Self {
            root: objects_dir.into(),
        }
    }

    /// Inflate a stored object and return its type and content, with the frame header
    /// checked and stripped.
    pub fn read_raw(&self, oid: &Digest) -> Result<(ObjectType, Vec<u8>)> {
        trace!(object=%oid.to_hex(), "Reading object from database");

        let compressed = match std::fs::read(self.path_for(oid)) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(Error::ObjectNotFound { id: *oid })
            }
            Err(e) => return Err(e.into()),
        };

        let mut bytes = Vec::new();
        ZlibDecoder::new(&*compressed)
            .read_to_end(&mut bytes)
            .map_err(|e| corrupt(oid, format!("inflate failed: {e}")))?;

        let (ty, content_start) = parse_header(oid, &bytes)?;
        bytes.drain(..content_start);
        Ok((ty, bytes))
    }
}

fn corrupt(oid: &Digest, reason: impl Into<String>) -> Error {
    Error::CorruptObject {
        id: *oid,
        reason: reason.into(),
    }
}

/// Parse `"{type} {len}\0"`, checking `len` against what follows. Returns the type and
/// the offset of the content.
fn parse_header(oid: &Digest, bytes: &[u8]) -> Result<(ObjectType, usize)> {
    let nul_idx = memchr::memchr(b'\0', bytes).ok_or_else(|| corrupt(oid, "no header"))?;
    let header = &bytes[..nul_idx];
    let space_idx =
        memchr::memchr(b' ', header).ok_or_else(|| corrupt(oid, "malformed header"))?;

    let ty = ObjectType::from_bytes(&header[..space_idx])
        .map_err(|e| corrupt(oid, e.to_string()))?;
    let len = std::str::from_utf8(&header[space_idx + 1..])
        .ok()
        .and_then(|len| len.parse::<usize>().ok())
        .ok_or_else(|| corrupt(oid, "malformed length"))?;

    let content_start = nul_idx + 1;
    let actual = bytes.len() - content_start;
    if actual != len {
        return Err(corrupt(
            oid,
            format!("header declares {len} bytes, found {actual}"),
        ));
    }
    Ok((ty, content_start))
}
