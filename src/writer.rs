//! Writing loose objects.
//!
//! Content is deflated into a temporary file in the object directory while it is hashed.
//! Once the id is known the file is renamed to its final path. Concurrent writers of the
//! same content never lock: each stages its own file, one rename wins, and the others
//! find the object already present and throw their copy away.

use std::fs::{self, File};
use std::io::{self, ErrorKind, Read};

use camino::{Utf8Path, Utf8PathBuf};
use flate2::write::ZlibEncoder;
use tracing::*;

use crate::config::CoreConfig;
use crate::database::ObjectDatabase;
use crate::digest::Digest;
use crate::error::Error;
use crate::hasher::ObjectHasher;
use crate::object_type::ObjectType;
use crate::util;
use crate::Result;

/// How an insert finished. Either way the object is in the database afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// This call wrote the object.
    Inserted(Digest),
    /// The object was already there, or another writer put it there first.
    AlreadyPresent(Digest),
}

impl Outcome {
    pub fn oid(&self) -> &Digest {
        match self {
            Outcome::Inserted(oid) | Outcome::AlreadyPresent(oid) => oid,
        }
    }

    pub fn into_oid(self) -> Digest {
        *self.oid()
    }
}

/// A file staged in the object directory. Removed on drop unless it was renamed away.
struct TempObject {
    path: Utf8PathBuf,
    renamed: bool,
}

impl TempObject {
    fn create(dir: &Utf8Path) -> Result<(Self, File)> {
        loop {
            let path = dir.join(util::tmp_file_name());
            match File::options().write(true).create_new(true).open(&path) {
                Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
                Err(e) => return Err(e.into()),
                Ok(file) => {
                    let tmp = Self {
                        path,
                        renamed: false,
                    };
                    return Ok((tmp, file));
                }
            }
        }
    }

    fn rename_to(&mut self, dst: &Utf8Path) -> io::Result<()> {
        fs::rename(&self.path, dst)?;
        self.renamed = true;
        Ok(())
    }
}

impl Drop for TempObject {
    fn drop(&mut self) {
        if self.renamed {
            return;
        }
        trace!(path=%self.path, "Discarding temporary object");
        if let Err(e) = fs::remove_file(&self.path) {
            warn!(path=%self.path, error=%e, "Failed to remove temporary object");
        }
    }
}

/// Writes objects into an [`ObjectDatabase`].
///
/// Owns a scratch buffer, so each thread should have its own writer.
pub struct LooseObjectWriter<D> {
    db: D,
    config: CoreConfig,
    hasher: ObjectHasher,
}

impl<D: ObjectDatabase> LooseObjectWriter<D> {
    pub fn new(db: D, config: CoreConfig) -> Self {
        Self {
            db,
            config,
            hasher: ObjectHasher::new(),
        }
    }

    pub fn database(&self) -> &D {
        &self.db
    }

    pub fn config(&self) -> &CoreConfig {
        &self.config
    }

    pub fn id_for(&self, ty: ObjectType, data: &[u8]) -> Digest {
        self.hasher.id_for(ty, data)
    }

    pub fn id_for_stream<R: Read + ?Sized>(
        &mut self,
        ty: ObjectType,
        len: u64,
        reader: &mut R,
    ) -> Result<Digest> {
        self.hasher.id_for_stream(ty, len, reader)
    }

    pub fn insert(&mut self, ty: ObjectType, data: &[u8]) -> Result<Digest> {
        let mut reader = data;
        self.insert_stream(ty, data.len() as u64, &mut reader)
    }

    /// Store exactly `len` bytes from `reader` as an object of type `ty`.
    ///
    /// Storing content that is already present is not an error: the id is returned and
    /// nothing is written.
    pub fn insert_stream<R: Read + ?Sized>(
        &mut self,
        ty: ObjectType,
        len: u64,
        reader: &mut R,
    ) -> Result<Digest> {
        self.insert_reporting(ty, len, reader).map(Outcome::into_oid)
    }

    /// Like [`LooseObjectWriter::insert_stream`], but reports whether this call wrote
    /// the object.
    pub fn insert_reporting<R: Read + ?Sized>(
        &mut self,
        ty: ObjectType,
        len: u64,
        reader: &mut R,
    ) -> Result<Outcome> {
        let (mut tmp, oid) = self.stage(ty, len, reader)?;

        if self.db.has_object(&oid) {
            debug!(%oid, "Object already in database");
            return Ok(Outcome::AlreadyPresent(oid));
        }

        let dst = self.db.path_for(&oid);
        if tmp.rename_to(&dst).is_ok() {
            trace!(%oid, %ty, len, "Wrote object to database");
            return Ok(Outcome::Inserted(oid));
        }

        // Fan-out directories are created lazily.
        if let Some(dir) = dst.parent() {
            match fs::create_dir(dir) {
                Ok(()) => trace!(path=%dir, "Created object directory"),
                Err(e) if e.kind() == ErrorKind::AlreadyExists => {}
                Err(e) => debug!(path=%dir, error=%e, "Failed to create object directory"),
            }
        }

        let source = match tmp.rename_to(&dst) {
            Ok(()) => {
                trace!(%oid, %ty, len, "Wrote object to database");
                return Ok(Outcome::Inserted(oid));
            }
            Err(e) => e,
        };

        if self.db.has_object(&oid) {
            debug!(%oid, "Object written concurrently by another writer");
            return Ok(Outcome::AlreadyPresent(oid));
        }

        error!(%oid, path=%dst, error=%source, "Unable to create new object");
        Err(Error::StorageWriteFailure { path: dst, source })
    }

    /// Deflate the framed content into a new temporary file, hashing as it goes.
    fn stage<R: Read + ?Sized>(
        &mut self,
        ty: ObjectType,
        len: u64,
        reader: &mut R,
    ) -> Result<(TempObject, Digest)> {
        let (tmp, file) = TempObject::create(self.db.root())?;

        let mut encoder = ZlibEncoder::new(file, self.config.compression_level());
        let oid = self.hasher.frame_into(ty, len, reader, &mut encoder)?;
        let file = encoder.finish()?;

        let mut permissions = file.metadata()?.permissions();
        permissions.set_readonly(true);
        file.set_permissions(permissions)?;

        Ok((tmp, oid))
    }
}
