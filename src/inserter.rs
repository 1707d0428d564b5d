use std::fs::File;
use std::io::{self, Read, Seek};
use std::path::Path;

use crate::config::CoreConfig;
use crate::database::{LooseObjectDirectory, ObjectDatabase};
use crate::digest::Digest;
use crate::object::{Commit, Storable, Tag, Tree};
use crate::object_type::ObjectType;
use crate::writer::LooseObjectWriter;
use crate::Result;

/// Writes blobs, trees, commits and tags into an object database.
///
/// Every operation returns the id of the object, whether or not this call was the one
/// to store it. Errors from encoding or writing are passed through unchanged.
pub struct ObjectWriter<D = LooseObjectDirectory> {
    inserter: LooseObjectWriter<D>,
}

impl<D: ObjectDatabase> ObjectWriter<D> {
    pub fn new(db: D, config: CoreConfig) -> Self {
        Self {
            inserter: LooseObjectWriter::new(db, config),
        }
    }

    pub fn database(&self) -> &D {
        self.inserter.database()
    }

    pub fn insert(&mut self, ty: ObjectType, data: &[u8]) -> Result<Digest> {
        self.inserter.insert(ty, data)
    }

    pub fn insert_stream<R: Read + ?Sized>(
        &mut self,
        ty: ObjectType,
        len: u64,
        reader: &mut R,
    ) -> Result<Digest> {
        self.inserter.insert_stream(ty, len, reader)
    }

    pub fn id_for(&self, ty: ObjectType, data: &[u8]) -> Digest {
        self.inserter.id_for(ty, data)
    }

    pub fn id_for_stream<R: Read + ?Sized>(
        &mut self,
        ty: ObjectType,
        len: u64,
        reader: &mut R,
    ) -> Result<Digest> {
        self.inserter.id_for_stream(ty, len, reader)
    }

    /// Store content whose length is not known up front. It is copied to an anonymous
    /// temporary file in the object directory first, then streamed from there.
    pub fn insert_spooled<R: Read + ?Sized>(
        &mut self,
        ty: ObjectType,
        reader: &mut R,
    ) -> Result<Digest> {
        let (len, mut spool) = self.spool(reader)?;
        self.insert_stream(ty, len, &mut spool)
    }

    pub fn id_for_spooled<R: Read + ?Sized>(
        &mut self,
        ty: ObjectType,
        reader: &mut R,
    ) -> Result<Digest> {
        let (len, mut spool) = self.spool(reader)?;
        self.id_for_stream(ty, len, &mut spool)
    }

    fn spool<R: Read + ?Sized>(&self, reader: &mut R) -> Result<(u64, File)> {
        let mut spool = tempfile::tempfile_in(self.database().root())?;
        let len = io::copy(reader, &mut spool)?;
        spool.rewind()?;
        Ok((len, spool))
    }

    pub fn write_blob(&mut self, data: &[u8]) -> Result<Digest> {
        self.insert(ObjectType::Blob, data)
    }

    /// Write the contents of a file as a blob, streaming it from disk.
    pub fn write_blob_file(&mut self, path: impl AsRef<Path>) -> Result<Digest> {
        let mut file = File::open(path)?;
        let len = file.metadata()?.len();
        self.write_blob_stream(len, &mut file)
    }

    pub fn write_blob_stream<R: Read + ?Sized>(
        &mut self,
        len: u64,
        reader: &mut R,
    ) -> Result<Digest> {
        self.insert_stream(ObjectType::Blob, len, reader)
    }

    /// Encode and write any structured object.
    pub fn write_object<S: Storable + ?Sized>(&mut self, object: &S) -> Result<Digest> {
        let data = object.encode()?;
        self.insert(object.object_type(), &data)
    }

    pub fn write_tree(&mut self, tree: &Tree) -> Result<Digest> {
        self.write_object(tree)
    }

    /// Write a tree that is already in its canonical encoding. No checks are made.
    pub fn write_canonical_tree(&mut self, data: &[u8]) -> Result<Digest> {
        self.insert(ObjectType::Tree, data)
    }

    pub fn write_commit(&mut self, commit: &Commit) -> Result<Digest> {
        self.write_object(commit)
    }

    pub fn write_tag(&mut self, tag: &Tag) -> Result<Digest> {
        self.write_object(tag)
    }

    /// The id `len` bytes from `reader` would have as a blob. Nothing is written; this
    /// is for finding out whether a blob is already stored.
    pub fn compute_blob_id<R: Read + ?Sized>(
        &mut self,
        len: u64,
        reader: &mut R,
    ) -> Result<Digest> {
        self.id_for_stream(ObjectType::Blob, len, reader)
    }
}
