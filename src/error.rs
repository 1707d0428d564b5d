use std::io;

use bstr::BString;
use camino::Utf8PathBuf;

use crate::digest::Digest;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The source stream ended before the declared length was consumed.
    #[error("Input did not match supplied length. {missing} bytes are missing.")]
    UnexpectedEndOfInput { missing: u64 },

    /// A tree entry was encoded before its object id was assigned.
    #[error(
        "Object at path \"{name}\" does not have an id assigned. \
         All object ids must be assigned prior to writing a tree."
    )]
    MissingObjectId { name: BString },

    #[error("Tree entry \"{name}\" is out of order")]
    UnsortedTree { name: BString },

    #[error("Tree contains entry \"{name}\" more than once")]
    DuplicateTreeEntry { name: BString },

    /// The temporary file could not be renamed into place and the object is not present.
    #[error("Unable to create new object: {path}")]
    StorageWriteFailure {
        path: Utf8PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Unsupported character encoding: {label}")]
    UnsupportedEncoding { label: String },

    #[error("Text cannot be represented in {encoding}")]
    UnmappableCharacter { encoding: &'static str },

    #[error("Invalid compression level {level}, expected -1..=9")]
    InvalidCompressionLevel { level: i32 },

    #[error("Invalid object type: {name}")]
    InvalidObjectType { name: String },

    #[error("Object not found in database: {id:x}")]
    ObjectNotFound { id: Digest },

    #[error("Corrupt object {id:x}: {reason}")]
    CorruptObject { id: Digest, reason: String },

    #[error("Not a repository (no .git/objects): {path}")]
    NotARepository { path: Utf8PathBuf },

    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
