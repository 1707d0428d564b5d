//! Canonical encodings of structured objects.
//!
//! Each encoding is an exact byte contract: any change to it changes the id of every
//! object written with it.

mod commit;
mod tag;
mod tree;

pub use commit::Commit;
pub use tag::Tag;
pub use tree::{Tree, TreeEntry};

use crate::object_type::ObjectType;
use crate::Result;

/// An object with a canonical encoding that can be written to the database.
pub trait Storable {
    fn object_type(&self) -> ObjectType;

    /// Encode the object content, without the `"{type} {len}\0"` frame header.
    ///
    /// Fails if the object violates a structural precondition. Performs no I/O.
    fn encode(&self) -> Result<Vec<u8>>;
}
