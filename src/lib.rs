#[cfg(test)]
mod test;

pub mod config;
pub mod database;
pub mod digest;
pub mod error;
pub mod filemode;
pub mod hasher;
pub mod ident;
pub mod inserter;
pub mod object;
pub mod object_type;
pub mod repo;
pub mod snapshot;
mod util;
pub mod writer;

pub use crate::config::CoreConfig;
pub use crate::database::{LooseObjectDirectory, ObjectDatabase};
pub use crate::digest::Digest;
pub use crate::error::{Error, Result};
pub use crate::filemode::FileMode;
pub use crate::ident::{PersonIdent, Timestamp};
pub use crate::inserter::ObjectWriter;
pub use crate::object::{Commit, Storable, Tag, Tree, TreeEntry};
pub use crate::object_type::ObjectType;
pub use crate::repo::Repo;
pub use crate::writer::{LooseObjectWriter, Outcome};
