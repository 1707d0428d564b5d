use std::fs;
use std::os::unix::prelude::*;
use std::path::Path;

use tracing::*;

use crate::database::ObjectDatabase;
use crate::digest::Digest;
use crate::filemode::FileMode;
use crate::inserter::ObjectWriter;
use crate::object::{Tree, TreeEntry};
use crate::Result;

/// Write the directory at `dir` into the database, returning the id of its tree.
///
/// Files become blobs, symlinks become blobs holding their target, subdirectories become
/// subtrees. `.git` is skipped, as are empty subdirectories, which git cannot represent.
pub fn write_tree<D: ObjectDatabase>(
    writer: &mut ObjectWriter<D>,
    dir: impl AsRef<Path>,
) -> Result<Digest> {
    let tree = build_tree(writer, dir.as_ref())?;
    writer.write_tree(&tree)
}

fn build_tree<D: ObjectDatabase>(writer: &mut ObjectWriter<D>, dir: &Path) -> Result<Tree> {
    let mut tree = Tree::new();

    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let name = entry.file_name();
        if name == ".git" {
            continue;
        }

        let path = entry.path();
        let metadata = fs::symlink_metadata(&path)?;
        let file_type = metadata.file_type();

        let oid = if file_type.is_dir() {
            let subtree = build_tree(writer, &path)?;
            if subtree.is_empty() {
                trace!(?path, "Skipping empty directory");
                continue;
            }
            writer.write_tree(&subtree)?
        } else if file_type.is_symlink() {
            let target = fs::read_link(&path)?;
            writer.write_blob(target.as_os_str().as_bytes())?
        } else if file_type.is_file() {
            writer.write_blob_file(&path)?
        } else {
            debug!(?path, "Skipping special file");
            continue;
        };

        trace!(?path, %oid, "Adding entry to tree");
        tree.push(TreeEntry::new(
            FileMode::from_metadata(&metadata),
            name.as_bytes(),
            oid,
        ));
    }

    tree.sort();
    Ok(tree)
}
