mod end_to_end;
mod repo;
mod snapshot;

use std::io::Read;

use camino::Utf8Path;
use flate2::read::ZlibDecoder;
use tempdir::TempDir;

use crate::database::ObjectDatabase;
use crate::repo::Repo;
use crate::Result;

pub const COMMIT_NAME: &str = "A U Thor";
pub const COMMIT_EMAIL: &str = "author@example.com";

pub const HELLO_BLOB: &str = "ce013625030ba8dba906f756967f9e9ca394464a";
pub const HELLO_TREE: &str = "2e81171448eb9f2ee3821e3d447aa6b2fe3ddba1";

/// An initialised repository in a fresh temporary directory.
pub fn temp_repo() -> Result<(TempDir, Repo)> {
    let dir = TempDir::new("")?;
    let root = Utf8Path::from_path(dir.path()).unwrap().to_owned();
    Repo::init(&root)?;
    let repo = Repo::open(root)?;
    Ok((dir, repo))
}

/// Decompress a stored object file back into its frame.
pub fn inflate(path: &Utf8Path) -> Result<Vec<u8>> {
    let compressed = std::fs::read(path)?;
    let mut frame = Vec::new();
    ZlibDecoder::new(&*compressed).read_to_end(&mut frame)?;
    Ok(frame)
}

/// Names of leftover temporary files in the object directory.
pub fn temp_files(repo: &Repo) -> Result<Vec<String>> {
    let mut names = Vec::new();
    for entry in std::fs::read_dir(repo.object_database().root())? {
        let name = entry?.file_name().to_string_lossy().into_owned();
        if name.starts_with("tmp_obj_") {
            names.push(name);
        }
    }
    Ok(names)
}

#[macro_export]
macro_rules! create_test_files {
    ($root:ident, [$($path:expr),*]) => {{
        use std::io::Write;
        $({
            let path = $root.join($path);
            std::fs::create_dir_all(path.parent().unwrap())?;
            write!(
                std::fs::File::create($root.join($path))?,
                "hello\n"
            )?;
        })*
    }};
}
