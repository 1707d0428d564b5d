use camino::Utf8Path;
use tempdir::TempDir;

use crate::config::CoreConfig;
use crate::database::ObjectDatabase;
use crate::error::Error;
use crate::repo::Repo;
use crate::Result;

#[test]
fn rit_init() -> Result<()> {
    let dir = TempDir::new("")?;
    let root = Utf8Path::from_path(dir.path()).unwrap();
    Repo::init(root)?;

    let git_dir = root.join(".git");
    let obj_dir = git_dir.join("objects");

    assert!(git_dir.is_dir());
    assert!(obj_dir.is_dir());

    let repo = Repo::open(root)?;
    assert_eq!(repo.git_dir(), git_dir.as_path());

    // A second init leaves the existing repository alone.
    std::fs::write(obj_dir.join("marker"), b"")?;
    Repo::init(root)?;
    assert!(obj_dir.join("marker").exists());
    Ok(())
}

#[test]
fn open_requires_object_dir() -> Result<()> {
    let dir = TempDir::new("")?;
    let root = Utf8Path::from_path(dir.path()).unwrap();
    assert!(matches!(
        Repo::open(root),
        Err(Error::NotARepository { .. })
    ));
    Ok(())
}

#[test]
/// Writers honour the repository's compression setting; every level reads back the same.
fn writers_use_repo_config() -> Result<()> {
    let dir = TempDir::new("")?;
    let root = Utf8Path::from_path(dir.path()).unwrap();
    Repo::init(root)?;

    let data = b"hello\n".repeat(1000);
    let mut sizes = Vec::new();
    for level in [0, 9] {
        let repo = Repo::open(root)?.with_config(CoreConfig::new(level)?);
        assert_eq!(repo.config().compression(), level);

        let oid = repo.new_writer().write_blob(&data)?;
        let path = repo.object_database().path_for(&oid);
        sizes.push(std::fs::metadata(&path)?.len());

        let (_, content) = repo.object_database().read_raw(&oid)?;
        assert_eq!(content, data);

        // Make room for the next level's copy.
        std::fs::remove_file(&path)?;
    }
    assert!(sizes[0] > sizes[1]);
    Ok(())
}
