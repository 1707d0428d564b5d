use std::fs::Permissions;
use std::os::unix::fs::PermissionsExt;

use pretty_assertions::assert_eq;

use super::*;
use crate::hasher;
use crate::object_type::ObjectType;
use crate::snapshot;

#[test]
/// The repository root holding only "a.txt" snapshots to the same tree git would write.
/// `.git` itself is never part of the snapshot.
fn snapshot_single_file() -> Result<()> {
    let (_dir, repo) = temp_repo()?;
    let root = repo.dir();
    crate::create_test_files!(root, ["a.txt"]);

    let oid = snapshot::write_tree(&mut repo.new_writer(), root)?;
    assert_eq!(oid.to_hex(), HELLO_TREE);
    Ok(())
}

#[test]
/// A directory "a" next to a file "a.txt": the file sorts first because the directory
/// compares as "a/".
fn snapshot_nested() -> Result<()> {
    let (_dir, repo) = temp_repo()?;
    let root = repo.dir();
    crate::create_test_files!(root, ["a.txt", "a/a.txt"]);
    std::fs::create_dir_all(root.join("empty/also_empty"))?;

    let oid = snapshot::write_tree(&mut repo.new_writer(), root)?;
    assert_eq!(oid.to_hex(), "27f704b090dd7eb56abd66cef08166f7c35d9ce7");
    Ok(())
}

#[test]
fn snapshot_modes() -> Result<()> {
    let (_dir, repo) = temp_repo()?;
    let root = repo.dir();
    crate::create_test_files!(root, ["run.sh"]);
    std::fs::set_permissions(root.join("run.sh"), Permissions::from_mode(0o755))?;
    std::os::unix::fs::symlink("run.sh", root.join("link"))?;

    let oid = snapshot::write_tree(&mut repo.new_writer(), root)?;
    let (ty, content) = repo.object_database().read_raw(&oid)?;
    assert_eq!(ty, ObjectType::Tree);

    let hello = hasher::id_for(ObjectType::Blob, b"hello\n");
    let target = hasher::id_for(ObjectType::Blob, b"run.sh");
    let mut expected = b"120000 link\0".to_vec();
    expected.extend_from_slice(&*target);
    expected.extend_from_slice(b"100755 run.sh\0");
    expected.extend_from_slice(&*hello);
    assert_eq!(content, expected);

    let (_, link) = repo.object_database().read_raw(&target)?;
    assert_eq!(link, b"run.sh");
    Ok(())
}
