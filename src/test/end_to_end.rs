use std::str::FromStr;

use pretty_assertions::assert_eq;

use super::*;
use crate::database::ObjectDatabase;
use crate::digest::Digest;
use crate::error::Error;
use crate::filemode::FileMode;
use crate::hasher;
use crate::ident::{PersonIdent, Timestamp};
use crate::object::{Commit, Storable, Tag, Tree, TreeEntry};
use crate::object_type::ObjectType;

fn thor() -> PersonIdent {
    PersonIdent::new(
        COMMIT_NAME,
        COMMIT_EMAIL,
        Timestamp::from_unix(1234567890, 60).unwrap(),
    )
}

#[test]
/// Insert "hello\n" as a blob. The id is the hash of "blob 6\0hello\n", and the stored file
/// inflates to exactly that frame.
fn hello_blob() -> Result<()> {
    let (_dir, repo) = temp_repo()?;
    let mut writer = repo.new_writer();

    let oid = writer.write_blob(b"hello\n")?;
    assert_eq!(oid.to_hex(), HELLO_BLOB);
    assert_eq!(oid, Digest::new(b"blob 6\0hello\n"));

    let path = repo.object_database().path_for(&oid);
    assert_eq!(path.parent().unwrap().file_name(), Some("ce"));
    assert_eq!(inflate(&path)?, b"blob 6\0hello\n");

    let (ty, content) = repo.object_database().read_raw(&oid)?;
    assert_eq!(ty, ObjectType::Blob);
    assert_eq!(content, b"hello\n");
    Ok(())
}

#[test]
/// A tree holding the blob from `hello_blob` encodes as "100644 a.txt\0" plus the raw id,
/// and gets an id of its own.
fn single_entry_tree() -> Result<()> {
    let (_dir, repo) = temp_repo()?;
    let mut writer = repo.new_writer();

    let blob = writer.write_blob(b"hello\n")?;
    let tree = Tree::from_entries(vec![TreeEntry::new(FileMode::REGULAR, "a.txt", blob)]);

    let mut expected = b"100644 a.txt\0".to_vec();
    expected.extend_from_slice(&*blob);
    assert_eq!(tree.encode()?, expected);

    let oid = writer.write_tree(&tree)?;
    assert_eq!(oid.to_hex(), HELLO_TREE);
    assert_ne!(oid, blob);
    assert_eq!(writer.write_tree(&tree)?, oid);

    let (ty, content) = repo.object_database().read_raw(&oid)?;
    assert_eq!(ty, ObjectType::Tree);
    assert_eq!(content, expected);
    Ok(())
}

#[test]
/// Root commit, then a child: header lines come in a fixed order and the root commit has
/// no parent line.
fn commit_chain() -> Result<()> {
    let (_dir, repo) = temp_repo()?;
    let mut writer = repo.new_writer();

    let blob = writer.write_blob(b"hello\n")?;
    let tree = writer.write_tree(&Tree::from_entries(vec![TreeEntry::new(
        FileMode::REGULAR,
        "a.txt",
        blob,
    )]))?;

    let root = Commit::new(tree, vec![], thor(), thor(), "init\n");
    let root_id = writer.write_commit(&root)?;
    assert_eq!(root_id.to_hex(), "38080cf42b05ec31b4411ce634f6253afc51ad30");

    let (_, content) = repo.object_database().read_raw(&root_id)?;
    let text = String::from_utf8(content).unwrap();
    assert!(!text.contains("parent"));
    assert!(text.ends_with("\n\ninit\n"));

    let child = Commit::new(tree, vec![root_id], thor(), thor(), "second\n");
    let child_id = writer.write_commit(&child)?;
    assert_eq!(child_id.to_hex(), "f8b74fd5e7d8c5b7e9f4e2ff4ab4fa7816f9f19a");

    let (ty, content) = repo.object_database().read_raw(&child_id)?;
    assert_eq!(ty, ObjectType::Commit);
    let keywords: Vec<_> = String::from_utf8(content)
        .unwrap()
        .lines()
        .take(5)
        .map(|line| line.split(' ').next().unwrap_or_default().to_owned())
        .collect();
    assert_eq!(keywords, ["tree", "parent", "author", "committer", ""]);
    Ok(())
}

#[test]
fn annotated_tag() -> Result<()> {
    let (_dir, repo) = temp_repo()?;
    let mut writer = repo.new_writer();
    let target = Digest::from_str("38080cf42b05ec31b4411ce634f6253afc51ad30").unwrap();

    let tag = Tag {
        object: target,
        object_type: ObjectType::Commit,
        name: "v1.0".to_owned(),
        tagger: thor(),
        message: "release\n".to_owned(),
    };
    let oid = writer.write_tag(&tag)?;
    assert_eq!(oid.to_hex(), "c8627fdd2f06daca9720e424f726d9dea459f656");

    let (ty, _) = repo.object_database().read_raw(&oid)?;
    assert_eq!(ty, ObjectType::Tag);
    Ok(())
}

#[test]
/// The id returned by an insert is the hash of what ends up on disk, for every type.
fn stored_frame_hashes_to_id() -> Result<()> {
    let (_dir, repo) = temp_repo()?;
    let mut writer = repo.new_writer();

    let contents: [(ObjectType, &[u8]); 4] = [
        (ObjectType::Blob, b""),
        (ObjectType::Blob, b"\0binary\xff\xfe"),
        (ObjectType::Tree, b""),
        (ObjectType::Commit, b"not really a commit\n"),
    ];

    for (ty, data) in contents {
        let oid = writer.insert(ty, data)?;
        assert_eq!(oid, writer.id_for(ty, data));
        assert_eq!(oid, hasher::id_for(ty, data));

        let frame = inflate(&repo.object_database().path_for(&oid))?;
        assert_eq!(Digest::new(&frame), oid);
    }
    Ok(())
}

#[test]
fn truncated_stream_stores_nothing() -> Result<()> {
    let (_dir, repo) = temp_repo()?;
    let mut writer = repo.new_writer();

    let err = writer
        .write_blob_stream(7, &mut &b"hello\n"[..])
        .unwrap_err();
    assert!(matches!(err, Error::UnexpectedEndOfInput { missing: 1 }));

    // Neither the full nor the truncated content may appear under any id.
    for oid in [
        hasher::id_for(ObjectType::Blob, b"hello\n"),
        hasher::id_for(ObjectType::Blob, b"hello\n\0"),
    ] {
        assert!(!repo.object_database().has_object(&oid));
    }
    let leftovers = std::fs::read_dir(repo.object_database().root())?.count();
    assert_eq!(leftovers, 0);
    Ok(())
}

#[test]
/// An unassigned entry is caught before anything touches the disk.
fn tree_without_ids_is_rejected() -> Result<()> {
    let (_dir, repo) = temp_repo()?;
    let mut writer = repo.new_writer();

    let tree = Tree::from_entries(vec![
        TreeEntry::unassigned(FileMode::DIRECTORY, "src"),
        TreeEntry::unassigned(FileMode::REGULAR, "src.rs"),
    ]);
    match writer.write_tree(&tree) {
        Err(Error::MissingObjectId { name }) => assert_eq!(name, "src"),
        other => panic!("unexpected result: {other:?}"),
    }
    assert_eq!(std::fs::read_dir(repo.object_database().root())?.count(), 0);
    Ok(())
}

#[test]
/// Entries get ids after the fact, as happens when subtrees are written bottom-up.
fn tree_ids_assigned_later() -> Result<()> {
    let (_dir, repo) = temp_repo()?;
    let mut writer = repo.new_writer();

    let mut tree = Tree::from_entries(vec![TreeEntry::unassigned(FileMode::REGULAR, "a.txt")]);
    let blob = writer.write_blob(b"hello\n")?;
    tree.entries_mut()[0].set_oid(blob);

    assert_eq!(writer.write_tree(&tree)?.to_hex(), HELLO_TREE);
    Ok(())
}
