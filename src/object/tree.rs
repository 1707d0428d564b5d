use std::cmp::Ordering;

use bstr::{BStr, BString, ByteSlice};

use crate::digest::Digest;
use crate::error::Error;
use crate::filemode::FileMode;
use crate::object_type::ObjectType;
use crate::Result;

use super::Storable;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeEntry {
    mode: FileMode,
    name: BString,
    oid: Option<Digest>,
}

impl TreeEntry {
    pub fn new(mode: FileMode, name: impl Into<BString>, oid: Digest) -> Self {
        Self {
            mode,
            name: name.into(),
            oid: Some(oid),
        }
    }

    /// An entry whose object has not been written yet.
    pub fn unassigned(mode: FileMode, name: impl Into<BString>) -> Self {
        Self {
            mode,
            name: name.into(),
            oid: None,
        }
    }

    pub fn mode(&self) -> FileMode {
        self.mode
    }

    pub fn name(&self) -> &BStr {
        self.name.as_bstr()
    }

    pub fn oid(&self) -> Option<&Digest> {
        self.oid.as_ref()
    }

    pub fn set_oid(&mut self, oid: Digest) {
        self.oid = Some(oid);
    }

    /// The sort key git uses: the raw name, with a trailing `/` for subtrees.
    fn sort_key(&self) -> impl Iterator<Item = u8> + '_ {
        self.name
            .iter()
            .copied()
            .chain(self.mode.is_tree().then_some(b'/'))
    }
}

/// Compare two entries in git's canonical tree order.
pub fn tree_order(a: &TreeEntry, b: &TreeEntry) -> Ordering {
    a.sort_key().cmp(b.sort_key())
}

/// A single level of a directory hierarchy.
///
/// Entries are encoded in exactly the order they are held. That order must be git's
/// canonical one (see [`Tree::sort`]), otherwise encoding fails rather than produce a
/// tree other implementations would disagree about.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tree {
    entries: Vec<TreeEntry>,
}

impl Tree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries(entries: Vec<TreeEntry>) -> Self {
        Self { entries }
    }

    pub fn push(&mut self, entry: TreeEntry) {
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[TreeEntry] {
        &self.entries
    }

    pub fn entries_mut(&mut self) -> &mut [TreeEntry] {
        &mut self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Put the entries into canonical order.
    pub fn sort(&mut self) {
        self.entries.sort_by(tree_order);
    }
}

impl Storable for Tree {
    fn object_type(&self) -> ObjectType {
        ObjectType::Tree
    }

    fn encode(&self) -> Result<Vec<u8>> {
        // Every id must be assigned, whatever the order of the entries.
        let oids = self
            .entries
            .iter()
            .map(|entry| {
                entry.oid.ok_or_else(|| Error::MissingObjectId {
                    name: entry.name.clone(),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        for pair in self.entries.windows(2) {
            let (previous, entry) = (&pair[0], &pair[1]);
            if previous.name == entry.name {
                return Err(Error::DuplicateTreeEntry {
                    name: entry.name.clone(),
                });
            }
            if tree_order(previous, entry) != Ordering::Less {
                return Err(Error::UnsortedTree {
                    name: entry.name.clone(),
                });
            }
        }

        let mut data = Vec::with_capacity(self.entries.len() * 48);
        for (entry, oid) in self.entries.iter().zip(oids) {
            data.extend_from_slice(entry.mode.to_text().as_bytes());
            data.push(b' ');
            data.extend_from_slice(&entry.name);
            data.push(b'\0');
            data.extend_from_slice(&*oid);
        }

        Ok(data)
    }
}
