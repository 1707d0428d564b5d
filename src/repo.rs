use camino::{Utf8Path, Utf8PathBuf};
use tracing::*;

use crate::config::CoreConfig;
use crate::database::LooseObjectDirectory;
use crate::error::Error;
use crate::inserter::ObjectWriter;
use crate::Result;

pub struct Repo {
    dir: Utf8PathBuf,
    git_dir: Utf8PathBuf,
    database: LooseObjectDirectory,
    config: CoreConfig,
}

impl Repo {
    /// Create the object directory of a new repository at `path`.
    pub fn init(path: impl AsRef<Utf8Path>) -> Result<()> {
        let git_dir = path.as_ref().join(".git");
        trace!(path=?git_dir, "Initialising repo");
        if git_dir.exists() {
            warn!("Repo already exists, init will do nothing");
        } else {
            let objects = git_dir.join("objects");
            trace!(path=?objects, "Creating directory");
            std::fs::create_dir_all(objects)?;
        }
        Ok(())
    }

    pub fn open(path: impl Into<Utf8PathBuf>) -> Result<Self> {
        let dir = path.into();
        let git_dir = dir.join(".git");
        let objects = git_dir.join("objects");
        if !objects.is_dir() {
            return Err(Error::NotARepository { path: dir });
        }
        trace!(path=?dir, "Opened repo");

        Ok(Self {
            database: LooseObjectDirectory::new(objects),
            dir,
            git_dir,
            config: CoreConfig::default(),
        })
    }

    pub fn with_config(mut self, config: CoreConfig) -> Self {
        self.config = config;
        self
    }

    pub fn dir(&self) -> &Utf8Path {
        &self.dir
    }

    pub fn git_dir(&self) -> &Utf8Path {
        &self.git_dir
    }

    pub fn config(&self) -> &CoreConfig {
        &self.config
    }

    pub fn object_database(&self) -> &LooseObjectDirectory {
        &self.database
    }

    /// A fresh writer for this repository's objects. Writers are cheap; make one per
    /// thread rather than sharing one.
    pub fn new_writer(&self) -> ObjectWriter {
        ObjectWriter::new(self.database.clone(), self.config)
    }
}
