use std::fs::Metadata;
use std::os::unix::prelude::*;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(transparent)]
pub struct FileMode(pub u32);

impl std::fmt::Octal for FileMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:o}", self.0)
    }
}

impl FileMode {
    pub const DIRECTORY: FileMode = FileMode(0o040000);
    pub const EXECUTABLE: FileMode = FileMode(0o100755);
    pub const REGULAR: FileMode = FileMode(0o100644);
    pub const SYMLINK: FileMode = FileMode(0o120000);
    pub const GITLINK: FileMode = FileMode(0o160000);

    /// Normalise a file's permissions to one of the modes git records.
    ///
    /// Anything executable by its owner becomes [`FileMode::EXECUTABLE`], every other
    /// regular file [`FileMode::REGULAR`].
    pub fn from_metadata(metadata: &Metadata) -> Self {
        let file_type = metadata.file_type();
        if file_type.is_dir() {
            FileMode::DIRECTORY
        } else if file_type.is_symlink() {
            FileMode::SYMLINK
        } else if Self(metadata.mode()).is_executable() {
            FileMode::EXECUTABLE
        } else {
            FileMode::REGULAR
        }
    }

    pub fn is_executable(self) -> bool {
        self.0 & libc::S_IXUSR as u32 != 0
    }

    pub fn is_tree(self) -> bool {
        self.0 & 0o170000 == Self::DIRECTORY.0
    }

    /// The canonical text form used in tree objects: octal without leading zeros.
    pub fn to_text(self) -> String {
        format!("{:o}", self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_form() {
        assert_eq!(FileMode::REGULAR.to_text(), "100644");
        assert_eq!(FileMode::EXECUTABLE.to_text(), "100755");
        // Trees are written without the leading zero.
        assert_eq!(FileMode::DIRECTORY.to_text(), "40000");
        assert_eq!(FileMode::SYMLINK.to_text(), "120000");
    }

    #[test]
    fn test_kinds() {
        assert!(FileMode::DIRECTORY.is_tree());
        assert!(!FileMode::REGULAR.is_tree());
        assert!(FileMode::EXECUTABLE.is_executable());
        assert!(!FileMode::REGULAR.is_executable());
    }
}
