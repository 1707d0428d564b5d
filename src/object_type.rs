use std::{fmt::Display, str::FromStr};

use crate::error::Error;

/// The kinds of object that can be stored loose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectType {
    Commit,
    Tree,
    Blob,
    Tag,
}

impl ObjectType {
    /// Pack type code for an offset delta. Only meaningful inside packfiles.
    pub const OFS_DELTA_CODE: u8 = 6;
    /// Pack type code for a reference delta. Only meaningful inside packfiles.
    pub const REF_DELTA_CODE: u8 = 7;

    /// The name used in the object header, e.g. `blob`.
    pub fn name(self) -> &'static str {
        match self {
            ObjectType::Commit => "commit",
            ObjectType::Tree => "tree",
            ObjectType::Blob => "blob",
            ObjectType::Tag => "tag",
        }
    }

    pub fn code(self) -> u8 {
        match self {
            ObjectType::Commit => 1,
            ObjectType::Tree => 2,
            ObjectType::Blob => 3,
            ObjectType::Tag => 4,
        }
    }

    /// Map a pack type code back to a type. Delta codes are refused: a delta is a
    /// representation of another object, not an object in its own right.
    pub fn from_code(code: u8) -> Result<Self, Error> {
        match code {
            1 => Ok(ObjectType::Commit),
            2 => Ok(ObjectType::Tree),
            3 => Ok(ObjectType::Blob),
            4 => Ok(ObjectType::Tag),
            Self::OFS_DELTA_CODE => Err(Error::InvalidObjectType {
                name: "ofs-delta".to_owned(),
            }),
            Self::REF_DELTA_CODE => Err(Error::InvalidObjectType {
                name: "ref-delta".to_owned(),
            }),
            other => Err(Error::InvalidObjectType {
                name: format!("type code {other}"),
            }),
        }
    }

    pub fn from_bytes(name: &[u8]) -> Result<Self, Error> {
        match name {
            b"commit" => Ok(ObjectType::Commit),
            b"tree" => Ok(ObjectType::Tree),
            b"blob" => Ok(ObjectType::Blob),
            b"tag" => Ok(ObjectType::Tag),
            _ => Err(Error::InvalidObjectType {
                name: String::from_utf8_lossy(name).into_owned(),
            }),
        }
    }
}

impl Display for ObjectType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ObjectType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_bytes(s.as_bytes())
    }
}
