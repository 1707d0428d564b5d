use crate::digest::Digest;
use crate::ident::PersonIdent;
use crate::object_type::ObjectType;
use crate::Result;

use super::Storable;

/// An annotated tag. Always encoded as UTF-8.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub object: Digest,
    pub object_type: ObjectType,
    pub name: String,
    pub tagger: PersonIdent,
    pub message: String,
}

impl Storable for Tag {
    fn object_type(&self) -> ObjectType {
        ObjectType::Tag
    }

    fn encode(&self) -> Result<Vec<u8>> {
        let data = format!(
            "\
            object {}\n\
            type {}\n\
            tag {}\n\
            tagger {}\n\
            \n\
            {}",
            self.object.to_hex(),
            self.object_type,
            self.name,
            self.tagger.to_external_string(),
            self.message,
        );
        Ok(data.into_bytes())
    }
}
