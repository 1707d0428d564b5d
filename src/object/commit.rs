use std::borrow::Cow;

use encoding_rs::{Encoding, GB18030, UTF_8};

use crate::digest::Digest;
use crate::error::Error;
use crate::ident::PersonIdent;
use crate::object_type::ObjectType;
use crate::Result;

use super::Storable;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commit {
    pub tree_id: Digest,
    pub parents: Vec<Digest>,
    pub author: PersonIdent,
    pub committer: PersonIdent,
    /// Character set of the header text and message. `None` means UTF-8.
    pub encoding: Option<String>,
    pub message: String,
}

impl Commit {
    pub fn new(
        tree_id: Digest,
        parents: Vec<Digest>,
        author: PersonIdent,
        committer: PersonIdent,
        message: impl Into<String>,
    ) -> Self {
        Self {
            tree_id,
            parents,
            author,
            committer,
            encoding: None,
            message: message.into(),
        }
    }

    pub fn with_encoding(mut self, label: impl Into<String>) -> Self {
        self.encoding = Some(label.into());
        self
    }

    fn charset(&self) -> Result<Charset> {
        match &self.encoding {
            None => Ok(Charset::Other(UTF_8)),
            Some(label) => Charset::for_label(label).ok_or_else(|| Error::UnsupportedEncoding {
                label: label.clone(),
            }),
        }
    }
}

const LATIN1_LABELS: &[&str] = &[
    "iso-8859-1",
    "iso_8859-1",
    "iso8859-1",
    "iso8859_1",
    "8859_1",
    "latin1",
    "l1",
    "iso-ir-100",
    "ibm819",
    "cp819",
    "csisolatin1",
];

const ASCII_LABELS: &[&str] = &[
    "us-ascii",
    "ascii",
    "ansi_x3.4-1968",
    "iso646-us",
    "iso-ir-6",
    "us",
    "ibm367",
    "cp367",
    "csascii",
];

/// The character set commit text is written in. The `encoding` header repeats the
/// caller's label, so the label has to name this exact charset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Charset {
    Ascii,
    Latin1,
    Other(&'static Encoding),
}

impl Charset {
    fn for_label(label: &str) -> Option<Self> {
        if label.is_empty() || !label.bytes().all(|b| b.is_ascii_graphic()) {
            return None;
        }
        let listed = |labels: &[&str]| labels.iter().any(|l| l.eq_ignore_ascii_case(label));
        if listed(LATIN1_LABELS) {
            return Some(Self::Latin1);
        }
        if listed(ASCII_LABELS) {
            return Some(Self::Ascii);
        }

        let encoding = Encoding::for_label_no_replacement(label.as_bytes())?;
        if encoding == UTF_8 {
            return Some(Self::Other(UTF_8));
        }
        // encoding_rs maps some labels onto a superset (latin5 to windows-1254, Shift_JIS
        // to windows-31j). Only single-byte charsets named by their own name, and GB18030,
        // are written exactly as labelled.
        let exact = encoding.name().eq_ignore_ascii_case(label)
            && encoding.output_encoding() == encoding
            && (encoding.is_single_byte() || encoding == GB18030);
        exact.then_some(Self::Other(encoding))
    }

    fn name(self) -> &'static str {
        match self {
            Self::Ascii => "US-ASCII",
            Self::Latin1 => "ISO-8859-1",
            Self::Other(encoding) => encoding.name(),
        }
    }

    fn is_utf8(self) -> bool {
        self == Self::Other(UTF_8)
    }

    fn encode(self, text: &str) -> Result<Cow<'_, [u8]>> {
        let max = match self {
            Self::Ascii => 0x7f,
            Self::Latin1 => 0xff,
            Self::Other(encoding) => {
                let (bytes, _, unmappable) = encoding.encode(text);
                if unmappable {
                    return Err(Error::UnmappableCharacter {
                        encoding: self.name(),
                    });
                }
                return Ok(bytes);
            }
        };
        if text.is_ascii() {
            return Ok(Cow::Borrowed(text.as_bytes()));
        }
        text.chars()
            .map(|c| {
                u8::try_from(c)
                    .ok()
                    .filter(|b| *b <= max)
                    .ok_or(Error::UnmappableCharacter {
                        encoding: self.name(),
                    })
            })
            .collect::<Result<Vec<_>>>()
            .map(Cow::Owned)
    }
}

impl Storable for Commit {
    fn object_type(&self) -> ObjectType {
        ObjectType::Commit
    }

    fn encode(&self) -> Result<Vec<u8>> {
        let charset = self.charset()?;
        let mut data = Vec::with_capacity(256 + self.message.len());

        data.extend_from_slice(b"tree ");
        data.extend_from_slice(self.tree_id.to_hex().as_bytes());
        data.push(b'\n');

        for parent in &self.parents {
            data.extend_from_slice(b"parent ");
            data.extend_from_slice(parent.to_hex().as_bytes());
            data.push(b'\n');
        }

        data.extend_from_slice(b"author ");
        data.extend_from_slice(&charset.encode(&self.author.to_external_string())?);
        data.push(b'\n');

        data.extend_from_slice(b"committer ");
        data.extend_from_slice(&charset.encode(&self.committer.to_external_string())?);
        data.push(b'\n');

        if !charset.is_utf8() {
            if let Some(label) = &self.encoding {
                data.extend_from_slice(b"encoding ");
                data.extend_from_slice(label.as_bytes());
                data.push(b'\n');
            }
        }

        data.push(b'\n');
        data.extend_from_slice(&charset.encode(&self.message)?);

        Ok(data)
    }
}
