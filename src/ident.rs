use std::fmt::Display;

use chrono::{DateTime, FixedOffset, TimeZone};

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Timestamp(pub DateTime<FixedOffset>);

impl Timestamp {
    pub fn now() -> Self {
        Self(chrono::offset::Local::now().into())
    }

    /// Build a timestamp from seconds since the epoch and a zone offset in minutes east
    /// of UTC. Returns `None` if either is out of range.
    pub fn from_unix(seconds: i64, offset_minutes: i32) -> Option<Self> {
        let offset = FixedOffset::east_opt(offset_minutes * 60)?;
        offset.timestamp_opt(seconds, 0).single().map(Self)
    }
}

impl Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.format("%s %z"))
    }
}

/// The author, committer or tagger of an object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonIdent {
    pub name: String,
    pub email: String,
    pub when: Timestamp,
}

impl PersonIdent {
    pub fn new(name: impl Into<String>, email: impl Into<String>, when: Timestamp) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            when,
        }
    }

    /// The form written into object headers: `Name <email> 1234567890 +0100`.
    pub fn to_external_string(&self) -> String {
        self.to_string()
    }
}

impl Display for PersonIdent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} <{}> {}", self.name, self.email, self.when)
    }
}
