use flate2::Compression;

use crate::error::Error;
use crate::Result;

/// Settings the object writer honours, already resolved by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoreConfig {
    compression: i32,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            compression: Self::DEFAULT_COMPRESSION,
        }
    }
}

impl CoreConfig {
    /// `core.compression` value meaning "whatever zlib defaults to".
    pub const DEFAULT_COMPRESSION: i32 = -1;

    /// Accepts the same range as git's `core.compression`: -1 for the zlib default, or an
    /// explicit level from 0 (store) to 9 (best).
    pub fn new(compression: i32) -> Result<Self> {
        if !(-1..=9).contains(&compression) {
            return Err(Error::InvalidCompressionLevel { level: compression });
        }
        Ok(Self { compression })
    }

    pub fn compression(&self) -> i32 {
        self.compression
    }

    pub fn compression_level(&self) -> Compression {
        match u32::try_from(self.compression) {
            Ok(level) => Compression::new(level),
            Err(_) => Compression::default(),
        }
    }
}
