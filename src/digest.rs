use std::{
    fmt::{Debug, Display, LowerHex},
    ops::Deref,
    str::FromStr,
};

use hex::FromHexError;
use sha1::{Digest as _, Sha1};
use tap::Tap;

/// Length in bytes of a raw object id.
pub const DIGEST_LEN: usize = 20;

/// The name of an object: the SHA-1 of its framed canonical encoding.
///
/// Ordered byte-wise, which is also the order of the lowercase hex form.
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Digest(pub [u8; DIGEST_LEN]);

impl Digest {
    /// The null digest, 0x00000...
    pub const NULL: Self = Digest([0; DIGEST_LEN]);
}

impl Digest {
    /// Hash the input bytes and return the resulting digest.
    ///
    /// No framing is applied, see [`crate::hasher`] for object ids.
    pub fn new(bytes: &[u8]) -> Self {
        Self::from_hasher(Sha1::new().chain_update(bytes))
    }

    pub(crate) fn from_hasher(hasher: Sha1) -> Self {
        let fin = hasher.finalize();
        let mut raw = [0; DIGEST_LEN];
        raw.copy_from_slice(&fin);
        Digest(raw)
    }

    pub fn from_raw(raw: [u8; DIGEST_LEN]) -> Self {
        Digest(raw)
    }

    /// Format the digest as a hex string.
    ///
    /// Identical to `format!("{:x}", self)`.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Shorten a Digest, usually for display purposes.
    ///
    /// Note: This doesn't check for collisions.
    pub fn short(&self) -> String {
        self.to_hex().tap_mut(|x| x.truncate(7))
    }
}

impl Deref for Digest {
    type Target = [u8; DIGEST_LEN];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl LowerHex for Digest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl Display for Digest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl Debug for Digest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Digest({})", self.to_hex())
    }
}

impl FromStr for Digest {
    type Err = hex::FromHexError;

    fn from_str(s: &str) -> core::result::Result<Self, Self::Err> {
        let mut raw = [0; DIGEST_LEN];
        if s.len() != DIGEST_LEN * 2 {
            return Err(FromHexError::InvalidStringLength);
        }
        hex::decode_to_slice(s, &mut raw)?;
        Ok(Digest(raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sha1() {
        const HASH_INPUT: &[u8] = b"Hello, World!";

        // `printf 'Hello, World!' | sha1sum` => 0a0a9f2a6772942557ab5355d76af442f8f65e01
        const HASH_OUTPUT: [u8; 20] = [
            0x0a, 0x0a, 0x9f, 0x2a, 0x67, 0x72, 0x94, 0x25, 0x57, 0xab, 0x53, 0x55, 0xd7, 0x6a,
            0xf4, 0x42, 0xf8, 0xf6, 0x5e, 0x01,
        ];

        let actual = Digest::new(HASH_INPUT);
        assert_eq!(actual.0, HASH_OUTPUT);
        assert_eq!(actual.short(), "0a0a9f2");
    }

    #[test]
    fn test_from_str() {
        let valid = [
            "0a0a9f2a6772942557ab5355d76af442f8f65e01",
            "0A0A9F2A6772942557AB5355D76AF442F8F65E01",
            "0a0a9f2a6772942557ab5355D76AF442F8F65E01",
        ];

        for string in valid {
            let digest = Digest::from_str(string).unwrap();
            assert_eq!(digest.to_hex(), "0a0a9f2a6772942557ab5355d76af442f8f65e01");
        }

        let invalid = [
            "hello world",
            "0j0a9f2a6772942557ab5355d76af442f8f65e01",
            "🦀",
            "0a0a9f2a6772942557ab5355d76af442f8f65e01 ",
            " 0a0a9f2a6772942557ab5355d76af442f8f65e01",
            "0a0a9f2a6772942557ab5355d76af442f8f65e01\n",
            "0a0a9f2a6772942557ab5355d76af442f8f65e01\0",
            "0a0a9f2a6772942\x0057ab5355d76af442f8f65e01",
            "",
        ];

        for string in invalid {
            let _ = Digest::from_str(string).unwrap_err();
        }
    }

    #[test]
    fn test_ordering_is_bytewise() {
        let low = Digest::from_str("00ff000000000000000000000000000000000000").unwrap();
        let high = Digest::from_str("0100000000000000000000000000000000000000").unwrap();
        assert!(low < high);
        assert!(Digest::NULL < low);
        assert_eq!(format!("{:x}", high), high.to_string());
    }
}
