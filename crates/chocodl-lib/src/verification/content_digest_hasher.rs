use digest::Digest;
use sha2::Sha512;
use std::fmt::{Display, Formatter};
use std::path::Path;
use subtle::ConstantTimeEq;
use thiserror::Error;
use tokio::io::AsyncReadExt;

pub const SHA512_DIGEST_LEN: usize = 64;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DigestParseError {
    #[error(
        "SHA512 digest must be {expected} hex characters, got {0}",
        expected = SHA512_DIGEST_LEN * 2
    )]
    InvalidLength(usize),
    #[error("SHA512 digest is not valid hex: {0}")]
    InvalidHex(#[from] hex::FromHexError),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VerificationError {
    #[error("Verification failed: expected {expected}, got {actual}")]
    VerificationFailed {
        expected: Sha512Digest,
        actual: Sha512Digest,
    },
}

/// A SHA-512 content digest. Displays as lower-case hex.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Sha512Digest([u8; SHA512_DIGEST_LEN]);

impl Sha512Digest {
    /// Parses a hex digest. Upper- and lower-case hex are both accepted.
    pub fn from_hex(hex_digest: &str) -> Result<Self, DigestParseError> {
        let hex_digest = hex_digest.trim();
        if hex_digest.len() != SHA512_DIGEST_LEN * 2 {
            return Err(DigestParseError::InvalidLength(hex_digest.len()));
        }
        let mut bytes = [0u8; SHA512_DIGEST_LEN];
        hex::decode_to_slice(hex_digest, &mut bytes)?;
        Ok(Self(bytes))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Compares two digests without short-circuiting on the first differing byte.
    pub fn constant_time_eq(&self, other: &Sha512Digest) -> bool {
        self.0.ct_eq(&other.0).into()
    }
}

impl Display for Sha512Digest {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl std::fmt::Debug for Sha512Digest {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Sha512Digest({})", self.to_hex())
    }
}

pub struct ContentDigestVerifier {
    hasher: Sha512,
    expected_digest: Sha512Digest,
}

impl ContentDigestVerifier {
    #[inline]
    pub fn new(expected_digest: Sha512Digest) -> Self {
        Self {
            hasher: Sha512::new(),
            expected_digest,
        }
    }

    #[inline]
    pub fn update(&mut self, data: impl AsRef<[u8]>) {
        Digest::update(&mut self.hasher, data.as_ref());
    }

    /// Hashes the file at `path` from the start, in 64KB chunks.
    pub async fn update_from_file(&mut self, path: &Path) -> std::io::Result<()> {
        let file = tokio::fs::File::open(path).await?;
        let mut reader = tokio::io::BufReader::new(file);
        let mut buffer = vec![0u8; 65536];

        loop {
            let bytes_read = reader.read(&mut buffer).await?;
            if bytes_read == 0 {
                break;
            }
            self.update(&buffer[..bytes_read]);
        }
        Ok(())
    }

    pub fn verify(self) -> Result<Sha512Digest, VerificationError> {
        let mut actual = [0u8; SHA512_DIGEST_LEN];
        actual.copy_from_slice(self.hasher.finalize().as_slice());
        let actual_digest = Sha512Digest(actual);

        if self.expected_digest.constant_time_eq(&actual_digest) {
            Ok(actual_digest)
        } else {
            Err(VerificationError::VerificationFailed {
                expected: self.expected_digest,
                actual: actual_digest,
            })
        }
    }
}
