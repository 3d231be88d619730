pub mod content_digest_hasher;

pub use content_digest_hasher::{
    ContentDigestVerifier, DigestParseError, SHA512_DIGEST_LEN, Sha512Digest, VerificationError,
};
