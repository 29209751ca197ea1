use crate::artifacts::index::CHECKSUM_SIZE;
use crate::errors::TwigError;
use bytes::Bytes;
use sha1::{Digest, Sha1};

/// Buffer that keeps a running SHA-1 of everything written to it
///
/// The whole index is assembled in memory so that it reaches disk with a
/// single write call.
#[derive(Debug, Default)]
pub struct Checksum {
    buffer: Vec<u8>,
    digest: Sha1,
}

impl Checksum {
    pub fn new() -> Self {
        Checksum::default()
    }

    pub fn write(&mut self, data: &[u8]) {
        self.buffer.extend_from_slice(data);
        self.digest.update(data);
    }

    /// Append the trailer and hand out the finished buffer
    pub fn finish(self) -> Bytes {
        let mut buffer = self.buffer;
        buffer.extend_from_slice(self.digest.finalize().as_slice());
        Bytes::from(buffer)
    }

    /// Check the trailing SHA-1 against the preceding bytes and return those bytes
    pub fn verify(data: &[u8]) -> anyhow::Result<&[u8]> {
        if data.len() < CHECKSUM_SIZE {
            return Err(TwigError::CorruptIndex(format!(
                "index is {} bytes, too short for a checksum",
                data.len()
            ))
            .into());
        }

        let (body, expected) = data.split_at(data.len() - CHECKSUM_SIZE);
        let actual = Sha1::digest(body);

        if actual.as_slice() != expected {
            return Err(TwigError::IndexChecksumMismatch.into());
        }

        Ok(body)
    }
}
