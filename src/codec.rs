//! CBOR encoding of values and patch batches, and content hashes over it.

use std::fmt::{self, Display, LowerHex, UpperHex};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::{
    apply::{apply_all_with, ApplyPatch},
    error::PatchError,
    options::ApplyOptions,
    types::{Patch, Value},
    Result,
};

pub type Hash = [u8; 32];

pub fn format_hash_lower(hash: &Hash, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str("0x")?;
    for v in hash {
        write!(f, "{v:02x}")?
    }
    Ok(())
}

pub fn format_hash_upper(hash: &Hash, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str("0x")?;
    for v in hash {
        write!(f, "{v:02X}")?
    }
    Ok(())
}

pub fn encode_value(value: &Value) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    ciborium::into_writer(value, &mut buf)?;
    Ok(buf)
}

pub fn decode_value(bytes: &[u8]) -> Result<Value> {
    Ok(ciborium::from_reader(bytes)?)
}

pub fn encode_batch(patches: &[Patch]) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    ciborium::into_writer(patches, &mut buf)?;
    Ok(buf)
}

pub fn decode_batch(bytes: &[u8]) -> Result<Vec<Patch>> {
    Ok(ciborium::from_reader(bytes)?)
}

/// SHA-256 over the CBOR encoding. Maps are ordered, so equal batches
/// always hash the same.
pub fn batch_hash(patches: &[Patch]) -> Result<Hash> {
    let bytes = encode_batch(patches)?;
    Ok(Sha256::digest(&bytes).into())
}

/// A patch batch together with its content hash.
#[derive(Debug, PartialEq, Eq, Serialize, Deserialize, Clone)]
pub struct Changeset {
    pub hash: Hash,
    pub patches: Vec<Patch>,
}

impl Changeset {
    pub fn new(patches: Vec<Patch>) -> Result<Self> {
        Ok(Self {
            hash: batch_hash(&patches)?,
            patches,
        })
    }

    /// Recomputes the hash and compares it to the stored one.
    pub fn verify(&self) -> Result<bool> {
        Ok(batch_hash(&self.patches)? == self.hash)
    }

    pub fn encode(&self) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        ciborium::into_writer(self, &mut buf)?;
        Ok(buf)
    }

    pub fn decode(bytes: &[u8]) -> Result<Self> {
        Ok(ciborium::from_reader(bytes)?)
    }
}

impl ApplyPatch for Changeset {
    fn apply_with(&self, value: &Value, options: &ApplyOptions) -> std::result::Result<Value, PatchError> {
        apply_all_with(value, &self.patches, options)
    }
}

impl Display for Changeset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("changeset ")?;
        format_hash_lower(&self.hash, f)?;
        write!(f, " ({} patches)", self.patches.len())
    }
}

impl LowerHex for Changeset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        format_hash_lower(&self.hash, f)
    }
}

impl UpperHex for Changeset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        format_hash_upper(&self.hash, f)
    }
}
