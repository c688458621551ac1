//! Content identifiers and block encoding
//!
//! A [`Link`] is a content identifier: a CIDv1 wrapping a sha2-256
//! multihash of the identified bytes. Identifiers are derived from
//! content, never assigned, so `put` is idempotent by construction and a
//! fetched blob can always be checked against the link that named it.
//!
//! [`BlockEncoded`] gives record types a canonical DAG-CBOR encoding.
//! Signatures are computed over these encodings, so field order is fixed
//! by struct declaration order and must not change between versions.

use std::fmt::{self, Display};
use std::str::FromStr;

use ipld_core::codec::Codec;
use multihash::Multihash;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_ipld_dagcbor::codec::DagCborCodec;

pub use cid::Cid;

/// Multicodec code for raw bytes
pub const RAW_CODEC: u64 = 0x55;
/// Multicodec code for DAG-CBOR
pub const DAG_CBOR_CODEC: u64 = 0x71;
/// Multihash code for sha2-256
const SHA2_256_CODE: u64 = 0x12;

/// Errors that can occur deriving or parsing links
#[derive(Debug, thiserror::Error)]
pub enum LinkError {
    #[error("invalid content identifier: {0}")]
    Parse(#[from] cid::Error),
    #[error("link error: {0}")]
    Default(#[from] anyhow::Error),
}

/// A content identifier for an immutable blob
///
/// Thin wrapper around [`Cid`]. Links are derived from content by hashing,
/// so two identical blobs always produce the same link and a link can be
/// verified against the bytes it names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Link(Cid);

impl Link {
    /// Derive a link for raw bytes (codec 0x55)
    pub fn raw(data: &[u8]) -> Self {
        Self::derive(RAW_CODEC, data)
    }

    /// Derive a link for a DAG-CBOR block (codec 0x71)
    pub fn dag_cbor(data: &[u8]) -> Self {
        Self::derive(DAG_CBOR_CODEC, data)
    }

    fn derive(codec: u64, data: &[u8]) -> Self {
        use sha2::Digest;
        let digest = sha2::Sha256::digest(data);
        let hash =
            Multihash::<64>::wrap(SHA2_256_CODE, &digest).expect("sha2-256 digest fits multihash");
        Link(Cid::new_v1(codec, hash))
    }

    /// Get the underlying CID
    pub fn cid(&self) -> &Cid {
        &self.0
    }

    /// Get the multicodec code of the identified content
    pub fn codec(&self) -> u64 {
        self.0.codec()
    }

    /// Check that a blob re-hashes to this link
    ///
    /// Externally fetched bytes must never be trusted without this check.
    pub fn matches(&self, data: &[u8]) -> bool {
        Self::derive(self.codec(), data) == *self
    }
}

impl From<Cid> for Link {
    fn from(cid: Cid) -> Self {
        Link(cid)
    }
}

impl From<Link> for Cid {
    fn from(link: Link) -> Self {
        link.0
    }
}

impl Display for Link {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Link {
    type Err = LinkError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Link(Cid::try_from(s)?))
    }
}

/// Canonical DAG-CBOR encoding for record types
///
/// Struct fields encode in declaration order; the resulting bytes are the
/// canonical form that signatures are computed over and that blocks are
/// hashed from.
pub trait BlockEncoded: Serialize + DeserializeOwned + Sized {
    /// Encode to canonical DAG-CBOR bytes
    fn encode_block(&self) -> Result<Vec<u8>, LinkError> {
        DagCborCodec::encode_to_vec(self)
            .map_err(|e| anyhow::anyhow!("dag-cbor encode error: {}", e).into())
    }

    /// Decode from DAG-CBOR bytes
    fn decode_block(bytes: &[u8]) -> Result<Self, LinkError> {
        DagCborCodec::decode_from_slice(bytes)
            .map_err(|e| anyhow::anyhow!("dag-cbor decode error: {}", e).into())
    }

    /// Derive the link naming this block
    fn block_link(&self) -> Result<Link, LinkError> {
        Ok(Link::dag_cbor(&self.encode_block()?))
    }
}
