//! Key generation and key encodings for XMSS.
//!
//! Implements XMSS key generation (RFC 8391 Algorithm 10).
//!
//! # Key Structure
//!
//! - **Public Key**: root || SEED (2n bytes), optionally prefixed with the
//!   4-byte big-endian OID of the parameter set
//!   - root: Root of the Merkle tree over all 2^h leaves
//!   - SEED: Public seed keying every F and H call
//!
//! - **Private Key**: idx || SK_SEED || SK_PRF || SEED || root (4 + 4n bytes)
//!   - idx: Index of the next unused one-time key (big-endian)
//!   - SK_SEED: Secret seed from which every WOTS+ key is derived
//!   - SK_PRF: Secret key for the per-signature randomizer
//!   - SEED, root: Copies of the public key components
//!
//! # Statefulness
//!
//! The private key is a state machine: every signature consumes the one-time
//! key at `idx` and advances it. Once idx reaches 2^h the key is exhausted.
//! A private key must never be restored from a copy taken before a signature
//! was produced; see [`crate::state`] for durable persistence.

use std::fmt;

use rand::{CryptoRng, RngCore};
use tracing::{debug, warn};
use zeroize::Zeroize;

use crate::address::Address;
use crate::error::{Result, XmssError};
use crate::params::{ParamSet, Params, INDEX_BYTES, OID_BYTES};
use crate::treehash::build_tree;

/// Warn once fewer than 1/64 of the one-time keys are left.
const LOW_REMAINING_DIVISOR: u64 = 64;

/// XMSS public key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PublicKey {
    /// Root of the Merkle tree (n bytes)
    pub root: Vec<u8>,
    /// Public seed (n bytes)
    pub pub_seed: Vec<u8>,
    /// Parameter set
    pub params: Params,
}

impl PublicKey {
    /// Serializes the public key to bytes.
    ///
    /// Format: root || SEED
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.params.public_key_size());
        bytes.extend(&self.root);
        bytes.extend(&self.pub_seed);
        bytes
    }

    /// Serializes the public key prefixed with its 4-byte OID.
    pub fn to_bytes_with_oid(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(OID_BYTES + self.params.public_key_size());
        bytes.extend(&self.params.oid.to_be_bytes());
        bytes.extend(self.to_bytes());
        bytes
    }

    /// Deserializes a public key from bytes.
    pub fn from_bytes(bytes: &[u8], params: Params) -> Result<Self> {
        if bytes.len() != params.public_key_size() {
            return Err(XmssError::InvalidKey {
                reason: "public key has the wrong length",
            });
        }

        let n = params.n;
        Ok(PublicKey {
            root: bytes[0..n].to_vec(),
            pub_seed: bytes[n..2 * n].to_vec(),
            params,
        })
    }

    /// Deserializes an OID-prefixed public key, resolving its parameter set.
    pub fn from_bytes_with_oid(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < OID_BYTES {
            return Err(XmssError::InvalidKey {
                reason: "public key is shorter than its OID",
            });
        }

        let (oid, rest) = bytes.split_at(OID_BYTES);
        let oid = u32::from_be_bytes([oid[0], oid[1], oid[2], oid[3]]);
        let params = ParamSet::from_oid(oid)?.params();

        Self::from_bytes(rest, params)
    }
}

/// XMSS private key.
///
/// Not `Clone`: two copies of the same private key would hand out the same
/// one-time keys. Use [`PrivateKey::to_bytes`] for storage.
///
/// # Security
///
/// This struct implements `Drop` to zeroize secret key material when dropped.
pub struct PrivateKey {
    pub(crate) index: u32,
    pub(crate) prv_seed: Vec<u8>,
    pub(crate) prf_seed: Vec<u8>,
    pub(crate) pub_seed: Vec<u8>,
    pub(crate) root: Vec<u8>,
    pub(crate) params: Params,
}

impl Drop for PrivateKey {
    fn drop(&mut self) {
        self.prv_seed.zeroize();
        self.prf_seed.zeroize();
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrivateKey")
            .field("params", &self.params.name)
            .field("index", &self.index)
            .finish_non_exhaustive()
    }
}

impl PrivateKey {
    /// Serializes the private key to bytes.
    ///
    /// Format: idx || SK_SEED || SK_PRF || SEED || root
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.params.private_key_size());
        bytes.extend(&self.index.to_be_bytes());
        bytes.extend(&self.prv_seed);
        bytes.extend(&self.prf_seed);
        bytes.extend(&self.pub_seed);
        bytes.extend(&self.root);
        bytes
    }

    /// Deserializes a private key from bytes.
    ///
    /// An index equal to 2^h is accepted and yields an exhausted key.
    pub fn from_bytes(bytes: &[u8], params: Params) -> Result<Self> {
        if bytes.len() != params.private_key_size() {
            return Err(XmssError::InvalidKey {
                reason: "private key has the wrong length",
            });
        }

        let index = u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
        if u64::from(index) > params.max_signatures() {
            return Err(XmssError::InvalidKey {
                reason: "private key index exceeds 2^h",
            });
        }

        let n = params.n;
        let body = &bytes[INDEX_BYTES..];
        Ok(PrivateKey {
            index,
            prv_seed: body[0..n].to_vec(),
            prf_seed: body[n..2 * n].to_vec(),
            pub_seed: body[2 * n..3 * n].to_vec(),
            root: body[3 * n..4 * n].to_vec(),
            params,
        })
    }

    /// Returns the public key corresponding to this private key.
    pub fn public_key(&self) -> PublicKey {
        PublicKey {
            root: self.root.clone(),
            pub_seed: self.pub_seed.clone(),
            params: self.params,
        }
    }

    /// Returns the parameter set of this key.
    pub fn params(&self) -> &Params {
        &self.params
    }

    /// Index of the next one-time key to be used.
    pub fn index(&self) -> u32 {
        self.index
    }

    /// Number of signatures this key can still produce.
    pub fn remaining_signatures(&self) -> u64 {
        self.params.max_signatures() - u64::from(self.index)
    }

    /// Returns `true` once all 2^h one-time keys are used.
    pub fn is_exhausted(&self) -> bool {
        self.remaining_signatures() == 0
    }

    /// Claims the current index and advances the key.
    ///
    /// The returned index is never handed out again by this key.
    pub(crate) fn reserve_index(&mut self) -> Result<u32> {
        let limit = self.params.max_signatures();

        if self.is_exhausted() {
            warn!(params = self.params.name, limit, "refusing to sign with exhausted key");
            return Err(XmssError::KeyExhausted { limit });
        }

        let index = self.index;
        self.index += 1;

        let remaining = self.remaining_signatures();
        debug!(index, remaining, "reserved one-time key");
        if remaining <= limit / LOW_REMAINING_DIVISOR {
            warn!(
                params = self.params.name,
                remaining, "private key is close to exhaustion"
            );
        }

        Ok(index)
    }
}

/// Generates an XMSS key pair.
///
/// XMSS_keyGen - RFC 8391 Algorithm 10
///
/// # Arguments
/// * `rng` - Cryptographically secure random number generator
/// * `params` - Parameter set to use
///
/// # Returns
/// A tuple of (public_key, private_key). The private key starts at index 0.
pub fn keygen<R: RngCore + CryptoRng>(rng: &mut R, params: Params) -> (PublicKey, PrivateKey) {
    let mut prv_seed = vec![0u8; params.n];
    let mut prf_seed = vec![0u8; params.n];
    let mut pub_seed = vec![0u8; params.n];

    rng.fill_bytes(&mut prv_seed);
    rng.fill_bytes(&mut prf_seed);
    rng.fill_bytes(&mut pub_seed);

    let keys = keygen_internal(&prv_seed, &prf_seed, &pub_seed, params);
    prv_seed.zeroize();
    prf_seed.zeroize();
    keys
}

/// Deterministic key generation from a 3n-byte seed.
///
/// The seed is split as SK_SEED || SK_PRF || SEED.
pub fn keygen_from_seed(seed: &[u8], params: Params) -> Result<(PublicKey, PrivateKey)> {
    let n = params.n;
    if seed.len() != 3 * n {
        return Err(XmssError::InvalidInput {
            field: "seed",
            reason: "must be exactly 3n bytes",
        });
    }

    Ok(keygen_internal(
        &seed[0..n],
        &seed[n..2 * n],
        &seed[2 * n..3 * n],
        params,
    ))
}

/// Internal key generation from seeds.
///
/// Callers guarantee that every seed is exactly n bytes; the public entry
/// points are [`keygen`] and [`keygen_from_seed`].
pub(crate) fn keygen_internal(
    prv_seed: &[u8],
    prf_seed: &[u8],
    pub_seed: &[u8],
    params: Params,
) -> (PublicKey, PrivateKey) {
    debug!(
        params = params.name,
        leaves = params.max_signatures(),
        "generating XMSS key pair"
    );

    let (root, _) = build_tree(&params, prv_seed, pub_seed, &Address::new(), 0);

    let pk = PublicKey {
        root: root.clone(),
        pub_seed: pub_seed.to_vec(),
        params,
    };

    let sk = PrivateKey {
        index: 0,
        prv_seed: prv_seed.to_vec(),
        prf_seed: prf_seed.to_vec(),
        pub_seed: pub_seed.to_vec(),
        root,
        params,
    };

    debug!(params = params.name, "key generation complete");
    (pk, sk)
}
