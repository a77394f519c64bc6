//! XMSS parameter sets as defined in RFC 8391 (single-tree variants).
//!
//! This module defines the twelve registered single-tree parameter sets:
//! - XMSS-SHA2_{10,16,20}_256: SHA-256, n = 32
//! - XMSS-SHA2_{10,16,20}_512: SHA-512, n = 64
//! - XMSS-SHAKE_{10,16,20}_256: SHAKE128, n = 32
//! - XMSS-SHAKE_{10,16,20}_512: SHAKE256, n = 64
//!
//! All of them use w = 16. The tree height h fixes the key lifetime at 2^h
//! signatures.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::XmssError;

/// Byte width of the leaf index in keys and signatures (single tree).
pub const INDEX_BYTES: usize = 4;

/// Byte width of the parameter set OID prefix.
pub const OID_BYTES: usize = 4;

/// Underlying hash function of a parameter set.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HashFunction {
    /// SHA-256 (32-byte digest)
    Sha256,
    /// SHA-512 (64-byte digest)
    Sha512,
    /// SHAKE128 squeezed to n bytes
    Shake128,
    /// SHAKE256 squeezed to n bytes
    Shake256,
}

/// Parameters for a specific XMSS tree.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Params {
    /// RFC 8391 OID (0 for unregistered sets)
    pub oid: u32,

    /// RFC 8391 name
    pub name: &'static str,

    /// Hash function behind every F, H, PRF and H_msg call
    pub hash: HashFunction,

    /// Security parameter n (digest size in bytes): 32 or 64
    pub n: usize,

    /// Winternitz parameter w
    pub w: usize,

    /// log2(w)
    pub log_w: usize,

    /// WOTS+ len1 = ceil(8n / log2(w))
    pub wots_len1: usize,

    /// WOTS+ len2 = floor(log2(len1 * (w - 1)) / log2(w)) + 1
    pub wots_len2: usize,

    /// WOTS+ chain count len = len1 + len2
    pub wots_len: usize,

    /// Tree height h
    pub h: usize,

    /// Number of tree layers d (always 1 here)
    pub d: usize,

    /// Byte width of the leaf index
    pub index_bytes: usize,

    /// Width of the domain-separation prefix of every hash input
    pub padding_len: usize,
}

impl Params {
    /// Derives the WOTS+ lengths and fixed widths from the primary parameters.
    pub(crate) const fn derive(
        oid: u32,
        name: &'static str,
        hash: HashFunction,
        n: usize,
        w: usize,
        h: usize,
        padding_len: usize,
    ) -> Self {
        let log_w = w.trailing_zeros() as usize;
        let wots_len1 = (8 * n + log_w - 1) / log_w;
        let wots_len2 = (wots_len1 * (w - 1)).ilog2() as usize / log_w + 1;

        Params {
            oid,
            name,
            hash,
            n,
            w,
            log_w,
            wots_len1,
            wots_len2,
            wots_len: wots_len1 + wots_len2,
            h,
            d: 1,
            index_bytes: INDEX_BYTES,
            padding_len,
        }
    }

    /// Returns the public key size in bytes.
    ///
    /// Public key = root (n bytes) + PUB_SEED (n bytes) = 2n bytes
    pub const fn public_key_size(&self) -> usize {
        2 * self.n
    }

    /// Returns the private key size in bytes.
    ///
    /// Private key = idx (4) + SK_SEED (n) + SK_PRF (n) + PUB_SEED (n) + root (n)
    pub const fn private_key_size(&self) -> usize {
        self.index_bytes + 4 * self.n
    }

    /// Returns the signature size in bytes.
    ///
    /// Signature = idx (4) + r (n) + WOTS+ sig (len * n) + auth path (h * n)
    pub const fn signature_size(&self) -> usize {
        self.index_bytes + self.n + (self.wots_len + self.h) * self.n
    }

    /// Returns the WOTS+ signature size in bytes.
    pub const fn wots_sig_size(&self) -> usize {
        self.wots_len * self.n
    }

    /// Returns the number of leaves, i.e. the lifetime of a key in signatures.
    pub const fn max_signatures(&self) -> u64 {
        1u64 << self.h
    }
}

/// XMSS-SHA2_10_256 parameters (2^10 signatures).
pub const XMSS_SHA2_10_256: Params =
    Params::derive(0x0000_0001, "XMSS-SHA2_10_256", HashFunction::Sha256, 32, 16, 10, 32);

/// XMSS-SHA2_16_256 parameters (2^16 signatures).
pub const XMSS_SHA2_16_256: Params =
    Params::derive(0x0000_0002, "XMSS-SHA2_16_256", HashFunction::Sha256, 32, 16, 16, 32);

/// XMSS-SHA2_20_256 parameters (2^20 signatures).
pub const XMSS_SHA2_20_256: Params =
    Params::derive(0x0000_0003, "XMSS-SHA2_20_256", HashFunction::Sha256, 32, 16, 20, 32);

/// XMSS-SHA2_10_512 parameters (2^10 signatures).
pub const XMSS_SHA2_10_512: Params =
    Params::derive(0x0000_0004, "XMSS-SHA2_10_512", HashFunction::Sha512, 64, 16, 10, 64);

/// XMSS-SHA2_16_512 parameters (2^16 signatures).
pub const XMSS_SHA2_16_512: Params =
    Params::derive(0x0000_0005, "XMSS-SHA2_16_512", HashFunction::Sha512, 64, 16, 16, 64);

/// XMSS-SHA2_20_512 parameters (2^20 signatures).
pub const XMSS_SHA2_20_512: Params =
    Params::derive(0x0000_0006, "XMSS-SHA2_20_512", HashFunction::Sha512, 64, 16, 20, 64);

/// XMSS-SHAKE_10_256 parameters (SHAKE128, 2^10 signatures).
pub const XMSS_SHAKE_10_256: Params =
    Params::derive(0x0000_0007, "XMSS-SHAKE_10_256", HashFunction::Shake128, 32, 16, 10, 32);

/// XMSS-SHAKE_16_256 parameters (SHAKE128, 2^16 signatures).
pub const XMSS_SHAKE_16_256: Params =
    Params::derive(0x0000_0008, "XMSS-SHAKE_16_256", HashFunction::Shake128, 32, 16, 16, 32);

/// XMSS-SHAKE_20_256 parameters (SHAKE128, 2^20 signatures).
pub const XMSS_SHAKE_20_256: Params =
    Params::derive(0x0000_0009, "XMSS-SHAKE_20_256", HashFunction::Shake128, 32, 16, 20, 32);

/// XMSS-SHAKE_10_512 parameters (SHAKE256, 2^10 signatures).
pub const XMSS_SHAKE_10_512: Params =
    Params::derive(0x0000_000a, "XMSS-SHAKE_10_512", HashFunction::Shake256, 64, 16, 10, 64);

/// XMSS-SHAKE_16_512 parameters (SHAKE256, 2^16 signatures).
pub const XMSS_SHAKE_16_512: Params =
    Params::derive(0x0000_000b, "XMSS-SHAKE_16_512", HashFunction::Shake256, 64, 16, 16, 64);

/// XMSS-SHAKE_20_512 parameters (SHAKE256, 2^20 signatures).
pub const XMSS_SHAKE_20_512: Params =
    Params::derive(0x0000_000c, "XMSS-SHAKE_20_512", HashFunction::Shake256, 64, 16, 20, 64);

/// Height-4 tree for fast unit tests.
#[cfg(test)]
pub(crate) const XMSS_TEST_4_256: Params =
    Params::derive(0, "XMSS-TEST_4_256", HashFunction::Sha256, 32, 16, 4, 32);

/// Registered parameter set identifier.
///
/// Serializes as the RFC 8391 name, so configuration files can select a set
/// with e.g. `"param_set": "XMSS-SHA2_10_256"`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ParamSet {
    /// XMSS-SHA2_10_256
    #[serde(rename = "XMSS-SHA2_10_256")]
    Sha2_10_256,
    /// XMSS-SHA2_16_256
    #[serde(rename = "XMSS-SHA2_16_256")]
    Sha2_16_256,
    /// XMSS-SHA2_20_256
    #[serde(rename = "XMSS-SHA2_20_256")]
    Sha2_20_256,
    /// XMSS-SHA2_10_512
    #[serde(rename = "XMSS-SHA2_10_512")]
    Sha2_10_512,
    /// XMSS-SHA2_16_512
    #[serde(rename = "XMSS-SHA2_16_512")]
    Sha2_16_512,
    /// XMSS-SHA2_20_512
    #[serde(rename = "XMSS-SHA2_20_512")]
    Sha2_20_512,
    /// XMSS-SHAKE_10_256
    #[serde(rename = "XMSS-SHAKE_10_256")]
    Shake128_10_256,
    /// XMSS-SHAKE_16_256
    #[serde(rename = "XMSS-SHAKE_16_256")]
    Shake128_16_256,
    /// XMSS-SHAKE_20_256
    #[serde(rename = "XMSS-SHAKE_20_256")]
    Shake128_20_256,
    /// XMSS-SHAKE_10_512
    #[serde(rename = "XMSS-SHAKE_10_512")]
    Shake256_10_512,
    /// XMSS-SHAKE_16_512
    #[serde(rename = "XMSS-SHAKE_16_512")]
    Shake256_16_512,
    /// XMSS-SHAKE_20_512
    #[serde(rename = "XMSS-SHAKE_20_512")]
    Shake256_20_512,
}

impl ParamSet {
    /// Every registered parameter set, in OID order.
    pub const ALL: [ParamSet; 12] = [
        ParamSet::Sha2_10_256,
        ParamSet::Sha2_16_256,
        ParamSet::Sha2_20_256,
        ParamSet::Sha2_10_512,
        ParamSet::Sha2_16_512,
        ParamSet::Sha2_20_512,
        ParamSet::Shake128_10_256,
        ParamSet::Shake128_16_256,
        ParamSet::Shake128_20_256,
        ParamSet::Shake256_10_512,
        ParamSet::Shake256_16_512,
        ParamSet::Shake256_20_512,
    ];

    /// Returns the immutable parameters of this set.
    pub const fn params(self) -> Params {
        match self {
            ParamSet::Sha2_10_256 => XMSS_SHA2_10_256,
            ParamSet::Sha2_16_256 => XMSS_SHA2_16_256,
            ParamSet::Sha2_20_256 => XMSS_SHA2_20_256,
            ParamSet::Sha2_10_512 => XMSS_SHA2_10_512,
            ParamSet::Sha2_16_512 => XMSS_SHA2_16_512,
            ParamSet::Sha2_20_512 => XMSS_SHA2_20_512,
            ParamSet::Shake128_10_256 => XMSS_SHAKE_10_256,
            ParamSet::Shake128_16_256 => XMSS_SHAKE_16_256,
            ParamSet::Shake128_20_256 => XMSS_SHAKE_20_256,
            ParamSet::Shake256_10_512 => XMSS_SHAKE_10_512,
            ParamSet::Shake256_16_512 => XMSS_SHAKE_16_512,
            ParamSet::Shake256_20_512 => XMSS_SHAKE_20_512,
        }
    }

    /// Returns the RFC 8391 OID.
    pub const fn oid(self) -> u32 {
        self.params().oid
    }

    /// Returns the RFC 8391 name.
    pub const fn name(self) -> &'static str {
        self.params().name
    }

    /// Resolves an OID, failing fast on unregistered values.
    pub fn from_oid(oid: u32) -> Result<Self, XmssError> {
        ParamSet::ALL
            .into_iter()
            .find(|set| set.oid() == oid)
            .ok_or(XmssError::UnknownParameterSet { oid })
    }
}

impl fmt::Display for ParamSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ParamSet {
    type Err = XmssError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ParamSet::ALL
            .into_iter()
            .find(|set| set.name() == s)
            .ok_or_else(|| XmssError::UnknownParameterName { name: s.to_string() })
    }
}
