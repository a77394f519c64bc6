//! Signature generation for XMSS.
//!
//! Implements XMSS signing (RFC 8391 Algorithms 11 and 12).
//!
//! # Signature Structure
//!
//! An XMSS signature consists of:
//! - idx: Index of the one-time key used (4 bytes, big-endian)
//! - r: Message randomizer (n bytes)
//! - SIG_WOTS: WOTS+ signature on the message digest (len * n bytes)
//! - AUTH: Authentication path of leaf idx (h * n bytes)
//!
//! # Index Reservation
//!
//! Signing advances the private key before any signature bytes are derived.
//! [`sign_persisted`] additionally writes the advanced key through a
//! [`KeyStore`] before the signature is computed, so a crash can lose an
//! index but never reuse one.

use zeroize::Zeroize;

use crate::address::Address;
use crate::error::{Result, XmssError};
use crate::hash::{h_msg, prf};
use crate::keygen::PrivateKey;
use crate::params::{Params, INDEX_BYTES};
use crate::state::KeyStore;
use crate::treehash::{build_tree, leaf_seed};
use crate::wots::wots_sign;

/// XMSS signature.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Signature {
    /// Index of the one-time key used
    pub index: u32,
    /// Randomizer (n bytes)
    pub r: Vec<u8>,
    /// WOTS+ signature (len n-byte strings)
    pub wots_sig: Vec<Vec<u8>>,
    /// Authentication path (h n-byte strings)
    pub auth: Vec<Vec<u8>>,
}

impl Signature {
    /// Serializes the signature to bytes.
    ///
    /// Format: idx || r || SIG_WOTS || AUTH
    pub fn to_bytes(&self) -> Vec<u8> {
        let n = self.r.len();
        let mut bytes =
            Vec::with_capacity(INDEX_BYTES + n * (1 + self.wots_sig.len() + self.auth.len()));

        bytes.extend(&self.index.to_be_bytes());
        bytes.extend(&self.r);
        for sig_elem in &self.wots_sig {
            bytes.extend(sig_elem);
        }
        for auth_elem in &self.auth {
            bytes.extend(auth_elem);
        }

        bytes
    }

    /// Deserializes a signature from bytes.
    pub fn from_bytes(bytes: &[u8], params: &Params) -> Result<Self> {
        if bytes.len() != params.signature_size() {
            return Err(XmssError::MalformedSignature {
                reason: "signature has the wrong length",
            });
        }

        let n = params.n;
        let index = u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
        let mut chunks = bytes[INDEX_BYTES..].chunks_exact(n).map(<[u8]>::to_vec);

        let r = chunks.next().unwrap_or_default();
        let wots_sig: Vec<Vec<u8>> = chunks.by_ref().take(params.wots_len).collect();
        let auth: Vec<Vec<u8>> = chunks.collect();

        Ok(Signature {
            index,
            r,
            wots_sig,
            auth,
        })
    }

    /// Builds a signed message: signature || message.
    pub fn to_signed_message(&self, message: &[u8]) -> Vec<u8> {
        let mut bytes = self.to_bytes();
        bytes.extend_from_slice(message);
        bytes
    }
}

/// Signs a message with the next unused one-time key.
///
/// XMSS_sign(M, SK) - RFC 8391 Algorithm 12
///
/// The private key is advanced before the signature is computed. Fails with
/// [`XmssError::KeyExhausted`] once all 2^h keys are used.
pub fn sign(sk: &mut PrivateKey, message: &[u8]) -> Result<Signature> {
    let index = sk.reserve_index()?;
    Ok(sign_at(sk, index, message))
}

/// Signs a message, durably persisting the advanced private key first.
///
/// If persisting fails the error is returned, no signature is produced, and
/// the reserved index stays consumed.
pub fn sign_persisted<S: KeyStore + ?Sized>(
    sk: &mut PrivateKey,
    store: &mut S,
    message: &[u8],
) -> Result<Signature> {
    let index = sk.reserve_index()?;

    let mut state = sk.to_bytes();
    let persisted = store.persist(&state);
    state.zeroize();
    persisted?;

    Ok(sign_at(sk, index, message))
}

/// Computes the signature for an already reserved index.
///
/// treeSig - RFC 8391 Algorithm 11, with the randomizer and digest of
/// Algorithm 12
fn sign_at(sk: &PrivateKey, index: u32, message: &[u8]) -> Signature {
    let params = &sk.params;
    let subtree = Address::new();

    // r = PRF(SK_PRF, toByte(idx, 32))
    let mut index_block = [0u8; 32];
    index_block[28..].copy_from_slice(&index.to_be_bytes());
    let r = prf(params, &sk.prf_seed, &index_block);

    let digest = h_msg(params, &r, &sk.root, u64::from(index), message);

    let mut seed = leaf_seed(params, &sk.prv_seed, &subtree, index);
    let wots_sig = wots_sign(
        params,
        &digest,
        &seed,
        &sk.pub_seed,
        &mut Address::ots(&subtree, index),
    );
    seed.zeroize();

    let (_, auth) = build_tree(params, &sk.prv_seed, &sk.pub_seed, &subtree, index);

    Signature {
        index,
        r,
        wots_sig,
        auth,
    }
}
