//! Signature verification for XMSS.
//!
//! Implements XMSS verification (RFC 8391 Algorithms 13 and 14).
//!
//! Verification is stateless and only reads the public key, so a
//! [`PublicKey`] can be shared across threads.

use subtle::ConstantTimeEq;
use tracing::trace;

use crate::address::Address;
use crate::error::{Result, XmssError};
use crate::hash::h_msg;
use crate::keygen::PublicKey;
use crate::ltree::ltree;
use crate::sign::Signature;
use crate::treehash::compute_root;
use crate::wots::wots_pk_from_sig;

/// Verifies an XMSS signature.
///
/// XMSS_verify(Sig, M, PK) - RFC 8391 Algorithm 14
///
/// # Arguments
/// * `pk` - Public key
/// * `message` - Message that was signed
/// * `sig` - Signature to verify
///
/// # Returns
/// `Ok(())` if the signature is valid, [`XmssError::MalformedSignature`] if
/// it does not fit the parameter set, or [`XmssError::VerificationMismatch`]
/// if the recomputed root differs from the public key.
pub fn verify(pk: &PublicKey, message: &[u8], sig: &Signature) -> Result<()> {
    let params = &pk.params;

    if pk.root.len() != params.n || pk.pub_seed.len() != params.n {
        trace!("rejecting public key with wrong component lengths");
        return Err(XmssError::InvalidKey {
            reason: "public key components must be n bytes",
        });
    }

    // Validate signature structure
    let malformed = if u64::from(sig.index) >= params.max_signatures() {
        Some("index out of range")
    } else if sig.r.len() != params.n {
        Some("randomizer has the wrong length")
    } else if sig.wots_sig.len() != params.wots_len || sig.auth.len() != params.h {
        Some("wrong number of elements")
    } else if sig.wots_sig.iter().chain(&sig.auth).any(|e| e.len() != params.n) {
        Some("element has the wrong length")
    } else {
        None
    };

    if let Some(reason) = malformed {
        trace!(reason, "rejecting signature");
        return Err(XmssError::MalformedSignature { reason });
    }

    let subtree = Address::new();

    // Step 1: Recompute the message digest from the embedded index
    let digest = h_msg(params, &sig.r, &pk.root, u64::from(sig.index), message);

    // Step 2: Recover the WOTS+ public key and compress it to the leaf
    let wots_pk = wots_pk_from_sig(
        params,
        &sig.wots_sig,
        &digest,
        &pk.pub_seed,
        &mut Address::ots(&subtree, sig.index),
    );
    let leaf = ltree(
        params,
        wots_pk,
        &pk.pub_seed,
        &Address::ltree(&subtree, sig.index),
    );

    // Step 3: Replay the authentication path and compare roots
    let root = compute_root(params, &leaf, sig.index, &sig.auth, &pk.pub_seed, &subtree);

    if bool::from(root.ct_eq(&pk.root)) {
        Ok(())
    } else {
        trace!(index = sig.index, "recomputed root does not match public key");
        Err(XmssError::VerificationMismatch)
    }
}

/// Boolean verification wrapper.
///
/// Returns `true` if the signature is valid, `false` otherwise.
pub fn verify_bool(pk: &PublicKey, message: &[u8], sig: &Signature) -> bool {
    verify(pk, message, sig).is_ok()
}

/// Verifies a serialized signature.
pub fn verify_bytes(pk: &PublicKey, message: &[u8], sig_bytes: &[u8]) -> Result<()> {
    let sig = Signature::from_bytes(sig_bytes, &pk.params)?;
    verify(pk, message, &sig)
}

/// Verifies a signed message (signature || message) and returns the message.
pub fn open(pk: &PublicKey, signed_message: &[u8]) -> Result<Vec<u8>> {
    let sig_len = pk.params.signature_size();
    if signed_message.len() < sig_len {
        trace!(len = signed_message.len(), "signed message shorter than a signature");
        return Err(XmssError::MalformedSignature {
            reason: "signed message shorter than a signature",
        });
    }

    let (sig_bytes, message) = signed_message.split_at(sig_len);
    verify_bytes(pk, message, sig_bytes)?;
    Ok(message.to_vec())
}
