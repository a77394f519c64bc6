//! Keyed hash functions for XMSS (RFC 8391 Section 5.1).
//!
//! Every function is a single call to the parameter set's hash function over
//! an input prefixed with `toByte(tag, padding_len)`. The tag is the only
//! thing separating the five uses, so each one must keep its own.
//!
//! # Functions
//!
//! - `F`: keyed, masked hash of one n-byte value (WOTS+ chains)
//! - `H`: keyed, masked hash of two n-byte values (L-trees and Merkle nodes)
//! - `H_msg`: randomized message digest bound to the root and leaf index
//! - `PRF`: pseudorandom function for keys, masks, seeds and `r`
//! - `PRF_keygen`: pseudorandom function for WOTS+ chain secrets only

use sha2::{Digest, Sha256, Sha512};
use sha3::{
    digest::{ExtendableOutput, Update, XofReader},
    Shake128, Shake256,
};

use crate::address::Address;
use crate::params::{HashFunction, Params};

const TAG_F: u64 = 0;
const TAG_H: u64 = 1;
const TAG_HASH: u64 = 2;
const TAG_PRF: u64 = 3;
const TAG_PRF_KEYGEN: u64 = 4;

/// Encodes `value` as a `len`-byte big-endian string (RFC 8391 `toByte`).
pub fn to_byte(value: u64, len: usize) -> Vec<u8> {
    let mut out = vec![0u8; len];
    let bytes = value.to_be_bytes();
    let take = len.min(bytes.len());
    out[len - take..].copy_from_slice(&bytes[bytes.len() - take..]);
    out
}

/// Hashes the concatenation of `parts` with the parameter set's hash function.
///
/// Returns exactly n bytes.
pub fn core_hash(params: &Params, parts: &[&[u8]]) -> Vec<u8> {
    match params.hash {
        HashFunction::Sha256 => fixed_digest::<Sha256>(parts, params.n),
        HashFunction::Sha512 => fixed_digest::<Sha512>(parts, params.n),
        HashFunction::Shake128 => xof_digest::<Shake128>(parts, params.n),
        HashFunction::Shake256 => xof_digest::<Shake256>(parts, params.n),
    }
}

fn fixed_digest<D: Digest>(parts: &[&[u8]], n: usize) -> Vec<u8> {
    let mut hasher = D::new();
    for part in parts {
        Digest::update(&mut hasher, part);
    }
    let mut output = hasher.finalize().to_vec();
    output.truncate(n);
    output
}

fn xof_digest<X: Default + Update + ExtendableOutput>(parts: &[&[u8]], n: usize) -> Vec<u8> {
    let mut hasher = X::default();
    for part in parts {
        Update::update(&mut hasher, part);
    }

    let mut reader = hasher.finalize_xof();
    let mut output = vec![0u8; n];
    reader.read(&mut output);
    output
}

/// PRF function.
///
/// PRF(KEY, M) = HASH(toByte(3, padding_len) || KEY || M), with a 32-byte M.
pub fn prf(params: &Params, key: &[u8], m: &[u8; 32]) -> Vec<u8> {
    let tag = to_byte(TAG_PRF, params.padding_len);
    core_hash(params, &[&tag, &key[..params.n], m])
}

/// PRF_keygen function, reserved for WOTS+ chain secrets.
///
/// PRF_keygen(KEY, M) = HASH(toByte(4, padding_len) || KEY || M)
pub fn prf_keygen(params: &Params, key: &[u8], m: &[u8; 32]) -> Vec<u8> {
    let tag = to_byte(TAG_PRF_KEYGEN, params.padding_len);
    core_hash(params, &[&tag, &key[..params.n], m])
}

/// F function: keyed hash of one n-byte value.
///
/// KEY = PRF(SEED, ADRS[keyAndMask = 0]), BM = PRF(SEED, ADRS[keyAndMask = 1])
/// F = HASH(toByte(0, padding_len) || KEY || (M XOR BM))
///
/// The caller's address is not modified.
pub fn f(params: &Params, pub_seed: &[u8], m: &[u8], adrs: &Address) -> Vec<u8> {
    let mut adrs = *adrs;

    adrs.set_key_and_mask(0);
    let key = prf(params, pub_seed, adrs.as_bytes());

    adrs.set_key_and_mask(1);
    let bitmask = prf(params, pub_seed, adrs.as_bytes());

    let masked: Vec<u8> = m.iter().zip(&bitmask).map(|(a, b)| a ^ b).collect();

    let tag = to_byte(TAG_F, params.padding_len);
    core_hash(params, &[&tag, &key, &masked])
}

/// H function: keyed hash of two n-byte values.
///
/// KEY = PRF(SEED, ADRS[keyAndMask = 0]),
/// BM_0 = PRF(SEED, ADRS[keyAndMask = 1]), BM_1 = PRF(SEED, ADRS[keyAndMask = 2])
/// H = HASH(toByte(1, padding_len) || KEY || ((LEFT || RIGHT) XOR (BM_0 || BM_1)))
///
/// The caller's address is not modified.
pub fn h(params: &Params, pub_seed: &[u8], left: &[u8], right: &[u8], adrs: &Address) -> Vec<u8> {
    let mut adrs = *adrs;

    adrs.set_key_and_mask(0);
    let key = prf(params, pub_seed, adrs.as_bytes());

    adrs.set_key_and_mask(1);
    let bitmask_left = prf(params, pub_seed, adrs.as_bytes());

    adrs.set_key_and_mask(2);
    let bitmask_right = prf(params, pub_seed, adrs.as_bytes());

    let mut masked = Vec::with_capacity(2 * params.n);
    masked.extend(left.iter().zip(&bitmask_left).map(|(a, b)| a ^ b));
    masked.extend(right.iter().zip(&bitmask_right).map(|(a, b)| a ^ b));

    let tag = to_byte(TAG_H, params.padding_len);
    core_hash(params, &[&tag, &key, &masked])
}

/// H_msg function for hashing the message.
///
/// H_msg(r, root, idx, M) = HASH(toByte(2, padding_len) || r || root || toByte(idx, n) || M)
///
/// Produces the n-byte digest that the WOTS+ key of leaf `idx` signs.
pub fn h_msg(params: &Params, r: &[u8], root: &[u8], index: u64, message: &[u8]) -> Vec<u8> {
    let tag = to_byte(TAG_HASH, params.padding_len);
    let index_bytes = to_byte(index, params.n);
    core_hash(params, &[&tag, r, root, &index_bytes, message])
}
