//! WOTS+ (Winternitz One-Time Signature) implementation for XMSS.
//!
//! WOTS+ is the one-time signature at every XMSS leaf. It signs an n-byte
//! digest by revealing intermediate positions of `len` hash chains.
//!
//! # Overview
//!
//! WOTS+ works by:
//! 1. Converting the digest to len1 base-w digits
//! 2. Appending len2 base-w digits of the checksum sum(w - 1 - digit)
//! 3. Walking chain i exactly digit_i steps from its secret start value
//!
//! The checksum makes every forgery attempt require walking some chain
//! backwards.
//!
//! # Security
//!
//! Each WOTS+ key pair must sign at most one digest. The XMSS index counter
//! is what enforces this.

use zeroize::Zeroize;

use crate::address::Address;
use crate::hash::{f, prf_keygen, to_byte};
use crate::params::Params;

/// Computes a single WOTS+ hash chain.
///
/// chain(X, i, s, SEED, ADRS) - RFC 8391 Algorithm 2
///
/// Starting from value X at position `start`, applies F `steps` times. The
/// walk stops at position w - 1 even if more steps are requested.
pub fn gen_chain(
    params: &Params,
    x: &[u8],
    start: u32,
    steps: u32,
    pub_seed: &[u8],
    adrs: &mut Address,
) -> Vec<u8> {
    let mut tmp = x.to_vec();
    let end = start.saturating_add(steps).min(params.w as u32 - 1);

    for j in start..end {
        adrs.set_hash(j);
        tmp = f(params, pub_seed, &tmp, adrs);
    }
    tmp
}

/// Derives the secret start value of chain `chain` from a leaf seed.
///
/// sk_i = PRF_keygen(seed, toByte(i, 32))
fn chain_secret(params: &Params, seed: &[u8], chain: u32) -> Vec<u8> {
    let mut ctr = [0u8; 32];
    ctr[28..].copy_from_slice(&chain.to_be_bytes());
    prf_keygen(params, seed, &ctr)
}

/// Generates the WOTS+ public key (the `len` chain ends).
///
/// WOTS_genPK - RFC 8391 Algorithm 4
///
/// `adrs` must be an OTS address for the leaf; its chain and hash words are
/// overwritten.
pub fn wots_pk_gen(
    params: &Params,
    seed: &[u8],
    pub_seed: &[u8],
    adrs: &mut Address,
) -> Vec<Vec<u8>> {
    let mut pk = Vec::with_capacity(params.wots_len);

    for i in 0..params.wots_len as u32 {
        let mut sk_i = chain_secret(params, seed, i);

        adrs.set_chain(i);
        pk.push(gen_chain(params, &sk_i, 0, params.w as u32 - 1, pub_seed, adrs));
        sk_i.zeroize();
    }

    pk
}

/// Generates a WOTS+ signature.
///
/// WOTS_sign - RFC 8391 Algorithm 5
///
/// Signs an n-byte digest by walking each chain digit_i steps.
pub fn wots_sign(
    params: &Params,
    msg: &[u8],
    seed: &[u8],
    pub_seed: &[u8],
    adrs: &mut Address,
) -> Vec<Vec<u8>> {
    let lengths = chain_lengths(params, msg);
    let mut sig = Vec::with_capacity(params.wots_len);

    for (i, &len_i) in lengths.iter().enumerate() {
        let mut sk_i = chain_secret(params, seed, i as u32);

        adrs.set_chain(i as u32);
        sig.push(gen_chain(params, &sk_i, 0, len_i, pub_seed, adrs));
        sk_i.zeroize();
    }

    sig
}

/// Computes the WOTS+ public key from a signature.
///
/// WOTS_pkFromSig - RFC 8391 Algorithm 6
///
/// Completes each chain from position digit_i for the remaining
/// w - 1 - digit_i steps. The result equals `wots_pk_gen` only for a valid
/// signature on `msg`.
pub fn wots_pk_from_sig(
    params: &Params,
    sig: &[Vec<u8>],
    msg: &[u8],
    pub_seed: &[u8],
    adrs: &mut Address,
) -> Vec<Vec<u8>> {
    let lengths = chain_lengths(params, msg);
    let last = params.w as u32 - 1;

    sig.iter()
        .zip(lengths)
        .enumerate()
        .map(|(i, (sig_i, len_i))| {
            adrs.set_chain(i as u32);
            gen_chain(params, sig_i, len_i, last - len_i, pub_seed, adrs)
        })
        .collect()
}

/// Converts an n-byte digest into the `len` chain lengths (digits + checksum).
pub fn chain_lengths(params: &Params, msg: &[u8]) -> Vec<u32> {
    debug_assert_eq!(msg.len(), params.n, "WOTS+ digest must be n bytes");

    let mut lengths = base_w(params, msg, params.wots_len1);

    let csum: u64 = lengths
        .iter()
        .map(|&digit| (params.w as u64 - 1) - digit as u64)
        .sum();

    // Left-align the len2 * log_w checksum bits in whole bytes
    let csum_bits = params.wots_len2 * params.log_w;
    let shift = (8 - csum_bits % 8) % 8;
    let csum_bytes = to_byte(csum << shift, (csum_bits + 7) / 8);

    lengths.extend(base_w(params, &csum_bytes, params.wots_len2));
    lengths
}

/// Converts a byte string to `out_len` base-w digits, most significant first.
///
/// base_w - RFC 8391 Algorithm 1
fn base_w(params: &Params, input: &[u8], out_len: usize) -> Vec<u32> {
    let mut output = Vec::with_capacity(out_len);
    let mut bytes = input.iter();
    let mut total = 0u32;
    let mut bits = 0usize;
    let mask = params.w as u32 - 1;

    for _ in 0..out_len {
        if bits == 0 {
            total = bytes.next().copied().unwrap_or(0) as u32;
            bits = 8;
        }
        bits -= params.log_w;
        output.push((total >> bits) & mask);
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::address::AddressType;
    use crate::params::{HashFunction, XMSS_SHA2_10_256, XMSS_SHA2_10_512};

    fn ots_address(keypair: u32) -> Address {
        Address::ots(&Address::new(), keypair)
    }

    #[test]
    fn test_base_w_conversion() {
        let params = XMSS_SHA2_10_256;
        let output = base_w(&params, &[0xAB, 0xCD], 4);
        assert_eq!(output, vec![0xA, 0xB, 0xC, 0xD]);
    }

    #[test]
    fn test_base_w_truncates() {
        let params = XMSS_SHA2_10_256;
        let output = base_w(&params, &[0x12, 0x34], 3);
        assert_eq!(output, vec![0x1, 0x2, 0x3]);
    }

    #[test]
    fn test_base_w_w4() {
        let params = Params::derive(0, "w4", HashFunction::Sha256, 32, 4, 4, 32);
        let output = base_w(&params, &[0b1110_0100], 4);
        assert_eq!(output, vec![3, 2, 1, 0]);
    }

    #[test]
    fn test_checksum_all_zero_digest() {
        // csum = 64 * 15 = 960 = 0x3C0
        let params = XMSS_SHA2_10_256;
        let lengths = chain_lengths(&params, &[0u8; 32]);
        assert_eq!(lengths.len(), params.wots_len);
        assert!(lengths[..64].iter().all(|&d| d == 0));
        assert_eq!(&lengths[64..], &[3, 12, 0]);
    }

    #[test]
    fn test_checksum_all_max_digest() {
        let params = XMSS_SHA2_10_256;
        let lengths = chain_lengths(&params, &[0xFF; 32]);
        assert!(lengths[..64].iter().all(|&d| d == 15));
        assert_eq!(&lengths[64..], &[0, 0, 0]);
    }

    #[test]
    fn test_checksum_n64() {
        // csum = 128 * 15 = 1920 = 0x780
        let params = XMSS_SHA2_10_512;
        let lengths = chain_lengths(&params, &[0u8; 64]);
        assert_eq!(lengths.len(), 131);
        assert_eq!(&lengths[128..], &[7, 8, 0]);
    }

    #[test]
    fn test_checksum_w4() {
        // len1 = 128, len2 = 5; csum = 128 * 3 = 384 = 0b01_10_00_00_00
        let params = Params::derive(0, "w4", HashFunction::Sha256, 32, 4, 4, 32);
        let lengths = chain_lengths(&params, &[0u8; 32]);
        assert_eq!(lengths.len(), 133);
        assert_eq!(&lengths[128..], &[1, 2, 0, 0, 0]);
    }

    #[test]
    fn test_chain_zero_steps() {
        let params = XMSS_SHA2_10_256;
        let pub_seed = vec![0u8; params.n];
        let x = vec![42u8; params.n];
        let mut adrs = ots_address(0);

        let result = gen_chain(&params, &x, 0, 0, &pub_seed, &mut adrs);
        assert_eq!(result, x);
    }

    #[test]
    fn test_chain_additivity() {
        // chain(x, 0, 5) == chain(chain(x, 0, 3), 3, 2)
        let params = XMSS_SHA2_10_256;
        let pub_seed = vec![0u8; params.n];
        let x = vec![1u8; params.n];

        let result1 = gen_chain(&params, &x, 0, 5, &pub_seed, &mut ots_address(0));
        let intermediate = gen_chain(&params, &x, 0, 3, &pub_seed, &mut ots_address(0));
        let result2 = gen_chain(&params, &intermediate, 3, 2, &pub_seed, &mut ots_address(0));

        assert_eq!(result1, result2);
    }

    #[test]
    fn test_chain_stops_at_w_minus_one() {
        let params = XMSS_SHA2_10_256;
        let pub_seed = vec![0u8; params.n];
        let x = vec![1u8; params.n];

        let mut full_adrs = ots_address(0);
        let mut over_adrs = ots_address(0);
        let full = gen_chain(&params, &x, 0, 15, &pub_seed, &mut full_adrs);
        let over = gen_chain(&params, &x, 0, 40, &pub_seed, &mut over_adrs);
        assert_eq!(full, over);
        assert_eq!(over_adrs.hash(), 14);
        assert_eq!(full_adrs, over_adrs);

        // Resuming at the end of the chain is a no-op
        let resumed = gen_chain(&params, &full, 15, 3, &pub_seed, &mut ots_address(0));
        assert_eq!(resumed, full);
    }

    #[test]
    fn test_chain_sets_hash_address() {
        let params = XMSS_SHA2_10_256;
        let pub_seed = vec![0u8; params.n];
        let mut adrs = ots_address(0);

        gen_chain(&params, &[0u8; 32], 2, 4, &pub_seed, &mut adrs);
        assert_eq!(adrs.hash(), 5);
        assert_eq!(adrs.addr_type(), AddressType::Ots as u32);
    }

    #[test]
    fn test_wots_pk_gen_deterministic() {
        let params = XMSS_SHA2_10_256;
        let seed = vec![1u8; params.n];
        let pub_seed = vec![2u8; params.n];

        let pk1 = wots_pk_gen(&params, &seed, &pub_seed, &mut ots_address(0));
        let pk2 = wots_pk_gen(&params, &seed, &pub_seed, &mut ots_address(0));

        assert_eq!(pk1, pk2);
        assert_eq!(pk1.len(), params.wots_len);
        assert!(pk1.iter().all(|p| p.len() == params.n));
    }

    #[test]
    fn test_wots_sign_verify_roundtrip() {
        let params = XMSS_SHA2_10_256;
        let seed = vec![1u8; params.n];
        let pub_seed = vec![2u8; params.n];
        let msg: Vec<u8> = (0..params.n as u8).collect();

        let pk = wots_pk_gen(&params, &seed, &pub_seed, &mut ots_address(3));
        let sig = wots_sign(&params, &msg, &seed, &pub_seed, &mut ots_address(3));
        let recovered = wots_pk_from_sig(&params, &sig, &msg, &pub_seed, &mut ots_address(3));

        assert_eq!(sig.len(), params.wots_len);
        assert_eq!(pk, recovered);
    }

    #[test]
    fn test_wots_roundtrip_w4() {
        let params = Params::derive(0, "w4", HashFunction::Sha256, 32, 4, 4, 32);
        let seed = vec![5u8; params.n];
        let pub_seed = vec![6u8; params.n];
        let msg = vec![0x5Au8; params.n];

        let pk = wots_pk_gen(&params, &seed, &pub_seed, &mut ots_address(0));
        let sig = wots_sign(&params, &msg, &seed, &pub_seed, &mut ots_address(0));
        let recovered = wots_pk_from_sig(&params, &sig, &msg, &pub_seed, &mut ots_address(0));

        assert_eq!(pk.len(), 133);
        assert_eq!(pk, recovered);
    }

    #[test]
    fn test_wots_signature_element_at_digit_zero_is_secret() {
        // A zero digit reveals the chain start, so sig_0 == PRF_keygen(seed, 0)
        let params = XMSS_SHA2_10_256;
        let seed = vec![1u8; params.n];
        let pub_seed = vec![2u8; params.n];
        let msg = vec![0u8; params.n];

        let sig = wots_sign(&params, &msg, &seed, &pub_seed, &mut ots_address(0));
        assert_eq!(sig[0], chain_secret(&params, &seed, 0));
    }

    #[test]
    fn test_wots_different_keypairs() {
        let params = XMSS_SHA2_10_256;
        let seed = vec![1u8; params.n];
        let pub_seed = vec![2u8; params.n];

        let pk1 = wots_pk_gen(&params, &seed, &pub_seed, &mut ots_address(0));
        let pk2 = wots_pk_gen(&params, &seed, &pub_seed, &mut ots_address(1));

        assert_ne!(pk1, pk2);
    }

    #[test]
    fn test_wots_wrong_message() {
        let params = XMSS_SHA2_10_256;
        let seed = vec![1u8; params.n];
        let pub_seed = vec![2u8; params.n];
        let msg = vec![3u8; params.n];
        let wrong_msg = vec![4u8; params.n];

        let pk = wots_pk_gen(&params, &seed, &pub_seed, &mut ots_address(0));
        let sig = wots_sign(&params, &msg, &seed, &pub_seed, &mut ots_address(0));
        let recovered =
            wots_pk_from_sig(&params, &sig, &wrong_msg, &pub_seed, &mut ots_address(0));

        assert_ne!(pk, recovered);
    }
}
