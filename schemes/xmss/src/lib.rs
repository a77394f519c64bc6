//! XMSS (eXtended Merkle Signature Scheme) - RFC 8391
//!
//! This crate provides an implementation of single-tree XMSS, the stateful
//! hash-based signature scheme standardized in RFC 8391 and approved for
//! post-quantum use in NIST SP 800-208.
//!
//! # Parameter Sets
//!
//! Twelve single-tree parameter sets are provided (w = 16):
//!
//! | Parameter Set | Hash | n | Signatures | Signature Size |
//! |---------------|------|---|------------|----------------|
//! | **XMSS-SHA2_10_256** | SHA-256 | 32 | 2^10 | 2,500 B |
//! | **XMSS-SHA2_16_256** | SHA-256 | 32 | 2^16 | 2,692 B |
//! | **XMSS-SHA2_20_256** | SHA-256 | 32 | 2^20 | 2,820 B |
//! | **XMSS-SHA2_10_512** | SHA-512 | 64 | 2^10 | 9,092 B |
//! | **XMSS-SHA2_16_512** | SHA-512 | 64 | 2^16 | 9,476 B |
//! | **XMSS-SHA2_20_512** | SHA-512 | 64 | 2^20 | 9,732 B |
//! | **XMSS-SHAKE_{10,16,20}_256** | SHAKE128 | 32 | 2^h | as SHA2_*_256 |
//! | **XMSS-SHAKE_{10,16,20}_512** | SHAKE256 | 64 | 2^h | as SHA2_*_512 |
//!
//! Key generation and every signature cost one pass over all 2^h leaves, so
//! the h = 16 and h = 20 sets are slow.
//!
//! # Example Usage
//!
//! ```rust
//! use pqsigs_xmss::{keygen, sign, verify, XMSS_SHA2_10_256};
//! use rand::rngs::OsRng;
//!
//! // Generate a key pair
//! let (public_key, mut private_key) = keygen(&mut OsRng, XMSS_SHA2_10_256);
//!
//! // Sign a message (advances the private key)
//! let message = b"Hello, post-quantum world!";
//! let signature = sign(&mut private_key, message).expect("key not exhausted");
//!
//! // Verify the signature
//! assert!(verify(&public_key, message, &signature).is_ok());
//! assert_eq!(private_key.index(), 1);
//! ```
//!
//! # Algorithm Overview
//!
//! XMSS is built from:
//!
//! - **WOTS+**: Winternitz One-Time Signature, one key pair per leaf
//! - **L-tree**: Compresses a WOTS+ public key into a single leaf
//! - **Merkle tree**: Binary hash tree over the 2^h leaves; its root is the
//!   public key
//!
//! ## Key Generation
//! 1. Generate random seeds: SK_SEED, SK_PRF, SEED
//! 2. Compute all 2^h leaves and the Merkle root with treehash
//! 3. Public key: (root, SEED)
//! 4. Private key: (idx = 0, SK_SEED, SK_PRF, SEED, root)
//!
//! ## Signing
//! 1. Reserve idx and advance the private key
//! 2. Compute randomizer r = PRF(SK_PRF, idx)
//! 3. Hash the message: H_msg(r, root, idx, M)
//! 4. Sign the digest with the WOTS+ key of leaf idx
//! 5. Return signature: (idx, r, SIG_WOTS, AUTH)
//!
//! ## Verification
//! 1. Recompute the message digest from idx and r
//! 2. Recover the WOTS+ public key and compress it to the leaf
//! 3. Walk the authentication path and compare with the root
//!
//! # State Management
//!
//! XMSS is **stateful**: reusing an index breaks security. Signing takes
//! `&mut PrivateKey`, and [`sign_persisted`] writes the advanced key through
//! a [`KeyStore`] before the signature exists.
//!
//! # Security Warning
//!
//! This implementation:
//! - Is NOT constant-time apart from the final root comparison
//! - Has NOT been audited by security professionals
//! - Should NOT be used in production systems
//!
//! Use only for learning, experimentation, and research.
//!
//! # References
//!
//! - RFC 8391: XMSS: eXtended Merkle Signature Scheme
//! - <https://www.rfc-editor.org/rfc/rfc8391>

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

pub mod address;
pub mod error;
pub mod hash;
pub mod keygen;
pub mod ltree;
pub mod params;
pub mod sign;
pub mod state;
pub mod treehash;
pub mod verify;
pub mod wots;

// Re-export main types and functions for convenience
pub use error::{Result, XmssError};
pub use keygen::{keygen, keygen_from_seed, PrivateKey, PublicKey};
pub use params::{
    ParamSet, Params, XMSS_SHA2_10_256, XMSS_SHA2_10_512, XMSS_SHA2_16_256, XMSS_SHA2_16_512,
    XMSS_SHA2_20_256, XMSS_SHA2_20_512, XMSS_SHAKE_10_256, XMSS_SHAKE_10_512, XMSS_SHAKE_16_256,
    XMSS_SHAKE_16_512, XMSS_SHAKE_20_256, XMSS_SHAKE_20_512,
};
pub use sign::{sign, sign_persisted, Signature};
pub use state::{FileKeyStore, KeyStore, MemoryKeyStore};
pub use verify::{open, verify, verify_bool, verify_bytes};
