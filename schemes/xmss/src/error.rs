//! Error types for XMSS signature operations.

use thiserror::Error;

/// Errors that can occur during XMSS key generation, signing, and verification.
#[derive(Debug, Error)]
pub enum XmssError {
    /// No parameter set is registered under this OID.
    #[error("unknown parameter set OID {oid:#010x}")]
    UnknownParameterSet {
        /// The OID that failed to resolve.
        oid: u32,
    },

    /// No parameter set is registered under this name.
    #[error("unknown parameter set name '{name}'")]
    UnknownParameterName {
        /// The name that failed to resolve.
        name: String,
    },

    /// Every one-time key of this private key has been used.
    ///
    /// Not retryable: a new key pair has to be generated.
    #[error("private key exhausted after {limit} signatures")]
    KeyExhausted {
        /// Total number of signatures the key could produce (2^h).
        limit: u64,
    },

    /// The signature cannot be parsed for this parameter set.
    #[error("malformed signature: {reason}")]
    MalformedSignature {
        /// What is wrong with the signature.
        reason: &'static str,
    },

    /// The root recomputed from the signature differs from the public key.
    #[error("signature verification failed")]
    VerificationMismatch,

    /// The provided key is malformed or invalid.
    #[error("invalid key: {reason}")]
    InvalidKey {
        /// Description of the key issue.
        reason: &'static str,
    },

    /// Invalid input was provided to a function.
    #[error("invalid input for '{field}': {reason}")]
    InvalidInput {
        /// The name of the invalid field/parameter.
        field: &'static str,
        /// Description of why the input is invalid.
        reason: &'static str,
    },

    /// The advanced private key could not be written to durable storage.
    #[error("failed to persist private key state: {0}")]
    Persistence(#[from] std::io::Error),
}

impl XmssError {
    /// Returns `true` for the outcomes a verifier treats as "invalid signature".
    pub fn is_verification_failure(&self) -> bool {
        matches!(
            self,
            XmssError::VerificationMismatch | XmssError::MalformedSignature { .. }
        )
    }
}

/// Result type alias for XMSS operations.
pub type Result<T> = std::result::Result<T, XmssError>;
