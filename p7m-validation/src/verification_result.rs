// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Verification result types.
//!
//! A structured result per signer rather than an error: a rejected
//! signature is information about trust, not a failure of the extraction
//! process, and callers need every signer's outcome to apply policy.

use std::fmt;

/// Outcome of verifying one SignerInfo.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerificationResult {
    /// The signature is cryptographically valid for the content.
    Valid,
    /// The signature does not verify against the signer's public key.
    InvalidSignature,
    /// No certificate matching the signer identifier was found in the
    /// envelope or the trust store.
    UnknownSigner,
    /// The signed attributes do not cover this content (message-digest or
    /// content-type disagreement).
    DigestMismatch,
    /// The declared digest/signature algorithm combination is not
    /// supported, or is excluded by policy.
    UnsupportedAlgorithm,
    /// The signer's certificate is outside its validity period at the
    /// reference time.
    CertificateExpired,
}

impl fmt::Display for VerificationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            VerificationResult::Valid => "valid",
            VerificationResult::InvalidSignature => "invalid signature",
            VerificationResult::UnknownSigner => "no matching certificate",
            VerificationResult::DigestMismatch => "message digest mismatch",
            VerificationResult::UnsupportedAlgorithm => "unsupported algorithm",
            VerificationResult::CertificateExpired => "certificate not valid at reference time",
        };
        f.write_str(s)
    }
}

/// One entry of the per-envelope verification report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignerVerification {
    /// Human-readable identification of the signer (certificate subject
    /// when one was located, otherwise the signer identifier).
    pub signer_id: String,
    pub result: VerificationResult,
}

impl SignerVerification {
    pub fn is_valid(&self) -> bool {
        self.result == VerificationResult::Valid
    }
}
