// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Per-signer CMS signature verification.
//!
//! Verification is a pure function of its arguments: the signer structure,
//! the content bytes, the certificate sets, and an explicit reference time.
//! No clock is read and nothing is mutated, so signers can be verified
//! concurrently and results are reproducible.
//!
//! Trust outcomes are data, not errors: every signer gets a
//! [`VerificationResult`], and the caller's policy decides what to do with
//! the aggregate.

pub mod algorithms;
mod certificate;
pub mod trust_store;
pub mod verification_result;
pub mod verifier;

pub use algorithms::{DigestAlgorithm, SignatureAlgorithm};
pub use trust_store::TrustStore;
pub use verification_result::{SignerVerification, VerificationResult};
pub use verifier::{describe_signer, verify_signer};
