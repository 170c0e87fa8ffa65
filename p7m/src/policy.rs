// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Extraction policy settings.

use p7m_cms::Oid;

/// How many signers must verify before content is released.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum SignerAcceptance {
    /// At least one signer must be `Valid`. This is the common posture for
    /// e-invoice envelopes, which routinely carry re-signatures.
    #[default]
    AnyValid,
    /// Every signer must be `Valid`.
    AllValid,
}

/// What the caller requires of an envelope before its content is released.
///
/// The default policy rejects by default: content comes out only when the
/// signature verifies. Use [`ExtractionPolicy::lenient`] for inspection
/// tools that want the payload regardless.
#[derive(Debug, Clone)]
pub struct ExtractionPolicy {
    /// Withhold content unless signers satisfy [`Self::signer_acceptance`].
    pub require_valid_signature: bool,
    pub signer_acceptance: SignerAcceptance,
    /// Digest algorithm OIDs the caller accepts; empty means every
    /// supported algorithm.
    pub allowed_digest_algorithms: Vec<Oid>,
    /// Signature algorithm OIDs the caller accepts; empty means every
    /// supported algorithm.
    pub allowed_signature_algorithms: Vec<Oid>,
}

impl Default for ExtractionPolicy {
    fn default() -> Self {
        Self {
            require_valid_signature: true,
            signer_acceptance: SignerAcceptance::default(),
            allowed_digest_algorithms: Vec::new(),
            allowed_signature_algorithms: Vec::new(),
        }
    }
}

impl ExtractionPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    /// A policy that releases content even when no signature verifies.
    /// The per-signer report is still produced.
    pub fn lenient() -> Self {
        Self { require_valid_signature: false, ..Self::default() }
    }

    pub fn with_signer_acceptance(mut self, acceptance: SignerAcceptance) -> Self {
        self.signer_acceptance = acceptance;
        self
    }

    pub fn with_allowed_digest_algorithms(mut self, oids: Vec<Oid>) -> Self {
        self.allowed_digest_algorithms = oids;
        self
    }

    pub fn with_allowed_signature_algorithms(mut self, oids: Vec<Oid>) -> Self {
        self.allowed_signature_algorithms = oids;
        self
    }

    pub(crate) fn digest_algorithm_allowed(&self, oid: &Oid) -> bool {
        self.allowed_digest_algorithms.is_empty() || self.allowed_digest_algorithms.contains(oid)
    }

    pub(crate) fn signature_algorithm_allowed(&self, oid: &Oid) -> bool {
        self.allowed_signature_algorithms.is_empty()
            || self.allowed_signature_algorithms.contains(oid)
    }
}
