// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Read-only trusted certificate set.

/// Certificates the verifier may resolve signers against when the envelope
/// does not carry the signer's certificate.
///
/// The store is read-only once built; the verifier borrows it, so one store
/// can safely back many concurrent extraction calls.
#[derive(Debug, Clone, Default)]
pub struct TrustStore {
    certs: Vec<Vec<u8>>,
}

impl TrustStore {
    /// An empty store: only envelope-attached certificates can match.
    pub fn new() -> Self {
        Self::default()
    }

    /// A store over the given DER certificates.
    pub fn from_der_certs(certs: Vec<Vec<u8>>) -> Self {
        Self { certs }
    }

    /// A store seeded from the platform's native root certificates.
    pub fn from_system_roots() -> Self {
        let roots = rustls_native_certs::load_native_certs();
        let certs = roots
            .certs
            .into_iter()
            .map(|c| c.as_ref().to_vec())
            .filter(|der| !der.is_empty())
            .collect();
        Self { certs }
    }

    pub fn add_der_cert(&mut self, der: Vec<u8>) {
        self.certs.push(der);
    }

    pub fn certs(&self) -> &[Vec<u8>] {
        &self.certs
    }

    pub fn is_empty(&self) -> bool {
        self.certs.is_empty()
    }
}
