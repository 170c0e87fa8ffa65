// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Algorithm identifier resolution and digest computation.

use p7m_cms::{oid, Oid};
use sha2::{Digest as _, Sha256, Sha384, Sha512};

/// Supported CMS digest algorithms.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum DigestAlgorithm {
    Sha256,
    Sha384,
    Sha512,
}

impl DigestAlgorithm {
    pub fn from_oid(oid: &Oid) -> Option<Self> {
        match oid.as_bytes() {
            b if b == oid::SHA_256 => Some(Self::Sha256),
            b if b == oid::SHA_384 => Some(Self::Sha384),
            b if b == oid::SHA_512 => Some(Self::Sha512),
            _ => None,
        }
    }

    pub fn digest(&self, data: &[u8]) -> Vec<u8> {
        match self {
            Self::Sha256 => Sha256::digest(data).to_vec(),
            Self::Sha384 => Sha384::digest(data).to_vec(),
            Self::Sha512 => Sha512::digest(data).to_vec(),
        }
    }
}

/// Supported CMS signature algorithms.
///
/// `RsaPkcs1` is the bare `rsaEncryption` OID many CAdES producers declare;
/// the hash is then taken from the signer's digest algorithm.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SignatureAlgorithm {
    RsaPkcs1,
    RsaPkcs1Sha256,
    RsaPkcs1Sha384,
    RsaPkcs1Sha512,
    EcdsaP256Sha256,
    EcdsaP384Sha384,
    EcdsaP521Sha512,
}

impl SignatureAlgorithm {
    pub fn from_oid(oid: &Oid) -> Option<Self> {
        match oid.as_bytes() {
            b if b == oid::RSA_ENCRYPTION => Some(Self::RsaPkcs1),
            b if b == oid::SHA256_WITH_RSA => Some(Self::RsaPkcs1Sha256),
            b if b == oid::SHA384_WITH_RSA => Some(Self::RsaPkcs1Sha384),
            b if b == oid::SHA512_WITH_RSA => Some(Self::RsaPkcs1Sha512),
            b if b == oid::ECDSA_WITH_SHA256 => Some(Self::EcdsaP256Sha256),
            b if b == oid::ECDSA_WITH_SHA384 => Some(Self::EcdsaP384Sha384),
            b if b == oid::ECDSA_WITH_SHA512 => Some(Self::EcdsaP521Sha512),
            _ => None,
        }
    }
}
