// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Shared helpers for `p7m-validation` integration tests.
//!
//! Builds SignerInfo model values backed by real keys: `rcgen` self-signed
//! P-256 certificates, and RSA certificates over keys generated with the
//! `rsa` crate. A small DER builder produces the signed-attributes blocks.

#![allow(dead_code)]

use p256::pkcs8::DecodePrivateKey as _;
use rsa::pkcs8::EncodePrivateKey as _;
use sha2::{Digest as _, Sha256};
use signature::{SignatureEncoding as _, Signer as _};

use p7m_cms::{oid, AlgorithmIdentifier, Oid, SignedAttributes, SignerIdentifier, SignerInfo};

/// Reference time inside every rcgen default validity window (2023-11-14).
pub(crate) const REFERENCE_TIME: i64 = 1_700_000_000;

// ---------------------------------------------------------------------------
// DER builder (definite lengths only; test fixtures are always DER).

#[derive(Clone, Debug)]
pub(crate) enum Der {
    Primitive(u8, Vec<u8>),
    Constructed(u8, Vec<Der>),
    Raw(Vec<u8>),
}

impl Der {
    pub(crate) fn encode(&self) -> Vec<u8> {
        let mut out = Vec::new();
        self.encode_into(&mut out);
        out
    }

    fn encode_into(&self, out: &mut Vec<u8>) {
        match self {
            Der::Primitive(id, content) => {
                out.push(*id);
                push_length(out, content.len());
                out.extend_from_slice(content);
            }
            Der::Constructed(id, children) => {
                let mut body = Vec::new();
                for child in children {
                    child.encode_into(&mut body);
                }
                out.push(*id);
                push_length(out, body.len());
                out.extend_from_slice(&body);
            }
            Der::Raw(tlv) => out.extend_from_slice(tlv),
        }
    }
}

fn push_length(out: &mut Vec<u8>, len: usize) {
    if len < 0x80 {
        out.push(len as u8);
        return;
    }
    let bytes: Vec<u8> = len.to_be_bytes().iter().copied().skip_while(|&b| b == 0).collect();
    out.push(0x80 | bytes.len() as u8);
    out.extend_from_slice(&bytes);
}

pub(crate) fn seq(children: Vec<Der>) -> Der {
    Der::Constructed(0x30, children)
}

pub(crate) fn set(children: Vec<Der>) -> Der {
    Der::Constructed(0x31, children)
}

pub(crate) fn der_oid(content: &[u8]) -> Der {
    Der::Primitive(0x06, content.to_vec())
}

pub(crate) fn octets(content: &[u8]) -> Der {
    Der::Primitive(0x04, content.to_vec())
}

pub(crate) fn attribute(attr_type: &[u8], value: Der) -> Der {
    seq(vec![der_oid(attr_type), set(vec![value])])
}

// ---------------------------------------------------------------------------
// Test signers.

/// A self-signed certificate plus its P-256 signing key and the identifier
/// fields a SignerInfo would carry for it.
pub(crate) struct EcdsaSigner {
    pub(crate) cert_der: Vec<u8>,
    pub(crate) key: p256::ecdsa::SigningKey,
    pub(crate) issuer: Vec<u8>,
    pub(crate) serial: Vec<u8>,
}

pub(crate) fn make_ecdsa_signer() -> EcdsaSigner {
    let certified = rcgen::generate_simple_self_signed(["p7m.test".to_string()]).unwrap();
    let cert_der = certified.cert.der().to_vec();
    let key_der = certified.key_pair.serialize_der();
    let key = p256::ecdsa::SigningKey::from_pkcs8_der(&key_der).unwrap();

    let (issuer, serial) = issuer_and_serial_of(&cert_der);
    EcdsaSigner { cert_der, key, issuer, serial }
}

pub(crate) struct RsaSigner {
    pub(crate) cert_der: Vec<u8>,
    pub(crate) key: rsa::RsaPrivateKey,
    pub(crate) issuer: Vec<u8>,
    pub(crate) serial: Vec<u8>,
}

pub(crate) fn make_rsa_signer() -> RsaSigner {
    let key = rsa::RsaPrivateKey::new(&mut rand::thread_rng(), 2048).unwrap();
    let pkcs8 = key.to_pkcs8_der().unwrap();
    let key_pair = rcgen::KeyPair::try_from(pkcs8.as_bytes()).unwrap();
    let params = rcgen::CertificateParams::new(vec!["rsa.p7m.test".to_string()]).unwrap();
    let cert_der = params.self_signed(&key_pair).unwrap().der().to_vec();

    let (issuer, serial) = issuer_and_serial_of(&cert_der);
    RsaSigner { cert_der, key, issuer, serial }
}

fn issuer_and_serial_of(cert_der: &[u8]) -> (Vec<u8>, Vec<u8>) {
    let (_, cert) = x509_parser::parse_x509_certificate(cert_der).unwrap();
    (
        cert.tbs_certificate.issuer.as_raw().to_vec(),
        cert.tbs_certificate.raw_serial().to_vec(),
    )
}

// ---------------------------------------------------------------------------
// SignerInfo builders.

/// Signed-attributes block for `content`: returns the wire form (`[0]`
/// IMPLICIT) and the DER `SET OF` form the signature is computed over.
pub(crate) fn build_signed_attrs(content_digest: &[u8], content_type: &[u8]) -> (Vec<u8>, Vec<u8>) {
    let attrs = set(vec![
        attribute(oid::ID_CONTENT_TYPE, der_oid(content_type)),
        attribute(oid::ID_MESSAGE_DIGEST, octets(content_digest)),
    ]);
    let set_der = attrs.encode();
    let mut wire = set_der.clone();
    wire[0] = 0xA0;
    (wire, set_der)
}

fn signer_info_model(
    sid: SignerIdentifier,
    digest_alg: &[u8],
    signed_attrs: Option<SignedAttributes>,
    signature_alg: &[u8],
    signature: Vec<u8>,
) -> SignerInfo {
    SignerInfo {
        version: 1,
        sid,
        digest_algorithm: AlgorithmIdentifier { algorithm: Oid::from_content(digest_alg) },
        signed_attrs,
        signature_algorithm: AlgorithmIdentifier { algorithm: Oid::from_content(signature_alg) },
        signature,
        has_unsigned_attrs: false,
    }
}

/// SignerInfo for `content` signed with ECDSA P-256 / SHA-256.
pub(crate) fn ecdsa_signer_info(
    signer: &EcdsaSigner,
    content: &[u8],
    with_signed_attrs: bool,
) -> SignerInfo {
    let sid = SignerIdentifier::IssuerAndSerial {
        issuer: signer.issuer.clone(),
        serial: signer.serial.clone(),
    };
    let (signed_attrs, message) = if with_signed_attrs {
        let digest = Sha256::digest(content);
        let (wire, set_der) = build_signed_attrs(&digest, oid::ID_DATA);
        let attrs = SignedAttributes {
            raw: wire,
            message_digest: Some(digest.to_vec()),
            content_type: Some(Oid::from_content(oid::ID_DATA)),
        };
        (Some(attrs), set_der)
    } else {
        (None, content.to_vec())
    };

    let sig: p256::ecdsa::Signature = signer.key.sign(&message);
    signer_info_model(
        sid,
        oid::SHA_256,
        signed_attrs,
        oid::ECDSA_WITH_SHA256,
        sig.to_der().as_bytes().to_vec(),
    )
}

/// SignerInfo for `content` signed with RSA PKCS#1 v1.5 / SHA-256.
pub(crate) fn rsa_signer_info(signer: &RsaSigner, content: &[u8]) -> SignerInfo {
    let sid = SignerIdentifier::IssuerAndSerial {
        issuer: signer.issuer.clone(),
        serial: signer.serial.clone(),
    };
    let sk = rsa::pkcs1v15::SigningKey::<Sha256>::new(signer.key.clone());
    let signature = sk.sign(content).to_vec();
    signer_info_model(sid, oid::SHA_256, None, oid::SHA256_WITH_RSA, signature)
}
