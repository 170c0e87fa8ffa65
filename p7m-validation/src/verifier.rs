// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! CMS signature verification.

use p256::elliptic_curve::sec1::ToEncodedPoint;
use rsa::pkcs8::DecodePublicKey as _;
use rsa::{Pkcs1v15Sign, RsaPublicKey};
use sha2::{Sha256, Sha384, Sha512};
use signature::Verifier;
use std::fmt::Write as _;

use p7m_cms::{Oid, SignerIdentifier, SignerInfo};

use crate::algorithms::{DigestAlgorithm, SignatureAlgorithm};
use crate::certificate::find_certificate;
use crate::{SignerVerification, TrustStore, VerificationResult};

/// Verify one SignerInfo against the encapsulated content.
///
/// `content_type` is the envelope's eContentType, checked against the
/// signer's content-type attribute when signed attributes are present.
/// `reference_time` is an explicit unix timestamp; the verifier never reads
/// a clock.
pub fn verify_signer(
    signer: &SignerInfo,
    content: &[u8],
    content_type: &Oid,
    envelope_certs: &[Vec<u8>],
    trust_store: &TrustStore,
    reference_time: i64,
) -> SignerVerification {
    let report = |signer_id: String, result| SignerVerification { signer_id, result };

    let digest_alg = match DigestAlgorithm::from_oid(&signer.digest_algorithm.algorithm) {
        Some(a) => a,
        None => return report(describe_signer(signer), VerificationResult::UnsupportedAlgorithm),
    };
    let sig_alg = match SignatureAlgorithm::from_oid(&signer.signature_algorithm.algorithm) {
        Some(a) => a,
        None => return report(describe_signer(signer), VerificationResult::UnsupportedAlgorithm),
    };

    let cert = match find_certificate(&signer.sid, envelope_certs, trust_store.certs()) {
        Some(c) => c,
        None => return report(describe_signer(signer), VerificationResult::UnknownSigner),
    };
    let signer_id = cert.subject_string();

    if !cert.valid_at(reference_time) {
        return report(signer_id, VerificationResult::CertificateExpired);
    }

    // RFC 5652 §5.4: with signed attributes, the signature covers the
    // DER SET OF attributes and the message-digest attribute must match the
    // content digest; without them, the signature covers the content.
    let message = match &signer.signed_attrs {
        Some(attrs) => {
            let content_digest = digest_alg.digest(content);
            if attrs.message_digest.as_deref() != Some(content_digest.as_slice()) {
                return report(signer_id, VerificationResult::DigestMismatch);
            }
            if let Some(declared) = &attrs.content_type {
                if declared != content_type {
                    return report(signer_id, VerificationResult::DigestMismatch);
                }
            }
            retag_signed_attributes(&attrs.raw)
        }
        None => content.to_vec(),
    };

    let result = verify_signature(sig_alg, digest_alg, cert.spki_der(), &message, &signer.signature);
    report(signer_id, result)
}

/// Human-readable form of a signer identifier, used when no certificate
/// could be located.
pub fn describe_signer(signer: &SignerInfo) -> String {
    match &signer.sid {
        SignerIdentifier::IssuerAndSerial { serial, .. } => {
            format!("issuer-and-serial:{}", hex_string(serial))
        }
        SignerIdentifier::SubjectKeyIdentifier(ski) => {
            format!("subject-key-id:{}", hex_string(ski))
        }
    }
}

fn hex_string(bytes: &[u8]) -> String {
    bytes.iter().fold(String::with_capacity(bytes.len() * 2), |mut s, b| {
        let _ = write!(s, "{b:02x}");
        s
    })
}

/// The signed-attributes block as the signature message: the wire bytes
/// with the `[0] IMPLICIT` identifier replaced by `SET OF`, body untouched.
/// Producers keep the body DER-encoded even inside BER envelopes, so no
/// re-encoding is needed.
fn retag_signed_attributes(raw: &[u8]) -> Vec<u8> {
    let mut message = raw.to_vec();
    if let Some(first) = message.first_mut() {
        *first = 0x31;
    }
    message
}

fn verify_signature(
    sig_alg: SignatureAlgorithm,
    digest_alg: DigestAlgorithm,
    spki_der: &[u8],
    message: &[u8],
    signature: &[u8],
) -> VerificationResult {
    match sig_alg {
        SignatureAlgorithm::RsaPkcs1 => {
            verify_rsa_prehash(digest_alg, spki_der, message, signature)
        }
        SignatureAlgorithm::RsaPkcs1Sha256 => {
            verify_rsa_prehash(DigestAlgorithm::Sha256, spki_der, message, signature)
        }
        SignatureAlgorithm::RsaPkcs1Sha384 => {
            verify_rsa_prehash(DigestAlgorithm::Sha384, spki_der, message, signature)
        }
        SignatureAlgorithm::RsaPkcs1Sha512 => {
            verify_rsa_prehash(DigestAlgorithm::Sha512, spki_der, message, signature)
        }
        SignatureAlgorithm::EcdsaP256Sha256 => verify_ecdsa_p256(spki_der, message, signature),
        SignatureAlgorithm::EcdsaP384Sha384 => verify_ecdsa_p384(spki_der, message, signature),
        SignatureAlgorithm::EcdsaP521Sha512 => verify_ecdsa_p521(spki_der, message, signature),
    }
}

fn verify_rsa_prehash(
    digest_alg: DigestAlgorithm,
    spki_der: &[u8],
    message: &[u8],
    signature: &[u8],
) -> VerificationResult {
    let key = match RsaPublicKey::from_public_key_der(spki_der) {
        Ok(k) => k,
        // Not an RSA key: the declared algorithm cannot apply to this
        // certificate.
        Err(_) => return VerificationResult::UnsupportedAlgorithm,
    };
    let prehash = digest_alg.digest(message);
    let scheme = match digest_alg {
        DigestAlgorithm::Sha256 => Pkcs1v15Sign::new::<Sha256>(),
        DigestAlgorithm::Sha384 => Pkcs1v15Sign::new::<Sha384>(),
        DigestAlgorithm::Sha512 => Pkcs1v15Sign::new::<Sha512>(),
    };
    match key.verify(scheme, &prehash, signature) {
        Ok(()) => VerificationResult::Valid,
        Err(_) => VerificationResult::InvalidSignature,
    }
}

fn verify_ecdsa_p256(spki_der: &[u8], message: &[u8], signature: &[u8]) -> VerificationResult {
    let pk = match p256::PublicKey::from_public_key_der(spki_der) {
        Ok(k) => k,
        Err(_) => return VerificationResult::UnsupportedAlgorithm,
    };
    let ep = pk.to_encoded_point(false);
    let vk = match p256::ecdsa::VerifyingKey::from_sec1_bytes(ep.as_bytes()) {
        Ok(k) => k,
        Err(_) => return VerificationResult::UnsupportedAlgorithm,
    };
    // CMS carries ECDSA signatures DER-encoded.
    let sig = match p256::ecdsa::Signature::from_der(signature) {
        Ok(s) => s,
        Err(_) => return VerificationResult::InvalidSignature,
    };
    match vk.verify(message, &sig) {
        Ok(()) => VerificationResult::Valid,
        Err(_) => VerificationResult::InvalidSignature,
    }
}

fn verify_ecdsa_p384(spki_der: &[u8], message: &[u8], signature: &[u8]) -> VerificationResult {
    let pk = match p384::PublicKey::from_public_key_der(spki_der) {
        Ok(k) => k,
        Err(_) => return VerificationResult::UnsupportedAlgorithm,
    };
    let ep = pk.to_encoded_point(false);
    let vk = match p384::ecdsa::VerifyingKey::from_sec1_bytes(ep.as_bytes()) {
        Ok(k) => k,
        Err(_) => return VerificationResult::UnsupportedAlgorithm,
    };
    let sig = match p384::ecdsa::Signature::from_der(signature) {
        Ok(s) => s,
        Err(_) => return VerificationResult::InvalidSignature,
    };
    match vk.verify(message, &sig) {
        Ok(()) => VerificationResult::Valid,
        Err(_) => VerificationResult::InvalidSignature,
    }
}

fn verify_ecdsa_p521(spki_der: &[u8], message: &[u8], signature: &[u8]) -> VerificationResult {
    let pk = match p521::PublicKey::from_public_key_der(spki_der) {
        Ok(k) => k,
        Err(_) => return VerificationResult::UnsupportedAlgorithm,
    };
    let ep = pk.to_encoded_point(false);
    let vk = match p521::ecdsa::VerifyingKey::from_sec1_bytes(ep.as_bytes()) {
        Ok(k) => k,
        Err(_) => return VerificationResult::UnsupportedAlgorithm,
    };
    let sig = match p521::ecdsa::Signature::from_der(signature) {
        Ok(s) => s,
        Err(_) => return VerificationResult::InvalidSignature,
    };
    match vk.verify(message, &sig) {
        Ok(()) => VerificationResult::Valid,
        Err(_) => VerificationResult::InvalidSignature,
    }
}
