// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Envelope extraction: decode, map, verify, release.

use std::fmt;

use p7m_asn1::DecodeError;
use p7m_cms::{MapError, Oid, SignerInfo};
use p7m_validation::{
    describe_signer, verify_signer, SignerVerification, TrustStore, VerificationResult,
};

use crate::policy::{ExtractionPolicy, SignerAcceptance};

/// A successful extraction: the payload bytes, exactly as carried by the
/// envelope, plus the per-signer verification report.
#[derive(Debug, Clone)]
pub struct Extraction {
    /// The encapsulated content, byte for byte. For FatturaPA envelopes
    /// this is the invoice XML.
    pub content: Vec<u8>,
    /// The declared eContentType. Almost always id-data; callers that care
    /// should check before interpreting the bytes.
    pub content_type: Oid,
    pub signers: Vec<SignerVerification>,
}

/// Why an envelope yields no content.
///
/// The three variants call for different remediation: `Decode` means the
/// file is not BER at all, `Map` means it is ASN.1 but not a usable
/// SignedData, and `SignatureNotTrusted` means the structure is fine but
/// the policy refused to release the payload.
#[derive(Debug)]
pub enum ExtractionError {
    Decode(DecodeError),
    Map(MapError),
    /// No content is carried here: a payload that failed verification must
    /// not leak through the error path.
    SignatureNotTrusted(Vec<SignerVerification>),
}

impl fmt::Display for ExtractionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtractionError::Decode(e) => write!(f, "envelope is not valid BER: {e}"),
            ExtractionError::Map(e) => write!(f, "envelope is not a usable SignedData: {e}"),
            ExtractionError::SignatureNotTrusted(signers) => {
                write!(f, "signature verification failed for all required signers:")?;
                for signer in signers {
                    write!(f, " [{} -> {}]", signer.signer_id, signer.result)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ExtractionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ExtractionError::Decode(e) => Some(e),
            ExtractionError::Map(e) => Some(e),
            ExtractionError::SignatureNotTrusted(_) => None,
        }
    }
}

impl From<DecodeError> for ExtractionError {
    fn from(e: DecodeError) -> Self {
        ExtractionError::Decode(e)
    }
}

impl From<MapError> for ExtractionError {
    fn from(e: MapError) -> Self {
        ExtractionError::Map(e)
    }
}

/// Extract the payload of a `.p7m` envelope.
///
/// Decodes `envelope` as BER, maps it to SignedData, verifies every signer
/// against the envelope certificates and `trust_store` at `reference_time`,
/// then applies `policy`. When the policy requires a valid signature and no
/// acceptable signer verifies, the content is withheld and the per-signer
/// report is returned in [`ExtractionError::SignatureNotTrusted`].
pub fn extract(
    envelope: &[u8],
    trust_store: &TrustStore,
    reference_time: i64,
    policy: &ExtractionPolicy,
) -> Result<Extraction, ExtractionError> {
    let root = p7m_asn1::decode(envelope)?;
    let signed_data = p7m_cms::map(&root)?;
    let content = signed_data.encap_content_info.require_content()?.to_vec();
    let content_type = signed_data.encap_content_info.content_type.clone();

    let signers: Vec<SignerVerification> = signed_data
        .signer_infos
        .iter()
        .map(|signer| {
            verify_one(
                signer,
                &content,
                &content_type,
                &signed_data.certificates,
                trust_store,
                reference_time,
                policy,
            )
        })
        .collect();

    if policy.require_valid_signature && !accepted(&signers, policy.signer_acceptance) {
        return Err(ExtractionError::SignatureNotTrusted(signers));
    }

    Ok(Extraction { content, content_type, signers })
}

/// Policy algorithm filters run before any cryptography: a signer outside
/// the allow-lists is reported, not verified.
fn verify_one(
    signer: &SignerInfo,
    content: &[u8],
    content_type: &Oid,
    envelope_certs: &[Vec<u8>],
    trust_store: &TrustStore,
    reference_time: i64,
    policy: &ExtractionPolicy,
) -> SignerVerification {
    if !policy.digest_algorithm_allowed(&signer.digest_algorithm.algorithm)
        || !policy.signature_algorithm_allowed(&signer.signature_algorithm.algorithm)
    {
        return SignerVerification {
            signer_id: describe_signer(signer),
            result: VerificationResult::UnsupportedAlgorithm,
        };
    }
    verify_signer(signer, content, content_type, envelope_certs, trust_store, reference_time)
}

fn accepted(signers: &[SignerVerification], acceptance: SignerAcceptance) -> bool {
    match acceptance {
        SignerAcceptance::AnyValid => signers.iter().any(SignerVerification::is_valid),
        SignerAcceptance::AllValid => {
            !signers.is_empty() && signers.iter().all(SignerVerification::is_valid)
        }
    }
}
