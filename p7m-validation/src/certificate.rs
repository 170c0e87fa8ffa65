// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Certificate location and matching.

use p7m_cms::SignerIdentifier;
use x509_parser::certificate::X509Certificate;
use x509_parser::extensions::ParsedExtension;
use x509_parser::time::ASN1Time;

/// A parsed candidate certificate, borrowing its DER.
pub(crate) struct Candidate<'a> {
    pub(crate) cert: X509Certificate<'a>,
}

impl<'a> Candidate<'a> {
    fn parse(der: &'a [u8]) -> Option<Self> {
        let (_, cert) = x509_parser::parse_x509_certificate(der).ok()?;
        Some(Self { cert })
    }

    fn matches(&self, sid: &SignerIdentifier) -> bool {
        match sid {
            SignerIdentifier::IssuerAndSerial { issuer, serial } => {
                self.cert.tbs_certificate.issuer.as_raw() == issuer.as_slice()
                    && self.cert.tbs_certificate.raw_serial() == serial.as_slice()
            }
            SignerIdentifier::SubjectKeyIdentifier(ski) => {
                self.subject_key_identifier() == Some(ski.as_slice())
            }
        }
    }

    fn subject_key_identifier(&self) -> Option<&[u8]> {
        self.cert.extensions().iter().find_map(|ext| match ext.parsed_extension() {
            ParsedExtension::SubjectKeyIdentifier(ki) => Some(ki.0),
            _ => None,
        })
    }

    pub(crate) fn subject_string(&self) -> String {
        self.cert.subject().to_string()
    }

    /// SubjectPublicKeyInfo DER, as kept verbatim by the parser.
    pub(crate) fn spki_der(&self) -> &'a [u8] {
        self.cert.tbs_certificate.subject_pki.raw
    }

    /// Temporal validity against an explicit unix timestamp.
    pub(crate) fn valid_at(&self, reference_time: i64) -> bool {
        match ASN1Time::from_timestamp(reference_time) {
            Ok(at) => self.cert.validity().is_valid_at(at),
            Err(_) => false,
        }
    }
}

/// Locate the signer's certificate: envelope certificates first, then the
/// trust store. Unparseable candidates are skipped, not fatal.
pub(crate) fn find_certificate<'a>(
    sid: &SignerIdentifier,
    envelope_certs: &'a [Vec<u8>],
    trusted_certs: &'a [Vec<u8>],
) -> Option<Candidate<'a>> {
    envelope_certs
        .iter()
        .chain(trusted_certs.iter())
        .filter_map(|der| Candidate::parse(der))
        .find(|c| c.matches(sid))
}
