// Copyright 2025 The Kappital Authors.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Self-signed certificate for the probe endpoint.
//!
//! The probe server is reachable before any cluster PKI exists, so the
//! engine mints its own serving certificate at startup: RSA-3072,
//! `O=Kappital, CN=kappital.com`, CA bit set, valid for ten years. The
//! key pair never touches disk.

use rcgen::{
    BasicConstraints, CertificateParams, DnType, ExtendedKeyUsagePurpose, IsCa, KeyPair,
    KeyUsagePurpose,
};
use rsa::pkcs8::EncodePrivateKey;
use rsa::RsaPrivateKey;
use thiserror::Error;

use crate::infrastructure::constants::{
    CERT_COMMON_NAME, CERT_ORGANIZATION, CERT_RSA_BITS, CERT_VALIDITY_DAYS,
};

#[derive(Debug, Error)]
pub enum CertError {
    #[error("key generation error: {0}")]
    KeyGeneration(String),

    #[error("certificate generation error: {0}")]
    Generation(String),
}

/// An in-memory certificate and key pair, kept in both PEM (logs,
/// diagnostics) and DER (rustls) encodings.
#[derive(Debug, Clone)]
pub struct SelfSignedCert {
    pub cert_pem: String,
    pub key_pem: String,
    pub cert_der: Vec<u8>,
    pub key_der: Vec<u8>,
}

impl SelfSignedCert {
    /// Mint the engine serving certificate.
    pub fn generate() -> Result<Self, CertError> {
        let mut rng = rand::rngs::OsRng;
        let rsa_key = RsaPrivateKey::new(&mut rng, CERT_RSA_BITS)
            .map_err(|e| CertError::KeyGeneration(format!("failed to generate RSA key: {e}")))?;
        let pkcs8 = rsa_key
            .to_pkcs8_der()
            .map_err(|e| CertError::KeyGeneration(format!("failed to encode RSA key: {e}")))?;
        let key_pair = KeyPair::try_from(pkcs8.as_bytes())
            .map_err(|e| CertError::KeyGeneration(format!("failed to load RSA key: {e}")))?;

        let mut params = CertificateParams::default();
        params
            .distinguished_name
            .push(DnType::OrganizationName, CERT_ORGANIZATION);
        params
            .distinguished_name
            .push(DnType::CommonName, CERT_COMMON_NAME);
        params.is_ca = IsCa::Ca(BasicConstraints::Unconstrained);
        params.key_usages = vec![
            KeyUsagePurpose::DigitalSignature,
            KeyUsagePurpose::KeyEncipherment,
            KeyUsagePurpose::KeyCertSign,
        ];
        params.extended_key_usages = vec![ExtendedKeyUsagePurpose::ServerAuth];

        let now = time::OffsetDateTime::now_utc();
        params.not_before = now;
        params.not_after = now + time::Duration::days(CERT_VALIDITY_DAYS);

        let cert = params
            .self_signed(&key_pair)
            .map_err(|e| CertError::Generation(format!("failed to self-sign: {e}")))?;

        Ok(SelfSignedCert {
            cert_pem: cert.pem(),
            key_pem: key_pair.serialize_pem(),
            cert_der: cert.der().to_vec(),
            key_der: key_pair.serialize_der(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // RSA-3072 generation is slow in debug builds; one shot covers the
    // whole construction path.
    #[test]
    fn test_generate_self_signed() {
        let cert = SelfSignedCert::generate().unwrap();
        assert!(cert.cert_pem.contains("BEGIN CERTIFICATE"));
        assert!(cert.key_pem.contains("BEGIN PRIVATE KEY"));
    }
}
