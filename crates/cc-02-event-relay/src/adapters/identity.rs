//! # Client Identity and TLS
//!
//! Loads the relay's MSP identity (certificate + private key) and the peer's
//! CA, and builds the rustls client configuration used to reach the peer.
//! Every failure here is fatal: the relay cannot start without an identity.

use std::fs;
use std::io::BufReader;
use std::path::Path;
use std::sync::Arc;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use rustls::pki_types::{CertificateDer, PrivateKeyDer};
use rustls::{ClientConfig, RootCertStore};
use tracing::debug;

use crate::errors::RelayError;

/// The relay's ledger identity.
pub struct ClientIdentity {
    msp_id: String,
    certs: Vec<CertificateDer<'static>>,
    key: PrivateKeyDer<'static>,
}

impl std::fmt::Debug for ClientIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientIdentity")
            .field("msp_id", &self.msp_id)
            .field("certs", &self.certs.len())
            .finish_non_exhaustive()
    }
}

impl ClientIdentity {
    /// Load the certificate chain and private key from PEM files.
    pub fn load(msp_id: &str, cert_path: &Path, key_path: &Path) -> Result<Self, RelayError> {
        let certs = read_certs(cert_path)?;
        if certs.is_empty() {
            return Err(RelayError::Fatal(format!(
                "no certificate found in {}",
                cert_path.display()
            )));
        }

        let key_pem = read_file(key_path, "private key")?;
        let key = rustls_pemfile::private_key(&mut BufReader::new(key_pem.as_slice()))
            .map_err(|e| {
                RelayError::Fatal(format!("failed to parse private key {}: {e}", key_path.display()))
            })?
            .ok_or_else(|| {
                RelayError::Fatal(format!("no private key found in {}", key_path.display()))
            })?;

        debug!(msp_id, cert = %cert_path.display(), "Loaded client identity");
        Ok(Self {
            msp_id: msp_id.to_string(),
            certs,
            key,
        })
    }

    /// MSP the identity belongs to.
    pub fn msp_id(&self) -> &str {
        &self.msp_id
    }

    /// Leaf certificate, base64 DER, for the `x-client-cert` header.
    pub fn certificate_header(&self) -> String {
        self.certs
            .first()
            .map(|cert| STANDARD.encode(cert.as_ref()))
            .unwrap_or_default()
    }

    /// Build a client config that trusts the CA at `ca_path` and presents
    /// this identity as the client certificate.
    pub fn tls_config(&self, ca_path: &Path) -> Result<Arc<ClientConfig>, RelayError> {
        let mut roots = RootCertStore::empty();
        for cert in read_certs(ca_path)? {
            roots
                .add(cert)
                .map_err(|e| RelayError::Fatal(format!("invalid CA certificate: {e}")))?;
        }
        if roots.is_empty() {
            return Err(RelayError::Fatal(format!(
                "no CA certificate found in {}",
                ca_path.display()
            )));
        }

        let provider = Arc::new(rustls::crypto::ring::default_provider());
        let config = ClientConfig::builder_with_provider(provider)
            .with_safe_default_protocol_versions()
            .map_err(|e| RelayError::Fatal(format!("TLS protocol setup failed: {e}")))?
            .with_root_certificates(roots)
            .with_client_auth_cert(self.certs.clone(), self.key.clone_key())
            .map_err(|e| RelayError::Fatal(format!("client certificate rejected: {e}")))?;

        Ok(Arc::new(config))
    }
}

fn read_file(path: &Path, what: &str) -> Result<Vec<u8>, RelayError> {
    fs::read(path).map_err(|e| RelayError::Fatal(format!("failed to read {what} {}: {e}", path.display())))
}

fn read_certs(path: &Path) -> Result<Vec<CertificateDer<'static>>, RelayError> {
    let pem = read_file(path, "certificate")?;
    rustls_pemfile::certs(&mut BufReader::new(pem.as_slice()))
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| RelayError::Fatal(format!("failed to parse certificate {}: {e}", path.display())))
}
