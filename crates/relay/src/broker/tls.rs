//! CA bundle loading for the broker's TLS transport.
//!
//! The broker client reads the bundle itself from `ssl.ca.location`; this
//! module checks the file up front so a missing or corrupt bundle fails
//! producer creation with a clear error instead of surfacing later as an
//! opaque handshake failure.

use std::path::Path;

use rustls::RootCertStore;

use super::BrokerError;

/// Load the PEM CA bundle at `path` and return the number of usable certificates.
///
/// # Errors
///
/// Returns [`BrokerError::CaBundle`] if the file cannot be read or contains no
/// certificate that rustls can parse.
pub fn load_ca_bundle(path: &Path) -> Result<usize, BrokerError> {
    let invalid = |reason: String| BrokerError::CaBundle {
        path: path.display().to_string(),
        reason,
    };

    let pem = std::fs::read(path).map_err(|e| invalid(e.to_string()))?;
    let roots = parse_ca_bundle(&pem).map_err(invalid)?;
    Ok(roots.len())
}

/// Parse PEM-encoded CA certificates into a [`RootCertStore`].
fn parse_ca_bundle(pem: &[u8]) -> Result<RootCertStore, String> {
    let certs = rustls_pemfile::certs(&mut std::io::BufReader::new(pem))
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| format!("failed to parse PEM data: {e}"))?;

    if certs.is_empty() {
        return Err("no certificates found in PEM data".into());
    }

    let mut roots = RootCertStore::empty();
    let (added, ignored) = roots.add_parsable_certificates(certs);
    if added == 0 {
        return Err(format!("none of {ignored} certificates could be parsed"));
    }
    Ok(roots)
}
