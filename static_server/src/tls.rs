use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use rustls::pki_types::CertificateDer;
use rustls::server::ServerConfig;
use rustls_pemfile::{certs, private_key};

use crate::config::TlsPaths;

/// PEM chain + key → rustls config (no client auth).
pub fn rustls_config(paths: &TlsPaths) -> Result<ServerConfig> {
    let cert_pem = read(&paths.cert)?;
    let key_pem = read(&paths.key)?;

    let chain: Vec<CertificateDer<'static>> = certs(&mut &*cert_pem)
        .collect::<Result<_, _>>()
        .with_context(|| format!("bad certificate in {}", paths.cert.display()))?;
    if chain.is_empty() {
        return Err(anyhow!("no certificate in {}", paths.cert.display()));
    }
    let key = private_key(&mut &*key_pem)
        .with_context(|| format!("bad key in {}", paths.key.display()))?
        .ok_or_else(|| anyhow!("no private key in {}", paths.key.display()))?;

    let cfg = ServerConfig::builder()
        .with_no_client_auth()
        .with_single_cert(chain, key)?;
    Ok(cfg)
}

fn read(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).with_context(|| format!("cannot read {}", path.display()))
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn missing_files_are_reported() {
        let paths = TlsPaths { cert: "/nonexistent/cert.pem".into(), key: "/nonexistent/key.pem".into() };

        let err = rustls_config(&paths).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/cert.pem"));
    }

    #[test]
    fn pem_without_certificate_is_rejected() {
        let mut cert = tempfile::NamedTempFile::new().unwrap();
        writeln!(cert, "not a pem file").unwrap();
        let paths = TlsPaths { cert: cert.path().into(), key: cert.path().into() };

        let err = rustls_config(&paths).unwrap_err();
        assert!(err.to_string().contains("no certificate"));
    }
}
