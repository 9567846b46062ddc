use std::env;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8444;

#[derive(Clone, Debug, PartialEq)]
pub struct TlsPaths {
    pub cert: PathBuf,
    pub key: PathBuf,
}

#[derive(Clone, Debug, PartialEq)]
pub struct StaticConfig {
    pub host: String,
    pub port: u16,
    /// Output of `trunk build`.
    pub dist: PathBuf,
    /// Only set when both `TLS_CERT` and `TLS_KEY` are.
    pub tls: Option<TlsPaths>,
}

impl StaticConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let port = match get("STATIC_PORT") {
            Some(raw) => raw
                .parse()
                .with_context(|| format!("STATIC_PORT must be a port number, got `{raw}`"))?,
            None => DEFAULT_PORT,
        };
        let dist = get("STATIC_DIST")
            .map(PathBuf::from)
            .unwrap_or_else(|| Path::new(env!("CARGO_MANIFEST_DIR")).join("../frontend/dist"));
        let tls = match (get("TLS_CERT"), get("TLS_KEY")) {
            (Some(cert), Some(key)) => Some(TlsPaths { cert: cert.into(), key: key.into() }),
            _ => None,
        };

        Ok(Self {
            host: get("STATIC_HOST").unwrap_or_else(|| DEFAULT_HOST.into()),
            port,
            dist,
            tls,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let cfg = StaticConfig::from_lookup(lookup(&[])).unwrap();

        assert_eq!(cfg.host, "0.0.0.0");
        assert_eq!(cfg.port, 8444);
        assert!(cfg.dist.ends_with("frontend/dist"));
        assert_eq!(cfg.tls, None);
    }

    #[test]
    fn tls_needs_both_paths() {
        let half = StaticConfig::from_lookup(lookup(&[("TLS_CERT", "certs/cert.pem")])).unwrap();
        assert_eq!(half.tls, None);

        let full = StaticConfig::from_lookup(lookup(&[
            ("TLS_CERT", "certs/cert.pem"),
            ("TLS_KEY", "certs/key.pem"),
            ("STATIC_PORT", "9000"),
            ("STATIC_DIST", "/srv/console"),
        ]))
        .unwrap();
        assert_eq!(full.port, 9000);
        assert_eq!(full.dist, PathBuf::from("/srv/console"));
        assert_eq!(full.tls.unwrap().key, PathBuf::from("certs/key.pem"));
    }

    #[test]
    fn bad_port_is_rejected() {
        let err = StaticConfig::from_lookup(lookup(&[("STATIC_PORT", "http")])).unwrap_err();
        assert!(err.to_string().contains("STATIC_PORT"));
    }
}
