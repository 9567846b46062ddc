use actix_web::{App, HttpServer, middleware::Logger};
use dotenv::dotenv;
use log::{info, warn};
use rustls::crypto::{CryptoProvider, ring::default_provider};

mod config;
mod spa;
mod tls;
mod utils;

use config::StaticConfig;
use utils::logger;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    logger::init();

    // -------- rustls provider global -------------------------------------------
    if CryptoProvider::install_default(default_provider()).is_err() {
        warn!("a rustls crypto provider was already installed");
    }

    let cfg = StaticConfig::from_env()?;
    if !cfg.dist.join("index.html").exists() {
        warn!("{} has no index.html, run `trunk build` first", cfg.dist.display());
    }
    info!("serving {}", cfg.dist.display());

    let dist = cfg.dist.clone();
    let server = HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .configure(spa::configure(dist.clone()))
    });

    // -------- TLS si certificat + clé lisibles, sinon HTTP ---------------------
    let tls_cfg = match &cfg.tls {
        Some(paths) => match tls::rustls_config(paths) {
            Ok(tls_cfg) => Some(tls_cfg),
            Err(e) => {
                warn!("TLS disabled: {e:#}");
                None
            }
        },
        None => None,
    };

    let addr = (cfg.host.as_str(), cfg.port);
    let server = match tls_cfg {
        Some(tls_cfg) => {
            info!("listening on https://{}:{}", cfg.host, cfg.port);
            server.bind_rustls_0_23(addr, tls_cfg)?
        }
        None => {
            info!("listening on http://{}:{}", cfg.host, cfg.port);
            server.bind(addr)?
        }
    };

    server.run().await?;
    Ok(())
}
