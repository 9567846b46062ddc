//! Init d’`env_logger` : `RUST_LOG` gagne, sinon valeur par défaut.

use env_logger::Env;

const DEFAULT_FILTER: &str = "info,actix_web=info";

pub fn init() {
    env_logger::Builder::from_env(Env::default().default_filter_or(DEFAULT_FILTER)).init();
}
