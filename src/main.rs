mod api;
mod catalog;
mod config;
mod dto;
mod error;
mod generator;
mod index;
mod index_config;
mod lifecycle;

use crate::catalog::Catalog;
use crate::config::AppConfig;
use crate::index::TantivyIndexBuilder;
use crate::lifecycle::{Lifecycle, Phase};

pub type Result<T, E = crate::error::Error> = std::result::Result<T, E>;

pub struct AppState {
    pub config: AppConfig,
    pub catalog: Catalog,
}

impl AppState {
    pub fn from_config(config: AppConfig) -> crate::Result<Self> {
        let count = config.dataset.product_count;
        log::info!("Generating {} product records...", count);
        let products = match config.dataset.seed {
            Some(seed) => generator::generate_products_seeded(count, seed),
            None => generator::generate_products(count),
        };

        log::info!("Indexing products...");
        let builder = TantivyIndexBuilder::create(&config.search)?;
        let catalog = Catalog::build(products, builder)?;
        log::info!("Indexing complete!");

        Ok(Self { config, catalog })
    }
}

async fn run(lifecycle: &mut Lifecycle) -> crate::Result<()> {
    let config = AppConfig::new()?;
    log::debug!("App config:\n{:#?}", &config);

    let state = AppState::from_config(config)?;
    api::run_server(state, lifecycle, crate::lifecycle::shutdown_signal()).await
}

#[actix_web::main]
async fn main() {
    if std::env::var_os("RUST_LOG").is_none() {
        std::env::set_var("RUST_LOG", "info");
    }
    pretty_env_logger::init();

    let mut lifecycle = Lifecycle::new();
    if let Err(err) = run(&mut lifecycle).await {
        if lifecycle.phase() == Phase::Initializing {
            let _ = lifecycle.advance(Phase::Stopped);
        }
        log::error!("Fatal: {:#}", err);
        std::process::exit(1);
    }
}
