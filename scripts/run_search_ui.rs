use std::sync::Arc;

use clap::Parser;

use ansa_adaptor_web::{SearchUiConfig, SearchUiServer};
use ansa_core::utils::logger::init_logging;
use ansa_core::{get_env_bool, get_env_float, get_env_int, get_env_or, load_env};
use ansa_core::{Dataset, FuzzyConfig, SearchConfig, SearchEngine};
use ansa_provider_inference::{HttpInferenceClient, InferenceBackend, InferenceConfig};

#[derive(Parser, Debug)]
struct Cli {
    #[arg(long, env = "ANSA_LOG_LEVEL", default_value = "info")]
    log_level: String,
    #[arg(long, env = "ANSA_DATASET_PATH")]
    dataset: Option<String>,
    #[arg(long, env = "ANSA_DATASET_URL")]
    dataset_url: Option<String>,
}

fn main() -> ansa_core::Result<()> {
    let rt = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .unwrap();
    rt.block_on(async move {
        let cli = Cli::parse();
        std::env::set_var("ANSA_LOG_LEVEL", &cli.log_level);
        init_logging();
        load_env().ok();

        let dataset = Arc::new(load_dataset(&cli).await);
        if dataset.is_empty() {
            tracing::warn!("Question snapshot is empty; searches will return no results");
        } else {
            tracing::info!(
                "Loaded {} questions ({}-dimensional embeddings)",
                dataset.len(),
                dataset.dimension()
            );
        }

        let search_config = SearchConfig {
            score_threshold: get_env_float("ANSA_SCORE_THRESHOLD", 0.25) as f64,
            ..Default::default()
        };
        let fuzzy_config = FuzzyConfig {
            threshold: get_env_float("ANSA_FUZZY_THRESHOLD", 0.6) as f64,
            ..Default::default()
        };
        let engine = Arc::new(SearchEngine::with_config(dataset, search_config, fuzzy_config));

        let backend: Arc<dyn InferenceBackend> =
            Arc::new(HttpInferenceClient::new(InferenceConfig::from_env())?);

        let ui_enabled = get_env_bool("ANSA_UI_ENABLED", true);
        let ui_host = get_env_or("ANSA_UI_HOST", "127.0.0.1");
        let ui_port_pref: u16 = get_env_int("ANSA_UI_PORT", 4000);
        let ui_port = {
            let mut port = ui_port_pref;
            let mut tried = 0u16;
            let limit = 200u16;
            loop {
                match std::net::TcpListener::bind((ui_host.as_str(), port)) {
                    Ok(l) => {
                        drop(l);
                        break port;
                    }
                    Err(_) => {
                        tried = tried.saturating_add(1);
                        if tried >= limit {
                            break ui_port_pref;
                        }
                        port = port.saturating_add(1);
                    }
                }
            }
        };

        let ui = SearchUiServer::new(
            SearchUiConfig {
                enabled: ui_enabled,
                host: ui_host.clone(),
                port: ui_port,
                min_query_len: get_env_int("ANSA_UI_MIN_QUERY_LEN", 4),
            },
            engine,
            backend,
        );
        ui.start().await?;

        println!("Search UI: http://{}:{}/", ui_host, ui_port);

        let mut term = tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()).ok();
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {},
            _ = async {
                if let Some(ref mut s) = term { s.recv().await; }
            } => {},
        }
        Ok(())
    })
}

async fn load_dataset(cli: &Cli) -> Dataset {
    let loaded = if let Some(ref path) = cli.dataset {
        Dataset::load_from_path(path)
    } else if let Some(ref url) = cli.dataset_url {
        Dataset::fetch(url).await
    } else {
        Dataset::load_from_path("data/questions.json")
    };
    match loaded {
        Ok(dataset) => dataset,
        Err(e) => {
            tracing::warn!("Snapshot load failed, continuing with an empty dataset: {}", e);
            Dataset::empty()
        }
    }
}
