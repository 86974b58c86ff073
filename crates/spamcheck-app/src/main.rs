use anyhow::Result;
use clap::Parser;
use metrics_exporter_prometheus::PrometheusHandle;
use spamcheck_app::cli::{Cli, Commands};
use spamcheck_app::config::{AppConfig, Credential};
use spamcheck_app::server::run_server;
use spamcheck_app::state::AppState;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve(args) => {
            init_logging(args.verbose);

            let config = AppConfig::load(&args.config, &args)?;
            info!("Model: {}", config.classifier.model_dir.display());
            info!("Tokenizer: {}", config.classifier.tokenizer_dir.display());
            info!("LLM: {} ({})", config.llm.model, config.llm.base_url);

            let metrics_handle = init_metrics()?;

            let credential = args.api_key.clone().and_then(Credential::new);
            let state = AppState::from_config(&config, credential)
                .await?
                .with_metrics(metrics_handle);

            let addr = config.server.socket_addr()?;

            println!();
            println!("  Spam & Legitimacy Analyzer");
            println!();
            println!(
                "  Classifier:  {}",
                if state.classifier.is_ready() {
                    "ready"
                } else {
                    "unavailable"
                }
            );
            println!(
                "  Legitimacy:  {}",
                if state.credential.is_some() {
                    "ready"
                } else {
                    "GROQ_API_KEY not set"
                }
            );
            println!();
            println!("  Open http://{} in your browser", addr);
            println!();

            run_server(state, addr).await?;
        }
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        "spamcheck=debug,tower_http=debug"
    } else {
        "spamcheck=info,tower_http=warn"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn init_metrics() -> Result<PrometheusHandle> {
    use metrics_exporter_prometheus::PrometheusBuilder;

    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| anyhow::anyhow!("Failed to install metrics: {}", e))?;

    metrics::describe_counter!(
        "spamcheck_classifications_total",
        "Messages classified, by label"
    );
    metrics::describe_histogram!(
        "spamcheck_classification_latency_us",
        metrics::Unit::Microseconds,
        "Spam model inference latency in microseconds"
    );
    metrics::describe_counter!(
        "spamcheck_legitimacy_requests_total",
        "Legitimacy queries sent to the LLM, by outcome"
    );
    metrics::describe_counter!(
        "spamcheck_legitimacy_cache_hits_total",
        "Legitimacy checks answered from the cache"
    );

    info!("Metrics exporter initialized");
    Ok(handle)
}
