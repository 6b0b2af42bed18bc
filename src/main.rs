use clap::Parser;
use kafka_init::kafka::{ClusterAdmin, TopicSet};
use kafka_init::{Config, ReadinessCoordinator, Result};
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

#[derive(Parser, Debug)]
#[command(name = "kafka-init")]
#[command(about = "Kafka topic and schema registry readiness gate", long_about = None)]
struct Args {
    #[arg(short, long, value_name = "FILE", default_value = "config.toml")]
    config: PathBuf,

    #[arg(short, long, help = "Enable JSON output for logs")]
    json_logs: bool,

    #[arg(short, long, help = "Verbose logging")]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(args.json_logs, args.verbose);

    info!("Starting kafka-init");
    info!("Loading configuration from {:?}", args.config);

    let config = match Config::from_file(&args.config) {
        Ok(cfg) => {
            info!("Configuration loaded successfully");
            cfg
        }
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            return Err(e);
        }
    };

    info!(
        kafka_brokers = %config.kafka.brokers(),
        kafka_topics = ?config.kafka.topic_names,
        registry_url = %config.registry.url,
        retry_max_attempts = config.retry.max_attempts,
        retry_initial_delay_ms = config.retry.initial_delay_ms,
        "Configuration summary"
    );

    let topics = TopicSet::from_config(&config.kafka);
    let admin = ClusterAdmin::new(&config.kafka, &config.registry, &config.retry)?;
    let coordinator = ReadinessCoordinator::new(admin, topics, config.retry.clone());

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for shutdown signal: {}", e);
            std::future::pending::<()>().await;
        }
    };

    match coordinator.init_with_shutdown(shutdown).await {
        Ok(()) => {
            info!("Cluster is ready");
            Ok(())
        }
        Err(e) => {
            error!("Cluster readiness failed: {}", e);
            Err(e)
        }
    }
}

fn init_logging(json: bool, verbose: bool) {
    let env_filter = if verbose {
        EnvFilter::new("kafka_init=debug,info")
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("kafka_init=info,warn"))
    };

    let fmt_layer = if json {
        tracing_subscriber::fmt::layer()
            .json()
            .flatten_event(true)
            .with_current_span(false)
            .with_span_list(false)
            .boxed()
    } else {
        tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_thread_ids(false)
            .with_thread_names(false)
            .boxed()
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();
}
