use clap::Parser;
use health_assistant::utils::error::{AppError, ErrorSeverity};
use health_assistant::utils::{logger, monitor::ProcessMonitor, validation::Validate};
use health_assistant::{server, CliConfig, ModelRegistry};

fn exit_with(e: &AppError) -> ! {
    tracing::error!(
        "❌ {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());

    let exit_code = match e.severity() {
        ErrorSeverity::Medium => 2, // model store unreachable
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    };
    std::process::exit(exit_code);
}

#[tokio::main]
async fn main() {
    let cli = CliConfig::parse();

    let config = match cli.resolve() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(1);
        }
    };

    logger::init_logger(config.logging.verbose, config.logging.format);
    tracing::info!("Starting health-assistant {}", env!("CARGO_PKG_VERSION"));
    tracing::debug!("Resolved config: {:?}", config);

    if let Err(e) = config.validate() {
        exit_with(&e);
    }

    let monitor = ProcessMonitor::new(config.monitoring.enabled);

    // Nothing is bound until every model has loaded.
    let registry = match ModelRegistry::from_config(&config).await {
        Ok(registry) => registry,
        Err(e) => exit_with(&e),
    };
    tracing::info!("✅ All models loaded");
    monitor.log_stats("model loading");

    if let Err(e) = server::serve(&config, registry, server::shutdown_signal()).await {
        exit_with(&e);
    }

    monitor.log_stats("shutdown");
    tracing::info!("Server stopped");
}
