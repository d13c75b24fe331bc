//! CLI entrypoint for Chairman's Council
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, anyhow, bail};
use clap::Parser;
use council_application::{CouncilService, NoProgress, QueryStore};
use council_domain::{ConfigIssue, Severity};
use council_infrastructure::{
    ConfigLoader, FileConfig, InMemoryQueryStore, JsonlQueryStore, OpenRouterBackend,
    OpenRouterSettings, StaticTenantRegistry, StoreBackend,
};
use council_presentation::{
    AppState, AskArgs, Cli, Command, ConsoleFormatter, OutputFormat, ProgressReporter, ServeArgs,
    router,
};
use std::path::Path;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let _log_guard = init_tracing(cli.verbose, cli.log_dir.as_deref())?;

    info!("Starting Chairman's Council");

    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_deref())
    }
    .map_err(|e| anyhow!("failed to load configuration: {e}"))?;

    match cli.command {
        Command::ShowConfig => show_config(cli.config.as_deref(), &config),
        Command::Serve(args) => serve(config, args).await,
        Command::Ask(args) => ask(config, args).await,
    }
}

/// Console logging from `-v` (or `RUST_LOG`), optionally mirrored to daily files
fn init_tracing(verbose: u8, log_dir: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let filter = || match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => match verbose {
            0 => EnvFilter::new("warn"),
            1 => EnvFilter::new("info"),
            2 => EnvFilter::new("debug"),
            _ => EnvFilter::new("trace"), // -vvv or more
        },
    };

    let console = fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_filter(filter());

    let (file, guard) = match log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("failed to create log directory {}", dir.display()))?;
            let appender = tracing_appender::rolling::daily(dir, "chairman-council.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer()
                .with_ansi(false)
                .with_writer(writer)
                .with_filter(filter());
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(console)
        .with(file)
        .init();

    Ok(guard)
}

/// Log every issue; fail if any is an error
fn check_config(config: &FileConfig) -> Result<()> {
    let issues = config.validate();
    for issue in &issues {
        match issue.severity {
            Severity::Warning => warn!("{}", issue.message),
            Severity::Error => error!("{}", issue.message),
        }
    }
    if ConfigIssue::has_errors(&issues) {
        let messages: Vec<String> = issues
            .iter()
            .filter(|i| i.severity == Severity::Error)
            .map(|i| i.message.clone())
            .collect();
        bail!("invalid configuration:\n  {}", messages.join("\n  "));
    }
    Ok(())
}

// === Dependency Injection ===
fn build_service(config: &FileConfig) -> Result<CouncilService> {
    let settings = OpenRouterSettings::from_config(&config.provider).ok_or_else(|| {
        anyhow!(
            "provider API key missing: set ${} or provider.api_key",
            config.provider.api_key_env
        )
    })?;
    let backend = Arc::new(
        OpenRouterBackend::new(settings).context("failed to build the provider HTTP client")?,
    );
    let registry = Arc::new(StaticTenantRegistry::from_config(&config.tenants));

    let (members, _) = config.council.to_members();
    let (roles, _) = config.auth.role_table();
    let (specialties, _) = config.council.to_specialties(&members);

    let store: Arc<dyn QueryStore> = match config.store.backend {
        StoreBackend::Memory => Arc::new(InMemoryQueryStore::new()),
        StoreBackend::Jsonl => {
            let path = config.store.jsonl_path();
            Arc::new(
                JsonlQueryStore::open(&path)
                    .with_context(|| format!("failed to open query store {}", path.display()))?,
            )
        }
    };

    info!(
        members = members.len(),
        tenants = registry.len(),
        store = ?config.store.backend,
        "Council service configured"
    );

    Ok(CouncilService::new(
        backend,
        registry,
        members,
        roles,
        config.council.to_params(),
        &config.auth.to_params(),
    )
    .with_specialties(specialties)
    .with_store(store))
}

async fn serve(mut config: FileConfig, args: ServeArgs) -> Result<()> {
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    check_config(&config)?;

    let service = Arc::new(build_service(&config)?);
    let app = router(
        AppState::new(service).with_cors_origins(config.server.cors_origins.clone()),
    );

    let addr = config.server.bind_address();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind to {addr}"))?;
    info!(%addr, "Chairman's Council listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server failure")?;

    info!("Server stopped");
    Ok(())
}

async fn ask(config: FileConfig, args: AskArgs) -> Result<()> {
    check_config(&config)?;
    let service = build_service(&config)?;

    let synthesize = args.synthesize.then_some(true);
    let specialty = args.specialty.as_deref();
    let result = if args.quiet {
        service
            .consult(&args.query, specialty, synthesize, &NoProgress)
            .await
    } else {
        let progress = ProgressReporter::new();
        let result = service
            .consult(&args.query, specialty, synthesize, &progress)
            .await;
        if result.is_err() {
            progress.abandon();
        }
        result
    };
    let result = result?;

    let output = match args.output {
        OutputFormat::Full => ConsoleFormatter::format(&result),
        OutputFormat::Json => ConsoleFormatter::format_json(&result),
    };

    println!("{}", output);

    Ok(())
}

fn show_config(config_path: Option<&Path>, config: &FileConfig) -> Result<()> {
    println!("Configuration sources (in priority order):");
    for line in ConfigLoader::config_sources(config_path) {
        println!("{}", line);
    }
    println!();

    let issues = config.validate();
    if issues.is_empty() {
        println!("Validation: ok");
    } else {
        println!("Validation:");
        for issue in &issues {
            println!("  {}", issue);
        }
    }
    println!();

    let rendered =
        toml::to_string_pretty(&config.redacted()).context("failed to render configuration")?;
    println!("{}", rendered);
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("Shutdown signal received");
}
