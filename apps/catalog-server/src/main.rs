use anyhow::{anyhow, Context, Result};
use axum::{http::Uri, routing::get, Json, Router};
use clap::{Parser, Subcommand};
use mimalloc::MiMalloc;
use runtime::{AppConfig, AppConfigProvider, CliArgs, DatabaseConfig};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use svckit::ingress::{self, IngressConfig};
use svckit::{ModuleCtxBuilder, ModuleEntry, ModuleRegistry, ProblemResponse};
use tokio_util::sync::CancellationToken;
use url::Url;

use api_objects::ApiObjects;
use orders::Orders;
use products::Products;
use users::Users;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

// Adapter to make AppConfigProvider implement svckit::ConfigProvider
struct ModuleConfigAdapter(Arc<AppConfigProvider>);

impl svckit::ConfigProvider for ModuleConfigAdapter {
    fn get_module_config(&self, module_name: &str) -> Option<&serde_json::Value> {
        self.0.get_module_config(module_name)
    }
}

const MEMORY_DSN: &str = "sqlite::memory:";

/// Expand a sqlite DSN into an absolute-path DSN using a base directory.
/// - Keeps "sqlite::memory:" as-is.
/// - Normalizes backslashes into forward slashes (important on Windows).
fn absolutize_sqlite_dsn(dsn: &str, base_dir: &Path, create_dirs: bool) -> Result<String> {
    if dsn.eq_ignore_ascii_case(MEMORY_DSN) || dsn.eq_ignore_ascii_case("sqlite://:memory:") {
        return Ok(MEMORY_DSN.to_string());
    }
    let db_path = dsn
        .strip_prefix("sqlite://")
        .ok_or_else(|| anyhow!("DSN must start with sqlite:// (got: {})", dsn))?;

    let (path_str, query) = match db_path.split_once('?') {
        Some((p, q)) => (p, Some(q)),
        None => (db_path, None),
    };

    let mut p = PathBuf::from(path_str);
    if p.as_os_str().is_empty() {
        return Err(anyhow!("Empty SQLite path in DSN"));
    }
    if p.is_relative() {
        p = base_dir.join(p);
    }

    if let Some(dir) = p.parent() {
        if create_dirs {
            std::fs::create_dir_all(dir)?;
        }
    }

    let mut out = String::from("sqlite://");
    out.push_str(&p.to_string_lossy().replace('\\', "/"));
    if let Some(q) = query {
        out.push('?');
        out.push_str(q);
    }
    Ok(out)
}

/// Catalog Server - products, users, orders and API objects over REST
#[derive(Parser)]
#[command(name = "catalog-server")]
#[command(about = "Catalog Server - products, users, orders and API objects over REST")]
#[command(version = "0.1.0")]
struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Port for HTTP server (overrides config)
    #[arg(short, long)]
    port: Option<u16>,

    /// Print current configuration and exit
    #[arg(long)]
    print_config: bool,

    /// Log verbosity level (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Ignore the configured database and keep everything in memory
    #[arg(long)]
    mock: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the server
    Run,
    /// Check configuration
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let args = CliArgs {
        config: cli.config.as_ref().map(|p| p.to_string_lossy().to_string()),
        port: cli.port,
        print_config: cli.print_config,
        verbose: cli.verbose,
        mock: cli.mock,
    };

    // Load configuration (normalized home_dir is applied inside)
    let mut config = AppConfig::load_or_default(cli.config.as_deref())?;
    config.apply_cli_overrides(&args);

    let logging_config = config.logging.as_ref().cloned().unwrap_or_default();
    runtime::logging::init_logging_from_config(&logging_config, Path::new(&config.server.home_dir));
    tracing::info!("Catalog Server starting");

    if cli.print_config {
        println!("{}", config.to_yaml()?);
        return Ok(());
    }

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => run_server(config, args).await,
        Commands::Check => check_config(config, &args),
    }
}

/// Only SQLite is compiled in.
fn detect_from_dsn(cfg: &DatabaseConfig) -> Result<&'static str> {
    let raw = cfg.url.trim();
    if raw.is_empty() {
        return Err(anyhow!("Database URL not configured"));
    }

    let url = Url::parse(raw).map_err(|e| anyhow!("Invalid database DSN '{}': {}", raw, e))?;
    match url.scheme() {
        "sqlite" | "sqlite3" => Ok("sqlite"),
        other => Err(anyhow!("Unsupported database type: {}", other)),
    }
}

async fn connect_db(db_config: &DatabaseConfig, base_dir: &Path) -> Result<DatabaseConnection> {
    detect_from_dsn(db_config)?;
    let dsn = absolutize_sqlite_dsn(db_config.url.trim(), base_dir, true)?;

    // Every pooled connection to an in-memory SQLite database sees its own database.
    let max_conns = if dsn == MEMORY_DSN {
        1
    } else {
        db_config.max_conns.unwrap_or(10)
    };

    let mut opts = ConnectOptions::new(dsn.clone());
    opts.max_connections(max_conns)
        .acquire_timeout(Duration::from_secs(5))
        .sqlx_logging(false);

    tracing::info!("Connecting to database: {}", dsn);
    Database::connect(opts)
        .await
        .with_context(|| format!("failed to connect to {dsn}"))
}

fn registry() -> ModuleRegistry {
    let catalog = Arc::new(Products::new());
    let accounts = Arc::new(Users::new());
    let ordering = Arc::new(Orders::new());
    let objects = Arc::new(ApiObjects::new());

    ModuleRegistry::new()
        .register(
            ModuleEntry::new(products::module::MODULE_NAME, catalog.clone())
                .with_db(catalog.clone())
                .with_rest(catalog),
        )
        .register(
            ModuleEntry::new(users::module::MODULE_NAME, accounts.clone())
                .with_db(accounts.clone())
                .with_rest(accounts),
        )
        .register(
            ModuleEntry::new(orders::module::MODULE_NAME, ordering.clone())
                .with_db(ordering.clone())
                .with_rest(ordering),
        )
        .register(
            ModuleEntry::new(api_objects::module::MODULE_NAME, objects.clone())
                .with_db(objects.clone())
                .with_rest(objects),
        )
}

async fn welcome() -> Json<Value> {
    Json(json!({
        "message": "Welcome to the Catalog API",
        "services": {
            "products": ["/api/v1/products", "/api/v2/products"],
            "users": ["/api/v1/users", "/api/v2/users"],
            "orders": ["/api/v1/orders", "/api/v2/orders"],
            "objects": "/api/objects",
            "health": "/health"
        }
    }))
}

async fn no_route(uri: Uri) -> ProblemResponse {
    svckit::not_found(format!("No route for {}", uri.path()))
        .0
        .with_instance(uri.path())
        .into()
}

async fn run_server(config: AppConfig, args: CliArgs) -> Result<()> {
    tracing::info!("Initializing modules...");

    let config_provider = Arc::new(ModuleConfigAdapter(Arc::new(AppConfigProvider::new(
        config.clone(),
    ))));
    let base_dir = PathBuf::from(&config.server.home_dir);
    let mut ctx =
        ModuleCtxBuilder::new(CancellationToken::new()).with_config_provider(config_provider);
    match (&config.database, args.mock) {
        (Some(db_config), false) => {
            let db = connect_db(db_config, &base_dir).await?;
            ctx = ctx.with_db(db);
        }
        (Some(_), true) => tracing::info!("--mock set, all modules use in-memory storage"),
        (None, _) => {
            tracing::warn!("No database configuration found, all modules use in-memory storage")
        }
    }
    let ctx = ctx.build();

    let registry = registry();
    tracing::info!(modules = ?registry.names(), "Running module phases");
    let router = registry
        .run_phases(&ctx, Router::new().route("/", get(welcome)))
        .await?
        .fallback(no_route);

    let ingress_cfg = IngressConfig {
        cors_enabled: config.server.cors_enabled,
        timeout_secs: match config.server.timeout_sec {
            0 => IngressConfig::default().timeout_secs,
            secs => secs,
        },
        ..IngressConfig::default()
    };
    let app = ingress::wrap(router, &ingress_cfg);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!("HTTP server listening on {}", addr);

    let cancel = ctx.cancellation_token().clone();
    let token = cancel.clone();
    tokio::spawn(async move {
        if let Err(e) = svckit::shutdown::wait_for_shutdown().await {
            tracing::error!(error = %e, "signal handler failed");
        }
        token.cancel();
    });

    axum::serve(listener, app)
        .with_graceful_shutdown(async move { cancel.cancelled().await })
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

fn check_config(config: AppConfig, args: &CliArgs) -> Result<()> {
    tracing::info!("Checking configuration...");
    // --mock replaces the configured database, so its DSN is not checked
    if let Some(db) = config.database.as_ref().filter(|_| !args.mock) {
        let backend = detect_from_dsn(db)?;
        tracing::info!("Database backend: {}", backend);
    }

    println!("Configuration check passed");
    println!("Server config:");
    println!("{}", config.to_yaml()?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_dsn_is_kept() {
        let base = Path::new("/tmp/x");
        assert_eq!(absolutize_sqlite_dsn("sqlite::memory:", base, false).unwrap(), MEMORY_DSN);
        assert_eq!(absolutize_sqlite_dsn("sqlite://:memory:", base, false).unwrap(), MEMORY_DSN);
    }

    #[test]
    fn relative_sqlite_path_is_joined_to_home() {
        let tmp = tempfile::tempdir().unwrap();
        let dsn = absolutize_sqlite_dsn("sqlite://data/catalog.db?mode=rwc", tmp.path(), true).unwrap();
        let expected = tmp.path().join("data").join("catalog.db");
        assert_eq!(
            dsn,
            format!("sqlite://{}?mode=rwc", expected.to_string_lossy().replace('\\', "/"))
        );
        assert!(tmp.path().join("data").is_dir());
    }

    #[test]
    fn non_sqlite_dsn_is_rejected() {
        let cfg = DatabaseConfig {
            url: "postgres://localhost/catalog".into(),
            max_conns: None,
        };
        assert!(detect_from_dsn(&cfg).is_err());
        assert!(absolutize_sqlite_dsn(&cfg.url, Path::new("."), false).is_err());
    }

    #[test]
    fn all_modules_are_registered() {
        assert_eq!(registry().names(), ["products", "users", "orders", "api_objects"]);
    }

    #[tokio::test]
    async fn every_module_migrates_into_one_database() {
        let tmp = tempfile::tempdir().unwrap();
        let cfg = DatabaseConfig {
            url: "sqlite://data/catalog.db?mode=rwc".into(),
            max_conns: Some(2),
        };
        let db = connect_db(&cfg, tmp.path()).await.unwrap();
        let ctx = ModuleCtxBuilder::new(CancellationToken::new())
            .with_db(db)
            .build();

        registry().run_phases(&ctx, Router::new()).await.unwrap();
        // A restart finds every migration already applied.
        registry().run_phases(&ctx, Router::new()).await.unwrap();
    }
}
