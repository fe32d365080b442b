use clap::{Parser, Subcommand};
use flowsmith::compiler::loader::load_request_from_yaml;
use flowsmith::config::Settings;
use flowsmith::export::{self, ExportFormat};
use flowsmith::generative::http::HttpGenerativeClient;
use flowsmith::generative::{DisabledClient, GenerativeClient};
use flowsmith::runtime::engine::Engine;
use flowsmith::runtime::package::GeneratedPackage;
use flowsmith::runtime::redis_storage::RedisPackageCache;
use flowsmith::runtime::storage::{InMemoryPackageCache, PackageCache};
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use anyhow::{Context, Result};
use tracing::{info, warn};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Settings YAML file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a package, trying the generative service first
    Generate {
        /// Path to the workflow request YAML file
        #[arg(long, short)]
        file: PathBuf,

        /// Cache namespace (user or workspace id)
        #[arg(long, default_value = "default")]
        namespace: String,

        /// Redis connection URL, overrides the settings file
        #[arg(long)]
        redis: Option<String>,

        /// Render as text instead of printing the package JSON
        #[arg(long)]
        format: Option<ExportFormat>,
    },

    /// Build a package with the deterministic synthesizer only (no network)
    Synthesize {
        #[arg(long, short)]
        file: PathBuf,

        #[arg(long)]
        format: Option<ExportFormat>,
    },

    /// Render a saved package JSON file
    Export {
        #[arg(long, short)]
        package: PathBuf,

        #[arg(long, default_value = "summary")]
        format: ExportFormat,
    },

    /// Print the runtime import document of a saved package JSON file
    Import {
        #[arg(long, short)]
        package: PathBuf,
    },
}

fn load_settings(path: Option<&PathBuf>) -> Result<Settings> {
    let path = path.map(|p| p.to_string_lossy().into_owned());
    Settings::load(path.as_deref())
}

fn load_package(path: &PathBuf) -> Result<GeneratedPackage> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read package from {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("Failed to deserialize package from {}", path.display()))
}

fn print_package(package: &GeneratedPackage, format: Option<ExportFormat>) -> Result<()> {
    match format {
        Some(format) => print!("{}", export::render(package, format)),
        None => println!("{}", serde_json::to_string_pretty(package)?),
    }
    Ok(())
}

fn build_engine(settings: &Settings, redis: Option<String>) -> Result<Engine> {
    let cache: Arc<dyn PackageCache> = match redis.or_else(|| settings.redis_url.clone()) {
        Some(url) => {
            info!("Using Redis cache: {}", url);
            let client = redis::Client::open(url).context("Invalid Redis URL")?;
            Arc::new(RedisPackageCache::new(client))
        }
        None => Arc::new(InMemoryPackageCache::new()),
    };

    let generator: Arc<dyn GenerativeClient> = match HttpGenerativeClient::new(settings.generator.clone()) {
        Ok(client) => Arc::new(client),
        Err(e) => {
            warn!("Generative service disabled: {}", e);
            Arc::new(DisabledClient)
        }
    };

    Ok(Engine::new(cache, generator)
        .with_settings(settings.engine_settings())
        .with_tuning(settings.analyzer.clone(), settings.layout))
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();
    let settings = load_settings(cli.config.as_ref())?;

    match cli.command {
        Commands::Generate { file, namespace, redis, format } => {
            let request = load_request_from_yaml(&file.to_string_lossy())?;
            let engine = build_engine(&settings, redis)?;

            let outcome = engine.generate(&namespace, &request).await?;
            info!(source = ?outcome.source, "Generated package {}", outcome.package.id);
            print_package(&outcome.package, format)?;
        }

        Commands::Synthesize { file, format } => {
            let request = load_request_from_yaml(&file.to_string_lossy())?.normalized();
            request.validate()?;
            let engine = Engine::new(Arc::new(InMemoryPackageCache::new()), Arc::new(DisabledClient))
                .with_tuning(settings.analyzer.clone(), settings.layout);

            let package = engine.fallback_package(&request);
            print_package(&package, format)?;
        }

        Commands::Export { package, format } => {
            let package = load_package(&package)?;
            print!("{}", export::render(&package, format));
        }

        Commands::Import { package } => {
            let package = load_package(&package)?;
            let document = export::import_document(&package.name, &package.graph);
            println!("{}", serde_json::to_string_pretty(&document)?);
        }
    }

    Ok(())
}
