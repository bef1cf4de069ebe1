use anyhow::{Context, Result};
use company_registry::api_store::ApiStore;
use company_registry::config::config::Config;
use company_registry::lookup::SearchLinkLookup;
use company_registry::memory_store::MemoryStore;
use company_registry::registry::Registry;
use company_registry::store::CompanyStore;
use company_registry::{logging, tui};
use tracing::info;

fn print_help() {
    println!("company-registry - manage a list of company records");
    println!();
    println!("Usage: company-registry [OPTIONS]");
    println!();
    println!("Options:");
    println!("  --offline          Use the in-memory store instead of the HTTP API");
    println!("  --server <url>     Override the API base URL");
    println!("  --generate-config  Write a commented config file and exit");
    println!("  --help             Show this help");
    println!();
    println!("Environment:");
    println!("  COMPANY_API_URL    Overrides the configured API base URL");
    println!("  RUST_LOG           Log filter (default: info), viewable with F9");
}

fn main() -> Result<()> {
    let log_buffer = logging::init_tracing();

    let args: Vec<String> = std::env::args().collect();

    if args.contains(&"--help".to_string()) || args.contains(&"-h".to_string()) {
        print_help();
        return Ok(());
    }

    if args.contains(&"--generate-config".to_string()) {
        let path = Config::get_config_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
        std::fs::write(&path, Config::create_default_with_comments())
            .with_context(|| format!("writing {}", path.display()))?;
        println!("Configuration file created at: {}", path.display());
        return Ok(());
    }

    let config = Config::load().unwrap_or_else(|e| {
        eprintln!("Could not read config, using defaults: {}", e);
        Config::default()
    });

    let mut base_url = config.server.base_url.clone();
    if let Ok(url) = std::env::var("COMPANY_API_URL") {
        base_url = url;
    }
    if let Some(pos) = args.iter().position(|a| a == "--server") {
        base_url = args
            .get(pos + 1)
            .context("--server requires a URL argument")?
            .clone();
    }

    let offline = config.behavior.offline || args.contains(&"--offline".to_string());
    let store: Box<dyn CompanyStore> = if offline {
        info!("using in-memory store");
        Box::new(MemoryStore::new())
    } else {
        info!("using API store at {}", base_url);
        Box::new(ApiStore::new(&base_url))
    };

    let mut registry = Registry::new(store, Box::new(SearchLinkLookup::new()));
    registry.load_companies();

    tui::run(registry, config, log_buffer)
}
