use std::collections::BTreeSet;
use std::env;
use std::path::{Path, PathBuf};

use anyhow::Context;
use hitmap_core::config::Config;
use hitmap_core::SearchResponse;
use hitmap_results::{ModelRegistry, ResultMapper};
use tracing_subscriber::EnvFilter;

#[derive(Debug, PartialEq)]
struct CliArgs {
    response_path: PathBuf,
    page: Option<usize>,
    per_page: Option<usize>,
}

fn parse_args(args: &[String]) -> Result<CliArgs, String> {
    let response_path = args.get(1).map(PathBuf::from).ok_or("missing <response.json>")?;
    let page = args.get(2).map(|s| s.parse::<usize>()).transpose().map_err(|e| format!("invalid page: {}", e))?;
    let per_page = args.get(3).map(|s| s.parse::<usize>()).transpose().map_err(|e| format!("invalid per_page: {}", e))?;
    if args.len() > 4 {
        return Err("too many arguments".to_string());
    }
    Ok(CliArgs { response_path, page, per_page })
}

fn load_config() -> anyhow::Result<Config> {
    let config = match env::var("HITMAP_CONFIG") {
        Ok(path) => Config::from_file(Path::new(&path))?,
        Err(_) => Config::load()?,
    };
    Ok(config)
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();
    let cli = match parse_args(&args) {
        Ok(cli) => cli,
        Err(msg) => {
            eprintln!("{}", msg);
            eprintln!("Usage: {} <response.json> [page] [per_page]", args.first().map(String::as_str).unwrap_or("hitmap"));
            eprintln!("Example: {} ./dev_data/response.json 2 10", args.first().map(String::as_str).unwrap_or("hitmap"));
            std::process::exit(1);
        }
    };

    let settings = load_config()?.settings()?;
    let bytes = std::fs::read(&cli.response_path)
        .with_context(|| format!("Failed to read {}", cli.response_path.display()))?;
    let response = SearchResponse::from_slice(&bytes)?;

    let types: BTreeSet<String> = if settings.registry.types.is_empty() {
        response.hits.hits.iter().map(|h| h.doc_type.clone()).collect()
    } else {
        settings.registry.types.iter().cloned().collect()
    };
    tracing::info!(types = ?types, path = %cli.response_path.display(), "mapping search response");
    let registry = ModelRegistry::documents(types);

    let collection = ResultMapper::new(&registry).map(response)?;
    let per_page = cli.per_page.unwrap_or(settings.pagination.per_page);
    let page = collection
        .paginate(per_page, cli.page, &settings.pagination.base_path)?
        .with_page_name(settings.pagination.page_name.clone());
    tracing::info!(hits = collection.len(), total = collection.total_hits(), took = ?collection.took(), "mapped");

    let out = serde_json::json!({
        "page": page,
        "links": page.links(settings.pagination.on_each_side),
    });
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}
