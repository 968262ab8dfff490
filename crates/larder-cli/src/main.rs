//! # Larder
//!
//! Command-line recipe browser: load recipes, filter and sort them, and show
//! how each one breaks down into sub-recipes.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use larder_cli::render::{EntryListing, FacetList};
use larder_cli::{CatalogConfig, RecipeLoader};
use larder_core::{Catalog, FilterSpec, PriorityStats};
use tracing::{debug, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Command-line arguments.
#[derive(Debug, Parser)]
#[command(name = "larder")]
#[command(version)]
#[command(about = "Filter, sort and break down crafting recipes", long_about = None)]
struct Cli {
    /// Recipe file or directory (defaults to the configured path)
    path: Option<PathBuf>,

    /// Only recipes with a component containing this text
    #[arg(short, long)]
    material: Option<String>,

    /// Only recipes carrying this tag (repeatable, all must match)
    #[arg(short, long = "tag")]
    tags: Vec<String>,

    /// Only recipes in this category (repeatable)
    #[arg(short, long = "category")]
    categories: Vec<String>,

    /// Only recipes from this source pack (repeatable)
    #[arg(short, long = "source")]
    sources: Vec<String>,

    /// Sort recipes with this stat first (repeatable)
    #[arg(short, long = "priority")]
    priorities: Vec<String>,

    /// Print composition trees under the table
    #[arg(long)]
    tree: bool,

    /// List the categories, tags, sources and stats present
    #[arg(long)]
    facets: bool,

    /// Configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Watch recipe files and re-render on change
    #[arg(long)]
    watch: bool,
}

impl Cli {
    fn filter_spec(&self) -> FilterSpec {
        let spec = FilterSpec::new()
            .require_tags(self.tags.iter().cloned())
            .allow_categories(&self.categories)
            .allow_source_packs(self.sources.iter().cloned());
        match &self.material {
            Some(material) => spec.material(material),
            None => spec,
        }
    }

    fn priority_stats(&self, config: &CatalogConfig) -> PriorityStats {
        if self.priorities.is_empty() {
            config.default_priority_stats.iter().collect()
        } else {
            self.priorities.iter().collect()
        }
    }
}

/// Main entry point.
fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env().add_directive("larder=info".parse()?))
        .init();

    let cli = Cli::parse();
    debug!("Arguments: {:?}", cli);

    let config = match &cli.config {
        Some(path) => CatalogConfig::load_from(path),
        None => CatalogConfig::load(),
    };

    let path = cli.path.clone().unwrap_or_else(|| config.recipe_path.clone());
    let spec = cli.filter_spec();
    let priority = cli.priority_stats(&config);

    let mut loader = RecipeLoader::new(&path);
    let catalog = loader
        .load()
        .with_context(|| format!("Failed to load recipes from {}", path.display()))?;
    print_catalog(catalog, &cli, &config, &spec, &priority);

    if cli.watch {
        let interval = Duration::from_millis(config.watch_interval_ms);
        info!("Watching {} every {:?}", path.display(), interval);
        loop {
            thread::sleep(interval);
            match loader.check_reload() {
                Ok(true) => print_catalog(loader.catalog(), &cli, &config, &spec, &priority),
                Ok(false) => {},
                Err(e) => warn!("Reload failed, keeping previous recipes: {}", e),
            }
        }
    }

    Ok(())
}

fn print_catalog(
    catalog: &Catalog,
    cli: &Cli,
    config: &CatalogConfig,
    spec: &FilterSpec,
    priority: &PriorityStats,
) {
    let entries = catalog.entries(spec, priority);
    print!(
        "{}",
        EntryListing::new(&entries)
            .with_truncate_limit(config.truncate_limit)
            .with_trees(cli.tree || config.show_trees)
    );

    if cli.facets {
        println!("\n{}", FacetList::new(&catalog.facets()));
    }
}
