mod assembler;
mod boundaries;
mod config;
mod document;
mod error;
mod fetch;
mod guide;
mod identity;
mod migrate;
mod parser;
mod redirects;
mod store;
mod writer;

use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::Parser;

use crate::boundaries::{Boundaries, BoundaryResolver, FixedBoundaries, PromptBoundaries};
use crate::config::{Config, DEFAULT_BASE_URL, DEFAULT_DB_PATH};
use crate::fetch::HttpSource;
use crate::guide::{Guide, GuideKind, Jurisdiction};
use crate::identity::FileIdentityRegistry;
use crate::migrate::Migration;

#[derive(Parser)]
#[command(name = "guide_migrator", about = "Migrate legacy state guide pages into the CMS")]
struct Cli {
    /// State slug, e.g. "new-hampshire"
    #[arg(default_value = "maine")]
    state: String,

    /// Position of the state in the guide listing
    #[arg(default_value_t = 20)]
    ordinal: u32,

    /// Which guide to migrate
    #[arg(long, value_enum, default_value = "corp")]
    guide: GuideKind,

    /// Site checkout holding content/ and app/Routing/
    #[arg(long, default_value = ".")]
    root: PathBuf,

    /// Legacy document store
    #[arg(long, env = "GUIDE_MIGRATOR_DB", default_value = DEFAULT_DB_PATH)]
    db: PathBuf,

    /// Live legacy site
    #[arg(long, env = "GUIDE_MIGRATOR_BASE_URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Sections in each page's intro (skips the prompt; needs --content)
    #[arg(long, requires = "content")]
    intro: Option<usize>,

    /// Section count closing each page's content (skips the prompt; needs --intro)
    #[arg(long, requires = "intro")]
    content: Option<usize>,

    /// Pause between page fetches
    #[arg(long, default_value_t = 500)]
    delay_ms: u64,

    /// Extract and assemble only; write nothing
    #[arg(long)]
    dry_run: bool,

    /// Seed the document store from a slug list (`slug` or `slug<TAB>title` per line) before migrating
    #[arg(long, value_name = "FILE")]
    import: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();

    let mut config = Config::new(&cli.root);
    config.db_path = cli.db.clone();
    config.base_url = cli.base_url.clone();
    config.delay = Duration::from_millis(cli.delay_ms);
    config.dry_run = cli.dry_run;
    let guide = Guide::new(cli.guide, Jurisdiction::new(&cli.state, cli.ordinal));

    let conn = store::connect(&config.db_path)
        .with_context(|| format!("opening document store {}", config.db_path.display()))?;
    store::init_schema(&conn)?;

    if let Some(path) = &cli.import {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading import list {}", path.display()))?;
        let pages = store::parse_import(&text);
        let inserted = store::insert_pages(&conn, &pages)?;
        println!("Imported {} legacy pages ({} in store)", inserted, store::count_pages(&conn)?);
    }

    let redirects = config
        .load_redirects(&guide)
        .context("loading routing tables")?;

    let mut resolver: Box<dyn BoundaryResolver> = match (cli.intro, cli.content) {
        (Some(intro), Some(content)) => Box::new(FixedBoundaries(Boundaries::new(intro, content))),
        _ => Box::new(PromptBoundaries::stdio()),
    };
    let mut registry = FileIdentityRegistry::new(config.guides_dir());
    let source = HttpSource::new(&config.base_url);

    println!(
        "Migrating {} guide for {} (#{})...",
        match guide.kind {
            GuideKind::Corporation => "corporation",
            GuideKind::Llc => "LLC",
        },
        guide.jurisdiction.name,
        guide.jurisdiction.ordinal
    );
    let summary = Migration::new(&guide, &config, &redirects)
        .run(&source, &conn, resolver.as_mut(), &mut registry)
        .await
        .with_context(|| format!("migrating {}", guide.jurisdiction.slug))?;
    summary.print();

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {}", format_duration(elapsed));
    }

    Ok(())
}

fn format_duration(d: std::time::Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
    }
}
