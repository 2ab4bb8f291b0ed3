//! One guide, end to end: every catalogue page is looked up, fetched,
//! extracted, assembled and written in turn; the tree and routing tables
//! are updated once at the end.

use std::collections::HashSet;
use std::path::PathBuf;

use indicatif::{ProgressBar, ProgressStyle};
use rusqlite::Connection;
use tracing::{debug, info, warn};

use crate::assembler::Assembler;
use crate::boundaries::BoundaryResolver;
use crate::config::Config;
use crate::document::PageDocument;
use crate::error::{MigrateError, Result};
use crate::fetch::HtmlSource;
use crate::guide::{Guide, GuidePage, PageType};
use crate::identity::IdentityRegistry;
use crate::parser::extract_page;
use crate::redirects::RedirectTable;
use crate::store;
use crate::writer;

#[derive(Debug, Default)]
pub struct MigrationSummary {
    pub migrated: usize,
    /// Catalogue pages the document store has no record of.
    pub missing: usize,
    /// Pages that could not be fetched or processed.
    pub failed: usize,
    pub written: Vec<PathBuf>,
    pub tree_patched: bool,
    pub redirects_added: usize,
    pub released_added: usize,
}

impl MigrationSummary {
    pub fn print(&self) {
        println!(
            "Migrated {} pages ({} not in store, {} failed).",
            self.migrated, self.missing, self.failed
        );
        for path in &self.written {
            println!("  wrote {}", path.display());
        }
        if self.tree_patched {
            println!("Navigation tree updated.");
        }
        if self.redirects_added > 0 || self.released_added > 0 {
            println!(
                "Added {} redirects, {} released pages.",
                self.redirects_added, self.released_added
            );
        }
    }
}

pub struct Migration<'a> {
    guide: &'a Guide,
    config: &'a Config,
    redirects: &'a RedirectTable,
}

/// What a migrated page contributes to the run-level updates.
struct Migrated {
    doc: PageDocument,
    path: Option<PathBuf>,
}

impl<'a> Migration<'a> {
    pub fn new(guide: &'a Guide, config: &'a Config, redirects: &'a RedirectTable) -> Self {
        Self {
            guide,
            config,
            redirects,
        }
    }

    pub async fn run<S: HtmlSource>(
        &self,
        source: &S,
        conn: &Connection,
        resolver: &mut dyn BoundaryResolver,
        registry: &mut dyn IdentityRegistry,
    ) -> Result<MigrationSummary> {
        let pages = self.guide.pages();
        let j = &self.guide.jurisdiction;
        info!(
            state = %j.name,
            code = %j.code,
            ordinal = j.ordinal,
            pages = pages.len(),
            dry_run = self.config.dry_run,
            "migrating guide"
        );

        let pb = ProgressBar::new(pages.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-"),
        );

        let mut summary = MigrationSummary::default();
        let mut main_id = None;
        let mut child_ids = Vec::new();
        let mut child_types = HashSet::new();
        let mut redirect_entries = Vec::new();
        let mut released_entries = Vec::new();

        for page in &pages {
            pb.set_message(page.slug.clone());
            if store::find_page(conn, &page.slug)?.is_none() {
                info!("{} not in document store, skipping", page.slug);
                summary.missing += 1;
                pb.inc(1);
                continue;
            }

            let outcome = self.migrate_page(source, page, resolver, registry).await;
            let fetched = !matches!(outcome, Err(MigrateError::RedirectedPathUnsupported(_)));
            match outcome {
                Ok(migrated) => {
                    summary.migrated += 1;
                    if page.page_type == PageType::Main {
                        main_id = Some(migrated.doc.id.clone());
                    } else if child_types.insert(page.page_type) {
                        child_ids.push(migrated.doc.id.clone());
                    }
                    summary.written.extend(migrated.path);
                    if let Some(dest) = self.guide.destination_path(page.page_type) {
                        redirect_entries.push(writer::redirect_entry(&format!("/{}", page.slug), &dest));
                        released_entries.push(writer::released_entry(&dest));
                    }
                }
                Err(e) if e.is_fetch_failure() => {
                    warn!("skipping {}: {}", page.slug, e);
                    summary.failed += 1;
                }
                Err(e) => {
                    warn!("failed to migrate {}: {}", page.slug, e);
                    summary.failed += 1;
                }
            }
            // Pace requests to the live site, failed ones included.
            if fetched {
                tokio::time::sleep(self.config.delay).await;
            }
            pb.inc(1);
        }
        pb.finish_and_clear();

        if self.config.dry_run {
            info!("dry run, leaving tree and routing tables untouched");
            return Ok(summary);
        }

        if let Some(main_id) = main_id {
            writer::patch_tree_file(&self.config.tree_path(), self.guide.tree_anchor(), &main_id, &child_ids)?;
            summary.tree_patched = true;
        }

        let note = format!("{} guide", j.name);
        writer::append_php_file(&self.config.redirects_path(), &redirect_entries, &note)?;
        writer::append_php_file(&self.config.released_pages_path(), &released_entries, &note)?;
        summary.redirects_added = redirect_entries.len();
        summary.released_added = released_entries.len();

        Ok(summary)
    }

    async fn migrate_page<S: HtmlSource>(
        &self,
        source: &S,
        page: &GuidePage,
        resolver: &mut dyn BoundaryResolver,
        registry: &mut dyn IdentityRegistry,
    ) -> Result<Migrated> {
        let legacy_path = format!("/{}", page.slug);
        if self.redirects.has_rule_for(&legacy_path) {
            return Err(MigrateError::RedirectedPathUnsupported(legacy_path));
        }

        let html = source.fetch(&page.slug).await?;
        let boundaries = resolver.resolve(page)?;
        debug!(intro = boundaries.intro, content = boundaries.content, "{}", page.slug);

        let extracted = extract_page(&html, boundaries, self.redirects, &self.guide.cta_button());
        let doc = Assembler::new(self.guide, self.redirects).assemble(extracted, page, registry)?;

        let path = if self.config.dry_run {
            None
        } else {
            let filename = self.guide.filename(page.page_type);
            let path = writer::write_page(&self.config.guides_dir(), &filename, &doc)?;
            info!("wrote {}", path.display());
            Some(path)
        };
        Ok(Migrated { doc, path })
    }
}
