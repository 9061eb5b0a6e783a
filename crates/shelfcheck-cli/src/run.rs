//! One sequential pass: identifiers, product data, replacements, report.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::Context;
use shelfcheck_core::{
    index_by_asin, load_replacements, resolve_replacements, AppConfig, Asin, ProductRecord,
    ProductSource, ReplacementLookup, ResolveError,
};
use shelfcheck_paapi::PaapiClient;
use shelfcheck_report::{compile, render_html, report_file_name, AffiliateLinks};
use shelfcheck_scraper::{Content, PageClient};

pub(crate) async fn run(content: Content<'_>, json: bool, config: &AppConfig) -> anyhow::Result<()> {
    let pages = PageClient::new(config.request_timeout_secs, &config.user_agent)
        .context("failed to build page client")?;
    let identifiers = pages.extract(content, config.marketplace_domain()).await;
    tracing::info!(count = identifiers.len(), "identifiers resolved");

    let source = PaapiClient::new(config).context("failed to build product API client")?;

    if json {
        let records = fetch_primary(&source, &identifiers).await;
        let ordered: Vec<&ProductRecord> =
            identifiers.iter().filter_map(|asin| records.get(asin)).collect();
        println!("{}", serde_json::to_string_pretty(&ordered)?);
        return Ok(());
    }

    let links = AffiliateLinks::new(&config.marketplace, &config.associate_tag);
    let path = write_report(
        content.source_text(),
        &identifiers,
        &source,
        &config.replacements_path,
        &config.output_dir,
        &links,
    )
    .await?;

    tracing::info!(path = %path.display(), "report written");
    Ok(())
}

/// Fetches the primary records in one call. A failed fetch leaves every
/// identifier without data rather than aborting the run.
async fn fetch_primary<S: ProductSource>(
    source: &S,
    identifiers: &[Asin],
) -> HashMap<Asin, ProductRecord> {
    if identifiers.is_empty() {
        return HashMap::new();
    }
    match source.get_items(identifiers).await {
        Ok(records) => index_by_asin(records),
        Err(e) => {
            tracing::warn!(error = %e, "product fetch failed; report will show placeholders");
            HashMap::new()
        }
    }
}

/// Builds the report for `identifiers` and writes it under `output_dir`,
/// returning the written path.
///
/// # Errors
///
/// Fails when a configured replacement has no upstream record, or when the
/// report file cannot be written. A failed replacement fetch is logged and
/// the report is written without replacements.
pub(crate) async fn write_report<S>(
    source_text: &str,
    identifiers: &[Asin],
    source: &S,
    replacements_path: &Path,
    output_dir: &Path,
    links: &AffiliateLinks,
) -> anyhow::Result<PathBuf>
where
    S: ProductSource + Sync,
{
    let primary = fetch_primary(source, identifiers).await;

    let map = load_replacements(replacements_path);
    let replacements = match resolve_replacements(&map, source).await {
        Ok(lookup) => lookup,
        Err(ResolveError::Fetch(e)) => {
            tracing::warn!(error = %e, "replacement fetch failed; continuing without replacements");
            ReplacementLookup::new()
        }
        Err(e) => return Err(e.into()),
    };

    let report = compile(identifiers, &primary, &replacements, links);
    let html = render_html(&report);

    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("failed to create {}", output_dir.display()))?;
    let path = output_dir.join(report_file_name(source_text));
    std::fs::write(&path, html).with_context(|| format!("failed to write {}", path.display()))?;
    Ok(path)
}

#[cfg(test)]
#[path = "run_test.rs"]
mod tests;
