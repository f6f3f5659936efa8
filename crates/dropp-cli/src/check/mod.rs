//! `check` command: one polling cycle over the item catalog.
//!
//! Items are processed concurrently. Per-item fetch and normalization
//! failures are logged and reported, never propagated, so one broken source
//! does not stop the run.

mod report;

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use dropp_core::{diff_snapshots, AppConfig, DiffOutcome, ItemConfig, Snapshot, SourceKind};
use dropp_scraper::{build_snapshot, BuildOutcome, ItemFetch, SourceClient};
use futures::stream::{self, StreamExt};

use crate::history::HistoryStore;

#[derive(Debug, Default)]
pub(crate) struct CheckOptions {
    pub item_filter: Option<String>,
    pub dry_run: bool,
    pub json: bool,
}

/// What one item's cycle concluded.
#[derive(Debug)]
pub(crate) enum CheckStatus {
    /// At least one source did not contribute; no diff was attempted.
    Incomplete,
    Diffed(DiffOutcome),
}

#[derive(Debug)]
pub(crate) struct ItemCheck {
    pub slug: String,
    pub build: BuildOutcome,
    pub fetch_errors: Vec<(SourceKind, String)>,
    pub status: CheckStatus,
}

/// Builds the snapshot for one item and diffs it against `previous`.
///
/// An incomplete build is never diffed: a stale or default field would
/// otherwise be reported as a change.
pub(crate) fn evaluate_item(
    item: &ItemConfig,
    fetch: ItemFetch,
    previous: Option<&Snapshot>,
    created_at: DateTime<Utc>,
) -> ItemCheck {
    let build = build_snapshot(item, &fetch.responses, created_at);
    let fetch_errors = fetch
        .errors
        .into_iter()
        .map(|(kind, e)| (kind, e.to_string()))
        .collect();

    let status = if build.is_complete() {
        CheckStatus::Diffed(diff_snapshots(&item.identity(), previous, &build.snapshot))
    } else {
        CheckStatus::Incomplete
    };

    ItemCheck {
        slug: item.slug(),
        build,
        fetch_errors,
        status,
    }
}

/// Selects the items for this run, honouring an optional slug filter.
pub(crate) fn select_items(
    items: Vec<ItemConfig>,
    filter: Option<&str>,
) -> anyhow::Result<Vec<ItemConfig>> {
    match filter {
        Some(slug) => {
            let selected: Vec<ItemConfig> =
                items.into_iter().filter(|i| i.slug() == slug).collect();
            if selected.is_empty() {
                anyhow::bail!("item '{slug}' not found in the item catalog");
            }
            Ok(selected)
        }
        None => Ok(items),
    }
}

/// Runs one polling cycle: fetch → build → diff → report → store.
///
/// # Errors
///
/// Returns an error if configuration or history cannot be loaded or saved,
/// or if every selected item failed to produce a complete snapshot.
pub(crate) async fn run_check(config: &AppConfig, options: &CheckOptions) -> anyhow::Result<()> {
    let catalog = dropp_core::load_items(&config.items_path)?;
    let catalog_slugs: BTreeSet<String> = catalog.items.iter().map(ItemConfig::slug).collect();
    let items = select_items(catalog.items, options.item_filter.as_deref())?;
    if items.is_empty() {
        println!("no items configured; nothing to check");
        return Ok(());
    }

    let mut history = HistoryStore::load(&config.history_path)?;
    let client = SourceClient::new(
        config.scraper_request_timeout_secs,
        &config.scraper_user_agent,
        config.scraper_max_retries,
        config.scraper_retry_backoff_base_secs,
    )
    .map_err(|e| anyhow::anyhow!("failed to build source client: {e}"))?;

    let run_id = uuid::Uuid::new_v4();
    tracing::info!(
        %run_id,
        items = items.len(),
        known = history.len(),
        dry_run = options.dry_run,
        "starting check run"
    );

    for item in items.iter().filter(|i| i.has_competing_availability_sources()) {
        tracing::warn!(
            item = %item.slug(),
            "html_scrape and status_json both set availability; status_json takes precedence"
        );
    }

    let max_concurrent = config.scraper_max_concurrent_items.max(1);
    let checks: Vec<ItemCheck> = stream::iter(&items)
        .map(|item| {
            let previous = history.get(&item.slug()).cloned();
            let client = &client;
            async move {
                let fetch = client.fetch_item(item).await;
                evaluate_item(item, fetch, previous.as_ref(), Utc::now())
            }
        })
        .buffer_unordered(max_concurrent)
        .collect()
        .await;

    let mut changed = 0usize;
    let mut incomplete = 0usize;

    for check in checks {
        log_diagnostics(&check);

        match &check.status {
            CheckStatus::Incomplete => {
                incomplete += 1;
                println!("{}", report::render_incomplete(&check));
            }
            CheckStatus::Diffed(DiffOutcome::FirstObservation) => {
                tracing::info!(item = %check.slug, "first observation; seeding history");
            }
            CheckStatus::Diffed(DiffOutcome::NoChange) => {
                tracing::debug!(item = %check.slug, "no change");
            }
            CheckStatus::Diffed(DiffOutcome::Changed(diff)) => {
                changed += 1;
                if options.json {
                    println!("{}", serde_json::to_string(diff)?);
                } else {
                    println!("{}", report::render_diff(diff));
                }
            }
        }

        if matches!(check.status, CheckStatus::Diffed(_)) && !options.dry_run {
            history.insert(check.slug, check.build.snapshot);
        }
    }

    if !options.dry_run {
        if options.item_filter.is_none() {
            let pruned = history.retain_slugs(&catalog_slugs);
            if pruned > 0 {
                tracing::info!(pruned, "dropped history for items no longer in the catalog");
            }
        }
        history.save()?;
    }

    tracing::info!(
        %run_id,
        changed,
        incomplete,
        total = items.len(),
        "check run finished"
    );

    if incomplete == items.len() {
        anyhow::bail!("all {incomplete} items failed to produce a complete snapshot");
    }

    Ok(())
}

fn log_diagnostics(check: &ItemCheck) {
    for (kind, error) in &check.fetch_errors {
        tracing::warn!(item = %check.slug, source = %kind, error = %error, "fetch failed");
    }
    for failure in &check.build.failures {
        tracing::warn!(
            item = %check.slug,
            source = %failure.kind,
            error = %failure.error,
            "source did not contribute to snapshot"
        );
    }
    for note in &check.build.notes {
        tracing::debug!(item = %check.slug, source = %note.kind, "{}", note.message);
    }
    for kind in &check.build.ignored {
        tracing::debug!(item = %check.slug, source = %kind, "ignored unexpected response");
    }
}

#[cfg(test)]
#[path = "check_test.rs"]
mod tests;
