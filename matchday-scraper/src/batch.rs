//! Bounded fan-out of match extractions.
//!
//! Match URLs are split into consecutive batches; a batch's extractions run
//! interleaved on the current task and all of them finish before the next
//! batch starts, so at most `batch_size` pages are ever open.

use futures::future::join_all;
use matchday_core::MatchRecord;

use crate::extract::{ExtractOptions, extract_match};
use crate::page::{Browser, Page};

/// Split `refs` into consecutive chunks of `batch_size` (the last may be
/// shorter). A zero size is treated as 1.
pub fn partition<T>(refs: &[T], batch_size: usize) -> Vec<&[T]> {
    refs.chunks(batch_size.max(1)).collect()
}

/// Extract every URL in batches, returning the records that loaded.
///
/// Results keep the order of `urls`; matches whose page could not be loaded
/// are left out. `on_batch` is called after each batch with the number of
/// URLs processed so far and the total.
pub async fn extract_batches<B: Browser>(
    browser: &B,
    urls: &[String],
    season: &str,
    batch_size: usize,
    options: &ExtractOptions,
    mut on_batch: impl FnMut(usize, usize),
) -> Vec<MatchRecord> {
    let batch_size = if batch_size == 0 {
        log::warn!("Batch size 0 is not usable, extracting one match at a time");
        1
    } else {
        batch_size
    };

    let batches = partition(urls, batch_size);
    let mut records = Vec::with_capacity(urls.len());
    let mut processed = 0;
    for (i, batch) in batches.iter().enumerate() {
        log::debug!(
            "Batch {}/{}: {} matches",
            i + 1,
            batches.len(),
            batch.len()
        );
        let results = join_all(
            batch
                .iter()
                .map(|url| extract_one(browser, url, season, options)),
        )
        .await;
        let loaded_before = records.len();
        records.extend(results.into_iter().flatten());
        processed += batch.len();

        let failed = batch.len() - (records.len() - loaded_before);
        if failed > 0 {
            log::warn!("Batch {}: {} match(es) could not be loaded", i + 1, failed);
        }
        on_batch(processed, urls.len());
    }
    records
}

/// Extract one match on its own page, closing the page afterwards.
async fn extract_one<B: Browser>(
    browser: &B,
    url: &str,
    season: &str,
    options: &ExtractOptions,
) -> Option<MatchRecord> {
    let mut page = match browser.new_page().await {
        Ok(page) => page,
        Err(e) => {
            log::warn!("Could not open a page for {}: {}", url, e);
            return None;
        }
    };
    let record = extract_match(&mut page, url, season, options).await;
    if let Err(e) = page.close().await {
        log::debug!("Failed to close match page: {}", e);
    }
    tokio::time::sleep(options.throttle).await;
    record
}

#[cfg(test)]
#[path = "tests/batch_tests.rs"]
mod tests;
