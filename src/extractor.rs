/// In-page message scraper
///
/// Runs inside the target tab. Finds every element carrying the configured
/// class, keeps the ones with visible text, and stamps each with an `id` so
/// the side panel can ask for it again later.

use crate::page::{PageDom, PageElement, PageError};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// Prefix of every id we write, so ours never look like a site's own ids
pub const ID_PREFIX: &str = "query-panel-";

/// One scraped message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedRecord {
    pub text: String,
    pub id: String,
}

/// Hands out strictly increasing pass stamps.
///
/// The wall clock is used as-is unless it has not moved since the previous
/// pass, in which case the stamp is bumped past the last one issued.
pub struct StampClock {
    last: AtomicU64,
}

impl StampClock {
    pub const fn new() -> StampClock {
        StampClock {
            last: AtomicU64::new(0),
        }
    }

    pub fn next(&self, now_ms: u64) -> u64 {
        let last = self
            .last
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
                Some(now_ms.max(last + 1))
            })
            .unwrap_or_else(|last| last);
        now_ms.max(last + 1)
    }
}

impl Default for StampClock {
    fn default() -> Self {
        Self::new()
    }
}

/// Stamps issued by this page
pub static PAGE_STAMPS: StampClock = StampClock::new();

/// `foo` → `.foo`; `.foo` and `a.b` are left alone apart from the prefix
pub fn class_selector(class_name: &str) -> String {
    if class_name.starts_with('.') {
        class_name.to_string()
    } else {
        format!(".{}", class_name)
    }
}

pub fn element_id(ordinal: usize, stamp: u64) -> String {
    format!("{}{}-{}", ID_PREFIX, ordinal, stamp)
}

/// One extraction pass. Errors come only from the selector query.
pub fn extract<D: PageDom>(
    page: &D,
    class_name: &str,
    clock: &StampClock,
) -> Result<Vec<ExtractedRecord>, PageError> {
    let elements = page.select_all(&class_selector(class_name))?;
    let stamp = clock.next(page.now_ms());

    // Ordinals count every match, including the empty ones we skip
    let records = elements
        .iter()
        .enumerate()
        .filter_map(|(ordinal, element)| {
            let text = element.rendered_text().trim().to_string();
            if text.is_empty() {
                return None;
            }
            let id = element_id(ordinal, stamp);
            element.set_id(&id);
            Some(ExtractedRecord { text, id })
        })
        .collect();

    Ok(records)
}

/// Like [`extract`], but any failure yields no records
pub fn scrape<D: PageDom>(page: &D, class_name: &str, clock: &StampClock) -> Vec<ExtractedRecord> {
    match extract(page, class_name, clock) {
        Ok(records) => {
            log::debug!("scraped {} records for {}", records.len(), class_name);
            records
        }
        Err(e) => {
            log::debug!("scrape failed for {}: {}", class_name, e);
            Vec::new()
        }
    }
}
