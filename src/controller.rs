/// Refresh cycle of the side panel: find the tab, pick a rule, scrape it

use crate::error::{BridgeError, FetchError};
use crate::extractor::ExtractedRecord;
use crate::site_rules::{SiteConfig, SiteRule};
use serde::Deserialize;
use std::fmt;
use url::Url;

/// The focused tab of the focused window
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ActiveTab {
    pub id: i32,
    #[serde(default)]
    pub url: Option<String>,
}

/// Browser calls the controller depends on
#[allow(async_fn_in_trait)]
pub trait TabHost {
    async fn active_tab(&self) -> Result<Option<ActiveTab>, BridgeError>;

    /// Run the scraper in `tab_id`. `Ok(None)` means the call went through
    /// but no frame produced a result.
    async fn scrape(
        &self,
        tab_id: i32,
        class_name: &str,
    ) -> Result<Option<Vec<ExtractedRecord>>, BridgeError>;

    async fn reveal(&self, tab_id: i32, element_id: &str) -> Result<(), BridgeError>;
}

/// A tab with a rule that applies to it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub tab_id: i32,
    pub url: String,
    pub rule: SiteRule,
}

/// Records scraped from one tab in one pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Listing {
    pub tab_id: i32,
    pub records: Vec<ExtractedRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FetchStatus {
    #[default]
    Idle,
    Detecting,
    Matched(String),
    Listed(usize),
    Failed(FetchError),
}

impl FetchStatus {
    pub fn is_error(&self) -> bool {
        matches!(
            self,
            FetchStatus::Failed(FetchError::AccessFailure(_)) | FetchStatus::Failed(FetchError::NoActiveTab)
        )
    }
}

impl fmt::Display for FetchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchStatus::Idle => Ok(()),
            FetchStatus::Detecting => write!(f, "Detecting website..."),
            FetchStatus::Matched(key) => write!(f, "Match found: {}", key),
            FetchStatus::Listed(0) => write!(f, "No messages found."),
            FetchStatus::Listed(n) => write!(f, "Found {} queries.", n),
            FetchStatus::Failed(err) => write!(f, "{}", err),
        }
    }
}

impl From<&Result<Listing, FetchError>> for FetchStatus {
    fn from(outcome: &Result<Listing, FetchError>) -> Self {
        match outcome {
            Ok(listing) => FetchStatus::Listed(listing.records.len()),
            Err(err) => FetchStatus::Failed(err.clone()),
        }
    }
}

/// Pages the browser lets extensions script
fn is_scriptable(url: &str) -> bool {
    Url::parse(url)
        .map(|u| matches!(u.scheme(), "http" | "https" | "file"))
        .unwrap_or(false)
}

pub struct FetchController<H> {
    host: H,
}

impl<H: TabHost> FetchController<H> {
    pub fn new(host: H) -> Self {
        FetchController { host }
    }

    /// Resolve the active tab and the first rule matching its URL
    pub async fn detect(&self, config: &SiteConfig) -> Result<Target, FetchError> {
        let tab = match self.host.active_tab().await {
            Ok(tab) => tab,
            Err(e) => {
                log::warn!("tab query failed: {}", e);
                None
            }
        };

        let Some(ActiveTab { id, url: Some(url) }) = tab else {
            return Err(FetchError::NoActiveTab);
        };
        if url.is_empty() {
            return Err(FetchError::NoActiveTab);
        }

        let rule = config
            .match_rule(Some(&url))
            .cloned()
            .ok_or(FetchError::NoRuleMatch)?;

        log::debug!("tab {} matched {}", id, rule.url_key);
        Ok(Target { tab_id: id, url, rule })
    }

    /// Scrape the target tab with its rule's class
    pub async fn extract(&self, target: &Target) -> Result<Listing, FetchError> {
        if !is_scriptable(&target.url) {
            return Err(FetchError::AccessFailure(format!("cannot script {}", target.url)));
        }

        let records = self
            .host
            .scrape(target.tab_id, &target.rule.class_name)
            .await?
            .ok_or_else(|| FetchError::AccessFailure("no frame result".to_string()))?;

        Ok(Listing {
            tab_id: target.tab_id,
            records,
        })
    }

    /// A full cycle. `on_status` sees the intermediate states; the final
    /// one follows from the returned result.
    pub async fn refresh(
        &self,
        config: &SiteConfig,
        on_status: impl Fn(FetchStatus),
    ) -> Result<Listing, FetchError> {
        on_status(FetchStatus::Detecting);
        let target = self.detect(config).await?;
        on_status(FetchStatus::Matched(target.rule.url_key.clone()));
        self.extract(&target).await
    }

    /// Ask the tab to scroll to a listed record. Failures are only logged.
    pub async fn navigate(&self, tab_id: i32, element_id: &str) {
        if let Err(e) = self.host.reveal(tab_id, element_id).await {
            log::warn!("reveal {} in tab {} failed: {}", element_id, tab_id, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractor::{self, StampClock};
    use crate::navigator;
    use crate::page::testing::FakePage;
    use futures::executor::block_on;
    use std::cell::RefCell;

    /// A browser with one tab showing a fake page
    struct FakeHost {
        tab: Option<ActiveTab>,
        page: FakePage,
        clock: StampClock,
        broken: bool,
        scrapes: RefCell<Vec<(i32, String)>>,
    }

    impl FakeHost {
        fn with_url(url: &str) -> FakeHost {
            FakeHost {
                tab: Some(ActiveTab {
                    id: 7,
                    url: Some(url.to_string()),
                }),
                page: FakePage::new(1_700_000_000_000),
                clock: StampClock::new(),
                broken: false,
                scrapes: RefCell::new(Vec::new()),
            }
        }

        fn without_tab() -> FakeHost {
            FakeHost {
                tab: None,
                ..FakeHost::with_url("")
            }
        }
    }

    impl TabHost for &FakeHost {
        async fn active_tab(&self) -> Result<Option<ActiveTab>, BridgeError> {
            Ok(self.tab.clone())
        }

        async fn scrape(
            &self,
            tab_id: i32,
            class_name: &str,
        ) -> Result<Option<Vec<ExtractedRecord>>, BridgeError> {
            self.scrapes.borrow_mut().push((tab_id, class_name.to_string()));
            if self.broken {
                return Err(BridgeError("Cannot access contents of the page".to_string()));
            }
            Ok(Some(extractor::scrape(&self.page, class_name, &self.clock)))
        }

        async fn reveal(&self, _tab_id: i32, element_id: &str) -> Result<(), BridgeError> {
            navigator::reveal(&self.page, element_id);
            Ok(())
        }
    }

    fn run(host: &FakeHost, config: &SiteConfig) -> (Vec<FetchStatus>, Result<Listing, FetchError>) {
        let statuses = RefCell::new(Vec::new());
        let controller = FetchController::new(host);
        let outcome = block_on(controller.refresh(config, |s| statuses.borrow_mut().push(s)));
        (statuses.into_inner(), outcome)
    }

    #[test]
    fn test_chatgpt_scenario() {
        let host = FakeHost::with_url("https://chatgpt.com/c/123");
        host.page.add("whitespace-pre-wrap", "Hi");
        host.page.add("whitespace-pre-wrap", "");
        host.page.add("whitespace-pre-wrap", "How are you");

        let (statuses, outcome) = run(&host, &SiteConfig::with_defaults());

        assert_eq!(
            statuses,
            vec![FetchStatus::Detecting, FetchStatus::Matched("chatgpt.com".to_string())]
        );
        assert_eq!(*host.scrapes.borrow(), vec![(7, "whitespace-pre-wrap".to_string())]);
        assert_eq!(FetchStatus::from(&outcome).to_string(), "Found 2 queries.");

        let listing = outcome.unwrap();
        assert_eq!(listing.tab_id, 7);
        let texts: Vec<&str> = listing.records.iter().map(|r| r.text.as_str()).collect();
        assert_eq!(texts, vec!["Hi", "How are you"]);
        assert_ne!(listing.records[0].id, listing.records[1].id);
    }

    #[test]
    fn test_empty_rules_report_no_configuration() {
        let host = FakeHost::with_url("https://chatgpt.com/c/123");
        host.page.add("whitespace-pre-wrap", "Hi");

        let (_, outcome) = run(&host, &SiteConfig::default());

        assert_eq!(outcome, Err(FetchError::NoRuleMatch));
        assert!(host.scrapes.borrow().is_empty());
    }

    #[test]
    fn test_no_active_tab() {
        let host = FakeHost::without_tab();

        let (statuses, outcome) = run(&host, &SiteConfig::with_defaults());

        assert_eq!(statuses, vec![FetchStatus::Detecting]);
        assert_eq!(outcome, Err(FetchError::NoActiveTab));
        assert!(host.scrapes.borrow().is_empty());
        assert_eq!(
            FetchStatus::from(&outcome).to_string(),
            "No active tab detected."
        );
    }

    #[test]
    fn test_tab_without_url() {
        let mut host = FakeHost::with_url("https://chatgpt.com");
        host.tab = Some(ActiveTab { id: 3, url: None });

        let (_, outcome) = run(&host, &SiteConfig::with_defaults());

        assert_eq!(outcome, Err(FetchError::NoActiveTab));
    }

    #[test]
    fn test_access_failure() {
        let mut host = FakeHost::with_url("https://perplexity.ai/search/abc");
        host.broken = true;

        let (_, outcome) = run(&host, &SiteConfig::with_defaults());

        assert!(matches!(outcome, Err(FetchError::AccessFailure(_))));
        assert_eq!(host.scrapes.borrow().len(), 1);
    }

    #[test]
    fn test_browser_pages_are_not_scripted() {
        let host = FakeHost::with_url("chrome://extensions/?id=chatgpt.com");

        let (_, outcome) = run(&host, &SiteConfig::with_defaults());

        assert!(matches!(outcome, Err(FetchError::AccessFailure(_))));
        assert!(host.scrapes.borrow().is_empty());
    }

    #[test]
    fn test_zero_records_is_not_an_error() {
        let host = FakeHost::with_url("https://kimi.com/chat");

        let (_, outcome) = run(&host, &SiteConfig::with_defaults());

        assert_eq!(FetchStatus::from(&outcome), FetchStatus::Listed(0));
        assert_eq!(FetchStatus::Listed(0).to_string(), "No messages found.");
    }

    #[test]
    fn test_navigate_to_listed_record() {
        let host = FakeHost::with_url("https://chatgpt.com/c/123");
        host.page.add("whitespace-pre-wrap", "Hi");
        let target = host.page.add("whitespace-pre-wrap", "How are you");

        let (_, outcome) = run(&host, &SiteConfig::with_defaults());
        let listing = outcome.unwrap();

        let controller = FetchController::new(&host);
        block_on(controller.navigate(listing.tab_id, &listing.records[1].id));

        assert_eq!(host.page.nodes.borrow()[target].scrolls, 1);
    }

    #[test]
    fn test_status_text() {
        assert_eq!(FetchStatus::Idle.to_string(), "");
        assert_eq!(FetchStatus::Detecting.to_string(), "Detecting website...");
        assert_eq!(
            FetchStatus::Matched("kimi.com".to_string()).to_string(),
            "Match found: kimi.com"
        );
        assert!(FetchStatus::Failed(FetchError::AccessFailure(String::new())).is_error());
        assert!(!FetchStatus::Failed(FetchError::NoRuleMatch).is_error());
    }
}
