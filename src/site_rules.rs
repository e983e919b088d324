/// Site rules: which elements to scrape on which pages

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// A URL substring paired with the CSS class whose elements hold chat messages
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SiteRule {
    pub url_key: String,
    pub class_name: String,
}

impl SiteRule {
    pub fn new(url_key: &str, class_name: &str) -> SiteRule {
        SiteRule {
            url_key: url_key.to_string(),
            class_name: class_name.to_string(),
        }
    }

    /// A rule with a blank key never matches anything
    pub fn is_active(&self) -> bool {
        !self.url_key.trim().is_empty()
    }

    pub fn matches(&self, url: &str) -> bool {
        self.is_active() && url.contains(self.url_key.as_str())
    }
}

/// Rules shipped with the extension, written to storage on first run
pub fn default_rules() -> Vec<SiteRule> {
    vec![
        SiteRule::new("chatgpt.com", "whitespace-pre-wrap"),
        SiteRule::new("perplexity.ai", "select-text"),
        SiteRule::new("gemini.google.com", "query-text.gds-body-l"),
        SiteRule::new("chat.deepseek.com", "fbb737a4"),
        SiteRule::new("kimi.com", "user-content"),
    ]
}

/// The ordered rule list. Order is both match priority and display order.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct SiteConfig {
    pub rules: Vec<SiteRule>,
}

impl SiteConfig {
    pub fn new(rules: Vec<SiteRule>) -> Self {
        SiteConfig { rules }
    }

    pub fn with_defaults() -> Self {
        Self::new(default_rules())
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// First active rule whose key occurs in `url`
    pub fn match_rule(&self, url: Option<&str>) -> Option<&SiteRule> {
        match_rule(&self.rules, url)
    }

    /// Append an empty row for the user to fill in
    pub fn add_blank(&mut self) {
        self.rules.push(SiteRule::default());
    }

    pub fn update(&mut self, index: usize, url_key: &str, class_name: &str) -> bool {
        self.rules
            .get_mut(index)
            .map(|rule| {
                rule.url_key = url_key.trim().to_string();
                rule.class_name = class_name.trim().to_string();
            })
            .is_some()
    }

    pub fn remove(&mut self, index: usize) -> bool {
        if index < self.rules.len() {
            self.rules.remove(index);
            true
        } else {
            false
        }
    }
}

/// Scan `rules` in order and return the first active rule contained in `url`
pub fn match_rule<'a>(rules: &'a [SiteRule], url: Option<&str>) -> Option<&'a SiteRule> {
    let url = url.filter(|u| !u.is_empty())?;
    rules.iter().find(|rule| rule.matches(url))
}

// One or more dot-joined class names, optionally with a leading dot
static CLASS_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\.?-?[_a-zA-Z][_a-zA-Z0-9-]*(\.-?[_a-zA-Z][_a-zA-Z0-9-]*)*$")
        .expect("class token pattern is valid")
});

/// Whether `token` can be turned into a class selector.
///
/// Blank tokens are reported as valid so that a freshly added row does not
/// show a warning before the user types anything.
pub fn is_valid_class_token(token: &str) -> bool {
    let token = token.trim();
    token.is_empty() || CLASS_TOKEN.is_match(token)
}
