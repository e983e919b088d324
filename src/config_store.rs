/// Loading and saving the rule list in chrome.storage.sync

use crate::error::BridgeError;
use crate::site_rules::SiteConfig;

/// Key of the rule list in synced storage
pub const SETTINGS_KEY: &str = "scraperSettings";

/// Where the rule list lives between sessions
#[allow(async_fn_in_trait)]
pub trait RuleStorage {
    /// `Ok(None)` when nothing has been stored yet
    async fn read(&self) -> Result<Option<SiteConfig>, BridgeError>;

    async fn write(&self, config: &SiteConfig) -> Result<(), BridgeError>;
}

pub struct SiteConfigStore<S> {
    storage: S,
}

impl<S: RuleStorage> SiteConfigStore<S> {
    pub fn new(storage: S) -> Self {
        SiteConfigStore { storage }
    }

    /// Stored rules, or the defaults on first run (which are then stored).
    ///
    /// Read errors also fall back to the defaults but leave storage as is,
    /// so a transient failure cannot wipe the user's rules.
    pub async fn load(&self) -> SiteConfig {
        match self.storage.read().await {
            Ok(Some(config)) => config,
            Ok(None) => {
                log::debug!("no stored rules, writing defaults");
                let defaults = SiteConfig::with_defaults();
                self.save(&defaults).await;
                defaults
            }
            Err(e) => {
                log::warn!("could not read rules, using defaults: {}", e);
                SiteConfig::with_defaults()
            }
        }
    }

    pub async fn save(&self, config: &SiteConfig) {
        if let Err(e) = self.storage.write(config).await {
            log::error!("failed to save {} rules: {}", config.len(), e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::site_rules::SiteRule;
    use futures::executor::block_on;
    use std::cell::{Cell, RefCell};

    #[derive(Default)]
    struct MemoryStorage {
        stored: RefCell<Option<SiteConfig>>,
        fail_reads: bool,
        fail_writes: bool,
        writes: Cell<usize>,
    }

    impl RuleStorage for &MemoryStorage {
        async fn read(&self) -> Result<Option<SiteConfig>, BridgeError> {
            if self.fail_reads {
                return Err(BridgeError("quota exceeded".to_string()));
            }
            Ok(self.stored.borrow().clone())
        }

        async fn write(&self, config: &SiteConfig) -> Result<(), BridgeError> {
            self.writes.set(self.writes.get() + 1);
            if self.fail_writes {
                return Err(BridgeError("quota exceeded".to_string()));
            }
            *self.stored.borrow_mut() = Some(config.clone());
            Ok(())
        }
    }

    #[test]
    fn test_first_run_stores_defaults() {
        let storage = MemoryStorage::default();
        let store = SiteConfigStore::new(&storage);

        let config = block_on(store.load());

        assert_eq!(config, SiteConfig::with_defaults());
        assert_eq!(*storage.stored.borrow(), Some(SiteConfig::with_defaults()));
    }

    #[test]
    fn test_load_returns_stored_rules() {
        let stored = SiteConfig::new(vec![SiteRule::new("example.org", "post")]);
        let storage = MemoryStorage {
            stored: RefCell::new(Some(stored.clone())),
            ..MemoryStorage::default()
        };
        let store = SiteConfigStore::new(&storage);

        assert_eq!(block_on(store.load()), stored);
        assert_eq!(storage.writes.get(), 0);
    }

    #[test]
    fn test_stored_empty_list_is_kept() {
        let storage = MemoryStorage {
            stored: RefCell::new(Some(SiteConfig::default())),
            ..MemoryStorage::default()
        };
        let store = SiteConfigStore::new(&storage);

        assert!(block_on(store.load()).is_empty());
    }

    #[test]
    fn test_read_failure_falls_back_without_writing() {
        let storage = MemoryStorage {
            fail_reads: true,
            ..MemoryStorage::default()
        };
        let store = SiteConfigStore::new(&storage);

        assert_eq!(block_on(store.load()), SiteConfig::with_defaults());
        assert_eq!(storage.writes.get(), 0);
    }

    #[test]
    fn test_save_overwrites() {
        let storage = MemoryStorage::default();
        let store = SiteConfigStore::new(&storage);
        let mut config = block_on(store.load());

        config.remove(0);
        config.add_blank();
        block_on(store.save(&config));

        assert_eq!(block_on(store.load()), config);
    }

    #[test]
    fn test_write_failure_is_swallowed() {
        let storage = MemoryStorage {
            fail_writes: true,
            ..MemoryStorage::default()
        };
        let store = SiteConfigStore::new(&storage);

        // First run still hands back the defaults
        assert_eq!(block_on(store.load()), SiteConfig::with_defaults());
        assert_eq!(storage.writes.get(), 1);
    }
}
