/// chrome.* calls made from the side panel, via the JS bridge

use crate::config_store::{RuleStorage, SETTINGS_KEY};
use crate::controller::{ActiveTab, TabHost};
use crate::error::BridgeError;
use crate::extractor::ExtractedRecord;
use crate::site_rules::SiteConfig;
use serde::Deserialize;
use wasm_bindgen::prelude::*;

// Import JS bridge functions
#[wasm_bindgen(module = "/sidepanel.js")]
extern "C" {
    #[wasm_bindgen(catch)]
    async fn getActiveTab() -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn runInTab(tab_id: i32, command: &str, arg: &str) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn getSyncStorage(key: &str) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn setSyncStorage(key: &str, value: JsValue) -> Result<(), JsValue>;
}

/// Exported page-side commands, see `lib.rs`
const SCRAPE_COMMAND: &str = "scrape_messages";
const REVEAL_COMMAND: &str = "reveal_element";

/// One entry of the `executeScript` results array
#[derive(Debug, Deserialize)]
struct FrameResult<T> {
    result: Option<T>,
}

fn is_absent(value: &JsValue) -> bool {
    value.is_null() || value.is_undefined()
}

/// The running Chrome instance
#[derive(Clone, Copy, Default)]
pub struct ChromeHost;

impl TabHost for ChromeHost {
    async fn active_tab(&self) -> Result<Option<ActiveTab>, BridgeError> {
        let tab_js = getActiveTab()
            .await
            .map_err(|e| BridgeError(format!("Failed to query tabs: {:?}", e)))?;

        if is_absent(&tab_js) {
            return Ok(None);
        }
        serde_wasm_bindgen::from_value(tab_js)
            .map(Some)
            .map_err(|e| BridgeError(format!("Failed to parse tab: {:?}", e)))
    }

    async fn scrape(
        &self,
        tab_id: i32,
        class_name: &str,
    ) -> Result<Option<Vec<ExtractedRecord>>, BridgeError> {
        let results_js = runInTab(tab_id, SCRAPE_COMMAND, class_name)
            .await
            .map_err(|e| BridgeError(format!("Failed to run scraper: {:?}", e)))?;

        if is_absent(&results_js) {
            return Ok(None);
        }
        let frames: Vec<FrameResult<Vec<ExtractedRecord>>> =
            serde_wasm_bindgen::from_value(results_js)
                .map_err(|e| BridgeError(format!("Failed to parse results: {:?}", e)))?;

        // Only the top frame is scraped
        Ok(frames.into_iter().next().and_then(|frame| frame.result))
    }

    async fn reveal(&self, tab_id: i32, element_id: &str) -> Result<(), BridgeError> {
        runInTab(tab_id, REVEAL_COMMAND, element_id)
            .await
            .map(|_| ())
            .map_err(|e| BridgeError(format!("Failed to reveal: {:?}", e)))
    }
}

/// Rules in chrome.storage.sync
#[derive(Clone, Copy, Default)]
pub struct ChromeSyncStorage;

impl RuleStorage for ChromeSyncStorage {
    async fn read(&self) -> Result<Option<SiteConfig>, BridgeError> {
        let stored_js = getSyncStorage(SETTINGS_KEY)
            .await
            .map_err(|e| BridgeError(format!("Failed to get storage: {:?}", e)))?;

        if is_absent(&stored_js) {
            return Ok(None);
        }
        serde_wasm_bindgen::from_value(stored_js)
            .map(Some)
            .map_err(|e| BridgeError(format!("Failed to parse storage: {:?}", e)))
    }

    async fn write(&self, config: &SiteConfig) -> Result<(), BridgeError> {
        let config_js = serde_wasm_bindgen::to_value(config)
            .map_err(|e| BridgeError(format!("Failed to serialize storage: {:?}", e)))?;

        setSyncStorage(SETTINGS_KEY, config_js)
            .await
            .map_err(|e| BridgeError(format!("Failed to save storage: {:?}", e)))
    }
}
