/// Side panel UI: message list plus the settings editor

use crate::bridge::{ChromeHost, ChromeSyncStorage};
use crate::config_store::SiteConfigStore;
use crate::controller::{FetchController, FetchStatus, Listing};
use crate::site_rules::SiteConfig;
use crate::ui::components::{QueryList, StatusLine};
use crate::ui::settings::SettingsView;
use patternfly_yew::prelude::*;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

#[derive(Clone, Copy, PartialEq)]
enum View {
    Main,
    Settings,
}

#[function_component(SidePanel)]
pub fn side_panel() -> Html {
    let view = use_state(|| View::Main);
    let config = use_state(SiteConfig::default);
    let status = use_state(FetchStatus::default);
    let listing = use_state(|| None::<Listing>);

    // Load rules and scrape once the panel opens
    {
        let config = config.clone();
        let status = status.clone();
        let listing = listing.clone();

        use_effect_with((), move |_| {
            spawn_local(async move {
                let loaded = config_store().load().await;
                config.set(loaded.clone());
                run_refresh(loaded, status, listing).await;
            });
            || ()
        });
    }

    let on_refresh = {
        let config = config.clone();
        let status = status.clone();
        let listing = listing.clone();

        Callback::from(move |_| {
            let current = (*config).clone();
            let status = status.clone();
            let listing = listing.clone();

            // Overlapping refreshes are not guarded; the last to finish wins
            spawn_local(run_refresh(current, status, listing));
        })
    };

    let on_open_settings = {
        let view = view.clone();
        Callback::from(move |_| view.set(View::Settings))
    };

    // Back to the list: re-read the rules in case they changed, then scrape
    let on_back = {
        let view = view.clone();
        let config = config.clone();
        let status = status.clone();
        let listing = listing.clone();

        Callback::from(move |_| {
            view.set(View::Main);

            let config = config.clone();
            let status = status.clone();
            let listing = listing.clone();
            spawn_local(async move {
                let reloaded = config_store().load().await;
                config.set(reloaded.clone());
                run_refresh(reloaded, status, listing).await;
            });
        })
    };

    let on_config_change = {
        let config = config.clone();

        Callback::from(move |new_config: SiteConfig| {
            config.set(new_config.clone());
            spawn_local(async move {
                config_store().save(&new_config).await;
            });
        })
    };

    let on_select = {
        let listing = listing.clone();

        Callback::from(move |element_id: String| {
            let Some(tab_id) = listing.as_ref().map(|l| l.tab_id) else {
                return;
            };
            spawn_local(async move {
                FetchController::new(ChromeHost)
                    .navigate(tab_id, &element_id)
                    .await;
            });
        })
    };

    let records = listing
        .as_ref()
        .map(|l| l.records.clone())
        .unwrap_or_default();

    let hidden_unless = |wanted: View| {
        if *view == wanted {
            classes!("view")
        } else {
            classes!("view", "hidden")
        }
    };

    html! {
        <div class="padding-20">
            <div id="main-view" class={hidden_unless(View::Main)}>
                <div class="header">
                    <h1 class="panel-title">{"Chat Queries"}</h1>
                    <Button onclick={on_open_settings} variant={ButtonVariant::Secondary}>
                        {"⚙️ Settings"}
                    </Button>
                </div>

                <StatusLine status={(*status).clone()} />

                <Button onclick={on_refresh} variant={ButtonVariant::Primary} block={true}>
                    {"🔄 Refresh"}
                </Button>

                <QueryList records={records} on_select={on_select} />
            </div>

            <div id="settings-view" class={hidden_unless(View::Settings)}>
                <div class="header">
                    <h1 class="panel-title">{"Site Settings"}</h1>
                    <Button onclick={on_back} variant={ButtonVariant::Secondary}>
                        {"← Back"}
                    </Button>
                </div>

                <SettingsView config={(*config).clone()} on_change={on_config_change} />
            </div>
        </div>
    }
}

// Helper functions

fn config_store() -> SiteConfigStore<ChromeSyncStorage> {
    SiteConfigStore::new(ChromeSyncStorage)
}

/// One refresh cycle; fully replaces whatever the panel was showing
async fn run_refresh(
    config: SiteConfig,
    status: UseStateHandle<FetchStatus>,
    listing: UseStateHandle<Option<Listing>>,
) {
    listing.set(None);

    let controller = FetchController::new(ChromeHost);
    let outcome = controller
        .refresh(&config, |step| status.set(step))
        .await;

    status.set(FetchStatus::from(&outcome));
    match outcome {
        Ok(found) => listing.set(Some(found)),
        Err(e) => log::debug!("refresh stopped: {:?}", e),
    }
}
