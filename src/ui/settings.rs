/// Settings view: one editable row per site rule

use crate::site_rules::{SiteConfig, SiteRule, is_valid_class_token};
use patternfly_yew::prelude::*;
use uuid::Uuid;
use web_sys::HtmlInputElement;
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct SettingsViewProps {
    pub config: SiteConfig,
    /// Receives the whole edited list; the caller stores it
    pub on_change: Callback<SiteConfig>,
}

#[function_component(SettingsView)]
pub fn settings_view(props: &SettingsViewProps) -> Html {
    // Row keys only live as long as the view; they are never stored.
    // Resized during render so every row has its own key in the same pass.
    let keys = use_mut_ref(Vec::<Uuid>::new);
    sync_row_keys(&mut keys.borrow_mut(), props.config.len());
    let row_keys: Vec<Uuid> = keys.borrow().clone();

    let on_add = {
        let config = props.config.clone();
        let on_change = props.on_change.clone();

        Callback::from(move |_| {
            let mut new_config = config.clone();
            new_config.add_blank();
            on_change.emit(new_config);
        })
    };

    let on_update = {
        let config = props.config.clone();
        let on_change = props.on_change.clone();

        Callback::from(move |(index, url_key, class_name): (usize, String, String)| {
            let mut new_config = config.clone();
            if new_config.update(index, &url_key, &class_name) {
                on_change.emit(new_config);
            }
        })
    };

    let on_remove = {
        let config = props.config.clone();
        let on_change = props.on_change.clone();
        let keys = keys.clone();

        Callback::from(move |index: usize| {
            let mut new_config = config.clone();
            if new_config.remove(index) {
                remove_row_key(&mut keys.borrow_mut(), index);
                on_change.emit(new_config);
            }
        })
    };

    html! {
        <div id="settings-list" class="settings-list">
            if props.config.is_empty() {
                <p class="empty-state-hint">{"No sites configured. Nothing will be scraped."}</p>
            }
            {for props.config.rules.iter().zip(row_keys).enumerate().map(|(index, (rule, key))| {
                html! {
                    <RuleRow
                        key={key.to_string()}
                        index={index}
                        rule={rule.clone()}
                        on_update={on_update.clone()}
                        on_remove={on_remove.clone()}
                    />
                }
            })}
            <Button onclick={on_add} variant={ButtonVariant::Secondary} block={true}>
                {"+ Add Site"}
            </Button>
        </div>
    }
}

/// One distinct key per row: new rows get fresh keys, surplus keys are dropped
fn sync_row_keys(keys: &mut Vec<Uuid>, len: usize) {
    keys.resize_with(len, Uuid::new_v4);
}

/// Drop the key of a removed row so the rows below keep theirs
fn remove_row_key(keys: &mut Vec<Uuid>, index: usize) {
    if index < keys.len() {
        keys.remove(index);
    }
}

#[derive(Properties, PartialEq)]
struct RuleRowProps {
    index: usize,
    rule: SiteRule,
    on_update: Callback<(usize, String, String)>,
    on_remove: Callback<usize>,
}

#[function_component(RuleRow)]
fn rule_row(props: &RuleRowProps) -> Html {
    let index = props.index;

    let on_url_input = {
        let class_name = props.rule.class_name.clone();
        props.on_update.reform(move |e: InputEvent| {
            (index, input_value(&e), class_name.clone())
        })
    };

    let on_class_input = {
        let url_key = props.rule.url_key.clone();
        props.on_update.reform(move |e: InputEvent| {
            (index, url_key.clone(), input_value(&e))
        })
    };

    html! {
        <div class="setting-row">
            <input
                type="text"
                placeholder="URL part (e.g. chatgpt.com)"
                value={props.rule.url_key.clone()}
                oninput={on_url_input}
            />
            <input
                type="text"
                placeholder="Class name (e.g. whitespace-pre-wrap)"
                value={props.rule.class_name.clone()}
                oninput={on_class_input}
            />
            if !is_valid_class_token(&props.rule.class_name) {
                <p class="setting-hint">{"Not a valid CSS class; nothing will match."}</p>
            }
            <div class="setting-actions">
                <Button
                    onclick={props.on_remove.reform(move |_| index)}
                    variant={ButtonVariant::Danger}
                >
                    {"Remove"}
                </Button>
            </div>
        </div>
    }
}

fn input_value(e: &InputEvent) -> String {
    e.target_dyn_into::<HtmlInputElement>()
        .map(|input| input.value())
        .unwrap_or_default()
}
