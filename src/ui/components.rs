/// Reusable UI components

use crate::controller::FetchStatus;
use crate::error::FetchError;
use crate::extractor::ExtractedRecord;
use patternfly_yew::prelude::*;
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct StatusLineProps {
    pub status: FetchStatus,
}

/// The single status region of the main view
#[function_component(StatusLine)]
pub fn status_line(props: &StatusLineProps) -> Html {
    let text = props.status.to_string();

    match &props.status {
        FetchStatus::Idle => html! {},
        FetchStatus::Detecting => html! {
            <div class="loading-text-center">
                <Spinner />
                <p id="status" class="loading-text">{text}</p>
            </div>
        },
        FetchStatus::Failed(FetchError::NoRuleMatch) => html! {
            <Alert r#type={AlertType::Warning} title={text} inline={true}>
            </Alert>
        },
        FetchStatus::Listed(0) => html! {
            <Alert r#type={AlertType::Info} title={text} inline={true}>
            </Alert>
        },
        status if status.is_error() => html! {
            <Alert r#type={AlertType::Danger} title={text} inline={true}>
            </Alert>
        },
        _ => html! {
            <p id="status" class="message-text">{text}</p>
        },
    }
}

#[derive(Properties, PartialEq)]
pub struct QueryListProps {
    pub records: Vec<ExtractedRecord>,
    /// Called with the record's element id
    pub on_select: Callback<String>,
}

#[function_component(QueryList)]
pub fn query_list(props: &QueryListProps) -> Html {
    html! {
        <ul id="query-list" class="query-list">
            {for props.records.iter().map(|record| {
                let id = record.id.clone();
                html! {
                    <li
                        key={record.id.clone()}
                        class="query-item"
                        title="Go to chat"
                        onclick={props.on_select.reform(move |_: MouseEvent| id.clone())}
                    >
                        {&record.text}
                    </li>
                }
            })}
        </ul>
    }
}
