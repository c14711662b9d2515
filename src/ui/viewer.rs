/// Reaction viewer page

use crate::aggregate::{AggregateRow, Aggregation, TimeWindow};
use crate::chrome::ChromeStorage;
use crate::config::ViewerConfig;
use crate::store::EventStore;
use crate::ui::detail_graph::DetailGraph;
use crate::ui::dialog::DialogState;
use crate::ui::format::{filter_title, format_local_millis, parse_local_input};
use patternfly_yew::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::HtmlInputElement;
use yew::prelude::*;

#[derive(Clone, PartialEq)]
enum ViewState {
    Loading,
    Idle,
    Error(String),
}

#[derive(Properties, PartialEq)]
pub struct ReactionViewerProps {
    #[prop_or_default]
    pub config: ViewerConfig,
}

#[function_component(ReactionViewer)]
pub fn reaction_viewer(props: &ReactionViewerProps) -> Html {
    let state = use_state(|| ViewState::Loading);
    let store = use_state(|| None::<EventStore<ChromeStorage>>);
    let aggregation = use_state(Aggregation::default);
    let editing_start = use_state(String::new);
    let editing_end = use_state(String::new);
    let applied = use_state(|| (String::new(), String::new()));
    let dialog = use_state(DialogState::default);

    // Load storage on mount
    {
        let state = state.clone();
        let store = store.clone();
        let aggregation = aggregation.clone();
        let config = props.config.clone();

        use_effect_with((), move |_| {
            spawn_local(async move {
                match EventStore::open(ChromeStorage, config).await {
                    Ok(loaded) => {
                        aggregation.set(loaded.aggregate(TimeWindow::all()));
                        store.set(Some(loaded));
                        state.set(ViewState::Idle);
                    }
                    Err(e) => {
                        log::error!("load failed: {}", e);
                        state.set(ViewState::Error(format!("Failed to load: {}", e)));
                    }
                }
            });
            || ()
        });
    }

    let on_start_input = {
        let editing_start = editing_start.clone();
        Callback::from(move |e: InputEvent| {
            if let Some(input) = e.target_dyn_into::<HtmlInputElement>() {
                editing_start.set(input.value());
            }
        })
    };

    let on_end_input = {
        let editing_end = editing_end.clone();
        Callback::from(move |e: InputEvent| {
            if let Some(input) = e.target_dyn_into::<HtmlInputElement>() {
                editing_end.set(input.value());
            }
        })
    };

    // Apply the edited range
    let on_filter = {
        let store = store.clone();
        let aggregation = aggregation.clone();
        let editing_start = editing_start.clone();
        let editing_end = editing_end.clone();
        let applied = applied.clone();

        Callback::from(move |_| {
            let start = (*editing_start).clone();
            let end = (*editing_end).clone();
            let window = TimeWindow::new(parse_local_input(&start), parse_local_input(&end));

            if let Some(store) = store.as_ref() {
                aggregation.set(store.aggregate(window));
            }
            applied.set((start, end));
        })
    };

    // Wipe all data after confirmation
    let on_clear = {
        let store = store.clone();
        let aggregation = aggregation.clone();
        let state = state.clone();
        let dialog = dialog.clone();

        Callback::from(move |_| {
            let confirmed = web_sys::window()
                .and_then(|w| w.confirm_with_message("Clear all recorded reactions?").ok())
                .unwrap_or(false);
            if !confirmed {
                return;
            }

            let Some(mut cleared) = (*store).clone() else {
                return;
            };
            let store = store.clone();
            let aggregation = aggregation.clone();
            let state = state.clone();
            dialog.set(DialogState::Closed);

            spawn_local(async move {
                let result = cleared.clear().await;
                aggregation.set(cleared.aggregate(TimeWindow::all()));
                store.set(Some(cleared));
                if let Err(e) = result {
                    state.set(ViewState::Error(format!("Failed to clear: {}", e)));
                }
            });
        })
    };

    let on_row_click = {
        let store = store.clone();
        let dialog = dialog.clone();

        Callback::from(move |video: Option<String>| {
            if let Some(store) = store.as_ref() {
                dialog.set(DialogState::open(store.video_detail(video.as_deref())));
            }
        })
    };

    let on_close_dialog = {
        let dialog = dialog.clone();
        Callback::from(move |_: MouseEvent| {
            dialog.set(dialog.close());
        })
    };

    let bucket_unit = props.config.bucket_unit;
    let (start, end) = &*applied;

    html! {
        <div class="container">
            <div class="filter">
                <div class="daterange">
                    {"Filter"}
                    <input
                        type="datetime-local"
                        value={(*editing_start).clone()}
                        oninput={on_start_input}
                    />
                    {"～"}
                    <input
                        type="datetime-local"
                        value={(*editing_end).clone()}
                        oninput={on_end_input}
                    />
                </div>
                <Button onclick={on_filter} variant={ButtonVariant::Primary}>
                    {"Apply"}
                </Button>
                <hr class="vhr" />
                <Button onclick={on_clear} variant={ButtonVariant::Danger}>
                    {"Clear"}
                </Button>
            </div>

            // Status display
            {match &*state {
                ViewState::Loading => html! {
                    <div class="loading-text-center">
                        <Spinner />
                        <p class="loading-text">{"Loading reactions..."}</p>
                    </div>
                },
                ViewState::Error(err) => html! {
                    <Alert r#type={AlertType::Danger} title={"Error"} inline={true}>
                        {err.clone()}
                    </Alert>
                },
                ViewState::Idle => html! {}
            }}

            <div class="result">
                <h1 class="result-title">{filter_title(start, end)}</h1>
                <table class="reaction-table">
                    <thead>
                        <tr>
                            <th class="video">{"Video ID"}</th>
                            <th class="channel">{"Channel"}</th>
                            <th class="title">{"Title"}</th>
                            <th class="last_reaction">{"Last reaction"}</th>
                            {for aggregation.reaction_kinds.iter().map(|kind| html! {
                                <th class="reaction">{kind}</th>
                            })}
                        </tr>
                    </thead>
                    <tbody>
                        {for aggregation.rows.iter().map(|row| html! {
                            <AggregateRowView
                                row={row.clone()}
                                reaction_kinds={aggregation.reaction_kinds.clone()}
                                on_click={on_row_click.clone()}
                            />
                        })}
                    </tbody>
                </table>
                if aggregation.rows.is_empty() && *state == ViewState::Idle {
                    <div class="empty-state">
                        <p>{"No reactions in this range."}</p>
                    </div>
                }
            </div>

            if let Some(detail) = dialog.selected() {
                <div class="dialog-backdrop" onclick={on_close_dialog.clone()}>
                    <div class="dialog-content" onclick={Callback::from(|e: MouseEvent| e.stop_propagation())}>
                        <div class="dialog-actions">
                            <Button onclick={on_close_dialog} variant={ButtonVariant::Secondary}>
                                {"✗"}
                            </Button>
                        </div>
                        <DetailGraph detail={detail.clone()} initial_unit={bucket_unit} />
                    </div>
                </div>
            }
        </div>
    }
}

#[derive(Properties, PartialEq)]
struct AggregateRowProps {
    row: AggregateRow,
    reaction_kinds: Vec<String>,
    on_click: Callback<Option<String>>,
}

#[function_component(AggregateRowView)]
fn aggregate_row_view(props: &AggregateRowProps) -> Html {
    let row = &props.row;
    let channel = row.channel.clone().unwrap_or_default();
    let title = row.title.clone().unwrap_or_default();

    html! {
        <tr onclick={props.on_click.reform({
            let video = row.video.clone();
            move |_| video.clone()
        })}>
            <td>{row.video.clone().unwrap_or_default()}</td>
            <td title={channel.clone()}>{channel}</td>
            <td title={title.clone()}>{title}</td>
            <td>{format_local_millis(row.last_reaction)}</td>
            {for props.reaction_kinds.iter().map(|kind| html! {
                <td class="reaction">{row.count(kind)}</td>
            })}
        </tr>
    }
}
