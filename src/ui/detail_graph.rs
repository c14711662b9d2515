/// Per-video reaction chart shown in the detail dialog

use crate::chart::{bucket_series, time_range, BucketUnit, ChartSeries};
use crate::reaction_data::VideoDetail;
use crate::ui::format::format_local_time;
use std::collections::BTreeSet;
use web_sys::HtmlSelectElement;
use yew::prelude::*;

const WIDTH: f64 = 800.0;
const HEIGHT: f64 = 320.0;
const MARGIN_LEFT: f64 = 40.0;
const MARGIN_BOTTOM: f64 = 30.0;
const MARGIN_TOP: f64 = 10.0;

const PALETTE: [&str; 6] = ["#e0245e", "#f5a623", "#5b4fe8", "#17bf63", "#1da1f2", "#8e8e93"];

#[derive(Properties, PartialEq)]
pub struct DetailGraphProps {
    pub detail: VideoDetail,
    #[prop_or_default]
    pub initial_unit: BucketUnit,
}

#[function_component(DetailGraph)]
pub fn detail_graph(props: &DetailGraphProps) -> Html {
    let unit = {
        let initial = props.initial_unit;
        use_state(move || initial)
    };

    let on_unit_change = {
        let unit = unit.clone();
        Callback::from(move |e: Event| {
            if let Some(select) = e.target_dyn_into::<HtmlSelectElement>() {
                if let Some(selected) = BucketUnit::parse(&select.value()) {
                    unit.set(selected);
                }
            }
        })
    };

    let series = bucket_series(&props.detail.details, *unit);
    let title = props.detail.title.clone().unwrap_or_default();
    let channel = props.detail.channel.clone().unwrap_or_default();

    html! {
        <div class="detail-graph">
            <div class="detail-graph-options">
                {"Bucket: "}
                <select onchange={on_unit_change}>
                    {for [BucketUnit::Second, BucketUnit::Minute].iter().map(|option| html! {
                        <option value={option.as_str()} selected={*option == *unit}>
                            {option.label()}
                        </option>
                    })}
                </select>
            </div>
            <h2 class="detail-graph-title">{title}</h2>
            <p class="detail-graph-subtitle">{channel}</p>
            if series.is_empty() {
                <p class="empty-state">{"No reactions recorded for this video."}</p>
            } else {
                {render_chart(&series)}
                <div class="detail-graph-legend">
                    {for series.iter().enumerate().map(|(i, s)| html! {
                        <span class="legend-item" style={format!("color: {};", PALETTE[i % PALETTE.len()])}>
                            {format!("■ {}", s.reaction)}
                        </span>
                    })}
                </div>
            }
        </div>
    }
}

fn render_chart(series: &[ChartSeries]) -> Html {
    let buckets: Vec<i64> = series
        .iter()
        .flat_map(|s| s.points.iter().map(|(t, _)| *t))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    let max_count = series.iter().map(ChartSeries::max_count).max().unwrap_or(0).max(1);

    let plot_width = WIDTH - MARGIN_LEFT;
    let plot_height = HEIGHT - MARGIN_TOP - MARGIN_BOTTOM;
    let slot = plot_width / buckets.len() as f64;
    let bar = (slot / series.len() as f64).max(1.0);

    let bars = series.iter().enumerate().flat_map(|(i, s)| {
        let color = PALETTE[i % PALETTE.len()];
        let buckets = &buckets;
        s.points.iter().map(move |(t, count)| {
            let slot_index = buckets.binary_search(t).unwrap_or(0) as f64;
            let height = *count as f64 / max_count as f64 * plot_height;
            let x = MARGIN_LEFT + slot_index * slot + i as f64 * bar;
            let y = MARGIN_TOP + plot_height - height;
            html! {
                <rect
                    x={format!("{:.1}", x)}
                    y={format!("{:.1}", y)}
                    width={format!("{:.1}", bar)}
                    height={format!("{:.1}", height)}
                    fill={color}
                >
                    <title>{format!("{} {}: {}", format_local_time(*t), s.reaction, count)}</title>
                </rect>
            }
        })
    });

    let axis_labels = time_range(series)
        .map(|(first, last)| {
            html! {
                <>
                    <text x={format!("{:.1}", MARGIN_LEFT)} y={format!("{:.1}", HEIGHT - 8.0)} font-size="12">
                        {format_local_time(first)}
                    </text>
                    <text x={format!("{:.1}", WIDTH)} y={format!("{:.1}", HEIGHT - 8.0)} font-size="12" text-anchor="end">
                        {format_local_time(last)}
                    </text>
                </>
            }
        })
        .unwrap_or_default();

    html! {
        <svg class="detail-chart" viewBox={format!("0 0 {} {}", WIDTH, HEIGHT)} preserveAspectRatio="none">
            <line
                x1={format!("{:.1}", MARGIN_LEFT)}
                y1={format!("{:.1}", MARGIN_TOP + plot_height)}
                x2={format!("{:.1}", WIDTH)}
                y2={format!("{:.1}", MARGIN_TOP + plot_height)}
                stroke="#ccc"
            />
            <text x="0" y={format!("{:.1}", MARGIN_TOP + 12.0)} font-size="12">{max_count}</text>
            <text x="0" y={format!("{:.1}", MARGIN_TOP + plot_height)} font-size="12">{"0"}</text>
            {for bars}
            {axis_labels}
        </svg>
    }
}
