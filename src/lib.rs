/// Reaction Recorder - Chrome Extension recording reaction-button clicks
/// Built with Rust + WASM + Yew

pub mod aggregate;
pub mod capture;
pub mod chart;
pub mod chrome;
pub mod config;
pub mod error;
pub mod operations;
pub mod reaction_data;
pub mod storage;
pub mod store;
pub mod ui;

use wasm_bindgen::prelude::*;

// Set up panic hook for better error messages in the browser console
#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    wasm_logger::init(wasm_logger::Config::default());
}

// Re-export the video id parser for the content script
#[wasm_bindgen]
pub fn extract_video_id(url: &str) -> Option<String> {
    capture::extract_video_id(url)
}

// Record one click from the content script
#[wasm_bindgen]
pub async fn record_reaction(channel: String, title: String, page_url: String, alt_text: String) -> Result<(), JsValue> {
    let Some(click) = capture::ReactionClick::from_page(&channel, &title, &page_url, &alt_text) else {
        log::warn!("no reaction symbol in alt text {:?}", alt_text);
        return Ok(());
    };

    let now = chrono::DateTime::from_timestamp_millis(js_sys::Date::now() as i64)
        .ok_or_else(|| JsValue::from_str("clock out of range"))?;
    let (event, meta) = click.into_records(now);

    operations::record(&chrome::ChromeStorage, &event, &meta)
        .await
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

// Start the Yew app for the reaction viewer page
#[wasm_bindgen]
pub fn start_viewer(config_json: Option<String>) -> Result<(), JsValue> {
    let config = config::ViewerConfig::from_json(config_json.as_deref())
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
    log::set_max_level(config.log_level().map_err(|e| JsValue::from_str(&e.to_string()))?);

    yew::Renderer::<ui::viewer::ReactionViewer>::with_props(ui::viewer::ReactionViewerProps { config }).render();
    Ok(())
}
