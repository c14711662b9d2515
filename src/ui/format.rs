/// Date display and `datetime-local` input handling

use chrono::{DateTime, Utc};
use wasm_bindgen::JsValue;

/// "2024-01-02T03:04" → "2024/01/02 03:04"
pub fn format_input(value: &str) -> String {
    value.replace('T', " ").replace('-', "/")
}

/// Heading for the applied filter
pub fn filter_title(start: &str, end: &str) -> String {
    if start.is_empty() && end.is_empty() {
        "All time".to_string()
    } else {
        format!("{} ～ {}", format_input(start), format_input(end))
    }
}

/// Local time `yyyy/MM/dd HH:mm:ss.SSS`
pub fn format_local_millis(millis: i64) -> String {
    let date = js_sys::Date::new(&JsValue::from_f64(millis as f64));
    format!(
        "{:04}/{:02}/{:02} {:02}:{:02}:{:02}.{:03}",
        date.get_full_year(),
        date.get_month() + 1,
        date.get_date(),
        date.get_hours(),
        date.get_minutes(),
        date.get_seconds(),
        date.get_milliseconds()
    )
}

/// Local `HH:mm:ss`, for chart axis labels
pub fn format_local_time(millis: i64) -> String {
    let date = js_sys::Date::new(&JsValue::from_f64(millis as f64));
    format!(
        "{:02}:{:02}:{:02}",
        date.get_hours(),
        date.get_minutes(),
        date.get_seconds()
    )
}

/// A `datetime-local` value is in the browser's time zone; empty or invalid gives `None`
pub fn parse_local_input(value: &str) -> Option<DateTime<Utc>> {
    if value.is_empty() {
        return None;
    }
    let millis = js_sys::Date::new(&JsValue::from_str(value)).get_time();
    if millis.is_nan() {
        return None;
    }
    DateTime::from_timestamp_millis(millis as i64)
}
