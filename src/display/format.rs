/// Formats seconds the way the list shows them, e.g. `1h 1m 1s`.
pub fn format_time(seconds: u64) -> String {
    if seconds == 0 {
        return "0h 0m 0s".into();
    }
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;
    format!("{hours}h {minutes}m {secs}s")
}

/// Coarser label used next to chart bars, which only change once a minute.
pub fn format_chart_label(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    if hours == 0 && minutes == 0 {
        return "Less than a minute".into();
    }
    format!("{hours}h {minutes}m")
}
