const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];

/// Format a byte count with the largest unit whose scaled value is at least 1.
///
/// One decimal place, trailing `.0` dropped: `1536` is `"1.5 KB"`, `1048576`
/// is `"1 MB"`. Sizes past the GB range stay in GB.
pub fn format_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 B".to_string();
    }

    let mut unit = 0;
    let mut value = bytes as f64;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    let rounded = format!("{:.1}", value);
    let trimmed = rounded.strip_suffix(".0").unwrap_or(&rounded);
    format!("{} {}", trimmed, UNITS[unit])
}
