use std::path::Path;

/// Extension used when a MIME type has no known extension.
const FALLBACK_EXTENSION: &str = "bin";

/// Format a byte count as `B`, `KB` or `MB` with one decimal.
#[must_use]
pub fn format_file_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = 1024 * 1024;
    if bytes < KB {
        format!("{bytes} B")
    } else if bytes < MB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    }
}

/// Format milliseconds since the Unix epoch as `YYYY-MM-DD HH:MM UTC`.
#[must_use]
pub fn format_timestamp(millis: u64) -> String {
    let secs = millis / 1000;
    let (year, month, day) = civil_from_days(secs / 86_400);
    let minutes = secs % 86_400 / 60;
    format!(
        "{year:04}-{month:02}-{day:02} {:02}:{:02} UTC",
        minutes / 60,
        minutes % 60
    )
}

/// Gregorian date of a day count since 1970-01-01.
fn civil_from_days(days: u64) -> (u64, u64, u64) {
    let z = days + 719_468;
    let era = z / 146_097;
    let doe = z - era * 146_097;
    let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = doy - (153 * mp + 2) / 5 + 1;
    let month = if mp < 10 { mp + 3 } else { mp - 9 };
    let year = yoe + era * 400 + u64::from(month <= 2);
    (year, month, day)
}

/// File extension for a MIME type, ignoring parameters such as `codecs=`.
#[must_use]
pub fn extension_for_mime(mime_type: &str) -> &'static str {
    let essence = mime_type.split(';').next().unwrap_or_default().trim();
    mime_guess::get_mime_extensions_str(essence)
        .and_then(|exts| exts.first().copied())
        .unwrap_or(FALLBACK_EXTENSION)
}

/// Download file name for an artifact recorded from `source_name`: the
/// source's stem with the artifact's extension (`1ubq.pdb` → `1ubq.webm`).
#[must_use]
pub fn download_name(source_name: &str, mime_type: &str) -> String {
    let stem = Path::new(source_name)
        .file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty())
        .unwrap_or("recording");
    format!("{stem}.{}", extension_for_mime(mime_type))
}
