use std::fmt::Debug;

use tracing::error;

/// Logs and swallows reply/reaction failures. Losing a status message to a
/// deleted channel or a rate limit is not worth failing the command over.
pub fn check_reply<RT, ET: Debug>(result: Result<RT, ET>) {
    if let Err(e) = result {
        error!("failed to deliver a reply: {:#?}", e);
    }
}

/// Seconds to `M:SS`, or `HH:MM:SS` once an hour is reached. Zero stays the
/// literal `"0"`, matching what the announcement lines expect for tracks
/// without a known position.
pub fn format_duration(seconds: u64) -> String {
    if seconds == 0 {
        return "0".to_string();
    }

    let (hours, rest) = (seconds / 3600, seconds % 3600);
    let (minutes, secs) = (rest / 60, rest % 60);

    if hours > 0 {
        format!("{:02}:{:02}:{:02}", hours, minutes, secs)
    } else {
        format!("{}:{:02}", minutes, secs)
    }
}

/// Splits `items` into pages of `page_size`. The last page may be short.
pub fn paginate<T>(items: &[T], page_size: usize) -> Vec<&[T]> {
    if page_size == 0 {
        return Vec::new();
    }
    items.chunks(page_size).collect()
}

/// Clamps a 1-based page request into `1..=page_count`. Out-of-range
/// requests land on the nearest valid page rather than erroring.
pub fn clamp_page(requested: i64, page_count: usize) -> usize {
    if page_count == 0 {
        return 1;
    }
    requested.clamp(1, page_count as i64) as usize
}

/// Parses `HH:MM:SS`, `##h##m##s` or bare seconds into seconds. Segments
/// accumulate base-60 from the left, so `1:02:03` is an hour, two minutes
/// and three seconds.
pub fn parse_timestamp(input: &str) -> Option<u64> {
    let parts: Vec<&str> = input
        .split(|c| matches!(c, ':' | 'h' | 'm' | 's'))
        .filter(|part| !part.is_empty())
        .collect();

    if parts.is_empty() || parts.len() > 3 {
        return None;
    }

    let mut seconds: u64 = 0;
    for part in parts {
        seconds = seconds
            .checked_mul(60)?
            .checked_add(part.trim().parse::<u64>().ok()?)?;
    }
    Some(seconds)
}

/// `"true"`/`"false"` (any case) become explicit values; anything else,
/// including no argument at all, means "flip the current setting".
pub fn parse_toggle(value: Option<&str>) -> Option<bool> {
    match value.map(str::to_ascii_lowercase).as_deref() {
        Some("true") => Some(true),
        Some("false") => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duration_formats() {
        assert_eq!(format_duration(0), "0");
        assert_eq!(format_duration(65), "1:05");
        assert_eq!(format_duration(600), "10:00");
        assert_eq!(format_duration(3661), "01:01:01");
        assert_eq!(format_duration(45296), "12:34:56");
    }

    #[test]
    fn pagination_splits_and_clamps() {
        let items: Vec<u32> = (1..=25).collect();
        let pages = paginate(&items, 10);

        assert_eq!(pages.len(), 3);
        assert_eq!(pages[0], (1..=10).collect::<Vec<u32>>().as_slice());
        assert_eq!(pages[1], (11..=20).collect::<Vec<u32>>().as_slice());
        assert_eq!(pages[2], (21..=25).collect::<Vec<u32>>().as_slice());

        assert_eq!(clamp_page(5, pages.len()), 3);
        assert_eq!(clamp_page(0, pages.len()), 1);
        assert_eq!(clamp_page(-3, pages.len()), 1);
        assert_eq!(clamp_page(2, pages.len()), 2);
        assert_eq!(clamp_page(1, 0), 1);
    }

    #[test]
    fn timestamps_parse() {
        assert_eq!(parse_timestamp("90"), Some(90));
        assert_eq!(parse_timestamp("1:05"), Some(65));
        assert_eq!(parse_timestamp("1:01:01"), Some(3661));
        assert_eq!(parse_timestamp("1h2m3s"), Some(3723));
        assert_eq!(parse_timestamp("2m30s"), Some(150));
        assert_eq!(parse_timestamp(""), None);
        assert_eq!(parse_timestamp("abc"), None);
        assert_eq!(parse_timestamp("1:2:3:4"), None);
    }

    #[test]
    fn toggle_values() {
        assert_eq!(parse_toggle(Some("true")), Some(true));
        assert_eq!(parse_toggle(Some("FALSE")), Some(false));
        assert_eq!(parse_toggle(Some("maybe")), None);
        assert_eq!(parse_toggle(None), None);
    }
}
