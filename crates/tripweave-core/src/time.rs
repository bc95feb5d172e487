//! Canonical time handling.
//!
//! Everything the pipeline compares chronologically goes through
//! [`normalize_time`] first. It runs on untrusted model output, so it never
//! fails: anything it cannot interpret is passed through cleaned but
//! otherwise untouched.

/// Convert a textual time into canonical 24-hour `HH:MM`.
///
/// Only word characters and `:` survive cleaning, and the result is
/// lower-cased. Inputs carrying an `am`/`pm` marker are converted from
/// 12-hour form; everything else (already 24-hour, or unparseable) is
/// returned cleaned.
pub fn normalize_time(text: &str) -> String {
    let clean: String = text
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == ':')
        .collect::<String>()
        .to_lowercase();

    if clean.is_empty() {
        return clean;
    }

    let Some((marker_at, is_pm)) = find_period_marker(&clean) else {
        return clean;
    };

    match twelve_to_twenty_four(&clean[..marker_at], is_pm) {
        Some(canonical) => canonical,
        None => clean,
    }
}

/// Minutes since midnight for a canonical `HH:MM` (or `H:MM`) time.
pub fn minutes_since_midnight(time: &str) -> Option<u32> {
    let (hours, minutes) = time.trim().split_once(':')?;
    let hours: u32 = hours.parse().ok()?;
    let minutes: u32 = minutes.parse().ok()?;
    (hours < 24 && minutes < 60).then_some(hours * 60 + minutes)
}

/// [`normalize_time`], then zero-padded when the result reads as a clock
/// time, so `9:30` becomes `09:30`. Anything else comes back normalized.
pub fn canonical_clock(text: &str) -> String {
    let normalized = normalize_time(text);
    match minutes_since_midnight(&normalized) {
        Some(minutes) => format!("{:02}:{:02}", minutes / 60, minutes % 60),
        None => normalized,
    }
}

/// True if both texts normalize to the same time.
pub fn same_time(a: &str, b: &str) -> bool {
    normalize_time(a) == normalize_time(b)
}

/// True for strict two-digit `HH:MM` in range.
pub fn is_canonical(time: &str) -> bool {
    let bytes = time.as_bytes();
    bytes.len() == 5 && bytes[2] == b':' && minutes_since_midnight(time).is_some()
}

/// First `am`/`pm` occurrence: (byte offset, is_pm).
fn find_period_marker(clean: &str) -> Option<(usize, bool)> {
    let am = clean.find("am");
    let pm = clean.find("pm");
    match (am, pm) {
        (Some(a), Some(p)) if p < a => Some((p, true)),
        (Some(a), _) => Some((a, false)),
        (None, Some(p)) => Some((p, true)),
        (None, None) => None,
    }
}

fn twelve_to_twenty_four(hours_minutes: &str, is_pm: bool) -> Option<String> {
    let (hours_text, minutes_text) = match hours_minutes.split_once(':') {
        Some((h, m)) => (h, Some(m)),
        None => (hours_minutes, None),
    };

    let hours: u32 = hours_text.parse().ok()?;
    let minutes: u32 = minutes_text
        .and_then(|m| m.parse().ok())
        .filter(|m| *m < 60)
        .unwrap_or(0);

    let hours = match (is_pm, hours) {
        (true, h) if h < 12 => h + 12,
        (false, 12) => 0,
        (_, h) => h,
    };
    if hours > 23 {
        return None;
    }

    Some(format!("{:02}:{:02}", hours, minutes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_twelve_hour_times() {
        assert_eq!(normalize_time("2:30 PM"), "14:30");
        assert_eq!(normalize_time("12:00 AM"), "00:00");
        assert_eq!(normalize_time("12:15 pm"), "12:15");
        assert_eq!(normalize_time("9am"), "09:00");
        assert_eq!(normalize_time("7:05a.m."), "07:05");
        assert_eq!(normalize_time("11 PM"), "23:00");
    }

    #[test]
    fn empty_input_yields_empty_string() {
        assert_eq!(normalize_time(""), "");
        assert_eq!(normalize_time("  "), "");
    }

    #[test]
    fn twenty_four_hour_times_pass_through() {
        assert_eq!(normalize_time("14:30"), "14:30");
        assert_eq!(normalize_time(" 09:00 "), "09:00");
    }

    #[test]
    fn idempotent_on_canonical_times() {
        for h in 0..24 {
            for m in [0, 1, 15, 30, 59] {
                let canonical = format!("{:02}:{:02}", h, m);
                let once = normalize_time(&canonical);
                assert_eq!(once, canonical);
                assert_eq!(normalize_time(&once), once);
            }
        }
    }

    #[test]
    fn unparseable_text_is_cleaned_not_rejected() {
        assert_eq!(normalize_time("Morning!"), "morning");
        assert_eq!(normalize_time("TBD"), "tbd");
        // contains "am" but no leading hour
        assert_eq!(normalize_time("Amsterdam"), "amsterdam");
        assert_eq!(normalize_time("3:7x pm"), "15:00");
    }

    #[test]
    fn minutes_since_midnight_orders_times() {
        assert_eq!(minutes_since_midnight("00:00"), Some(0));
        assert_eq!(minutes_since_midnight("14:30"), Some(870));
        assert_eq!(minutes_since_midnight("9:05"), Some(545));
        assert_eq!(minutes_since_midnight("25:00"), None);
        assert_eq!(minutes_since_midnight("noon"), None);
    }

    #[test]
    fn canonical_clock_pads_bare_clock_times() {
        assert_eq!(canonical_clock("9:30"), "09:30");
        assert_eq!(canonical_clock("7:5"), "07:05");
        assert_eq!(canonical_clock("2:30 PM"), "14:30");
        assert_eq!(canonical_clock("14:30"), "14:30");
        assert_eq!(canonical_clock("Morning"), "morning");
        assert_eq!(canonical_clock("25:00"), "25:00");
        assert!(is_canonical(&canonical_clock("0:00")));
    }

    #[test]
    fn canonical_form_check() {
        assert!(is_canonical("09:00"));
        assert!(!is_canonical("9:00"));
        assert!(!is_canonical("24:00"));
        assert!(same_time("2:30 PM", "14:30"));
    }
}
