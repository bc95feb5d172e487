//! Option search: flights, hotels and activities proposed by the model.
//!
//! Replies are blank-line separated blocks with one field per line. Fields
//! the model leaves out are filled with placeholders instead of failing.

mod activities;
mod flights;
mod hotels;


pub use activities::{
    ActivityOption, ActivitySuggestion, DEFAULT_ACTIVITY_PRICE, search_activities,
    search_activities_with_backend, suggest_activities, suggest_activities_with_backend,
};
pub use flights::{FlightOption, FlightQuery, search_flights, search_flights_with_backend};
pub use hotels::{
    HotelOption, RESORT_FEE_PER_NIGHT, SERVICE_FEE, TAX_RATE, calculate_total_price,
    search_hotels, search_hotels_with_backend,
};

/// Clock time given to converted options until the user places them.
pub const UNSCHEDULED_TIME: &str = "00:00";

/// Split a reply into option blocks, stripping `- ` bullets.
pub(crate) fn option_blocks(raw: &str) -> Vec<Vec<String>> {
    let mut blocks = Vec::new();
    let mut current: Vec<String> = Vec::new();
    for line in raw.lines() {
        let line = line.trim();
        if line.is_empty() {
            if !current.is_empty() {
                blocks.push(std::mem::take(&mut current));
            }
            continue;
        }
        current.push(line.strip_prefix("- ").unwrap_or(line).trim().to_string());
    }
    if !current.is_empty() {
        blocks.push(current);
    }
    blocks
}

/// The `index`th field of a block, or `placeholder` when absent or blank.
pub(crate) fn field(lines: &[String], index: usize, placeholder: &str) -> String {
    lines
        .get(index)
        .filter(|line| !line.is_empty())
        .cloned()
        .unwrap_or_else(|| placeholder.to_string())
}

pub(crate) fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    values.iter().fold(template.to_string(), |text, (key, value)| {
        text.replace(&format!("{{{{{key}}}}}"), value)
    })
}

/// Format a dollar amount as `$1,234.50`.
pub fn format_usd(amount: f64) -> String {
    if !amount.is_finite() {
        return "$0.00".to_string();
    }
    let total_cents = (amount.abs() * 100.0).round() as u64;
    let (dollars, cents) = (total_cents / 100, total_cents % 100);

    let digits = dollars.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    let sign = if amount < 0.0 && total_cents > 0 { "-" } else { "" };
    format!("{sign}${grouped}.{cents:02}")
}
