use super::{UNSCHEDULED_TIME, field, fill_template, option_blocks};
use crate::client::{ChatBackend, GenerationOptions, LlmClient, LlmConfig, generate};
use crate::error::GenerationError;
use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;
use tracing::info;
use tripweave_core::{ActivityDetails, ItemDetails, ItineraryItem};

pub const DEFAULT_ACTIVITY_PRICE: &str = "$150";
const UNKNOWN_PRICE: &str = "Price not available";
const MAX_SUGGESTIONS: usize = 3;

fn numbering() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\d+\.\s*").unwrap())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityOption {
    pub id: String,
    pub name: String,
    pub description: String,
    pub price: String,
    pub duration: String,
    pub location: String,
    pub category: String,
}

impl ActivityOption {
    fn from_block(index: usize, lines: &[String]) -> Self {
        Self {
            id: format!("activity-{index}"),
            name: field(lines, 0, "Unknown Activity"),
            description: field(lines, 1, "No description available"),
            price: field(lines, 2, UNKNOWN_PRICE),
            duration: field(lines, 3, "Duration not specified"),
            location: field(lines, 4, "Location not specified"),
            category: field(lines, 5, "Uncategorized"),
        }
    }

    /// Unpinned activity item, optionally dated.
    pub fn into_item(self, date: Option<NaiveDate>) -> ItineraryItem {
        let price = if self.price == UNKNOWN_PRICE {
            DEFAULT_ACTIVITY_PRICE.to_string()
        } else {
            self.price
        };
        ItineraryItem::new(
            self.name,
            UNSCHEDULED_TIME,
            ItemDetails::Activity(ActivityDetails {
                date: date.map(|d| d.format("%Y-%m-%d").to_string()),
                price: Some(price),
            }),
        )
        .with_description(self.description)
    }
}

/// Short free-form idea from [`suggest_activities`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivitySuggestion {
    pub name: String,
    pub description: String,
}

pub(crate) fn activity_prompt(request: &str, location: &str) -> String {
    fill_template(
        include_str!("../../prompts/activities.md"),
        &[("location", location), ("request", request)],
    )
}

pub(crate) fn parse_activities(raw: &str) -> Vec<ActivityOption> {
    option_blocks(raw)
        .iter()
        .enumerate()
        .map(|(i, lines)| ActivityOption::from_block(i, lines))
        .collect()
}

pub(crate) fn parse_suggestions(raw: &str) -> Vec<ActivitySuggestion> {
    option_blocks(raw)
        .into_iter()
        .filter_map(|lines| {
            let (name, rest) = lines.split_first()?;
            let name = numbering().replace(name, "").trim().to_string();
            if name.is_empty() {
                return None;
            }
            Some(ActivitySuggestion {
                name,
                description: rest.join("\n"),
            })
        })
        .take(MAX_SUGGESTIONS)
        .collect()
}

pub async fn search_activities(
    request: &str,
    location: &str,
    config: LlmConfig,
) -> Result<Vec<ActivityOption>, GenerationError> {
    let client = LlmClient::new(config);
    search_activities_with_backend(&client, request, location, &GenerationOptions::search()).await
}

pub async fn search_activities_with_backend(
    backend: &impl ChatBackend,
    request: &str,
    location: &str,
    options: &GenerationOptions,
) -> Result<Vec<ActivityOption>, GenerationError> {
    info!("Searching activities in {} for '{}'", location, request);
    let instruction = activity_prompt(request, location);
    let raw = generate(backend, &instruction, request, options).await?;
    let activities = parse_activities(&raw);
    info!("Found {} activity options", activities.len());
    Ok(activities)
}

/// Up to three quick ideas for a free-form request.
pub async fn suggest_activities(
    request: &str,
    config: LlmConfig,
) -> Result<Vec<ActivitySuggestion>, GenerationError> {
    let client = LlmClient::new(config);
    suggest_activities_with_backend(&client, request, &GenerationOptions::search()).await
}

pub async fn suggest_activities_with_backend(
    backend: &impl ChatBackend,
    request: &str,
    options: &GenerationOptions,
) -> Result<Vec<ActivitySuggestion>, GenerationError> {
    let instruction = include_str!("../../prompts/suggestions.md");
    let raw = generate(backend, instruction, request, options).await?;
    Ok(parse_suggestions(&raw))
}
