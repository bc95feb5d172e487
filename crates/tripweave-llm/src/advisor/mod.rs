mod parse;
mod prompt;


pub use parse::{LineFault, ParseOutcome, ParseWarning, parse_alternatives, parse_item_line};
pub use prompt::{AdvicePrompt, ITEM_FORMAT, build_advice_prompt};

use crate::client::{ChatBackend, GenerationOptions, LlmClient, LlmConfig, generate};
use crate::error::AdviceError;
use tracing::{debug, info};
use tripweave_core::bracket::bracket_flights;
use tripweave_core::{AdviceResult, AlternativeItinerary, ItineraryItem, reconcile};

/// Advice plus whatever the parser had to drop along the way.
#[derive(Debug, Clone)]
pub struct AdviceOutcome {
    pub advice: AdviceResult,
    pub warnings: Vec<ParseWarning>,
}

/// Ask the configured backend for alternatives to `agenda`.
pub async fn request_advice(
    agenda: &[ItineraryItem],
    config: LlmConfig,
) -> Result<AdviceResult, AdviceError> {
    let advisor = LlmClient::new(config);
    request_advice_with_backend(&advisor, agenda, &GenerationOptions::advice())
        .await
        .map(|outcome| outcome.advice)
}

/// Run one advisory round against a given ChatBackend (for testability).
///
/// Prompt, generate, parse, reconcile. Per-line and per-block problems come
/// back as warnings; only round-level failures are errors.
pub async fn request_advice_with_backend(
    backend: &impl ChatBackend,
    agenda: &[ItineraryItem],
    options: &GenerationOptions,
) -> Result<AdviceOutcome, AdviceError> {
    let (pinned, flexible): (Vec<ItineraryItem>, Vec<ItineraryItem>) =
        agenda.iter().cloned().partition(|item| item.pinned);

    info!(
        "Requesting advice for {} items ({} pinned) from {}",
        agenda.len(),
        pinned.len(),
        backend.model_name()
    );

    let prompt = build_advice_prompt(&pinned, &flexible);
    debug!(
        "Advisor prompt length: {} + {} chars",
        prompt.instruction.len(),
        prompt.data.len()
    );

    let raw = generate(backend, &prompt.instruction, &prompt.data, options).await?;
    let parsed = parse_alternatives(&raw)?;

    let alternative_itineraries: Vec<AlternativeItinerary> = parsed
        .alternatives
        .iter()
        .map(|candidate| AlternativeItinerary {
            items: reconcile(&candidate.items, agenda),
            explanation: candidate.explanation.clone(),
        })
        .collect();

    info!(
        "Advice ready: {} alternatives, {} parse warnings",
        alternative_itineraries.len(),
        parsed.warnings.len()
    );

    Ok(AdviceOutcome {
        advice: AdviceResult {
            original_itinerary: bracket_flights(agenda.to_vec()),
            alternative_itineraries,
        },
        warnings: parsed.warnings,
    })
}
