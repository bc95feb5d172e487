use tripweave_core::{ItemKind, ItineraryItem};

/// The one-item-per-line schema the model must answer in.
pub const ITEM_FORMAT: &str = "Title | Type | Time | Description | Price";

/// Instruction and data halves of an advisory request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdvicePrompt {
    pub instruction: String,
    pub data: String,
}

/// Build the advisor system prompt.
///
/// When `template_override` is `Some`, uses that string as the template
/// instead of the compiled-in default.
pub(crate) fn advisor_system_prompt(template_override: Option<&str>) -> String {
    let kinds = ItemKind::ALL
        .iter()
        .map(|k| k.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    let template = template_override.unwrap_or(include_str!("../../prompts/advisor.md"));

    template
        .replace("{{item_format}}", ITEM_FORMAT)
        .replace("{{kinds}}", &kinds)
}

fn render_item(item: &ItineraryItem) -> String {
    format!(
        "{} ({}) at {}\n{}\nPrice: {}",
        item.title,
        item.kind(),
        item.time,
        item.description,
        item.price_or_tbd()
    )
}

fn render_section(items: &[ItineraryItem]) -> String {
    if items.is_empty() {
        return "(none)".to_string();
    }
    items
        .iter()
        .map(render_item)
        .collect::<Vec<_>>()
        .join("\n\n")
}

pub(crate) fn itinerary_data_prompt(pinned: &[ItineraryItem], flexible: &[ItineraryItem]) -> String {
    format!(
        "Here's my current itinerary:\n\n\
         PINNED (FIXED) ITEMS:\n{}\n\n\
         FLEXIBLE ITEMS (DO NOT REUSE THESE - SUGGEST DIFFERENT ACTIVITIES):\n{}\n\n\
         Please provide two alternative itineraries that work around the pinned items. \
         Make them distinctly different from each other and from the original flexible items. \
         Ensure all activities occur between the arrival and departure flights, and respect the time constraints.",
        render_section(pinned),
        render_section(flexible),
    )
}

/// Render pinned and flexible items into the two prompt texts.
///
/// Pure: identical input order gives identical output.
pub fn build_advice_prompt(pinned: &[ItineraryItem], flexible: &[ItineraryItem]) -> AdvicePrompt {
    AdvicePrompt {
        instruction: advisor_system_prompt(None),
        data: itinerary_data_prompt(pinned, flexible),
    }
}
