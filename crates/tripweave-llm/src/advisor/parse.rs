use crate::error::ParseError;
use regex::Regex;
use std::sync::OnceLock;
use thiserror::Error;
use tracing::{debug, warn};
use tripweave_core::{CandidateItem, CandidateItinerary, ItemKind, normalize_time};

/// Minimum pipe-separated fields for an item line; the price may be absent.
const MIN_FIELDS: usize = 4;

fn alternative_header() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)alternative\s*#?\s*\d+\s*:").unwrap())
}

/// Why a single item line was dropped.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LineFault {
    #[error("expected at least {MIN_FIELDS} '|'-separated fields, found {found}")]
    TooFewFields { found: usize },

    #[error("unknown item type '{0}'")]
    UnknownKind(String),

    #[error("empty title")]
    MissingTitle,
}

/// Something dropped while parsing; never fatal on its own.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseWarning {
    #[error("block {block}: dropped line '{line}': {fault}")]
    Line {
        block: usize,
        line: String,
        fault: LineFault,
    },

    #[error("block {block}: no valid items, alternative discarded")]
    EmptyBlock { block: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOutcome {
    pub alternatives: Vec<CandidateItinerary>,
    pub warnings: Vec<ParseWarning>,
}

/// Strip list decoration the model sometimes adds: bullets, numbering,
/// and table-style outer pipes.
fn strip_decoration(line: &str) -> &str {
    let line = line.trim().trim_matches('|').trim();
    let line = line
        .strip_prefix("- ")
        .or_else(|| line.strip_prefix("* "))
        .or_else(|| line.strip_prefix("• "))
        .unwrap_or(line);
    let digits = line.chars().take_while(|c| c.is_ascii_digit()).count();
    if digits > 0 {
        if let Some(rest) = line[digits..].strip_prefix(". ") {
            return rest.trim_start();
        }
    }
    line
}

/// Parse one `Title | Type | Time | Description | Price` line.
pub fn parse_item_line(line: &str) -> Result<CandidateItem, LineFault> {
    let fields: Vec<&str> = strip_decoration(line).split('|').map(str::trim).collect();
    if fields.len() < MIN_FIELDS {
        return Err(LineFault::TooFewFields {
            found: fields.len(),
        });
    }

    let title = fields[0];
    if title.is_empty() {
        return Err(LineFault::MissingTitle);
    }
    let kind: ItemKind = fields[1]
        .parse()
        .map_err(|e: tripweave_core::UnknownKind| LineFault::UnknownKind(e.0))?;

    Ok(CandidateItem {
        title: title.to_string(),
        kind,
        time: normalize_time(fields[2]),
        description: fields[3].to_string(),
        price: fields
            .get(4)
            .filter(|p| !p.is_empty())
            .map(|p| p.to_string()),
    })
}

/// Parse one block: first non-empty line is the explanation, the rest are
/// item lines. `None` when no item survives.
fn parse_block(
    block: usize,
    text: &str,
    warnings: &mut Vec<ParseWarning>,
) -> Option<CandidateItinerary> {
    let mut lines = text.lines().map(str::trim).filter(|l| !l.is_empty());
    let explanation = lines.next()?.to_string();

    let mut items = Vec::new();
    for line in lines {
        match parse_item_line(line) {
            Ok(item) => items.push(item),
            Err(fault) => {
                warn!("Dropping line in block {}: {} ({})", block, line, fault);
                warnings.push(ParseWarning::Line {
                    block,
                    line: line.to_string(),
                    fault,
                });
            }
        }
    }

    if items.is_empty() {
        warn!("Block {} produced no valid items, discarding", block);
        warnings.push(ParseWarning::EmptyBlock { block });
        return None;
    }

    Some(CandidateItinerary { explanation, items })
}

/// Split a model reply into candidate itineraries.
///
/// Bad lines and empty blocks are dropped and reported as warnings; the
/// call only fails when nothing at all survives.
pub fn parse_alternatives(raw: &str) -> Result<ParseOutcome, ParseError> {
    let mut warnings = Vec::new();
    let alternatives: Vec<CandidateItinerary> = alternative_header()
        .split(raw)
        .enumerate()
        .filter(|(_, text)| !text.trim().is_empty())
        .filter_map(|(block, text)| parse_block(block, text, &mut warnings))
        .collect();

    debug!(
        "Parsed {} alternatives with {} warnings",
        alternatives.len(),
        warnings.len()
    );

    if alternatives.is_empty() {
        return Err(ParseError::NoAlternatives);
    }
    Ok(ParseOutcome {
        alternatives,
        warnings,
    })
}
