//! Semantic extraction: mines actions, descriptors and qualifiers from the
//! movement text.
//!
//! Both texts are scanned (comprehensive first, then summary) and the hits
//! merged. Extraction never fails: when nothing at all is recognized, the
//! minimal defaults `move` / `motion` are substituted and the result is
//! flagged with `is_fallback` so downstream stages treat it as zero signal.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use super::lexicon::{scan, LexiconCategory, LexiconHit};
use super::types::{ExtractionFeedback, MovementDescription, SemanticElements};
use crate::config::GeneratorConfig;

/// Default action when the text yields nothing.
pub const FALLBACK_ACTION: &str = "move";
/// Default descriptor when the text yields nothing.
pub const FALLBACK_DESCRIPTOR: &str = "motion";

const CATEGORY_COUNT: f32 = 3.0;

static WORD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[\p{L}\p{N}]+(?:['-][\p{L}\p{N}]+)*").expect("Invalid word pattern")
});

/// Byte offsets of every word in `text`.
pub fn word_spans(text: &str) -> Vec<(usize, usize)> {
    WORD.find_iter(text).map(|m| (m.start(), m.end())).collect()
}

pub fn word_count(text: &str) -> usize {
    WORD.find_iter(text).count()
}

/// Extracts [`SemanticElements`] from a [`MovementDescription`].
#[derive(Debug, Clone)]
pub struct SemanticExtractor {
    top_n: usize,
    context_window: usize,
}

/// Hits accumulated across both texts before truncation.
#[derive(Default)]
struct Accumulator {
    actions: Vec<String>,
    descriptors: Vec<String>,
    /// (rank, surface, canonical)
    qualifiers: Vec<(usize, String, &'static str)>,
    seen_actions: HashSet<&'static str>,
    seen_descriptors: HashSet<&'static str>,
    seen_qualifiers: HashSet<&'static str>,
    matched_bytes: usize,
}

impl SemanticExtractor {
    pub fn new(config: &GeneratorConfig) -> Self {
        Self {
            top_n: config.top_n,
            context_window: config.context_window,
        }
    }

    pub fn extract(&self, input: &MovementDescription) -> SemanticElements {
        let mut acc = Accumulator::default();

        for text in [input.comprehensive.as_str(), input.summary.as_str()] {
            self.collect_actions(text, &mut acc);
            self.collect_descriptors(text, &mut acc);
            self.collect_qualifiers(text, &mut acc);
        }

        let total_bytes = input.comprehensive.len() + input.summary.len();

        if acc.actions.is_empty() && acc.descriptors.is_empty() && acc.qualifiers.is_empty() {
            tracing::debug!(total_bytes, "No movement vocabulary recognized, using defaults");
            return SemanticElements {
                actions: vec![FALLBACK_ACTION.to_string()],
                descriptors: vec![FALLBACK_DESCRIPTOR.to_string()],
                qualifiers: Vec::new(),
                extraction_effectiveness: 0.0,
                text_utilization: 0.0,
                is_fallback: true,
            };
        }

        // Stable sort keeps first-seen order among equal ranks
        acc.qualifiers.sort_by_key(|(rank, _, _)| *rank);

        let actions = truncate(acc.actions, self.top_n);
        let descriptors = truncate(acc.descriptors, self.top_n);
        let qualifiers = truncate(
            acc.qualifiers.into_iter().map(|(_, surface, _)| surface).collect(),
            self.top_n,
        );

        let populated = [!actions.is_empty(), !descriptors.is_empty(), !qualifiers.is_empty()]
            .iter()
            .filter(|p| **p)
            .count();

        let text_utilization = if total_bytes == 0 {
            0.0
        } else {
            (acc.matched_bytes as f32 / total_bytes as f32).min(1.0)
        };

        tracing::debug!(
            actions = actions.len(),
            descriptors = descriptors.len(),
            qualifiers = qualifiers.len(),
            text_utilization,
            "Semantic extraction complete"
        );

        SemanticElements {
            actions,
            descriptors,
            qualifiers,
            extraction_effectiveness: populated as f32 / CATEGORY_COUNT,
            text_utilization,
            is_fallback: false,
        }
    }

    fn collect_actions(&self, text: &str, acc: &mut Accumulator) {
        for hit in scan(LexiconCategory::Action, text) {
            acc.matched_bytes += hit.end - hit.start;
            if acc.seen_actions.insert(hit.canonical) {
                acc.actions.push(hit.canonical.to_string());
            }
        }
    }

    /// Each body part, followed by the spatial terms within the token window
    /// around it. Spatial terms outside every window are ignored.
    fn collect_descriptors(&self, text: &str, acc: &mut Accumulator) {
        let body_hits = scan(LexiconCategory::BodyPart, text);
        if body_hits.is_empty() {
            return;
        }

        let starts: Vec<usize> = word_spans(text).into_iter().map(|(start, _)| start).collect();
        let spatial_hits: Vec<(usize, LexiconHit)> = scan(LexiconCategory::Spatial, text)
            .into_iter()
            .map(|hit| (token_index(&starts, hit.start), hit))
            .collect();
        let mut counted_spatial = HashSet::new();

        for body in body_hits {
            acc.matched_bytes += body.end - body.start;
            if acc.seen_descriptors.insert(body.canonical) {
                acc.descriptors.push(body.canonical.to_string());
            }

            let anchor = token_index(&starts, body.start);
            for (index, spatial) in &spatial_hits {
                if index.abs_diff(anchor) > self.context_window {
                    continue;
                }
                if counted_spatial.insert(spatial.start) {
                    acc.matched_bytes += spatial.end - spatial.start;
                }
                if acc.seen_descriptors.insert(spatial.canonical) {
                    acc.descriptors.push(spatial.canonical.to_string());
                }
            }
        }
    }

    fn collect_qualifiers(&self, text: &str, acc: &mut Accumulator) {
        for hit in scan(LexiconCategory::Qualifier, text) {
            acc.matched_bytes += hit.end - hit.start;
            if acc.seen_qualifiers.insert(hit.canonical) {
                acc.qualifiers.push((hit.rank, hit.surface, hit.canonical));
            }
        }
    }
}

/// Score how well extraction worked on `text`, with human-readable notes.
pub fn extraction_feedback(text: &str, elements: &SemanticElements) -> ExtractionFeedback {
    let mut score = 0u8;
    let mut notes = Vec::new();

    let actions = elements.extracted_actions();
    if actions.is_empty() {
        notes.push("No actions extracted; the action lexicon may need expansion".to_string());
    } else {
        score += 3;
        notes.push(format!("Extracted {} action(s): {}", actions.len(), actions.join(", ")));
    }

    if elements.is_fallback || elements.descriptors.is_empty() {
        notes.push("No descriptors extracted".to_string());
    } else {
        score += 2;
        notes.push(format!("Extracted {} descriptor(s)", elements.descriptors.len()));
    }

    if !elements.qualifiers.is_empty() {
        score += 1;
        notes.push(format!("Extracted movement qualities: {}", elements.qualifiers.join(", ")));
    }

    let words = word_count(text);
    let utilization_rate = if words == 0 || elements.is_fallback {
        0.0
    } else {
        let extracted = elements.actions.len() + elements.descriptors.len() + elements.qualifiers.len();
        extracted as f32 / words as f32 * 100.0
    };
    notes.push(format!("Text utilization: {utilization_rate:.1}%"));

    ExtractionFeedback {
        effectiveness_score: score,
        max_score: 6,
        notes,
        utilization_rate,
    }
}

fn token_index(starts: &[usize], offset: usize) -> usize {
    starts.partition_point(|&s| s <= offset).saturating_sub(1)
}

fn truncate(mut items: Vec<String>, n: usize) -> Vec<String> {
    items.truncate(n);
    items
}
