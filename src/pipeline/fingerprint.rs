//! Behavioral profiling and the content-derived biometric signature.
//!
//! The signature is a pure function of the extracted semantics and the
//! behavioral scores. Nothing random or time-based enters it, so the same
//! phrasing always yields the same signature, for anyone.

use sha2::{Digest, Sha256};

use super::extraction::word_count;
use super::lexicon::{distinct_hits, LexiconCategory};
use super::types::{BehavioralProfile, BiometricSignature, EnergyIntensity, Level, SemanticElements};

/// Marker totals at or above this give high confidence.
const HIGH_CONFIDENCE_MARKERS: u32 = 3;

/// Complexity thresholds over `distinct actions + distinct qualifiers`.
pub mod complexity {
    pub const HIGH_MIN_ELEMENTS: usize = 4;
    pub const HIGH_MIN_DENSITY: f32 = 0.10;
    pub const MEDIUM_MIN_ELEMENTS: usize = 2;
}

/// Lowercase hex SHA-256 of `input`.
pub(crate) fn sha256_hex(input: &str) -> String {
    format!("{:x}", Sha256::digest(input.as_bytes()))
}

/// Score coordination, energy and precision markers in `text` and grade
/// confidence and complexity.
pub fn build_profile(elements: &SemanticElements, text: &str) -> BehavioralProfile {
    let coordination = distinct_hits(LexiconCategory::Coordination, text).len() as u32;
    let precision = distinct_hits(LexiconCategory::Precision, text).len() as u32;

    let energy_hits = distinct_hits(LexiconCategory::Energy, text);
    let energy: u32 = energy_hits.iter().map(|h| u32::from(h.weight)).sum();
    let energy_intensity = match energy_hits.iter().map(|h| h.weight).max() {
        Some(w) if w >= 3 => EnergyIntensity::Explosive,
        Some(2) => EnergyIntensity::Sustained,
        Some(_) => EnergyIntensity::Calm,
        None => EnergyIntensity::Unmarked,
    };

    let marker_count = coordination + precision + energy_hits.len() as u32;
    let element_count = elements.extracted_actions().len() + elements.extracted_qualifiers().len();

    let profile = BehavioralProfile {
        coordination,
        energy,
        precision,
        energy_intensity,
        marker_count,
        complexity: classify_complexity(element_count, word_count(text)),
        confidence: classify_confidence(marker_count),
    };

    tracing::debug!(
        marker_count,
        complexity = %profile.complexity,
        confidence = %profile.confidence,
        "Behavioral profile built"
    );

    profile
}

pub fn classify_confidence(marker_count: u32) -> Level {
    match marker_count {
        0 => Level::Low,
        n if n >= HIGH_CONFIDENCE_MARKERS => Level::High,
        _ => Level::Medium,
    }
}

/// Grade complexity from the number of distinct movement elements relative
/// to the length of the text they came from.
pub fn classify_complexity(element_count: usize, words: usize) -> Level {
    let density = if words == 0 {
        0.0
    } else {
        element_count as f32 / words as f32
    };

    if element_count >= complexity::HIGH_MIN_ELEMENTS && density >= complexity::HIGH_MIN_DENSITY {
        Level::High
    } else if element_count >= complexity::MEDIUM_MIN_ELEMENTS {
        Level::Medium
    } else {
        Level::Low
    }
}

/// Canonical byte string the signature is hashed from.
///
/// Actions are sorted so the signature does not depend on mention order.
pub fn canonical_signature_input(elements: &SemanticElements, profile: &BehavioralProfile) -> String {
    let mut actions: Vec<&str> = elements.actions.iter().map(String::as_str).collect();
    actions.sort_unstable();
    format!(
        "{}|c{}e{}p{}|{}",
        actions.join(","),
        profile.coordination,
        profile.energy,
        profile.precision,
        profile.complexity
    )
}

pub fn compute_signature(elements: &SemanticElements, profile: &BehavioralProfile) -> BiometricSignature {
    BiometricSignature::from_hex_digest(&sha256_hex(&canonical_signature_input(elements, profile)))
}
