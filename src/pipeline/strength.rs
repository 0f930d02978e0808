//! Deterministic weighted strength scoring of the final password.
//!
//! Positive factors add points, pattern penalties subtract (capped), and the
//! total is clipped to `[0, MAX_SCORE]` before it is mapped to a category.
//! Every positive factor either shows up in `factors` or produces a
//! recommendation.

use std::collections::{HashMap, HashSet};

use super::types::{BehavioralProfile, StrengthCategory, StrengthReport};

pub const MAX_SCORE: u8 = 15;

/// Scoring thresholds
pub mod thresholds {
    /// Length buckets, in characters.
    pub const LENGTH_EXCELLENT: usize = 16;
    pub const LENGTH_GOOD: usize = 12;
    pub const LENGTH_MINIMAL: usize = 8;

    /// Points for non-ASCII characters are capped here.
    pub const UNICODE_POINTS_CAP: usize = 3;

    /// Unique characters / length.
    pub const UNIQUENESS_HIGH: f32 = 0.8;
    pub const UNIQUENESS_MODERATE: f32 = 0.6;

    /// Window for identical runs, sequential runs and repeated substrings.
    pub const PATTERN_WIDTH: usize = 3;
    pub const PENALTY_CAP: u8 = 3;

    /// Category floors.
    pub const EXCEPTIONAL: u8 = 12;
    pub const VERY_STRONG: u8 = 9;
    pub const STRONG: u8 = 6;
    pub const MEDIUM: u8 = 4;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum CharClass {
    Lower,
    Upper,
    Digit,
    Special,
    /// Non-ASCII or ASCII control/space; belongs to no scored class.
    Other,
}

fn classify(ch: char) -> CharClass {
    if ch.is_ascii_lowercase() {
        CharClass::Lower
    } else if ch.is_ascii_uppercase() {
        CharClass::Upper
    } else if ch.is_ascii_digit() {
        CharClass::Digit
    } else if ch.is_ascii_punctuation() {
        CharClass::Special
    } else {
        CharClass::Other
    }
}

const SCORED_CLASSES: [(CharClass, &str); 4] = [
    (CharClass::Lower, "lowercase letters"),
    (CharClass::Upper, "uppercase letters"),
    (CharClass::Digit, "digits"),
    (CharClass::Special, "special characters"),
];

/// Score `password` and explain the result.
pub fn assess(password: &str, profile: &BehavioralProfile) -> StrengthReport {
    let chars: Vec<char> = password.chars().collect();
    let mut score: i32 = 0;
    let mut factors = Vec::new();
    let mut recommendations = Vec::new();

    // Length
    let length = length_points(chars.len());
    score += i32::from(length);
    match length {
        3 => factors.push(format!(
            "Excellent length ({}+ chars)",
            thresholds::LENGTH_EXCELLENT
        )),
        2 => factors.push(format!("Good length ({}+ chars)", thresholds::LENGTH_GOOD)),
        1 => factors.push(format!(
            "Minimal length ({}+ chars)",
            thresholds::LENGTH_MINIMAL
        )),
        _ => recommendations.push(format!(
            "Increase length to {}+ characters",
            thresholds::LENGTH_GOOD
        )),
    }

    // Character classes
    let present: HashSet<CharClass> = chars.iter().map(|c| classify(*c)).collect();
    for (class, label) in SCORED_CLASSES {
        if present.contains(&class) {
            score += 1;
            factors.push(format!("Contains {label}"));
        } else {
            recommendations.push(format!("Add {label}"));
        }
    }

    // Unicode
    let unicode = unicode_points(&chars);
    score += i32::from(unicode);
    if unicode > 0 {
        factors.push(format!("Biometric Unicode characters detected ({unicode})"));
    } else {
        recommendations.push("Include Unicode look-alike characters".to_string());
    }

    // Behavioral passthrough
    let complexity = profile.complexity.points();
    score += i32::from(complexity);
    if complexity > 0 {
        factors.push(format!("{} movement complexity", capitalized(profile.complexity.as_str())));
    } else {
        recommendations.push("Describe more distinct actions and movement qualities".to_string());
    }

    let confidence = profile.confidence.points();
    score += i32::from(confidence);
    if confidence > 0 {
        factors.push(format!("{} behavioral confidence", capitalized(profile.confidence.as_str())));
    } else {
        recommendations.push("Describe the coordination, energy or precision of the movement".to_string());
    }

    // Uniqueness
    let uniqueness = uniqueness_points(&chars);
    score += i32::from(uniqueness);
    match uniqueness {
        2 => factors.push("High character uniqueness".to_string()),
        1 => factors.push("Moderate character uniqueness".to_string()),
        _ => recommendations.push("Reduce character repetition".to_string()),
    }

    // Patterns
    let penalties = pattern_penalties(&chars);
    let penalty: u8 = penalties
        .iter()
        .map(|p| p.points())
        .sum::<u8>()
        .min(thresholds::PENALTY_CAP);
    score -= i32::from(penalty);
    if penalties.is_empty() {
        factors.push("No predictable patterns".to_string());
    }
    for p in &penalties {
        recommendations.push(p.recommendation().to_string());
    }

    let score = score.clamp(0, i32::from(MAX_SCORE)) as u8;
    let category = categorize(score);

    tracing::debug!(score, penalty, category = %category, "Strength assessed");

    StrengthReport {
        score,
        max_score: MAX_SCORE,
        category,
        factors,
        recommendations,
    }
}

pub fn categorize(score: u8) -> StrengthCategory {
    if score >= thresholds::EXCEPTIONAL {
        StrengthCategory::Exceptional
    } else if score >= thresholds::VERY_STRONG {
        StrengthCategory::VeryStrong
    } else if score >= thresholds::STRONG {
        StrengthCategory::Strong
    } else if score >= thresholds::MEDIUM {
        StrengthCategory::Medium
    } else {
        StrengthCategory::Weak
    }
}

pub fn length_points(length: usize) -> u8 {
    if length >= thresholds::LENGTH_EXCELLENT {
        3
    } else if length >= thresholds::LENGTH_GOOD {
        2
    } else if length >= thresholds::LENGTH_MINIMAL {
        1
    } else {
        0
    }
}

/// One point per non-ASCII character, capped.
pub fn unicode_points(chars: &[char]) -> u8 {
    chars
        .iter()
        .filter(|c| !c.is_ascii())
        .count()
        .min(thresholds::UNICODE_POINTS_CAP) as u8
}

pub fn uniqueness_points(chars: &[char]) -> u8 {
    if chars.is_empty() {
        return 0;
    }
    let unique = chars.iter().collect::<HashSet<_>>().len();
    let ratio = unique as f32 / chars.len() as f32;
    if ratio >= thresholds::UNIQUENESS_HIGH {
        2
    } else if ratio >= thresholds::UNIQUENESS_MODERATE {
        1
    } else {
        0
    }
}

/// A predictable pattern found in the password.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pattern {
    /// Three identical characters in a row, e.g. `aaa`.
    IdenticalRun,
    /// Three consecutive code points of one class, e.g. `abc`, `123`.
    SequentialRun,
    /// A three-character substring occurring more than once.
    RepeatedSubstring,
}

impl Pattern {
    pub fn points(&self) -> u8 {
        match self {
            Self::IdenticalRun => 1,
            Self::SequentialRun => 2,
            Self::RepeatedSubstring => 1,
        }
    }

    fn recommendation(&self) -> &'static str {
        match self {
            Self::IdenticalRun => "Avoid runs of the same character",
            Self::SequentialRun => "Avoid sequential patterns",
            Self::RepeatedSubstring => "Avoid repeating the same fragment",
        }
    }
}

/// Each pattern kind present, at most once.
pub fn pattern_penalties(chars: &[char]) -> Vec<Pattern> {
    let mut found = Vec::new();
    if has_identical_run(chars) {
        found.push(Pattern::IdenticalRun);
    }
    if has_sequential_run(chars) {
        found.push(Pattern::SequentialRun);
    }
    if has_repeated_substring(chars) {
        found.push(Pattern::RepeatedSubstring);
    }
    found
}

fn has_identical_run(chars: &[char]) -> bool {
    chars
        .windows(thresholds::PATTERN_WIDTH)
        .any(|w| w.iter().all(|c| *c == w[0]))
}

/// Ascending by one code point each step, all inside one scored class.
/// Case-sensitive: `aBc` is not a run.
fn has_sequential_run(chars: &[char]) -> bool {
    chars.windows(thresholds::PATTERN_WIDTH).any(|w| {
        let class = classify(w[0]);
        class != CharClass::Other
            && w.iter().all(|c| classify(*c) == class)
            && w.windows(2).all(|pair| u32::from(pair[1]) == u32::from(pair[0]) + 1)
    })
}

fn has_repeated_substring(chars: &[char]) -> bool {
    let mut seen: HashMap<&[char], usize> = HashMap::new();
    for (i, window) in chars.windows(thresholds::PATTERN_WIDTH).enumerate() {
        if let Some(&first) = seen.get(window) {
            if i > first {
                return true;
            }
        } else {
            seen.insert(window, i);
        }
    }
    false
}

fn capitalized(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::types::{EnergyIntensity, Level};

    fn profile(complexity: Level, confidence: Level) -> BehavioralProfile {
        BehavioralProfile {
            coordination: 1,
            energy: 1,
            precision: 0,
            energy_intensity: EnergyIntensity::Calm,
            marker_count: 2,
            complexity,
            confidence,
        }
    }

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    #[test]
    fn category_thresholds() {
        assert_eq!(categorize(0), StrengthCategory::Weak);
        assert_eq!(categorize(3), StrengthCategory::Weak);
        assert_eq!(categorize(4), StrengthCategory::Medium);
        assert_eq!(categorize(5), StrengthCategory::Medium);
        assert_eq!(categorize(6), StrengthCategory::Strong);
        assert_eq!(categorize(8), StrengthCategory::Strong);
        assert_eq!(categorize(9), StrengthCategory::VeryStrong);
        assert_eq!(categorize(11), StrengthCategory::VeryStrong);
        assert_eq!(categorize(12), StrengthCategory::Exceptional);
        assert_eq!(categorize(15), StrengthCategory::Exceptional);
    }

    #[test]
    fn length_buckets() {
        assert_eq!(length_points(7), 0);
        assert_eq!(length_points(8), 1);
        assert_eq!(length_points(12), 2);
        assert_eq!(length_points(16), 3);
        assert_eq!(length_points(24), 3);
    }

    #[test]
    fn unicode_points_capped() {
        assert_eq!(unicode_points(&chars("plain")), 0);
        assert_eq!(unicode_points(&chars("ñ¢")), 2);
        assert_eq!(unicode_points(&chars("ñ¢µ¥þ")), 3);
    }

    #[test]
    fn sequential_runs_are_case_and_class_sensitive() {
        assert!(has_sequential_run(&chars("xabcx")));
        assert!(has_sequential_run(&chars("_123_")));
        assert!(has_sequential_run(&chars("XYZ")));
        assert!(!has_sequential_run(&chars("aBc")));
        assert!(!has_sequential_run(&chars("cba")));
        assert!(!has_sequential_run(&chars("1a2")));
        // 9 → : crosses from digit to punctuation
        assert!(!has_sequential_run(&chars("89:")));
    }

    #[test]
    fn identical_and_repeated_patterns() {
        assert!(has_identical_run(&chars("xaaax")));
        assert!(!has_identical_run(&chars("xaax")));
        assert!(has_repeated_substring(&chars("abX_abX")));
        assert!(!has_repeated_substring(&chars("abcdef")));
    }

    #[test]
    fn penalty_is_capped() {
        // aaa (1) + abc (2) + repeated abc (1) = 4, capped to 3
        let found = pattern_penalties(&chars("aaabcdabc"));
        assert_eq!(found.len(), 3);
        let report = assess("aaabcdabc", &profile(Level::Low, Level::Low));
        // length 1 + lower 1 + uniqueness 0 (4/9) - 3 → clipped at 0
        assert_eq!(report.score, 0);
        assert_eq!(report.category, StrengthCategory::Weak);
    }

    #[test]
    fn substituted_medium_password_scores_very_strong() {
        let report = assess("W4lk_d435_1f23_c0ff33", &profile(Level::Medium, Level::Medium));
        // length 3 + classes 4 + unicode 0 + complexity 1 + confidence 1 + uniqueness 1 (13/21)
        assert_eq!(report.score, 10);
        assert_eq!(report.category, StrengthCategory::VeryStrong);
        assert_eq!(report.max_score, MAX_SCORE);
        assert!(report.factors.contains(&"No predictable patterns".to_string()));
        assert!(report
            .recommendations
            .contains(&"Include Unicode look-alike characters".to_string()));
    }

    #[test]
    fn score_clipped_to_maximum() {
        // 3 + 4 + 3 + 2 + 2 + 2 = 16 before clipping
        let report = assess("Xq7!Zr9#Vt2$ñ¢µwK", &profile(Level::High, Level::High));
        assert_eq!(report.score, MAX_SCORE);
        assert_eq!(report.category, StrengthCategory::Exceptional);
        assert!(report.recommendations.is_empty(), "{:?}", report.recommendations);
    }

    #[test]
    fn empty_password_is_weak_and_explained() {
        let report = assess("", &profile(Level::Low, Level::Low));
        assert_eq!(report.score, 0);
        assert_eq!(report.category, StrengthCategory::Weak);
        assert!(report
            .recommendations
            .contains(&"Increase length to 12+ characters".to_string()));
        assert!(report.recommendations.contains(&"Add digits".to_string()));
    }

    #[test]
    fn every_positive_factor_is_reported_either_way() {
        for pw in ["", "short", "W4lk_d435_1f23_c0ff33", "Xq7!Zr9#Vt2$ñ¢µwK"] {
            let report = assess(pw, &profile(Level::Medium, Level::Low));
            let pattern_recs = pattern_penalties(&chars(pw)).len();
            let positive_factors = report.factors.len()
                - usize::from(pattern_recs == 0);
            // length, four classes, unicode, complexity, confidence, uniqueness
            assert_eq!(
                positive_factors + report.recommendations.len() - pattern_recs,
                9,
                "{pw}: {report:?}"
            );
        }
    }

    #[test]
    fn adding_missing_class_does_not_lower_score() {
        let p = profile(Level::Medium, Level::Medium);
        let base = assess("walkingslowly", &p).score;
        // Swap one 'l' (class has other members) for each missing class in turn
        for variant in ["waLkingslowly", "wa7kingslowly", "wa_kingslowly"] {
            assert!(assess(variant, &p).score >= base, "{variant}");
        }
    }

    #[test]
    fn categories_serialize_as_labels() {
        let report = assess("W4lk_d435_1f23_c0ff33", &profile(Level::Medium, Level::Medium));
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["category"], "Very Strong");
        assert_eq!(json["max_score"], 15);
    }
}
