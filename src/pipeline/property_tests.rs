//! Whole-pipeline properties checked across a corpus of descriptions.

use std::collections::HashSet;
use std::sync::LazyLock;

use chrono::NaiveDate;
use rand::rngs::StdRng;
use rand::SeedableRng;
use regex::Regex;

use super::entropy::{self, FixedClock};
use super::fingerprint::{build_profile, compute_signature};
use super::orchestrator::MovementPasswordEngine;
use super::strength;
use super::types::{BehavioralProfile, EnergyIntensity, Level, MovementDescription, TemplateTier};
use crate::config::GeneratorConfig;
use crate::pipeline::extraction::SemanticExtractor;

const REFERENCE: &str = "The person walks forward slowly with smooth arm swings";
const RICH: &str = "Explosive jumps, then a controlled, balanced turn; the dancer kicks quickly \
                    and steps with precise, fluid, rhythmic footwork.";

static REFERENCE_RAW: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Z][a-z0-9]{0,5}[-_.!][0-9a-f]{4}[-_.!][0-9a-f]{4}[-_.!][0-9a-f]{6}$").unwrap()
});

fn corpus() -> Vec<MovementDescription> {
    vec![
        MovementDescription::new("", ""),
        MovementDescription::new("   ", "\n\t"),
        MovementDescription::new(REFERENCE, ""),
        MovementDescription::new(RICH, "Dynamic dance sequence"),
        MovementDescription::new("generic movement", "Movement analysis completed"),
        MovementDescription::new("!!!???...", ""),
        MovementDescription::new("Él camina despacio, 走る", "ünïcödé"),
        MovementDescription::new(
            "The dancer steps left, then turns right with graceful arms. ".repeat(40),
            "",
        ),
        MovementDescription::new("walk walk walk walk", "walk"),
        MovementDescription::new("", "A person waves their hand slowly"),
    ]
}

fn clock() -> FixedClock {
    FixedClock(
        NaiveDate::from_ymd_opt(2026, 1, 20)
            .unwrap()
            .and_hms_micro_opt(8, 15, 42, 654_321)
            .unwrap(),
    )
}

fn engine() -> MovementPasswordEngine {
    MovementPasswordEngine::default()
}

#[test]
fn password_length_always_within_bounds() {
    let engine = engine();
    for input in corpus() {
        for seed in 0..16 {
            let result = engine.generate_with(&input, &clock(), &mut StdRng::seed_from_u64(seed));
            let len = result.password.chars().count();
            assert!(
                (12..=24).contains(&len),
                "{:?} seed {seed}: {} ({len})",
                input.comprehensive,
                result.password
            );
        }
    }
}

#[test]
fn every_password_carries_unicode_and_a_digit() {
    let engine = engine();
    for input in corpus() {
        for seed in 0..16 {
            let result = engine.generate_with(&input, &clock(), &mut StdRng::seed_from_u64(seed));
            assert!(result.password.chars().any(|c| !c.is_ascii()), "{}", result.password);
            assert!(result.password.chars().any(|c| c.is_ascii_digit()), "{}", result.password);
        }
    }
}

#[test]
fn random_anchor_always_ends_the_password() {
    let engine = engine();
    for input in corpus() {
        for seed in 0..8 {
            let result = engine.generate_with(&input, &clock(), &mut StdRng::seed_from_u64(seed));
            let anchor = &result.components.entropy_bundle.secure_random;
            assert!(result.password.ends_with(anchor.as_str()), "{}", result.password);
        }
    }
}

#[test]
fn fixed_clock_and_seed_reproduce_everything() {
    let engine = engine();
    for input in corpus() {
        let a = engine.generate_with(&input, &clock(), &mut StdRng::seed_from_u64(11));
        let b = engine.generate_with(&input, &clock(), &mut StdRng::seed_from_u64(11));
        assert_eq!(
            serde_json::to_value(&a).unwrap(),
            serde_json::to_value(&b).unwrap()
        );
    }
}

#[test]
fn signature_stable_while_random_varies() {
    let engine = engine();
    let input = MovementDescription::new(REFERENCE, "");
    let a = engine.generate_with(&input, &clock(), &mut StdRng::seed_from_u64(1));
    let b = engine.generate_with(&input, &clock(), &mut StdRng::seed_from_u64(2));

    assert_eq!(a.components.biometric_signature, b.components.biometric_signature);
    assert_ne!(
        a.components.entropy_bundle.secure_random,
        b.components.entropy_bundle.secure_random
    );
    assert_ne!(a.password, b.password);
}

#[test]
fn independent_draws_give_distinct_passwords() {
    let engine = engine();
    let input = MovementDescription::new(REFERENCE, "");
    let passwords: HashSet<String> = (0..64).map(|_| engine.generate(&input).password).collect();
    assert_eq!(passwords.len(), 64);
}

#[test]
fn substitution_stages_never_shrink() {
    let engine = engine();
    let extractor = SemanticExtractor::new(&GeneratorConfig::default());
    for input in corpus() {
        let text = input.combined_text();
        let elements = extractor.extract(&input);
        let profile = build_profile(&elements, &text);
        let signature = compute_signature(&elements, &profile);
        for seed in 0..8 {
            let mut rng = StdRng::seed_from_u64(seed);
            let bundle = entropy::aggregate(&text, &profile, &clock(), &mut rng);
            let (generated, trace) = engine.build_password(&elements, &profile, &signature, &bundle, &mut rng);

            let [raw, contextual, basic, advanced] = trace.stage_lengths;
            assert_eq!(raw, generated.raw.chars().count());
            assert!(raw <= contextual && contextual <= basic && basic <= advanced, "{trace:?}");
        }
    }
}

#[test]
fn empty_semantics_fall_back_to_low_tier() {
    let engine = engine();
    for input in [
        MovementDescription::default(),
        MovementDescription::new("generic movement", "Movement analysis completed"),
        MovementDescription::new("?!", "..."),
    ] {
        let result = engine.generate_with(&input, &clock(), &mut StdRng::seed_from_u64(4));
        assert_eq!(result.components.template_tier_used, TemplateTier::Low);
        assert!(!result.components.template.is_empty());
        assert!(!result.password.is_empty());
        assert!(result.components.provenance.defaulted_slots.is_empty());
    }
}

#[test]
fn rich_description_uses_high_tier() {
    let result = engine().generate_with(
        &MovementDescription::new(RICH, ""),
        &clock(),
        &mut StdRng::seed_from_u64(8),
    );
    assert_eq!(result.components.template_tier_used, TemplateTier::High);
    assert_eq!(result.components.entropy_bundle.secure_random.len(), 8);
}

#[test]
fn reference_example_end_to_end() {
    let engine = engine();
    let input = MovementDescription::new(REFERENCE, "");
    let text = input.combined_text();
    let elements = SemanticExtractor::new(&GeneratorConfig::default()).extract(&input);

    assert_eq!(elements.actions, vec!["walk"]);
    assert_eq!(elements.descriptors, vec!["arm"]);
    assert_eq!(elements.qualifiers, vec!["smooth", "slowly"]);

    let profile = build_profile(&elements, &text);
    assert!(profile.confidence >= Level::Medium);
    assert!(profile.complexity >= Level::Medium);
    let signature = compute_signature(&elements, &profile);

    for seed in 0..24 {
        let mut rng = StdRng::seed_from_u64(seed);
        let bundle = entropy::aggregate(&text, &profile, &clock(), &mut rng);
        let (generated, trace) = engine.build_password(&elements, &profile, &signature, &bundle, &mut rng);

        assert!(REFERENCE_RAW.is_match(&generated.raw), "{}", generated.raw);
        assert_eq!(trace.contextual, 1);

        let body = &generated.raw["Walk".len()..generated.raw.len() - bundle.secure_random.len()];
        if body.chars().any(|c| matches!(c, 'a' | 'b' | 'e')) {
            assert!(trace.basic > 0, "{}", generated.raw);
        }
        if body.contains('c') {
            assert!(trace.advanced > 0, "{}", generated.raw);
        }
        assert!(trace.advanced > 0 || trace.unicode_assured, "{trace:?}");
        assert!(
            generated.value.chars().any(|c| !c.is_ascii()),
            "{}",
            generated.value
        );

        let len = generated.value.chars().count();
        assert!((12..=24).contains(&len), "{}", generated.value);

        let report = strength::assess(&generated.value, &profile);
        assert!(report.score >= 6, "{}: {report:?}", generated.value);
    }
}

fn scored_class(c: char) -> Option<usize> {
    if c.is_ascii_lowercase() {
        Some(0)
    } else if c.is_ascii_uppercase() {
        Some(1)
    } else if c.is_ascii_digit() {
        Some(2)
    } else if c.is_ascii_punctuation() {
        Some(3)
    } else {
        None
    }
}

/// Replace one character (from a class with at least two members) with a
/// character of each missing class and check the score never drops.
fn assert_monotonic(password: &str, profile: &BehavioralProfile) {
    const FILL: [char; 4] = ['q', 'Q', '7', '#'];
    let chars: Vec<char> = password.chars().collect();
    let base = strength::assess(password, profile).score;

    for (missing, fill) in FILL.iter().enumerate() {
        if chars.iter().any(|c| scored_class(*c) == Some(missing)) {
            continue;
        }
        let donor = (0..chars.len()).find(|&i| match scored_class(chars[i]) {
            Some(k) => chars.iter().filter(|c| scored_class(**c) == Some(k)).count() >= 2,
            None => false,
        });
        let Some(i) = donor else { continue };

        let mut variant = chars.clone();
        variant[i] = *fill;
        let variant: String = variant.into_iter().collect();
        let score = strength::assess(&variant, profile).score;
        assert!(score >= base, "{password} ({base}) → {variant} ({score})");
    }
}

#[test]
fn adding_a_missing_class_never_lowers_score() {
    let profile = BehavioralProfile {
        coordination: 1,
        energy: 1,
        precision: 0,
        energy_intensity: EnergyIntensity::Calm,
        marker_count: 2,
        complexity: Level::Medium,
        confidence: Level::Medium,
    };
    for pw in [
        "walkingslowly",
        "w4lkingsl0wly",
        "WALK_SLOWLY_NOW",
        "abcabcabc123",
        "zzzz____zzzz",
        "ñandú_walks_far",
        "1234567890123",
        "W4lk_d435_1f23_c0ff33",
    ] {
        assert_monotonic(pw, &profile);
    }

    let engine = engine();
    for input in corpus() {
        let result = engine.generate_with(&input, &clock(), &mut StdRng::seed_from_u64(6));
        assert_monotonic(&result.password, &result.components.behavioral_profile);
    }
}
