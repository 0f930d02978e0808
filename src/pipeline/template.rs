//! Tiered template selection and slot filling.
//!
//! Every template ends with `{random}`: the secure random token is the
//! anchor of the password and later stages never cut or rewrite it.

use std::collections::HashMap;
use std::sync::LazyLock;

use rand::{CryptoRng, Rng, RngCore};
use regex::{Captures, Regex};

use super::extraction::FALLBACK_ACTION;
use super::types::{
    BehavioralProfile, BiometricSignature, EntropyBundle, Level, PasswordTemplate, Provenance,
    SemanticElements, Slot, TemplateTier,
};

pub const ACTION_WIDTH: usize = 6;
pub const MODIFIER_WIDTH: usize = 5;
pub const SIGNATURE_WIDTH: usize = 4;

const DEFAULT_MODIFIER: &str = "flow";
const DEFAULT_SIGNATURE: &str = "MS";

/// Actions preferred for the action slot, most distinctive first.
const PRIORITY_ACTIONS: &[&str] = &["walk", "run", "jump", "wave", "point", "turn"];

const HIGH_TEMPLATES: &[&str] = &[
    "{signature}{action}_{biometric}_{random}",
    "{action}_{behavioral}{biometric}_{random}",
    "{action}{modifier}_{biometric}_{entropy}_{random}",
    "{biometric}{action}_{temporal}_{random}",
];

/// All medium templates carry action, biometric, temporal, random in order.
const MEDIUM_TEMPLATES: &[&str] = &[
    "{action}_{biometric}_{temporal}_{random}",
    "{action}-{biometric}.{temporal}_{random}",
    "{action}.{biometric}_{temporal}!{random}",
];

/// Low templates need no semantic signal at all.
const LOW_TEMPLATES: &[&str] = &[
    "{entropy}_{temporal}_{random}",
    "{temporal}-{entropy}_{random}",
    "{entropy}{temporal}!{random}",
];

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{([a-z]+)\}").expect("Invalid placeholder pattern"));

pub fn templates(tier: TemplateTier) -> &'static [&'static str] {
    match tier {
        TemplateTier::High => HIGH_TEMPLATES,
        TemplateTier::Medium => MEDIUM_TEMPLATES,
        TemplateTier::Low => LOW_TEMPLATES,
    }
}

/// Slots referenced by a format string, in order of appearance.
pub fn template_slots(format: &str) -> Vec<Slot> {
    PLACEHOLDER
        .captures_iter(format)
        .filter_map(|caps| Slot::from_name(&caps[1]))
        .collect()
}

/// Pick the tier the available signal can support.
pub fn select_tier(elements: &SemanticElements, profile: &BehavioralProfile) -> TemplateTier {
    if profile.confidence == Level::High
        && profile.complexity == Level::High
        && !elements.extracted_actions().is_empty()
    {
        TemplateTier::High
    } else if (profile.confidence >= Level::Medium || profile.complexity >= Level::Medium)
        && elements.has_semantic_data()
    {
        TemplateTier::Medium
    } else {
        TemplateTier::Low
    }
}

/// Uniform choice among the tier's templates, drawn from the secure source.
pub fn select_template<R: RngCore + CryptoRng>(tier: TemplateTier, rng: &mut R) -> PasswordTemplate {
    let candidates = templates(tier);
    PasswordTemplate {
        tier,
        format: candidates[rng.gen_range(0..candidates.len())],
    }
}

/// A slot's content and whether it had to fall back to a default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotValue {
    pub text: String,
    pub defaulted: bool,
}

impl SlotValue {
    fn filled(text: impl Into<String>) -> Self {
        Self { text: text.into(), defaulted: false }
    }

    fn defaulted(text: impl Into<String>) -> Self {
        Self { text: text.into(), defaulted: true }
    }
}

/// Representative value for every slot.
#[derive(Debug, Clone)]
pub struct SlotValues {
    values: HashMap<Slot, SlotValue>,
}

impl SlotValues {
    pub fn build(
        elements: &SemanticElements,
        signature: &BiometricSignature,
        bundle: &EntropyBundle,
    ) -> Self {
        let mut values = HashMap::new();
        values.insert(Slot::Action, action_value(elements));
        values.insert(Slot::Modifier, modifier_value(elements));
        values.insert(Slot::Signature, movement_initials(elements));
        values.insert(Slot::Biometric, SlotValue::filled(signature.as_str()));
        values.insert(Slot::Temporal, SlotValue::filled(&bundle.temporal));
        values.insert(Slot::Entropy, SlotValue::filled(&bundle.structural));
        values.insert(Slot::Behavioral, SlotValue::filled(&bundle.behavioral));
        values.insert(Slot::Random, SlotValue::filled(&bundle.secure_random));
        Self { values }
    }

    pub fn get(&self, slot: Slot) -> Option<&SlotValue> {
        self.values.get(&slot)
    }
}

/// Template output before substitution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssembledPassword {
    pub raw: String,
    /// The secure random suffix of `raw`.
    pub anchor: String,
    pub template: PasswordTemplate,
    pub provenance: Provenance,
}

/// Substitute every placeholder of `template` with its slot value.
pub fn fill(template: PasswordTemplate, values: &SlotValues) -> AssembledPassword {
    let mut provenance = Provenance::default();

    for slot in template_slots(template.format) {
        match values.get(slot) {
            Some(v) if !v.defaulted => provenance.filled_slots.push(slot),
            _ => provenance.defaulted_slots.push(slot),
        }
    }

    let raw = PLACEHOLDER
        .replace_all(template.format, |caps: &Captures<'_>| {
            Slot::from_name(&caps[1])
                .and_then(|slot| values.get(slot))
                .map(|v| v.text.clone())
                .unwrap_or_default()
        })
        .into_owned();

    let anchor = values
        .get(Slot::Random)
        .map(|v| v.text.clone())
        .unwrap_or_default();

    AssembledPassword {
        raw,
        anchor,
        template,
        provenance,
    }
}

/// The most distinctive extracted action: a priority action if present,
/// else the longest one (first wins ties).
pub fn primary_action(actions: &[String]) -> Option<&str> {
    for priority in PRIORITY_ACTIONS {
        if let Some(found) = actions.iter().find(|a| a.contains(priority)) {
            return Some(found.as_str());
        }
    }
    actions
        .iter()
        .fold(None, |best: Option<&String>, a| match best {
            Some(b) if b.len() >= a.len() => Some(b),
            _ => Some(a),
        })
        .map(String::as_str)
}

fn action_value(elements: &SemanticElements) -> SlotValue {
    match primary_action(elements.extracted_actions()) {
        Some(action) => SlotValue::filled(capitalize(&take_chars(action, ACTION_WIDTH))),
        None => SlotValue::defaulted(capitalize(FALLBACK_ACTION)),
    }
}

/// Qualifier first, then descriptor, then the second action.
fn modifier_value(elements: &SemanticElements) -> SlotValue {
    if elements.is_fallback {
        return SlotValue::defaulted(DEFAULT_MODIFIER);
    }
    elements
        .qualifiers
        .first()
        .or_else(|| elements.descriptors.first())
        .or_else(|| elements.actions.get(1))
        .map(|m| SlotValue::filled(take_chars(m, MODIFIER_WIDTH).to_lowercase()))
        .unwrap_or_else(|| SlotValue::defaulted(DEFAULT_MODIFIER))
}

/// Initials of up to two actions (upper) and two descriptors (lower).
fn movement_initials(elements: &SemanticElements) -> SlotValue {
    if elements.is_fallback {
        return SlotValue::defaulted(DEFAULT_SIGNATURE);
    }
    let initials: String = elements
        .actions
        .iter()
        .take(2)
        .filter_map(|a| a.chars().next())
        .flat_map(char::to_uppercase)
        .chain(
            elements
                .descriptors
                .iter()
                .take(2)
                .filter_map(|d| d.chars().next())
                .flat_map(char::to_lowercase),
        )
        .take(SIGNATURE_WIDTH)
        .collect();

    if initials.is_empty() {
        SlotValue::defaulted(DEFAULT_SIGNATURE)
    } else {
        SlotValue::filled(initials)
    }
}

fn take_chars(s: &str, n: usize) -> String {
    s.chars().take(n).collect()
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
