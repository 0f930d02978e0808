use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Text pair handed over by the movement-analysis collaborator.
///
/// Both strings are untrusted free text and may be empty.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct MovementDescription {
    /// Detailed, multi-sentence analysis.
    pub comprehensive: String,
    /// One-line summary.
    pub summary: String,
}

impl MovementDescription {
    pub fn new(comprehensive: impl Into<String>, summary: impl Into<String>) -> Self {
        Self {
            comprehensive: comprehensive.into(),
            summary: summary.into(),
        }
    }

    /// Both texts joined, comprehensive first.
    pub fn combined_text(&self) -> String {
        match (self.comprehensive.trim().is_empty(), self.summary.trim().is_empty()) {
            (false, false) => format!("{} {}", self.comprehensive, self.summary),
            (false, true) => self.comprehensive.clone(),
            (true, false) => self.summary.clone(),
            (true, true) => String::new(),
        }
    }
}

/// Actions, descriptors and qualifiers mined from the movement text.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SemanticElements {
    pub actions: Vec<String>,
    pub descriptors: Vec<String>,
    pub qualifiers: Vec<String>,
    /// Populated categories / total categories, in [0, 1].
    pub extraction_effectiveness: f32,
    /// Matched bytes / total bytes of the combined text, in [0, 1].
    pub text_utilization: f32,
    /// True when nothing matched and the minimal defaults were substituted.
    pub is_fallback: bool,
}

impl SemanticElements {
    /// Actions that were actually extracted (empty for the fallback set).
    pub fn extracted_actions(&self) -> &[String] {
        if self.is_fallback {
            &[]
        } else {
            &self.actions
        }
    }

    /// Qualifiers that were actually extracted (empty for the fallback set).
    pub fn extracted_qualifiers(&self) -> &[String] {
        if self.is_fallback {
            &[]
        } else {
            &self.qualifiers
        }
    }

    pub fn has_semantic_data(&self) -> bool {
        !self.is_fallback
            && !(self.actions.is_empty() && self.descriptors.is_empty() && self.qualifiers.is_empty())
    }
}

/// Extraction quality report, kept for tuning the lexicons.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExtractionFeedback {
    pub effectiveness_score: u8,
    pub max_score: u8,
    pub notes: Vec<String>,
    /// Extracted words per hundred words of input.
    pub utilization_rate: f32,
}

/// Three-step grade shared by complexity and confidence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Level {
    Low,
    Medium,
    High,
}

impl Level {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    /// Points contributed to the strength score.
    pub fn points(&self) -> u8 {
        match self {
            Self::Low => 0,
            Self::Medium => 1,
            Self::High => 2,
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Dominant intensity among the energy markers found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnergyIntensity {
    Explosive,
    Sustained,
    Calm,
    Unmarked,
}

/// Behavioral reading of the movement text.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BehavioralProfile {
    pub coordination: u32,
    pub energy: u32,
    pub precision: u32,
    pub energy_intensity: EnergyIntensity,
    /// Distinct behavioral markers found across all three lexicons.
    pub marker_count: u32,
    pub complexity: Level,
    pub confidence: Level,
}

/// Four-character token hashed from semantic and behavioral content.
///
/// Content-reproducible: the same phrasing yields the same signature for
/// anyone. It identifies a description, not a person.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BiometricSignature(String);

impl BiometricSignature {
    pub const LENGTH: usize = 4;

    pub(crate) fn from_hex_digest(digest_hex: &str) -> Self {
        Self(digest_hex.chars().take(Self::LENGTH).collect())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BiometricSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Independent short tokens feeding the template slots.
///
/// `secure_random` and `session` come from a cryptographically secure
/// source only; the other three are hashed from time or text.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EntropyBundle {
    pub temporal: String,
    pub structural: String,
    pub behavioral: String,
    pub secure_random: String,
    pub session: String,
}

/// Named placeholder in a template format string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Slot {
    Action,
    Biometric,
    Temporal,
    Random,
    Entropy,
    Behavioral,
    Modifier,
    Signature,
}

impl Slot {
    pub const ALL: [Slot; 8] = [
        Slot::Action,
        Slot::Biometric,
        Slot::Temporal,
        Slot::Random,
        Slot::Entropy,
        Slot::Behavioral,
        Slot::Modifier,
        Slot::Signature,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Action => "action",
            Self::Biometric => "biometric",
            Self::Temporal => "temporal",
            Self::Random => "random",
            Self::Entropy => "entropy",
            Self::Behavioral => "behavioral",
            Self::Modifier => "modifier",
            Self::Signature => "signature",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|slot| slot.name() == name)
    }
}

/// Security tier a template belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TemplateTier {
    High,
    Medium,
    Low,
}

impl fmt::Display for TemplateTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        };
        f.write_str(label)
    }
}

/// A slot-format string such as `{action}_{biometric}_{temporal}_{random}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PasswordTemplate {
    pub tier: TemplateTier,
    pub format: &'static str,
}

/// Which slots carried real content and which fell back to defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Provenance {
    pub filled_slots: Vec<Slot>,
    pub defaulted_slots: Vec<Slot>,
}

/// Template output before and after substitution.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GeneratedPassword {
    pub value: String,
    pub raw: String,
    pub tier: TemplateTier,
    pub template: String,
    pub provenance: Provenance,
}

/// Strength label derived from the score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum StrengthCategory {
    Weak,
    Medium,
    Strong,
    #[serde(rename = "Very Strong")]
    VeryStrong,
    Exceptional,
}

impl StrengthCategory {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Weak => "Weak",
            Self::Medium => "Medium",
            Self::Strong => "Strong",
            Self::VeryStrong => "Very Strong",
            Self::Exceptional => "Exceptional",
        }
    }
}

impl fmt::Display for StrengthCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Scored, categorized and explained assessment of a password.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StrengthReport {
    pub score: u8,
    pub max_score: u8,
    pub category: StrengthCategory,
    pub factors: Vec<String>,
    pub recommendations: Vec<String>,
}

/// Intermediate artifacts exposed alongside the password.
#[derive(Debug, Clone, Serialize)]
pub struct GenerationComponents {
    pub semantic_elements: SemanticElements,
    pub extraction_feedback: ExtractionFeedback,
    pub behavioral_profile: BehavioralProfile,
    pub biometric_signature: BiometricSignature,
    pub entropy_bundle: EntropyBundle,
    pub template_tier_used: TemplateTier,
    pub template: String,
    pub provenance: Provenance,
}

/// Full record returned for one generation.
#[derive(Debug, Clone, Serialize)]
pub struct PasswordResult {
    pub password: String,
    pub strength: StrengthReport,
    pub components: GenerationComponents,
    pub generation_method: &'static str,
    pub generation_id: Uuid,
    pub security_features: Vec<String>,
}
