//! The generation pipeline.
//!
//! Extract → Fingerprint → Aggregate entropy → Select template → Substitute
//! → Assess. Each stage runs once, in order, and none of them can fail: the
//! extractor supplies defaults for empty text and the low template tier
//! needs no semantic signal.

use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};

use super::entropy::{self, Clock, SystemClock};
use super::extraction::{extraction_feedback, SemanticExtractor};
use super::fingerprint::{build_profile, compute_signature};
use super::strength;
use super::substitution::{CharacterSubstitution, SubstitutionTrace};
use super::template::{fill, select_template, select_tier, SlotValues};
use super::types::{
    BehavioralProfile, BiometricSignature, EntropyBundle, GeneratedPassword, GenerationComponents,
    Level, MovementDescription, PasswordResult, SemanticElements,
};
use crate::config::{ConfigError, GeneratorConfig, GENERATION_METHOD};

/// Turns movement descriptions into passwords.
///
/// Holds only immutable configuration, so one engine can serve concurrent
/// requests; each call brings its own clock and random source.
#[derive(Debug, Clone)]
pub struct MovementPasswordEngine {
    extractor: SemanticExtractor,
    substitution: CharacterSubstitution,
}

impl MovementPasswordEngine {
    pub fn new(config: GeneratorConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::from_validated(&config))
    }

    /// Build the stages from a config that already passed `validate`.
    fn from_validated(config: &GeneratorConfig) -> Self {
        Self {
            extractor: SemanticExtractor::new(config),
            substitution: CharacterSubstitution::new(config),
        }
    }

    /// Generate with the local clock and the OS secure random source.
    pub fn generate(&self, input: &MovementDescription) -> PasswordResult {
        self.generate_with(input, &SystemClock, &mut OsRng)
    }

    /// Generate with an explicit clock and secure random source.
    ///
    /// A fixed clock and a seeded generator make the whole result
    /// reproducible.
    pub fn generate_with<C, R>(&self, input: &MovementDescription, clock: &C, rng: &mut R) -> PasswordResult
    where
        C: Clock + ?Sized,
        R: RngCore + CryptoRng,
    {
        let text = input.combined_text();

        let elements = self.extractor.extract(input);
        let feedback = extraction_feedback(&text, &elements);

        let profile = build_profile(&elements, &text);
        let signature = compute_signature(&elements, &profile);

        let bundle = entropy::aggregate(&text, &profile, clock, rng);

        let (generated, trace) = self.build_password(&elements, &profile, &signature, &bundle, rng);

        let strength = strength::assess(&generated.value, &profile);
        let generation_id = entropy::generation_id(rng);

        tracing::info!(
            %generation_id,
            tier = %generated.tier,
            score = strength.score,
            category = %strength.category,
            length = generated.value.chars().count(),
            "Password generated"
        );

        PasswordResult {
            password: generated.value,
            strength,
            security_features: security_features(&profile, &trace),
            components: GenerationComponents {
                semantic_elements: elements,
                extraction_feedback: feedback,
                behavioral_profile: profile,
                biometric_signature: signature,
                entropy_bundle: bundle,
                template_tier_used: generated.tier,
                template: generated.template,
                provenance: generated.provenance,
            },
            generation_method: GENERATION_METHOD,
            generation_id,
        }
    }

    /// Select a template, fill it and run substitution.
    pub fn build_password<R: RngCore + CryptoRng>(
        &self,
        elements: &SemanticElements,
        profile: &BehavioralProfile,
        signature: &BiometricSignature,
        bundle: &EntropyBundle,
        rng: &mut R,
    ) -> (GeneratedPassword, SubstitutionTrace) {
        let tier = select_tier(elements, profile);
        let template = select_template(tier, rng);
        let assembled = fill(template, &SlotValues::build(elements, signature, bundle));

        tracing::debug!(
            %tier,
            filled = assembled.provenance.filled_slots.len(),
            defaulted = assembled.provenance.defaulted_slots.len(),
            "Template filled"
        );

        let substituted = self.substitution.apply(&assembled, bundle);

        let generated = GeneratedPassword {
            value: substituted.value,
            raw: assembled.raw,
            tier,
            template: assembled.template.format.to_string(),
            provenance: assembled.provenance,
        };
        (generated, substituted.trace)
    }
}

impl Default for MovementPasswordEngine {
    /// The default config is valid by construction.
    fn default() -> Self {
        Self::from_validated(&GeneratorConfig::default())
    }
}

/// Human-readable summary of the protections applied to one password.
pub fn security_features(profile: &BehavioralProfile, trace: &SubstitutionTrace) -> Vec<String> {
    let mut features = Vec::new();

    if profile.confidence >= Level::Medium {
        features.push(format!("Behavioral biometrics ({} confidence)", profile.confidence));
    }
    features.push(format!("Movement entropy analysis ({} complexity)", profile.complexity));
    features.push("Multi-layered cryptographic hashing".to_string());
    features.push("High-precision temporal entropy".to_string());
    features.push("Cryptographically secure random anchor".to_string());

    let substitutions = trace.contextual + trace.basic + trace.advanced;
    if substitutions > 0 {
        features.push("Multi-tier character substitution".to_string());
    }
    features.push("Movement pattern fingerprinting".to_string());

    features
}
