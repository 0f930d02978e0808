//! Multi-source entropy: temporal, structural, behavioral and secure random
//! tokens.
//!
//! The random and session tokens must come from a cryptographically secure
//! generator. The `CryptoRng` bound enforces it: general-purpose generators
//! such as `SmallRng` do not implement it and cannot be passed in.

use chrono::{Datelike, NaiveDateTime, Timelike};
use rand::{CryptoRng, RngCore};
use uuid::Uuid;

use super::extraction::word_count;
use super::fingerprint::sha256_hex;
use super::lexicon::{distinct_hits, LexiconCategory};
use super::types::{BehavioralProfile, EntropyBundle, Level};

/// Width of every hashed token.
pub const HASH_TOKEN_WIDTH: usize = 4;
/// Session token: 3 bytes, 6 hex characters.
pub const SESSION_TOKEN_BYTES: usize = 3;

const PUNCTUATION_PATTERN_LEN: usize = 8;

/// Source of the current time. Injected so generation can be replayed.
pub trait Clock {
    fn now(&self) -> NaiveDateTime;
}

/// Local wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        chrono::Local::now().naive_local()
    }
}

/// A clock frozen at one instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDateTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

/// Random anchor width in bytes, scaled with movement complexity.
pub fn random_token_bytes(complexity: Level) -> usize {
    match complexity {
        Level::Low => 2,
        Level::Medium => 3,
        Level::High => 4,
    }
}

/// `bytes` fresh bytes from `rng`, hex-encoded.
pub fn secure_hex<R: RngCore + CryptoRng>(rng: &mut R, bytes: usize) -> String {
    let mut buf = vec![0u8; bytes];
    rng.fill_bytes(&mut buf);
    buf.iter().map(|b| format!("{b:02x}")).collect()
}

/// A UUID built from 16 bytes of the secure source.
pub fn generation_id<R: RngCore + CryptoRng>(rng: &mut R) -> Uuid {
    let mut bytes = [0u8; 16];
    rng.fill_bytes(&mut bytes);
    uuid::Builder::from_random_bytes(bytes).into_uuid()
}

fn hash_token(input: &str) -> String {
    sha256_hex(input)[..HASH_TOKEN_WIDTH].to_string()
}

/// Hash of hour, minute, second, microsecond and weekday.
pub fn temporal_token(now: NaiveDateTime) -> String {
    let micros = (now.nanosecond() % 1_000_000_000) / 1_000;
    hash_token(&format!(
        "{:02}{:02}{:02}{:06}{}",
        now.hour(),
        now.minute(),
        now.second(),
        micros,
        now.weekday().num_days_from_monday()
    ))
}

/// Distinct hits across the gait, coordination, energy and spatial lexicons.
pub fn movement_type_count(text: &str) -> usize {
    [
        LexiconCategory::Gait,
        LexiconCategory::Coordination,
        LexiconCategory::Energy,
        LexiconCategory::Spatial,
    ]
    .into_iter()
    .map(|category| distinct_hits(category, text).len())
    .sum()
}

/// Coarse bucket of the average sentence length in words.
pub fn sentence_bucket(text: &str) -> &'static str {
    let lengths: Vec<usize> = text
        .split(['.', '!', '?', ';'])
        .map(word_count)
        .filter(|&n| n > 0)
        .collect();

    if lengths.is_empty() {
        return "none";
    }

    let average = lengths.iter().sum::<usize>() / lengths.len();
    match average {
        0..=7 => "short",
        8..=15 => "medium",
        _ => "long",
    }
}

/// The first few punctuation characters, in order.
pub fn punctuation_pattern(text: &str) -> String {
    text.chars()
        .filter(|c| c.is_ascii_punctuation())
        .take(PUNCTUATION_PATTERN_LEN)
        .collect()
}

pub fn structural_token(text: &str) -> String {
    hash_token(&format!(
        "{}|{}|{}",
        movement_type_count(text),
        sentence_bucket(text),
        punctuation_pattern(text)
    ))
}

pub fn behavioral_token(profile: &BehavioralProfile) -> String {
    hash_token(&format!(
        "{}|{}|{}|{}|{}",
        profile.coordination, profile.energy, profile.precision, profile.confidence, profile.complexity
    ))
}

/// Build the full bundle for one generation.
pub fn aggregate<C, R>(text: &str, profile: &BehavioralProfile, clock: &C, rng: &mut R) -> EntropyBundle
where
    C: Clock + ?Sized,
    R: RngCore + CryptoRng,
{
    let bundle = EntropyBundle {
        temporal: temporal_token(clock.now()),
        structural: structural_token(text),
        behavioral: behavioral_token(profile),
        secure_random: secure_hex(rng, random_token_bytes(profile.complexity)),
        session: secure_hex(rng, SESSION_TOKEN_BYTES),
    };

    tracing::debug!(
        random_width = bundle.secure_random.len(),
        "Entropy bundle aggregated"
    );

    bundle
}
