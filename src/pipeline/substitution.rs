//! Ordered character substitution over the assembled password.
//!
//! Tiers run contextual → basic → advanced. A character rewritten by one
//! tier is locked against the later ones, and the secure random anchor is
//! never touched. Every replacement is one character for one character, so
//! no tier shortens the string. The body is then cut to the maximum length
//! (never the anchor), with room kept for the digit and Unicode glyph that
//! reinforcement appends, and finally padded up to the minimum.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use super::template::AssembledPassword;
use super::types::EntropyBundle;
use crate::config::GeneratorConfig;

/// Whole-token rewrites for movement vocabulary.
const CONTEXTUAL: &[(&str, &str)] = &[
    ("walk", "w4lk"),
    ("move", "m0v3"),
    ("turn", "7urn"),
    ("step", "57ep"),
    ("wave", "w4v3"),
    ("lift", "l1f7"),
    ("kick", "k1ck"),
    ("spin", "5p1n"),
];

/// Leet-style replacements, applied to every eligible lowercase letter.
const BASIC: &[(char, char)] = &[
    ('a', '@'),
    ('e', '3'),
    ('i', '!'),
    ('o', '0'),
    ('s', '$'),
    ('t', '7'),
    ('l', '1'),
    ('g', '9'),
    ('b', '6'),
];

/// Look-alike non-ASCII replacements, applied to at most `unicode_cap` letters.
const ADVANCED: &[(char, char)] = &[
    ('u', 'µ'),
    ('n', 'ñ'),
    ('c', '¢'),
    ('y', '¥'),
    ('p', 'þ'),
    ('r', 'ř'),
    ('m', 'м'),
];

/// Movement glyphs used when no advanced substitution survived.
const ASSURANCE_GLYPHS: [char; 3] = ['Θ', '∑', 'Ψ'];

static CONTEXTUAL_WORDS: LazyLock<Regex> = LazyLock::new(|| {
    let alternation = CONTEXTUAL
        .iter()
        .map(|(word, _)| *word)
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!("(?i)(?:{alternation})")).expect("Invalid contextual pattern")
});

#[derive(Debug, Clone, Copy)]
struct Cell {
    ch: char,
    locked: bool,
}

impl Cell {
    fn open(ch: char) -> Self {
        Self { ch, locked: false }
    }

    fn locked(ch: char) -> Self {
        Self { ch, locked: true }
    }
}

/// What the substitution pass did, for provenance and diagnostics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SubstitutionTrace {
    pub contextual: usize,
    pub basic: usize,
    pub advanced: usize,
    pub uppercase_reinforced: bool,
    pub digit_reinforced: bool,
    /// A look-alike glyph was inserted because no Unicode survived.
    pub unicode_assured: bool,
    pub padded: usize,
    pub truncated: usize,
    /// Character counts: raw, after contextual, after basic, after advanced.
    pub stage_lengths: [usize; 4],
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubstitutedPassword {
    pub value: String,
    pub trace: SubstitutionTrace,
}

#[derive(Debug, Clone)]
pub struct CharacterSubstitution {
    min_length: usize,
    max_length: usize,
    unicode_cap: usize,
}

impl CharacterSubstitution {
    pub fn new(config: &GeneratorConfig) -> Self {
        Self {
            min_length: config.min_length,
            max_length: config.max_length,
            unicode_cap: config.unicode_cap,
        }
    }

    pub fn apply(&self, assembled: &AssembledPassword, bundle: &EntropyBundle) -> SubstitutedPassword {
        let (body, anchor) = match assembled.raw.strip_suffix(assembled.anchor.as_str()) {
            Some(body) => (body, assembled.anchor.as_str()),
            None => (assembled.raw.as_str(), ""),
        };
        let anchor_len = anchor.chars().count();
        let mut trace = SubstitutionTrace::default();

        let mut cells = Vec::new();
        trace.stage_lengths[0] = body.chars().count() + anchor_len;

        trace.contextual = contextual_tier(body, &mut cells);
        trace.stage_lengths[1] = cells.len() + anchor_len;

        trace.basic = basic_tier(&mut cells);
        trace.stage_lengths[2] = cells.len() + anchor_len;

        trace.advanced = advanced_tier(&mut cells, self.unicode_cap);
        trace.stage_lengths[3] = cells.len() + anchor_len;

        // Cut first so reinforcement never lands in the part that is cut.
        // Room is reserved for every character reinforcement will insert.
        let allowed = self.max_length.saturating_sub(anchor_len);
        let tier_len = cells.len();
        let mut reserved = 0;
        loop {
            cells.truncate(allowed.saturating_sub(reserved).min(cells.len()));
            let inserts = usize::from(needs_digit(&cells, anchor)) + usize::from(needs_unicode(&cells));
            if inserts <= reserved {
                break;
            }
            reserved = inserts;
        }
        trace.truncated = tier_len - cells.len();

        trace.uppercase_reinforced = reinforce_uppercase(&mut cells, anchor);
        trace.digit_reinforced = reinforce_digit(&mut cells, anchor, &bundle.session);
        trace.unicode_assured = assure_unicode(&mut cells, &bundle.session);

        let mut body: Vec<char> = cells.iter().map(|c| c.ch).collect();
        trace.padded = self.pad(&mut body, anchor_len, bundle);

        let value: String = body.into_iter().chain(anchor.chars()).collect();

        tracing::debug!(
            contextual = trace.contextual,
            basic = trace.basic,
            advanced = trace.advanced,
            unicode_assured = trace.unicode_assured,
            padded = trace.padded,
            truncated = trace.truncated,
            length = value.chars().count(),
            "Substitution applied"
        );

        SubstitutedPassword { value, trace }
    }

    /// Append bundle tokens (session first) until the minimum length is met.
    fn pad(&self, body: &mut Vec<char>, anchor_len: usize, bundle: &EntropyBundle) -> usize {
        let needed = self.min_length.saturating_sub(body.len() + anchor_len);
        if needed == 0 {
            return 0;
        }

        let filler: Vec<char> = [&bundle.session, &bundle.structural, &bundle.behavioral, &bundle.temporal]
            .into_iter()
            .flat_map(|token| token.chars())
            .collect();

        if filler.is_empty() {
            body.extend(std::iter::repeat('#').take(needed));
        } else {
            body.extend(filler.iter().cycle().take(needed));
        }
        needed
    }
}

fn contextual_tier(body: &str, cells: &mut Vec<Cell>) -> usize {
    let mut count = 0;
    let mut last = 0;

    for mat in CONTEXTUAL_WORDS.find_iter(body) {
        cells.extend(body[last..mat.start()].chars().map(Cell::open));

        let word = mat.as_str();
        let lower = word.to_lowercase();
        let replacement = CONTEXTUAL
            .iter()
            .find(|(w, _)| *w == lower)
            .map(|(_, r)| *r)
            .unwrap_or(word);
        let capitalized = word.chars().next().is_some_and(char::is_uppercase);

        for (i, ch) in replacement.chars().enumerate() {
            let ch = if i == 0 && capitalized {
                ch.to_ascii_uppercase()
            } else {
                ch
            };
            cells.push(Cell::locked(ch));
        }

        last = mat.end();
        count += 1;
    }

    cells.extend(body[last..].chars().map(Cell::open));
    count
}

fn lookup(table: &[(char, char)], ch: char) -> Option<char> {
    table.iter().find(|(from, _)| *from == ch).map(|(_, to)| *to)
}

fn basic_tier(cells: &mut [Cell]) -> usize {
    let mut count = 0;
    for cell in cells.iter_mut().filter(|c| !c.locked) {
        if let Some(to) = lookup(BASIC, cell.ch) {
            *cell = Cell::locked(to);
            count += 1;
        }
    }
    count
}

fn advanced_tier(cells: &mut [Cell], cap: usize) -> usize {
    let mut count = 0;
    for cell in cells.iter_mut().filter(|c| !c.locked) {
        if count >= cap {
            break;
        }
        if let Some(to) = lookup(ADVANCED, cell.ch) {
            *cell = Cell::locked(to);
            count += 1;
        }
    }
    count
}

/// Uppercase the first open lowercase letter when nothing is uppercase.
fn reinforce_uppercase(cells: &mut [Cell], anchor: &str) -> bool {
    let has_upper = cells.iter().any(|c| c.ch.is_ascii_uppercase())
        || anchor.chars().any(|c| c.is_ascii_uppercase());
    if has_upper {
        return false;
    }
    match cells.iter_mut().find(|c| !c.locked && c.ch.is_ascii_lowercase()) {
        Some(cell) => {
            *cell = Cell::locked(cell.ch.to_ascii_uppercase());
            true
        }
        None => false,
    }
}

/// First hex digit of the session token, 0 when there is none.
fn session_nibble(session: &str) -> u32 {
    session.chars().find_map(|c| c.to_digit(16)).unwrap_or(0)
}

fn needs_digit(cells: &[Cell], anchor: &str) -> bool {
    !cells.iter().any(|c| c.ch.is_ascii_digit()) && !anchor.chars().any(|c| c.is_ascii_digit())
}

fn needs_unicode(cells: &[Cell]) -> bool {
    cells.iter().all(|c| c.ch.is_ascii())
}

/// Append a session-derived digit to the body when there is no digit.
fn reinforce_digit(cells: &mut Vec<Cell>, anchor: &str, session: &str) -> bool {
    if !needs_digit(cells, anchor) {
        return false;
    }
    let digit = char::from_digit(session_nibble(session) % 10, 10).unwrap_or('0');
    cells.push(Cell::locked(digit));
    true
}

/// Append one session-chosen look-alike glyph when the body has no
/// non-ASCII character left. Only fires at zero, so it stays within
/// `unicode_cap`.
fn assure_unicode(cells: &mut Vec<Cell>, session: &str) -> bool {
    if !needs_unicode(cells) {
        return false;
    }
    let glyph = ASSURANCE_GLYPHS[session_nibble(session) as usize % ASSURANCE_GLYPHS.len()];
    cells.push(Cell::locked(glyph));
    true
}
