use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

/// Every word family the pipeline recognizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LexiconCategory {
    /// Movement verbs ("walks", "raising").
    Action,
    /// Body-part nouns that anchor descriptor windows.
    BodyPart,
    /// Directional and spatial terms.
    Spatial,
    /// Adjectives/adverbs describing motion quality. Ranked.
    Qualifier,
    /// Behavioral markers of coordination.
    Coordination,
    /// Behavioral markers of energy, weighted by intensity.
    Energy,
    /// Behavioral markers of precision.
    Precision,
    /// Gait vocabulary, used for structural entropy only.
    Gait,
}

impl LexiconCategory {
    pub const ALL: [LexiconCategory; 8] = [
        LexiconCategory::Action,
        LexiconCategory::BodyPart,
        LexiconCategory::Spatial,
        LexiconCategory::Qualifier,
        LexiconCategory::Coordination,
        LexiconCategory::Energy,
        LexiconCategory::Precision,
        LexiconCategory::Gait,
    ];
}

/// A compiled lexicon entry: canonical form plus its inflection pattern.
struct LexiconEntry {
    canonical: &'static str,
    regex: Regex,
    weight: u8,
}

/// One occurrence of a lexicon entry in a text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexiconHit {
    pub canonical: &'static str,
    /// Matched text, lowercased.
    pub surface: String,
    /// Position of the entry within its lexicon (lower ranks first).
    pub rank: usize,
    pub weight: u8,
    /// Byte offsets into the scanned text.
    pub start: usize,
    pub end: usize,
}

fn entry(canonical: &'static str, pattern: &str) -> LexiconEntry {
    weighted(canonical, pattern, 1)
}

fn weighted(canonical: &'static str, pattern: &str, weight: u8) -> LexiconEntry {
    LexiconEntry {
        canonical,
        regex: Regex::new(&format!(r"(?i)\b(?:{pattern})\b")).expect("Invalid lexicon pattern"),
        weight,
    }
}

static ACTIONS: LazyLock<Vec<LexiconEntry>> = LazyLock::new(|| {
    vec![
        entry("walk", r"walk(?:s|ed|ing)?"),
        entry("run", r"run(?:s|ning)?|ran"),
        entry("jump", r"jump(?:s|ed|ing)?"),
        entry("step", r"step(?:s|ped|ping)?"),
        entry("turn", r"turn(?:s|ed|ing)?"),
        entry("bend", r"bend(?:s|ing)?|bent"),
        entry("lift", r"lift(?:s|ed|ing)?"),
        entry("wave", r"wav(?:e|es|ed|ing)"),
        entry("raise", r"rais(?:e|es|ed|ing)"),
        entry("reach", r"reach(?:es|ed|ing)?"),
        entry("point", r"point(?:s|ed|ing)?"),
        entry("stretch", r"stretch(?:es|ed|ing)?"),
        entry("rotate", r"rotat(?:e|es|ed|ing)"),
        entry("extend", r"extend(?:s|ed|ing)?"),
        entry("kick", r"kick(?:s|ed|ing)?"),
        entry("squat", r"squat(?:s|ted|ting)?"),
        entry("spin", r"spin(?:s|ning)?|spun"),
        entry("lean", r"lean(?:s|ed|ing)?"),
        entry("crouch", r"crouch(?:es|ed|ing)?"),
        entry("march", r"march(?:es|ed|ing)?"),
        entry("nod", r"nod(?:s|ded|ding)?"),
        entry("clap", r"clap(?:s|ped|ping)?"),
        entry("twist", r"twist(?:s|ed|ing)?"),
        entry("shake", r"shak(?:e|es|ing)|shook"),
        entry("gesture", r"gestur(?:e|es|ed|ing)"),
        entry("dance", r"danc(?:e|es|ed|ing)"),
        entry("sway", r"sway(?:s|ed|ing)?"),
        entry("hop", r"hop(?:s|ped|ping)?"),
        entry("move", r"mov(?:e|es|ed|ing)"),
    ]
});

static BODY_PARTS: LazyLock<Vec<LexiconEntry>> = LazyLock::new(|| {
    vec![
        entry("arm", r"arms?"),
        entry("hand", r"hands?"),
        entry("leg", r"legs?"),
        entry("foot", r"foot|feet"),
        entry("head", r"head"),
        entry("torso", r"torso"),
        entry("body", r"body"),
        entry("shoulder", r"shoulders?"),
        entry("knee", r"knees?"),
        entry("elbow", r"elbows?"),
        entry("hip", r"hips?"),
        entry("wrist", r"wrists?"),
        entry("ankle", r"ankles?"),
        entry("chest", r"chest"),
        entry("neck", r"neck"),
        entry("finger", r"fingers?"),
    ]
});

static SPATIAL: LazyLock<Vec<LexiconEntry>> = LazyLock::new(|| {
    vec![
        entry("left", r"left"),
        entry("right", r"right"),
        entry("up", r"up"),
        entry("upward", r"upwards?"),
        entry("down", r"down"),
        entry("downward", r"downwards?"),
        entry("forward", r"forwards?"),
        entry("backward", r"backwards?"),
        entry("sideways", r"sideways"),
        entry("side", r"sides?"),
        entry("above", r"above"),
        entry("below", r"below"),
        entry("overhead", r"overhead"),
        entry("outward", r"outwards?"),
        entry("inward", r"inwards?"),
        entry("counterclockwise", r"counter-?clockwise"),
        entry("clockwise", r"clockwise"),
        entry("horizontal", r"horizontal(?:ly)?"),
        entry("vertical", r"vertical(?:ly)?"),
        entry("diagonal", r"diagonal(?:ly)?"),
        entry("circular", r"circular"),
        entry("across", r"across"),
    ]
});

/// Quality-of-motion words rank above tempo words.
static QUALIFIERS: LazyLock<Vec<LexiconEntry>> = LazyLock::new(|| {
    vec![
        entry("smooth", r"smooth(?:ly|er|ness)?"),
        entry("fluid", r"fluid(?:ly)?"),
        entry("rhythmic", r"rhythmic(?:al|ally)?"),
        entry("graceful", r"graceful(?:ly)?"),
        entry("steady", r"steady|steadily"),
        entry("deliberate", r"deliberate(?:ly)?"),
        entry("jerky", r"jerky|jerkily"),
        entry("stiff", r"stiff(?:ly)?"),
        entry("relaxed", r"relaxed(?:ly)?"),
        entry("tense", r"tense(?:ly)?"),
        entry("effortless", r"effortless(?:ly)?"),
        entry("natural", r"natural(?:ly)?"),
        entry("erratic", r"erratic(?:ally)?"),
        entry("consistent", r"consistent(?:ly)?"),
        entry("irregular", r"irregular(?:ly)?"),
        entry("rough", r"rough(?:ly)?"),
        entry("slow", r"slow(?:ly|er|est)?"),
        entry("quick", r"quick(?:ly|er|est)?"),
        entry("rapid", r"rapid(?:ly)?"),
        entry("gradual", r"gradual(?:ly)?"),
        entry("sudden", r"sudden(?:ly)?"),
        entry("gentle", r"gentle|gently"),
        entry("brisk", r"brisk(?:ly)?"),
        entry("fast", r"fast(?:er|est)?"),
    ]
});

static COORDINATION: LazyLock<Vec<LexiconEntry>> = LazyLock::new(|| {
    vec![
        entry("smooth", r"smooth(?:ly)?"),
        entry("coordinated", r"coordinat(?:ed|ion)"),
        entry("sync", r"sync(?:ed|hronized|hronised|hronous|hrony)?"),
        entry("balance", r"balanc(?:e|ed|ing)"),
        entry("stable", r"stable|stability"),
        entry("fluid", r"fluid(?:ly|ity)?"),
        entry("harmonious", r"harmonious(?:ly)?"),
        entry("symmetric", r"symmetric(?:al|ally)?"),
    ]
});

/// Weight encodes intensity: 3 explosive, 2 sustained, 1 calm.
static ENERGY: LazyLock<Vec<LexiconEntry>> = LazyLock::new(|| {
    vec![
        weighted("explosive", r"explosive(?:ly)?", 3),
        weighted("vigorous", r"vigorous(?:ly)?", 3),
        weighted("rapid", r"rapid(?:ly)?", 3),
        weighted("quick", r"quick(?:ly)?", 3),
        weighted("fast", r"fast", 3),
        weighted("energetic", r"energetic(?:ally)?", 3),
        weighted("powerful", r"powerful(?:ly)?", 3),
        weighted("sustained", r"sustained", 2),
        weighted("steady", r"steady|steadily", 2),
        weighted("brisk", r"brisk(?:ly)?", 2),
        weighted("constant", r"constant(?:ly)?", 2),
        weighted("gentle", r"gentle|gently", 1),
        weighted("slow", r"slow(?:ly)?", 1),
        weighted("calm", r"calm(?:ly)?", 1),
        weighted("relaxed", r"relaxed", 1),
        weighted("soft", r"soft(?:ly)?", 1),
    ]
});

static PRECISION: LazyLock<Vec<LexiconEntry>> = LazyLock::new(|| {
    vec![
        entry("precise", r"precise(?:ly)?|precision"),
        entry("deliberate", r"deliberate(?:ly)?"),
        entry("controlled", r"controlled"),
        entry("careful", r"careful(?:ly)?"),
        entry("natural", r"natural(?:ly)?"),
        entry("accurate", r"accurate(?:ly)?"),
        entry("measured", r"measured"),
        entry("exact", r"exact(?:ly)?"),
        entry("methodical", r"methodical(?:ly)?"),
    ]
});

static GAIT: LazyLock<Vec<LexiconEntry>> = LazyLock::new(|| {
    vec![
        entry("stride", r"strides?"),
        entry("cadence", r"cadence"),
        entry("pace", r"paced?"),
        entry("rhythm", r"rhythm"),
        entry("flow", r"flow(?:s|ing)?"),
        entry("gait", r"gait"),
        entry("tempo", r"tempo"),
    ]
});

fn entries(category: LexiconCategory) -> &'static [LexiconEntry] {
    match category {
        LexiconCategory::Action => &ACTIONS,
        LexiconCategory::BodyPart => &BODY_PARTS,
        LexiconCategory::Spatial => &SPATIAL,
        LexiconCategory::Qualifier => &QUALIFIERS,
        LexiconCategory::Coordination => &COORDINATION,
        LexiconCategory::Energy => &ENERGY,
        LexiconCategory::Precision => &PRECISION,
        LexiconCategory::Gait => &GAIT,
    }
}

/// Scan `text` for every entry of `category`, returning hits in text order.
///
/// When two entries match overlapping spans, the longer span wins
/// ("counter-clockwise" over "clockwise").
pub fn scan(category: LexiconCategory, text: &str) -> Vec<LexiconHit> {
    let mut hits = Vec::new();

    for (rank, lex) in entries(category).iter().enumerate() {
        for mat in lex.regex.find_iter(text) {
            hits.push(LexiconHit {
                canonical: lex.canonical,
                surface: mat.as_str().to_lowercase(),
                rank,
                weight: lex.weight,
                start: mat.start(),
                end: mat.end(),
            });
        }
    }

    hits.sort_by_key(|h| (h.start, std::cmp::Reverse(h.end)));
    drop_contained(&mut hits);
    hits
}

/// Distinct hits of `category`, one per canonical form, in text order.
pub fn distinct_hits(category: LexiconCategory, text: &str) -> Vec<LexiconHit> {
    let mut seen = HashSet::new();
    scan(category, text)
        .into_iter()
        .filter(|hit| seen.insert(hit.canonical))
        .collect()
}

/// Number of lexicon entries in `category`.
pub fn entry_count(category: LexiconCategory) -> usize {
    entries(category).len()
}

/// Remove hits whose span lies inside an earlier, longer hit.
/// Expects hits sorted by (start, longest first).
fn drop_contained(hits: &mut Vec<LexiconHit>) {
    let mut covered_until = 0usize;
    hits.retain(|hit| {
        if hit.end <= covered_until {
            return false;
        }
        covered_until = covered_until.max(hit.end);
        true
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_lexicons_compile_and_are_populated() {
        for category in LexiconCategory::ALL {
            assert!(entry_count(category) > 0, "{category:?} is empty");
        }
    }

    #[test]
    fn inflected_actions_map_to_canonical() {
        let hits = scan(LexiconCategory::Action, "She walked, then kept walking and walks on.");
        assert_eq!(hits.len(), 3);
        assert!(hits.iter().all(|h| h.canonical == "walk"));
        assert_eq!(hits[0].surface, "walked");
    }

    #[test]
    fn irregular_forms_are_recognized() {
        let hits = scan(LexiconCategory::Action, "He ran, spun, and shook his arms.");
        let canon: Vec<_> = hits.iter().map(|h| h.canonical).collect();
        assert_eq!(canon, vec!["run", "spin", "shake"]);
    }

    #[test]
    fn word_boundaries_prevent_partial_matches() {
        // "movement" must not count as "move"; "hopeful" is not "hop"
        assert!(scan(LexiconCategory::Action, "a hopeful movement").is_empty());
    }

    #[test]
    fn matching_is_case_insensitive() {
        let hits = scan(LexiconCategory::BodyPart, "ARMS and Feet");
        let canon: Vec<_> = hits.iter().map(|h| h.canonical).collect();
        assert_eq!(canon, vec!["arm", "foot"]);
        assert_eq!(hits[1].surface, "feet");
    }

    #[test]
    fn longer_overlapping_match_wins() {
        let hits = scan(LexiconCategory::Spatial, "rotating counter-clockwise");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].canonical, "counterclockwise");
    }

    #[test]
    fn hits_are_in_text_order_with_offsets() {
        let text = "raise the left arm then lower it down";
        let hits = scan(LexiconCategory::Spatial, text);
        assert_eq!(hits[0].canonical, "left");
        assert_eq!(&text[hits[0].start..hits[0].end], "left");
        assert_eq!(hits[1].canonical, "down");
    }

    #[test]
    fn energy_entries_carry_intensity_weight() {
        let hits = scan(LexiconCategory::Energy, "explosive then gentle");
        assert_eq!(hits[0].weight, 3);
        assert_eq!(hits[1].weight, 1);
    }

    #[test]
    fn qualifier_rank_puts_quality_before_tempo() {
        let hits = scan(LexiconCategory::Qualifier, "slowly and smooth");
        let slow = hits.iter().find(|h| h.canonical == "slow").unwrap();
        let smooth = hits.iter().find(|h| h.canonical == "smooth").unwrap();
        assert!(smooth.rank < slow.rank);
    }

    #[test]
    fn distinct_hits_dedups_by_canonical() {
        let hits = distinct_hits(LexiconCategory::Coordination, "balanced, balancing, smooth balance");
        let canon: Vec<_> = hits.iter().map(|h| h.canonical).collect();
        assert_eq!(canon, vec!["balance", "smooth"]);
    }

    #[test]
    fn empty_text_yields_no_hits() {
        for category in LexiconCategory::ALL {
            assert!(scan(category, "").is_empty());
        }
    }
}
