//! Lexicon sentiment scoring, normalized to [0, 1].
//!
//! A small valence lexicon on the familiar -4..+4 scale; token valences are
//! summed, squashed into a compound score in (-1, 1), then shifted to
//! [0, 1] so 0.5 is neutral. Simple negation handling: a negator directly
//! before a scored word flips and dampens its valence.

/// Squashing constant for the compound score (larger = gentler curve).
const ALPHA: f64 = 15.0;

/// Dampening factor applied when a scored word is negated.
const NEGATION_SCALAR: f64 = -0.74;

const NEGATORS: &[&str] = &[
    "not", "no", "never", "neither", "nor", "cannot", "cant", "dont", "doesnt", "didnt", "wont",
    "isnt", "wasnt", "arent", "aint",
];

/// Word valences, sorted for binary search.
const LEXICON: &[(&str, f64)] = &[
    ("abysmal", -3.1),
    ("amazing", 2.8),
    ("angry", -2.3),
    ("annoying", -1.9),
    ("appalling", -2.9),
    ("awesome", 3.1),
    ("awful", -2.9),
    ("bad", -2.5),
    ("best", 3.2),
    ("boring", -1.3),
    ("brilliant", 2.8),
    ("broken", -1.9),
    ("cheap", -0.9),
    ("complaint", -1.5),
    ("disappointed", -2.1),
    ("disappointing", -2.2),
    ("disaster", -3.1),
    ("dreadful", -2.8),
    ("excellent", 3.2),
    ("expensive", -0.8),
    ("fail", -2.3),
    ("failure", -2.5),
    ("fantastic", 2.9),
    ("fast", 1.1),
    ("fine", 0.8),
    ("fraud", -3.2),
    ("garbage", -2.4),
    ("good", 1.9),
    ("great", 3.1),
    ("happy", 2.7),
    ("hate", -2.7),
    ("helpful", 1.8),
    ("horrible", -2.9),
    ("impressive", 2.3),
    ("incredible", 2.6),
    ("love", 3.2),
    ("lovely", 2.8),
    ("mediocre", -0.8),
    ("nice", 1.8),
    ("outage", -2.0),
    ("overpriced", -1.7),
    ("pathetic", -2.6),
    ("perfect", 3.0),
    ("pleasant", 2.0),
    ("poor", -2.1),
    ("problem", -1.6),
    ("reliable", 1.9),
    ("rude", -2.2),
    ("sad", -2.1),
    ("scam", -3.3),
    ("slow", -1.2),
    ("smooth", 1.5),
    ("stable", 1.3),
    ("terrible", -3.0),
    ("thanks", 1.9),
    ("trash", -2.3),
    ("unreliable", -2.0),
    ("unstable", -1.7),
    ("useless", -2.3),
    ("waste", -2.2),
    ("wonderful", 2.9),
    ("worst", -3.1),
    ("wow", 2.4),
];

fn valence(word: &str) -> Option<f64> {
    LEXICON
        .binary_search_by_key(&word, |&(w, _)| w)
        .ok()
        .map(|i| LEXICON[i].1)
}

/// Score `text` into [0, 1]; 0.5 is neutral, above is positive.
///
/// Pure and deterministic; text with no lexicon hits scores exactly 0.5.
pub fn score(text: &str) -> f64 {
    let tokens: Vec<String> = text
        .split_whitespace()
        .map(|t| {
            t.chars()
                .filter(|c| c.is_alphanumeric() || *c == '\'')
                .collect::<String>()
                .replace('\'', "")
                .to_lowercase()
        })
        .filter(|t| !t.is_empty())
        .collect();

    let mut sum = 0.0;
    for (i, token) in tokens.iter().enumerate() {
        let Some(mut v) = valence(token) else {
            continue;
        };
        if i > 0 && NEGATORS.contains(&tokens[i - 1].as_str()) {
            v *= NEGATION_SCALAR;
        }
        sum += v;
    }

    let compound = sum / (sum * sum + ALPHA).sqrt();
    (compound + 1.0) / 2.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lexicon_is_sorted_for_binary_search() {
        for pair in LEXICON.windows(2) {
            assert!(pair[0].0 < pair[1].0, "{} >= {}", pair[0].0, pair[1].0);
        }
    }

    #[test]
    fn neutral_text_scores_half() {
        assert_eq!(score(""), 0.5);
        assert_eq!(score("the network was operational yesterday"), 0.5);
    }

    #[test]
    fn scores_stay_in_unit_interval() {
        let texts = [
            "love love love best service",
            "worst scam fraud terrible awful disaster",
            "ok",
            "great but expensive and slow",
        ];
        for text in texts {
            let s = score(text);
            assert!((0.0..=1.0).contains(&s), "{text:?} scored {s}");
        }
    }

    #[test]
    fn positive_above_negative() {
        let positive = score("excellent coverage, great customer service!");
        let negative = score("terrible coverage, the worst customer service");
        assert!(positive > 0.5);
        assert!(negative < 0.5);
        assert!(positive > negative);
    }

    #[test]
    fn negation_flips_polarity() {
        assert!(score("good connection") > 0.5);
        assert!(score("not good connection") < 0.5);
    }

    #[test]
    fn punctuation_and_case_ignored() {
        assert_eq!(score("GREAT!!!"), score("great"));
    }

    #[test]
    fn deterministic() {
        let text = "the outage was awful but support was helpful";
        assert_eq!(score(text), score(text));
    }
}
