//! Lexicon + suffix-rule part-of-speech tagger.
//!
//! Tuned for job-posting and resume prose: closed-class words come from fixed
//! lists, verbs from a lexicon of base forms (inflections resolved through the
//! lemmatizer), adjectives from a lexicon plus derivational suffixes. Capitalized
//! words that do not open a sentence, and all-caps acronyms, are proper nouns.
//! Anything left over is a noun.

use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

use crate::nlp::lemmatizer::verb_lemma;
use crate::nlp::tokenizer::RawToken;
use crate::nlp::Pos;

static CLOSED_CLASS: LazyLock<HashMap<&'static str, Pos>> = LazyLock::new(|| {
    let mut map = HashMap::new();
    let groups: [(Pos, &[&str]); 7] = [
        (
            Pos::Det,
            &["a", "an", "the", "this", "these", "those", "every", "each", "any", "some", "no", "all"],
        ),
        (
            Pos::Pron,
            &[
                "i", "me", "my", "we", "us", "our", "you", "your", "he", "him", "his", "she", "her",
                "it", "its", "they", "them", "their", "who", "which", "what",
            ],
        ),
        (
            Pos::Adp,
            &[
                "of", "in", "on", "at", "by", "for", "with", "about", "from", "into", "over",
                "through", "across", "between", "within", "without", "during", "via", "per",
                "including",
            ],
        ),
        (Pos::Cconj, &["and", "or", "but", "nor"]),
        (
            Pos::Sconj,
            &["if", "because", "while", "although", "whether", "that", "so", "than", "where", "when"],
        ),
        (
            Pos::Aux,
            &[
                "be", "is", "are", "was", "were", "am", "been", "being", "have", "has", "had", "do",
                "does", "did", "will", "would", "should", "can", "could", "may", "might", "must",
            ],
        ),
        (Pos::Part, &["to", "not"]),
    ];
    for (pos, words) in groups {
        for w in words {
            map.insert(*w, pos);
        }
    }
    map
});

static ADVERBS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        "very", "also", "well", "often", "always", "never", "just", "only", "still", "already",
        "too", "even", "here", "there", "now", "then", "together", "however", "how", "why", "more",
        "most", "less",
    ]
    .into_iter()
    .collect()
});

static ADJECTIVES: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        "senior", "junior", "new", "good", "great", "strong", "excellent", "remote", "hybrid",
        "large", "small", "high", "fast", "solid", "deep", "key", "modern", "complex", "current",
        "many", "other", "open", "able", "global", "relevant", "proficient", "familiar",
        "competitive", "agile", "robust", "clean", "passionate", "independent", "efficient",
        "fluent", "daily", "friendly", "legacy", "secure", "full", "main", "similar", "cross",
        "native", "innovative",
    ]
    .into_iter()
    .collect()
});

/// Suffix matches that are nevertheless nouns.
static SUFFIX_NOUNS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        "proposal", "approval", "individual", "portal", "terminal", "signal", "capital",
        "professional", "potential", "credential", "tutorial", "principal", "manual", "logic",
        "metric", "graphic", "objective", "initiative", "executive", "representative",
        "perspective", "incentive", "archive", "alternative", "variable", "deliverable", "table",
    ]
    .into_iter()
    .collect()
});

const ADJECTIVE_SUFFIXES: &[&str] = &[
    "able", "ible", "ful", "ous", "ive", "less", "ish", "ical", "ic", "al", "ary",
];

/// Base forms that are verbs whatever the context.
static VERBS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        "build", "develop", "create", "write", "maintain", "collaborate", "deliver", "ensure",
        "implement", "deploy", "improve", "require", "include", "apply", "provide", "seek",
        "join", "make", "take", "grow", "help", "manage", "optimize", "define", "identify",
        "analyze", "troubleshoot", "debug", "contribute", "communicate", "establish", "enable",
        "achieve", "enhance", "evaluate", "integrate", "automate", "migrate", "understand",
        "learn", "know", "think", "bring", "become", "want", "love", "enjoy", "thrive", "get",
        "go", "find", "keep", "hire", "own", "execute", "solve", "scale", "run", "leverage",
        "operate", "monitor",
    ]
    .into_iter()
    .collect()
});

/// Base forms that are verbs only in a verbal context (imperative, after a pronoun,
/// auxiliary or `to`); otherwise nouns.
static CONTEXT_VERBS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        "work", "design", "lead", "support", "drive", "plan", "test", "review", "code", "offer",
        "use", "need", "change", "report", "document", "model", "process", "release", "focus",
        "mentor", "partner", "track", "train", "launch", "handle", "value", "start",
    ]
    .into_iter()
    .collect()
});

pub fn is_verb_base(word: &str) -> bool {
    VERBS.contains(word) || CONTEXT_VERBS.contains(word)
}

/// Lemma and verb class for a lowercase word, if it is an inflection of a known verb.
fn verb_class(lower: &str) -> Option<VerbClass> {
    let base = verb_lemma(lower, is_verb_base);
    let inflected = base != lower;
    if VERBS.contains(base.as_str()) {
        Some(VerbClass { always: true, inflected })
    } else if CONTEXT_VERBS.contains(base.as_str()) {
        Some(VerbClass { always: false, inflected })
    } else {
        None
    }
}

struct VerbClass {
    always: bool,
    inflected: bool,
}

fn is_all_caps(word: &str) -> bool {
    word.chars().count() >= 2
        && word.chars().any(char::is_alphabetic)
        && word.chars().all(|c| !c.is_lowercase())
}

fn is_capitalized(word: &str) -> bool {
    word.chars().next().is_some_and(char::is_uppercase)
}

fn has_adjective_suffix(lower: &str) -> bool {
    lower.chars().count() >= 6
        && !SUFFIX_NOUNS.contains(lower)
        && ADJECTIVE_SUFFIXES.iter().any(|s| lower.ends_with(s))
}

/// Tags every token. Output is index-aligned with `tokens`.
pub fn tag(tokens: &[RawToken<'_>]) -> Vec<Pos> {
    let mut tags = Vec::with_capacity(tokens.len());
    // Tag of the previous word token within the current sentence.
    let mut prev: Option<Pos> = None;

    for token in tokens {
        if !token.is_word() {
            let pos = if "$%+#&@*=<>^~|/\\€£".contains(token.text) {
                Pos::Sym
            } else {
                Pos::Punct
            };
            tags.push(pos);
            continue;
        }
        if token.sentence_start {
            prev = None;
        }

        let pos = tag_word(token, prev);
        tags.push(pos);
        prev = Some(pos);
    }

    tags
}

fn tag_word(token: &RawToken<'_>, prev: Option<Pos>) -> Pos {
    let text = token.text;
    let lower = text.to_lowercase();

    if !text.chars().any(char::is_alphabetic) {
        return Pos::Num;
    }
    if is_all_caps(text) {
        return Pos::Propn;
    }
    if let Some(&pos) = CLOSED_CLASS.get(lower.as_str()) {
        return pos;
    }
    if lower.chars().count() == 1 {
        return if is_capitalized(text) && !token.sentence_start {
            Pos::Propn
        } else {
            Pos::Other
        };
    }
    if is_capitalized(text) && !token.sentence_start {
        return Pos::Propn;
    }
    if ADVERBS.contains(lower.as_str()) {
        return Pos::Adv;
    }
    if lower.ends_with("ly") && lower.chars().count() > 4 && !ADJECTIVES.contains(lower.as_str())
    {
        return Pos::Adv;
    }
    if ADJECTIVES.contains(lower.as_str()) {
        return Pos::Adj;
    }

    let verbal_context = token.sentence_start
        || matches!(prev, Some(Pos::Pron) | Some(Pos::Aux) | Some(Pos::Part));
    let nominal_context = matches!(
        prev,
        Some(Pos::Det) | Some(Pos::Adj) | Some(Pos::Noun) | Some(Pos::Propn)
    );

    if let Some(class) = verb_class(&lower) {
        if class.inflected && lower.ends_with("ing") && nominal_context {
            return Pos::Noun;
        }
        if class.inflected && lower.ends_with("ed") && matches!(prev, Some(Pos::Det) | Some(Pos::Adv)) {
            return Pos::Adj;
        }
        if class.always || verbal_context {
            return Pos::Verb;
        }
        if class.inflected && lower.ends_with("ed") {
            return Pos::Adj;
        }
        return Pos::Noun;
    }

    if has_adjective_suffix(&lower) {
        return Pos::Adj;
    }
    if lower.ends_with("ed") && lower.chars().count() > 4 {
        return if matches!(prev, Some(Pos::Pron) | Some(Pos::Aux)) {
            Pos::Verb
        } else {
            Pos::Adj
        };
    }
    Pos::Noun
}
