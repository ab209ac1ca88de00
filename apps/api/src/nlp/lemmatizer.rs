//! Rule-based English lemmatizer.
//!
//! Nouns: irregular plurals, then suffix stripping. Verbs: irregular forms, then
//! inflection stripping guided by the tagger's verb lexicon. Inputs are lowercase.

use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

static IRREGULAR_NOUNS: LazyLock<HashMap<&'static str, &'static str>> = LazyLock::new(|| {
    [
        ("people", "person"),
        ("children", "child"),
        ("men", "man"),
        ("women", "woman"),
        ("analyses", "analysis"),
        ("criteria", "criterion"),
        ("indices", "index"),
    ]
    .into_iter()
    .collect()
});

/// Nouns whose surface form already is the lemma despite a plural-looking ending.
static INVARIANT_NOUNS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        "analytics", "economics", "mathematics", "statistics", "logistics", "graphics",
        "robotics", "electronics", "news", "series", "kubernetes", "ios", "devops", "mlops",
        "aws", "sales", "bonus", "status", "campus", "focus", "basis", "analysis",
    ]
    .into_iter()
    .collect()
});

/// `-ies` plurals whose singular ends in `-ie`.
static IE_NOUNS: LazyLock<HashSet<&'static str>> =
    LazyLock::new(|| ["cookies", "movies", "ties", "rookies"].into_iter().collect());

static IRREGULAR_VERBS: LazyLock<HashMap<&'static str, &'static str>> = LazyLock::new(|| {
    [
        ("was", "be"),
        ("were", "be"),
        ("is", "be"),
        ("are", "be"),
        ("am", "be"),
        ("been", "be"),
        ("being", "be"),
        ("has", "have"),
        ("had", "have"),
        ("having", "have"),
        ("did", "do"),
        ("does", "do"),
        ("done", "do"),
        ("built", "build"),
        ("led", "lead"),
        ("wrote", "write"),
        ("written", "write"),
        ("made", "make"),
        ("took", "take"),
        ("grew", "grow"),
        ("ran", "run"),
        ("sought", "seek"),
        ("brought", "bring"),
        ("knew", "know"),
        ("drove", "drive"),
        ("went", "go"),
        ("got", "get"),
        ("found", "find"),
        ("kept", "keep"),
        ("understood", "understand"),
    ]
    .into_iter()
    .collect()
});

/// Singular form of a lowercase noun.
pub fn noun_lemma(word: &str) -> String {
    if let Some(lemma) = IRREGULAR_NOUNS.get(word) {
        return (*lemma).to_string();
    }
    if INVARIANT_NOUNS.contains(word) || word.chars().count() <= 3 {
        return word.to_string();
    }
    if IE_NOUNS.contains(word) {
        return word[..word.len() - 1].to_string();
    }
    if let Some(stem) = word.strip_suffix("ies") {
        if stem.chars().count() >= 2 {
            return format!("{stem}y");
        }
    }
    for suffix in ["sses", "xes", "ches", "shes", "zzes"] {
        if word.ends_with(suffix) {
            return word[..word.len() - 2].to_string();
        }
    }
    if word.ends_with("ss") || word.ends_with("us") || word.ends_with("is") {
        return word.to_string();
    }
    match word.strip_suffix('s') {
        Some(stem) => stem.to_string(),
        None => word.to_string(),
    }
}

/// Base form of a lowercase verb. `is_known` reports whether a candidate is a
/// base form in the verb lexicon; the first known candidate wins.
pub fn verb_lemma(word: &str, is_known: impl Fn(&str) -> bool) -> String {
    if let Some(lemma) = IRREGULAR_VERBS.get(word) {
        return (*lemma).to_string();
    }
    if is_known(word) {
        return word.to_string();
    }

    let candidates = inflection_candidates(word);
    candidates
        .iter()
        .find(|c| is_known(c))
        .or_else(|| candidates.first())
        .cloned()
        .unwrap_or_else(|| word.to_string())
}

fn inflection_candidates(word: &str) -> Vec<String> {
    let long_enough = |stem: &str| stem.chars().count() >= 2;

    if let Some(stem) = word.strip_suffix("ies").or_else(|| word.strip_suffix("ied")) {
        if long_enough(stem) {
            return vec![format!("{stem}y")];
        }
    }
    if let Some(stem) = word.strip_suffix("ing") {
        if long_enough(stem) {
            return vec![stem.to_string(), format!("{stem}e"), undouble(stem)];
        }
    }
    if let Some(stem) = word.strip_suffix("ed") {
        if long_enough(stem) {
            return vec![stem.to_string(), format!("{stem}e"), undouble(stem)];
        }
    }
    if let Some(stem) = word.strip_suffix("es") {
        if long_enough(stem) {
            return vec![stem.to_string(), format!("{stem}e")];
        }
    }
    if let Some(stem) = word.strip_suffix('s') {
        if long_enough(stem) && !stem.ends_with('s') {
            return vec![stem.to_string()];
        }
    }
    Vec::new()
}

/// `runn` -> `run`, `shipp` -> `ship`. Leaves `ll`/`ss`/`zz` stems alone.
fn undouble(stem: &str) -> String {
    let mut chars = stem.chars().rev();
    match (chars.next(), chars.next()) {
        (Some(a), Some(b)) if a == b && !"aeiouylsz".contains(a) => {
            stem[..stem.len() - a.len_utf8()].to_string()
        }
        _ => stem.to_string(),
    }
}
