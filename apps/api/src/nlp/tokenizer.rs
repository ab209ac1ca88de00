//! Splits text into word and punctuation tokens, tracking sentence starts.
//!
//! A word is a maximal run of alphanumeric characters. Every other non-space
//! character is a token of its own. `.`, `!`, `?` and line breaks open a new
//! sentence; the next word token is flagged `sentence_start`.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Word,
    Punct,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawToken<'a> {
    pub text: &'a str,
    pub kind: TokenKind,
    pub sentence_start: bool,
}

impl RawToken<'_> {
    pub fn is_word(&self) -> bool {
        self.kind == TokenKind::Word
    }
}

fn ends_sentence(c: char) -> bool {
    matches!(c, '.' | '!' | '?' | '\n')
}

pub fn tokenize(text: &str) -> Vec<RawToken<'_>> {
    let mut tokens = Vec::new();
    let mut word_start: Option<usize> = None;
    let mut pending_start = true;

    for (i, c) in text.char_indices() {
        if c.is_alphanumeric() {
            if word_start.is_none() {
                word_start = Some(i);
            }
            continue;
        }

        if let Some(s) = word_start.take() {
            tokens.push(RawToken {
                text: &text[s..i],
                kind: TokenKind::Word,
                sentence_start: pending_start,
            });
            pending_start = false;
        }

        if ends_sentence(c) {
            pending_start = true;
        }
        if !c.is_whitespace() {
            tokens.push(RawToken {
                text: &text[i..i + c.len_utf8()],
                kind: TokenKind::Punct,
                sentence_start: false,
            });
        }
    }

    if let Some(s) = word_start {
        tokens.push(RawToken {
            text: &text[s..],
            kind: TokenKind::Word,
            sentence_start: pending_start,
        });
    }

    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(text: &str) -> Vec<&str> {
        tokenize(text)
            .into_iter()
            .filter(|t| t.is_word())
            .map(|t| t.text)
            .collect()
    }

    #[test]
    fn test_splits_words_and_punctuation() {
        let tokens = tokenize("Rust, Go.");
        let texts: Vec<&str> = tokens.iter().map(|t| t.text).collect();
        assert_eq!(texts, vec!["Rust", ",", "Go", "."]);
        assert_eq!(tokens[1].kind, TokenKind::Punct);
    }

    #[test]
    fn test_hyphen_splits_compounds() {
        assert_eq!(words("full-time back-end"), vec!["full", "time", "back", "end"]);
    }

    #[test]
    fn test_sentence_start_flags() {
        let tokens: Vec<_> = tokenize("We hire. Python rocks\nRemote ok")
            .into_iter()
            .filter(|t| t.is_word())
            .collect();
        let starts: Vec<bool> = tokens.iter().map(|t| t.sentence_start).collect();
        assert_eq!(starts, vec![true, false, true, false, true, false]);
    }

    #[test]
    fn test_bullet_does_not_consume_sentence_start() {
        let tokens: Vec<_> = tokenize("\n• Build APIs").into_iter().filter(|t| t.is_word()).collect();
        assert!(tokens[0].sentence_start);
        assert!(!tokens[1].sentence_start);
    }

    #[test]
    fn test_unicode_words() {
        assert_eq!(words("café naïve"), vec!["café", "naïve"]);
    }

    #[test]
    fn test_empty_input() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("   \n\t").is_empty());
    }
}
