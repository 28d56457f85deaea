//! Trie-driven tokenizer.
//!
//! Splits raw rule text into an ordered token sequence: configured keywords
//! (recognized through the [`KeywordTrie`]), single-character parenthesis
//! tokens, and literal runs accumulated between them. Tokenization never
//! fails; unrecognized text simply becomes literal tokens.

use crate::trie::KeywordTrie;

/// Scanner configured with the parenthesis characters and keyword set of one
/// grammar. Holds no mutable state; `tokenize` may be called concurrently.
#[derive(Debug, Clone)]
pub struct Tokenizer<'a> {
    open: char,
    close: char,
    keywords: &'a KeywordTrie,
}

impl<'a> Tokenizer<'a> {
    pub fn new(open: char, close: char, keywords: &'a KeywordTrie) -> Self {
        Self {
            open,
            close,
            keywords,
        }
    }

    /// Scans `input` left to right. Whitespace flushes the pending literal
    /// buffer without emitting a token of its own; a parenthesis flushes and
    /// emits itself; a keyword match at the current position flushes, emits
    /// the keyword and advances past it; anything else accumulates into the
    /// pending buffer. Empty input yields an empty sequence.
    #[tracing::instrument(level = "trace", skip(self))]
    pub fn tokenize(&self, input: &str) -> Vec<String> {
        let chars: Vec<char> = input.chars().collect();
        let mut tokens = Vec::new();
        let mut pending = String::new();
        let mut i = 0;

        while i < chars.len() {
            let c = chars[i];
            if c == self.open || c == self.close {
                flush(&mut tokens, &mut pending);
                tokens.push(c.to_string());
                i += 1;
            } else if c.is_whitespace() {
                flush(&mut tokens, &mut pending);
                i += 1;
            } else if let Some(keyword) = self.keywords.longest_match(&chars[i..]) {
                flush(&mut tokens, &mut pending);
                tokens.push(keyword.to_string());
                i += keyword.chars().count();
            } else {
                pending.push(c);
                i += 1;
            }
        }
        flush(&mut tokens, &mut pending);
        tokens
    }
}

fn flush(tokens: &mut Vec<String>, pending: &mut String) {
    if !pending.is_empty() {
        tokens.push(std::mem::take(pending));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn boolean_trie() -> KeywordTrie {
        let mut trie = KeywordTrie::new();
        for keyword in ["AND", "OR", "NOT", "(", ")"] {
            trie.add(keyword);
        }
        trie
    }

    fn tokenize(input: &str) -> Vec<String> {
        let trie = boolean_trie();
        Tokenizer::new('(', ')', &trie).tokenize(input)
    }

    #[test]
    fn splits_on_whitespace_and_keywords() {
        assert_eq!(
            tokenize("age > 30 AND department == 'ENGINEERING'"),
            vec!["age", ">", "30", "AND", "department", "==", "'ENGINEERING'"]
        );
    }

    #[test]
    fn parentheses_are_single_tokens_without_surrounding_space() {
        assert_eq!(tokenize("(a)(b)"), vec!["(", "a", ")", "(", "b", ")"]);
    }

    #[test]
    fn keywords_are_recognized_inside_literal_runs() {
        assert_eq!(tokenize("xANDy"), vec!["x", "AND", "y"]);
    }

    #[test]
    fn repeated_whitespace_emits_nothing() {
        assert_eq!(tokenize("  a   OR\tb  "), vec!["a", "OR", "b"]);
    }

    #[test]
    fn empty_input_yields_no_tokens() {
        assert_eq!(tokenize(""), Vec::<String>::new());
        assert_eq!(tokenize("   "), Vec::<String>::new());
    }

    #[test]
    fn longest_keyword_wins_over_its_prefix() {
        let mut trie = KeywordTrie::new();
        trie.add(">");
        trie.add(">=");
        trie.add("(");
        trie.add(")");
        let tokens = Tokenizer::new('(', ')', &trie).tokenize("a >= 1 > 2");
        assert_eq!(tokens, vec!["a", ">=", "1", ">", "2"]);
    }
}
