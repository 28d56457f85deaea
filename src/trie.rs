//! Prefix trie over configured keyword strings.
//!
//! The trie serves two roles: the tokenizer asks it to recognize a keyword
//! at the head of a character stream, and the parsers use it as a membership
//! test to decide where a literal run ends. Shared prefixes share nodes, so
//! `>` and `>=` occupy a single path with two terminal markers.

/// A node holds one edge per distinct character plus an optional terminal
/// marker carrying the original keyword text. A marker is present exactly
/// when some added keyword's full character sequence ends at that node.
#[derive(Debug, Clone, Default)]
pub struct KeywordTrie {
    edges: Vec<(char, KeywordTrie)>,
    terminal: Option<String>,
}

impl KeywordTrie {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `keyword`, creating child edges as needed. Re-adding an
    /// already-present keyword changes nothing.
    pub fn add(&mut self, keyword: &str) {
        let mut node = self;
        for c in keyword.chars() {
            let idx = match node.edges.iter().position(|(edge, _)| *edge == c) {
                Some(idx) => idx,
                None => {
                    node.edges.push((c, KeywordTrie::new()));
                    node.edges.len() - 1
                }
            };
            node = &mut node.edges[idx].1;
        }
        node.terminal = Some(keyword.to_string());
    }

    /// Number of terminal markers in the whole trie. Inserting the same
    /// surface string for two roles leaves the count short by one, which is
    /// how parser construction detects a collision.
    pub fn count(&self) -> usize {
        let own = usize::from(self.terminal.is_some());
        own + self
            .edges
            .iter()
            .map(|(_, child)| child.count())
            .sum::<usize>()
    }

    /// Exact membership test: `text` was added as a whole keyword.
    pub fn contains(&self, text: &str) -> bool {
        let chars: Vec<char> = text.chars().collect();
        self.longest_match(&chars) == Some(text)
    }

    /// Recognizes a keyword starting at position 0 of `stream`, returning
    /// the longest added keyword that is a prefix of it. Each node holds at
    /// most one edge per character, so the descent path is unique; tracking
    /// the deepest terminal marker along it is a complete longest-prefix
    /// search with no need to revisit sibling edges.
    pub fn longest_match(&self, stream: &[char]) -> Option<&str> {
        let mut node = self;
        let mut found = node.terminal.as_deref();
        for c in stream {
            match node.edges.iter().find(|(edge, _)| edge == c) {
                Some((_, child)) => node = child,
                None => break,
            }
            if let Some(keyword) = node.terminal.as_deref() {
                found = Some(keyword);
            }
        }
        found
    }
}
