//! Glob-style exclusion patterns.
//!
//! A pattern without `/` is tested against every segment of a relative path,
//! so a bare directory name excludes that directory wherever it appears and
//! `*.log` excludes any file (or directory) whose name ends in `.log`. A
//! pattern with `/` is tested against the whole relative path and against
//! each of its trailing sub-paths. There `*` also crosses `/`, so
//! `docs/*.md` excludes `docs/a/b.md` as well.
//!
//! Supported syntax: `*`, `?`, `[abc]`, `[a-z]`, `[!abc]` / `[^abc]`. A
//! pattern that cannot be parsed (an unclosed class) never matches.

use std::path::{Component, Path};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Literal(char),
    AnyChar,
    AnySeq,
    Class { negated: bool, items: Vec<ClassItem> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum ClassItem {
    Single(char),
    Range(char, char),
}

impl ClassItem {
    fn contains(&self, c: char) -> bool {
        match *self {
            ClassItem::Single(s) => s == c,
            ClassItem::Range(lo, hi) => lo <= c && c <= hi,
        }
    }
}

/// One compiled glob.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    source: String,
    tokens: Vec<Token>,
    full_path: bool,
}

impl Pattern {
    /// Compile a pattern. Returns `None` for blank or malformed input.
    pub fn parse(raw: &str) -> Option<Self> {
        let source = raw.trim().replace('\\', "/");
        if source.is_empty() {
            return None;
        }
        let full_path = source.contains('/');
        let pattern = source.trim_matches('/');
        if pattern.is_empty() {
            return None;
        }
        let tokens = tokenize(pattern)?;
        Some(Pattern {
            source,
            tokens,
            full_path,
        })
    }

    /// The normalized pattern text.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Match the whole of `text` against this glob.
    pub fn matches_str(&self, text: &str) -> bool {
        let text: Vec<char> = text.chars().collect();
        glob_match(&self.tokens, &text)
    }

    fn matches_segments(&self, segments: &[String]) -> bool {
        if self.full_path {
            (0..segments.len()).any(|start| self.matches_str(&segments[start..].join("/")))
        } else {
            segments.iter().any(|segment| self.matches_str(segment))
        }
    }
}

fn tokenize(pattern: &str) -> Option<Vec<Token>> {
    let chars: Vec<char> = pattern.chars().collect();
    let mut tokens = Vec::with_capacity(chars.len());
    let mut i = 0;

    while i < chars.len() {
        match chars[i] {
            '*' => {
                // Collapse runs of stars.
                if tokens.last() != Some(&Token::AnySeq) {
                    tokens.push(Token::AnySeq);
                }
                i += 1;
            }
            '?' => {
                tokens.push(Token::AnyChar);
                i += 1;
            }
            '[' => {
                let (token, next) = parse_class(&chars, i + 1)?;
                tokens.push(token);
                i = next;
            }
            c => {
                tokens.push(Token::Literal(c));
                i += 1;
            }
        }
    }

    Some(tokens)
}

/// Parse a class body starting just after `[`. Returns the token and the
/// index after the closing `]`, or `None` when the class is never closed.
fn parse_class(chars: &[char], mut i: usize) -> Option<(Token, usize)> {
    let negated = matches!(chars.get(i), Some('!') | Some('^'));
    if negated {
        i += 1;
    }

    let mut items = Vec::new();
    let mut first = true;
    loop {
        let c = *chars.get(i)?;
        // A `]` right after the opening bracket is a literal member.
        if c == ']' && !first {
            return Some((Token::Class { negated, items }, i + 1));
        }
        first = false;

        match (chars.get(i + 1), chars.get(i + 2)) {
            (Some('-'), Some(&hi)) if hi != ']' => {
                items.push(ClassItem::Range(c, hi));
                i += 3;
            }
            _ => {
                items.push(ClassItem::Single(c));
                i += 1;
            }
        }
    }
}

fn token_matches_char(token: &Token, c: char) -> bool {
    match token {
        Token::Literal(l) => *l == c,
        Token::AnyChar => true,
        Token::AnySeq => true,
        Token::Class { negated, items } => items.iter().any(|item| item.contains(c)) != *negated,
    }
}

/// Iterative glob match with single-star backtracking.
fn glob_match(tokens: &[Token], text: &[char]) -> bool {
    let (mut t, mut s) = (0, 0);
    let mut backtrack: Option<(usize, usize)> = None;

    while s < text.len() {
        match tokens.get(t) {
            Some(Token::AnySeq) => {
                backtrack = Some((t, s));
                t += 1;
            }
            Some(token) if token_matches_char(token, text[s]) => {
                t += 1;
                s += 1;
            }
            _ => match backtrack {
                Some((star_t, star_s)) => {
                    t = star_t + 1;
                    s = star_s + 1;
                    backtrack = Some((star_t, star_s + 1));
                }
                None => return false,
            },
        }
    }

    tokens[t..].iter().all(|token| *token == Token::AnySeq)
}

/// An immutable set of exclusion patterns; a path is excluded if any
/// pattern matches it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatternMatcher {
    patterns: Vec<Pattern>,
}

impl PatternMatcher {
    /// Build a matcher, silently dropping blank and malformed patterns.
    pub fn new<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let patterns = patterns
            .into_iter()
            .filter_map(|raw| {
                let parsed = Pattern::parse(raw.as_ref());
                if parsed.is_none() && !raw.as_ref().trim().is_empty() {
                    tracing::warn!("Ignoring malformed pattern: {}", raw.as_ref());
                }
                parsed
            })
            .collect();
        PatternMatcher { patterns }
    }

    /// Whether there are no usable patterns.
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// The compiled patterns.
    pub fn patterns(&self) -> &[Pattern] {
        &self.patterns
    }

    /// Whether `path` (relative to the walk root) is excluded.
    pub fn matches(&self, path: &Path) -> bool {
        if self.patterns.is_empty() {
            return false;
        }
        let segments: Vec<String> = path
            .components()
            .filter_map(|component| match component {
                Component::Normal(name) => Some(name.to_string_lossy().into_owned()),
                _ => None,
            })
            .collect();
        if segments.is_empty() {
            return false;
        }
        self.patterns.iter().any(|p| p.matches_segments(&segments))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn glob(p: &str, text: &str) -> bool {
        Pattern::parse(p).unwrap().matches_str(text)
    }

    #[test]
    fn test_literal_and_wildcards() {
        assert!(glob("sub", "sub"));
        assert!(!glob("sub", "subdir"));
        assert!(glob("*.txt", "a.txt"));
        assert!(glob("*.txt", ".txt"));
        assert!(!glob("*.txt", "a.txt.sha256"));
        assert!(glob("a?c", "abc"));
        assert!(!glob("a?c", "ac"));
        assert!(glob("*", ""));
        assert!(glob("**a", "bba"));
        assert!(glob("a*b*c", "aXXbYYc"));
        assert!(!glob("a*b*c", "aXXbYY"));
    }

    #[test]
    fn test_character_classes() {
        assert!(glob("file[0-9].log", "file7.log"));
        assert!(!glob("file[0-9].log", "fileA.log"));
        assert!(glob("[!a]*", "bcd"));
        assert!(!glob("[!a]*", "abc"));
        assert!(glob("[^a]*", "xyz"));
        assert!(glob("[]x]", "]"));
        assert!(glob("[a-]", "-"));
    }

    #[test]
    fn test_malformed_and_blank_patterns_are_inert() {
        assert!(Pattern::parse("[abc").is_none());
        assert!(Pattern::parse("   ").is_none());
        assert!(Pattern::parse("/").is_none());

        let matcher = PatternMatcher::new(["[oops", "", "  "]);
        assert!(matcher.is_empty());
        assert!(!matcher.matches(Path::new("[oops")));
    }

    #[test]
    fn test_segment_matching() {
        let matcher = PatternMatcher::new(["__pycache__", "*.pyc"]);
        assert!(matcher.matches(Path::new("__pycache__")));
        assert!(matcher.matches(Path::new("pkg/__pycache__/mod.cpython.pyc")));
        assert!(matcher.matches(Path::new("pkg/mod.pyc")));
        assert!(!matcher.matches(Path::new("pkg/mod.py")));
        assert!(!matcher.matches(Path::new("")));
    }

    #[test]
    fn test_full_path_patterns() {
        let matcher = PatternMatcher::new(["sub/b.txt", "docs/*.md"]);
        assert!(matcher.matches(Path::new("sub/b.txt")));
        assert!(matcher.matches(Path::new("nested/sub/b.txt")));
        assert!(!matcher.matches(Path::new("sub/c.txt")));
        assert!(matcher.matches(Path::new("docs/readme.md")));
        assert!(!matcher.matches(Path::new("docs")));
        assert!(!matcher.matches(Path::new("b.txt")));
    }

    #[test]
    fn test_full_path_star_crosses_separators() {
        let matcher = PatternMatcher::new(["docs/*.md"]);
        assert!(matcher.matches(Path::new("docs/a/b.md")));
        assert!(matcher.matches(Path::new("site/docs/a/b/c.md")));
        assert!(!matcher.matches(Path::new("docs/a/b.txt")));

        // Segment patterns never see a separator.
        let matcher = PatternMatcher::new(["a*b"]);
        assert!(!matcher.matches(Path::new("a/b")));
    }

    #[test]
    fn test_backslash_normalization() {
        let matcher = PatternMatcher::new([r"sub\b.txt"]);
        assert_eq!(matcher.patterns()[0].as_str(), "sub/b.txt");
        assert!(matcher.matches(Path::new("sub/b.txt")));
    }

    #[test]
    fn test_pattern_order_is_irrelevant() {
        let a = PatternMatcher::new(["*.log", "target"]);
        let b = PatternMatcher::new(["target", "*.log"]);
        for path in ["x.log", "target/x", "src/main.rs", "a/target"] {
            assert_eq!(a.matches(Path::new(path)), b.matches(Path::new(path)));
        }
    }

    // Property-based tests
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// A metacharacter-free pattern matches exactly the equal segment.
        #[test]
        fn prop_literal_matches_itself(name in "[a-zA-Z0-9_.-]{1,16}", other in "[a-zA-Z0-9_.-]{1,16}") {
            let pattern = Pattern::parse(&name).unwrap();
            prop_assert!(pattern.matches_str(&name));
            prop_assert_eq!(pattern.matches_str(&other), name == other);
        }

        /// A bare name excludes that directory at any depth.
        #[test]
        fn prop_segment_anywhere(
            dir in "[a-z]{1,8}",
            prefix in prop::collection::vec("[A-Z]{1,6}", 0..4),
            file in "[A-Z]{1,8}\\.txt",
        ) {
            let matcher = PatternMatcher::new([dir.as_str()]);
            let mut path = std::path::PathBuf::new();
            for p in &prefix {
                path.push(p);
            }
            path.push(&dir);
            path.push(&file);
            prop_assert!(matcher.matches(&path));
        }

        /// Replacing characters with `?` or surrounding with `*` keeps a match.
        #[test]
        fn prop_wildcards_generalize(name in "[a-z0-9]{2,12}", idx in 0usize..12) {
            let idx = idx % name.len();
            let mut question = name.clone();
            question.replace_range(idx..idx + 1, "?");
            prop_assert!(Pattern::parse(&question).unwrap().matches_str(&name));

            let starred = format!("*{}*", &name[idx..]);
            prop_assert!(Pattern::parse(&starred).unwrap().matches_str(&name));
        }
    }
}
