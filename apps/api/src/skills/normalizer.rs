//! Normalizer — maps a cleaned skill string to its comparison key.
//!
//! Keys are never stored or shown; they exist only so the similarity judge and the
//! taxonomy matcher can compare "React.js" with "react" or "C#" with "csharp".
//!
//! Pipeline:
//! 1. lowercase, trim
//! 2. separators (`&`, `/`, `-`, `_`, `|`) become spaces (`&` becomes "and")
//! 3. ordered alias substitution
//! 4. every remaining non-alphanumeric character becomes a space, whitespace collapses
//! 5. stop words are dropped, unless that would leave only short tokens
//!
//! Steps 3–5 repeat until the key stops changing, so `normalize` is idempotent even
//! when stripping punctuation or stop words exposes a new alias ("rest.api").

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::skills::cleaner::collapse_whitespace;

/// Ordered `(alias, canonical)` table. Later rules see the output of earlier ones,
/// so `asp.net` must come before `.net`.
const ALIASES: &[(&str, &str)] = &[
    ("asp.net", "aspdotnet"),
    (".net", "dotnet"),
    ("c#", "csharp"),
    ("f#", "fsharp"),
    ("c++", "cpp"),
    ("react.js", "react"),
    ("reactjs", "react"),
    ("angular.js", "angular"),
    ("angularjs", "angular"),
    ("vue.js", "vue"),
    ("vuejs", "vue"),
    ("node.js", "node"),
    ("nodejs", "node"),
    ("express.js", "express"),
    ("postgresql", "postgres"),
    ("sql server", "sqlserver"),
    ("ms sql", "sqlserver"),
    ("mssql", "sqlserver"),
    ("k8s", "kubernetes"),
    ("ci cd", "cicd"),
    ("rest api", "api"),
    ("restful api", "api"),
    ("web api", "api"),
];

const STOP_WORDS: &[&str] = &[
    "development",
    "programming",
    "framework",
    "frameworks",
    "language",
    "languages",
    "experience",
    "knowledge",
    "skills",
    "skill",
    "using",
    "with",
    "and",
    "or",
    "of",
    "in",
    "the",
];

/// Stop words are only removed when every surviving token is at least this long.
/// "go development" keeps its context; "golang development" becomes "golang".
const MIN_STANDALONE_TOKEN_LEN: usize = 3;

/// Bound on canonical-pass repetitions. The alias table is acyclic, so a fixpoint is
/// reached long before this.
const MAX_CANONICAL_PASSES: usize = 8;

/// How literal patterns are matched against text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStrictness {
    /// Only whole-word occurrences match ("ai" never matches inside "saint").
    #[default]
    WordBoundary,
    /// Plain substring matching. Opt-in for inputs known to be clean.
    Substring,
}

impl std::str::FromStr for MatchStrictness {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "word_boundary" | "word-boundary" | "strict" => Ok(Self::WordBoundary),
            "substring" | "plain" => Ok(Self::Substring),
            other => Err(format!(
                "unknown match strictness '{other}' (expected 'word_boundary' or 'substring')"
            )),
        }
    }
}

#[derive(Debug, Clone)]
struct AliasRule {
    alias: &'static str,
    canonical: &'static str,
    /// Present only in word-boundary mode.
    pattern: Option<Regex>,
}

impl AliasRule {
    fn apply(&self, text: &str) -> String {
        match &self.pattern {
            Some(re) => re.replace_all(text, self.canonical).into_owned(),
            None => text.replace(self.alias, self.canonical),
        }
    }
}

/// Builds a boundary-anchored pattern for a literal alias. `\b` is only placed on an
/// edge that is a word character: "c#" anchors before the `c`, ".net" after the `t`.
fn boundary_pattern(alias: &str) -> Option<Regex> {
    let is_word = |c: Option<char>| c.is_some_and(|c| c.is_alphanumeric() || c == '_');
    let lead = if is_word(alias.chars().next()) { r"\b" } else { "" };
    let trail = if is_word(alias.chars().last()) { r"\b" } else { "" };
    Regex::new(&format!("{lead}{}{trail}", regex::escape(alias))).ok()
}

/// Produces normalized keys. Cheap to clone: compiled patterns are reference-counted.
#[derive(Debug, Clone)]
pub struct Normalizer {
    rules: Vec<AliasRule>,
    strictness: MatchStrictness,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new(MatchStrictness::default())
    }
}

impl Normalizer {
    pub fn new(strictness: MatchStrictness) -> Self {
        let rules = ALIASES
            .iter()
            .map(|&(alias, canonical)| AliasRule {
                alias,
                canonical,
                pattern: match strictness {
                    MatchStrictness::WordBoundary => boundary_pattern(alias),
                    MatchStrictness::Substring => None,
                },
            })
            .collect();
        Self { rules, strictness }
    }

    pub fn strictness(&self) -> MatchStrictness {
        self.strictness
    }

    /// Computes the normalized key for a raw or cleaned string.
    pub fn normalize(&self, text: &str) -> String {
        let mut key = split_separators(&text.trim().to_lowercase());

        for _ in 0..MAX_CANONICAL_PASSES {
            let next = self.canonical_pass(&key);
            if next == key {
                break;
            }
            key = next;
        }
        key
    }

    fn canonical_pass(&self, text: &str) -> String {
        let substituted = self
            .rules
            .iter()
            .fold(text.to_string(), |acc, rule| rule.apply(&acc));

        let alphanumeric: String = substituted
            .chars()
            .map(|c| if c.is_alphanumeric() { c } else { ' ' })
            .collect();

        remove_stop_words(&collapse_whitespace(&alphanumeric))
    }
}

fn split_separators(text: &str) -> String {
    let spaced = text
        .replace('&', " and ")
        .replace(['/', '-', '_', '|'], " ");
    collapse_whitespace(&spaced)
}

fn remove_stop_words(text: &str) -> String {
    let tokens: Vec<&str> = text.split_whitespace().collect();
    let kept: Vec<&str> = tokens
        .iter()
        .copied()
        .filter(|t| !STOP_WORDS.contains(t))
        .collect();

    let strip = !kept.is_empty()
        && kept
            .iter()
            .all(|t| t.chars().count() >= MIN_STANDALONE_TOKEN_LEN);

    if strip {
        kept.join(" ")
    } else {
        tokens.join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn norm(s: &str) -> String {
        Normalizer::default().normalize(s)
    }

    #[test]
    fn test_alias_table_canonicalizes_common_variants() {
        assert_eq!(norm("C#"), "csharp");
        assert_eq!(norm(".NET Core"), "dotnet core");
        assert_eq!(norm("ASP.NET MVC"), "aspdotnet mvc");
        assert_eq!(norm("C++"), "cpp");
        assert_eq!(norm("Node.js"), "node");
        assert_eq!(norm("NodeJS"), "node");
        assert_eq!(norm("React.js"), "react");
        assert_eq!(norm("PostgreSQL"), "postgres");
        assert_eq!(norm("MS SQL"), "sqlserver");
    }

    #[test]
    fn test_separators_and_punctuation() {
        assert_eq!(norm("CI/CD"), "cicd");
        assert_eq!(norm("c/c++"), "c cpp");
        assert_eq!(norm("TCP/IP"), "tcp ip");
        assert_eq!(norm("R&D"), "r and d");
        assert_eq!(norm("  Spring   Boot!! "), "spring boot");
    }

    #[test]
    fn test_stop_words_removed_when_remaining_tokens_are_long() {
        assert_eq!(norm("Python programming"), "python");
        assert_eq!(norm("Web Development & Design"), "web design");
        assert_eq!(norm("Spring Framework"), "spring");
    }

    #[test]
    fn test_short_tokens_keep_their_context() {
        assert_eq!(norm("Go development"), "go development");
        assert_eq!(norm("R programming"), "r programming");
    }

    #[test]
    fn test_all_stop_words_input_is_kept() {
        assert_eq!(norm("Development"), "development");
    }

    #[test]
    fn test_exposed_alias_is_resolved_in_one_call() {
        // punctuation stripping turns "rest.api" into "rest api", which is an alias
        assert_eq!(norm("rest.api"), "api");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let n = Normalizer::default();
        for s in [
            "C#",
            ".NET Core",
            "rest.api",
            "Go development",
            "Experience with ASP.NET & SQL Server",
            "sql development server",
            "R&D",
            "İstanbul office tooling",
            "",
        ] {
            let once = n.normalize(s);
            assert_eq!(n.normalize(&once), once, "not idempotent for '{s}'");
        }
    }

    #[test]
    fn test_word_boundary_mode_does_not_corrupt_inner_matches() {
        let n = Normalizer::new(MatchStrictness::WordBoundary);
        assert_eq!(n.normalize("abc#"), "abc");
        assert_eq!(n.normalize("k8sx"), "k8sx");
    }

    #[test]
    fn test_substring_mode_replaces_inside_words() {
        let n = Normalizer::new(MatchStrictness::Substring);
        assert_eq!(n.normalize("k8sx"), "kubernetesx");
        assert_eq!(n.strictness(), MatchStrictness::Substring);
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(norm(""), "");
        assert_eq!(norm("   "), "");
        assert_eq!(norm("#!?"), "");
    }

    #[test]
    fn test_strictness_from_str() {
        assert_eq!(
            "word_boundary".parse::<MatchStrictness>().unwrap(),
            MatchStrictness::WordBoundary
        );
        assert_eq!(
            "Substring".parse::<MatchStrictness>().unwrap(),
            MatchStrictness::Substring
        );
        assert!("fuzzy".parse::<MatchStrictness>().is_err());
    }
}
