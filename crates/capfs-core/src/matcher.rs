//! Glob pattern matching.
//!
//! The traversal engine only decides *where* to look; whether a candidate
//! string matches a pattern is delegated to a [`PatternMatcher`].

use globset::GlobBuilder;

/// Tests a candidate string against a glob pattern.
pub trait PatternMatcher: Send + Sync {
    fn is_match(&self, pattern: &str, candidate: &str) -> bool;
}

/// Default matcher backed by `globset`.
///
/// `*` and `?` never cross a `/`; `**` spans directory levels. Invalid
/// patterns match nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct GlobMatcher {
    case_insensitive: bool,
}

impl GlobMatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn case_insensitive() -> Self {
        Self {
            case_insensitive: true,
        }
    }
}

impl PatternMatcher for GlobMatcher {
    fn is_match(&self, pattern: &str, candidate: &str) -> bool {
        match GlobBuilder::new(pattern)
            .literal_separator(true)
            .case_insensitive(self.case_insensitive)
            .backslash_escape(true)
            .build()
        {
            Ok(glob) => glob.compile_matcher().is_match(candidate),
            Err(e) => {
                tracing::debug!(pattern, error = %e, "invalid glob pattern");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::literal("a.txt", "a.txt", true)]
    #[case::star("*.ts", "main.ts", true)]
    #[case::star_not_across_slash("*.ts", "src/main.ts", false)]
    #[case::question("?.rs", "a.rs", true)]
    #[case::class("[ab].md", "b.md", true)]
    #[case::class_miss("[ab].md", "c.md", false)]
    #[case::alternation("*.{js,ts}", "x.js", true)]
    #[case::globstar_zero("**/*.ts", "a.ts", true)]
    #[case::globstar_many("**/*.ts", "src/lib/b.ts", true)]
    #[case::globstar_middle("src/**/*.ts", "src/a.ts", true)]
    #[case::extension_mismatch("**/*.ts", "src/c.md", false)]
    #[case::invalid("[", "[", false)]
    fn glob_matching(#[case] pattern: &str, #[case] candidate: &str, #[case] expected: bool) {
        assert_eq!(GlobMatcher::new().is_match(pattern, candidate), expected);
    }

    #[test]
    fn case_insensitive_option() {
        assert!(!GlobMatcher::new().is_match("*.TXT", "a.txt"));
        assert!(GlobMatcher::case_insensitive().is_match("*.TXT", "a.txt"));
    }
}
