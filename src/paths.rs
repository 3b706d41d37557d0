//! Path reconciliation between caller-supplied source paths and the keys
//! found inside a parsed report. Different toolchains emit paths relative
//! to different roots (project root, compiled-output root, or
//! package-qualified root), so a single exact-match lookup would silently
//! fail most cross-tool queries.
//!
//! Matching is an ordered chain of small pure strategies, tried in a fixed
//! sequence and stopping at the first hit. The winning strategy is part of
//! the result so callers and tests can assert on precedence.

use serde::Serialize;

/// Prefixes stripped during normalization, at most one, not recursively.
const STRIP_PREFIXES: &[&str] = &["src/", "lib/", "app/", "./", "../"];

/// Ecosystem source roots stripped before the generic prefixes. These show
/// up in paths matched against package-qualified keys from hierarchical
/// XML reports.
const SOURCE_ROOTS: &[&str] = &[
    "src/main/java/",
    "src/test/java/",
    "src/main/kotlin/",
    "src/test/kotlin/",
    "src/main/scala/",
    "src/test/scala/",
];

/// Which strategy produced a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MatchStrategy {
    Exact,
    Normalized,
    Basename,
    Suffix,
}

/// A successful reconciliation: the report-internal key plus the strategy
/// that found it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resolution {
    pub key: String,
    pub strategy: MatchStrategy,
}

/// Normalize a path for strategy 2: forward slashes, then one source-root
/// strip, then at most one generic prefix strip.
fn normalize(path: &str) -> String {
    let path = path.replace('\\', "/");
    for root in SOURCE_ROOTS {
        if let Some(rest) = path.strip_prefix(root) {
            return rest.to_string();
        }
    }
    for prefix in STRIP_PREFIXES {
        if let Some(rest) = path.strip_prefix(prefix) {
            return rest.to_string();
        }
    }
    path
}

/// Final path segment, with backslashes treated as separators.
fn basename(path: &str) -> String {
    let path = path.replace('\\', "/");
    path.rsplit('/').next().unwrap_or(&path).to_string()
}

/// Last two path segments joined by `/`, or `None` for single-segment
/// paths (those are the basename strategy's job).
fn two_segment_suffix(path: &str) -> Option<String> {
    let path = path.replace('\\', "/");
    let mut segments = path.rsplit('/').filter(|s| !s.is_empty());
    let last = segments.next()?;
    let second_last = segments.next()?;
    Some(format!("{second_last}/{last}"))
}

fn match_exact(target: &str, keys: &[&str]) -> Option<String> {
    keys.iter().find(|k| **k == target).map(|k| k.to_string())
}

fn match_normalized(target: &str, keys: &[&str]) -> Option<String> {
    let normalized_target = normalize(target);
    keys.iter()
        .find(|k| normalize(k) == normalized_target)
        .map(|k| k.to_string())
}

fn match_basename(target: &str, keys: &[&str]) -> Option<String> {
    let target_base = basename(target);
    keys.iter()
        .find(|k| basename(k) == target_base)
        .map(|k| k.to_string())
}

fn match_suffix(target: &str, keys: &[&str]) -> Option<String> {
    let target_suffix = two_segment_suffix(target)?;
    keys.iter()
        .find(|k| two_segment_suffix(k).as_deref() == Some(target_suffix.as_str()))
        .map(|k| k.to_string())
}

/// Resolve `target` against the report keys, trying each strategy in
/// order and stopping at the first success. Exhausting the chain is a
/// "not found" result, never an error.
#[must_use]
pub fn resolve(target: &str, keys: &[&str]) -> Option<Resolution> {
    type Strategy = fn(&str, &[&str]) -> Option<String>;
    const STRATEGIES: &[(MatchStrategy, Strategy)] = &[
        (MatchStrategy::Exact, match_exact),
        (MatchStrategy::Normalized, match_normalized),
        (MatchStrategy::Basename, match_basename),
        (MatchStrategy::Suffix, match_suffix),
    ];

    for (strategy, matcher) in STRATEGIES {
        if let Some(key) = matcher(target, keys) {
            return Some(Resolution {
                key,
                strategy: *strategy,
            });
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_wins_first() {
        // An already-exact key resolves via strategy 1 regardless of what
        // normalization would do to it.
        let keys = ["src/app.ts", "app.ts"];
        let r = resolve("src/app.ts", &keys).unwrap();
        assert_eq!(r.key, "src/app.ts");
        assert_eq!(r.strategy, MatchStrategy::Exact);
    }

    #[test]
    fn test_normalized_strips_one_prefix() {
        let keys = ["app.ts"];
        let r = resolve("src/app.ts", &keys).unwrap();
        assert_eq!(r.key, "app.ts");
        assert_eq!(r.strategy, MatchStrategy::Normalized);

        // Stripping is not recursive: src/lib/app.ts normalizes to
        // lib/app.ts, not app.ts.
        assert!(matches!(
            resolve("src/lib/app.ts", &keys),
            Some(Resolution {
                strategy: MatchStrategy::Basename,
                ..
            })
        ));
    }

    #[test]
    fn test_normalized_backslashes() {
        let keys = ["pkg/widget.cs"];
        let r = resolve("pkg\\widget.cs", &keys).unwrap();
        assert_eq!(r.key, "pkg/widget.cs");
        assert_eq!(r.strategy, MatchStrategy::Normalized);
    }

    #[test]
    fn test_normalized_strips_source_root() {
        // Package-qualified key from a hierarchical XML report.
        let keys = ["com/example/Foo.java"];
        let r = resolve("src/main/java/com/example/Foo.java", &keys).unwrap();
        assert_eq!(r.key, "com/example/Foo.java");
        assert_eq!(r.strategy, MatchStrategy::Normalized);
    }

    #[test]
    fn test_basename_first_key_in_order_wins() {
        let keys = ["a/deep/main.rs", "b/main.rs"];
        let r = resolve("other/main.rs", &keys).unwrap();
        assert_eq!(r.key, "a/deep/main.rs");
        assert_eq!(r.strategy, MatchStrategy::Basename);
    }

    #[test]
    fn test_basename_runs_before_suffix() {
        let keys = ["x/util/helpers.py"];
        let r = resolve("proj/util/helpers.py", &keys).unwrap();
        assert_eq!(r.strategy, MatchStrategy::Basename);
    }

    #[test]
    fn test_suffix_strategy_directly() {
        assert_eq!(
            match_suffix("proj/util/helpers.py", &["x/util/helpers.py"]),
            Some("x/util/helpers.py".to_string())
        );
        // Single-segment targets are the basename strategy's job.
        assert_eq!(match_suffix("helpers.py", &["x/util/helpers.py"]), None);
        assert_eq!(match_suffix("a/util/helpers.py", &["x/misc/helpers.py"]), None);
    }

    #[test]
    fn test_not_found() {
        assert_eq!(resolve("nope.rs", &["a.rs", "b/c.rs"]), None);
        assert_eq!(resolve("anything", &[]), None);
    }

    #[test]
    fn test_deterministic_over_repeated_calls() {
        let keys = ["one/two/file.go", "three/file.go"];
        let first = resolve("file.go", &keys).unwrap();
        for _ in 0..3 {
            assert_eq!(resolve("file.go", &keys).unwrap(), first);
        }
    }
}
