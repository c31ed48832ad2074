//! sumdb trust policy, loaded from the same environment variables the
//! upstream build tool reads: `GOSUMDB`, `GONOSUMDB`/`GONOSUMCHECK`, `GOPRIVATE`.

use globset::{Glob, GlobSet, GlobSetBuilder};

#[derive(Debug, Clone)]
pub struct SumdbConfig {
    enabled: bool,
    no_sumdb: PatternList,
    private: PatternList,
}

impl SumdbConfig {
    pub fn from_env() -> Self {
        let enabled = std::env::var("GOSUMDB").map(|v| v != "off").unwrap_or(true);

        let no_sumdb = std::env::var("GONOSUMDB")
            .or_else(|_| std::env::var("GONOSUMCHECK"))
            .unwrap_or_default();
        let private = std::env::var("GOPRIVATE").unwrap_or_default();

        Self::new(enabled, &no_sumdb, &private)
    }

    /// `true` unless the sumdb is globally off, or `module_path` matches a
    /// no-sumdb or private pattern.
    pub fn required_to_verify(&self, module_path: &str) -> bool {
        self.enabled && !self.no_sumdb.matches(module_path) && !self.private.matches(module_path)
    }

    /// Builds a config directly from resolved values, without touching the
    /// environment. Used by callers (and tests) that already have the
    /// `GOSUMDB`/`GONOSUMDB`/`GOPRIVATE` values in hand.
    pub fn new(enabled: bool, no_sumdb_csv: &str, private_csv: &str) -> Self {
        Self {
            enabled,
            no_sumdb: PatternList::parse(no_sumdb_csv),
            private: PatternList::parse(private_csv),
        }
    }
}

impl Default for SumdbConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            no_sumdb: PatternList::parse(""),
            private: PatternList::parse(""),
        }
    }
}

/// A comma-separated list of glob/prefix patterns, e.g. `GOPRIVATE`'s value.
#[derive(Debug, Clone)]
struct PatternList {
    raw: Vec<String>,
    globs: GlobSet,
}

impl PatternList {
    fn parse(csv: &str) -> Self {
        let raw: Vec<String> = csv
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();

        let mut builder = GlobSetBuilder::new();
        for pattern in &raw {
            if let Ok(glob) = Glob::new(pattern) {
                builder.add(glob);
            }
        }
        let globs = builder.build().unwrap_or_else(|_| GlobSetBuilder::new().build().unwrap());

        Self { raw, globs }
    }

    /// Matches on an exact component prefix (`module_path == pattern` or
    /// `module_path` starts with `pattern/`) as well as glob wildcards.
    fn matches(&self, module_path: &str) -> bool {
        self.raw
            .iter()
            .any(|p| module_path == p || module_path.starts_with(&format!("{p}/")))
            || self.globs.is_match(module_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enabled_by_default() {
        let cfg = SumdbConfig::default();
        assert!(cfg.required_to_verify("example.com/foo"));
    }

    #[test]
    fn exact_prefix_match_on_no_sumdb() {
        let cfg = SumdbConfig {
            enabled: true,
            no_sumdb: PatternList::parse("example.com"),
            private: PatternList::parse(""),
        };
        assert!(!cfg.required_to_verify("example.com/foo/bar"));
        assert!(cfg.required_to_verify("other.com/foo"));
    }

    #[test]
    fn private_pattern_suppresses_verification() {
        let cfg = SumdbConfig {
            enabled: true,
            no_sumdb: PatternList::parse(""),
            private: PatternList::parse("corp.internal/*"),
        };
        assert!(!cfg.required_to_verify("corp.internal/tools"));
        assert!(cfg.required_to_verify("example.com/foo"));
    }

    #[test]
    fn global_off_short_circuits_everything() {
        let cfg = SumdbConfig {
            enabled: false,
            no_sumdb: PatternList::parse(""),
            private: PatternList::parse(""),
        };
        assert!(!cfg.required_to_verify("example.com/foo"));
    }
}
