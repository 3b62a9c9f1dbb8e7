use crate::core::path::NESTED_TYPE_SEPARATOR;
use crate::core::{EnvminError, EnvminResult};
use std::collections::{BTreeSet, HashSet};

/// Fully-qualified, dot-separated name of one compilable unit
pub type TypeName = String;

/// The set of type names a run must keep, as returned by the resolver
pub type RequiredClosure = BTreeSet<TypeName>;

/// Ordered, duplicate-free, non-empty list of package/class prefixes to keep
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedSet {
    seeds: Vec<String>,
}

impl SeedSet {
    /// Build a seed set, dropping blanks and repeated entries (first occurrence wins).
    pub fn new<I, S>(seeds: I) -> EnvminResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = HashSet::new();
        let seeds: Vec<String> = seeds
            .into_iter()
            .map(|s| s.as_ref().trim().to_string())
            .filter(|s| !s.is_empty())
            .filter(|s| seen.insert(s.clone()))
            .collect();

        if seeds.is_empty() {
            return Err(EnvminError::Precondition(
                "At least one seed package or class is required".to_string(),
            ));
        }

        Ok(Self { seeds })
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.seeds.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.seeds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seeds.is_empty()
    }

    /// Whether `type_name` is one of the seeds or lives beneath one
    pub fn covers(&self, type_name: &str) -> bool {
        self.iter().any(|seed| seed_covers(seed, type_name))
    }

    /// Seeds for which no member of `closure` is covered
    pub fn unmatched<'a>(&'a self, closure: &'a RequiredClosure) -> Vec<&'a str> {
        self.iter()
            .filter(|seed| !closure.iter().any(|name| seed_covers(seed, name)))
            .collect()
    }
}

fn seed_covers(seed: &str, type_name: &str) -> bool {
    match type_name.strip_prefix(seed) {
        Some(rest) => {
            rest.is_empty() || rest.starts_with('.') || rest.starts_with(NESTED_TYPE_SEPARATOR)
        }
        None => false,
    }
}

/// Fold a nested type name (`a.Outer$Inner`) onto its top-level type (`a.Outer`)
pub fn top_level_type(type_name: &str) -> &str {
    type_name
        .split(NESTED_TYPE_SEPARATOR)
        .next()
        .unwrap_or(type_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_set_dedups_preserving_order() {
        let seeds = SeedSet::new(["weka.core", "weka.filters", "weka.core", " "]).unwrap();
        let collected: Vec<&str> = seeds.iter().collect();
        assert_eq!(collected, vec!["weka.core", "weka.filters"]);
        assert_eq!(seeds.len(), 2);
    }

    #[test]
    fn test_seed_set_rejects_empty() {
        let result = SeedSet::new(Vec::<String>::new());
        assert!(matches!(result, Err(EnvminError::Precondition(_))));
        assert!(SeedSet::new(["", "  "]).is_err());
    }

    #[test]
    fn test_covers_respects_segment_boundaries() {
        let seeds = SeedSet::new(["weka.core"]).unwrap();
        assert!(seeds.covers("weka.core"));
        assert!(seeds.covers("weka.core.Instances"));
        assert!(seeds.covers("weka.core$Inner"));
        assert!(!seeds.covers("weka.coreutils.Thing"));
        assert!(!seeds.covers("weka.filters.Filter"));
    }

    #[test]
    fn test_unmatched_seeds() {
        let seeds = SeedSet::new(["pkg.a", "pkg.missing"]).unwrap();
        let closure: RequiredClosure = ["pkg.a".to_string()].into_iter().collect();
        assert_eq!(seeds.unmatched(&closure), vec!["pkg.missing"]);
    }

    #[test]
    fn test_top_level_type() {
        assert_eq!(top_level_type("a.B$C$D"), "a.B");
        assert_eq!(top_level_type("a.B"), "a.B");
    }
}
