use indexmap::IndexSet;
use serde::Serialize;

/// The permission token that grants access to everything.
pub const UNIVERSAL: &str = "*";

/// An ordered set of permission tokens held by an [Identity].
///
/// Tokens are opaque, case-sensitive strings and are never normalized: no
/// trimming, no case folding. The literal token `*` grants everything. Any
/// other token containing a `*` acts as a pattern when matched against a
/// requirement; see [PermissionSet::grants] for the exact semantics.
///
/// Insertion order is preserved (it shows through wherever the set is
/// serialized), while equality ignores order. Duplicate tokens collapse.
///
/// [Identity]: crate::Identity
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PermissionSet(IndexSet<String>);

impl PermissionSet {
    /// An empty permission set, which grants nothing but an empty
    /// requirement.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse the comma-separated token list used by stored credential
    /// records.
    ///
    /// Splitting is verbatim: tokens are not trimmed, so `"read, write"`
    /// holds `" write"` with its leading space. An empty input yields the
    /// empty set; interior empty fields (`"a,,b"`) are kept as the empty
    /// token, which is as opaque as any other.
    pub fn from_csv(csv: &str) -> Self {
        if csv.is_empty() {
            Self::default()
        } else {
            csv.split(',').map(String::from).collect()
        }
    }

    /// True if the exact token is held.
    pub fn contains(&self, token: &str) -> bool {
        self.0.contains(token)
    }

    /// True if no tokens are held.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of distinct tokens held.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterate the held tokens in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Decide whether this set of held tokens satisfies a requirement.
    ///
    /// The decision procedure, in order:
    ///
    /// 1. An empty requirement is trivially satisfied.
    /// 2. Holding the literal `*` satisfies anything.
    /// 3. A non-empty exact intersection between held and required tokens
    ///    satisfies.
    /// 4. Each held token containing a `*` (other than the literal `*`) is
    ///    treated as a pattern: the text before its **first** `*` is a
    ///    literal prefix, the first `*` matches any sequence of characters,
    ///    and everything after it is a literal suffix, _including any further
    ///    `*` characters_. If any required token matches such a pattern in
    ///    full, the requirement is satisfied.
    ///
    /// Step 4 substitutes only the first `*`: held `"a*b*c"` matches
    /// `"aZZb*c"` (the second `*` is literal) and does not match `"axbyc"`.
    #[must_use]
    pub fn grants<T: AsRef<str>>(&self, required: &[T]) -> bool {
        if required.is_empty() {
            return true;
        }

        if self.0.contains(UNIVERSAL) {
            return true;
        }

        if required.iter().any(|token| self.0.contains(token.as_ref())) {
            return true;
        }

        self.0
            .iter()
            .filter(|held| held.contains('*') && held.as_str() != UNIVERSAL)
            .any(|pattern| {
                required
                    .iter()
                    .any(|token| matches_pattern(pattern, token.as_ref()))
            })
    }
}

impl FromIterator<String> for PermissionSet {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> FromIterator<&'a str> for PermissionSet {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        iter.into_iter().map(String::from).collect()
    }
}

/// Whole-string match of `candidate` against `pattern`, where only the first
/// `*` in `pattern` is a wildcard and the rest of the pattern is literal.
///
/// Equivalent to the anchored expression `^prefix.*suffix$` with a literal
/// suffix. The length check keeps the prefix and suffix from overlapping on
/// short candidates (pattern `"ab*ba"` must not match `"aba"`).
fn matches_pattern(pattern: &str, candidate: &str) -> bool {
    match pattern.split_once('*') {
        Some((prefix, suffix)) => {
            candidate.len() >= prefix.len() + suffix.len()
                && candidate.starts_with(prefix)
                && candidate.ends_with(suffix)
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn held(tokens: &[&str]) -> PermissionSet {
        tokens.iter().copied().collect()
    }

    #[test]
    fn it_grants_everything_to_the_universal_wildcard() {
        let permissions = held(&["*"]);

        assert!(permissions.grants(&["read"]));
        assert!(permissions.grants(&["anything", "at", "all"]));
        assert!(permissions.grants::<&str>(&[]));
    }

    #[test]
    fn it_grants_on_exact_intersection() {
        let permissions = held(&["read", "write"]);

        assert!(permissions.grants(&["write"]));
        assert!(permissions.grants(&["admin", "read"]));
    }

    #[test]
    fn it_denies_disjoint_sets() {
        let permissions = held(&["read", "write"]);

        assert!(!permissions.grants(&["admin"]));
    }

    #[test]
    fn it_treats_an_empty_requirement_as_satisfied() {
        assert!(held(&[]).grants::<&str>(&[]));
        assert!(held(&["read"]).grants::<&str>(&[]));
    }

    #[test]
    fn it_denies_everything_to_an_empty_set() {
        let permissions = PermissionSet::new();

        assert!(!permissions.grants(&["read"]));
        assert!(!permissions.grants(&[""]));
    }

    #[test]
    fn it_matches_prefix_patterns() {
        let permissions = held(&["dist-*"]);

        assert!(permissions.grants(&["dist-eu"]));
        assert!(permissions.grants(&["dist-"]));
        assert!(!permissions.grants(&["dist"]));
        assert!(!permissions.grants(&["src-eu"]));
    }

    #[test]
    fn it_substitutes_only_the_first_wildcard() {
        let permissions = held(&["a*b*c"]);

        // The second `*` is literal text, not a second wildcard.
        assert!(!permissions.grants(&["axbyc"]));
        assert!(permissions.grants(&["aZZb*c"]));
        assert!(permissions.grants(&["ab*c"]));
    }

    #[test]
    fn it_keeps_patterns_anchored() {
        let permissions = held(&["eu-*-mirror"]);

        assert!(permissions.grants(&["eu-west-mirror"]));
        assert!(!permissions.grants(&["eu-west-mirrors"]));
        assert!(!permissions.grants(&["xeu-west-mirror"]));
    }

    #[test]
    fn it_rejects_overlapping_prefix_and_suffix() {
        let permissions = held(&["ab*ba"]);

        assert!(!permissions.grants(&["aba"]));
        assert!(permissions.grants(&["abba"]));
        assert!(permissions.grants(&["abxba"]));
    }

    #[test]
    fn it_is_case_sensitive() {
        let permissions = held(&["Read"]);

        assert!(!permissions.grants(&["read"]));
        assert!(permissions.grants(&["Read"]));
    }

    #[test]
    fn it_parses_csv_verbatim() {
        let permissions = PermissionSet::from_csv("read, write");

        assert!(permissions.contains("read"));
        assert!(permissions.contains(" write"));
        assert!(!permissions.contains("write"));
    }

    #[test]
    fn it_parses_the_empty_csv_to_the_empty_set() {
        assert!(PermissionSet::from_csv("").is_empty());
    }

    #[test]
    fn it_collapses_duplicate_tokens() {
        let permissions = PermissionSet::from_csv("read,read,write");

        assert_eq!(permissions.len(), 2);
        assert!(permissions.grants(&["write"]));
    }

    #[test]
    fn it_serializes_in_insertion_order() -> anyhow::Result<()> {
        let permissions = PermissionSet::from_csv("write,read");

        assert_eq!(
            serde_json::to_string(&permissions)?,
            r#"["write","read"]"#
        );

        Ok(())
    }
}
