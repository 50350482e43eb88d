//! Source-to-target user resolution.
//!
//! A source user matches a target user when their e-mail addresses are equal
//! or, failing any e-mail match, when the target's real name equals the
//! source's full name with a trailing `" - <suffix>"` removed. E-mail matches
//! take priority over name matches; within each kind the first target in
//! directory order wins.
//!
//! # Example
//!
//! ```
//! use chatmigrate::core::identity::IdentityMap;
//! use chatmigrate::models::{SourceUser, TargetUser};
//!
//! let sources = vec![
//!     SourceUser::new("1", "ann").with_email("ann@x.com"),
//!     SourceUser::new("2", "bo").with_full_name("Bo Smith - Ops"),
//!     SourceUser::new("3", "cy"),
//! ];
//! let targets = vec![
//!     TargetUser::new("U1", "ann").with_email("ann@x.com"),
//!     TargetUser::new("U2", "bo").with_real_name("Bo Smith"),
//! ];
//!
//! let map = IdentityMap::resolve(&sources, &targets);
//! assert_eq!(map.get("1").map(|u| u.id.as_str()), Some("U1"));
//! assert_eq!(map.get("2").map(|u| u.id.as_str()), Some("U2"));
//! assert!(map.get("3").is_none());
//! assert_eq!(map.unresolved(), ["3"]);
//! ```

use std::collections::HashMap;

use tracing::debug;

use crate::models::{SourceUser, TargetUser};

/// Separator between a person's name and a team or role suffix.
const NAME_SUFFIX_SEPARATOR: &str = " - ";

/// Read-only map from source user id to the matched target user.
///
/// Users without a match are absent from the map, never mapped to a
/// placeholder; fallbacks are applied by callers.
#[derive(Debug, Clone, Default)]
pub struct IdentityMap {
    resolved: HashMap<String, TargetUser>,
    unresolved: Vec<String>,
}

impl IdentityMap {
    /// Resolves every source user against the target directory.
    ///
    /// Runs in O(n·m); directories hold hundreds of users, not millions.
    pub fn resolve(sources: &[SourceUser], targets: &[TargetUser]) -> Self {
        let mut resolved = HashMap::with_capacity(sources.len());
        let mut unresolved = Vec::new();

        for source in sources {
            match find_match(source, targets) {
                Some((target, how)) => {
                    debug!(source_id = %source.id, target_id = %target.id, how, "resolved user");
                    resolved.insert(source.id.clone(), target.clone());
                }
                None => unresolved.push(source.id.clone()),
            }
        }

        unresolved.sort();
        unresolved.dedup();

        Self {
            resolved,
            unresolved,
        }
    }

    pub fn get(&self, source_id: &str) -> Option<&TargetUser> {
        self.resolved.get(source_id)
    }

    pub fn is_resolved(&self, source_id: &str) -> bool {
        self.resolved.contains_key(source_id)
    }

    /// Ids of source users without a target match, sorted.
    pub fn unresolved(&self) -> &[String] {
        &self.unresolved
    }

    /// Number of resolved source users.
    pub fn len(&self) -> usize {
        self.resolved.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resolved.is_empty()
    }
}

fn find_match<'t>(
    source: &SourceUser,
    targets: &'t [TargetUser],
) -> Option<(&'t TargetUser, &'static str)> {
    if let Some(email) = source.email.as_deref().filter(|e| !e.is_empty()) {
        if let Some(target) = targets.iter().find(|t| t.email() == Some(email)) {
            return Some((target, "email"));
        }
    }

    let name = strip_name_suffix(&source.full_name);
    if name.is_empty() {
        return None;
    }
    targets
        .iter()
        .find(|t| t.real_name() == name)
        .map(|t| (t, "name"))
}

/// Removes a trailing `" - <suffix>"` from a display name.
///
/// Only the last separator counts, so hyphenated names keep their head.
///
/// ```
/// use chatmigrate::core::identity::strip_name_suffix;
///
/// assert_eq!(strip_name_suffix("Jane Doe - Platform"), "Jane Doe");
/// assert_eq!(strip_name_suffix("Jane Doe"), "Jane Doe");
/// assert_eq!(strip_name_suffix("Jean - Luc Picard - Ops"), "Jean - Luc Picard");
/// ```
pub fn strip_name_suffix(name: &str) -> &str {
    name.rsplit_once(NAME_SUFFIX_SEPARATOR)
        .map_or(name, |(head, _)| head)
        .trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sources() -> Vec<SourceUser> {
        vec![
            SourceUser::new("1", "a").with_email("a@x.com"),
            SourceUser::new("2", "b").with_email("b@x.com"),
        ]
    }

    #[test]
    fn test_email_match() {
        let targets = vec![TargetUser::new("U1", "a").with_email("a@x.com")];
        let map = IdentityMap::resolve(&sources(), &targets);
        assert_eq!(map.get("1").unwrap().id, "U1");
        assert!(map.get("2").is_none());
        assert_eq!(map.unresolved(), ["2"]);
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn test_name_match_strips_suffix() {
        let sources = vec![SourceUser::new("7", "jd").with_full_name("Jane Doe - Smartly")];
        let targets = vec![
            TargetUser::new("U9", "someone").with_real_name("Someone Else"),
            TargetUser::new("U7", "jane").with_real_name("Jane Doe"),
        ];
        let map = IdentityMap::resolve(&sources, &targets);
        assert_eq!(map.get("7").unwrap().id, "U7");
    }

    #[test]
    fn test_email_match_beats_earlier_name_match() {
        let sources = vec![
            SourceUser::new("1", "jd")
                .with_email("jane@x.com")
                .with_full_name("Jane Doe"),
        ];
        let targets = vec![
            TargetUser::new("UNAME", "other-jane").with_real_name("Jane Doe"),
            TargetUser::new("UMAIL", "jane").with_email("jane@x.com"),
        ];
        let map = IdentityMap::resolve(&sources, &targets);
        assert_eq!(map.get("1").unwrap().id, "UMAIL");
    }

    #[test]
    fn test_empty_fields_never_match() {
        let sources = vec![SourceUser::new("1", "nobody").with_email("")];
        let targets = vec![TargetUser::new("U1", "x").with_email("")];
        let map = IdentityMap::resolve(&sources, &targets);
        assert!(map.is_empty());
        assert_eq!(map.unresolved(), ["1"]);
    }

    #[test]
    fn test_first_match_in_scan_order_wins() {
        let sources = vec![SourceUser::new("1", "a").with_email("a@x.com")];
        let targets = vec![
            TargetUser::new("UFIRST", "a1").with_email("a@x.com"),
            TargetUser::new("USECOND", "a2").with_email("a@x.com"),
        ];
        let map = IdentityMap::resolve(&sources, &targets);
        assert_eq!(map.get("1").unwrap().id, "UFIRST");
    }

    #[test]
    fn test_partition_independent_of_order() {
        let mut srcs = sources();
        srcs.push(SourceUser::new("3", "c").with_full_name("Cee Cee - Ops"));
        let mut targets = vec![
            TargetUser::new("U1", "a").with_email("a@x.com"),
            TargetUser::new("U3", "c").with_real_name("Cee Cee"),
        ];
        let forward = IdentityMap::resolve(&srcs, &targets);

        srcs.reverse();
        targets.reverse();
        let backward = IdentityMap::resolve(&srcs, &targets);

        assert_eq!(forward.unresolved(), backward.unresolved());
        assert_eq!(forward.len(), backward.len());
    }

    #[test]
    fn test_strip_name_suffix() {
        assert_eq!(strip_name_suffix("A B - C - D"), "A B - C");
        assert_eq!(strip_name_suffix("Jean - Luc Picard - Ops"), "Jean - Luc Picard");
        assert_eq!(strip_name_suffix("Ann - "), "Ann");
        assert_eq!(strip_name_suffix("A-B"), "A-B");
        assert_eq!(strip_name_suffix(""), "");
    }
}
