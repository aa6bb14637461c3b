//! Keyword targets and their per-target profile overrides

use std::collections::BTreeMap;

/// The set of configured keywords, each with an optional profile override.
///
/// Keywords are stored lower-cased and matched as substrings. Iteration is
/// lexicographic, so when several keywords match the same text the winner is
/// always the same one for a given set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TargetSet {
    targets: BTreeMap<String, Option<String>>,
}

impl TargetSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a keyword. An empty override means "use the default on-profile".
    ///
    /// Returns `false` if the keyword (after lower-casing) was already present,
    /// in which case the set is left unchanged.
    pub fn insert(&mut self, keyword: &str, profile: &str) -> bool {
        let keyword = keyword.to_lowercase();
        if self.targets.contains_key(&keyword) {
            return false;
        }
        let profile = (!profile.is_empty()).then(|| profile.to_string());
        self.targets.insert(keyword, profile);
        true
    }

    pub fn contains(&self, keyword: &str) -> bool {
        self.targets.contains_key(keyword)
    }

    /// The non-empty override configured for `keyword`, if any
    pub fn override_for(&self, keyword: &str) -> Option<&str> {
        self.targets.get(keyword).and_then(|p| p.as_deref())
    }

    pub fn keywords(&self) -> impl Iterator<Item = &str> {
        self.targets.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.targets
            .iter()
            .map(|(k, p)| (k.as_str(), p.as_deref()))
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// First keyword contained in `text`, compared case-insensitively
    pub fn find_in(&self, text: &str) -> Option<&str> {
        if text.is_empty() {
            return None;
        }
        let text = text.to_lowercase();
        self.keywords().find(|keyword| text.contains(keyword))
    }
}

impl<'a> FromIterator<(&'a str, &'a str)> for TargetSet {
    fn from_iter<T: IntoIterator<Item = (&'a str, &'a str)>>(iter: T) -> Self {
        let mut set = TargetSet::new();
        for (keyword, profile) in iter {
            set.insert(keyword, profile);
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keywords_are_lowercased() {
        let set: TargetSet = [("Discord", "-Profile3")].into_iter().collect();
        assert!(set.contains("discord"));
        assert_eq!(set.override_for("discord"), Some("-Profile3"));
    }

    #[test]
    fn test_empty_override_is_none() {
        let set: TargetSet = [("discord", "")].into_iter().collect();
        assert!(set.contains("discord"));
        assert_eq!(set.override_for("discord"), None);
    }

    #[test]
    fn test_duplicate_after_lowercasing_is_rejected() {
        let mut set = TargetSet::new();
        assert!(set.insert("Steam", ""));
        assert!(!set.insert("STEAM", "-Profile4"));
        assert_eq!(set.len(), 1);
        assert_eq!(set.override_for("steam"), None);
    }

    #[test]
    fn test_find_in_is_case_insensitive_substring() {
        let set: TargetSet = [("cyberpunk", ""), ("obs", "")].into_iter().collect();
        assert_eq!(set.find_in("Cyberpunk 2077 (C) 2020"), Some("cyberpunk"));
        assert_eq!(set.find_in("OBS64.EXE"), Some("obs"));
        assert_eq!(set.find_in("Notepad"), None);
        assert_eq!(set.find_in(""), None);
    }

    #[test]
    fn test_iteration_is_stable() {
        let a: TargetSet = [("zeta", ""), ("alpha", ""), ("mid", "")].into_iter().collect();
        let b: TargetSet = [("mid", ""), ("zeta", ""), ("alpha", "")].into_iter().collect();
        let ka: Vec<_> = a.keywords().collect();
        let kb: Vec<_> = b.keywords().collect();
        assert_eq!(ka, kb);
    }
}
