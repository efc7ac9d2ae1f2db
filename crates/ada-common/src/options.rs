use std::collections::HashMap;

use crate::kind::Kind;

const ALL_KINDS: [Kind; 25] = [
    Kind::Package,
    Kind::PackageSpec,
    Kind::Type,
    Kind::TypeSpec,
    Kind::Subtype,
    Kind::SubtypeSpec,
    Kind::RecordComponent,
    Kind::EnumLiteral,
    Kind::Variable,
    Kind::VariableSpec,
    Kind::Formal,
    Kind::Constant,
    Kind::Exception,
    Kind::Subprogram,
    Kind::SubprogramSpec,
    Kind::Task,
    Kind::TaskSpec,
    Kind::Protected,
    Kind::ProtectedSpec,
    Kind::Entry,
    Kind::EntrySpec,
    Kind::Label,
    Kind::Identifier,
    Kind::AutomaticVariable,
    Kind::Anonymous,
];

/// Runtime options a host passes in to control what the emitter
/// produces. Per-kind enablement starts from each [`Kind`]'s documented
/// default and can be overridden individually, by letter or long name,
/// the way a ctags-style `--ada-kinds=...` flag would.
#[derive(Debug, Clone)]
pub struct TagOptions {
    enabled: HashMap<Kind, bool>,
    /// Whether file-scoped tokens (local to a body, invisible to other
    /// compilation units) are emitted at all.
    pub file_scope: bool,
    /// Whether a second, dotted-name tag is emitted alongside the plain
    /// name for kinds that support qualification.
    pub qualified_tags: bool,
}

impl Default for TagOptions {
    fn default() -> Self {
        let enabled = ALL_KINDS
            .iter()
            .map(|&k| (k, k.info().default_enabled))
            .collect();
        Self {
            enabled,
            file_scope: true,
            qualified_tags: false,
        }
    }
}

impl TagOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_enabled(&self, kind: Kind) -> bool {
        self.enabled.get(&kind).copied().unwrap_or(false)
    }

    pub fn set_enabled(&mut self, kind: Kind, enabled: bool) {
        self.enabled.insert(kind, enabled);
    }

    /// Applies a single letter from a `--kinds` style string: uppercase
    /// enables, and by ctags convention a leading `-` before a letter
    /// disables it; here callers pass the sign separately via `enabled`.
    pub fn set_by_letter(&mut self, letter: char, enabled: bool) -> bool {
        match ALL_KINDS.iter().find(|k| k.info().letter == letter) {
            Some(&kind) => {
                self.set_enabled(kind, enabled);
                true
            }
            None => false,
        }
    }

    pub fn set_by_long_name(&mut self, long_name: &str, enabled: bool) -> bool {
        match ALL_KINDS.iter().find(|k| k.info().long_name == long_name) {
            Some(&kind) => {
                self.set_enabled(kind, enabled);
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_each_kinds_documented_default() {
        let opts = TagOptions::new();
        for &k in &ALL_KINDS {
            assert_eq!(opts.is_enabled(k), k.info().default_enabled, "{k:?}");
        }
    }

    #[test]
    fn set_by_letter_overrides_default() {
        let mut opts = TagOptions::new();
        assert!(!opts.is_enabled(Kind::PackageSpec));
        assert!(opts.set_by_letter('P', true));
        assert!(opts.is_enabled(Kind::PackageSpec));
    }

    #[test]
    fn set_by_long_name_overrides_default() {
        let mut opts = TagOptions::new();
        assert!(opts.is_enabled(Kind::Variable));
        assert!(opts.set_by_long_name("variable", false));
        assert!(!opts.is_enabled(Kind::Variable));
    }

    #[test]
    fn unknown_letter_or_name_is_reported() {
        let mut opts = TagOptions::new();
        assert!(!opts.set_by_letter('Z', true));
        assert!(!opts.set_by_long_name("nonexistent", true));
    }

    #[test]
    fn unrecognized_kind_defaults_to_disabled() {
        let opts = TagOptions::new();
        assert!(!opts.is_enabled(Kind::Separate));
        assert!(!opts.is_enabled(Kind::Undefined));
    }
}
