//! Branch protection classification
//!
//! Sorts a branch into one of two compliant protection tiers (or neither)
//! based on the `protection` block of the GitHub branch response.

use serde::{Deserialize, Serialize};

use super::constants::{BUILD_STATUS_CONTEXT, ENFORCEMENT_EVERYONE};

/// Protection settings of a single branch.
///
/// Absent fields are treated as their zero value: a branch without any
/// protection data is simply unprotected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BranchProtectionSettings {
    /// Whether protection is turned on for the branch
    #[serde(default)]
    pub enabled: bool,

    /// Who the rules apply to (`everyone`, `non_admins`, ...)
    #[serde(default)]
    pub enforcement_level: String,

    /// Names of the status checks that must pass before merging
    #[serde(default)]
    pub required_status_check_contexts: Vec<String>,
}

impl BranchProtectionSettings {
    fn enforced_for_everyone(&self) -> bool {
        self.enabled && self.enforcement_level == ENFORCEMENT_EVERYONE
    }
}

/// Protection tier a branch falls into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProtectionTier {
    /// Neither compliant tier applies
    Unprotected,
    /// Protected for everyone with no required status checks
    Protected,
    /// Protected for everyone and gated on the `build` status check
    ProtectedWithStatusCheck,
}

impl ProtectionTier {
    /// Human readable label
    pub fn label(&self) -> &'static str {
        match self {
            Self::Unprotected => "unprotected",
            Self::Protected => "protected",
            Self::ProtectedWithStatusCheck => "protected + build check",
        }
    }
}

/// Result of classifying a branch's protection settings.
///
/// The two flags are computed independently, but the rules make them
/// mutually exclusive: `protected` needs an empty context list while
/// `protected_with_status_check` needs `build` in it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProtectionClassification {
    pub protected: bool,
    pub protected_with_status_check: bool,
}

impl ProtectionClassification {
    /// Collapse the two flags into a single tier
    pub fn tier(&self) -> ProtectionTier {
        if self.protected_with_status_check {
            ProtectionTier::ProtectedWithStatusCheck
        } else if self.protected {
            ProtectionTier::Protected
        } else {
            ProtectionTier::Unprotected
        }
    }

    /// Whether either compliant tier applies
    pub fn is_compliant(&self) -> bool {
        self.protected || self.protected_with_status_check
    }
}

/// Classify the protection settings of a branch.
///
/// # Examples
///
/// ```rust
/// use repoman::rules::protection::{classify_protection, BranchProtectionSettings};
///
/// let settings = BranchProtectionSettings {
///     enabled: true,
///     enforcement_level: "everyone".to_string(),
///     required_status_check_contexts: vec!["build".to_string()],
/// };
///
/// let result = classify_protection(&settings);
/// assert!(!result.protected);
/// assert!(result.protected_with_status_check);
/// ```
pub fn classify_protection(settings: &BranchProtectionSettings) -> ProtectionClassification {
    let enforced = settings.enforced_for_everyone();
    let contexts = &settings.required_status_check_contexts;

    ProtectionClassification {
        protected: enforced && contexts.is_empty(),
        protected_with_status_check: enforced
            && contexts.iter().any(|c| c == BUILD_STATUS_CONTEXT),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(enabled: bool, level: &str, contexts: &[&str]) -> BranchProtectionSettings {
        BranchProtectionSettings {
            enabled,
            enforcement_level: level.to_string(),
            required_status_check_contexts: contexts.iter().map(|c| c.to_string()).collect(),
        }
    }

    #[test]
    fn test_protected_without_contexts() {
        let result = classify_protection(&settings(true, "everyone", &[]));
        assert!(result.protected);
        assert!(!result.protected_with_status_check);
        assert_eq!(result.tier(), ProtectionTier::Protected);
    }

    #[test]
    fn test_protected_with_build_context() {
        let result = classify_protection(&settings(true, "everyone", &["build"]));
        assert!(!result.protected);
        assert!(result.protected_with_status_check);
        assert_eq!(result.tier(), ProtectionTier::ProtectedWithStatusCheck);
    }

    #[test]
    fn test_build_among_other_contexts() {
        let result = classify_protection(&settings(true, "everyone", &["lint", "build", "docs"]));
        assert!(!result.protected);
        assert!(result.protected_with_status_check);
    }

    #[test]
    fn test_other_contexts_only() {
        let result = classify_protection(&settings(true, "everyone", &["lint"]));
        assert_eq!(result, ProtectionClassification::default());
        assert_eq!(result.tier(), ProtectionTier::Unprotected);
    }

    #[test]
    fn test_disabled_is_never_protected() {
        for contexts in [&[][..], &["build"][..]] {
            for level in ["everyone", "non_admins", ""] {
                let result = classify_protection(&settings(false, level, contexts));
                assert!(!result.protected, "level={level} contexts={contexts:?}");
                assert!(!result.protected_with_status_check);
            }
        }
    }

    #[test]
    fn test_admin_exemption_is_not_compliant() {
        for contexts in [&[][..], &["build"][..]] {
            let result = classify_protection(&settings(true, "non_admins", contexts));
            assert!(!result.is_compliant());
        }
    }

    #[test]
    fn test_enforcement_level_is_case_sensitive() {
        let result = classify_protection(&settings(true, "Everyone", &[]));
        assert!(!result.protected);
    }

    #[test]
    fn test_default_settings_are_unprotected() {
        let result = classify_protection(&BranchProtectionSettings::default());
        assert!(!result.is_compliant());
    }

    #[test]
    fn test_classification_is_idempotent() {
        let s = settings(true, "everyone", &["build"]);
        assert_eq!(classify_protection(&s), classify_protection(&s));
    }
}
