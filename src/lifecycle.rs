// 🔀 Version Lifecycle Rules - Pure decisions over externally-held state
//
// The store applies what these functions compute; nothing here mutates or
// persists. The contract with the store is "given the current sibling set,
// here is the exact set of versions to deactivate" so it can apply the plan
// as a single atomic write.

use crate::effective_range::EffectiveRange;
use crate::entities::CardVersion;
use serde::{Deserialize, Serialize};

// ============================================================================
// LIFECYCLE ERROR
// ============================================================================

/// Hard invariant violation. Activation and deactivation never produce one
/// today (overlap is a warning, not an error); only illegal state-machine
/// edges do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LifecycleError {
    IllegalTransition { from: VersionState, to: VersionState },
}

impl std::fmt::Display for LifecycleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LifecycleError::IllegalTransition { from, to } => {
                write!(f, "illegal version transition: {} -> {}", from, to)
            }
        }
    }
}

impl std::error::Error for LifecycleError {}

// ============================================================================
// VERSION STATE
// ============================================================================

/// Per-version state machine. `Draft` is implicit at creation and is left
/// the moment the version is stored as either active or inactive; nothing
/// ever returns to it. There is no terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VersionState {
    Draft,
    Active,
    Inactive,
}

impl VersionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            VersionState::Draft => "draft",
            VersionState::Active => "active",
            VersionState::Inactive => "inactive",
        }
    }

    /// Legal edges: Draft -> Active|Inactive (caller choice at creation),
    /// Inactive -> Active, Active -> Inactive. Repeating the current state
    /// is a no-op, not an error.
    pub fn transition(self, to: VersionState) -> Result<VersionState, LifecycleError> {
        match (self, to) {
            (VersionState::Draft, VersionState::Active)
            | (VersionState::Draft, VersionState::Inactive)
            | (VersionState::Inactive, VersionState::Active)
            | (VersionState::Active, VersionState::Inactive) => Ok(to),

            (VersionState::Active, VersionState::Active)
            | (VersionState::Inactive, VersionState::Inactive) => Ok(to),

            (from, to) => Err(LifecycleError::IllegalTransition { from, to }),
        }
    }
}

impl std::fmt::Display for VersionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// ACTIVATION / DEACTIVATION PLANS
// ============================================================================

/// What the store must do to make one version active: flip the target on
/// and every listed sibling off, in one write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivationPlan {
    pub target_id: String,
    /// Ids of every *other* sibling currently active. "Deactivate others"
    /// is the only supported policy - two simultaneously active versions of
    /// the same card are never allowed.
    pub to_deactivate: Vec<String>,
}

/// Outcome of a deactivation request. Deactivating an already-inactive
/// version is a no-op (`changed == false`), never an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeactivationPlan {
    pub target_id: String,
    pub changed: bool,
}

/// Compute the activation plan for `target_id` among its siblings.
/// Always succeeds today; the error arm is reserved for future hard
/// invariants.
pub fn plan_activation(
    target_id: &str,
    siblings: &[CardVersion],
) -> Result<ActivationPlan, LifecycleError> {
    let to_deactivate = siblings
        .iter()
        .filter(|v| v.is_active && v.id != target_id)
        .map(|v| v.id.clone())
        .collect();

    Ok(ActivationPlan {
        target_id: target_id.to_string(),
        to_deactivate,
    })
}

pub fn plan_deactivation(target: &CardVersion) -> DeactivationPlan {
    DeactivationPlan {
        target_id: target.id.clone(),
        changed: target.is_active,
    }
}

// ============================================================================
// OVERLAP WARNINGS
// ============================================================================

/// A sibling whose effective range overlaps a proposed one. Overlap is
/// permitted (versions may have historically overlapping terms) but is
/// surfaced so the operator can be warned. Never a rejection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverlapWarning {
    pub version_id: String,
    pub range: EffectiveRange,
}

impl std::fmt::Display for OverlapWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "overlaps version {} ({})", self.version_id, self.range)
    }
}

/// One warning per sibling whose range overlaps the proposed range.
pub fn overlap_warnings(
    proposed: &EffectiveRange,
    siblings: &[CardVersion],
) -> Vec<OverlapWarning> {
    siblings
        .iter()
        .filter(|v| proposed.overlaps(&v.effective_range()))
        .map(|v| OverlapWarning {
            version_id: v.id.clone(),
            range: v.effective_range(),
        })
        .collect()
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn version(id: &str, from: &str, to: &str, is_active: bool) -> CardVersion {
        let mut v = CardVersion::new(EffectiveRange::parse(from, to).unwrap(), is_active);
        v.id = id.to_string();
        v
    }

    #[test]
    fn test_activation_deactivates_the_other_active() {
        let siblings = vec![
            version("a", "2023-01-01", "2023-12-31", true),
            version("b", "2024-01-01", "", false),
        ];

        let plan = plan_activation("b", &siblings).unwrap();
        assert_eq!(plan.target_id, "b");
        assert_eq!(plan.to_deactivate, vec!["a".to_string()]);
    }

    #[test]
    fn test_activation_with_no_active_siblings() {
        let siblings = vec![
            version("a", "2023-01-01", "2023-12-31", false),
            version("b", "2024-01-01", "", false),
        ];

        let plan = plan_activation("b", &siblings).unwrap();
        assert!(plan.to_deactivate.is_empty());
    }

    #[test]
    fn test_activating_the_already_active_version() {
        // target may appear in the sibling slice; it never deactivates itself
        let siblings = vec![version("a", "2024-01-01", "", true)];
        let plan = plan_activation("a", &siblings).unwrap();
        assert!(plan.to_deactivate.is_empty());
    }

    #[test]
    fn test_activation_sweeps_every_stray_active() {
        // store drift left two actives; the plan repairs both
        let siblings = vec![
            version("a", "2022-01-01", "2022-12-31", true),
            version("b", "2023-01-01", "2023-12-31", true),
            version("c", "2024-01-01", "", false),
        ];

        let plan = plan_activation("c", &siblings).unwrap();
        assert_eq!(plan.to_deactivate, vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn test_deactivation_is_idempotent() {
        let active = version("a", "2024-01-01", "", true);
        let inactive = version("b", "2023-01-01", "2023-12-31", false);

        assert!(plan_deactivation(&active).changed);
        assert!(!plan_deactivation(&inactive).changed);
    }

    #[test]
    fn test_overlap_warnings_are_non_fatal() {
        let siblings = vec![
            version("a", "2023-01-01", "2023-12-31", false),
            version("b", "2024-01-01", "", true),
        ];

        let proposed = EffectiveRange::parse("2023-06-01", "2024-03-31").unwrap();
        let warnings = overlap_warnings(&proposed, &siblings);
        assert_eq!(warnings.len(), 2);
        assert_eq!(warnings[0].version_id, "a");
        assert_eq!(warnings[1].version_id, "b");
    }

    #[test]
    fn test_overlap_warnings_empty_when_disjoint() {
        let siblings = vec![version("a", "2023-01-01", "2023-12-31", false)];
        let proposed = EffectiveRange::parse("2024-01-01", "").unwrap();
        assert!(overlap_warnings(&proposed, &siblings).is_empty());
    }

    #[test]
    fn test_state_machine_legal_edges() {
        use VersionState::*;
        assert_eq!(Draft.transition(Active).unwrap(), Active);
        assert_eq!(Draft.transition(Inactive).unwrap(), Inactive);
        assert_eq!(Inactive.transition(Active).unwrap(), Active);
        assert_eq!(Active.transition(Inactive).unwrap(), Inactive);
    }

    #[test]
    fn test_state_machine_self_transitions_are_noops() {
        use VersionState::*;
        assert_eq!(Active.transition(Active).unwrap(), Active);
        assert_eq!(Inactive.transition(Inactive).unwrap(), Inactive);
    }

    #[test]
    fn test_state_machine_nothing_returns_to_draft() {
        use VersionState::*;
        assert!(Active.transition(Draft).is_err());
        assert!(Inactive.transition(Draft).is_err());
        assert!(Draft.transition(Draft).is_err());

        let err = Active.transition(Draft).unwrap_err();
        assert_eq!(err.to_string(), "illegal version transition: active -> draft");
    }
}
