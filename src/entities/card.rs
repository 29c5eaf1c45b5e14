// 💳 Card Entity - Identity with a timeline of versions
//
// A card's identity (UUID, name, issuer) is stable; its terms live in
// time-sliced versions, each with its own effective range. The store owns
// persistence and atomicity - these types only carry the data and compute
// over it.

use crate::effective_range::{EffectiveRange, RangeEnd};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ============================================================================
// CARD VERSION
// ============================================================================

/// One time-boxed snapshot of a card's terms.
///
/// Wire shape matches the persistence collaborator: camelCase keys,
/// `effectiveFrom`/`effectiveTo` as `YYYY-MM-DD` strings, the ongoing end
/// as the `"9999-12-31"` sentinel literal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardVersion {
    /// Stable version id - never changes
    pub id: String,

    /// Optional operator-facing label (e.g. "2025 refresh")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    pub effective_from: NaiveDate,
    pub effective_to: RangeEnd,

    /// At most one version per card is active at any instant.
    /// Enforced by the store; computed by `lifecycle::plan_activation`.
    pub is_active: bool,
}

impl CardVersion {
    pub fn new(effective: EffectiveRange, is_active: bool) -> Self {
        CardVersion {
            id: uuid::Uuid::new_v4().to_string(),
            label: None,
            effective_from: effective.from,
            effective_to: effective.to,
            is_active,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// View this version's validity window as an `EffectiveRange`.
    pub fn effective_range(&self) -> EffectiveRange {
        EffectiveRange {
            from: self.effective_from,
            to: self.effective_to,
        }
    }

    /// True iff this version's terms cover the given day.
    pub fn covers(&self, date: NaiveDate) -> bool {
        self.effective_range().contains(date)
    }
}

// ============================================================================
// CARD
// ============================================================================

/// Card identity plus its version timeline.
///
/// Zero versions (freshly created identity) and zero active versions
/// (intentionally retired card) are both legitimate states.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    /// Stable identity (UUID) - never changes
    pub id: String,

    pub name: String,
    pub issuer: String,

    #[serde(default)]
    pub versions: Vec<CardVersion>,
}

impl Card {
    pub fn new(name: impl Into<String>, issuer: impl Into<String>) -> Self {
        Card {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.into(),
            issuer: issuer.into(),
            versions: Vec::new(),
        }
    }

    /// The currently active version, if any.
    pub fn active_version(&self) -> Option<&CardVersion> {
        self.versions.iter().find(|v| v.is_active)
    }

    /// The version whose range covers the given day, preferring the active one.
    pub fn version_covering(&self, date: NaiveDate) -> Option<&CardVersion> {
        self.versions
            .iter()
            .filter(|v| v.covers(date))
            .max_by_key(|v| v.is_active)
    }

    pub fn version_count(&self) -> usize {
        self.versions.len()
    }

    pub fn is_retired(&self) -> bool {
        !self.versions.is_empty() && self.active_version().is_none()
    }
}

// ============================================================================
// TESTS
// ============================================================================
