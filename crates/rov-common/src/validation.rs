//! Route validation verdicts (RFC 6483 §2)

use crate::roa::Roa;
use crate::slurm::SlurmPrefix;
use crate::Asn;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Route validity
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ValidityState {
    /// Authorized origin for an exactly matching prefix
    Valid,
    /// Covered, but not authorized
    Invalid,
    /// No authoritative conclusion
    Unknown,
}

/// Relation between the announced prefix and the matched record
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PrefixState {
    /// Same prefix and length
    MatchRoa,
    /// Announcement is more specific than the record
    MoreSpecific,
    /// Announcement aggregates a more specific record
    CoveringAggregate,
    /// Nothing intersects the announcement
    NonIntersecting,
}

/// Relation between the announced origin and the matched record
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AsState {
    /// Same origin ASN
    Matching,
    /// Different origin ASN
    NonMatching,
}

impl AsState {
    /// Compare announced origin with a record's ASN
    #[inline]
    pub fn compare(origin: Asn, record: Option<Asn>) -> Self {
        if record == Some(origin) {
            AsState::Matching
        } else {
            AsState::NonMatching
        }
    }
}

macro_rules! screaming_display {
    ($ty:ty { $($variant:ident => $text:literal),+ $(,)? }) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                match self {
                    $(Self::$variant => f.write_str($text),)+
                }
            }
        }
    };
}

screaming_display!(ValidityState { Valid => "VALID", Invalid => "INVALID", Unknown => "UNKNOWN" });
screaming_display!(PrefixState {
    MatchRoa => "MATCH_ROA",
    MoreSpecific => "MORE_SPECIFIC",
    CoveringAggregate => "COVERING_AGGREGATE",
    NonIntersecting => "NON_INTERSECTING",
});
screaming_display!(AsState { Matching => "MATCHING", NonMatching => "NON_MATCHING" });

/// Verdict for one announcement
///
/// At most one of `matched_roa` and `matched_slurm` is set. A verdict with
/// all three state fields `None` was not evaluated: the caller asked for an
/// exact-match-only check and nothing matched exactly.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RouteValidation {
    /// Validity, `None` when not evaluated
    pub validity_state: Option<ValidityState>,
    /// Prefix relation, `None` when not evaluated
    pub prefix_state: Option<PrefixState>,
    /// Origin relation, `None` when not evaluated
    pub as_state: Option<AsState>,
    /// ROA the verdict rests on
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matched_roa: Option<Roa>,
    /// SLURM record the verdict rests on
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matched_slurm: Option<SlurmPrefix>,
    /// Whether the caller requested a full check
    pub full_check: bool,
}

impl RouteValidation {
    /// Verdict backed by a ROA
    pub fn from_roa(
        validity: ValidityState,
        prefix_state: PrefixState,
        as_state: AsState,
        roa: Roa,
        full_check: bool,
    ) -> Self {
        Self {
            validity_state: Some(validity),
            prefix_state: Some(prefix_state),
            as_state: Some(as_state),
            matched_roa: Some(roa),
            matched_slurm: None,
            full_check,
        }
    }

    /// Verdict backed by a SLURM record
    pub fn from_slurm(
        validity: ValidityState,
        prefix_state: PrefixState,
        as_state: AsState,
        slurm: SlurmPrefix,
        full_check: bool,
    ) -> Self {
        Self {
            validity_state: Some(validity),
            prefix_state: Some(prefix_state),
            as_state: Some(as_state),
            matched_roa: None,
            matched_slurm: Some(slurm),
            full_check,
        }
    }

    /// `UNKNOWN / NON_INTERSECTING` with no matched record
    pub fn non_intersecting(as_state: AsState, full_check: bool) -> Self {
        Self {
            validity_state: Some(ValidityState::Unknown),
            prefix_state: Some(PrefixState::NonIntersecting),
            as_state: Some(as_state),
            matched_roa: None,
            matched_slurm: None,
            full_check,
        }
    }

    /// Placeholder returned by an exact-match-only check that found nothing
    pub fn unevaluated() -> Self {
        Self {
            validity_state: None,
            prefix_state: None,
            as_state: None,
            matched_roa: None,
            matched_slurm: None,
            full_check: false,
        }
    }

    /// Whether any state was decided
    pub fn is_evaluated(&self) -> bool {
        self.validity_state.is_some() || self.prefix_state.is_some() || self.as_state.is_some()
    }

    /// `(validity, prefix, as)` triple, handy for assertions and reports
    pub fn states(&self) -> (Option<ValidityState>, Option<PrefixState>, Option<AsState>) {
        (self.validity_state, self.prefix_state, self.as_state)
    }
}

impl fmt::Display for RouteValidation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.is_evaluated() {
            return write!(f, "NOT_EVALUATED");
        }
        let show = |v: Option<String>| v.unwrap_or_else(|| "-".into());
        write!(
            f,
            "{} {} {}",
            show(self.validity_state.map(|s| s.to_string())),
            show(self.prefix_state.map(|s| s.to_string())),
            show(self.as_state.map(|s| s.to_string())),
        )?;
        if let Some(roa) = &self.matched_roa {
            write!(f, " ({})", roa)?;
        }
        if let Some(slurm) = &self.matched_slurm {
            write!(f, " ({})", slurm)?;
        }
        Ok(())
    }
}

/// Outcome of one resolver stage
///
/// `NoVerdict` hands the query to the next stage; it is distinct from an
/// `UNKNOWN` verdict, which ends validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Stage found nothing
    NoVerdict,
    /// Stage decided
    Verdict(RouteValidation),
}

impl Resolution {
    /// Is this a terminal verdict
    pub fn is_verdict(&self) -> bool {
        matches!(self, Resolution::Verdict(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_as_state_compare() {
        assert_eq!(AsState::compare(65001, Some(65001)), AsState::Matching);
        assert_eq!(AsState::compare(65001, Some(65002)), AsState::NonMatching);
        assert_eq!(AsState::compare(65001, None), AsState::NonMatching);
    }

    #[test]
    fn test_unevaluated() {
        let v = RouteValidation::unevaluated();
        assert!(!v.is_evaluated());
        assert!(!v.full_check);
        assert_eq!(v.states(), (None, None, None));
        assert_eq!(v.to_string(), "NOT_EVALUATED");
    }

    #[test]
    fn test_state_serialization() {
        let v = RouteValidation::non_intersecting(AsState::Matching, true);
        let json = serde_json::to_value(&v).unwrap();
        assert_eq!(json["validity_state"], "UNKNOWN");
        assert_eq!(json["prefix_state"], "NON_INTERSECTING");
        assert_eq!(json["as_state"], "MATCHING");
        assert!(json.get("matched_roa").is_none());
        assert_eq!(v.to_string(), "UNKNOWN NON_INTERSECTING MATCHING");
    }
}
