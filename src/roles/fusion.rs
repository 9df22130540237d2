//! Role-signal fusion.
//!
//! Signals below the confidence floor are discarded. The remaining
//! top-confidence role wins; when at least one other signal agrees on the
//! same role, the verdict earns a fixed corroboration bonus, capped at 1.0.
//! Disagreeing signals add nothing. No qualifying signal at all leaves the
//! node Unclassified at confidence 0.

use super::{Role, RoleSignal};
use crate::config::Calibration;

/// Fuse independent signals into one confidence-weighted verdict.
pub fn fuse(signals: &[RoleSignal], cal: &Calibration) -> (Role, f64) {
    let qualifying: Vec<&RoleSignal> = signals
        .iter()
        .filter(|s| s.confidence >= cal.confidence_floor)
        .collect();

    let top = match qualifying
        .iter()
        .copied()
        .max_by(|a, b| {
            a.confidence
                .partial_cmp(&b.confidence)
                .unwrap_or(std::cmp::Ordering::Equal)
        }) {
        Some(top) => top,
        None => return (Role::Unclassified, 0.0),
    };

    let corroborated = qualifying
        .iter()
        .any(|s| s.role == top.role && !std::ptr::eq(*s, top));

    let confidence = if corroborated {
        (top.confidence + cal.corroboration_bonus).min(1.0)
    } else {
        top.confidence
    };

    (top.role, confidence)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cal() -> Calibration {
        Calibration::default()
    }

    fn signal(role: Role, confidence: f64) -> RoleSignal {
        RoleSignal {
            role,
            confidence,
            source: "test",
        }
    }

    #[test]
    fn test_corroboration_adds_bonus() {
        let signals = vec![signal(Role::Adapter, 0.80), signal(Role::Adapter, 0.70)];
        let (role, confidence) = fuse(&signals, &cal());
        assert_eq!(role, Role::Adapter);
        assert!((confidence - 0.90).abs() < 1e-9);
    }

    #[test]
    fn test_disagreement_highest_wins_without_bonus() {
        let signals = vec![signal(Role::Adapter, 0.85), signal(Role::Core, 0.70)];
        let (role, confidence) = fuse(&signals, &cal());
        assert_eq!(role, Role::Adapter);
        assert!((confidence - 0.85).abs() < 1e-9);
    }

    #[test]
    fn test_all_below_floor_is_unclassified() {
        let signals = vec![signal(Role::Adapter, 0.29), signal(Role::Core, 0.10)];
        let (role, confidence) = fuse(&signals, &cal());
        assert_eq!(role, Role::Unclassified);
        assert_eq!(confidence, 0.0);
    }

    #[test]
    fn test_no_signals_is_unclassified() {
        let (role, confidence) = fuse(&[], &cal());
        assert_eq!(role, Role::Unclassified);
        assert_eq!(confidence, 0.0);
    }

    #[test]
    fn test_bonus_caps_at_one() {
        let signals = vec![
            signal(Role::EntryPoint, 0.95),
            signal(Role::EntryPoint, 0.80),
        ];
        let (_, confidence) = fuse(&signals, &cal());
        assert_eq!(confidence, 1.0);
    }

    #[test]
    fn test_three_way_mix() {
        // Two agreeing signals beat a lone higher one only through the
        // winner's own confidence; the bonus applies to the top role.
        let signals = vec![
            signal(Role::Adapter, 0.75),
            signal(Role::Adapter, 0.70),
            signal(Role::Core, 0.65),
        ];
        let (role, confidence) = fuse(&signals, &cal());
        assert_eq!(role, Role::Adapter);
        assert!((confidence - 0.85).abs() < 1e-9);
    }
}
