//! Independent role-evidence sources.
//!
//! Each source inspects one facet of a node — its directory name, its
//! import/composition shape, or its syntactic markers — and either offers a
//! role with a confidence or stays silent. The hint vocabularies and fixed
//! confidences are calibration data carried by the profile.

use super::{Role, RoleSignal};
use crate::config::ScoringProfile;
use crate::graph::PackageNode;

/// Naming evidence: deepest directory segment matching a hint vocabulary.
///
/// Layer aliases are applied per segment before lookup, so project-specific
/// names ("controllers") can map onto the curated vocabulary ("handler").
/// The project root and entry directories read as EntryPoint.
pub fn naming_signal(dir: &str, profile: &ScoringProfile) -> Option<RoleSignal> {
    let vocab = &profile.vocabulary;
    let confidences = &profile.calibration.signals;

    if dir == "." {
        return Some(RoleSignal {
            role: Role::EntryPoint,
            confidence: confidences.naming_entry,
            source: "naming",
        });
    }

    for segment in dir.split('/').rev() {
        let segment = segment.to_ascii_lowercase();
        let canonical = vocab
            .layer_aliases
            .get(&segment)
            .map(|alias| alias.as_str())
            .unwrap_or(segment.as_str());

        if vocab.entry_dirs.iter().any(|h| h == canonical) {
            return Some(RoleSignal {
                role: Role::EntryPoint,
                confidence: confidences.naming_entry,
                source: "naming",
            });
        }
        let role = if vocab.core_hints.iter().any(|h| h == canonical) {
            Some(Role::Core)
        } else if vocab.ports_hints.iter().any(|h| h == canonical) {
            Some(Role::Ports)
        } else if vocab.adapter_hints.iter().any(|h| h == canonical) {
            Some(Role::Adapter)
        } else if vocab.orchestrator_hints.iter().any(|h| h == canonical) {
            Some(Role::Orchestrator)
        } else {
            None
        };
        if let Some(role) = role {
            return Some(RoleSignal {
                role,
                confidence: confidences.naming,
                source: "naming",
            });
        }
    }
    None
}

/// Import/composition evidence.
///
/// A low-level I/O import reads as Adapter; interface declarations read as
/// Core, with lower confidence once the node also imports other internal
/// packages.
pub fn import_signal(node: &PackageNode, profile: &ScoringProfile) -> Option<RoleSignal> {
    let confidences = &profile.calibration.signals;

    if node.has_low_level_io {
        return Some(RoleSignal {
            role: Role::Adapter,
            confidence: confidences.adapter_io,
            source: "imports",
        });
    }
    if node.interface_count > 0 {
        let confidence = if node.imports.is_empty() {
            confidences.core_pure
        } else {
            confidences.core_mixed
        };
        return Some(RoleSignal {
            role: Role::Core,
            confidence,
            source: "imports",
        });
    }
    None
}

/// Syntactic evidence: entry points, I/O-shaped parameters, and
/// interface-heavy declaration mixes.
pub fn syntactic_signal(node: &PackageNode, profile: &ScoringProfile) -> Option<RoleSignal> {
    let confidences = &profile.calibration.signals;

    if node.has_entry_point {
        return Some(RoleSignal {
            role: Role::EntryPoint,
            confidence: confidences.entry,
            source: "syntax",
        });
    }
    if node.has_io_params {
        return Some(RoleSignal {
            role: Role::Adapter,
            confidence: confidences.adapter_param,
            source: "syntax",
        });
    }
    let total_types = node.interface_count + node.concrete_count;
    if total_types > 0 {
        let ratio = node.interface_count as f64 / total_types as f64;
        if ratio >= confidences.ports_ratio_cutoff {
            return Some(RoleSignal {
                role: Role::Ports,
                confidence: confidences.ports_ratio,
                source: "syntax",
            });
        }
    }
    None
}
