//! Union validation
//!
//! Candidates are probed in declared order against private violation
//! buffers. The first candidate with no violations satisfies the
//! union. When all fail, a unique closest candidate surfaces its own
//! violations; a tie collapses to one violation naming the whole
//! union.

use serde_yaml::Value;

use crate::types::RuleType;
use crate::violations::Violation;

use super::context::ValidationContext;
use super::dispatch;

/// Validate data against each candidate of a union
pub(super) fn validate_union(
    key: &str,
    parent: &str,
    value: &Value,
    union_type: &RuleType,
    members: &[RuleType],
    context: &mut ValidationContext<'_>,
) {
    let mut best: Option<Vec<Violation>> = None;
    let mut tied = false;

    for member in members {
        let probe = context.capture(|inner| {
            dispatch::validate_present(key, parent, value, member, inner);
        });

        if probe.is_empty() {
            return;
        }

        match &best {
            None => best = Some(probe),
            Some(current) if probe.len() < current.len() => {
                best = Some(probe);
                tied = false;
            }
            Some(current) if probe.len() == current.len() => tied = true,
            Some(_) => {}
        }
    }

    match best {
        Some(violations) if !tied => {
            for violation in violations {
                context.push(violation);
            }
        }
        _ => context.push(Violation::type_mismatch(key, parent, union_type)),
    }
}
