// SPDX-License-Identifier: MIT OR Apache-2.0

//! The decision algorithm: fetch attributes and effective permissions,
//! rank candidates by distance, and resolve ties by condition and DENY-dominance.

use oort_eval::{ConditionEvaluator, Environment, ExprEvaluator};
use oort_model::{AttributeValue, EffectivePermission, Error, PermissionKind, Resource};
use oort_store::Store;
use tracing::debug;

/// Why a [`Decision`] came out the way it did, surfaced alongside the boolean so callers
/// (and logs) can distinguish "nothing applied" from "something explicitly said no".
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReasonKind {
    ExplicitAllow,
    ExplicitDeny,
    NoPermission,
    ConditionFailed,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Decision {
    pub allowed: bool,
    pub reason: ReasonKind,
}

impl Decision {
    fn allow() -> Self {
        Self { allowed: true, reason: ReasonKind::ExplicitAllow }
    }

    fn deny(reason: ReasonKind) -> Self {
        Self { allowed: false, reason }
    }
}

/// Evaluates `CheckPermission(principal, resource, permissionName, env)` against a
/// `Store`, delegating condition evaluation to an injected [`ConditionEvaluator`].
pub struct Evaluator<'a, S, E = ExprEvaluator> {
    store: &'a S,
    condition_evaluator: E,
}

impl<'a, S> Evaluator<'a, S, ExprEvaluator>
where
    S: Store,
{
    pub fn new(store: &'a S) -> Self {
        Self { store, condition_evaluator: ExprEvaluator }
    }
}

impl<'a, S, E> Evaluator<'a, S, E>
where
    S: Store,
    E: ConditionEvaluator,
{
    pub fn with_condition_evaluator(store: &'a S, condition_evaluator: E) -> Self {
        Self { store, condition_evaluator }
    }

    pub fn check(
        &self,
        principal: &Resource,
        resource: &Resource,
        permission_name: &str,
        env: Vec<(String, AttributeValue)>,
    ) -> Result<Decision, Error> {
        let principal_record = self.store.get_resource(principal)?;
        let resource_record = self.store.get_resource(resource)?;

        let environment = Environment::new()
            .with_subject_attrs(principal_record.attributes.into_iter().map(|a| (a.name().to_string(), a.value().clone())))
            .with_object_attrs(resource_record.attributes.into_iter().map(|a| (a.name().to_string(), a.value().clone())))
            .with_env_attrs(env);

        let mut candidates = self.store.get_effective_permissions(principal, resource, permission_name)?;
        if candidates.is_empty() {
            return Ok(Decision::deny(ReasonKind::NoPermission));
        }

        // Highest score (closest to 0) first; within a score, group by tie below.
        candidates.sort_by(|a, b| b.score().cmp(&a.score()));

        let mut index = 0;
        while index < candidates.len() {
            let score = candidates[index].score();
            let tied_end = candidates[index..].iter().take_while(|c| c.score() == score).count() + index;
            let tier = &candidates[index..tied_end];

            if let Some(decision) = self.resolve_tier(tier, &environment) {
                return Ok(decision);
            }
            index = tied_end;
        }

        // Candidates existed but every one of them was eliminated by its condition,
        // distinct from the closed-world default when none were found at all.
        Ok(Decision::deny(ReasonKind::ConditionFailed))
    }

    /// Within one score tier: DENY dominates if any DENY candidate's condition holds;
    /// otherwise the first ALLOW whose condition holds wins. `None` means every candidate
    /// in this tier failed its condition, so the caller moves to the next-best score.
    fn resolve_tier(&self, tier: &[EffectivePermission], environment: &Environment) -> Option<Decision> {
        for candidate in tier {
            if candidate.kind != PermissionKind::Deny {
                continue;
            }
            if self.condition_holds(candidate, environment) {
                return Some(Decision::deny(ReasonKind::ExplicitDeny));
            }
        }
        for candidate in tier {
            if candidate.kind != PermissionKind::Allow {
                continue;
            }
            if self.condition_holds(candidate, environment) {
                return Some(Decision::allow());
            }
        }
        None
    }

    fn condition_holds(&self, candidate: &EffectivePermission, environment: &Environment) -> bool {
        match self.condition_evaluator.evaluate(&candidate.condition, environment) {
            Ok(holds) => holds,
            Err(err) => {
                debug!(condition = %candidate.condition, %err, "condition evaluation failed, degrading to false");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use oort_model::{Condition, Permission};
    use oort_store::test_utils::depth_scenario;
    use oort_store::NonCachedStore;

    use super::*;

    #[test]
    fn closer_permission_wins_over_farther_opposite_kind() {
        let mut store = NonCachedStore::new();
        let (a, b, c) = depth_scenario(&mut store);

        let evaluator = Evaluator::new(&store);
        let decision = evaluator.check(&b, &c, "read", vec![]).unwrap();
        assert!(decision.allowed);
        assert_eq!(decision.reason, ReasonKind::ExplicitAllow);

        let decision = evaluator.check(&a, &c, "read", vec![]).unwrap();
        assert!(!decision.allowed);
        assert_eq!(decision.reason, ReasonKind::ExplicitDeny);
    }

    #[test]
    fn no_permission_denies_closed_world() {
        let mut store = NonCachedStore::new();
        let a = Resource::new("a").unwrap();
        store.create_resource(&a).unwrap();

        let evaluator = Evaluator::new(&store);
        let decision = evaluator.check(&a, &a, "read", vec![]).unwrap();
        assert!(!decision.allowed);
        assert_eq!(decision.reason, ReasonKind::NoPermission);
    }

    #[test]
    fn deny_beats_allow_at_the_same_score() {
        let mut store = NonCachedStore::new();
        let a = Resource::new("a").unwrap();
        let b = Resource::new("b").unwrap();
        store.create_resource(&a).unwrap();
        store.create_resource(&b).unwrap();
        store.create_rel(oort_model::RelationKind::Composition, &a, &b).unwrap();
        store
            .create_permission(&a, &b, Permission::new("read", PermissionKind::Allow, Condition::always()).unwrap())
            .unwrap();
        store
            .create_permission(&a, &b, Permission::new("read", PermissionKind::Deny, Condition::always()).unwrap())
            .unwrap();

        let evaluator = Evaluator::new(&store);
        let decision = evaluator.check(&a, &b, "read", vec![]).unwrap();
        assert!(!decision.allowed);
        assert_eq!(decision.reason, ReasonKind::ExplicitDeny);
    }

    #[test]
    fn condition_failure_with_no_fallback_is_distinct_from_no_permission() {
        let mut store = NonCachedStore::new();
        let a = Resource::new("a").unwrap();
        let b = Resource::new("b").unwrap();
        store.create_resource(&a).unwrap();
        store.create_resource(&b).unwrap();
        store
            .create_permission(
                &a,
                &b,
                Permission::new("read", PermissionKind::Allow, Condition::new("env.region == \"eu\"")).unwrap(),
            )
            .unwrap();

        let evaluator = Evaluator::new(&store);
        let decision = evaluator
            .check(&a, &b, "read", vec![("region".to_string(), AttributeValue::String("us".into()))])
            .unwrap();
        assert!(!decision.allowed);
        assert_eq!(decision.reason, ReasonKind::ConditionFailed);
    }

    #[test]
    fn condition_failure_eliminates_the_candidate_and_falls_back() {
        let mut store = NonCachedStore::new();
        let a = Resource::new("a").unwrap();
        let b = Resource::new("b").unwrap();
        let c = Resource::new("c").unwrap();
        store.create_resource(&a).unwrap();
        store.create_resource(&b).unwrap();
        store.create_resource(&c).unwrap();
        store.create_rel(oort_model::RelationKind::Composition, &a, &b).unwrap();
        store.create_rel(oort_model::RelationKind::Composition, &b, &c).unwrap();

        // closer (B, C) candidate is conditioned on env.region == "eu" and will fail;
        // the farther (A, C) candidate is unconditional and should then apply.
        store
            .create_permission(
                &b,
                &c,
                Permission::new("read", PermissionKind::Allow, Condition::new("env.region == \"eu\"")).unwrap(),
            )
            .unwrap();
        store
            .create_permission(&a, &c, Permission::new("read", PermissionKind::Allow, Condition::always()).unwrap())
            .unwrap();

        let evaluator = Evaluator::new(&store);
        let decision = evaluator
            .check(&b, &c, "read", vec![("region".to_string(), AttributeValue::String("us".into()))])
            .unwrap();
        assert!(decision.allowed);
        assert_eq!(decision.reason, ReasonKind::ExplicitAllow);
    }
}
