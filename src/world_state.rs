//! World state representation for backward GOAP planning.
//!
//! This module provides the [`WorldState`] structure, which is the foundation for:
//! - Representing the start, goal and constant facts handed to the planner
//! - Testing whether an action applies to a state (forward or backward)
//! - Deriving the state an action must have been applied to (reverse application)
//! - Scoring how far a state is from the start state
//!
//! A world state maps [`Fact`]s to [`PVal`]s. A fact that is absent is
//! unknown, which is different from being present with any value.
//!
//! # Example
//!
//! ```
//! use goap_regress::{BasicAction, Condition, ConditionType, Effect, EffectType, Fact,
//!     MatchPolicy, Operation, WorldState};
//!
//! let at = Fact::new("at");
//! let drive = BasicAction::new("drive", 1.0).unwrap().clause(
//!     at.clone(),
//!     Operation::new()
//!         .with_condition(Condition::new(ConditionType::Equals, 0))
//!         .with_effect(Effect::new(EffectType::Set, 1)),
//! );
//!
//! let mut goal = WorldState::new();
//! goal.set(at.clone(), 1);
//!
//! // Could `drive` have produced the goal? Then what came before it?
//! assert!(goal.post_match(&drive, &[], MatchPolicy::Lenient));
//! let mut before = goal.clone();
//! before.apply_reverse(&drive, &[]);
//! assert_eq!(before.get(&at), Some(0));
//!
//! // Forward again and we are back at the goal.
//! assert!(before.pre_match(&drive, &[]));
//! before.apply_forward(&drive, &[]);
//! assert_eq!(before.get(&at), Some(1));
//! ```

use std::cmp::Ordering;
use std::collections::btree_map;
use std::collections::BTreeMap;
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::{Action, ConditionType, EffectType, Fact, Heuristic, MatchPolicy, PVal};

/// An ordered mapping from facts to values with a cached digest.
///
/// Iteration follows the natural order of [`Fact`], never insertion order.
#[derive(Clone, Debug, Default)]
pub struct WorldState {
    facts: BTreeMap<Fact, PVal>,
    digest: u64,
}

impl WorldState {
    /// Creates a new empty WorldState.
    ///
    /// ```
    /// use goap_regress::WorldState;
    ///
    /// let world_state = WorldState::new();
    /// assert!(world_state.is_empty());
    /// assert_eq!(world_state.digest(), 0);
    /// ```
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `fact` to `value`, replacing any previous value.
    pub fn set(&mut self, fact: Fact, value: PVal) {
        self.facts.insert(fact, value);
        self.update_digest();
    }

    /// Removes `fact` entirely.
    pub fn unset(&mut self, fact: &Fact) {
        self.facts.remove(fact);
        self.update_digest();
    }

    pub fn get(&self, fact: &Fact) -> Option<PVal> {
        self.facts.get(fact).copied()
    }

    pub fn contains(&self, fact: &Fact) -> bool {
        self.facts.contains_key(fact)
    }

    pub fn len(&self) -> usize {
        self.facts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.facts.is_empty()
    }

    /// Iterates over facts in their natural order.
    pub fn iter(&self) -> btree_map::Iter<'_, Fact, PVal> {
        self.facts.iter()
    }

    /// The cached content digest.
    ///
    /// Equal states always share a digest; different states may collide, so
    /// the digest is only ever a fast reject in front of structural equality.
    pub fn digest(&self) -> u64 {
        self.digest
    }

    /// Returns a copy of this state with every fact from `defaults` that this
    /// state does not mention added to it.
    pub fn with_defaults(&self, defaults: &WorldState) -> WorldState {
        let mut merged = self.clone();
        for (fact, value) in defaults.iter() {
            merged.facts.entry(fact.clone()).or_insert(*value);
        }
        merged.update_digest();
        merged
    }

    /// Forward applicability: can `action` run in this state with `params`?
    ///
    /// Every clause with a condition must hold. A fact the state does not
    /// mention only satisfies an `IsUnset` condition.
    pub fn pre_match(&self, action: &dyn Action, params: &[PVal]) -> bool {
        if !action.check_special_conditions(params) {
            return false;
        }
        for (fact, op) in action.operations() {
            let Some(condition) = op.condition else {
                continue;
            };
            let condition = condition.bind(params);
            let holds = match self.get(&fact.bind(params)) {
                Some(value) => condition.is_consistent(value),
                None => condition.kind == ConditionType::IsUnset,
            };
            if !holds {
                return false;
            }
        }
        true
    }

    /// Backward applicability: could `action` with `params` have produced
    /// this state?
    ///
    /// Clauses with an effect are tested against the effect, condition-only
    /// clauses against the condition. See [`MatchPolicy`] for how absent
    /// facts are treated. At least one clause must agree with the state.
    pub fn post_match(&self, action: &dyn Action, params: &[PVal], policy: MatchPolicy) -> bool {
        if !action.check_special_conditions(params) {
            return false;
        }
        let mut consistencies = 0usize;
        for (fact, op) in action.operations() {
            let op = op.bind(params);
            let current = self.get(&fact.bind(params));
            let verdict = match (op.effect, op.condition) {
                (Some(effect), _) => match (current, policy) {
                    (Some(value), _) => Some(effect.is_consistent(value)),
                    (None, MatchPolicy::Strict) => Some(effect.kind == EffectType::Unset),
                    (None, MatchPolicy::Lenient) => None,
                },
                (None, Some(condition)) => current.map(|value| condition.is_consistent(value)),
                (None, None) => None,
            };
            match verdict {
                Some(true) => consistencies += 1,
                Some(false) => return false,
                None => {}
            }
        }
        consistencies > 0
    }

    /// Applies the effects of `action` to this state. Conditions are not
    /// checked; call [`pre_match`](Self::pre_match) first.
    pub fn apply_forward(&mut self, action: &dyn Action, params: &[PVal]) {
        for (fact, op) in action.operations() {
            let Some(effect) = op.effect else {
                continue;
            };
            let fact = fact.bind(params);
            let next = effect.bind(params).forward(self.get(&fact));
            self.write(fact, next);
        }
        self.update_digest();
    }

    /// Turns this state into one that `action` with `params` would have
    /// turned into the current state.
    ///
    /// Effect-only clauses are undone. Clauses with an `IsSet`, `Equals` or
    /// `IsUnset` condition force the fact to meet that condition. A
    /// relational condition cannot pin a value: an `Increment`/`Decrement`
    /// is still stepped back, but after a `Set`/`Unset` the current value is
    /// kept so the condition is still checked against the start state.
    pub fn apply_reverse(&mut self, action: &dyn Action, params: &[PVal]) {
        for (fact, op) in action.operations() {
            let fact = fact.bind(params);
            let op = op.bind(params);
            let previous = match (op.condition.map(|c| (c.kind, c.value)), op.effect) {
                (Some((ConditionType::IsSet, _)), _) => Some(0),
                (Some((ConditionType::Equals, value)), _) => Some(value),
                (Some((ConditionType::IsUnset, _)), _) => None,
                (None, Some(effect)) => effect.reverse(self.get(&fact)),
                (Some(_), Some(effect))
                    if matches!(effect.kind, EffectType::Increment | EffectType::Decrement) =>
                {
                    effect.reverse(self.get(&fact))
                }
                _ => continue,
            };
            self.write(fact, previous);
        }
        self.update_digest();
    }

    /// Counts facts present in both states with different values.
    ///
    /// The planner treats 0 as "this state is the start state": facts only
    /// one side mentions never count.
    pub fn comp_start(a: &WorldState, b: &WorldState) -> usize {
        a.facts
            .iter()
            .filter(|(fact, value)| b.facts.get(*fact).map_or(false, |other| other != *value))
            .count()
    }

    /// Heuristic distance between two states.
    pub fn comp(a: &WorldState, b: &WorldState, heuristic: Heuristic) -> usize {
        match heuristic {
            Heuristic::Binary => usize::from(a != b),
            Heuristic::FactDifference => Self::fact_difference(a, b),
        }
    }

    /// Walks both key sequences in order: a fact on one side only costs 1,
    /// a shared fact with different values costs 1.
    fn fact_difference(a: &WorldState, b: &WorldState) -> usize {
        let mut left = a.facts.iter().peekable();
        let mut right = b.facts.iter().peekable();
        let mut score = 0;
        loop {
            match (left.peek().copied(), right.peek().copied()) {
                (None, None) => break,
                (Some(_), None) => {
                    score += 1;
                    left.next();
                }
                (None, Some(_)) => {
                    score += 1;
                    right.next();
                }
                (Some((lf, lv)), Some((rf, rv))) => match lf.cmp(rf) {
                    Ordering::Less => {
                        score += 1;
                        left.next();
                    }
                    Ordering::Greater => {
                        score += 1;
                        right.next();
                    }
                    Ordering::Equal => {
                        if lv != rv {
                            score += 1;
                        }
                        left.next();
                        right.next();
                    }
                },
            }
        }
        score
    }

    fn write(&mut self, fact: Fact, value: Option<PVal>) {
        match value {
            Some(value) => {
                self.facts.insert(fact, value);
            }
            None => {
                self.facts.remove(&fact);
            }
        }
    }

    fn update_digest(&mut self) {
        self.digest = self.facts.iter().fold(0u64, |digest, (fact, value)| {
            digest
                .wrapping_mul(31)
                .wrapping_add((*value as u64).wrapping_shl(name_shift(fact.name())))
        });
    }
}

/// Stable per-predicate shift amount for the digest fold.
fn name_shift(name: &str) -> u32 {
    name.bytes()
        .fold(0u32, |acc, b| acc.wrapping_mul(31).wrapping_add(u32::from(b)))
        % 64
}

impl PartialEq for WorldState {
    /// Digest first, then the full mapping.
    fn eq(&self, other: &Self) -> bool {
        self.digest == other.digest && self.facts == other.facts
    }
}

impl Eq for WorldState {}

impl Hash for WorldState {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.digest.hash(state);
    }
}

impl FromIterator<(Fact, PVal)> for WorldState {
    fn from_iter<I: IntoIterator<Item = (Fact, PVal)>>(iter: I) -> Self {
        let mut state = WorldState {
            facts: iter.into_iter().collect(),
            digest: 0,
        };
        state.update_digest();
        state
    }
}

impl fmt::Display for WorldState {
    /// Displays the WorldState as `{fact -> value, ...}` in fact order.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        let mut first = true;
        for (fact, value) in &self.facts {
            if !first {
                write!(f, ", ")?;
            }
            write!(f, "{} -> {}", fact, value)?;
            first = false;
        }
        write!(f, "}}")
    }
}
