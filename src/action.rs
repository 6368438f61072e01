//! # Action Module for Goal-Oriented Action Planning (GOAP)
//!
//! The planner never looks inside an action beyond the capability traits in
//! this module:
//!
//! * [`Action`]: ordered `(Fact, Operation)` clauses, a parameter count, a cost,
//!   a special-condition check and a display form
//! * [`ActionSet`]: the pool of actions the planner may choose from, each with
//!   a preference weight that multiplies its cost
//!
//! [`BasicAction`] and [`ActionList`] are ready-made implementations. Any other
//! structure with clauses and a cost can be adapted by implementing the traits.
//!
//! ## Basic Usage
//!
//! ```
//! use goap_regress::{
//!     ActionList, BasicAction, Condition, ConditionType, Effect, EffectType, Fact,
//! };
//!
//! // drive(?0): the vehicle ?0 goes from home (0) to work (1)
//! let drive = BasicAction::new("drive", 1.0)
//!     .unwrap()
//!     .with_params(1)
//!     .condition(Fact::new("fuel").with_param(0), Condition::new(ConditionType::Greater, 0))
//!     .clause(
//!         Fact::new("at").with_param(0),
//!         goap_regress::Operation::new()
//!             .with_condition(Condition::new(ConditionType::Equals, 0))
//!             .with_effect(Effect::new(EffectType::Set, 1)),
//!     );
//! assert!(drive.validate().is_ok());
//!
//! let mut actions = ActionList::new();
//! actions.add(drive);
//! assert_eq!(actions.len(), 1);
//! ```

use std::fmt;
use std::sync::Arc;

use crate::{Condition, Effect, Fact, GoapError, Operation, PVal, Result};

/// The capabilities the planner needs from an action.
pub trait Action {
    fn name(&self) -> &str;

    /// Number of parameter slots the planner fills from the object pool.
    fn num_params(&self) -> usize;

    /// Base cost, multiplied by the preference weight from the [`ActionSet`].
    fn cost(&self) -> f32;

    /// The ordered clauses of this action.
    fn operations(&self) -> &[(Fact, Operation)];

    /// Extra veto on a candidate binding. Accepts everything by default.
    ///
    /// With an empty object pool the planner tries a single empty binding,
    /// so `params` may be shorter than [`num_params`](Self::num_params).
    fn check_special_conditions(&self, _params: &[PVal]) -> bool {
        true
    }

    /// Display form used in diagnostics, e.g. `drive(3)`.
    fn describe(&self, params: &[PVal]) -> String {
        if params.is_empty() {
            return self.name().to_string();
        }
        let args = params
            .iter()
            .map(|p| p.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        format!("{}({})", self.name(), args)
    }
}

impl<A: Action + ?Sized> Action for Box<A> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn num_params(&self) -> usize {
        (**self).num_params()
    }

    fn cost(&self) -> f32 {
        (**self).cost()
    }

    fn operations(&self) -> &[(Fact, Operation)] {
        (**self).operations()
    }

    fn check_special_conditions(&self, params: &[PVal]) -> bool {
        (**self).check_special_conditions(params)
    }

    fn describe(&self, params: &[PVal]) -> String {
        (**self).describe(params)
    }
}

/// A pool of actions with preference weights.
pub trait ActionSet {
    /// Iterates over `(action, preference)` pairs in a stable order.
    fn entries(&self) -> Box<dyn Iterator<Item = (&dyn Action, f32)> + '_>;
}

type SpecialCondition = Arc<dyn Fn(&[PVal]) -> bool + Send + Sync>;

/// A plain data action built clause by clause.
///
/// # Examples
///
/// ```
/// use goap_regress::{Action, BasicAction, Effect, EffectType, Fact};
///
/// let rest = BasicAction::new("rest", 2.0)
///     .unwrap()
///     .effect(Fact::new("energy"), Effect::new(EffectType::Increment, 0));
///
/// assert_eq!(rest.name(), "rest");
/// assert_eq!(rest.cost(), 2.0);
/// assert_eq!(rest.operations().len(), 1);
///
/// // Invalid cost (negative) will return an error
/// assert!(BasicAction::new("invalid", -1.0).is_err());
/// ```
#[derive(Clone)]
pub struct BasicAction {
    name: String,
    cost: f32,
    num_params: usize,
    clauses: Vec<(Fact, Operation)>,
    special: Option<SpecialCondition>,
}

impl BasicAction {
    /// Creates an action with no clauses and no parameters.
    ///
    /// # Errors
    ///
    /// Returns `GoapError::InvalidActionCost` if the cost is zero, negative or
    /// not finite.
    pub fn new(name: impl Into<String>, cost: f32) -> Result<Self> {
        if !cost.is_finite() || cost <= 0.0 {
            return Err(GoapError::InvalidActionCost);
        }

        Ok(Self {
            name: name.into(),
            cost,
            num_params: 0,
            clauses: Vec::new(),
            special: None,
        })
    }

    /// Declares how many parameter slots the action takes.
    pub fn with_params(mut self, num_params: usize) -> Self {
        self.num_params = num_params;
        self
    }

    /// Appends a clause.
    pub fn clause(mut self, fact: Fact, operation: Operation) -> Self {
        self.clauses.push((fact, operation));
        self
    }

    /// Appends a condition-only clause.
    pub fn condition(self, fact: Fact, condition: Condition) -> Self {
        self.clause(fact, Operation::new().with_condition(condition))
    }

    /// Appends an effect-only clause.
    pub fn effect(self, fact: Fact, effect: Effect) -> Self {
        self.clause(fact, Operation::new().with_effect(effect))
    }

    /// Installs a predicate that must accept a binding before the action is
    /// considered.
    pub fn with_special_condition<F>(mut self, check: F) -> Self
    where
        F: Fn(&[PVal]) -> bool + Send + Sync + 'static,
    {
        self.special = Some(Arc::new(check));
        self
    }

    /// Checks that every placeholder refers to a declared parameter slot.
    ///
    /// # Errors
    ///
    /// Returns `GoapError::InvalidParameterIndex` for the first out-of-range
    /// slot found.
    pub fn validate(&self) -> Result<()> {
        let indices = self
            .clauses
            .iter()
            .flat_map(|(fact, op)| fact.param_indices().chain(op.param_indices()));
        for index in indices {
            if index >= self.num_params {
                return Err(GoapError::InvalidParameterIndex {
                    action: self.name.clone(),
                    index,
                    num_params: self.num_params,
                });
            }
        }
        Ok(())
    }
}

impl Action for BasicAction {
    fn name(&self) -> &str {
        &self.name
    }

    fn num_params(&self) -> usize {
        self.num_params
    }

    fn cost(&self) -> f32 {
        self.cost
    }

    fn operations(&self) -> &[(Fact, Operation)] {
        &self.clauses
    }

    /// The installed predicate only sees complete bindings; a short one is
    /// accepted unchecked, and its placeholders stay unbound.
    fn check_special_conditions(&self, params: &[PVal]) -> bool {
        match &self.special {
            Some(check) if params.len() == self.num_params => check(params),
            _ => true,
        }
    }
}

impl fmt::Debug for BasicAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BasicAction")
            .field("name", &self.name)
            .field("cost", &self.cost)
            .field("num_params", &self.num_params)
            .field("clauses", &self.clauses)
            .field("special", &self.special.is_some())
            .finish()
    }
}

/// An owned [`ActionSet`].
#[derive(Debug, Clone)]
pub struct ActionList<A> {
    entries: Vec<(A, f32)>,
}

impl<A: Action> ActionList<A> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Adds an action with the neutral preference of 1.
    pub fn add(&mut self, action: A) {
        self.add_with_preference(action, 1.0);
    }

    /// Adds an action whose cost is scaled by `preference` during planning.
    pub fn add_with_preference(&mut self, action: A, preference: f32) {
        self.entries.push((action, preference));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<A: Action> Default for ActionList<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: Action> FromIterator<A> for ActionList<A> {
    fn from_iter<I: IntoIterator<Item = A>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().map(|a| (a, 1.0)).collect(),
        }
    }
}

impl<A: Action> ActionSet for ActionList<A> {
    fn entries(&self) -> Box<dyn Iterator<Item = (&dyn Action, f32)> + '_> {
        Box::new(
            self.entries
                .iter()
                .map(|(action, preference)| (action as &dyn Action, *preference)),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ConditionType, EffectType};

    #[test]
    fn test_create_valid_action() {
        let action = BasicAction::new("test_action", 1.0).unwrap();
        assert_eq!(action.name(), "test_action");
        assert_eq!(action.cost(), 1.0);
        assert_eq!(action.num_params(), 0);
        assert!(action.operations().is_empty());
    }

    #[test]
    fn test_create_invalid_action() {
        for cost in [0.0, -1.0, f32::NAN, f32::INFINITY] {
            let result = BasicAction::new("test_action", cost);
            assert!(matches!(result, Err(GoapError::InvalidActionCost)));
        }
    }

    #[test]
    fn test_special_conditions() {
        let action = BasicAction::new("pair", 1.0)
            .unwrap()
            .with_params(2)
            .with_special_condition(|params| params[0] != params[1]);
        assert!(action.check_special_conditions(&[1, 2]));
        assert!(!action.check_special_conditions(&[2, 2]));

        let open = BasicAction::new("open", 1.0).unwrap();
        assert!(open.check_special_conditions(&[]));
    }

    #[test]
    fn test_special_conditions_skip_incomplete_bindings() {
        let action = BasicAction::new("pair", 1.0)
            .unwrap()
            .with_params(2)
            .with_special_condition(|params| params[0] != params[1]);
        assert!(action.check_special_conditions(&[]));
        assert!(action.check_special_conditions(&[4]));
    }

    #[test]
    fn test_validate_rejects_undeclared_params() {
        let action = BasicAction::new("move", 1.0)
            .unwrap()
            .with_params(1)
            .condition(
                Fact::new("at").with_param(0),
                Condition::from_param(ConditionType::Equals, 1),
            );
        assert_eq!(
            action.validate(),
            Err(GoapError::InvalidParameterIndex {
                action: "move".to_string(),
                index: 1,
                num_params: 1,
            })
        );

        let fixed = action.with_params(2);
        assert!(fixed.validate().is_ok());
    }

    #[test]
    fn test_describe() {
        let action = BasicAction::new("give", 1.0).unwrap().with_params(2);
        assert_eq!(action.describe(&[3, 4]), "give(3, 4)");
        assert_eq!(action.describe(&[]), "give");
    }

    #[test]
    fn test_action_list_entries_keep_order_and_preference() {
        let mut list = ActionList::new();
        list.add(BasicAction::new("a", 1.0).unwrap());
        list.add_with_preference(
            BasicAction::new("b", 2.0)
                .unwrap()
                .effect(Fact::new("x"), Effect::new(EffectType::Set, 1)),
            3.0,
        );

        let seen: Vec<_> = list
            .entries()
            .map(|(action, preference)| (action.name().to_string(), preference))
            .collect();
        assert_eq!(seen, vec![("a".to_string(), 1.0), ("b".to_string(), 3.0)]);
    }

    #[test]
    fn test_boxed_actions_mix() {
        let list: ActionList<Box<dyn Action>> = vec![
            Box::new(BasicAction::new("a", 1.0).unwrap()) as Box<dyn Action>,
            Box::new(BasicAction::new("b", 1.0).unwrap().with_params(1)),
        ]
        .into_iter()
        .collect();
        let params: Vec<_> = list.entries().map(|(a, _)| a.num_params()).collect();
        assert_eq!(params, vec![0, 1]);
    }
}
