//! # Operations
//!
//! An action is a list of clauses, each pairing a [`Fact`](crate::Fact) with an
//! [`Operation`]. The operation carries an optional [`Condition`] the fact must
//! meet before the action runs, and an optional [`Effect`] describing how the
//! action changes it.
//!
//! ```
//! use goap_regress::{Condition, ConditionType, Effect, EffectType, Operation};
//!
//! // "door must be closed (0), and becomes open (1)"
//! let op = Operation::new()
//!     .with_condition(Condition::new(ConditionType::Equals, 0))
//!     .with_effect(Effect::new(EffectType::Set, 1));
//!
//! assert!(op.condition.unwrap().is_consistent(0));
//! assert!(op.effect.unwrap().is_consistent(1));
//! ```

use std::fmt;

use crate::PVal;

/// What a condition requires of a fact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConditionType {
    IsSet,
    IsUnset,
    Equals,
    NotEqual,
    Less,
    Greater,
    LessEqual,
    GreaterEqual,
}

/// How an effect changes a fact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EffectType {
    Set,
    Unset,
    Increment,
    Decrement,
}

/// A requirement on a fact's value before an action is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Condition {
    pub kind: ConditionType,
    /// Comparison target
    pub value: PVal,
    /// When set, the target is read from this slot of the parameter binding
    pub param: Option<usize>,
}

impl Condition {
    pub fn new(kind: ConditionType, value: PVal) -> Self {
        Self {
            kind,
            value,
            param: None,
        }
    }

    /// A condition whose target comes from parameter slot `index`.
    pub fn from_param(kind: ConditionType, index: usize) -> Self {
        Self {
            kind,
            value: 0,
            param: Some(index),
        }
    }

    /// Resolves the parameter-bound target, if any.
    pub fn bind(&self, params: &[PVal]) -> Self {
        match self.param.and_then(|index| params.get(index)) {
            Some(value) => Self {
                value: *value,
                ..*self
            },
            None => *self,
        }
    }

    /// Is a present fact holding `value` consistent with this condition?
    pub fn is_consistent(&self, value: PVal) -> bool {
        match self.kind {
            ConditionType::IsSet => true,
            // A mapping exists, and it is not supposed to.
            ConditionType::IsUnset => false,
            ConditionType::Equals => value == self.value,
            ConditionType::NotEqual => value != self.value,
            ConditionType::Less => value < self.value,
            ConditionType::Greater => value > self.value,
            ConditionType::LessEqual => value <= self.value,
            ConditionType::GreaterEqual => value >= self.value,
        }
    }
}

/// A change to a fact's value made by an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Effect {
    pub kind: EffectType,
    /// Value written by `Set`/`Unset`, or the base an `Increment`/`Decrement`
    /// starts from
    pub value: PVal,
    /// When set, the value is read from this slot of the parameter binding
    pub param: Option<usize>,
}

impl Effect {
    pub fn new(kind: EffectType, value: PVal) -> Self {
        Self {
            kind,
            value,
            param: None,
        }
    }

    /// An effect whose value comes from parameter slot `index`.
    pub fn from_param(kind: EffectType, index: usize) -> Self {
        Self {
            kind,
            value: 0,
            param: Some(index),
        }
    }

    pub fn bind(&self, params: &[PVal]) -> Self {
        match self.param.and_then(|index| params.get(index)) {
            Some(value) => Self {
                value: *value,
                ..*self
            },
            None => *self,
        }
    }

    /// Could a fact now holding `value` be the result of this effect?
    pub fn is_consistent(&self, value: PVal) -> bool {
        match self.kind {
            EffectType::Set => value == self.value,
            // The fact is clearly set, so it cannot have been unset.
            EffectType::Unset => false,
            EffectType::Increment => value == self.value.wrapping_add(1),
            EffectType::Decrement => value == self.value.wrapping_sub(1),
        }
    }

    /// The value a fact holds after this effect, given its prior value.
    ///
    /// Returns `None` when the effect removes the fact.
    pub fn forward(&self, current: Option<PVal>) -> Option<PVal> {
        match self.kind {
            EffectType::Set => Some(self.value),
            EffectType::Unset => None,
            EffectType::Increment => Some(current.unwrap_or(self.value).wrapping_add(1)),
            EffectType::Decrement => Some(current.unwrap_or(self.value).wrapping_sub(1)),
        }
    }

    /// The value a fact held before this effect, given its current value.
    ///
    /// Returns `None` when the fact must have been absent.
    pub fn reverse(&self, current: Option<PVal>) -> Option<PVal> {
        match self.kind {
            EffectType::Set => None,
            EffectType::Unset => Some(self.value),
            EffectType::Increment => Some(current.map_or(self.value, |v| v.wrapping_sub(1))),
            EffectType::Decrement => Some(current.map_or(self.value, |v| v.wrapping_add(1))),
        }
    }
}

/// One clause of an action: an optional condition and an optional effect.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Operation {
    pub condition: Option<Condition>,
    pub effect: Option<Effect>,
}

impl Operation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_condition(mut self, condition: Condition) -> Self {
        self.condition = Some(condition);
        self
    }

    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effect = Some(effect);
        self
    }

    /// Resolves every parameter-bound value against `params`.
    pub fn bind(&self, params: &[PVal]) -> Self {
        if params.is_empty() {
            return *self;
        }
        Self {
            condition: self.condition.map(|c| c.bind(params)),
            effect: self.effect.map(|e| e.bind(params)),
        }
    }

    /// Iterates over the parameter slots the condition and effect read from.
    pub fn param_indices(&self) -> impl Iterator<Item = usize> {
        self.condition
            .and_then(|c| c.param)
            .into_iter()
            .chain(self.effect.and_then(|e| e.param))
    }
}

impl fmt::Display for ConditionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            ConditionType::IsSet => "is set",
            ConditionType::IsUnset => "is unset",
            ConditionType::Equals => "==",
            ConditionType::NotEqual => "!=",
            ConditionType::Less => "<",
            ConditionType::Greater => ">",
            ConditionType::LessEqual => "<=",
            ConditionType::GreaterEqual => ">=",
        };
        f.write_str(symbol)
    }
}

impl fmt::Display for EffectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EffectType::Set => "set",
            EffectType::Unset => "unset",
            EffectType::Increment => "increment",
            EffectType::Decrement => "decrement",
        };
        f.write_str(name)
    }
}
