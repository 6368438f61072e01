//! # Facts
//!
//! A [`Fact`] names one predicate instance, such as `at(3)` or `holding(?0)`.
//! Arguments are either concrete [`PVal`]s or placeholders that point into the
//! parameter binding an action is being tried with. Binding a fact replaces its
//! placeholders with concrete values so it can be looked up in a
//! [`WorldState`](crate::WorldState).
//!
//! ```
//! use goap_regress::{Arg, Fact};
//!
//! let templated = Fact::new("at").with_param(0);
//! let bound = templated.bind(&[7]);
//!
//! assert_eq!(bound, Fact::new("at").with_value(7));
//! assert_eq!(templated.to_string(), "at(?0)");
//! assert_eq!(bound.args(), &[Arg::Value(7)]);
//! ```

use std::fmt;

/// The scalar value attached to a fact in a world state.
///
/// Parameter bindings and object pools are sequences of `PVal` too.
pub type PVal = i64;

/// One argument slot of a [`Fact`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Arg {
    /// A concrete argument value
    Value(PVal),
    /// Placeholder for slot `n` of the parameter binding
    Param(usize),
}

/// A predicate instance: a name plus an ordered list of arguments.
///
/// Equality and ordering are structural, name first, then arguments.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Fact {
    name: String,
    args: Vec<Arg>,
}

impl Fact {
    /// Creates a fact with no arguments.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            args: Vec::new(),
        }
    }

    /// Appends a concrete argument.
    pub fn with_value(mut self, value: PVal) -> Self {
        self.args.push(Arg::Value(value));
        self
    }

    /// Appends a placeholder bound to parameter slot `index`.
    pub fn with_param(mut self, index: usize) -> Self {
        self.args.push(Arg::Param(index));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn args(&self) -> &[Arg] {
        &self.args
    }

    /// Returns `true` if any argument is still a placeholder.
    pub fn is_templated(&self) -> bool {
        self.args.iter().any(|arg| matches!(arg, Arg::Param(_)))
    }

    /// Iterates over the parameter slots this fact refers to.
    pub fn param_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.args.iter().filter_map(|arg| match arg {
            Arg::Param(index) => Some(*index),
            Arg::Value(_) => None,
        })
    }

    /// Returns a copy of this fact with placeholders filled from `params`.
    ///
    /// Placeholders pointing past the end of `params` stay unbound, so an
    /// empty binding leaves the fact unchanged.
    pub fn bind(&self, params: &[PVal]) -> Fact {
        if params.is_empty() {
            return self.clone();
        }
        let args = self
            .args
            .iter()
            .map(|arg| match *arg {
                Arg::Param(index) => params.get(index).map_or(*arg, |v| Arg::Value(*v)),
                value => value,
            })
            .collect();
        Fact {
            name: self.name.clone(),
            args,
        }
    }
}

impl fmt::Display for Arg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arg::Value(value) => write!(f, "{}", value),
            Arg::Param(index) => write!(f, "?{}", index),
        }
    }
}

impl fmt::Display for Fact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if self.args.is_empty() {
            return Ok(());
        }
        write!(f, "(")?;
        for (i, arg) in self.args.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", arg)?;
        }
        write!(f, ")")
    }
}
