//! Planner tuning knobs.

/// How strictly `WorldState::post_match` decides that an action could have
/// produced a state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum MatchPolicy {
    /// The action is a candidate if at least one clause agrees with a fact
    /// present in the state and no present fact contradicts a clause.
    /// Facts the state does not mention are ignored. Cheap and permissive;
    /// may accept actions that do not really explain the state.
    #[default]
    Lenient,
    /// Every clause must agree with the state: effects that write a value
    /// need the fact present with that value, `Unset` effects need the fact
    /// absent, and condition-only clauses must hold wherever their fact is
    /// present.
    Strict,
}

/// Distance estimate between a candidate state and the start state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Heuristic {
    /// 0 if the states are identical, 1 otherwise.
    #[default]
    Binary,
    /// Number of facts present in only one state plus facts present in both
    /// with different values.
    FactDifference,
}

/// Configuration for a [`Planner`](crate::Planner).
///
/// # Examples
///
/// ```
/// use goap_regress::{Heuristic, MatchPolicy, PlannerConfig};
///
/// let config = PlannerConfig::default()
///     .with_match_policy(MatchPolicy::Strict)
///     .with_heuristic(Heuristic::FactDifference)
///     .with_max_expansions(10_000);
///
/// assert_eq!(config.max_expansions, Some(10_000));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlannerConfig {
    pub match_policy: MatchPolicy,
    pub heuristic: Heuristic,
    /// Hard cap on node expansions per search. `None` searches until the
    /// frontier is exhausted.
    pub max_expansions: Option<usize>,
}

impl PlannerConfig {
    pub fn with_match_policy(mut self, match_policy: MatchPolicy) -> Self {
        self.match_policy = match_policy;
        self
    }

    pub fn with_heuristic(mut self, heuristic: Heuristic) -> Self {
        self.heuristic = heuristic;
        self
    }

    pub fn with_max_expansions(mut self, max_expansions: usize) -> Self {
        self.max_expansions = Some(max_expansions);
        self
    }
}
