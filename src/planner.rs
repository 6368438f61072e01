//! # Planner Module for Goal-Oriented Action Planning (GOAP)
//!
//! The planner searches backward from the goal state toward the start state.
//! Each search node holds a world state; expanding a node asks, for every
//! action and every parameter binding, "could this action have produced this
//! state?" and, if so, derives the state the action must have started from.
//! The search stops when it reaches a state that agrees with the start state
//! on every fact both of them mention.
//!
//! The search is sliced so a host loop can spread it over many frames:
//!
//! 1. [`Planner::init`] validates the inputs and seeds the frontier with the goal
//! 2. [`Planner::update`] expands one node per call and returns `false` when done
//! 3. [`Planner::finalize`] builds the plan and releases the search data
//!
//! [`Planner::plan`] runs all three in one call.
//!
//! ## Basic Usage
//!
//! ```
//! use goap_regress::{ActionList, BasicAction, Condition, ConditionType, Effect, EffectType,
//!     Fact, Operation, Planner, WorldState};
//!
//! const HOME: i64 = 0;
//! const WORK: i64 = 1;
//!
//! // drive(?0): whoever ?0 is goes from home to work
//! let drive = BasicAction::new("drive", 1.0)
//!     .unwrap()
//!     .with_params(1)
//!     .clause(
//!         Fact::new("at").with_param(0),
//!         Operation::new()
//!             .with_condition(Condition::new(ConditionType::Equals, HOME))
//!             .with_effect(Effect::new(EffectType::Set, WORK)),
//!     );
//! let mut actions = ActionList::new();
//! actions.add(drive);
//!
//! let mut start = WorldState::new();
//! start.set(Fact::new("at").with_value(7), HOME);
//! let mut goal = WorldState::new();
//! goal.set(Fact::new("at").with_value(7), WORK);
//!
//! let mut planner = Planner::new();
//! planner.set_start(&start);
//! planner.set_goal(&goal);
//! planner.set_actions(&actions);
//! planner.set_objects(vec![3, 7]);
//!
//! assert!(planner.plan(None).unwrap());
//! let plan = planner.get_plan();
//! assert_eq!(plan.len(), 1);
//! assert_eq!(plan[0].to_string(), "drive(7)");
//! ```
//!
//! ## Sliced Usage
//!
//! ```
//! use goap_regress::{Action, ActionList, BasicAction, Effect, EffectType, Fact, LogContext,
//!     Phase, Planner, WorldState};
//!
//! let lamp = Fact::new("lamp_on");
//! let switch_on = BasicAction::new("switch_on", 1.0)
//!     .unwrap()
//!     .effect(lamp.clone(), Effect::new(EffectType::Set, 1));
//! let actions: ActionList<_> = vec![switch_on].into_iter().collect();
//!
//! let mut start = WorldState::new();
//! start.set(lamp.clone(), 0);
//! let mut goal = WorldState::new();
//! goal.set(lamp, 1);
//!
//! let mut planner = Planner::new();
//! planner.set_start(&start);
//! planner.set_goal(&goal);
//! planner.set_actions(&actions);
//!
//! let mut ctx = LogContext::new();
//! planner.init(Some(&mut ctx)).unwrap();
//! // one expansion per host tick
//! while planner.update(Some(&mut ctx)).unwrap() {}
//! assert_eq!(planner.phase(), Phase::Succeeded);
//! planner.finalize(Some(&mut ctx)).unwrap();
//!
//! assert!(planner.success());
//! assert_eq!(planner.get_plan()[0].action.name(), "switch_on");
//! ```

use std::fmt;

use crate::context::{emit, reborrow};
use crate::frontier::{Candidate, Frontier, IntermediateState};
use crate::{
    Action, ActionSet, Context, GoapError, PVal, PlannerConfig, Result, WorldState,
};

/// One entry of a plan: an action and the binding to run it with.
#[derive(Clone)]
pub struct PlanStep<'a> {
    pub action: &'a dyn Action,
    pub params: Vec<PVal>,
}

impl fmt::Debug for PlanStep<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlanStep")
            .field("action", &self.action.name())
            .field("params", &self.params)
            .finish()
    }
}

impl fmt::Display for PlanStep<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.action.describe(&self.params))
    }
}

/// Ordered steps from the start state to the goal state.
pub type Plan<'a> = Vec<PlanStep<'a>>;

/// Where the planner is in its sliced lifecycle.
///
/// `init` is accepted from `Idle`, `Succeeded` and `Failed`; `update` only
/// while `Searching`; `finalize` only from `Succeeded` or `Failed`, after
/// which the planner is `Idle` again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Searching,
    Succeeded,
    Failed,
}

/// Inputs captured by `init` for the duration of one search.
struct SearchInputs<'a> {
    /// Start state with the constants merged in.
    start: WorldState,
    actions: &'a dyn ActionSet,
}

/// Backward-chaining A* planner.
///
/// The planner borrows its start, goal and constants states and its action
/// set; it never modifies them. Frontier and explored set are owned by the
/// planner and live until `finalize` or `reset`.
pub struct Planner<'a> {
    start: Option<&'a WorldState>,
    goal: Option<&'a WorldState>,
    constants: Option<&'a WorldState>,
    actions: Option<&'a dyn ActionSet>,
    objects: Vec<PVal>,
    config: PlannerConfig,
    phase: Phase,
    success: bool,
    expansions: usize,
    inputs: Option<SearchInputs<'a>>,
    frontier: Frontier<'a>,
    plan: Plan<'a>,
}

impl<'a> Planner<'a> {
    /// Creates a planner with no inputs bound and the default configuration.
    pub fn new() -> Self {
        Self::with_config(PlannerConfig::default())
    }

    pub fn with_config(config: PlannerConfig) -> Self {
        Self {
            start: None,
            goal: None,
            constants: None,
            actions: None,
            objects: Vec::new(),
            config,
            phase: Phase::Idle,
            success: false,
            expansions: 0,
            inputs: None,
            frontier: Frontier::new(),
            plan: Vec::new(),
        }
    }

    pub fn set_start(&mut self, start: &'a WorldState) {
        self.start = Some(start);
    }

    pub fn set_goal(&mut self, goal: &'a WorldState) {
        self.goal = Some(goal);
    }

    /// Facts that hold everywhere. They fill in whatever the start state
    /// does not mention when testing for the start and scoring nodes.
    pub fn set_constants(&mut self, constants: &'a WorldState) {
        self.constants = Some(constants);
    }

    pub fn set_actions(&mut self, actions: &'a dyn ActionSet) {
        self.actions = Some(actions);
    }

    /// The pool of values parameter slots are filled from.
    pub fn set_objects(&mut self, objects: Vec<PVal>) {
        self.objects = objects;
    }

    /// Replaces the configuration.
    ///
    /// # Errors
    ///
    /// Returns `GoapError::InvalidStateTransition` while a search is running.
    pub fn set_config(&mut self, config: PlannerConfig) -> Result<()> {
        if self.phase == Phase::Searching {
            return Err(GoapError::InvalidStateTransition(
                "cannot change configuration while searching".to_string(),
            ));
        }
        self.config = config;
        Ok(())
    }

    pub fn start(&self) -> Option<&'a WorldState> {
        self.start
    }

    pub fn goal(&self) -> Option<&'a WorldState> {
        self.goal
    }

    pub fn constants(&self) -> Option<&'a WorldState> {
        self.constants
    }

    pub fn actions(&self) -> Option<&'a dyn ActionSet> {
        self.actions
    }

    pub fn objects(&self) -> &[PVal] {
        &self.objects
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Outcome of the most recent search.
    pub fn success(&self) -> bool {
        self.success
    }

    /// Nodes expanded by the current or most recent search.
    pub fn expansions(&self) -> usize {
        self.expansions
    }

    /// The plan built by the last `finalize`. Empty if that search failed.
    pub fn get_plan(&self) -> &[PlanStep<'a>] {
        &self.plan
    }

    pub fn open_len(&self) -> usize {
        self.frontier.open_len()
    }

    /// Nodes expanded so far, in expansion order. Emptied by `finalize`.
    pub fn explored(&self) -> impl Iterator<Item = &IntermediateState<'a>> + '_ {
        self.frontier.explored()
    }

    /// Runs a whole search: `init`, `update` until done, then `finalize`.
    ///
    /// Returns `Ok(true)` when a plan was found. An exhausted search returns
    /// `Ok(false)` and leaves the plan empty.
    ///
    /// # Errors
    ///
    /// Returns `GoapError::Unconfigured` if the start state, goal state or
    /// action set was never set, and `GoapError::InvalidStateTransition` if a
    /// sliced search is still in progress.
    ///
    /// # Examples
    ///
    /// ```
    /// use goap_regress::{ActionList, BasicAction, Condition, ConditionType, Effect, EffectType,
    ///     Fact, Planner, WorldState};
    ///
    /// // The only action needs a key nobody can provide.
    /// let open = BasicAction::new("open", 1.0)
    ///     .unwrap()
    ///     .condition(Fact::new("key"), Condition::new(ConditionType::Equals, 1))
    ///     .effect(Fact::new("door"), Effect::new(EffectType::Set, 1));
    /// let actions: ActionList<_> = vec![open].into_iter().collect();
    ///
    /// let mut start = WorldState::new();
    /// start.set(Fact::new("key"), 0);
    /// start.set(Fact::new("door"), 0);
    /// let mut goal = WorldState::new();
    /// goal.set(Fact::new("door"), 1);
    ///
    /// let mut planner = Planner::new();
    /// planner.set_start(&start);
    /// planner.set_goal(&goal);
    /// planner.set_actions(&actions);
    ///
    /// assert!(!planner.plan(None).unwrap());
    /// assert!(planner.get_plan().is_empty());
    /// ```
    pub fn plan(&mut self, mut ctx: Option<&mut dyn Context>) -> Result<bool> {
        self.init(reborrow(&mut ctx))?;
        while self.update(reborrow(&mut ctx))? {}
        self.finalize(reborrow(&mut ctx))?;
        Ok(self.success)
    }

    /// Starts a new search with the goal state as the only open node.
    ///
    /// # Errors
    ///
    /// Returns `GoapError::Unconfigured` if an input is missing and
    /// `GoapError::InvalidStateTransition` while another search is running.
    pub fn init(&mut self, mut ctx: Option<&mut dyn Context>) -> Result<()> {
        if self.phase == Phase::Searching {
            return Err(GoapError::InvalidStateTransition(
                "init called during a search; reset the planner first".to_string(),
            ));
        }

        let (start, goal, actions) = match (self.start, self.goal, self.actions) {
            (Some(start), Some(goal), Some(actions)) => (start, goal, actions),
            (start, goal, _) => {
                emit(
                    &mut ctx,
                    format_args!("Planning failed due to unset start, goal or action set!"),
                );
                let missing = if start.is_none() {
                    "start state"
                } else if goal.is_none() {
                    "goal state"
                } else {
                    "action set"
                };
                log::warn!("Planner is missing its {}", missing);
                return Err(GoapError::Unconfigured(missing));
            }
        };

        emit(&mut ctx, format_args!("Starting new plan."));
        log::debug!("Starting new plan towards {}", goal);

        self.success = false;
        self.expansions = 0;
        self.plan.clear();
        self.frontier.clear();

        let start = match self.constants {
            Some(constants) => start.with_defaults(constants),
            None => start.clone(),
        };
        self.inputs = Some(SearchInputs { start, actions });
        self.frontier.push(Candidate {
            state: goal.clone(),
            g: 0.0,
            h: 0.0,
            action: None,
            params: Vec::new(),
            prev: None,
        });
        self.phase = Phase::Searching;
        Ok(())
    }

    /// Expands one node. Returns `Ok(false)` once the search has succeeded
    /// or failed.
    ///
    /// # Errors
    ///
    /// Returns `GoapError::InvalidStateTransition` when no search is running.
    pub fn update(&mut self, mut ctx: Option<&mut dyn Context>) -> Result<bool> {
        let inputs = match (&self.inputs, self.phase) {
            (Some(inputs), Phase::Searching) => inputs,
            _ => {
                return Err(GoapError::InvalidStateTransition(format!(
                    "update called while {:?}",
                    self.phase
                )))
            }
        };

        let Some(id) = self.frontier.pop() else {
            emit(&mut ctx, format_args!("Open list exhausted, no plan found."));
            log::debug!("Search failed after {} expansions", self.expansions);
            self.phase = Phase::Failed;
            return Ok(false);
        };
        emit(&mut ctx, format_args!("Moving state {} from open to closed.", id));

        let node = self.frontier.node(id);
        let (current, g) = (node.state.clone(), node.g);
        if WorldState::comp_start(&current, &inputs.start) == 0 {
            log::debug!(
                "Reached the start state after {} expansions with cost {}",
                self.expansions,
                g
            );
            self.success = true;
            self.phase = Phase::Succeeded;
            return Ok(false);
        }

        if let Some(limit) = self.config.max_expansions {
            if self.expansions >= limit {
                emit(&mut ctx, format_args!("Expansion limit of {} reached.", limit));
                log::debug!("Search stopped at the expansion limit of {}", limit);
                self.phase = Phase::Failed;
                return Ok(false);
            }
        }
        self.expansions += 1;

        let mut expansion = Expansion {
            prev: self.frontier.explored_len() - 1,
            frontier: &mut self.frontier,
            start: &inputs.start,
            config: self.config,
            current: &current,
            g,
        };
        for (action, preference) in inputs.actions.entries() {
            for params in Bindings::new(action.num_params(), &self.objects) {
                expansion.attempt(&mut ctx, action, preference, params);
            }
        }
        Ok(true)
    }

    /// Builds the plan from the explored set and releases the search data.
    ///
    /// # Errors
    ///
    /// Returns `GoapError::InvalidStateTransition` unless the last search
    /// has succeeded or failed.
    pub fn finalize(&mut self, mut ctx: Option<&mut dyn Context>) -> Result<()> {
        if !matches!(self.phase, Phase::Succeeded | Phase::Failed) {
            return Err(GoapError::InvalidStateTransition(format!(
                "finalize called while {:?}",
                self.phase
            )));
        }
        emit(&mut ctx, format_args!("Finalising plan!"));

        self.plan.clear();
        if self.phase == Phase::Succeeded {
            // Walk back from the node that matched the start to the goal.
            let mut index = self.frontier.explored_len().checked_sub(1);
            while let Some(i) = index {
                let node = self.frontier.explored_node(i);
                let Some(action) = node.action else {
                    break;
                };
                self.plan.push(PlanStep {
                    action,
                    params: node.params.clone(),
                });
                index = node.prev;
            }
            log::debug!("Plan has {} steps", self.plan.len());
        }

        self.frontier.clear();
        self.inputs = None;
        self.phase = Phase::Idle;
        Ok(())
    }

    /// Abandons any search in progress and drops its data.
    pub fn reset(&mut self) {
        self.frontier.clear();
        self.inputs = None;
        self.plan.clear();
        self.success = false;
        self.expansions = 0;
        self.phase = Phase::Idle;
    }
}

impl Default for Planner<'_> {
    fn default() -> Self {
        Self::new()
    }
}

/// Predecessor generation for one expanded node.
struct Expansion<'s, 'a> {
    frontier: &'s mut Frontier<'a>,
    start: &'s WorldState,
    config: PlannerConfig,
    current: &'s WorldState,
    g: f32,
    /// Explored-set index of the node being expanded.
    prev: usize,
}

impl<'a> Expansion<'_, 'a> {
    fn attempt(
        &mut self,
        ctx: &mut Option<&mut dyn Context>,
        action: &'a dyn Action,
        preference: f32,
        params: Vec<PVal>,
    ) {
        if !self
            .current
            .post_match(action, &params, self.config.match_policy)
        {
            return;
        }

        let mut state = self.current.clone();
        state.apply_reverse(action, &params);
        if self.frontier.is_explored(&state) {
            return;
        }

        let h = WorldState::comp(&state, self.start, self.config.heuristic) as f32;
        let candidate = Candidate {
            state,
            g: self.g + action.cost() * preference,
            h,
            action: Some(action),
            params,
            prev: Some(self.prev),
        };

        match self.frontier.find_open(&candidate.state) {
            Some(id) => {
                if self.frontier.improve(id, candidate) {
                    emit(
                        ctx,
                        format_args!("Updating state {} to F={}", id, self.frontier.node(id).f),
                    );
                }
            }
            None => {
                let id = self.frontier.push(candidate);
                let node = self.frontier.node(id);
                emit(
                    ctx,
                    format_args!(
                        "Pushing new state {} {} via action {} onto open list with score F={:.3}.",
                        id,
                        node.state,
                        action.describe(&node.params),
                        node.f
                    ),
                );
                log::trace!("open node {} f={} via {}", id, node.f, action.name());
            }
        }
    }
}

/// Every binding of `num_params` slots drawn from `objects`, last slot
/// varying fastest, produced one at a time. Yields a single empty binding
/// when there is nothing to bind.
struct Bindings<'o> {
    objects: &'o [PVal],
    odometer: Vec<usize>,
    done: bool,
}

impl<'o> Bindings<'o> {
    fn new(num_params: usize, objects: &'o [PVal]) -> Self {
        let slots = if objects.is_empty() { 0 } else { num_params };
        Self {
            objects,
            odometer: vec![0; slots],
            done: false,
        }
    }
}

impl Iterator for Bindings<'_> {
    type Item = Vec<PVal>;

    fn next(&mut self) -> Option<Vec<PVal>> {
        if self.done {
            return None;
        }
        let binding = self.odometer.iter().map(|i| self.objects[*i]).collect();

        self.done = true;
        for slot in (0..self.odometer.len()).rev() {
            self.odometer[slot] += 1;
            if self.odometer[slot] < self.objects.len() {
                self.done = false;
                break;
            }
            self.odometer[slot] = 0;
        }
        Some(binding)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        ActionList, BasicAction, Condition, ConditionType, Effect, EffectType, Fact, Heuristic,
        MatchPolicy, Operation, RecordingContext,
    };

    fn fact(name: &str) -> Fact {
        Fact::new(name)
    }

    fn state(pairs: &[(&str, PVal)]) -> WorldState {
        pairs.iter().map(|(name, value)| (fact(name), *value)).collect()
    }

    /// `name`: requires `pre` == 1, sets `post` = 1.
    fn make_action(name: &str, cost: f32, pre: &str, post: &str) -> BasicAction {
        BasicAction::new(name, cost)
            .unwrap()
            .condition(fact(pre), Condition::new(ConditionType::Equals, 1))
            .effect(fact(post), Effect::new(EffectType::Set, 1))
    }

    fn names(plan: &[PlanStep<'_>]) -> Vec<String> {
        plan.iter().map(|step| step.to_string()).collect()
    }

    fn bindings(num_params: usize, objects: &[PVal]) -> Vec<Vec<PVal>> {
        Bindings::new(num_params, objects).collect()
    }

    #[test]
    fn test_bindings_cross_product() {
        assert_eq!(bindings(0, &[1, 2]), vec![Vec::<PVal>::new()]);
        assert_eq!(bindings(2, &[]), vec![Vec::<PVal>::new()]);
        assert_eq!(
            bindings(2, &[1, 2]),
            vec![vec![1, 1], vec![1, 2], vec![2, 1], vec![2, 2]]
        );
        assert_eq!(bindings(3, &[5, 6, 7]).len(), 27);
    }

    #[test]
    fn test_bindings_are_produced_lazily() {
        let objects: Vec<PVal> = (0..100).collect();
        let mut bindings = Bindings::new(4, &objects);
        assert_eq!(bindings.next(), Some(vec![0, 0, 0, 0]));
        assert_eq!(bindings.next(), Some(vec![0, 0, 0, 1]));
        assert_eq!(bindings.nth(97), Some(vec![0, 0, 0, 99]));
        assert_eq!(bindings.next(), Some(vec![0, 0, 1, 0]));
        assert_eq!(bindings.odometer.len(), 4);
    }

    #[test]
    fn test_simple_plan() {
        // a -> b -> c
        let actions: ActionList<_> = vec![
            make_action("a", 1.0, "start", "mid"),
            make_action("b", 1.0, "mid", "end"),
            make_action("c", 1.0, "end", "goal"),
        ]
        .into_iter()
        .collect();
        let initial = state(&[("start", 1), ("mid", 0), ("end", 0), ("goal", 0)]);
        let goal = state(&[("goal", 1)]);

        let mut planner = Planner::new();
        planner.set_start(&initial);
        planner.set_goal(&goal);
        planner.set_actions(&actions);

        assert!(planner.plan(None).unwrap());
        assert_eq!(names(planner.get_plan()), ["a", "b", "c"]);
        assert_eq!(planner.phase(), Phase::Idle);
        assert_eq!(planner.expansions(), 3);
    }

    #[test]
    fn test_goal_already_satisfied() {
        let actions: ActionList<BasicAction> = ActionList::new();
        let initial = state(&[("goal", 1)]);
        let goal = state(&[("goal", 1)]);

        let mut planner = Planner::new();
        planner.set_start(&initial);
        planner.set_goal(&goal);
        planner.set_actions(&actions);

        assert!(planner.plan(None).unwrap());
        assert!(planner.get_plan().is_empty());
    }

    #[test]
    fn test_cheaper_route_replaces_open_node() {
        // Both routes lead to the same predecessor state; the expensive one is
        // listed first so the cheap one has to improve the open node.
        let step = |name: &str, cost: f32| {
            BasicAction::new(name, cost)
                .unwrap()
                .condition(fact("a"), Condition::new(ConditionType::Equals, 0))
                .effect(fact("b"), Effect::new(EffectType::Set, 1))
        };
        let finish = BasicAction::new("finish", 1.0)
            .unwrap()
            .condition(fact("b"), Condition::new(ConditionType::Equals, 1))
            .effect(fact("c"), Effect::new(EffectType::Set, 1));
        let actions: ActionList<_> = vec![step("costly", 5.0), step("cheap", 1.0), finish]
            .into_iter()
            .collect();

        let initial = state(&[("a", 0), ("b", 0), ("c", 0)]);
        let goal = state(&[("c", 1)]);

        let mut planner = Planner::new();
        planner.set_start(&initial);
        planner.set_goal(&goal);
        planner.set_actions(&actions);

        let mut ctx = RecordingContext::default();
        assert!(planner.plan(Some(&mut ctx)).unwrap());
        assert_eq!(names(planner.get_plan()), ["cheap", "finish"]);
        assert!(ctx
            .messages
            .iter()
            .any(|m| m.starts_with("Updating state")));
    }

    #[test]
    fn test_preference_scales_cost() {
        let actions = {
            let mut list = ActionList::new();
            list.add_with_preference(make_action("walk", 1.0, "start", "goal"), 10.0);
            list.add(make_action("bike", 2.0, "start", "goal"));
            list
        };
        let initial = state(&[("start", 1), ("goal", 0)]);
        let goal = state(&[("goal", 1)]);

        let mut planner = Planner::new();
        planner.set_start(&initial);
        planner.set_goal(&goal);
        planner.set_actions(&actions);

        assert!(planner.plan(None).unwrap());
        assert_eq!(names(planner.get_plan()), ["bike"]);
    }

    #[test]
    fn test_parametrized_action_binds_objects() {
        let carry = BasicAction::new("carry", 1.0)
            .unwrap()
            .with_params(2)
            .with_special_condition(|params| params[0] != params[1])
            .clause(
                Fact::new("in").with_param(0),
                Operation::new()
                    .with_condition(Condition::from_param(ConditionType::Equals, 1))
                    .with_effect(Effect::new(EffectType::Set, 30)),
            );
        let actions: ActionList<_> = vec![carry].into_iter().collect();

        let mut initial = WorldState::new();
        initial.set(Fact::new("in").with_value(1), 20);
        let mut goal = WorldState::new();
        goal.set(Fact::new("in").with_value(1), 30);

        let mut planner = Planner::new();
        planner.set_start(&initial);
        planner.set_goal(&goal);
        planner.set_actions(&actions);
        planner.set_objects(vec![1, 10, 20]);

        assert!(planner.plan(None).unwrap());
        assert_eq!(names(planner.get_plan()), ["carry(1, 20)"]);
    }

    #[test]
    fn test_constants_fill_in_start() {
        let actions: ActionList<_> = vec![make_action("fly", 1.0, "wings", "airborne")]
            .into_iter()
            .collect();
        let initial = state(&[("airborne", 0)]);
        let constants = state(&[("wings", 0), ("airborne", 1)]);
        let goal = state(&[("airborne", 1)]);

        let mut planner = Planner::new();
        planner.set_start(&initial);
        planner.set_goal(&goal);
        planner.set_actions(&actions);

        // Without constants the unknown `wings` fact is taken as matching.
        assert!(planner.plan(None).unwrap());
        assert_eq!(names(planner.get_plan()), ["fly"]);

        // With them, the start is known to lack wings.
        planner.set_constants(&constants);
        assert!(!planner.plan(None).unwrap());
        assert_eq!(constants, state(&[("wings", 0), ("airborne", 1)]));
    }

    #[test]
    fn test_explored_states_are_unique() {
        let actions: ActionList<_> = vec![
            make_action("a", 1.0, "x", "y"),
            make_action("b", 1.0, "y", "x"),
            make_action("c", 1.0, "y", "z"),
        ]
        .into_iter()
        .collect();
        let initial = state(&[("x", 0), ("y", 0), ("z", 0)]);
        let goal = state(&[("z", 1)]);

        let mut planner = Planner::with_config(
            PlannerConfig::default().with_heuristic(Heuristic::FactDifference),
        );
        planner.set_start(&initial);
        planner.set_goal(&goal);
        planner.set_actions(&actions);

        planner.init(None).unwrap();
        while planner.update(None).unwrap() {}
        let explored: Vec<_> = planner.explored().map(|n| n.state().clone()).collect();
        for (i, a) in explored.iter().enumerate() {
            for b in &explored[i + 1..] {
                assert_ne!(a, b);
            }
        }
        planner.finalize(None).unwrap();
        assert_eq!(planner.explored().count(), 0);
    }

    #[test]
    fn test_missing_inputs() {
        let goal = state(&[("goal", 1)]);
        let mut planner = Planner::new();
        let mut ctx = RecordingContext::default();

        assert_eq!(
            planner.plan(Some(&mut ctx)),
            Err(GoapError::Unconfigured("start state"))
        );
        planner.set_start(&goal);
        assert_eq!(planner.plan(None), Err(GoapError::Unconfigured("goal state")));
        planner.set_goal(&goal);
        assert_eq!(planner.plan(None), Err(GoapError::Unconfigured("action set")));
        assert_eq!(
            ctx.messages,
            ["Planning failed due to unset start, goal or action set!"]
        );
        assert_eq!(planner.phase(), Phase::Idle);
    }

    #[test]
    fn test_phase_guards() {
        let actions: ActionList<_> = vec![make_action("a", 1.0, "x", "y")].into_iter().collect();
        let initial = state(&[("x", 1), ("y", 0)]);
        let goal = state(&[("y", 1)]);

        let mut planner = Planner::new();
        planner.set_start(&initial);
        planner.set_goal(&goal);
        planner.set_actions(&actions);

        assert!(matches!(
            planner.update(None),
            Err(GoapError::InvalidStateTransition(_))
        ));
        assert!(matches!(
            planner.finalize(None),
            Err(GoapError::InvalidStateTransition(_))
        ));

        planner.init(None).unwrap();
        assert_eq!(planner.phase(), Phase::Searching);
        assert!(matches!(
            planner.init(None),
            Err(GoapError::InvalidStateTransition(_))
        ));
        assert!(planner.set_config(PlannerConfig::default()).is_err());
        assert!(matches!(
            planner.finalize(None),
            Err(GoapError::InvalidStateTransition(_))
        ));

        planner.reset();
        assert_eq!(planner.phase(), Phase::Idle);
        assert!(planner.plan(None).unwrap());
        assert_eq!(names(planner.get_plan()), ["a"]);
    }

    #[test]
    fn test_expansion_limit() {
        let actions: ActionList<_> = vec![
            make_action("a", 1.0, "start", "mid"),
            make_action("b", 1.0, "mid", "goal"),
        ]
        .into_iter()
        .collect();
        let initial = state(&[("start", 1), ("mid", 0), ("goal", 0)]);
        let goal = state(&[("goal", 1)]);

        let mut planner = Planner::with_config(PlannerConfig::default().with_max_expansions(1));
        planner.set_start(&initial);
        planner.set_goal(&goal);
        planner.set_actions(&actions);

        assert!(!planner.plan(None).unwrap());
        assert_eq!(planner.expansions(), 1);
        assert!(planner.get_plan().is_empty());
    }

    #[test]
    fn test_strict_policy_rejects_unexplained_effects() {
        // `brew` also dirties the pot, which the goal does not mention.
        let brew = make_action("brew", 1.0, "water", "coffee")
            .effect(fact("pot_dirty"), Effect::new(EffectType::Set, 1));
        let actions: ActionList<_> = vec![brew].into_iter().collect();
        let initial = state(&[("water", 1), ("coffee", 0)]);
        let goal = state(&[("coffee", 1)]);

        let mut lenient = Planner::new();
        lenient.set_start(&initial);
        lenient.set_goal(&goal);
        lenient.set_actions(&actions);
        assert!(lenient.plan(None).unwrap());

        let mut strict =
            Planner::with_config(PlannerConfig::default().with_match_policy(MatchPolicy::Strict));
        strict.set_start(&initial);
        strict.set_goal(&goal);
        strict.set_actions(&actions);
        assert!(!strict.plan(None).unwrap());
    }
}
