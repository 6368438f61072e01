mod action;
mod config;
mod context;
mod error;
mod fact;
mod frontier;
mod operation;
mod planner;
mod world_state;

pub use action::{Action, ActionList, ActionSet, BasicAction};
pub use config::{Heuristic, MatchPolicy, PlannerConfig};
pub use context::{Context, LogContext, RecordingContext};
pub use error::{GoapError, Result};
pub use fact::{Arg, Fact, PVal};
pub use frontier::IntermediateState;
pub use operation::{Condition, ConditionType, Effect, EffectType, Operation};
pub use planner::{Phase, Plan, PlanStep, Planner};
pub use world_state::WorldState;
