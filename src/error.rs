use thiserror::Error;

/// Errors raised while configuring or driving a [`Planner`](crate::Planner).
///
/// An exhausted search is not an error: `Planner::plan` returns `Ok(false)`
/// and the plan stays empty.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GoapError {
    /// One of the required planner inputs was never bound
    #[error("Planning failed due to unset {0}")]
    Unconfigured(&'static str),

    /// A sliced planning call was made from the wrong phase
    #[error("Invalid state transition: {0}")]
    InvalidStateTransition(String),

    /// Error when attempting to create an action with zero, negative or non-finite cost
    #[error("Action cost must be positive")]
    InvalidActionCost,

    /// A clause refers to a parameter slot the action does not declare
    #[error("Action {action} refers to parameter {index} but only declares {num_params}")]
    InvalidParameterIndex {
        action: String,
        index: usize,
        num_params: usize,
    },
}

pub type Result<T> = std::result::Result<T, GoapError>;
