//! State machine module
//!
//! Contains the assistant state, the events that drive it and the reducer.

mod events;
mod states;
mod transitions;

pub use events::{AssistantEvent, Effect, GenerationId};
pub use states::{AssistantState, ChatStatus};
pub use transitions::{reduce, AssistantMachine, TransitionRecord};
