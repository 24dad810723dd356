//! Finite State Machine for guard behavior
//!
//! Guards are either patrolling between two fixed points or chasing the
//! player. The machine only decides *which* mode a guard is in; what each mode
//! does with that decision lives on [`Guard`](super::Guard).
//!
//! # Example
//!
//! ```ignore
//! let mut fsm = StateMachine::new(State::Patrolling);
//! let ctx = AiContext { delta_time: dt, can_see_target: true };
//! assert_eq!(fsm.update(&ctx), Transition::Spotted);
//! assert!(fsm.is_in_state(State::Chasing));
//! ```

use std::fmt;

// ============================================================================
// State
// ============================================================================

/// Behavior mode of a guard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum State {
    /// Walking back and forth between patrol endpoints
    #[default]
    Patrolling,
    /// Running straight at the player
    Chasing,
}

impl State {
    /// State name for debugging and logging.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Patrolling => "Patrol",
            Self::Chasing => "Chase",
        }
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ============================================================================
// Transition
// ============================================================================

/// What happened to the state during one update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Transition {
    /// Stay in the current state.
    #[default]
    None,
    /// Patrolling guard saw the target and started chasing.
    Spotted,
    /// Chasing guard lost sight of the target and went back to patrol.
    Lost,
}

// ============================================================================
// Context
// ============================================================================

/// Per-tick input to the state machine.
#[derive(Debug, Clone, Copy, Default)]
pub struct AiContext {
    /// Delta time for this frame
    pub delta_time: f32,
    /// Whether the guard can see its target this frame
    pub can_see_target: bool,
}

// ============================================================================
// State Machine
// ============================================================================

/// Tracks the current state and how long it has been held.
#[derive(Clone)]
pub struct StateMachine {
    /// Current active state
    current: State,
    /// Seconds spent in the current state
    state_time: f32,
}

impl StateMachine {
    /// Create a new state machine with an initial state.
    #[must_use]
    pub fn new(initial: State) -> Self {
        Self {
            current: initial,
            state_time: 0.0,
        }
    }

    /// Evaluate the transition rules for one tick.
    ///
    /// Visibility alone drives the machine: seen means chase, unseen means
    /// patrol.
    pub fn update(&mut self, ctx: &AiContext) -> Transition {
        let (next, transition) = match (self.current, ctx.can_see_target) {
            (State::Patrolling, true) => (State::Chasing, Transition::Spotted),
            (State::Chasing, false) => (State::Patrolling, Transition::Lost),
            (state, _) => (state, Transition::None),
        };

        if transition == Transition::None {
            self.state_time += ctx.delta_time;
        } else {
            self.current = next;
            self.state_time = 0.0;
        }

        transition
    }

    /// Force a transition to a new state.
    pub fn transition(&mut self, new_state: State) {
        if new_state != self.current {
            self.current = new_state;
            self.state_time = 0.0;
        }
    }

    /// Current state
    #[must_use]
    pub fn current(&self) -> State {
        self.current
    }

    /// Get the name of the current state.
    #[must_use]
    pub fn current_state_name(&self) -> &'static str {
        self.current.name()
    }

    /// Check if the FSM is in the given state.
    #[must_use]
    pub fn is_in_state(&self, state: State) -> bool {
        self.current == state
    }

    /// Seconds since the last transition
    #[must_use]
    pub fn state_time(&self) -> f32 {
        self.state_time
    }
}

impl Default for StateMachine {
    fn default() -> Self {
        Self::new(State::Patrolling)
    }
}

impl fmt::Debug for StateMachine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateMachine")
            .field("current", &self.current.name())
            .field("state_time", &self.state_time)
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================
