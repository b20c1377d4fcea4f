//! Nested Metadata Lifecycle
//!
//! Tracks one installer's nested metadata through a single ingestion attempt
//! and refuses transitions that would skip a state.
//!
//! # State Flow
//!
//! ```text
//! Unresolved
//!     ↓
//! Resolved
//!     ↓
//! Valid | Invalid   (terminal)
//! ```
//!
//! A corrected manifest starts a new attempt from `Unresolved`; an `Invalid`
//! lifecycle never moves back to `Resolved`.

use std::fmt;
use thiserror::Error;

/// Lifecycle states for one installer's nested metadata
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NestingState {
    /// Raw declarations have not been resolved yet
    Unresolved,
    /// Effective fields computed, not yet validated
    Resolved,
    /// Validation found no errors (terminal)
    Valid,
    /// Validation found at least one error (terminal)
    Invalid,
}

impl NestingState {
    /// Returns true for `Valid` and `Invalid`
    #[inline]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Valid | Self::Invalid)
    }

    /// States reachable in one step from this one
    pub const fn successors(self) -> &'static [Self] {
        match self {
            Self::Unresolved => &[Self::Resolved],
            Self::Resolved => &[Self::Valid, Self::Invalid],
            Self::Valid | Self::Invalid => &[],
        }
    }

    pub const fn description(self) -> &'static str {
        match self {
            Self::Unresolved => "unresolved",
            Self::Resolved => "resolved",
            Self::Valid => "valid",
            Self::Invalid => "invalid",
        }
    }
}

impl fmt::Display for NestingState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description())
    }
}

/// Errors that can occur during lifecycle transitions
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LifecycleTransitionError {
    /// Target is not an immediate successor of the current state
    #[error("Cannot move from {from} to {to} (states cannot be skipped or revisited)")]
    SkippedState { from: NestingState, to: NestingState },

    /// Current state is terminal for this attempt
    #[error("Cannot leave terminal state {from}; restart ingestion from unresolved")]
    FromTerminalState { from: NestingState },

    /// Target equals the current state
    #[error("Already in state {state}")]
    AlreadyInState { state: NestingState },
}

/// Lifecycle of one installer's nested metadata within one ingestion attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NestingLifecycle {
    current: NestingState,
    history: Vec<NestingState>,
}

impl Default for NestingLifecycle {
    fn default() -> Self {
        Self::new()
    }
}

impl NestingLifecycle {
    /// Start a new attempt in `Unresolved`
    pub fn new() -> Self {
        Self {
            current: NestingState::Unresolved,
            history: vec![NestingState::Unresolved],
        }
    }

    #[inline]
    pub fn current(&self) -> NestingState {
        self.current
    }

    /// Every state visited so far, in order
    pub fn history(&self) -> &[NestingState] {
        &self.history
    }

    #[inline]
    pub fn is_terminal(&self) -> bool {
        self.current.is_terminal()
    }

    /// Move to `target`, which must directly follow the current state.
    ///
    /// # Errors
    ///
    /// - `FromTerminalState` if the current state is `Valid` or `Invalid`
    /// - `AlreadyInState` if `target` is the current state
    /// - `SkippedState` for any other non-successor target
    pub fn transition_to(
        &mut self,
        target: NestingState,
    ) -> Result<NestingState, LifecycleTransitionError> {
        if self.current.is_terminal() {
            return Err(LifecycleTransitionError::FromTerminalState { from: self.current });
        }

        if target == self.current {
            return Err(LifecycleTransitionError::AlreadyInState { state: target });
        }

        if !self.current.successors().contains(&target) {
            return Err(LifecycleTransitionError::SkippedState {
                from: self.current,
                to: target,
            });
        }

        tracing::debug!(from = %self.current, to = %target, "Nested metadata state transition");
        self.current = target;
        self.history.push(target);

        Ok(target)
    }

    /// `Unresolved → Resolved`
    pub fn mark_resolved(&mut self) -> Result<NestingState, LifecycleTransitionError> {
        self.transition_to(NestingState::Resolved)
    }

    /// `Resolved → Valid` or `Resolved → Invalid`
    pub fn mark_validated(&mut self, valid: bool) -> Result<NestingState, LifecycleTransitionError> {
        let target = if valid {
            NestingState::Valid
        } else {
            NestingState::Invalid
        };
        self.transition_to(target)
    }
}
