//! This module defines the core data structures and types used throughout the emulator,
//! including transition statements, program slots, step outcomes, and error types.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::Rule;

/// The state a freshly configured machine starts in.
pub const DEFAULT_STATE: &str = "Q0";
/// The initial tape content, as the comma-separated text a user would type.
pub const DEFAULT_TAPE: &str = "b,b,b,b,1,1,1,b,b";
/// The initial head position (1-based, as displayed).
pub const DEFAULT_HEAD: usize = 5;
/// Separator between tape cells in the raw tape text.
pub const TAPE_SEPARATOR: char = ',';
/// Separator between the condition and the effect of a statement.
pub const STATEMENT_SEPARATOR: char = ':';

/// A single transition statement: `current_state input : next_state output action`.
///
/// A statement is keyed by (`current_state`, `input`). Nothing prevents two statements
/// from sharing a key; lookups resolve to the first one in program order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Transition {
    /// The state this statement applies in.
    pub current_state: String,
    /// The symbol that must be under the head.
    pub input: String,
    /// The state the machine moves to.
    pub next_state: String,
    /// The symbol written over `input`.
    pub output: String,
    /// What the head does after writing.
    pub action: Action,
}

impl Transition {
    /// Creates a new statement from its five parts.
    pub fn new(
        current_state: impl Into<String>,
        input: impl Into<String>,
        next_state: impl Into<String>,
        output: impl Into<String>,
        action: Action,
    ) -> Self {
        Self {
            current_state: current_state.into(),
            input: input.into(),
            next_state: next_state.into(),
            output: output.into(),
            action,
        }
    }

    /// Returns `true` if this statement fires for the given state and symbol.
    pub fn matches(&self, state: &str, symbol: &str) -> bool {
        self.current_state == state && self.input == symbol
    }
}

/// Renders the statement in the same form the parser accepts, e.g. `Q0 1 : Q1 X L`.
impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {} {} {}",
            self.current_state,
            self.input,
            STATEMENT_SEPARATOR,
            self.next_state,
            self.output,
            self.action
        )
    }
}

/// What the machine does after writing its output symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    /// Move the head one cell to the left.
    Left,
    /// Move the head one cell to the right.
    Right,
    /// Stop the machine; the head stays where it is.
    Halt,
}

impl Action {
    /// The single-letter form used in statement text.
    pub fn letter(self) -> char {
        match self {
            Action::Left => 'L',
            Action::Right => 'R',
            Action::Halt => 'H',
        }
    }

    /// Maps a statement letter back to an action.
    pub fn from_letter(letter: &str) -> Option<Self> {
        match letter {
            "L" => Some(Action::Left),
            "R" => Some(Action::Right),
            "H" => Some(Action::Halt),
            _ => None,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

/// A row of the program editor.
///
/// Rows can be reserved before they hold a statement; an `Empty` row keeps its
/// position for editing but never matches during execution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Slot {
    Filled(Transition),
    Empty,
}

impl Slot {
    /// Returns the statement held by this row, if any.
    pub fn transition(&self) -> Option<&Transition> {
        match self {
            Slot::Filled(transition) => Some(transition),
            Slot::Empty => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Slot::Empty)
    }
}

impl From<Transition> for Slot {
    fn from(transition: Transition) -> Self {
        Slot::Filled(transition)
    }
}

/// An empty row renders as an empty line.
impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Slot::Filled(transition) => fmt::Display::fmt(transition, f),
            Slot::Empty => Ok(()),
        }
    }
}

/// The lifecycle phase of a machine.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunningState {
    /// Editable and not executing.
    #[default]
    Idle,
    /// Built and executing; the program is locked.
    Started,
    /// A halt statement fired; further steps do nothing.
    Halted,
}

impl fmt::Display for RunningState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RunningState::Idle => "idle",
            RunningState::Started => "started",
            RunningState::Halted => "halted",
        };
        f.write_str(name)
    }
}

/// Represents the outcome of a single `step()` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// A statement moved the head; the machine keeps running.
    Continue,
    /// A halt statement fired and the machine is now halted.
    Halt,
    /// Nothing was executed: the machine is not running, or no statement matches.
    Skipped,
}

/// Represents various errors that can occur while editing or running a machine.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TuringMachineError {
    /// A statement line did not follow `state input : next output action`.
    #[error("Statement parsing error: {0}")]
    ParseError(#[from] Box<pest::error::Error<Rule>>),
    /// A line of a multi-line program failed to parse.
    #[error("Invalid statement on line {line}: {source}")]
    InvalidLine {
        line: usize,
        #[source]
        source: Box<pest::error::Error<Rule>>,
    },
    /// The raw head position could not be understood.
    #[error("Invalid head position: {0:?}")]
    InvalidHead(String),
    /// The requested head position does not name a tape cell.
    #[error("Head position {position} is outside the tape (1..={len})")]
    HeadOutOfBounds { position: usize, len: usize },
    /// A write or head move would leave the tape.
    #[error("Tape boundary exceeded at position {0}")]
    TapeBoundary(usize),
    /// A program row index does not exist.
    #[error("Statement index {index} is out of bounds (program has {len} rows)")]
    IndexOutOfBounds { index: usize, len: usize },
    /// The program can only be edited while the machine is idle.
    #[error("Program is locked while the machine is {0}")]
    Locked(RunningState),
    /// The raw configuration could not be decoded.
    #[error("Configuration error: {0}")]
    ConfigError(String),
    /// No built-in program has the requested name.
    #[error("Program '{0}' not found")]
    PresetNotFound(String),
}
