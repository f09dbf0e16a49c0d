//! Presentation-neutral views of a machine: a serializable `Snapshot` of everything a host
//! renders, and an `Explanation` describing what the next step will do.

use crate::types::{Action, RunningState, Transition};
use serde::Serialize;
use std::fmt;

/// Everything a host needs to draw the machine after an operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    /// The current state name.
    pub state: String,
    /// The tape cells, in order.
    pub tape: Vec<String>,
    /// 0-based index of the cell under the head.
    pub head: usize,
    /// Row index of the statement the next step will execute.
    pub active_rule: Option<usize>,
    pub running: RunningState,
}

impl Snapshot {
    /// Renders the tape on one line with the head cell bracketed, e.g. `b [1] 1 b`.
    pub fn tape_line(&self) -> String {
        self.tape
            .iter()
            .enumerate()
            .map(|(i, cell)| {
                if i == self.head && self.running != RunningState::Idle {
                    format!("[{cell}]")
                } else {
                    cell.clone()
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Describes the machine's situation in words.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Explanation {
    /// The machine has not been built since construction or the last reset.
    Idle,
    /// A halt statement has fired.
    Halted,
    /// The machine is running; `rule` is the statement (and its row) that will fire next.
    Running {
        state: String,
        input: Option<String>,
        rule: Option<(Transition, usize)>,
    },
}

impl fmt::Display for Explanation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Explanation::Idle => write!(f, "The machine is not running."),
            Explanation::Halted => write!(f, "The machine has halted."),
            Explanation::Running { state, input, rule } => {
                write!(f, "The machine is in state {state}. ")?;
                match input {
                    Some(input) => write!(f, "The current input is {input}. ")?,
                    None => write!(f, "The head is off the tape. ")?,
                }

                let Some((transition, index)) = rule else {
                    return write!(f, "No statements match the current state and input.");
                };

                write!(
                    f,
                    "Based on these, the machine will execute the statement {:02}. \
                     The next state will be {}. \"{}\" will be written to the tape. After that, ",
                    index + 1,
                    transition.next_state,
                    transition.output
                )?;
                match transition.action {
                    Action::Halt => write!(f, "the machine will halt."),
                    Action::Left => write!(f, "the head will move left."),
                    Action::Right => write!(f, "the head will move right."),
                }
            }
        }
    }
}
