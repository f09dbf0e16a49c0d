//! This module defines the `TuringMachine` struct, which owns a program and a tape and
//! executes one statement per `step()`. It also guards the program against edits while
//! the machine is running.

use crate::{
    config::MachineConfig,
    parser::parse,
    program::Program,
    snapshot::{Explanation, Snapshot},
    tape::Tape,
    types::{Action, RunningState, Slot, Step, Transition, TuringMachineError},
};
use tracing::{debug, trace, warn};

/// Represents a single-tape Turing Machine.
///
/// A machine starts out `Idle` with whatever program it was given. `build` loads a tape,
/// start state and head position and moves it to `Started`; `step` then executes at most
/// one statement per call until a halt statement moves it to `Halted`. `reset` returns
/// it to `Idle` so the program can be edited again.
///
/// The statement that the next `step` will execute is looked up eagerly after every
/// build and move, so a host can highlight it before the user steps.
#[derive(Debug, Clone, Default)]
pub struct TuringMachine {
    program: Program,
    tape: Tape,
    state: String,
    head: usize,
    running: RunningState,
    active: Option<usize>,
}

impl TuringMachine {
    /// Creates an idle machine around `program` with an empty tape.
    pub fn new(program: Program) -> Self {
        Self {
            program,
            ..Self::default()
        }
    }

    /// Loads raw configuration and starts the machine.
    ///
    /// The tape is split on commas, the state is taken verbatim and `head` is the 1-based
    /// index of the starting cell. Building is allowed in any running state and replaces
    /// the previous tape, state and head completely; the program is kept.
    ///
    /// # Arguments
    ///
    /// * `raw_tape` - Comma-separated tape cells.
    /// * `raw_state` - The start state. It need not appear in the program.
    /// * `head` - 1-based starting cell.
    ///
    /// # Returns
    ///
    /// * `Ok(())` if the machine is now `Started`.
    /// * `Err(TuringMachineError::HeadOutOfBounds)` if `head` does not name a cell, in
    ///   which case the machine is left exactly as it was.
    pub fn build(
        &mut self,
        raw_tape: &str,
        raw_state: &str,
        head: usize,
    ) -> Result<(), TuringMachineError> {
        let tape = Tape::parse(raw_tape);
        if head == 0 || head > tape.len() {
            return Err(TuringMachineError::HeadOutOfBounds {
                position: head,
                len: tape.len(),
            });
        }

        self.tape = tape;
        self.state = raw_state.to_string();
        self.head = head - 1;
        self.running = RunningState::Started;
        self.refresh_active();

        debug!(
            state = %self.state,
            head = self.head,
            tape = %self.tape,
            active = ?self.active,
            "machine built"
        );

        Ok(())
    }

    /// Same as [`TuringMachine::build`], reading the raw values from a `MachineConfig`.
    pub fn build_from(&mut self, config: &MachineConfig) -> Result<(), TuringMachineError> {
        self.build(&config.tape, &config.state, config.head)
    }

    /// Executes a single statement.
    ///
    /// The active statement's output is written under the head, the state changes to its
    /// next state, and the head moves left or right, after which the statement for the new
    /// cell is looked up. A halt statement stops the machine without moving the head.
    ///
    /// # Returns
    ///
    /// * `Ok(Step::Continue)` after a move.
    /// * `Ok(Step::Halt)` after a halt statement.
    /// * `Ok(Step::Skipped)` if nothing ran: the machine is idle or halted, or no statement
    ///   matches the current state and symbol. Nothing is changed.
    /// * `Err(TuringMachineError::TapeBoundary)` if the move would take the head off the
    ///   tape. Nothing is changed, so the same error repeats until the machine is rebuilt.
    pub fn step(&mut self) -> Result<Step, TuringMachineError> {
        let Some((transition, index)) = self.active_rule() else {
            trace!(state = %self.state, running = %self.running, "step skipped");
            return Ok(Step::Skipped);
        };

        let head = match transition.action {
            Action::Left => self.head.checked_sub(1),
            Action::Right => Some(self.head + 1).filter(|&h| h < self.tape.len()),
            Action::Halt => Some(self.head),
        };
        let Some(head) = head else {
            warn!(
                rule = index,
                head = self.head,
                len = self.tape.len(),
                "move would leave the tape"
            );
            return Err(TuringMachineError::TapeBoundary(self.head));
        };

        let Transition {
            next_state,
            output,
            action,
            ..
        } = transition.clone();

        trace!(rule = index, from = %self.state, to = %next_state, write = %output, %action, "step");

        self.tape.write(self.head, output)?;
        self.state = next_state;
        self.head = head;

        if action == Action::Halt {
            self.running = RunningState::Halted;
            self.active = None;
            debug!(state = %self.state, tape = %self.tape, "machine halted");
            return Ok(Step::Halt);
        }

        self.refresh_active();
        Ok(Step::Continue)
    }

    /// Returns the machine to `Idle` and unlocks the program.
    ///
    /// The tape, state and head keep their last values until the next build.
    pub fn reset(&mut self) {
        self.running = RunningState::Idle;
        self.active = None;
        debug!(state = %self.state, "machine reset");
    }

    /// Appends `transition` as a new row, or overwrites row `index` if it exists.
    ///
    /// Returns the row the statement was stored at.
    pub fn insert_rule(
        &mut self,
        transition: Transition,
        index: Option<usize>,
    ) -> Result<usize, TuringMachineError> {
        self.ensure_editable()?;
        let index = self.program.insert_or_replace(transition, index);
        debug!(rule = index, "statement stored");
        Ok(index)
    }

    /// Appends a reserved, empty row and returns its index.
    pub fn add_empty_slot(&mut self) -> Result<usize, TuringMachineError> {
        self.ensure_editable()?;
        Ok(self.program.insert_or_replace(Slot::Empty, None))
    }

    /// Parses `line` and stores it like [`TuringMachine::insert_rule`].
    ///
    /// On a parse error the program is not touched and the row keeps its previous value.
    pub fn edit_rule(
        &mut self,
        index: Option<usize>,
        line: &str,
    ) -> Result<usize, TuringMachineError> {
        self.ensure_editable()?;
        let transition = parse(line).inspect_err(|e| debug!(?index, error = %e, "edit rejected"))?;
        self.insert_rule(transition, index)
    }

    /// Deletes row `index`, shifting later rows up.
    pub fn remove_rule(&mut self, index: usize) -> Result<(), TuringMachineError> {
        self.ensure_editable()?;
        if !self.program.remove(index) {
            return Err(TuringMachineError::IndexOutOfBounds {
                index,
                len: self.program.len(),
            });
        }
        debug!(rule = index, "statement removed");
        Ok(())
    }

    /// Returns the current state of the Turing Machine.
    pub fn state(&self) -> &str {
        &self.state
    }

    pub fn tape(&self) -> &Tape {
        &self.tape
    }

    /// Returns the 0-based index of the cell under the head.
    pub fn head(&self) -> usize {
        self.head
    }

    pub fn running(&self) -> RunningState {
        self.running
    }

    pub fn is_halted(&self) -> bool {
        self.running == RunningState::Halted
    }

    pub fn program(&self) -> &Program {
        &self.program
    }

    /// Returns the symbol under the head, or `None` if the machine is not running.
    pub fn symbol(&self) -> Option<&str> {
        match self.running {
            RunningState::Started => self.tape.read(self.head),
            _ => None,
        }
    }

    /// Returns the statement the next `step()` will execute, and its row.
    pub fn active_rule(&self) -> Option<(&Transition, usize)> {
        let index = self.active?;
        self.program
            .get(index)
            .and_then(Slot::transition)
            .map(|t| (t, index))
    }

    /// Captures everything a host needs to render the machine.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            state: self.state.clone(),
            tape: self.tape.cells().to_vec(),
            head: self.head,
            active_rule: self.active,
            running: self.running,
        }
    }

    /// Describes the current situation and what the next step will do.
    pub fn explain(&self) -> Explanation {
        match self.running {
            RunningState::Idle => Explanation::Idle,
            RunningState::Halted => Explanation::Halted,
            RunningState::Started => Explanation::Running {
                state: self.state.clone(),
                input: self.symbol().map(str::to_string),
                rule: self.active_rule().map(|(t, i)| (t.clone(), i)),
            },
        }
    }

    /// Looks up the statement for the current state and the symbol under the head.
    fn refresh_active(&mut self) {
        self.active = self
            .symbol()
            .and_then(|symbol| self.program.lookup(&self.state, symbol))
            .map(|(_, index)| index);
    }

    fn ensure_editable(&self) -> Result<(), TuringMachineError> {
        match self.running {
            RunningState::Idle => Ok(()),
            running => Err(TuringMachineError::Locked(running)),
        }
    }
}
