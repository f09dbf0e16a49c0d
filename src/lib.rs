//! This crate provides the core logic for an interactive single-tape Turing Machine emulator.
//! It includes modules for parsing program statements, editing a program, and stepping a
//! machine one transition at a time, plus presentation-neutral snapshots for a host UI.

pub mod config;
pub mod machine;
pub mod parser;
pub mod program;
pub mod programs;
pub mod snapshot;
pub mod tape;
pub mod types;

/// Re-exports the `MachineConfig` struct and `parse_head` from the config module.
pub use config::{parse_head, MachineConfig};
/// Re-exports the `TuringMachine` struct from the machine module.
pub use machine::TuringMachine;
/// Re-exports the `Rule` enum from the parser module, used by the `pest` grammar.
pub use parser::Rule;
/// Re-exports the statement parsing functions from the parser module.
pub use parser::{parse, parse_program};
/// Re-exports the `Program` struct from the program module.
pub use program::Program;
/// Re-exports `Preset`, `ProgramManager`, and `PRESETS` from the programs module.
pub use programs::{Preset, ProgramManager, PRESETS};
/// Re-exports the `Snapshot` and `Explanation` types from the snapshot module.
pub use snapshot::{Explanation, Snapshot};
/// Re-exports the `Tape` struct from the tape module.
pub use tape::Tape;
/// Re-exports the statement, step, and error types from the types module.
pub use types::{Action, RunningState, Slot, Step, Transition, TuringMachineError};
