//! This module defines `MachineConfig`, the raw configuration a host collects from the
//! user before (re)building a machine: tape text, start state, and 1-based head position.

use crate::types::{TuringMachineError, DEFAULT_HEAD, DEFAULT_STATE, DEFAULT_TAPE};
use serde::{Deserialize, Serialize};

/// Raw, unvalidated machine configuration as entered by the user.
///
/// Missing fields fall back to the defaults when deserializing, so a host may send
/// only what the user changed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MachineConfig {
    /// Comma-separated tape cells, e.g. `b,b,1,1,b`.
    pub tape: String,
    /// The state to start in. Not checked against the program.
    pub state: String,
    /// 1-based index of the starting cell.
    pub head: usize,
}

impl Default for MachineConfig {
    fn default() -> Self {
        Self {
            tape: DEFAULT_TAPE.to_string(),
            state: DEFAULT_STATE.to_string(),
            head: DEFAULT_HEAD,
        }
    }
}

impl MachineConfig {
    pub fn new(tape: impl Into<String>, state: impl Into<String>, head: usize) -> Self {
        Self {
            tape: tape.into(),
            state: state.into(),
            head,
        }
    }

    /// Decodes a configuration from JSON, e.g. `{"tape": "b,1,b", "head": 2}`.
    pub fn from_json(json: &str) -> Result<Self, TuringMachineError> {
        serde_json::from_str(json).map_err(|e| TuringMachineError::ConfigError(e.to_string()))
    }

    pub fn to_json(&self) -> Result<String, TuringMachineError> {
        serde_json::to_string(self).map_err(|e| TuringMachineError::ConfigError(e.to_string()))
    }
}

/// Parses the raw head-position text of a form field.
///
/// Surrounding whitespace is ignored. The value must be a positive integer; `0`,
/// negatives and non-numbers are rejected. Whether it fits the tape is checked at build.
pub fn parse_head(raw: &str) -> Result<usize, TuringMachineError> {
    match raw.trim().parse::<usize>() {
        Ok(head) if head > 0 => Ok(head),
        _ => Err(TuringMachineError::InvalidHead(raw.to_string())),
    }
}
