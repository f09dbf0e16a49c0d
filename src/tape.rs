//! This module defines the `Tape`, a fixed-length row of symbol cells.

use crate::types::{TuringMachineError, TAPE_SEPARATOR};
use serde::{Deserialize, Serialize};
use std::{convert::Infallible, fmt, str::FromStr};

/// A linear array of symbols sized to the user's input.
///
/// The tape never grows: reads past either end return `None` and writes fail with
/// `TuringMachineError::TapeBoundary`. Head position is tracked by the machine.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tape {
    cells: Vec<String>,
}

impl Tape {
    pub fn new(cells: Vec<String>) -> Self {
        Self { cells }
    }

    /// Splits raw tape text on commas. Every piece, including empty ones, is a cell.
    pub fn parse(raw: &str) -> Self {
        Self {
            cells: raw.split(TAPE_SEPARATOR).map(str::to_string).collect(),
        }
    }

    /// Returns the symbol at `position`, or `None` past the end of the tape.
    pub fn read(&self, position: usize) -> Option<&str> {
        self.cells.get(position).map(String::as_str)
    }

    /// Overwrites the cell at `position` in place.
    ///
    /// # Returns
    ///
    /// * `Ok(())` if the cell exists.
    /// * `Err(TuringMachineError::TapeBoundary)` if `position` is past the end.
    pub fn write(
        &mut self,
        position: usize,
        symbol: impl Into<String>,
    ) -> Result<(), TuringMachineError> {
        let cell = self
            .cells
            .get_mut(position)
            .ok_or(TuringMachineError::TapeBoundary(position))?;
        *cell = symbol.into();
        Ok(())
    }

    /// Joins all cells with commas; the inverse of `Tape::parse`.
    pub fn serialize(&self) -> String {
        self.cells.join(&TAPE_SEPARATOR.to_string())
    }

    pub fn cells(&self) -> &[String] {
        &self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl FromStr for Tape {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Tape::parse(s))
    }
}

impl fmt::Display for Tape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.serialize())
    }
}
