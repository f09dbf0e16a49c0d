use crate::{
    config::MachineConfig,
    machine::TuringMachine,
    parser::parse_program,
    program::Program,
    types::{TuringMachineError, DEFAULT_HEAD, DEFAULT_STATE, DEFAULT_TAPE},
};
use tracing::error;

// Default embedded programs: (name, description, tape, state, head, statements)
const PRESET_SOURCES: [(&str, &str, &str, &str, usize, &str); 2] = [
    (
        "Unary Doubler",
        "Doubles a run of 1s by marking each one and writing a partner to its left",
        DEFAULT_TAPE,
        DEFAULT_STATE,
        DEFAULT_HEAD,
        include_str!("../programs/unary-doubler.tm"),
    ),
    (
        "Bit Flipper",
        "Inverts every bit between two blanks, then halts",
        "b,1,0,1,1,b",
        "scan",
        2,
        include_str!("../programs/bit-flipper.tm"),
    ),
];

lazy_static::lazy_static! {
    pub static ref PRESETS: Vec<Preset> = load();
}

/// A built-in program together with the configuration it is meant to run from.
#[derive(Debug, Clone)]
pub struct Preset {
    pub name: &'static str,
    pub description: &'static str,
    pub config: MachineConfig,
    pub program: Program,
    /// The statements as written, one per line.
    pub text: &'static str,
}

impl Preset {
    /// Returns a machine loaded with this preset's program and started from its configuration.
    pub fn start(&self) -> Result<TuringMachine, TuringMachineError> {
        let mut machine = TuringMachine::new(self.program.clone());
        machine.build_from(&self.config)?;
        Ok(machine)
    }
}

fn load() -> Vec<Preset> {
    PRESET_SOURCES
        .iter()
        .filter_map(|&(name, description, tape, state, head, text)| {
            match parse_program(text) {
                Ok(program) => Some(Preset {
                    name,
                    description,
                    config: MachineConfig::new(tape, state, head),
                    program,
                    text,
                }),
                Err(e) => {
                    error!(preset = name, error = %e, "failed to parse built-in program");
                    None
                }
            }
        })
        .collect()
}

pub struct ProgramManager;

impl ProgramManager {
    /// Get the number of available programs
    pub fn count() -> usize {
        PRESETS.len()
    }

    /// The program a fresh session opens with
    pub fn default_preset() -> Result<&'static Preset, TuringMachineError> {
        Self::get_by_index(0)
    }

    /// Get a program by its index
    pub fn get_by_index(index: usize) -> Result<&'static Preset, TuringMachineError> {
        PRESETS
            .get(index)
            .ok_or_else(|| TuringMachineError::PresetNotFound(format!("#{index}")))
    }

    /// Get a program by its name, ignoring case
    pub fn get_by_name(name: &str) -> Result<&'static Preset, TuringMachineError> {
        PRESETS
            .iter()
            .find(|preset| preset.name.eq_ignore_ascii_case(name))
            .ok_or_else(|| TuringMachineError::PresetNotFound(name.to_string()))
    }

    /// List all program names
    pub fn list_names() -> Vec<&'static str> {
        PRESETS.iter().map(|preset| preset.name).collect()
    }

    /// Get a program by its 0-based index or, failing that, by its name
    pub fn find(key: &str) -> Result<&'static Preset, TuringMachineError> {
        match key.trim().parse::<usize>() {
            Ok(index) => Self::get_by_index(index),
            Err(_) => Self::get_by_name(key.trim()),
        }
    }
}
