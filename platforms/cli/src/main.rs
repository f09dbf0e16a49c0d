use anyhow::{Context, Result};
use clap::Parser;
use std::io::{self, Read};
use tmstep::{
    parse, parse_head, parse_program, MachineConfig, Preset, Program, ProgramManager, Step,
    TuringMachine,
};
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
#[clap(after_help = "EXAMPLES:
  tm-cli --debug
  tm-cli --tape 1,1,0,b --state q0 --head 1 --rule 'q0 1 : q0 0 R' --rule 'q0 0 : q0 1 R' --rule 'q0 b : q0 b H'
  cat program.txt | tm-cli --tape b,1,1,b --head 2")]
struct Cli {
    /// Comma-separated initial tape, e.g. b,1,1,b
    #[clap(short, long)]
    tape: Option<String>,

    /// The state the machine starts in
    #[clap(short, long)]
    state: Option<String>,

    /// 1-based index of the starting cell
    #[clap(long)]
    head: Option<String>,

    /// A program statement such as 'Q0 1 : Q1 X L'; repeat for more rows
    #[clap(short, long = "rule")]
    rules: Vec<String>,

    /// Run a built-in program, by name or by its index in --list-presets
    #[clap(short, long, conflicts_with = "rules")]
    preset: Option<String>,

    /// List the built-in programs and exit
    #[clap(long)]
    list_presets: bool,

    /// Print each step of the execution
    #[clap(short = 'd', long)]
    debug: bool,

    /// Print each step as a JSON snapshot
    #[clap(long)]
    json: bool,

    /// Stop after this many steps if the machine has not halted
    #[clap(long, default_value_t = 10_000)]
    max_steps: usize,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(log_filter(std::env::var("RUST_LOG").ok().as_deref()))
        .init();

    let cli = Cli::parse();

    if cli.list_presets {
        for index in 0..ProgramManager::count() {
            let preset = ProgramManager::get_by_index(index)?;
            println!("{index:>2}  {:<16} {}", preset.name, preset.description);
        }
        return Ok(());
    }

    let (program, mut config) = load_program(&cli)?;

    if let Some(tape) = &cli.tape {
        config.tape = tape.clone();
    }
    if let Some(state) = &cli.state {
        config.state = state.clone();
    }
    if let Some(head) = &cli.head {
        config.head = parse_head(head)?;
    }

    let mut machine = TuringMachine::new(program);
    machine
        .build_from(&config)
        .with_context(|| format!("Failed to start machine with tape '{}'", config.tape))?;

    print_step(&cli, &machine)?;

    let mut steps = 0;
    loop {
        if steps == cli.max_steps {
            warn!(steps, "step limit reached before the machine halted");
            break;
        }

        match machine.step()? {
            Step::Continue => print_step(&cli, &machine)?,
            Step::Halt => {
                print_step(&cli, &machine)?;
                if cli.debug {
                    println!("\nMachine halted.");
                }
                break;
            }
            Step::Skipped => {
                if cli.debug {
                    println!("\nNo statement matches; machine stopped.");
                }
                break;
            }
        }
        steps += 1;
    }

    if cli.debug {
        println!("\nFinal tape:");
    }
    println!("{}", machine.tape());

    Ok(())
}

/// Uses `RUST_LOG` as given, or only warnings when it is unset or unparsable.
fn log_filter(directives: Option<&str>) -> EnvFilter {
    directives
        .filter(|d| !d.trim().is_empty())
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new("warn"))
}

fn find_preset(key: &str) -> Result<&'static Preset> {
    ProgramManager::find(key).with_context(|| {
        format!(
            "Unknown program '{key}' (available: {})",
            ProgramManager::list_names().join(", ")
        )
    })
}

/// Parses piped statements; blank input runs the default preset instead of an empty program.
fn stdin_program(buffer: &str) -> Result<(Program, MachineConfig)> {
    if buffer.trim().is_empty() {
        debug!("stdin is blank, falling back to the default program");
        let preset = ProgramManager::default_preset()?;
        return Ok((preset.program.clone(), preset.config.clone()));
    }

    Ok((parse_program(buffer)?, MachineConfig::default()))
}

/// Picks the program to run: explicit statements, a preset, statements piped on
/// stdin, or the default preset, in that order.
fn load_program(cli: &Cli) -> Result<(Program, MachineConfig)> {
    if !cli.rules.is_empty() {
        let program = cli
            .rules
            .iter()
            .map(|line| parse(line).with_context(|| format!("Invalid statement '{line}'")))
            .collect::<Result<Program>>()?;
        return Ok((program, MachineConfig::default()));
    }

    if let Some(key) = &cli.preset {
        let preset = find_preset(key)?;
        return Ok((preset.program.clone(), preset.config.clone()));
    }

    if atty::isnt(atty::Stream::Stdin) {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .context("Failed to read from stdin")?;
        return stdin_program(&buffer);
    }

    let preset = ProgramManager::default_preset()?;
    Ok((preset.program.clone(), preset.config.clone()))
}

fn print_step(cli: &Cli, machine: &TuringMachine) -> Result<()> {
    let snapshot = machine.snapshot();

    if cli.json {
        println!("{}", serde_json::to_string(&snapshot)?);
    } else if cli.debug {
        println!(
            "State: {:<8} Tape: {}",
            snapshot.state,
            snapshot.tape_line()
        );
        println!("  {}", machine.explain());
    }

    Ok(())
}
