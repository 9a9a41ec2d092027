use std::path::PathBuf;

use bigfact::{display, pi, FactorialRequest};
use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(version, about = "Exact factorials and fixed precision pi, timed")]
pub struct Cli {
    /// Write a Chrome trace of the run to this file
    #[arg(long, global = true, value_name = "FILE")]
    pub trace: Option<PathBuf>,

    /// Don't draw the round progress bar
    #[arg(long, global = true)]
    pub no_progress: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Cli {
    pub fn command_or_default(&self) -> Command {
        self.command
            .clone()
            .unwrap_or_else(|| Command::Factorial(FactorialArgs::default()))
    }
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Compute n! exactly, timing each round
    Factorial(FactorialArgs),
    /// Print pi at a fixed binary precision
    Pi(PiArgs),
}

#[derive(Debug, Clone, Args)]
pub struct FactorialArgs {
    /// The n in n!, `_` separators allowed
    #[arg(default_value = "100000", allow_hyphen_values = true)]
    pub n: String,

    #[arg(long, default_value_t = 5)]
    pub rounds: usize,

    /// Skip printing the exact value
    #[arg(long)]
    pub no_value: bool,

    /// Also print the value in scientific notation
    #[arg(long)]
    pub scientific: bool,

    /// Significant digits of the scientific rendering
    #[arg(long, default_value_t = display::SIGNIFICANT_DIGITS)]
    pub digits: usize,

    /// Mantissa bits used for the scientific rendering
    #[arg(long, default_value_t = display::DISPLAY_PRECISION)]
    pub float_precision: u32,

    /// Fail instead of growing the accumulator past this many bits
    #[arg(long, value_name = "BITS")]
    pub max_bits: Option<u64>,
}

impl FactorialArgs {
    pub fn request(&self) -> Result<FactorialRequest, bigfact::FactorialError> {
        self.n.parse()
    }
}

impl Default for FactorialArgs {
    fn default() -> Self {
        Self {
            n: "100000".into(),
            rounds: 5,
            no_value: false,
            scientific: false,
            digits: display::SIGNIFICANT_DIGITS,
            float_precision: display::DISPLAY_PRECISION,
            max_bits: None,
        }
    }
}

#[derive(Debug, Clone, Args)]
pub struct PiArgs {
    /// Mantissa bits
    #[arg(long, default_value_t = pi::DEFAULT_PRECISION)]
    pub precision: u32,
}
