use std::{
    io::{self, Write},
    process::ExitCode,
};

use bigfact::{
    display::Scientific, pi, FactorialEngine, FactorialError, FactorialRequest, TimingSummary,
};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use rug::Integer;
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::{Cli, Command, FactorialArgs, PiArgs};

mod cli;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Factorial(#[from] FactorialError),
    #[error("bad progress template: {0}")]
    Template(#[from] indicatif::style::TemplateError),
    #[error("writing output: {0}")]
    Io(#[from] io::Error),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // dropping the guard flushes the trace file
    let _chrome_guard = init_tracing(&cli);

    let result = match cli.command_or_default() {
        Command::Factorial(args) => run_factorial(&args, !cli.no_progress),
        Command::Pi(args) => run_pi(&args),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(%err, "run failed");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(cli: &Cli) -> Option<tracing_chrome::FlushGuard> {
    let (chrome_layer, guard) = match &cli.trace {
        Some(path) => {
            let (layer, guard) = tracing_chrome::ChromeLayerBuilder::new()
                .file(path)
                .include_args(true)
                .build();
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr).with_filter(filter))
        .with(chrome_layer)
        .init();

    guard
}

fn progress_bar(rounds: usize, visible: bool) -> Result<ProgressBar, CliError> {
    if !visible {
        return Ok(ProgressBar::hidden());
    }

    let bar = ProgressBar::new(rounds as u64);
    bar.set_style(ProgressStyle::with_template(
        "{spinner} [{elapsed_precise}] {bar:30} {pos}/{len} rounds {msg}",
    )?);
    Ok(bar)
}

fn run_factorial(args: &FactorialArgs, show_progress: bool) -> Result<(), CliError> {
    let request: FactorialRequest = args.request()?;
    let n = request.n();

    let mut engine = FactorialEngine::<Integer>::new();
    if let Some(bits) = args.max_bits {
        engine = engine.with_max_bits(bits);
    }

    let bar = progress_bar(args.rounds, show_progress)?;
    let mut stdout = io::stdout().lock();
    let mut write_err = None;

    let samples = engine.bench(request, args.rounds, |round, sample| {
        let secs = sample.elapsed_secs();
        bar.suspend(|| {
            if let Err(err) = writeln!(
                stdout,
                "Round {round} time taken to calculate {n}! is {secs:.6} seconds."
            ) {
                write_err.get_or_insert(err);
            }
        });
        bar.inc(1);
    });
    bar.finish_and_clear();

    let samples = samples?;
    if let Some(err) = write_err {
        return Err(err.into());
    }

    if let Some(summary) = TimingSummary::from_samples(&samples) {
        info!(
            rounds = summary.rounds,
            min = summary.min,
            mean = summary.mean,
            max = summary.max,
            "benchmark finished"
        );
    }

    // with zero rounds there is nothing to print
    let Some((_, value)) = engine.result() else {
        return Ok(());
    };

    if !args.no_value {
        writeln!(stdout, "The factorial of {n} is {value}")?;
    }
    if args.scientific {
        let sci = Scientific::from_integer(value, args.float_precision, args.digits)?;
        writeln!(stdout, "The factorial of {n} is approximately {sci}")?;
    }

    Ok(())
}

fn run_pi(args: &PiArgs) -> Result<(), CliError> {
    let value = pi::pi(args.precision)?;

    let mut stdout = io::stdout().lock();
    writeln!(stdout, "Pi with {}-bit precision:", args.precision)?;
    writeln!(stdout, "{}", pi::format_pi(&value))?;

    Ok(())
}
