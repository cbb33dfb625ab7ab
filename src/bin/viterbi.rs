//! Command-line front end for the dataset parser, the decoder and the
//! fixed-path probability functions.
//!
//! ```text
//! viterbi decode dataset.txt
//! viterbi decode --prior uniform --log-space --show-probability dataset.txt
//! viterbi path-probability path.txt --output answer.txt
//! cat outcome.txt | viterbi emission-probability -
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, Level};
use tracing_subscriber::FmtSubscriber;
use viterbi_dp::{parse, probability, DecodedPath, Model, Prior, ViterbiDecoder};

#[derive(Parser)]
#[command(name = "viterbi")]
#[command(about = "Hidden Markov model decoding and path scoring", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log level
    #[arg(short, long, value_enum, default_value = "warn", global = true)]
    log_level: LogLevel,
}

#[derive(Subcommand)]
enum Commands {
    /// Most probable hidden path for an observation sequence
    Decode {
        /// Dataset file, or `-` for stdin
        input: PathBuf,

        /// Initial state distribution
        #[arg(long, value_enum, default_value = "fixed")]
        prior: PriorKind,

        /// Probability given to every state by `--prior fixed`
        #[arg(long, default_value = "0.5")]
        fixed_prior: f64,

        /// Accumulate log-probabilities instead of probabilities
        #[arg(long)]
        log_space: bool,

        /// Also print the probability of the decoded path
        #[arg(long)]
        show_probability: bool,

        /// Write the result here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Probability of a hidden path under the transition matrix
    PathProbability {
        /// Dataset file, or `-` for stdin
        input: PathBuf,

        /// Write the result here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Probability of an observation sequence given a hidden path
    EmissionProbability {
        /// Dataset file, or `-` for stdin
        input: PathBuf,

        /// Write the result here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl From<LogLevel> for Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => Level::TRACE,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Info => Level::INFO,
            LogLevel::Warn => Level::WARN,
            LogLevel::Error => Level::ERROR,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum PriorKind {
    /// Same probability for every state (`--fixed-prior`)
    Fixed,
    /// One over the number of states
    Uniform,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::from(cli.log_level))
        .with_writer(io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("setting default tracing subscriber failed")?;

    match cli.command {
        Commands::Decode {
            input,
            prior,
            fixed_prior,
            log_space,
            show_probability,
            output,
        } => {
            let text = read_input(&input)?;
            let model = parse::parse_decoding(&text)
                .with_context(|| format!("parsing {}", input.display()))?;
            info!(
                states = model.hmm().states().len(),
                observations = model.observations().len(),
                "model loaded"
            );
            let prior = match prior {
                PriorKind::Fixed => Prior::Fixed(fixed_prior),
                PriorKind::Uniform => Prior::Uniform,
            };
            let path = decode(&model, prior, log_space)?;
            let mut out = path.render(model.hmm().states());
            if show_probability {
                out.push('\n');
                out.push_str(&path.probability().to_string());
            }
            write_output(output.as_deref(), &out)
        }
        Commands::PathProbability { input, output } => {
            let text = read_input(&input)?;
            let data = parse::parse_hidden_path(&text)
                .with_context(|| format!("parsing {}", input.display()))?;
            let p = probability::hidden_path_probability(
                &data.states,
                &data.transitions,
                &data.path,
                &Prior::Uniform,
            )?;
            write_output(output.as_deref(), &p.to_string())
        }
        Commands::EmissionProbability { input, output } => {
            let text = read_input(&input)?;
            let data = parse::parse_outcome(&text)
                .with_context(|| format!("parsing {}", input.display()))?;
            let p = probability::emission_probability(
                &data.states,
                &data.alphabet,
                &data.emissions,
                &data.path,
                data.observations.as_slice(),
            )?;
            write_output(output.as_deref(), &p.to_string())
        }
    }
}

fn decode(model: &Model, prior: Prior, log_space: bool) -> Result<DecodedPath> {
    let builder = ViterbiDecoder::builder().prior(prior);
    let path = if log_space {
        builder.log_space().build().decode(model)?
    } else {
        builder.build().decode(model)?
    };
    debug!(
        probability = path.probability(),
        log_probability = path.log_probability(),
        "decoded"
    );
    Ok(path)
}

fn read_input(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        return Ok(parse::read_text(io::stdin().lock())?);
    }
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    parse::read_text(file).with_context(|| format!("reading {}", path.display()))
}

fn write_output(path: Option<&Path>, text: &str) -> Result<()> {
    match path {
        Some(path) => {
            let mut file =
                File::create(path).with_context(|| format!("creating {}", path.display()))?;
            writeln!(file, "{text}")?;
            info!(path = %path.display(), "result written");
        }
        None => {
            let stdout = io::stdout();
            let mut lock = stdout.lock();
            writeln!(lock, "{text}")?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn log_level_is_parsed() {
        let cli = Cli::try_parse_from(["viterbi", "--log-level", "debug", "decode", "in.txt"])
            .unwrap();
        assert_eq!(Level::from(cli.log_level), Level::DEBUG);
        let cli = Cli::try_parse_from(["viterbi", "decode", "in.txt"]).unwrap();
        assert_eq!(Level::from(cli.log_level), Level::WARN);
    }

    #[test]
    fn unknown_log_level_is_rejected() {
        assert!(Cli::try_parse_from(["viterbi", "--log-level", "verbose", "decode", "in.txt"])
            .is_err());
    }
}
