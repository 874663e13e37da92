use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use gofft::bench::{
    summarize_logs, BenchmarkRunner, LogReader, Reduction, Registry, RunnerConfig,
};
use gofft::signal::{read_csv, sine, write_csv};
use gofft::{Method, Padding};
use log::info;

#[derive(Parser)]
#[command(author, version, about = "Goertzel evaluators and their benchmarks")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the registered benchmark cases and summarise their logs
    Run {
        /// Only summarise existing logs
        #[arg(long)]
        skip_bench: bool,
        /// Do not print the summary
        #[arg(long)]
        skip_plot: bool,
        /// Directory for timing logs [default: $GOFFT_LOG_DIR or bench_log]
        #[arg(long)]
        log_dir: Option<PathBuf>,
        /// Directory holding input signals [default: $GOFFT_DATA_DIR or data]
        #[arg(long)]
        data_dir: Option<PathBuf>,
        /// How repetitions are collapsed in the summary
        #[arg(long, default_value = "median")]
        reduction: Reduction,
        /// Field separator of the timing logs
        #[arg(long, default_value_t = ',')]
        delimiter: char,
    },
    /// Write a sine test signal as CSV
    Gensig {
        /// Sampling rate
        #[arg(long, default_value_t = 1000.0)]
        fs: f64,
        /// Target frequency
        #[arg(long, default_value_t = 60.0)]
        ft: f64,
        /// Duration in seconds; signal length is T*fs
        #[arg(short = 'T', default_value_t = 100.0)]
        duration: f64,
        /// Output file [default: <data dir>/new_sig.csv]
        #[arg(short = 'f')]
        file: Option<PathBuf>,
    },
    /// Evaluate target frequencies of a CSV signal
    Eval {
        /// Headerless CSV signal file
        file: PathBuf,
        /// Sampling rate
        #[arg(long)]
        fs: f64,
        /// Target frequencies
        #[arg(long, num_args = 1.., required = true)]
        ft: Vec<f64>,
        /// Block width in samples [default: fs]
        #[arg(long)]
        width: Option<usize>,
        /// go, gom, stgo, stgom, fft or stft
        #[arg(long, default_value = "gom")]
        method: Method,
        /// Zero-pad a trailing partial block instead of dropping it
        #[arg(long)]
        padding: bool,
        /// Column to read from the file
        #[arg(long, default_value_t = 0)]
        column: usize,
    },
}

fn run(
    skip_bench: bool,
    skip_plot: bool,
    log_dir: Option<PathBuf>,
    data_dir: Option<PathBuf>,
    reduction: Reduction,
    delimiter: char,
) -> Result<()> {
    let mut cfg = RunnerConfig::from_env();
    cfg.delimiter = delimiter;
    if let Some(dir) = log_dir {
        cfg.log_dir = dir;
    }
    if let Some(dir) = data_dir {
        cfg.data_dir = dir;
    }
    let registry = Registry::with_builtin(cfg.discovery.clone());

    if !skip_bench {
        let mut suite = registry.discover("");
        info!("discovered {} benchmark cases", suite.len());
        let mut runner = BenchmarkRunner::new(&cfg);
        for report in runner.run_benchmark_suite(&mut suite)? {
            println!("{}", report.name);
        }
    }

    if !skip_plot {
        let reader = LogReader::with_delimiter(cfg.delimiter);
        for unit in registry.units() {
            for type_name in unit.type_names() {
                let series = summarize_logs(
                    &reader,
                    &cfg.log_dir,
                    type_name,
                    &cfg.discovery.method_prefix,
                    reduction,
                )
                .with_context(|| format!("summarising logs in {}", cfg.log_dir.display()))?;
                for s in series {
                    println!("# {type_name} {}", s.algorithm);
                    for (len, value) in s.lengths.iter().zip(s.values.iter()) {
                        println!("{len}\t{value:e}");
                    }
                }
            }
        }
    }
    Ok(())
}

fn gensig(fs: f64, ft: f64, duration: f64, file: Option<PathBuf>) -> Result<()> {
    let path = file.unwrap_or_else(|| RunnerConfig::from_env().data_dir.join("new_sig.csv"));
    let signal = sine(duration, fs, ft);
    write_csv(&path, &signal).with_context(|| format!("writing {}", path.display()))?;
    info!("{} samples written", signal.len());
    println!("{}", path.display());
    Ok(())
}

fn eval(
    file: PathBuf,
    fs: f64,
    ft: Vec<f64>,
    width: Option<usize>,
    method: Method,
    padding: bool,
    column: usize,
) -> Result<()> {
    let signal = read_csv(&file, column).with_context(|| format!("reading {}", file.display()))?;
    let width = width.unwrap_or(fs.round() as usize);
    let mags = method.evaluate(&signal, fs, &ft, width, Padding::from_flag(padding))?;
    for (f, m) in ft.iter().zip(mags.iter()) {
        println!("{f}\t{m}");
    }
    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();
    match cli.command {
        Commands::Run {
            skip_bench,
            skip_plot,
            log_dir,
            data_dir,
            reduction,
            delimiter,
        } => run(skip_bench, skip_plot, log_dir, data_dir, reduction, delimiter),
        Commands::Gensig {
            fs,
            ft,
            duration,
            file,
        } => gensig(fs, ft, duration, file),
        Commands::Eval {
            file,
            fs,
            ft,
            width,
            method,
            padding,
            column,
        } => eval(file, fs, ft, width, method, padding, column),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_eval_command() {
        let cli = Cli::parse_from([
            "gofft", "eval", "sig.csv", "--fs", "1000", "--ft", "50", "60", "--method", "stgo",
        ]);
        match cli.command {
            Commands::Eval {
                ft, method, width, ..
            } => {
                assert_eq!(ft, vec![50.0, 60.0]);
                assert_eq!(method, Method::ShortTimeGoertzel);
                assert_eq!(width, None);
            }
            _ => panic!("parsed wrong command"),
        }
    }

    #[test]
    fn parse_run_delimiter() {
        let cli = Cli::parse_from(["gofft", "run", "--skip-bench", "--delimiter", ";"]);
        match cli.command {
            Commands::Run {
                delimiter,
                skip_bench,
                ..
            } => {
                assert_eq!(delimiter, ';');
                assert!(skip_bench);
            }
            _ => panic!("parsed wrong command"),
        }
    }

    #[test]
    fn unknown_method_is_rejected() {
        assert!(Cli::try_parse_from([
            "gofft", "eval", "sig.csv", "--fs", "1000", "--ft", "60", "--method", "dft",
        ])
        .is_err());
    }
}
