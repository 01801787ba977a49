//! Transcript Scorer CLI

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use rayon::prelude::*;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use transcript_scorer::analyzer::ScoringEngine;
use transcript_scorer::config::{
    build_ignore_set, config_path_from_env, is_ignored, load_config, Config, CONFIG_FILENAME,
};
use transcript_scorer::registry::CriterionRegistry;
use transcript_scorer::reporter::{ConsoleReporter, JsonReporter};
use transcript_scorer::{server, ScoredTranscript};
use walkdir::WalkDir;

/// Path argument that reads the transcript from stdin
const STDIN_PATH: &str = "-";

/// Transcript Scorer: multi-criterion scoring for spoken transcripts
#[derive(Parser, Debug)]
#[command(name = "transcript-scorer")]
#[command(author, version, about, long_about = None)]
#[command(args_conflicts_with_subcommands = true)]
#[command(subcommand_negates_reqs = true)]
struct Args {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Transcript file, directory, or `-` for stdin (omit when using a subcommand)
    #[arg(required = true)]
    path: Option<PathBuf>,

    /// Output format as JSON
    #[arg(long, short)]
    json: bool,

    /// Minimum overall score (exit 1 if any transcript is below)
    #[arg(long, short)]
    threshold: Option<u8>,

    /// Quiet mode (one line per transcript)
    #[arg(long, short)]
    quiet: bool,

    /// Verbose output (metric labels and weights)
    #[arg(long, short)]
    verbose: bool,

    /// Path to rubric config (default: $RUBRIC_PATH, then .scorerc.json in current dir and parents)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Evaluate criteria in parallel within each transcript
    #[arg(long)]
    parallel: bool,

    /// Number of parallel threads (default: number of CPU cores)
    #[arg(long, value_name = "N")]
    jobs: Option<usize>,

    /// Log level
    #[arg(long, value_enum, default_value = "warn")]
    log_level: LogLevel,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Serve scoring requests over stdio (one JSON request per line)
    Serve {
        /// Path to rubric config
        #[arg(long)]
        config: Option<PathBuf>,

        /// Number of reports to cache (0 disables; default from config or 256)
        #[arg(long, value_name = "N")]
        cache: Option<usize>,

        /// Log level
        #[arg(long, value_enum, default_value = "warn")]
        log_level: LogLevel,
    },

    /// Create .scorerc.json with the standard rubric
    Init {
        /// Minimum score threshold (e.g. 70)
        #[arg(long)]
        threshold: Option<u8>,

        /// Directory in which to create config (default: current)
        #[arg(long)]
        dir: Option<PathBuf>,
    },
}

/// Log level for diagnostic output on stderr
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum LogLevel {
    /// No logging output
    None,
    /// Only error messages
    Error,
    /// Warning and error messages
    Warn,
    /// Info, warning, and error messages
    Info,
    /// Debug and above messages
    Debug,
    /// All messages including trace
    Trace,
}

fn init_logging(log_level: LogLevel) {
    let level = match log_level {
        LogLevel::None => return,
        LogLevel::Error => "error",
        LogLevel::Warn => "warn",
        LogLevel::Info => "info",
        LogLevel::Debug => "debug",
        LogLevel::Trace => "trace",
    };

    let env = env_logger::Env::default().filter_or("RUST_LOG", level);

    env_logger::Builder::from_env(env)
        .format_timestamp(None)
        .format_module_path(false)
        .format_target(matches!(log_level, LogLevel::Debug | LogLevel::Trace))
        .init();
}

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {:#}", "Error".red().bold(), e);
            ExitCode::from(2)
        }
    }
}

fn run() -> Result<ExitCode> {
    let args = Args::parse();

    if let Some(cmd) = args.command {
        match cmd {
            Commands::Serve {
                config,
                cache,
                log_level,
            } => {
                init_logging(log_level);
                return run_serve(config, cache);
            }
            Commands::Init { threshold, dir } => {
                return run_init(threshold, dir.as_deref());
            }
        }
    }

    init_logging(args.log_level);

    let Some(path) = args.path.clone() else {
        anyhow::bail!("A transcript path is required");
    };
    let from_stdin = path.as_os_str() == STDIN_PATH;

    // Resolve work directory for config search; an explicit config path is relative to cwd
    let cwd = std::env::current_dir().context("Failed to get current directory")?;
    let config_path = args
        .config
        .clone()
        .or_else(config_path_from_env)
        .map(|p| if p.is_absolute() { p } else { cwd.join(p) });
    let work_dir = if from_stdin {
        cwd
    } else if path.is_file() {
        path.parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or(cwd)
    } else {
        path.clone()
    };

    // Load config (CLI flags override config file)
    let config = load_config(&work_dir, config_path.as_deref())?.merge_with_cli(args.threshold);
    let registry = CriterionRegistry::from_config(&config)?;

    // Set up parallel processing
    if let Some(jobs) = args.jobs {
        rayon::ThreadPoolBuilder::new()
            .num_threads(jobs)
            .build_global()
            .context("Failed to configure thread pool")?;
    }

    let mut engine = ScoringEngine::new(registry);
    if args.parallel {
        engine = engine.parallel();
    }

    let results = if from_stdin {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("Failed to read transcript from stdin")?;
        let report = engine.evaluate(&text)?;
        let scored = ScoredTranscript {
            path: PathBuf::from("<stdin>"),
            report,
        };
        vec![scored]
    } else {
        let ignore_set = if config.ignore.is_empty() {
            None
        } else {
            Some(build_ignore_set(&config.ignore)?)
        };
        let files = collect_transcripts(
            &path,
            ignore_set.as_ref(),
            &config.get_transcript_patterns(),
        )?;
        if files.is_empty() {
            eprintln!("{}: No transcript files found", "Warning".yellow());
            return Ok(ExitCode::from(2));
        }
        score_files(&engine, &files)
    };

    // Every transcript failed
    if results.is_empty() {
        return Ok(ExitCode::from(2));
    }

    let reports: Vec<_> = results.iter().map(|r| r.report.clone()).collect();
    let stats = ScoringEngine::aggregate_stats(&reports);

    if args.json {
        let reporter = JsonReporter::new().pretty();
        if results.len() == 1 {
            println!("{}", reporter.report(&results[0].report));
        } else {
            println!("{}", reporter.report_with_summary(&results, &stats));
        }
    } else if args.quiet {
        let reporter = ConsoleReporter::new();
        for scored in &results {
            reporter.report_quiet(scored);
        }
    } else {
        let mut reporter = ConsoleReporter::new().with_registry(engine.registry());
        if args.verbose {
            reporter = reporter.verbose();
        }
        if results.len() == 1 {
            reporter.report(&results[0]);
        } else {
            reporter.report_many(&results, &stats);
        }
    }

    // Check threshold (config or CLI)
    if let Some(threshold) = config.threshold {
        let failing: Vec<&ScoredTranscript> = results
            .iter()
            .filter(|r| r.report.overall_score < threshold)
            .collect();

        if !failing.is_empty() {
            if !args.quiet && !args.json {
                for scored in &failing {
                    eprintln!(
                        "\n{}: {} scored {}, below threshold {}",
                        "Failed".red().bold(),
                        scored.path.display(),
                        scored.report.overall_score,
                        threshold
                    );
                }
            }
            return Ok(ExitCode::from(1));
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn run_serve(config: Option<PathBuf>, cache: Option<usize>) -> Result<ExitCode> {
    let cwd = std::env::current_dir().context("Failed to get current directory")?;
    let config_path = config.or_else(config_path_from_env);
    let config = load_config(&cwd, config_path.as_deref())?;
    let registry = CriterionRegistry::from_config(&config)?;

    let engine = ScoringEngine::new(registry).with_cache(cache.unwrap_or(config.cache_capacity()));
    server::run_stdio_server(&engine)?;
    Ok(ExitCode::SUCCESS)
}

fn run_init(threshold: Option<u8>, dir: Option<&Path>) -> Result<ExitCode> {
    let cwd = std::env::current_dir().context("Failed to get current directory")?;
    let dir = dir.unwrap_or(&cwd);
    let config_path = dir.join(CONFIG_FILENAME);

    if config_path.exists() {
        eprintln!(
            "{}: {} already exists; use --dir to write elsewhere or remove it first",
            "Warning".yellow(),
            config_path.display()
        );
        return Ok(ExitCode::SUCCESS);
    }

    let threshold_value = threshold.unwrap_or(70);
    let json = serde_json::to_string_pretty(&Config::starter(threshold_value))
        .context("Failed to render starter config")?;

    std::fs::write(&config_path, json + "\n")
        .with_context(|| format!("Failed to write config to {}", config_path.display()))?;

    println!(
        "{}: Created {} with threshold={}",
        "Done".green().bold(),
        config_path.display(),
        threshold_value
    );
    Ok(ExitCode::SUCCESS)
}

/// Score files in parallel; order follows `files`. Failures are printed and skipped.
fn score_files(engine: &ScoringEngine, files: &[PathBuf]) -> Vec<ScoredTranscript> {
    let outcomes: Vec<Result<ScoredTranscript>> =
        files.par_iter().map(|p| score_file(engine, p)).collect();

    let mut results = Vec::with_capacity(outcomes.len());
    for (path, outcome) in files.iter().zip(outcomes) {
        match outcome {
            Ok(scored) => results.push(scored),
            Err(e) => {
                eprintln!("{}: {}: {:#}", "Error".red().bold(), path.display(), e);
            }
        }
    }
    results
}

fn score_file(engine: &ScoringEngine, path: &Path) -> Result<ScoredTranscript> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let report = engine.evaluate(&text)?;
    Ok(ScoredTranscript {
        path: path.to_path_buf(),
        report,
    })
}

fn collect_transcripts(
    path: &Path,
    ignore_set: Option<&globset::GlobSet>,
    patterns: &[&str],
) -> Result<Vec<PathBuf>> {
    if path.is_file() {
        if let Some(set) = ignore_set {
            if is_ignored(path, set) {
                return Ok(vec![]);
            }
        }
        return Ok(vec![path.to_path_buf()]);
    }

    if !path.is_dir() {
        anyhow::bail!("Path does not exist: {}", path.display());
    }

    let mut files = Vec::new();

    for entry in WalkDir::new(path)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
    {
        let file_path = entry.path();
        if is_transcript_file(file_path, patterns) {
            if let Some(set) = ignore_set {
                if is_ignored(file_path, set) {
                    continue;
                }
            }
            files.push(file_path.to_path_buf());
        }
    }

    // Sort for consistent output
    files.sort();

    Ok(files)
}

fn is_transcript_file(path: &Path, patterns: &[&str]) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };

    // Skip hidden files such as .scorerc.json
    if name.starts_with('.') {
        return false;
    }

    patterns.iter().any(|p| name.ends_with(p))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_transcript_file() {
        let patterns = [".txt", ".md", ".transcript"];
        assert!(is_transcript_file(Path::new("talks/intro.txt"), &patterns));
        assert!(is_transcript_file(Path::new("notes.md"), &patterns));
        assert!(is_transcript_file(Path::new("call.transcript"), &patterns));
        assert!(!is_transcript_file(Path::new("audio.wav"), &patterns));
        assert!(!is_transcript_file(Path::new(".hidden.txt"), &patterns));
    }

    #[test]
    fn test_is_transcript_file_custom_patterns() {
        let patterns = [".vtt"];
        assert!(is_transcript_file(Path::new("meeting.vtt"), &patterns));
        assert!(!is_transcript_file(Path::new("meeting.txt"), &patterns));
    }
}
