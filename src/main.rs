//! postcheck: AI-detection risk checker CLI

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use postcheck::analyzer::{DetectionEngine, ScoringProfile};
use postcheck::config::{
    build_ignore_set, is_ignored, load_config, starter_config, Config, CONFIG_FILENAME,
};
use postcheck::history::{find_project_root, load_history, record_run, report_delta};
use postcheck::humanize::{self, offer_apply, HumanizePrompt, Platform, Tone};
use postcheck::reporter::{ConsoleReporter, JsonReporter};
use postcheck::watcher::DraftWatcher;
use postcheck::{DetectionResult, FileReport};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use walkdir::WalkDir;

/// postcheck: how AI-generated does this post sound?
#[derive(Parser, Debug)]
#[command(name = "postcheck")]
#[command(author, version, about, long_about = None)]
#[command(args_conflicts_with_subcommands = true, subcommand_negates_reqs = true)]
struct Args {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Draft file or directory to check, or - for stdin
    #[arg(required_unless_present = "text")]
    path: Option<PathBuf>,

    /// Check this text instead of a file
    #[arg(long, conflicts_with = "path")]
    text: Option<String>,

    /// Output format as JSON
    #[arg(long, short)]
    json: bool,

    /// Exit 1 when the risk score is at or above N
    #[arg(long, short, value_parser = clap::value_parser!(u8).range(0..=100))]
    threshold: Option<u8>,

    /// Scoring profile: standard or basic
    #[arg(long, value_name = "PROFILE")]
    profile: Option<ScoringProfile>,

    /// Quiet mode (one line per file)
    #[arg(long, short)]
    quiet: bool,

    /// Verbose output (per-rule points, all signals, debug logging)
    #[arg(long, short)]
    verbose: bool,

    /// Path to config file (default: search .postcheckrc.json in current dir and parents)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Watch for file changes and re-check
    #[arg(long)]
    watch: bool,

    /// Score files in parallel (default for more than 10 files)
    #[arg(long)]
    parallel: bool,

    /// Number of parallel threads (default: number of CPU cores)
    #[arg(long, value_name = "N")]
    jobs: Option<usize>,

    /// Don't record this run in .postcheck-history.json
    #[arg(long)]
    no_history: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run MCP server for Claude/Cursor (stdio JSON-RPC)
    Mcp,

    /// Create .postcheckrc.json with sensible defaults
    Init {
        /// Risk threshold to fail at (default 40)
        #[arg(long, value_parser = clap::value_parser!(u8).range(0..=100))]
        threshold: Option<u8>,

        /// Scoring profile: standard or basic
        #[arg(long)]
        profile: Option<ScoringProfile>,

        /// Directory in which to create config (default: current)
        #[arg(long)]
        dir: Option<PathBuf>,
    },

    /// Rewrite a draft to sound more human and compare scores
    Humanize {
        /// Draft file, or - for stdin
        path: PathBuf,

        /// Target platform: twitter, linkedin, threads, instagram, tiktok, generic
        #[arg(long, default_value = "generic")]
        platform: Platform,

        /// Voice: casual, professional, witty, bold
        #[arg(long, default_value = "casual")]
        tone: Tone,

        /// Offer to write the rewrite back to the file (prompts for confirmation)
        #[arg(long)]
        apply: bool,

        /// Output format as JSON
        #[arg(long, short)]
        json: bool,

        /// Path to config file
        #[arg(long)]
        config: Option<PathBuf>,
    },
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

fn init_tracing(verbose: bool) {
    let default_directive = if verbose { "postcheck=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn run() -> Result<ExitCode> {
    let args = Args::parse();
    init_tracing(args.verbose);

    if let Some(cmd) = args.command {
        return match cmd {
            Commands::Mcp => postcheck::mcp::run_mcp_server().map(|_| ExitCode::SUCCESS),
            Commands::Init {
                threshold,
                profile,
                dir,
            } => run_init(threshold, profile, dir.as_deref()),
            Commands::Humanize {
                path,
                platform,
                tone,
                apply,
                json,
                config,
            } => run_humanize(&path, platform, tone, apply, json, config.as_deref()),
        };
    }

    if let Some(text) = args.text.as_deref() {
        let cwd = std::env::current_dir().context("Failed to get current directory")?;
        let config = load_run_config(&cwd, &args)?;
        return check_single("text", text, &config, &args);
    }

    let Some(path) = args.path.clone() else {
        anyhow::bail!("Nothing to check: pass a path, - for stdin, or --text");
    };

    if is_stdin(&path) {
        let content = read_stdin()?;
        let cwd = std::env::current_dir().context("Failed to get current directory")?;
        let config = load_run_config(&cwd, &args)?;
        return check_single("stdin", &content, &config, &args);
    }

    if args.watch {
        return run_watch(&args, &path);
    }

    let work_dir = work_dir_for(&path);
    let config = load_run_config(work_dir, &args)?;

    let ignore_set = if config.ignore.is_empty() {
        None
    } else {
        Some(build_ignore_set(&config.ignore)?)
    };

    let extensions = config.get_extensions();
    let drafts = collect_drafts(&path, ignore_set.as_ref(), &extensions)?;
    if drafts.is_empty() {
        eprintln!("{}: No draft files found", "Warning".yellow());
        return Ok(ExitCode::from(2));
    }

    if let Some(jobs) = args.jobs {
        rayon::ThreadPoolBuilder::new()
            .num_threads(jobs)
            .build_global()
            .ok();
    }

    let engine = build_engine(&config, args.verbose);
    let use_parallel = args.parallel || drafts.len() > 10;
    let (reports, had_errors) = if use_parallel {
        score_files_parallel(&engine, &drafts, &config, args.quiet)
    } else {
        score_files_sequential(&engine, &drafts, &config, args.quiet)
    };

    if reports.is_empty() {
        eprintln!("{}: All files failed to score", "Error".red());
        return Ok(ExitCode::from(2));
    }

    let stats = DetectionEngine::aggregate_stats(&reports);

    if args.json {
        let reporter = JsonReporter::new().pretty();
        if reports.len() == 1 {
            println!("{}", reporter.report(&reports[0]));
        } else {
            println!("{}", reporter.report_with_summary(&reports, &stats));
        }
    } else if args.quiet {
        let reporter = ConsoleReporter::new();
        let history = find_project_root(work_dir).map(|root| load_history(&root));
        for report in &reports {
            let delta = history
                .as_ref()
                .map(|h| report_delta(h, report))
                .unwrap_or_default();
            reporter.report_quiet(&report.file_path.display().to_string(), &report.result, &delta);
        }
    } else {
        let mut reporter = ConsoleReporter::new();
        if args.verbose {
            reporter = reporter.verbose();
        }
        if reports.len() == 1 {
            reporter.report_file(&reports[0]);
        } else {
            reporter.report_many(&reports, &stats);
        }
    }

    if !args.no_history {
        if let Some(root) = record_run(work_dir, &reports) {
            tracing::debug!("history updated in {}", root.display());
        }
    }

    // A single file honors its per-path threshold override
    let (risk, threshold) = if reports.len() == 1 {
        let threshold = config.effective_for_file(&reports[0].file_path).threshold;
        (reports[0].result.risk_score, threshold)
    } else {
        (stats.average_risk, config.threshold)
    };
    if exceeds_threshold(risk, threshold, &args) {
        return Ok(ExitCode::from(1));
    }

    if had_errors {
        Ok(ExitCode::from(2))
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

fn is_stdin(path: &Path) -> bool {
    path.as_os_str() == "-"
}

fn read_stdin() -> Result<String> {
    std::io::read_to_string(std::io::stdin()).context("Failed to read stdin")
}

fn work_dir_for(path: &Path) -> &Path {
    if path.is_file() {
        match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        }
    } else {
        path
    }
}

/// Config file plus CLI flags (CLI wins)
fn load_run_config(work_dir: &Path, args: &Args) -> Result<Config> {
    Ok(load_config(work_dir, args.config.as_deref())?.merge_with_cli(args.threshold, args.profile))
}

fn build_engine(config: &Config, verbose: bool) -> DetectionEngine {
    let engine = DetectionEngine::from_config(config);
    if verbose {
        engine.with_breakdown()
    } else {
        engine
    }
}

/// Score one in-memory text (stdin or --text). No history is kept for these.
fn check_single(source: &str, content: &str, config: &Config, args: &Args) -> Result<ExitCode> {
    let engine = build_engine(config, args.verbose);
    let result = engine.score(content);
    print_single(source, &result, args);

    if exceeds_threshold(result.risk_score, config.threshold, args) {
        return Ok(ExitCode::from(1));
    }
    Ok(ExitCode::SUCCESS)
}

fn print_single(source: &str, result: &DetectionResult, args: &Args) {
    if args.json {
        println!("{}", JsonReporter::new().pretty().report(result));
    } else if args.quiet {
        ConsoleReporter::new().report_quiet(source, result, "");
    } else {
        let mut reporter = ConsoleReporter::new();
        if args.verbose {
            reporter = reporter.verbose();
        }
        reporter.report(source, result);
    }
}

fn exceeds_threshold(risk: u8, threshold: Option<u8>, args: &Args) -> bool {
    let Some(threshold) = threshold else {
        return false;
    };
    if risk < threshold {
        return false;
    }
    if !args.quiet && !args.json {
        eprintln!(
            "\n{}: Risk {} is at or above threshold {}",
            "Failed".red().bold(),
            risk,
            threshold
        );
    }
    true
}

fn run_init(
    threshold: Option<u8>,
    profile: Option<ScoringProfile>,
    dir: Option<&Path>,
) -> Result<ExitCode> {
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

    let threshold_value = threshold.unwrap_or(40);
    let profile_value = profile.unwrap_or_default();

    std::fs::write(&config_path, starter_config(threshold_value, profile_value))
        .with_context(|| format!("Failed to write config to {}", config_path.display()))?;

    println!(
        "{}: Created {} with threshold={}, profile={}",
        "Done".green().bold(),
        config_path.display(),
        threshold_value,
        profile_value
    );
    Ok(ExitCode::SUCCESS)
}

fn run_humanize(
    path: &Path,
    platform: Platform,
    tone: Tone,
    apply: bool,
    json: bool,
    config_path: Option<&Path>,
) -> Result<ExitCode> {
    let (content, work_dir) = if is_stdin(path) {
        let cwd = std::env::current_dir().context("Failed to get current directory")?;
        (read_stdin()?, cwd)
    } else {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        (content, work_dir_for(path).to_path_buf())
    };

    let config = load_config(&work_dir, config_path)?;
    let engine = DetectionEngine::from_config(&config);

    let Some(rewriter) = humanize::rewriter_from_env() else {
        let before = engine.score(&content);
        let prompt = HumanizePrompt::build(&content, platform, tone, &before);
        if json {
            let out = serde_json::json!({ "prompt": prompt, "before": before });
            println!("{}", serde_json::to_string_pretty(&out)?);
        } else {
            eprintln!(
                "{}: No rewriter configured. To rewrite automatically, either:",
                "Info".blue()
            );
            eprintln!("  1. Set ANTHROPIC_API_KEY (build with --features ai)");
            eprintln!(
                "  2. Set {} to a command that reads a prompt on stdin",
                humanize::REWRITE_CMD_ENV
            );
            eprintln!("\nShowing prompt instead:\n");
            println!("{}", "═".repeat(60));
            println!("{}", "Rewrite Prompt:".bold());
            println!("{}", "═".repeat(60));
            println!("{}", prompt);
        }
        return Ok(ExitCode::SUCCESS);
    };

    if !json {
        eprintln!("{}: Rewriting for {} ({})...", "AI".cyan().bold(), platform, tone);
    }
    let report = humanize::humanize(&engine, &content, platform, tone, rewriter.as_ref())?;

    if json {
        println!("{}", JsonReporter::new().pretty().report(&report));
    } else {
        ConsoleReporter::new().report_humanize(&report);
    }

    if apply {
        if is_stdin(path) {
            eprintln!("{}: --apply needs a file path, not stdin", "Warning".yellow());
        } else if report.improvement <= 0 {
            eprintln!("{}: Rewrite didn't lower the risk; not offering to apply", "Info".blue());
        } else {
            offer_apply(path, &content, &report.rewritten)
                .with_context(|| format!("Failed to apply rewrite to {}", path.display()))?;
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn run_watch(args: &Args, path: &Path) -> Result<ExitCode> {
    let work_dir = work_dir_for(path);
    let config = load_run_config(work_dir, args)?;
    let ignore_set = if config.ignore.is_empty() {
        None
    } else {
        Some(build_ignore_set(&config.ignore)?)
    };
    let engine = build_engine(&config, args.verbose);

    let watcher = DraftWatcher::watch_with_extensions(path, &config.get_extensions())
        .context("Failed to create file watcher")?;
    eprintln!("{}: Watching for changes... (Ctrl+C to stop)", "Info".blue());

    loop {
        let paths = watcher.next_changes();
        let changed = paths.into_iter().filter(|p| {
            ignore_set
                .as_ref()
                .map(|set| !is_ignored(p, set))
                .unwrap_or(true)
        });
        for draft in changed {
            match engine.score_file(&draft, Some(&config)) {
                Ok(report) => {
                    let source = report.file_path.display().to_string();
                    if args.quiet {
                        ConsoleReporter::new().report_quiet(&source, &report.result, "");
                    } else {
                        print_single(&source, &report.result, args);
                    }
                }
                Err(e) => {
                    eprintln!("{}: {}: {:#}", "Error".red(), draft.display(), e);
                }
            }
        }
    }
}

fn collect_drafts(
    path: &Path,
    ignore_set: Option<&globset::GlobSet>,
    extensions: &[String],
) -> Result<Vec<PathBuf>> {
    if path.is_file() {
        if let Some(set) = ignore_set {
            if is_ignored(path, set) {
                return Ok(vec![]);
            }
        }
        // An explicit file is checked whatever its extension
        return Ok(vec![path.to_path_buf()]);
    }

    if !path.is_dir() {
        anyhow::bail!("Path does not exist: {}", path.display());
    }

    let mut files: Vec<PathBuf> = WalkDir::new(path)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| DraftWatcher::is_draft_file(p, extensions))
        .filter(|p| ignore_set.map(|set| !is_ignored(p, set)).unwrap_or(true))
        .collect();

    // Sort for consistent output
    files.sort();
    Ok(files)
}

fn report_failure(file: &Path, e: &anyhow::Error, quiet: bool) {
    if !quiet {
        eprintln!("{}: Failed to score {}: {:#}", "Error".red(), file.display(), e);
    }
}

fn score_files_sequential(
    engine: &DetectionEngine,
    files: &[PathBuf],
    config: &Config,
    quiet: bool,
) -> (Vec<FileReport>, bool) {
    let mut reports = Vec::new();
    let mut had_errors = false;

    for (file, outcome) in files.iter().zip(engine.score_many(files, Some(config))) {
        match outcome {
            Ok(report) => reports.push(report),
            Err(e) => {
                report_failure(file, &e, quiet);
                had_errors = true;
            }
        }
    }

    (reports, had_errors)
}

fn score_files_parallel(
    engine: &DetectionEngine,
    files: &[PathBuf],
    config: &Config,
    quiet: bool,
) -> (Vec<FileReport>, bool) {
    use rayon::prelude::*;
    use std::sync::atomic::{AtomicBool, Ordering};

    let had_errors = AtomicBool::new(false);

    // par_iter over a slice keeps input order in the collected Vec
    let reports: Vec<FileReport> = files
        .par_iter()
        .filter_map(|file| match engine.score_file(file, Some(config)) {
            Ok(report) => Some(report),
            Err(e) => {
                had_errors.store(true, Ordering::Relaxed);
                report_failure(file, &e, quiet);
                None
            }
        })
        .collect();

    (reports, had_errors.load(Ordering::Relaxed))
}
