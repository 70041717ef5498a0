//! The `check` command: verify a corpus of fragments, report results.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use tsv_fragment::CheckOptions;

use super::UsageError;
use crate::adapter::{SharedContext, TscChecker};
use crate::verify::{render_json, render_text, Verifier, VerifyConfig, XFailSet, DEFAULT_TOLERANCE};

/// Environment variable naming the compiler executable.
pub const TSC_ENV: &str = "TSV_TSC";

/// Report format.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for OutputFormat {
    type Err = UsageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(UsageError::InvalidValue {
                option: "--format",
                value: s.to_string(),
            }),
        }
    }
}

/// Parsed `tsv check` arguments.
#[derive(Clone, Debug)]
pub struct CheckArgs {
    /// Fragment file or corpus directory.
    pub path: PathBuf,
    /// Compiler executable; falls back to `TSV_TSC`, then `tsc`.
    pub tsc: Option<PathBuf>,
    pub shared: Vec<PathBuf>,
    pub options: CheckOptions,
    pub timeout: Duration,
    pub tolerance: u32,
    pub jobs: Option<usize>,
    pub parallel: bool,
    pub format: OutputFormat,
    pub filter: Option<String>,
    pub xfail: Option<PathBuf>,
    pub verbose: bool,
}

impl Default for CheckArgs {
    fn default() -> Self {
        CheckArgs {
            path: PathBuf::from("."),
            tsc: None,
            shared: Vec::new(),
            options: CheckOptions::defaults(),
            timeout: TscChecker::DEFAULT_TIMEOUT,
            tolerance: DEFAULT_TOLERANCE,
            jobs: None,
            parallel: true,
            format: OutputFormat::Text,
            filter: None,
            xfail: None,
            verbose: false,
        }
    }
}

impl CheckArgs {
    pub fn verify_config(&self) -> VerifyConfig {
        VerifyConfig {
            filter: self.filter.clone(),
            parallel: self.parallel,
            jobs: self.jobs,
            tolerance: self.tolerance,
            options: self.options.clone(),
        }
    }

    /// The compiler to run, resolved against the environment.
    pub fn program(&self) -> PathBuf {
        self.tsc
            .clone()
            .or_else(|| std::env::var_os(TSC_ENV).map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from("tsc"))
    }
}

/// Parse the arguments following `tsv check`.
///
/// The path is optional and flags can come before or after it.
pub fn parse_check_args(args: &[String]) -> Result<CheckArgs, UsageError> {
    let mut parsed = CheckArgs::default();
    let mut path: Option<PathBuf> = None;

    for arg in args {
        if let Some(tsc) = arg.strip_prefix("--tsc=") {
            parsed.tsc = Some(PathBuf::from(tsc));
        } else if let Some(shared) = arg.strip_prefix("--shared=") {
            parsed.shared.push(PathBuf::from(shared));
        } else if let Some(option) = arg.strip_prefix("--option=") {
            let (name, value) =
                CheckOptions::parse_assignment(option).ok_or_else(|| UsageError::InvalidValue {
                    option: "--option",
                    value: option.to_string(),
                })?;
            parsed.options.set(name, value);
        } else if let Some(secs) = arg.strip_prefix("--timeout=") {
            parsed.timeout = secs
                .parse::<f64>()
                .ok()
                .filter(|s| *s > 0.0)
                .and_then(|s| Duration::try_from_secs_f64(s).ok())
                .ok_or_else(|| invalid("--timeout", secs))?;
        } else if let Some(lines) = arg.strip_prefix("--tolerance=") {
            parsed.tolerance = lines.parse().map_err(|_| invalid("--tolerance", lines))?;
        } else if let Some(jobs) = arg.strip_prefix("--jobs=") {
            let jobs: usize = jobs.parse().map_err(|_| invalid("--jobs", jobs))?;
            parsed.jobs = Some(jobs.max(1));
        } else if let Some(format) = arg.strip_prefix("--format=") {
            parsed.format = format.parse()?;
        } else if let Some(filter) = arg.strip_prefix("--filter=") {
            parsed.filter = Some(filter.to_string());
        } else if let Some(xfail) = arg.strip_prefix("--xfail=") {
            parsed.xfail = Some(PathBuf::from(xfail));
        } else if arg == "--no-parallel" {
            parsed.parallel = false;
        } else if arg == "--verbose" || arg == "-v" {
            parsed.verbose = true;
        } else if arg.starts_with('-') {
            return Err(UsageError::UnknownOption(arg.clone()));
        } else if path.is_none() {
            path = Some(PathBuf::from(arg));
        } else {
            return Err(UsageError::UnexpectedArgument(arg.clone()));
        }
    }

    if let Some(path) = path {
        parsed.path = path;
    }
    Ok(parsed)
}

fn invalid(option: &'static str, value: &str) -> UsageError {
    UsageError::InvalidValue {
        option,
        value: value.to_string(),
    }
}

/// Verify fragments at the given path and print the report.
///
/// Returns the process exit code.
pub fn run_check(args: &CheckArgs) -> i32 {
    if !args.path.exists() {
        eprintln!("Path not found: {}", args.path.display());
        return 1;
    }

    let shared = match SharedContext::load(&args.shared) {
        Ok(shared) => shared,
        Err(e) => {
            eprintln!("error: {e}");
            return 1;
        }
    };

    let xfail = match &args.xfail {
        Some(list) => match XFailSet::from_file(list) {
            Ok(xfail) => xfail,
            Err(e) => {
                eprintln!("error: {e}");
                return 1;
            }
        },
        None => XFailSet::empty(),
    };

    let checker = TscChecker::new(args.program()).with_timeout(args.timeout);
    let verifier = Verifier::with_config(checker, args.verify_config())
        .with_shared(shared)
        .with_xfail(xfail);
    let report = verifier.run(&args.path);

    match args.format {
        OutputFormat::Text => print!("{}", render_text(&report, args.verbose)),
        OutputFormat::Json => match render_json(&report, args.verbose) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("error: failed to render report: {e}");
                return 1;
            }
        },
    }

    if report.unexpected_passes > 0 {
        eprintln!(
            "warning: {} fragment(s) listed as expected failures passed; remove them from the list",
            report.unexpected_passes
        );
    }

    report.exit_code()
}
