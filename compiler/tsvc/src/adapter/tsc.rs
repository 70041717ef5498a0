//! `tsc` adapter.
//!
//! Each check runs in its own temporary directory containing only the
//! fragment and the shared context files, so no project `tsconfig.json` or
//! sibling fragment can leak into the compilation:
//!
//! ```text
//! <tmp>/sample.ts
//! <tmp>/shared/globals.d.ts
//! tsc --noEmit --pretty false --strict true sample.ts shared/globals.d.ts
//! ```

use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use tsv_diagnostic::tsc::{parse_output, TscEntry};
use tsv_diagnostic::{Diagnostic, Severity};
use tsv_fragment::{CheckOptions, Fragment};

use super::{AdapterError, SharedContext, TypeChecker};

const SHARED_DIR: &str = "shared";
const DEFAULT_FILE_NAME: &str = "fragment.ts";
const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Runs the TypeScript compiler as a child process, one process per fragment.
#[derive(Clone, Debug)]
pub struct TscChecker {
    program: PathBuf,
    timeout: Duration,
}

impl TscChecker {
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

    pub fn new(program: impl Into<PathBuf>) -> Self {
        TscChecker {
            program: program.into(),
            timeout: Self::DEFAULT_TIMEOUT,
        }
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn command(&self, dir: &Path, options: &CheckOptions, files: &[String]) -> Command {
        let mut command = Command::new(&self.program);
        command
            .current_dir(dir)
            .args(command_args(options, files))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        command
    }

    /// Wait for the child, killing it once the timeout elapses.
    ///
    /// Output is drained on helper threads so a chatty compiler cannot block
    /// on a full pipe while we poll.
    fn wait(&self, child: Child) -> Result<(ExitStatus, String, String), AdapterError> {
        self.wait_with(child, Child::try_wait)
    }

    /// [`TscChecker::wait`] with the poll step supplied by the caller.
    ///
    /// The child is killed and reaped on every early return.
    fn wait_with(
        &self,
        mut child: Child,
        mut poll: impl FnMut(&mut Child) -> io::Result<Option<ExitStatus>>,
    ) -> Result<(ExitStatus, String, String), AdapterError> {
        let stdout = child.stdout.take().map(drain);
        let stderr = child.stderr.take().map(drain);

        let deadline = Instant::now() + self.timeout;
        let status = loop {
            match poll(&mut child) {
                Ok(Some(status)) => break status,
                Ok(None) => {}
                Err(e) => {
                    tracing::debug!(error = %e, "polling type checker failed, killing it");
                    stop(&mut child);
                    return Err(AdapterError::Io(e));
                }
            }
            if Instant::now() >= deadline {
                tracing::debug!(timeout = ?self.timeout, "killing timed out type checker");
                stop(&mut child);
                return Err(AdapterError::Timeout(self.timeout));
            }
            thread::sleep(POLL_INTERVAL);
        };

        let stdout = stdout.map(join_output).unwrap_or_default();
        let stderr = stderr.map(join_output).unwrap_or_default();
        Ok((status, stdout, stderr))
    }
}

/// Kill and reap a child that is being abandoned.
fn stop(child: &mut Child) {
    // The child may exit between the last poll and the kill.
    let _ = child.kill();
    let _ = child.wait();
}

impl Default for TscChecker {
    fn default() -> Self {
        TscChecker::new("tsc")
    }
}

impl TypeChecker for TscChecker {
    fn name(&self) -> &str {
        "tsc"
    }

    fn check(
        &self,
        fragment: &Fragment,
        options: &CheckOptions,
        shared: &SharedContext,
    ) -> Result<Vec<Diagnostic>, AdapterError> {
        let dir = tempfile::tempdir()?;
        let file_name = fragment_file_name(fragment);
        std::fs::write(dir.path().join(&file_name), fragment.text())?;

        let mut files = vec![file_name.clone()];
        if !shared.is_empty() {
            std::fs::create_dir(dir.path().join(SHARED_DIR))?;
            for file in shared.files() {
                std::fs::write(dir.path().join(SHARED_DIR).join(&file.name), &file.text)?;
                files.push(format!("{SHARED_DIR}/{}", file.name));
            }
        }

        tracing::debug!(
            program = %self.program.display(),
            dir = %dir.path().display(),
            ?files,
            "invoking type checker"
        );

        let child = self
            .command(dir.path(), options, &files)
            .spawn()
            .map_err(|source| AdapterError::Spawn {
                program: self.program.display().to_string(),
                source,
            })?;
        let (status, stdout, stderr) = self.wait(child)?;

        interpret(status, &stdout, &stderr, &file_name)
    }
}

/// Command-line arguments for one invocation.
fn command_args(options: &CheckOptions, files: &[String]) -> Vec<String> {
    let mut args = vec![
        "--noEmit".to_string(),
        "--pretty".to_string(),
        "false".to_string(),
    ];
    for (name, value) in options.iter() {
        if matches!(name, "noEmit" | "pretty") {
            continue;
        }
        args.push(format!("--{name}"));
        args.push(value.to_string());
    }
    args.extend(files.iter().cloned());
    args
}

fn fragment_file_name(fragment: &Fragment) -> String {
    fragment
        .path()
        .file_name()
        .and_then(|n| n.to_str())
        .filter(|n| tsv_fragment::is_fragment_path(Path::new(n)))
        .unwrap_or(DEFAULT_FILE_NAME)
        .to_string()
}

fn drain(mut pipe: impl Read + Send + 'static) -> thread::JoinHandle<String> {
    thread::spawn(move || {
        let mut buf = String::new();
        // A read error leaves whatever was collected; the exit status decides.
        let _ = pipe.read_to_string(&mut buf);
        buf
    })
}

fn join_output(handle: thread::JoinHandle<String>) -> String {
    handle.join().unwrap_or_default()
}

/// Turn a finished `tsc` run into the fragment's diagnostics.
///
/// `tsc` exits 0 when clean and 1 or 2 when it reported diagnostics. Anything
/// else, or a failing exit without a single parsed diagnostic, is a crash.
fn interpret(
    status: ExitStatus,
    stdout: &str,
    stderr: &str,
    file_name: &str,
) -> Result<Vec<Diagnostic>, AdapterError> {
    let Some(code) = status.code() else {
        return Err(AdapterError::Crashed {
            status: status.to_string(),
            stderr: stderr.trim().to_string(),
        });
    };
    if !matches!(code, 0..=2) {
        return Err(AdapterError::Crashed {
            status: status.to_string(),
            stderr: stderr.trim().to_string(),
        });
    }

    let output = parse_output(stdout);
    for line in &output.unrecognized {
        tracing::debug!(line = %line, "unrecognized type checker output");
    }

    if code != 0 && output.is_empty() {
        if !stderr.trim().is_empty() {
            return Err(AdapterError::Crashed {
                status: status.to_string(),
                stderr: stderr.trim().to_string(),
            });
        }
        return Err(AdapterError::NoDiagnostics {
            status: status.to_string(),
        });
    }

    collect_fragment_diagnostics(output.entries, file_name)
}

fn collect_fragment_diagnostics(
    entries: Vec<TscEntry>,
    file_name: &str,
) -> Result<Vec<Diagnostic>, AdapterError> {
    let mut diagnostics = Vec::with_capacity(entries.len());
    for entry in entries {
        match entry {
            TscEntry::Located { file, diagnostic } => {
                if file.as_path() == Path::new(file_name) {
                    diagnostics.push(diagnostic);
                } else {
                    return Err(AdapterError::OutsideFragment {
                        file: file.display().to_string(),
                        message: diagnostic.headline().to_string(),
                    });
                }
            }
            TscEntry::Global {
                severity, message, ..
            } => {
                if severity == Severity::Error {
                    return Err(AdapterError::Configuration { message });
                }
                tracing::debug!(%message, "ignoring non-error global diagnostic");
            }
        }
    }
    Ok(diagnostics)
}
