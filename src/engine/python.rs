use super::{types::*, Engine};
use crate::config::Config;
use anyhow::{anyhow, Context, Result};
use std::io::{Read, Write};
use std::path::PathBuf;
use std::process::{Child, ChildStderr, ChildStdout, Command, Output, Stdio};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

pub const RUNNER_SCRIPT: &str = "docling_export.py";

/// Drives the bundled Docling runner script: one short-lived Python process
/// per call, JSON request on stdin, JSON reply on stdout.
pub struct PythonEngine {
    runner: crate::config::Runner,
    script: PathBuf,
    python_exe: PathBuf,
}

impl PythonEngine {
    pub fn new(cfg: &Config) -> Result<Self> {
        let script = PathBuf::from(&cfg.runner.scripts_dir).join(RUNNER_SCRIPT);
        if !script.exists() {
            return Err(anyhow!("missing runner script: {}", script.display()));
        }
        let python_exe = resolve_python_exe(&cfg.runner.python_exe);
        Ok(Self {
            runner: cfg.runner.clone(),
            script,
            python_exe,
        })
    }

    fn run_json<I: serde::Serialize, O: for<'de> serde::Deserialize<'de>>(
        &self,
        request: &I,
    ) -> Result<O> {
        debug!(
            "python run {} timeout_seconds={}",
            self.script.display(),
            self.runner.timeout_seconds
        );
        let mut cmd = Command::new(&self.python_exe);
        cmd.arg(&self.script);
        cmd.stdin(Stdio::piped());
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());

        for (k, v) in &self.runner.env {
            cmd.env(k, v);
        }
        if !self.runner.artifacts_dir.is_empty() {
            cmd.env("DOCLING_ARTIFACTS_PATH", &self.runner.artifacts_dir);
        }

        let mut child = cmd
            .spawn()
            .with_context(|| format!("spawning python: {}", self.script.display()))?;

        {
            let mut stdin = child.stdin.take().ok_or_else(|| anyhow!("no stdin"))?;
            stdin.write_all(&serde_json::to_vec(request)?)?;
            stdin.flush().ok();
        }

        let output = if self.runner.timeout_seconds > 0 {
            wait_with_timeout(&mut child, Duration::from_secs(self.runner.timeout_seconds))?
        } else {
            child
                .wait_with_output()
                .with_context(|| "waiting for python")?
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(anyhow!(
                "runner script failed: {}\n{}",
                self.script.display(),
                stderr
            ));
        }

        if self.runner.keep_stderr && !output.stderr.is_empty() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            debug!("runner stderr: {}", stderr.trim());
        }

        let out: O = serde_json::from_slice(&output.stdout)
            .with_context(|| format!("parsing runner JSON output: {}", self.script.display()))?;
        Ok(out)
    }
}

impl Engine for PythonEngine {
    fn doctor(&self) -> Result<EngineDiag> {
        self.run_json(&serde_json::json!({ "cmd": "doctor" }))
    }

    fn convert(&self, req: &ConvertRequest) -> Result<ConvertReply> {
        let out: ConvertReply = self.run_json(&serde_json::json!({
            "cmd": "convert",
            "input_pdf": req.input_pdf,
            "options": req.options,
        }))?;
        if !out.ok {
            warn!(
                "docling convert returned ok=false for {}",
                req.input_pdf
            );
        }
        Ok(out)
    }
}

fn resolve_python_exe(raw: &str) -> PathBuf {
    let raw = raw.trim();
    if raw.is_empty() || raw.eq_ignore_ascii_case("auto") {
        if let Ok(env_val) = std::env::var("DOCLING_PYTHON") {
            let p = expand_tilde(&env_val);
            if p.exists() {
                return p;
            }
        }
        return PathBuf::from("python3");
    }
    expand_tilde(raw)
}

fn expand_tilde(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Ok(home) = std::env::var("HOME") {
            return PathBuf::from(home).join(rest);
        }
    }
    PathBuf::from(path)
}

fn drain_in_thread<R: Read + Send + 'static>(
    pipe: Option<R>,
) -> std::thread::JoinHandle<Result<Vec<u8>>> {
    std::thread::spawn(move || -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        if let Some(mut r) = pipe {
            r.read_to_end(&mut buf).with_context(|| "read pipe")?;
        }
        Ok(buf)
    })
}

fn wait_with_timeout(child: &mut Child, timeout: Duration) -> Result<Output> {
    // Drain pipes while waiting so verbose python logging can't deadlock the
    // child on a full stdout/stderr buffer.
    let stdout_thread = drain_in_thread::<ChildStdout>(child.stdout.take());
    let stderr_thread = drain_in_thread::<ChildStderr>(child.stderr.take());

    let start = Instant::now();
    loop {
        if let Some(status) = child.try_wait().with_context(|| "try_wait")? {
            let stdout = stdout_thread
                .join()
                .map_err(|_| anyhow!("stdout reader thread panicked"))??;
            let stderr = stderr_thread
                .join()
                .map_err(|_| anyhow!("stderr reader thread panicked"))??;
            return Ok(Output {
                status,
                stdout,
                stderr,
            });
        }

        if start.elapsed() > timeout {
            warn!("runner process timed out after {:?}", timeout);
            let _ = child.kill();
            child.wait().with_context(|| "wait after kill")?;
            let stderr = stderr_thread
                .join()
                .map_err(|_| anyhow!("stderr reader thread panicked"))??;
            let _ = stdout_thread.join();
            return Err(anyhow!(
                "runner process exceeded timeout ({:?}); stderr: {}",
                timeout,
                String::from_utf8_lossy(&stderr)
            ));
        }

        std::thread::sleep(Duration::from_millis(50));
    }
}
