//! Child-process command runner.
//!
//! Runs compose commands with piped stdout/stderr and returns their output
//! interleaved line by line, the way a terminal would show it.

use std::io;
use std::process::{ExitStatus, Stdio};
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::process::{Child, Command};
use tracing::{debug, warn};

use moorage_core::ports::{CommandError, CommandOutput, CommandRunner, CommandSpec};

/// [`CommandRunner`] backed by `tokio::process`.
///
/// Children are spawned with `kill_on_drop`, so a run that outlives its
/// deadline is killed when the timed-out future is dropped.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessCommandRunner;

impl ProcessCommandRunner {
    pub const fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CommandRunner for ProcessCommandRunner {
    async fn run(
        &self,
        spec: &CommandSpec,
        deadline: Duration,
    ) -> Result<CommandOutput, CommandError> {
        let mut child = Command::new(&spec.program)
            .args(&spec.args)
            .current_dir(&spec.working_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| CommandError::Spawn {
                program: spec.program.clone(),
                source,
            })?;

        debug!(command = %spec, dir = %spec.working_dir.display(), pid = ?child.id(), "spawned command");

        let Ok(finished) = tokio::time::timeout(deadline, run_to_exit(&mut child)).await else {
            warn!(command = %spec, timeout = ?deadline, "command timed out; killing");
            if let Err(e) = child.kill().await {
                debug!(error = %e, "kill after timeout failed");
            }
            return Err(CommandError::Timeout(deadline));
        };

        let (combined, status) = finished.map_err(|source| CommandError::Io {
            program: spec.program.clone(),
            source,
        })?;

        debug!(command = %spec, status = %status, bytes = combined.len(), "command finished");
        Ok(CommandOutput {
            combined: String::from_utf8_lossy(&combined).into_owned(),
            success: status.success(),
            code: status.code(),
        })
    }
}

/// Drain both pipes, then reap the child.
async fn run_to_exit(child: &mut Child) -> io::Result<(Vec<u8>, ExitStatus)> {
    let mut stdout = child.stdout.take().map(BufReader::new);
    let mut stderr = child.stderr.take().map(BufReader::new);
    let combined = interleave(stdout.as_mut(), stderr.as_mut()).await?;
    let status = child.wait().await?;
    Ok((combined, status))
}

/// Merge two line-oriented readers in arrival order.
///
/// Each reader keeps its own buffer; `read_until` appends partial reads to
/// it when the other branch wins, so no bytes are lost across iterations.
async fn interleave<A, B>(mut out: Option<&mut A>, mut err: Option<&mut B>) -> io::Result<Vec<u8>>
where
    A: AsyncBufRead + Unpin,
    B: AsyncBufRead + Unpin,
{
    let mut combined = Vec::new();
    let mut out_buf = Vec::new();
    let mut err_buf = Vec::new();

    loop {
        let out_open = out.is_some();
        let err_open = err.is_some();
        if !out_open && !err_open {
            break;
        }

        tokio::select! {
            read = read_line(&mut out, &mut out_buf), if out_open => {
                if read? == 0 {
                    out = None;
                }
                combined.append(&mut out_buf);
            }
            read = read_line(&mut err, &mut err_buf), if err_open => {
                if read? == 0 {
                    err = None;
                }
                combined.append(&mut err_buf);
            }
        }
    }

    Ok(combined)
}

async fn read_line<R>(reader: &mut Option<&mut R>, buf: &mut Vec<u8>) -> io::Result<usize>
where
    R: AsyncBufRead + Unpin,
{
    match reader {
        Some(r) => r.read_until(b'\n', buf).await,
        None => Ok(0),
    }
}
