//! Run one command and map its result to a process exit code

use std::io::Write;

use eyre::WrapErr;
use sshrun_exec::RemoteCommandRunner;
use sshrun_exec::traits::Connector;
use tracing::{info, warn};

/// Run `command`, relay its output to `out`/`err`, and return the exit code
/// the local process should exit with
///
/// # Errors
/// Returns error if connecting, executing or relaying fails
pub async fn execute<C, O, E>(
    runner: &RemoteCommandRunner<C>,
    command: &str,
    out: &mut O,
    err: &mut E,
) -> eyre::Result<u8>
where
    C: Connector,
    O: Write + ?Sized,
    E: Write + ?Sized,
{
    let target = runner.connector().target();

    let result = runner
        .run_relayed(command, out, err)
        .await
        .wrap_err_with(|| format!("failed to run command on {target}"))?;

    if let Some(signal) = &result.exit_signal {
        warn!(remote = %target, signal = %signal, "remote command terminated by signal");
    }
    info!(
        remote = %target,
        status = result.exit_code,
        duration = ?result.duration,
        "remote command finished"
    );

    Ok(result.process_exit_code())
}
