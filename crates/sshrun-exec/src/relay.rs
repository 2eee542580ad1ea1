//! Relaying captured output to local streams

use std::io::{self, Write};

use crate::result::ExecutionResult;

/// Write `result.stdout` to `out` verbatim, and `result.stderr` to `err`
/// only if it is non-empty. Both writers are flushed.
///
/// # Errors
/// Returns the first I/O error from either writer
pub fn relay_output<O, E>(result: &ExecutionResult, out: &mut O, err: &mut E) -> io::Result<()>
where
    O: Write + ?Sized,
    E: Write + ?Sized,
{
    out.write_all(&result.stdout)?;
    out.flush()?;

    if !result.stderr.is_empty() {
        err.write_all(&result.stderr)?;
        err.flush()?;
    }

    Ok(())
}
