//! Writing the rendered text to stdout and/or a file.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use tracing::debug;

use crate::error::{CliError, CliResult};

/// Writes `text` plus a trailing newline to every requested destination.
///
/// The file is created before anything is written, so a bad path fails the
/// run without printing to stdout.
pub fn deliver(text: &str, stdout: Option<&mut dyn Write>, file: Option<&Path>) -> CliResult<()> {
    let target = |path: &Path| path.display().to_string();
    let mut file = file
        .map(|path| {
            debug!(path = %path.display(), "Creating output file");
            File::create(path)
                .map(|f| (path, f))
                .map_err(|e| CliError::write(target(path), e))
        })
        .transpose()?;

    if let Some(out) = stdout {
        debug!("Writing to stdout");
        writeln!(out, "{text}")
            .and_then(|()| out.flush())
            .map_err(|e| CliError::write("stdout", e))?;
    }

    if let Some((path, f)) = file.as_mut() {
        writeln!(f, "{text}").map_err(|e| CliError::write(target(*path), e))?;
    }

    Ok(())
}
