use crate::error::FolioError;
use std::process::{Command, Output};

/// Run an external tool to completion and return its output.
///
/// A missing binary and a non-zero exit are reported as distinct errors.
pub(crate) fn run(tool: &'static str, cmd: &mut Command) -> Result<Output, FolioError> {
    tracing::debug!(tool, "running {:?}", cmd);
    let output = cmd.output().map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            FolioError::ToolNotFound { tool }
        } else {
            FolioError::Io(e)
        }
    })?;

    if !output.status.success() {
        let code = output.status.code().unwrap_or(-1);
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        return Err(FolioError::ToolFailed { tool, code, stderr });
    }
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_binary() {
        let err = run("folio-no-such-tool", &mut Command::new("folio-no-such-tool")).unwrap_err();
        assert!(matches!(err, FolioError::ToolNotFound { tool: "folio-no-such-tool" }));
    }
}
