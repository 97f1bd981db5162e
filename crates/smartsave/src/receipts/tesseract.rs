use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};

use super::{ExtractionError, TextExtractor};

/// Pipes images through the `tesseract` CLI, treating each page as one text block.
#[derive(Debug, Clone)]
pub struct TesseractCommand {
    program: PathBuf,
    languages: String,
}

impl TesseractCommand {
    pub fn new(program: impl Into<PathBuf>, languages: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            languages: languages.into(),
        }
    }

    fn command(&self) -> Command {
        let mut command = Command::new(&self.program);
        command
            .args(["stdin", "stdout", "-l"])
            .arg(&self.languages)
            .args(["--oem", "3", "--psm", "6"])
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        command
    }
}

impl TextExtractor for TesseractCommand {
    fn extract_text(&self, image: &[u8]) -> Result<String, ExtractionError> {
        let mut child = self
            .command()
            .spawn()
            .map_err(|source| ExtractionError::Spawn {
                program: self.program.display().to_string(),
                source,
            })?;

        // stdin is closed at the end of the match arm so the child sees EOF.
        let written = match child.stdin.take() {
            Some(mut stdin) => stdin.write_all(image),
            None => Ok(()),
        };

        // Always reap the child, even when it stopped reading early.
        let output = child.wait_with_output()?;
        if !output.status.success() {
            return Err(ExtractionError::Failed {
                status: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        written?;

        Ok(String::from_utf8(output.stdout)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_requests_single_block_layout() {
        let tesseract = TesseractCommand::new("tesseract", "eng+fra");
        let command = tesseract.command();
        let args: Vec<String> = command
            .get_args()
            .map(|arg| arg.to_string_lossy().into_owned())
            .collect();

        assert_eq!(command.get_program(), "tesseract");
        assert_eq!(
            args,
            vec!["stdin", "stdout", "-l", "eng+fra", "--oem", "3", "--psm", "6"]
        );
    }

    #[test]
    fn missing_binary_is_a_spawn_error() {
        let tesseract = TesseractCommand::new("/nonexistent/smartsave-tesseract", "eng");
        match tesseract.extract_text(b"image") {
            Err(ExtractionError::Spawn { program, .. }) => {
                assert_eq!(program, "/nonexistent/smartsave-tesseract")
            }
            other => panic!("expected spawn error, got {other:?}"),
        }
    }

    fn oversized_image() -> Vec<u8> {
        vec![0xff; 4 * 1024 * 1024]
    }

    #[cfg(unix)]
    #[test]
    fn early_exit_reports_the_exit_status() {
        let tesseract = TesseractCommand::new("false", "eng");
        match tesseract.extract_text(&oversized_image()) {
            Err(ExtractionError::Failed { status, .. }) => assert_eq!(status, Some(1)),
            other => panic!("expected failed exit, got {other:?}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn unread_input_is_a_broken_pipe() {
        let tesseract = TesseractCommand::new("true", "eng");
        match tesseract.extract_text(&oversized_image()) {
            Err(ExtractionError::Io(err)) => {
                assert_eq!(err.kind(), std::io::ErrorKind::BrokenPipe)
            }
            other => panic!("expected broken pipe, got {other:?}"),
        }
    }
}
