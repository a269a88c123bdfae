//! The external pandoc converter
//!
//! pandoc is the only external tool the pipeline leans on, and it is modeled
//! as one capability: a synchronous run with arguments and stdin, producing
//! stdout or a fatal error carrying its stderr verbatim. Conversions locate
//! the executable up front so a missing installation fails before any work
//! happens.

use crate::error::ConvertError;
use std::ffi::OsStr;
use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};

#[derive(Debug, Clone)]
pub struct Pandoc {
    program: PathBuf,
}

impl Pandoc {
    /// Find pandoc on PATH, failing fast with installation guidance.
    pub fn locate() -> Result<Pandoc, ConvertError> {
        let program = which::which("pandoc").map_err(|_| ConvertError::PandocMissing)?;
        Ok(Pandoc { program })
    }

    /// Run one conversion to completion. `stage` is only used to label a
    /// failure ("HTML->JSON", ...); stderr of a non-zero exit is surfaced
    /// verbatim.
    pub fn convert<I, S>(&self, stage: &str, args: I, input: &[u8]) -> Result<Vec<u8>, ConvertError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let mut child = Command::new(&self.program)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;

        // Feed stdin from a helper thread so a chatty child can never
        // deadlock against a full stdout pipe.
        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| ConvertError::Serialization("pandoc stdin unavailable".to_string()))?;
        let payload = input.to_vec();
        let feeder = std::thread::spawn(move || {
            let _ = stdin.write_all(&payload);
        });

        let output = child.wait_with_output();
        let _ = feeder.join();
        let output = output?;

        if !output.status.success() {
            return Err(ConvertError::ConverterFailed {
                stage: stage.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }
        Ok(output.stdout)
    }

    /// [`Pandoc::convert`] for text-producing stages.
    pub fn convert_text<I, S>(
        &self,
        stage: &str,
        args: I,
        input: &[u8],
    ) -> Result<String, ConvertError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let stdout = self.convert(stage, args, input)?;
        String::from_utf8(stdout)
            .map_err(|err| ConvertError::Serialization(format!("pandoc emitted non-UTF-8: {err}")))
    }

    /// Flag selecting ATX-style headings in Markdown output. The long form
    /// exists since pandoc 3; older installations use the legacy flag, which
    /// is also the fallback when the version cannot be probed.
    pub fn markdown_headings_flag(&self) -> &'static str {
        match self.major_version() {
            Some(major) if major >= 3 => "--markdown-headings=atx",
            _ => "--atx-headers",
        }
    }

    fn major_version(&self) -> Option<u32> {
        let stdout = self.convert("--version", ["--version"], b"").ok()?;
        let text = String::from_utf8(stdout).ok()?;
        // First line looks like "pandoc 3.1.9".
        let version = text.lines().next()?.split_whitespace().nth(1)?;
        version.split('.').next()?.parse().ok()
    }
}
