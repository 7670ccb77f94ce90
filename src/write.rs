use std::{
    fs::File,
    io::{self, BufWriter, Write},
    path::{Path, PathBuf},
};

use crate::split::{RawBlock, DELIMITER};

/// sink for the corrected output stream and, when configured, the failure
/// record. both restore the `$$$$` delimiter after each block and terminate
/// every line with `\n`. the failure record is only created once the first
/// failure shows up, so a clean run leaves no empty file behind
pub struct SdfWriter {
    out: BufWriter<File>,
    failure_path: Option<PathBuf>,
    failures: Option<BufWriter<File>>,
}

impl SdfWriter {
    pub fn create(
        output: impl AsRef<Path>,
        failure_path: Option<&Path>,
    ) -> io::Result<Self> {
        Ok(Self {
            out: BufWriter::new(File::create(output)?),
            failure_path: failure_path.map(Path::to_path_buf),
            failures: None,
        })
    }

    /// append a corrected block to the output stream, in input order
    pub fn write_success(&mut self, lines: &[String]) -> io::Result<()> {
        for line in lines {
            writeln!(self.out, "{line}")?;
        }
        writeln!(self.out, "{DELIMITER}")
    }

    /// append a failed block, verbatim, to the failure record. without a
    /// configured destination the text is dropped on the floor; the caller
    /// keeps the count
    pub fn write_failure(&mut self, block: &RawBlock) -> io::Result<()> {
        let Some(path) = &self.failure_path else {
            return Ok(());
        };
        if self.failures.is_none() {
            self.failures = Some(BufWriter::new(File::create(path)?));
        }
        let f = self.failures.as_mut().unwrap();
        for line in &block.lines {
            writeln!(f, "{line}")?;
        }
        writeln!(f, "{DELIMITER}")
    }

    pub fn finish(mut self) -> io::Result<()> {
        self.out.flush()?;
        if let Some(f) = &mut self.failures {
            f.flush()?;
        }
        Ok(())
    }
}
