use std::io::{self, BufRead};

use log::warn;

/// the record delimiter separating molecule blocks in an SDF file
pub const DELIMITER: &str = "$$$$";

/// one molecule record sliced out of a multi-block file: every line between
/// two `$$$$` delimiters, the delimiter itself excluded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawBlock {
    pub lines: Vec<String>,
}

impl RawBlock {
    pub fn new(lines: Vec<String>) -> Self {
        Self { lines }
    }

    /// rejoin the block's lines with `\n`, without a trailing delimiter
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }
}

/// a single forward pass over a reader, yielding one [RawBlock] per `$$$$`
/// delimiter. line endings are normalized on read, so CRLF input splits the
/// same as LF. content after the last delimiter is not a block: it is
/// discarded with a warning when non-blank
pub struct Blocks<R> {
    lines: io::Lines<R>,
    done: bool,
}

impl<R: BufRead> Blocks<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            done: false,
        }
    }
}

impl<R: BufRead> Iterator for Blocks<R> {
    type Item = io::Result<RawBlock>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let mut acc = Vec::new();
        loop {
            match self.lines.next() {
                Some(Ok(line)) => {
                    if line.trim_end() == DELIMITER {
                        return Some(Ok(RawBlock::new(acc)));
                    }
                    acc.push(line);
                }
                Some(Err(e)) => {
                    self.done = true;
                    return Some(Err(e));
                }
                None => {
                    self.done = true;
                    if acc.iter().any(|l| !l.trim().is_empty()) {
                        warn!(
                            "discarding {} undelimited trailing lines",
                            acc.len()
                        );
                    }
                    return None;
                }
            }
        }
    }
}
