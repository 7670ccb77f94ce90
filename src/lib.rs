use std::{
    fmt,
    fs::{create_dir_all, File},
    io::BufReader,
    path::{Path, PathBuf},
};

use log::{info, warn};
use thiserror::Error;

use classify::{classify, RepairStatus};
use config::Config;
use repair::repair;
use split::{Blocks, RawBlock};
use verify::MolParser;
use write::SdfWriter;

pub mod classify;
pub mod config;
pub mod props;
pub mod repair;
pub mod split;
pub mod verify;
pub mod write;

/// a fatal, run-aborting error. anything wrong with a single block is
/// recovered locally, reported, and tallied instead
#[derive(Debug, Error)]
pub enum SdfixError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Config(#[from] toml::de::Error),
    #[error("input path {0:?} has no file name")]
    NoFileName(PathBuf),
    #[error("writing {0:?} would overwrite the input")]
    ClobbersInput(PathBuf),
}

/// per-run accounting, printed at the end of a conversion
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Summary {
    pub total: usize,
    pub well_formed: usize,
    pub repaired_counts: usize,
    pub repaired_end_marker: usize,
    pub repaired_both: usize,
    pub failed: usize,
    /// the largest atom count among emitted blocks, for sizing downstream
    /// fixed-capacity consumers
    pub max_atoms: usize,
}

impl Summary {
    fn record(&mut self, status: RepairStatus) {
        match status {
            RepairStatus::WellFormed => self.well_formed += 1,
            RepairStatus::MissingCountsLine => self.repaired_counts += 1,
            RepairStatus::MissingEndMarker => self.repaired_end_marker += 1,
            RepairStatus::MissingBoth => self.repaired_both += 1,
        }
    }

    pub fn repaired(&self) -> usize {
        self.repaired_counts + self.repaired_end_marker + self.repaired_both
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} blocks: {} well-formed, {} repaired counts line, \
             {} repaired end marker, {} repaired both, {} failed; \
             largest molecule has {} atoms",
            self.total,
            self.well_formed,
            self.repaired_counts,
            self.repaired_end_marker,
            self.repaired_both,
            self.failed,
            self.max_atoms,
        )
    }
}

/// run one block through classify → repair → the external parser → the
/// required-property screen. any failure comes back as the reason to file
/// with the block
fn process_block(
    block: &RawBlock,
    cfg: &Config,
    parser: &impl MolParser,
) -> Result<(RepairStatus, Vec<String>, usize), String> {
    let cls = classify(block, cfg.max_atoms).map_err(|e| e.to_string())?;
    let lines =
        repair(block, &cls, cfg.max_atoms).map_err(|e| e.to_string())?;
    parser.try_parse(&lines.join("\n"))?;
    if let Some(tag) =
        props::missing_props(&lines, &cfg.required_props).first()
    {
        return Err(format!("missing required property {tag}"));
    }
    Ok((cls.status, lines, cls.natoms))
}

/// repair every block of the file at `input` and write the corrected file,
/// under the same base name, into `output_dir`. blocks that cannot be
/// repaired, that the external `parser` rejects, or that fail the
/// required-property screen go to `failure_path` (or are dropped after
/// counting when it is `None`); they never abort the run. the corrected
/// file is written even if every block fails
pub fn convert_file(
    input: impl AsRef<Path>,
    output_dir: impl AsRef<Path>,
    failure_path: Option<&Path>,
    cfg: &Config,
    parser: &impl MolParser,
) -> Result<Summary, SdfixError> {
    let input = input.as_ref();
    let dir = output_dir.as_ref();
    let name = input
        .file_name()
        .ok_or_else(|| SdfixError::NoFileName(input.to_path_buf()))?;
    let reader = BufReader::new(File::open(input)?);
    create_dir_all(dir)?;
    let out_path = dir.join(name);
    if out_path.canonicalize().ok() == input.canonicalize().ok() {
        return Err(SdfixError::ClobbersInput(out_path));
    }

    info!("converting {input:?} to {out_path:?}");

    let mut writer = SdfWriter::create(&out_path, failure_path)?;
    let mut summary = Summary::default();

    for block in Blocks::new(reader) {
        let block = block?;
        summary.total += 1;
        match process_block(&block, cfg, parser) {
            Ok((status, lines, natoms)) => {
                writer.write_success(&lines)?;
                summary.record(status);
                summary.max_atoms = summary.max_atoms.max(natoms);
            }
            Err(reason) => {
                warn!("block {}: {reason}", summary.total);
                writer.write_failure(&block)?;
                summary.failed += 1;
            }
        }
    }
    writer.finish()?;

    info!("{summary}");

    Ok(summary)
}
