//! synthesis of the structural lines a block is missing

use thiserror::Error;

use crate::{
    classify::{classify, Classified, ClassifyError, RepairStatus, END_MARKER},
    split::RawBlock,
};

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RepairError {
    /// the repaired block failed re-classification
    #[error("self-check after repair failed: {0}")]
    SelfCheck(#[from] ClassifyError),
    #[error("self-check after repair left the block {0:?}")]
    StillMalformed(RepairStatus),
    #[error(
        "self-check after repair counted {got_atoms} atoms and {got_bonds} \
         bonds instead of {natoms} and {nbonds}"
    )]
    CountsChanged {
        natoms: usize,
        nbonds: usize,
        got_atoms: usize,
        got_bonds: usize,
    },
}

/// format a V2000 counts line for `natoms` atoms and `nbonds` bonds, every
/// other field zero-filled
pub fn counts_line(natoms: usize, nbonds: usize) -> String {
    format!("{natoms:>3}{nbonds:>3}  0  0  0  0  0  0  0  0999 V2000")
}

/// produce the corrected lines for `block`, inserting whatever `cls` says
/// is missing. a well-formed block comes back unchanged. the repair is
/// always computed from the original block, so repairing twice can never
/// double-insert a line
pub fn repair(
    block: &RawBlock,
    cls: &Classified,
    max_atoms: usize,
) -> Result<Vec<String>, RepairError> {
    if cls.status == RepairStatus::WellFormed {
        return Ok(block.lines.clone());
    }

    let mut out = block.lines.clone();
    let missing_counts = matches!(
        cls.status,
        RepairStatus::MissingCountsLine | RepairStatus::MissingBoth
    );
    let missing_end = matches!(
        cls.status,
        RepairStatus::MissingEndMarker | RepairStatus::MissingBoth
    );

    // the counts line goes in first: everything below it, including the
    // end-marker slot, shifts down one line
    if missing_counts {
        out.insert(cls.table_start, counts_line(cls.natoms, cls.nbonds));
    }
    if missing_end {
        let table = cls.table_start + usize::from(missing_counts);
        out.insert(table + cls.natoms + cls.nbonds, END_MARKER.to_owned());
    }

    // the result must classify clean before it is allowed anywhere near the
    // output file
    let check = classify(&RawBlock::new(out.clone()), max_atoms)?;
    if check.status != RepairStatus::WellFormed {
        return Err(RepairError::StillMalformed(check.status));
    }
    if (check.natoms, check.nbonds) != (cls.natoms, cls.nbonds) {
        return Err(RepairError::CountsChanged {
            natoms: cls.natoms,
            nbonds: cls.nbonds,
            got_atoms: check.natoms,
            got_bonds: check.nbonds,
        });
    }
    Ok(out)
}
