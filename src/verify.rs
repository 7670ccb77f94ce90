//! the seam to the external chemistry toolkit that gets the final say on a
//! block

use crate::{
    classify::{classify, line_shape, LineShape, RepairStatus},
    split::RawBlock,
};

/// anything that can attempt to load one molecule block. the pipeline only
/// cares whether loading succeeds, never about the molecule itself, so a
/// real toolkit binding and a test stub plug in equally well
pub trait MolParser {
    fn try_parse(&self, block_text: &str) -> Result<(), String>;
}

/// a stand-in parser that accepts or rejects on grammar conformance alone:
/// the block must classify well-formed and its declared connection table
/// must actually be there, atom lines then bond lines, inside the end
/// marker. `max_atoms` is the same ceiling the downstream consumer uses to
/// size its fixed-capacity buffers
pub struct GrammarCheck {
    max_atoms: usize,
}

impl GrammarCheck {
    pub fn new(max_atoms: usize) -> Self {
        Self { max_atoms }
    }
}

impl MolParser for GrammarCheck {
    fn try_parse(&self, block_text: &str) -> Result<(), String> {
        let block =
            RawBlock::new(block_text.lines().map(str::to_owned).collect());
        let cls =
            classify(&block, self.max_atoms).map_err(|e| e.to_string())?;
        if cls.status != RepairStatus::WellFormed {
            return Err(format!("block is {:?}", cls.status));
        }
        let end = cls.end_idx.expect("well-formed block has an end marker");
        if cls.table_start + cls.natoms + cls.nbonds > end {
            return Err("connection table truncated".to_owned());
        }
        let bond_start = cls.table_start + cls.natoms;
        let atoms = &block.lines[cls.table_start..bond_start];
        if let Some(l) = atoms
            .iter()
            .find(|l| line_shape(l, self.max_atoms) != LineShape::Atom)
        {
            return Err(format!("expected an atom record, got {l:?}"));
        }
        let bonds = &block.lines[bond_start..bond_start + cls.nbonds];
        if let Some(l) = bonds
            .iter()
            .find(|l| line_shape(l, self.max_atoms) != LineShape::Bond)
        {
            return Err(format!("expected a bond record, got {l:?}"));
        }
        Ok(())
    }
}
