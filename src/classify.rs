//! structural classification of a single molecule block against the V2000
//! grammar: which mandatory lines are present, and how many atom and bond
//! records the connection table holds

use thiserror::Error;

use crate::split::RawBlock;

/// the line terminating a V2000 connection table
pub const END_MARKER: &str = "M  END";

/// which structural lines a block is missing. assigned once per block by
/// [classify] and consumed by the repairer to pick a strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepairStatus {
    WellFormed,
    MissingCountsLine,
    MissingEndMarker,
    MissingBoth,
}

/// a block that no deterministic repair can fix. these are never guessed
/// at: the block is routed to the failure record instead
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ClassifyError {
    #[error("truncated header")]
    TruncatedHeader,
    #[error("ambiguous atom/bond boundary")]
    AmbiguousBoundary,
    #[error(
        "counts line declares {natoms} atoms and {nbonds} bonds past the \
         end of the block"
    )]
    CountsExceedBlock { natoms: usize, nbonds: usize },
}

/// the classifier's verdict on one block: its [RepairStatus] plus the atom
/// and bond counts, declared by the counts line when present and inferred
/// from line shapes otherwise
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classified {
    pub status: RepairStatus,
    pub natoms: usize,
    pub nbonds: usize,
    /// index of the counts line, when present
    pub counts_idx: Option<usize>,
    /// index of the `M  END` line, when present
    pub end_idx: Option<usize>,
    /// first line of the atom block. when the counts line is missing this
    /// is also where the synthesized one belongs
    pub table_start: usize,
}

/// shape of a single line, as far as the V2000 grammar can tell without
/// knowing where in the block it sits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LineShape {
    /// a counts line declaring (atoms, bonds)
    Counts(usize, usize),
    Atom,
    Bond,
    Property,
    EndMarker,
    DataHeader,
    Other,
}

pub(crate) fn line_shape(line: &str, max_atoms: usize) -> LineShape {
    if line.trim_end() == END_MARKER {
        return LineShape::EndMarker;
    }
    if line.trim_start().starts_with('>') {
        return LineShape::DataHeader;
    }
    // property prefixes ("M  CHG", atom alias/value lines, group
    // abbreviations). END is already handled above
    if ["M  ", "A  ", "G  ", "V  "].iter().any(|p| line.starts_with(p)) {
        return LineShape::Property;
    }
    if let Some((natoms, nbonds)) = parse_counts(line, max_atoms) {
        return LineShape::Counts(natoms, nbonds);
    }
    let fields: Vec<_> = line.split_ascii_whitespace().collect();
    if (4..=7).contains(&fields.len())
        && fields.iter().all(|f| f.parse::<usize>().is_ok())
    {
        return LineShape::Bond;
    }
    if fields.len() >= 4
        && fields[..3].iter().all(|f| f.parse::<f64>().is_ok())
        && fields[3].starts_with(|c: char| c.is_ascii_alphabetic())
    {
        return LineShape::Atom;
    }
    LineShape::Other
}

/// try to read `line` as a V2000 counts line, returning the declared
/// (atoms, bonds) pair. a leading integer pair alone is not enough: a bond
/// record has the same leading shape, so a counts line must also carry a
/// version token or the full zero-filled field train, and every field but
/// the version must be an integer. the atom count is capped at `max_atoms`
pub(crate) fn parse_counts(
    line: &str,
    max_atoms: usize,
) -> Option<(usize, usize)> {
    let mut fields: Vec<_> = line.split_ascii_whitespace().collect();
    let versioned = matches!(fields.last(), Some(&"V2000" | &"V3000"));
    if versioned {
        fields.pop();
    } else if fields.len() < 9 {
        return None;
    }
    if fields.len() < 2 || fields.iter().any(|f| f.parse::<usize>().is_err())
    {
        return None;
    }
    // fixed-width fields first, token fallback for drifted input
    let fixed = line.get(..3).zip(line.get(3..6)).and_then(|(a, b)| {
        Some((a.trim().parse().ok()?, b.trim().parse().ok()?))
    });
    let (natoms, nbonds) = match fixed {
        Some(pair) => pair,
        None => {
            (fields[0].parse().ok()?, fields[1].parse().ok()?)
        }
    };
    (natoms <= max_atoms).then_some((natoms, nbonds))
}

// states of the scan over lines 4.., in block order. unknown-shaped lines
// are tolerated in Header (MoNA interleaves free-text junk before the
// connection table) but nowhere after it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Header,
    AtomBlock,
    BondBlock,
    Properties,
}

/// classify one raw block, with `max_atoms` bounding a plausible atom
/// count.
///
/// when no counts line is present, the atom and bond counts are inferred by
/// shape-classifying each line up to `M  END` (or the first data item); any
/// line the grammar cannot place makes the boundary ambiguous and the block
/// unrepairable, as does a block with nothing recognizable at all
pub fn classify(
    block: &RawBlock,
    max_atoms: usize,
) -> Result<Classified, ClassifyError> {
    let lines = &block.lines;
    if lines.len() < 3 {
        return Err(ClassifyError::TruncatedHeader);
    }

    let mut counts = None;
    let mut natoms = 0;
    let mut nbonds = 0;
    let mut end_idx = None;
    let mut table_start = None;
    let mut stop_idx = None;
    let mut state = State::Header;

    for (i, line) in lines.iter().enumerate().skip(3) {
        let shape = line_shape(line, max_atoms);
        if shape == LineShape::EndMarker {
            end_idx = Some(i);
            break;
        }
        if shape == LineShape::DataHeader {
            stop_idx = Some(i);
            break;
        }
        match state {
            State::Header => match shape {
                LineShape::Counts(natoms, nbonds) => {
                    counts = Some((i, natoms, nbonds));
                    break;
                }
                LineShape::Atom => {
                    state = State::AtomBlock;
                    table_start = Some(i);
                    natoms = 1;
                }
                // a bond record with no atom block above it has nothing to
                // attach to
                LineShape::Bond => {
                    return Err(ClassifyError::AmbiguousBoundary)
                }
                LineShape::Property | LineShape::Other => {}
                LineShape::EndMarker | LineShape::DataHeader => {
                    unreachable!()
                }
            },
            State::AtomBlock => match shape {
                LineShape::Atom => natoms += 1,
                LineShape::Bond => {
                    state = State::BondBlock;
                    nbonds = 1;
                }
                LineShape::Property => state = State::Properties,
                _ => return Err(ClassifyError::AmbiguousBoundary),
            },
            State::BondBlock => match shape {
                LineShape::Bond => nbonds += 1,
                LineShape::Property => state = State::Properties,
                _ => return Err(ClassifyError::AmbiguousBoundary),
            },
            State::Properties => match shape {
                LineShape::Property => {}
                _ => return Err(ClassifyError::AmbiguousBoundary),
            },
        }
    }

    if let Some((ci, natoms, nbonds)) = counts {
        // declared counts are authoritative. M  END can sit anywhere after
        // the counts line
        let end_idx = lines[ci + 1..]
            .iter()
            .position(|l| l.trim_end() == END_MARKER)
            .map(|p| ci + 1 + p);
        let status = match end_idx {
            Some(_) => RepairStatus::WellFormed,
            None => RepairStatus::MissingEndMarker,
        };
        if status == RepairStatus::MissingEndMarker
            && ci + 1 + natoms + nbonds > lines.len()
        {
            return Err(ClassifyError::CountsExceedBlock { natoms, nbonds });
        }
        return Ok(Classified {
            status,
            natoms,
            nbonds,
            counts_idx: Some(ci),
            end_idx,
            table_start: ci + 1,
        });
    }

    // no counts line and nothing to anchor the table: neither an atom block
    // nor an end marker. refusing beats guessing an empty molecule
    if natoms == 0 && end_idx.is_none() {
        return Err(ClassifyError::AmbiguousBoundary);
    }

    let table_start = table_start
        .or(end_idx)
        .or(stop_idx)
        .unwrap_or(lines.len());
    let status = match end_idx {
        Some(_) => RepairStatus::MissingCountsLine,
        None => RepairStatus::MissingBoth,
    };
    Ok(Classified {
        status,
        natoms,
        nbonds,
        counts_idx: None,
        end_idx,
        table_start,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(lines: &[&str]) -> RawBlock {
        RawBlock::new(lines.iter().map(|s| s.to_string()).collect())
    }

    const COUNTS_2_1: &str = "  2  1  0  0  0  0  0  0  0  0999 V2000";
    const ATOM_C: &str =
        "    1.0000    0.0000    0.0000 C   0  0  0  0  0  0";
    const ATOM_O: &str =
        "    0.0000    1.0000    0.0000 O   0  0  0  0  0  0";
    const BOND_1_2: &str = "  1  2  1  0";

    #[test]
    fn counts_line_grammar() {
        assert_eq!(parse_counts(COUNTS_2_1, 999), Some((2, 1)));
        // drifted field widths, still versioned
        assert_eq!(
            parse_counts("24 12 0 0 0 0 0 0 0 0 V2000", 999),
            Some((24, 12))
        );
        // zero-filled field train with no version token
        assert_eq!(
            parse_counts("  3  2  0  0  0  0  0  0  0", 999),
            Some((3, 2))
        );
        // a bond record is not a counts line
        assert_eq!(parse_counts(BOND_1_2, 999), None);
        // an atom record is not a counts line
        assert_eq!(parse_counts(ATOM_C, 999), None);
        // over the atom ceiling
        assert_eq!(parse_counts(COUNTS_2_1, 1), None);
    }

    #[test]
    fn shapes() {
        assert_eq!(line_shape(ATOM_C, 999), LineShape::Atom);
        assert_eq!(line_shape(BOND_1_2, 999), LineShape::Bond);
        assert_eq!(line_shape(COUNTS_2_1, 999), LineShape::Counts(2, 1));
        assert_eq!(line_shape("M  END", 999), LineShape::EndMarker);
        assert_eq!(line_shape("M  END  ", 999), LineShape::EndMarker);
        assert_eq!(
            line_shape("M  CHG  2   1   1   2  -1", 999),
            LineShape::Property
        );
        assert_eq!(line_shape("> <ID>", 999), LineShape::DataHeader);
        assert_eq!(line_shape("", 999), LineShape::Other);
        assert_eq!(line_shape("C1=CC=CC=C1 comment", 999), LineShape::Other);
    }

    #[test]
    fn well_formed() {
        let b = block(&[
            "caffeine", "  -ISIS-  ", "", COUNTS_2_1, ATOM_C, ATOM_O,
            BOND_1_2, "M  END", "> <ID>", "123", "",
        ]);
        let got = classify(&b, 999).unwrap();
        assert_eq!(got.status, RepairStatus::WellFormed);
        assert_eq!((got.natoms, got.nbonds), (2, 1));
        assert_eq!(got.counts_idx, Some(3));
        assert_eq!(got.end_idx, Some(7));
    }

    #[test]
    fn missing_counts_line() {
        // junk between the 3-line header and the atom block must not be
        // counted as atoms
        let b = block(&[
            "benzene", "  -ISIS-  ", "", "C1=CC=CC=C1 comment", ATOM_C,
            "M  END", "> <ID>", "123", "",
        ]);
        let got = classify(&b, 999).unwrap();
        assert_eq!(got.status, RepairStatus::MissingCountsLine);
        assert_eq!((got.natoms, got.nbonds), (1, 0));
        assert_eq!(got.table_start, 4);
    }

    #[test]
    fn missing_end_marker() {
        let b = block(&[
            "t", "p", "", COUNTS_2_1, ATOM_C, ATOM_O, BOND_1_2, "> <ID>",
            "123", "",
        ]);
        let got = classify(&b, 999).unwrap();
        assert_eq!(got.status, RepairStatus::MissingEndMarker);
        assert_eq!((got.natoms, got.nbonds), (2, 1));
    }

    #[test]
    fn missing_both() {
        let b = block(&[
            "t", "p", "", ATOM_C, ATOM_O, BOND_1_2, "> <ID>", "123", "",
        ]);
        let got = classify(&b, 999).unwrap();
        assert_eq!(got.status, RepairStatus::MissingBoth);
        assert_eq!((got.natoms, got.nbonds), (2, 1));
        assert_eq!(got.table_start, 3);
    }

    #[test]
    fn end_marker_anchors_an_empty_table() {
        let b = block(&["t", "p", "", "M  END", "> <ID>", "123", ""]);
        let got = classify(&b, 999).unwrap();
        assert_eq!(got.status, RepairStatus::MissingCountsLine);
        assert_eq!((got.natoms, got.nbonds), (0, 0));
        assert_eq!(got.table_start, 3);
    }

    #[test]
    fn truncated_header() {
        let b = block(&["t", "p"]);
        assert_eq!(classify(&b, 999), Err(ClassifyError::TruncatedHeader));
    }

    #[test]
    fn blank_table_is_ambiguous() {
        // nothing distinguishes atoms from bonds and no end marker anchors
        // the boundary
        let b = block(&["t", "p", "", "", ""]);
        assert_eq!(classify(&b, 999), Err(ClassifyError::AmbiguousBoundary));
    }

    #[test]
    fn bonds_without_atoms_are_ambiguous() {
        let b = block(&["t", "p", "", BOND_1_2, "M  END"]);
        assert_eq!(classify(&b, 999), Err(ClassifyError::AmbiguousBoundary));
    }

    #[test]
    fn atoms_after_bonds_are_ambiguous() {
        let b = block(&["t", "p", "", ATOM_C, BOND_1_2, ATOM_O, "M  END"]);
        assert_eq!(classify(&b, 999), Err(ClassifyError::AmbiguousBoundary));
    }

    #[test]
    fn junk_inside_the_table_is_ambiguous() {
        let b = block(&["t", "p", "", ATOM_C, "not a record", "M  END"]);
        assert_eq!(classify(&b, 999), Err(ClassifyError::AmbiguousBoundary));
    }

    #[test]
    fn counts_past_end_of_block() {
        let b = block(&["t", "p", "", COUNTS_2_1, ATOM_C]);
        assert_eq!(
            classify(&b, 999),
            Err(ClassifyError::CountsExceedBlock { natoms: 2, nbonds: 1 })
        );
    }
}
