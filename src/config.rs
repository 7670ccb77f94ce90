use std::{fs::read_to_string, path::Path};

use serde::Deserialize;

use crate::SdfixError;

/// the largest atom count a 3-wide V2000 counts field can hold
pub const MAX_ATOMS: usize = 999;

/// the data-item tags a MoNA record is expected to carry
pub const MONA_PROPS: [&str; 5] =
    ["NAME", "INCHIKEY", "INCHI", "EXACT MASS", "MASS SPECTRAL PEAKS"];

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// The atom-count ceiling. The classifier uses it to tell a counts line
    /// from a bond record, and downstream consumers size fixed-capacity
    /// buffers from it.
    pub max_atoms: usize,

    /// Data-item tags every emitted block must carry; blocks missing one go
    /// to the failure record. Empty disables the screen. MoNA runs want
    /// [MONA_PROPS].
    pub required_props: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_atoms: MAX_ATOMS,
            required_props: Vec::new(),
        }
    }
}

impl Config {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SdfixError> {
        Ok(toml::from_str(&read_to_string(path)?)?)
    }
}
