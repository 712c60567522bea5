#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayConfig {
    /// Every cell is centered in a field of this many characters.
    pub cell_width: usize,
    /// Unknowns are named `<prefix>1`, `<prefix>2`, ...
    pub variable_prefix: String,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        DisplayConfig {
            cell_width: 10,
            variable_prefix: "x".to_string(),
        }
    }
}

impl DisplayConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cell_width(mut self, cell_width: usize) -> Self {
        self.cell_width = cell_width.max(1);
        self
    }

    pub fn with_variable_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.variable_prefix = prefix.into();
        self
    }

    /// Name of the unknown stored in column `index` (0-indexed).
    pub fn variable(&self, index: usize) -> String {
        format!("{}{}", self.variable_prefix, index + 1)
    }
}

// --------------------------------------------------
//                      TESTS
// --------------------------------------------------
