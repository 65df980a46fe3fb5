use std::fmt;

/// Where one unified column takes its value from, for one source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnSlot {
    /// Index of the matching column in the source row.
    Present(usize),
    /// The source lacks the column; emit Null.
    Absent,
}

/// Per-source mapping from unified columns to source columns.
///
/// `slots[i]` describes unified column `i`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolutionPlan {
    pub source: String,
    pub slots: Vec<ColumnSlot>,
}

impl ResolutionPlan {
    pub fn new(source: impl Into<String>, slots: Vec<ColumnSlot>) -> Self {
        Self {
            source: source.into(),
            slots,
        }
    }

    pub fn width(&self) -> usize {
        self.slots.len()
    }

    pub fn absent_count(&self) -> usize {
        self.slots
            .iter()
            .filter(|s| matches!(s, ColumnSlot::Absent))
            .count()
    }

    pub fn slot(&self, column: usize) -> Option<ColumnSlot> {
        self.slots.get(column).copied()
    }
}

impl fmt::Display for ResolutionPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: [", self.source)?;
        for (i, slot) in self.slots.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            match slot {
                ColumnSlot::Present(idx) => write!(f, "#{idx}")?,
                ColumnSlot::Absent => write!(f, "null")?,
            }
        }
        write!(f, "]")
    }
}
