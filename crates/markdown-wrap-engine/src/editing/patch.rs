/// Identifies one committed edit. Its pending selection can only be applied
/// while no later edit has been committed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EditToken {
    pub(crate) version: u64,
}

impl EditToken {
    pub fn version(&self) -> u64 {
        self.version
    }
}

/// Result of applying an edit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Patch {
    /// Byte ranges of inserted text in the new buffer.
    pub changed: Vec<std::ops::Range<usize>>,
    pub token: EditToken,
    pub version: u64,
}
