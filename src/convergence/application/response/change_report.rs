use serde::Serialize;

/// Outcome of one convergence call.
///
/// `changed` is `false` exactly when no mutation was sent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ChangeReport {
    pub changed: bool,
    /// Properties or sub-resources touched, in the order they were changed.
    pub modified: Vec<String>,
}

impl ChangeReport {
    pub fn unchanged() -> Self {
        Self::default()
    }

    pub fn changed(modified: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            changed: true,
            modified: modified.into_iter().map(Into::into).collect(),
        }
    }

    /// Folds a later step's report into this one.
    pub fn merge(&mut self, other: ChangeReport) {
        self.changed |= other.changed;
        self.modified.extend(other.modified);
    }
}
