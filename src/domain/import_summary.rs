use std::fmt;

/// Row counters reported at the end of a job
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub created: usize,
    pub updated: usize,
    pub skipped: usize,
    pub dry_run: bool,
}

impl ImportSummary {
    pub fn new(dry_run: bool) -> Self {
        Self {
            dry_run,
            ..Default::default()
        }
    }

    pub fn processed(&self) -> usize {
        self.created + self.updated
    }
}

impl fmt::Display for ImportSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Created: {}, Updated: {}, Skipped: {}. Dry-run={}",
            self.created,
            self.updated,
            self.skipped,
            if self.dry_run { "yes" } else { "no" }
        )
    }
}
