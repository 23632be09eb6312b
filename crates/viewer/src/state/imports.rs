//! Import request bookkeeping.
//!
//! Each file import takes a ticket; only the result carrying the most recent
//! ticket may touch the import layer.

/// Identifies one import request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ImportTicket(pub u64);

/// Hands out tickets and remembers the latest one.
#[derive(Debug, Default)]
pub struct ImportTracker {
    latest: u64,
}

impl ImportTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new request, superseding every earlier ticket.
    pub fn begin(&mut self) -> ImportTicket {
        self.latest += 1;
        ImportTicket(self.latest)
    }

    pub fn is_current(&self, ticket: ImportTicket) -> bool {
        ticket.0 == self.latest
    }

    pub fn latest(&self) -> Option<ImportTicket> {
        (self.latest > 0).then_some(ImportTicket(self.latest))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn newer_ticket_supersedes_older() {
        let mut t = ImportTracker::new();
        assert!(t.latest().is_none());
        let a = t.begin();
        assert!(t.is_current(a));
        let b = t.begin();
        assert!(b > a);
        assert!(!t.is_current(a));
        assert!(t.is_current(b));
    }
}
