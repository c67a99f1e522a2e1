//! Request lifecycle shared by the state containers

/// Where the most recent request of a container stands
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LoadState {
    /// No request outstanding, last one succeeded (or none was made)
    #[default]
    Idle,

    /// A request is outstanding
    Loading,

    /// The last request failed; the message is for display only
    Failed(String),
}

impl LoadState {
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadState::Loading)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, LoadState::Failed(_))
    }
}

/// Orders overlapping requests of one container
///
/// Every request takes a ticket before it is sent. A response is applied
/// only if its ticket is newer than the last applied one, so a slow reply
/// can never overwrite a fresher one.
#[derive(Debug, Default)]
pub(crate) struct Tickets {
    issued: u64,
    applied: u64,
}

impl Tickets {
    pub(crate) fn issue(&mut self) -> u64 {
        self.issued += 1;
        self.issued
    }

    /// Marks `ticket` applied; false if a newer response already was
    pub(crate) fn accept(&mut self, ticket: u64) -> bool {
        if ticket > self.applied {
            self.applied = ticket;
            true
        } else {
            false
        }
    }

    /// Whether `ticket` is the most recently issued one
    pub(crate) fn is_latest(&self, ticket: u64) -> bool {
        ticket == self.issued
    }
}
