/// Generation ticket attached to every image load.
///
/// Tickets are issued from one monotonic counter, so a completion can be
/// matched against the load a slot is still waiting for and anything older is
/// recognised as stale.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct LoadTicket(pub u64);

#[derive(Debug, Default)]
pub struct TicketIssuer {
    next: u64,
}

impl TicketIssuer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn issue(&mut self) -> LoadTicket {
        self.next += 1;
        LoadTicket(self.next)
    }

    /// Most recently issued ticket, if any.
    pub fn latest(&self) -> Option<LoadTicket> {
        (self.next > 0).then_some(LoadTicket(self.next))
    }
}

/// What the host reports back for a load it was asked to perform.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum LoadOutcome {
    Loaded,
    Failed { reason: String },
}

impl LoadOutcome {
    pub fn failed(reason: impl Into<String>) -> Self {
        LoadOutcome::Failed {
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{LoadTicket, TicketIssuer};

    #[test]
    fn tickets_are_monotonic() {
        let mut issuer = TicketIssuer::new();
        assert_eq!(issuer.latest(), None);
        let a = issuer.issue();
        let b = issuer.issue();
        assert!(b > a);
        assert_eq!(issuer.latest(), Some(LoadTicket(2)));
    }
}
