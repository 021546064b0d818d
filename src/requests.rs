use std::collections::HashMap;
use std::sync::Mutex;

/// Identity of an in-flight request within a scope
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestTicket {
    scope: String,
    generation: u64,
}

impl RequestTicket {
    pub fn scope(&self) -> &str {
        &self.scope
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Outcome of a request that may have been overtaken by a newer one
#[derive(Debug, Clone, PartialEq)]
pub enum Fetched<T> {
    /// No newer request in the same scope has started
    Current(T),
    /// A newer request started after this one; its result should be shown instead
    Superseded,
}

impl<T> Fetched<T> {
    pub fn current(self) -> Option<T> {
        match self {
            Fetched::Current(value) => Some(value),
            Fetched::Superseded => None,
        }
    }

    pub fn is_superseded(&self) -> bool {
        matches!(self, Fetched::Superseded)
    }
}

/// Tracks the latest request started per scope.
///
/// Responses can arrive in any order. A result is current only if no
/// request in its scope was started after it, regardless of which
/// response arrived first.
#[derive(Debug, Default)]
pub struct RequestTracker {
    latest: Mutex<HashMap<String, u64>>,
}

impl RequestTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new request in `scope`, superseding earlier ones
    pub fn begin(&self, scope: &str) -> RequestTicket {
        let mut latest = match self.latest.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let generation = latest.entry(scope.to_string()).or_insert(0);
        *generation += 1;
        RequestTicket {
            scope: scope.to_string(),
            generation: *generation,
        }
    }

    pub fn is_current(&self, ticket: &RequestTicket) -> bool {
        let latest = match self.latest.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        latest.get(&ticket.scope) == Some(&ticket.generation)
    }

    /// Wrap `value` according to whether `ticket` is still the latest in its scope
    pub fn settle<T>(&self, ticket: &RequestTicket, value: T) -> Fetched<T> {
        if self.is_current(ticket) {
            Fetched::Current(value)
        } else {
            Fetched::Superseded
        }
    }
}
