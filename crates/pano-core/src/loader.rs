#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoadTicket {
    generation: u64,
    pub scene_id: String,
    pub url: String,
}

impl LoadTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Hands out load tickets. Only the newest ticket's completion is applied,
/// and none after shutdown.
#[derive(Debug, Default)]
pub struct LoadTracker {
    generation: u64,
    shut_down: bool,
}

impl LoadTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new load; every earlier ticket becomes stale.
    pub fn begin(&mut self, scene_id: &str, url: &str) -> LoadTicket {
        self.generation += 1;
        log::debug!("[load] #{} {} <- {}", self.generation, scene_id, url);
        LoadTicket {
            generation: self.generation,
            scene_id: scene_id.to_string(),
            url: url.to_string(),
        }
    }

    pub fn is_current(&self, ticket: &LoadTicket) -> bool {
        !self.shut_down && ticket.generation == self.generation
    }

    /// Accept a finished load if it is still relevant. Returns false (and logs)
    /// for stale or post-shutdown completions.
    pub fn complete(&mut self, ticket: &LoadTicket) -> bool {
        if !self.is_current(ticket) {
            log::debug!(
                "[load] dropping stale result #{} for {} (latest #{})",
                ticket.generation,
                ticket.scene_id,
                self.generation
            );
            return false;
        }
        true
    }

    /// Reject every outstanding and future completion.
    pub fn shut_down(&mut self) {
        self.shut_down = true;
        self.generation += 1;
    }

    pub fn is_shut_down(&self) -> bool {
        self.shut_down
    }
}
