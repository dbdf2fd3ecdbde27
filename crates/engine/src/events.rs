use serde::{Deserialize, Serialize};

/// Structured progress signals recorded during a generation run. The engine
/// never prints; callers read these out of the final report.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum EngineEvent {
    PoolFiltered {
        filter: String,
        kept: usize,
        dropped: usize,
    },
    CommanderSelected {
        name: String,
    },
    GenerationImproved {
        generation: u32,
        fitness: f64,
    },
    Converged {
        generation: u32,
    },
    PassAdjusted {
        pass: String,
        detail: String,
    },
}

#[derive(Debug, Clone, Default)]
pub struct EventBus {
    events: Vec<EngineEvent>,
}

impl EventBus {
    pub fn push(&mut self, event: EngineEvent) {
        self.events.push(event);
    }

    pub fn drain(&mut self) -> Vec<EngineEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
