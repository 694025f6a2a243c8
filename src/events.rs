use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::decimal::{Money, Rate};
use crate::types::{CashFlowId, CashFlowKind};

/// all events that can be emitted by a simulation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    // ledger events
    CashFlowRecorded {
        id: CashFlowId,
        date: NaiveDate,
        kind: CashFlowKind,
        amount: Money,
    },
    CashFlowRemoved {
        id: CashFlowId,
        date: NaiveDate,
        kind: CashFlowKind,
        amount: Money,
    },

    // schedule events
    RateChanged {
        sequence_number: u32,
        old_rate: Rate,
        new_rate: Rate,
    },
    DefaultRateChanged {
        old_rate: Rate,
        new_rate: Rate,
    },
    PeriodsExtended {
        added: usize,
        total: usize,
        last_end: Option<NaiveDate>,
    },

    // accrual events
    AccrualRun {
        periods: usize,
        total_interest: Money,
        final_balance: Money,
    },
}

/// event store for collecting events during operations
#[derive(Debug, Default)]
pub struct EventStore {
    events: Vec<Event>,
}

impl EventStore {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn emit(&mut self, event: Event) {
        self.events.push(event);
    }

    pub fn take_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_take_drains_store() {
        let mut store = EventStore::new();
        store.emit(Event::RateChanged {
            sequence_number: 2,
            old_rate: Rate::from_percentage(2),
            new_rate: Rate::from_percentage(3),
        });
        store.emit(Event::PeriodsExtended {
            added: 1,
            total: 4,
            last_end: None,
        });

        assert_eq!(store.len(), 2);
        let taken = store.take_events();
        assert_eq!(taken.len(), 2);
        assert!(store.is_empty());
    }
}
