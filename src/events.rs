use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::decimal::Money;
use crate::types::{EnrollmentId, PaymentMethodId, TransactionId};

/// all events emitted while operating on an enrollment's billing state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    EnrollmentLoaded {
        enrollment_id: EnrollmentId,
        balance: Money,
        next_installment: Option<NaiveDateTime>,
    },
    MethodSelected {
        enrollment_id: EnrollmentId,
        method_id: PaymentMethodId,
    },
    MethodRejected {
        enrollment_id: EnrollmentId,
        method_id: PaymentMethodId,
    },
    ChargeDispatched {
        enrollment_id: EnrollmentId,
        method_id: PaymentMethodId,
        amount: Money,
        timestamp: NaiveDateTime,
    },
    ChargeSucceeded {
        enrollment_id: EnrollmentId,
        transaction_id: TransactionId,
        amount: Money,
        new_balance: Money,
        timestamp: NaiveDateTime,
    },
    ChargeDeclined {
        enrollment_id: EnrollmentId,
        transaction_id: TransactionId,
        attempted_amount: Money,
        new_balance: Money,
        timestamp: NaiveDateTime,
    },
    ChargeFailed {
        enrollment_id: EnrollmentId,
        message: String,
        needs_reauthentication: bool,
        timestamp: NaiveDateTime,
    },
    TransactionFolded {
        enrollment_id: EnrollmentId,
        transaction_id: TransactionId,
        amount: Money,
        new_balance: Money,
    },
}

/// event store for collecting events during operations
#[derive(Debug, Default)]
pub struct EventStore {
    events: Vec<Event>,
}

impl EventStore {
    pub fn new() -> Self {
        Self {
            events: Vec::new(),
        }
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

    pub fn clear(&mut self) {
        self.events.clear();
    }
}
