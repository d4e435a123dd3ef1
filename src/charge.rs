use chrono::{NaiveDate, NaiveDateTime};
use hourglass_rs::SafeTimeProvider;
use serde::{Deserialize, Serialize};

use crate::decimal::Money;
use crate::enrollment::{Enrollment, Transaction};
use crate::errors::{BillingError, Result};
use crate::events::{Event, EventStore};
use crate::ledger::{self, BillingMeta};
use crate::method;
use crate::types::{ChargePhase, EnrollmentId, PaymentMethodId};

/// shown when the gateway rejects without a usable message
const FALLBACK_ERROR_MESSAGE: &str = "payment could not be processed";

/// dispatch triple handed to the transport layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChargeRequest {
    pub enrollment_id: EnrollmentId,
    pub payment_method_id: PaymentMethodId,
    pub amount: Money,
}

/// gateway settlement: a ledger transaction, declined or not
#[derive(Debug, Clone)]
pub struct GatewayResponse {
    pub transaction: Transaction,
    pub declined: bool,
}

/// gateway rejection with no transaction produced
#[derive(Debug, Clone, Default)]
pub struct GatewayFailure {
    pub message: Option<String>,
    pub needs_reauthentication: bool,
}

/// external payment gateway collaborator
pub trait PaymentGateway {
    fn charge(&self, request: &ChargeRequest) -> std::result::Result<GatewayResponse, GatewayFailure>;
}

/// charge attempt orchestration for one loaded enrollment. Owns the
/// enrollment value and its derived metadata; every fold replaces both.
pub struct ChargeSession {
    enrollment: Enrollment,
    meta: BillingMeta,
    selected_method: Option<PaymentMethodId>,
    phase: ChargePhase,
    last_failure: Option<GatewayFailure>,
    events: EventStore,
}

impl ChargeSession {
    /// load an enrollment: derive metadata and auto-select the method the
    /// store designates primary
    pub fn new(enrollment: Enrollment, now: NaiveDateTime) -> Self {
        let meta = ledger::compute_meta(&enrollment, now);
        let selected_method = method::auto_select(&enrollment.payment_methods);

        let mut events = EventStore::new();
        events.emit(Event::EnrollmentLoaded {
            enrollment_id: enrollment.id,
            balance: meta.balance,
            next_installment: meta.next_installment,
        });

        Self {
            enrollment,
            meta,
            selected_method,
            phase: ChargePhase::Idle,
            last_failure: None,
            events,
        }
    }

    pub fn enrollment(&self) -> &Enrollment {
        &self.enrollment
    }

    pub fn meta(&self) -> &BillingMeta {
        &self.meta
    }

    pub fn phase(&self) -> ChargePhase {
        self.phase
    }

    pub fn selected_method(&self) -> Option<PaymentMethodId> {
        self.selected_method
    }

    pub fn events(&self) -> &[Event] {
        self.events.events()
    }

    pub fn take_events(&mut self) -> Vec<Event> {
        self.events.take_events()
    }

    /// default charge amount: never more than what is actually owed, which
    /// covers the final, smaller installment of a plan
    pub fn proposed_amount(&self) -> Money {
        self.enrollment.installment.min(self.meta.balance.max(Money::ZERO))
    }

    /// change the selected payment method; a target that is absent or
    /// ineligible right now is rejected as a no-op
    pub fn select_method(&mut self, method_id: PaymentMethodId, today: NaiveDate) -> bool {
        let eligible = self
            .enrollment
            .payment_methods
            .iter()
            .find(|m| m.id == method_id)
            .map_or(false, |m| method::is_eligible(m, today));

        if eligible {
            self.selected_method = Some(method_id);
            self.events.emit(Event::MethodSelected {
                enrollment_id: self.enrollment.id,
                method_id,
            });
        } else {
            self.events.emit(Event::MethodRejected {
                enrollment_id: self.enrollment.id,
                method_id,
            });
        }

        eligible
    }

    /// dispatch a charge attempt. Returns None without changing state when
    /// a charge is already in flight (duplicate trigger events are expected
    /// and dropped here, not by the caller), when no method is selected, or
    /// when the amount is not positive.
    pub fn try_begin(&mut self, amount: Money, now: NaiveDateTime) -> Option<ChargeRequest> {
        if !self.phase.can_launch() {
            return None;
        }
        let payment_method_id = self.selected_method?;
        if !amount.is_positive() {
            return None;
        }

        self.phase = ChargePhase::Processing;
        self.last_failure = None;
        self.events.emit(Event::ChargeDispatched {
            enrollment_id: self.enrollment.id,
            method_id: payment_method_id,
            amount,
            timestamp: now,
        });

        Some(ChargeRequest {
            enrollment_id: self.enrollment.id,
            payment_method_id,
            amount,
        })
    }

    /// apply a settled charge: fold the transaction, refresh metadata
    pub fn resolve_success(&mut self, transaction: Transaction, now: NaiveDateTime) -> Result<()> {
        self.ensure_in_flight()?;

        let transaction_id = transaction.id;
        let amount = transaction.amount;
        self.fold(transaction, now)?;
        self.phase = ChargePhase::Success;
        self.events.emit(Event::ChargeSucceeded {
            enrollment_id: self.enrollment.id,
            transaction_id,
            amount,
            new_balance: self.meta.balance,
            timestamp: now,
        });

        Ok(())
    }

    /// apply an explicit gateway refusal: the decline record is folded
    /// exactly as on success, only the resulting phase differs
    pub fn resolve_declined(&mut self, transaction: Transaction, now: NaiveDateTime) -> Result<()> {
        self.ensure_in_flight()?;

        let transaction_id = transaction.id;
        let attempted_amount = transaction.attempted_amount;
        self.fold(transaction, now)?;
        self.phase = ChargePhase::Declined;
        self.events.emit(Event::ChargeDeclined {
            enrollment_id: self.enrollment.id,
            transaction_id,
            attempted_amount,
            new_balance: self.meta.balance,
            timestamp: now,
        });

        Ok(())
    }

    /// apply a transport or validation failure: no ledger mutation; the
    /// re-authentication signal is stored for the caller to act on
    pub fn resolve_failure(&mut self, failure: GatewayFailure, now: NaiveDateTime) -> Result<()> {
        self.ensure_in_flight()?;

        self.phase = ChargePhase::Error;
        self.events.emit(Event::ChargeFailed {
            enrollment_id: self.enrollment.id,
            message: failure
                .message
                .clone()
                .unwrap_or_else(|| FALLBACK_ERROR_MESSAGE.to_string()),
            needs_reauthentication: failure.needs_reauthentication,
            timestamp: now,
        });
        self.last_failure = Some(failure);

        Ok(())
    }

    /// human-readable failure text, present only in the error phase
    pub fn error_message(&self) -> Option<&str> {
        match self.phase {
            ChargePhase::Error => Some(
                self.last_failure
                    .as_ref()
                    .and_then(|f| f.message.as_deref())
                    .unwrap_or(FALLBACK_ERROR_MESSAGE),
            ),
            _ => None,
        }
    }

    /// the caller should redirect to login when set
    pub fn needs_reauthentication(&self) -> bool {
        self.last_failure
            .as_ref()
            .map_or(false, |f| f.needs_reauthentication)
    }

    /// start a fresh attempt cycle after a settled charge
    pub fn reset(&mut self) {
        self.phase = ChargePhase::Idle;
        self.last_failure = None;
    }

    /// drive one full charge cycle against the gateway collaborator. A
    /// guard-dropped dispatch leaves state untouched and reports the
    /// current phase.
    pub fn charge_with(
        &mut self,
        gateway: &dyn PaymentGateway,
        amount: Money,
        time_provider: &SafeTimeProvider,
    ) -> Result<ChargePhase> {
        let now = time_provider.now().naive_local();

        let request = match self.try_begin(amount, now) {
            Some(request) => request,
            None => return Ok(self.phase),
        };

        match gateway.charge(&request) {
            Ok(response) if response.declined => self.resolve_declined(response.transaction, now)?,
            Ok(response) => self.resolve_success(response.transaction, now)?,
            Err(failure) => self.resolve_failure(failure, now)?,
        }

        Ok(self.phase)
    }

    fn ensure_in_flight(&self) -> Result<()> {
        if !self.phase.is_in_flight() {
            return Err(BillingError::ChargeNotInFlight { phase: self.phase });
        }
        Ok(())
    }

    fn fold(&mut self, transaction: Transaction, now: NaiveDateTime) -> Result<()> {
        let transaction_id = transaction.id;
        let amount = transaction.amount;

        self.enrollment = ledger::fold_transaction(&self.enrollment, transaction)?;
        self.meta = ledger::compute_meta(&self.enrollment, now);
        self.events.emit(Event::TransactionFolded {
            enrollment_id: self.enrollment.id,
            transaction_id,
            amount,
            new_balance: self.meta.balance,
        });

        Ok(())
    }
}
