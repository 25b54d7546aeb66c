//! Mock Payment Gateway
//!
//! For testing and demo purposes. Keeps sessions in memory and records
//! every call so tests can assert on what the provider was asked to do.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use super::{CreatedSession, PaymentGateway, PaymentStatus, SessionRecord, SessionSpec};
use crate::error::{PaymentError, Result};

/// In-memory gateway with call accounting
#[derive(Default)]
pub struct MockGateway {
    state: Mutex<MockState>,
}

#[derive(Default)]
struct MockState {
    sessions: HashMap<String, SessionRecord>,
    created: Vec<SessionSpec>,
    create_calls: usize,
    retrieve_calls: usize,
    fail_provider: bool,
    next_id: usize,
}

impl MockGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a session as if the provider already held it
    pub fn seed_session(&self, record: SessionRecord) {
        let mut state = self.state.lock().unwrap();
        state.sessions.insert(record.id.clone(), record);
    }

    /// Make every subsequent call fail as a provider outage
    pub fn fail_provider(&self) {
        self.state.lock().unwrap().fail_provider = true;
    }

    /// Specs of every session created so far, in order
    pub fn created_specs(&self) -> Vec<SessionSpec> {
        self.state.lock().unwrap().created.clone()
    }

    pub fn create_calls(&self) -> usize {
        self.state.lock().unwrap().create_calls
    }

    pub fn retrieve_calls(&self) -> usize {
        self.state.lock().unwrap().retrieve_calls
    }
}

#[async_trait]
impl PaymentGateway for MockGateway {
    async fn create_session(&self, spec: SessionSpec) -> Result<CreatedSession> {
        let mut state = self.state.lock().unwrap();
        state.create_calls += 1;

        if state.fail_provider {
            return Err(PaymentError::Provider("mock provider outage".into()));
        }

        state.next_id += 1;
        let id = format!("cs_test_{:06}", state.next_id);

        state.sessions.insert(
            id.clone(),
            SessionRecord {
                id: id.clone(),
                amount_total: spec.amount_minor,
                customer_email: spec.customer_email.clone(),
                metadata: spec.metadata.clone(),
                payment_status: PaymentStatus::Unpaid,
            },
        );
        state.created.push(spec);

        Ok(CreatedSession {
            redirect_url: format!("https://checkout.mock.test/c/pay/{id}"),
            id,
        })
    }

    async fn retrieve_session(&self, session_id: &str) -> Result<SessionRecord> {
        let mut state = self.state.lock().unwrap();
        state.retrieve_calls += 1;

        if state.fail_provider {
            return Err(PaymentError::Provider("mock provider outage".into()));
        }

        state
            .sessions
            .get(session_id)
            .cloned()
            .ok_or_else(|| PaymentError::SessionNotFound(session_id.to_string()))
    }

    fn name(&self) -> &str {
        "mock"
    }
}
