//! In-memory session with scripted outcomes
//!
//! Every call succeeds unless a step was queued for it. Steps are consumed
//! in order, per `(call, target)` pair. The session keeps a call log with
//! timestamps and tracks which dialogs survive, so a rehearsal run sees the
//! same remote state a real one would.

use super::error::{TransportError, TransportResult};
use super::RemoteSession;
use crate::core::models::RelationshipEntity;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::{HashMap, VecDeque};
use std::time::Duration;
use tokio::time::Instant;

/// Which session operation was called
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionCall {
    Leave,
    DeleteHistory { revoke: bool },
    ListContacts,
    DeleteContacts,
    ListDialogs,
    Archive,
}

/// One logged call
#[derive(Debug, Clone)]
pub struct CallRecord {
    pub call: SessionCall,
    /// Entity id for entity-scoped calls
    pub target: Option<i64>,
    pub started_at: Instant,
    pub finished_at: Instant,
}

#[derive(Debug, Clone)]
enum Step {
    Fail(TransportError),
    Panic,
}

#[derive(Debug, Default)]
struct State {
    steps: HashMap<(SessionCall, Option<i64>), VecDeque<Step>>,
    contacts: Vec<i64>,
    dialogs: Vec<RelationshipEntity>,
    removed_contacts: Vec<i64>,
    archived: Vec<i64>,
    log: Vec<CallRecord>,
}

/// Scriptable [`RemoteSession`]
#[derive(Debug, Default)]
pub struct ScriptedSession {
    state: Mutex<State>,
    latency: Duration,
}

impl ScriptedSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_contacts(self, contacts: Vec<i64>) -> Self {
        self.state.lock().contacts = contacts;
        self
    }

    /// Dialogs present before the run
    pub fn with_dialogs(self, dialogs: Vec<RelationshipEntity>) -> Self {
        self.state.lock().dialogs = dialogs;
        self
    }

    /// Time every call takes
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Queue a failure for the next matching call
    pub fn fail(self, call: SessionCall, target: Option<i64>, error: TransportError) -> Self {
        self.push_step(call, target, Step::Fail(error));
        self
    }

    /// Queue a panic for the next matching call
    pub fn panic_on(self, call: SessionCall, target: Option<i64>) -> Self {
        self.push_step(call, target, Step::Panic);
        self
    }

    fn push_step(&self, call: SessionCall, target: Option<i64>, step: Step) {
        self.state
            .lock()
            .steps
            .entry((call, target))
            .or_default()
            .push_back(step);
    }

    pub fn calls(&self) -> Vec<CallRecord> {
        self.state.lock().log.clone()
    }

    pub fn calls_for(&self, target: i64) -> Vec<CallRecord> {
        self.state
            .lock()
            .log
            .iter()
            .filter(|r| r.target == Some(target))
            .cloned()
            .collect()
    }

    pub fn count(&self, call: SessionCall) -> usize {
        self.state.lock().log.iter().filter(|r| r.call == call).count()
    }

    pub fn total_calls(&self) -> usize {
        self.state.lock().log.len()
    }

    pub fn removed_contacts(&self) -> Vec<i64> {
        self.state.lock().removed_contacts.clone()
    }

    pub fn archived(&self) -> Vec<i64> {
        self.state.lock().archived.clone()
    }

    pub fn surviving_dialogs(&self) -> Vec<RelationshipEntity> {
        self.state.lock().dialogs.clone()
    }

    /// Simulate latency, log the call, then resolve the queued step
    async fn invoke(&self, call: SessionCall, target: Option<i64>) -> TransportResult<()> {
        let started_at = Instant::now();
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        let step = {
            let mut state = self.state.lock();
            state.log.push(CallRecord {
                call,
                target,
                started_at,
                finished_at: Instant::now(),
            });
            state
                .steps
                .get_mut(&(call, target))
                .and_then(VecDeque::pop_front)
        };

        match step {
            None => Ok(()),
            Some(Step::Fail(error)) => Err(error),
            Some(Step::Panic) => panic!("scripted panic for {:?} on {:?}", call, target),
        }
    }
}

#[async_trait]
impl RemoteSession for ScriptedSession {
    async fn leave_entity(&self, entity: &RelationshipEntity) -> TransportResult<()> {
        self.invoke(SessionCall::Leave, Some(entity.id)).await?;
        self.state.lock().dialogs.retain(|d| d.id != entity.id);
        Ok(())
    }

    async fn delete_history(
        &self,
        entity: &RelationshipEntity,
        revoke: bool,
    ) -> TransportResult<()> {
        self.invoke(SessionCall::DeleteHistory { revoke }, Some(entity.id))
            .await
    }

    async fn list_contacts(&self) -> TransportResult<Vec<i64>> {
        self.invoke(SessionCall::ListContacts, None).await?;
        let state = self.state.lock();
        Ok(state
            .contacts
            .iter()
            .filter(|id| !state.removed_contacts.contains(id))
            .copied()
            .collect())
    }

    async fn delete_contacts(&self, ids: &[i64]) -> TransportResult<()> {
        self.invoke(SessionCall::DeleteContacts, None).await?;
        self.state.lock().removed_contacts.extend_from_slice(ids);
        Ok(())
    }

    async fn list_dialogs(&self) -> TransportResult<Vec<RelationshipEntity>> {
        self.invoke(SessionCall::ListDialogs, None).await?;
        Ok(self.state.lock().dialogs.clone())
    }

    async fn archive_entity(&self, entity: &RelationshipEntity) -> TransportResult<()> {
        self.invoke(SessionCall::Archive, Some(entity.id)).await?;
        self.state.lock().archived.push(entity.id);
        Ok(())
    }
}
