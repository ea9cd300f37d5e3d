//! Background dispatch for gateway queries.
//!
//! # Responsibility
//! - Run the blocking `QueryGateway::query` on tokio's blocking pool.
//! - Hand finished answers back to the interactive loop through a channel
//!   that is drained without blocking.
//!
//! # Invariants
//! - At most one query is in flight; further submissions get `Busy`.
//! - Outcomes of queries that were abandoned (gateway swapped or cleared)
//!   are dropped by `poll`.
//! - Only the query id and the result cross the task boundary.

use super::{GatewayError, QueryGateway};
use log::{info, warn};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::runtime::Handle;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use uuid::Uuid;

/// Identifier of one submitted query.
pub type QueryId = Uuid;

/// Finished query as seen by the interactive loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryOutcome {
    pub id: QueryId,
    pub result: Result<String, GatewayError>,
    pub elapsed: Duration,
}

/// Serial, non-blocking front for a `QueryGateway`.
pub struct QueryDispatcher {
    runtime: Handle,
    gateway: Option<Arc<dyn QueryGateway>>,
    pending: Option<QueryId>,
    tx: UnboundedSender<QueryOutcome>,
    rx: UnboundedReceiver<QueryOutcome>,
}

impl QueryDispatcher {
    /// Creates a disabled dispatcher that spawns onto `runtime`.
    pub fn new(runtime: Handle) -> Self {
        let (tx, rx) = unbounded_channel();
        Self {
            runtime,
            gateway: None,
            pending: None,
            tx,
            rx,
        }
    }

    /// Installs or removes the gateway. Any pending query is abandoned.
    pub fn set_gateway(&mut self, gateway: Option<Arc<dyn QueryGateway>>) {
        if let Some(id) = self.pending.take() {
            info!(
                "event=query_abandon module=dispatch status=ok query_id={}",
                id
            );
        }
        self.gateway = gateway;
    }

    /// Whether a gateway is installed.
    pub fn is_enabled(&self) -> bool {
        self.gateway.is_some()
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Starts a query in the background.
    ///
    /// Returns `Ok(None)` for a blank prompt (nothing is sent).
    pub fn submit(&mut self, prompt: &str) -> Result<Option<QueryId>, GatewayError> {
        let gateway = self
            .gateway
            .clone()
            .ok_or(GatewayError::CredentialMissing)?;
        if prompt.trim().is_empty() {
            return Ok(None);
        }
        if self.pending.is_some() {
            return Err(GatewayError::Busy);
        }

        let id = Uuid::new_v4();
        let prompt = prompt.to_string();
        let tx = self.tx.clone();
        let started_at = Instant::now();
        let worker = self
            .runtime
            .spawn_blocking(move || gateway.query(&prompt));

        self.runtime.spawn(async move {
            let result = match worker.await {
                Ok(result) => result,
                Err(err) => Err(GatewayError::WorkerFailed(err.to_string())),
            };
            // Receiver gone means the app is shutting down.
            let _ = tx.send(QueryOutcome {
                id,
                result,
                elapsed: started_at.elapsed(),
            });
        });

        self.pending = Some(id);
        info!("event=query_submit module=dispatch status=ok query_id={}", id);
        Ok(Some(id))
    }

    /// Returns the outcome of the pending query once it has finished.
    pub fn poll(&mut self) -> Option<QueryOutcome> {
        while let Ok(outcome) = self.rx.try_recv() {
            if self.pending != Some(outcome.id) {
                info!(
                    "event=query_result module=dispatch status=stale query_id={}",
                    outcome.id
                );
                continue;
            }
            self.pending = None;
            match &outcome.result {
                Ok(_) => info!(
                    "event=query_result module=dispatch status=ok query_id={} duration_ms={}",
                    outcome.id,
                    outcome.elapsed.as_millis()
                ),
                Err(err) => warn!(
                    "event=query_result module=dispatch status=error query_id={} duration_ms={} error={}",
                    outcome.id,
                    outcome.elapsed.as_millis(),
                    err
                ),
            }
            return Some(outcome);
        }
        None
    }
}
