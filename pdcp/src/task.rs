//! Binds a transmit entity to its own task.  The entity's operations and
//! discard timer expiries are serialized through a single event channel, so
//! the entity itself needs no locking.

use crate::config::PdcpTxConfig;
use crate::discard::{DiscardTimer, TimerFactory};
use crate::entity_tx::PdcpEntityTx;
use crate::interfaces::{PdcpStatusProvider, PdcpTxCounters, PdcpTxLowerLayer, PdcpTxUpperLayer};
use anyhow::Result;
use async_channel::{Sender, WeakSender};
use slog::Logger;
use std::sync::Arc;
use std::time::Duration;
use stop_token::StopSource;
use stop_token::prelude::*;

#[derive(Debug)]
enum PdcpTxEvent {
    Sdu(Vec<u8>),
    StatusReport(Vec<u8>),
    DataRecovery,
    StatusReportTrigger,
    DiscardTimerExpired(u32),
}

/// Handle to a spawned transmit entity.  Dropping the last handle stops the
/// entity task, which cancels all outstanding discard timers.
#[derive(Clone)]
pub struct PdcpTxHandle {
    sender: Sender<PdcpTxEvent>,
}

impl PdcpTxHandle {
    pub async fn handle_sdu(&self, sdu: Vec<u8>) -> Result<()> {
        Ok(self.sender.send(PdcpTxEvent::Sdu(sdu)).await?)
    }

    pub async fn handle_status_report(&self, pdu: Vec<u8>) -> Result<()> {
        Ok(self.sender.send(PdcpTxEvent::StatusReport(pdu)).await?)
    }

    pub async fn data_recovery(&self) -> Result<()> {
        Ok(self.sender.send(PdcpTxEvent::DataRecovery).await?)
    }

    pub async fn send_status_report(&self) -> Result<()> {
        Ok(self.sender.send(PdcpTxEvent::StatusReportTrigger).await?)
    }
}

impl PdcpEntityTx {
    /// Spawn an entity on its own task and return a handle to it.
    pub fn spawn(
        cfg: PdcpTxConfig,
        lower: Box<dyn PdcpTxLowerLayer>,
        upper: Box<dyn PdcpTxUpperLayer>,
        status_provider: Box<dyn PdcpStatusProvider>,
        counters: Arc<PdcpTxCounters>,
        logger: Logger,
    ) -> Result<PdcpTxHandle> {
        let (sender, receiver) = async_channel::unbounded();

        // The factory holds a weak sender so that pending timers do not
        // keep the entity task alive after the last handle is dropped.
        let timers = Box::new(SleepTimerFactory {
            sender: sender.downgrade(),
        });
        let mut entity =
            PdcpEntityTx::new(cfg, lower, upper, status_provider, timers, counters, logger)?;

        async_std::task::spawn(async move {
            while let Ok(event) = receiver.recv().await {
                match event {
                    PdcpTxEvent::Sdu(sdu) => entity.handle_sdu(sdu),
                    PdcpTxEvent::StatusReport(pdu) => entity.handle_status_report(&pdu),
                    PdcpTxEvent::DataRecovery => entity.data_recovery(),
                    PdcpTxEvent::StatusReportTrigger => entity.send_status_report(),
                    PdcpTxEvent::DiscardTimerExpired(count) => entity.handle_discard_expiry(count),
                }
            }
            // Dropping the entity drops the ledger, cancelling every
            // outstanding discard timer.
        });

        Ok(PdcpTxHandle { sender })
    }
}

struct SleepTimerFactory {
    sender: WeakSender<PdcpTxEvent>,
}

impl TimerFactory for SleepTimerFactory {
    fn start_one_shot(&self, count: u32, duration: Duration) -> DiscardTimer {
        let stop = StopSource::new();
        let token = stop.token();
        let sender = self.sender.clone();
        async_std::task::spawn(async move {
            if async_std::task::sleep(duration).timeout_at(token).await.is_ok() {
                if let Some(sender) = sender.upgrade() {
                    let _ = sender.send(PdcpTxEvent::DiscardTimerExpired(count)).await;
                }
            }
        });
        DiscardTimer::new(stop)
    }
}
