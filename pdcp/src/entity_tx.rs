//! PDCP transmit entity - TS38.323, 5.2.1 (transmit operation), 5.4
//! (status reporting) and 5.5 (data recovery).

use crate::config::{PdcpDiscardTimer, PdcpRbType, PdcpRlcMode, PdcpTxConfig};
use crate::control::StatusReport;
use crate::discard::{DiscardLedger, TimerFactory};
use crate::header::write_data_pdu_header;
use crate::interfaces::{
    PdcpStatusProvider, PdcpTxCounters, PdcpTxLowerLayer, PdcpTxPdu, PdcpTxUpperLayer,
};
use crate::transforms::{CipheringTransform, IntegrityTransform};
use anyhow::Result;
use atomic_counter::AtomicCounter;
use slog::{Logger, debug, error, info, warn};
use std::sync::Arc;
use std::time::Duration;

/// Transmit side of a PDCP entity.
///
/// All methods mutate shared COUNT and ledger state and must run on the
/// entity's owning context - see `PdcpEntityTx::spawn`, which binds an
/// entity to a single task and serializes calls and timer expiries through
/// one channel.
pub struct PdcpEntityTx {
    cfg: PdcpTxConfig,
    integrity: Option<IntegrityTransform>,
    ciphering: Option<CipheringTransform>,

    /// The next COUNT to assign.  Strictly increasing, never reused.
    tx_next: u32,
    max_count_notified: bool,
    max_count_overflow: bool,

    ledger: DiscardLedger,

    lower: Box<dyn PdcpTxLowerLayer>,
    upper: Box<dyn PdcpTxUpperLayer>,
    status_provider: Box<dyn PdcpStatusProvider>,
    timers: Box<dyn TimerFactory>,
    counters: Arc<PdcpTxCounters>,
    logger: Logger,
}

impl PdcpEntityTx {
    pub fn new(
        cfg: PdcpTxConfig,
        lower: Box<dyn PdcpTxLowerLayer>,
        upper: Box<dyn PdcpTxUpperLayer>,
        status_provider: Box<dyn PdcpStatusProvider>,
        timers: Box<dyn TimerFactory>,
        counters: Arc<PdcpTxCounters>,
        logger: Logger,
    ) -> Result<Self> {
        cfg.validate()?;
        let integrity = IntegrityTransform::resolve(&cfg.security, cfg.rb_type)?;
        let ciphering = CipheringTransform::resolve(&cfg.security, cfg.rb_type)?;
        Ok(Self {
            cfg,
            integrity,
            ciphering,
            tx_next: 0,
            max_count_notified: false,
            max_count_overflow: false,
            ledger: DiscardLedger::default(),
            lower,
            upper,
            status_provider,
            timers,
            counters,
            logger,
        })
    }

    pub fn tx_next(&self) -> u32 {
        self.tx_next
    }

    /// TS38.323, 5.2.1: receive an SDU from the upper layer, protect it and
    /// hand the resulting data PDU to the lower layer.
    pub fn handle_sdu(&mut self, sdu: Vec<u8>) {
        if sdu.is_empty() {
            warn!(self.logger, "Dropping empty SDU");
            return;
        }
        self.counters.tx_sdus.inc();
        self.counters.tx_sdu_bytes.add(sdu.len());

        // A COUNT must never be reused under the same key (TS38.331,
        // 5.3.1.2).  The upper layer is warned once at the notify ceiling
        // so it can refresh the keys; at the hard ceiling we refuse to
        // transmit until it does.
        if self.tx_next >= self.cfg.max_count.hard {
            if !self.max_count_overflow {
                error!(
                    self.logger,
                    "Reached maximum COUNT, refusing to transmit further. COUNT={}", self.tx_next
                );
                self.upper.on_protocol_failure();
                self.max_count_overflow = true;
            }
            return;
        }
        if self.tx_next >= self.cfg.max_count.notify && !self.max_count_notified {
            warn!(
                self.logger,
                "Approaching COUNT wrap-around, notifying upper layer. COUNT={}", self.tx_next
            );
            self.upper.on_max_count_reached();
            self.max_count_notified = true;
        }

        let count = self.tx_next;
        let mut header = Vec::with_capacity(self.cfg.sn_size.header_len());
        write_data_pdu_header(&mut header, self.cfg.rb_type, self.cfg.sn_size, self.sn(count));

        let pdu = self.protect(&header, sdu, count);

        // Start the discard timer.  On AM DRBs the PDU is retained for the
        // data recovery procedure.
        if let PdcpDiscardTimer::Ms(ms) = self.cfg.discard_timer {
            let timer = self.timers.start_one_shot(count, Duration::from_millis(ms as u64));
            let retained = (self.is_drb() && self.cfg.rlc_mode == PdcpRlcMode::Am)
                .then(|| pdu.clone());
            self.ledger.insert(count, retained, timer);
            debug!(self.logger, "Discard timer set for COUNT={}. Timeout: {}ms", count, ms);
        }

        self.write_data_pdu_to_lower_layers(count, pdu);
        self.tx_next += 1;
    }

    /// TS38.323, 5.4.2: process a status report from the peer.  Everything
    /// below the FMC is implicitly confirmed; the bitmap confirms
    /// individual COUNTs from FMC+1 onwards.  Malformed reports are logged
    /// and dropped without touching any state.
    pub fn handle_status_report(&mut self, buf: &[u8]) {
        let report = match StatusReport::parse(buf) {
            Ok(report) => report,
            Err(e) => {
                warn!(self.logger, "Ignoring status report: {e}");
                return;
            }
        };
        info!(self.logger, "Received PDCP status report with FMC={}", report.fmc);

        for count in self.ledger.confirm_below(report.fmc) {
            debug!(self.logger, "Discarding SDU with COUNT={}", count);
            self.lower.on_discard_pdu(count);
        }

        let mut count = report.fmc;
        for confirmed in report.bitmap_bits() {
            count = count.wrapping_add(1);
            if confirmed {
                debug!(self.logger, "Discarding SDU with COUNT={}", count);
                self.lower.on_discard_pdu(count);
                self.ledger.remove(count);
            }
        }
    }

    /// TS38.323, 5.4.1: hand a compiled status report to the lower layer as
    /// a control PDU.
    pub fn send_status_report(&self) {
        if !self.cfg.status_report_required {
            warn!(self.logger, "Status report triggered but not configured");
            return;
        }
        info!(self.logger, "Status report triggered");
        let report = self.status_provider.compile_status_report();
        self.write_control_pdu_to_lower_layers(report);
    }

    /// TS38.323, 5.5: retransmit every PDU still awaiting confirmation, in
    /// ascending COUNT order.  Entries stay in the ledger; only timer
    /// expiry or a later status report removes them.  Only valid on an AM
    /// DRB.
    pub fn data_recovery(&self) {
        assert!(
            self.is_drb() && self.cfg.rlc_mode == PdcpRlcMode::Am,
            "data recovery requested on a bearer that is not an AM DRB"
        );
        info!(self.logger, "Data recovery requested");
        if self.cfg.status_report_required {
            self.send_status_report();
        }
        for (count, record) in self.ledger.iter() {
            if let Some(buf) = &record.retained_pdu {
                self.write_data_pdu_to_lower_layers(count, buf.clone());
            }
        }
    }

    /// Discard timer expiry, delivered by the timer factory into the
    /// entity's context.  A COUNT already confirmed by a status report has
    /// no ledger entry any more; its late expiry event is ignored.
    pub fn handle_discard_expiry(&mut self, count: u32) {
        if self.ledger.remove(count).is_none() {
            return;
        }
        debug!(self.logger, "Discard timer expired for PDU with COUNT={}", count);
        self.lower.on_discard_pdu(count);
        self.counters.discard_timeouts.inc();
    }

    /// Apply integrity protection and ciphering - TS38.323, 5.8/5.9.  The
    /// MAC-I is computed over header and SDU; ciphering covers the SDU and
    /// MAC-I but not the header.
    fn protect(&self, header: &[u8], sdu: Vec<u8>, count: u32) -> Vec<u8> {
        let mut payload = sdu;

        // SRB PDUs always carry a MAC-I field, zero when integrity
        // protection is off.  DRB PDUs carry one only when integrity
        // protection is enabled.
        if !self.is_drb() || self.integrity.is_some() {
            let mac = match &self.integrity {
                Some(integrity) => {
                    let mut message = Vec::with_capacity(header.len() + payload.len());
                    message.extend_from_slice(header);
                    message.extend_from_slice(&payload);
                    integrity.mac(count, &message)
                }
                None => [0u8; 4],
            };
            payload.extend_from_slice(&mac);
        }

        if let Some(ciphering) = &self.ciphering {
            ciphering.apply(count, &mut payload);
        }

        let mut pdu = Vec::with_capacity(header.len() + payload.len());
        pdu.extend_from_slice(header);
        pdu.append(&mut payload);
        pdu
    }

    fn write_data_pdu_to_lower_layers(&self, count: u32, buf: Vec<u8>) {
        info!(
            self.logger,
            "TX data PDU ({}B), COUNT={}, HFN={}, SN={}, integrity={}, ciphering={}",
            buf.len(),
            count,
            self.hfn(count),
            self.sn(count),
            self.integrity.is_some(),
            self.ciphering.is_some()
        );
        self.counters.tx_pdus.inc();
        self.counters.tx_pdu_bytes.add(buf.len());
        // COUNT is attached only for data PDUs on DRBs.
        let count = self.is_drb().then_some(count);
        self.lower.on_new_pdu(PdcpTxPdu { buf, count });
    }

    fn write_control_pdu_to_lower_layers(&self, buf: Vec<u8>) {
        info!(self.logger, "TX control PDU ({}B)", buf.len());
        self.counters.tx_pdus.inc();
        self.counters.tx_pdu_bytes.add(buf.len());
        self.lower.on_new_pdu(PdcpTxPdu { buf, count: None });
    }

    fn is_drb(&self) -> bool {
        self.cfg.rb_type == PdcpRbType::Drb
    }

    fn sn(&self, count: u32) -> u32 {
        count & self.cfg.sn_size.sn_mask()
    }

    fn hfn(&self, count: u32) -> u32 {
        count >> self.cfg.sn_size.bits()
    }

    #[cfg(test)]
    fn set_tx_next(&mut self, count: u32) {
        self.tx_next = count;
    }

    #[cfg(test)]
    fn pending_count(&self, count: u32) -> bool {
        self.ledger.contains(count)
    }

    #[cfg(test)]
    fn pending_len(&self) -> usize {
        self.ledger.len()
    }
}
