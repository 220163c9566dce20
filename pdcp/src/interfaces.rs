//! Collaborator interfaces of the transmit entity.

use atomic_counter::RelaxedCounter;

/// A PDU handed to the lower layer (RLC).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PdcpTxPdu {
    pub buf: Vec<u8>,
    /// COUNT of the PDU.  Set only for data PDUs on DRBs; the receiver of
    /// an SRB PDU reconstructs the COUNT from its own state and the SN.
    pub count: Option<u32>,
}

/// Notifications towards the lower layer.  Fire-and-forget: implementations
/// must not block.
pub trait PdcpTxLowerLayer: Send {
    fn on_new_pdu(&self, pdu: PdcpTxPdu);

    /// The PDU with this COUNT no longer needs to be transmitted.
    fn on_discard_pdu(&self, count: u32);
}

/// Notifications towards the upper layer.  Each fires at most once per
/// entity lifetime.
pub trait PdcpTxUpperLayer: Send {
    /// COUNT reached the hard ceiling; the bearer needs a key refresh
    /// before anything more can be sent.
    fn on_protocol_failure(&self);

    /// COUNT is approaching the ceiling.
    fn on_max_count_reached(&self);
}

/// Compiles status report control PDUs on behalf of the entity.
pub trait PdcpStatusProvider: Send {
    fn compile_status_report(&self) -> Vec<u8>;
}

/// Shared transmit counters.  Observability only - never consulted by the
/// transmit path.
pub struct PdcpTxCounters {
    pub tx_sdus: RelaxedCounter,
    pub tx_sdu_bytes: RelaxedCounter,
    pub tx_pdus: RelaxedCounter,
    pub tx_pdu_bytes: RelaxedCounter,
    pub discard_timeouts: RelaxedCounter,
}

impl Default for PdcpTxCounters {
    fn default() -> Self {
        Self {
            tx_sdus: RelaxedCounter::new(0),
            tx_sdu_bytes: RelaxedCounter::new(0),
            tx_pdus: RelaxedCounter::new(0),
            tx_pdu_bytes: RelaxedCounter::new(0),
            discard_timeouts: RelaxedCounter::new(0),
        }
    }
}
