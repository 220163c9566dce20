//! PDCP transmit entity - sequence numbering, integrity protection,
//! ciphering, discard timers and the status report / data recovery
//! procedures of TS38.323.

mod config;
mod control;
mod discard;
mod entity_tx;
mod header;
mod interfaces;
mod task;
mod transforms;

pub use config::{
    PdcpDiscardTimer, PdcpMaxCount, PdcpRbType, PdcpRlcMode, PdcpSecurityConfig, PdcpSnSize,
    PdcpTxConfig,
};
pub use control::StatusReport;
pub use discard::{DiscardTimer, TimerFactory};
pub use entity_tx::PdcpEntityTx;
pub use interfaces::{
    PdcpStatusProvider, PdcpTxCounters, PdcpTxLowerLayer, PdcpTxPdu, PdcpTxUpperLayer,
};
pub use task::PdcpTxHandle;
