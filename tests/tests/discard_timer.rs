use anyhow::Result;
use atomic_counter::AtomicCounter;
use pdcp::{PdcpDiscardTimer, PdcpRlcMode};
use pdcp_tests::{LowerLayerEvent, framework::*};
use std::time::Duration;

#[async_std::test]
async fn discard_timer_expiry_notifies_lower_layer() -> Result<()> {
    let bearer = spawn_bearer(drb_config(PdcpRlcMode::Am, PdcpDiscardTimer::Ms(20)))?;

    bearer.handle.handle_sdu(vec![0xaa]).await?;
    let LowerLayerEvent::NewPdu(_) = next_lower_event(&bearer.lower_rx).await? else {
        panic!("expected a PDU");
    };

    assert_eq!(
        next_lower_event(&bearer.lower_rx).await?,
        LowerLayerEvent::DiscardPdu(0)
    );
    assert_eq!(bearer.counters.discard_timeouts.get(), 1);
    Ok(())
}

#[async_std::test]
async fn confirmation_cancels_discard_timer() -> Result<()> {
    let bearer = spawn_bearer(drb_config(PdcpRlcMode::Am, PdcpDiscardTimer::Ms(100)))?;

    bearer.handle.handle_sdu(vec![0xaa]).await?;
    let LowerLayerEvent::NewPdu(_) = next_lower_event(&bearer.lower_rx).await? else {
        panic!("expected a PDU");
    };

    // Status report with FMC=1: COUNT 0 is confirmed.
    bearer
        .handle
        .handle_status_report(vec![0x00, 0x00, 0x00, 0x00, 0x01])
        .await?;
    assert_eq!(
        next_lower_event(&bearer.lower_rx).await?,
        LowerLayerEvent::DiscardPdu(0)
    );

    // The timer was cancelled: no second discard when it would have fired.
    expect_lower_silence(&bearer.lower_rx, Duration::from_millis(300)).await;
    assert_eq!(bearer.counters.discard_timeouts.get(), 0);
    Ok(())
}

#[async_std::test]
async fn dropping_the_handle_cancels_pending_timers() -> Result<()> {
    let bearer = spawn_bearer(drb_config(PdcpRlcMode::Am, PdcpDiscardTimer::Ms(100)))?;

    bearer.handle.handle_sdu(vec![0xaa]).await?;
    let LowerLayerEvent::NewPdu(_) = next_lower_event(&bearer.lower_rx).await? else {
        panic!("expected a PDU");
    };

    drop(bearer.handle);
    expect_lower_silence(&bearer.lower_rx, Duration::from_millis(300)).await;
    assert_eq!(bearer.counters.discard_timeouts.get(), 0);
    Ok(())
}
