use anyhow::Result;
use atomic_counter::AtomicCounter;
use hex_literal::hex;
use pdcp::{PdcpDiscardTimer, PdcpMaxCount, PdcpRlcMode};
use pdcp_tests::{LowerLayerEvent, UpperLayerEvent, framework::*};
use security::{Direction, IntegrityAlgorithm, nia2};
use std::time::Duration;

#[async_std::test]
async fn drb_pdus_carry_header_and_count() -> Result<()> {
    let bearer = spawn_bearer(drb_config(PdcpRlcMode::Um, PdcpDiscardTimer::NotConfigured))?;

    for sdu in [vec![0x01], vec![0x02], vec![0x03]] {
        bearer.handle.handle_sdu(sdu).await?;
    }

    for count in 0..3u32 {
        let LowerLayerEvent::NewPdu(pdu) = next_lower_event(&bearer.lower_rx).await? else {
            panic!("expected a PDU");
        };
        assert_eq!(pdu.count, Some(count));
        assert_eq!(pdu.buf[0], 0x80);
        assert_eq!(pdu.buf[1], count as u8);
        assert_eq!(pdu.buf[2], (count + 1) as u8);
    }
    assert_eq!(bearer.counters.tx_pdus.get(), 3);
    Ok(())
}

#[async_std::test]
async fn srb_pdu_is_integrity_protected_without_count() -> Result<()> {
    let k_rrc_int = hex!("d3 c5 d5 92 32 7f b1 1c 40 35 c6 68 0a f8 c6 d1");
    let mut cfg = srb_config();
    cfg.security.integrity_enabled = true;
    cfg.security.integrity_algorithm = IntegrityAlgorithm::Nia2;
    cfg.security.k_rrc_int = k_rrc_int;
    let bearer = spawn_bearer(cfg)?;

    let sdu = vec![0xde, 0xad, 0xbe, 0xef];
    bearer.handle.handle_sdu(sdu.clone()).await?;

    let LowerLayerEvent::NewPdu(pdu) = next_lower_event(&bearer.lower_rx).await? else {
        panic!("expected a PDU");
    };
    assert_eq!(pdu.count, None);

    let mut expected = vec![0x00, 0x00];
    expected.extend_from_slice(&sdu);
    let mac = nia2::nia2_mac(&k_rrc_int, 0, 0, Direction::Downlink, &expected);
    expected.extend_from_slice(&mac);
    assert_eq!(pdu.buf, expected);
    Ok(())
}

#[async_std::test]
async fn count_ceilings_notify_upper_layer_and_stop_transmission() -> Result<()> {
    let mut cfg = drb_config(PdcpRlcMode::Um, PdcpDiscardTimer::NotConfigured);
    cfg.max_count = PdcpMaxCount { notify: 1, hard: 2 };
    let bearer = spawn_bearer(cfg)?;

    for _ in 0..4 {
        bearer.handle.handle_sdu(vec![0xaa]).await?;
    }

    // COUNTs 0 and 1 go out; the rest are dropped.
    for count in 0..2u32 {
        let LowerLayerEvent::NewPdu(pdu) = next_lower_event(&bearer.lower_rx).await? else {
            panic!("expected a PDU");
        };
        assert_eq!(pdu.count, Some(count));
    }
    expect_lower_silence(&bearer.lower_rx, Duration::from_millis(100)).await;

    assert_eq!(
        next_upper_event(&bearer.upper_rx).await?,
        UpperLayerEvent::MaxCountReached
    );
    assert_eq!(
        next_upper_event(&bearer.upper_rx).await?,
        UpperLayerEvent::ProtocolFailure
    );
    Ok(())
}

#[async_std::test]
async fn status_report_trigger_emits_control_pdu() -> Result<()> {
    let mut cfg = drb_config(PdcpRlcMode::Am, PdcpDiscardTimer::NotConfigured);
    cfg.status_report_required = true;
    let bearer = spawn_bearer(cfg)?;

    bearer.handle.send_status_report().await?;

    let LowerLayerEvent::NewPdu(pdu) = next_lower_event(&bearer.lower_rx).await? else {
        panic!("expected a control PDU");
    };
    assert_eq!(pdu.count, None);
    assert_eq!(pdu.buf, TEST_STATUS_REPORT);
    Ok(())
}
