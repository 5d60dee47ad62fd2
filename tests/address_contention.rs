//! Two nodes claim the same address on a shared simulated bus; the NAME with
//! the higher priority keeps it and the other one ends up unable to claim.
mod helpers;

use helpers::{node_config, IdleDevice, MockCanBus};
use rvc_stack::protocol::{
    dgn::NULL_ADDRESS,
    dispatch::ProtocolStack,
    managment::address_claiming::{ClaimState, CONTENTION_WINDOW},
    transport::{driver::run_bus, queue::FrameTransport},
};
use tokio::time::{sleep, timeout, Duration};

const WINNER_NAME: u64 = 0x0000_2000_1234_0001;
const LOSER_NAME: u64 = 0x0000_2000_1234_0002;

#[tokio::test]
async fn test_contention_on_privileged_address() {
    let (mut bus_a, mut bus_b) = MockCanBus::create_pair();

    let mut transport_a: FrameTransport<16, 16> = FrameTransport::new();
    let mut transport_b: FrameTransport<16, 16> = FrameTransport::new();
    let (mut hw_a, side_a) = transport_a.split();
    let (mut hw_b, side_b) = transport_b.split();

    let mut node_a = ProtocolStack::new(side_a, node_config(WINNER_NAME, 66), ());
    let mut node_b = ProtocolStack::new(side_b, node_config(LOSER_NAME, 66), ());
    let mut device = IdleDevice;

    let driver_a = run_bus(&mut bus_a, &mut hw_a);
    let driver_b = run_bus(&mut bus_b, &mut hw_b);

    let arbitration = async {
        node_a.start().unwrap();
        node_b.start().unwrap();

        while node_b.claim_state() != ClaimState::CannotClaim {
            sleep(Duration::from_millis(1)).await;
            node_a.process_rx(&mut device);
            node_b.process_rx(&mut device);
        }
        // Let the defence and the cannot-claim frames cross.
        sleep(Duration::from_millis(20)).await;
        node_a.process_rx(&mut device);
        node_b.process_rx(&mut device);
    };

    let outcome = timeout(Duration::from_secs(5), async {
        tokio::select! {
            result = driver_a => panic!("driver A stopped: {result:?}"),
            result = driver_b => panic!("driver B stopped: {result:?}"),
            () = arbitration => {}
        }
    })
    .await;
    assert!(outcome.is_ok(), "arbitration timed out");

    assert_eq!(node_a.claim_state(), ClaimState::Claimed);
    assert_eq!(node_a.address(), 66);
    assert_eq!(node_b.claim_state(), ClaimState::CannotClaim);
    assert_eq!(node_b.address(), NULL_ADDRESS);

    // Once the window has expired the loser retries its preferred address
    // and announces it again.
    let queued = node_b.transport().tx_len();
    node_b.poll(CONTENTION_WINDOW + embassy_time::Duration::from_millis(1));
    assert_eq!(node_b.claim_state(), ClaimState::Claimed);
    assert_eq!(node_b.address(), 66);
    assert_eq!(node_b.transport().tx_len(), queued + 1);
}
