//! Tests for the address-claim state machine: privileged claim, contention
//! window, winning and losing arbitration.
use super::*;
use std::vec::Vec;

#[derive(Default)]
struct RecordingSink {
    frames: Vec<CanFrame>,
    full: bool,
}

impl FrameSink for RecordingSink {
    fn enqueue_tx(&mut self, frame: CanFrame) -> Result<(), QueueFull> {
        if self.full {
            return Err(QueueFull);
        }
        self.frames.push(frame);
        Ok(())
    }
}

#[derive(Default)]
struct RecordingFilter {
    accepted: Vec<u8>,
}

impl ReceiveFilter for RecordingFilter {
    fn accept_address(&mut self, address: u8) {
        self.accepted.push(address);
    }
}

const OUR_NAME: CaName = CaName::from_raw(0x0000_2000_1234_5678);
const SMALLER_NAME: CaName = CaName::from_raw(0x0000_1000_0000_0001);
const LARGER_NAME: CaName = CaName::from_raw(0x0000_3000_0000_0001);

fn aac(name: CaName) -> CaName {
    CaName::from_raw(name.raw() | 1u64 << 63)
}

#[test]
fn test_privileged_ranges() {
    assert!(is_privileged(0));
    assert!(is_privileged(127));
    assert!(!is_privileged(128));
    assert!(!is_privileged(247));
    assert!(is_privileged(248));
    assert!(is_privileged(253));
    assert!(!is_privileged(254));
}

#[test]
/// A privileged address is claimed immediately with one broadcast.
fn test_privileged_claim_is_immediate() {
    let mut claimer = AddressClaimer::new(OUR_NAME);
    let mut sink = RecordingSink::default();
    let mut filter = RecordingFilter::default();

    claimer.start_claim(66, &mut sink, &mut filter).unwrap();

    assert_eq!(claimer.state(), ClaimState::Claimed);
    assert_eq!(claimer.address(), 66);
    assert_eq!(sink.frames.len(), 1);
    let id = sink.frames[0].can_id().unwrap();
    assert_eq!(id.source_address(), 66);
    assert_eq!(id.pdu_format(), 0xEE);
    assert_eq!(id.destination(), Some(255));
    assert_eq!(sink.frames[0].payload(), &OUR_NAME.to_bytes());
    assert_eq!(filter.accepted, [66]);
}

#[test]
/// A non-privileged claim settles once the window has fully elapsed.
fn test_contention_window() {
    let mut claimer = AddressClaimer::new(OUR_NAME);
    let mut sink = RecordingSink::default();
    let mut filter = RecordingFilter::default();

    claimer.start_claim(140, &mut sink, &mut filter).unwrap();
    assert_eq!(claimer.state(), ClaimState::Claiming);
    assert_eq!(claimer.address(), 140);
    assert!(filter.accepted.is_empty());

    claimer.poll(Duration::from_secs(200), &mut sink, &mut filter);
    claimer.poll(Duration::from_secs(50), &mut sink, &mut filter);
    // Exactly the window is not enough.
    assert_eq!(claimer.state(), ClaimState::Claiming);

    claimer.poll(Duration::from_millis(10), &mut sink, &mut filter);
    assert_eq!(claimer.state(), ClaimState::Claimed);
    assert_eq!(claimer.address(), 140);
    assert_eq!(filter.accepted, [140]);
    assert_eq!(sink.frames.len(), 1);
}

#[test]
fn test_poll_is_idle_once_claimed() {
    let mut claimer = AddressClaimer::new(OUR_NAME);
    let mut sink = RecordingSink::default();
    let mut filter = RecordingFilter::default();

    claimer.start_claim(10, &mut sink, &mut filter).unwrap();
    claimer.poll(Duration::from_secs(1000), &mut sink, &mut filter);
    assert_eq!(claimer.contention_elapsed(), Duration::from_ticks(0));
    assert_eq!(filter.accepted, [10]);
}

#[test]
fn test_reserved_addresses_rejected() {
    let mut claimer = AddressClaimer::new(OUR_NAME);
    let mut sink = RecordingSink::default();
    for address in [254, 255] {
        assert_eq!(
            claimer.start_claim(address, &mut sink, &mut ()),
            Err(ClaimError::InvalidAddress { address })
        );
    }
    assert!(sink.frames.is_empty());
    assert_eq!(claimer.state(), ClaimState::Unclaimed);
}

#[test]
/// Our smaller NAME wins: the address is defended.
fn test_defends_against_larger_name() {
    let mut claimer = AddressClaimer::new(OUR_NAME);
    let mut sink = RecordingSink::default();
    claimer.start_claim(66, &mut sink, &mut ()).unwrap();

    claimer
        .on_address_claimed(66, &LARGER_NAME.to_bytes(), &mut sink, &mut ())
        .unwrap();

    assert_eq!(claimer.state(), ClaimState::Claimed);
    assert_eq!(sink.frames.len(), 2);
    assert_eq!(sink.frames[1].can_id().unwrap().source_address(), 66);
}

#[test]
fn test_ignores_claims_for_other_addresses() {
    let mut claimer = AddressClaimer::new(OUR_NAME);
    let mut sink = RecordingSink::default();
    claimer.start_claim(66, &mut sink, &mut ()).unwrap();

    claimer
        .on_address_claimed(67, &SMALLER_NAME.to_bytes(), &mut sink, &mut ())
        .unwrap();
    claimer
        .on_address_claimed(66, &[0; 4], &mut sink, &mut ())
        .unwrap();

    assert_eq!(sink.frames.len(), 1);
    assert_eq!(claimer.address(), 66);
}

#[test]
/// Losing without an alternative moves to the null address.
fn test_loses_to_smaller_name() {
    let mut claimer = AddressClaimer::new(OUR_NAME);
    let mut sink = RecordingSink::default();
    let mut filter = RecordingFilter::default();
    claimer.start_claim(66, &mut sink, &mut filter).unwrap();

    assert_eq!(
        claimer.on_address_claimed(66, &SMALLER_NAME.to_bytes(), &mut sink, &mut filter),
        Err(ClaimError::AddressClaimLost)
    );

    assert_eq!(claimer.state(), ClaimState::CannotClaim);
    assert_eq!(claimer.address(), 254);
    let cannot_claim = sink.frames.last().unwrap();
    assert_eq!(cannot_claim.can_id().unwrap().source_address(), 254);
    assert_eq!(cannot_claim.payload(), &OUR_NAME.to_bytes());
    assert_eq!(filter.accepted, [66, 255]);

    // Claims are no longer compared once we hold no address.
    claimer
        .on_address_claimed(66, &SMALLER_NAME.to_bytes(), &mut sink, &mut filter)
        .unwrap();
    assert_eq!(sink.frames.len(), 2);
}

#[test]
/// After the window, a node that could not claim settles on its desired address.
fn test_cannot_claim_expires() {
    let mut claimer = AddressClaimer::new(OUR_NAME);
    let mut sink = RecordingSink::default();
    let mut filter = RecordingFilter::default();
    claimer.start_claim(66, &mut sink, &mut filter).unwrap();
    let _ = claimer.on_address_claimed(66, &SMALLER_NAME.to_bytes(), &mut sink, &mut filter);

    assert_eq!(sink.frames.len(), 2);

    claimer.poll(CONTENTION_WINDOW + Duration::from_secs(1), &mut sink, &mut filter);
    assert_eq!(claimer.state(), ClaimState::Claimed);
    assert_eq!(claimer.address(), 66);
    assert!(!claimer.cannot_claim());
    assert_eq!(filter.accepted, [66, 255, 66]);

    // The bus last heard us on 254: the claim is announced again from 66.
    assert_eq!(sink.frames.len(), 3);
    let reclaim = sink.frames.last().unwrap();
    let id = reclaim.can_id().unwrap();
    assert_eq!(id.source_address(), 66);
    assert_eq!(id.pdu_format(), 0xEE);
    assert_eq!(reclaim.payload(), &OUR_NAME.to_bytes());
}

#[test]
/// Settling after the contention window sends nothing new: the claim was
/// already broadcast from that address.
fn test_contention_expiry_sends_nothing() {
    let mut claimer = AddressClaimer::new(OUR_NAME);
    let mut sink = RecordingSink::default();
    claimer.start_claim(140, &mut sink, &mut ()).unwrap();

    claimer.poll(CONTENTION_WINDOW + Duration::from_secs(1), &mut sink, &mut ());
    assert_eq!(claimer.state(), ClaimState::Claimed);
    assert_eq!(sink.frames.len(), 1);
}

#[test]
/// A huge elapsed value saturates the timer instead of overflowing it.
fn test_poll_saturates_elapsed_time() {
    let mut claimer = AddressClaimer::new(OUR_NAME);
    let mut sink = RecordingSink::default();
    let mut filter = RecordingFilter::default();
    claimer.start_claim(140, &mut sink, &mut filter).unwrap();

    claimer.poll(Duration::from_ticks(1), &mut sink, &mut filter);
    assert_eq!(claimer.state(), ClaimState::Claiming);
    claimer.poll(Duration::MAX, &mut sink, &mut filter);

    assert_eq!(claimer.state(), ClaimState::Claimed);
    assert_eq!(claimer.address(), 140);
    assert_eq!(filter.accepted, [140]);
}

#[test]
fn test_poll_saturates_in_cannot_claim() {
    let mut claimer = AddressClaimer::new(OUR_NAME);
    let mut sink = RecordingSink::default();
    claimer.start_claim(66, &mut sink, &mut ()).unwrap();
    let _ = claimer.on_address_claimed(66, &SMALLER_NAME.to_bytes(), &mut sink, &mut ());

    claimer.poll(Duration::from_secs(1), &mut sink, &mut ());
    assert!(claimer.cannot_claim());
    claimer.poll(Duration::MAX, &mut sink, &mut ());
    assert_eq!(claimer.state(), ClaimState::Claimed);
    assert_eq!(claimer.address(), 66);
}

#[test]
/// An arbitrary-address-capable loser keeps retrying the same address.
fn test_aac_loser_retries() {
    let mut claimer = AddressClaimer::new(aac(OUR_NAME));
    let mut sink = RecordingSink::default();
    claimer.start_claim(140, &mut sink, &mut ()).unwrap();
    assert_eq!(claimer.recalculate_address(), Recalculation::Retry);

    claimer
        .on_address_claimed(140, &SMALLER_NAME.to_bytes(), &mut sink, &mut ())
        .unwrap();

    assert_eq!(claimer.state(), ClaimState::Claiming);
    assert_eq!(claimer.address(), 140);
    assert_eq!(sink.frames.len(), 2);
}

#[test]
/// An identical NAME does not win the arbitration.
fn test_equal_name_does_not_win() {
    let mut claimer = AddressClaimer::new(OUR_NAME);
    let mut sink = RecordingSink::default();
    claimer.start_claim(66, &mut sink, &mut ()).unwrap();

    let result = claimer.on_address_claimed(66, &OUR_NAME.to_bytes(), &mut sink, &mut ());
    assert_eq!(result, Err(ClaimError::AddressClaimLost));
}

#[test]
/// A full TX queue loses the claim frame but not the claim.
fn test_claim_survives_full_queue() {
    let mut claimer = AddressClaimer::new(OUR_NAME);
    let mut sink = RecordingSink {
        full: true,
        ..Default::default()
    };
    claimer.start_claim(66, &mut sink, &mut ()).unwrap();
    assert_eq!(claimer.state(), ClaimState::Claimed);
    assert!(sink.frames.is_empty());
    assert_eq!(claimer.respond_to_request(&mut sink), Err(QueueFull));
}

#[test]
/// The cannot-claim answer to a request reports a full TX queue.
fn test_cannot_claim_response_reports_full_queue() {
    let mut claimer = AddressClaimer::new(OUR_NAME);
    let mut sink = RecordingSink::default();
    claimer.start_claim(66, &mut sink, &mut ()).unwrap();
    let _ = claimer.on_address_claimed(66, &SMALLER_NAME.to_bytes(), &mut sink, &mut ());
    assert!(claimer.cannot_claim());

    sink.full = true;
    assert_eq!(claimer.respond_to_request(&mut sink), Err(QueueFull));
    assert_eq!(sink.frames.len(), 2);
}

#[test]
fn test_request_response_follows_state() {
    let mut claimer = AddressClaimer::new(OUR_NAME);
    let mut sink = RecordingSink::default();

    claimer.respond_to_request(&mut sink).unwrap();
    assert!(sink.frames.is_empty());

    claimer.start_claim(66, &mut sink, &mut ()).unwrap();
    claimer.respond_to_request(&mut sink).unwrap();
    assert_eq!(sink.frames[1].can_id().unwrap().source_address(), 66);

    let _ = claimer.on_address_claimed(66, &SMALLER_NAME.to_bytes(), &mut sink, &mut ());
    claimer.respond_to_request(&mut sink).unwrap();
    assert_eq!(sink.frames.last().unwrap().can_id().unwrap().source_address(), 254);
}

#[test]
fn test_commanded_address_adoption() {
    let mut claimer = AddressClaimer::new(OUR_NAME);
    let mut sink = RecordingSink::default();
    let mut filter = RecordingFilter::default();
    claimer.start_claim(66, &mut sink, &mut filter).unwrap();

    let name = OUR_NAME.to_bytes();
    let mut first = [1u8; 8];
    first[1..].copy_from_slice(&name[..7]);

    claimer.begin_commanded_address(0x20);
    assert_eq!(claimer.on_commanded_data(0x20, &first, &mut sink, &mut filter), None);
    assert_eq!(
        claimer.on_commanded_data(0x20, &[2, name[7], 70], &mut sink, &mut filter),
        Some(70)
    );
    assert_eq!(claimer.address(), 70);
    assert_eq!(claimer.state(), ClaimState::Claimed);
    assert_eq!(sink.frames.last().unwrap().can_id().unwrap().source_address(), 70);
}

#[test]
fn test_commanded_address_for_other_name() {
    let mut claimer = AddressClaimer::new(OUR_NAME);
    let mut sink = RecordingSink::default();
    claimer.start_claim(66, &mut sink, &mut ()).unwrap();

    let name = LARGER_NAME.to_bytes();
    let mut first = [1u8; 8];
    first[1..].copy_from_slice(&name[..7]);

    claimer.begin_commanded_address(0x20);
    claimer.on_commanded_data(0x20, &first, &mut sink, &mut ());
    assert_eq!(
        claimer.on_commanded_data(0x20, &[2, name[7], 70], &mut sink, &mut ()),
        None
    );
    assert_eq!(claimer.address(), 66);
    assert_eq!(sink.frames.len(), 1);
}
