//! SAE J1939 dynamic address claim, driven entirely by frame arrival and
//! [`AddressClaimer::poll`]; nothing here blocks or owns a clock.
//!
//! Strategy:
//! 1. Broadcast Address Claimed (DGN `0x0EEFF`) from the desired address.
//! 2. Privileged addresses (0-127, 248-253) are claimed immediately.
//!    Any other address waits out the contention window first.
//! 3. A contender on our address with a smaller NAME makes us recalculate;
//!    without an alternative we broadcast Cannot Claim from the null address.
//!    Otherwise we defend by re-broadcasting our claim.
use crate::error::{ClaimError, QueueFull};
use crate::protocol::dgn::{ADDRESS_CLAIMED, GLOBAL_ADDRESS, NULL_ADDRESS};
use crate::protocol::managment::ca_name::CaName;
use crate::protocol::managment::commanded_address::{CommandedAddressSession, CommandedStep};
use crate::protocol::transport::can_frame::CanFrame;
use crate::protocol::transport::can_id::CanId;
use crate::protocol::transport::traits::frame_sink::FrameSink;
use crate::protocol::transport::traits::receive_filter::ReceiveFilter;
use crate::protocol::transport::DEFAULT_PRIORITY;
use core::cmp::Ordering;
use embassy_time::Duration;

/// Time a node waits for contention before settling on a non-privileged
/// address (or leaving the cannot-claim state).
pub const CONTENTION_WINDOW: Duration = Duration::from_secs(250);

/// Addresses that are claimed without waiting for contention.
#[inline]
pub const fn is_privileged(address: u8) -> bool {
    address <= 127 || (address >= 248 && address <= 253)
}

/// Externally visible claim state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ClaimState {
    /// No claim started yet.
    Unclaimed,
    /// Claim broadcast, waiting out the contention window.
    Claiming,
    /// Address owned and defended.
    Claimed,
    /// Lost arbitration; sitting on the null address until the window expires.
    CannotClaim,
}

/// Outcome of looking for an alternative after losing arbitration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Recalculation {
    /// Keep claiming the same address.
    Retry,
    NoAddressAvailable,
}

//==================================================================================ADDRESS_CLAIMER
/// Address-claim state of one Controller Application.
#[derive(Debug, Clone)]
pub struct AddressClaimer {
    name: CaName,
    /// Source address stamped on outbound frames. The desired address while
    /// contention is pending, [`NULL_ADDRESS`] when none.
    my_address: u8,
    desired_address: u8,
    contention_elapsed: Duration,
    waiting_for_contention: bool,
    cannot_claim: bool,
    claimed: bool,
    commanded: CommandedAddressSession,
}

impl AddressClaimer {
    pub const fn new(name: CaName) -> Self {
        Self {
            name,
            my_address: NULL_ADDRESS,
            desired_address: NULL_ADDRESS,
            contention_elapsed: Duration::from_ticks(0),
            waiting_for_contention: false,
            cannot_claim: false,
            claimed: false,
            commanded: CommandedAddressSession::new(),
        }
    }

    #[inline]
    pub fn name(&self) -> CaName {
        self.name
    }

    /// Source address currently in use.
    #[inline]
    pub fn address(&self) -> u8 {
        self.my_address
    }

    #[inline]
    pub fn desired_address(&self) -> u8 {
        self.desired_address
    }

    pub fn state(&self) -> ClaimState {
        if self.cannot_claim {
            ClaimState::CannotClaim
        } else if self.claimed {
            ClaimState::Claimed
        } else if self.waiting_for_contention {
            ClaimState::Claiming
        } else {
            ClaimState::Unclaimed
        }
    }

    #[inline]
    pub fn is_claimed(&self) -> bool {
        self.claimed
    }

    #[inline]
    pub fn is_waiting_for_contention(&self) -> bool {
        self.waiting_for_contention
    }

    #[inline]
    pub fn cannot_claim(&self) -> bool {
        self.cannot_claim
    }

    /// Time accumulated towards [`CONTENTION_WINDOW`].
    #[inline]
    pub fn contention_elapsed(&self) -> Duration {
        self.contention_elapsed
    }

    #[inline]
    pub fn commanded_session(&self) -> &CommandedAddressSession {
        &self.commanded
    }

    /// Address Claimed frame announcing `name` from `source`.
    pub fn claim_frame(name: CaName, source: u8) -> CanFrame {
        let id = CanId::builder(ADDRESS_CLAIMED, source)
            .to_destination(GLOBAL_ADDRESS)
            .with_priority(DEFAULT_PRIORITY)
            .build();
        CanFrame::extended(id, &name.to_bytes())
    }

    /// Start (or restart) claiming `desired`.
    ///
    /// A lost claim frame is logged but does not stop the claim.
    pub fn start_claim<S, R>(
        &mut self,
        desired: u8,
        sink: &mut S,
        filter: &mut R,
    ) -> Result<(), ClaimError>
    where
        S: FrameSink + ?Sized,
        R: ReceiveFilter + ?Sized,
    {
        if desired == NULL_ADDRESS || desired == GLOBAL_ADDRESS {
            return Err(ClaimError::InvalidAddress { address: desired });
        }

        #[cfg(feature = "defmt")]
        defmt::info!("Claiming address {=u8}", desired);

        self.desired_address = desired;
        self.my_address = desired;
        self.cannot_claim = false;
        self.claimed = false;
        self.contention_elapsed = Duration::from_ticks(0);
        let _ = self.broadcast_claim(sink);

        if is_privileged(desired) {
            self.finalize(filter);
        } else {
            self.waiting_for_contention = true;
        }
        Ok(())
    }

    /// Handle an Address Claimed frame from `source`.
    ///
    /// Returns [`ClaimError::AddressClaimLost`] when the contender wins and no
    /// alternative address exists; the node then sits on the null address.
    pub fn on_address_claimed<S, R>(
        &mut self,
        source: u8,
        payload: &[u8],
        sink: &mut S,
        filter: &mut R,
    ) -> Result<(), ClaimError>
    where
        S: FrameSink + ?Sized,
        R: ReceiveFilter + ?Sized,
    {
        if self.my_address == NULL_ADDRESS || source != self.my_address {
            return Ok(());
        }
        let Some(their_name) = CaName::from_payload(payload) else {
            return Ok(());
        };

        let we_win = self.name.compare(&their_name) == Ordering::Less;
        if !we_win && self.recalculate_address() == Recalculation::NoAddressAvailable {
            #[cfg(feature = "defmt")]
            defmt::warn!(
                "Address {=u8} lost to NAME {=u64:#x}, cannot claim",
                source,
                their_name.raw()
            );
            self.enter_cannot_claim(sink, filter);
            return Err(ClaimError::AddressClaimLost);
        }

        #[cfg(feature = "defmt")]
        defmt::debug!("Defending address {=u8}", source);

        let _ = self.broadcast_claim(sink);
        if is_privileged(self.my_address) {
            self.finalize(filter);
        }
        Ok(())
    }

    /// Alternative address after losing arbitration.
    ///
    /// No address search is performed: a node that may pick arbitrary
    /// addresses keeps retrying the same one, any other node has nowhere to go.
    pub fn recalculate_address(&self) -> Recalculation {
        if self.name.is_arbitrary_address_capable() {
            Recalculation::Retry
        } else {
            Recalculation::NoAddressAvailable
        }
    }

    /// Advance the contention timer.
    ///
    /// Once the accumulated time exceeds [`CONTENTION_WINDOW`] the claim is
    /// finalized at the desired address. Leaving cannot-claim re-broadcasts
    /// Address Claimed from that address, since the bus last heard us on the
    /// null address.
    pub fn poll<S, R>(&mut self, elapsed: Duration, sink: &mut S, filter: &mut R)
    where
        S: FrameSink + ?Sized,
        R: ReceiveFilter + ?Sized,
    {
        if !(self.waiting_for_contention || self.cannot_claim) {
            return;
        }
        // Saturates: a caller may report an arbitrarily long gap.
        self.contention_elapsed = self
            .contention_elapsed
            .checked_add(elapsed)
            .unwrap_or(Duration::MAX);
        if self.contention_elapsed > CONTENTION_WINDOW {
            let was_cannot_claim = self.cannot_claim;
            self.cannot_claim = false;
            self.waiting_for_contention = false;
            self.my_address = self.desired_address;
            if was_cannot_claim {
                let _ = self.broadcast_claim(sink);
            }
            self.finalize(filter);
        }
    }

    /// Answer a request for Address Claimed.
    pub fn respond_to_request<S>(&self, sink: &mut S) -> Result<(), QueueFull>
    where
        S: FrameSink + ?Sized,
    {
        if self.cannot_claim {
            let result = sink.enqueue_tx(Self::claim_frame(self.name, NULL_ADDRESS));
            if result.is_err() {
                #[cfg(feature = "defmt")]
                defmt::warn!("Cannot claim response dropped, TX queue full");
            }
            result
        } else if self.my_address != NULL_ADDRESS {
            self.broadcast_claim(sink)
        } else {
            Ok(())
        }
    }

    /// Open a commanded address session started by `requester`.
    pub fn begin_commanded_address(&mut self, requester: u8) {
        #[cfg(feature = "defmt")]
        defmt::debug!("Commanded address session from {=u8}", requester);
        self.commanded.begin(requester);
    }

    /// Feed a data-transfer frame into the commanded address session.
    ///
    /// Returns the adopted address when the session completed for our NAME;
    /// claiming restarts at that address.
    pub fn on_commanded_data<S, R>(
        &mut self,
        source: u8,
        payload: &[u8],
        sink: &mut S,
        filter: &mut R,
    ) -> Option<u8>
    where
        S: FrameSink + ?Sized,
        R: ReceiveFilter + ?Sized,
    {
        match self.commanded.accept(source, payload) {
            CommandedStep::Complete { name, address } if name == self.name => {
                #[cfg(feature = "defmt")]
                defmt::info!("Commanded to address {=u8}", address);
                self.start_claim(address, sink, filter).ok()?;
                Some(address)
            }
            _ => None,
        }
    }

    fn broadcast_claim<S>(&self, sink: &mut S) -> Result<(), QueueFull>
    where
        S: FrameSink + ?Sized,
    {
        let result = sink.enqueue_tx(Self::claim_frame(self.name, self.my_address));
        if result.is_err() {
            #[cfg(feature = "defmt")]
            defmt::warn!("Address claim frame dropped, TX queue full");
        }
        result
    }

    fn finalize<R>(&mut self, filter: &mut R)
    where
        R: ReceiveFilter + ?Sized,
    {
        self.claimed = true;
        self.waiting_for_contention = false;
        filter.accept_address(self.my_address);

        #[cfg(feature = "defmt")]
        defmt::info!("Address {=u8} claimed", self.my_address);
    }

    fn enter_cannot_claim<S, R>(&mut self, sink: &mut S, filter: &mut R)
    where
        S: FrameSink + ?Sized,
        R: ReceiveFilter + ?Sized,
    {
        self.my_address = NULL_ADDRESS;
        self.claimed = false;
        self.waiting_for_contention = false;
        self.cannot_claim = true;
        self.contention_elapsed = Duration::from_ticks(0);
        if sink.enqueue_tx(Self::claim_frame(self.name, NULL_ADDRESS)).is_err() {
            #[cfg(feature = "defmt")]
            defmt::warn!("Cannot claim frame dropped, TX queue full");
        }
        filter.accept_address(GLOBAL_ADDRESS);
    }
}

#[cfg(test)]
#[path = "tests.rs"]
mod tests;
