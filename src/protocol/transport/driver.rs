//! Asynchronous pump between a [`CanBus`] controller and the hardware side of a
//! [`FrameTransport`](crate::protocol::transport::queue::FrameTransport).
//!
//! Received frames are pushed into the RX queue; queued TX frames are handed
//! to the controller as soon as the stack signals them.
use crate::error::BusError;
use crate::protocol::transport::queue::BusSide;
use crate::protocol::transport::traits::can_bus::CanBus;
use futures_util::future::{select, Either};
use futures_util::pin_mut;

/// Run the bus pump until the controller reports an error.
///
/// Pending TX frames are always drained before waiting again. A frame that
/// arrives while the RX queue is full is dropped; the stack never sees it.
///
/// `CanBus::recv` must be cancel-safe: the receive future is dropped whenever
/// the stack queues a frame first.
pub async fn run_bus<C, const TX: usize, const RX: usize>(
    can_bus: &mut C,
    bus: &mut BusSide<'_, TX, RX>,
) -> Result<(), BusError<C::Error>>
where
    C: CanBus,
{
    loop {
        while let Some(frame) = bus.hw_next_tx() {
            can_bus.send(&frame).await.map_err(BusError::Send)?;
        }

        let received = {
            let recv = can_bus.recv();
            let tx_ready = bus.wait_tx_ready();
            pin_mut!(recv);
            pin_mut!(tx_ready);

            match select(recv, tx_ready).await {
                Either::Left((result, _)) => Some(result),
                Either::Right(((), _)) => None,
            }
        }; // recv borrow is dropped here

        if let Some(result) = received {
            let frame = result.map_err(BusError::Receive)?;
            if bus.hw_received(frame).is_err() {
                #[cfg(feature = "defmt")]
                defmt::warn!("RX queue full, dropping frame {=u32:#x}", frame.raw_id());
            }
        }
    }
}
