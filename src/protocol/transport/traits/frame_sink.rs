//! Destination of every frame the stack emits.
use crate::error::QueueFull;
use crate::protocol::transport::can_frame::CanFrame;
use crate::protocol::transport::queue::StackSide;

/// Non-blocking frame output. A full sink drops the frame and reports it.
pub trait FrameSink {
    fn enqueue_tx(&mut self, frame: CanFrame) -> Result<(), QueueFull>;
}

impl<const TX: usize, const RX: usize> FrameSink for StackSide<'_, TX, RX> {
    #[inline]
    fn enqueue_tx(&mut self, frame: CanFrame) -> Result<(), QueueFull> {
        StackSide::enqueue_tx(self, frame)
    }
}
