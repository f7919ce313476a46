use crate::coords::PixelRect;

use super::AttachmentId;

/// Where writes currently land.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum Destination {
    /// The device's native (display) surface.
    #[default]
    Surface,
    /// An offscreen attachment.
    Attachment(AttachmentId),
}

/// Process-wide binding state of a device.
///
/// Every target activation overwrites all of it, so nothing here survives
/// from one target operation to the next.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct DeviceState {
    pub destination: Destination,
    pub viewport: PixelRect,
    pub mask_enabled: bool,
    pub mask_rect: PixelRect,
}

impl DeviceState {
    /// The rectangle writes are limited to, if masking is on.
    #[inline]
    pub fn active_mask(&self) -> Option<PixelRect> {
        self.mask_enabled.then_some(self.mask_rect)
    }
}
