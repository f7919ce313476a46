use anyhow::Result;

use crate::coords::{PixelRect, Size};
use crate::paint::Color;
use crate::pixel::{PixelFormat, PixelType};

use super::{AttachmentId, DeviceState, StorageHandle};

/// Capability set a draw target needs from the graphics device.
///
/// The device is bind-point style: `bind_*`, `set_mask_*` and `set_viewport`
/// mutate global state that later `clear`/`read_pixels` calls (and model
/// geometry) act on. Rectangles are in device row order.
pub trait Device {
    /// Live size of the native surface.
    fn surface_size(&self) -> Size;

    /// Current binding state.
    fn state(&self) -> &DeviceState;

    fn bind_surface(&mut self) -> Result<()>;
    fn bind_attachment(&mut self, attachment: AttachmentId) -> Result<()>;

    fn create_attachment(&mut self) -> Result<AttachmentId>;
    fn destroy_attachment(&mut self, attachment: AttachmentId) -> Result<()>;

    /// Puts `storage` into `slot` of `attachment`; `None` empties the slot.
    fn attach_storage(
        &mut self,
        attachment: AttachmentId,
        slot: u32,
        storage: Option<StorageHandle>,
    ) -> Result<()>;

    fn set_mask_enabled(&mut self, enabled: bool) -> Result<()>;
    fn set_mask_rect(&mut self, rect: PixelRect) -> Result<()>;
    fn set_viewport(&mut self, rect: PixelRect) -> Result<()>;

    /// Clears the color buffer of the bound destination, honouring the mask.
    fn clear(&mut self, color: Color) -> Result<()>;

    /// Copies `rect` of the bound destination into `dst`, rows in device
    /// order, tightly packed.
    fn read_pixels(
        &mut self,
        rect: PixelRect,
        format: PixelFormat,
        ty: PixelType,
        dst: &mut [u8],
    ) -> Result<()>;
}
