use std::fmt;

use crate::coords::Size;
use crate::device::{AttachmentId, BufferInfo, SharedBuffer};
use crate::pixel::{PixelFormat, PixelType};

/// Pixel format of the native display surface.
pub const DISPLAY_PIXEL_FORMAT: PixelFormat = PixelFormat::Rgba;
/// Pixel type of the native display surface.
pub const DISPLAY_PIXEL_TYPE: PixelType = PixelType::UnsignedByte;

/// What a [`DrawTarget`](super::DrawTarget) writes into.
#[derive(Debug)]
pub enum TargetKind {
    /// The device's visible surface. Owns nothing.
    DisplaySurface,
    /// A swappable offscreen pixel buffer.
    OffscreenBuffer(OffscreenBinding),
}

/// Device resources of an offscreen target.
///
/// The attachment is owned (created with the target, destroyed by
/// `DrawTarget::dispose`). The buffer is borrowed: its owner decides when it
/// is released, and size, format and type are read from it on every call.
pub struct OffscreenBinding {
    pub(super) attachment: AttachmentId,
    pub(super) buffer: Option<SharedBuffer>,
}

impl OffscreenBinding {
    #[inline]
    pub fn attachment(&self) -> AttachmentId {
        self.attachment
    }

    #[inline]
    pub fn buffer(&self) -> Option<&SharedBuffer> {
        self.buffer.as_ref()
    }

    /// Current description of the attached buffer.
    #[inline]
    pub fn buffer_info(&self) -> Option<BufferInfo> {
        self.buffer.as_deref().map(BufferInfo::of)
    }

    /// Buffer size, or zero extent when nothing is attached.
    #[inline]
    pub fn size(&self) -> Size {
        self.buffer.as_ref().map_or(Size::ZERO, |b| b.size())
    }

    #[inline]
    pub fn pixel_format(&self) -> PixelFormat {
        self.buffer.as_ref().map_or_else(PixelFormat::default, |b| b.pixel_format())
    }

    #[inline]
    pub fn pixel_type(&self) -> PixelType {
        self.buffer.as_ref().map_or_else(PixelType::default, |b| b.pixel_type())
    }
}

impl fmt::Debug for OffscreenBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OffscreenBinding")
            .field("attachment", &self.attachment)
            .field("buffer", &self.buffer_info())
            .finish()
    }
}
