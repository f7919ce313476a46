use std::rc::Rc;

use crate::coords::Size;
use crate::pixel::{PixelFormat, PixelType};

use super::StorageHandle;

/// A pixel-buffer resource that can be attached to an offscreen target.
///
/// Implementors are owned by the caller; targets only read these properties,
/// and read them on every use, so a buffer may change shape while attached.
/// The storage handle is bound when the buffer is attached and must stay the
/// same until it is detached.
pub trait PixelBuffer {
    fn size(&self) -> Size;
    fn pixel_format(&self) -> PixelFormat;
    fn pixel_type(&self) -> PixelType;
    fn storage(&self) -> StorageHandle;
}

/// Handle an offscreen target keeps to its attached buffer.
///
/// Dropping it releases no device storage.
pub type SharedBuffer = Rc<dyn PixelBuffer>;

/// Plain description of a [`PixelBuffer`].
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct BufferInfo {
    pub size: Size,
    pub pixel_format: PixelFormat,
    pub pixel_type: PixelType,
    pub storage: StorageHandle,
}

impl BufferInfo {
    pub fn of(buffer: &(impl PixelBuffer + ?Sized)) -> Self {
        Self {
            size: buffer.size(),
            pixel_format: buffer.pixel_format(),
            pixel_type: buffer.pixel_type(),
            storage: buffer.storage(),
        }
    }
}

impl PixelBuffer for BufferInfo {
    fn size(&self) -> Size {
        self.size
    }

    fn pixel_format(&self) -> PixelFormat {
        self.pixel_format
    }

    fn pixel_type(&self) -> PixelType {
        self.pixel_type
    }

    fn storage(&self) -> StorageHandle {
        self.storage
    }
}
