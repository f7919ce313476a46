use crate::coords::{PixelRect, Size};
use crate::pixel::{PixelFormat, PixelType};

use super::{AttachmentId, StorageHandle};

/// Failures raised by [`SoftwareDevice`](super::SoftwareDevice).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DeviceError {
    #[error("unknown attachment {0:?}")]
    UnknownAttachment(AttachmentId),

    #[error("unknown storage {0:?}")]
    UnknownStorage(StorageHandle),

    #[error("attachment slot {0} is not supported (only slot 0)")]
    UnsupportedSlot(u32),

    #[error("storage of {size:?} as {format:?}/{ty:?} does not fit in memory")]
    StorageTooLarge {
        size: Size,
        format: PixelFormat,
        ty: PixelType,
    },

    #[error("read of {rect:?} needs {needed} bytes, destination has {available}")]
    DestinationTooSmall {
        rect: PixelRect,
        needed: usize,
        available: usize,
    },
}
