//! Device collaborator.
//!
//! This module defines:
//! - the [`Device`] capability set targets bind, mask, clear and read through
//! - [`DeviceState`], the bind-point state every activation rewrites
//! - the [`PixelBuffer`] resource contract for offscreen storage
//! - [`SoftwareDevice`], a CPU implementation for headless use and tests

mod api;
mod buffer;
mod error;
mod handle;
mod init;
mod software;
mod state;

pub use api::Device;
pub use buffer::{BufferInfo, PixelBuffer, SharedBuffer};
pub use error::DeviceError;
pub use handle::{AttachmentId, StorageHandle};
pub use init::SoftwareDeviceInit;
pub use software::{DeviceCall, SoftwareBuffer, SoftwareDevice};
pub use state::{Destination, DeviceState};
