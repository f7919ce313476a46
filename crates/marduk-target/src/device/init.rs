use crate::coords::Size;

/// Initialization parameters for [`SoftwareDevice`](super::SoftwareDevice).
#[derive(Debug, Clone)]
pub struct SoftwareDeviceInit {
    /// Initial size of the native surface.
    ///
    /// The surface is RGBA8 and may be resized later with
    /// `SoftwareDevice::resize_surface`.
    pub surface_size: Size,

    /// Record every device call for later inspection.
    ///
    /// Useful in tests; disable for long-running headless use, where the log
    /// would grow without bound.
    pub record_calls: bool,
}

impl Default for SoftwareDeviceInit {
    fn default() -> Self {
        Self {
            surface_size: Size::new(1, 1),
            record_calls: true,
        }
    }
}
