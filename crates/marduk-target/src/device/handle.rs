/// Device-side attachment object (framebuffer-like binding point).
///
/// Created and destroyed through [`Device`](super::Device); owned by exactly
/// one offscreen target.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AttachmentId(pub u64);

/// Opaque native storage of a pixel buffer.
///
/// Holding a handle does not keep the storage alive.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StorageHandle(pub u64);
