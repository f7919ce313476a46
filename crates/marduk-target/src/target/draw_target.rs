use std::rc::Rc;

use anyhow::{Context, Result};
use glam::Affine2;

use crate::coords::{PixelRect, Rect, Size};
use crate::device::{AttachmentId, BufferInfo, Device, PixelBuffer, SharedBuffer, StorageHandle};
use crate::paint::Color;
use crate::pixel::{bytes_per_pixel, PixelFormat, PixelType};

use super::kind::{DISPLAY_PIXEL_FORMAT, DISPLAY_PIXEL_TYPE};
use super::{projection, Model, OffscreenBinding, TargetError, TargetKind};

/// Format/type overrides for [`DrawTarget::read_pixels`].
///
/// `None` fields fall back to the target's own pixel format/type.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct ReadOptions {
    pub format: Option<PixelFormat>,
    pub pixel_type: Option<PixelType>,
}

/// A place pixels can be rendered to.
///
/// Every public operation first activates the target (binds its destination,
/// applies mask and viewport), so operations on different targets may be
/// interleaved freely as long as they run one after another.
///
/// The device is passed to each call. A target must only ever be used with the
/// device it was created on.
#[derive(Debug)]
pub struct DrawTarget {
    kind: TargetKind,
    clip_rect: Option<Rect>,
    flip_vertical: bool,
    global_transform: Affine2,
}

impl DrawTarget {
    /// Target for the device's visible surface.
    ///
    /// Always vertically flipped; size follows the live surface size.
    pub fn display_surface() -> Self {
        Self {
            kind: TargetKind::DisplaySurface,
            clip_rect: None,
            flip_vertical: true,
            global_transform: Affine2::IDENTITY,
        }
    }

    /// Target for an offscreen buffer.
    ///
    /// Creates the target's attachment and, if `buffer` is given, attaches it.
    pub fn offscreen<D>(device: &mut D, buffer: Option<SharedBuffer>) -> Result<Self>
    where
        D: Device + ?Sized,
    {
        let attachment = device.create_attachment()?;
        log::debug!("offscreen target created attachment {attachment:?}");

        if let Some(shared) = &buffer {
            if let Err(err) = bind_storage(device, attachment, Some(shared.storage())) {
                if let Err(cleanup) = device.destroy_attachment(attachment) {
                    log::warn!("failed to release attachment {attachment:?}: {cleanup:#}");
                }
                return Err(err);
            }
        }

        Ok(Self {
            kind: TargetKind::OffscreenBuffer(OffscreenBinding { attachment, buffer }),
            clip_rect: None,
            flip_vertical: false,
            global_transform: Affine2::IDENTITY,
        })
    }

    #[inline]
    pub fn kind(&self) -> &TargetKind {
        &self.kind
    }

    #[inline]
    pub fn is_display_surface(&self) -> bool {
        matches!(self.kind, TargetKind::DisplaySurface)
    }

    /// Attachment owned by an offscreen target.
    pub fn attachment(&self) -> Option<AttachmentId> {
        match &self.kind {
            TargetKind::DisplaySurface => None,
            TargetKind::OffscreenBuffer(binding) => Some(binding.attachment()),
        }
    }

    /// Buffer currently attached to an offscreen target.
    pub fn buffer(&self) -> Option<&SharedBuffer> {
        match &self.kind {
            TargetKind::DisplaySurface => None,
            TargetKind::OffscreenBuffer(binding) => binding.buffer(),
        }
    }

    /// Current description of the attached buffer.
    pub fn buffer_info(&self) -> Option<BufferInfo> {
        match &self.kind {
            TargetKind::DisplaySurface => None,
            TargetKind::OffscreenBuffer(binding) => binding.buffer_info(),
        }
    }

    // ── derived properties ────────────────────────────────────────────────

    /// Size in pixels.
    ///
    /// The display surface asks the device on every call; an offscreen target
    /// asks its buffer, and reports zero extent without one.
    pub fn size<D>(&self, device: &D) -> Size
    where
        D: Device + ?Sized,
    {
        match &self.kind {
            TargetKind::DisplaySurface => device.surface_size(),
            TargetKind::OffscreenBuffer(binding) => binding.size(),
        }
    }

    pub fn pixel_format(&self) -> PixelFormat {
        match &self.kind {
            TargetKind::DisplaySurface => DISPLAY_PIXEL_FORMAT,
            TargetKind::OffscreenBuffer(binding) => binding.pixel_format(),
        }
    }

    pub fn pixel_type(&self) -> PixelType {
        match &self.kind {
            TargetKind::DisplaySurface => DISPLAY_PIXEL_TYPE,
            TargetKind::OffscreenBuffer(binding) => binding.pixel_type(),
        }
    }

    // ── settings ──────────────────────────────────────────────────────────

    #[inline]
    pub fn flip_vertical(&self) -> bool {
        self.flip_vertical
    }

    /// Sets whether device rows run bottom-up. Offscreen targets only.
    pub fn set_flip_vertical(&mut self, flip_vertical: bool) -> Result<()> {
        if self.is_display_surface() {
            return Err(TargetError::FixedOrientation.into());
        }
        self.flip_vertical = flip_vertical;
        Ok(())
    }

    #[inline]
    pub fn clip_rect(&self) -> Option<Rect> {
        self.clip_rect
    }

    /// Restricts writes to `clip` (target pixels); `None` removes the mask.
    #[inline]
    pub fn set_clip_rect(&mut self, clip: Option<Rect>) {
        self.clip_rect = clip;
    }

    #[inline]
    pub fn global_transform(&self) -> Affine2 {
        self.global_transform
    }

    /// Transform composed around the projection on every draw.
    #[inline]
    pub fn set_global_transform(&mut self, transform: Affine2) {
        self.global_transform = transform;
    }

    // ── buffer attachment ─────────────────────────────────────────────────

    /// Replaces the attached buffer.
    ///
    /// The attachment is rebound and slot 0 re-attached, including an explicit
    /// unbind when `buffer` is `None`. The previous buffer is not released.
    pub fn set_buffer<D>(&mut self, device: &mut D, buffer: Option<SharedBuffer>) -> Result<()>
    where
        D: Device + ?Sized,
    {
        let TargetKind::OffscreenBuffer(binding) = &mut self.kind else {
            return Err(TargetError::NotOffscreen.into());
        };

        let storage = buffer.as_ref().map(|b| b.storage());
        bind_storage(device, binding.attachment, storage)?;
        binding.buffer = buffer;
        Ok(())
    }

    pub fn attach_buffer<D, B>(&mut self, device: &mut D, buffer: &Rc<B>) -> Result<()>
    where
        D: Device + ?Sized,
        B: PixelBuffer + 'static,
    {
        let shared: SharedBuffer = Rc::<B>::clone(buffer);
        self.set_buffer(device, Some(shared))
    }

    pub fn detach_buffer<D>(&mut self, device: &mut D) -> Result<()>
    where
        D: Device + ?Sized,
    {
        self.set_buffer(device, None)
    }

    // ── geometry ──────────────────────────────────────────────────────────

    /// Pixel → NDC transform for the current size, without the global
    /// transform.
    pub fn projection<D>(&self, device: &D) -> Affine2
    where
        D: Device + ?Sized,
    {
        projection(self.size(device), self.flip_vertical)
    }

    /// Transform handed to models by [`draw`](Self::draw).
    ///
    /// The global transform acts first, in target pixels; the projection then
    /// normalizes its output.
    pub fn effective_transform<D>(&self, device: &D) -> Affine2
    where
        D: Device + ?Sized,
    {
        self.projection(device) * self.global_transform
    }

    /// Converts between target and device row order.
    ///
    /// Mirrors `rect` around the target height when flipped; identity
    /// otherwise. Clip and readback rectangles both go through here.
    pub fn flip_rect<D>(&self, device: &D, rect: Rect) -> Rect
    where
        D: Device + ?Sized,
    {
        self.flip_for(rect, self.size(device))
    }

    /// Mask [`activate`](Self::activate) would apply, in device pixels.
    ///
    /// `None` when no clip is set. A clip entirely outside the target yields
    /// [`PixelRect::ZERO`].
    pub fn mask_rect<D>(&self, device: &D) -> Option<PixelRect>
    where
        D: Device + ?Sized,
    {
        self.mask_for(self.size(device))
    }

    fn flip_for(&self, rect: Rect, size: Size) -> Rect {
        if self.flip_vertical {
            rect.flipped_vertically(size.height as f32)
        } else {
            rect
        }
    }

    fn mask_for(&self, size: Size) -> Option<PixelRect> {
        let clip = self.clip_rect?;
        let bounds = PixelRect::from_size(size);
        let mask = self.flip_for(clip, size).round().intersect(bounds);
        Some(mask.unwrap_or(PixelRect::ZERO))
    }

    // ── operations ────────────────────────────────────────────────────────

    /// Makes this target the destination of subsequent device writes.
    ///
    /// Binds the surface or attachment, sets or disables the mask, and sets
    /// the viewport to the full target. Called by every operation below;
    /// renderers issuing device calls directly call it themselves.
    pub fn activate<D>(&self, device: &mut D) -> Result<()>
    where
        D: Device + ?Sized,
    {
        match &self.kind {
            TargetKind::DisplaySurface => device.bind_surface()?,
            TargetKind::OffscreenBuffer(binding) => device.bind_attachment(binding.attachment)?,
        }

        let size = self.size(&*device);
        match self.mask_for(size) {
            Some(mask) => {
                device.set_mask_enabled(true)?;
                device.set_mask_rect(mask)?;
            }
            None => device.set_mask_enabled(false)?,
        }

        let viewport = PixelRect::from_size(size);
        device.set_viewport(viewport)?;

        log::trace!("activated {:?} target, viewport {viewport:?}", self.kind);
        Ok(())
    }

    /// Draws `model` with the effective transform.
    ///
    /// Nothing is emitted while the target has zero extent.
    pub fn draw<D, M>(&self, device: &mut D, model: &M) -> Result<()>
    where
        D: Device + ?Sized,
        M: Model<D> + ?Sized,
    {
        self.activate(device)?;

        let size = self.size(&*device);
        if size.is_empty() {
            log::trace!("draw skipped: target has zero extent");
            return Ok(());
        }

        let transform = projection(size, self.flip_vertical) * self.global_transform;
        model.draw(device, &transform)
    }

    /// Clears the target's color buffer (within the clip rect, if any).
    pub fn clear<D>(&self, device: &mut D, color: Color) -> Result<()>
    where
        D: Device + ?Sized,
    {
        self.activate(device)?;
        device.clear(color)
    }

    /// Reads `rect` (target pixels, top-down) into `dst`.
    ///
    /// `dst` must hold `width * height * bytes_per_pixel` bytes; that is left
    /// to the device to check.
    pub fn read_pixels<D>(
        &self,
        device: &mut D,
        rect: PixelRect,
        dst: &mut [u8],
        options: ReadOptions,
    ) -> Result<()>
    where
        D: Device + ?Sized,
    {
        self.activate(device)?;

        let size = self.size(&*device);
        let device_rect = self.flip_for(rect.to_rect(), size).round();
        let (format, ty) = self.read_format(options);

        log::trace!("read {rect:?} as {device_rect:?} ({format:?}/{ty:?})");
        device.read_pixels(device_rect, format, ty, dst)
    }

    /// Like [`read_pixels`](Self::read_pixels), allocating the destination.
    pub fn read_pixels_to_vec<D>(
        &self,
        device: &mut D,
        rect: PixelRect,
        options: ReadOptions,
    ) -> Result<Vec<u8>>
    where
        D: Device + ?Sized,
    {
        let (format, ty) = self.read_format(options);
        let len = usize::try_from(rect.area())
            .ok()
            .and_then(|area| area.checked_mul(bytes_per_pixel(format, ty)))
            .context("readback rectangle is too large")?;

        let mut dst = vec![0u8; len];
        self.read_pixels(device, rect, &mut dst, options)?;
        Ok(dst)
    }

    /// Releases device resources owned by the target.
    ///
    /// Destroys an offscreen target's attachment; the attached buffer stays
    /// alive. No-op for the display surface.
    pub fn dispose<D>(mut self, device: &mut D) -> Result<()>
    where
        D: Device + ?Sized,
    {
        let kind = std::mem::replace(&mut self.kind, TargetKind::DisplaySurface);
        if let TargetKind::OffscreenBuffer(binding) = kind {
            let attachment = binding.attachment;
            if let Err(err) = device.destroy_attachment(attachment) {
                log::warn!("failed to destroy attachment {attachment:?}; leaked: {err:#}");
                return Err(err);
            }
            log::debug!("offscreen target destroyed attachment {attachment:?}");
        }
        Ok(())
    }

    fn read_format(&self, options: ReadOptions) -> (PixelFormat, PixelType) {
        (
            options.format.unwrap_or_else(|| self.pixel_format()),
            options.pixel_type.unwrap_or_else(|| self.pixel_type()),
        )
    }
}

impl Drop for DrawTarget {
    fn drop(&mut self) {
        if let TargetKind::OffscreenBuffer(binding) = &self.kind {
            log::warn!(
                "offscreen target dropped without dispose; attachment {:?} leaked",
                binding.attachment
            );
        }
    }
}

/// Binds `attachment` and puts `storage` (or nothing) in slot 0.
fn bind_storage<D>(
    device: &mut D,
    attachment: AttachmentId,
    storage: Option<StorageHandle>,
) -> Result<()>
where
    D: Device + ?Sized,
{
    device.bind_attachment(attachment)?;
    device.attach_storage(attachment, 0, storage)
}

#[cfg(test)]
#[path = "draw_target_tests.rs"]
mod tests;
