use std::cell::Cell;
use std::collections::HashMap;

use anyhow::Result;

use crate::coords::{PixelRect, Size};
use crate::paint::Color;
use crate::pixel::{bytes_per_pixel, decode_pixel, encode_pixel, PixelFormat, PixelType};

use super::{
    AttachmentId, BufferInfo, Destination, Device, DeviceError, DeviceState, PixelBuffer,
    SoftwareDeviceInit, StorageHandle,
};

/// One call issued against a [`SoftwareDevice`], in issue order.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum DeviceCall {
    BindSurface,
    BindAttachment(AttachmentId),
    CreateAttachment(AttachmentId),
    DestroyAttachment(AttachmentId),
    AttachStorage {
        attachment: AttachmentId,
        slot: u32,
        storage: Option<StorageHandle>,
    },
    SetMaskEnabled(bool),
    SetMaskRect(PixelRect),
    SetViewport(PixelRect),
    Clear(Color),
    ReadPixels {
        rect: PixelRect,
        format: PixelFormat,
        ty: PixelType,
    },
}

/// Pixel buffer living in a [`SoftwareDevice`].
///
/// Owned by the caller and released with [`SoftwareDevice::destroy_buffer`].
/// [`SoftwareDevice::resize_buffer`] reallocates it in place, keeping its
/// storage handle.
#[derive(Debug)]
pub struct SoftwareBuffer {
    info: Cell<BufferInfo>,
}

impl PixelBuffer for SoftwareBuffer {
    fn size(&self) -> Size {
        self.info.get().size
    }

    fn pixel_format(&self) -> PixelFormat {
        self.info.get().pixel_format
    }

    fn pixel_type(&self) -> PixelType {
        self.info.get().pixel_type
    }

    fn storage(&self) -> StorageHandle {
        self.info.get().storage
    }
}

/// Tightly packed pixel rows, row 0 first.
#[derive(Debug)]
struct Storage {
    size: Size,
    format: PixelFormat,
    ty: PixelType,
    pixels: Vec<u8>,
}

impl Storage {
    fn new(size: Size, format: PixelFormat, ty: PixelType) -> Result<Self, DeviceError> {
        let len = usize::try_from(size.area())
            .ok()
            .and_then(|area| area.checked_mul(bytes_per_pixel(format, ty)))
            .ok_or(DeviceError::StorageTooLarge { size, format, ty })?;

        Ok(Self {
            size,
            format,
            ty,
            pixels: vec![0; len],
        })
    }

    fn bounds(&self) -> PixelRect {
        PixelRect::from_size(self.size)
    }

    fn bpp(&self) -> usize {
        bytes_per_pixel(self.format, self.ty)
    }

    /// Byte offset of pixel `(x, y)`; `None` when outside the storage.
    fn offset(&self, x: i64, y: i64) -> Option<usize> {
        if x < 0 || y < 0 || x >= i64::from(self.size.width) || y >= i64::from(self.size.height) {
            return None;
        }
        let index = y as usize * self.size.width as usize + x as usize;
        Some(index * self.bpp())
    }

    fn fill(&mut self, region: PixelRect, rgba: [f32; 4]) {
        let Some(region) = region.intersect(self.bounds()) else { return };

        let bpp = self.bpp();
        let mut texel = vec![0u8; bpp];
        encode_pixel(rgba, self.format, self.ty, &mut texel);

        let row_len = region.width as usize * bpp;
        for y in region.y..region.y + region.height as i32 {
            let Some(start) = self.offset(i64::from(region.x), i64::from(y)) else { continue };
            for dst in self.pixels[start..start + row_len].chunks_exact_mut(bpp) {
                dst.copy_from_slice(&texel);
            }
        }
    }

    fn read(&self, x: i64, y: i64) -> Option<[f32; 4]> {
        let start = self.offset(x, y)?;
        let bytes = &self.pixels[start..start + self.bpp()];
        Some(decode_pixel(bytes, self.format, self.ty))
    }
}

/// Resolved write destination.
#[derive(Debug, Copy, Clone)]
enum Bound {
    Surface,
    Storage(StorageHandle),
    /// Attachment with nothing in slot 0.
    Nothing,
}

/// CPU implementation of [`Device`].
///
/// The native surface is RGBA8. Offscreen storages are created through
/// [`create_buffer`](Self::create_buffer) and can be put into attachments.
/// `clear` and `read_pixels` act on real memory; geometry emission is left to
/// models, which receive `&mut SoftwareDevice` and may inspect its state.
#[derive(Debug)]
pub struct SoftwareDevice {
    state: DeviceState,
    surface: Storage,
    storages: HashMap<StorageHandle, Storage>,
    attachments: HashMap<AttachmentId, Option<StorageHandle>>,
    next_id: u64,
    record_calls: bool,
    calls: Vec<DeviceCall>,
}

impl SoftwareDevice {
    pub fn new(init: SoftwareDeviceInit) -> Result<Self> {
        let SoftwareDeviceInit {
            surface_size,
            record_calls,
        } = init;

        let surface = Storage::new(surface_size, PixelFormat::Rgba, PixelType::UnsignedByte)?;
        log::debug!("software device created with {surface_size:?} surface");

        Ok(Self {
            state: DeviceState::default(),
            surface,
            storages: HashMap::new(),
            attachments: HashMap::new(),
            next_id: 1,
            record_calls,
            calls: Vec::new(),
        })
    }

    /// Resizes the native surface. Its contents are discarded.
    pub fn resize_surface(&mut self, size: Size) -> Result<()> {
        self.surface = Storage::new(size, PixelFormat::Rgba, PixelType::UnsignedByte)?;
        log::debug!("software surface resized to {size:?}");
        Ok(())
    }

    /// Allocates zeroed storage and returns the buffer describing it.
    pub fn create_buffer(
        &mut self,
        size: Size,
        format: PixelFormat,
        ty: PixelType,
    ) -> Result<SoftwareBuffer> {
        let storage = Storage::new(size, format, ty)?;
        let handle = StorageHandle(self.allocate_id());
        self.storages.insert(handle, storage);
        log::debug!("created storage {handle:?} ({size:?}, {format:?}/{ty:?})");

        Ok(SoftwareBuffer {
            info: Cell::new(BufferInfo {
                size,
                pixel_format: format,
                pixel_type: ty,
                storage: handle,
            }),
        })
    }

    /// Reallocates the buffer's storage at `size`, zeroed, under the same
    /// handle. Attachments holding it see the new extent.
    pub fn resize_buffer(&mut self, buffer: &SoftwareBuffer, size: Size) -> Result<()> {
        let mut info = buffer.info.get();
        let storage = self
            .storages
            .get_mut(&info.storage)
            .ok_or(DeviceError::UnknownStorage(info.storage))?;

        *storage = Storage::new(size, info.pixel_format, info.pixel_type)?;
        info.size = size;
        buffer.info.set(info);
        log::debug!("resized storage {:?} to {size:?}", info.storage);
        Ok(())
    }

    /// Frees the buffer's storage.
    ///
    /// Attachments still referring to it fail on their next clear or read.
    pub fn destroy_buffer(&mut self, buffer: &SoftwareBuffer) -> Result<()> {
        let handle = buffer.storage();
        self.storages
            .remove(&handle)
            .ok_or(DeviceError::UnknownStorage(handle))?;
        log::debug!("destroyed storage {handle:?}");
        Ok(())
    }

    /// Raw bytes of the native surface, device row order.
    pub fn surface_pixels(&self) -> &[u8] {
        &self.surface.pixels
    }

    /// Raw bytes of a storage, device row order.
    pub fn storage_pixels(&self, handle: StorageHandle) -> Option<&[u8]> {
        self.storages.get(&handle).map(|s| s.pixels.as_slice())
    }

    /// Storage currently in slot 0 of `attachment`.
    pub fn attached_storage(&self, attachment: AttachmentId) -> Option<StorageHandle> {
        self.attachments.get(&attachment).copied().flatten()
    }

    /// Number of live attachments.
    pub fn attachment_count(&self) -> usize {
        self.attachments.len()
    }

    pub fn calls(&self) -> &[DeviceCall] {
        &self.calls
    }

    /// Returns and clears the recorded calls.
    pub fn take_calls(&mut self) -> Vec<DeviceCall> {
        std::mem::take(&mut self.calls)
    }

    fn allocate_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn record(&mut self, call: DeviceCall) {
        if self.record_calls {
            self.calls.push(call);
        }
    }

    fn ensure_attachment(&self, attachment: AttachmentId) -> Result<(), DeviceError> {
        if self.attachments.contains_key(&attachment) {
            Ok(())
        } else {
            Err(DeviceError::UnknownAttachment(attachment))
        }
    }

    fn bound(&self) -> Result<Bound, DeviceError> {
        match self.state.destination {
            Destination::Surface => Ok(Bound::Surface),
            Destination::Attachment(id) => {
                let slot = self
                    .attachments
                    .get(&id)
                    .ok_or(DeviceError::UnknownAttachment(id))?;
                match *slot {
                    Some(handle) if self.storages.contains_key(&handle) => {
                        Ok(Bound::Storage(handle))
                    }
                    Some(handle) => Err(DeviceError::UnknownStorage(handle)),
                    None => Ok(Bound::Nothing),
                }
            }
        }
    }

    fn bound_storage(&self) -> Result<Option<&Storage>, DeviceError> {
        Ok(match self.bound()? {
            Bound::Surface => Some(&self.surface),
            Bound::Storage(handle) => self.storages.get(&handle),
            Bound::Nothing => None,
        })
    }

    fn bound_storage_mut(&mut self) -> Result<Option<&mut Storage>, DeviceError> {
        Ok(match self.bound()? {
            Bound::Surface => Some(&mut self.surface),
            Bound::Storage(handle) => self.storages.get_mut(&handle),
            Bound::Nothing => None,
        })
    }
}

impl Device for SoftwareDevice {
    fn surface_size(&self) -> Size {
        self.surface.size
    }

    fn state(&self) -> &DeviceState {
        &self.state
    }

    fn bind_surface(&mut self) -> Result<()> {
        self.record(DeviceCall::BindSurface);
        self.state.destination = Destination::Surface;
        Ok(())
    }

    fn bind_attachment(&mut self, attachment: AttachmentId) -> Result<()> {
        self.record(DeviceCall::BindAttachment(attachment));
        self.ensure_attachment(attachment)?;
        self.state.destination = Destination::Attachment(attachment);
        Ok(())
    }

    fn create_attachment(&mut self) -> Result<AttachmentId> {
        let attachment = AttachmentId(self.allocate_id());
        self.record(DeviceCall::CreateAttachment(attachment));
        self.attachments.insert(attachment, None);
        Ok(attachment)
    }

    fn destroy_attachment(&mut self, attachment: AttachmentId) -> Result<()> {
        self.record(DeviceCall::DestroyAttachment(attachment));
        self.attachments
            .remove(&attachment)
            .ok_or(DeviceError::UnknownAttachment(attachment))?;

        // Destroying the bound attachment falls back to the surface.
        if self.state.destination == Destination::Attachment(attachment) {
            self.state.destination = Destination::Surface;
        }
        Ok(())
    }

    fn attach_storage(
        &mut self,
        attachment: AttachmentId,
        slot: u32,
        storage: Option<StorageHandle>,
    ) -> Result<()> {
        self.record(DeviceCall::AttachStorage {
            attachment,
            slot,
            storage,
        });
        self.ensure_attachment(attachment)?;
        if slot != 0 {
            return Err(DeviceError::UnsupportedSlot(slot).into());
        }
        if let Some(handle) = storage {
            if !self.storages.contains_key(&handle) {
                return Err(DeviceError::UnknownStorage(handle).into());
            }
        }

        self.attachments.insert(attachment, storage);
        Ok(())
    }

    fn set_mask_enabled(&mut self, enabled: bool) -> Result<()> {
        self.record(DeviceCall::SetMaskEnabled(enabled));
        self.state.mask_enabled = enabled;
        Ok(())
    }

    fn set_mask_rect(&mut self, rect: PixelRect) -> Result<()> {
        self.record(DeviceCall::SetMaskRect(rect));
        self.state.mask_rect = rect;
        Ok(())
    }

    fn set_viewport(&mut self, rect: PixelRect) -> Result<()> {
        self.record(DeviceCall::SetViewport(rect));
        self.state.viewport = rect;
        Ok(())
    }

    fn clear(&mut self, color: Color) -> Result<()> {
        self.record(DeviceCall::Clear(color));
        let mask = self.state.active_mask();

        let Some(storage) = self.bound_storage_mut()? else {
            log::trace!("clear skipped: attachment has no storage");
            return Ok(());
        };

        // Clear colors are clamped for every storage type, float included.
        let region = mask.unwrap_or_else(|| storage.bounds());
        storage.fill(region, color.clamped().channels());
        Ok(())
    }

    fn read_pixels(
        &mut self,
        rect: PixelRect,
        format: PixelFormat,
        ty: PixelType,
        dst: &mut [u8],
    ) -> Result<()> {
        self.record(DeviceCall::ReadPixels { rect, format, ty });

        let bpp = bytes_per_pixel(format, ty);
        let needed = usize::try_from(rect.area())
            .ok()
            .and_then(|area| area.checked_mul(bpp))
            .unwrap_or(usize::MAX);
        if dst.len() < needed {
            return Err(DeviceError::DestinationTooSmall {
                rect,
                needed,
                available: dst.len(),
            }
            .into());
        }

        let storage = self.bound_storage()?;
        let mut texels = dst[..needed].chunks_exact_mut(bpp);
        for row in 0..i64::from(rect.height) {
            for col in 0..i64::from(rect.width) {
                let Some(out) = texels.next() else { return Ok(()) };
                let x = i64::from(rect.x) + col;
                let y = i64::from(rect.y) + row;
                let rgba = storage.and_then(|s| s.read(x, y)).unwrap_or([0.0; 4]);
                encode_pixel(rgba, format, ty, out);
            }
        }
        Ok(())
    }
}
