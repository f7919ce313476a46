use anyhow::Result;
use glam::Affine2;

use crate::device::Device;

/// Something that can emit geometry through a device.
///
/// `transform` maps the model's target-pixel coordinates to normalized device
/// coordinates. The device is already bound, masked and viewported for the
/// calling target.
pub trait Model<D: Device + ?Sized> {
    fn draw(&self, device: &mut D, transform: &Affine2) -> Result<()>;
}

impl<D, F> Model<D> for F
where
    D: Device + ?Sized,
    F: Fn(&mut D, &Affine2) -> Result<()>,
{
    fn draw(&self, device: &mut D, transform: &Affine2) -> Result<()> {
        self(device, transform)
    }
}
