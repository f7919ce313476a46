/// Channel layout of stored or transferred pixels.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub enum PixelFormat {
    #[default]
    Rgba,
    Rgb,
    Alpha,
    Luminance,
    LuminanceAlpha,
}

impl PixelFormat {
    #[inline]
    pub const fn channel_count(self) -> usize {
        match self {
            PixelFormat::Rgba => 4,
            PixelFormat::Rgb => 3,
            PixelFormat::LuminanceAlpha => 2,
            PixelFormat::Alpha | PixelFormat::Luminance => 1,
        }
    }
}

/// Storage type of each channel.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub enum PixelType {
    #[default]
    UnsignedByte,
    UnsignedShort,
    Float,
}

impl PixelType {
    #[inline]
    pub const fn bytes_per_channel(self) -> usize {
        match self {
            PixelType::UnsignedByte => 1,
            PixelType::UnsignedShort => 2,
            PixelType::Float => 4,
        }
    }
}

/// Size of one pixel in bytes for the given format and type.
#[inline]
pub const fn bytes_per_pixel(format: PixelFormat, ty: PixelType) -> usize {
    format.channel_count() * ty.bytes_per_channel()
}

/// Encodes `rgba` into `out`, which must be exactly
/// [`bytes_per_pixel`]`(format, ty)` long.
///
/// Integer types clamp to `[0, 1]` and round; `Float` stores the raw value.
/// Multi-byte channels use native endianness.
pub fn encode_pixel(rgba: [f32; 4], format: PixelFormat, ty: PixelType, out: &mut [u8]) {
    let [r, g, b, a] = rgba;
    let channels = match format {
        PixelFormat::Rgba => [r, g, b, a],
        PixelFormat::Rgb => [r, g, b, 0.0],
        PixelFormat::Alpha => [a, 0.0, 0.0, 0.0],
        PixelFormat::Luminance => [r, 0.0, 0.0, 0.0],
        PixelFormat::LuminanceAlpha => [r, a, 0.0, 0.0],
    };

    let stride = ty.bytes_per_channel();
    let used = &channels[..format.channel_count()];
    for (value, dst) in used.iter().zip(out.chunks_exact_mut(stride)) {
        match ty {
            PixelType::UnsignedByte => dst[0] = quantize(*value, u8::MAX as f32) as u8,
            PixelType::UnsignedShort => {
                let v = quantize(*value, u16::MAX as f32) as u16;
                dst.copy_from_slice(bytemuck::bytes_of(&v));
            }
            PixelType::Float => dst.copy_from_slice(bytemuck::bytes_of(value)),
        }
    }
}

/// Decodes one pixel back to `[r, g, b, a]`.
///
/// Missing color channels read as `0` (alpha-only) or replicate luminance;
/// missing alpha reads as `1`.
pub fn decode_pixel(bytes: &[u8], format: PixelFormat, ty: PixelType) -> [f32; 4] {
    let stride = ty.bytes_per_channel();
    let mut values = [0.0f32; 4];
    for (slot, src) in values.iter_mut().zip(bytes.chunks_exact(stride)) {
        *slot = match ty {
            PixelType::UnsignedByte => src[0] as f32 / u8::MAX as f32,
            PixelType::UnsignedShort => {
                bytemuck::pod_read_unaligned::<u16>(src) as f32 / u16::MAX as f32
            }
            PixelType::Float => bytemuck::pod_read_unaligned::<f32>(src),
        };
    }

    match format {
        PixelFormat::Rgba => values,
        PixelFormat::Rgb => [values[0], values[1], values[2], 1.0],
        PixelFormat::Alpha => [0.0, 0.0, 0.0, values[0]],
        PixelFormat::Luminance => [values[0], values[0], values[0], 1.0],
        PixelFormat::LuminanceAlpha => [values[0], values[0], values[0], values[1]],
    }
}

#[inline]
fn quantize(value: f32, max: f32) -> f32 {
    let v = if value.is_nan() { 0.0 } else { value.clamp(0.0, 1.0) };
    (v * max).round()
}
