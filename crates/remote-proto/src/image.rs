//! Wire encoding of the image-format tag carried by `PutImage`.

/// Pixel format tag carried by `PutImage`'s `format` field.
///
/// Unrecognized symbolic names (see [`ImageFormat::from_name`]) coerce to
/// [`ImageFormat::Encoded`] rather than failing — the wire format has no
/// room to reject an asset format the host framework already decided to
/// send.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImageFormat {
    /// Opaque encoded image bytes (PNG/JPEG/etc.); the renderer decodes it.
    #[default]
    Encoded = 0,
    /// 8-bit grayscale, one byte per pixel.
    Gray = 1,
    /// 8-bit grayscale with alpha, two bytes per pixel.
    GrayA = 2,
    /// 8-bit RGB, three bytes per pixel.
    Rgb = 3,
    /// 8-bit RGBA, four bytes per pixel.
    Rgba = 4,
}

impl ImageFormat {
    /// The `u32` wire code for this format.
    #[must_use]
    pub const fn to_u32(self) -> u32 {
        match self {
            Self::Encoded => 0,
            Self::Gray => 1,
            Self::GrayA => 2,
            Self::Rgb => 3,
            Self::Rgba => 4,
        }
    }

    /// Decode a wire code into a format, defaulting unknown codes to
    /// [`ImageFormat::Encoded`].
    #[must_use]
    pub const fn from_u32(code: u32) -> Self {
        match code {
            1 => Self::Gray,
            2 => Self::GrayA,
            3 => Self::Rgb,
            4 => Self::Rgba,
            _ => Self::Encoded,
        }
    }

    /// Coerce a symbolic name (as the host framework might declare an
    /// asset's format) into a wire format, defaulting unrecognized names to
    /// [`ImageFormat::Encoded`].
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        match name {
            "gray" => Self::Gray,
            "gray_a" | "graya" => Self::GrayA,
            "rgb" => Self::Rgb,
            "rgba" => Self::Rgba,
            _ => Self::Encoded,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_code_defaults_to_encoded() {
        assert_eq!(ImageFormat::from_u32(99), ImageFormat::Encoded);
    }

    #[test]
    fn unknown_name_defaults_to_encoded() {
        assert_eq!(ImageFormat::from_name("dds"), ImageFormat::Encoded);
    }

    #[test]
    fn round_trips_known_codes() {
        for fmt in
            [ImageFormat::Encoded, ImageFormat::Gray, ImageFormat::GrayA, ImageFormat::Rgb, ImageFormat::Rgba]
        {
            assert_eq!(ImageFormat::from_u32(fmt.to_u32()), fmt);
        }
    }

    #[test]
    fn default_is_encoded() {
        assert_eq!(ImageFormat::default(), ImageFormat::Encoded);
    }
}
