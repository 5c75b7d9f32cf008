//! Shared input-translation vocabulary between the driver engine and the
//! [`crate::host::Host`] trait.

/// A pointer button, as reported to the host framework.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorButton {
    /// The primary button.
    Left,
    /// The secondary button.
    Right,
    /// The middle/wheel button.
    Middle,
    /// Any button code outside the {0,1,2} range, passed through verbatim.
    Other(u32),
}

impl CursorButton {
    /// Translate a wire button code: `0=left, 1=right, 2=middle`, anything
    /// else passed through.
    #[must_use]
    pub const fn from_code(code: u32) -> Self {
        match code {
            0 => Self::Left,
            1 => Self::Right,
            2 => Self::Middle,
            other => Self::Other(other),
        }
    }
}

/// A key action, as reported to the host framework.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    /// The key was released.
    Release,
    /// The key was pressed.
    Press,
    /// The key is auto-repeating while held.
    Repeat,
}

impl KeyAction {
    /// Translate a wire action code: `0=release, 2=repeat`; anything else
    /// (including the documented `1=press`) defaults to press.
    #[must_use]
    pub const fn from_code(code: i32) -> Self {
        match code {
            0 => Self::Release,
            2 => Self::Repeat,
            _ => Self::Press,
        }
    }
}

/// A modifier key, decoded from the wire's modifier bitmask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Modifier {
    /// Shift.
    Shift,
    /// Control.
    Ctrl,
    /// Alt/Option.
    Alt,
    /// Meta/Super/Command.
    Meta,
    /// Caps Lock is active.
    CapsLock,
    /// Num Lock is active.
    NumLock,
}

impl Modifier {
    /// Decode every modifier flag set in `mask`, using the bit map
    /// `{0x01: Shift, 0x02: Ctrl, 0x04: Alt, 0x08: Meta, 0x10: CapsLock,
    /// 0x20: NumLock}`.
    #[must_use]
    pub fn decode_mask(mask: u32) -> Vec<Self> {
        const TABLE: [(u32, Modifier); 6] = [
            (0x01, Modifier::Shift),
            (0x02, Modifier::Ctrl),
            (0x04, Modifier::Alt),
            (0x08, Modifier::Meta),
            (0x10, Modifier::CapsLock),
            (0x20, Modifier::NumLock),
        ];
        TABLE.iter().filter(|(bit, _)| mask & bit != 0).map(|(_, m)| *m).collect()
    }
}

/// One channel of a color as supplied by the host, before normalization.
#[derive(Debug, Clone, Copy)]
pub enum ColorChannel {
    /// An 8-bit integer channel, normalized by dividing by 255.
    Int(u8),
    /// An already-normalized 0..1 float channel, passed through unchanged.
    Float(f32),
}

impl ColorChannel {
    /// Normalize this channel to the wire's 0..1 `f32` representation.
    #[must_use]
    pub fn normalize(self) -> f32 {
        match self {
            Self::Int(v) => f32::from(v) / 255.0,
            Self::Float(v) => v,
        }
    }
}

/// A color as supplied by the host, before normalization.
///
/// Alpha defaults to fully opaque (`1.0`) when the host doesn't supply one.
#[derive(Debug, Clone, Copy)]
pub struct ColorInput {
    /// Red channel.
    pub r: ColorChannel,
    /// Green channel.
    pub g: ColorChannel,
    /// Blue channel.
    pub b: ColorChannel,
    /// Alpha channel; `None` normalizes to fully opaque.
    pub a: Option<ColorChannel>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn modifier_mask_decodes_every_set_bit() {
        let mods = Modifier::decode_mask(0x01 | 0x04 | 0x20);
        assert_eq!(mods, vec![Modifier::Shift, Modifier::Alt, Modifier::NumLock]);
    }

    #[test]
    fn modifier_mask_empty_for_zero() {
        assert!(Modifier::decode_mask(0).is_empty());
    }

    #[test]
    fn key_action_defaults_unknown_codes_to_press() {
        assert_eq!(KeyAction::from_code(99), KeyAction::Press);
        assert_eq!(KeyAction::from_code(1), KeyAction::Press);
        assert_eq!(KeyAction::from_code(0), KeyAction::Release);
        assert_eq!(KeyAction::from_code(2), KeyAction::Repeat);
    }

    #[test]
    fn cursor_button_passes_through_unknown_codes() {
        assert_eq!(CursorButton::from_code(0), CursorButton::Left);
        assert_eq!(CursorButton::from_code(7), CursorButton::Other(7));
    }

    #[test]
    fn int_channel_normalizes_by_255() {
        assert!((ColorChannel::Int(255).normalize() - 1.0).abs() < 1e-6);
        assert!((ColorChannel::Int(0).normalize() - 0.0).abs() < 1e-6);
    }
}
