//! Script/image identifier coercion.
//!
//! The host framework may hand the driver an identifier in whichever shape
//! is natural at the call site. All shapes coerce to bytes via their UTF-8
//! textual representation before hitting the wire; this type makes that
//! coercion explicit instead of scattering `to_string().into_bytes()` calls
//! through the driver.

use bytes::Bytes;

/// A script or image identifier, in whichever shape the host supplied it.
///
/// Empty identifiers are permitted in every variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetId {
    /// Already raw bytes.
    Bytes(Bytes),
    /// A symbolic name (atom-like), encoded as UTF-8 as given.
    Name(String),
    /// An integer id, coerced via its decimal ASCII text — the only
    /// textual representation that round-trips predictably without a
    /// numeric type tag on the wire.
    Int(i64),
    /// A character sequence (charlist-like), joined into a string.
    Chars(Vec<char>),
}

impl AssetId {
    /// Coerce to the bytes that go on the wire.
    #[must_use]
    pub fn to_bytes(&self) -> Bytes {
        match self {
            Self::Bytes(b) => b.clone(),
            Self::Name(s) => Bytes::copy_from_slice(s.as_bytes()),
            Self::Int(i) => Bytes::from(i.to_string().into_bytes()),
            Self::Chars(chars) => Bytes::from(chars.iter().collect::<String>().into_bytes()),
        }
    }
}

impl From<&str> for AssetId {
    fn from(value: &str) -> Self {
        Self::Name(value.to_string())
    }
}

impl From<String> for AssetId {
    fn from(value: String) -> Self {
        Self::Name(value)
    }
}

impl From<i64> for AssetId {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<Bytes> for AssetId {
    fn from(value: Bytes) -> Self {
        Self::Bytes(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_coerces_to_utf8() {
        assert_eq!(AssetId::from("my_script").to_bytes(), Bytes::from_static(b"my_script"));
    }

    #[test]
    fn int_coerces_to_decimal_text() {
        assert_eq!(AssetId::Int(42).to_bytes(), Bytes::from_static(b"42"));
        assert_eq!(AssetId::Int(-7).to_bytes(), Bytes::from_static(b"-7"));
    }

    #[test]
    fn chars_coerce_joined() {
        let id = AssetId::Chars(vec!['a', 'b', 'c']);
        assert_eq!(id.to_bytes(), Bytes::from_static(b"abc"));
    }

    #[test]
    fn empty_ids_permitted() {
        assert_eq!(AssetId::Name(String::new()).to_bytes(), Bytes::new());
        assert_eq!(AssetId::Bytes(Bytes::new()).to_bytes(), Bytes::new());
        assert_eq!(AssetId::Chars(Vec::new()).to_bytes(), Bytes::new());
    }
}
