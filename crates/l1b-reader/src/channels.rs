//! ATMS channel table.
//!
//! Channels are named `"1"` through `"22"` and map onto the last axis of the
//! antenna temperature cube.

use sat_common::attrs::keys;
use sat_common::Attributes;

/// Number of ATMS channels.
pub const CHANNEL_COUNT: usize = 22;

/// Receiver polarization of a channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Polarization {
    /// Quasi-vertical
    QV,
    /// Quasi-horizontal
    QH,
}

impl Polarization {
    pub fn as_str(&self) -> &'static str {
        match self {
            Polarization::QV => "QV",
            Polarization::QH => "QH",
        }
    }
}

/// Static description of one channel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChannelInfo {
    /// 1-based channel number
    pub number: usize,
    /// Center frequency in GHz
    pub frequency_ghz: f64,
    pub polarization: Polarization,
}

impl ChannelInfo {
    /// Attributes attached to a channel returned by the reader.
    pub fn attrs(&self) -> Attributes {
        let mut attrs = Attributes::new();
        attrs.insert(keys::FREQUENCY_GHZ.to_string(), self.frequency_ghz.into());
        attrs.insert(
            keys::POLARIZATION.to_string(),
            self.polarization.as_str().into(),
        );
        attrs
    }
}

const fn channel(number: usize, frequency_ghz: f64, polarization: Polarization) -> ChannelInfo {
    ChannelInfo {
        number,
        frequency_ghz,
        polarization,
    }
}

use Polarization::{QH, QV};

pub const CHANNELS: [ChannelInfo; CHANNEL_COUNT] = [
    channel(1, 23.8, QV),
    channel(2, 31.4, QV),
    channel(3, 50.3, QH),
    channel(4, 51.76, QH),
    channel(5, 52.8, QH),
    channel(6, 53.596, QH),
    channel(7, 54.4, QH),
    channel(8, 54.94, QH),
    channel(9, 55.5, QH),
    channel(10, 57.290344, QH),
    channel(11, 57.290344, QH),
    channel(12, 57.290344, QH),
    channel(13, 57.290344, QH),
    channel(14, 57.290344, QH),
    channel(15, 57.290344, QH),
    channel(16, 88.2, QV),
    channel(17, 165.5, QH),
    channel(18, 183.31, QH),
    channel(19, 183.31, QH),
    channel(20, 183.31, QH),
    channel(21, 183.31, QH),
    channel(22, 183.31, QH),
];

/// Zero-based cube index for a channel name, `"1"` -> `0`.
///
/// Only canonical decimal names are accepted (`"01"` and `"+1"` are not).
pub fn channel_index(name: &str) -> Option<usize> {
    if name.is_empty() || !name.bytes().all(|b| b.is_ascii_digit()) || name.starts_with('0') {
        return None;
    }
    let number: usize = name.parse().ok()?;
    (1..=CHANNEL_COUNT).contains(&number).then(|| number - 1)
}

/// Table entry for a channel name.
pub fn channel_info(name: &str) -> Option<&'static ChannelInfo> {
    channel_index(name).map(|idx| &CHANNELS[idx])
}

/// All channel names in order.
pub fn channel_names() -> impl Iterator<Item = String> {
    (1..=CHANNEL_COUNT).map(|n| n.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sat_common::AttrValue;

    #[test]
    fn test_channel_index() {
        assert_eq!(channel_index("1"), Some(0));
        assert_eq!(channel_index("22"), Some(21));
        assert_eq!(channel_index("0"), None);
        assert_eq!(channel_index("23"), None);
        assert_eq!(channel_index("01"), None);
        assert_eq!(channel_index("+1"), None);
        assert_eq!(channel_index("lat"), None);
        assert_eq!(channel_index(""), None);
    }

    #[test]
    fn test_table_is_ordered() {
        for (idx, info) in CHANNELS.iter().enumerate() {
            assert_eq!(info.number, idx + 1);
        }
    }

    #[test]
    fn test_channel_attrs() {
        let attrs = channel_info("16").unwrap().attrs();
        assert_eq!(attrs["frequency_ghz"], AttrValue::Float(88.2));
        assert_eq!(attrs["polarization"], AttrValue::from("QV"));
    }

    #[test]
    fn test_channel_names() {
        let names: Vec<String> = channel_names().collect();
        assert_eq!(names.len(), CHANNEL_COUNT);
        assert_eq!(names[0], "1");
        assert_eq!(names[21], "22");
    }
}
