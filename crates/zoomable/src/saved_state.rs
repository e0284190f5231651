//! Versioned snapshot of a [`ZoomState`](crate::ZoomState) for hosts that
//! persist viewer state.
//!
//! Binary layout: one version byte followed by
//! `[translation_x, translation_y, scale, min_scale, max_scale]` as
//! little-endian `f32`s.

use crate::error::{validate_scale_range, SavedStateError};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SavedZoomState {
    pub translation_x: f32,
    pub translation_y: f32,
    pub scale: f32,
    pub min_scale: f32,
    pub max_scale: f32,
}

impl SavedZoomState {
    pub const VERSION: u8 = 1;
    pub const ENCODED_LEN: usize = 1 + 5 * 4;

    pub fn to_array(&self) -> [f32; 5] {
        [
            self.translation_x,
            self.translation_y,
            self.scale,
            self.min_scale,
            self.max_scale,
        ]
    }

    pub fn from_array(values: [f32; 5]) -> Result<Self, SavedStateError> {
        let [translation_x, translation_y, scale, min_scale, max_scale] = values;
        validate_scale_range(min_scale, max_scale)
            .map_err(|_| SavedStateError::InvalidScaleRange)?;
        Ok(Self {
            translation_x,
            translation_y,
            scale,
            min_scale,
            max_scale,
        })
    }

    pub fn encode(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(Self::ENCODED_LEN);
        bytes.push(Self::VERSION);
        for value in self.to_array() {
            bytes.extend_from_slice(&value.to_le_bytes());
        }
        bytes
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, SavedStateError> {
        let Some((&version, payload)) = bytes.split_first() else {
            return Err(SavedStateError::Truncated { len: 0 });
        };
        if version != Self::VERSION {
            return Err(SavedStateError::UnsupportedVersion(version));
        }
        let len = bytes.len();
        if len < Self::ENCODED_LEN {
            return Err(SavedStateError::Truncated { len });
        }
        if len > Self::ENCODED_LEN {
            return Err(SavedStateError::TrailingBytes { len });
        }

        let mut values = [0.0f32; 5];
        for (value, chunk) in values.iter_mut().zip(payload.chunks_exact(4)) {
            *value = f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
        }
        Self::from_array(values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> SavedZoomState {
        SavedZoomState {
            translation_x: -120.5,
            translation_y: 33.25,
            scale: 2.5,
            min_scale: 1.0,
            max_scale: 20.0,
        }
    }

    #[test]
    fn array_order_is_translation_scale_limits() {
        assert_eq!(sample().to_array(), [-120.5, 33.25, 2.5, 1.0, 20.0]);
    }

    #[test]
    fn encoding_has_version_prefix() {
        let bytes = sample().encode();
        assert_eq!(bytes.len(), SavedZoomState::ENCODED_LEN);
        assert_eq!(bytes[0], SavedZoomState::VERSION);
        assert_eq!(&bytes[1..5], &(-120.5f32).to_le_bytes());
        assert_eq!(SavedZoomState::decode(&bytes), Ok(sample()));
    }

    #[test]
    fn decode_rejects_bad_input() {
        assert_eq!(
            SavedZoomState::decode(&[]),
            Err(SavedStateError::Truncated { len: 0 })
        );
        assert_eq!(
            SavedZoomState::decode(&[2, 0, 0]),
            Err(SavedStateError::UnsupportedVersion(2))
        );
        let bytes = sample().encode();
        assert_eq!(
            SavedZoomState::decode(&bytes[..10]),
            Err(SavedStateError::Truncated { len: 10 })
        );
        let mut padded = bytes.clone();
        padded.push(0);
        assert_eq!(
            SavedZoomState::decode(&padded),
            Err(SavedStateError::TrailingBytes {
                len: SavedZoomState::ENCODED_LEN + 1
            })
        );

        let inverted = SavedZoomState {
            min_scale: 5.0,
            max_scale: 1.0,
            ..sample()
        };
        assert_eq!(
            SavedZoomState::decode(&inverted.encode()),
            Err(SavedStateError::InvalidScaleRange)
        );
    }
}
