use std::fmt;

/// Invalid [`ZoomableConfig`](crate::ZoomableConfig) or scale range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ZoomConfigError {
    NonPositiveMinScale(f32),
    InvalidScaleRange { min: f32, max: f32 },
    NonFiniteScale,
}

impl fmt::Display for ZoomConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ZoomConfigError::NonPositiveMinScale(min) => {
                write!(f, "min scale must be positive, got {min}")
            }
            ZoomConfigError::InvalidScaleRange { min, max } => {
                write!(f, "min scale {min} must be less than max scale {max}")
            }
            ZoomConfigError::NonFiniteScale => write!(f, "scale limits must be finite"),
        }
    }
}

impl std::error::Error for ZoomConfigError {}

/// Failure to decode a [`SavedZoomState`](crate::SavedZoomState).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SavedStateError {
    Truncated { len: usize },
    TrailingBytes { len: usize },
    UnsupportedVersion(u8),
    InvalidScaleRange,
}

impl fmt::Display for SavedStateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SavedStateError::Truncated { len } => {
                write!(f, "saved zoom state truncated at {len} bytes")
            }
            SavedStateError::TrailingBytes { len } => {
                let expected = crate::SavedZoomState::ENCODED_LEN;
                write!(f, "saved zoom state has {len} bytes, expected {expected}")
            }
            SavedStateError::UnsupportedVersion(version) => {
                write!(f, "unsupported saved zoom state version {version}")
            }
            SavedStateError::InvalidScaleRange => {
                write!(f, "saved zoom state has an invalid scale range")
            }
        }
    }
}

impl std::error::Error for SavedStateError {}

pub(crate) fn validate_scale_range(min: f32, max: f32) -> Result<(), ZoomConfigError> {
    if !min.is_finite() || !max.is_finite() {
        return Err(ZoomConfigError::NonFiniteScale);
    }
    if min <= 0.0 {
        return Err(ZoomConfigError::NonPositiveMinScale(min));
    }
    if min >= max {
        return Err(ZoomConfigError::InvalidScaleRange { min, max });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scale_range_validation() {
        assert_eq!(validate_scale_range(1.0, 20.0), Ok(()));
        assert_eq!(
            validate_scale_range(2.0, 2.0),
            Err(ZoomConfigError::InvalidScaleRange { min: 2.0, max: 2.0 })
        );
        assert_eq!(
            validate_scale_range(0.0, 2.0),
            Err(ZoomConfigError::NonPositiveMinScale(0.0))
        );
        assert_eq!(
            validate_scale_range(1.0, f32::INFINITY),
            Err(ZoomConfigError::NonFiniteScale)
        );
    }

    #[test]
    fn errors_render_readably() {
        let message = ZoomConfigError::InvalidScaleRange { min: 3.0, max: 1.0 }.to_string();
        assert_eq!(message, "min scale 3 must be less than max scale 1");
        assert_eq!(
            SavedStateError::UnsupportedVersion(9).to_string(),
            "unsupported saved zoom state version 9"
        );
    }
}
