//! Playback tracking state of a video.
//!
//! Persisted records store the last known position in a numeric `time`
//! field where `-1` means "tracking stopped". In memory the two states are
//! kept apart so the sentinel never leaks into arithmetic.

/// Wire value written for [`Tracking::Removed`].
pub const REMOVED_SENTINEL: f64 = -1.0;

/// Whether a video is actively tracked, and where playback was last seen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Tracking {
    /// Tracked; `position` is the last reported playback offset in seconds.
    Active { position: f64 },
    /// Soft-deleted. The record survives only to hold its marks.
    Removed,
}

impl Default for Tracking {
    fn default() -> Self {
        Tracking::Active { position: 0.0 }
    }
}

impl Tracking {
    /// Active tracking at `position`; negative or non-finite input becomes 0.
    pub fn active(position: f64) -> Self {
        Tracking::Active {
            position: sanitize_seconds(position),
        }
    }

    /// Decode a persisted `time` value. Any negative number is the sentinel.
    pub fn from_wire(time: f64) -> Self {
        if time < 0.0 {
            Tracking::Removed
        } else {
            Tracking::active(time)
        }
    }

    pub fn to_wire(&self) -> f64 {
        match self {
            Tracking::Active { position } => *position,
            Tracking::Removed => REMOVED_SENTINEL,
        }
    }

    pub fn position(&self) -> Option<f64> {
        match self {
            Tracking::Active { position } => Some(*position),
            Tracking::Removed => None,
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, Tracking::Active { .. })
    }

    pub fn is_removed(&self) -> bool {
        matches!(self, Tracking::Removed)
    }
}

/// Clamp a seconds value coming from the outside world to something storable.
pub fn sanitize_seconds(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Tracking {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        seconds::serialize(&self.to_wire(), serializer)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Tracking {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let time = <f64 as serde::Deserialize>::deserialize(deserializer)?;
        Ok(Tracking::from_wire(time))
    }
}

/// Serializes whole seconds as integers so stored values read like the
/// extension's own (`42`, `-1`) rather than `42.0`.
#[cfg(feature = "serde")]
pub mod seconds {
    use serde::Serializer;

    const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

    pub fn serialize<S>(value: &f64, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        if value.fract() == 0.0 && value.abs() < MAX_EXACT_INTEGER {
            serializer.serialize_i64(*value as i64)
        } else {
            serializer.serialize_f64(*value)
        }
    }
}
