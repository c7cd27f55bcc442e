use crate::errors::SyncError;

/// Largest subscriber bound a caller may ask for.
pub const MAX_SUBSCRIBERS: u64 = 10_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubscriberBounds {
    pub min: u64,
    pub max: u64,
}

impl Default for SubscriberBounds {
    fn default() -> Self {
        SubscriberBounds {
            min: 0,
            max: MAX_SUBSCRIBERS,
        }
    }
}

impl SubscriberBounds {
    /// Validates the raw `minSubscribers` / `maxSubscribers` query values.
    ///
    /// A lower bound above [`MAX_SUBSCRIBERS`] is rejected while an upper bound
    /// above it is clamped.
    pub fn from_query(min: Option<&str>, max: Option<&str>) -> Result<Self, SyncError> {
        let min = parse_bound("minSubscribers", min)?.unwrap_or(0);
        let max = parse_bound("maxSubscribers", max)?.unwrap_or(MAX_SUBSCRIBERS);

        if min > MAX_SUBSCRIBERS {
            return Err(SyncError::Validation(format!(
                "minSubscribers must be less than or equal to {MAX_SUBSCRIBERS}"
            )));
        }

        let max = max.min(MAX_SUBSCRIBERS);
        if min > max {
            return Err(SyncError::Validation(
                "minSubscribers must be less than or equal to maxSubscribers".to_string(),
            ));
        }

        Ok(SubscriberBounds { min, max })
    }
}

// Blank counts as absent; fractions are floored.
fn parse_bound(name: &str, raw: Option<&str>) -> Result<Option<u64>, SyncError> {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(None);
    };

    match raw.parse::<f64>() {
        Ok(value) if value.is_finite() && value >= 0.0 => Ok(Some(value.floor() as u64)),
        _ => Err(SyncError::Validation(format!(
            "{name} must be a non-negative number"
        ))),
    }
}
