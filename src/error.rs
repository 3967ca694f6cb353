//! Error types for group configuration and tree structure
//!
//! Rejected operations under an invalid play state are not errors; they return
//! `false`, `0` or `None`. Only configuration and structural mistakes end up here.

use crate::simulation::manager::GroupId;
use thiserror::Error;

/// Crate-wide result type alias.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors reported synchronously by the call that introduces them.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    /// A configuration value was out of range or not finite.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// The id does not refer to a live group in this tree.
    #[error("unknown group {0}")]
    UnknownGroup(GroupId),

    /// Attaching would make a group its own ancestor.
    #[error("cannot attach {child} beneath {parent}: {child} is an ancestor of {parent}")]
    CyclicAttachment { parent: GroupId, child: GroupId },
}

/// Rejects NaN and infinities.
pub(crate) fn ensure_finite(name: &str, value: f32) -> Result<()> {
    if !value.is_finite() {
        return Err(Error::InvalidParameter(format!(
            "{name} must be finite, got {value}"
        )));
    }
    Ok(())
}

/// Rejects NaN, infinities and negative values.
pub(crate) fn ensure_non_negative(name: &str, value: f32) -> Result<()> {
    ensure_finite(name, value)?;
    if value < 0.0 {
        return Err(Error::InvalidParameter(format!(
            "{name} must be >= 0, got {value}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_is_informative() {
        let e = Error::InvalidParameter("decay rate must be finite, got NaN".to_string());
        let msg = e.to_string();
        assert!(msg.contains("invalid parameter"));
        assert!(msg.contains("decay rate"));
    }

    #[test]
    fn test_ensure_non_negative() {
        assert!(ensure_non_negative("delay", 0.0).is_ok());
        assert!(ensure_non_negative("delay", 2.5).is_ok());
        assert!(ensure_non_negative("delay", -0.1).is_err());
        assert!(ensure_non_negative("delay", f32::NAN).is_err());
        assert!(ensure_non_negative("speed", -3.0).is_err());
        assert!(ensure_finite("center x", -3.0).is_ok());
        assert!(ensure_finite("center x", f32::INFINITY).is_err());
    }
}
