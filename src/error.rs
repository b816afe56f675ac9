//=========================================================================
// Input Errors
//=========================================================================
//
// Configuration-time error type for the input crate.
//
// Per-frame polling never fails: missing devices, signatures or resolvers
// degrade to neutral values. Only configuration calls (registering
// signatures/devices, validating settings) return `InputError`.
//
//=========================================================================

//=== External Dependencies ===============================================

use thiserror::Error;

//=== InputError ==========================================================

/// Errors raised while configuring devices, registries or cursor logic.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InputError {
    /// A signature with the same id is already registered on the device.
    #[error("device '{device}' already has a signature with id '{id}'")]
    DuplicateSignature { device: String, id: String },

    /// A live device is already registered under this name.
    #[error("a device named '{name}' is already registered")]
    DuplicateDevice { name: String },

    /// No live device is registered under this name.
    #[error("no device named '{name}' is registered")]
    UnknownDevice { name: String },

    /// The device is mutably borrowed elsewhere and cannot be inspected.
    #[error("device is busy and cannot be registered")]
    DeviceBusy,

    /// A setting is outside its accepted range.
    #[error("invalid value {value} for setting '{name}'")]
    InvalidSetting { name: &'static str, value: f64 },
}

/// Result alias for configuration calls.
pub type Result<T> = std::result::Result<T, InputError>;

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offending_item() {
        let err = InputError::DuplicateSignature {
            device: "keyboard".into(),
            id: "Jump".into(),
        };
        assert_eq!(
            err.to_string(),
            "device 'keyboard' already has a signature with id 'Jump'"
        );

        let err = InputError::UnknownDevice { name: "pad2".into() };
        assert!(err.to_string().contains("pad2"));

        let err = InputError::InvalidSetting { name: "click_timeout", value: -1.0 };
        assert!(err.to_string().contains("click_timeout"));
    }
}
