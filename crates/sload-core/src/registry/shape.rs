//! Structural checks run on a mode before it is registered.
//!
//! The trait already guarantees `load`/`handles` exist; what is left to check
//! at runtime is the mode's name and the internal consistency of the tables
//! it contributes.

use crate::error::LoaderError;
use crate::modes::{Mode, AUTO};

use super::tables::OptionTables;
use super::DEFAULT_PRESET;

fn shape(field: &'static str, reason: impl Into<String>) -> LoaderError {
    LoaderError::Shape {
        field,
        reason: reason.into(),
    }
}

/// Check `mode` against the already-merged `tables`. The first failure wins.
pub(crate) fn check_mode(mode: &dyn Mode, tables: &OptionTables) -> Result<(), LoaderError> {
    let name = mode.name();
    if name.trim().is_empty() {
        return Err(shape("name", "must be a non-empty string"));
    }
    if name == AUTO || name == DEFAULT_PRESET {
        return Err(shape("name", format!("must not be the reserved name '{name}'")));
    }

    let own = mode.contributions();
    let has_validator =
        |opt: &str| own.validators.contains_key(opt) || tables.validators.contains_key(opt);
    let has_default = |opt: &str| own.defaults.contains_key(opt) || tables.defaults.contains_key(opt);

    if let Some(props) = &own.auto_props {
        if let Some(p) = props.iter().find(|p| !has_validator(p.as_str())) {
            return Err(shape("autoProps", format!("lists '{p}' which has no validator")));
        }
    }
    if let Some(key) = own.validation_msgs.keys().find(|k| !has_validator(k.as_str())) {
        return Err(shape(
            "validationMsgs",
            format!("has a hint for '{key}' which has no validator"),
        ));
    }
    if let Some(opt) = own.default_opts.iter().find(|o| !has_default(o.as_str())) {
        return Err(shape("defaultOpts", format!("lists '{opt}' which has no default")));
    }
    Ok(())
}
