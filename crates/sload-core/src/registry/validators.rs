//! Stock validators and their hint texts.

use crate::modes::AUTO;

use super::tables::Validator;

pub const MUST_STR: &str = "Must be a string";
pub const MUST_BOOL: &str = "Must be a boolean value";
pub const MUST_OBJ: &str = "Must be an object";
pub const MUST_OPT_OBJ: &str = "Must be an object, or null";
pub const MUST_OPT_NUM: &str = "Must be a number, or null";
pub const MUST_FUNC: &str = "Must be a function or null";

pub fn is_str() -> Validator {
    Validator::new(|v, _| v.as_str().is_some())
}

pub fn is_bool() -> Validator {
    Validator::new(|v, _| v.as_bool().is_some())
}

pub fn is_map() -> Validator {
    Validator::new(|v, _| v.as_map().is_some())
}

pub fn opt_map() -> Validator {
    Validator::new(|v, _| v.is_null() || v.as_map().is_some())
}

pub fn opt_number() -> Validator {
    Validator::new(|v, _| v.is_null() || v.as_number().is_some())
}

pub fn func_or_null() -> Validator {
    Validator::new(|v, _| v.is_null() || v.as_func().is_some())
}

/// A registered mode name, or the auto sentinel.
pub fn mode_name() -> Validator {
    Validator::new(|v, reg| match v.as_str() {
        Some(name) => name == AUTO || reg.has_mode(name),
        None => false,
    })
}

/// An element handle; only meaningful when the host has a DOM.
pub fn element() -> Validator {
    Validator::new(|v, reg| reg.env().dom().is_some() && v.as_elem().is_some())
}
