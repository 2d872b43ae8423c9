//! Runtime configuration for stepwise.
//!
//! The module currently exposes the flag controlling whether scenario display
//! names include the rendered argument list.

use std::sync::atomic::{AtomicU8, Ordering};

const OVERRIDE_UNSET: u8 = 0;
const OVERRIDE_FALSE: u8 = 1;
const OVERRIDE_TRUE: u8 = 2;

static OMIT_ARGUMENTS_OVERRIDE: AtomicU8 = AtomicU8::new(OVERRIDE_UNSET);

fn parse_env_bool(value: &str) -> Option<bool> {
    let value = value.trim();
    if ["1", "true", "yes", "on"]
        .iter()
        .any(|candidate| value.eq_ignore_ascii_case(candidate))
    {
        return Some(true);
    }
    if ["0", "false", "no", "off"]
        .iter()
        .any(|candidate| value.eq_ignore_ascii_case(candidate))
    {
        return Some(false);
    }
    None
}

fn env_omit_arguments() -> Option<bool> {
    std::env::var("STEPWISE_OMIT_ARGUMENTS")
        .ok()
        .as_deref()
        .and_then(parse_env_bool)
}

fn override_state() -> Option<bool> {
    match OMIT_ARGUMENTS_OVERRIDE.load(Ordering::Relaxed) {
        OVERRIDE_FALSE => Some(false),
        OVERRIDE_TRUE => Some(true),
        _ => None,
    }
}

/// Determine whether scenario display names should omit their argument list.
#[must_use]
pub fn omit_arguments_from_scenario_names() -> bool {
    override_state().or_else(env_omit_arguments).unwrap_or(false)
}

/// Override the omit-arguments flag for the current process.
///
/// Tests may call [`clear_omit_arguments_override`] to restore environment
/// driven behaviour after toggling the override.
pub fn set_omit_arguments(enabled: bool) {
    let value = if enabled { OVERRIDE_TRUE } else { OVERRIDE_FALSE };
    OMIT_ARGUMENTS_OVERRIDE.store(value, Ordering::Relaxed);
}

/// Remove any in-process override for the omit-arguments flag.
pub fn clear_omit_arguments_override() {
    OMIT_ARGUMENTS_OVERRIDE.store(OVERRIDE_UNSET, Ordering::Relaxed);
}
