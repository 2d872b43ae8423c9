//! Display-name generation for scenarios and their reported results.

use crate::config;

/// Display name of the synthetic teardown-failure result.
pub const TEARDOWN_STEP_NAME: &str = "(Teardown)";

/// Builds a scenario display name from its method name and resolved
/// arguments.
///
/// Arguments render as `name: value` pairs; a missing parameter name renders
/// as `???` and a missing argument as `null`. The suffix is omitted entirely
/// when there are no parameters and no arguments, or when configuration asks
/// for argument-free names.
///
/// # Examples
///
/// ```
/// use stepwise::naming::scenario_display_name;
///
/// let name = scenario_display_name(
///     "Calculator::addition",
///     &[String::from("x"), String::from("y")],
///     &[String::from("1"), String::from("2")],
/// );
/// assert_eq!(name, "Calculator::addition(x: 1, y: 2)");
/// ```
#[must_use]
pub fn scenario_display_name(method: &str, params: &[String], args: &[String]) -> String {
    if params.is_empty() && args.is_empty() {
        return method.to_owned();
    }
    if config::omit_arguments_from_scenario_names() {
        return method.to_owned();
    }
    let tokens: Vec<String> = (0..params.len().max(args.len()))
        .map(|index| {
            let param = params.get(index).map_or("???", String::as_str);
            let arg = args.get(index).map_or("null", String::as_str);
            format!("{param}: {arg}")
        })
        .collect();
    format!("{method}({})", tokens.join(", "))
}

/// Builds the display name of one step's reported result.
///
/// The bracketed pair carries the 1-based scenario and step ordinals so
/// results sort in execution order.
#[must_use]
pub fn step_display_name(
    scenario: &str,
    scenario_ordinal: u32,
    step_ordinal: usize,
    text: &str,
) -> String {
    format!("{scenario} [{scenario_ordinal:02}.{step_ordinal:02}] {text}")
}
