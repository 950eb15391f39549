use std::{collections::HashMap, sync::LazyLock};

use regex::{Captures, Regex};

// Per DASH-IF IOP v4.3, only %0[width]d is permitted inside identifier
// substitutions, so the replacement is implemented directly instead of
// pulling in a printf reimplementation.
//
// Example template: "$RepresentationID$/$Number%04d$.m4s"
static IDENTIFIER_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$(RepresentationID|Number|Time|Bandwidth)(?:%0(\d)d)?\$").unwrap()
});

/// Substitution context for `SegmentTemplate@media` URL templates.
#[derive(Default)]
pub struct Template {
    args: HashMap<&'static str, String>,
}

impl Template {
    pub const REPRESENTATION_ID: &'static str = "RepresentationID";
    pub const NUMBER: &'static str = "Number";
    pub const TIME: &'static str = "Time";
    pub const BANDWIDTH: &'static str = "Bandwidth";

    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: &'static str, value: String) {
        self.args.insert(key, value);
    }

    /// Expand every known identifier; unknown or unset identifiers are left
    /// verbatim.
    pub fn resolve(&self, template: &str) -> String {
        IDENTIFIER_REGEX
            .replace_all(template, |caps: &Captures| {
                let Some(value) = self.args.get(&caps[1]) else {
                    return caps[0].to_string();
                };
                match caps.get(2).and_then(|width| width.as_str().parse().ok()) {
                    Some(width) => format!("{value:0>width$}", width = width),
                    None => value.clone(),
                }
            })
            .into_owned()
    }
}
