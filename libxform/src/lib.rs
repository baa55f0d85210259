//! The built-in transforms of the pipeline.
//!
//! [`rewrite`] contains the pure transforms ([`Uppercaser`],
//! [`Rotator`], [`Flipper`], and [`Expander`]), which produce a new
//! line and touch nothing else.
//!
//! [`print`] contains the side-effecting transforms ([`Logger`] and
//! [`Typewriter`]), which write to a sink (standard output by
//! default) and pass the line through unchanged.
//!
//! [`create`] resolves a stage name from the command line to a fresh
//! transform instance.

#![warn(missing_docs)]

pub mod print;
pub mod rewrite;

pub use print::{Logger, Typewriter};
pub use rewrite::{Expander, Flipper, Rotator, Uppercaser};

use libstage::Transform;

/// The stage names [`create`] recognizes.
pub const KNOWN_NAMES: [&str; 6] = [
    "logger",
    "typewriter",
    "uppercaser",
    "rotator",
    "flipper",
    "expander",
];

/// The stage names [`create`] recognizes, for error messages and
/// usage text.
pub fn known_names() -> &'static [&'static str] {
    &KNOWN_NAMES
}

/// Creates a fresh transform instance for a stage name.
///
/// Every call yields an independent instance, so the same name may
/// appear several times in one pipeline without sharing state.
/// Returns `None` for unrecognized names.
pub fn create(name: &str) -> Option<Box<dyn Transform>> {
    match name {
        "logger" => Some(Box::new(Logger::new())),
        "typewriter" => Some(Box::new(Typewriter::new())),
        "uppercaser" => Some(Box::new(Uppercaser)),
        "rotator" => Some(Box::new(Rotator)),
        "flipper" => Some(Box::new(Flipper)),
        "expander" => Some(Box::new(Expander)),
        _ => None,
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn every_known_name_resolves() {
        for name in known_names() {
            assert!(create(name).is_some(), "missing transform: {name}");
        }
    }

    #[test]
    fn unknown_names_do_not_resolve() {
        assert!(create("frobnicator").is_none());
        assert!(create("").is_none());
        assert!(create("Logger").is_none());
    }
}
