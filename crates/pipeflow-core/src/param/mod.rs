//! Parámetros numéricos: tipos declarados, coerción de valores y utilidades
//! para fusionar defaults con overrides.

pub mod merge;
pub mod types;
pub mod values;

pub use merge::merge_json;
pub use types::{ParamSpec, ParamType};
pub use values::{coerce_value, number_value, parse_assignments, render_value, RawArguments};
