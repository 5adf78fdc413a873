/// Field-path scalar coercion command.
pub mod coerce;
/// Document re-encoding command.
pub mod format;
/// Leaf path listing command.
pub mod paths;

mod util;
