/*!
# CLI module
Command line interface functionality that is specific to swapgt.
*/

/// The main CLI module that contains the top-level CLI parser and help text
pub mod core;
/// The settings and checks for the GT exchange run
pub mod exchange;
