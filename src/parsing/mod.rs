/*!
# Parsing module
Contains the logic for opening the input variant stream.
*/
/// Wrappers around the noodles readers
pub mod noodles_helper;
