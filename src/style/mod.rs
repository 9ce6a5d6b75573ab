/// Componentwise diffing of property values.
pub mod diff;
/// Style text parsing and value normalization.
pub mod parse;
