/// Chained animation builder.
pub mod builder;
/// Easing curves and the named-curve table.
pub mod ease;
