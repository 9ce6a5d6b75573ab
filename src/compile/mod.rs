/// Argument classification into instructions.
pub mod classify;
/// Instruction stream to timeline compiler.
pub mod compiler;
/// Sequence and concurrent stage graphs.
pub mod graph;
/// Classified instructions and callbacks.
pub mod instruction;
/// Compiled stages and timelines.
pub mod stage;
