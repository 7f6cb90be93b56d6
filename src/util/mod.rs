//! Small ambient utilities shared by the builder, optimizer and matcher:
//! byte-position bookkeeping for diagnostics and a leveled debug logger.

mod code;
mod logger;

use once_cell::unsync::OnceCell;

pub use logger::Log;

#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
/// Line and column of a byte offset within a [`Code`], 1-indexed.
pub struct Position {
    pub line: usize,
    pub column: usize,
}

/// A borrowed input record together with lazily computed line-break offsets,
/// used to turn a byte offset into a human-readable [`Position`] for
/// diagnostics (e.g. where the furthest-parsed point of a failed match fell).
pub struct Code<'c> {
    pub value: &'c [u8],
    line_breaks: OnceCell<Vec<usize>>,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
/// Verbosity levels for the builder/matcher debug narration. Ordered: a
/// logger configured at a given level also emits everything below it.
pub enum Log<T> {
    None,
    Default(T),
    Success(T),
    Result(T),
    Verbose(T),
}
