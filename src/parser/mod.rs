//! Scannerless parser: a value-threaded combinator engine and the grammar
//! built from it.

mod combinators;
mod grammar;
mod state;
mod trace;

pub use combinators::*;
pub use grammar::*;
pub use state::*;
pub use trace::*;
