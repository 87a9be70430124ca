//! # Stream Core
//!
//! The reconciler between the game's text stream and the [`universe`] model.
//! A tokenizer recognizes fragments of game output and hands each one over
//! with its [`FragmentKind`]; the [`Reconciler`] scans typed values out of
//! the text, correlates them with context left by earlier fragments and
//! applies the result to the model.
//!
//! ## Core Components
//!
//! - **scan**: integer, printable-run and date scanners that skip ANSI escapes
//! - **fragment**: the fragment vocabulary shared with the tokenizer
//! - **reconciler**: per-fragment handlers, parse context and halting
//! - **events**: automation events raised for scripts
//! - **ranks**: splitting rank titles off trader names
//!
//! ## Design Philosophy
//!
//! - **Notify on change**: state changes are published only when a value differs
//! - **Drop, don't crash**: a fragment that cannot be read is logged and skipped
//! - **Halt on integrity faults**: data from a different game epoch never reaches the model

pub mod config;
pub mod context;
pub mod error;
pub mod events;
pub mod fragment;
pub mod ranks;
pub mod reconciler;
pub mod scan;

pub use config::*;
pub use context::*;
pub use error::*;
pub use events::*;
pub use fragment::*;
pub use ranks::*;
pub use reconciler::*;
