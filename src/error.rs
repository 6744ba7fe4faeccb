//! Error types for grammar construction and parsing.

use std::fmt::Debug;

use thiserror::Error;

use crate::symbol::Symbol;
use crate::token::Fragment;

/// Errors that can occur while materializing a grammar or driving a parse.
///
/// Table conflicts are deliberately absent: a shift/reduce or reduce/reduce
/// collision keeps the first-written action and is reported through
/// [`Parser::conflicts`](crate::parser::Parser::conflicts) and `log::warn!`
/// instead of failing the build.
#[derive(Error, Debug)]
pub enum Error<T: Debug> {
    #[error("nonterminal {0} has no productions")]
    NoProductions(String),

    #[error("{rule}: reducer takes {arity} values but the right-hand side has {members} members")]
    ReducerArity {
        rule: String,
        arity: usize,
        members: usize,
    },

    #[error("{rule}: several members produce a value; an explicit reducer is required")]
    MissingReducer { rule: String },

    #[error("reserved symbol {0} may not appear in a production")]
    ReservedSymbol(String),

    #[error("{message}")]
    UnexpectedToken {
        message: String,
        found: Symbol<T>,
        at: Fragment,
        expected: Vec<Symbol<T>>,
    },

    #[error("token stream ended without the end-of-text sentinel")]
    MissingEndMarker,

    #[error("no goto transition from state {state} on {nonterminal}")]
    MissingGoto { state: usize, nonterminal: String },

    #[error("{rule}: reducer needs {arity} values but only {available} are on the value stack")]
    ValueStackUnderflow {
        rule: String,
        arity: usize,
        available: usize,
    },
}

/// Type alias for Results in this crate, generic over the terminal tag.
pub type Result<A, T> = std::result::Result<A, Error<T>>;
