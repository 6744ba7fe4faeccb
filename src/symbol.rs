//! Symbol types and utilities for grammar definitions.
//!
//! This module defines the core Symbol type over host-supplied terminal tags,
//! together with the nonterminal handle type used to refer to definitions held
//! in a [`Syntax`](crate::syntax::Syntax) arena.

use std::fmt;

/// A handle to a nonterminal definition.
///
/// Handles are cheap indices into the [`Syntax`](crate::syntax::Syntax) arena
/// that allocated them. Identity is the allocation slot, independent of the
/// production list attached to it, so a handle stays valid while its
/// definition grows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NonTerm(pub(crate) usize);

impl NonTerm {
    /// Returns the arena slot of this handle.
    pub fn index(self) -> usize {
        self.0
    }
}

/// Represents a symbol in a grammar over terminal tags of type `T`.
///
/// Terminal tags are opaque values supplied by the host's lexer. The two
/// marker symbols ([`Symbol::Epsilon`] and [`Symbol::EndMarker`]) and the
/// augmented start symbol are distinguishable from every user terminal by
/// construction.
///
/// Variant order gives the derived `Ord` a fixed sorting:
/// epsilon < terminals < nonterminals < start < end marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Symbol<T> {
    /// The empty string (ε). Appears in FIRST sets, never on the input tape.
    Epsilon,
    /// A terminal symbol carrying the host's tag.
    Terminal(T),
    /// A nonterminal, referred to by handle.
    Nonterminal(NonTerm),
    /// The augmented start symbol (S').
    Start,
    /// The end-of-input marker ($).
    EndMarker,
}

impl<T> Symbol<T> {
    /// Checks if this symbol is a terminal.
    #[inline]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Symbol::Terminal(_))
    }

    /// Checks if this symbol is a nonterminal (the augmented start counts).
    #[inline]
    pub const fn is_nonterminal(&self) -> bool {
        matches!(self, Symbol::Nonterminal(_) | Symbol::Start)
    }

    /// Checks if this symbol is epsilon (ε).
    #[inline]
    pub const fn is_epsilon(&self) -> bool {
        matches!(self, Symbol::Epsilon)
    }

    /// Checks if this symbol is the end marker ($).
    #[inline]
    pub const fn is_end_marker(&self) -> bool {
        matches!(self, Symbol::EndMarker)
    }
}

/// Wraps a terminal tag as a symbol.
///
/// Shorthand for building right-hand sides:
/// `seq(expr).then(term(Tag::Plus)).then(trm)`.
pub fn term<T>(tag: T) -> Symbol<T> {
    Symbol::Terminal(tag)
}

impl<T> From<NonTerm> for Symbol<T> {
    fn from(nt: NonTerm) -> Self {
        Symbol::Nonterminal(nt)
    }
}

impl<T: fmt::Debug> fmt::Display for Symbol<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Symbol::Terminal(tag) => write!(f, "{:?}", tag),
            Symbol::Nonterminal(nt) => write!(f, "N{}", nt.0),
            Symbol::Epsilon => write!(f, "ε"),
            Symbol::Start => write!(f, "S'"),
            Symbol::EndMarker => write!(f, "$"),
        }
    }
}
