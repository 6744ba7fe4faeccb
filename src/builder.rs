//! The production-building surface exposed to host code.
//!
//! Alternatives are accumulated with three combinators: [`seq`] (or
//! [`empty`]) opens an alternative, [`Rules::then`] appends a symbol to the
//! current one, and [`Rules::alt`] opens the next one. The `act*` methods
//! attach a reducer to the current alternative.
//!
//! ```
//! use lalr_parser::{Syntax, seq, term};
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
//! enum Tag { Num, Plus }
//!
//! let mut syn: Syntax<Tag, i64> = Syntax::new();
//! let e = syn.nonterm("E");
//! syn.define(e, seq(term(Tag::Num))
//!     .alt(seq(e).then(term(Tag::Plus)).then(term(Tag::Num)).act2(|x, y| x + y)));
//! ```

use std::fmt;
use std::rc::Rc;

use crate::symbol::{NonTerm, Symbol};

/// A semantic action of fixed arity.
///
/// The driver pops exactly `arity` values off the value stack on reduction
/// and applies the closure to them in left-to-right rule order. Reducers for
/// arities beyond three can be built with [`Reducer::variadic`].
pub struct Reducer<V> {
    arity: usize,
    apply: Rc<dyn Fn(Vec<V>) -> V>,
}

impl<V> Reducer<V> {
    /// A reducer taking no values.
    pub fn nullary(f: impl Fn() -> V + 'static) -> Self {
        Self {
            arity: 0,
            apply: Rc::new(move |_| f()),
        }
    }

    /// A reducer over the single value-carrying member of its rule.
    pub fn unary(f: impl Fn(V) -> V + 'static) -> Self {
        Self {
            arity: 1,
            apply: Rc::new(move |args| {
                let mut it = args.into_iter();
                f(it.next().unwrap())
            }),
        }
    }

    /// A reducer over two values, in rule order.
    pub fn binary(f: impl Fn(V, V) -> V + 'static) -> Self {
        Self {
            arity: 2,
            apply: Rc::new(move |args| {
                let mut it = args.into_iter();
                let x = it.next().unwrap();
                let y = it.next().unwrap();
                f(x, y)
            }),
        }
    }

    /// A reducer over three values, in rule order.
    pub fn ternary(f: impl Fn(V, V, V) -> V + 'static) -> Self {
        Self {
            arity: 3,
            apply: Rc::new(move |args| {
                let mut it = args.into_iter();
                let x = it.next().unwrap();
                let y = it.next().unwrap();
                let z = it.next().unwrap();
                f(x, y, z)
            }),
        }
    }

    /// A reducer of arbitrary declared arity; the closure receives exactly
    /// `arity` values in rule order.
    pub fn variadic(arity: usize, f: impl Fn(Vec<V>) -> V + 'static) -> Self {
        Self {
            arity,
            apply: Rc::new(f),
        }
    }

    /// The number of values this reducer consumes.
    pub fn arity(&self) -> usize {
        self.arity
    }

    pub(crate) fn apply(&self, args: Vec<V>) -> V {
        (self.apply)(args)
    }
}

impl<V> Clone for Reducer<V> {
    fn clone(&self) -> Self {
        Self {
            arity: self.arity,
            apply: Rc::clone(&self.apply),
        }
    }
}

impl<V> fmt::Debug for Reducer<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reducer").field("arity", &self.arity).finish()
    }
}

/// One right-hand side with its optional reducer.
#[derive(Debug)]
pub(crate) struct Alternative<T, V> {
    pub(crate) symbols: Vec<Symbol<T>>,
    pub(crate) reducer: Option<Reducer<V>>,
}

impl<T: Clone, V> Clone for Alternative<T, V> {
    fn clone(&self) -> Self {
        Self {
            symbols: self.symbols.clone(),
            reducer: self.reducer.clone(),
        }
    }
}

/// An accumulated list of alternatives for one nonterminal.
///
/// Built left to right; `then` and the `act*` methods always address the most
/// recently opened alternative. Attaching a second reducer to an alternative
/// replaces the first.
#[derive(Debug)]
pub struct Rules<T, V> {
    alts: Vec<Alternative<T, V>>,
}

/// Opens a one-symbol alternative.
pub fn seq<T, V>(sym: impl Into<Symbol<T>>) -> Rules<T, V> {
    Rules {
        alts: vec![Alternative {
            symbols: vec![sym.into()],
            reducer: None,
        }],
    }
}

/// Opens an empty (epsilon) alternative.
pub fn empty<T, V>() -> Rules<T, V> {
    Rules {
        alts: vec![Alternative {
            symbols: Vec::new(),
            reducer: None,
        }],
    }
}

impl<T, V> Rules<T, V> {
    /// Appends a symbol to the current alternative.
    pub fn then(mut self, sym: impl Into<Symbol<T>>) -> Self {
        self.alts.last_mut().unwrap().symbols.push(sym.into());
        self
    }

    /// Opens the next alternative (or splices in a whole accumulated list).
    pub fn alt(mut self, other: impl Into<Rules<T, V>>) -> Self {
        self.alts.extend(other.into().alts);
        self
    }

    /// Attaches a reducer to the current alternative.
    pub fn act(mut self, reducer: Reducer<V>) -> Self {
        self.alts.last_mut().unwrap().reducer = Some(reducer);
        self
    }

    /// Attaches a no-argument reducer to the current alternative.
    pub fn act0(self, f: impl Fn() -> V + 'static) -> Self {
        self.act(Reducer::nullary(f))
    }

    /// Attaches a one-argument reducer to the current alternative.
    pub fn act1(self, f: impl Fn(V) -> V + 'static) -> Self {
        self.act(Reducer::unary(f))
    }

    /// Attaches a two-argument reducer to the current alternative.
    pub fn act2(self, f: impl Fn(V, V) -> V + 'static) -> Self {
        self.act(Reducer::binary(f))
    }

    /// Attaches a three-argument reducer to the current alternative.
    pub fn act3(self, f: impl Fn(V, V, V) -> V + 'static) -> Self {
        self.act(Reducer::ternary(f))
    }

    pub(crate) fn into_alternatives(self) -> Vec<Alternative<T, V>> {
        self.alts
    }
}

impl<T, V> From<Symbol<T>> for Rules<T, V> {
    fn from(sym: Symbol<T>) -> Self {
        seq(sym)
    }
}

impl<T, V> From<NonTerm> for Rules<T, V> {
    fn from(nt: NonTerm) -> Self {
        seq(nt)
    }
}
