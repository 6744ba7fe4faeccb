//! The definition arena and the per-nonterminal parse entry point.
//!
//! Host code allocates nonterminal handles from a [`Syntax`] arena, attaches
//! alternatives to them with [`Syntax::define`], and parses token streams
//! with [`Syntax::parse`], naming any defined nonterminal as the start
//! symbol. The first parse for a start nonterminal materializes the grammar
//! and builds its tables; the result is memoized on the definition, so later
//! parses reuse the same immutable tables. Definitions added after that
//! first parse do not rebuild an already-materialized parser.
//!
//! Everything here is single-threaded by construction (reducers are shared
//! `Rc` closures), which is what serializes table materialization.

use std::collections::{HashMap, HashSet};
use std::fmt::Debug;
use std::hash::Hash;
use std::rc::Rc;

use once_cell::unsync::OnceCell;

use crate::builder::{Alternative, Rules};
use crate::error::{Error, Result};
use crate::grammar::{Grammar, Rule};
use crate::parser::Parser;
use crate::symbol::{NonTerm, Symbol};
use crate::token::Token;

#[derive(Debug)]
struct NonTermDef<T, V> {
    name: String,
    alternatives: Vec<Alternative<T, V>>,
    parser: OnceCell<Rc<Parser<T, V>>>,
}

/// An arena of nonterminal definitions.
#[derive(Debug)]
pub struct Syntax<T, V> {
    defs: Vec<NonTermDef<T, V>>,
}

impl<T, V> Default for Syntax<T, V> {
    fn default() -> Self {
        Self { defs: Vec::new() }
    }
}

impl<T, V> Syntax<T, V>
where
    T: Clone + Eq + Hash + Ord + Debug,
{
    pub fn new() -> Self {
        Self { defs: Vec::new() }
    }

    /// Allocates a fresh nonterminal handle. The name is used only in
    /// diagnostics.
    pub fn nonterm(&mut self, name: impl Into<String>) -> NonTerm {
        self.defs.push(NonTermDef {
            name: name.into(),
            alternatives: Vec::new(),
            parser: OnceCell::new(),
        });
        NonTerm(self.defs.len() - 1)
    }

    /// Appends alternatives to a nonterminal's production list.
    ///
    /// May be called repeatedly; each call appends, so a definition can be
    /// spread over several statements.
    pub fn define(&mut self, nt: NonTerm, rules: impl Into<Rules<T, V>>) {
        self.defs[nt.0]
            .alternatives
            .extend(rules.into().into_alternatives());
    }

    /// Materializes the grammar reachable from `start`.
    ///
    /// Walks nonterminal references breadth-first in definition order,
    /// classifies every non-nonterminal RHS symbol as a terminal, strips
    /// explicit ε symbols (an empty RHS is the canonical epsilon form), and
    /// prepends the augmented rule `S' → S`. Validation failures surface
    /// here rather than at parse time.
    pub fn grammar(&self, start: NonTerm) -> Result<Grammar<T, V>, T> {
        // Reachability walk over nonterminal handles.
        let mut order = vec![start.0];
        let mut visited = vec![false; self.defs.len()];
        visited[start.0] = true;
        let mut i = 0;
        while i < order.len() {
            for alternative in &self.defs[order[i]].alternatives {
                for symbol in &alternative.symbols {
                    if let Symbol::Nonterminal(nt) = symbol {
                        if !visited[nt.0] {
                            visited[nt.0] = true;
                            order.push(nt.0);
                        }
                    }
                }
            }
            i += 1;
        }

        let mut rules = vec![Rule {
            lhs: Symbol::Start,
            rhs: vec![Symbol::Nonterminal(start)],
            reducer: None,
        }];
        let mut terminals: HashSet<T> = HashSet::new();
        let mut names: HashMap<NonTerm, String> = HashMap::new();

        for &index in &order {
            let def = &self.defs[index];
            names.insert(NonTerm(index), def.name.clone());
            if def.alternatives.is_empty() {
                return Err(Error::NoProductions(def.name.clone()));
            }

            for alternative in &def.alternatives {
                let mut rhs = Vec::new();
                for symbol in &alternative.symbols {
                    match symbol {
                        Symbol::Epsilon => {}
                        Symbol::Start | Symbol::EndMarker => {
                            return Err(Error::ReservedSymbol(symbol.to_string()));
                        }
                        Symbol::Terminal(tag) => {
                            terminals.insert(tag.clone());
                            rhs.push(symbol.clone());
                        }
                        Symbol::Nonterminal(_) => rhs.push(symbol.clone()),
                    }
                }

                let nonterm_members = rhs.iter().filter(|s| s.is_nonterminal()).count();
                match &alternative.reducer {
                    Some(reducer) if reducer.arity() > rhs.len() => {
                        return Err(Error::ReducerArity {
                            rule: self.alternative_string(index, &rhs),
                            arity: reducer.arity(),
                            members: rhs.len(),
                        });
                    }
                    None if nonterm_members > 1 => {
                        return Err(Error::MissingReducer {
                            rule: self.alternative_string(index, &rhs),
                        });
                    }
                    _ => {}
                }

                rules.push(Rule {
                    lhs: Symbol::Nonterminal(NonTerm(index)),
                    rhs,
                    reducer: alternative.reducer.clone(),
                });
            }
        }

        log::debug!(
            "materialized {} rules, {} terminals, {} nonterminals from {}",
            rules.len(),
            terminals.len(),
            order.len(),
            self.defs[start.0].name
        );

        Ok(Grammar::new(rules, terminals, names, start))
    }

    /// Returns the memoized parser for `start`, building it on first use.
    pub fn parser(&self, start: NonTerm) -> Result<Rc<Parser<T, V>>, T> {
        let cell = &self.defs[start.0].parser;
        let parser = cell.get_or_try_init(|| -> Result<Rc<Parser<T, V>>, T> {
            Ok(Rc::new(Parser::build(self.grammar(start)?)))
        })?;
        Ok(Rc::clone(parser))
    }

    /// Parses a token stream with `start` as the start symbol.
    ///
    /// Returns the start symbol's synthesized value, or `None` when no
    /// reduction pushed one.
    pub fn parse<K>(&self, start: NonTerm, tokens: &[K]) -> Result<Option<V>, T>
    where
        K: Token<Tag = T, Value = V>,
    {
        self.parser(start)?.parse(tokens)
    }

    fn alternative_string(&self, lhs: usize, rhs: &[Symbol<T>]) -> String {
        let body = if rhs.is_empty() {
            "ε".to_string()
        } else {
            rhs.iter()
                .map(|s| match s {
                    Symbol::Nonterminal(nt) => self.defs[nt.0].name.clone(),
                    other => other.to_string(),
                })
                .collect::<Vec<_>>()
                .join(" ")
        };
        format!("{} → {}", self.defs[lhs].name, body)
    }
}
