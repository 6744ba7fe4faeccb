//! ACTION/GOTO table assembly and the shift/reduce parse driver.

use std::collections::BTreeMap;
use std::fmt::Debug;
use std::hash::Hash;

use crate::error::{Error, Result};
use crate::grammar::Grammar;
use crate::lalr::{build_collection, merge_cores};
use crate::symbol::{NonTerm, Symbol};
use crate::token::Token;

/// A parse action for one (state, terminal) cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Shift the token and move to the target state.
    Shift(usize),
    /// Reduce by the rule at this index.
    Reduce(usize),
    /// The input is a complete sentence of the start symbol.
    Accept,
}

/// A table cell collision found while filling the ACTION table.
///
/// The first-written action is kept: shifts are installed before reduces, so
/// a shift/reduce collision resolves toward shifting, and of two reduces the
/// lower rule index wins. Every collision is recorded and logged; none makes
/// the table non-deterministic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conflict<T> {
    pub state: usize,
    pub symbol: Symbol<T>,
    pub kept: Action,
    pub dropped: Action,
}

/// A table-driven LALR(1) parser for one start nonterminal.
#[derive(Debug)]
pub struct Parser<T, V> {
    grammar: Grammar<T, V>,
    actions: Vec<BTreeMap<Symbol<T>, Action>>,
    gotos: Vec<BTreeMap<NonTerm, usize>>,
    conflicts: Vec<Conflict<T>>,
}

impl<T, V> Parser<T, V>
where
    T: Clone + Eq + Hash + Ord + Debug,
{
    /// Builds the LALR(1) tables for a materialized grammar.
    pub fn build(grammar: Grammar<T, V>) -> Self {
        let states = merge_cores(build_collection(&grammar));

        let mut actions: Vec<BTreeMap<Symbol<T>, Action>> = vec![BTreeMap::new(); states.len()];
        let mut gotos: Vec<BTreeMap<NonTerm, usize>> = vec![BTreeMap::new(); states.len()];
        let mut conflicts = Vec::new();

        for (state_index, state) in states.iter().enumerate() {
            for (symbol, &target) in &state.transitions {
                match symbol {
                    Symbol::Terminal(_) => {
                        actions[state_index].insert(symbol.clone(), Action::Shift(target));
                    }
                    Symbol::Nonterminal(nt) => {
                        gotos[state_index].insert(*nt, target);
                    }
                    _ => {}
                }
            }

            for (item, lookaheads) in &state.items {
                let rule = grammar.rule(item.rule);
                if item.marker < rule.rhs.len() {
                    continue;
                }

                if rule.lhs == Symbol::Start {
                    actions[state_index].insert(Symbol::EndMarker, Action::Accept);
                    continue;
                }

                for lookahead in lookaheads {
                    match actions[state_index].get(lookahead) {
                        None => {
                            actions[state_index]
                                .insert(lookahead.clone(), Action::Reduce(item.rule));
                        }
                        Some(&kept) => {
                            let conflict = Conflict {
                                state: state_index,
                                symbol: lookahead.clone(),
                                kept,
                                dropped: Action::Reduce(item.rule),
                            };
                            log::warn!(
                                "state {}, symbol {}: {} conflicts with {}; keeping the first",
                                state_index,
                                lookahead,
                                describe(&grammar, conflict.kept),
                                describe(&grammar, conflict.dropped),
                            );
                            conflicts.push(conflict);
                        }
                    }
                }
            }
        }

        Self {
            grammar,
            actions,
            gotos,
            conflicts,
        }
    }

    /// Runs the shift/reduce loop over a finite, end-marker-terminated token
    /// stream.
    ///
    /// Reducers fire in canonical rightmost-derivation-in-reverse order. On
    /// accept, the top of the value stack (if any) is the start symbol's
    /// synthesized value.
    pub fn parse<K>(&self, tokens: &[K]) -> Result<Option<V>, T>
    where
        K: Token<Tag = T, Value = V>,
    {
        let mut stack: Vec<(Symbol<T>, usize)> = vec![(Symbol::Start, 0)];
        let mut values: Vec<V> = Vec::new();
        let mut cursor = 0;

        loop {
            let Some(token) = tokens.get(cursor) else {
                return Err(Error::MissingEndMarker);
            };
            let state = stack.last().unwrap().1;
            let tag = token.tag();

            let Some(&action) = self.actions[state].get(&tag) else {
                return Err(self.unexpected(token, state));
            };

            match action {
                Action::Shift(target) => {
                    stack.push((tag, target));
                    if let Some(value) = token.value() {
                        values.push(value);
                    }
                    cursor += 1;
                }
                Action::Reduce(rule_index) => {
                    let rule = self.grammar.rule(rule_index);
                    for _ in 0..rule.rhs.len() {
                        stack.pop();
                    }

                    if let Some(reducer) = &rule.reducer {
                        let arity = reducer.arity();
                        if values.len() < arity {
                            return Err(Error::ValueStackUnderflow {
                                rule: self.grammar.rule_string(rule_index),
                                arity,
                                available: values.len(),
                            });
                        }
                        let args = values.split_off(values.len() - arity);
                        values.push(reducer.apply(args));
                    }

                    let below = stack.last().unwrap().1;
                    let target = match rule.lhs {
                        Symbol::Nonterminal(nt) => {
                            self.gotos[below].get(&nt).copied().ok_or_else(|| {
                                Error::MissingGoto {
                                    state: below,
                                    nonterminal: self.grammar.name_of(nt).to_string(),
                                }
                            })?
                        }
                        _ => unreachable!("reductions only fire for user nonterminals"),
                    };
                    stack.push((rule.lhs.clone(), target));
                }
                Action::Accept => return Ok(values.pop()),
            }
        }
    }

    /// The materialized grammar behind this parser.
    pub fn grammar(&self) -> &Grammar<T, V> {
        &self.grammar
    }

    /// Number of LALR(1) states.
    pub fn state_count(&self) -> usize {
        self.actions.len()
    }

    /// ACTION table rows, one ordered map per state.
    pub fn actions(&self) -> &[BTreeMap<Symbol<T>, Action>] {
        &self.actions
    }

    /// GOTO table rows, one ordered map per state.
    pub fn gotos(&self) -> &[BTreeMap<NonTerm, usize>] {
        &self.gotos
    }

    /// Table collisions resolved during construction, in discovery order.
    pub fn conflicts(&self) -> &[Conflict<T>] {
        &self.conflicts
    }

    fn unexpected<K>(&self, token: &K, state: usize) -> Error<T>
    where
        K: Token<Tag = T, Value = V>,
    {
        let expected: Vec<Symbol<T>> = self.actions[state].keys().cloned().collect();
        let listing = expected
            .iter()
            .map(|s| s.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        let found = token.tag();
        let at = token.fragment();
        Error::UnexpectedToken {
            message: format!("unexpected {} at {}; expected one of: {}", found, at, listing),
            found,
            at,
            expected,
        }
    }
}

fn describe<T, V>(grammar: &Grammar<T, V>, action: Action) -> String
where
    T: Clone + Eq + Hash + Ord + Debug,
{
    match action {
        Action::Shift(target) => format!("shift {}", target),
        Action::Reduce(rule) => format!("reduce {}", grammar.rule_string(rule)),
        Action::Accept => "accept".to_string(),
    }
}
