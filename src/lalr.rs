//! Canonical LR(1) collection construction and LALR core merging.
//!
//! Items refer to rules by index and group their lookaheads per LR(0) core,
//! so a state is a `BTreeMap` from core to lookahead set. The canonical form
//! makes item-set equality, LR(0) projection, and iteration order all cheap
//! and deterministic.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt::Debug;
use std::hash::Hash;

use crate::first_follow::first_of_string;
use crate::grammar::Grammar;
use crate::symbol::Symbol;

/// An LR(0) core: a rule index and a marker position within its RHS.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub(crate) struct Item {
    pub(crate) rule: usize,
    pub(crate) marker: usize,
}

pub(crate) type Lookaheads<T> = BTreeSet<Symbol<T>>;

/// Item set in canonical form: core → union of its lookaheads.
pub(crate) type ItemMap<T> = BTreeMap<Item, Lookaheads<T>>;

/// A state in the LR(1)/LALR(1) automaton.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct State<T> {
    pub(crate) items: ItemMap<T>,
    /// Transitions on terminals and nonterminals, by target state index.
    pub(crate) transitions: BTreeMap<Symbol<T>, usize>,
}

impl<T: Clone + Ord> State<T> {
    /// The LR(0) projection: the item cores with lookaheads ignored.
    fn projection(&self) -> Vec<Item> {
        self.items.keys().copied().collect()
    }
}

/// Extends an item set to its closure.
///
/// For every item `A → α·Bβ` with lookahead set L and every rule `B → γ`,
/// the derived item `B → ·γ` gets lookaheads FIRST(β) with ε replaced by L
/// (just L when β is empty). Repeats until no lookahead set grows.
pub(crate) fn closure<T, V>(grammar: &Grammar<T, V>, items: &mut ItemMap<T>)
where
    T: Clone + Eq + Hash + Ord + Debug,
{
    loop {
        let mut additions: Vec<(Item, Lookaheads<T>)> = Vec::new();

        for (item, lookaheads) in items.iter() {
            let rhs = &grammar.rule(item.rule).rhs;
            let Some(next) = rhs.get(item.marker) else {
                continue;
            };
            if !next.is_nonterminal() {
                continue;
            }

            let beta = &rhs[item.marker + 1..];
            let derived: Lookaheads<T> = if beta.is_empty() {
                lookaheads.clone()
            } else {
                let first_beta = first_of_string(grammar.first_sets(), beta);
                let mut derived: Lookaheads<T> = first_beta
                    .iter()
                    .filter(|s| !s.is_epsilon())
                    .cloned()
                    .collect();
                if first_beta.contains(&Symbol::Epsilon) {
                    derived.extend(lookaheads.iter().cloned());
                }
                derived
            };

            for &rule_index in grammar.rules_for(next) {
                additions.push((
                    Item {
                        rule: rule_index,
                        marker: 0,
                    },
                    derived.clone(),
                ));
            }
        }

        let mut changed = false;
        for (item, lookaheads) in additions {
            let entry = items.entry(item).or_default();
            for symbol in lookaheads {
                changed |= entry.insert(symbol);
            }
        }
        if !changed {
            break;
        }
    }
}

/// Computes GOTO(I, X): the closure of I's items with the marker advanced
/// over X.
pub(crate) fn goto_state<T, V>(
    grammar: &Grammar<T, V>,
    items: &ItemMap<T>,
    symbol: &Symbol<T>,
) -> ItemMap<T>
where
    T: Clone + Eq + Hash + Ord + Debug,
{
    let mut moved = ItemMap::new();

    for (item, lookaheads) in items {
        if grammar.rule(item.rule).rhs.get(item.marker) == Some(symbol) {
            moved
                .entry(Item {
                    rule: item.rule,
                    marker: item.marker + 1,
                })
                .or_default()
                .extend(lookaheads.iter().cloned());
        }
    }

    closure(grammar, &mut moved);
    moved
}

/// Builds the canonical LR(1) collection, breadth-first from the kernel
/// `{[S' → ·S, {$}]}`.
///
/// Successor states are deduplicated by item-set equality; the item map in
/// canonical form doubles as the content key, so the hash lookup is cheap
/// and equality is confirmed structurally.
pub(crate) fn build_collection<T, V>(grammar: &Grammar<T, V>) -> Vec<State<T>>
where
    T: Clone + Eq + Hash + Ord + Debug,
{
    let mut kernel = ItemMap::new();
    kernel.insert(
        Item { rule: 0, marker: 0 },
        BTreeSet::from([Symbol::EndMarker]),
    );
    closure(grammar, &mut kernel);

    let mut states = vec![State {
        items: kernel.clone(),
        transitions: BTreeMap::new(),
    }];
    let mut index: HashMap<ItemMap<T>, usize> = HashMap::from([(kernel, 0)]);

    let mut current = 0;
    while current < states.len() {
        // Symbols with the marker in front of them, in item order.
        let mut outgoing: Vec<Symbol<T>> = Vec::new();
        for item in states[current].items.keys() {
            let rhs = &grammar.rule(item.rule).rhs;
            if let Some(symbol) = rhs.get(item.marker) {
                if !outgoing.contains(symbol) {
                    outgoing.push(symbol.clone());
                }
            }
        }

        for symbol in outgoing {
            let successor = goto_state(grammar, &states[current].items, &symbol);
            let target = match index.get(&successor) {
                Some(&existing) => existing,
                None => {
                    let fresh = states.len();
                    index.insert(successor.clone(), fresh);
                    states.push(State {
                        items: successor,
                        transitions: BTreeMap::new(),
                    });
                    fresh
                }
            };
            states[current].transitions.insert(symbol, target);
        }

        current += 1;
    }

    log::debug!("canonical collection holds {} LR(1) states", states.len());
    states
}

/// Merges states sharing an LR(0) projection by unioning their lookaheads,
/// then rewrites every transition through the old→new index map.
///
/// Merged states keep first-occurrence order, so state numbering stays
/// reproducible. Afterwards no two states share a projection.
pub(crate) fn merge_cores<T>(states: Vec<State<T>>) -> Vec<State<T>>
where
    T: Clone + Eq + Hash + Ord + Debug,
{
    let mut merged: Vec<State<T>> = Vec::new();
    let mut by_projection: HashMap<Vec<Item>, usize> = HashMap::new();
    let mut remap: Vec<usize> = Vec::with_capacity(states.len());

    for state in states {
        let projection = state.projection();
        match by_projection.get(&projection) {
            Some(&target) => {
                remap.push(target);
                let kept = &mut merged[target];
                for (item, lookaheads) in state.items {
                    kept.items.entry(item).or_default().extend(lookaheads);
                }
            }
            None => {
                by_projection.insert(projection, merged.len());
                remap.push(merged.len());
                merged.push(state);
            }
        }
    }

    for state in &mut merged {
        for target in state.transitions.values_mut() {
            *target = remap[*target];
        }
    }

    log::debug!("merged to {} LALR(1) states", merged.len());
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::seq;
    use crate::symbol::term;
    use crate::syntax::Syntax;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
    enum Tag {
        Id,
        Equ,
        Deref,
    }

    /// The classic non-SLR grammar: S → L = R | R; L → *R | id; R → L.
    fn assignments() -> (Syntax<Tag, i64>, crate::symbol::NonTerm) {
        let mut syn: Syntax<Tag, i64> = Syntax::new();
        let s = syn.nonterm("S");
        let l = syn.nonterm("L");
        let r = syn.nonterm("R");
        syn.define(
            s,
            seq(l)
                .then(term(Tag::Equ))
                .then(r)
                .act2(|x, _| x)
                .alt(seq(r)),
        );
        syn.define(l, seq(term(Tag::Deref)).then(r).alt(seq(term(Tag::Id))));
        syn.define(r, seq(l));
        (syn, s)
    }

    #[test]
    fn closure_is_closed() {
        let (syn, s) = assignments();
        let grammar = syn.grammar(s).unwrap();
        let states = build_collection(&grammar);

        for state in &states {
            let mut again = state.items.clone();
            closure(&grammar, &mut again);
            assert_eq!(again, state.items);
        }
    }

    #[test]
    fn initial_closure_covers_all_reachable_rules() {
        let (syn, s) = assignments();
        let grammar = syn.grammar(s).unwrap();
        let states = build_collection(&grammar);

        // S' → ·S plus one item per rule of S, L, and R.
        assert_eq!(states[0].items.len(), 6);
    }

    #[test]
    fn merged_projections_are_unique() {
        let (syn, s) = assignments();
        let grammar = syn.grammar(s).unwrap();
        let merged = merge_cores(build_collection(&grammar));

        let mut seen = std::collections::HashSet::new();
        for state in &merged {
            assert!(seen.insert(state.projection()), "projection repeated");
        }
    }

    #[test]
    fn merging_rewrites_transition_targets() {
        let (syn, s) = assignments();
        let grammar = syn.grammar(s).unwrap();
        let merged = merge_cores(build_collection(&grammar));

        for state in &merged {
            for &target in state.transitions.values() {
                assert!(target < merged.len());
            }
        }
    }
}
