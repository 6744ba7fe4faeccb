//! FIRST and FOLLOW set computation over the augmented grammar.
//!
//! Both maps are least fixed points: passes over the rule list insert
//! symbols until a full pass inserts nothing new. The augmented rule takes
//! part like any other, so FIRST(S') = FIRST(S) and FOLLOW(S') = {$} fall
//! out without special cases.

use std::collections::{HashMap, HashSet};
use std::fmt::Debug;
use std::hash::Hash;

use crate::grammar::Grammar;
use crate::symbol::Symbol;

/// Type alias for FIRST sets mapping.
pub type FirstSets<T> = HashMap<Symbol<T>, HashSet<Symbol<T>>>;

/// Type alias for FOLLOW sets mapping.
pub type FollowSets<T> = HashMap<Symbol<T>, HashSet<Symbol<T>>>;

/// Computes the FIRST sets for all symbols in the grammar.
///
/// Terminals and the two markers seed their own singletons; each rule then
/// feeds [`first_of_string`] of its right-hand side into its left-hand side,
/// one symbol at a time, until no set grows. A nonterminal's FIRST set never
/// picks up the end marker, which appears on no right-hand side.
pub fn compute_first_sets<T, V>(grammar: &Grammar<T, V>) -> FirstSets<T>
where
    T: Clone + Eq + Hash + Ord + Debug,
{
    let mut first: FirstSets<T> = grammar
        .terminals()
        .iter()
        .map(|tag| {
            let terminal = Symbol::Terminal(tag.clone());
            (terminal.clone(), HashSet::from([terminal]))
        })
        .collect();
    first.insert(Symbol::Epsilon, HashSet::from([Symbol::Epsilon]));
    first.insert(Symbol::EndMarker, HashSet::from([Symbol::EndMarker]));
    for nonterminal in grammar.nonterminals() {
        first.entry(nonterminal.clone()).or_default();
    }

    let mut grew = true;
    while grew {
        grew = false;
        for rule in grammar.rules() {
            let contribution = first_of_string(&first, &rule.rhs);
            let lhs_first = first.entry(rule.lhs.clone()).or_default();
            for symbol in contribution {
                grew |= lhs_first.insert(symbol);
            }
        }
    }

    first
}

/// Computes the FIRST set of a string (sequence of symbols).
///
/// Prefix symbols contribute their FIRST sets, minus ε, for as long as they
/// are nullable; the walk stops at the first symbol that cannot derive the
/// empty string. Only a fully nullable string (the empty one included) keeps
/// ε in the result.
pub fn first_of_string<T>(
    first_sets: &FirstSets<T>,
    symbols: &[Symbol<T>],
) -> HashSet<Symbol<T>>
where
    T: Clone + Eq + Hash + Ord + Debug,
{
    let mut first = HashSet::new();

    for symbol in symbols {
        let Some(of_symbol) = first_sets.get(symbol) else {
            return first;
        };
        first.extend(of_symbol.iter().filter(|s| !s.is_epsilon()).cloned());
        if !of_symbol.contains(&Symbol::Epsilon) {
            return first;
        }
    }

    first.insert(Symbol::Epsilon);
    first
}

/// Computes the FOLLOW sets for all nonterminals in the grammar.
///
/// Starts from FOLLOW(S') = {$} and walks each right-hand side right to
/// left, carrying the set of terminals that can appear after the current
/// position: the left-hand side's FOLLOW set behind the last member, then
/// each member's FIRST set minus ε, accumulated across nullable members and
/// reset at non-nullable ones. Repeats until no set grows.
pub fn compute_follow_sets<T, V>(
    grammar: &Grammar<T, V>,
    first_sets: &FirstSets<T>,
) -> FollowSets<T>
where
    T: Clone + Eq + Hash + Ord + Debug,
{
    let mut follow: FollowSets<T> = grammar
        .nonterminals()
        .iter()
        .map(|nonterminal| (nonterminal.clone(), HashSet::new()))
        .collect();
    follow
        .get_mut(&Symbol::Start)
        .unwrap()
        .insert(Symbol::EndMarker);

    let mut grew = true;
    while grew {
        grew = false;
        for rule in grammar.rules() {
            let mut trailer = follow[&rule.lhs].clone();

            for symbol in rule.rhs.iter().rev() {
                if symbol.is_nonterminal() {
                    let of_symbol = follow.get_mut(symbol).unwrap();
                    for s in &trailer {
                        grew |= of_symbol.insert(s.clone());
                    }
                }

                // Everything a nullable member can start with may also
                // follow the member to its left.
                match first_sets.get(symbol) {
                    Some(first) if first.contains(&Symbol::Epsilon) => {
                        trailer.extend(first.iter().filter(|s| !s.is_epsilon()).cloned());
                    }
                    Some(first) => {
                        trailer = first.iter().filter(|s| !s.is_epsilon()).cloned().collect();
                    }
                    None => trailer.clear(),
                }
            }
        }
    }

    follow
}
