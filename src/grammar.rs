//! The canonical rule list and grammar representation.
//!
//! A [`Grammar`] is materialized from a [`Syntax`](crate::syntax::Syntax)
//! arena for one start nonterminal. Its rule list always begins with the
//! augmented rule `S' → S` at index 0, and its FIRST and FOLLOW maps are the
//! least fixed points computed at construction.

use std::collections::{HashMap, HashSet};
use std::fmt::Debug;
use std::hash::Hash;

use crate::builder::Reducer;
use crate::first_follow::{FirstSets, FollowSets, compute_first_sets, compute_follow_sets};
use crate::symbol::{NonTerm, Symbol};

/// A grammar rule: LHS → RHS, with an optional reducer.
///
/// Rule identity is structural (LHS plus RHS); the reducer never takes part
/// in comparisons.
#[derive(Debug)]
pub struct Rule<T, V> {
    /// Left-hand side: a nonterminal, or [`Symbol::Start`] for rule 0.
    pub lhs: Symbol<T>,
    /// Right-hand side. Empty for epsilon rules.
    pub rhs: Vec<Symbol<T>>,
    pub(crate) reducer: Option<Reducer<V>>,
}

impl<T: Clone, V> Clone for Rule<T, V> {
    fn clone(&self) -> Self {
        Self {
            lhs: self.lhs.clone(),
            rhs: self.rhs.clone(),
            reducer: self.reducer.clone(),
        }
    }
}

impl<T: PartialEq, V> PartialEq for Rule<T, V> {
    fn eq(&self, other: &Self) -> bool {
        self.lhs == other.lhs && self.rhs == other.rhs
    }
}

impl<T: Eq, V> Eq for Rule<T, V> {}

/// A grammar over terminal tags `T` and semantic values `V`.
///
/// Holds the rule list (augmented rule first), the terminal and nonterminal
/// sets, display names for nonterminals, and the FIRST/FOLLOW maps.
#[derive(Debug)]
pub struct Grammar<T, V> {
    rules: Vec<Rule<T, V>>,
    terminals: HashSet<T>,
    nonterminals: HashSet<Symbol<T>>,
    start: NonTerm,
    names: HashMap<NonTerm, String>,
    first_sets: FirstSets<T>,
    follow_sets: FollowSets<T>,
    /// Map from LHS symbol to the indices of its rules, in definition order.
    rules_by_lhs: HashMap<Symbol<T>, Vec<usize>>,
}

impl<T, V> Grammar<T, V>
where
    T: Clone + Eq + Hash + Ord + Debug,
{
    pub(crate) fn new(
        rules: Vec<Rule<T, V>>,
        terminals: HashSet<T>,
        names: HashMap<NonTerm, String>,
        start: NonTerm,
    ) -> Self {
        let nonterminals: HashSet<Symbol<T>> = rules.iter().map(|r| r.lhs.clone()).collect();

        let mut rules_by_lhs: HashMap<Symbol<T>, Vec<usize>> = HashMap::new();
        for (i, rule) in rules.iter().enumerate() {
            rules_by_lhs.entry(rule.lhs.clone()).or_default().push(i);
        }

        let mut grammar = Self {
            rules,
            terminals,
            nonterminals,
            start,
            names,
            first_sets: HashMap::new(),
            follow_sets: HashMap::new(),
            rules_by_lhs,
        };
        let first_sets = compute_first_sets(&grammar);
        let follow_sets = compute_follow_sets(&grammar, &first_sets);
        grammar.first_sets = first_sets;
        grammar.follow_sets = follow_sets;
        grammar
    }

    /// Returns all rules; the augmented rule `S' → S` is at index 0.
    pub fn rules(&self) -> &[Rule<T, V>] {
        &self.rules
    }

    /// Returns the rule at `index`.
    pub fn rule(&self, index: usize) -> &Rule<T, V> {
        &self.rules[index]
    }

    /// Returns the indices of all rules for a given LHS, in definition order.
    pub fn rules_for(&self, lhs: &Symbol<T>) -> &[usize] {
        self.rules_by_lhs
            .get(lhs)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// Returns the set of terminals appearing in the grammar.
    pub fn terminals(&self) -> &HashSet<T> {
        &self.terminals
    }

    /// Returns the set of nonterminals, including the augmented start.
    pub fn nonterminals(&self) -> &HashSet<Symbol<T>> {
        &self.nonterminals
    }

    /// Returns the user-designated start nonterminal.
    pub fn start(&self) -> NonTerm {
        self.start
    }

    /// Returns the FIRST map computed at construction.
    pub fn first_sets(&self) -> &FirstSets<T> {
        &self.first_sets
    }

    /// Returns the FOLLOW map computed at construction.
    pub fn follow_sets(&self) -> &FollowSets<T> {
        &self.follow_sets
    }

    /// Returns the display name of a nonterminal handle.
    pub fn name_of(&self, nt: NonTerm) -> &str {
        self.names.get(&nt).map(|s| s.as_str()).unwrap_or("?")
    }

    /// Renders one symbol for diagnostics, using nonterminal names.
    pub(crate) fn symbol_string(&self, sym: &Symbol<T>) -> String {
        match sym {
            Symbol::Nonterminal(nt) => self.name_of(*nt).to_string(),
            other => other.to_string(),
        }
    }

    /// Renders the rule at `index` for diagnostics, e.g. `E → E Plus T`.
    pub fn rule_string(&self, index: usize) -> String {
        let rule = &self.rules[index];
        let rhs = if rule.rhs.is_empty() {
            "ε".to_string()
        } else {
            rule.rhs
                .iter()
                .map(|s| self.symbol_string(s))
                .collect::<Vec<_>>()
                .join(" ")
        };
        format!("{} → {}", self.symbol_string(&rule.lhs), rhs)
    }
}
