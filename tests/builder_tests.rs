//! Tests for the production-building surface and materialization checks.

#[allow(dead_code)]
mod common;

use common::{Tag, Value, scan};
use lalr_parser::{Error, Symbol, Syntax, seq, term};

#[test]
fn pass_through_keeps_the_inner_value() {
    let mut syn: Syntax<Tag, Value> = Syntax::new();
    let e = syn.nonterm("E");
    let f = syn.nonterm("F");
    // E → F and F → ( F ) | NUMBER, all without actions.
    syn.define(e, seq(f));
    syn.define(
        f,
        seq(term(Tag::Lp)).then(f).then(term(Tag::Rp)).alt(seq(term(Tag::Number))),
    );

    let result = syn.parse(e, &scan("((7))")).unwrap();
    assert_eq!(result, Some(Value::Num(7.0)));
}

#[test]
fn second_action_replaces_the_first() {
    let mut syn: Syntax<Tag, Value> = Syntax::new();
    let e = syn.nonterm("E");
    syn.define(
        e,
        seq(term(Tag::Number))
            .act1(|x| x)
            .act0(|| Value::Num(42.0)),
    );

    let result = syn.parse(e, &scan("7")).unwrap();
    assert_eq!(result, Some(Value::Num(42.0)));
}

#[test]
fn zero_arity_action_fires_with_no_arguments() {
    let mut syn: Syntax<Tag, Value> = Syntax::new();
    let e = syn.nonterm("E");
    syn.define(e, seq(term(Tag::Semicolon)).act0(|| Value::Num(1.0)));

    let result = syn.parse(e, &scan(";")).unwrap();
    assert_eq!(result, Some(Value::Num(1.0)));
}

#[test]
fn explicit_epsilon_symbols_are_normalized_away() {
    let mut syn: Syntax<Tag, Value> = Syntax::new();
    let l = syn.nonterm("L");
    syn.define(
        l,
        seq(Symbol::Epsilon)
            .act0(|| Value::Unit)
            .alt(seq(l).then(term(Tag::Number)).act2(|_, n| n)),
    );

    let grammar = syn.grammar(l).unwrap();
    // Rule 1 is L → ε with an empty right-hand side.
    assert!(grammar.rules()[1].rhs.is_empty());

    let result = syn.parse(l, &scan("5")).unwrap();
    assert_eq!(result, Some(Value::Num(5.0)));
}

#[test]
fn undefined_nonterminal_is_rejected() {
    let mut syn: Syntax<Tag, Value> = Syntax::new();
    let e = syn.nonterm("E");
    let t = syn.nonterm("T");
    syn.define(e, seq(t));

    match syn.grammar(e) {
        Err(Error::NoProductions(name)) => assert_eq!(name, "T"),
        other => panic!("expected NoProductions, got {:?}", other),
    }
}

#[test]
fn two_value_members_without_action_are_rejected() {
    let mut syn: Syntax<Tag, Value> = Syntax::new();
    let s = syn.nonterm("S");
    let a = syn.nonterm("A");
    syn.define(s, seq(a).then(a));
    syn.define(a, seq(term(Tag::Number)));

    assert!(matches!(syn.grammar(s), Err(Error::MissingReducer { .. })));
}

#[test]
fn oversized_reducer_arity_is_rejected() {
    let mut syn: Syntax<Tag, Value> = Syntax::new();
    let s = syn.nonterm("S");
    syn.define(
        s,
        seq(term(Tag::Number))
            .then(term(Tag::Plus))
            .act3(|x, _, _| x),
    );

    match syn.grammar(s) {
        Err(Error::ReducerArity { arity, members, .. }) => {
            assert_eq!(arity, 3);
            assert_eq!(members, 2);
        }
        other => panic!("expected ReducerArity, got {:?}", other),
    }
}

#[test]
fn reserved_symbols_are_rejected_in_productions() {
    let mut syn: Syntax<Tag, Value> = Syntax::new();
    let s = syn.nonterm("S");
    syn.define(s, seq(term(Tag::Number)).then(Symbol::EndMarker));

    assert!(matches!(syn.grammar(s), Err(Error::ReservedSymbol(_))));
}

#[test]
fn definitions_accumulate_across_define_calls() {
    let mut syn: Syntax<Tag, Value> = Syntax::new();
    let e = syn.nonterm("E");
    syn.define(e, seq(term(Tag::Number)));
    syn.define(
        e,
        seq(e).then(term(Tag::Plus)).then(e).act2(|x: Value, y: Value| Value::Num(x.num() + y.num())),
    );

    let grammar = syn.grammar(e).unwrap();
    // Augmented rule plus the two alternatives.
    assert_eq!(grammar.rules().len(), 3);
}
