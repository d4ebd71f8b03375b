// Copyright 2016 Vincent Vigneron. See the COPYRIGHT
// file at the top-level directory of this distribution.
//
// Licensed under the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at.your option.
// This file may not be copied, modified, or distributed
// except according to those terms.

use std::sync::Arc;
use std::thread;

use dfa_walk::dfa::core::*;
use dfa_walk::dfa::trace::*;
use pretty_assertions::assert_eq;
use test_log::test;

// Identifiers and integer literals: letters then letters or digits, or
// digits only.
fn identifiers() -> Automaton {
    AutomatonBuilder::new()
        .add_symbols("abcxyz0123456789")
        .add_state("start")
        .add_state("ident")
        .add_state("number")
        .add_start("start")
        .add_final("ident")
        .add_final("number")
        .add_transition("start", "a", "ident")
        .add_transition("start", "b", "ident")
        .add_transition("start", "c", "ident")
        .add_transition("start", "x", "ident")
        .add_transition("start", "y", "ident")
        .add_transition("start", "z", "ident")
        .add_transition("start", "0", "number")
        .add_transition("start", "1", "number")
        .add_transition("start", "7", "number")
        .add_transition("ident", "a", "ident")
        .add_transition("ident", "x", "ident")
        .add_transition("ident", "1", "ident")
        .add_transition("number", "0", "number")
        .add_transition("number", "1", "number")
        .add_transition("number", "7", "number")
        .finalize()
        .unwrap()
}

#[test]
fn accepted_sequences_end_in_a_final_state() {
    let dfa = identifiers();
    for input in &["a", "xa1", "z", "107", "0", "ax1ax1"] {
        let mut trace = Trace::new();
        assert!(dfa.check_sequence_with(input, &mut trace), "{} should be accepted", input);
        match trace.last() {
            Some(&Event::Exhausted { state, accepting }) => {
                assert!(accepting);
                assert!(dfa.is_final(state));
            },
            other => panic!("unexpected last event {:?}", other),
        }
        let consumed: usize = trace
            .steps()
            .map(|e| match *e {
                Event::Step { value, .. } => value.len(),
                _ => 0,
            })
            .sum();
        assert_eq!(consumed, input.len());
    }
}

#[test]
fn rejected_sequences() {
    let dfa = identifiers();
    for input in &["1a", "ab", "", "+", "a+", "7x"] {
        assert!(!dfa.check_sequence(input), "{} should be rejected", input);
    }
}

#[test]
fn longest_prefix_is_a_prefix_built_from_transition_values() {
    let dfa = identifiers();
    let samples = vec![("xa1+b", "xa1"), ("17a", "17"), ("+", ""), ("", ""), ("aaaa", "aaaa")];
    for (input, expected) in samples {
        let mut values = String::new();
        let prefix = dfa.longest_prefix_with(input, &mut |e: Event| {
            if let Event::Step { value, .. } = e {
                values.push_str(value);
            }
        });
        assert_eq!(prefix, expected);
        assert!(input.starts_with(prefix));
        assert_eq!(values, prefix);
        assert_eq!(dfa.longest_prefix(input), expected);
    }
}

#[test]
fn empty_sequence() {
    let dfa = identifiers();
    assert!(!dfa.check_sequence(""));
    assert_eq!(dfa.longest_prefix(""), "");

    let dfa = Automaton::new("a".chars(), vec!["S0"], "S0", vec![], vec!["S0"]).unwrap();
    assert!(dfa.check_sequence(""));
    assert_eq!(dfa.longest_prefix(""), "");
}

#[test]
fn multi_character_values() {
    let dfa = Automaton::new("abcX".chars(),
                             vec!["S0", "S1"],
                             "S0",
                             vec![Transition::new("S0", "ab", "S1"),
                                  Transition::new("S1", "c", "S0")],
                             vec!["S0"]).unwrap();
    assert_eq!(dfa.longest_prefix("abcX"), "abc");

    let walk = dfa.walk("abcX");
    assert_eq!(walk.remaining(), "X");
    assert_eq!(walk.state(), "S0");

    // one character per step: "ab" is never taken
    assert!(!dfa.check_sequence("abc"));
    assert!(dfa.walk("abc").is_accepting());
}

#[test]
fn first_matching_transition_wins() {
    let dfa = Automaton::new("a".chars(),
                             vec!["S0", "S1", "S2"],
                             "S0",
                             vec![Transition::new("S0", "a", "S1"),
                                  Transition::new("S0", "a", "S2")],
                             vec!["S1"]).unwrap();
    for _ in 0..10 {
        let mut trace = Trace::new();
        assert!(dfa.check_sequence_with("a", &mut trace));
        assert_eq!(trace.steps().next(),
                   Some(&Event::Step { step: 1, source: "S0", value: "a", destination: "S1" }));
        assert_eq!(dfa.walk("a").state(), "S1");
    }
}

#[test]
fn shared_between_threads() {
    let dfa = Arc::new(identifiers());
    let handles = (0..4)
        .map(|_| {
            let dfa = Arc::clone(&dfa);
            thread::spawn(move || (dfa.check_sequence("xa1"), dfa.longest_prefix("107+").to_owned()))
        })
        .collect::<Vec<_>>();
    for handle in handles {
        assert_eq!(handle.join().unwrap(), (true, "107".to_owned()));
    }
}
