// Copyright 2016 Vincent Vigneron. See the COPYRIGHT
// file at the top-level directory of this distribution.
//
// Licensed under the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at.your option.
// This file may not be copied, modified, or distributed
// except according to those terms.

use std::collections::HashSet;
use std::fmt;                          // Formatter, Display, Debug, write!
use std::result;

use itertools::Itertools;              // sorted, join
use log::debug;
use thiserror::Error;

use super::trace::{Event, LogObserver, Observer};

/// The `AutomatonError` type. Errors can only occur while an `Automaton` is
/// built, never while it is walked.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AutomatonError {
    /// No starting state is specified.
    #[error("Missing starting state.")]
    MissingStartingState,
    /// A second starting state `String` is specified after the first one.
    #[error("Duplicated starting state ({0},{1}).")]
    DuplicatedStartingState(String, String),
    /// The state is not one of the states of the automaton.
    #[error("Unknown state {0}.")]
    UnknownState(String),
    /// Transition number `usize` contains a symbol outside the alphabet.
    #[error("Unknown symbol '{0}' in transition {1}.")]
    UnknownSymbol(char, usize),
    /// Transition number `usize` matches the empty string.
    #[error("Empty value in transition {0}.")]
    EmptyTransitionValue(usize),
}

/// Alias for result::Result<T,AutomatonError>.
pub type Result<T> = result::Result<T, AutomatonError>;

/// A `Transition` moves the automaton from `source` to `destination` when the
/// input starts with `value`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Transition {
    source      : String,
    value       : String,
    destination : String,
}

impl Transition {
    /// Creates a new transition.
    pub fn new<S, V, D>(source: S, value: V, destination: D) -> Transition
        where S: Into<String>, V: Into<String>, D: Into<String>
    {
        Transition { source: source.into(), value: value.into(), destination: destination.into() }
    }

    /// The state the transition leaves.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// The input consumed by the transition.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// The state the transition enters.
    pub fn destination(&self) -> &str {
        &self.destination
    }

    fn matches(&self, remaining: &str, matching: Matching) -> bool {
        match matching {
            Matching::Symbol => remaining
                .chars()
                .next()
                .map_or(false, |c| self.value == remaining[..c.len_utf8()]),
            Matching::Value => remaining.starts_with(self.value.as_str()),
        }
    }
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({}, {:?}) => {}", self.source, self.value, self.destination)
    }
}

// How much input a transition is compared against at each step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Matching {
    // Exactly the next character.
    Symbol,
    // As many characters as the transition value holds.
    Value,
}

/// The type `Automaton` represents a Deterministic Finite Automaton over named
/// states.
///
/// Transitions are kept in a list, in insertion order, and are always scanned
/// in that order: when several transitions of a state match the input, the
/// first one wins. An `Automaton` is never modified once built, so it can be
/// shared between threads and walked concurrently.
#[derive(Debug, Clone)]
pub struct Automaton {
    alphabet    : HashSet<char>,
    states      : HashSet<String>,
    start       : String,
    transitions : Vec<Transition>,
    finals      : HashSet<String>,
}

/// The result of a longest-prefix walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Walk<'a> {
    sequence  : &'a str,
    consumed  : usize,
    state     : &'a str,
    steps     : usize,
    accepting : bool,
}

impl<'a> Walk<'a> {
    /// The matched prefix of the input.
    pub fn prefix(&self) -> &'a str {
        &self.sequence[..self.consumed]
    }

    /// The part of the input no transition could match.
    pub fn remaining(&self) -> &'a str {
        &self.sequence[self.consumed..]
    }

    /// Length in bytes of the matched prefix.
    pub fn consumed(&self) -> usize {
        self.consumed
    }

    /// The state the walk stopped in.
    pub fn state(&self) -> &'a str {
        self.state
    }

    /// Number of transitions taken.
    pub fn steps(&self) -> usize {
        self.steps
    }

    /// True if the whole input has been matched.
    pub fn is_complete(&self) -> bool {
        self.consumed == self.sequence.len()
    }

    /// True if the whole input has been matched and the walk stopped in a
    /// final state.
    pub fn is_accepting(&self) -> bool {
        self.accepting
    }
}

impl Automaton {
    /// Creates an automaton from its five components.
    ///
    /// # Errors
    ///
    /// Return an `AutomatonError::UnknownState` if the initial state, a final
    /// state, or a state of a transition is not in `states`.
    ///
    /// Return an `AutomatonError::EmptyTransitionValue` or an
    /// `AutomatonError::UnknownSymbol` if a transition value is empty or uses
    /// a symbol outside `alphabet`.
    ///
    /// # Examples
    ///
    /// ```
    /// use dfa_walk::dfa::core::*;
    ///
    /// let dfa = Automaton::new(
    ///     "ab".chars(),
    ///     vec!["S0", "S1"],
    ///     "S0",
    ///     vec![Transition::new("S0", "a", "S1")],
    ///     vec!["S1"]).unwrap();
    /// assert!(dfa.check_sequence("a"));
    /// assert!(!dfa.check_sequence("b"));
    /// assert!(!dfa.check_sequence("aa"));
    /// ```
    pub fn new<A, S, F>(alphabet: A,
                        states: S,
                        initial_state: &str,
                        transitions: Vec<Transition>,
                        final_states: F) -> Result<Automaton>
        where A: IntoIterator<Item = char>,
              S: IntoIterator,
              S::Item: Into<String>,
              F: IntoIterator,
              F::Item: Into<String>
    {
        let dfa = Automaton {
            alphabet: alphabet.into_iter().collect(),
            states: states.into_iter().map(Into::into).collect(),
            start: initial_state.to_owned(),
            transitions,
            finals: final_states.into_iter().map(Into::into).collect(),
        };
        dfa.validate()?;
        Ok(dfa)
    }

    fn check_state(&self, state: &str) -> Result<()> {
        if self.states.contains(state) {
            Ok(())
        } else {
            Err(AutomatonError::UnknownState(state.to_owned()))
        }
    }

    fn validate(&self) -> Result<()> {
        self.check_state(&self.start)?;
        for state in self.finals.iter().sorted() {
            self.check_state(state)?;
        }
        for (index, tr) in self.transitions.iter().enumerate() {
            if tr.value.is_empty() {
                return Err(AutomatonError::EmptyTransitionValue(index));
            }
            self.check_state(&tr.source)?;
            self.check_state(&tr.destination)?;
            if let Some(symb) = tr.value.chars().find(|c| !self.alphabet.contains(c)) {
                return Err(AutomatonError::UnknownSymbol(symb, index));
            }
        }
        Ok(())
    }

    /// The symbols transitions are written with.
    pub fn alphabet(&self) -> &HashSet<char> {
        &self.alphabet
    }

    /// All the states.
    pub fn states(&self) -> &HashSet<String> {
        &self.states
    }

    /// The state every walk starts in.
    pub fn initial_state(&self) -> &str {
        &self.start
    }

    /// The transitions, in the order they are tried.
    pub fn transitions(&self) -> &[Transition] {
        &self.transitions
    }

    /// The accepting states.
    pub fn final_states(&self) -> &HashSet<String> {
        &self.finals
    }

    /// Test if `state` is an accepting state.
    pub fn is_final(&self, state: &str) -> bool {
        self.finals.contains(state)
    }

    fn traverse<'a, O>(&'a self, sequence: &'a str, matching: Matching, observer: &mut O) -> Walk<'a>
        where O: Observer<'a>
    {
        let mut state = self.start.as_str();
        let mut consumed = 0;
        let mut steps = 0;
        observer.observe(Event::Start { state });
        while consumed < sequence.len() {
            let remaining = &sequence[consumed..];
            let found = self.transitions
                .iter()
                .find(|tr| tr.source == state && tr.matches(remaining, matching));
            match found {
                Some(tr) => {
                    steps += 1;
                    consumed += tr.value.len();
                    observer.observe(Event::Step {
                        step: steps,
                        source: &tr.source,
                        value: &tr.value,
                        destination: &tr.destination,
                    });
                    state = tr.destination.as_str();
                },
                None => {
                    observer.observe(Event::Stalled { step: steps, state, remaining });
                    return Walk { sequence, consumed, state, steps, accepting: false };
                },
            }
        }
        let accepting = self.is_final(state);
        observer.observe(Event::Exhausted { state, accepting });
        Walk { sequence, consumed, state, steps, accepting }
    }

    /// Test if the automaton accepts `sequence`, reading one character per
    /// transition.
    ///
    /// Only transitions whose value is a single character can be taken: a
    /// transition with a longer value never matches here (see
    /// `longest_prefix` for the multi-character walk). The sequence is
    /// rejected as soon as no transition matches, and accepted if it is
    /// consumed entirely in a final state. Each step is logged at debug level.
    ///
    /// # Examples
    ///
    /// ```
    /// use dfa_walk::dfa::core::*;
    ///
    /// // (abc)*
    /// let dfa = AutomatonBuilder::new()
    ///     .add_symbols("abc")
    ///     .add_state("0")
    ///     .add_state("1")
    ///     .add_state("2")
    ///     .add_start("0")
    ///     .add_final("0")
    ///     .add_transition("0", "a", "1")
    ///     .add_transition("1", "b", "2")
    ///     .add_transition("2", "c", "0")
    ///     .finalize()
    ///     .unwrap();
    /// assert!(dfa.check_sequence("abc"));
    /// assert!(dfa.check_sequence(""));
    /// assert!(!dfa.check_sequence("ab"));
    /// assert!(!dfa.check_sequence("abca"));
    /// assert!(dfa.check_sequence("abcabcabc"));
    /// ```
    pub fn check_sequence(&self, sequence: &str) -> bool {
        self.check_sequence_with(sequence, &mut LogObserver)
    }

    /// Same as `check_sequence`, reporting each event to `observer`.
    pub fn check_sequence_with<'a, O>(&'a self, sequence: &'a str, observer: &mut O) -> bool
        where O: Observer<'a>
    {
        self.traverse(sequence, Matching::Symbol, observer).is_accepting()
    }

    /// Walks `sequence` as far as the transitions allow and returns the
    /// matched prefix.
    ///
    /// A transition matches when the remaining input starts with its whole
    /// value. The walk stops at the first position where no transition of
    /// the current state matches; the state it stops in does not need to be
    /// final.
    ///
    /// # Examples
    ///
    /// ```
    /// use dfa_walk::dfa::core::*;
    ///
    /// let dfa = AutomatonBuilder::new()
    ///     .add_symbols("abc")
    ///     .add_state("S0")
    ///     .add_state("S1")
    ///     .add_start("S0")
    ///     .add_transition("S0", "ab", "S1")
    ///     .add_transition("S1", "c", "S0")
    ///     .finalize()
    ///     .unwrap();
    /// assert_eq!(dfa.longest_prefix("abcX"), "abc");
    /// assert_eq!(dfa.longest_prefix("X"), "");
    /// ```
    pub fn longest_prefix<'s>(&self, sequence: &'s str) -> &'s str {
        let consumed = self.walk(sequence).consumed();
        &sequence[..consumed]
    }

    /// Same as `longest_prefix`, reporting each event to `observer`.
    pub fn longest_prefix_with<'a, O>(&'a self, sequence: &'a str, observer: &mut O) -> &'a str
        where O: Observer<'a>
    {
        self.traverse(sequence, Matching::Value, observer).prefix()
    }

    /// Performs the longest-prefix walk of `sequence` and returns where it
    /// stopped.
    pub fn walk<'a>(&'a self, sequence: &'a str) -> Walk<'a> {
        self.walk_with(sequence, &mut LogObserver)
    }

    /// Same as `walk`, reporting each event to `observer`.
    pub fn walk_with<'a, O>(&'a self, sequence: &'a str, observer: &mut O) -> Walk<'a>
        where O: Observer<'a>
    {
        let walk = self.traverse(sequence, Matching::Value, observer);
        debug!("longest prefix {:?} of {:?} ends in {}", walk.prefix(), sequence, walk.state());
        walk
    }
}

impl fmt::Display for Automaton {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "ALPHABET: {}", self.alphabet.iter().sorted().join(" "))?;
        writeln!(f, "STATES: {}", self.states.iter().sorted().join(" "))?;
        writeln!(f, "START: {}", self.start)?;
        writeln!(f, "FINALS:")?;
        for fi in self.finals.iter().sorted() {
            writeln!(f, "  {}", fi)?;
        }
        writeln!(f, "TRANSITIONS:")?;
        for tr in self.transitions.iter() {
            writeln!(f, "  {}", tr)?;
        }
        Ok(())
    }
}

/// The `AutomatonBuilder` follows the builder pattern and allows to create an
/// `Automaton`. The builder is moved at each call so it is necessary to bind
/// to a new variable the return value for each function of the builder.
///
/// States and symbols must be added before `finalize` is called, in any
/// order relative to the transitions that use them.
///
/// # Errors
///
/// Return an error if the starting state is not specified, or specified twice.
///
/// Return an error if a state or a symbol is used without having been added.
///
/// # Examples
///
/// ```
/// use dfa_walk::dfa::core::*;
///
/// let dfa = AutomatonBuilder::new()
///     .add_symbols("t")
///     .add_state("q0")
///     .add_final("q0")
///     .add_transition("q0", "t", "q0")
///     .finalize();
/// match dfa {
///     Err(AutomatonError::MissingStartingState) => assert!(true),
///     _ => assert!(false),
/// }
/// ```
///
/// ```
/// use dfa_walk::dfa::core::*;
///
/// let dfa = AutomatonBuilder::new()
///     .add_symbols("t")
///     .add_state("q0")
///     .add_start("q0")
///     .add_transition("q0", "t", "q1")
///     .finalize();
/// match dfa {
///     Err(AutomatonError::UnknownState(state)) => assert_eq!(state, "q1"),
///     _ => assert!(false),
/// }
/// ```
#[derive(Debug, Default)]
pub struct AutomatonBuilder {
    alphabet    : HashSet<char>,
    states      : HashSet<String>,
    start       : Option<String>,
    transitions : Vec<Transition>,
    finals      : HashSet<String>,
}

/// AutomatonBuilding is the trait assiociated to the AutomatonBuilder type.
///
/// #Errors
///
/// If self contains an AutomatonError then each function should transfer
/// this error.
pub trait AutomatonBuilding {
    /// Add a symbol to the alphabet.
    fn add_symbol(self, symb: char) -> Result<AutomatonBuilder>;

    /// Add every character of `symbs` to the alphabet.
    fn add_symbols(self, symbs: &str) -> Result<AutomatonBuilder>;

    /// Add a state.
    fn add_state(self, state: &str) -> Result<AutomatonBuilder>;

    /// Set the starting state.
    ///
    /// # Errors
    ///
    /// Return an AutomatonError::DuplicatedStartingState if a different
    /// starting state was already set.
    fn add_start(self, state: &str) -> Result<AutomatonBuilder>;

    /// Add a final state.
    fn add_final(self, state: &str) -> Result<AutomatonBuilder>;

    /// Append a transition. Transitions are tried in the order they are
    /// added.
    ///
    /// # Errors
    ///
    /// Return an AutomatonError::EmptyTransitionValue if `value` is empty.
    fn add_transition(self, src: &str, value: &str, dest: &str) -> Result<AutomatonBuilder>;

    /// Finalize the building of the Automaton.
    ///
    /// # Errors
    ///
    /// Return an AutomatonError::MissingStartingState if no starting state is
    /// specified, and the errors of `Automaton::new` otherwise.
    fn finalize(self) -> Result<Automaton>;
}

impl AutomatonBuilder {
    /// Creates a new AutomatonBuilder.
    pub fn new() -> Result<AutomatonBuilder> {
        Ok(AutomatonBuilder::default())
    }
}

impl AutomatonBuilding for AutomatonBuilder {
    fn add_symbol(self, symb: char) -> Result<AutomatonBuilder> {
        Ok(self).add_symbol(symb)
    }

    fn add_symbols(self, symbs: &str) -> Result<AutomatonBuilder> {
        Ok(self).add_symbols(symbs)
    }

    fn add_state(self, state: &str) -> Result<AutomatonBuilder> {
        Ok(self).add_state(state)
    }

    fn add_start(self, state: &str) -> Result<AutomatonBuilder> {
        Ok(self).add_start(state)
    }

    fn add_final(self, state: &str) -> Result<AutomatonBuilder> {
        Ok(self).add_final(state)
    }

    fn add_transition(self, src: &str, value: &str, dest: &str) -> Result<AutomatonBuilder> {
        Ok(self).add_transition(src, value, dest)
    }

    fn finalize(self) -> Result<Automaton> {
        Ok(self).finalize()
    }
}

/// Implementing AutomatonBuilding trait for Result<AutomatonBuilder> allows
/// to chain the return value of the AutomatonBuilder instead of unwrapping
/// them at each stage of the building process.
impl AutomatonBuilding for Result<AutomatonBuilder> {
    fn add_symbol(self, symb: char) -> Result<AutomatonBuilder> {
        self.map(|mut dfa| {
            dfa.alphabet.insert(symb);
            dfa
        })
    }

    fn add_symbols(self, symbs: &str) -> Result<AutomatonBuilder> {
        self.map(|mut dfa| {
            dfa.alphabet.extend(symbs.chars());
            dfa
        })
    }

    fn add_state(self, state: &str) -> Result<AutomatonBuilder> {
        self.map(|mut dfa| {
            dfa.states.insert(state.to_owned());
            dfa
        })
    }

    fn add_start(self, state: &str) -> Result<AutomatonBuilder> {
        self.and_then(|mut dfa| {
            if let Some(ref start) = dfa.start {
                if start.as_str() != state {
                    return Err(AutomatonError::DuplicatedStartingState(start.clone(), state.to_owned()));
                }
            }
            dfa.start = Some(state.to_owned());
            Ok(dfa)
        })
    }

    fn add_final(self, state: &str) -> Result<AutomatonBuilder> {
        self.map(|mut dfa| {
            dfa.finals.insert(state.to_owned());
            dfa
        })
    }

    fn add_transition(self, src: &str, value: &str, dest: &str) -> Result<AutomatonBuilder> {
        self.and_then(|mut dfa| {
            if value.is_empty() {
                return Err(AutomatonError::EmptyTransitionValue(dfa.transitions.len()));
            }
            dfa.transitions.push(Transition::new(src, value, dest));
            Ok(dfa)
        })
    }

    fn finalize(self) -> Result<Automaton> {
        self.and_then(|dfa| {
            let start = dfa.start.ok_or(AutomatonError::MissingStartingState)?;
            Automaton::new(dfa.alphabet, dfa.states, &start, dfa.transitions, dfa.finals)
        })
    }
}
