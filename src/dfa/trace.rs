// Copyright 2016 Vincent Vigneron. See the COPYRIGHT
// file at the top-level directory of this distribution.
//
// Licensed under the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at.your option.
// This file may not be copied, modified, or distributed
// except according to those terms.

use std::fmt;

use log::{debug, trace};

/// An `Event` is emitted by a traversal of an `Automaton` each time it
/// starts, takes a transition or stops.
///
/// Events borrow the state names from the automaton and the remaining input
/// from the walked sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event<'a> {
    /// The walk starts in the initial state.
    Start {
        /// The initial state.
        state: &'a str,
    },
    /// A transition has been taken. Steps are numbered from 1.
    Step {
        /// Number of the step.
        step: usize,
        /// State the transition leaves.
        source: &'a str,
        /// Input consumed by the transition.
        value: &'a str,
        /// State the transition enters.
        destination: &'a str,
    },
    /// No transition of `state` matches the start of `remaining`.
    Stalled {
        /// Number of steps taken before the stall.
        step: usize,
        /// State the walk is stuck in.
        state: &'a str,
        /// Unconsumed input, never empty.
        remaining: &'a str,
    },
    /// The whole input has been consumed.
    Exhausted {
        /// State reached at the end of the input.
        state: &'a str,
        /// Whether `state` is a final state.
        accepting: bool,
    },
}

impl<'a> fmt::Display for Event<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Event::Start { state } => write!(f, "start in {}", state),
            Event::Step { step, source, value, destination } =>
                write!(f, "step {}: {} -> {} on {:?}", step, source, destination, value),
            Event::Stalled { step, state, remaining } =>
                write!(f, "stalled after {} steps in {}, remaining {:?}", step, state, remaining),
            Event::Exhausted { state, accepting: true } => write!(f, "input consumed in final state {}", state),
            Event::Exhausted { state, accepting: false } => write!(f, "input consumed in non-final state {}", state),
        }
    }
}

/// An `Observer` receives the events of a traversal in the order they occur.
///
/// Observers only watch: whatever they do, the result of the traversal is the
/// same. Any `FnMut(Event)` closure is an observer.
pub trait Observer<'a> {
    /// Called once per event.
    fn observe(&mut self, event: Event<'a>);
}

impl<'a, F> Observer<'a> for F
    where F: FnMut(Event<'a>)
{
    fn observe(&mut self, event: Event<'a>) {
        self(event)
    }
}

/// Observer that narrates the traversal through the `log` facade.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogObserver;

impl<'a> Observer<'a> for LogObserver {
    fn observe(&mut self, event: Event<'a>) {
        match event {
            Event::Start { .. } => trace!("{}", event),
            _ => debug!("{}", event),
        }
    }
}

/// Observer that records every event.
///
/// # Examples
///
/// ```
/// use dfa_walk::dfa::core::*;
/// use dfa_walk::dfa::trace::*;
///
/// let dfa = AutomatonBuilder::new()
///     .add_symbols("ab")
///     .add_state("S0")
///     .add_state("S1")
///     .add_start("S0")
///     .add_final("S1")
///     .add_transition("S0", "a", "S1")
///     .finalize()
///     .unwrap();
/// let mut trace = Trace::new();
/// assert!(dfa.check_sequence_with("a", &mut trace));
/// assert_eq!(trace.steps().count(), 1);
/// ```
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Trace<'a> {
    events: Vec<Event<'a>>,
}

impl<'a> Trace<'a> {
    /// Creates an empty trace.
    pub fn new() -> Trace<'a> {
        Trace { events: Vec::new() }
    }

    /// All recorded events, oldest first.
    pub fn events(&self) -> &[Event<'a>] {
        &self.events
    }

    /// Only the `Event::Step` events.
    pub fn steps<'t>(&'t self) -> impl Iterator<Item = &'t Event<'a>> + 't {
        self.events.iter().filter(|e| matches!(e, Event::Step { .. }))
    }

    /// The last recorded event, if any.
    pub fn last(&self) -> Option<&Event<'a>> {
        self.events.last()
    }
}

impl<'a> Observer<'a> for Trace<'a> {
    fn observe(&mut self, event: Event<'a>) {
        self.events.push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_trace_records_in_order() {
        let mut trace = Trace::new();
        trace.observe(Event::Start { state: "S0" });
        trace.observe(Event::Step { step: 1, source: "S0", value: "a", destination: "S1" });
        trace.observe(Event::Exhausted { state: "S1", accepting: true });
        assert_eq!(trace.events().len(), 3);
        assert_eq!(trace.steps().count(), 1);
        assert_eq!(trace.last(), Some(&Event::Exhausted { state: "S1", accepting: true }));
    }

    #[test]
    fn test_closure_observer() {
        let mut seen = 0;
        {
            let mut count = |_: Event| seen += 1;
            count.observe(Event::Start { state: "S0" });
            count.observe(Event::Stalled { step: 0, state: "S0", remaining: "x" });
        }
        assert_eq!(seen, 2);
    }

    #[test]
    fn test_event_display() {
        let step = Event::Step { step: 2, source: "S0", value: "ab", destination: "S1" };
        assert_eq!(step.to_string(), "step 2: S0 -> S1 on \"ab\"");
        let stalled = Event::Stalled { step: 1, state: "S1", remaining: "X" };
        assert_eq!(stalled.to_string(), "stalled after 1 steps in S1, remaining \"X\"");
        let done = Event::Exhausted { state: "S1", accepting: false };
        assert_eq!(done.to_string(), "input consumed in non-final state S1");
    }
}
