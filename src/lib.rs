// Copyright 2016 Vincent Vigneron. See the COPYRIGHT
// file at the top-level directory of this distribution.
//
// Licensed under the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at.your option.
// This file may not be copied, modified, or distributed
// except according to those terms.

#![deny(missing_docs)]

//! Deterministic finite automata over named states, with two walks:
//! acceptance of a whole sequence, one character at a time, and the longest
//! prefix that chained transitions can match.

/// dfa api
pub mod dfa;
