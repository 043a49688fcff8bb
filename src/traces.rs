use crate::errors::*;
use crate::models::*;
use crate::scanner::*;
use crate::states::*;
use crate::transitions::*;

use std::io::BufRead;
use tracing::debug;
use tracing::trace;

/// A single replay step: a symbolic state and the transition read after it.
#[derive(Debug)]
pub struct Step {
    /// The symbolic state.
    pub state: SymbolicState,

    /// The transition.
    pub transition: Transition,
}

/// A complete replayed trace.
#[derive(Debug)]
pub struct Replay {
    /// The initial state (which is not paired with a transition).
    pub initial: SymbolicState,

    /// The steps, in trace order.
    pub steps: Vec<Step>,
}

impl Replay {
    /// The total number of states (the initial state and one per step).
    pub fn states_count(&self) -> usize {
        self.steps.len() + 1
    }
}

/// Replay an XTR trace against a model, one step at a time.
///
/// This yields each step as it is read, and stops after the terminating `.` line. Any error
/// terminates the iteration.
pub struct Replayer<'a, R: BufRead> {
    /// The model the trace was generated from.
    model: &'a Model,

    /// The trace cursor.
    scanner: Scanner<R>,

    /// Whether we have reached the end of the trace (or an error).
    is_done: bool,

    /// The number of steps read so far.
    steps_count: usize,
}

impl<'a, R: BufRead> Replayer<'a, R> {
    /// Start replaying a trace by reading its initial state.
    pub fn start(model: &'a Model, input: R) -> Result<(Self, SymbolicState), TracerError> {
        let mut scanner = Scanner::new(input);
        let initial = SymbolicState::read(model, &mut scanner)?;
        let replayer = Replayer {
            model,
            scanner,
            is_done: false,
            steps_count: 0,
        };
        Ok((replayer, initial))
    }

    fn next_step(&mut self) -> Result<Option<Step>, TracerError> {
        self.scanner.skip_white_space()?;

        match self.scanner.peek()? {
            Some('.') => {
                self.scanner.next_char()?;
                debug!(steps = self.steps_count, "replayed trace");
                return Ok(None);
            }
            None => {
                return Err(TracerError::TerminatorMissing {
                    line_number: self.scanner.line_number(),
                    found: String::new(),
                });
            }
            Some(_) => {}
        }

        let state = SymbolicState::read(self.model, &mut self.scanner)?;
        let transition = Transition::read(self.model, &mut self.scanner)?;
        self.steps_count += 1;
        trace!(
            step = self.steps_count,
            edges = transition.edges.len(),
            "replayed step"
        );
        Ok(Some(Step { state, transition }))
    }
}

impl<'a, R: BufRead> Iterator for Replayer<'a, R> {
    type Item = Result<Step, TracerError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.is_done {
            return None;
        }

        let result = self.next_step();
        match result {
            Ok(Some(step)) => Some(Ok(step)),
            Ok(None) => {
                self.is_done = true;
                None
            }
            Err(error) => {
                self.is_done = true;
                Some(Err(error))
            }
        }
    }
}

/// Replay a complete trace against a model.
pub fn replay<R: BufRead>(model: &Model, input: R) -> Result<Replay, TracerError> {
    let (replayer, initial) = Replayer::start(model, input)?;
    let steps = replayer.collect::<Result<Vec<Step>, TracerError>>()?;
    Ok(Replay { initial, steps })
}
