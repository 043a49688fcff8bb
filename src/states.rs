use crate::errors::*;
use crate::models::*;
use crate::scanner::*;

use std::convert::TryFrom;
use std::fmt::Display;
use std::fmt::Formatter;
use std::fmt::Result as FormatterResult;
use std::io::BufRead;

/// A bound of a clock difference constraint.
///
/// A bound `(value, strict)` at `(i, j)` means `clock_i - clock_j < value` if strict, or
/// `clock_i - clock_j <= value` otherwise.
#[derive(PartialEq, Eq, Hash, Copy, Clone, Debug)]
pub struct Bound {
    /// The value of the bound.
    pub value: i32,

    /// Whether the bound is strict.
    pub is_strict: bool,
}

impl Bound {
    /// The bound `(infinity, <)`, meaning no constraint at all.
    pub const INFINITY: Bound = Bound {
        value: i32::MAX >> 1,
        is_strict: true,
    };

    /// The bound `(0, <=)`.
    pub const ZERO: Bound = Bound {
        value: 0,
        is_strict: false,
    };

    /// Decode a bound from the packed trace representation (the value shifted left by one, with
    /// the strictness in the lowest bit).
    pub fn from_packed(raw: i32) -> Self {
        Bound {
            value: raw >> 1,
            is_strict: raw & 1 == 1,
        }
    }

    /// Whether this is the unconstrained bound.
    pub fn is_infinity(&self) -> bool {
        self.value == Bound::INFINITY.value
    }
}

impl Display for Bound {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> FormatterResult {
        let relation = if self.is_strict { "<" } else { "<=" };
        write!(formatter, "{}{}", relation, self.value)
    }
}

/// A symbolic state.
///
/// This consists of a location vector (process-local location indices, one per process), a
/// variable vector (by variable number) and a difference bound matrix describing the possible
/// values of the clocks.
#[derive(PartialEq, Eq, Debug)]
pub struct SymbolicState {
    /// The process-local location index of each process.
    locations: Vec<usize>,

    /// The value of each integer variable.
    integers: Vec<i32>,

    /// The number of clocks (the matrix is square).
    clocks_count: usize,

    /// The clock constraints, row-major.
    constraints: Vec<Bound>,
}

impl SymbolicState {
    /// Create an unconstrained state sized for the model.
    ///
    /// All locations and variables are zero, and all the clock constraints are infinite except
    /// for the diagonal and the first row (lower bounds), which are `(0, <=)`.
    pub fn new(model: &Model) -> Self {
        let clocks_count = model.clocks_count();
        let mut state = SymbolicState {
            locations: vec![0; model.processes_count()],
            integers: vec![0; model.variables_count()],
            clocks_count,
            constraints: vec![Bound::INFINITY; clocks_count * clocks_count],
        };

        for clock in 0..clocks_count {
            *state.constraint_mut(0, clock) = Bound::ZERO;
            *state.constraint_mut(clock, clock) = Bound::ZERO;
        }

        state
    }

    /// Read a state from a trace.
    ///
    /// This is a line of locations, a list of `row column packed-bound` constraints (each followed
    /// by its own terminator), and a line of integer values; each of the three lists is terminated
    /// by a `.` line.
    pub fn read<R: BufRead>(model: &Model, scanner: &mut Scanner<R>) -> Result<Self, TracerError> {
        let mut state = SymbolicState::new(model);

        for (location, process) in state.locations.iter_mut().zip(model.processes().iter()) {
            let value = expect_int(scanner, "a location index")?;
            let index = non_negative(scanner, value, "a location index")?;
            if index >= process.locations.len() {
                return Err(TracerError::IndexOutOfRange {
                    what: "local location",
                    index: value,
                    count: process.locations.len(),
                });
            }
            *location = index;
        }
        scanner.expect_dot()?;

        while let Some(row) = scanner.next_int()? {
            let row = non_negative(scanner, row, "a constraint row")?;
            let column = expect_int(scanner, "a constraint column")?;
            let column = non_negative(scanner, column, "a constraint column")?;
            let packed = expect_i32(scanner, "a packed bound")?;
            scanner.expect_dot()?;

            for index in [row, column].iter() {
                if *index >= state.clocks_count {
                    return Err(TracerError::IndexOutOfRange {
                        what: "clock",
                        index: *index as i64,
                        count: state.clocks_count,
                    });
                }
            }
            *state.constraint_mut(row, column) = Bound::from_packed(packed);
        }
        scanner.expect_dot()?;

        for integer in state.integers.iter_mut() {
            *integer = expect_i32(scanner, "a variable value")?;
        }
        scanner.expect_dot()?;

        Ok(state)
    }

    /// The process-local location index of each process.
    pub fn locations(&self) -> &[usize] {
        &self.locations
    }

    /// The value of each variable.
    pub fn integers(&self) -> &[i32] {
        &self.integers
    }

    /// The value of a variable.
    pub fn integer(&self, number: usize) -> Option<i32> {
        self.integers.get(number).copied()
    }

    /// The number of clocks.
    pub fn clocks_count(&self) -> usize {
        self.clocks_count
    }

    /// The bound of `clock_row - clock_column`.
    pub fn constraint(&self, row: usize, column: usize) -> Bound {
        self.constraints[row * self.clocks_count + column]
    }

    fn constraint_mut(&mut self, row: usize, column: usize) -> &mut Bound {
        &mut self.constraints[row * self.clocks_count + column]
    }
}

fn expect_int<R: BufRead>(
    scanner: &mut Scanner<R>,
    expected: &'static str,
) -> Result<i64, TracerError> {
    match scanner.next_int()? {
        Some(value) => Ok(value),
        None => Err(TracerError::UnexpectedToken {
            line_number: scanner.line_number(),
            expected,
            found: scanner.peek_token()?,
        }),
    }
}

fn expect_i32<R: BufRead>(
    scanner: &mut Scanner<R>,
    expected: &'static str,
) -> Result<i32, TracerError> {
    let value = expect_int(scanner, expected)?;
    i32::try_from(value).map_err(|_| TracerError::UnexpectedToken {
        line_number: scanner.line_number(),
        expected,
        found: value.to_string(),
    })
}

fn non_negative<R: BufRead>(
    scanner: &Scanner<R>,
    value: i64,
    expected: &'static str,
) -> Result<usize, TracerError> {
    if value < 0 {
        Err(TracerError::UnexpectedToken {
            line_number: scanner.line_number(),
            expected,
            found: value.to_string(),
        })
    } else {
        Ok(value as usize)
    }
}
