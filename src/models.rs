use crate::errors::*;
use crate::states::*;
use crate::transitions::*;
use crate::utilities::*;

use hashbrown::HashMap;
use std::fmt::Write as FmtWrite;
use strum::IntoStaticStr;

/// The scheduling flag of a location.
#[derive(PartialEq, Eq, Hash, Copy, Clone, Debug, IntoStaticStr)]
pub enum LocationFlag {
    /// An ordinary location.
    None,

    /// Time may not pass and the next transition must leave a committed location.
    Committed,

    /// Time may not pass.
    Urgent,
}

/// The bounds of an integer cell.
#[derive(PartialEq, Eq, Copy, Clone, Debug)]
pub struct IntegerRange {
    /// The minimal value.
    pub min: i32,

    /// The maximal value.
    pub max: i32,
}

/// One addressable element of the model memory layout.
///
/// The cell's identifier is its position in the model's layout table.
#[derive(PartialEq, Eq, Clone, Debug, IntoStaticStr)]
pub enum Cell {
    /// A constant value.
    Const { value: i32 },

    /// A clock; `number` is its index in the clock-constraint matrix.
    Clock { name: String, number: usize },

    /// A bounded integer variable; `number` is its index in the state's integer vector.
    Var {
        name: String,
        range: IntegerRange,
        init: i32,
        number: usize,
    },

    /// A bounded meta variable; also part of the state's integer vector.
    Meta {
        name: String,
        range: IntegerRange,
        init: i32,
        number: usize,
    },

    /// A process-local meta variable.
    SysMeta { name: String, range: IntegerRange },

    /// A location of some process.
    ///
    /// The process and invariant are only known after loading the `locations` section.
    Location {
        name: String,
        flag: LocationFlag,
        process: Option<ProcessId>,
        invariant: Option<ExpressionId>,
    },

    /// A fixed (static) value.
    Fixed { name: String, range: IntegerRange },

    /// The cost accumulator.
    Cost,
}

impl Cell {
    /// The name of the cell, if it has one.
    pub fn name(&self) -> Option<&str> {
        match self {
            Cell::Clock { name, .. }
            | Cell::Var { name, .. }
            | Cell::Meta { name, .. }
            | Cell::SysMeta { name, .. }
            | Cell::Location { name, .. }
            | Cell::Fixed { name, .. } => Some(name),
            Cell::Const { .. } | Cell::Cost => None,
        }
    }

    /// The short name of the kind of the cell.
    pub fn kind(&self) -> &'static str {
        self.into()
    }
}

/// A named automaton component.
#[derive(PartialEq, Eq, Clone, Debug)]
pub struct Process {
    /// The name of the process.
    pub name: String,

    /// The initial location (cell identifier).
    pub initial: CellId,

    /// The locations (cell identifiers) in local index order.
    pub locations: Vec<CellId>,

    /// The edges (global edge identifiers) in local index order.
    pub edges: Vec<EdgeId>,
}

/// A directed transition template.
#[derive(PartialEq, Eq, Copy, Clone, Debug)]
pub struct Edge {
    /// The process owning the edge.
    pub process: ProcessId,

    /// The source location (cell identifier).
    pub source: CellId,

    /// The target location (cell identifier).
    pub target: CellId,

    /// The guard expression.
    pub guard: ExpressionId,

    /// The synchronization label expression.
    pub sync: ExpressionId,

    /// The update expression.
    pub update: ExpressionId,
}

/// A complete model in the intermediate format.
///
/// This is immutable once loaded and is passed by reference to everything that needs it.
#[derive(Debug, Default)]
pub struct Model {
    /// The memory layout.
    pub(crate) layout: Vec<Cell>,

    /// The instruction words (kept verbatim).
    pub(crate) instructions: Vec<i32>,

    /// The processes.
    pub(crate) processes: Vec<Process>,

    /// All the edges, globally numbered.
    pub(crate) edges: Vec<Edge>,

    /// The expression texts.
    pub(crate) expressions: HashMap<ExpressionId, String>,

    /// The name of each clock, by clock number.
    pub(crate) clocks: Vec<String>,

    /// The name of each integer variable, by variable number.
    pub(crate) variables: Vec<String>,

    /// Lookup a variable number by its name.
    pub(crate) variable_by_name: HashMap<String, usize>,
}

// Model accessors:

impl Model {
    /// The number of processes.
    pub fn processes_count(&self) -> usize {
        self.processes.len()
    }

    /// The number of integer variables (including meta variables).
    pub fn variables_count(&self) -> usize {
        self.variables.len()
    }

    /// The number of clocks (including the reference clock).
    pub fn clocks_count(&self) -> usize {
        self.clocks.len()
    }

    /// Access the memory layout.
    pub fn layout(&self) -> &[Cell] {
        &self.layout
    }

    /// Access the instruction words.
    pub fn instructions(&self) -> &[i32] {
        &self.instructions
    }

    /// Access all the processes.
    pub fn processes(&self) -> &[Process] {
        &self.processes
    }

    /// Access all the edges.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// The names of the clocks by clock number.
    pub fn clocks(&self) -> &[String] {
        &self.clocks
    }

    /// The names of the variables by variable number.
    pub fn variables(&self) -> &[String] {
        &self.variables
    }

    /// Access a process.
    pub fn process(&self, process_id: ProcessId) -> Result<&Process, TracerError> {
        self.processes
            .get(process_id.to_usize())
            .ok_or(TracerError::IndexOutOfRange {
                what: "process",
                index: process_id.to_usize() as i64,
                count: self.processes.len(),
            })
    }

    /// Access an edge by its global identifier.
    pub fn edge(&self, edge_id: EdgeId) -> &Edge {
        &self.edges[edge_id.to_usize()]
    }

    /// Access a cell by its global identifier.
    pub fn cell(&self, cell_id: CellId) -> &Cell {
        &self.layout[cell_id.to_usize()]
    }

    /// Translate a process-local edge index to the global edge identifier.
    pub fn global_edge_id(
        &self,
        process_id: ProcessId,
        local_index: LocalEdgeIndex,
    ) -> Result<EdgeId, TracerError> {
        let process = self.process(process_id)?;
        process
            .edges
            .get(local_index.to_usize())
            .copied()
            .ok_or(TracerError::IndexOutOfRange {
                what: "local edge",
                index: local_index.to_usize() as i64,
                count: process.edges.len(),
            })
    }

    /// Translate a process-local location index to the global cell identifier.
    pub fn location_cell_id(
        &self,
        process_id: ProcessId,
        local_index: usize,
    ) -> Result<CellId, TracerError> {
        let process = self.process(process_id)?;
        process
            .locations
            .get(local_index)
            .copied()
            .ok_or(TracerError::IndexOutOfRange {
                what: "local location",
                index: local_index as i64,
                count: process.locations.len(),
            })
    }

    /// The text of an expression (empty if there is no such expression).
    pub fn expression(&self, expression_id: ExpressionId) -> &str {
        self.expressions
            .get(&expression_id)
            .map(|text| text.as_str())
            .unwrap_or("")
    }

    /// The number of a variable given its name.
    pub fn variable_number(&self, name: &str) -> Option<usize> {
        self.variable_by_name.get(name).copied()
    }

    /// The name of the location cell (empty for unnamed cells).
    pub fn cell_name(&self, cell_id: CellId) -> &str {
        self.cell(cell_id).name().unwrap_or("")
    }
}

// Display data:

impl Model {
    /// Display the location of a process as `process.location`.
    pub fn display_location(
        &self,
        process_id: ProcessId,
        local_index: usize,
    ) -> Result<String, TracerError> {
        let cell_id = self.location_cell_id(process_id, local_index)?;
        Ok(format!(
            "{}.{}",
            self.process(process_id)?.name,
            self.cell_name(cell_id)
        ))
    }

    /// Display a symbolic state: locations, then variables, then the non-trivial clock
    /// constraints, all on a single line.
    pub fn display_state(&self, state: &SymbolicState) -> Result<String, TracerError> {
        let mut string = String::new();

        for (process_index, local_index) in state.locations().iter().enumerate() {
            let location = self.display_location(ProcessId::from_usize(process_index), *local_index)?;
            string.push_str(&location);
            string.push(' ');
        }

        for (name, value) in self.variables.iter().zip(state.integers().iter()) {
            write!(string, "{}={} ", name, value).unwrap();
        }

        let clocks_count = state.clocks_count();
        for row in 0..clocks_count {
            for column in 0..clocks_count {
                if row == column {
                    continue;
                }
                let bound = state.constraint(row, column);
                if !bound.is_infinity() {
                    write!(
                        string,
                        "{}-{}{} ",
                        self.clocks[row], self.clocks[column], bound
                    )
                    .unwrap();
                }
            }
        }

        string.pop();
        Ok(string)
    }

    /// Display a transition as one `P.src -> P.dst [select] {guard; sync; update;}` entry per
    /// fired edge, separated by spaces.
    pub fn display_transition(&self, transition: &Transition) -> String {
        transition
            .edges
            .iter()
            .map(|fired| self.display_fired_edge(fired))
            .collect::<Vec<String>>()
            .join(" ")
    }

    fn display_fired_edge(&self, fired: &FiredEdge) -> String {
        let edge = self.edge(fired.edge_id);
        let process_name = &self.processes[edge.process.to_usize()].name;
        let mut string = format!(
            "{}.{} -> {}.{}",
            process_name,
            self.cell_name(edge.source),
            process_name,
            self.cell_name(edge.target)
        );
        if !fired.selects.is_empty() {
            let selects: Vec<String> = fired.selects.iter().map(|value| value.to_string()).collect();
            write!(string, " [{}]", selects.join(",")).unwrap();
        }
        write!(
            string,
            " {{{}; {}; {};}}",
            self.expression(edge.guard),
            self.expression(edge.sync),
            self.expression(edge.update)
        )
        .unwrap();
        string
    }
}
