//! Load a model in the intermediate format.
//!
//! The intermediate format uses a global numbering of clocks, variables, locations and edges. This
//! is in contrast to the XTR trace format, which uses process local numbering of locations and
//! edges (see `Model::global_edge_id`).

use crate::errors::*;
use crate::models::*;
use crate::utilities::*;

use std::io::BufRead;
use std::str::FromStr;
use strum::EnumString;
use strum::IntoStaticStr;
use tracing::debug;

/// The sections of the intermediate format.
#[derive(PartialEq, Eq, Copy, Clone, Debug, EnumString, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
enum Section {
    Layout,
    Instructions,
    Processes,
    Locations,
    Edges,
    Expressions,
}

/// Read lines of the intermediate format, skipping comments.
struct Lines<R: BufRead> {
    input: R,
    line: String,
}

impl<R: BufRead> Lines<R> {
    /// Return the next non-comment line (without the line terminator), or `None` at the end.
    fn next_line(&mut self) -> Result<Option<&str>, TracerError> {
        loop {
            self.line.clear();
            if self.input.read_line(&mut self.line)? == 0 {
                return Ok(None);
            }
            while self.line.ends_with('\n') || self.line.ends_with('\r') {
                self.line.pop();
            }
            if !self.line.starts_with('#') {
                return Ok(Some(&self.line));
            }
        }
    }
}

/// Whether a line is the end of a section.
///
/// Sections are terminated by an empty line (or a line starting with white space).
fn ends_section(line: &str) -> bool {
    line.chars()
        .next()
        .map(|first| first.is_whitespace())
        .unwrap_or(true)
}

/// Parse a (possibly signed) integer field.
fn int_field<T: FromStr>(field: &str) -> Option<T> {
    field.trim().parse::<T>().ok()
}

/// Extract a name field: everything up to the first white space, which must not be empty.
fn name_field(field: &str) -> Option<String> {
    let name = field.split_whitespace().next()?;
    Some(name.to_string())
}

/// Accumulates the model while loading it.
struct Loader {
    model: Model,
}

impl Model {
    /// Load a model from a stream in the intermediate format.
    ///
    /// Fails on the first line that doesn't match the grammar of its section. The `locations`
    /// and `edges` sections refer to processes, so must follow the `processes` section.
    pub fn load<R: BufRead>(input: R) -> Result<Model, TracerError> {
        let mut lines = Lines {
            input,
            line: String::new(),
        };
        let mut loader = Loader {
            model: Model::default(),
        };

        while let Some(line) = lines.next_line()? {
            if line.trim().is_empty() {
                continue;
            }
            let section = Section::from_str(line.trim())
                .map_err(|_| TracerError::invalid_format("top level", line))?;
            loader.load_section(section, &mut lines)?;
        }

        let model = loader.model;
        debug!(
            processes = model.processes_count(),
            variables = model.variables_count(),
            clocks = model.clocks_count(),
            edges = model.edges.len(),
            "loaded model"
        );
        Ok(model)
    }
}

impl Loader {
    fn load_section<R: BufRead>(
        &mut self,
        section: Section,
        lines: &mut Lines<R>,
    ) -> Result<(), TracerError> {
        let name: &'static str = section.into();
        while let Some(line) = lines.next_line()? {
            if section == Section::Instructions && line.starts_with('\t') {
                // Pretty-printed instruction text.
                continue;
            }
            if ends_section(line) {
                break;
            }
            let loaded = match section {
                Section::Layout => self.load_cell(line),
                Section::Instructions => self.load_instruction(line),
                Section::Processes => self.load_process(line),
                Section::Locations => self.load_location(line),
                Section::Edges => self.load_edge(line),
                Section::Expressions => self.load_expression(line),
            };
            if loaded.is_none() {
                return Err(TracerError::invalid_format(name, line));
            }
        }
        Ok(())
    }

    fn load_cell(&mut self, line: &str) -> Option<()> {
        let mut fields = line.splitn(3, ':');
        let _index: usize = int_field(fields.next()?)?;
        let kind = fields.next()?;
        let rest = fields.next().unwrap_or("");

        let cell = match kind {
            "clock" => {
                let (number, name) = split_number_name(rest)?;
                let clock_name = name.clone();
                self.model.clocks.push(clock_name);
                Cell::Clock { name, number }
            }
            "const" => Cell::Const {
                value: int_field(rest)?,
            },
            "var" | "meta" => {
                let fields: Vec<&str> = rest.splitn(5, ':').collect();
                if fields.len() != 5 {
                    return None;
                }
                let range = IntegerRange {
                    min: int_field(fields[0])?,
                    max: int_field(fields[1])?,
                };
                let init = int_field(fields[2])?;
                let number = int_field(fields[3])?;
                let name = name_field(fields[4])?;
                self.add_variable(&name);
                if kind == "var" {
                    Cell::Var {
                        name,
                        range,
                        init,
                        number,
                    }
                } else {
                    Cell::Meta {
                        name,
                        range,
                        init,
                        number,
                    }
                }
            }
            "sys_meta" | "static" => {
                let fields: Vec<&str> = rest.splitn(3, ':').collect();
                if fields.len() != 3 {
                    return None;
                }
                let range = IntegerRange {
                    min: int_field(fields[0])?,
                    max: int_field(fields[1])?,
                };
                let name = name_field(fields[2])?;
                if kind == "sys_meta" {
                    Cell::SysMeta { name, range }
                } else {
                    Cell::Fixed { name, range }
                }
            }
            "location" => {
                let (flag, name) = rest.split_once(':')?;
                let flag = match flag {
                    "" => LocationFlag::None,
                    "committed" => LocationFlag::Committed,
                    "urgent" => LocationFlag::Urgent,
                    _ => return None,
                };
                Cell::Location {
                    name: name_field(name)?,
                    flag,
                    process: None,
                    invariant: None,
                }
            }
            _ if kind.split_whitespace().next() == Some("cost") => Cell::Cost,
            _ => return None,
        };

        self.model.layout.push(cell);
        Some(())
    }

    fn add_variable(&mut self, name: &str) {
        let number = self.model.variables.len();
        self.model.variables.push(name.to_string());
        self.model
            .variable_by_name
            .entry(name.to_string())
            .or_insert(number);
    }

    fn load_instruction(&mut self, line: &str) -> Option<()> {
        let (address, values) = line.split_once(':')?;
        let _address: usize = int_field(address)?;
        let values: Vec<i32> = values
            .split_whitespace()
            .take(4)
            .map_while(|value| value.parse::<i32>().ok())
            .collect();
        if values.is_empty() {
            return None;
        }
        self.model.instructions.extend(values);
        Some(())
    }

    fn load_process(&mut self, line: &str) -> Option<()> {
        let fields: Vec<&str> = line.splitn(3, ':').collect();
        if fields.len() != 3 {
            return None;
        }
        let _index: usize = int_field(fields[0])?;
        let initial = usize_of(int_field(fields[1])?)?;
        let name = name_field(fields[2])?;
        self.model.processes.push(Process {
            name,
            initial: CellId::from_usize(initial),
            locations: vec![],
            edges: vec![],
        });
        Some(())
    }

    fn load_location(&mut self, line: &str) -> Option<()> {
        let fields = int_fields(line, 3)?;
        let (index, process, invariant) = (fields[0], fields[1], fields[2]);
        let process = usize_of(process)?;
        let index = usize_of(index)?;
        if process >= self.model.processes.len() {
            return None;
        }

        match self.model.layout.get_mut(index)? {
            Cell::Location {
                process: cell_process,
                invariant: cell_invariant,
                ..
            } => {
                *cell_process = Some(ProcessId::from_usize(process));
                *cell_invariant = Some(ExpressionId::from_usize(usize_of(invariant)?));
            }
            _ => return None,
        }

        self.model.processes[process]
            .locations
            .push(CellId::from_usize(index));
        Some(())
    }

    fn load_edge(&mut self, line: &str) -> Option<()> {
        let fields = int_fields(line, 6)?;
        let process = usize_of(fields[0])?;
        if process >= self.model.processes.len() {
            return None;
        }

        let edge = Edge {
            process: ProcessId::from_usize(process),
            source: CellId::from_usize(self.location_of(fields[1])?),
            target: CellId::from_usize(self.location_of(fields[2])?),
            guard: ExpressionId::from_usize(usize_of(fields[3])?),
            sync: ExpressionId::from_usize(usize_of(fields[4])?),
            update: ExpressionId::from_usize(usize_of(fields[5])?),
        };

        let edge_id = EdgeId::from_usize(self.model.edges.len());
        self.model.processes[process].edges.push(edge_id);
        self.model.edges.push(edge);
        Some(())
    }

    /// Verify a field refers to a cell in the layout.
    fn location_of(&self, field: i64) -> Option<usize> {
        let index = usize_of(field)?;
        if index < self.model.layout.len() {
            Some(index)
        } else {
            None
        }
    }

    fn load_expression(&mut self, line: &str) -> Option<()> {
        let (index, _) = line.split_once(':')?;
        let index = usize_of(int_field(index)?)?;

        // The expression text follows the third colon.
        let mut fields = line.splitn(4, ':');
        fields.next()?;
        fields.next()?;
        fields.next()?;
        let text = fields.next()?;

        self.model
            .expressions
            .insert(ExpressionId::from_usize(index), text.trim().to_string());
        Some(())
    }
}

/// Split `<number>:<name>`.
fn split_number_name(field: &str) -> Option<(usize, String)> {
    let (number, name) = field.split_once(':')?;
    Some((int_field(number)?, name_field(name)?))
}

/// Parse exactly `count` colon-separated integers.
fn int_fields(line: &str, count: usize) -> Option<Vec<i64>> {
    let fields: Vec<i64> = line
        .split(':')
        .map(int_field::<i64>)
        .collect::<Option<Vec<i64>>>()?;
    if fields.len() == count {
        Some(fields)
    } else {
        None
    }
}

fn usize_of(value: i64) -> Option<usize> {
    if value < 0 || value >= u32::MAX as i64 {
        None
    } else {
        Some(value as usize)
    }
}
