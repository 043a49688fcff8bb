use crate::errors::*;
use crate::models::*;
use crate::scanner::*;
use crate::utilities::*;

use std::convert::TryFrom;
use std::io::BufRead;

/// One edge fired as part of a transition.
#[derive(PartialEq, Eq, Clone, Debug)]
pub struct FiredEdge {
    /// The process owning the edge.
    pub process_id: ProcessId,

    /// The index of the edge in its process (as given by the trace).
    pub local_index: LocalEdgeIndex,

    /// The global identifier of the edge (resolved against the model).
    pub edge_id: EdgeId,

    /// The values of the select parameters, if any.
    pub selects: Vec<i32>,
}

/// A transition consists of one or more edges.
///
/// Edges are indexed from 0 in the order they appear in the model, per process.
#[derive(PartialEq, Eq, Clone, Debug, Default)]
pub struct Transition {
    /// The fired edges, in trace order.
    pub edges: Vec<FiredEdge>,
}

impl Transition {
    /// Read a transition from a trace.
    ///
    /// Each fired edge is a `process edge [select...]` line. The current format ends each line
    /// with `;`. The old format has no `;` and numbers edges from 1, so these are converted to be
    /// 0-based. The list is terminated by a `.` line.
    pub fn read<R: BufRead>(model: &Model, scanner: &mut Scanner<R>) -> Result<Self, TracerError> {
        let mut transition = Transition::default();

        loop {
            let process = match scanner.next_int()? {
                Some(process) => process,
                None => break,
            };
            let edge = match scanner.next_int()? {
                Some(edge) => edge,
                None => break, // NOT TESTED
            };

            let mut selects: Vec<i32> = vec![];
            scanner.skip_spaces()?;
            loop {
                match scanner.peek()? {
                    Some('\n') | Some('\r') | Some(';') | None => break,
                    _ => {}
                }
                match scanner.next_int()? {
                    Some(select) => match i32::try_from(select) {
                        Ok(select) => selects.push(select),
                        Err(_) => {
                            return Err(TracerError::TransitionFormat {
                                line_number: scanner.line_number(),
                                token: select.to_string(),
                            });
                        }
                    },
                    None => {
                        return Err(TracerError::TransitionFormat {
                            line_number: scanner.line_number(),
                            token: scanner.peek_token()?,
                        });
                    }
                }
                scanner.skip_spaces()?;
            }

            if scanner.peek()? == Some('\r') {
                scanner.next_char()?;
            }
            let is_old_format = scanner.next_char()? == Some('\n');
            let edge = if is_old_format { edge - 1 } else { edge };

            transition.edges.push(resolve(model, process, edge, selects)?);
        }

        scanner.expect_dot()?;
        Ok(transition)
    }
}

/// Translate the process-local edge index of the trace to the global edge identifier.
fn resolve(
    model: &Model,
    process: i64,
    edge: i64,
    selects: Vec<i32>,
) -> Result<FiredEdge, TracerError> {
    if process < 0 || process as usize >= model.processes_count() {
        return Err(TracerError::IndexOutOfRange {
            what: "process",
            index: process,
            count: model.processes_count(),
        });
    }
    let process_id = ProcessId::from_usize(process as usize);

    let edges_count = model.processes()[process as usize].edges.len();
    if edge < 0 || edge as usize >= edges_count {
        return Err(TracerError::IndexOutOfRange {
            what: "local edge",
            index: edge,
            count: edges_count,
        });
    }
    let local_index = LocalEdgeIndex::from_usize(edge as usize);
    let edge_id = model.global_edge_id(process_id, local_index)?;

    Ok(FiredEdge {
        process_id,
        local_index,
        edge_id,
        selects,
    })
}
