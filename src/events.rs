//! Recognize domain events in the raw transitions of a trace.
//!
//! This is a heuristic: a fired edge belongs to an agent if its process name contains the agent
//! name, and is an event if its source and target location names contain the configured
//! fragments. When several patterns match, the last one (in configuration order) wins.

use crate::agents::*;
use crate::configurations::*;
use crate::models::*;
use crate::transitions::*;
use crate::utilities::*;

/// An event of a single agent.
#[derive(PartialEq, Eq, Clone, Debug)]
pub struct AgentEvent {
    /// The agent's id.
    pub agent_id: usize,

    /// The kind of event.
    pub kind: EventKind,

    /// The label of the event (from the matching pattern).
    pub label: String,

    /// The target of the event, `process.location`.
    pub target: String,

    /// The time interval the event happened in.
    pub interval: (i32, i32),
}

/// The category of a process, by its name.
#[derive(PartialEq, Eq, Copy, Clone, Debug)]
enum Category {
    Task,
    Milestone,
}

/// The names involved in a fired edge.
struct EdgeNames<'a> {
    process: &'a str,
    source: &'a str,
    target: &'a str,
}

/// Classify the events of all agents in a transition.
///
/// Returns at most one event per agent, in the order of the agents. If several edges of the
/// transition produce an event for the same agent, the last one wins.
pub fn classify(
    model: &Model,
    agents: &[Agent],
    configuration: &Configuration,
    transition: &Transition,
) -> Vec<AgentEvent> {
    let mut events: Vec<Option<AgentEvent>> = vec![None; agents.len()];

    for fired in transition.edges.iter() {
        for (position, agent) in agents.iter().enumerate() {
            if let Some(event) = classify_edge(model, agent, configuration, fired) {
                events[position] = Some(event);
            }
        }
    }

    events.into_iter().flatten().collect()
}

/// Classify a single fired edge for a single agent.
pub fn classify_edge(
    model: &Model,
    agent: &Agent,
    configuration: &Configuration,
    fired: &FiredEdge,
) -> Option<AgentEvent> {
    let edge = model.edge(fired.edge_id);
    let names = EdgeNames {
        process: &model.processes()[edge.process.to_usize()].name,
        source: model.cell_name(edge.source),
        target: model.cell_name(edge.target),
    };

    if !names.process.contains(agent.name.as_str()) {
        return None;
    }

    let patterns = match category(configuration, names.process)? {
        Category::Task => &configuration.task_patterns,
        Category::Milestone => &configuration.milestone_patterns,
    };

    let mut matched: Option<&EventPattern> = None;
    for pattern in patterns.iter() {
        for from in pattern.from.iter() {
            for to in pattern.to.iter() {
                if names.source.contains(from.as_str()) && names.target.contains(to.as_str()) {
                    matched = Some(pattern);
                }
            }
        }
    }

    matched.map(|pattern| AgentEvent {
        agent_id: agent.id,
        kind: pattern.kind,
        label: pattern.label.clone(),
        target: format!("{}.{}", names.process, names.target),
        interval: (0, configuration.max_time),
    })
}

fn category(configuration: &Configuration, process_name: &str) -> Option<Category> {
    if process_name.contains(configuration.task_name_identifier.as_str()) {
        Some(Category::Task)
    } else if process_name.contains(configuration.milestone_name_identifier.as_str()) {
        Some(Category::Milestone)
    } else {
        None
    }
}
