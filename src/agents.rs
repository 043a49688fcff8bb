use crate::configurations::*;
use crate::errors::*;
use crate::models::*;
use crate::utilities::*;

use tracing::debug;

/// A logical actor of the model.
///
/// Agents are not part of the automaton; they are inferred from the convention that each process
/// belonging to an agent is named `<prefix><separator><agent-name>`.
#[derive(PartialEq, Eq, Clone, Debug)]
pub struct Agent {
    /// The agent's id (its position in the directory).
    pub id: usize,

    /// The agent's name (the suffix of its process names).
    pub name: String,

    /// The prefixes of the process names of the agent, in process order.
    pub locations: Vec<String>,
}

/// Collect the agents of a model.
///
/// Processes before the configured start offset are bookkeeping and are ignored. The distinct
/// process name suffixes give the agent names, in order of first appearance; the first
/// `agent_count` of these become the agents.
pub fn collect_agents(
    model: &Model,
    configuration: &Configuration,
) -> Result<Vec<Agent>, TracerError> {
    let separator = configuration.agent_separator.as_str();
    let mut names: Vec<&str> = vec![];
    for process in model.processes().iter().skip(configuration.start_offset) {
        let (_prefix, name) = split_last(&process.name, separator);
        if !names.contains(&name) {
            names.push(name);
        }
    }

    if names.len() < configuration.agent_count {
        return Err(TracerError::ConfigurationMismatch(format!(
            "expected {} agents but the processes name only {} ({})",
            configuration.agent_count,
            names.len(),
            names.join(", ")
        )));
    }

    let agents: Vec<Agent> = names
        .iter()
        .take(configuration.agent_count)
        .enumerate()
        .map(|(id, name)| Agent {
            id,
            name: name.to_string(),
            locations: agent_locations(model, configuration, name),
        })
        .collect();

    debug!(
        agents = agents.len(),
        names = %agents.iter().map(|agent| agent.name.as_str()).collect::<Vec<&str>>().join(","),
        "collected agents"
    );
    Ok(agents)
}

fn agent_locations(model: &Model, configuration: &Configuration, name: &str) -> Vec<String> {
    let mut locations: Vec<String> = vec![];
    for process in model.processes().iter().skip(configuration.start_offset) {
        if !process.name.contains(name) {
            continue;
        }
        let (prefix, _name) = split_last(&process.name, &configuration.agent_separator);
        if !locations.iter().any(|location| location == prefix) {
            locations.push(prefix.to_string());
        }
    }
    locations
}
