use crate::agents::*;
use crate::configurations::*;
use crate::events::*;
use crate::models::*;
use crate::states::*;
use crate::traces::*;

use tracing::debug;

/// The state of a single agent at some step.
#[derive(PartialEq, Eq, Clone, Debug)]
pub struct AgentSnapshot {
    /// The agent's id.
    pub id: usize,

    /// The milestone the agent is at, if known.
    pub milestone: Option<Milestone>,

    /// The current (or last) task of the agent, if any.
    pub task: Option<String>,

    /// The tasks completed in the current iteration, in completion order, without duplicates.
    pub finished_tasks: Vec<String>,

    /// The number of completed iterations.
    pub iteration: usize,
}

/// The state of all the agents at some step.
#[derive(PartialEq, Eq, Clone, Debug, Default)]
pub struct TimelineState {
    /// One snapshot per agent, in agent order.
    pub agents: Vec<AgentSnapshot>,
}

/// The events of all the agents between two consecutive states.
#[derive(PartialEq, Eq, Clone, Debug, Default)]
pub struct TimelineAction {
    /// The events, in agent order (agents with no event are omitted).
    pub agents: Vec<AgentEvent>,
}

/// The domain-level timeline of a trace.
///
/// There is one state per replay step (the initial state of the trace is not included), and one
/// action between each two consecutive states.
#[derive(PartialEq, Eq, Clone, Debug, Default)]
pub struct Timeline {
    /// The states, in trace order.
    pub states: Vec<TimelineState>,

    /// The actions; `actions[i]` leads from `states[i]` to `states[i + 1]`.
    pub actions: Vec<TimelineAction>,
}

impl Timeline {
    /// The result flag: 0 if the trace contained no steps at all, 1 otherwise.
    pub fn result(&self) -> u8 {
        if self.states.is_empty() {
            0
        } else {
            1
        }
    }
}

/// Folds a replay into a timeline.
pub struct Aggregator<'a> {
    /// The model the trace was replayed against.
    model: &'a Model,

    /// The agents to track.
    agents: &'a [Agent],

    /// The vocabulary.
    configuration: &'a Configuration,

    /// The timeline so far.
    timeline: Timeline,
}

impl<'a> Aggregator<'a> {
    /// Create an aggregator with an empty timeline.
    pub fn new(model: &'a Model, agents: &'a [Agent], configuration: &'a Configuration) -> Self {
        Aggregator {
            model,
            agents,
            configuration,
            timeline: Timeline::default(),
        }
    }

    /// Add the next replay step to the timeline.
    ///
    /// The first step only establishes the initial snapshots. Each later step applies the events
    /// of its transition (the one leading into its state) to the previous snapshots.
    pub fn push(&mut self, step: &Step) {
        if self.timeline.states.is_empty() {
            let agents = self
                .agents
                .iter()
                .map(|agent| AgentSnapshot {
                    id: agent.id,
                    milestone: self.milestone_of(agent.id, &step.state),
                    task: None,
                    finished_tasks: vec![],
                    iteration: 0,
                })
                .collect();
            self.timeline.states.push(TimelineState { agents });
            return;
        }

        let events = classify(self.model, self.agents, self.configuration, &step.transition);
        let previous = self
            .timeline
            .states
            .last()
            .map(|state| state.agents.as_slice())
            .unwrap_or(&[]);

        let agents = previous
            .iter()
            .map(|snapshot| {
                let event = events.iter().find(|event| event.agent_id == snapshot.id);
                self.next_snapshot(snapshot, event, &step.state)
            })
            .collect();

        self.timeline.actions.push(TimelineAction { agents: events });
        self.timeline.states.push(TimelineState { agents });
    }

    /// Return the complete timeline.
    pub fn finish(self) -> Timeline {
        debug!(
            states = self.timeline.states.len(),
            actions = self.timeline.actions.len(),
            "aggregated timeline"
        );
        self.timeline
    }

    fn next_snapshot(
        &self,
        previous: &AgentSnapshot,
        event: Option<&AgentEvent>,
        state: &SymbolicState,
    ) -> AgentSnapshot {
        let mut snapshot = previous.clone();

        if let Some(event) = event {
            match event.kind {
                EventKind::TaskStart => {
                    snapshot.task = Some(event.target.clone());
                }
                EventKind::TaskFinish => {
                    if let Some(task) = &previous.task {
                        if !snapshot.finished_tasks.contains(task) {
                            snapshot.finished_tasks.push(task.clone());
                        }
                    }
                    snapshot.milestone = self.milestone_of(snapshot.id, state);
                }
                EventKind::MoveStart | EventKind::MoveFinish => {}
            }
        }

        if let Some(quota) = self.configuration.task_quota(snapshot.id) {
            if quota > 0 && snapshot.finished_tasks.len() == quota {
                snapshot.iteration += 1;
                snapshot.finished_tasks.clear();
            }
        }

        snapshot
    }

    /// Find the milestone of an agent from the value of its position variable.
    fn milestone_of(&self, agent_id: usize, state: &SymbolicState) -> Option<Milestone> {
        let name = self.configuration.position_variable_of(agent_id);
        let number = self.model.variable_number(&name)?;
        let value = state.integer(number)?;
        self.configuration.milestone_of(value).cloned()
    }
}

/// Fold a complete replay into a timeline.
pub fn aggregate(
    model: &Model,
    agents: &[Agent],
    configuration: &Configuration,
    replay: &Replay,
) -> Timeline {
    let mut aggregator = Aggregator::new(model, agents, configuration);
    for step in replay.steps.iter() {
        aggregator.push(step);
    }
    aggregator.finish()
}
