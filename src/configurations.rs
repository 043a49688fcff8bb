use lazy_static::lazy_static;
use strum::Display;
use strum::EnumString;
use strum::IntoStaticStr;

/// The kinds of domain events recognized in transitions.
#[derive(PartialEq, Eq, Hash, Copy, Clone, Debug, Display, EnumString, IntoStaticStr)]
pub enum EventKind {
    /// An agent starts moving between milestones.
    #[strum(serialize = "Move Start")]
    MoveStart,

    /// An agent arrives at a milestone.
    #[strum(serialize = "Move Finish")]
    MoveFinish,

    /// An agent starts executing a task.
    #[strum(serialize = "Task Start")]
    TaskStart,

    /// An agent finishes executing a task.
    #[strum(serialize = "Task Finish")]
    TaskFinish,
}

/// How to recognize one kind of event.
///
/// A transition matches if its source location name contains any of the `from` fragments and its
/// target location name contains any of the `to` fragments.
#[derive(PartialEq, Eq, Clone, Debug)]
pub struct EventPattern {
    /// The kind of event this recognizes.
    pub kind: EventKind,

    /// The label to report for the event.
    pub label: String,

    /// Fragments of the source location names.
    pub from: Vec<String>,

    /// Fragments of the target location names.
    pub to: Vec<String>,
}

impl EventPattern {
    /// Create a pattern labeled by the default name of its kind.
    pub fn new(kind: EventKind, from: &[&str], to: &[&str]) -> Self {
        EventPattern {
            kind,
            label: kind.to_string(),
            from: from.iter().map(|fragment| fragment.to_string()).collect(),
            to: to.iter().map(|fragment| fragment.to_string()).collect(),
        }
    }
}

/// A named checkpoint, identified by the value of an agent's position variable.
#[derive(PartialEq, Eq, Hash, Clone, Debug)]
pub struct Milestone {
    /// The name of the milestone.
    pub name: String,

    /// The value of the position variable at this milestone.
    pub value: i32,
}

impl Milestone {
    /// Create a new milestone.
    pub fn new(name: &str, value: i32) -> Self {
        Milestone {
            name: name.to_string(),
            value,
        }
    }
}

/// The vocabulary used to interpret a trace in domain terms.
///
/// Everything here describes the naming conventions of a specific family of models; nothing is
/// hard-wired in the code.
#[derive(PartialEq, Eq, Clone, Debug)]
pub struct Configuration {
    /// Patterns for events of task processes, tried in order.
    pub task_patterns: Vec<EventPattern>,

    /// Patterns for events of milestone (movement) processes, tried in order.
    pub milestone_patterns: Vec<EventPattern>,

    /// The fragment identifying task process names.
    pub task_name_identifier: String,

    /// The fragment identifying milestone process names.
    pub milestone_name_identifier: String,

    /// The known milestones.
    pub milestone_values: Vec<Milestone>,

    /// For each agent (by id), the number of tasks it completes in one iteration.
    pub task_quotas: Vec<(usize, usize)>,

    /// The upper bound of the reported time interval of every event.
    ///
    /// The actual time of an event can't be recovered from the trace, so every event is reported
    /// as happening in `0..max_time`.
    pub max_time: i32,

    /// The number of leading (bookkeeping) processes which do not belong to any agent.
    pub start_offset: usize,

    /// The number of agents.
    pub agent_count: usize,

    /// The name of the position variable of an agent, with `{id}` standing for the agent id.
    pub position_variable: String,

    /// Separates the process name prefix from the agent name suffix.
    pub agent_separator: String,
}

impl Configuration {
    /// The number of tasks an agent completes in one iteration, if known.
    pub fn task_quota(&self, agent_id: usize) -> Option<usize> {
        self.task_quotas
            .iter()
            .find(|(id, _quota)| *id == agent_id)
            .map(|(_id, quota)| *quota)
    }

    /// The name of the position variable of an agent.
    pub fn position_variable_of(&self, agent_id: usize) -> String {
        self.position_variable
            .replace("{id}", &agent_id.to_string())
    }

    /// The milestone for a value of the position variable, if any.
    pub fn milestone_of(&self, value: i32) -> Option<&Milestone> {
        self.milestone_values
            .iter()
            .rev()
            .find(|milestone| milestone.value == value)
    }
}

impl Default for Configuration {
    /// The vocabulary of the quarry haulage models.
    fn default() -> Self {
        Configuration {
            task_patterns: vec![
                EventPattern::new(EventKind::TaskStart, &["Waiting", "Idle"], &["Executing"]),
                EventPattern::new(EventKind::TaskFinish, &["Executing"], &["Idle"]),
            ],
            milestone_patterns: vec![
                EventPattern::new(EventKind::MoveStart, &["P1"], &["F1T2"]),
                EventPattern::new(EventKind::MoveFinish, &["F1T2"], &["P2"]),
            ],
            task_name_identifier: "t_".to_string(),
            milestone_name_identifier: "m_".to_string(),
            milestone_values: vec![
                Milestone::new("STONE0", 0),
                Milestone::new("STONE1", 1),
                Milestone::new("PRIMARYCRUSHER0", 2),
                Milestone::new("SECONDARYCRUSHER0", 3),
                Milestone::new("ONTHEWAY", -1),
            ],
            task_quotas: vec![(0, 2), (1, 2), (2, 3)],
            max_time: 3600,
            start_offset: 1,
            agent_count: 3,
            position_variable: "agents[{id}].a_position".to_string(),
            agent_separator: "_".to_string(),
        }
    }
}

lazy_static! {
    /// The default configuration, shared.
    pub static ref DEFAULT_CONFIGURATION: Configuration = Configuration::default();
}
