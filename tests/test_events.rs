mod common;

use common::*;
use xtr_timeline::*;

fn configuration() -> Configuration {
    let mut configuration = Configuration::default();
    configuration.agent_count = 2;
    configuration
}

fn transition_of(model: &Model, edges: &[&str]) -> Transition {
    let text = format!(
        "{}{}{}.\n",
        state([0, 0, 0, 0], [0, 0]),
        state([0, 0, 0, 0], [0, 0]),
        transition(edges)
    );
    let mut replay = replay(model, text.as_bytes()).unwrap();
    replay.steps.remove(0).transition
}

#[test]
fn test_collect_agents() {
    let model = common::model();
    let agents = collect_agents(&model, &configuration()).unwrap();
    assert_eq!(
        agents,
        vec![
            Agent {
                id: 0,
                name: "A".to_string(),
                locations: vec!["t_Drill".to_string(), "m_Move".to_string()],
            },
            Agent {
                id: 1,
                name: "B".to_string(),
                locations: vec!["t_Drill".to_string()],
            },
        ]
    );
}

#[test]
fn test_too_many_agents() {
    let model = common::model();
    match collect_agents(&model, &DEFAULT_CONFIGURATION) {
        Err(TracerError::ConfigurationMismatch(message)) => {
            assert!(message.contains("expected 3 agents"))
        }
        result => panic!("unexpected {:?}", result),
    }
}

#[test]
fn test_start_offset() {
    let model = common::model();
    let mut configuration = configuration();
    configuration.start_offset = 0;
    configuration.agent_count = 3;
    let agents = collect_agents(&model, &configuration).unwrap();
    let names: Vec<&str> = agents.iter().map(|agent| agent.name.as_str()).collect();
    assert_eq!(names, vec!["Main", "A", "B"]);
}

#[test]
fn test_task_start() {
    let model = common::model();
    let configuration = configuration();
    let agents = collect_agents(&model, &configuration).unwrap();
    let transition = transition_of(&model, &["1 0"]);

    let events = classify(&model, &agents, &configuration, &transition);
    assert_eq!(
        events,
        vec![AgentEvent {
            agent_id: 0,
            kind: EventKind::TaskStart,
            label: "Task Start".to_string(),
            target: "t_Drill_A.Executing".to_string(),
            interval: (0, 3600),
        }]
    );

    assert_eq!(
        classify(&model, &agents, &configuration, &transition),
        events
    );
}

#[test]
fn test_task_finish() {
    let model = common::model();
    let configuration = configuration();
    let agents = collect_agents(&model, &configuration).unwrap();
    let transition = transition_of(&model, &["3 1"]);

    let events = classify(&model, &agents, &configuration, &transition);
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].agent_id, 1);
    assert_eq!(events[0].kind, EventKind::TaskFinish);
    assert_eq!(events[0].target, "t_Drill_B.Idle");
}

#[test]
fn test_milestone_events() {
    let model = common::model();
    let configuration = configuration();
    let agents = collect_agents(&model, &configuration).unwrap();

    let departure = transition_of(&model, &["2 0"]);
    let events = classify(&model, &agents, &configuration, &departure);
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].kind, EventKind::MoveStart);
    assert_eq!(events[0].label, "Move Start");
    assert_eq!(events[0].target, "m_Move_A.F1T2");

    let arrival = transition_of(&model, &["2 1"]);
    let events = classify(&model, &agents, &configuration, &arrival);
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].kind, EventKind::MoveFinish);
    assert_eq!(events[0].target, "m_Move_A.P2");
}

#[test]
fn test_events_of_several_agents() {
    let model = common::model();
    let configuration = configuration();
    let agents = collect_agents(&model, &configuration).unwrap();
    let transition = transition_of(&model, &["3 0", "2 0"]);

    let events = classify(&model, &agents, &configuration, &transition);
    let summary: Vec<(usize, EventKind)> =
        events.iter().map(|event| (event.agent_id, event.kind)).collect();
    assert_eq!(
        summary,
        vec![(0, EventKind::MoveStart), (1, EventKind::TaskStart)]
    );
}

#[test]
fn test_last_edge_of_agent_wins() {
    let model = common::model();
    let configuration = configuration();
    let agents = collect_agents(&model, &configuration).unwrap();
    let transition = transition_of(&model, &["1 0", "2 0"]);

    let events = classify(&model, &agents, &configuration, &transition);
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].kind, EventKind::MoveStart);
}

#[test]
fn test_last_pattern_wins() {
    let model = common::model();
    let mut configuration = configuration();
    let mut relabeled = EventPattern::new(EventKind::TaskStart, &["Idle"], &["Exec"]);
    relabeled.label = "Drilling".to_string();
    configuration.task_patterns.push(relabeled);
    let agents = collect_agents(&model, &configuration).unwrap();
    let transition = transition_of(&model, &["1 0"]);

    let events = classify(&model, &agents, &configuration, &transition);
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].label, "Drilling");
}

#[test]
fn test_unmatched_edge() {
    let model = common::model();
    let mut configuration = configuration();
    configuration.task_patterns.clear();
    let agents = collect_agents(&model, &configuration).unwrap();
    let transition = transition_of(&model, &["1 0"]);
    assert!(classify(&model, &agents, &configuration, &transition).is_empty());
}

#[test]
fn test_event_kind_names() {
    assert_eq!(EventKind::MoveFinish.to_string(), "Move Finish");
    assert_eq!("Task Finish".parse::<EventKind>().unwrap(), EventKind::TaskFinish);
    let name: &'static str = EventKind::TaskStart.into();
    assert_eq!(name, "Task Start");
}

#[test]
fn test_configuration_lookups() {
    let configuration = Configuration::default();
    assert_eq!(configuration.task_quota(2), Some(3));
    assert_eq!(configuration.task_quota(7), None);
    assert_eq!(configuration.position_variable_of(1), "agents[1].a_position");
    assert_eq!(configuration.milestone_of(-1).unwrap().name, "ONTHEWAY");
    assert_eq!(configuration.milestone_of(9), None);
    assert_eq!(*DEFAULT_CONFIGURATION, configuration);
}
