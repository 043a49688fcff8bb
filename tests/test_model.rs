mod common;

use xtr_timeline::*;

fn load_error(text: &str) -> TracerError {
    match Model::load(text.as_bytes()) {
        Ok(_) => panic!("loaded an invalid model"),
        Err(error) => error,
    }
}

#[test]
fn test_load_counts() {
    let model = common::model();
    assert_eq!(model.processes_count(), 4);
    assert_eq!(model.variables_count(), 2);
    assert_eq!(model.clocks_count(), 2);
    assert_eq!(model.edges().len(), 6);
    assert_eq!(model.layout().len(), 14);
    assert_eq!(model.instructions(), &[1, 2, 3, 5, 6]);
    assert_eq!(model.clocks(), &["t(0)".to_string(), "x".to_string()]);
    assert_eq!(
        model.variables(),
        &[
            "agents[0].a_position".to_string(),
            "agents[1].a_position".to_string()
        ]
    );
}

#[test]
fn test_empty_model() {
    let model = Model::load("".as_bytes()).unwrap();
    assert_eq!(model.processes_count(), 0);
    assert_eq!(model.variables_count(), 0);
    assert_eq!(model.clocks_count(), 0);
    assert!(model.edges().is_empty());
}

#[test]
fn test_processes() {
    let model = common::model();
    let names: Vec<&str> = model
        .processes()
        .iter()
        .map(|process| process.name.as_str())
        .collect();
    assert_eq!(names, vec!["Main", "t_Drill_A", "m_Move_A", "t_Drill_B"]);

    let drill = model.process(ProcessId::from_usize(1)).unwrap();
    assert_eq!(drill.initial, CellId::from_usize(4));
    assert_eq!(
        drill.locations,
        vec![CellId::from_usize(4), CellId::from_usize(5)]
    );
    assert_eq!(drill.edges, vec![EdgeId::from_usize(0), EdgeId::from_usize(1)]);

    assert!(model.process(ProcessId::from_usize(4)).is_err());
}

#[test]
fn test_edges_belong_to_their_process() {
    let model = common::model();
    for (process_index, process) in model.processes().iter().enumerate() {
        for (local_index, edge_id) in process.edges.iter().enumerate() {
            assert_eq!(
                model.edge(*edge_id).process,
                ProcessId::from_usize(process_index)
            );
            assert_eq!(
                model
                    .global_edge_id(
                        ProcessId::from_usize(process_index),
                        LocalEdgeIndex::from_usize(local_index)
                    )
                    .unwrap(),
                *edge_id
            );
        }
    }

    assert_eq!(
        model
            .global_edge_id(ProcessId::from_usize(2), LocalEdgeIndex::from_usize(1))
            .unwrap(),
        EdgeId::from_usize(3)
    );
    match model.global_edge_id(ProcessId::from_usize(2), LocalEdgeIndex::from_usize(2)) {
        Err(TracerError::IndexOutOfRange { index, count, .. }) => {
            assert_eq!(index, 2);
            assert_eq!(count, 2);
        }
        result => panic!("unexpected {:?}", result),
    }
}

#[test]
fn test_edge_expressions() {
    let model = common::model();
    let edge = model.edge(EdgeId::from_usize(1));
    assert_eq!(edge.source, CellId::from_usize(5));
    assert_eq!(edge.target, CellId::from_usize(4));
    assert_eq!(model.expression(edge.guard), "1");
    assert_eq!(model.expression(edge.sync), "tau");
    assert_eq!(model.expression(edge.update), "x = 0");
    assert_eq!(model.expression(ExpressionId::from_usize(99)), "");
}

#[test]
fn test_location_cells() {
    let model = common::model();
    assert_eq!(
        *model.cell(CellId::from_usize(5)),
        Cell::Location {
            name: "Executing".to_string(),
            flag: LocationFlag::None,
            process: Some(ProcessId::from_usize(1)),
            invariant: Some(ExpressionId::from_usize(4)),
        }
    );
    assert_eq!(model.expression(ExpressionId::from_usize(4)), "x <= 10");

    match model.cell(CellId::from_usize(6)) {
        Cell::Location { flag, .. } => assert_eq!(*flag, LocationFlag::Committed),
        cell => panic!("unexpected {:?}", cell),
    }
    match model.cell(CellId::from_usize(9)) {
        Cell::Location { flag, .. } => assert_eq!(*flag, LocationFlag::Urgent),
        cell => panic!("unexpected {:?}", cell),
    }

    assert_eq!(*model.cell(CellId::from_usize(12)), Cell::Const { value: 7 });
    assert_eq!(*model.cell(CellId::from_usize(13)), Cell::Cost);
    assert_eq!(model.cell(CellId::from_usize(13)).kind(), "Cost");
    assert_eq!(model.cell_name(CellId::from_usize(12)), "");
}

#[test]
fn test_variable_numbers() {
    let model = common::model();
    assert_eq!(model.variable_number("agents[0].a_position"), Some(0));
    assert_eq!(model.variable_number("agents[1].a_position"), Some(1));
    assert_eq!(model.variable_number("agents[2].a_position"), None);
}

#[test]
fn test_display_location() {
    let model = common::model();
    assert_eq!(
        model
            .display_location(ProcessId::from_usize(2), 1)
            .unwrap(),
        "m_Move_A.F1T2"
    );
    assert!(model.display_location(ProcessId::from_usize(2), 3).is_err());
}

#[test]
fn test_invalid_layout_line() {
    match load_error("layout\n0:bogus:1\n") {
        TracerError::InvalidFormat { section, line } => {
            assert_eq!(section, "layout");
            assert_eq!(line, "0:bogus:1");
        }
        error => panic!("unexpected {:?}", error),
    }
}

#[test]
fn test_unknown_section() {
    match load_error("bogus\n") {
        TracerError::InvalidFormat { section, .. } => assert_eq!(section, "top level"),
        error => panic!("unexpected {:?}", error),
    }
}

#[test]
fn test_edge_of_unknown_process() {
    match load_error("edges\n0:0:0:0:0:0\n") {
        TracerError::InvalidFormat { section, .. } => assert_eq!(section, "edges"),
        error => panic!("unexpected {:?}", error),
    }
}

#[test]
fn test_location_of_non_location_cell() {
    match load_error("layout\n0:const:1\n\nprocesses\n0:0:P\n\nlocations\n0:0:0\n") {
        TracerError::InvalidFormat { section, .. } => assert_eq!(section, "locations"),
        error => panic!("unexpected {:?}", error),
    }
}

#[test]
fn test_invalid_constant() {
    let error = load_error("layout\n0:const:\u{0}\n");
    assert!(matches!(error, TracerError::InvalidFormat { .. }));
    assert!(format!("{}", error).starts_with("invalid format in the layout section"));
}

#[test]
fn test_invalid_process_line() {
    match load_error("processes\n0:x:P\n") {
        TracerError::InvalidFormat { section, line } => {
            assert_eq!(section, "processes");
            assert_eq!(line, "0:x:P");
        }
        error => panic!("unexpected {:?}", error),
    }
}

#[test]
fn test_invalid_instruction_line() {
    match load_error("instructions\n0:a b\n") {
        TracerError::InvalidFormat { section, line } => {
            assert_eq!(section, "instructions");
            assert_eq!(line, "0:a b");
        }
        error => panic!("unexpected {:?}", error),
    }
}

#[test]
fn test_invalid_expression_line() {
    match load_error("expressions\n0:1\n") {
        TracerError::InvalidFormat { section, line } => {
            assert_eq!(section, "expressions");
            assert_eq!(line, "0:1");
        }
        error => panic!("unexpected {:?}", error),
    }
}
