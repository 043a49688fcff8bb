#![allow(dead_code)]

use std::fs::create_dir_all;
use std::fs::read;
use std::fs::write;
use xtr_timeline::*;

/// Find the name of the current test.
#[macro_export]
macro_rules! test_name {
    () => {{
        fn f() {}
        fn type_name_of<T>(_: T) -> &'static str {
            std::any::type_name::<T>()
        }
        let name = type_name_of(f);
        let prefix = &name[..name.len() - 3];
        let offset = prefix.rfind("::").unwrap();
        &prefix[offset + 2..]
    }};
}

/// Assert that the output of a test is as specified in the expected results file.
#[macro_export]
macro_rules! assert_output {
    ($actual_bytes:expr, $suffix:literal) => {
        common::impl_assert_output(module_path!(), test_name!(), $suffix, &$actual_bytes)
    };
}

/// Compare actual results to expected output in a file.
pub fn impl_assert_output(module_name: &str, test_name: &str, suffix: &str, actual_bytes: &[u8]) {
    let expected_dir = format!("tests/expected/{}", module_name);
    let actual_dir = format!("tests/actual/{}", module_name);

    create_dir_all(expected_dir.clone()).unwrap_or_else(|_| {
        panic!(
            "failed to create expected results directory {}",
            expected_dir
        )
    });
    create_dir_all(actual_dir.clone())
        .unwrap_or_else(|_| panic!("failed to create actual results directory {}", actual_dir));

    let expected_path = format!("{}/{}.{}", expected_dir, test_name, suffix);
    let actual_path = format!("{}/{}.{}", actual_dir, test_name, suffix);

    let expected_bytes = read(expected_path.clone()).unwrap_or_else(|_| {
        write(expected_path.clone(), actual_bytes).unwrap_or_else(|_| {
            panic!("failed to write expected results file {}", expected_path);
        });
        eprintln!(
            "WARNING: created expected results file {}, verify its contents",
            expected_path
        );
        actual_bytes.to_vec()
    });

    write(actual_path.clone(), actual_bytes)
        .unwrap_or_else(|_| panic!("failed to write actual results file {}", actual_path));

    assert!(
        &expected_bytes == actual_bytes,
        "The actual results file {} is different from the expected results file {}",
        expected_path,
        actual_path
    );
}

/// A small quarry model: a bookkeeping process, then a drill and a hauler for agent `A`, and a
/// drill for agent `B`.
///
/// Local location indices: `t_Drill_A` has `Idle`=0, `Executing`=1; `m_Move_A` has `P1`=0,
/// `F1T2`=1, `P2`=2; `t_Drill_B` has `Idle`=0, `Executing`=1.
///
/// Local edge indices: `t_Drill_A` and `t_Drill_B` have start=0, finish=1; `m_Move_A` has
/// depart=0, arrive=1.
pub const MODEL: &str = "\
# A comment before the first section.
layout
0:clock:0:t(0)
1:clock:1:x
2:var:-1:5:0:0:agents[0].a_position
3:var:-1:5:0:1:agents[1].a_position
4:location::Idle
5:location::Executing
6:location:committed:Init
7:location::P1
8:location::F1T2
9:location:urgent:P2
10:location::Idle
11:location::Executing
12:const:7
13:cost

instructions
0:1 2 3
\tpush 1
4:5 6

processes
0:6:Main
1:4:t_Drill_A
2:7:m_Move_A
3:10:t_Drill_B

locations
6:0:0
4:1:0
5:1:4
7:2:0
8:2:0
9:2:0
10:3:0
11:3:0

edges
1:4:5:0:1:2
1:5:4:0:1:3
2:7:8:0:1:2
2:8:9:0:1:2
3:10:11:0:1:2
3:11:10:0:1:3

expressions
0:1:0:1
1:1:0:tau
2:1:0:1
3:1:0:x = 0
4:1:0:x <= 10

";

/// Load the test model.
pub fn model() -> Model {
    Model::load(MODEL.as_bytes()).unwrap()
}

/// Format a state of the test model with the default clock constraints.
///
/// `locations` gives the local location index of each of the four processes, and `positions` the
/// value of the two position variables.
pub fn state(locations: [usize; 4], positions: [i32; 2]) -> String {
    format!(
        "{} {} {} {}\n.\n0 1 1\n.\n.\n{} {}\n.\n",
        locations[0], locations[1], locations[2], locations[3], positions[0], positions[1]
    )
}

/// Format a transition given its `process edge` lines (in the current format).
pub fn transition(edges: &[&str]) -> String {
    let mut text = String::new();
    for edge in edges {
        text.push_str(edge);
        text.push_str(" ;\n");
    }
    text.push_str(".\n");
    text
}

/// Format a complete trace given its initial state and its steps.
pub fn trace(initial: &str, steps: &[(String, String)]) -> String {
    let mut text = initial.to_string();
    for (state, transition) in steps {
        text.push_str(state);
        text.push_str(transition);
    }
    text.push_str(".\n");
    text
}

/// A trace where agent `A` starts and finishes a drilling task, then moves, while agent `B`
/// starts drilling.
pub fn drill_trace() -> String {
    trace(
        &state([0, 0, 0, 0], [0, 1]),
        &[
            (state([0, 0, 0, 0], [0, 1]), transition(&["1 0"])),
            (state([0, 1, 0, 0], [0, 1]), transition(&["1 0"])),
            (state([0, 0, 0, 0], [2, 1]), transition(&["1 1"])),
            (state([0, 0, 1, 1], [-1, 1]), transition(&["2 0", "3 0"])),
        ],
    )
}
