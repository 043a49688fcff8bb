use crate::agents::*;
use crate::configurations::*;
use crate::errors::*;
use crate::models::*;
use crate::reports::*;
use crate::timelines::*;
use crate::traces::*;

use clap::value_t;
use clap::App;
use clap::Arg;
use clap::ArgMatches;
use clap::SubCommand;
use std::fs::File;
use std::io::stdin;
use std::io::BufRead;
use std::io::BufReader;
use std::io::BufWriter;
use std::io::Error as IoError;
use std::io::Write;
use std::time::Instant;
use tracing::info;

/// Add clap commands and flags to a clap application.
pub fn add_clap<'a, 'b>(app: App<'a, 'b>) -> App<'a, 'b> {
    let model_arg = Arg::with_name("MODEL")
        .required(true)
        .help("the model in the intermediate format (or '-' for stdin)");
    let trace_arg = Arg::with_name("TRACE")
        .required(true)
        .help("the XTR trace generated from the model");

    app.arg(
        Arg::with_name("agent-count")
            .short("a")
            .long("agents")
            .value_name("COUNT")
            .help("override the number of agents"),
    )
    .arg(
        Arg::with_name("start-offset")
            .short("s")
            .long("start-offset")
            .value_name("COUNT")
            .help("override the number of leading bookkeeping processes to ignore"),
    )
    .arg(
        Arg::with_name("max-time")
            .short("t")
            .long("max-time")
            .value_name("TIME")
            .help("override the upper bound of the reported event time intervals"),
    )
    .subcommand(
        SubCommand::with_name("timeline")
            .about("write the agents timeline of a trace as a tagged document")
            .arg(model_arg.clone())
            .arg(trace_arg.clone())
            .arg(
                Arg::with_name("OUTPUT")
                    .required(true)
                    .help("the file to write the report into (or '-' for stdout)"),
            ),
    )
    .subcommand(
        SubCommand::with_name("replay")
            .about("print the states and transitions of a trace")
            .arg(model_arg.clone())
            .arg(trace_arg),
    )
    .subcommand(
        SubCommand::with_name("agents")
            .about("list the agents inferred from the model process names")
            .arg(model_arg),
    )
}

/// Build the configuration, applying any overrides from the command line.
pub fn clap_configuration(arg_matches: &ArgMatches) -> Configuration {
    let mut configuration = DEFAULT_CONFIGURATION.clone();
    if arg_matches.is_present("agent-count") {
        configuration.agent_count =
            value_t!(arg_matches, "agent-count", usize).unwrap_or_else(|error| error.exit());
    }
    if arg_matches.is_present("start-offset") {
        configuration.start_offset =
            value_t!(arg_matches, "start-offset", usize).unwrap_or_else(|error| error.exit());
    }
    if arg_matches.is_present("max-time") {
        configuration.max_time =
            value_t!(arg_matches, "max-time", i32).unwrap_or_else(|error| error.exit());
    }
    configuration
}

/// Execute the requested subcommand.
///
/// Returns `false` if no subcommand was given.
pub fn do_clap(arg_matches: &ArgMatches, stdout: &mut dyn Write) -> Result<bool, TracerError> {
    let configuration = clap_configuration(arg_matches);
    match arg_matches.subcommand() {
        ("timeline", Some(matches)) => do_clap_timeline(matches, &configuration, stdout)?,
        ("replay", Some(matches)) => do_clap_replay(matches, stdout)?,
        ("agents", Some(matches)) => do_clap_agents(matches, &configuration, stdout)?,
        _ => return Ok(false),
    }
    Ok(true)
}

fn do_clap_timeline(
    arg_matches: &ArgMatches,
    configuration: &Configuration,
    stdout: &mut dyn Write,
) -> Result<(), TracerError> {
    let model = load_model(arg_matches)?;
    let trace_path = arg_matches.value_of("TRACE").unwrap_or("-");
    let replay = replay(&model, open_input(trace_path)?)?;
    let agents = collect_agents(&model, configuration)?;

    let start = Instant::now();
    let timeline = aggregate(&model, &agents, configuration, &replay);
    let elapsed = start.elapsed();
    info!(
        states = timeline.states.len(),
        elapsed_us = elapsed.as_micros() as u64,
        "computed timeline"
    );

    match arg_matches.value_of("OUTPUT") {
        Some(path) if path != "-" => {
            let file = File::create(path).map_err(|error| with_path(path, error))?;
            XmlReport::new(BufWriter::new(file)).write_report(&timeline, elapsed)
        }
        _ => XmlReport::new(stdout).write_report(&timeline, elapsed),
    }
}

fn do_clap_replay(arg_matches: &ArgMatches, stdout: &mut dyn Write) -> Result<(), TracerError> {
    let model = load_model(arg_matches)?;
    let trace_path = arg_matches.value_of("TRACE").unwrap_or("-");
    let (replayer, initial) = Replayer::start(&model, open_input(trace_path)?)?;

    writeln!(stdout, "State: {}", model.display_state(&initial)?)?;
    for step in replayer {
        let step = step?;
        writeln!(stdout)?;
        writeln!(stdout, "Transition: {}", model.display_transition(&step.transition))?;
        writeln!(stdout)?;
        writeln!(stdout, "State: {}", model.display_state(&step.state)?)?;
    }
    stdout.flush()?;
    Ok(())
}

fn do_clap_agents(
    arg_matches: &ArgMatches,
    configuration: &Configuration,
    stdout: &mut dyn Write,
) -> Result<(), TracerError> {
    let model = load_model(arg_matches)?;
    for agent in collect_agents(&model, configuration)? {
        writeln!(
            stdout,
            "{}: {} ({})",
            agent.id,
            agent.name,
            agent.locations.join(", ")
        )?;
    }
    stdout.flush()?;
    Ok(())
}

fn load_model(arg_matches: &ArgMatches) -> Result<Model, TracerError> {
    let path = arg_matches.value_of("MODEL").unwrap_or("-");
    Model::load(open_input(path)?)
}

/// Open an input stream, where `-` stands for stdin.
fn open_input(path: &str) -> Result<Box<dyn BufRead>, TracerError> {
    if path == "-" {
        return Ok(Box::new(BufReader::new(stdin())));
    }
    let file = File::open(path).map_err(|error| with_path(path, error))?;
    Ok(Box::new(BufReader::new(file)))
}

fn with_path(path: &str, error: IoError) -> TracerError {
    TracerError::Io(IoError::new(error.kind(), format!("{}: {}", path, error)))
}
