use clap::App;
use clap::AppSettings;
use std::io::stdout;
use std::io::BufWriter;
use std::process::exit;
use xtr_timeline::*;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    // Define and parse the command line options.
    let arg_matches = add_clap(
        App::new("xtr-timeline")
            .about("Replay timed automata traces and extract the agents timeline.")
            .setting(AppSettings::SubcommandRequiredElseHelp),
    )
    .get_matches();

    let stdout = stdout();
    let mut output = BufWriter::new(stdout.lock());
    if let Err(error) = do_clap(&arg_matches, &mut output) {
        eprintln!("error: {}", error);
        exit(1);
    }
}
