use std::io;
use std::io::BufRead;
use std::io::Write;

use popvis_vis::Id;
use popvis_vis::controller::Outcome;
use popvis_vis::session::Sessions;
use tracing::info;
use tracing::warn;

use crate::cli::SessionArgs;
use crate::data::load_views;
use crate::error::CliError;

pub(crate) fn session(args: SessionArgs) -> Result<(), CliError> {
    let views = load_views(&args.source)?;
    let mut sessions = Sessions::new(views);

    let stdin = io::stdin();
    let stdout = io::stdout();

    run(&mut sessions, stdin.lock(), stdout.lock())
}

/// An event received from the UI boundary.
#[derive(Debug, PartialEq, Eq)]
enum Event<'a> {
    Route(&'a str),
    Control { id: &'a str, value: i32 },
    Quit,
}

impl<'a> Event<'a> {
    fn parse(line: &'a str) -> Result<Event<'a>, String> {
        let mut parts = line.split_whitespace();

        match (parts.next(), parts.next(), parts.next(), parts.next()) {
            (Some("route"), Some(key), None, None) => Ok(Event::Route(key)),
            (Some("control"), Some(id), Some(value), None) => value
                .parse()
                .map(|value| Event::Control { id, value })
                .map_err(|_| format!("`{value}` is not a valid control value")),
            (Some("quit"), None, None, None) => Ok(Event::Quit),
            _ => Err(format!("`{line}` is not a valid event")),
        }
    }
}

fn run<R, W>(sessions: &mut Sessions, input: R, mut output: W) -> Result<(), CliError>
where
    R: BufRead,
    W: Write,
{
    let (session, outcome) = sessions.open();
    let result =
        emit(&mut output, &outcome).and_then(|()| replay(sessions, session, input, output));

    close(sessions, session);
    result
}

fn replay<R, W>(
    sessions: &mut Sessions,
    session: Id,
    mut input: R,
    mut output: W,
) -> Result<(), CliError>
where
    R: BufRead,
    W: Write,
{
    let mut buf = Vec::new();

    loop {
        buf.clear();
        if input.read_until(b'\n', &mut buf)? == 0 {
            return Ok(());
        }

        let line = String::from_utf8_lossy(&buf);
        let line = line.trim();

        if line.is_empty() {
            continue;
        }

        let outcome = match Event::parse(line) {
            Ok(Event::Route(key)) => sessions.route_changed(session, key),
            Ok(Event::Control { id, value }) => sessions.control_changed(session, id, value),
            Ok(Event::Quit) => return Ok(()),
            Err(message) => {
                warn!(%message, "skipping malformed event");
                continue;
            }
        };

        if let Some(outcome) = outcome {
            emit(&mut output, &outcome)?;
        }
    }
}

fn emit<W: Write>(output: &mut W, outcome: &Outcome) -> Result<(), CliError> {
    serde_json::to_writer(&mut *output, outcome)?;
    writeln!(output)?;
    output.flush()?;

    Ok(())
}

fn close(sessions: &mut Sessions, session: Id) {
    if sessions.close(session) {
        info!(remaining = sessions.len(), "session finished");
    }
}
