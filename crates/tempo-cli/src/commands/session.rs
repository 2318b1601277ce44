//! Interactive session: one command per stdin line, one JSON snapshot per
//! applied command on stdout.
//!
//! ```text
//! momentum [N]   start momentum preset N (default 1)
//! sprint [N]     start sprint preset N (default 1)
//! flex [M]       start a flex session of M minutes
//! pause | resume | stop
//! status | presets | quit
//! ```

use clap::Args;
use tempo_core::{
    Command, Config, Event, Mode, RuntimeHandle, SessionRuntime, ValidationError, BREAK_IDEAS,
};
use tokio::io::{AsyncBufReadExt, BufReader};

use super::run::resolve_preset;
use super::{build_controller, presets, runtime};

#[derive(Args)]
pub struct SessionArgs {
    /// Also print a snapshot on every tick
    #[arg(long)]
    follow: bool,
}

#[derive(Debug, PartialEq)]
pub(crate) enum Input {
    Command(Command),
    Status,
    Presets,
    Quit,
}

fn parse_number<T: std::str::FromStr>(field: &str, raw: &str) -> Result<T, ValidationError> {
    raw.parse().map_err(|_| ValidationError::InvalidValue {
        field: field.into(),
        message: format!("'{raw}' is not a number"),
    })
}

/// Parse one input line. Blank lines yield `None`.
pub(crate) fn parse_line(line: &str, config: &Config) -> Result<Option<Input>, ValidationError> {
    let mut words = line.split_whitespace();
    let Some(head) = words.next() else {
        return Ok(None);
    };
    let arg = words.next();

    if let Ok(mode) = head.parse::<Mode>() {
        let preset = match mode {
            Mode::Flex => {
                let minutes = arg.map(|m| parse_number("minutes", m)).transpose()?;
                resolve_preset(mode, 1, minutes, config)?
            }
            Mode::Momentum | Mode::Sprint => {
                let number = arg.map(|n| parse_number("preset", n)).transpose()?;
                resolve_preset(mode, number.unwrap_or(1), None, config)?
            }
        };
        return Ok(Some(Input::Command(Command::StartPreset(preset))));
    }

    let input = match head.to_lowercase().as_str() {
        "pause" => Input::Command(Command::Pause),
        "resume" => Input::Command(Command::Resume),
        "stop" => Input::Command(Command::Stop),
        "status" => Input::Status,
        "presets" => Input::Presets,
        "quit" | "exit" => Input::Quit,
        other => {
            return Err(ValidationError::InvalidValue {
                field: "command".into(),
                message: format!("unknown command '{other}'"),
            })
        }
    };
    Ok(Some(input))
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string(value)?);
    Ok(())
}

pub fn run(args: SessionArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    runtime()?.block_on(drive(config, args.follow))
}

async fn handle_input(
    input: Input,
    handle: &RuntimeHandle,
) -> Result<bool, Box<dyn std::error::Error>> {
    match input {
        Input::Quit => return Ok(false),
        Input::Status => print_json(&handle.snapshot())?,
        Input::Presets => print_json(&presets::rows(handle.snapshot().energy))?,
        Input::Command(command) => {
            let outcome = handle.call(command).await?;
            if let Some(Event::StartRejected {
                energy_cost, energy, ..
            }) = &outcome.event
            {
                eprintln!("not enough energy: needs {energy_cost}, have {energy}");
            }
            print_json(&outcome.snapshot)?;
        }
    }
    Ok(true)
}

async fn drive(config: Config, follow: bool) -> Result<(), Box<dyn std::error::Error>> {
    let (handle, task) = SessionRuntime::spawn(build_controller(&config), config.tick_period());
    let mut events = handle.subscribe_events();
    let mut snapshots = handle.watch_snapshots();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                match parse_line(&line, &config) {
                    Ok(None) => {}
                    Ok(Some(input)) => {
                        if !handle_input(input, &handle).await? {
                            break;
                        }
                        let _ = snapshots.borrow_and_update();
                    }
                    Err(e) => eprintln!("error: {e}"),
                }
            }
            event = events.recv() => {
                if let Ok(event @ Event::SessionCompleted { .. }) = event {
                    print_json(&event)?;
                    for idea in BREAK_IDEAS {
                        eprintln!("  {} {} - {}", idea.icon, idea.title, idea.hint);
                    }
                }
            }
            changed = snapshots.changed(), if follow => {
                if changed.is_err() {
                    break;
                }
                let snapshot = snapshots.borrow_and_update().clone();
                print_json(&snapshot)?;
            }
        }
    }

    handle.shutdown().await?;
    task.await?;
    Ok(())
}
