use std::io::Write;

use clap::Args;
use tempo_core::timer::{FLEX_MAX_MINUTES, FLEX_MIN_MINUTES};
use tempo_core::{
    Config, Event, Mode, Preset, SessionRuntime, Snapshot, TimerState, ValidationError,
    BREAK_IDEAS,
};
use tracing::debug;

use super::{build_controller, runtime};

#[derive(Args)]
pub struct RunArgs {
    /// Session mode: momentum, sprint or flex
    mode: Mode,
    /// Preset number within the mode (see `tempo presets`)
    #[arg(long, short, default_value_t = 1)]
    preset: usize,
    /// Minutes for flex mode (1-60, defaults to timer.flex_minutes)
    #[arg(long, short)]
    minutes: Option<u32>,
    /// Print every snapshot as a JSON line
    #[arg(long)]
    json: bool,
}

/// Resolve a CLI selection to a catalog entry.
pub(crate) fn resolve_preset(
    mode: Mode,
    number: usize,
    minutes: Option<u32>,
    config: &Config,
) -> Result<Preset, ValidationError> {
    match mode {
        Mode::Flex => {
            let Some(minutes) = minutes else {
                return Ok(config.flex_preset());
            };
            if !(FLEX_MIN_MINUTES..=FLEX_MAX_MINUTES).contains(&minutes) {
                return Err(ValidationError::InvalidValue {
                    field: "minutes".into(),
                    message: format!(
                        "{minutes} is outside {FLEX_MIN_MINUTES}-{FLEX_MAX_MINUTES}"
                    ),
                });
            }
            Ok(Preset::flex(minutes))
        }
        Mode::Momentum | Mode::Sprint => {
            let index = number.checked_sub(1).ok_or(ValidationError::InvalidValue {
                field: "preset".into(),
                message: "preset numbers start at 1".into(),
            })?;
            mode.preset(index)
        }
    }
}

fn render(snapshot: &Snapshot, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    if json {
        println!("{}", serde_json::to_string(snapshot)?);
        return Ok(());
    }
    let mut out = std::io::stdout().lock();
    write!(
        out,
        "\r{:>6}  [{:>3.0}%]  energy {:>3}%  ",
        snapshot.display, snapshot.progress_pct, snapshot.energy
    )?;
    out.flush()?;
    Ok(())
}

pub fn run(args: RunArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let preset = resolve_preset(args.mode, args.preset, args.minutes, &config)?;
    runtime()?.block_on(run_session(&config, preset, args.json))
}

async fn run_session(
    config: &Config,
    preset: Preset,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let (handle, task) = SessionRuntime::spawn(build_controller(config), config.tick_period());
    let mut snapshots = handle.watch_snapshots();

    let started = handle.start_preset(preset).await?;
    if let Some(Event::StartRejected {
        energy_cost, energy, ..
    }) = started.event
    {
        handle.shutdown().await?;
        return Err(
            format!("not enough energy for {preset}: needs {energy_cost}, have {energy}").into(),
        );
    }
    debug!(%preset, "session running");
    render(&started.snapshot, json)?;
    let _ = snapshots.borrow_and_update();
    let initial_count = started.snapshot.session_count;

    let completed = loop {
        tokio::select! {
            changed = snapshots.changed() => {
                if changed.is_err() {
                    break false;
                }
                let snapshot = snapshots.borrow_and_update().clone();
                render(&snapshot, json)?;
                if snapshot.state == TimerState::Idle {
                    break snapshot.session_count > initial_count;
                }
            }
            _ = tokio::signal::ctrl_c() => {
                let stopped = handle.stop().await?;
                render(&stopped.snapshot, json)?;
                break false;
            }
        }
    };

    handle.shutdown().await?;
    let controller = task.await?;
    if !json {
        println!();
    }

    if completed {
        eprintln!(
            "Session complete. Sessions: {}  Energy: {}%",
            controller.session_count(),
            controller.energy()
        );
        eprintln!("Break ideas:");
        for idea in BREAK_IDEAS {
            eprintln!("  {} {} - {}", idea.icon, idea.title, idea.hint);
        }
    } else {
        eprintln!("Session stopped.");
    }
    Ok(())
}
