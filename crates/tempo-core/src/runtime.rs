//! Async driver for a [`SessionController`].
//!
//! One tokio task owns the controller. Commands arrive over an `mpsc`
//! channel, optionally with a reply slot for the resulting [`Outcome`]. The
//! latest [`Snapshot`] is published on a `watch` channel after every command
//! and tick, and events fan out over a `broadcast` channel.
//!
//! The ticker mirrors the controller's [`TickToken`]: whenever the token
//! changes the old `Interval` is dropped before a new one is created, and
//! while no token is live there is no interval at all. At most one ticker
//! exists at any moment.

use std::time::Duration;

use tokio::sync::{broadcast, mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, Interval, MissedTickBehavior};
use tracing::debug;

use crate::error::RuntimeError;
use crate::events::{Event, Snapshot};
use crate::timer::{Mode, Outcome, Preset, SessionController, TickToken};

pub const DEFAULT_TICK_PERIOD: Duration = Duration::from_secs(1);

const COMMAND_BUFFER: usize = 32;
const EVENT_BUFFER: usize = 64;

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Raw start; the cost is clamped rather than gated.
    Start {
        mode: Mode,
        minutes: u32,
        energy_cost: u32,
    },
    /// Gated start from a catalog entry.
    StartPreset(Preset),
    Pause,
    Resume,
    Stop,
    Shutdown,
}

#[derive(Debug)]
struct Request {
    command: Command,
    reply: Option<oneshot::Sender<Outcome>>,
}

/// Cloneable handle for sending commands and observing state.
#[derive(Debug, Clone)]
pub struct RuntimeHandle {
    commands: mpsc::Sender<Request>,
    snapshots: watch::Receiver<Snapshot>,
    events: broadcast::Sender<Event>,
}

impl RuntimeHandle {
    /// Queue a command without waiting for it to be applied.
    pub async fn send(&self, command: Command) -> Result<(), RuntimeError> {
        self.commands
            .send(Request {
                command,
                reply: None,
            })
            .await?;
        Ok(())
    }

    /// Apply a command and wait for its outcome.
    pub async fn call(&self, command: Command) -> Result<Outcome, RuntimeError> {
        let (reply, rx) = oneshot::channel();
        self.commands
            .send(Request {
                command,
                reply: Some(reply),
            })
            .await?;
        rx.await.map_err(|_| RuntimeError::Closed)
    }

    /// Raw start: never rejected, the cost is floored at zero energy.
    pub async fn start(
        &self,
        mode: Mode,
        minutes: u32,
        energy_cost: u32,
    ) -> Result<Outcome, RuntimeError> {
        self.call(Command::Start {
            mode,
            minutes,
            energy_cost,
        })
        .await
    }

    pub async fn start_preset(&self, preset: Preset) -> Result<Outcome, RuntimeError> {
        self.call(Command::StartPreset(preset)).await
    }

    pub async fn pause(&self) -> Result<Outcome, RuntimeError> {
        self.call(Command::Pause).await
    }

    pub async fn resume(&self) -> Result<Outcome, RuntimeError> {
        self.call(Command::Resume).await
    }

    pub async fn stop(&self) -> Result<Outcome, RuntimeError> {
        self.call(Command::Stop).await
    }

    pub async fn shutdown(&self) -> Result<(), RuntimeError> {
        self.send(Command::Shutdown).await
    }

    /// Latest published snapshot.
    pub fn snapshot(&self) -> Snapshot {
        self.snapshots.borrow().clone()
    }

    pub fn watch_snapshots(&self) -> watch::Receiver<Snapshot> {
        self.snapshots.clone()
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<Event> {
        self.events.subscribe()
    }
}

pub struct SessionRuntime {
    controller: SessionController,
    commands: mpsc::Receiver<Request>,
    snapshots: watch::Sender<Snapshot>,
    events: broadcast::Sender<Event>,
    period: Duration,
    ticker: Option<(TickToken, Interval)>,
}

impl SessionRuntime {
    /// Spawn the runtime on the current tokio runtime.
    ///
    /// The join handle yields the controller back once the runtime shuts
    /// down, either through [`Command::Shutdown`] or when every handle has
    /// been dropped.
    pub fn spawn(
        controller: SessionController,
        period: Duration,
    ) -> (RuntimeHandle, JoinHandle<SessionController>) {
        let (command_tx, command_rx) = mpsc::channel(COMMAND_BUFFER);
        let (snapshot_tx, snapshot_rx) = watch::channel(controller.snapshot());
        let (event_tx, _) = broadcast::channel(EVENT_BUFFER);

        let runtime = SessionRuntime {
            controller,
            commands: command_rx,
            snapshots: snapshot_tx,
            events: event_tx.clone(),
            period,
            ticker: None,
        };
        let handle = RuntimeHandle {
            commands: command_tx,
            snapshots: snapshot_rx,
            events: event_tx,
        };
        (handle, tokio::spawn(runtime.run()))
    }

    async fn run(mut self) -> SessionController {
        loop {
            self.sync_ticker();
            tokio::select! {
                biased;
                request = self.commands.recv() => match request {
                    Some(Request { command: Command::Shutdown, .. }) | None => break,
                    Some(Request { command, reply }) => {
                        let outcome = self.apply(command);
                        // Publish first so a caller woken by the reply
                        // already sees this snapshot on the watch channel.
                        self.publish(&outcome);
                        if let Some(reply) = reply {
                            // Caller may have stopped waiting.
                            let _ = reply.send(outcome);
                        }
                    }
                },
                token = next_tick(&mut self.ticker) => {
                    let outcome = self.controller.tick_with(token);
                    self.publish(&outcome);
                }
            }
        }
        debug!("session runtime shutting down");
        self.controller
    }

    fn apply(&mut self, command: Command) -> Outcome {
        match command {
            Command::Start {
                mode,
                minutes,
                energy_cost,
            } => self.controller.start(mode, minutes, energy_cost),
            Command::StartPreset(preset) => self.controller.start_preset(&preset),
            Command::Pause => self.controller.pause(),
            Command::Resume => self.controller.resume(),
            Command::Stop | Command::Shutdown => self.controller.stop(),
        }
    }

    fn publish(&mut self, outcome: &Outcome) {
        self.snapshots.send_replace(outcome.snapshot.clone());
        if let Some(event) = &outcome.event {
            // No subscribers is fine.
            let _ = self.events.send(event.clone());
        }
    }

    /// Cancel-before-resubscribe: drop the old interval whenever the
    /// controller's token no longer matches it.
    fn sync_ticker(&mut self) {
        let wanted = self.controller.tick_token();
        let current = self.ticker.as_ref().map(|(token, _)| *token);
        if wanted == current {
            return;
        }
        self.ticker = None;
        if let Some(token) = wanted {
            let mut interval = interval_at(Instant::now() + self.period, self.period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            self.ticker = Some((token, interval));
            debug!(?token, "tick subscription armed");
        }
    }
}

async fn next_tick(ticker: &mut Option<(TickToken, Interval)>) -> TickToken {
    match ticker {
        Some((token, interval)) => {
            interval.tick().await;
            *token
        }
        None => std::future::pending().await,
    }
}
