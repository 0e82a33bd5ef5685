//! TUI runtime: owns the terminal, runs the event loop, executes effects.
//!
//! This is the boundary where side effects happen. The reducer returns
//! effects; handlers run them on tokio and report back through the inbox.

mod handlers;
mod inbox;

use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use chatdeck_core::config::Config;
use chatdeck_core::responder::{PlaceholderResponder, Responder};
use crossterm::event;
use inbox::{UiEventReceiver, UiEventSender};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::common::{TaskCompleted, TaskId, TaskKind, TaskMeta, TaskStarted};
use crate::effects::UiEffect;
use crate::events::UiEvent;
use crate::state::AppState;
use crate::terminal::{self, Tui};
use crate::{render, update};

/// Tick interval while something is animating.
pub const FRAME_DURATION: Duration = Duration::from_millis(50);

/// Tick interval when idle.
pub const IDLE_POLL_DURATION: Duration = Duration::from_millis(250);

pub struct TuiRuntime {
    terminal: Tui,
    pub state: AppState,
    responder: Arc<dyn Responder>,
    inbox_tx: UiEventSender,
    inbox_rx: UiEventReceiver,
    last_tick: Instant,
}

impl TuiRuntime {
    pub fn new(config: Config) -> Result<Self> {
        let responder: Arc<dyn Responder> = Arc::new(PlaceholderResponder::from_config(&config));
        Self::with_responder(config, responder)
    }

    pub fn with_responder(config: Config, responder: Arc<dyn Responder>) -> Result<Self> {
        terminal::install_panic_hook();
        let terminal = terminal::setup_terminal().context("Failed to setup terminal")?;
        let (inbox_tx, inbox_rx) = inbox::channel();

        Ok(Self {
            terminal,
            state: AppState::new(config),
            responder,
            inbox_tx,
            inbox_rx,
            last_tick: Instant::now(),
        })
    }

    /// Runs until the user quits.
    pub fn run(&mut self) -> Result<()> {
        info!("tui started");
        let mut dirty = true;

        while !self.state.should_quit {
            let events = self.collect_events()?;
            if !events.is_empty() {
                dirty = true;
            }
            for event in events {
                let effects = update::update(&mut self.state, event);
                self.execute_effects(effects);
            }

            if dirty {
                self.terminal
                    .draw(|frame| render::render(&self.state, frame))
                    .context("Failed to draw frame")?;
                dirty = false;
            }
        }

        info!("tui stopped");
        Ok(())
    }

    // ========================================================================
    // Event collection
    // ========================================================================

    fn collect_events(&mut self) -> Result<Vec<UiEvent>> {
        let mut events = Vec::new();

        while let Ok(ev) = self.inbox_rx.try_recv() {
            events.push(ev);
        }

        let animating = self.state.tasks.is_any_running()
            || self.state.manager.composer().is_busy()
            || self.state.manager.is_refreshing();
        let tick_interval = if animating {
            FRAME_DURATION
        } else {
            IDLE_POLL_DURATION
        };

        let poll_duration = if events.is_empty() {
            tick_interval.saturating_sub(self.last_tick.elapsed())
        } else {
            Duration::ZERO
        };

        if event::poll(poll_duration)? {
            events.push(UiEvent::Terminal(event::read()?));
            while event::poll(Duration::ZERO)? {
                events.push(UiEvent::Terminal(event::read()?));
            }
        }

        if self.last_tick.elapsed() >= tick_interval {
            events.push(UiEvent::Tick);
            self.last_tick = Instant::now();
        }

        Ok(events)
    }

    // ========================================================================
    // Effect dispatch
    // ========================================================================

    fn execute_effects(&mut self, effects: Vec<UiEffect>) {
        for effect in effects {
            self.execute_effect(effect);
        }
    }

    /// Spawns `f` with a uniform TaskStarted/TaskCompleted lifecycle.
    fn spawn_task<F, Fut>(&self, kind: TaskKind, id: TaskId, meta: TaskMeta, cancelable: bool, f: F)
    where
        F: FnOnce(Option<CancellationToken>) -> Fut + Send + 'static,
        Fut: Future<Output = UiEvent> + Send + 'static,
    {
        let tx = self.inbox_tx.clone();
        let cancel = cancelable.then(CancellationToken::new);
        let started = TaskStarted {
            id,
            cancel: cancel.clone(),
            meta,
        };
        let _ = tx.send(UiEvent::TaskStarted { kind, started });
        tokio::spawn(async move {
            let result = f(cancel).await;
            let completed = TaskCompleted {
                id,
                result: Box::new(result),
            };
            let _ = tx.send(UiEvent::TaskCompleted { kind, completed });
        });
    }

    fn execute_effect(&mut self, effect: UiEffect) {
        match effect {
            UiEffect::Quit => {
                self.state.should_quit = true;
            }
            UiEffect::ScheduleReply { task, ticket } => {
                let responder = Arc::clone(&self.responder);
                let meta = TaskMeta::Reply {
                    session_id: ticket.session_id,
                };
                self.spawn_task(TaskKind::Reply, task, meta, false, move |_| {
                    handlers::deliver_reply(responder, ticket)
                });
            }
            UiEffect::ScheduleRefresh { task } => {
                let delay = self.state.config.refresh_delay();
                self.spawn_task(TaskKind::PromptRefresh, task, TaskMeta::None, false, move |_| {
                    handlers::finish_refresh(delay)
                });
            }
            UiEffect::LoadImage { task, path } => {
                let meta = TaskMeta::ImageLoad {
                    path: path.display().to_string(),
                };
                self.spawn_task(TaskKind::ImageLoad, task, meta, true, move |cancel| {
                    handlers::load_image(path, cancel)
                });
            }
            UiEffect::CancelTask { kind, token } => {
                if let Some(cancel) = token {
                    debug!(?kind, "cancelling task");
                    cancel.cancel();
                }
            }
        }
    }
}

impl Drop for TuiRuntime {
    fn drop(&mut self) {
        let _ = terminal::restore_terminal();
    }
}
