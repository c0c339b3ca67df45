use std::io::{Stdout, stdout};
use std::time::Duration;

use color_eyre::eyre::Result;
use crossterm::event::{Event as CrosstermEvent, EventStream, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
    is_raw_mode_enabled,
};
use futures::StreamExt;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use super::event::Event;

pub type Tui = Terminal<CrosstermBackend<Stdout>>;

// Fast enough for the spinner; message expiry piggybacks on these frames.
const FRAME_INTERVAL: Duration = Duration::from_millis(80);

/// The alternate-screen terminal plus the task feeding it input.
pub struct TuiSession {
    terminal: Tui,
    events: UnboundedReceiver<Event>,
    sender: UnboundedSender<Event>,
    input_task: Option<JoinHandle<()>>,
    shutdown: CancellationToken,
}

impl TuiSession {
    pub fn new() -> Result<Self> {
        let terminal = Terminal::new(CrosstermBackend::new(stdout()))?;
        let (sender, events) = mpsc::unbounded_channel();

        Ok(Self {
            terminal,
            events,
            sender,
            input_task: None,
            shutdown: CancellationToken::new(),
        })
    }

    pub fn enter(&mut self) -> Result<()> {
        enable_raw_mode()?;
        execute!(stdout(), EnterAlternateScreen)?;
        self.input_task = Some(tokio::spawn(pump_events(
            self.sender.clone(),
            self.shutdown.clone(),
        )));
        Ok(())
    }

    pub fn exit(&mut self) -> Result<()> {
        self.shutdown.cancel();
        if let Some(task) = self.input_task.take() {
            task.abort();
        }
        if is_raw_mode_enabled()? {
            execute!(stdout(), LeaveAlternateScreen)?;
            disable_raw_mode()?;
        }
        Ok(())
    }

    pub async fn next_event(&mut self) -> Option<Event> {
        self.events.recv().await
    }

    pub fn terminal(&mut self) -> &mut Tui {
        &mut self.terminal
    }
}

async fn pump_events(sender: UnboundedSender<Event>, shutdown: CancellationToken) {
    let mut input = EventStream::new();
    let mut frames = tokio::time::interval(FRAME_INTERVAL);

    if sender.send(Event::Init).is_err() {
        return;
    }

    loop {
        let event = tokio::select! {
            () = shutdown.cancelled() => break,
            _ = frames.tick() => Event::Render,
            next = input.next() => match next {
                Some(Ok(raw)) => match translate(raw) {
                    Some(event) => event,
                    None => continue,
                },
                Some(Err(e)) => {
                    tracing::warn!(error = %e, "terminal event stream failed");
                    break;
                }
                None => break,
            },
        };

        if sender.send(event).is_err() {
            break;
        }
    }
}

/// Key releases, mouse, focus and paste events are not used.
fn translate(raw: CrosstermEvent) -> Option<Event> {
    match raw {
        CrosstermEvent::Key(key) if matches!(key.kind, KeyEventKind::Press | KeyEventKind::Repeat) => {
            Some(Event::Key(key))
        }
        CrosstermEvent::Resize(width, height) => Some(Event::Resize(width, height)),
        _ => None,
    }
}
