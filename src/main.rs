//! Terminal candy runner (default binary).
//!
//! It uses crossterm for input and the framebuffer renderer from the `term`
//! crate. The engine is stepped one phase per pacing interval so every match,
//! clear and refill is visible.

use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::event::{self, Event, KeyEventKind};
use tracing::debug;

use candy_cascade::core::{EngineConfig, EngineError, Level};
use candy_cascade::input::{handle_key_event, should_quit, Cursor, Request};
use candy_cascade::logging;
use candy_cascade::term::{FrameBuffer, GameView, HudView, TerminalRenderer, Viewport};
use candy_cascade::types::Pos;

/// Delay between two cascade phases
const STEP_MS: u64 = 140;
/// Input poll timeout while idle
const IDLE_POLL_MS: u64 = 250;

fn main() -> Result<()> {
    logging::init_from_env()?;

    let config = EngineConfig::from_env();
    config.validate()?;

    let mut term = TerminalRenderer::new();
    term.enter()?;

    let result = run(&mut term, config);

    // Always try to restore terminal state.
    let _ = term.exit();
    result
}

struct App {
    config: EngineConfig,
    level: Level,
    cursor: Cursor,
    hint: Option<(Pos, Pos)>,
}

impl App {
    fn new(config: EngineConfig) -> Result<Self> {
        let level = Level::from_config(&config)?;
        Ok(Self {
            cursor: Cursor::new(config.size),
            config,
            level,
            hint: None,
        })
    }

    fn restart(&mut self) -> Result<()> {
        // A fixed seed would replay the same board; move on to the next one.
        self.config.seed = self.level.engine().seed().map(|s| s.wrapping_add(1));
        *self = Self::new(self.config)?;
        Ok(())
    }

    fn hud(&self) -> HudView {
        HudView {
            cursor: self.cursor.pos(),
            selected: self.cursor.selected(),
            hint: self.hint,
            moves_left: self.level.moves_left(),
            target_score: self.level.config().target_score,
            status: self.level.status(),
        }
    }

    fn handle(&mut self, request: Request) -> Result<()> {
        let result = match request {
            Request::Swap { from, to } => self.level.begin_swap(from, to).map(|start| {
                debug!(?from, ?to, ?start, "player swap");
            }),
            Request::ColorBomb => self.level.begin_color_bomb(None),
            Request::AutoMove => self.level.begin_automatic_moves(1),
            Request::Hint => {
                self.hint = self.level.hint();
                if let Some((a, _)) = self.hint {
                    self.cursor.jump_to(a);
                }
                Ok(())
            }
            Request::Restart => return self.restart(),
        };

        match result {
            Ok(()) => {
                if !matches!(request, Request::Hint) {
                    self.hint = None;
                }
            }
            Err(e @ (EngineError::Busy | EngineError::LevelOver)) => {
                debug!(error = %e, ?request, "request ignored");
            }
            Err(e) => return Err(e.into()),
        }
        Ok(())
    }
}

fn run(term: &mut TerminalRenderer, config: EngineConfig) -> Result<()> {
    let mut app = App::new(config)?;
    let view = GameView::default();
    let mut fb = FrameBuffer::new(0, 0);

    let step_every = Duration::from_millis(STEP_MS);
    let mut last_step = Instant::now();

    loop {
        // Render.
        let (w, h) = crossterm::terminal::size().unwrap_or((80, 24));
        view.render_into(&app.level.snapshot(), &app.hud(), Viewport::new(w, h), &mut fb);
        term.present(&mut fb)?;

        // Input, waiting at most until the next cascade phase is due.
        let timeout = if app.level.engine().is_busy() {
            step_every.saturating_sub(last_step.elapsed())
        } else {
            Duration::from_millis(IDLE_POLL_MS)
        };

        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    if should_quit(key) {
                        return Ok(());
                    }
                    if let Some(request) = handle_key_event(key).and_then(|a| app.cursor.apply(a)) {
                        app.handle(request)?;
                        last_step = Instant::now();
                    }
                }
                Event::Resize(_, _) => term.invalidate(),
                _ => {}
            }
        }

        // Step.
        if app.level.engine().is_busy() && last_step.elapsed() >= step_every {
            last_step = Instant::now();
            if let Some(event) = app.level.step() {
                debug!(?event, "step");
            }
        }
    }
}
