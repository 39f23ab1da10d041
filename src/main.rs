//! bottombar demo shell
//!
//! Drives a bottom sheet through a scripted session - expand button, an
//! upward fling, a scrim tap - on a calloop event loop with a 60 fps frame
//! timer, logging every observer event. Useful for eyeballing the settle
//! behavior and the event stream without a host UI.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::path::PathBuf;
use std::rc::Rc;
use std::time::{Duration, Instant};

use anyhow::Result;
use calloop::timer::{TimeoutAction, Timer};
use calloop::EventLoop;
use clap::Parser;
use tracing::info;
use tracing_appender::rolling;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use bottombar::{
    BottomSheet, PanelObserver, PanelPosition, PanelTuning, SheetState, TouchEvent, TouchPhase,
};

#[derive(Parser, Debug)]
#[command(name = "bottombar-demo")]
#[command(about = "Scripted demo session for the bottom sheet engine", long_about = None)]
struct Args {
    /// Enable verbose debug output
    #[arg(short, long)]
    debug: bool,

    /// Tuning overrides (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

/// Logs every sheet event as it is broadcast.
struct EventLogger;

impl PanelObserver<SheetState> for EventLogger {
    fn on_opened(&mut self) {
        info!("sheet opened");
    }
    fn on_closed(&mut self) {
        info!("sheet closed");
    }
    fn on_released(&mut self) {
        info!("sheet released");
    }
    fn on_offset_changed(&mut self, offset: f64, fraction: f64) {
        info!(offset, fraction, "offset changed");
    }
    fn on_state_changed(&mut self, position: PanelPosition<SheetState>) {
        info!(?position, "state changed");
    }
    fn on_layout_changed(&mut self, window_height: f64, container_height: f64) {
        info!(window_height, container_height, "layout changed");
    }
}

enum Action {
    Touch(TouchPhase, f64, f64),
    ExpandButton,
    ScrimTap,
}

struct Step {
    at: Duration,
    action: Action,
}

struct App {
    sheet: BottomSheet,
    script: VecDeque<Step>,
    started: Instant,
}

impl App {
    fn run_due_steps(&mut self, now: Instant) {
        let elapsed = now.duration_since(self.started);
        while self.script.front().is_some_and(|s| s.at <= elapsed) {
            let Some(step) = self.script.pop_front() else {
                break;
            };
            match step.action {
                Action::Touch(phase, x, y) => {
                    self.sheet
                        .handle_touch(&TouchEvent::new(phase, x, y, now));
                }
                Action::ExpandButton => self.sheet.on_expand_button_pressed(now),
                Action::ScrimTap => self.sheet.on_scrim_tapped(now),
            }
        }
    }

    fn is_done(&self) -> bool {
        self.script.is_empty() && !self.sheet.is_running_settle_animation()
    }
}

/// The scripted session: open halfway, fling to full, dismiss.
fn demo_script() -> VecDeque<Step> {
    let mut script = VecDeque::new();
    let mut push = |ms: u64, action: Action| {
        script.push_back(Step {
            at: Duration::from_millis(ms),
            action,
        });
    };

    push(0, Action::ExpandButton);

    // Upward fling from the middle of the screen.
    push(600, Action::Touch(TouchPhase::Down, 540.0, 1600.0));
    for (i, ms) in (616..=680).step_by(16).enumerate() {
        let y = 1600.0 - (i as f64 + 1.0) * 40.0;
        push(ms, Action::Touch(TouchPhase::Move, 540.0, y));
    }
    push(700, Action::Touch(TouchPhase::Up, 540.0, 1380.0));

    push(1600, Action::ScrimTap);
    script
}

fn main() -> Result<()> {
    // Log panics before crashing.
    std::panic::set_hook(Box::new(|panic_info| {
        eprintln!("PANIC: {}", panic_info);
        if let Ok(home) = std::env::var("HOME") {
            let crash_log = format!("{}/.local/state/bottombar/crash.log", home);
            if let Ok(mut f) = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(&crash_log)
            {
                use std::io::Write;
                let _ = writeln!(f, "[{}] PANIC: {}", chrono::Local::now(), panic_info);
            }
        }
    }));

    // Log directory (~/.local/state/bottombar or /tmp/bottombar).
    let log_dir = std::env::var("XDG_STATE_HOME")
        .map(PathBuf::from)
        .or_else(|_| std::env::var("HOME").map(|h| PathBuf::from(h).join(".local/state")))
        .unwrap_or_else(|_| PathBuf::from("/tmp"))
        .join("bottombar");

    std::fs::create_dir_all(&log_dir).ok();

    let args = Args::parse();

    let file_appender = rolling::daily(&log_dir, "demo.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    // Quiet by default, verbose with --debug.
    let default_filter = if args.debug {
        "debug,bottombar=debug"
    } else {
        "warn,bottombar=info"
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
        .init();

    let tuning = match &args.config {
        Some(path) => PanelTuning::load(path)?,
        None => PanelTuning::default(),
    };

    let mut sheet = BottomSheet::new(tuning);
    sheet.set_toolbar_height(56.0);
    sheet.set_container_size(1080.0, 2280.0);
    sheet.add_observer(Rc::new(RefCell::new(EventLogger)));

    info!(log_path = %log_dir.display(), "bottombar demo starting");

    let mut event_loop: EventLoop<App> = EventLoop::try_new()?;
    let signal = event_loop.get_signal();

    event_loop
        .handle()
        .insert_source(Timer::immediate(), move |_deadline, _, app: &mut App| {
            let now = Instant::now();
            app.run_due_steps(now);
            app.sheet.tick(now);
            if app.is_done() {
                signal.stop();
                return TimeoutAction::Drop;
            }
            TimeoutAction::ToDuration(Duration::from_millis(16))
        })
        .expect("failed to insert frame timer");

    let mut app = App {
        sheet,
        script: demo_script(),
        started: Instant::now(),
    };
    event_loop.run(None, &mut app, |_| {})?;

    info!("demo finished");
    Ok(())
}
