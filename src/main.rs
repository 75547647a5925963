// Copyright (c) 2026 rezky_nightky

mod cell;
mod collision;
mod color;
mod config;
mod font;
mod frame;
mod mover;
mod rain;
mod raindrop;
mod render;
mod runtime;
mod scene;
mod shelter;
mod terminal;
mod viewport;

use std::env;
use std::fs::File;
use std::time::{Duration, Instant};

#[cfg(unix)]
use std::thread;

use clap::builder::styling::{AnsiColor as ClapAnsiColor, Color as ClapColor};
use clap::builder::styling::{Effects as ClapEffects, Style as ClapStyle};
use clap::builder::Styles as ClapStyles;
use clap::{CommandFactory, FromArgMatches};
use crossterm::event::{Event, KeyEventKind};
use rand::{rngs::StdRng, SeedableRng};

#[cfg(unix)]
use signal_hook::consts::{SIGHUP, SIGINT, SIGTERM};
#[cfg(unix)]
use signal_hook::iterator::Signals;

use crate::cell::Cell;
use crate::config::{
    color_enabled_stdout, Args, SceneConfig, BORDER_COLOR, HUD_FONT_PATH, KEYS_USAGE,
    MAX_FRAME_DELTA,
};
use crate::font::Font;
use crate::frame::Frame;
use crate::render::TermCanvas;
use crate::runtime::{ColorMode, DisplayMode, KeyAction, SceneKind};
use crate::scene::Scene;
use crate::terminal::{restore_terminal_best_effort, Terminal};
use crate::viewport::Viewport;

const HELP_TEMPLATE_PLAIN: &str = "\
{before-help}{about-with-newline}
USAGE:
  {usage}

{all-args}{after-help}";

const HELP_TEMPLATE_COLOR: &str = "\
{before-help}{about-with-newline}
\x1b[1;36mUSAGE:\x1b[0m
  {usage}

{all-args}{after-help}";

fn build_info() -> &'static str {
    env!("DRIZZLE_BUILD")
}

fn clap_styles() -> ClapStyles {
    ClapStyles::styled()
        .header(
            ClapStyle::new()
                .effects(ClapEffects::BOLD)
                .fg_color(Some(ClapColor::Ansi(ClapAnsiColor::Cyan))),
        )
        .usage(
            ClapStyle::new()
                .effects(ClapEffects::BOLD)
                .fg_color(Some(ClapColor::Ansi(ClapAnsiColor::Green))),
        )
        .literal(ClapStyle::new().fg_color(Some(ClapColor::Ansi(ClapAnsiColor::Yellow))))
        .placeholder(ClapStyle::new().fg_color(Some(ClapColor::Ansi(ClapAnsiColor::Magenta))))
}

fn require_f64_range(name: &str, v: f64, min: f64, max: f64) -> f64 {
    if !v.is_finite() {
        eprintln!("failed to apply {} {} (must be a finite number)", name, v);
        std::process::exit(1);
    }
    if v < min || v > max {
        eprintln!("failed to apply {} {} (min {} max {})", name, v, min, max);
        std::process::exit(1);
    }
    v
}

fn detect_color_mode_auto() -> ColorMode {
    let colorterm = env::var("COLORTERM")
        .unwrap_or_default()
        .to_ascii_lowercase();
    if colorterm.contains("truecolor") || colorterm.contains("24bit") {
        return ColorMode::TrueColor;
    }

    let term = env::var("TERM").unwrap_or_default().to_ascii_lowercase();
    if term == "dumb" {
        return ColorMode::Mono;
    }
    if term.contains("256color") {
        return ColorMode::Color256;
    }

    ColorMode::Color16
}

fn detect_color_mode(args: &Args) -> ColorMode {
    match args.colormode {
        None => detect_color_mode_auto(),
        Some(0) => ColorMode::Mono,
        Some(16) => ColorMode::Color16,
        Some(8 | 256) => ColorMode::Color256,
        Some(24 | 32) => ColorMode::TrueColor,
        Some(m) => {
            eprintln!("invalid --colormode: {} (allowed: 0,16,8/256,24/32)", m);
            std::process::exit(1);
        }
    }
}

fn color_mode_label(m: ColorMode) -> &'static str {
    match m {
        ColorMode::TrueColor => "24-bit truecolor",
        ColorMode::Color256 => "8-bit (256-color)",
        ColorMode::Color16 => "16-color",
        ColorMode::Mono => "mono",
    }
}

// stderr shares the raw-mode screen, so logs go to a file or nowhere.
fn init_logging(args: &Args) {
    let Some(path) = &args.log_file else {
        let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("off"))
            .try_init();
        return;
    };
    match File::create(path) {
        Ok(file) => {
            let _ = env_logger::Builder::from_env(
                env_logger::Env::default().default_filter_or("info"),
            )
            .target(env_logger::Target::Pipe(Box::new(file)))
            .try_init();
        }
        Err(e) => {
            eprintln!("failed to open log file {}: {}", path.display(), e);
            std::process::exit(1);
        }
    }
}

fn main() -> std::io::Result<()> {
    std::panic::set_hook(Box::new(|info| {
        restore_terminal_best_effort();
        eprintln!("{}", info);
    }));

    #[cfg(unix)]
    {
        if let Ok(mut signals) = Signals::new([SIGINT, SIGTERM, SIGHUP]) {
            thread::spawn(move || {
                if let Some(sig) = signals.forever().next() {
                    restore_terminal_best_effort();
                    std::process::exit(128 + sig);
                }
            });
        }
    }

    #[cfg(windows)]
    {
        if let Err(e) = ctrlc::set_handler(|| {
            restore_terminal_best_effort();
            std::process::exit(130);
        }) {
            eprintln!("failed to install Ctrl-C handler: {}", e);
        }
    }

    let help_template = if color_enabled_stdout() {
        HELP_TEMPLATE_COLOR
    } else {
        HELP_TEMPLATE_PLAIN
    };
    let cmd = Args::command()
        .styles(clap_styles())
        .after_help(KEYS_USAGE)
        .help_template(help_template);
    let matches = cmd.get_matches();
    let args = Args::from_arg_matches(&matches).unwrap_or_else(|e| e.exit());

    if args.version {
        println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    if args.info {
        println!("Version: v{}", env!("CARGO_PKG_VERSION"));
        println!("Build: {}", build_info());
        let sha = env!("DRIZZLE_GIT_SHA");
        if !sha.is_empty() {
            println!("Commit: {}", sha);
        }
        println!("Copyright: (c) 2026 {}", env!("CARGO_PKG_AUTHORS"));
        println!("License: {}", env!("CARGO_PKG_LICENSE"));
        return Ok(());
    }

    let color_mode = detect_color_mode(&args);
    if args.check_bitcolor {
        let colorterm = env::var("COLORTERM").unwrap_or_default();
        let term = env::var("TERM").unwrap_or_default();
        println!("BITCOLOR CHECK:");
        println!(
            "  COLORTERM: {}",
            if colorterm.is_empty() { "(unset)" } else { &colorterm }
        );
        println!("  TERM: {}", if term.is_empty() { "(unset)" } else { &term });
        println!("  auto_detected: {}", color_mode_label(detect_color_mode_auto()));
        println!("  effective: {}", color_mode_label(color_mode));
        return Ok(());
    }

    init_logging(&args);

    let target_fps = require_f64_range("--fps", args.fps, 1.0, 240.0);
    let duration_s = match args.duration {
        Some(s) if s.is_finite() && s <= 0.0 => None,
        Some(s) => Some(require_f64_range("--duration", s, 0.1, 86400.0)),
        None => None,
    };

    // The shelter HUD cannot be drawn without its font; give up before touching the screen.
    let font = match args.scene {
        SceneKind::Shelter => match Font::load(HUD_FONT_PATH) {
            Ok(font) => Some(font),
            Err(e) => {
                log::error!("{}", e);
                eprintln!("{}", e);
                std::process::exit(1);
            }
        },
        SceneKind::Downpour => None,
    };

    let seed = args.seed.unwrap_or_else(rand::random);
    let rng = StdRng::seed_from_u64(seed);

    let mut term = Terminal::new(color_mode)?;
    let (w, h) = term.size()?;

    let mut display = if args.windowed {
        DisplayMode::Windowed
    } else {
        DisplayMode::Fullscreen
    };
    let mut viewport = Viewport::fit(display, w, h);
    let mut frame = Frame::new(w, h);

    let config = SceneConfig::default();
    let mut scene = match font {
        Some(font) => Scene::shelter(&config, viewport.world, rng, font),
        None => Scene::downpour(&config, viewport.world, rng),
    };
    log::info!(
        "{:?} scene, seed {}, terminal {}x{}, world {}x{}, {}",
        scene.kind(),
        seed,
        w,
        h,
        scene.world().x,
        scene.world().y,
        color_mode_label(color_mode)
    );

    let start_time = Instant::now();
    let end_time = duration_s.map(|s| start_time + Duration::from_secs_f64(s));
    let target_period = Duration::from_secs_f64(1.0 / target_fps);
    let mut next_frame = Instant::now();
    let mut last_tick = Instant::now();
    let mut running = true;

    while running {
        if end_time.is_some_and(|end| Instant::now() >= end) {
            break;
        }
        let mut pending_resize: Option<(u16, u16)> = None;
        let mut toggle_display = false;

        loop {
            while Terminal::poll_event(Duration::from_millis(0))? {
                match Terminal::read_event()? {
                    Event::Resize(nw, nh) => pending_resize = Some((nw, nh)),
                    Event::Key(k) if k.kind == KeyEventKind::Press => {
                        match KeyAction::from_key(k.code) {
                            Some(KeyAction::Quit) => running = false,
                            Some(KeyAction::ToggleDisplay) => toggle_display = !toggle_display,
                            Some(KeyAction::Pause) => scene.toggle_pause(),
                            Some(KeyAction::Scene(cmd)) => scene.apply(cmd),
                            None => {}
                        }
                    }
                    _ => {}
                }
            }

            if !running || pending_resize.is_some() || toggle_display {
                break;
            }

            let now = Instant::now();
            if now >= next_frame {
                break;
            }
            let mut timeout = next_frame - now;
            if let Some(end) = end_time {
                if now >= end {
                    break;
                }
                timeout = timeout.min(end - now);
            }
            let _ = Terminal::poll_event(timeout)?;
        }

        if !running {
            break;
        }

        if toggle_display {
            display = display.toggled();
            log::info!("display mode {:?}", display);
        }
        if toggle_display || pending_resize.is_some() {
            let (nw, nh) = pending_resize.unwrap_or((frame.width, frame.height));
            if (nw, nh) != (frame.width, frame.height) {
                frame = Frame::new(nw, nh);
            }
            viewport = Viewport::fit(display, nw, nh);
            scene.resize(viewport.world);
        }

        let now = Instant::now();
        let dt = now
            .saturating_duration_since(last_tick)
            .as_secs_f32()
            .min(MAX_FRAME_DELTA);
        last_tick = now;

        scene.tick(dt);

        frame.clear(Cell::BLANK);
        viewport.draw_border(&mut frame, BORDER_COLOR);
        scene.draw(&mut TermCanvas::new(&mut frame, &viewport, color_mode));
        term.present(&frame)?;

        next_frame += target_period;
        let now = Instant::now();
        if now > next_frame {
            next_frame = now;
        }
    }

    log::info!(
        "exiting after {:.1}s with {} drops alive",
        start_time.elapsed().as_secs_f64(),
        scene.rain().len()
    );
    Ok(())
}
