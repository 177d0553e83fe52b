mod fixture;
mod renderer;

use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use fixture::{Fixture, ScriptedFragment};
use ratatui::DefaultTerminal;
use transcript::TranscriptAnnotator;

#[derive(clap::Parser)]
#[command(name = "replay", about = "Replay a scripted emergency call in the terminal")]
struct Args {
    #[arg(short, long, default_value_t = Fixture::Medical)]
    fixture: Fixture,

    #[arg(short, long, default_value_t = 400)]
    speed: u64,
}

struct App {
    fragments: Vec<ScriptedFragment>,
    position: usize,
    paused: bool,
    speed_ms: u64,
    annotator: TranscriptAnnotator,
    fixture_name: String,
}

impl App {
    fn new(fragments: Vec<ScriptedFragment>, speed_ms: u64, fixture_name: String) -> Self {
        Self {
            fragments,
            position: 0,
            paused: false,
            speed_ms,
            annotator: TranscriptAnnotator::new(),
            fixture_name,
        }
    }

    fn total(&self) -> usize {
        self.fragments.len()
    }

    fn seek_to(&mut self, target: usize) {
        let target = target.min(self.total());
        self.annotator = TranscriptAnnotator::new();
        for i in 0..target {
            let fragment = &self.fragments[i];
            self.annotator
                .ingest(fragment.speaker, &fragment.text, fragment.is_final);
        }
        self.position = target;
    }

    fn advance(&mut self) -> bool {
        if self.position >= self.total() {
            return false;
        }
        let fragment = &self.fragments[self.position];
        self.annotator
            .ingest(fragment.speaker, &fragment.text, fragment.is_final);
        self.position += 1;
        true
    }

    fn is_done(&self) -> bool {
        self.position >= self.total()
    }
}

fn main() {
    use clap::Parser;
    let args = Args::parse();
    let fixture = args.fixture;
    let speed_ms = args.speed;
    let fixture_name = fixture.to_string();

    let fragments: Vec<ScriptedFragment> =
        serde_json::from_str(fixture.json()).expect("fixture must parse as ScriptedFragment[]");

    let mut terminal = ratatui::init();
    let result = run(&mut terminal, fragments, speed_ms, fixture_name.clone());
    ratatui::restore();

    match result {
        Ok(app) => {
            let frame = app.annotator.frame();
            let flagged = frame
                .entries
                .iter()
                .filter(|e| e.contains_emergency_keyword)
                .count();
            println!(
                "Done. {} entries ({} flagged) from {} fragments ({} fixture).",
                frame.entries.len(),
                flagged,
                app.total(),
                fixture_name,
            );
        }
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}

fn run(
    terminal: &mut DefaultTerminal,
    fragments: Vec<ScriptedFragment>,
    speed_ms: u64,
    fixture_name: String,
) -> std::io::Result<App> {
    let mut app = App::new(fragments, speed_ms, fixture_name);
    let mut last_tick = Instant::now();

    loop {
        terminal.draw(|frame| renderer::render(frame, &app))?;

        let tick_duration = Duration::from_millis(app.speed_ms);
        let elapsed = last_tick.elapsed();
        let timeout = tick_duration.saturating_sub(elapsed);

        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                match key.code {
                    KeyCode::Char('q') | KeyCode::Esc => break,
                    KeyCode::Char(' ') => {
                        app.paused = !app.paused;
                        last_tick = Instant::now();
                    }
                    KeyCode::Right => {
                        app.seek_to(app.position + 1);
                    }
                    KeyCode::Left => {
                        app.seek_to(app.position.saturating_sub(1));
                    }
                    KeyCode::Up => {
                        app.speed_ms = app.speed_ms.saturating_sub(50).max(25);
                    }
                    KeyCode::Down => {
                        app.speed_ms += 50;
                    }
                    KeyCode::Home => {
                        app.seek_to(0);
                    }
                    KeyCode::End => {
                        let total = app.total();
                        app.seek_to(total);
                    }
                    _ => {}
                }
            }
        } else if !app.paused {
            if last_tick.elapsed() >= tick_duration {
                app.advance();
                last_tick = Instant::now();

                if app.is_done() {
                    terminal.draw(|frame| renderer::render(frame, &app))?;
                    app.paused = true;
                }
            }
        }
    }

    Ok(app)
}
