//! Interactive console front end for molcap.
//!
//! Reads one command per line from stdin and drives the app with the
//! headless backends. Usage: `molcap [FILE...]` uploads the given files on
//! start. Type `help` for the command list.

#![cfg_attr(test, allow(clippy::unwrap_used, clippy::wildcard_imports))]

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, RecvTimeoutError};

use molcap::{
    app::App,
    capture::{headless::FrameCaptureBackend, ArtifactRegistry},
    error::MolcapError,
    history::{FileRepository, JsonHistoryStore},
    model::FileId,
    navigation::Tab,
    options::Options,
    panel::{Direction, PanelAction, RotateStep, ViewerPanel},
    recording::RecordingPhase,
    surface::{headless::HeadlessBackend, Axis, SpinAxis},
    util::format::{format_file_size, format_timestamp},
};
use web_time::{Duration, Instant};

const STATE_DIR: &str = ".molcap";
const FRAME: Duration = Duration::from_millis(16);

const HELP: &str = "\
commands:
  upload <path>          add a .pdb/.xyz file and open it
  history                list uploaded files
  open <n|id>            view a history entry
  rename <n|id> <name>   rename a history entry
  delete <n|id>          remove a history entry
  clear-history          remove every history entry
  tab <upload|viewer|history>
  spin                   toggle spin
  axis <x|y|z|none>      spin axis
  speed <n>              spin speed (min 1)
  pan <up|down|left|right>
  rotate <x|y> <+|->
  zoom <in|out>
  record                 record a clip
  stop                   finish the clip early
  clear                  discard the clip
  download [dir]         save the clip (default: current directory)
  status                 show viewer state
  quit";

/// What a console line asks for.
enum Command {
    Help,
    Upload(PathBuf),
    History,
    Open(String),
    Rename(String, String),
    Delete(String),
    ClearHistory,
    Tab(Tab),
    Panel(PanelAction),
    Status,
    Quit,
}

fn invalid(msg: impl Into<String>) -> MolcapError {
    MolcapError::InvalidInput(msg.into())
}

fn parse_command(line: &str) -> Result<Option<Command>, MolcapError> {
    let mut words = line.split_whitespace();
    let Some(verb) = words.next() else {
        return Ok(None);
    };
    let arg = words.next();
    let rest = || {
        line.trim_start()
            .splitn(3, char::is_whitespace)
            .nth(2)
            .map(str::trim)
            .filter(|s| !s.is_empty())
    };

    let command = match (verb, arg) {
        ("help" | "?", _) => Command::Help,
        ("upload", Some(path)) => Command::Upload(PathBuf::from(path)),
        ("history" | "ls", _) => Command::History,
        ("open", Some(key)) => Command::Open(key.to_owned()),
        ("rename", Some(key)) => {
            let name = rest().ok_or_else(|| invalid("rename needs a name"))?;
            Command::Rename(key.to_owned(), name.to_owned())
        }
        ("delete" | "rm", Some(key)) => Command::Delete(key.to_owned()),
        ("clear-history", _) => Command::ClearHistory,
        ("tab", Some(tab)) => Command::Tab(tab.parse()?),
        ("spin", _) => Command::Panel(PanelAction::ToggleSpin),
        ("axis", Some(axis)) => {
            Command::Panel(PanelAction::SetSpinAxis(axis.parse::<SpinAxis>()?))
        }
        ("speed", Some(speed)) => {
            let speed = speed
                .parse::<f32>()
                .map_err(|_| invalid(format!("not a number: {speed}")))?;
            Command::Panel(PanelAction::SetSpinSpeed(speed))
        }
        ("pan", Some(dir)) => Command::Panel(PanelAction::Pan(match dir {
            "up" => Direction::Up,
            "down" => Direction::Down,
            "left" => Direction::Left,
            "right" => Direction::Right,
            other => return Err(invalid(format!("unknown direction: {other}"))),
        })),
        ("rotate", Some(axis)) => {
            let axis = match axis {
                "x" => Axis::X,
                "y" => Axis::Y,
                other => return Err(invalid(format!("rotate about x or y, not {other}"))),
            };
            let positive = !matches!(words.next(), Some("-"));
            Command::Panel(PanelAction::Rotate(RotateStep { axis, positive }))
        }
        ("zoom", Some("in")) => Command::Panel(PanelAction::ZoomIn),
        ("zoom", Some("out")) => Command::Panel(PanelAction::ZoomOut),
        ("record", _) => Command::Panel(PanelAction::Record),
        ("stop", _) => Command::Panel(PanelAction::StopRecording),
        ("clear", _) => Command::Panel(PanelAction::ClearRecording),
        ("download", dir) => Command::Panel(PanelAction::Download {
            dir: PathBuf::from(dir.unwrap_or(".")),
        }),
        ("status", _) => Command::Status,
        ("quit" | "exit" | "q", _) => Command::Quit,
        (verb, _) => return Err(invalid(format!("unknown command or missing argument: {verb}"))),
    };
    Ok(Some(command))
}

struct Console {
    app: App<JsonHistoryStore>,
    last_phase: RecordingPhase,
}

impl Console {
    /// History entry by 1-based position or by id.
    fn resolve(&self, key: &str) -> Option<FileId> {
        let records = self.app.history().list();
        if let Ok(n) = key.parse::<usize>() {
            return n
                .checked_sub(1)
                .and_then(|i| records.get(i))
                .map(|r| r.id.clone());
        }
        let id = FileId::from(key);
        records.iter().any(|r| r.id == id).then_some(id)
    }

    /// Apply one command. Returns `false` on quit.
    fn handle(&mut self, command: Command, now: Instant, out: &mut impl Write) -> io::Result<bool> {
        match command {
            Command::Help => writeln!(out, "{HELP}")?,
            Command::Upload(path) => {
                if self.app.upload_file(&path).is_some() {
                    self.print_status(out)?;
                }
            }
            Command::History => self.print_history(out)?,
            Command::Open(key) => match self.resolve(&key) {
                Some(id) => {
                    let _ = self.app.select(&id);
                    self.print_status(out)?;
                }
                None => writeln!(out, "no history entry {key}")?,
            },
            Command::Rename(key, name) => match self.resolve(&key) {
                Some(id) => {
                    if !self.app.rename(&id, &name) {
                        writeln!(out, "name unchanged")?;
                    }
                }
                None => writeln!(out, "no history entry {key}")?,
            },
            Command::Delete(key) => match self.resolve(&key) {
                Some(id) => {
                    let _ = self.app.delete(&id);
                }
                None => writeln!(out, "no history entry {key}")?,
            },
            Command::ClearHistory => self.app.clear_history(),
            Command::Tab(tab) => self.app.show_tab(tab),
            Command::Panel(action) => self.app.dispatch(action, now),
            Command::Status => self.print_status(out)?,
            Command::Quit => return Ok(false),
        }
        Ok(true)
    }

    fn print_history(&self, out: &mut impl Write) -> io::Result<()> {
        let records = self.app.history().list();
        if records.is_empty() {
            return writeln!(out, "No upload history");
        }
        let active = self.app.navigation().active_file();
        for (i, record) in records.iter().enumerate() {
            let marker = if Some(&record.id) == active { '*' } else { ' ' };
            writeln!(
                out,
                "{marker}{:>3}  {:<32} {:>9}  {}  {}",
                i + 1,
                record.name,
                format_file_size(record.size),
                format_timestamp(record.stored_at),
                record.id
            )?;
        }
        Ok(())
    }

    fn print_status(&self, out: &mut impl Write) -> io::Result<()> {
        let view = self.app.panel_view();
        writeln!(out, "[{}] {}", self.app.navigation().tab(), view.title_or_placeholder())?;
        if self.app.navigation().tab() != Tab::Viewer {
            return Ok(());
        }
        let spin = if view.spin_enabled {
            format!("{} x{}", view.spin_axis, view.spin_speed)
        } else {
            "off".to_owned()
        };
        writeln!(out, "  spin: {spin}   [{}]", view.record_label)?;
        if let Some(artifact) = &view.artifact {
            writeln!(
                out,
                "  clip: {} ({}, {})",
                artifact.url,
                artifact.mime_type,
                format_file_size(artifact.size as u64)
            )?;
        }
        if !view.status.is_empty() {
            writeln!(out, "  {}", view.status)?;
        }
        Ok(())
    }

    /// Whether a clip is still being captured.
    fn is_recording(&self) -> bool {
        self.app.panel_view().phase == RecordingPhase::Recording
    }

    /// Event-loop turn; reports notices and recorder transitions.
    fn tick(&mut self, dt: f32, now: Instant, out: &mut impl Write) -> io::Result<()> {
        self.app.update(dt, now);
        for notice in self.app.take_notices() {
            writeln!(out, "! {notice}")?;
        }
        let phase = self.app.panel_view().phase;
        if phase != self.last_phase {
            self.last_phase = phase;
            if phase != RecordingPhase::Recording {
                self.print_status(out)?;
            }
        }
        out.flush()
    }
}

fn build_app(state_dir: &Path) -> Result<App<JsonHistoryStore>, MolcapError> {
    let options = Options::load_or_default(&state_dir.join("options.toml"));
    let history = JsonHistoryStore::open(state_dir.join("history.json"))?;
    let panel = ViewerPanel::new(
        Box::new(HeadlessBackend::new()),
        Box::new(FrameCaptureBackend::new()),
        ArtifactRegistry::shared(),
        &options,
    );
    Ok(App::new(history, panel))
}

fn run() -> Result<(), MolcapError> {
    let app = build_app(Path::new(STATE_DIR))?;
    let mut console = Console {
        app,
        last_phase: RecordingPhase::Idle,
    };
    let stdout = io::stdout();
    let mut out = stdout.lock();

    for path in std::env::args().skip(1) {
        let _ = console.app.upload_file(Path::new(&path));
    }
    writeln!(out, "molcap: type `help` for commands")?;
    console.print_status(&mut out)?;

    let (tx, rx) = mpsc::channel::<String>();
    let _reader = std::thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if tx.send(line).is_err() {
                break;
            }
        }
    });

    let mut last_frame = Instant::now();
    let mut stdin_open = true;
    loop {
        let line = if stdin_open {
            match rx.recv_timeout(FRAME) {
                Ok(line) => Some(line),
                Err(RecvTimeoutError::Timeout) => None,
                Err(RecvTimeoutError::Disconnected) => {
                    stdin_open = false;
                    None
                }
            }
        } else {
            std::thread::sleep(FRAME);
            None
        };
        let now = Instant::now();
        if let Some(line) = line {
            match parse_command(&line) {
                Ok(Some(command)) => {
                    if !console.handle(command, now, &mut out)? {
                        break;
                    }
                }
                Ok(None) => {}
                Err(e) => writeln!(out, "! {e}")?,
            }
        }
        let dt = now.saturating_duration_since(last_frame).as_secs_f32();
        last_frame = now;
        console.tick(dt, now, &mut out)?;
        // Input is gone; let a running capture reach its deadline first.
        if !stdin_open && !console.is_recording() {
            break;
        }
    }
    log::info!("exiting");
    Ok(())
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        log::error!("{e}");
        std::process::exit(1);
    }
}
