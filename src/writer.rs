use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io::{self, Write};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::time::Duration;

use crate::clock::{format_clock, Stopwatch};
use crate::command::Command;
use crate::config::StatusConfig;
use crate::cursor;
use crate::frame::{make_progress_frame, update_progress};
use crate::window::{display_width, wrap, MessageWindow};

pub type StatusResult<T> = Result<T, StatusError>;

#[derive(Debug)]
pub enum StatusError {
    /// A `Message` arrived with no message region configured.
    MessagesDisabled,
    /// A `Progress` arrived with no progress bar configured.
    ProgressDisabled,
    /// The producer sent `Kill`; the payload is surfaced unchanged after
    /// the abort line is drawn.
    Aborted(Box<dyn Error + Send + Sync>),
    Io(io::Error),
}

impl Display for StatusError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            StatusError::MessagesDisabled => {
                write!(f, "not configured to allow messages")
            }
            StatusError::ProgressDisabled => {
                write!(f, "not configured to show a progress bar")
            }
            StatusError::Aborted(error) => write!(f, "aborted by producer: {error}"),
            StatusError::Io(error) => write!(f, "{error}"),
        }
    }
}

impl Error for StatusError {}

impl From<io::Error> for StatusError {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

/// Mutable display state, owned exclusively by the loop for its lifetime.
#[derive(Debug)]
struct RunState {
    steps_completed: usize,
    running: bool,
    window: MessageWindow,
    /// The real line displaced by the synthetic `Waiting...` line, held
    /// so it can be restored before the next real update. `None` when
    /// not currently waiting.
    waiting_placeholder: Option<String>,
}

impl RunState {
    fn new(max_lines: usize) -> Self {
        Self {
            steps_completed: 0,
            running: false,
            window: MessageWindow::new(max_lines),
            waiting_placeholder: None,
        }
    }
}

/// The display loop: consumes commands off a channel and renders a title,
/// an optional progress bar, and an optional rolling message window onto
/// the injected output stream.
///
/// The loop is the sole writer to the stream; producers only ever touch
/// the channel. Output is flushed after every visible update so partial
/// frames are never left buffered.
pub struct StatusWriter<W: Write> {
    out: W,
    config: StatusConfig,
    clock: Stopwatch,
}

impl<W: Write> StatusWriter<W> {
    pub fn new(out: W, config: StatusConfig) -> Self {
        Self {
            out,
            config,
            clock: Stopwatch::start(),
        }
    }

    pub fn config(&self) -> &StatusConfig {
        &self.config
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// Drain commands until `End`, a disconnected channel, or a failure.
    ///
    /// Commands are processed strictly in arrival order. When the queue
    /// is idle and a refresh interval is configured, the loop paints a
    /// reversible `Waiting...` heartbeat line; an arriving command always
    /// wins over idling. Every error is terminal: a `Kill` payload is
    /// re-surfaced unchanged as [`StatusError::Aborted`] after the abort
    /// line is drawn, and nothing is caught-and-continued.
    pub fn run(&mut self, commands: Receiver<Command>) -> StatusResult<()> {
        self.clock = Stopwatch::start();
        let mut state = RunState::new(self.config.max_lines);
        loop {
            let command = if state.running && self.heartbeat_enabled() {
                match commands.recv_timeout(self.refresh_interval()) {
                    Ok(command) => command,
                    Err(RecvTimeoutError::Timeout) => {
                        self.show_waiting(&mut state)?;
                        continue;
                    }
                    Err(RecvTimeoutError::Disconnected) => return Ok(()),
                }
            } else {
                match commands.recv() {
                    Ok(command) => command,
                    Err(_) => return Ok(()),
                }
            };

            match command {
                Command::Init => self.initialize(&mut state)?,
                Command::Message(text) => self.message(&mut state, &text)?,
                Command::Progress => self.progress(&mut state)?,
                Command::Kill(error) => {
                    if self.config.max_lines > 0 {
                        self.append_message(&mut state, "Aborting...")?;
                        self.out.flush()?;
                    }
                    return Err(StatusError::Aborted(error));
                }
                Command::End => return Ok(()),
            }
        }
    }

    fn heartbeat_enabled(&self) -> bool {
        self.config.refresh_seconds > 0.0 && self.config.max_lines > 0
    }

    fn refresh_interval(&self) -> Duration {
        Duration::from_secs_f64(self.config.refresh_seconds)
    }

    /// Draw the full initial display: title, static frame, and the seeded
    /// message window. A repeated `Init` is a harmless re-render below
    /// the current cursor position.
    fn initialize(&mut self, state: &mut RunState) -> StatusResult<()> {
        writeln!(self.out, "{}", self.config.title)?;
        if self.config.total_steps > 0 {
            let (top, mid, bottom) = make_progress_frame(self.config.total_steps);
            writeln!(self.out, "{top}")?;
            writeln!(self.out, "{mid}")?;
            writeln!(self.out, "{bottom}")?;
        }
        if self.config.max_lines > 0 {
            if state.window.is_empty() {
                // Pad the window to capacity so the region is always
                // exactly `max_lines` rows tall and the relative cursor
                // arithmetic above it stays exact.
                for _ in 1..self.config.max_lines {
                    state.window.push(" ".to_owned());
                }
                let starting = self.stamp("Starting...");
                state.window.push(starting);
            }
            for line in state.window.iter() {
                writeln!(self.out, "{line}")?;
            }
        }
        self.out.flush()?;
        state.running = true;
        Ok(())
    }

    fn message(&mut self, state: &mut RunState, text: &str) -> StatusResult<()> {
        if self.config.max_lines == 0 {
            return Err(StatusError::MessagesDisabled);
        }
        self.append_message(state, text)?;
        self.out.flush()?;
        Ok(())
    }

    fn progress(&mut self, state: &mut RunState) -> StatusResult<()> {
        if self.config.total_steps == 0 {
            return Err(StatusError::ProgressDisabled);
        }
        state.steps_completed += 1;
        update_progress(
            &mut self.out,
            self.config.total_steps,
            state.steps_completed,
            self.config.max_lines,
        )?;
        self.out.flush()?;
        Ok(())
    }

    /// Stamp, wrap, and roll a message into the window, then repaint the
    /// whole region.
    fn append_message(&mut self, state: &mut RunState, text: &str) -> io::Result<()> {
        let stamped = self.stamp(text);
        let hang_indent = display_width(&self.clock_prefix()) + 1;
        let lines = wrap(&stamped, self.config.terminal_width, hang_indent);
        self.redraw(state, lines)?;
        Ok(())
    }

    /// Erase the rows currently on screen (bottom to top, padded to each
    /// line's width so shorter replacements fully overwrite), roll the
    /// new lines in, and rewrite the surviving window top to bottom.
    /// Returns the last line rolled off the front.
    ///
    /// The erase pass runs before the synthetic waiting line is
    /// retracted: up to that point the window matches the screen exactly,
    /// including the waiting line, so every row is blanked to the width
    /// of what is actually painted.
    fn redraw(&mut self, state: &mut RunState, new_lines: Vec<String>) -> io::Result<Option<String>> {
        for line in state.window.iter().rev() {
            cursor::erase_above(&mut self.out, display_width(line))?;
        }
        self.retract_waiting(state);
        let mut evicted = None;
        for line in new_lines {
            if let Some(line) = state.window.push(line) {
                evicted = Some(line);
            }
        }
        for line in state.window.iter() {
            cursor::rewrite_line(&mut self.out, line)?;
        }
        Ok(evicted)
    }

    /// Paint the idle heartbeat line. The redraw retracts the previous
    /// heartbeat, if any, so only one synthetic line is ever in the
    /// window.
    fn show_waiting(&mut self, state: &mut RunState) -> StatusResult<()> {
        let waiting = self.stamp("Waiting...");
        let displaced = self.redraw(state, vec![waiting])?;
        self.out.flush()?;
        state.waiting_placeholder = displaced;
        Ok(())
    }

    /// Undo the synthetic waiting line: drop it from the back and restore
    /// the displaced real line to the front, so roll-off bookkeeping sees
    /// the window exactly as it was before the heartbeat. Runs after the
    /// erase pass, once the stale rows are already blanked.
    fn retract_waiting(&mut self, state: &mut RunState) {
        let Some(line) = state.waiting_placeholder.take() else {
            return;
        };
        state.window.pop_back();
        state.window.push_front(line);
    }

    fn clock_prefix(&self) -> String {
        format_clock(self.clock.elapsed() as u64)
    }

    fn stamp(&self, text: &str) -> String {
        format!("{} {text}", self.clock_prefix())
    }
}

impl StatusWriter<io::Stdout> {
    pub fn stdout(config: StatusConfig) -> Self {
        Self::new(io::stdout(), config)
    }

    /// Start a stdout display loop on its own thread and hand back the
    /// command channel plus the join handle carrying the loop's result.
    pub fn spawn(config: StatusConfig) -> (Sender<Command>, thread::JoinHandle<StatusResult<()>>) {
        let (commands_tx, commands_rx) = mpsc::channel::<Command>();
        let handle = thread::spawn(move || {
            let mut writer = StatusWriter::stdout(config);
            writer.run(commands_rx)
        });
        (commands_tx, handle)
    }
}

#[cfg(test)]
#[path = "tests/writer_tests.rs"]
mod tests;
