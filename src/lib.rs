//! Command-driven status display for long-running terminal jobs.
//!
//! A producer thread pushes [`Command`]s onto an mpsc channel; a
//! [`StatusWriter`] drains the channel and keeps a title line, an optional
//! fixed-width progress bar, and an optional rolling window of timestamped
//! status messages painted on the terminal. The display loop owns all
//! mutable state and the output stream; the producer never blocks beyond
//! the channel hand-off.
//!
//! ```no_run
//! use marquee::{Command, StatusConfig, StatusWriter};
//!
//! let config = StatusConfig::new("EXAMPLE: nightly build")
//!     .with_total_steps(6)
//!     .with_max_lines(4)
//!     .with_refresh_seconds(1.0);
//! let (status, display) = StatusWriter::spawn(config);
//!
//! status.send(Command::Init).unwrap();
//! for stage in 0..6 {
//!     // ... run one stage of the real work ...
//!     status.send(Command::Progress).unwrap();
//!     status.send(Command::Message(format!("Stage {stage} complete."))).unwrap();
//! }
//! status.send(Command::End).unwrap();
//! display.join().unwrap().unwrap();
//! ```

pub mod clock;
pub mod command;
pub mod config;
pub mod cursor;
pub mod frame;
pub mod window;
pub mod writer;

pub use clock::{format_clock, split_duration, Stopwatch};
pub use command::{AbortReason, Command, CommandParseError};
pub use config::{detect_terminal_width, ConfigError, StatusConfig};
pub use frame::{bar_line, make_progress_frame};
pub use window::{wrap, MessageWindow};
pub use writer::{StatusError, StatusResult, StatusWriter};
