use std::io::{self, BufRead};
use std::path::PathBuf;

use marquee::{detect_terminal_width, Command, StatusConfig, StatusError, StatusWriter};

#[derive(Debug, Clone, PartialEq)]
enum CliCommand {
    Run(StatusConfig),
    Help,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum CliParseError {
    MissingValue(&'static str),
    InvalidValue { flag: &'static str, value: String },
    UnknownArgument(String),
}

impl std::fmt::Display for CliParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliParseError::MissingValue(flag) => write!(f, "{flag} requires a value"),
            CliParseError::InvalidValue { flag, value } => {
                write!(f, "invalid value for {flag}: {value}")
            }
            CliParseError::UnknownArgument(arg) => write!(f, "unknown argument: {arg}"),
        }
    }
}

fn parse_args<I>(args: I) -> Result<CliCommand, CliParseError>
where
    I: IntoIterator<Item = String>,
{
    let mut args = args.into_iter();
    let mut config_path: Option<PathBuf> = None;
    let mut title: Option<String> = None;
    let mut steps: Option<usize> = None;
    let mut lines: Option<usize> = None;
    let mut refresh: Option<f64> = None;
    let mut width: Option<usize> = None;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => {
                let Some(path) = args.next() else {
                    return Err(CliParseError::MissingValue("--config"));
                };
                config_path = Some(PathBuf::from(path));
            }
            "--title" => {
                let Some(value) = args.next() else {
                    return Err(CliParseError::MissingValue("--title"));
                };
                title = Some(value);
            }
            "--steps" => steps = Some(parse_value(&mut args, "--steps")?),
            "--lines" => lines = Some(parse_value(&mut args, "--lines")?),
            "--refresh" => refresh = Some(parse_value(&mut args, "--refresh")?),
            "--width" => width = Some(parse_value(&mut args, "--width")?),
            "--help" | "-h" => return Ok(CliCommand::Help),
            other => return Err(CliParseError::UnknownArgument(other.to_owned())),
        }
    }

    let mut config = match config_path {
        Some(path) => match StatusConfig::from_toml_file(&path) {
            Ok(config) => config,
            Err(error) => {
                return Err(CliParseError::InvalidValue {
                    flag: "--config",
                    value: error.to_string(),
                })
            }
        },
        None => StatusConfig::new(title.clone().unwrap_or_else(|| "marquee".to_owned()))
            .with_terminal_width(detect_terminal_width()),
    };
    if let Some(title) = title {
        config.title = title;
    }
    if let Some(steps) = steps {
        config = config.with_total_steps(steps);
    }
    if let Some(lines) = lines {
        config = config.with_max_lines(lines);
    }
    if let Some(refresh) = refresh {
        config = config.with_refresh_seconds(refresh);
    }
    if let Some(width) = width {
        config = config.with_terminal_width(width);
    }
    Ok(CliCommand::Run(config))
}

fn parse_value<I, T>(args: &mut I, flag: &'static str) -> Result<T, CliParseError>
where
    I: Iterator<Item = String>,
    T: std::str::FromStr,
{
    let Some(value) = args.next() else {
        return Err(CliParseError::MissingValue(flag));
    };
    value
        .parse::<T>()
        .map_err(|_| CliParseError::InvalidValue { flag, value })
}

fn print_usage() {
    eprintln!(
        "marquee\n\nReads status commands from stdin and keeps a terminal status display\npainted on stdout.\n\nUSAGE:\n  <producer> | marquee [OPTIONS]\n\nPROTOCOL (one command per line on stdin):\n  INIT             Draw the title, progress frame, and message window\n  MSG <text>       Append a timestamped status message\n  PROG             Advance the progress bar by one step\n  KILL <reason>    Draw an abort line and exit with the reason\n  END              Finish the display and exit\n\nOPTIONS:\n  --title <TEXT>      Title line (default: marquee)\n  --steps <N>         Progress bar steps; 0 disables the bar (default: 0)\n  --lines <N>         Message window height; 0 disables it (default: 4)\n  --refresh <SECONDS> Idle heartbeat interval; 0 disables it (default: 0)\n  --width <N>         Wrap width in columns (default: detected)\n  --config <PATH>     Load the options above from a TOML file\n  -h, --help          Print help\n"
    );
}

fn run_display(config: StatusConfig) -> i32 {
    let (status, display) = StatusWriter::spawn(config);
    let mut protocol_violation = false;

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = match line {
            Ok(line) => line,
            Err(error) => {
                eprintln!("marquee: failed reading stdin: {error}");
                break;
            }
        };
        if line.trim().is_empty() {
            continue;
        }
        match Command::parse(&line) {
            Ok(command) => {
                if status.send(command).is_err() {
                    break;
                }
            }
            Err(error) => {
                eprintln!("marquee: {error}");
                protocol_violation = true;
                break;
            }
        }
    }
    let _ = status.send(Command::End);

    let exit_code = match display.join() {
        Ok(Ok(())) => 0,
        Ok(Err(StatusError::Aborted(error))) => {
            eprintln!("marquee: aborted: {error}");
            1
        }
        Ok(Err(error)) => {
            eprintln!("marquee: {error}");
            1
        }
        Err(_) => {
            eprintln!("marquee: display thread panicked");
            1
        }
    };
    if protocol_violation {
        return 2;
    }
    exit_code
}

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();
    match parse_args(args) {
        Ok(CliCommand::Help) => print_usage(),
        Ok(CliCommand::Run(config)) => std::process::exit(run_display(config)),
        Err(error) => {
            eprintln!("marquee: {error}");
            print_usage();
            std::process::exit(2);
        }
    }
}
