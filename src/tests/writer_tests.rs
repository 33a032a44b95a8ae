use std::sync::mpsc;

use super::{RunState, StatusError, StatusResult, StatusWriter};
use crate::command::{AbortReason, Command};
use crate::config::StatusConfig;

const TITLE: &str = "SPAM: the Eggening";

fn test_config() -> StatusConfig {
    StatusConfig::new(TITLE)
        .with_total_steps(6)
        .with_max_lines(2)
}

fn run_commands(config: StatusConfig, commands: Vec<Command>) -> (StatusResult<()>, String) {
    let (commands_tx, commands_rx) = mpsc::channel();
    for command in commands {
        commands_tx.send(command).expect("send command");
    }
    drop(commands_tx);
    let mut writer = StatusWriter::new(Vec::<u8>::new(), config);
    let result = writer.run(commands_rx);
    let rendered = String::from_utf8(writer.into_inner()).expect("utf8");
    (result, rendered)
}

fn init_bytes() -> String {
    format!("{TITLE}\n┌      ┐\n│░░░░░░│\n└      ┘\n \n00:00:00 Starting...\n")
}

#[test]
fn init_draws_title_frame_and_seeded_window() {
    let (result, rendered) = run_commands(test_config(), vec![Command::Init, Command::End]);
    result.expect("loop ends normally");
    assert_eq!(rendered, init_bytes());
}

#[test]
fn init_without_progress_skips_the_frame() {
    let config = StatusConfig::new(TITLE).with_max_lines(2);
    let (result, rendered) = run_commands(config, vec![Command::Init, Command::End]);
    result.expect("loop ends normally");
    assert_eq!(rendered, format!("{TITLE}\n \n00:00:00 Starting...\n"));
}

#[test]
fn init_without_messages_skips_the_window() {
    let config = StatusConfig::new(TITLE).with_total_steps(6).with_max_lines(0);
    let (result, rendered) = run_commands(config, vec![Command::Init, Command::End]);
    result.expect("loop ends normally");
    assert_eq!(rendered, format!("{TITLE}\n┌      ┐\n│░░░░░░│\n└      ┘\n"));
}

#[test]
fn init_with_no_bar_and_no_window_is_title_only() {
    let config = StatusConfig::new("X").with_max_lines(0);
    let (result, rendered) = run_commands(config, vec![Command::Init, Command::End]);
    result.expect("loop ends normally");
    assert_eq!(rendered, "X\n");
}

#[test]
fn duplicate_init_re_renders_without_reseeding() {
    let (result, rendered) =
        run_commands(test_config(), vec![Command::Init, Command::Init, Command::End]);
    result.expect("loop ends normally");
    assert_eq!(rendered, init_bytes().repeat(2));
}

#[test]
fn message_erases_and_rewrites_the_window() {
    let (result, rendered) = run_commands(
        test_config(),
        vec![
            Command::Init,
            Command::Message("bacon".to_owned()),
            Command::End,
        ],
    );
    result.expect("loop ends normally");
    let expected = format!(
        "{}\r\x1b[A{:20}\r\x1b[A{:1}\r00:00:00 Starting...\n\r00:00:00 bacon\n",
        init_bytes(),
        "",
        ""
    );
    assert_eq!(rendered, expected);
}

#[test]
fn progress_rewrites_the_bar_in_place() {
    let (result, rendered) = run_commands(
        test_config(),
        vec![Command::Init, Command::Progress, Command::End],
    );
    result.expect("loop ends normally");
    let expected = format!(
        "{}\x1b[A\x1b[A\x1b[A\x1b[A\r│█░░░░░│\n\n\n\n\r",
        init_bytes()
    );
    assert_eq!(rendered, expected);
}

#[test]
fn message_without_a_window_is_a_configuration_error() {
    let config = StatusConfig::new(TITLE).with_total_steps(6).with_max_lines(0);
    let (result, _) = run_commands(
        config,
        vec![
            Command::Init,
            Command::Message("bacon".to_owned()),
            Command::End,
        ],
    );
    let error = result.expect_err("message must be rejected");
    assert!(matches!(error, StatusError::MessagesDisabled));
    assert_eq!(error.to_string(), "not configured to allow messages");
}

#[test]
fn progress_without_a_bar_is_a_configuration_error() {
    let config = StatusConfig::new(TITLE).with_max_lines(2);
    let (result, _) = run_commands(config, vec![Command::Init, Command::Progress, Command::End]);
    let error = result.expect_err("progress must be rejected");
    assert!(matches!(error, StatusError::ProgressDisabled));
    assert_eq!(error.to_string(), "not configured to show a progress bar");
}

#[test]
fn kill_draws_the_abort_line_then_propagates_the_payload() {
    let (result, rendered) = run_commands(
        test_config(),
        vec![
            Command::Init,
            Command::Kill(Box::new(AbortReason("sausages".to_owned()))),
            Command::End,
        ],
    );
    let expected = format!(
        "{}\r\x1b[A{:20}\r\x1b[A{:1}\r00:00:00 Starting...\n\r00:00:00 Aborting...\n",
        init_bytes(),
        "",
        ""
    );
    assert_eq!(rendered, expected);

    let error = result.expect_err("kill must abort the loop");
    let StatusError::Aborted(payload) = error else {
        panic!("expected an abort error");
    };
    let reason = payload
        .downcast_ref::<AbortReason>()
        .expect("payload survives unchanged");
    assert_eq!(reason, &AbortReason("sausages".to_owned()));
}

#[test]
fn kill_without_a_window_skips_the_abort_line() {
    let config = StatusConfig::new(TITLE).with_total_steps(6).with_max_lines(0);
    let (result, rendered) = run_commands(
        config,
        vec![
            Command::Init,
            Command::Kill(Box::new(AbortReason("sausages".to_owned()))),
        ],
    );
    assert!(matches!(result, Err(StatusError::Aborted(_))));
    assert_eq!(rendered, format!("{TITLE}\n┌      ┐\n│░░░░░░│\n└      ┘\n"));
}

#[test]
fn waiting_line_is_reversible_and_never_stacks() {
    let mut writer = StatusWriter::new(Vec::<u8>::new(), test_config());
    let mut state = RunState::new(2);
    writer.initialize(&mut state).expect("initialize");

    writer.show_waiting(&mut state).expect("first heartbeat");
    let lines: Vec<&str> = state.window.iter().collect();
    assert_eq!(lines, ["00:00:00 Starting...", "00:00:00 Waiting..."]);
    assert_eq!(state.waiting_placeholder.as_deref(), Some(" "));

    writer.show_waiting(&mut state).expect("second heartbeat");
    let lines: Vec<&str> = state.window.iter().collect();
    assert_eq!(lines, ["00:00:00 Starting...", "00:00:00 Waiting..."]);
    assert_eq!(state.waiting_placeholder.as_deref(), Some(" "));

    writer.message(&mut state, "bacon").expect("real message");
    let lines: Vec<&str> = state.window.iter().collect();
    assert_eq!(lines, ["00:00:00 Starting...", "00:00:00 bacon"]);
    assert_eq!(state.waiting_placeholder, None);
}

#[test]
fn message_after_waiting_erases_the_painted_waiting_line() {
    let config = StatusConfig::new(TITLE).with_max_lines(2);
    let mut writer = StatusWriter::new(Vec::<u8>::new(), config);
    let mut state = RunState::new(2);
    writer.initialize(&mut state).expect("initialize");
    writer.message(&mut state, "hi").expect("first message");
    writer.show_waiting(&mut state).expect("heartbeat");

    // Screen now shows "00:00:00 hi" over "00:00:00 Waiting...". The
    // next real message must blank those exact rows: 19 columns for the
    // painted waiting line, then 11 for the line above it, before the
    // retracted window is rewritten.
    let painted = writer.out.len();
    writer.message(&mut state, "ok").expect("second message");
    let rendered = String::from_utf8(writer.out[painted..].to_vec()).expect("utf8");
    assert_eq!(
        rendered,
        format!(
            "\r\x1b[A{:19}\r\x1b[A{:11}\r00:00:00 hi\n\r00:00:00 ok\n",
            "", ""
        )
    );
}

#[test]
fn abort_after_waiting_erases_the_painted_waiting_line() {
    let config = StatusConfig::new(TITLE).with_max_lines(2);
    let mut writer = StatusWriter::new(Vec::<u8>::new(), config);
    let mut state = RunState::new(2);
    writer.initialize(&mut state).expect("initialize");
    writer.show_waiting(&mut state).expect("heartbeat");

    let painted = writer.out.len();
    writer
        .append_message(&mut state, "Aborting...")
        .expect("abort line");
    let rendered = String::from_utf8(writer.out[painted..].to_vec()).expect("utf8");
    assert_eq!(
        rendered,
        format!(
            "\r\x1b[A{:19}\r\x1b[A{:20}\r00:00:00 Starting...\n\r00:00:00 Aborting...\n",
            "", ""
        )
    );
}

#[test]
fn long_messages_wrap_with_a_hanging_indent() {
    let config = StatusConfig::new(TITLE)
        .with_max_lines(3)
        .with_terminal_width(20);
    let (result, rendered) = run_commands(
        config,
        vec![
            Command::Init,
            Command::Message("spam and eggs again".to_owned()),
            Command::End,
        ],
    );
    result.expect("loop ends normally");
    // "00:00:00 spam and eggs again" wraps at 20 columns with a 9-space
    // hanging indent; both pad lines roll off the front.
    assert!(rendered.ends_with(
        "\r00:00:00 Starting...\n\r00:00:00 spam and\n\r         eggs again\n"
    ));
}
