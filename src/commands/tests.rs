use super::*;
use crate::core::session::SessionSettings;
use crate::utils::test_utils::{test_session, GROK, MISTRAL};
use std::time::Instant;

fn session() -> Session {
    test_session(SessionSettings::default())
}

fn notice_text(session: &Session) -> String {
    session
        .notice()
        .map(|n| n.text().to_string())
        .unwrap_or_default()
}

#[test]
fn plain_text_is_processed_as_message() {
    let mut session = session();
    assert_eq!(
        process_input(&mut session, "hello there"),
        CommandResult::ProcessAsMessage("hello there".to_string())
    );
}

#[test]
fn unknown_command_is_processed_as_message() {
    let mut session = session();
    assert_eq!(
        process_input(&mut session, "/shrug ok"),
        CommandResult::ProcessAsMessage("/shrug ok".to_string())
    );
    assert_eq!(
        process_input(&mut session, "/"),
        CommandResult::ProcessAsMessage("/".to_string())
    );
}

#[test]
fn help_lists_every_command() {
    let mut session = session();
    assert_eq!(process_input(&mut session, "/help"), CommandResult::Continue);
    let text = notice_text(&session);
    for command in all_commands() {
        assert!(text.contains(command.usage), "missing {}", command.usage);
    }
}

#[test]
fn command_names_are_case_insensitive() {
    let mut session = session();
    assert_eq!(process_input(&mut session, "/QUIT"), CommandResult::Quit);
}

#[test]
fn model_accepts_number_id_and_display_name() {
    let mut session = session();

    process_input(&mut session, "/model 4");
    assert_eq!(session.selected_model().id, GROK);

    process_input(&mut session, &format!("/model {MISTRAL}"));
    assert_eq!(session.selected_index(), 0);

    let name = session.models()[1].display_name.clone();
    process_input(&mut session, &format!("/model {}", name.to_uppercase()));
    assert_eq!(session.selected_index(), 1);
}

#[test]
fn model_rejects_unknown_and_out_of_range() {
    let mut session = session();
    process_input(&mut session, "/model 0");
    assert!(session.notice().is_some_and(|n| n.is_error()));
    process_input(&mut session, "/model 99");
    assert_eq!(session.selected_index(), 0);
    process_input(&mut session, "/model nobody/nothing");
    assert!(notice_text(&session).contains("Unknown model"));
}

#[test]
fn model_without_args_reports_current() {
    let mut session = session();
    process_input(&mut session, "/model");
    assert!(notice_text(&session).contains(MISTRAL));
}

#[test]
fn temp_sets_valid_values_and_rejects_others() {
    let mut session = session();

    process_input(&mut session, "/temp 0.3");
    assert_eq!(session.temperature().tenths(), 3);

    process_input(&mut session, "/temp 1.5");
    assert_eq!(session.temperature().tenths(), 3);
    assert!(session.notice().is_some_and(|n| n.is_error()));

    process_input(&mut session, "/temp warm");
    assert_eq!(session.temperature().tenths(), 3);
}

#[test]
fn theme_toggles_or_sets() {
    let mut session = session();
    assert_eq!(session.theme(), ThemeMode::Light);

    process_input(&mut session, "/theme");
    assert_eq!(session.theme(), ThemeMode::Dark);

    process_input(&mut session, "/theme light");
    assert_eq!(session.theme(), ThemeMode::Light);

    process_input(&mut session, "/theme sepia");
    assert_eq!(session.theme(), ThemeMode::Light);
    assert!(session.notice().is_some_and(|n| n.is_error()));
}

#[test]
fn clear_is_refused_while_awaiting_reply() {
    let mut session = session();
    let _ = session.begin_turn("Hello", Instant::now());

    process_input(&mut session, "/clear");
    assert_eq!(session.transcript().len(), 1);
}

#[test]
fn clear_reports_model_name() {
    let mut session = session();
    assert_eq!(process_input(&mut session, "/clear"), CommandResult::Continue);
    assert!(notice_text(&session).starts_with("Cleared history for"));
}
