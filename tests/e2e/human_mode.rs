//! Human mode end-to-end tests.
//!
//! Output is plain text when stdout is not a terminal.

use crate::common::assertions::{assert_contains_all, assert_no_ansi};
use crate::common::cli::CliRunner;
use crate::common::fixtures::{TestImages, path_str};

fn onboarded_cli() -> CliRunner {
    let cli = CliRunner::new();
    cli.onboard("Ana Souza", "(11) 98765-4321");
    cli
}

#[test]
fn quick_start_shows_onboarding_hint() {
    let cli = CliRunner::new();
    let result = cli.run(&[]);
    result
        .assert_success()
        .assert_stdout_contains("coach - trainer profile admin")
        .assert_stdout_contains("Start here:")
        .assert_stdout_contains("coach onboard --name");
    assert_no_ansi(&result.stdout);
}

#[test]
fn onboard_welcomes_by_first_name() {
    let cli = CliRunner::new();
    cli.run(&["onboard", "--name", "Ana Souza", "--phone", "11 98765 4321"])
        .assert_success()
        .assert_stdout_contains("Welcome, Ana! Your profile is ready.");

    cli.run(&["onboard", "--name", "Other", "--phone", "1"])
        .assert_success()
        .assert_stdout_contains("Already onboarded");
}

#[test]
fn show_lists_profile_and_services() {
    let cli = onboarded_cli();
    let result = cli.run(&["show"]);
    result.assert_success();
    assert_contains_all(
        &result.stdout,
        &[
            "Ana Souza",
            "11987654321",
            "Personal Training",
            "[personal]",
            "Online Coaching",
            "Small Group Class",
        ],
    );
    result.assert_stdout_matches(r"revision [0-9a-f]{12} \| sqlite:");
    result.assert_stdout_not_contains("Onboarding not completed");
}

#[test]
fn show_warns_before_onboarding() {
    let cli = CliRunner::new();
    cli.run(&["show"])
        .assert_success()
        .assert_stdout_contains("Onboarding not completed");
}

#[test]
fn error_has_hint_on_stderr() {
    let cli = CliRunner::new();
    cli.run(&["set", "slogan", "x"])
        .assert_exit_code(1)
        .assert_stderr_contains("Error:")
        .assert_stderr_contains("Onboarding has not been completed")
        .assert_stderr_contains("Hint: Run: coach onboard");
}

#[test]
fn set_reports_change() {
    let cli = onboarded_cli();
    cli.run(&["set", "slogan", "Move better"])
        .assert_success()
        .assert_stdout_contains("[OK] slogan set to \"Move better\"");
    cli.run(&["set", "slogan", "Move better"])
        .assert_success()
        .assert_stdout_contains("[INFO] slogan already \"Move better\"");
}

#[test]
fn image_reports_resize() {
    let cli = onboarded_cli();
    let images = TestImages::new();
    let path = images.jpeg("me.jpg", 1000, 1000);
    cli.run(&["image", "profile", path_str(&path)])
        .assert_success()
        .assert_stdout_matches(r"profile image updated: 800x800, embedded image/jpeg, [0-9.]+ KB \(resized from 1000x1000\)");
}

#[test]
fn delete_without_terminal_is_declined() {
    let cli = onboarded_cli();
    cli.run(&["services", "delete", "online"])
        .assert_exit_code(1)
        .assert_stderr_contains("Confirmation declined: delete service online");
    cli.run(&["services", "list"])
        .assert_success()
        .assert_stdout_contains("Online Coaching");
}

#[test]
fn edit_without_changes_warns() {
    let cli = onboarded_cli();
    cli.run(&["services", "edit", "personal"])
        .assert_success()
        .assert_stdout_contains("[WARN] Nothing to change");
}

// ===== Interactive Session =====

#[test]
fn session_requires_onboarding() {
    let cli = CliRunner::new().with_stdin("quit\n");
    cli.run(&["session"])
        .assert_exit_code(1)
        .assert_stderr_contains("Onboarding has not been completed");
}

#[test]
fn session_edits_and_commits() {
    let cli = onboarded_cli().with_stdin(
        "set slogan Coaching for busy people\n\
         status\n\
         diff\n\
         commit\n\
         quit\n",
    );
    let result = cli.run(&["session"]);
    result.assert_success();
    assert_contains_all(
        &result.stdout,
        &[
            "coach session",
            "slogan updated",
            "dashboard*>",
            "unsaved:  true",
            "saved",
            "(store updated (revision",
        ],
    );

    let show = cli.run(&["show"]);
    show.assert_stdout_contains("Coaching for busy people");
}

#[test]
fn session_service_editor_round_trip() {
    let cli = onboarded_cli().with_stdin(
        "open\n\
         save title=Kettlebell_Basics duration=45_min price=90\n\
         open group\n\
         delete\n\
         n\n\
         cancel\n\
         quit\n",
    );
    let result = cli.run(&["session"]);
    result.assert_success();
    assert_contains_all(
        &result.stdout,
        &[
            "new service",
            "service saved",
            "editing Small Group Class (group)",
            "Delete service 'Small Group Class'? [y/N]",
            "kept",
            "back to dashboard",
        ],
    );

    cli.run(&["services", "list"])
        .assert_success()
        .assert_stdout_contains("Kettlebell Basics")
        .assert_stdout_contains("Small Group Class");
}

#[test]
fn session_quit_with_unsaved_changes_asks() {
    let cli = onboarded_cli().with_stdin(
        "set locationText Lisbon\n\
         quit\n\
         n\n\
         quit\n\
         y\n",
    );
    let result = cli.run(&["session"]);
    result
        .assert_success()
        .assert_stdout_contains("Quit with unsaved changes? [y/N]");

    cli.run(&["show"])
        .assert_success()
        .assert_stdout_not_contains("Lisbon");
}

#[test]
fn session_reports_command_errors_and_continues() {
    let cli = onboarded_cli().with_stdin("set shoeSize 42\ngallery 42\nhelp\nquit\n");
    let result = cli.run(&["session"]);
    result
        .assert_success()
        .assert_stdout_contains("error: Unknown field 'shoeSize'")
        .assert_stdout_contains("error: Gallery index 42 out of range")
        .assert_stdout_contains("commands:");
}
