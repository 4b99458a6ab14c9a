// tests/runner_process.rs
//
// Runs real child processes through CommandRunner. Needs a POSIX `sh`.

use std::time::{Duration, Instant};

use nmterm_core::{CommandError, CommandRunner};

#[tokio::test]
async fn successful_output_is_returned_untrimmed() {
    let out = CommandRunner::default()
        .run(r#"sh -c "printf ' a:b\n\n'""#)
        .await
        .unwrap();
    assert_eq!(out, " a:b\n\n");
}

#[tokio::test]
async fn quoted_argument_reaches_child_as_one_word() {
    let out = CommandRunner::default()
        .run(r#"printf %s| "My Home""#)
        .await
        .unwrap();
    assert_eq!(out, "My Home|");
}

#[tokio::test]
async fn non_zero_exit_carries_code() {
    let err = CommandRunner::default()
        .run(r#"sh -c "echo partial; exit 2""#)
        .await
        .unwrap_err();
    assert_eq!(err.code(), Some(2));
    assert!(matches!(err, CommandError::Exit { ref program, .. } if program == "sh"));
}

#[tokio::test]
async fn missing_program_is_spawn_error() {
    let err = CommandRunner::default()
        .run("definitely-not-a-real-binary-nmterm --version")
        .await
        .unwrap_err();
    assert!(matches!(err, CommandError::Spawn { .. }));
    assert_eq!(err.code(), None);
}

#[tokio::test]
async fn stdin_is_closed() {
    // `cat` would block forever on an inherited terminal
    let out = CommandRunner::new(Duration::from_secs(5))
        .run("cat")
        .await
        .unwrap();
    assert_eq!(out, "");
}

#[tokio::test]
async fn stderr_is_discarded() {
    let out = CommandRunner::default()
        .run(r#"sh -c "echo oops >&2; echo fine""#)
        .await
        .unwrap();
    assert_eq!(out, "fine\n");
}

#[tokio::test]
async fn slow_command_is_killed_on_timeout() {
    let runner = CommandRunner::new(Duration::from_millis(200));
    let started = Instant::now();

    let err = runner.run("sleep 5").await.unwrap_err();

    assert!(matches!(err, CommandError::TimedOut { .. }));
    assert!(started.elapsed() < Duration::from_secs(3));
}
