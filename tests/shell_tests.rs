use nimbus_shell::arena::POOL_SIZE;
use nimbus_shell::{Console, ScriptedConsole, Shell};

/// Run a complete scripted session and return everything the shell wrote
fn run_session(lines: &[&str]) -> String {
    let mut shell = Shell::new(POOL_SIZE);
    let mut console = ScriptedConsole::with_input(lines);
    shell.run(&mut console);
    console.output().to_string()
}

#[test]
fn test_full_file_workflow() {
    let output = run_session(&[
        "mkdir docs",
        "cd docs",
        "touch a.txt",
        "edit a.txt",
        "hello",
        ":w",
        ":q",
        "cat a.txt",
        "cd ..",
        "ls",
    ]);

    assert!(output.contains("Wrote 5 bytes to 'a.txt'"));
    assert!(output.contains("hello\n"));
    // Root listing shows the directory, not the nested file. The listing
    // sits between the prompt that read `ls` and the final prompt.
    let listing = output.rsplit("root@nimbus /> ").nth(1).unwrap();
    assert!(listing.contains("docs/"));
    assert!(!listing.contains("a.txt"));
}

#[test]
fn test_every_failure_is_rendered_and_session_continues() {
    let output = run_session(&[
        "cat missing",
        "cd missing",
        "touch f",
        "cd f",
        "mkdir f",
        "cd ..",
        "echo survived",
    ]);

    assert!(output.contains("missing: not found"));
    assert!(output.contains("f: not a directory"));
    assert!(output.contains("f: already exists"));
    assert!(output.contains("already at root directory"));
    assert!(output.contains("survived\n"));
}

#[test]
fn test_editor_quit_discards_unsaved_lines() {
    let output = run_session(&[
        "edit note",
        "saved line",
        ":w",
        "unsaved line",
        ":q",
        "cat note",
    ]);

    assert!(output.contains("saved line\n"));
    assert!(!output.contains("unsaved line\nroot@nimbus"));
}

#[test]
fn test_editing_a_directory_is_rejected() {
    let output = run_session(&["mkdir d", "edit d", "echo next"]);
    assert!(output.contains("d: is a directory"));
    assert!(output.contains("next\n"));
}

#[test]
fn test_mem_reflects_allocations() {
    let mut shell = Shell::new(POOL_SIZE);
    let mut console = ScriptedConsole::with_input(&["mem", "mkdir d", "mem"]);
    shell.run(&mut console);

    let output = console.output();
    let carved: Vec<&str> = output
        .lines()
        .filter(|line| line.starts_with("carved:"))
        .collect();
    assert_eq!(carved.len(), 2);
    assert_ne!(carved[0], carved[1]);
}

#[test]
fn test_banner_and_help() {
    let output = run_session(&["banner", "help"]);
    assert!(output.contains("Welcome to NimbusShell!"));
    assert!(output.contains("Available commands:"));
    assert!(output.contains("mkdir <name>"));
}

#[test]
fn test_session_ends_on_end_of_input() {
    // No explicit exit: the loop stops when input runs out
    let output = run_session(&["echo last"]);
    assert!(output.contains("last\n"));
}
