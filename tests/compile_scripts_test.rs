// End-to-end tests for the event script compiler
// Compiles whole scripts through the public API with the built-in command set

use mapscript::script_compiler::{
    CommandTable, CompilerError, DiagnosticKind, ScriptCompiler, Severity,
};

fn compiler() -> ScriptCompiler {
    ScriptCompiler::new().expect("built-in command table should load")
}

#[test]
fn test_fixture_script_compiles() {
    let source = include_str!("scripts/oak_lab.script");
    let assembly = compiler().compile(source);

    assert!(
        assembly.is_usable(),
        "unexpected diagnostics: {:?}",
        assembly.diagnostics.iter().collect::<Vec<_>>()
    );
    assert_eq!(assembly.bytes.len(), 101);

    assert_eq!(assembly.labels.lookup("START"), Some(0));
    assert_eq!(assembly.labels.lookup("ACCEPT"), Some(62));
    assert_eq!(assembly.labels.lookup("RIVAL"), Some(82));
    assert_eq!(assembly.labels.lookup("DONE"), Some(95));
    assert_eq!(assembly.variables.lookup("choice"), Ok(0));
    assert_eq!(assembly.variables.lookup("rival_name"), Ok(1));
}

#[test]
fn test_fixture_script_bytes() {
    let source = include_str!("scripts/oak_lab.script");
    let bytes = compiler().compile(source).bytes;

    // FREEZE_PLAYER, then SET choice 0
    assert_eq!(&bytes[0..6], &[0x33, 0x01, 0x00, 0x00, 0x00, 0x00]);
    // STRING rival_name "BLUE"
    assert_eq!(
        &bytes[6..16],
        &[0x03, 0x01, 0x00, 0x03, 0x04, 0x00, b'B', b'L', b'U', b'E']
    );
    // YES_NO label slot patched with ACCEPT, JUMP START patched with 0
    assert_eq!(&bytes[57..62], &[0x3E, 0x00, 0x10, 0x00, 0x00]);
    // IF_EQUAL choice 1 RIVAL; JUMP DONE
    assert_eq!(
        &bytes[72..82],
        &[0x13, 0x00, 0x00, 0x00, 0x01, 0x52, 0x00, 0x10, 0x5F, 0x00]
    );
    // MESSAGE with a variable takes the integer-variable form
    assert_eq!(&bytes[82..86], &[0x21, 0x01, 0x01, 0x00]);
    // SET_FLAG 0x0042, RELEASE_PLAYER, END
    assert_eq!(&bytes[95..], &[0x08, 0x00, 0x42, 0x00, 0x34, 0x00]);
}

#[test]
fn test_end_to_end_loop() {
    let assembly = compiler().compile("LOOP:\nJUMP LOOP\n");
    assert_eq!(assembly.bytes, vec![0x10, 0x00, 0x00]);
}

#[test]
fn test_end_to_end_set() {
    let assembly = compiler().compile("SET x 10\n");
    assert_eq!(assembly.bytes, vec![0x01, 0x00, 0x00, 0x00, 0x0A]);
}

#[test]
fn test_errors_are_collected_across_lines() {
    let source = "\
        JUMP MISSING\n\
        BOGUS 1\n\
        WAIT\n\
        ADD ghost 1\n\
        PLAY_SOUND 999\n\
        END\n";
    let assembly = compiler().compile(source);

    let kinds: Vec<_> = assembly.diagnostics.iter().map(|d| d.kind).collect();
    assert_eq!(
        kinds,
        vec![
            DiagnosticKind::UnknownCommand,
            DiagnosticKind::ArgumentCountMismatch,
            DiagnosticKind::UnknownVariableReference,
            DiagnosticKind::ValueTruncation,
            DiagnosticKind::UndefinedLabel,
        ]
    );
    assert_eq!(assembly.diagnostics.error_count(), 4);
    assert_eq!(assembly.diagnostics.warning_count(), 1);
    assert!(!assembly.is_usable());

    let lines: Vec<_> = assembly.diagnostics.iter().map(|d| d.line).collect();
    assert_eq!(lines, vec![2, 3, 4, 5, 1]);
    assert!(assembly
        .diagnostics
        .iter()
        .any(|d| d.severity() == Severity::Warning));
}

#[test]
fn test_custom_command_table() {
    let commands = CommandTable::from_toml_str(
        r###"
        [[command]]
        mnemonic = "BEEP"
        opcode = 0xEE
        params = ["##"]
        "###,
    )
    .unwrap();
    let compiler = ScriptCompiler::with_commands(commands);

    let assembly = compiler.compile("BEEP 440\nEND");
    assert_eq!(assembly.bytes, vec![0xEE, 0x00, 0xB8, 0x01]);
    assert_eq!(
        assembly.diagnostics.count_of(DiagnosticKind::UnknownCommand),
        1
    );
}

#[test]
fn test_unknown_parameter_kind_is_a_load_error() {
    let err = CommandTable::from_toml_str(
        r#"
        [[command]]
        mnemonic = "ODD"
        opcode = 1
        params = ["z"]
        "#,
    )
    .unwrap_err();
    assert!(matches!(err, CompilerError::UnknownParameterKind { .. }));
}

#[test]
fn test_compilations_do_not_share_state() {
    let compiler = compiler();
    let first = compiler.compile("SET x 1\nHERE:\nEND");
    let second = compiler.compile("SET x 1\nHERE:\nEND");

    assert!(first.is_usable());
    assert!(second.is_usable());
    assert_eq!(first.bytes, second.bytes);
}
