//! End-to-end tests running the built `tascal` binary against a handful of
//! representative programs, the way this workspace's own CLI tool drives
//! itself with `assert_cmd` against a temp directory.

use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::tempdir;

fn tascal() -> Command {
    Command::cargo_bin("tascal").unwrap()
}

fn write(dir: &tempfile::TempDir, name: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).unwrap();
    path
}

#[test]
fn scenario_a_trivial_program() {
    let dir = tempdir().unwrap();
    let input = write(&dir, "a.tas", "program p; begin end.");
    tascal().arg(&input).assert().success();
    let output = fs::read_to_string(input.with_extension("mepa")).unwrap();
    assert_eq!(output, "     INPP\n     PARA\n     FIM\n");
}

#[test]
fn scenario_b_assignment_and_write() {
    let dir = tempdir().unwrap();
    let input = write(
        &dir,
        "b.tas",
        "program p; var x: integer; begin x := 3 + 4; write(x) end.",
    );
    tascal().arg(&input).assert().success();
    let output = fs::read_to_string(input.with_extension("mepa")).unwrap();
    let expected = [
        "INPP", "AMEM 1", "CRCT 3", "CRCT 4", "SOMA", "ARMZ 0,0", "CRVL 0,0", "IMPR", "PARA",
        "FIM",
    ]
    .iter()
    .map(|line| format!("     {line}"))
    .collect::<Vec<_>>()
    .join("\n")
        + "\n";
    assert_eq!(output, expected);
}

#[test]
fn scenario_c_if_else_and_while_allocate_four_labels() {
    let dir = tempdir().unwrap();
    let input = write(
        &dir,
        "c.tas",
        "program p; var x,y: integer;\n\
         begin\n\
           read(x);\n\
           y := 0;\n\
           while x > 0 do begin y := y + x; x := x - 1 end;\n\
           if y = 0 then write(y) else write(x)\n\
         end.",
    );
    tascal().arg(&input).assert().success();
    let output = fs::read_to_string(input.with_extension("mepa")).unwrap();
    for label in ["R01", "R02", "R03", "R04"] {
        assert!(
            output.contains(&format!("{label}: NADA")),
            "missing label {label} in:\n{output}"
        );
    }
    assert!(!output.contains("R05"));
}

#[test]
fn scenario_d_undeclared_variable() {
    let dir = tempdir().unwrap();
    let input = write(&dir, "d.tas", "program p; begin x := 1 end.");
    tascal()
        .arg(&input)
        .assert()
        .failure()
        .code(1)
        .stdout(predicate::str::contains(
            "ERRO SEMÂNTICO na linha 1: variable 'x' not declared",
        ));
    assert!(!input.with_extension("mepa").exists());
}

#[test]
fn scenario_e_type_mismatch() {
    let dir = tempdir().unwrap();
    let input = write(
        &dir,
        "e.tas",
        "program p; var b: boolean; begin b := 1 + 2 end.",
    );
    tascal()
        .arg(&input)
        .assert()
        .failure()
        .code(1)
        .stdout(predicate::str::contains("incompatible assignment"));
    assert!(!input.with_extension("mepa").exists());
}

#[test]
fn scenario_f_non_boolean_condition() {
    let dir = tempdir().unwrap();
    let input = write(
        &dir,
        "f.tas",
        "program p; var x: integer; begin if x then write(x) end.",
    );
    tascal()
        .arg(&input)
        .assert()
        .failure()
        .code(1)
        .stdout(predicate::str::contains("condition must be boolean"));
    assert!(!input.with_extension("mepa").exists());
}

#[test]
fn missing_file_fails_with_nonzero_exit() {
    tascal().arg("/no/such/file.tas").assert().failure();
}

#[test]
fn output_override_is_honored() {
    let dir = tempdir().unwrap();
    let input = write(&dir, "g.tas", "program p; begin end.");
    let output = dir.path().join("custom.out");
    tascal()
        .arg(&input)
        .arg("-o")
        .arg(&output)
        .assert()
        .success();
    assert!(output.exists());
    assert!(!input.with_extension("mepa").exists());
}

#[test]
fn emit_tokens_prints_without_writing_mepa() {
    let dir = tempdir().unwrap();
    let input = write(&dir, "h.tas", "program p; begin end.");
    tascal()
        .arg(&input)
        .arg("--emit")
        .arg("tokens")
        .assert()
        .success()
        .stdout(predicate::str::contains("Program"));
    assert!(!input.with_extension("mepa").exists());
}
