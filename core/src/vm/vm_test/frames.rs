use super::*;

#[test]
fn test_move_then_write() {
    let out = run_ok("DEFVAR GF@x\nMOVE GF@x int@5\nWRITE GF@x\n");
    assert_eq!(out, "5");
}

#[test]
fn test_read_after_defvar_is_missing_value() {
    assert_eq!(run_err("DEFVAR GF@x\nWRITE GF@x\n"), ErrorKind::MissingValue);
    assert_eq!(
        run_err("DEFVAR GF@x\nDEFVAR GF@y\nADD GF@y GF@x int@1\n"),
        ErrorKind::MissingValue
    );
    assert_eq!(
        run_err("DEFVAR GF@x\nDEFVAR GF@y\nMOVE GF@y GF@x\n"),
        ErrorKind::MissingValue
    );
}

#[test]
fn test_redefinition_is_semantic() {
    assert_eq!(run_err("DEFVAR GF@x\nDEFVAR GF@x\n"), ErrorKind::Semantic);
}

#[test]
fn test_undefined_variable() {
    assert_eq!(run_err("WRITE GF@nope\n"), ErrorKind::UndefinedVariable);
    assert_eq!(run_err("MOVE GF@nope int@1\n"), ErrorKind::UndefinedVariable);
}

#[test]
fn test_missing_frames() {
    assert_eq!(run_err("PUSHFRAME\n"), ErrorKind::UndefinedFrame);
    assert_eq!(run_err("POPFRAME\n"), ErrorKind::UndefinedFrame);
    assert_eq!(run_err("DEFVAR TF@x\n"), ErrorKind::UndefinedFrame);
    assert_eq!(run_err("DEFVAR LF@x\n"), ErrorKind::UndefinedFrame);
    assert_eq!(run_err("CREATEFRAME\nPUSHFRAME\nPUSHFRAME\n"), ErrorKind::UndefinedFrame);
}

#[test]
fn test_frame_round_trip_keeps_variables() {
    let out = run_ok(
        "CREATEFRAME\nDEFVAR TF@a\nMOVE TF@a string@tf\nPUSHFRAME\nWRITE LF@a\n\
         POPFRAME\nWRITE TF@a\n",
    );
    assert_eq!(out, "tftf");
}

#[test]
fn test_createframe_discards_previous_temporary() {
    assert_eq!(
        run_err("CREATEFRAME\nDEFVAR TF@a\nCREATEFRAME\nWRITE TF@a\n"),
        ErrorKind::UndefinedVariable
    );
}

#[test]
fn test_nested_local_frames() {
    let out = run_ok(
        "CREATEFRAME\nDEFVAR TF@x\nMOVE TF@x int@1\nPUSHFRAME\n\
         CREATEFRAME\nDEFVAR TF@x\nMOVE TF@x int@2\nPUSHFRAME\n\
         WRITE LF@x\nPOPFRAME\nWRITE LF@x\n",
    );
    assert_eq!(out, "21");
}

#[test]
fn test_type_reads_uninitialized() {
    let out = run_ok(
        "DEFVAR GF@x\nDEFVAR GF@t\nTYPE GF@t GF@x\nWRITE string@[\nWRITE GF@t\nWRITE string@]\n\
         TYPE GF@t int@1\nWRITE GF@t\nTYPE GF@t nil@nil\nWRITE GF@t\nTYPE GF@t GF@t\nWRITE GF@t\n",
    );
    assert_eq!(out, "[]intnilstring");
}

#[test]
fn test_frame_stack_state_after_run() {
    let program = load_source(
        &prog("DEFVAR GF@a\nMOVE GF@a bool@true\nCREATEFRAME\nPUSHFRAME\n"),
        SourceFormat::Text,
    )
    .unwrap();
    let mut input = VecInput::default();
    let (mut stdout, mut stderr) = (Vec::new(), Vec::new());
    let mut ctx = VmContext::new(&mut input, &mut stdout, &mut stderr);
    let mut vm = Vm::new(&program);
    assert_eq!(vm.run(&mut ctx).unwrap(), 0);

    let frames = vm.frames();
    assert_eq!(frames.local_depth(), 1);
    assert!(!frames.has_temporary());
    let a = frames.global().get("a").unwrap();
    assert_eq!(a.value, Val::Bool(true));
}
