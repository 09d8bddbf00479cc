use super::*;

#[test]
fn test_call_return_resumes_after_call() {
    let out = run_ok(
        "WRITE string@a\nCALL sub\nWRITE string@c\nEXIT int@0\n\
         LABEL sub\nWRITE string@b\nRETURN\n",
    );
    assert_eq!(out, "abc");
}

#[test]
fn test_call_as_last_instruction_returns_past_end() {
    let out = run("JUMP main\nLABEL sub\nWRITE string@s\nRETURN\nLABEL main\nCALL sub\n");
    assert_eq!(out.result, Ok(0));
    assert_eq!(out.stdout, "s");
}

#[test]
fn test_return_without_call() {
    assert_eq!(run_err("RETURN\n"), ErrorKind::MissingValue);
}

#[test]
fn test_loop_counts_down() {
    let out = run_ok(
        "DEFVAR GF@i\nMOVE GF@i int@3\nLABEL loop\nWRITE GF@i\nSUB GF@i GF@i int@1\n\
         JUMPIFNEQ loop GF@i int@0\nWRITE string@!\n",
    );
    assert_eq!(out, "321!");
}

#[test]
fn test_jump_skips_instructions() {
    assert_eq!(run_ok("JUMP end\nWRITE string@skipped\nLABEL end\nWRITE string@done\n"), "done");
}

#[test]
fn test_jumpifeq_checks_operands_when_not_taken() {
    assert_eq!(
        run_err("LABEL l\nJUMPIFEQ l int@1 string@1\n"),
        ErrorKind::OperandType
    );
    assert_eq!(run_err("JUMPIFEQ missing int@1 int@2\n"), ErrorKind::Semantic);
}

#[test]
fn test_jumpifeq_nil_against_other_types() {
    let out = run_ok(
        "JUMPIFEQ yes nil@nil int@0\nWRITE string@ne\nLABEL yes\n\
         JUMPIFNEQ done nil@nil nil@nil\nWRITE string@eq\nLABEL done\n",
    );
    assert_eq!(out, "neeq");
}

#[test]
fn test_undefined_label() {
    assert_eq!(run_err("JUMP nowhere\n"), ErrorKind::Semantic);
    assert_eq!(run_err("CALL nowhere\n"), ErrorKind::Semantic);
}

#[test]
fn test_duplicate_label_rejected_at_load() {
    let err = load_source(&prog("LABEL a\nLABEL a\n"), SourceFormat::Text).unwrap_err();
    assert_eq!(err.kind, ErrorKind::Semantic);
}

#[test]
fn test_exit_codes() {
    assert_eq!(run("EXIT int@49\nWRITE string@unreachable\n").result, Ok(49));
    assert_eq!(run("EXIT int@0\n").result, Ok(0));
    assert_eq!(run_err("EXIT int@50\n"), ErrorKind::OperandValue);
    assert_eq!(run_err("EXIT int@-1\n"), ErrorKind::OperandValue);
    assert_eq!(run_err("EXIT string@1\n"), ErrorKind::OperandType);
    assert_eq!(run_err("DEFVAR GF@c\nEXIT GF@c\n"), ErrorKind::MissingValue);
}

#[test]
fn test_exit_output_is_kept() {
    let out = run("WRITE string@before\nEXIT int@7\n");
    assert_eq!(out.code(), 7);
    assert_eq!(out.stdout, "before");
}

#[test]
fn test_empty_program_halts_immediately() {
    let program = load_source(".IPPcode22\n", SourceFormat::Text).unwrap();
    let vm = Vm::new(&program);
    assert_eq!(vm.state(), ExecState::Halted(0));
}

#[test]
fn test_step_by_step() {
    let program = load_source(&prog("LABEL a\nJUMP b\nLABEL b\n"), SourceFormat::Text).unwrap();
    let mut input = VecInput::default();
    let (mut stdout, mut stderr) = (Vec::new(), Vec::new());
    let mut ctx = VmContext::new(&mut input, &mut stdout, &mut stderr);
    let mut vm = Vm::new(&program);

    assert_eq!(vm.state(), ExecState::Running(1));
    assert_eq!(vm.step(&mut ctx).unwrap(), ExecState::Running(2));
    assert_eq!(vm.step(&mut ctx).unwrap(), ExecState::Running(3));
    assert_eq!(vm.step(&mut ctx).unwrap(), ExecState::Running(4));
    assert_eq!(vm.step(&mut ctx).unwrap(), ExecState::Halted(0));
    assert_eq!(vm.step(&mut ctx).unwrap(), ExecState::Halted(0));
    assert_eq!(vm.executed(), 3);
}

#[test]
fn test_failure_is_terminal_and_located() {
    let program = load_source(&prog("LABEL a\nIDIV GF@x int@1 int@0\n"), SourceFormat::Text).unwrap();
    let mut input = VecInput::default();
    let (mut stdout, mut stderr) = (Vec::new(), Vec::new());
    let mut ctx = VmContext::new(&mut input, &mut stdout, &mut stderr);
    let mut vm = Vm::new(&program);

    let err = vm.run(&mut ctx).unwrap_err();
    assert_eq!(err.kind, ErrorKind::UndefinedVariable);
    let location = err.location.expect("error carries its instruction");
    assert_eq!(location.order, 2);
    assert_eq!(vm.state(), ExecState::Failed(ErrorKind::UndefinedVariable));
    assert_eq!(vm.step(&mut ctx).unwrap(), ExecState::Failed(ErrorKind::UndefinedVariable));
}
