use super::*;

#[test]
fn test_arithmetic() {
    let out = run_ok(
        "DEFVAR GF@r\nADD GF@r int@2 int@3\nWRITE GF@r\nWRITE string@,\n\
         MUL GF@r GF@r int@-4\nWRITE GF@r\nWRITE string@,\n\
         IDIV GF@r int@7 int@2\nWRITE GF@r\nWRITE string@,\n\
         IDIV GF@r int@-7 int@2\nWRITE GF@r\n",
    );
    assert_eq!(out, "5,-20,3,-4");
}

#[test]
fn test_idiv_by_zero() {
    assert_eq!(run_err("DEFVAR GF@r\nIDIV GF@r int@1 int@0\n"), ErrorKind::OperandValue);
}

#[test]
fn test_overflow() {
    assert_eq!(
        run_err("DEFVAR GF@r\nADD GF@r int@9223372036854775807 int@1\n"),
        ErrorKind::OperandValue
    );
    assert_eq!(
        run_err("DEFVAR GF@r\nMUL GF@r int@-9223372036854775808 int@-1\n"),
        ErrorKind::OperandValue
    );
}

#[test]
fn test_arithmetic_type_errors() {
    assert_eq!(run_err("DEFVAR GF@r\nADD GF@r int@1 string@1\n"), ErrorKind::OperandType);
    assert_eq!(run_err("DEFVAR GF@r\nSUB GF@r nil@nil int@1\n"), ErrorKind::OperandType);
}

#[test]
fn test_failed_instruction_has_no_effect() {
    let out = run("DEFVAR GF@r\nMOVE GF@r int@1\nADD GF@r GF@r string@x\n");
    assert_eq!(out.kind(), ErrorKind::OperandType);

    let program = load_source(
        &prog("DEFVAR GF@r\nMOVE GF@r int@1\nIDIV GF@r GF@r int@0\n"),
        SourceFormat::Text,
    )
    .unwrap();
    let mut input = VecInput::default();
    let (mut stdout, mut stderr) = (Vec::new(), Vec::new());
    let mut ctx = VmContext::new(&mut input, &mut stdout, &mut stderr);
    let mut vm = Vm::new(&program);
    assert_eq!(vm.run(&mut ctx).unwrap_err().kind, ErrorKind::OperandValue);
    assert_eq!(vm.frames().global().get("r").unwrap().value, Val::Int(1));
}

#[test]
fn test_failed_stack_instruction_keeps_operands() {
    let (kind, stack) = run_err_stack("PUSHS int@1\nPUSHS string@x\nADDS\n");
    assert_eq!(kind, ErrorKind::OperandType);
    assert_eq!(stack.len(), 2);
    assert_eq!(stack.peek_pair().unwrap(), (&Val::Int(1), &Val::from("x")));

    let (kind, stack) = run_err_stack("PUSHS int@1\nPUSHS int@2\nJUMPIFEQS nowhere\n");
    assert_eq!(kind, ErrorKind::Semantic);
    assert_eq!(stack.len(), 2);

    let (kind, stack) = run_err_stack("PUSHS int@5\nNOTS\n");
    assert_eq!(kind, ErrorKind::OperandType);
    assert_eq!(stack.peek(0).unwrap(), &Val::Int(5));

    let (kind, stack) = run_err_stack("PUSHS string@ab\nPUSHS int@7\nSTRI2INTS\n");
    assert_eq!(kind, ErrorKind::StringOperation);
    assert_eq!(stack.len(), 2);

    let (kind, stack) = run_err_stack("PUSHS int@1\nPUSHS int@2\nPUSHS int@3\nJUMPIFEQS\n");
    assert_eq!(kind, ErrorKind::OperandType);
    assert_eq!(stack.len(), 3);

    let (kind, stack) = run_err_stack("PUSHS int@1\nIDIVS\n");
    assert_eq!(kind, ErrorKind::MissingValue);
    assert_eq!(stack.len(), 1);
}

#[test]
fn test_relational() {
    let out = run_ok(
        "DEFVAR GF@r\nLT GF@r int@1 int@2\nWRITE GF@r\nGT GF@r bool@false bool@true\nWRITE GF@r\n\
         EQ GF@r nil@nil string@x\nWRITE GF@r\nEQ GF@r nil@nil nil@nil\nWRITE GF@r\n",
    );
    assert_eq!(out, "truefalsefalsetrue");
}

#[test]
fn test_relational_nil_and_mixed() {
    assert_eq!(run_err("DEFVAR GF@r\nLT GF@r nil@nil nil@nil\n"), ErrorKind::OperandType);
    assert_eq!(run_err("DEFVAR GF@r\nGT GF@r int@1 nil@nil\n"), ErrorKind::OperandType);
    assert_eq!(run_err("DEFVAR GF@r\nEQ GF@r int@1 bool@true\n"), ErrorKind::OperandType);
}

#[test]
fn test_logic() {
    let out = run_ok(
        "DEFVAR GF@r\nAND GF@r bool@true bool@false\nWRITE GF@r\nOR GF@r bool@true bool@false\nWRITE GF@r\n\
         NOT GF@r GF@r\nWRITE GF@r\n",
    );
    assert_eq!(out, "falsetruefalse");
    assert_eq!(run_err("DEFVAR GF@r\nNOT GF@r int@0\n"), ErrorKind::OperandType);
}

#[test]
fn test_xml_program_runs() {
    let src = r#"<?xml version="1.0" encoding="UTF-8"?>
<program language="IPPcode22">
  <instruction order="3" opcode="WRITE"><arg1 type="var">GF@x</arg1></instruction>
  <instruction order="1" opcode="DEFVAR"><arg1 type="var">GF@x</arg1></instruction>
  <instruction order="2" opcode="CONCAT">
    <arg3 type="string">ok</arg3>
    <arg1 type="var">GF@x</arg1>
    <arg2 type="string">xml\032</arg2>
  </instruction>
</program>
"#;
    let program = load_source(src, SourceFormat::detect(src)).unwrap();
    let mut input = VecInput::default();
    let (mut stdout, mut stderr) = (Vec::new(), Vec::new());
    {
        let mut ctx = VmContext::new(&mut input, &mut stdout, &mut stderr);
        assert_eq!(Vm::new(&program).run(&mut ctx).unwrap(), 0);
    }
    assert_eq!(String::from_utf8(stdout).unwrap(), "xml ok");
}

#[test]
fn test_json_program_runs() {
    let src = r#"{
        "language": "IPPcode22",
        "instructions": [
            {"order": 3, "opcode": "WRITE", "args": [{"type": "var", "value": "GF@x"}]},
            {"order": 1, "opcode": "DEFVAR", "args": [{"type": "var", "value": "GF@x"}]},
            {"order": 2, "opcode": "MOVE", "args": [
                {"type": "var", "value": "GF@x"},
                {"type": "string", "value": "json\\032ok"}
            ]}
        ]
    }"#;
    let program = load_source(src, SourceFormat::Json).unwrap();
    let mut input = VecInput::default();
    let (mut stdout, mut stderr) = (Vec::new(), Vec::new());
    {
        let mut ctx = VmContext::new(&mut input, &mut stdout, &mut stderr);
        assert_eq!(Vm::new(&program).run(&mut ctx).unwrap(), 0);
    }
    assert_eq!(String::from_utf8(stdout).unwrap(), "json ok");
}

#[test]
fn test_runs_terminate() {
    // Each of these ends by falling off the end, EXIT or an error.
    for body in [
        "",
        "LABEL a\n",
        "JUMP end\nLABEL end\n",
        "CALL f\nEXIT int@3\nLABEL f\nRETURN\n",
        "DEFVAR GF@i\nMOVE GF@i int@0\nLABEL l\nADD GF@i GF@i int@1\nJUMPIFNEQ l GF@i int@100\n",
        "POPFRAME\n",
    ] {
        let out = run(body);
        assert!(out.executed <= 1000, "program {body:?} ran too long");
    }
}
