use super::*;

#[test]
fn test_push_pop() {
    let out = run_ok("DEFVAR GF@x\nPUSHS int@1\nPUSHS string@two\nPOPS GF@x\nWRITE GF@x\nPOPS GF@x\nWRITE GF@x\n");
    assert_eq!(out, "two1");
}

#[test]
fn test_pop_empty() {
    assert_eq!(run_err("DEFVAR GF@x\nPOPS GF@x\n"), ErrorKind::MissingValue);
    assert_eq!(run_err("PUSHS int@1\nCLEARS\nADDS\n"), ErrorKind::MissingValue);
}

#[test]
fn test_pushs_uninitialized() {
    assert_eq!(run_err("DEFVAR GF@x\nPUSHS GF@x\n"), ErrorKind::MissingValue);
}

#[test]
fn test_stack_arithmetic_operand_order() {
    let out = run_ok(
        "DEFVAR GF@r\nPUSHS int@10\nPUSHS int@3\nSUBS\nPOPS GF@r\nWRITE GF@r\n\
         PUSHS int@-7\nPUSHS int@2\nIDIVS\nPOPS GF@r\nWRITE GF@r\n",
    );
    assert_eq!(out, "7-4");
}

#[test]
fn test_stack_relational_and_logic() {
    let out = run_ok(
        "DEFVAR GF@r\nPUSHS int@1\nPUSHS int@2\nLTS\nPUSHS bool@true\nANDS\nNOTS\nPOPS GF@r\nWRITE GF@r\n\
         PUSHS nil@nil\nPUSHS string@x\nEQS\nPOPS GF@r\nWRITE GF@r\n",
    );
    assert_eq!(out, "falsefalse");
}

#[test]
fn test_stack_type_errors() {
    assert_eq!(run_err("PUSHS int@1\nPUSHS bool@true\nADDS\n"), ErrorKind::OperandType);
    assert_eq!(run_err("PUSHS nil@nil\nPUSHS nil@nil\nGTS\n"), ErrorKind::OperandType);
    assert_eq!(run_err("PUSHS int@1\nPUSHS int@0\nIDIVS\n"), ErrorKind::OperandValue);
}

#[test]
fn test_stack_string_forms() {
    let out = run_ok(
        "DEFVAR GF@r\nPUSHS int@65\nINT2CHARS\nPOPS GF@r\nWRITE GF@r\n\
         PUSHS string@abc\nPUSHS int@1\nSTRI2INTS\nPOPS GF@r\nWRITE GF@r\n",
    );
    assert_eq!(out, "A98");
}

#[test]
fn test_stack_jump_with_label_operand() {
    let out = run_ok(
        "PUSHS int@1\nPUSHS int@1\nJUMPIFEQS same\nWRITE string@differ\nLABEL same\n\
         PUSHS string@a\nPUSHS string@b\nJUMPIFNEQS end\nWRITE string@equal\nLABEL end\nWRITE string@done\n",
    );
    assert_eq!(out, "done");
}

#[test]
fn test_stack_jump_pops_label_from_stack() {
    let out = run_ok(
        "PUSHS target\nPUSHS int@2\nPUSHS int@2\nJUMPIFEQS\nWRITE string@fallthrough\n\
         LABEL target\nWRITE string@jumped\n",
    );
    assert_eq!(out, "jumped");
}

#[test]
fn test_stack_jump_not_taken_consumes_label() {
    let out = run(
        "DEFVAR GF@n\nPUSHS target\nPUSHS int@1\nPUSHS int@2\nJUMPIFEQS\nPOPS GF@n\nLABEL target\n",
    );
    assert_eq!(out.kind(), ErrorKind::MissingValue);
}

#[test]
fn test_label_entry_is_not_a_value() {
    assert_eq!(run_err("DEFVAR GF@x\nLABEL l\nPUSHS l\nPOPS GF@x\n"), ErrorKind::OperandType);
    assert_eq!(run_err("PUSHS int@1\nPUSHS int@2\nJUMPIFEQS\n"), ErrorKind::MissingValue);
    assert_eq!(run_err("PUSHS undefined\n"), ErrorKind::Semantic);
}

#[test]
fn test_operand_stack_peek_leaves_slots() {
    let mut stack = OperandStack::new();
    assert_eq!(stack.peek(0).unwrap_err().kind, ErrorKind::MissingValue);

    stack.push_label("end".into());
    stack.push(Val::Int(4));
    stack.push(Val::from("s"));
    assert_eq!(stack.peek_pair().unwrap(), (&Val::Int(4), &Val::from("s")));
    assert_eq!(stack.peek_label(2).unwrap().as_ref(), "end");
    assert_eq!(stack.peek(2).unwrap_err().kind, ErrorKind::OperandType);
    assert_eq!(stack.peek_label(0).unwrap_err().kind, ErrorKind::OperandType);
    assert_eq!(stack.len(), 3);

    stack.replace_top(2, Val::Bool(true));
    assert_eq!(stack.len(), 2);
    assert_eq!(stack.pop().unwrap(), Val::Bool(true));
    stack.truncate_top(5);
    assert!(stack.is_empty());
}
