//! End-to-end scenario tests for the gup compiler driver.
//!
//! Each test compiles a small source snippet through the full
//! `CompilerState` pipeline (lex -> parse -> emit) and checks the
//! resulting assembly text, mirroring scenarios A-F.

use gup_diagnostic::ColorMode;
use gupc::CompilerState;

fn compile_to_string(src: &str) -> String {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = dir.path().join("in.gup");
    let output = dir.path().join("out.asm");
    std::fs::write(&input, src).expect("write source");

    let mut state =
        CompilerState::new(&input, &output, ColorMode::Never, false).expect("open state");
    state.compile().expect("compile");
    std::fs::read_to_string(&output).expect("read output")
}

fn compile_err(src: &str) -> gup_diagnostic::GupErrorKind {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = dir.path().join("in.gup");
    let output = dir.path().join("out.asm");
    std::fs::write(&input, src).expect("write source");

    let mut state =
        CompilerState::new(&input, &output, ColorMode::Never, false).expect("open state");
    state.compile().expect_err("compile should fail").kind
}

#[test]
fn scenario_a_inline_assembly_only() {
    let out = compile_to_string("@ mov rax, 1 ;");
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines[0], "[section .text]");
    assert_eq!(lines[1], "\tmov rax, 1 ");
}

#[test]
fn scenario_b_public_proc_with_number_return() {
    let out = compile_to_string("pub proc main -> u32 { return 42 ; }");
    let text_start = out.find("[section .text]").expect("text section");
    let tail = &out[text_start..];
    let global = tail.find("[global main]").expect("global directive");
    let label = tail.find("main:").expect("label");
    let mov = tail.find("mov eax, 42").expect("mov");
    let ret = tail.find("\tret").expect("ret");
    assert!(global < label);
    assert!(label < mov);
    assert!(mov < ret);
    assert_eq!(tail.matches("ret").count(), 1, "no trailing epilogue ret after a return");
}

#[test]
fn scenario_c_global_pointer_emits_qword() {
    let out = compile_to_string("u8 *p ;");
    assert!(out.contains("[section .data]"));
    assert!(out.contains("p: dq 0"));
}

#[test]
fn scenario_d_loop_with_break_and_continue() {
    let out = compile_to_string("pub proc f -> u8 { loop { continue ; break ; } }");
    assert!(out.contains("L.0:"));
    assert!(out.contains("jmp L.0\n") || out.contains("jmp L.0"));
    assert!(out.contains("jmp L.0.1"));
    assert!(out.contains("L.0.1:"));
    assert!(out.trim_end().ends_with("ret"));
}

#[test]
fn scenario_e_struct_definition_then_instance() {
    let out = compile_to_string("struct Pt { u32 x ; u32 y ; } struct Pt p ;");
    let data_start = out.find("[section .data]").expect("data section");
    let tail = &out[data_start..];
    assert_eq!(tail.matches("p.x: dd 0").count(), 1);
    assert_eq!(tail.matches("p.y: dd 0").count(), 1);
}

#[test]
fn scenario_f_forward_declared_proc_has_no_body() {
    let out = compile_to_string("proc f -> u8 ;");
    assert!(!out.contains("f:"));
    assert!(!out.contains("ret"));
}

#[test]
fn scope_depth_eight_succeeds_nine_fails() {
    // The enclosing `proc` scope itself counts as one level, so 7 nested
    // loops inside it reaches exactly MAX_SCOPE_DEPTH (8) and succeeds.
    let mut src = String::new();
    for _ in 0..7 {
        src.push_str("loop { ");
    }
    for _ in 0..7 {
        src.push_str("} ");
    }
    let src = format!("pub proc f -> void {{ {src} }}");
    let _ = compile_to_string(&src);

    // An 8th nested loop pushes a 9th scope and must overflow.
    let mut deep = String::new();
    for _ in 0..8 {
        deep.push_str("loop { ");
    }
    for _ in 0..8 {
        deep.push_str("} ");
    }
    let deep = format!("pub proc f -> void {{ {deep} }}");
    assert_eq!(compile_err(&deep), gup_diagnostic::GupErrorKind::ScopeOverflow);
}

#[test]
fn unterminated_inline_asm_is_unexpected_eof() {
    assert_eq!(compile_err("@ mov rax, 1"), gup_diagnostic::GupErrorKind::UnexpectedEof);
}

#[test]
fn return_in_void_function_is_scope_violation() {
    assert_eq!(
        compile_err("proc f -> void { return 1 ; }"),
        gup_diagnostic::GupErrorKind::ScopeViolation
    );
}

#[test]
fn break_at_file_scope_is_scope_violation() {
    assert_eq!(compile_err("break ;"), gup_diagnostic::GupErrorKind::ScopeViolation);
}

#[test]
fn nested_proc_is_scope_violation() {
    assert_eq!(
        compile_err("proc f -> void { proc g -> void { } }"),
        gup_diagnostic::GupErrorKind::ScopeViolation
    );
}

#[test]
fn identical_input_compiles_byte_identical_output() {
    let src = "pub proc main -> u32 { loop { break ; } return 0 ; }";
    let first = compile_to_string(src);
    let second = compile_to_string(src);
    assert_eq!(first, second);
}

#[test]
fn underscore_separators_are_value_preserving() {
    let out = compile_to_string("pub proc f -> u32 { return 1_000 ; }");
    assert!(out.contains("mov eax, 1000"));
}
