#[test]
fn return_outside_a_function_is_an_error() {
    let err = sichuan::run("爬远点一。").unwrap_err();
    assert!(matches!(err, sichuan::InterpError::ReturnOutsideFunction { .. }));
}

#[test]
fn calling_an_unknown_function_is_a_name_error() {
    let err = sichuan::run("喊没有这个函数。").unwrap_err();
    assert!(matches!(err, sichuan::InterpError::Name(_)));
}

#[test]
fn referencing_an_unknown_variable_is_a_name_error() {
    let err = sichuan::run("摆哈儿：老王。").unwrap_err();
    assert!(matches!(err, sichuan::InterpError::Name(_)));
}

#[test]
fn output_produced_before_a_fatal_error_is_preserved() {
    let err = sichuan::run("摆哈儿：1。喊没有这个函数。").unwrap_err();
    assert_eq!(err.partial_output(), "1\n");
}

#[test]
fn malformed_program_is_a_parse_error() {
    let err = sichuan::run("凶得很").unwrap_err();
    assert!(matches!(err, sichuan::InterpError::Parse(_)));
}
