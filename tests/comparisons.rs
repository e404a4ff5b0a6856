#[test]
fn four_comparisons_concatenated_on_one_line() {
    let src = "摆哈儿：五比二大、五比二小、一跟倒2一模一样呢、1跟倒二不一样。";
    assert_eq!(sichuan::run(src).unwrap(), "对错错对\n");
}

#[test]
fn comparisons_do_not_chain() {
    // `比` closes at the first `大`/`小`; a trailing comparison keyword left
    // over is a separate concat operand, not a continuation.
    let src = "摆哈儿：五比二大、二比五大。";
    assert_eq!(sichuan::run(src).unwrap(), "对错\n");
}

#[test]
fn string_equality_compares_by_value() {
    let src = "摆哈儿：“巴适”跟倒“巴适”一模一样呢。";
    assert_eq!(sichuan::run(src).unwrap(), "对\n");
}

#[test]
fn comparing_incompatible_types_is_a_type_error() {
    let err = sichuan::run("摆哈儿：“巴适”跟倒1一模一样呢。").unwrap_err();
    assert!(matches!(err, sichuan::InterpError::Type(_)));
}
