#[test]
fn multiplication_binds_tighter_than_addition() {
    assert_eq!(sichuan::run("摆哈儿：五加七乘二。").unwrap(), "19\n");
}

#[test]
fn explicit_parens_override_precedence() {
    assert_eq!(sichuan::run("摆哈儿：（五加七）乘二。").unwrap(), "24\n");
}

#[test]
fn integer_division_always_prints_as_a_float() {
    assert_eq!(sichuan::run("摆哈儿：四除以二。").unwrap(), "2.0\n");
    assert_eq!(sichuan::run("摆哈儿：五除以二。").unwrap(), "2.5\n");
}

#[test]
fn mixing_a_float_operand_promotes_the_whole_expression() {
    assert_eq!(
        sichuan::run("摆哈儿：五除以二加一。").unwrap(),
        "3.5\n"
    );
}

#[test]
fn addition_on_strings_is_a_type_error() {
    let err = sichuan::run("摆哈儿：“甲”加“乙”。").unwrap_err();
    assert!(matches!(err, sichuan::InterpError::Type(_)));
}
