#[test]
fn concat_joins_a_string_and_an_integer() {
    assert_eq!(sichuan::run("摆哈儿：“牛”、二。").unwrap(), "牛2\n");
}

#[test]
fn concat_joins_a_string_and_an_arithmetic_expression() {
    assert_eq!(
        sichuan::run("摆哈儿：“老王”、665加一。").unwrap(),
        "老王666\n"
    );
}
