#[test]
fn bang_and_full_stop_terminators_are_interchangeable() {
    let dot = sichuan::run("摆哈儿：1。").unwrap();
    let bang = sichuan::run("摆哈儿：1！").unwrap();
    let ascii_bang = sichuan::run("摆哈儿：1!").unwrap();
    assert_eq!(dot, bang);
    assert_eq!(dot, ascii_bang);
}

#[test]
fn whitespace_and_comments_do_not_change_behavior() {
    let tight = sichuan::run("王麻子凶得很。王麻子巴倒1。摆哈儿：王麻子。").unwrap();
    let spaced = sichuan::run(
        "王麻子 凶得很 。 # declare it\n王麻子 巴倒 1 。\n摆哈儿 ：王麻子 。 # print it\n",
    )
    .unwrap();
    assert_eq!(tight, spaced);
}

#[test]
fn ascii_and_wide_parentheses_are_interchangeable() {
    let wide = sichuan::run("摆哈儿：（五加七）乘二。").unwrap();
    let narrow = sichuan::run("摆哈儿：(五加七)乘二。").unwrap();
    assert_eq!(wide, narrow);
}
