#[test]
fn declare_assign_and_print() {
    let src = "王麻子凶得很。王麻子巴倒250。摆哈儿：王麻子。";
    assert_eq!(sichuan::run(src).unwrap(), "250\n");
}

#[test]
fn declared_variable_defaults_to_zero() {
    let src = "老王凶得很。摆哈儿：老王。";
    assert_eq!(sichuan::run(src).unwrap(), "0\n");
}

#[test]
fn inc_by_one_and_inc_by_n_steps() {
    let src = "王麻子凶得很。王麻子走哈儿。王麻子走五步。摆哈儿：王麻子。";
    assert_eq!(sichuan::run(src).unwrap(), "6\n");
}

#[test]
fn dec_by_one_and_dec_by_n_steps() {
    let src = "王麻子凶得很。王麻子巴倒十。王麻子倒起走哈儿。王麻子倒起走三步。摆哈儿：王麻子。";
    assert_eq!(sichuan::run(src).unwrap(), "6\n");
}
