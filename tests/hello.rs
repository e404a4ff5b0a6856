const SRC: &str = "摆哈儿：“你好，世界！”。";

#[test]
fn runs_hello_world() {
    let output = sichuan::run(SRC).expect("should run");
    assert_eq!(output, "你好，世界！\n");
}
