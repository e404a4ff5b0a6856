#[test]
fn inclusive_loop_counts_up() {
    let src = "老王从1拢3打转转儿：摆哈儿：老王。转完了。";
    assert_eq!(sichuan::run(src).unwrap(), "1\n2\n3\n");
}

#[test]
fn inclusive_loop_counts_down_when_start_exceeds_end() {
    let src = "老王从3拢1打转转儿：摆哈儿：老王。转完了。";
    assert_eq!(sichuan::run(src).unwrap(), "3\n2\n1\n");
}

#[test]
fn loop_executes_once_when_bounds_are_equal() {
    let src = "老王从5拢5打转转儿：摆哈儿：老王。转完了。";
    assert_eq!(sichuan::run(src).unwrap(), "5\n");
}

#[test]
fn loop_body_does_not_introduce_a_new_scope() {
    // Reassigning inside the loop body should be visible after the loop.
    let src = "计数凶得很。老王从1拢3打转转儿：计数走哈儿。转完了。摆哈儿：计数。";
    assert_eq!(sichuan::run(src).unwrap(), "3\n");
}
