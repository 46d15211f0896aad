use super::*;

#[test]
fn closures_are_triggers() {
    let mut calls = 0;
    {
        let mut t = || calls += 1;
        t.request_render();
        t.request_render();
    }
    assert_eq!(calls, 2);
}

#[test]
fn redraw_flag_counts_and_resets() {
    let flag = RedrawFlag::new();
    let mut handle = flag.clone();
    handle.request_render();
    handle.request_render();
    assert_eq!(flag.pending(), 2);
    assert_eq!(flag.take(), 2);
    assert_eq!(flag.pending(), 0);
}
