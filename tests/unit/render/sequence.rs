use super::*;

#[test]
fn tickets_are_monotonic() {
    let seq = RenderSequencer::new();
    let a = seq.begin();
    let b = seq.begin();
    assert!(b > a);
    assert_eq!(b.generation(), a.generation() + 1);
    assert!(!seq.is_latest(a));
    assert!(seq.is_latest(b));
}

#[test]
fn stale_completion_is_rejected() {
    let seq = RenderSequencer::new();
    let slow = seq.begin();
    let fast = seq.begin();
    assert!(seq.accept(fast));
    assert!(!seq.accept(slow));
}

#[test]
fn in_order_completions_are_accepted() {
    let seq = RenderSequencer::new();
    let a = seq.begin();
    let b = seq.begin();
    assert!(seq.accept(a));
    assert!(seq.accept(b));
    assert!(!seq.accept(b));
}
