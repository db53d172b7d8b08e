use super::*;

#[test]
fn first_episode_opens() {
    let mut latch = ExpiryLatch::new(1_000);
    assert!(!latch.is_suppressed(0.0));
    assert!(latch.try_begin(0.0));
}

#[test]
fn suppressed_while_redirecting() {
    let mut latch = ExpiryLatch::new(1_000);
    assert!(latch.try_begin(0.0));
    assert!(!latch.try_begin(5_000.0));
    assert!(latch.is_suppressed(5_000.0));
}

#[test]
fn suppressed_during_cooldown_then_reopens() {
    let mut latch = ExpiryLatch::new(1_000);
    assert!(latch.try_begin(0.0));
    latch.redirect_done(100.0);

    assert!(!latch.try_begin(500.0));
    assert!(!latch.try_begin(1_099.0));
    assert!(latch.try_begin(1_100.0));
}

#[test]
fn redirect_done_without_episode_is_noop() {
    let mut latch = ExpiryLatch::new(1_000);
    latch.redirect_done(0.0);
    assert!(!latch.is_suppressed(1.0));
    assert!(latch.try_begin(1.0));
}
