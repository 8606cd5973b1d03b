use super::*;

#[test]
fn allocator_hands_out_strictly_increasing_ids() {
    let allocator = IdAllocator::starting_at(0);
    let a = allocator.next();
    let b = allocator.next();
    let c = allocator.next();
    assert_eq!(a, ItemId::new(0));
    assert_eq!(b, ItemId::new(1));
    assert_eq!(c, ItemId::new(2));
    assert!(a < b && b < c);
}

#[test]
fn peek_does_not_allocate() {
    let allocator = IdAllocator::starting_at(5);
    assert_eq!(allocator.peek(), 5);
    assert_eq!(allocator.peek(), 5);
    assert_eq!(allocator.next(), ItemId::new(5));
    assert_eq!(allocator.peek(), 6);
}

#[test]
fn starting_at_resumes_after_persistence_reload() {
    let allocator = IdAllocator::starting_at(100);
    assert_eq!(allocator.next(), ItemId::new(100));
}

#[test]
fn display_matches_inner_value() {
    assert_eq!(ItemId::new(42).to_string(), "42");
}

#[test]
fn reset_changes_next_allocation() {
    let allocator = IdAllocator::starting_at(0);
    allocator.next();
    allocator.reset(50);
    assert_eq!(allocator.next(), ItemId::new(50));
}
