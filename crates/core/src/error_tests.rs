use super::*;

#[test]
fn not_found_displays_the_offending_id() {
    let err = RunQueueError::NotFound(ItemId::new(42));
    assert_eq!(err.to_string(), "item 42 not found");
}

#[test]
fn has_running_items_has_no_payload() {
    let err = RunQueueError::HasRunningItems;
    assert!(err.to_string().contains("save_running_as_stopped"));
}
