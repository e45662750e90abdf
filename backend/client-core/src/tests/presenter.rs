use crate::presenter::{Deferred, RepaintQueue};

#[test]
fn given_queued_items_when_drained_then_returned_oldest_first_and_queue_empties() {
    let mut queue = RepaintQueue::new();
    queue.push(Deferred::Notice(String::from("first")));
    queue.push(Deferred::Notice(String::from("second")));
    assert_eq!(queue.len(), 2);

    let drained = queue.drain();

    assert_eq!(
        drained,
        vec![
            Deferred::Notice(String::from("first")),
            Deferred::Notice(String::from("second")),
        ]
    );
    assert!(queue.is_empty());
    assert!(queue.drain().is_empty());
}
