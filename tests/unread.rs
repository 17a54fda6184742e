use donation_chat_service::message::service::MessageService;
use donation_chat_service::thread::service::ThreadService;
use donation_chat_service::unread::repository::UnreadTracker;
use donation_chat_service::user;

mod common;

#[tokio::test]
async fn counts_foreign_messages_until_cleared() {
    let stack = common::stack();
    let u1 = user::Id::from("u1");
    let u2 = user::Id::from("u2");

    let (dto, _) = stack.threads.get_or_create(&u1, &u2, None).await.unwrap();

    for i in 0..3 {
        stack
            .messages
            .create(&u2, dto.id(), &format!("message {i}"))
            .await
            .unwrap();
    }

    assert_eq!(3, stack.tracker.count(dto.id(), &u1).await);
    // The sender's own counter is untouched.
    assert_eq!(0, stack.tracker.count(dto.id(), &u2).await);

    stack.threads.mark_read(dto.id(), &u1).await.unwrap();
    assert_eq!(0, stack.tracker.count(dto.id(), &u1).await);
}

#[tokio::test]
async fn reply_after_reading_leaves_only_the_other_side_unread() {
    let stack = common::stack();
    let u1 = user::Id::from("u1");
    let u2 = user::Id::from("u2");

    let (dto, _) = stack.threads.get_or_create(&u1, &u2, None).await.unwrap();

    stack.messages.create(&u1, dto.id(), "Hello").await.unwrap();

    // u2 opens the thread and replies.
    stack.threads.mark_read(dto.id(), &u2).await.unwrap();
    stack
        .messages
        .create(&u2, dto.id(), "Hi back")
        .await
        .unwrap();

    assert_eq!(1, stack.tracker.total_for(&u1).await);
    assert_eq!(0, stack.tracker.total_for(&u2).await);
}

#[tokio::test]
async fn badge_total_sums_across_threads() {
    let stack = common::stack();
    let u1 = user::Id::from("u1");
    let u2 = user::Id::from("u2");
    let u3 = user::Id::from("u3");

    let (with_u2, _) = stack.threads.get_or_create(&u1, &u2, None).await.unwrap();
    let (with_u3, _) = stack.threads.get_or_create(&u1, &u3, None).await.unwrap();

    stack
        .messages
        .create(&u2, with_u2.id(), "one")
        .await
        .unwrap();
    stack
        .messages
        .create(&u3, with_u3.id(), "two")
        .await
        .unwrap();
    stack
        .messages
        .create(&u3, with_u3.id(), "three")
        .await
        .unwrap();

    assert_eq!(3, stack.tracker.total_for(&u1).await);

    stack.threads.mark_read(with_u3.id(), &u1).await.unwrap();
    assert_eq!(1, stack.tracker.total_for(&u1).await);
}

#[tokio::test]
async fn unread_count_appears_on_the_thread_dto() {
    let stack = common::stack();
    let u1 = user::Id::from("u1");
    let u2 = user::Id::from("u2");

    let (dto, _) = stack.threads.get_or_create(&u1, &u2, None).await.unwrap();
    stack.messages.create(&u2, dto.id(), "hey").await.unwrap();

    let mine = stack
        .threads
        .find_by_id_and_member(dto.id(), &u1)
        .await
        .unwrap();
    assert_eq!(1, mine.unread());

    let theirs = stack
        .threads
        .find_by_id_and_member(dto.id(), &u2)
        .await
        .unwrap();
    assert_eq!(0, theirs.unread());
}

#[tokio::test]
async fn mark_read_requires_membership() {
    let stack = common::stack();
    let u1 = user::Id::from("u1");
    let u2 = user::Id::from("u2");
    let outsider = user::Id::from("u3");

    let (dto, _) = stack.threads.get_or_create(&u1, &u2, None).await.unwrap();

    assert!(stack.threads.mark_read(dto.id(), &outsider).await.is_err());
}
