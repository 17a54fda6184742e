use std::collections::HashMap;

use futures::StreamExt;

use donation_chat_service::event::model::Notification;
use donation_chat_service::message::service::MessageService;
use donation_chat_service::thread::model::Thread;
use donation_chat_service::thread::repository::ThreadRepository;
use donation_chat_service::thread::service::ThreadService;
use donation_chat_service::thread::{Error, Key};
use donation_chat_service::user;

mod common;

#[tokio::test]
async fn get_or_create_is_idempotent() {
    let stack = common::stack();
    let u1 = user::Id::from("u1");
    let u2 = user::Id::from("u2");

    let (first, created) = stack.threads.get_or_create(&u1, &u2, None).await.unwrap();
    assert!(created);

    let (second, created) = stack.threads.get_or_create(&u1, &u2, None).await.unwrap();
    assert!(!created);
    assert_eq!(first.id(), second.id());

    let all = stack.threads.find_all(&u1).await.unwrap();
    assert_eq!(1, all.len());
}

#[tokio::test]
async fn get_or_create_converges_regardless_of_call_order() {
    let stack = common::stack();
    let u1 = user::Id::from("u1");
    let u2 = user::Id::from("u2");

    let (mine, _) = stack.threads.get_or_create(&u1, &u2, None).await.unwrap();
    let (theirs, created) = stack.threads.get_or_create(&u2, &u1, None).await.unwrap();

    assert!(!created);
    assert_eq!(mine.id(), theirs.id());
}

#[tokio::test]
async fn concurrent_get_or_create_yields_one_thread() {
    let stack = common::stack();
    let u5 = user::Id::from("u5");
    let u6 = user::Id::from("u6");

    let (a, b) = tokio::join!(
        {
            let threads = stack.threads.clone();
            let (u5, u6) = (u5.clone(), u6.clone());
            tokio::spawn(async move { threads.get_or_create(&u5, &u6, None).await })
        },
        {
            let threads = stack.threads.clone();
            let (u5, u6) = (u5.clone(), u6.clone());
            tokio::spawn(async move { threads.get_or_create(&u6, &u5, None).await })
        },
    );

    let (a, _) = a.unwrap().unwrap();
    let (b, _) = b.unwrap().unwrap();

    assert_eq!(a.id(), b.id());
    assert_eq!(1, stack.threads.find_all(&u5).await.unwrap().len());
    assert_eq!(1, stack.threads.find_all(&u6).await.unwrap().len());
}

#[tokio::test]
async fn rejects_self_pairing_and_blank_ids() {
    let stack = common::stack();
    let u1 = user::Id::from("u1");

    assert!(matches!(
        stack.threads.get_or_create(&u1, &u1, None).await,
        Err(Error::SameParticipants(_))
    ));

    assert!(matches!(
        stack
            .threads
            .get_or_create(&u1, &user::Id::from(""), None)
            .await,
        Err(Error::BlankParticipant)
    ));
}

#[tokio::test]
async fn context_label_is_first_writer_wins() {
    let stack = common::stack();
    let u1 = user::Id::from("u1");
    let u2 = user::Id::from("u2");

    let (first, _) = stack
        .threads
        .get_or_create(&u1, &u2, Some("Event: Food Drive"))
        .await
        .unwrap();
    assert_eq!(Some("Event: Food Drive"), first.context_label());

    let (second, _) = stack
        .threads
        .get_or_create(&u1, &u2, Some("Event: Other"))
        .await
        .unwrap();
    assert_eq!(Some("Event: Food Drive"), second.context_label());
}

#[tokio::test]
async fn participant_info_is_a_creation_time_snapshot() {
    let stack = common::stack();
    common::register_profile(&stack, "u1", "Dana").await;
    common::register_profile(&stack, "u2", "Sam").await;

    let u1 = user::Id::from("u1");
    let u2 = user::Id::from("u2");

    let (dto, _) = stack.threads.get_or_create(&u1, &u2, None).await.unwrap();
    assert_eq!("Sam", dto.name());

    // A later profile change does not rewrite the stored snapshot.
    common::register_profile(&stack, "u2", "Samantha").await;
    let refetched = stack
        .threads
        .find_by_id_and_member(dto.id(), &u1)
        .await
        .unwrap();
    assert_eq!("Sam", refetched.name());
}

#[tokio::test]
async fn thread_list_orders_by_most_recent_activity() {
    let stack = common::stack();
    let u1 = user::Id::from("u1");
    let u2 = user::Id::from("u2");
    let u3 = user::Id::from("u3");

    let (older, _) = stack.threads.get_or_create(&u1, &u2, None).await.unwrap();
    // Creation time is the tiebreaker for threads nobody wrote to yet;
    // keep the two instants distinct.
    tokio::time::sleep(std::time::Duration::from_millis(2)).await;
    let (newer, _) = stack.threads.get_or_create(&u1, &u3, None).await.unwrap();

    let all = stack.threads.find_all(&u1).await.unwrap();
    assert_eq!(newer.id(), all[0].id());

    // A send bumps the older thread back to the top.
    stack
        .messages
        .create(&u2, older.id(), "ping")
        .await
        .unwrap();

    let all = stack.threads.find_all(&u1).await.unwrap();
    assert_eq!(older.id(), all[0].id());
}

#[tokio::test]
async fn list_deduplicates_legacy_records_by_recomputed_key() {
    let stack = common::stack();
    let u1 = user::Id::from("u1");
    let u2 = user::Id::from("u2");

    stack.threads.get_or_create(&u1, &u2, None).await.unwrap();

    // A record written before canonical keys existed: same pair, but
    // stored under a different key, so the unique constraint lets it in.
    let drifted = Thread::new(
        Key::of(&u1, &user::Id::from("legacy")).unwrap(),
        [u1.clone(), u2.clone()],
        HashMap::new(),
        None,
    );
    stack.thread_repo.create(drifted).await.unwrap();

    let all = stack.threads.find_all(&u1).await.unwrap();
    assert_eq!(1, all.len());
}

#[tokio::test]
async fn membership_is_enforced() {
    let stack = common::stack();
    let u1 = user::Id::from("u1");
    let u2 = user::Id::from("u2");
    let outsider = user::Id::from("u3");

    let (dto, _) = stack.threads.get_or_create(&u1, &u2, None).await.unwrap();

    assert!(matches!(
        stack.threads.check_member(dto.id(), &outsider).await,
        Err(Error::NotMember)
    ));
    assert!(matches!(
        stack.threads.find_by_id_and_member(dto.id(), &outsider).await,
        Err(Error::NotMember)
    ));
}

#[tokio::test]
async fn subscription_yields_snapshot_then_new_threads() {
    let stack = common::stack();
    let u1 = user::Id::from("u1");
    let u2 = user::Id::from("u2");
    let u3 = user::Id::from("u3");

    stack.threads.get_or_create(&u1, &u2, None).await.unwrap();

    let mut subscription = stack.threads.subscribe(&u1).await.unwrap();

    match subscription.next().await {
        Some(Notification::ThreadSnapshot(snapshot)) => assert_eq!(1, snapshot.len()),
        other => panic!("expected thread snapshot, got {other:?}"),
    }

    let (created, _) = stack.threads.get_or_create(&u3, &u1, None).await.unwrap();

    let next = tokio::time::timeout(std::time::Duration::from_secs(1), subscription.next())
        .await
        .expect("expected a notification before timeout");

    match next {
        Some(Notification::NewThread(dto)) => assert_eq!(created.id(), dto.id()),
        other => panic!("expected new thread notification, got {other:?}"),
    }
}
