// File: rollcall-core/tests/mention_tests.rs

mod test_utils;

use rollcall_common::models::member::{text_len, Member, MemberToken};
use rollcall_common::models::message::MessageHandle;
use rollcall_core::batching::{partition, DEFAULT_MESSAGE_BUDGET, PLATFORM_MESSAGE_LIMIT};
use rollcall_core::services::MentionService;
use rollcall_core::Error;
use test_utils::helpers::{guild_members, RecordingSink, SinkCall, StaticMembers};

fn target() -> MessageHandle {
    MessageHandle::new("1", "500")
}

#[tokio::test]
async fn large_listing_covers_every_member_without_overflow() {
    let members = guild_members(900);
    let source = StaticMembers(Some(members.clone()));
    let sink = RecordingSink::with_message("");
    let service = MentionService::new(DEFAULT_MESSAGE_BUDGET);

    let count = service.post_listing(&source, &sink).await.unwrap();
    assert_eq!(count, Some(900));

    let sent = sink.sent();
    assert!(sent.len() > 1, "900 members cannot fit in one message");
    for text in &sent {
        assert!(text_len(text) < PLATFORM_MESSAGE_LIMIT);
        assert!(text_len(text) < DEFAULT_MESSAGE_BUDGET);
    }

    let expected: String = members
        .iter()
        .map(|m| MemberToken::from(m).mention_text)
        .collect();
    assert_eq!(sent.concat(), expected);
}

#[tokio::test]
async fn broadcast_restores_original_content_after_many_batches() {
    let source = StaticMembers(Some(guild_members(400)));
    let sink = RecordingSink::with_message("Adding <@&77> to the thread...");
    let service = MentionService::new(DEFAULT_MESSAGE_BUDGET);

    let count = service
        .broadcast_via_edit(&source, &sink, &target())
        .await
        .unwrap();
    assert_eq!(count, Some(400));
    assert_eq!(sink.content(), "Adding <@&77> to the thread...");

    let calls = sink.calls();
    assert_eq!(calls.first(), Some(&SinkCall::Fetch));
    assert_eq!(
        calls.last(),
        Some(&SinkCall::Edit("Adding <@&77> to the thread...".to_string()))
    );

    let tokens: Vec<MemberToken> = guild_members(400).iter().map(MemberToken::from).collect();
    let batches = partition(&tokens, DEFAULT_MESSAGE_BUDGET).unwrap();
    // fetch + one edit per batch + restore
    assert_eq!(calls.len(), batches.len() + 2);
}

#[tokio::test]
async fn broadcast_with_one_batch_still_restores() {
    let source = StaticMembers(Some(vec![Member::new("1", "alice")]));
    let sink = RecordingSink::with_message("hello");
    let service = MentionService::new(DEFAULT_MESSAGE_BUDGET);

    service
        .broadcast_via_edit(&source, &sink, &target())
        .await
        .unwrap();

    assert_eq!(
        sink.calls(),
        vec![
            SinkCall::Fetch,
            SinkCall::Edit(" <@1>".to_string()),
            SinkCall::Edit("hello".to_string()),
        ]
    );
    assert_eq!(sink.content(), "hello");
}

#[tokio::test]
async fn failed_mid_sequence_edit_is_compensated() {
    let source = StaticMembers(Some(guild_members(400)));
    let sink = RecordingSink::failing_on_edit("pinned notes", 2);
    let service = MentionService::new(DEFAULT_MESSAGE_BUDGET);

    let err = service
        .broadcast_via_edit(&source, &sink, &target())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::TransportFailure { operation: "edit message", .. }));

    // first batch, rejected second batch, compensating restore; nothing after
    let calls = sink.calls();
    assert_eq!(calls.len(), 4);
    assert_eq!(calls.last(), Some(&SinkCall::Edit("pinned notes".to_string())));
    assert_eq!(sink.content(), "pinned notes");
}

#[tokio::test]
async fn unknown_member_set_reports_none() {
    let source = StaticMembers(None);
    let sink = RecordingSink::with_message("untouched");
    let service = MentionService::new(DEFAULT_MESSAGE_BUDGET);

    assert_eq!(service.post_listing(&source, &sink).await.unwrap(), None);
    assert_eq!(
        service.broadcast_via_edit(&source, &sink, &target()).await.unwrap(),
        None
    );
    assert!(sink.calls().is_empty());
}

#[tokio::test]
async fn too_long_display_name_aborts_before_touching_the_message() {
    let long_name = "n".repeat(40);
    let source = StaticMembers(Some(vec![Member::new("1", "ok"), Member::new("2", long_name)]));
    let sink = RecordingSink::with_message("untouched");
    let service = MentionService::new(30);

    let err = service
        .broadcast_via_edit(&source, &sink, &target())
        .await
        .unwrap_err();
    match err {
        Error::PreconditionViolation { index, length, budget } => {
            assert_eq!(index, 1);
            assert_eq!(length, 42);
            assert_eq!(budget, 30);
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(sink.calls().is_empty());
    assert_eq!(sink.content(), "untouched");
}

#[tokio::test]
async fn failed_send_stops_the_listing() {
    let members = guild_members(900);
    let tokens: Vec<MemberToken> = members.iter().map(MemberToken::from).collect();
    let batches = partition(&tokens, DEFAULT_MESSAGE_BUDGET).unwrap();
    assert!(batches.len() > 3);

    let source = StaticMembers(Some(members));
    let sink = RecordingSink::failing_on_send(2);
    let service = MentionService::new(DEFAULT_MESSAGE_BUDGET);

    let err = service.post_listing(&source, &sink).await.unwrap_err();
    assert!(matches!(err, Error::TransportFailure { operation: "send message", .. }));

    // the rejected second send is the last call; later batches never go out
    assert_eq!(
        sink.sent(),
        vec![batches[0].mention_text.clone(), batches[1].mention_text.clone()]
    );
}

#[tokio::test]
async fn placeholder_broadcast_restores_placeholder_text() {
    let source = StaticMembers(Some(guild_members(400)));
    let sink = RecordingSink::with_message("");
    let service = MentionService::new(DEFAULT_MESSAGE_BUDGET);

    let count = service
        .broadcast_via_placeholder(&source, &sink, "Adding <@&77> to this thread...")
        .await
        .unwrap();
    assert_eq!(count, Some(400));

    let calls = sink.calls();
    assert_eq!(calls.first(), Some(&SinkCall::Send("Adding <@&77> to this thread...".to_string())));
    assert!(!calls.contains(&SinkCall::Fetch));
    assert_eq!(sink.content(), "Adding <@&77> to this thread...");
}

#[tokio::test]
async fn unknown_member_set_posts_no_placeholder() {
    let source = StaticMembers(None);
    let sink = RecordingSink::with_message("");
    let service = MentionService::new(DEFAULT_MESSAGE_BUDGET);

    let count = service
        .broadcast_via_placeholder(&source, &sink, "Adding <@&77> to this thread...")
        .await
        .unwrap();
    assert_eq!(count, None);
    assert!(sink.calls().is_empty());
}
