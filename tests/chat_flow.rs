//! Integration tests for chatee selection, messaging and avatars.

mod common;

use common::{ScriptedBackend, TestContext, context, topics};
use spachat::{ModelEvent, Person};
use spachat_proto::{AvatarStyle, ChatMessage, Intent};

fn signed_in() -> (TestContext, ScriptedBackend) {
    let mut ctx = context();
    let mut backend = ScriptedBackend::new();
    ctx.login("Alice").unwrap();
    backend.pump(&mut ctx);
    ctx.bus_mut().clear();
    (ctx, backend)
}

#[test]
fn test_set_chatee_is_idempotent() {
    let (mut ctx, _backend) = signed_in();

    assert!(ctx.set_chatee("u2"));
    assert!(!ctx.set_chatee("u2"));

    assert_eq!(topics(&ctx), ["chatee-changed"]);
    assert_eq!(ctx.get_chatee().map(Person::display_name), Some("Mike"));
}

#[test]
fn test_send_message_round_trip() {
    let (mut ctx, mut backend) = signed_in();
    ctx.set_chatee("u1");

    assert!(ctx.send_message("hello Betty"));
    backend.pump(&mut ctx);

    let sent = backend.received.iter().find_map(|i| match i {
        Intent::UpdateChat(msg) => Some(msg),
        _ => None,
    });
    assert_eq!(
        sent,
        Some(&ChatMessage {
            dest_id: "u1".into(),
            dest_name: "Betty".into(),
            sender_id: "u42".into(),
            msg_text: "hello Betty".into(),
        })
    );
    assert_eq!(topics(&ctx), ["chatee-changed", "message-sent"]);
}

#[test]
fn test_anonymous_send_sends_nothing() {
    let mut ctx = context();

    assert!(!ctx.send_message("anyone?"));

    assert!(ctx.transport().pending().next().is_none());
    assert!(ctx.bus().is_empty());
}

#[test]
fn test_join_while_anonymous_is_refused() {
    let mut ctx = context();
    assert!(!ctx.join());
    assert!(ctx.transport().pending().next().is_none());
}

#[test]
fn test_incoming_message_picks_chatee() {
    let (mut ctx, backend) = signed_in();

    assert!(backend.say(&mut ctx, "u2", "u42", "hi Alice"));

    assert_eq!(ctx.get_chatee().map(Person::client_id), Some("u2"));
    assert!(matches!(
        ctx.bus().last(),
        Some(ModelEvent::MessageReceived { message }) if message.msg_text == "hi Alice"
    ));
}

#[test]
fn test_avatar_update_applies_via_roster() {
    let (mut ctx, mut backend) = signed_in();
    let style = AvatarStyle::new(120, 140, "#8ff");

    ctx.update_avatar("u42", style.clone());
    assert_ne!(ctx.current_user().style(), &style);

    backend.pump(&mut ctx);

    assert_eq!(ctx.current_user().style(), &style);
    assert_eq!(topics(&ctx), ["roster-changed"]);
}

#[test]
fn test_peer_avatar_update() {
    let (mut ctx, mut backend) = signed_in();
    let style = AvatarStyle::new(5, 5, "#000");

    ctx.update_avatar("u2", style.clone());
    backend.pump(&mut ctx);

    assert_eq!(ctx.get_by_client_id("u2").map(Person::style), Some(&style));
}

#[test]
fn test_chatee_dropping_offline() {
    let (mut ctx, mut backend) = signed_in();
    ctx.set_chatee("u1");

    assert!(backend.drop_person(&mut ctx, "u1"));

    assert!(ctx.get_chatee().is_none());
    assert!(!ctx.send_message("still there?"));
    assert_eq!(topics(&ctx), ["chatee-changed", "chatee-changed", "roster-changed"]);
}

#[test]
fn test_roster_resync_keeps_only_current_user_when_empty() {
    let (mut ctx, mut backend) = signed_in();
    backend.roster.clear();

    ctx.dispatch(spachat_proto::Inbound::ListChange(Vec::new()))
        .unwrap();

    let ids: Vec<_> = ctx.all().map(Person::client_id).collect();
    assert_eq!(ids, ["u42"]);
    assert_eq!(ctx.current_user().client_id(), "u42");
}
