//! spachat - scripted chat session against an in-process backend.
//!
//! Usage: `spachat [display-name] [config.toml]`

mod loopback;

use spachat::{
    ChannelTransport, Config, EventBus, ModelEvent, SessionContext, Subscribers, Transport,
    telemetry,
};
use spachat_proto::{AvatarStyle, Inbound};
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{error, info, warn};

/// How long the backend may stay quiet before the script moves on.
const SETTLE_TIMEOUT: Duration = Duration::from_millis(100);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    telemetry::init("info", std::env::var_os("SPACHAT_LOG_JSON").is_some());

    let mut args = std::env::args().skip(1);
    let display_name = args.next().unwrap_or_else(|| "Josh".to_string());
    let config = match args.next() {
        Some(path) => Config::load(&path).map_err(|e| {
            error!(path = %path, error = %e, "Failed to load config");
            e
        })?,
        None => Config::default(),
    };

    let capacity = config.chat.transport_capacity;
    let (transport, intents) = ChannelTransport::new(capacity);
    let (reply_tx, mut replies) = mpsc::channel(capacity);
    let backend = tokio::spawn(loopback::run(intents, reply_tx));

    let mut bus = Subscribers::new();
    bus.subscribe_all(|event| info!(topic = event.topic(), "model event"));
    bus.subscribe("message-received", |event| {
        if let ModelEvent::MessageReceived { message } = event {
            info!(from = %message.sender_id, text = %message.msg_text, "incoming message");
        }
    });

    let mut ctx = SessionContext::bootstrap(config, bus, transport)?;

    ctx.login(&display_name)?;
    settle(&mut ctx, &mut replies).await;

    let peer = ctx
        .all()
        .find(|person| !ctx.is_user(person))
        .map(|person| person.client_id().to_string());
    match peer {
        Some(peer) => {
            ctx.set_chatee(&peer);
            ctx.send_message("Hi there!");
            settle(&mut ctx, &mut replies).await;
        }
        None => warn!("nobody else online"),
    }

    let me = ctx.current_user().client_id().to_string();
    ctx.update_avatar(&me, AvatarStyle::new(60, 80, "#88f"));
    settle(&mut ctx, &mut replies).await;

    for person in ctx.all() {
        info!(
            client_id = %person.client_id(),
            name = %person.display_name(),
            me = ctx.is_user(person),
            top = person.style().top,
            left = person.style().left,
            "roster"
        );
    }

    ctx.logout();
    drop(ctx);
    backend.await?;

    info!("session finished");
    Ok(())
}

/// Feed backend replies into the model until the backend goes quiet.
async fn settle<B: EventBus, T: Transport>(
    ctx: &mut SessionContext<B, T>,
    replies: &mut mpsc::Receiver<Inbound>,
) {
    while let Ok(Some(reply)) = tokio::time::timeout(SETTLE_TIMEOUT, replies.recv()).await {
        if let Err(e) = ctx.dispatch(reply) {
            warn!(error = %e, code = e.error_code(), "reply rejected");
        }
    }
}
