//! Dispatcher runner: converts teloxide updates into core [`Event`]s and passes them to the
//! [`HandlerChain`]. Calls get_me first to populate the shared bot username.

use std::sync::Arc;

use anyhow::Result;
use conductor_core::Event;
use handler_chain::HandlerChain;
use teloxide::prelude::*;
use tracing::{debug, error, info, instrument, warn};

use crate::adapters::{TelegramCallbackWrapper, TelegramMessageWrapper};

type HandlerResult = std::result::Result<(), Box<dyn std::error::Error + Send + Sync>>;

/// Text sent to the chat when the handler chain fails on a message event.
#[derive(Clone, Debug)]
pub struct ErrorReply(pub String);

/// Starts the long-polling dispatcher. Updates from one chat are processed in order; different
/// chats run concurrently. Ctrl-C stops the dispatcher gracefully.
#[instrument(skip(bot, handler_chain, bot_username, error_reply))]
pub async fn run_dispatcher(
    bot: teloxide::Bot,
    handler_chain: HandlerChain,
    bot_username: Arc<tokio::sync::RwLock<Option<String>>>,
    error_reply: ErrorReply,
) -> Result<()> {
    match bot.get_me().await {
        Ok(me) => {
            if let Some(username) = &me.user.username {
                *bot_username.write().await = Some(username.clone());
                info!(username = %username, "Bot username set before dispatch");
            }
        }
        Err(e) => warn!(error = %e, "get_me failed; commands addressed as /cmd@bot will not match"),
    }

    let handler = dptree::entry()
        .branch(Update::filter_message().endpoint(on_message))
        .branch(Update::filter_callback_query().endpoint(on_callback));

    info!("Starting dispatcher");
    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![handler_chain, error_reply])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    Ok(())
}

async fn on_message(
    bot: Bot,
    msg: Message,
    chain: HandlerChain,
    error_reply: ErrorReply,
) -> HandlerResult {
    let Some(event) = TelegramMessageWrapper(&msg).to_event() else {
        debug!(chat_id = msg.chat.id.0, "Received non-text message, ignored");
        return Ok(());
    };

    info!(
        user_id = event.user().id,
        chat_id = event.chat().id,
        message_id = msg.id.0,
        kind = event.kind(),
        "Received message"
    );

    if let Err(e) = chain.handle(&event).await {
        error!(
            error = %e,
            user_id = event.user().id,
            chat_id = event.chat().id,
            "Handler chain failed"
        );
        if let Err(send_err) = bot.send_message(msg.chat.id, error_reply.0.clone()).await {
            warn!(error = %send_err, "Failed to send error notice");
        }
    }

    Ok(())
}

async fn on_callback(bot: Bot, q: CallbackQuery, chain: HandlerChain) -> HandlerResult {
    // Stop the client's loading spinner whatever happens next.
    if let Err(e) = bot.answer_callback_query(q.id.clone()).await {
        warn!(error = %e, "Failed to answer callback query");
    }

    let Some(event) = TelegramCallbackWrapper(&q).to_event() else {
        debug!(user_id = q.from.id.0, "Callback without data or message, ignored");
        return Ok(());
    };

    if let Event::Callback(ref press) = event {
        info!(
            user_id = press.user.id,
            chat_id = press.chat.id,
            button_id = %press.data,
            "Received button press"
        );
    }

    if let Err(e) = chain.handle(&event).await {
        error!(
            error = %e,
            user_id = event.user().id,
            chat_id = event.chat().id,
            "Handler chain failed"
        );
    }

    Ok(())
}
