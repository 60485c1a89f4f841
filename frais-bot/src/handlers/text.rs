use anyhow::Result;

use crate::conversation::AmountOutcome;
use crate::handlers::{recorded_message, BotContext};
use crate::integrations::telegram::Message;

/// Free text is only meaningful while the conversation waits for a manual
/// amount; anything else is silently ignored.
pub async fn handle_manual_amount(ctx: &BotContext, message: &Message, text: &str) -> Result<()> {
    let chat_id = message.chat.id;

    match ctx.flow.enter_amount(chat_id, text) {
        AmountOutcome::NotAwaiting => Ok(()),
        AmountOutcome::InvalidAmount => {
            ctx.telegram
                .send_message(chat_id, "❌ Montant invalide. Utilise le format: 15.50")
                .await
        }
        AmountOutcome::Committed(expense) => {
            let reply = recorded_message(ctx, &expense);
            ctx.telegram.send_message(chat_id, &reply).await
        }
    }
}
