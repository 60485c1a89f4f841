use anyhow::Result;
use shared_types::ExpenseCategory;

use crate::conversation::CategoryOutcome;
use crate::handlers::{recorded_message, BotContext};
use crate::integrations::telegram::CallbackQuery;

/// Category button press. The payload addresses the category by index
/// (`cat_<index>`); the pending candidate decides whether the expense can
/// be committed right away or the amount must be asked for.
pub async fn handle_category_selection(ctx: &BotContext, query: CallbackQuery) -> Result<()> {
    ctx.telegram.answer_callback_query(&query.id).await?;

    let Some(message) = query.message else {
        return Ok(());
    };
    let chat_id = message.chat.id;

    let Some(index) = query
        .data
        .as_deref()
        .and_then(|data| data.strip_prefix("cat_"))
        .and_then(|raw| raw.parse::<usize>().ok())
    else {
        // Not a category payload; nothing to do.
        return Ok(());
    };

    let Some(category) = ExpenseCategory::from_index(index) else {
        ctx.telegram
            .edit_message_text(
                chat_id,
                message.message_id,
                "❌ Catégorie inconnue. Renvoie la photo du ticket.",
            )
            .await?;
        return Ok(());
    };

    let reply = match ctx.flow.choose_category(chat_id, category) {
        CategoryOutcome::SessionExpired => {
            "❌ Session expirée. Renvoie la photo du ticket.".to_string()
        }
        CategoryOutcome::AmountNeeded(_) => {
            "💰 Je n'ai pas détecté le montant.\nEnvoie-le moi (exemple: 15.50)".to_string()
        }
        CategoryOutcome::Committed(expense) => recorded_message(ctx, &expense),
    };

    ctx.telegram
        .edit_message_text(chat_id, message.message_id, &reply)
        .await?;

    Ok(())
}
