use anyhow::Result;
use shared_types::ExpenseCategory;

use crate::handlers::BotContext;
use crate::integrations::telegram::{InlineKeyboardButton, InlineKeyboardMarkup, Message};
use crate::integrations::vision::OcrEngine;

const UNREADABLE_TICKET: &str =
    "❌ Je n'ai pas réussi à lire le ticket. Essaie avec une photo plus nette !";

/// Photo flow: download the best-quality variant, run OCR, parse the text
/// and ask for a category. An OCR failure leaves the conversation state
/// untouched.
pub async fn handle_photo(ctx: &BotContext, message: &Message) -> Result<()> {
    let chat_id = message.chat.id;
    ctx.telegram
        .send_message(chat_id, "📸 Photo reçue ! Analyse en cours...")
        .await?;

    // Telegram lists resolution variants smallest first.
    let Some(photo) = message.photo.last() else {
        return Ok(());
    };
    let image = ctx.telegram.download_file(&photo.file_id).await?;

    let text = match ctx.ocr.recognize_text(&image).await {
        Ok(Some(text)) => text,
        Ok(None) => {
            ctx.telegram.send_message(chat_id, UNREADABLE_TICKET).await?;
            return Ok(());
        }
        Err(e) => {
            tracing::warn!("OCR failed for chat {chat_id}: {e}");
            ctx.telegram.send_message(chat_id, UNREADABLE_TICKET).await?;
            return Ok(());
        }
    };

    let scan = ctx.parser.parse(&text);

    let mut reply = String::from("✅ *Ticket analysé !*\n\n");
    match scan.amount {
        Some(amount) => reply.push_str(&format!("💰 Montant : *{amount:.2}€*\n")),
        None => reply.push_str("💰 Montant : _Non détecté_\n"),
    }
    reply.push_str(&format!("📅 Date : {}\n\nChoisis la catégorie :", scan.date));

    ctx.flow.begin(chat_id, scan);
    ctx.telegram
        .send_message_with_keyboard(chat_id, &reply, category_keyboard())
        .await?;

    Ok(())
}

/// Inline keyboard with every category, two buttons per row. Payloads carry
/// the index into [`ExpenseCategory::ALL`] as `cat_<index>`.
pub(crate) fn category_keyboard() -> InlineKeyboardMarkup {
    let buttons: Vec<InlineKeyboardButton> = ExpenseCategory::ALL
        .iter()
        .enumerate()
        .map(|(index, category)| InlineKeyboardButton {
            text: category.label().to_string(),
            callback_data: format!("cat_{index}"),
        })
        .collect();

    InlineKeyboardMarkup {
        inline_keyboard: buttons.chunks(2).map(|row| row.to_vec()).collect(),
    }
}
