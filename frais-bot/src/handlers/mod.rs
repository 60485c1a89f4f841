mod callback;
mod commands;
mod photo;
mod text;

use std::sync::Arc;

use extractors::ReceiptTextParser;
use shared_types::{Clock, Expense};

use crate::conversation::ExpenseFlow;
use crate::integrations::telegram::{TelegramClient, Update};
use crate::integrations::vision::OcrEngine;
use crate::store::ExpenseStore;

/// Shared state handed to every update handler.
pub struct BotContext {
    pub telegram: TelegramClient,
    pub ocr: Arc<dyn OcrEngine>,
    pub parser: ReceiptTextParser,
    pub store: Arc<ExpenseStore>,
    pub flow: ExpenseFlow,
    pub clock: Arc<dyn Clock>,
}

/// Entry point for one update. Every failure is caught and logged here so
/// one conversation's error never takes down the polling loop or leaks
/// into other conversations.
pub async fn handle_update(ctx: Arc<BotContext>, update: Update) {
    let update_id = update.update_id;
    if let Err(e) = dispatch(&ctx, update).await {
        tracing::error!("Update {update_id} failed: {e:#}");
    }
}

async fn dispatch(ctx: &BotContext, update: Update) -> anyhow::Result<()> {
    if let Some(query) = update.callback_query {
        return callback::handle_category_selection(ctx, query).await;
    }

    if let Some(message) = update.message {
        if !message.photo.is_empty() {
            return photo::handle_photo(ctx, &message).await;
        }
        if let Some(text) = message.text.clone() {
            if text.starts_with('/') {
                return commands::handle_command(ctx, &message, &text).await;
            }
            return text::handle_manual_amount(ctx, &message, &text).await;
        }
    }

    Ok(())
}

/// Confirmation shown after an expense is recorded, with the running total
/// of the current month.
pub(crate) fn recorded_message(ctx: &BotContext, expense: &Expense) -> String {
    let month_year = ctx.clock.today().format("%m/%Y").to_string();
    let month_total = ctx.store.monthly_total(&month_year);

    format!(
        "✅ *Frais enregistré !*\n\n\
         📁 Catégorie : {}\n\
         💰 Montant : {:.2}€\n\
         📅 Date : {}\n\n\
         _Total ce mois : {:.2}€_",
        expense.category.label(),
        expense.amount,
        expense.date,
        month_total
    )
}
