use anyhow::Result;
use chrono::Datelike;
use shared_types::Clock;

use crate::handlers::BotContext;
use crate::integrations::telegram::Message;
use crate::reports::{self, ExportError};

const WELCOME: &str = "💼 *Assistant Frais Professionnels*\n\n\
Je t'aide à gérer tes frais pros en quelques secondes !\n\n\
*Comment ça marche ?*\n\
📸 Envoie-moi simplement la photo de ton ticket\n\
🤖 J'extrais automatiquement le montant et la date\n\
📁 Je te demande la catégorie\n\
✅ C'est enregistré !\n\n\
*Commandes utiles :*\n\
/recap - Voir tes frais du mois\n\
/export - Télécharger l'export CSV\n\
/stats - Statistiques par catégorie\n\
/help - Aide détaillée\n\n\
*Catégories disponibles :*\n\
• Repas professionnels\n\
• Carburant/Déplacements\n\
• Matériel médical\n\
• Fournitures\n\
• Formations\n\
• Téléphone/Internet\n\
• Autres\n\n\
Envoie ta première photo de ticket ! 📸";

const HELP: &str = "*Guide d'utilisation* 📖\n\n\
*Ajouter un frais :*\n\
1. Prends en photo ton ticket\n\
2. Envoie la photo dans le chat\n\
3. Je détecte automatiquement montant et date\n\
4. Choisis la catégorie\n\
5. Confirme ou modifie si besoin\n\n\
*Consulter tes frais :*\n\
`/recap` - Frais du mois en cours\n\
`/recap 12` - Frais de décembre\n\
`/stats` - Répartition par catégorie\n\n\
*Exporter pour ton comptable :*\n\
`/export` - CSV du mois en cours\n\
`/export 2024` - CSV de toute l'année 2024\n\n\
*Modifier/Supprimer :*\n\
`/liste` - Voir tous les frais avec ID\n\
`/supprimer 5` - Supprimer le frais #5\n\n\
*Astuces :*\n\
• Prends des photos nettes et bien éclairées\n\
• Le ticket doit être bien visible\n\
• Si je me trompe, tu peux corriger manuellement";

/// Slash-command dispatch. Unknown commands are ignored.
pub async fn handle_command(ctx: &BotContext, message: &Message, text: &str) -> Result<()> {
    let chat_id = message.chat.id;
    let mut parts = text.split_whitespace();
    // `/recap@MyBot 12` addresses this bot in a group chat.
    let command = parts
        .next()
        .unwrap_or("")
        .split('@')
        .next()
        .unwrap_or("");
    let arg = parts.next();

    match command {
        "/start" => ctx.telegram.send_message(chat_id, WELCOME).await,
        "/help" => ctx.telegram.send_message(chat_id, HELP).await,
        "/recap" => recap(ctx, chat_id, arg).await,
        "/stats" => stats(ctx, chat_id).await,
        "/export" => export(ctx, chat_id, arg).await,
        "/liste" => liste(ctx, chat_id).await,
        "/supprimer" => supprimer(ctx, chat_id, arg).await,
        _ => Ok(()),
    }
}

/// `/recap [month]` — current month by default, the given month of the
/// current year otherwise.
async fn recap(ctx: &BotContext, chat_id: i64, arg: Option<&str>) -> Result<()> {
    let today = ctx.clock.today();

    let (month, year) = match arg {
        Some(raw) => match raw.parse::<u32>() {
            Ok(m @ 1..=12) => (format!("{m:02}"), today.year().to_string()),
            _ => {
                return ctx
                    .telegram
                    .send_message(chat_id, "❌ Mois invalide. Utilise un nombre entre 1 et 12.")
                    .await;
            }
        },
        None => (format!("{:02}", today.month()), today.year().to_string()),
    };
    let period = format!("{month}/{year}");

    let expenses = ctx.store.filter_by_month_year(&month, &year);
    let Some(recap) = reports::monthly_recap(&expenses) else {
        return ctx
            .telegram
            .send_message(chat_id, &format!("Aucun frais enregistré pour {period}"))
            .await;
    };

    let mut reply = format!("📊 *Récapitulatif {period}*\n\n");
    for entry in &recap.categories {
        let plural = if entry.count > 1 { "s" } else { "" };
        reply.push_str(&format!(
            "*{}* : {:.2}€ ({} ticket{plural})\n",
            entry.category.label(),
            entry.total,
            entry.count
        ));
    }
    reply.push_str(&format!("\n💰 *TOTAL : {:.2}€*", recap.grand_total));

    ctx.telegram.send_message(chat_id, &reply).await
}

/// `/stats` — share of every category over all recorded expenses.
async fn stats(ctx: &BotContext, chat_id: i64) -> Result<()> {
    let expenses = ctx.store.all();
    if expenses.is_empty() {
        return ctx
            .telegram
            .send_message(chat_id, "Aucun frais enregistré pour le moment.")
            .await;
    }

    let stats = reports::category_stats(&expenses);
    let grand_total: f64 = stats.iter().map(|s| s.total).sum();

    let mut reply = String::from("📈 *Statistiques par catégorie*\n\n");
    for stat in &stats {
        reply.push_str(&format!(
            "• {}: {:.2}€ ({:.1}%)\n",
            stat.category.label(),
            stat.total,
            stat.percentage
        ));
    }
    reply.push_str(&format!("\n💰 Total : {grand_total:.2}€"));

    ctx.telegram.send_message(chat_id, &reply).await
}

/// `/export [year]` — CSV of the current month, or of a whole year.
async fn export(ctx: &BotContext, chat_id: i64, arg: Option<&str>) -> Result<()> {
    if ctx.store.is_empty() {
        return ctx
            .telegram
            .send_message(chat_id, "Aucun frais à exporter.")
            .await;
    }
    ctx.telegram
        .send_message(chat_id, "📄 Génération de l'export en cours...")
        .await?;

    let today = ctx.clock.today();
    let (expenses, filename, period) = match arg {
        Some(raw) => match raw.parse::<i32>() {
            Ok(year) if (1000..=9999).contains(&year) => {
                let year = year.to_string();
                (
                    ctx.store.filter_by_year(&year),
                    reports::export_filename(None, &year),
                    year,
                )
            }
            _ => {
                return ctx
                    .telegram
                    .send_message(
                        chat_id,
                        "❌ Année invalide. Utilise un format à 4 chiffres, ex: 2024",
                    )
                    .await;
            }
        },
        None => {
            let month = format!("{:02}", today.month());
            let year = today.year().to_string();
            let filename = reports::export_filename(Some(&month), &year);
            (
                ctx.store.filter_by_month_year(&month, &year),
                filename,
                format!("{month}/{year}"),
            )
        }
    };

    let rows = match reports::export_rows(&expenses) {
        Ok(rows) => rows,
        Err(ExportError::Empty) => {
            return ctx
                .telegram
                .send_message(chat_id, &format!("Aucun frais trouvé pour {period}"))
                .await;
        }
        Err(e) => return Err(e.into()),
    };

    let total = rows.last().map(|row| row.amount).unwrap_or(0.0);
    let csv_bytes = reports::write_csv(&rows)?;
    let caption = format!(
        "📊 Export CSV - {} frais - Total: {total:.2}€",
        expenses.len()
    );

    ctx.telegram
        .send_document(chat_id, &filename, csv_bytes, &caption)
        .await
}

/// `/liste` — the last 20 expenses with their ids.
async fn liste(ctx: &BotContext, chat_id: i64) -> Result<()> {
    let expenses = ctx.store.all();
    if expenses.is_empty() {
        return ctx
            .telegram
            .send_message(chat_id, "Aucun frais enregistré.")
            .await;
    }

    let mut reply = String::from("📋 *Liste des frais*\n\n");
    let start = expenses.len().saturating_sub(20);
    for expense in &expenses[start..] {
        reply.push_str(&format!(
            "#{} - {} - {} - {:.2}€\n",
            expense.id,
            expense.date,
            expense.category.label(),
            expense.amount
        ));
    }
    reply.push_str("\n_Utilise /supprimer ID pour supprimer un frais_");

    ctx.telegram.send_message(chat_id, &reply).await
}

/// `/supprimer <id>` — delete one expense by id.
async fn supprimer(ctx: &BotContext, chat_id: i64, arg: Option<&str>) -> Result<()> {
    let Some(raw) = arg else {
        return ctx
            .telegram
            .send_message(chat_id, "Usage: /supprimer ID\nEx: /supprimer 5")
            .await;
    };
    let Ok(id) = raw.parse::<i64>() else {
        return ctx.telegram.send_message(chat_id, "❌ ID invalide").await;
    };

    let reply = if ctx.store.remove_by_id(id) {
        format!("✅ Frais #{id} supprimé")
    } else {
        format!("❌ Frais #{id} introuvable")
    };
    ctx.telegram.send_message(chat_id, &reply).await
}
