//! Message texts for the manager bot, rendered in HTML parse mode.
//!
//! Everything here is a pure function of domain data and a language code so
//! it can be tested without Telegram. User-supplied text is always escaped.

use chrono::{DateTime, Utc};
use teloxide::utils::html::escape;

use crate::catalog;
use crate::filters::ApplicationFilter;
use crate::localization::LocalizationManager;
use crate::models::{Application, Priority, StaffMember};
use crate::monitoring::MonitoringSnapshot;
use crate::pricing::{format_amount, CostBreakdown};
use crate::staff::StaffActivity;
use crate::wizard::{OrderDraft, OrderKind, OrderWizard, WizardStep, TOTAL_STEPS};

const DATE_FORMAT: &str = "%d.%m.%Y %H:%M";

fn tr(loc: &LocalizationManager, lang: &str, key: &str) -> String {
    loc.get_message_in_language(key, lang, None)
}

fn tr_args(loc: &LocalizationManager, lang: &str, key: &str, args: &[(&str, &str)]) -> String {
    loc.get_message_with_args_in_language(key, lang, args)
}

/// Shorten `text` to at most `max_chars` characters, appending "..."
pub fn truncate_text(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let kept: String = text.chars().take(max_chars.saturating_sub(3)).collect();
    format!("{}...", kept)
}

/// `250000` -> `250 000 so'm`
pub fn format_money(amount: u64, loc: &LocalizationManager, lang: &str) -> String {
    format!("{} {}", format_amount(amount), tr(loc, lang, "currency"))
}

fn region_label(code: &str, loc: &LocalizationManager, lang: &str) -> String {
    match catalog::region_label_key(code) {
        Some(key) => tr(loc, lang, key),
        None => escape(code),
    }
}

fn format_date(date: DateTime<Utc>) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Full card of one application with its position in the current list
pub fn format_application_card(
    app: &Application,
    position: usize,
    total: usize,
    assignee: Option<&StaffMember>,
    loc: &LocalizationManager,
    lang: &str,
) -> String {
    let mut lines = vec![format!(
        "{} <b>{}</b>  ({}/{})",
        app.workflow_type.emoji(),
        escape(&app.id),
        position + 1,
        total
    )];

    if app.priority == Priority::Urgent && app.status.is_open() {
        lines.push(format!("🚨 <b>{}</b>", tr(loc, lang, "card-urgent")));
    }

    lines.push(String::new());
    lines.push(format!(
        "{} {}: <b>{}</b>",
        app.status.emoji(),
        tr(loc, lang, "field-status"),
        tr(loc, lang, app.status.label_key())
    ));
    lines.push(format!(
        "{} {}: {}",
        app.priority.emoji(),
        tr(loc, lang, "field-priority"),
        tr(loc, lang, app.priority.label_key())
    ));
    lines.push(format!(
        "📂 {}: {}",
        tr(loc, lang, "field-workflow"),
        tr(loc, lang, app.workflow_type.label_key())
    ));
    lines.push(format!(
        "👤 {}: {}",
        tr(loc, lang, "field-client"),
        escape(&app.client_name)
    ));
    lines.push(format!(
        "📞 {}: {}",
        tr(loc, lang, "field-phone"),
        escape(&app.client_phone)
    ));
    lines.push(format!(
        "📍 {}: {} ({})",
        tr(loc, lang, "field-address"),
        escape(&app.address),
        region_label(&app.region, loc, lang)
    ));
    if !app.description.is_empty() {
        lines.push(format!(
            "📝 {}: {}",
            tr(loc, lang, "field-description"),
            escape(&app.description)
        ));
    }
    let assignee_text = match (assignee, app.assigned_to) {
        (Some(member), _) => escape(&member.full_name),
        (None, Some(id)) => format!("#{}", id),
        (None, None) => tr(loc, lang, "field-unassigned"),
    };
    lines.push(format!(
        "👷 {}: {}",
        tr(loc, lang, "field-assignee"),
        assignee_text
    ));
    if let Some(cost) = app.estimated_cost {
        lines.push(format!(
            "💰 {}: {}",
            tr(loc, lang, "field-cost"),
            format_money(cost, loc, lang)
        ));
    }
    if app.location.is_some() {
        lines.push(format!("🗺 {}", tr(loc, lang, "field-has-location")));
    }
    if app.media_file_id.is_some() {
        lines.push(format!("📎 {}", tr(loc, lang, "field-has-media")));
    }
    lines.push(format!(
        "🕐 {}: {}",
        tr(loc, lang, "field-created"),
        format_date(app.created_at)
    ));
    let updated = match &app.updated_by {
        Some(by) => format!("{} ({})", format_date(app.updated_at), escape(by)),
        None => format_date(app.updated_at),
    };
    lines.push(format!("✏️ {}: {}", tr(loc, lang, "field-updated"), updated));
    if let Some(comment) = &app.comments {
        lines.push(format!(
            "💬 {}: <i>{}</i>",
            tr(loc, lang, "field-comment"),
            escape(comment)
        ));
    }

    lines.join("\n")
}

pub fn format_empty_list(title_key: &str, loc: &LocalizationManager, lang: &str) -> String {
    format!(
        "<b>{}</b>\n\n📭 {}",
        tr(loc, lang, title_key),
        tr(loc, lang, "list-empty")
    )
}

pub fn format_status_menu(app: &Application, loc: &LocalizationManager, lang: &str) -> String {
    tr_args(
        loc,
        lang,
        "status-menu-title",
        &[
            ("id", &escape(&app.id)),
            ("status", &tr(loc, lang, app.status.label_key())),
        ],
    )
}

pub fn format_assign_menu(app: &Application, loc: &LocalizationManager, lang: &str) -> String {
    tr_args(loc, lang, "assign-menu-title", &[("id", &escape(&app.id))])
}

/// Active filter criteria, one per line, or the "no filters" notice
pub fn format_filter_summary(
    filter: &ApplicationFilter,
    loc: &LocalizationManager,
    lang: &str,
) -> String {
    let mut lines = vec![format!("🔍 <b>{}</b>", tr(loc, lang, "filter-title"))];

    if filter.is_empty() {
        lines.push(tr(loc, lang, "filter-none"));
        return lines.join("\n");
    }

    if let Some(status) = filter.status {
        lines.push(format!(
            "• {}: {} {}",
            tr(loc, lang, "field-status"),
            status.emoji(),
            tr(loc, lang, status.label_key())
        ));
    }
    if let Some(priority) = filter.priority {
        lines.push(format!(
            "• {}: {} {}",
            tr(loc, lang, "field-priority"),
            priority.emoji(),
            tr(loc, lang, priority.label_key())
        ));
    }
    if let Some(workflow) = filter.workflow_type {
        lines.push(format!(
            "• {}: {}",
            tr(loc, lang, "field-workflow"),
            tr(loc, lang, workflow.label_key())
        ));
    }
    if let Some(text) = &filter.text {
        lines.push(format!(
            "• {}: «{}»",
            tr(loc, lang, "filter-text"),
            escape(text)
        ));
    }
    if filter.created_from.is_some() || filter.created_to.is_some() {
        let from = filter
            .created_from
            .map(|d| d.format("%d.%m.%Y").to_string())
            .unwrap_or_else(|| "…".to_string());
        let to = filter
            .created_to
            .map(|d| d.format("%d.%m.%Y").to_string())
            .unwrap_or_else(|| "…".to_string());
        lines.push(format!(
            "• {}: {} – {}",
            tr(loc, lang, "field-created"),
            from,
            to
        ));
    }

    lines.join("\n")
}

pub fn format_staff_activity(
    activity: &StaffActivity,
    loc: &LocalizationManager,
    lang: &str,
) -> String {
    let mut lines = vec![
        format!("👥 <b>{}</b>", tr(loc, lang, "staff-title")),
        format!(
            "🟢 {} · 🟡 {} · ⚫ {}",
            activity.online, activity.busy, activity.offline
        ),
        tr_args(
            loc,
            lang,
            "staff-totals",
            &[
                ("active", &activity.active_applications.to_string()),
                ("today", &activity.completed_today.to_string()),
            ],
        ),
        String::new(),
    ];

    if activity.members.is_empty() {
        lines.push(tr(loc, lang, "staff-empty"));
    }

    for member in &activity.members {
        lines.push(format!(
            "{} <b>{}</b> · {}",
            member.status.emoji(),
            escape(&member.full_name),
            tr(loc, lang, member.role.label_key())
        ));
        lines.push(tr_args(
            loc,
            lang,
            "staff-member-stats",
            &[
                ("workload", &tr(loc, lang, member.workload().label_key())),
                ("active", &member.active_applications.to_string()),
                ("today", &member.completed_today.to_string()),
                ("total", &member.completed_total.to_string()),
                ("hours", &format!("{:.1}", member.avg_completion_hours)),
                ("rating", &format!("{:.1}", member.rating)),
            ],
        ));
    }

    if let Some(top) = &activity.top_performer {
        lines.push(String::new());
        lines.push(format!(
            "🏆 {}",
            tr_args(
                loc,
                lang,
                "staff-top-performer",
                &[
                    ("name", &escape(&top.full_name)),
                    ("count", &top.completed_today.to_string()),
                ],
            )
        ));
    }

    lines.join("\n")
}

pub fn format_monitoring(
    snapshot: &MonitoringSnapshot,
    loc: &LocalizationManager,
    lang: &str,
) -> String {
    let mut lines = vec![
        format!("📊 <b>{}</b>", tr(loc, lang, "monitor-title")),
        tr_args(
            loc,
            lang,
            "monitor-generated-at",
            &[("time", &snapshot.generated_at.format("%H:%M:%S").to_string())],
        ),
        String::new(),
        tr_args(
            loc,
            lang,
            "monitor-total",
            &[
                ("total", &snapshot.total.to_string()),
                ("open", &snapshot.open().to_string()),
                ("today", &snapshot.created_today.to_string()),
            ],
        ),
        String::new(),
        format!("<b>{}</b>", tr(loc, lang, "monitor-by-status")),
    ];

    for (status, count) in &snapshot.by_status {
        lines.push(format!(
            "{} {}: {}",
            status.emoji(),
            tr(loc, lang, status.label_key()),
            count
        ));
    }

    lines.push(String::new());
    lines.push(format!("<b>{}</b>", tr(loc, lang, "monitor-by-workflow")));
    for (workflow, count) in &snapshot.by_workflow {
        lines.push(format!(
            "{} {}: {}",
            workflow.emoji(),
            tr(loc, lang, workflow.label_key()),
            count
        ));
    }

    lines.push(String::new());
    lines.push(format!(
        "🚨 {}",
        tr_args(
            loc,
            lang,
            "monitor-urgent",
            &[("count", &snapshot.urgent_open.to_string())]
        )
    ));
    lines.push(format!(
        "⏰ {}",
        tr_args(
            loc,
            lang,
            "monitor-stale",
            &[("count", &snapshot.stale_open.len().to_string())]
        )
    ));
    for id in &snapshot.stale_open {
        lines.push(format!("   • {}", escape(id)));
    }
    lines.push(format!(
        "👥 🟢 {} · 🟡 {} · ⚫ {}",
        snapshot.staff_online, snapshot.staff_busy, snapshot.staff_offline
    ));

    lines.join("\n")
}

fn choice_label(
    entries: &'static [catalog::CatalogEntry],
    code: Option<&str>,
    loc: &LocalizationManager,
    lang: &str,
) -> String {
    match code {
        Some(code) => match catalog::find(entries, code) {
            Some(entry) => format!("{} {}", entry.emoji, tr(loc, lang, entry.label_key)),
            None => escape(code),
        },
        None => "—".to_string(),
    }
}

/// Collected order data plus the cost breakdown, shown before confirmation
pub fn format_order_summary(
    kind: OrderKind,
    draft: &OrderDraft,
    cost: &CostBreakdown,
    loc: &LocalizationManager,
    lang: &str,
) -> String {
    let service_type = draft.service_type.as_deref();
    let sub_type_key = match kind {
        OrderKind::Connection => "order-tariff",
        OrderKind::TechnicalService => "order-problem",
    };

    let mut lines = vec![
        format!("📋 <b>{}</b>", tr(loc, lang, "order-summary-title")),
        String::new(),
        format!(
            "👤 {}: {} ({})",
            tr(loc, lang, "field-client"),
            escape(&draft.client.full_name),
            escape(&draft.client.phone)
        ),
        format!(
            "🏙 {}: {}",
            tr(loc, lang, "field-region"),
            choice_label(catalog::REGIONS, draft.region.as_deref(), loc, lang)
        ),
        format!(
            "📂 {}: {}",
            tr(loc, lang, "order-service-type"),
            choice_label(kind.service_types(), service_type, loc, lang)
        ),
        format!(
            "🔖 {}: {}",
            tr(loc, lang, sub_type_key),
            choice_label(
                kind.sub_types(service_type.unwrap_or_default()),
                draft.sub_type.as_deref(),
                loc,
                lang
            )
        ),
        format!(
            "📍 {}: {}",
            tr(loc, lang, "field-address"),
            escape(draft.address.as_deref().unwrap_or("—"))
        ),
    ];
    if draft.media_file_id.is_some() {
        lines.push(format!("📎 {}", tr(loc, lang, "field-has-media")));
    }
    if let Some((lat, lon)) = draft.location {
        lines.push(format!("🗺 {:.5}, {:.5}", lat, lon));
    }

    lines.push(String::new());
    lines.push(format!("💰 <b>{}</b>", tr(loc, lang, "order-cost-title")));
    lines.push(format!(
        "   {}: {}",
        tr(loc, lang, "cost-visit"),
        format_money(cost.visit_fee, loc, lang)
    ));
    lines.push(format!(
        "   {}: {}",
        tr(loc, lang, "cost-repair"),
        format_money(cost.repair_fee, loc, lang)
    ));
    lines.push(format!(
        "   {}: {}",
        tr(loc, lang, "cost-parts"),
        format_money(cost.parts_fee, loc, lang)
    ));
    lines.push(format!(
        "   <b>{}: {}</b>",
        tr(loc, lang, "cost-total"),
        format_money(cost.total(), loc, lang)
    ));

    lines.join("\n")
}

/// Prompt for the current wizard step, prefixed with the step counter
pub fn format_wizard_step(wizard: &OrderWizard, loc: &LocalizationManager, lang: &str) -> String {
    let title_key = match wizard.kind {
        OrderKind::Connection => "order-title-connection",
        OrderKind::TechnicalService => "order-title-technical",
    };
    let header = format!(
        "<b>{}</b>\n{}\n\n",
        tr(loc, lang, title_key),
        tr_args(
            loc,
            lang,
            "order-step",
            &[
                ("step", &wizard.step.number().to_string()),
                ("total", &TOTAL_STEPS.to_string()),
            ],
        )
    );

    let body = match &wizard.step {
        WizardStep::ChoosingSearchMethod => tr(loc, lang, "order-choose-search"),
        WizardStep::AwaitingClientQuery { method } => tr(loc, lang, method.prompt_key()),
        WizardStep::SelectingClient { candidates } => tr_args(
            loc,
            lang,
            "order-select-client",
            &[("count", &candidates.len().to_string())],
        ),
        WizardStep::AwaitingNewClientName => tr(loc, lang, "order-new-client-name"),
        WizardStep::AwaitingNewClientPhone { name } => tr_args(
            loc,
            lang,
            "order-new-client-phone",
            &[("name", &escape(name))],
        ),
        WizardStep::SelectingRegion { draft } => tr_args(
            loc,
            lang,
            "order-choose-region",
            &[("client", &escape(&draft.client.full_name))],
        ),
        WizardStep::SelectingServiceType { .. } => match wizard.kind {
            OrderKind::Connection => tr(loc, lang, "order-choose-connection-type"),
            OrderKind::TechnicalService => tr(loc, lang, "order-choose-service-type"),
        },
        WizardStep::SelectingSubType { .. } => match wizard.kind {
            OrderKind::Connection => tr(loc, lang, "order-choose-tariff"),
            OrderKind::TechnicalService => tr(loc, lang, "order-choose-problem"),
        },
        WizardStep::AwaitingAddress { .. } => tr(loc, lang, "order-enter-address"),
        WizardStep::AwaitingMedia { .. } => tr(loc, lang, "order-send-media"),
        WizardStep::AwaitingLocation { .. } => tr(loc, lang, "order-send-location"),
        WizardStep::Confirming { draft, cost } => {
            format_order_summary(wizard.kind, draft, cost, loc, lang)
        }
    };

    header + &body
}

pub fn format_order_created(app: &Application, loc: &LocalizationManager, lang: &str) -> String {
    let cost = app
        .estimated_cost
        .map(|c| format_money(c, loc, lang))
        .unwrap_or_default();
    format!(
        "✅ {}",
        tr_args(
            loc,
            lang,
            "order-created",
            &[("id", &escape(&app.id)), ("cost", &cost)],
        )
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::localization::LocalizationManager;
    use crate::mock_data::{seed_applications, seed_staff};

    #[test]
    fn test_truncate_text_is_char_safe() {
        assert_eq!(truncate_text("Toshkent", 20), "Toshkent");
        assert_eq!(truncate_text("Чиланзарский район", 10), "Чиланза...");
    }

    #[test]
    fn test_card_escapes_user_text() {
        let loc = LocalizationManager::new().unwrap();
        let mut app = seed_applications(Utc::now()).remove(0);
        app.client_name = "<b>Ali</b> & Co".to_string();

        let card = format_application_card(&app, 0, 10, None, &loc, "uz");
        assert!(card.contains("&lt;b&gt;Ali&lt;/b&gt; &amp; Co"));
        assert!(card.contains("(1/10)"));
    }

    #[test]
    fn test_money_uses_space_separators() {
        let loc = LocalizationManager::new().unwrap();
        assert_eq!(format_money(250_000, &loc, "uz"), "250 000 so'm");
    }

    #[test]
    fn test_staff_activity_mentions_top_performer() {
        let loc = LocalizationManager::new().unwrap();
        let activity = StaffActivity::summarize(&seed_staff(), None);
        let text = format_staff_activity(&activity, &loc, "ru");
        assert!(text.contains("Feruza Mirzayeva"));
        assert!(text.contains("🏆"));
    }
}
