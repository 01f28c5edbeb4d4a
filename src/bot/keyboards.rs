//! Inline and reply keyboards.

use teloxide::types::{
    ButtonRequest, InlineKeyboardButton, InlineKeyboardMarkup, KeyboardButton, KeyboardMarkup,
};

use super::callbacks::callback_types::{CallbackAction, OrderCallback};
use super::formatters::truncate_text;
use crate::catalog::{self, CatalogEntry};
use crate::client_search::SearchMethod;
use crate::export::ExportFormat;
use crate::filters::{ApplicationFilter, DatePreset};
use crate::localization::LocalizationManager;
use crate::models::{Application, ApplicationStatus, Priority, StaffMember, StaffRole, WorkflowType};
use crate::pagination::Pager;
use crate::status_workflow::allowed_next;
use crate::wizard::{OrderWizard, WizardStep};

/// Maximum characters shown on one inline button
const BUTTON_TEXT_MAX: usize = 30;

fn tr(loc: &LocalizationManager, lang: &str, key: &str) -> String {
    loc.get_message_in_language(key, lang, None)
}

fn button(text: impl Into<String>, action: CallbackAction) -> InlineKeyboardButton {
    InlineKeyboardButton::callback(text.into(), action.payload())
}

/// Paging row plus the status / assign actions for the shown application
pub fn application_card_keyboard(
    app: &Application,
    pager: &Pager,
    loc: &LocalizationManager,
    lang: &str,
) -> InlineKeyboardMarkup {
    let mut rows = Vec::new();

    if pager.len() > 1 {
        rows.push(vec![
            button("⬅️", CallbackAction::PrevApplication),
            button(
                format!("{}/{}", pager.index() + 1, pager.len()),
                CallbackAction::Noop,
            ),
            button("➡️", CallbackAction::NextApplication),
        ]);
    }

    let mut actions = Vec::new();
    if !allowed_next(app.status).is_empty() {
        actions.push(button(
            format!("🔄 {}", tr(loc, lang, "btn-change-status")),
            CallbackAction::ShowStatusMenu(app.id.clone()),
        ));
    }
    if app.status.is_open() {
        actions.push(button(
            format!("👤 {}", tr(loc, lang, "btn-assign")),
            CallbackAction::ShowAssignMenu(app.id.clone()),
        ));
    }
    if !actions.is_empty() {
        rows.push(actions);
    }

    InlineKeyboardMarkup::new(rows)
}

/// One button per status reachable from the application's current status
pub fn status_select_keyboard(
    app: &Application,
    loc: &LocalizationManager,
    lang: &str,
) -> InlineKeyboardMarkup {
    let mut rows: Vec<Vec<InlineKeyboardButton>> = allowed_next(app.status)
        .iter()
        .map(|status| {
            vec![button(
                format!("{} {}", status.emoji(), tr(loc, lang, status.label_key())),
                CallbackAction::SelectStatus {
                    app_id: app.id.clone(),
                    status: *status,
                },
            )]
        })
        .collect();
    rows.push(vec![back_button(loc, lang)]);
    InlineKeyboardMarkup::new(rows)
}

pub fn assign_keyboard(
    app_id: &str,
    junior_managers: &[StaffMember],
    loc: &LocalizationManager,
    lang: &str,
) -> InlineKeyboardMarkup {
    let mut rows: Vec<Vec<InlineKeyboardButton>> = junior_managers
        .iter()
        .map(|member| {
            let label = format!(
                "{} {} ({})",
                member.status.emoji(),
                member.full_name,
                member.active_applications
            );
            vec![button(
                truncate_text(&label, BUTTON_TEXT_MAX),
                CallbackAction::AssignTo {
                    app_id: app_id.to_string(),
                    staff_id: member.id,
                },
            )]
        })
        .collect();
    rows.push(vec![back_button(loc, lang)]);
    InlineKeyboardMarkup::new(rows)
}

fn back_button(loc: &LocalizationManager, lang: &str) -> InlineKeyboardButton {
    button(
        format!("↩️ {}", tr(loc, lang, "btn-back")),
        CallbackAction::BackToApplication,
    )
}

pub fn comment_keyboard(loc: &LocalizationManager, lang: &str) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![vec![button(
        format!("⏭ {}", tr(loc, lang, "btn-skip-comment")),
        CallbackAction::SkipComment,
    )]])
}

fn mark(selected: bool) -> &'static str {
    if selected {
        "✅ "
    } else {
        ""
    }
}

/// Filter menu; selected criteria are ticked and tapping again clears them
pub fn filter_keyboard(
    filter: &ApplicationFilter,
    loc: &LocalizationManager,
    lang: &str,
) -> InlineKeyboardMarkup {
    let mut rows: Vec<Vec<InlineKeyboardButton>> = ApplicationStatus::ALL
        .chunks(2)
        .map(|pair| {
            pair.iter()
                .map(|status| {
                    button(
                        format!(
                            "{}{} {}",
                            mark(filter.status == Some(*status)),
                            status.emoji(),
                            tr(loc, lang, status.label_key())
                        ),
                        CallbackAction::FilterStatus(*status),
                    )
                })
                .collect()
        })
        .collect();

    rows.push(
        Priority::ALL
            .iter()
            .map(|priority| {
                button(
                    format!("{}{}", mark(filter.priority == Some(*priority)), priority.emoji()),
                    CallbackAction::FilterPriority(*priority),
                )
            })
            .collect(),
    );

    rows.push(
        WorkflowType::ALL
            .iter()
            .map(|workflow| {
                button(
                    format!(
                        "{}{}",
                        mark(filter.workflow_type == Some(*workflow)),
                        workflow.emoji()
                    ),
                    CallbackAction::FilterWorkflow(*workflow),
                )
            })
            .collect(),
    );

    rows.push(
        [DatePreset::Today, DatePreset::Week, DatePreset::Month]
            .iter()
            .map(|preset| {
                button(
                    format!("📅 {}", tr(loc, lang, preset.label_key())),
                    CallbackAction::FilterDate(*preset),
                )
            })
            .collect(),
    );

    rows.push(vec![
        button(
            format!("🧹 {}", tr(loc, lang, "btn-filter-clear")),
            CallbackAction::FilterClear,
        ),
        button(
            format!("✅ {}", tr(loc, lang, "btn-filter-apply")),
            CallbackAction::FilterApply,
        ),
    ]);

    InlineKeyboardMarkup::new(rows)
}

pub fn export_keyboard() -> InlineKeyboardMarkup {
    let buttons: Vec<InlineKeyboardButton> = ExportFormat::ALL
        .iter()
        .map(|format| button(format.button_label(), CallbackAction::Export(*format)))
        .collect();
    InlineKeyboardMarkup::new(buttons.chunks(3).map(|row| row.to_vec()))
}

pub fn staff_role_keyboard(
    selected: Option<StaffRole>,
    loc: &LocalizationManager,
    lang: &str,
) -> InlineKeyboardMarkup {
    let mut buttons = vec![button(
        format!("{}{}", mark(selected.is_none()), tr(loc, lang, "staff-all")),
        CallbackAction::StaffRole(None),
    )];
    buttons.extend(StaffRole::ALL.iter().map(|role| {
        button(
            format!("{}{}", mark(selected == Some(*role)), tr(loc, lang, role.label_key())),
            CallbackAction::StaffRole(Some(*role)),
        )
    }));
    InlineKeyboardMarkup::new(buttons.chunks(2).map(|row| row.to_vec()))
}

pub fn monitoring_keyboard(loc: &LocalizationManager, lang: &str) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![vec![button(
        format!("🔄 {}", tr(loc, lang, "btn-refresh")),
        CallbackAction::MonitorRefresh,
    )]])
}

fn order_button(text: impl Into<String>, order: OrderCallback) -> InlineKeyboardButton {
    button(text, CallbackAction::Order(order))
}

fn cancel_row(loc: &LocalizationManager, lang: &str) -> Vec<InlineKeyboardButton> {
    vec![order_button(
        format!("❌ {}", tr(loc, lang, "btn-cancel")),
        OrderCallback::Cancel,
    )]
}

fn choices(
    entries: &'static [CatalogEntry],
    loc: &LocalizationManager,
    lang: &str,
) -> Vec<Vec<InlineKeyboardButton>> {
    let buttons: Vec<InlineKeyboardButton> = entries
        .iter()
        .map(|entry| {
            order_button(
                format!("{} {}", entry.emoji, tr(loc, lang, entry.label_key)),
                OrderCallback::Choose(entry.code.to_string()),
            )
        })
        .collect();
    buttons.chunks(2).map(|row| row.to_vec()).collect()
}

/// Inline keyboard for the current wizard step; free-text steps only get
/// the cancel button
pub fn wizard_keyboard(
    wizard: &OrderWizard,
    loc: &LocalizationManager,
    lang: &str,
) -> InlineKeyboardMarkup {
    let mut rows = match &wizard.step {
        WizardStep::ChoosingSearchMethod => [
            (SearchMethod::Phone, "📞", "order-method-phone"),
            (SearchMethod::Name, "👤", "order-method-name"),
            (SearchMethod::Id, "🆔", "order-method-id"),
            (SearchMethod::New, "➕", "order-method-new"),
        ]
        .iter()
        .map(|(method, emoji, key)| {
            vec![order_button(
                format!("{} {}", emoji, tr(loc, lang, key)),
                OrderCallback::Method(*method),
            )]
        })
        .collect(),
        WizardStep::SelectingClient { candidates } => candidates
            .iter()
            .map(|client| {
                vec![order_button(
                    truncate_text(
                        &format!("{} · {}", client.full_name, client.phone),
                        BUTTON_TEXT_MAX + 10,
                    ),
                    OrderCallback::Client(client.id),
                )]
            })
            .collect(),
        WizardStep::SelectingRegion { .. } => choices(catalog::REGIONS, loc, lang),
        WizardStep::SelectingServiceType { .. } => choices(wizard.kind.service_types(), loc, lang),
        WizardStep::SelectingSubType { draft } => choices(
            wizard
                .kind
                .sub_types(draft.service_type.as_deref().unwrap_or_default()),
            loc,
            lang,
        ),
        WizardStep::AwaitingMedia { .. } | WizardStep::AwaitingLocation { .. } => {
            vec![vec![order_button(
                format!("⏭ {}", tr(loc, lang, "btn-skip")),
                OrderCallback::Skip,
            )]]
        }
        WizardStep::Confirming { .. } => vec![vec![order_button(
            format!("✅ {}", tr(loc, lang, "btn-confirm")),
            OrderCallback::Confirm,
        )]],
        WizardStep::AwaitingClientQuery { .. }
        | WizardStep::AwaitingNewClientName
        | WizardStep::AwaitingNewClientPhone { .. }
        | WizardStep::AwaitingAddress { .. } => Vec::new(),
    };
    rows.push(cancel_row(loc, lang));
    InlineKeyboardMarkup::new(rows)
}

/// Reply keyboard with a "send location" button for the location step
pub fn location_request_keyboard(loc: &LocalizationManager, lang: &str) -> KeyboardMarkup {
    KeyboardMarkup::new(vec![vec![KeyboardButton::new(format!(
        "📍 {}",
        tr(loc, lang, "btn-send-location")
    ))
    .request(ButtonRequest::Location)]])
    .resize_keyboard()
    .one_time_keyboard()
}
