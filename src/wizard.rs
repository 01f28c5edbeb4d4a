//! Connection / technical service order wizard.
//!
//! A linear state machine with one [`WizardStep`] variant per step. The
//! machine knows nothing about Telegram: the bot layer turns updates into
//! [`WizardInput`]s and renders the returned step. A rejected input returns an
//! error and the caller keeps the previous step.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::catalog::{self, CatalogEntry};
use crate::client_search::{search_clients, SearchMethod};
use crate::errors::{AppError, AppResult};
use crate::models::{Client, Priority, WorkflowType};
use crate::pricing::{self, CostBreakdown};
use crate::repository::{ClientRepository, NewApplication};

lazy_static! {
    static ref UZ_PHONE: Regex = Regex::new(r"^\+?998\d{9}$").expect("Invalid phone regex pattern");
}

pub const ADDRESS_MIN_LEN: usize = 5;
pub const ADDRESS_MAX_LEN: usize = 300;
pub const CLIENT_NAME_MIN_LEN: usize = 3;
pub const CLIENT_NAME_MAX_LEN: usize = 100;

/// Which order the wizard is collecting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderKind {
    Connection,
    TechnicalService,
}

impl OrderKind {
    pub fn code(self) -> &'static str {
        match self {
            OrderKind::Connection => "conn",
            OrderKind::TechnicalService => "tech",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "conn" => Some(OrderKind::Connection),
            "tech" => Some(OrderKind::TechnicalService),
            _ => None,
        }
    }

    pub fn workflow_type(self) -> WorkflowType {
        match self {
            OrderKind::Connection => WorkflowType::ConnectionRequest,
            OrderKind::TechnicalService => WorkflowType::TechnicalService,
        }
    }

    /// Order type key of the cost table
    pub fn pricing_key(self) -> &'static str {
        match self {
            OrderKind::Connection => pricing::CONNECTION_REQUEST,
            OrderKind::TechnicalService => pricing::TECHNICAL_SERVICE,
        }
    }

    /// Choices for the "type" step
    pub fn service_types(self) -> &'static [CatalogEntry] {
        match self {
            OrderKind::Connection => catalog::CONNECTION_TYPES,
            OrderKind::TechnicalService => catalog::SERVICE_TYPES,
        }
    }

    /// Choices for the tariff / problem step given the chosen type
    pub fn sub_types(self, service_type: &str) -> &'static [CatalogEntry] {
        match self {
            OrderKind::Connection => catalog::tariffs_for(service_type),
            OrderKind::TechnicalService => catalog::problems_for(service_type),
        }
    }
}

/// Client snapshot carried through the wizard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectedClient {
    pub id: u32,
    pub full_name: String,
    pub phone: String,
}

impl From<&Client> for SelectedClient {
    fn from(client: &Client) -> Self {
        Self {
            id: client.id,
            full_name: client.full_name.clone(),
            phone: client.phone.clone(),
        }
    }
}

/// Everything collected so far for one order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderDraft {
    pub client: SelectedClient,
    pub region: Option<String>,
    pub service_type: Option<String>,
    /// Tariff for connections, problem kind for technical service
    pub sub_type: Option<String>,
    pub address: Option<String>,
    pub media_file_id: Option<String>,
    pub location: Option<(f64, f64)>,
}

impl OrderDraft {
    fn for_client(client: SelectedClient) -> Self {
        Self {
            client,
            region: None,
            service_type: None,
            sub_type: None,
            address: None,
            media_file_id: None,
            location: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum WizardStep {
    ChoosingSearchMethod,
    AwaitingClientQuery { method: SearchMethod },
    SelectingClient { candidates: Vec<SelectedClient> },
    AwaitingNewClientName,
    AwaitingNewClientPhone { name: String },
    SelectingRegion { draft: OrderDraft },
    SelectingServiceType { draft: OrderDraft },
    SelectingSubType { draft: OrderDraft },
    AwaitingAddress { draft: OrderDraft },
    AwaitingMedia { draft: OrderDraft },
    AwaitingLocation { draft: OrderDraft },
    Confirming { draft: OrderDraft, cost: CostBreakdown },
}

impl WizardStep {
    /// Position shown to the user as "step N of [`TOTAL_STEPS`]"
    pub fn number(&self) -> usize {
        match self {
            WizardStep::ChoosingSearchMethod
            | WizardStep::AwaitingClientQuery { .. }
            | WizardStep::AwaitingNewClientName
            | WizardStep::AwaitingNewClientPhone { .. } => 1,
            WizardStep::SelectingClient { .. } => 2,
            WizardStep::SelectingRegion { .. }
            | WizardStep::SelectingServiceType { .. }
            | WizardStep::SelectingSubType { .. } => 3,
            WizardStep::AwaitingAddress { .. } => 4,
            WizardStep::AwaitingMedia { .. } | WizardStep::AwaitingLocation { .. } => 5,
            WizardStep::Confirming { .. } => 6,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            WizardStep::ChoosingSearchMethod => "choosing_search_method",
            WizardStep::AwaitingClientQuery { .. } => "awaiting_client_query",
            WizardStep::SelectingClient { .. } => "selecting_client",
            WizardStep::AwaitingNewClientName => "awaiting_new_client_name",
            WizardStep::AwaitingNewClientPhone { .. } => "awaiting_new_client_phone",
            WizardStep::SelectingRegion { .. } => "selecting_region",
            WizardStep::SelectingServiceType { .. } => "selecting_service_type",
            WizardStep::SelectingSubType { .. } => "selecting_sub_type",
            WizardStep::AwaitingAddress { .. } => "awaiting_address",
            WizardStep::AwaitingMedia { .. } => "awaiting_media",
            WizardStep::AwaitingLocation { .. } => "awaiting_location",
            WizardStep::Confirming { .. } => "confirming",
        }
    }
}

pub const TOTAL_STEPS: usize = 6;

/// One user action fed into the wizard
#[derive(Debug, Clone, PartialEq)]
pub enum WizardInput {
    Method(SearchMethod),
    Text(String),
    PickClient(u32),
    /// Region, type, tariff or problem code depending on the step
    Choose(String),
    Media(String),
    Location { latitude: f64, longitude: f64 },
    Skip,
    Confirm,
    Cancel,
}

/// Data of a confirmed order
#[derive(Debug, Clone, PartialEq)]
pub struct CompletedOrder {
    pub kind: OrderKind,
    pub draft: OrderDraft,
    pub cost: CostBreakdown,
}

impl CompletedOrder {
    pub fn to_new_application(&self, created_by: &str) -> NewApplication {
        let draft = &self.draft;
        NewApplication {
            client_name: draft.client.full_name.clone(),
            client_phone: draft.client.phone.clone(),
            address: draft.address.clone().unwrap_or_default(),
            region: draft.region.clone().unwrap_or_default(),
            description: format!(
                "{} / {}",
                draft.service_type.as_deref().unwrap_or("-"),
                draft.sub_type.as_deref().unwrap_or("-")
            ),
            priority: Priority::Normal,
            workflow_type: self.kind.workflow_type(),
            estimated_cost: Some(self.cost.total()),
            media_file_id: draft.media_file_id.clone(),
            location: draft.location,
            created_by: created_by.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum WizardOutcome {
    Continue(OrderWizard),
    Completed(CompletedOrder),
    Cancelled,
}

/// Wizard state: the order kind plus the current step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderWizard {
    pub kind: OrderKind,
    pub step: WizardStep,
}

impl OrderWizard {
    pub fn start(kind: OrderKind) -> Self {
        Self {
            kind,
            step: WizardStep::ChoosingSearchMethod,
        }
    }

    fn with_step(&self, step: WizardStep) -> WizardOutcome {
        WizardOutcome::Continue(OrderWizard {
            kind: self.kind,
            step,
        })
    }

    /// Feeds one input; on error the current step stays valid and unchanged
    pub fn advance(
        &self,
        input: WizardInput,
        clients: &dyn ClientRepository,
    ) -> AppResult<WizardOutcome> {
        if input == WizardInput::Cancel {
            return Ok(WizardOutcome::Cancelled);
        }

        debug!(kind = ?self.kind, step = %self.step.name(), input = ?input, "Advancing order wizard");

        match (&self.step, input) {
            (WizardStep::ChoosingSearchMethod, WizardInput::Method(SearchMethod::New)) => {
                Ok(self.with_step(WizardStep::AwaitingNewClientName))
            }
            (WizardStep::ChoosingSearchMethod, WizardInput::Method(method)) => {
                Ok(self.with_step(WizardStep::AwaitingClientQuery { method }))
            }
            (WizardStep::AwaitingClientQuery { method }, WizardInput::Text(query)) => {
                let all = clients.all_clients();
                let found = search_clients(&all, *method, &query)?;
                if found.is_empty() {
                    return Err(AppError::not_found("client", query.trim()));
                }
                let candidates = found.into_iter().map(SelectedClient::from).collect();
                Ok(self.with_step(WizardStep::SelectingClient { candidates }))
            }
            (WizardStep::SelectingClient { candidates }, WizardInput::PickClient(id)) => {
                let client = candidates
                    .iter()
                    .find(|c| c.id == id)
                    .cloned()
                    .ok_or_else(|| AppError::not_found("client", id.to_string()))?;
                Ok(self.with_step(WizardStep::SelectingRegion {
                    draft: OrderDraft::for_client(client),
                }))
            }
            (WizardStep::AwaitingNewClientName, WizardInput::Text(name)) => {
                let name = validate_client_name(&name)?;
                Ok(self.with_step(WizardStep::AwaitingNewClientPhone { name }))
            }
            (WizardStep::AwaitingNewClientPhone { name }, WizardInput::Text(phone)) => {
                let phone = normalize_phone(&phone)?;
                let client = clients.add_client(name, &phone, "")?;
                Ok(self.with_step(WizardStep::SelectingRegion {
                    draft: OrderDraft::for_client(SelectedClient::from(&client)),
                }))
            }
            (WizardStep::SelectingRegion { draft }, WizardInput::Choose(code)) => {
                require_choice(catalog::REGIONS, &code, "region")?;
                let mut draft = draft.clone();
                draft.region = Some(code);
                Ok(self.with_step(WizardStep::SelectingServiceType { draft }))
            }
            (WizardStep::SelectingServiceType { draft }, WizardInput::Choose(code)) => {
                require_choice(self.kind.service_types(), &code, "service type")?;
                let mut draft = draft.clone();
                draft.service_type = Some(code);
                Ok(self.with_step(WizardStep::SelectingSubType { draft }))
            }
            (WizardStep::SelectingSubType { draft }, WizardInput::Choose(code)) => {
                let service_type = draft.service_type.as_deref().unwrap_or_default();
                require_choice(self.kind.sub_types(service_type), &code, "tariff")?;
                let mut draft = draft.clone();
                draft.sub_type = Some(code);
                Ok(self.with_step(WizardStep::AwaitingAddress { draft }))
            }
            (WizardStep::AwaitingAddress { draft }, WizardInput::Text(address)) => {
                let address = validate_address(&address)?;
                let mut draft = draft.clone();
                draft.address = Some(address);
                Ok(self.with_step(WizardStep::AwaitingMedia { draft }))
            }
            (WizardStep::AwaitingMedia { draft }, WizardInput::Media(file_id)) => {
                let mut draft = draft.clone();
                draft.media_file_id = Some(file_id);
                Ok(self.with_step(WizardStep::AwaitingLocation { draft }))
            }
            (WizardStep::AwaitingMedia { draft }, WizardInput::Skip) => {
                Ok(self.with_step(WizardStep::AwaitingLocation {
                    draft: draft.clone(),
                }))
            }
            (
                WizardStep::AwaitingLocation { draft },
                WizardInput::Location {
                    latitude,
                    longitude,
                },
            ) => {
                if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude)
                {
                    return Err(AppError::Validation("coordinates out of range".to_string()));
                }
                let mut draft = draft.clone();
                draft.location = Some((latitude, longitude));
                Ok(self.confirming(draft))
            }
            (WizardStep::AwaitingLocation { draft }, WizardInput::Skip) => {
                Ok(self.confirming(draft.clone()))
            }
            (WizardStep::Confirming { draft, cost }, WizardInput::Confirm) => {
                Ok(WizardOutcome::Completed(CompletedOrder {
                    kind: self.kind,
                    draft: draft.clone(),
                    cost: *cost,
                }))
            }
            (step, input) => Err(AppError::Validation(format!(
                "input {:?} is not accepted at step {}",
                input,
                step.name()
            ))),
        }
    }

    fn confirming(&self, draft: OrderDraft) -> WizardOutcome {
        let cost = pricing::cost_for(
            self.kind.pricing_key(),
            draft.sub_type.as_deref().unwrap_or_default(),
        );
        self.with_step(WizardStep::Confirming { draft, cost })
    }
}

fn require_choice(entries: &'static [CatalogEntry], code: &str, what: &str) -> AppResult<()> {
    catalog::find(entries, code)
        .map(|_| ())
        .ok_or_else(|| AppError::Validation(format!("unknown {}: {}", what, code)))
}

pub fn validate_address(input: &str) -> AppResult<String> {
    let trimmed = input.trim();
    let len = trimmed.chars().count();
    if len < ADDRESS_MIN_LEN {
        return Err(AppError::Validation("address too short".to_string()));
    }
    if len > ADDRESS_MAX_LEN {
        return Err(AppError::Validation("address too long".to_string()));
    }
    Ok(trimmed.to_string())
}

pub fn validate_client_name(input: &str) -> AppResult<String> {
    let trimmed = input.trim();
    let len = trimmed.chars().count();
    if !(CLIENT_NAME_MIN_LEN..=CLIENT_NAME_MAX_LEN).contains(&len) {
        return Err(AppError::Validation(format!(
            "client name must be {}-{} characters",
            CLIENT_NAME_MIN_LEN, CLIENT_NAME_MAX_LEN
        )));
    }
    Ok(trimmed.to_string())
}

/// Strips spaces, dashes and brackets and checks the Uzbek mobile format
pub fn normalize_phone(input: &str) -> AppResult<String> {
    let compact: String = input
        .chars()
        .filter(|c| !matches!(c, ' ' | '-' | '(' | ')'))
        .collect();
    if !UZ_PHONE.is_match(&compact) {
        return Err(AppError::Validation(format!("invalid phone: {}", input)));
    }
    if compact.starts_with('+') {
        Ok(compact)
    } else {
        Ok(format!("+{}", compact))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_phone() {
        assert_eq!(
            normalize_phone("+998 90 123-45-67").unwrap(),
            "+998901234567"
        );
        assert_eq!(normalize_phone("998901234567").unwrap(), "+998901234567");
        assert!(normalize_phone("901234567").is_err());
        assert!(normalize_phone("+7 900 123 45 67").is_err());
    }

    #[test]
    fn test_validate_address_bounds() {
        assert!(validate_address("  uy ").is_err());
        assert_eq!(validate_address("  Chilonzor 5 ").unwrap(), "Chilonzor 5");
        assert!(validate_address(&"a".repeat(301)).is_err());
    }

    #[test]
    fn test_step_numbers_are_monotonic_on_happy_path() {
        assert_eq!(WizardStep::ChoosingSearchMethod.number(), 1);
        assert!(WizardStep::AwaitingMedia {
            draft: OrderDraft::for_client(SelectedClient {
                id: 1,
                full_name: "A".into(),
                phone: "+998901234567".into(),
            })
        }
        .number() <= TOTAL_STEPS);
    }
}
