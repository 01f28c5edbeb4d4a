//! Repository interfaces and the process-memory store behind them.
//!
//! The store is seeded from [`crate::mock_data`] and lives for the process
//! lifetime; nothing is written to disk.

use std::collections::HashMap;

use chrono::{DateTime, Datelike, Utc};
use parking_lot::RwLock;
use tracing::{debug, info};

use crate::errors::{AppError, AppResult};
use crate::filters::ApplicationFilter;
use crate::mock_data;
use crate::observability::store_span;
use crate::models::{
    Application, ApplicationStatus, Client, Priority, StaffMember, StaffRole, WorkflowType,
};
use crate::status_workflow;

/// Fields supplied when a wizard creates a new application
#[derive(Debug, Clone, PartialEq)]
pub struct NewApplication {
    pub client_name: String,
    pub client_phone: String,
    pub address: String,
    pub region: String,
    pub description: String,
    pub priority: Priority,
    pub workflow_type: WorkflowType,
    pub estimated_cost: Option<u64>,
    pub media_file_id: Option<String>,
    pub location: Option<(f64, f64)>,
    pub created_by: String,
}

pub trait ApplicationRepository: Send + Sync {
    fn get_by_id(&self, id: &str) -> AppResult<Application>;
    fn list_all(&self) -> Vec<Application>;
    fn list_filtered(&self, filter: &ApplicationFilter) -> Vec<Application>;
    /// Applies a whitelisted status change; rejected changes leave the record untouched
    fn update_status(
        &self,
        id: &str,
        new_status: ApplicationStatus,
        actor: &str,
        comment: Option<String>,
    ) -> AppResult<Application>;
    fn assign(&self, id: &str, staff_id: u32, actor: &str) -> AppResult<Application>;
    fn create(&self, new_application: NewApplication) -> AppResult<Application>;
}

pub trait ClientRepository: Send + Sync {
    fn get_client(&self, id: u32) -> AppResult<Client>;
    fn all_clients(&self) -> Vec<Client>;
    fn add_client(&self, full_name: &str, phone: &str, region: &str) -> AppResult<Client>;
}

pub trait StaffRepository: Send + Sync {
    fn all_staff(&self) -> Vec<StaffMember>;
    fn get_staff(&self, id: u32) -> AppResult<StaffMember>;
    fn staff_by_role(&self, role: StaffRole) -> Vec<StaffMember> {
        self.all_staff()
            .into_iter()
            .filter(|member| member.role == role)
            .collect()
    }
    fn junior_managers(&self) -> Vec<StaffMember> {
        self.staff_by_role(StaffRole::JuniorManager)
    }
}

#[derive(Debug, Default)]
struct StoreData {
    applications: Vec<Application>,
    clients: Vec<Client>,
    staff: Vec<StaffMember>,
    next_sequence: HashMap<&'static str, u32>,
    created_orders: u32,
}

/// Thread-safe in-memory implementation of every repository trait
#[derive(Debug, Default)]
pub struct InMemoryStore {
    data: RwLock<StoreData>,
}

impl InMemoryStore {
    /// Store pre-filled with the mock seed records
    pub fn seeded() -> Self {
        Self::seeded_at(Utc::now())
    }

    pub fn seeded_at(now: DateTime<Utc>) -> Self {
        Self::with_records(
            mock_data::seed_applications(now),
            mock_data::seed_clients(),
            mock_data::seed_staff(),
        )
    }

    pub fn with_records(
        applications: Vec<Application>,
        clients: Vec<Client>,
        staff: Vec<StaffMember>,
    ) -> Self {
        let mut next_sequence = HashMap::new();
        for prefix in ["CONN", "TECH", "CALL"] {
            let existing = applications
                .iter()
                .filter(|app| app.id.starts_with(prefix))
                .count() as u32;
            next_sequence.insert(prefix, existing + 1);
        }

        info!(
            applications = applications.len(),
            clients = clients.len(),
            staff = staff.len(),
            "In-memory store initialized"
        );

        Self {
            data: RwLock::new(StoreData {
                applications,
                clients,
                staff,
                next_sequence,
                created_orders: 0,
            }),
        }
    }

    /// Number of orders created through the wizards since start-up
    pub fn created_orders(&self) -> u32 {
        self.data.read().created_orders
    }
}

fn id_prefix(workflow_type: WorkflowType) -> &'static str {
    match workflow_type {
        WorkflowType::ConnectionRequest => "CONN",
        WorkflowType::TechnicalService => "TECH",
        WorkflowType::CallCenterDirect => "CALL",
    }
}

fn staff_mut(staff: &mut [StaffMember], id: u32) -> Option<&mut StaffMember> {
    staff.iter_mut().find(|member| member.id == id)
}

impl ApplicationRepository for InMemoryStore {
    fn get_by_id(&self, id: &str) -> AppResult<Application> {
        self.data
            .read()
            .applications
            .iter()
            .find(|app| app.id == id)
            .cloned()
            .ok_or_else(|| AppError::not_found("application", id))
    }

    fn list_all(&self) -> Vec<Application> {
        self.data.read().applications.clone()
    }

    fn list_filtered(&self, filter: &ApplicationFilter) -> Vec<Application> {
        let data = self.data.read();
        filter
            .apply(&data.applications)
            .into_iter()
            .cloned()
            .collect()
    }

    fn update_status(
        &self,
        id: &str,
        new_status: ApplicationStatus,
        actor: &str,
        comment: Option<String>,
    ) -> AppResult<Application> {
        let _span = store_span("update_status", "application").entered();
        let mut guard = self.data.write();
        let data = &mut *guard;

        let app = data
            .applications
            .iter_mut()
            .find(|app| app.id == id)
            .ok_or_else(|| AppError::not_found("application", id))?;

        let old_status = app.status;
        status_workflow::check_transition(old_status, new_status)?;

        app.status = new_status;
        app.updated_at = Utc::now();
        app.updated_by = Some(actor.to_string());
        if comment.is_some() {
            app.comments = comment;
        }

        if let Some(member) = app.assigned_to.and_then(|sid| staff_mut(&mut data.staff, sid)) {
            match new_status {
                ApplicationStatus::Completed => {
                    member.active_applications = member.active_applications.saturating_sub(1);
                    member.completed_today += 1;
                    member.completed_total += 1;
                }
                ApplicationStatus::Cancelled => {
                    member.active_applications = member.active_applications.saturating_sub(1);
                }
                _ => {}
            }
        }
        // A cancelled record holds nobody's workload; reopening starts unassigned
        if new_status == ApplicationStatus::Cancelled {
            app.assigned_to = None;
        }

        debug!(
            application_id = %id,
            from = %old_status.code(),
            to = %new_status.code(),
            actor = %actor,
            "Application status updated"
        );
        Ok(app.clone())
    }

    fn assign(&self, id: &str, staff_id: u32, actor: &str) -> AppResult<Application> {
        let _span = store_span("assign", "application").entered();
        let mut guard = self.data.write();
        let data = &mut *guard;

        let assignee = data
            .staff
            .iter()
            .find(|member| member.id == staff_id)
            .ok_or_else(|| AppError::not_found("staff", staff_id.to_string()))?;
        if assignee.role != StaffRole::JuniorManager {
            return Err(AppError::Validation(format!(
                "staff {} is not a junior manager",
                staff_id
            )));
        }

        let app = data
            .applications
            .iter_mut()
            .find(|app| app.id == id)
            .ok_or_else(|| AppError::not_found("application", id))?;

        if !app.status.is_open() {
            return Err(AppError::InvalidTransition {
                from: app.status,
                to: ApplicationStatus::Assigned,
            });
        }
        if matches!(
            app.status,
            ApplicationStatus::Created | ApplicationStatus::Transferred
        ) {
            status_workflow::check_transition(app.status, ApplicationStatus::Assigned)?;
            app.status = ApplicationStatus::Assigned;
        }

        let previous = app.assigned_to.replace(staff_id);
        app.updated_at = Utc::now();
        app.updated_by = Some(actor.to_string());
        let updated = app.clone();

        if previous != Some(staff_id) {
            if let Some(old) = previous.and_then(|sid| staff_mut(&mut data.staff, sid)) {
                old.active_applications = old.active_applications.saturating_sub(1);
            }
            if let Some(member) = staff_mut(&mut data.staff, staff_id) {
                member.active_applications += 1;
            }
        }

        info!(application_id = %id, staff_id = %staff_id, actor = %actor, "Application assigned");
        Ok(updated)
    }

    fn create(&self, new_application: NewApplication) -> AppResult<Application> {
        let _span = store_span("create", "application").entered();
        let mut data = self.data.write();
        let now = Utc::now();
        let prefix = id_prefix(new_application.workflow_type);

        let sequence = data.next_sequence.entry(prefix).or_insert(1);
        let id = format!("{}-{}-{:03}", prefix, now.year(), *sequence);
        *sequence += 1;

        let app = Application {
            id,
            client_name: new_application.client_name,
            client_phone: new_application.client_phone,
            address: new_application.address,
            region: new_application.region,
            description: new_application.description,
            status: ApplicationStatus::Created,
            priority: new_application.priority,
            workflow_type: new_application.workflow_type,
            assigned_to: None,
            created_at: now,
            updated_at: now,
            updated_by: Some(new_application.created_by),
            comments: None,
            estimated_cost: new_application.estimated_cost,
            media_file_id: new_application.media_file_id,
            location: new_application.location,
        };

        data.applications.push(app.clone());
        data.created_orders += 1;

        info!(application_id = %app.id, workflow = %app.workflow_type.code(), "Application created");
        Ok(app)
    }
}

impl ClientRepository for InMemoryStore {
    fn get_client(&self, id: u32) -> AppResult<Client> {
        self.data
            .read()
            .clients
            .iter()
            .find(|client| client.id == id)
            .cloned()
            .ok_or_else(|| AppError::not_found("client", id.to_string()))
    }

    fn all_clients(&self) -> Vec<Client> {
        self.data.read().clients.clone()
    }

    fn add_client(&self, full_name: &str, phone: &str, region: &str) -> AppResult<Client> {
        let mut data = self.data.write();
        if data.clients.iter().any(|client| client.phone == phone) {
            return Err(AppError::Validation(format!(
                "client with phone {} already exists",
                phone
            )));
        }

        let id = data.clients.iter().map(|client| client.id).max().unwrap_or(0) + 1;
        let client = Client {
            id,
            full_name: full_name.to_string(),
            phone: phone.to_string(),
            address: String::new(),
            region: region.to_string(),
        };
        data.clients.push(client.clone());

        info!(client_id = %id, "Client created");
        Ok(client)
    }
}

impl StaffRepository for InMemoryStore {
    fn all_staff(&self) -> Vec<StaffMember> {
        self.data.read().staff.clone()
    }

    fn get_staff(&self, id: u32) -> AppResult<StaffMember> {
        self.data
            .read()
            .staff
            .iter()
            .find(|member| member.id == id)
            .cloned()
            .ok_or_else(|| AppError::not_found("staff", id.to_string()))
    }
}
