//! Seed records loaded into the in-memory store at start-up.

use chrono::{DateTime, Duration, Utc};

use crate::models::{
    Application, ApplicationStatus, Client, Priority, StaffMember, StaffRole, StaffStatus,
    WorkflowType,
};

struct SeedApplication {
    id: &'static str,
    client_name: &'static str,
    client_phone: &'static str,
    address: &'static str,
    region: &'static str,
    description: &'static str,
    status: ApplicationStatus,
    priority: Priority,
    workflow_type: WorkflowType,
    assigned_to: Option<u32>,
    created_hours_ago: i64,
    updated_hours_ago: i64,
}

const SEED_APPLICATIONS: &[SeedApplication] = &[
    SeedApplication {
        id: "CONN-2024-001",
        client_name: "Aziz Karimov",
        client_phone: "+998901234567",
        address: "Toshkent, Chilonzor 5-kvartal, 12-uy",
        region: "toshkent",
        description: "Uy internetiga yangi ulanish (home_100)",
        status: ApplicationStatus::Created,
        priority: Priority::Normal,
        workflow_type: WorkflowType::ConnectionRequest,
        assigned_to: None,
        created_hours_ago: 2,
        updated_hours_ago: 2,
    },
    SeedApplication {
        id: "TECH-2024-001",
        client_name: "Malika Yusupova",
        client_phone: "+998912345678",
        address: "Toshkent, Yunusobod 11-kvartal, 4-uy",
        region: "toshkent",
        description: "Internet tezligi juda past",
        status: ApplicationStatus::InProgress,
        priority: Priority::High,
        workflow_type: WorkflowType::TechnicalService,
        assigned_to: Some(3),
        created_hours_ago: 30,
        updated_hours_ago: 26,
    },
    SeedApplication {
        id: "CALL-2024-001",
        client_name: "Bobur Rahimov",
        client_phone: "+998933456789",
        address: "Samarqand, Registon ko'chasi, 7-uy",
        region: "samarqand",
        description: "TV signal yo'q",
        status: ApplicationStatus::Pending,
        priority: Priority::Normal,
        workflow_type: WorkflowType::CallCenterDirect,
        assigned_to: Some(4),
        created_hours_ago: 72,
        updated_hours_ago: 5,
    },
    SeedApplication {
        id: "CONN-2024-002",
        client_name: "Dilnoza Ahmedova",
        client_phone: "+998944567890",
        address: "Buxoro, Mustaqillik ko'chasi, 15-uy",
        region: "buxoro",
        description: "Ofis uchun biznes ulanish (business_300)",
        status: ApplicationStatus::Assigned,
        priority: Priority::High,
        workflow_type: WorkflowType::ConnectionRequest,
        assigned_to: Some(2),
        created_hours_ago: 5,
        updated_hours_ago: 4,
    },
    SeedApplication {
        id: "TECH-2024-002",
        client_name: "Jasur Toshmatov",
        client_phone: "+998955678901",
        address: "Toshkent, Mirzo Ulug'bek tumani, 3-uy",
        region: "toshkent",
        description: "Router ishlamayapti",
        status: ApplicationStatus::Created,
        priority: Priority::Urgent,
        workflow_type: WorkflowType::TechnicalService,
        assigned_to: None,
        created_hours_ago: 1,
        updated_hours_ago: 1,
    },
    SeedApplication {
        id: "TECH-2024-003",
        client_name: "Nodira Saidova",
        client_phone: "+998966789012",
        address: "Andijon, Bobur shoh ko'chasi, 21-uy",
        region: "andijon",
        description: "Kabel uzilgan",
        status: ApplicationStatus::Completed,
        priority: Priority::High,
        workflow_type: WorkflowType::TechnicalService,
        assigned_to: Some(3),
        created_hours_ago: 192,
        updated_hours_ago: 170,
    },
    SeedApplication {
        id: "CONN-2024-003",
        client_name: "Sherzod Olimov",
        client_phone: "+998977890123",
        address: "Farg'ona, Al-Farg'oniy ko'chasi, 9-uy",
        region: "fargona",
        description: "Ulanish mijoz tomonidan bekor qilindi",
        status: ApplicationStatus::Cancelled,
        priority: Priority::Low,
        workflow_type: WorkflowType::ConnectionRequest,
        assigned_to: None,
        created_hours_ago: 240,
        updated_hours_ago: 200,
    },
    SeedApplication {
        id: "CALL-2024-002",
        client_name: "Gulnora Xasanova",
        client_phone: "+998988901234",
        address: "Namangan, Navoiy ko'chasi, 33-uy",
        region: "namangan",
        description: "Telefon liniyasida shovqin, qayta yo'naltirildi",
        status: ApplicationStatus::Transferred,
        priority: Priority::Urgent,
        workflow_type: WorkflowType::CallCenterDirect,
        assigned_to: None,
        created_hours_ago: 1,
        updated_hours_ago: 0,
    },
    SeedApplication {
        id: "TECH-2024-004",
        client_name: "Otabek Nazarov",
        client_phone: "+998990123456",
        address: "Toshkent, Sergeli 7-kvartal, 40-uy",
        region: "toshkent",
        description: "Internet vaqti-vaqti bilan uziladi",
        status: ApplicationStatus::InProgress,
        priority: Priority::Normal,
        workflow_type: WorkflowType::TechnicalService,
        assigned_to: Some(6),
        created_hours_ago: 4,
        updated_hours_ago: 3,
    },
    SeedApplication {
        id: "CONN-2024-004",
        client_name: "Kamola Ergasheva",
        client_phone: "+998901112233",
        address: "Samarqand, Universitet xiyoboni, 2-uy",
        region: "samarqand",
        description: "Yangi ulanish (home_50)",
        status: ApplicationStatus::Created,
        priority: Priority::Low,
        workflow_type: WorkflowType::ConnectionRequest,
        assigned_to: None,
        created_hours_ago: 480,
        updated_hours_ago: 480,
    },
];

/// Seed applications with timestamps relative to `now`
pub fn seed_applications(now: DateTime<Utc>) -> Vec<Application> {
    SEED_APPLICATIONS
        .iter()
        .map(|seed| Application {
            id: seed.id.to_string(),
            client_name: seed.client_name.to_string(),
            client_phone: seed.client_phone.to_string(),
            address: seed.address.to_string(),
            region: seed.region.to_string(),
            description: seed.description.to_string(),
            status: seed.status,
            priority: seed.priority,
            workflow_type: seed.workflow_type,
            assigned_to: seed.assigned_to,
            created_at: now - Duration::hours(seed.created_hours_ago),
            updated_at: now - Duration::hours(seed.updated_hours_ago),
            updated_by: None,
            comments: None,
            estimated_cost: None,
            media_file_id: None,
            location: None,
        })
        .collect()
}

pub fn seed_clients() -> Vec<Client> {
    [
        (1, "Aziz Karimov", "+998901234567", "Toshkent, Chilonzor 5-kvartal, 12-uy", "toshkent"),
        (2, "Malika Yusupova", "+998912345678", "Toshkent, Yunusobod 11-kvartal, 4-uy", "toshkent"),
        (3, "Bobur Rahimov", "+998933456789", "Samarqand, Registon ko'chasi, 7-uy", "samarqand"),
        (4, "Dilnoza Ahmedova", "+998944567890", "Buxoro, Mustaqillik ko'chasi, 15-uy", "buxoro"),
        (5, "Jasur Toshmatov", "+998955678901", "Toshkent, Mirzo Ulug'bek tumani, 3-uy", "toshkent"),
        (6, "Rustam Karimov", "+998971234500", "Andijon, Navbahor ko'chasi, 8-uy", "andijon"),
        (7, "Nodira Saidova", "+998966789012", "Andijon, Bobur shoh ko'chasi, 21-uy", "andijon"),
        (8, "Otabek Nazarov", "+998990123456", "Toshkent, Sergeli 7-kvartal, 40-uy", "toshkent"),
    ]
    .into_iter()
    .map(|(id, full_name, phone, address, region)| Client {
        id,
        full_name: full_name.to_string(),
        phone: phone.to_string(),
        address: address.to_string(),
        region: region.to_string(),
    })
    .collect()
}

pub fn seed_staff() -> Vec<StaffMember> {
    use StaffRole::*;
    use StaffStatus::*;

    [
        (1, "Sardor Aliyev", Manager, Online, 0, 0, 0, 0.0, 5.0),
        (2, "Nilufar Qodirova", JuniorManager, Online, 3, 4, 210, 5.5, 4.8),
        (3, "Akmal Jo'rayev", Technician, Busy, 5, 3, 340, 3.2, 4.6),
        (4, "Feruza Mirzayeva", CallCenter, Online, 2, 12, 1500, 0.5, 4.9),
        (5, "Javohir Sobirov", JuniorManager, Offline, 0, 0, 95, 6.1, 4.3),
        (6, "Dilshod Karimov", Technician, Online, 8, 2, 410, 4.0, 4.5),
        (7, "Madina Rasulova", JuniorManager, Busy, 4, 2, 150, 5.0, 4.7),
    ]
    .into_iter()
    .map(
        |(id, name, role, status, active, today, total, avg, rating)| StaffMember {
            id,
            full_name: name.to_string(),
            role,
            status,
            active_applications: active,
            completed_today: today,
            completed_total: total,
            avg_completion_hours: avg,
            rating,
        },
    )
    .collect()
}
