use chrono::Utc;
use csv::{ReaderBuilder, WriterBuilder};
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::{error, info};

use crate::models::application::ApplicationPayload;
use crate::models::booking::BookingPayload;

// Application row as stored in CSV
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ApplicationRecord {
    pub full_name: String,
    pub email: String,
    pub age: i32,
    pub country_timezone: String,
    pub training_level: String,
    pub is_competitive: bool,
    pub training_history: String,
    pub has_worked_with_coach: bool,
    pub coach_experience: String,
    pub why_work_with_me: String,
    pub short_term_goals: String,
    pub long_term_goals: String,
    pub motivation: String,
    pub gdpr_consent: bool,
    pub submitted_at: String, // ISO format
}

// Consultation row as stored in CSV
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ConsultationRecord {
    pub name: String,
    pub email: String,
    pub preferred_date: String,
    pub preferred_time: String,
    pub message: String,
    pub submitted_at: String, // ISO format
}

const APPLICATION_HEADERS: [&str; 15] = [
    "full_name",
    "email",
    "age",
    "country_timezone",
    "training_level",
    "is_competitive",
    "training_history",
    "has_worked_with_coach",
    "coach_experience",
    "why_work_with_me",
    "short_term_goals",
    "long_term_goals",
    "motivation",
    "gdpr_consent",
    "submitted_at",
];

const CONSULTATION_HEADERS: [&str; 6] = [
    "name",
    "email",
    "preferred_date",
    "preferred_time",
    "message",
    "submitted_at",
];

/// Append-only CSV store for accepted submissions. One file per form,
/// one row per submission. Duplicate submissions are stored as-is; the
/// funnel has no idempotency key to dedup on.
pub struct DatabaseService {
    applications_path: String,
    consultations_path: String,
    file_mutex: Mutex<()>,
}

impl DatabaseService {
    pub fn new(applications_path: &str, consultations_path: &str) -> Self {
        create_with_headers(applications_path, &APPLICATION_HEADERS);
        create_with_headers(consultations_path, &CONSULTATION_HEADERS);

        Self {
            applications_path: applications_path.to_string(),
            consultations_path: consultations_path.to_string(),
            file_mutex: Mutex::new(()),
        }
    }

    /// Append one application record, timestamped now.
    pub fn store_application(&self, payload: &ApplicationPayload) -> Result<(), String> {
        let record = ApplicationRecord {
            full_name: payload.full_name.clone(),
            email: payload.email.clone(),
            age: payload.age,
            country_timezone: payload.country_timezone.clone(),
            training_level: payload.training_level.as_str().to_string(),
            is_competitive: payload.is_competitive,
            training_history: payload.training_history.clone(),
            has_worked_with_coach: payload.has_worked_with_coach,
            coach_experience: payload.coach_experience.clone().unwrap_or_default(),
            why_work_with_me: payload.why_work_with_me.clone().unwrap_or_default(),
            short_term_goals: payload.short_term_goals.clone(),
            long_term_goals: payload.long_term_goals.clone(),
            motivation: payload.motivation.clone(),
            gdpr_consent: payload.gdpr_consent,
            submitted_at: Utc::now().to_rfc3339(),
        };

        self.append(&self.applications_path, &record)?;
        info!("Stored application record for {}", record.email);
        Ok(())
    }

    /// Append one consultation record, timestamped now.
    pub fn store_consultation(&self, payload: &BookingPayload) -> Result<(), String> {
        let record = ConsultationRecord {
            name: payload.name.clone(),
            email: payload.email.clone(),
            preferred_date: payload.preferred_date.clone(),
            preferred_time: payload.preferred_time.clone(),
            message: payload.message.clone().unwrap_or_default(),
            submitted_at: Utc::now().to_rfc3339(),
        };

        self.append(&self.consultations_path, &record)?;
        info!("Stored consultation record for {}", record.email);
        Ok(())
    }

    /// Read back every stored application.
    pub fn list_applications(&self) -> Result<Vec<ApplicationRecord>, String> {
        self.read_all(&self.applications_path)
    }

    /// Read back every stored consultation request.
    pub fn list_consultations(&self) -> Result<Vec<ConsultationRecord>, String> {
        self.read_all(&self.consultations_path)
    }

    fn append<R: Serialize>(&self, path: &str, record: &R) -> Result<(), String> {
        let _lock = self
            .file_mutex
            .lock()
            .map_err(|e| format!("Failed to acquire mutex: {}", e))?;

        let file = OpenOptions::new()
            .append(true)
            .open(path)
            .map_err(|e| format!("Failed to open database file: {}", e))?;

        let mut writer = WriterBuilder::new().has_headers(false).from_writer(file);

        writer
            .serialize(record)
            .map_err(|e| format!("Failed to serialize record: {}", e))?;

        writer
            .flush()
            .map_err(|e| format!("Failed to flush writer: {}", e))
    }

    fn read_all<R: for<'de> Deserialize<'de>>(&self, path: &str) -> Result<Vec<R>, String> {
        let _lock = self
            .file_mutex
            .lock()
            .map_err(|e| format!("Failed to acquire mutex: {}", e))?;

        if !Path::new(path).exists() {
            return Ok(Vec::new());
        }

        let file = File::open(path).map_err(|e| format!("Failed to open database file: {}", e))?;
        let mut reader = ReaderBuilder::new().has_headers(true).from_reader(file);

        let mut records = Vec::new();
        for result in reader.deserialize() {
            let record: R = result.map_err(|e| format!("Failed to read record: {}", e))?;
            records.push(record);
        }

        Ok(records)
    }
}

fn create_with_headers(path: &str, headers: &[&str]) {
    if Path::new(path).exists() {
        return;
    }

    info!("Creating new submissions database file at {}", path);

    let file = File::create(path).unwrap_or_else(|e| {
        error!("Failed to create database file: {}", e);
        panic!("Failed to create database file: {}", e)
    });

    let mut writer = WriterBuilder::new().has_headers(true).from_writer(file);

    if let Err(e) = writer.write_record(headers) {
        error!("Failed to write headers: {}", e);
        panic!("Failed to write headers: {}", e);
    }

    if let Err(e) = writer.flush() {
        error!("Failed to flush headers: {}", e);
        panic!("Failed to flush headers: {}", e);
    }
}

// Create a singleton database service
pub fn create_database_service() -> Arc<DatabaseService> {
    let applications_path = std::env::var("APPLICATIONS_DATABASE_PATH")
        .unwrap_or_else(|_| "/app/data/applications.csv".to_string());
    let consultations_path = std::env::var("CONSULTATIONS_DATABASE_PATH")
        .unwrap_or_else(|_| "/app/data/consultations.csv".to_string());

    for path in [&applications_path, &consultations_path] {
        if let Some(dir) = std::path::Path::new(path).parent() {
            if let Err(e) = std::fs::create_dir_all(dir) {
                tracing::error!("Failed to create data directory: {}", e);
                panic!("Failed to create data directory: {}", e);
            }
        }
    }

    Arc::new(DatabaseService::new(&applications_path, &consultations_path))
}
