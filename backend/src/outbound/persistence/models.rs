//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{experience_uids, experiences, registrations, users};

/// Row struct for reading from the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub display_name: String,
    pub email: String,
    pub role: String,
    pub points: i32,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

/// Row struct for reading from the experiences table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = experiences)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ExperienceRow {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub category: String,
    pub cover_image_url: Option<String>,
    pub address: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub points_awarded: Option<i32>,
    pub visible: bool,
}

/// Row struct for reading from the experience_uids table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = experience_uids)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ExperienceUidRow {
    pub id: Uuid,
    pub experience_id: Uuid,
    pub uid: String,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

/// Row struct for reading from the registrations table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = registrations)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct RegistrationRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub experience_id: Uuid,
    pub experience_uid_id: Uuid,
    pub opinion: Option<String>,
    pub cover_image_url: Option<String>,
    pub points_awarded: i32,
    pub registered_at: DateTime<Utc>,
}

/// Insertable struct for new registrations.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = registrations)]
pub(crate) struct NewRegistrationRow<'a> {
    pub id: Uuid,
    pub user_id: Uuid,
    pub experience_id: Uuid,
    pub experience_uid_id: Uuid,
    pub opinion: Option<&'a str>,
    pub cover_image_url: Option<&'a str>,
    pub points_awarded: i32,
    pub registered_at: DateTime<Utc>,
}
