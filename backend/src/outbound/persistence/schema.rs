//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. Regenerate with
//! `diesel print-schema` after changing a migration.

diesel::table! {
    /// Accounts owned by the external account subsystem.
    ///
    /// The passport core reads identity and role and only writes `points`
    /// inside a registration transaction.
    users (id) {
        id -> Uuid,
        display_name -> Varchar,
        email -> Varchar,
        /// `USER` or `ADMIN`.
        role -> Varchar,
        /// Non-negative running total.
        points -> Int4,
        active -> Bool,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Registerable venues and activities.
    experiences (id) {
        id -> Uuid,
        title -> Varchar,
        description -> Nullable<Text>,
        /// Closed category set stored in upper snake case.
        category -> Varchar,
        cover_image_url -> Nullable<Text>,
        address -> Nullable<Text>,
        latitude -> Nullable<Float8>,
        longitude -> Nullable<Float8>,
        /// Configured award; NULL or non-positive means the default.
        points_awarded -> Nullable<Int4>,
        visible -> Bool,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Scan tokens. `uid` is globally unique; lookups key on active rows.
    experience_uids (id) {
        id -> Uuid,
        experience_id -> Uuid,
        uid -> Varchar,
        active -> Bool,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Immutable registration records, unique per (user_id, experience_id).
    registrations (id) {
        id -> Uuid,
        user_id -> Uuid,
        experience_id -> Uuid,
        experience_uid_id -> Uuid,
        opinion -> Nullable<Text>,
        cover_image_url -> Nullable<Text>,
        points_awarded -> Int4,
        registered_at -> Timestamptz,
    }
}

diesel::joinable!(experience_uids -> experiences (experience_id));
diesel::joinable!(registrations -> experiences (experience_id));
diesel::joinable!(registrations -> users (user_id));
diesel::joinable!(registrations -> experience_uids (experience_uid_id));

diesel::allow_tables_to_appear_in_same_query!(experience_uids, experiences, registrations, users);
