//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. Regenerate with
//! `diesel print-schema` after changing a migration.

diesel::table! {
    /// Registered accounts.
    users (id) {
        id -> Uuid,
        /// Unique login name.
        username -> Varchar,
        email -> Varchar,
        first_name -> Varchar,
        last_name -> Varchar,
        /// PHC-formatted Argon2id hash.
        password_hash -> Text,
        is_admin -> Bool,
        date_joined -> Timestamptz,
    }
}

diesel::table! {
    /// Places offered for rent by a host account.
    listings (id) {
        id -> Uuid,
        host_id -> Uuid,
        title -> Varchar,
        description -> Text,
        location -> Varchar,
        /// Nightly price in minor currency units (cents).
        price_per_night_minor -> Int8,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Stays reserved by a customer on a listing.
    bookings (id) {
        id -> Uuid,
        listing_id -> Uuid,
        customer_id -> Uuid,
        start_date -> Date,
        end_date -> Date,
        /// One of `pending`, `confirmed` or `canceled`.
        status -> Varchar,
        created_at -> Timestamptz,
    }
}

diesel::joinable!(listings -> users (host_id));
diesel::joinable!(bookings -> listings (listing_id));
diesel::joinable!(bookings -> users (customer_id));

diesel::allow_tables_to_appear_in_same_query!(bookings, listings, users);
