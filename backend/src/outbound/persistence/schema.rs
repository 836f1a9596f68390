//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly.

diesel::table! {
    /// Items offered for sale.
    listings (id) {
        id -> Uuid,
        title -> Varchar,
        description -> Text,
        /// Asking price; the table enforces `price > 0`.
        price -> Float8,
        /// Public path under `/uploads/`.
        image -> Nullable<Varchar>,
        owner_email -> Varchar,
        category -> Nullable<Varchar>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Comments on listings. Rows cascade when their listing is deleted.
    comments (id) {
        id -> Uuid,
        listing_id -> Uuid,
        content -> Text,
        owner_email -> Varchar,
        created_at -> Timestamptz,
    }
}

diesel::joinable!(comments -> listings (listing_id));
diesel::allow_tables_to_appear_in_same_query!(comments, listings);
