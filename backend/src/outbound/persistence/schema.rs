//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly.

diesel::table! {
    /// Registered accounts. `email` carries a unique index.
    users (id) {
        id -> Uuid,
        name -> Varchar,
        email -> Varchar,
        /// Argon2id PHC string.
        password_hash -> Text,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Posts; a non-null `deleted_at` marks a soft delete.
    posts (id) {
        id -> Uuid,
        owner_id -> Uuid,
        title -> Varchar,
        content -> Text,
        created_at -> Timestamptz,
        deleted_at -> Nullable<Timestamptz>,
    }
}

diesel::table! {
    /// Questions addressed to `target_user_id`.
    questions (id) {
        id -> Uuid,
        target_user_id -> Uuid,
        message -> Text,
        reply -> Nullable<Text>,
        favourite -> Bool,
        signature -> Nullable<Varchar>,
        created_at -> Timestamptz,
    }
}

diesel::joinable!(posts -> users (owner_id));
diesel::joinable!(questions -> users (target_user_id));

diesel::allow_tables_to_appear_in_same_query!(users, posts, questions);
