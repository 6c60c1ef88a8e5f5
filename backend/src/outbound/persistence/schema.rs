//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. They are used
//! by Diesel for compile-time query validation and type-safe SQL generation.

diesel::table! {
    /// Library accounts. `email` is unique and stored lower-cased.
    users (id) {
        id -> Int8,
        firstname -> Varchar,
        lastname -> Varchar,
        phone_number -> Varchar,
        email -> Varchar,
        password_hash -> Text,
        /// `ROLE_USER` or `ROLE_ADMIN`.
        role -> Varchar,
        is_active -> Bool,
        created_at -> Timestamptz,
        /// Admin that last claimed authority over this account's role.
        admin_created_by -> Nullable<Int8>,
    }
}

diesel::table! {
    /// One-time email verification tokens.
    verification_tokens (token) {
        token -> Uuid,
        user_id -> Int8,
        expires_at -> Timestamptz,
    }
}

diesel::table! {
    /// Authors, unique by first and last name.
    authors (id) {
        id -> Int8,
        firstname -> Varchar,
        lastname -> Varchar,
        date_of_birth -> Nullable<Date>,
        birthplace -> Nullable<Varchar>,
    }
}

diesel::table! {
    /// Genres, unique by title.
    genres (id) {
        id -> Int8,
        title -> Varchar,
        description -> Nullable<Varchar>,
    }
}

diesel::table! {
    /// Catalogued books. `quantity` has a `CHECK (quantity >= 0)` constraint.
    books (id) {
        id -> Int8,
        title -> Varchar,
        description -> Nullable<Varchar>,
        publication_year -> Varchar,
        quantity -> Int4,
        author_id -> Int8,
        created_by -> Int8,
    }
}

diesel::table! {
    /// Book to genre links.
    book_genres (book_id, genre_id) {
        book_id -> Int8,
        genre_id -> Int8,
    }
}

diesel::table! {
    /// Favourite books per user.
    user_favorite_books (user_id, book_id) {
        user_id -> Int8,
        book_id -> Int8,
    }
}

diesel::table! {
    /// Loans. Outstanding while `actual_return_date` is null; never deleted.
    orders (id) {
        id -> Int8,
        user_id -> Int8,
        book_id -> Int8,
        order_date -> Date,
        return_due_date -> Date,
        actual_return_date -> Nullable<Date>,
    }
}

diesel::table! {
    /// Append-only audit trail of checkouts and returns.
    order_history (id) {
        id -> Int8,
        order_id -> Int8,
        /// `TAKING` or `RETURNING`.
        status -> Varchar,
        action_date -> Timestamptz,
    }
}

diesel::table! {
    /// Reader reviews.
    reviews (id) {
        id -> Int8,
        comment -> Varchar,
        user_id -> Int8,
        book_id -> Int8,
    }
}

diesel::joinable!(verification_tokens -> users (user_id));
diesel::joinable!(books -> authors (author_id));
diesel::joinable!(books -> users (created_by));
diesel::joinable!(book_genres -> books (book_id));
diesel::joinable!(book_genres -> genres (genre_id));
diesel::joinable!(user_favorite_books -> books (book_id));
diesel::joinable!(orders -> books (book_id));
diesel::joinable!(orders -> users (user_id));
diesel::joinable!(order_history -> orders (order_id));
diesel::joinable!(reviews -> books (book_id));
diesel::joinable!(reviews -> users (user_id));

diesel::allow_tables_to_appear_in_same_query!(
    users,
    verification_tokens,
    authors,
    genres,
    books,
    book_genres,
    user_favorite_books,
    orders,
    order_history,
    reviews,
);
