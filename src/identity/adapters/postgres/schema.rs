//! Diesel schema for user account persistence.

diesel::table! {
    /// User accounts referenced by boards, tasks, and comments.
    users (id) {
        /// Internal user identifier.
        id -> Uuid,
        /// Unique login name.
        #[max_length = 150]
        username -> Varchar,
        /// Unique email address; null for guest accounts.
        #[max_length = 150]
        email -> Nullable<Varchar>,
        /// First name; empty for guest accounts.
        #[max_length = 150]
        first_name -> Varchar,
        /// Last name; empty for guest accounts.
        #[max_length = 150]
        last_name -> Varchar,
    }
}
