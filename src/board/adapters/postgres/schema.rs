//! Diesel schema for board, task, and comment persistence.

diesel::table! {
    /// Board records.
    boards (id) {
        /// Internal board identifier.
        id -> Uuid,
        /// Board title.
        #[max_length = 255]
        title -> Varchar,
        /// Owning user.
        owner_id -> Uuid,
    }
}

diesel::table! {
    /// Board membership join table.
    board_members (board_id, user_id) {
        /// Board the membership belongs to.
        board_id -> Uuid,
        /// Member user.
        user_id -> Uuid,
    }
}

diesel::table! {
    /// Task records.
    tasks (id) {
        /// Internal task identifier.
        id -> Uuid,
        /// Task title.
        #[max_length = 255]
        title -> Varchar,
        /// Task description.
        description -> Text,
        /// Priority: low, medium, or high.
        #[max_length = 10]
        priority -> Varchar,
        /// Status: to-do, in-progress, review, or done.
        #[max_length = 15]
        status -> Varchar,
        /// Optional due date.
        due_date -> Nullable<Date>,
        /// Board the task belongs to.
        board_id -> Uuid,
        /// Optional assignee; set null when the user disappears.
        assignee_id -> Nullable<Uuid>,
        /// Optional reviewer; set null when the user disappears.
        reviewer_id -> Nullable<Uuid>,
        /// Creating user.
        owner_id -> Uuid,
    }
}

diesel::table! {
    /// Comment records.
    comments (id) {
        /// Internal comment identifier.
        id -> Uuid,
        /// Task the comment belongs to.
        task_id -> Uuid,
        /// Authoring user.
        author_id -> Uuid,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Comment content.
        content -> Text,
    }
}
