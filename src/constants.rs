pub mod session {
    /// Draft reservation carried between the search and submit steps.
    pub const DRAFT: &str = "reservation";

    /// Committed reservation shown once on the summary page.
    pub const SUMMARY: &str = "reservation_summary";

    pub const FLASH: &str = "flash";

    pub const WARNING: &str = "warning";

    pub const ERROR: &str = "error";

    pub const USER_ID: &str = "user_id";
}

pub mod seed {

    pub const DEFAULT_ADMIN_EMAIL: &str = "admin@example.com";

    pub const DEFAULT_ADMIN_PASSWORD: &str = "password";

    pub const ROOMS: [(i32, &str); 2] = [(1, "General's Quarters"), (2, "Major's Suite")];
}

pub mod limits {

    pub const MIN_FIRST_NAME_LENGTH: usize = 3;

    pub const MAX_CALENDAR_YEAR_OFFSET: i32 = 10;
}
