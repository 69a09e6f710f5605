//! Domain service for administrator authentication.

use crate::domain::BookingError;
use crate::models::User;

/// Domain service trait for authentication.
#[async_trait::async_trait]
pub trait AuthService: Send + Sync {
    /// Verifies credentials and returns the user.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::InvalidCredentials`] if login fails.
    async fn login(&self, email: &str, password: &str) -> Result<User, BookingError>;

    /// Looks up the user stored in a session.
    async fn current_user(&self, id: i32) -> Result<User, BookingError>;

    /// Saves name, email and access level changes.
    async fn update_profile(&self, user: &User) -> Result<(), BookingError>;
}
