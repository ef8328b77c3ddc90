//! User data models and DTOs.
//!
//! # Core Types
//!
//! - [`User`] - The credential record as stored
//! - [`NewUser`] - Fields needed to create a record
//! - [`UserName`] - Read-only `(id, username)` projection
//! - [`ResetState`] - Where a record sits in the password-reset lifecycle
//!
//! # Request DTOs
//!
//! - [`RegisterRequest`] - Self-service registration
//! - [`UpdateProfileRequest`] - Partial profile update
//! - [`ChangePermissionRequest`] - Admin-only role change, applied as [`RoleChanges`]
//! - [`UsernamesRequest`] - Batch id to username lookup

use std::fmt;
use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::utils::serde::deserialize_optional_string;

static USERNAME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9]+$").expect("username pattern is valid"));

/// Usernames are case-sensitive and ASCII alphanumeric only.
pub fn is_valid_username(username: &str) -> bool {
    USERNAME_PATTERN.is_match(username)
}

/// A credential record.
///
/// `password` holds a bcrypt digest. `verify_code`/`verify_expires_at` are the
/// password-reset sub-state: an empty code means no reset is in flight, and
/// `verify_expires_at` is meaningless while the code is empty.
#[derive(Clone, PartialEq, Eq, FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub password: String,
    pub real_name: String,
    pub email: String,
    pub student_id: String,
    pub avatar: String,
    pub is_admin: bool,
    pub is_teacher: bool,
    pub verify_code: String,
    pub verify_expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl fmt::Debug for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("is_admin", &self.is_admin)
            .field("is_teacher", &self.is_teacher)
            .field("reset_pending", &!self.verify_code.is_empty())
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetState {
    Inactive,
    Pending { expires_at: DateTime<Utc> },
    Expired,
}

impl User {
    pub fn reset_state(&self, now: DateTime<Utc>) -> ResetState {
        if self.verify_code.is_empty() {
            return ResetState::Inactive;
        }

        match self.verify_expires_at {
            Some(expires_at) if now <= expires_at => ResetState::Pending { expires_at },
            _ => ResetState::Expired,
        }
    }

    /// Stores a fresh reset code, replacing any code already in flight.
    pub fn begin_reset(&mut self, code: String, expires_at: DateTime<Utc>) {
        self.verify_code = code;
        self.verify_expires_at = Some(expires_at);
    }

    /// Replaces the password digest and clears the reset code in one step.
    pub fn complete_reset(&mut self, password_hash: String) {
        self.password = password_hash;
        self.verify_code.clear();
        self.verify_expires_at = None;
    }
}

#[derive(Clone, PartialEq, Eq)]
pub struct NewUser {
    pub username: String,
    pub password_hash: String,
    pub real_name: String,
    pub email: String,
    pub student_id: String,
    pub avatar: String,
}

impl fmt::Debug for NewUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewUser")
            .field("username", &self.username)
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow, ToSchema)]
pub struct UserName {
    #[serde(rename = "user_id")]
    pub id: i64,
    pub username: String,
}

#[derive(Deserialize, Clone, Validate, ToSchema)]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 20, message = "username must be 1 to 20 characters"))]
    pub username: String,
    #[validate(length(min = 6, message = "password is too short, at least 6 characters"))]
    pub password: String,
    #[validate(
        email(message = "email is invalid"),
        length(max = 40, message = "email is too long")
    )]
    pub email: String,
    #[serde(rename = "realname")]
    #[validate(length(min = 1, max = 30, message = "realname is required"))]
    pub real_name: String,
    #[validate(length(min = 1, max = 15, message = "student_id is required"))]
    pub student_id: String,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    #[validate(url(message = "avatar must be a valid URL"))]
    pub avatar: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RegisterResponse {
    pub message: String,
    pub user_id: String,
}

/// Partial profile update. Absent fields are left untouched; username and
/// role flags are not editable here.
#[derive(Deserialize, Clone, Default, Validate, ToSchema)]
pub struct UpdateProfileRequest {
    #[serde(rename = "realname")]
    #[validate(length(min = 1, max = 30))]
    pub real_name: Option<String>,
    #[validate(
        email(message = "email is invalid"),
        length(max = 40, message = "email is too long")
    )]
    pub email: Option<String>,
    #[validate(length(min = 6, message = "password is too short, at least 6 characters"))]
    pub password: Option<String>,
    #[validate(length(min = 1, max = 15))]
    pub student_id: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    #[validate(url(message = "avatar must be a valid URL"))]
    pub avatar: Option<String>,
}

/// Field-by-field changes to a [`User`], with any new password already hashed.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct ProfileChanges {
    pub real_name: Option<String>,
    pub email: Option<String>,
    pub password_hash: Option<String>,
    pub student_id: Option<String>,
    pub avatar: Option<String>,
}

impl ProfileChanges {
    pub fn apply_to(self, user: &mut User) {
        if let Some(real_name) = self.real_name {
            user.real_name = real_name;
        }
        if let Some(email) = self.email {
            user.email = email;
        }
        if let Some(password_hash) = self.password_hash {
            user.password = password_hash;
        }
        if let Some(student_id) = self.student_id {
            user.student_id = student_id;
        }
        if let Some(avatar) = self.avatar {
            user.avatar = avatar;
        }
    }
}

/// Role flags to set; `None` leaves a flag as it is.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RoleChanges {
    pub admin: Option<bool>,
    pub teacher: Option<bool>,
}

impl RoleChanges {
    pub fn apply_to(self, user: &mut User) {
        if let Some(admin) = self.admin {
            user.is_admin = admin;
        }
        if let Some(teacher) = self.teacher {
            user.is_teacher = teacher;
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProfileResponse {
    pub user_id: String,
    pub username: String,
    #[serde(rename = "realname")]
    pub real_name: String,
    pub email: String,
    pub student_id: String,
    pub admin: bool,
    pub teacher: bool,
    pub avatar: String,
}

impl From<User> for ProfileResponse {
    fn from(user: User) -> Self {
        Self {
            user_id: user.id.to_string(),
            username: user.username,
            real_name: user.real_name,
            email: user.email,
            student_id: user.student_id,
            admin: user.is_admin,
            teacher: user.is_teacher,
            avatar: user.avatar,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Validate, ToSchema)]
pub struct ChangePermissionRequest {
    pub user_id: i64,
    pub admin: Option<bool>,
    pub teacher: Option<bool>,
}

#[derive(Debug, Deserialize, Clone, Validate, ToSchema)]
pub struct UsernamesRequest {
    #[validate(length(min = 1, message = "data is not complete"))]
    pub user_id: Vec<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UsernamesResponse {
    pub user_list: Vec<UserName>,
}

#[cfg(test)]
pub(crate) fn sample_user() -> User {
    let now = Utc::now();
    User {
        id: 1,
        username: "alice".to_string(),
        password: "$2b$04$placeholder".to_string(),
        real_name: "Alice".to_string(),
        email: "alice@example.com".to_string(),
        student_id: "s1001".to_string(),
        avatar: String::new(),
        is_admin: false,
        is_teacher: false,
        verify_code: String::new(),
        verify_expires_at: None,
        created_at: now,
        updated_at: now,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_username_pattern() {
        assert!(is_valid_username("alice"));
        assert!(is_valid_username("Alice42"));
        assert!(!is_valid_username("alice_42"));
        assert!(!is_valid_username("al ice"));
        assert!(!is_valid_username(""));
    }

    #[test]
    fn test_reset_state_transitions() {
        let now = Utc::now();
        let mut user = sample_user();
        assert_eq!(user.reset_state(now), ResetState::Inactive);

        let expires_at = now + Duration::minutes(5);
        user.begin_reset("123456".to_string(), expires_at);
        assert_eq!(user.reset_state(now), ResetState::Pending { expires_at });
        assert_eq!(user.reset_state(expires_at + Duration::seconds(1)), ResetState::Expired);

        user.complete_reset("new-hash".to_string());
        assert_eq!(user.reset_state(now), ResetState::Inactive);
        assert_eq!(user.password, "new-hash");
        assert!(user.verify_expires_at.is_none());
    }

    #[test]
    fn test_begin_reset_overwrites_previous_code() {
        let now = Utc::now();
        let mut user = sample_user();
        user.begin_reset("111111".to_string(), now + Duration::minutes(5));
        user.begin_reset("222222".to_string(), now + Duration::minutes(6));
        assert_eq!(user.verify_code, "222222");
    }

    #[test]
    fn test_profile_changes_only_touch_present_fields() {
        let mut user = sample_user();
        ProfileChanges {
            email: Some("new@example.com".to_string()),
            ..Default::default()
        }
        .apply_to(&mut user);

        assert_eq!(user.email, "new@example.com");
        assert_eq!(user.real_name, "Alice");
        assert_eq!(user.password, "$2b$04$placeholder");
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let mut user = sample_user();
        user.verify_code = "654321".to_string();
        let printed = format!("{:?}", user);
        assert!(!printed.contains("placeholder"));
        assert!(!printed.contains("654321"));
    }

    #[test]
    fn test_profile_response_uses_string_id() {
        let response = ProfileResponse::from(sample_user());
        assert_eq!(response.user_id, "1");
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["realname"], "Alice");
        assert!(json.get("password").is_none());
    }
}
