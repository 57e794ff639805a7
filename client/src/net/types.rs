//! Wire types shared with the hosted backend.
//!
//! DESIGN
//! ======
//! Field names mirror the `users` table and the auth service JSON so serde
//! round-trips stay lossless. Enum values travel as lowercase strings.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use serde::{Deserialize, Deserializer, Serialize};

/// Credential identity issued by the auth service.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Opaque user identifier (UUID string).
    pub id: String,
    /// Email the credential was registered with.
    #[serde(default)]
    pub email: String,
}

/// Role recorded on a profile; gates dashboard content and routes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    #[default]
    Customer,
    Landscaper,
}

impl UserRole {
    pub const ALL: [Self; 3] = [Self::Customer, Self::Landscaper, Self::Admin];

    /// Lowercase wire name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Customer => "customer",
            Self::Landscaper => "landscaper",
        }
    }

    /// Parse a wire name; `None` for anything unrecognized.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "admin" => Some(Self::Admin),
            "customer" => Some(Self::Customer),
            "landscaper" => Some(Self::Landscaper),
            _ => None,
        }
    }
}

/// Account lifecycle status.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountStatus {
    #[default]
    Active,
    Inactive,
    Suspended,
}

/// A row of the `users` table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Credential identifier this profile belongs to.
    pub user_id: String,
    pub email: String,
    pub phone_number: Option<String>,
    pub user_role: UserRole,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub profile_image_url: Option<String>,
    pub street_address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub account_status: AccountStatus,
    /// Server-populated timestamps (ISO-8601).
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
    /// Soft-delete marker; carried but never written by the app.
    #[serde(default)]
    pub deleted_at: Option<String>,
}

impl UserProfile {
    /// Identity this profile is keyed to.
    #[must_use]
    pub fn identity(&self) -> Identity {
        Identity { id: self.user_id.clone(), email: self.email.clone() }
    }

    /// Merge accepted partial-update fields into this cached copy.
    pub fn apply(&mut self, changes: &ProfileChanges) {
        fn merge<T: Clone>(slot: &mut T, change: Option<&T>) {
            if let Some(value) = change {
                slot.clone_from(value);
            }
        }

        merge(&mut self.email, changes.email.as_ref());
        merge(&mut self.phone_number, changes.phone_number.as_ref());
        merge(&mut self.user_role, changes.user_role.as_ref());
        merge(&mut self.first_name, changes.first_name.as_ref());
        merge(&mut self.last_name, changes.last_name.as_ref());
        merge(&mut self.profile_image_url, changes.profile_image_url.as_ref());
        merge(&mut self.street_address, changes.street_address.as_ref());
        merge(&mut self.city, changes.city.as_ref());
        merge(&mut self.state, changes.state.as_ref());
        merge(&mut self.zip_code, changes.zip_code.as_ref());
        merge(&mut self.account_status, changes.account_status.as_ref());
    }
}

/// Insert record for a freshly signed-up user. Timestamps are server-populated.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewProfile {
    pub user_id: String,
    pub email: String,
    pub phone_number: Option<String>,
    pub user_role: UserRole,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub profile_image_url: Option<String>,
    pub street_address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub account_status: AccountStatus,
}

impl NewProfile {
    /// Default row for a new credential: no contact or address data, active.
    #[must_use]
    pub fn for_identity(identity: &Identity, role: UserRole) -> Self {
        Self {
            user_id: identity.id.clone(),
            email: identity.email.clone(),
            phone_number: None,
            user_role: role,
            first_name: None,
            last_name: None,
            profile_image_url: None,
            street_address: None,
            city: None,
            state: None,
            zip_code: None,
            account_status: AccountStatus::Active,
        }
    }
}

/// Partial profile update.
///
/// `None` leaves a column untouched. For nullable columns `Some(None)`
/// writes `null`. Only present fields are serialized.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileChanges {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "nullable")]
    pub phone_number: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_role: Option<UserRole>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "nullable")]
    pub first_name: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "nullable")]
    pub last_name: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "nullable")]
    pub profile_image_url: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "nullable")]
    pub street_address: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "nullable")]
    pub city: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "nullable")]
    pub state: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "nullable")]
    pub zip_code: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_status: Option<AccountStatus>,
}

impl ProfileChanges {
    /// True when no field would be written.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Read a present field, `null` included, as `Some`. Absent fields fall back
/// to the `default` of `None`.
fn nullable<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

/// An authenticated session as persisted by the backend client.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthSession {
    pub access_token: String,
    pub refresh_token: String,
    /// Expiry in unix seconds.
    pub expires_at: i64,
    pub user: Identity,
}

/// Session-change notification kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AuthEvent {
    SignedIn,
    SignedOut,
    TokenRefreshed,
}

/// A delivered notification: what happened and the session afterwards.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthChange {
    pub event: AuthEvent,
    pub session: Option<AuthSession>,
}
