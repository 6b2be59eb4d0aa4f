use serde_json::{Map, Value};
use uuid::Uuid;

/// The closed set of principal kinds a token can be issued for.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum PrincipalType {
    AdminUser,
    ApplicationUser,
    Organization,
    Application,
}

impl PrincipalType {
    /// The lowercase name persisted in the `principal` column (§4.6).
    pub const fn as_column_str(self) -> &'static str {
        match self {
            PrincipalType::AdminUser => "adminuser",
            PrincipalType::ApplicationUser => "applicationuser",
            PrincipalType::Organization => "organization",
            PrincipalType::Application => "application",
        }
    }

    /// Parse a `principal` column value back into a [`PrincipalType`].
    ///
    /// Returns `None` for anything unrecognized. Per §4.6, an unrecognized
    /// principal-type string is silently treated as an absent principal
    /// rather than a decode error — this preserves the reference
    /// implementation's forward-compatibility behavior if a future
    /// principal kind is written by a newer version and read by an older
    /// one.
    pub fn from_column_str(s: &str) -> Option<Self> {
        match s {
            "adminuser" => Some(PrincipalType::AdminUser),
            "applicationuser" => Some(PrincipalType::ApplicationUser),
            "organization" => Some(PrincipalType::Organization),
            "application" => Some(PrincipalType::Application),
            _ => None,
        }
    }
}

/// A principal a token authenticates as. All three fields are present
/// together or the principal is entirely absent (`Option<AuthPrincipalInfo>`
/// on [`TokenInfo`]) — modeled as a sum type rather than three independently
/// nullable fields (§9 re-architecture guidance).
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AuthPrincipalInfo {
    pub principal_type: PrincipalType,
    pub entity_id: Uuid,
    pub application_id: Uuid,
}

/// The persistent record a token's identifier addresses (§3).
#[derive(Clone, Debug, PartialEq)]
pub struct TokenInfo {
    pub uuid: Uuid,
    pub kind: String,
    pub created_ms: i64,
    pub accessed_ms: i64,
    pub inactive_ms: i64,
    pub principal: Option<AuthPrincipalInfo>,
    pub state: Map<String, Value>,
}

impl TokenInfo {
    /// The `kind` used when the caller doesn't specify one at issuance
    /// (§4.7).
    pub const DEFAULT_KIND: &'static str = "access";

    /// Build a freshly-issued record: `created_ms == accessed_ms ==
    /// timestamp_from_uuid(uuid)`, `inactive_ms == 0` (§4.7).
    pub fn issued(
        uuid: Uuid,
        created_ms: i64,
        kind: Option<String>,
        principal: Option<AuthPrincipalInfo>,
        state: Map<String, Value>,
    ) -> Self {
        Self {
            uuid,
            kind: kind.unwrap_or_else(|| Self::DEFAULT_KIND.to_string()),
            created_ms,
            accessed_ms: created_ms,
            inactive_ms: 0,
            principal,
            state,
        }
    }
}
