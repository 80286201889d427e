//! Core data type definitions

use crate::error::CatalogResult;
use crate::validation_error;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

/// Account roles. The set is closed: every account is either a plain user or an admin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "user" => Ok(Role::User),
            "admin" => Ok(Role::Admin),
            _ => Err(format!("Unknown role: {}", s)),
        }
    }
}

/// Stored account, including the credential hash.
///
/// Never serialized as-is; handlers expose [`AccountView`] instead.
#[derive(Debug, Clone)]
pub struct Account {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Account {
    /// Build a fresh account from an already hashed password
    pub fn new(name: String, email: String, password_hash: String, role: Role) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name,
            email,
            password_hash,
            role,
            created_at: now,
            updated_at: now,
        }
    }

    /// Caller-facing projection without the credential hash
    pub fn to_view(&self) -> AccountView {
        AccountView {
            id: self.id,
            name: self.name.clone(),
            email: self.email.clone(),
            role: self.role,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Public account information
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct AccountView {
    pub id: Uuid,
    #[cfg_attr(feature = "openapi", schema(example = "Ann"))]
    pub name: String,
    #[cfg_attr(feature = "openapi", schema(example = "ann@example.com"))]
    pub email: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Catalog item owned by an account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct Item {
    pub id: Uuid,
    #[cfg_attr(feature = "openapi", schema(example = "Mechanical keyboard"))]
    pub name: String,
    pub description: String,
    #[cfg_attr(feature = "openapi", schema(example = 89.9))]
    pub price: f64,
    #[cfg_attr(feature = "openapi", schema(example = 12))]
    pub stock: i64,
    pub owner_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Item {
    pub fn new(input: ItemInput, owner_id: Uuid) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: input.name,
            description: input.description,
            price: input.price,
            stock: input.stock,
            owner_id,
            created_at: now,
            updated_at: now,
        }
    }

    /// Replace the mutable fields, keeping identity and ownership
    pub fn apply(&mut self, input: ItemInput) {
        self.name = input.name;
        self.description = input.description;
        self.price = input.price;
        self.stock = input.stock;
        self.updated_at = Utc::now();
    }
}

/// Payload for creating or replacing an item
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct ItemInput {
    #[cfg_attr(feature = "openapi", schema(example = "Mechanical keyboard"))]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[cfg_attr(feature = "openapi", schema(example = 89.9))]
    pub price: f64,
    #[cfg_attr(feature = "openapi", schema(example = 12))]
    pub stock: i64,
}

impl ItemInput {
    pub fn validate(&self) -> CatalogResult<()> {
        let name_len = self.name.trim().chars().count();
        if !(2..=120).contains(&name_len) {
            return Err(validation_error!(
                "name must be between 2 and 120 characters",
                "name",
                "items"
            ));
        }
        if !self.price.is_finite() || self.price < 0.0 {
            return Err(validation_error!(
                "price must be a non-negative number",
                "price",
                "items"
            ));
        }
        if self.stock < 0 {
            return Err(validation_error!(
                "stock must not be negative",
                "stock",
                "items"
            ));
        }
        Ok(())
    }
}

/// Registration input, validated before any hashing happens
#[derive(Debug, Clone)]
pub struct Registration<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub password: &'a str,
}

impl Registration<'_> {
    pub const MIN_PASSWORD_LEN: usize = 8;

    pub fn validate(&self) -> CatalogResult<()> {
        let name_len = self.name.trim().chars().count();
        if !(2..=100).contains(&name_len) {
            return Err(validation_error!(
                "name must be between 2 and 100 characters",
                "name",
                "accounts"
            ));
        }
        if !is_valid_email(self.email) {
            return Err(validation_error!(
                "email must be a valid address",
                "email",
                "accounts"
            ));
        }
        if self.password.chars().count() < Self::MIN_PASSWORD_LEN {
            return Err(validation_error!(
                format!(
                    "password must be at least {} characters",
                    Self::MIN_PASSWORD_LEN
                ),
                "password",
                "accounts"
            ));
        }
        Ok(())
    }
}

/// Syntactic email check: one `@`, non-empty local part, dotted domain, no whitespace.
pub fn is_valid_email(email: &str) -> bool {
    if email.len() > 255 || email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    let labels: Vec<&str> = domain.split('.').collect();
    labels.len() >= 2 && labels.iter().all(|label| !label.is_empty())
}

/// Canonical form used for case-insensitive email comparison.
///
/// Folds ASCII letters only, matching SQLite's `NOCASE` collation.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_round_trips_through_strings() {
        assert_eq!("admin".parse::<Role>().unwrap(), Role::Admin);
        assert_eq!("USER".parse::<Role>().unwrap(), Role::User);
        assert!("root".parse::<Role>().is_err());
        assert_eq!(Role::Admin.to_string(), "admin");
        assert_eq!(
            serde_json::to_string(&Role::User).unwrap(),
            "\"user\"".to_string()
        );
    }

    #[test]
    fn account_view_drops_password_hash() {
        let account = Account::new(
            "Ann".to_string(),
            "ann@example.com".to_string(),
            "$argon2id$secret".to_string(),
            Role::User,
        );
        let json = serde_json::to_value(account.to_view()).unwrap();
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["role"], "user");
        assert_eq!(json["email"], "ann@example.com");
    }

    #[test]
    fn email_validation() {
        assert!(is_valid_email("ann@example.com"));
        assert!(is_valid_email("a.b+tag@sub.example.org"));
        assert!(!is_valid_email("ann@"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("ann@example"));
        assert!(!is_valid_email("ann@@example.com"));
        assert!(!is_valid_email("ann smith@example.com"));
        assert!(!is_valid_email("ann@example..com"));
    }

    #[test]
    fn email_normalization_folds_ascii_only() {
        assert_eq!(normalize_email("  Ann@Example.COM "), "ann@example.com");
        assert_eq!(normalize_email("Émile@example.com"), "Émile@example.com");
        assert_ne!(normalize_email("Émile@example.com"), normalize_email("émile@example.com"));
    }

    #[test]
    fn registration_validation() {
        let ok = Registration {
            name: "Ann",
            email: "ann@example.com",
            password: "password123",
        };
        assert!(ok.validate().is_ok());

        let short_password = Registration {
            password: "short",
            ..ok.clone()
        };
        assert!(matches!(
            short_password.validate(),
            Err(crate::CatalogError::Validation { field: Some(ref f), .. }) if f == "password"
        ));

        let short_name = Registration {
            name: "A",
            ..ok.clone()
        };
        assert!(short_name.validate().is_err());

        let bad_email = Registration {
            email: "not-an-email",
            ..ok
        };
        assert!(bad_email.validate().is_err());
    }

    #[test]
    fn item_input_validation() {
        let input = ItemInput {
            name: "Keyboard".to_string(),
            description: String::new(),
            price: 10.0,
            stock: 1,
        };
        assert!(input.validate().is_ok());

        let negative_price = ItemInput {
            price: -1.0,
            ..input.clone()
        };
        assert!(negative_price.validate().is_err());

        let nan_price = ItemInput {
            price: f64::NAN,
            ..input.clone()
        };
        assert!(nan_price.validate().is_err());

        let negative_stock = ItemInput {
            stock: -3,
            ..input.clone()
        };
        assert!(negative_stock.validate().is_err());

        let tiny_name = ItemInput {
            name: "K".to_string(),
            ..input
        };
        assert!(tiny_name.validate().is_err());
    }

    #[test]
    fn item_apply_keeps_owner() {
        let owner = Uuid::new_v4();
        let mut item = Item::new(
            ItemInput {
                name: "Keyboard".to_string(),
                description: "clicky".to_string(),
                price: 10.0,
                stock: 1,
            },
            owner,
        );
        let id = item.id;
        item.apply(ItemInput {
            name: "Mouse".to_string(),
            description: String::new(),
            price: 5.0,
            stock: 7,
        });
        assert_eq!(item.id, id);
        assert_eq!(item.owner_id, owner);
        assert_eq!(item.name, "Mouse");
        assert_eq!(item.stock, 7);
    }
}
