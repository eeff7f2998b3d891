use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;

/// Lifecycle state of a catalog entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SystemStatus {
    #[default]
    Active,
    Inactive,
}

impl SystemStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SystemStatus::Active => "Active",
            SystemStatus::Inactive => "Inactive",
        }
    }
}

/// Who a catalog entry is meant for. Descriptive only, never enforced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccessLevel {
    #[default]
    Public,
    Restricted,
    #[serde(rename = "Department-Specific")]
    DepartmentSpecific,
}

impl AccessLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccessLevel::Public => "Public",
            AccessLevel::Restricted => "Restricted",
            AccessLevel::DepartmentSpecific => "Department-Specific",
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("{field} must be one of {allowed}")]
pub struct UnknownVariant {
    field: &'static str,
    allowed: &'static str,
}

impl FromStr for SystemStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Active" => Ok(SystemStatus::Active),
            "Inactive" => Ok(SystemStatus::Inactive),
            _ => Err(UnknownVariant {
                field: "status",
                allowed: r#""Active", "Inactive""#,
            }),
        }
    }
}

impl FromStr for AccessLevel {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Public" => Ok(AccessLevel::Public),
            "Restricted" => Ok(AccessLevel::Restricted),
            "Department-Specific" => Ok(AccessLevel::DepartmentSpecific),
            _ => Err(UnknownVariant {
                field: "accessLevel",
                allowed: r#""Public", "Restricted", "Department-Specific""#,
            }),
        }
    }
}

impl fmt::Display for SystemStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for AccessLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A catalog entry describing one managed internal system.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct System {
    pub id: i64,
    pub name: String,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub responsible: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tech_stack: Option<String>,
    #[serde(
        with = "time::serde::rfc3339::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub expiration_date: Option<OffsetDateTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dependencies: Option<String>,
    pub status: SystemStatus,
    pub access_level: AccessLevel,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl System {
    /// Overwrites every field present in `changes`; absent fields keep their value.
    pub fn apply(&mut self, changes: SystemChanges) {
        let SystemChanges {
            name,
            url,
            icon,
            category,
            tags,
            responsible,
            description,
            tech_stack,
            expiration_date,
            dependencies,
            status,
            access_level,
        } = changes;

        if let Some(v) = name {
            self.name = v;
        }
        if let Some(v) = url {
            self.url = v;
        }
        if icon.is_some() {
            self.icon = icon;
        }
        if category.is_some() {
            self.category = category;
        }
        if tags.is_some() {
            self.tags = tags;
        }
        if responsible.is_some() {
            self.responsible = responsible;
        }
        if description.is_some() {
            self.description = description;
        }
        if tech_stack.is_some() {
            self.tech_stack = tech_stack;
        }
        if expiration_date.is_some() {
            self.expiration_date = expiration_date;
        }
        if dependencies.is_some() {
            self.dependencies = dependencies;
        }
        if let Some(v) = status {
            self.status = v;
        }
        if let Some(v) = access_level {
            self.access_level = v;
        }
    }
}

/// Checked input for a new catalog entry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewSystem {
    pub name: String,
    pub url: String,
    pub icon: Option<String>,
    pub category: Option<String>,
    pub tags: Option<Vec<String>>,
    pub responsible: Option<String>,
    pub description: Option<String>,
    pub tech_stack: Option<String>,
    pub expiration_date: Option<OffsetDateTime>,
    pub dependencies: Option<String>,
    pub status: SystemStatus,
    pub access_level: AccessLevel,
}

/// Checked partial update; `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SystemChanges {
    pub name: Option<String>,
    pub url: Option<String>,
    pub icon: Option<String>,
    pub category: Option<String>,
    pub tags: Option<Vec<String>>,
    pub responsible: Option<String>,
    pub description: Option<String>,
    pub tech_stack: Option<String>,
    pub expiration_date: Option<OffsetDateTime>,
    pub dependencies: Option<String>,
    pub status: Option<SystemStatus>,
    pub access_level: Option<AccessLevel>,
}

/// Exact-match lookups supported by the store.
#[derive(Debug, Clone, PartialEq)]
pub enum SystemFilter {
    Category(String),
    Status(SystemStatus),
    AccessLevel(AccessLevel),
}

impl SystemFilter {
    pub fn matches(&self, system: &System) -> bool {
        match self {
            SystemFilter::Category(c) => system.category.as_deref() == Some(c.as_str()),
            SystemFilter::Status(s) => system.status == *s,
            SystemFilter::AccessLevel(a) => system.access_level == *a,
        }
    }
}

/// Row shape of the `systems` table; enums are stored as text.
#[derive(Debug, FromRow)]
pub struct SystemRow {
    pub id: i64,
    pub name: String,
    pub url: String,
    pub icon: Option<String>,
    pub category: Option<String>,
    pub tags: Option<Vec<String>>,
    pub responsible: Option<String>,
    pub description: Option<String>,
    pub tech_stack: Option<String>,
    pub expiration_date: Option<OffsetDateTime>,
    pub dependencies: Option<String>,
    pub status: String,
    pub access_level: String,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl TryFrom<SystemRow> for System {
    type Error = anyhow::Error;

    fn try_from(r: SystemRow) -> Result<Self, Self::Error> {
        Ok(Self {
            status: r.status.parse()?,
            access_level: r.access_level.parse()?,
            id: r.id,
            name: r.name,
            url: r.url,
            icon: r.icon,
            category: r.category,
            tags: r.tags,
            responsible: r.responsible,
            description: r.description,
            tech_stack: r.tech_stack,
            expiration_date: r.expiration_date,
            dependencies: r.dependencies,
            created_at: r.created_at,
            updated_at: r.updated_at,
        })
    }
}
