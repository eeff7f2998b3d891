use serde::Deserialize;
use time::{
    format_description::well_known::Rfc3339, macros::format_description, Date, OffsetDateTime,
};

use super::repo_types::{NewSystem, SystemChanges, SystemStatus};
use crate::{
    error::AppError,
    validation::{Validate, Violations},
};

pub const NAME_MAX: usize = 45;
pub const URL_MAX: usize = 180;
pub const ICON_MAX: usize = 50;
pub const CATEGORY_MAX: usize = 60;
pub const RESPONSIBLE_MAX: usize = 60;
pub const DESCRIPTION_MAX: usize = 120;
pub const TECH_STACK_MAX: usize = 90;
pub const DEPENDENCIES_MAX: usize = 180;

/// Fields shared by create and update bodies, all optional.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OptionalSystemFields {
    pub icon: Option<String>,
    pub category: Option<String>,
    pub tags: Option<Vec<String>>,
    pub responsible: Option<String>,
    pub description: Option<String>,
    pub tech_stack: Option<String>,
    /// RFC 3339 timestamp or a bare `YYYY-MM-DD` date (midnight UTC).
    pub expiration_date: Option<String>,
    pub dependencies: Option<String>,
    pub status: Option<String>,
    pub access_level: Option<String>,
}

impl OptionalSystemFields {
    /// Checks the supplied fields and returns them as changes without name/url.
    fn check(self, v: &mut Violations) -> SystemChanges {
        v.max_len_opt("icon", self.icon.as_deref(), ICON_MAX);
        v.max_len_opt("category", self.category.as_deref(), CATEGORY_MAX);
        v.max_len_opt("responsible", self.responsible.as_deref(), RESPONSIBLE_MAX);
        v.max_len_opt("description", self.description.as_deref(), DESCRIPTION_MAX);
        v.max_len_opt("techStack", self.tech_stack.as_deref(), TECH_STACK_MAX);
        v.max_len_opt("dependencies", self.dependencies.as_deref(), DEPENDENCIES_MAX);

        let expiration_date = self.expiration_date.as_deref().and_then(|raw| {
            let parsed = parse_date_time(raw);
            if parsed.is_none() {
                v.push("expirationDate", "expirationDate must be an ISO 8601 date or timestamp");
            }
            parsed
        });
        let status = v.one_of("status", self.status.as_deref());
        let access_level = v.one_of("accessLevel", self.access_level.as_deref());

        SystemChanges {
            name: None,
            url: None,
            icon: self.icon,
            category: self.category,
            tags: self.tags,
            responsible: self.responsible,
            description: self.description,
            tech_stack: self.tech_stack,
            expiration_date,
            dependencies: self.dependencies,
            status,
            access_level,
        }
    }
}

fn parse_date_time(raw: &str) -> Option<OffsetDateTime> {
    if let Ok(ts) = OffsetDateTime::parse(raw, &Rfc3339) {
        return Some(ts);
    }
    Date::parse(raw, format_description!("[year]-[month]-[day]"))
        .ok()
        .map(|d| d.midnight().assume_utc())
}

fn check_name(v: &mut Violations, name: &str) {
    if v.required("name", name) {
        v.max_len("name", name, NAME_MAX);
    }
}

fn check_url(v: &mut Violations, url: &str) {
    if v.required("url", url) {
        v.max_len("url", url, URL_MAX);
        v.url("url", url);
    }
}

/// Body of `POST /systems`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CreateSystemRequest {
    pub name: String,
    pub url: String,
    #[serde(flatten)]
    pub fields: OptionalSystemFields,
}

impl Validate for CreateSystemRequest {
    type Output = NewSystem;

    fn validate(self) -> Result<NewSystem, AppError> {
        let mut v = Violations::new();
        check_name(&mut v, &self.name);
        check_url(&mut v, &self.url);
        let c = self.fields.check(&mut v);

        v.finish(NewSystem {
            name: self.name,
            url: self.url,
            icon: c.icon,
            category: c.category,
            tags: c.tags,
            responsible: c.responsible,
            description: c.description,
            tech_stack: c.tech_stack,
            expiration_date: c.expiration_date,
            dependencies: c.dependencies,
            status: c.status.unwrap_or_default(),
            access_level: c.access_level.unwrap_or_default(),
        })
    }
}

/// Body of `PATCH /systems/:id`; absent or null fields are left unchanged.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct UpdateSystemRequest {
    pub name: Option<String>,
    pub url: Option<String>,
    #[serde(flatten)]
    pub fields: OptionalSystemFields,
}

impl Validate for UpdateSystemRequest {
    type Output = SystemChanges;

    fn validate(self) -> Result<SystemChanges, AppError> {
        let mut v = Violations::new();
        if let Some(name) = &self.name {
            check_name(&mut v, name);
        }
        if let Some(url) = &self.url {
            check_url(&mut v, url);
        }
        let changes = SystemChanges {
            name: self.name,
            url: self.url,
            ..self.fields.check(&mut v)
        };
        v.finish(changes)
    }
}

/// Body of `PATCH /systems/:id/status`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct UpdateStatusRequest {
    pub status: String,
}

impl Validate for UpdateStatusRequest {
    type Output = SystemStatus;

    fn validate(self) -> Result<SystemStatus, AppError> {
        let mut v = Violations::new();
        let status = if v.required("status", &self.status) {
            v.one_of("status", Some(&self.status))
        } else {
            None
        };
        v.finish(status.unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::systems::repo_types::AccessLevel;
    use crate::validation::FieldViolation;

    fn fields_of(err: AppError) -> Vec<&'static str> {
        match err {
            AppError::Validation(v) => v.into_iter().map(|FieldViolation { field, .. }| field).collect(),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    fn create(json: &str) -> Result<NewSystem, AppError> {
        serde_json::from_str::<CreateSystemRequest>(json)
            .expect("body should parse")
            .validate()
    }

    fn update(json: &str) -> Result<SystemChanges, AppError> {
        serde_json::from_str::<UpdateSystemRequest>(json)
            .expect("body should parse")
            .validate()
    }

    #[test]
    fn create_applies_defaults() {
        let new = create(r#"{"name":"ERP","url":"https://erp.example.com"}"#).unwrap();
        assert_eq!(new.status, SystemStatus::Active);
        assert_eq!(new.access_level, AccessLevel::Public);
        assert!(new.icon.is_none());
        assert!(new.tags.is_none());
    }

    #[test]
    fn create_reads_every_optional_field() {
        let new = create(
            r#"{
                "name": "HR",
                "url": "https://rh.empresa.com.br",
                "icon": "fa-users",
                "category": "HR",
                "tags": ["payroll", "people"],
                "responsible": "Joana",
                "description": "Human resources management",
                "techStack": "React, Rust, PostgreSQL",
                "expirationDate": "2025-12-31T23:59:59Z",
                "dependencies": "SSO",
                "status": "Inactive",
                "accessLevel": "Department-Specific"
            }"#,
        )
        .unwrap();
        assert_eq!(new.tech_stack.as_deref(), Some("React, Rust, PostgreSQL"));
        assert_eq!(new.tags.as_deref(), Some(&["payroll".to_string(), "people".to_string()][..]));
        assert_eq!(new.expiration_date.unwrap().year(), 2025);
        assert_eq!(new.status, SystemStatus::Inactive);
        assert_eq!(new.access_level, AccessLevel::DepartmentSpecific);
    }

    #[test]
    fn create_requires_name_and_url() {
        let err = create("{}").unwrap_err();
        assert_eq!(fields_of(err), vec!["name", "url"]);
    }

    #[test]
    fn create_rejects_unknown_enum_values() {
        let err = create(
            r#"{"name":"ERP","url":"https://erp.example.com","status":"Archived","accessLevel":"Secret"}"#,
        )
        .unwrap_err();
        assert_eq!(fields_of(err), vec!["status", "accessLevel"]);
    }

    #[test]
    fn create_enforces_length_limits() {
        let body = serde_json::json!({
            "name": "n".repeat(NAME_MAX + 1),
            "url": format!("https://example.com/{}", "p".repeat(URL_MAX)),
            "icon": "i".repeat(ICON_MAX + 1),
            "category": "c".repeat(CATEGORY_MAX + 1),
            "responsible": "r".repeat(RESPONSIBLE_MAX + 1),
            "description": "d".repeat(DESCRIPTION_MAX + 1),
            "techStack": "t".repeat(TECH_STACK_MAX + 1),
            "dependencies": "x".repeat(DEPENDENCIES_MAX + 1),
        });
        let err = create(&body.to_string()).unwrap_err();
        assert_eq!(
            fields_of(err),
            vec![
                "name",
                "url",
                "icon",
                "category",
                "responsible",
                "description",
                "techStack",
                "dependencies"
            ]
        );
    }

    #[test]
    fn create_accepts_values_at_the_limit() {
        let body = serde_json::json!({
            "name": "n".repeat(NAME_MAX),
            "url": "https://erp.example.com",
            "description": "d".repeat(DESCRIPTION_MAX),
        });
        assert!(create(&body.to_string()).is_ok());
    }

    #[test]
    fn create_rejects_malformed_url_and_date() {
        let err = create(
            r#"{"name":"ERP","url":"erp.example.com","expirationDate":"31/12/2025"}"#,
        )
        .unwrap_err();
        assert_eq!(fields_of(err), vec!["url", "expirationDate"]);
    }

    #[test]
    fn expiration_date_accepts_bare_dates_at_midnight_utc() {
        let new = create(
            r#"{"name":"ERP","url":"https://erp.example.com","expirationDate":"2025-12-31"}"#,
        )
        .unwrap();
        let expires = new.expiration_date.unwrap();
        assert_eq!(expires, time::macros::datetime!(2025-12-31 00:00 UTC));

        let err = create(
            r#"{"name":"ERP","url":"https://erp.example.com","expirationDate":"2025-13-01"}"#,
        )
        .unwrap_err();
        assert_eq!(fields_of(err), vec!["expirationDate"]);
    }

    #[test]
    fn update_only_carries_supplied_fields() {
        let changes = update(r#"{"name":"X"}"#).unwrap();
        assert_eq!(
            changes,
            SystemChanges {
                name: Some("X".into()),
                ..Default::default()
            }
        );
    }

    #[test]
    fn update_validates_touched_fields_only() {
        assert!(update("{}").is_ok());
        let err = update(r#"{"name":"","status":"Ativo"}"#).unwrap_err();
        assert_eq!(fields_of(err), vec!["name", "status"]);
    }

    #[test]
    fn status_request_accepts_only_known_values() {
        let ok = UpdateStatusRequest {
            status: "Inactive".into(),
        };
        assert_eq!(ok.validate().unwrap(), SystemStatus::Inactive);

        for bad in ["", "inactive", "Deleted"] {
            let req = UpdateStatusRequest { status: bad.into() };
            assert_eq!(fields_of(req.validate().unwrap_err()), vec!["status"]);
        }
    }
}
