//! New registration requests
//!
//! Intake rows come from a table whose column names vary between
//! installations. A single alias table maps them to canonical fields; the
//! mapping is resolved once per result set from its column names.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::registration::RegistrationForm;

/// Value shown when no registration date column exists.
pub const UNKNOWN_DATE: &str = "N/A";

/// New request as shown on the intake dashboard
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRequest {
    pub id: String,
    pub name: String,
    pub mobile: String,
    pub email: String,
    pub registered_at: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Id,
    Name,
    Mobile,
    Email,
    RegisteredAt,
}

/// Accepted source column names per field, most preferred first.
const COLUMN_ALIASES: [(Field, &[&str]); 5] = [
    (Field::Id, &["id"]),
    (Field::Name, &["name", "full_name", "first_name"]),
    (Field::Mobile, &["mobile", "phone", "phone_number"]),
    (Field::Email, &["email", "email_address"]),
    (
        Field::RegisteredAt,
        &[
            "registered",
            "registeredAt",
            "registered_at",
            "created_at",
            "date_created",
            "registration_date",
            "created_date",
            "date",
            "timestamp",
        ],
    ),
];

/// Source column chosen for each canonical field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnMap {
    id: Option<String>,
    name: Option<String>,
    mobile: Option<String>,
    email: Option<String>,
    registered_at: Option<String>,
}

impl ColumnMap {
    pub fn resolve<'a>(columns: impl IntoIterator<Item = &'a str> + Clone) -> Self {
        let mut map = Self::default();

        for (field, aliases) in COLUMN_ALIASES {
            let found = aliases
                .iter()
                .find(|alias| columns.clone().into_iter().any(|column| column == **alias))
                .map(|alias| alias.to_string());

            match field {
                Field::Id => map.id = found,
                Field::Name => map.name = found,
                Field::Mobile => map.mobile = found,
                Field::Email => map.email = found,
                Field::RegisteredAt => map.registered_at = found,
            }
        }

        map
    }

    pub fn map_row(&self, row: &Map<String, Value>) -> NewRequest {
        let read = |column: &Option<String>| -> Option<String> {
            column
                .as_deref()
                .and_then(|column| row.get(column))
                .and_then(text)
        };

        NewRequest {
            id: read(&self.id).unwrap_or_default(),
            name: read(&self.name).unwrap_or_default(),
            mobile: read(&self.mobile).unwrap_or_default(),
            email: read(&self.email).unwrap_or_default(),
            registered_at: read(&self.registered_at)
                .filter(|value| !value.is_empty())
                .unwrap_or_else(|| UNKNOWN_DATE.to_string()),
        }
    }
}

fn text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Map raw JSON rows. Non-object rows are skipped.
pub fn map_rows(rows: &[Value]) -> Vec<NewRequest> {
    let Some(first) = rows.iter().find_map(Value::as_object) else {
        return Vec::new();
    };
    let columns = ColumnMap::resolve(first.keys().map(String::as_str));

    rows.iter()
        .filter_map(Value::as_object)
        .map(|row| columns.map_row(row))
        .collect()
}

/// Map one raw row, resolving columns from its own keys.
pub fn map_single(row: &Value) -> Option<NewRequest> {
    map_rows(std::slice::from_ref(row)).into_iter().next()
}

/// A registration form pre-filled with the request's contact details.
impl From<NewRequest> for RegistrationForm {
    fn from(request: NewRequest) -> Self {
        Self {
            name: request.name,
            mobile: request.mobile,
            email: request.email,
            ..Default::default()
        }
    }
}

/// Case-insensitive name match or raw mobile match.
pub fn filter_requests<'a>(requests: &'a [NewRequest], search: &str) -> Vec<&'a NewRequest> {
    let needle = search.to_lowercase();

    requests
        .iter()
        .filter(|request| {
            request.name.to_lowercase().contains(&needle) || request.mobile.contains(search)
        })
        .collect()
}

/// Request DTO for deleting intake rows
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteRequestsRequest {
    #[serde(default)]
    pub client_ids: Option<Vec<Value>>,
}

impl DeleteRequestsRequest {
    /// Selected ids as strings, or `None` when nothing was selected.
    pub fn ids(&self) -> Option<Vec<String>> {
        let ids: Vec<String> = self.client_ids.as_deref()?.iter().filter_map(text).collect();
        (!ids.is_empty()).then_some(ids)
    }
}
