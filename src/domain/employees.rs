//! Notification recipients
//!
//! Staff members who receive Telegram notifications about new orders.

use serde::{Deserialize, Serialize};

use super::confirmation::Confirmation;
use super::validation::MissingFields;

/// `lastNotified` value of a recipient that was never messaged.
pub const NEVER_NOTIFIED: &str = "Never";

/// Notification recipient
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeRecord {
    pub id: String,
    pub name: String,
    pub telegram_handle: String,
    pub role: String,
    pub last_notified: String,
    pub is_active: bool,
}

/// Request DTO for adding a recipient
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NewEmployee {
    pub name: String,
    pub telegram_handle: String,
    pub role: String,
}

impl NewEmployee {
    /// Build an active, never-notified recipient. Name, handle and role
    /// are all required.
    pub fn into_record(self, id: String) -> Result<EmployeeRecord, MissingFields> {
        MissingFields::check([
            ("Name", self.name.as_str()),
            ("Telegram Handle", self.telegram_handle.as_str()),
            ("Role", self.role.as_str()),
        ])?;

        Ok(EmployeeRecord {
            id,
            name: self.name.trim().to_string(),
            telegram_handle: normalize_handle(&self.telegram_handle),
            role: self.role.trim().to_string(),
            last_notified: NEVER_NOTIFIED.to_string(),
            is_active: true,
        })
    }
}

/// Telegram handles are stored with a leading `@`.
pub fn normalize_handle(handle: &str) -> String {
    let handle = handle.trim();
    if handle.starts_with('@') {
        handle.to_string()
    } else {
        format!("@{handle}")
    }
}

/// Case-insensitive search over name, handle and role. Keeps stored order.
pub fn filter_employees<'a>(employees: &'a [EmployeeRecord], search: &str) -> Vec<&'a EmployeeRecord> {
    let needle = search.to_lowercase();

    employees
        .iter()
        .filter(|employee| {
            employee.name.to_lowercase().contains(&needle)
                || employee.telegram_handle.to_lowercase().contains(&needle)
                || employee.role.to_lowercase().contains(&needle)
        })
        .collect()
}

/// Flip the active flag. Returns the new value, or `None` for an unknown id.
pub fn toggle_active(employees: &mut [EmployeeRecord], id: &str) -> Option<bool> {
    let employee = employees.iter_mut().find(|employee| employee.id == id)?;
    employee.is_active = !employee.is_active;
    Some(employee.is_active)
}

/// Result of removing selected recipients.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Removal {
    Removed(usize),
    NothingSelected,
    AwaitingConfirmation,
    Declined,
}

/// Remove every recipient whose id is selected, once confirmed.
pub fn remove_selected(
    employees: &mut Vec<EmployeeRecord>,
    selected: &[String],
    confirmation: Confirmation,
) -> Removal {
    if selected.is_empty() {
        return Removal::NothingSelected;
    }

    match confirmation {
        Confirmation::Confirmed => {
            let before = employees.len();
            employees.retain(|employee| !selected.contains(&employee.id));
            Removal::Removed(before - employees.len())
        }
        Confirmation::Cancelled => Removal::Declined,
        Confirmation::Idle | Confirmation::AwaitingConfirmation => Removal::AwaitingConfirmation,
    }
}
