//! Orders domain types
//!
//! Orders are created when a contract is generated and then tracked by
//! status and client activity. The list view is always recomputed from the
//! stored collection.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::confirmation::Confirmation;
use super::offers::OfferPrices;

/// Format of `lastActivityUpdate` stamps.
pub const ACTIVITY_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Order status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderStatus {
    #[default]
    #[serde(rename = "In-review")]
    InReview,
    Approved,
    Canceled,
}

impl OrderStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::InReview => "In-review",
            Self::Approved => "Approved",
            Self::Canceled => "Canceled",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "In-review" => Ok(Self::InReview),
            "Approved" => Ok(Self::Approved),
            "Canceled" => Ok(Self::Canceled),
            other => Err(format!("Unknown order status: {other}")),
        }
    }
}

/// Traffic-light engagement indicator, set by hand and unrelated to status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClientActivity {
    #[default]
    #[serde(rename = "none")]
    NoResponse,
    Red,
    Yellow,
    Green,
}

impl ClientActivity {
    pub fn label(self) -> &'static str {
        match self {
            Self::NoResponse => "No Response",
            Self::Red => "Low Response",
            Self::Yellow => "Moderately Active",
            Self::Green => "Responsive & Active",
        }
    }
}

/// Order entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRecord {
    pub id: String,
    pub order_id: String,
    pub user_name: String,
    pub mobile: String,
    pub email: String,
    pub inserted_date: NaiveDate,
    pub status: OrderStatus,
    pub prices: OfferPrices,
    pub client_activity: ClientActivity,
    pub last_activity_update: String,
}

/// Human-readable order number: `ORD-YYYYMMDD-NNN`.
pub fn order_number(date: NaiveDate, suffix: u16) -> String {
    format!("ORD-{}-{:03}", date.format("%Y%m%d"), suffix)
}

pub fn activity_timestamp(now: NaiveDateTime) -> String {
    now.format(ACTIVITY_TIMESTAMP_FORMAT).to_string()
}

/// Which statuses the list shows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub enum StatusFilter {
    #[default]
    All,
    Only(OrderStatus),
}

impl StatusFilter {
    fn admits(self, status: OrderStatus) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => wanted == status,
        }
    }
}

impl TryFrom<String> for StatusFilter {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if value == "all" {
            Ok(Self::All)
        } else {
            value.parse().map(Self::Only)
        }
    }
}

/// Date order of the list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DateOrder {
    #[default]
    Newest,
    Oldest,
}

/// List view parameters
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OrderQuery {
    #[serde(default, rename = "q")]
    pub search: String,
    #[serde(default)]
    pub status: StatusFilter,
    #[serde(default)]
    pub date: DateOrder,
}

impl OrderQuery {
    fn matches(&self, order: &OrderRecord, needle: &str) -> bool {
        if !self.status.admits(order.status) {
            return false;
        }

        self.search.is_empty()
            || order.user_name.to_lowercase().contains(needle)
            || order.mobile.contains(self.search.as_str())
            || order.order_id.to_lowercase().contains(needle)
    }
}

/// Filter and order the list view.
///
/// With a search term, names starting with it come first regardless of
/// date; within that, records sort by inserted date. Ties keep their
/// stored order.
pub fn filter_orders<'a>(orders: &'a [OrderRecord], query: &OrderQuery) -> Vec<&'a OrderRecord> {
    let needle = query.search.to_lowercase();

    let mut ranked: Vec<(bool, &OrderRecord)> = orders
        .iter()
        .filter(|order| query.matches(order, &needle))
        .map(|order| {
            let prefixed =
                !needle.is_empty() && order.user_name.to_lowercase().starts_with(&needle);
            (prefixed, order)
        })
        .collect();

    ranked.sort_by(|(a_prefixed, a), (b_prefixed, b)| {
        b_prefixed.cmp(a_prefixed).then_with(|| match query.date {
            DateOrder::Newest => b.inserted_date.cmp(&a.inserted_date),
            DateOrder::Oldest => a.inserted_date.cmp(&b.inserted_date),
        })
    });

    ranked.into_iter().map(|(_, order)| order).collect()
}

/// Result of a status change, and whether the collection must be saved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusChange {
    Updated,
    Removed,
    AwaitingConfirmation,
    Declined,
    NotFound,
}

impl StatusChange {
    pub fn requires_save(self) -> bool {
        matches!(self, Self::Updated | Self::Removed)
    }
}

/// Apply a status change to the collection.
///
/// Cancelling deletes the order, and only once the user has confirmed.
/// Other statuses are plain in-place updates.
pub fn change_status(
    orders: &mut Vec<OrderRecord>,
    id: &str,
    status: OrderStatus,
    confirmation: Confirmation,
) -> StatusChange {
    let Some(position) = orders.iter().position(|order| order.id == id) else {
        return StatusChange::NotFound;
    };

    if status != OrderStatus::Canceled {
        orders[position].status = status;
        return StatusChange::Updated;
    }

    match confirmation {
        Confirmation::Confirmed => {
            orders.remove(position);
            StatusChange::Removed
        }
        Confirmation::Cancelled => StatusChange::Declined,
        Confirmation::Idle | Confirmation::AwaitingConfirmation => {
            StatusChange::AwaitingConfirmation
        }
    }
}

/// Set the client activity and stamp the time, even when the value is
/// unchanged. Returns `false` when no order has the id.
pub fn set_activity(
    orders: &mut [OrderRecord],
    id: &str,
    activity: ClientActivity,
    now: NaiveDateTime,
) -> bool {
    match orders.iter_mut().find(|order| order.id == id) {
        Some(order) => {
            order.client_activity = activity;
            order.last_activity_update = activity_timestamp(now);
            true
        }
        None => false,
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn order(id: &str, user_name: &str, inserted: &str, status: OrderStatus) -> OrderRecord {
        OrderRecord {
            id: id.to_string(),
            order_id: format!("ORD-20250101-{id:0>3}"),
            user_name: user_name.to_string(),
            mobile: format!("+96650000{id:0>4}"),
            email: format!("{}@example.com", user_name.to_lowercase()),
            inserted_date: inserted.parse().unwrap(),
            status,
            prices: OfferPrices::default(),
            client_activity: ClientActivity::NoResponse,
            last_activity_update: "2025-01-01 09:00".to_string(),
        }
    }

    fn query(search: &str, status: StatusFilter, date: DateOrder) -> OrderQuery {
        OrderQuery {
            search: search.to_string(),
            status,
            date,
        }
    }

    fn names(view: &[&OrderRecord]) -> Vec<String> {
        view.iter().map(|o| o.user_name.clone()).collect()
    }

    fn at(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()
    }

    #[test]
    fn newest_first_by_default() {
        let orders = vec![
            order("1", "Ahmed", "2025-01-10", OrderStatus::Approved),
            order("2", "Sara", "2025-01-15", OrderStatus::InReview),
        ];

        let view = filter_orders(&orders, &OrderQuery::default());
        assert_eq!(names(&view), ["Sara", "Ahmed"]);

        let view = filter_orders(&orders, &query("", StatusFilter::All, DateOrder::Oldest));
        assert_eq!(names(&view), ["Ahmed", "Sara"]);
    }

    #[test]
    fn filters_by_status() {
        let orders = vec![
            order("1", "Ahmed", "2025-01-10", OrderStatus::Approved),
            order("2", "Sara", "2025-01-15", OrderStatus::InReview),
        ];

        let view = filter_orders(
            &orders,
            &query("", StatusFilter::Only(OrderStatus::Approved), DateOrder::Newest),
        );
        assert_eq!(names(&view), ["Ahmed"]);
    }

    #[test]
    fn name_prefix_outranks_date() {
        let orders = vec![
            order("1", "Bahmed", "2025-02-01", OrderStatus::InReview),
            order("2", "Ahmed", "2025-01-01", OrderStatus::InReview),
        ];

        let view = filter_orders(&orders, &query("ahmed", StatusFilter::All, DateOrder::Newest));
        assert_eq!(names(&view), ["Ahmed", "Bahmed"]);
    }

    #[test]
    fn searches_mobile_raw_and_order_id_case_insensitively() {
        let mut orders = vec![
            order("1", "Ahmed", "2025-01-10", OrderStatus::InReview),
            order("2", "Sara", "2025-01-15", OrderStatus::InReview),
        ];
        orders[1].mobile = "+966502345678".to_string();
        orders[1].order_id = "ORD-20250115-417".to_string();

        let by_mobile = filter_orders(&orders, &query("0234", StatusFilter::All, DateOrder::Newest));
        assert_eq!(names(&by_mobile), ["Sara"]);

        let by_order = filter_orders(&orders, &query("ord-20250115", StatusFilter::All, DateOrder::Newest));
        assert_eq!(names(&by_order), ["Sara"]);

        let none = filter_orders(&orders, &query("zzz", StatusFilter::All, DateOrder::Newest));
        assert!(none.is_empty());
    }

    #[test]
    fn ties_keep_stored_order() {
        let orders = vec![
            order("1", "Omar", "2025-01-10", OrderStatus::InReview),
            order("2", "Fatima", "2025-01-10", OrderStatus::InReview),
            order("3", "Mona", "2025-01-10", OrderStatus::InReview),
        ];

        let view = filter_orders(&orders, &OrderQuery::default());
        assert_eq!(names(&view), ["Omar", "Fatima", "Mona"]);
    }

    #[test]
    fn status_filter_parses_from_query_values() {
        assert_eq!(StatusFilter::try_from("all".to_string()), Ok(StatusFilter::All));
        assert_eq!(
            StatusFilter::try_from("In-review".to_string()),
            Ok(StatusFilter::Only(OrderStatus::InReview))
        );
        assert!(StatusFilter::try_from("pending".to_string()).is_err());
    }

    #[test]
    fn cancel_with_confirmation_removes_the_order() {
        let mut orders = vec![
            order("X", "Ahmed", "2025-01-10", OrderStatus::InReview),
            order("Y", "Sara", "2025-01-15", OrderStatus::InReview),
        ];

        let change = change_status(&mut orders, "X", OrderStatus::Canceled, Confirmation::Confirmed);

        assert_eq!(change, StatusChange::Removed);
        assert!(change.requires_save());
        assert_eq!(orders.len(), 1);
        assert!(orders.iter().all(|o| o.id != "X"));
    }

    #[test]
    fn declined_or_pending_cancel_leaves_orders_alone() {
        let original = vec![order("X", "Ahmed", "2025-01-10", OrderStatus::InReview)];

        let mut orders = original.clone();
        let change = change_status(&mut orders, "X", OrderStatus::Canceled, Confirmation::Cancelled);
        assert_eq!(change, StatusChange::Declined);
        assert!(!change.requires_save());
        assert_eq!(orders, original);

        let change = change_status(
            &mut orders,
            "X",
            OrderStatus::Canceled,
            Confirmation::AwaitingConfirmation,
        );
        assert_eq!(change, StatusChange::AwaitingConfirmation);
        assert_eq!(orders, original);
    }

    #[test]
    fn approve_updates_in_place() {
        let mut orders = vec![order("X", "Ahmed", "2025-01-10", OrderStatus::InReview)];

        let change = change_status(&mut orders, "X", OrderStatus::Approved, Confirmation::Idle);

        assert_eq!(change, StatusChange::Updated);
        assert_eq!(orders[0].status, OrderStatus::Approved);
    }

    #[test]
    fn unknown_order_is_reported() {
        let mut orders = vec![order("X", "Ahmed", "2025-01-10", OrderStatus::InReview)];
        assert_eq!(
            change_status(&mut orders, "nope", OrderStatus::Canceled, Confirmation::Confirmed),
            StatusChange::NotFound
        );
        assert_eq!(orders.len(), 1);
    }

    #[test]
    fn every_activity_change_restamps() {
        let mut orders = vec![order("X", "Ahmed", "2025-01-10", OrderStatus::InReview)];

        assert!(set_activity(&mut orders, "X", ClientActivity::Green, at("2025-03-04 08:05:59")));
        assert_eq!(orders[0].client_activity, ClientActivity::Green);
        assert_eq!(orders[0].last_activity_update, "2025-03-04 08:05");

        assert!(set_activity(&mut orders, "X", ClientActivity::Green, at("2025-03-04 17:42:00")));
        assert_eq!(orders[0].last_activity_update, "2025-03-04 17:42");

        assert!(!set_activity(&mut orders, "nope", ClientActivity::Red, at("2025-03-04 17:42:00")));
    }

    #[test]
    fn order_number_pads_the_suffix() {
        let date = NaiveDate::from_ymd_opt(2025, 7, 3).unwrap();
        assert_eq!(order_number(date, 417), "ORD-20250703-417");
        assert_eq!(order_number(date, 100), "ORD-20250703-100");
    }

    #[test]
    fn records_use_the_stored_json_shape() {
        let json = serde_json::to_value(order("1", "Ahmed", "2025-01-10", OrderStatus::InReview)).unwrap();

        assert_eq!(json["userName"], "Ahmed");
        assert_eq!(json["insertedDate"], "2025-01-10");
        assert_eq!(json["status"], "In-review");
        assert_eq!(json["clientActivity"], "none");
        assert!(json["prices"].get("premium").is_some());
    }
}
