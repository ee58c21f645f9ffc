//! The five named record collections kept in the document.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A named, ordered sequence of records inside the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Collection {
    ServiceTickets,
    GuestInteractions,
    CrmGuests,
    Alerts,
    DashboardMetrics,
}

impl Collection {
    pub const ALL: [Collection; 5] = [
        Collection::ServiceTickets,
        Collection::GuestInteractions,
        Collection::CrmGuests,
        Collection::Alerts,
        Collection::DashboardMetrics,
    ];

    /// Key used in the persisted document and in URL paths.
    pub fn as_str(&self) -> &'static str {
        match self {
            Collection::ServiceTickets => "service_tickets",
            Collection::GuestInteractions => "guest_interactions",
            Collection::CrmGuests => "crm_guests",
            Collection::Alerts => "alerts",
            Collection::DashboardMetrics => "dashboard_metrics",
        }
    }

    /// Singular entity name used in error messages ("ticket not found").
    pub fn entity(&self) -> &'static str {
        match self {
            Collection::ServiceTickets => "ticket",
            Collection::GuestInteractions => "interaction",
            Collection::CrmGuests => "guest",
            Collection::Alerts => "alert",
            Collection::DashboardMetrics => "metric",
        }
    }

    /// Field stamped with the current time by a generic create: interactions
    /// record when they happened, everything else when it was opened.
    /// Escalation alerts stamp their own `timestamp`.
    pub fn created_field(&self) -> &'static str {
        match self {
            Collection::GuestInteractions => "timestamp",
            _ => "created_at",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown collection name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown collection: {0}")]
pub struct UnknownCollection(pub String);

impl FromStr for Collection {
    type Err = UnknownCollection;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Collection::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| UnknownCollection(s.to_string()))
    }
}
