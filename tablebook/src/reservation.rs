//! Reservations and the people who act on them.
//!
//! A reservation holds one table for one `(date, time)` slot. It is never
//! deleted; cancellation and no-shows are status changes governed by the
//! [`lifecycle`] rules.

pub mod lifecycle;

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::schedule::SlotTime;
use crate::table::TableId;

pub use lifecycle::{loyalty_points, LifecycleRules};

/// Store-assigned reservation identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReservationId(pub i64);

impl ReservationId {
    /// The human-readable code for this reservation, e.g. `RES-0042`.
    ///
    /// # Examples
    ///
    /// ```
    /// use tablebook::ReservationId;
    ///
    /// assert_eq!(ReservationId(42).code(), "RES-0042");
    /// assert_eq!(ReservationId(12345).code(), "RES-12345");
    /// ```
    #[must_use]
    pub fn code(self) -> String {
        format!("RES-{:04}", self.0)
    }
}

impl fmt::Display for ReservationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Status of a reservation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReservationStatus {
    /// Awaiting staff confirmation.
    Pending,
    /// Confirmed; the only state that can be modified.
    Confirmed,
    /// The party was served.
    Completed,
    /// Cancelled before service.
    Cancelled,
    /// The party never arrived.
    NoShow,
}

impl ReservationStatus {
    /// All statuses.
    pub const ALL: [Self; 5] = [
        Self::Pending,
        Self::Confirmed,
        Self::Completed,
        Self::Cancelled,
        Self::NoShow,
    ];

    /// The stored and displayed name, e.g. `NO_SHOW`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Confirmed => "CONFIRMED",
            Self::Completed => "COMPLETED",
            Self::Cancelled => "CANCELLED",
            Self::NoShow => "NO_SHOW",
        }
    }

    /// Returns `true` if no further transition is possible.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled | Self::NoShow)
    }

    /// Returns `true` if a reservation in this state still holds its table
    /// slot and counts toward guest totals.
    #[must_use]
    pub const fn holds_slot(self) -> bool {
        !matches!(self, Self::Cancelled | Self::NoShow)
    }

    /// Returns `true` for reservations that are still upcoming.
    #[must_use]
    pub const fn is_active(self) -> bool {
        matches!(self, Self::Pending | Self::Confirmed)
    }
}

impl fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReservationStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(&normalized))
            .ok_or_else(|| {
                Error::validation("status", format!("unknown reservation status '{s}'"))
            })
    }
}

/// Who is acting on a reservation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Actor {
    /// The guest who made the booking.
    Customer,
    /// Restaurant staff.
    Staff,
    /// Administrator.
    Admin,
}

impl Actor {
    /// Returns `true` for staff and admin.
    #[must_use]
    pub const fn is_staff(self) -> bool {
        matches!(self, Self::Staff | Self::Admin)
    }
}

impl fmt::Display for Actor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Customer => write!(f, "customer"),
            Self::Staff => write!(f, "staff"),
            Self::Admin => write!(f, "admin"),
        }
    }
}

impl FromStr for Actor {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "customer" => Ok(Self::Customer),
            "staff" => Ok(Self::Staff),
            "admin" => Ok(Self::Admin),
            _ => Err(Error::validation("actor", format!("unknown actor '{s}'"))),
        }
    }
}

/// A status-changing action on a reservation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TransitionAction {
    /// PENDING to CONFIRMED.
    Confirm,
    /// PENDING or CONFIRMED to CANCELLED.
    Cancel,
    /// CONFIRMED to COMPLETED.
    Complete,
    /// CONFIRMED to `NO_SHOW`.
    NoShow,
}

impl TransitionAction {
    /// The status this action leads to.
    #[must_use]
    pub const fn target(self) -> ReservationStatus {
        match self {
            Self::Confirm => ReservationStatus::Confirmed,
            Self::Cancel => ReservationStatus::Cancelled,
            Self::Complete => ReservationStatus::Completed,
            Self::NoShow => ReservationStatus::NoShow,
        }
    }
}

impl fmt::Display for TransitionAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Confirm => write!(f, "confirm"),
            Self::Cancel => write!(f, "cancel"),
            Self::Complete => write!(f, "complete"),
            Self::NoShow => write!(f, "no-show"),
        }
    }
}

impl FromStr for TransitionAction {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "confirm" => Ok(Self::Confirm),
            "cancel" => Ok(Self::Cancel),
            "complete" => Ok(Self::Complete),
            "no-show" | "noshow" => Ok(Self::NoShow),
            _ => Err(Error::validation("action", format!("unknown action '{s}'"))),
        }
    }
}

/// Contact details of the guest who booked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    /// Full name.
    pub name: String,
    /// Email address.
    pub email: String,
    /// Phone number.
    pub phone: Option<String>,
}

impl Customer {
    /// Creates customer details, trimming whitespace.
    ///
    /// # Errors
    ///
    /// Returns a validation error if the name is blank or the email has no
    /// `@`.
    pub fn new(name: &str, email: &str, phone: Option<&str>) -> Result<Self> {
        let name = name.trim();
        let email = email.trim();
        if name.is_empty() {
            return Err(Error::validation("name", "customer name must not be empty"));
        }
        if !email.contains('@') {
            return Err(Error::validation("email", format!("'{email}' is not an email address")));
        }
        Ok(Self {
            name: name.to_string(),
            email: email.to_string(),
            phone: phone.map(str::trim).filter(|p| !p.is_empty()).map(String::from),
        })
    }
}

/// One guest's pre-ordered selection. Stored as given.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PreOrderItem {
    /// Drink choice.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub drink: Option<String>,
    /// Food choice.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub food: Option<String>,
}

/// A stored reservation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reservation {
    /// Store-assigned identifier.
    pub id: ReservationId,
    /// Human-readable code.
    pub code: String,
    /// Who booked.
    pub customer: Customer,
    /// Reservation date.
    pub date: NaiveDate,
    /// Reservation time.
    pub time: SlotTime,
    /// Party size.
    pub guests: u32,
    /// Assigned table.
    pub table_id: TableId,
    /// Current status.
    pub status: ReservationStatus,
    /// Free-form requests.
    pub special_requests: Option<String>,
    /// Dietary notes.
    pub dietary_notes: Option<String>,
    /// Per-guest pre-order selections.
    pub pre_order: Vec<PreOrderItem>,
    /// Loyalty points earned on completion.
    pub loyalty_points: Option<u32>,
    /// Why the reservation was cancelled.
    pub cancellation_reason: Option<String>,
    /// When the reservation was cancelled.
    pub cancelled_at: Option<NaiveDateTime>,
    /// When the reservation was created.
    pub created_at: NaiveDateTime,
    /// When the reservation last changed.
    pub updated_at: NaiveDateTime,
}

impl Reservation {
    /// The moment the reservation starts.
    #[must_use]
    pub fn starts_at(&self) -> NaiveDateTime {
        self.date.and_time(self.time.to_naive_time())
    }
}

/// A booking request that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewReservation {
    /// Who is booking.
    pub customer: Customer,
    /// Requested date.
    pub date: NaiveDate,
    /// Requested time.
    pub time: SlotTime,
    /// Party size.
    pub guests: u32,
    /// Requested table.
    pub table_id: TableId,
    /// Free-form requests.
    pub special_requests: Option<String>,
    /// Dietary notes.
    pub dietary_notes: Option<String>,
    /// Per-guest pre-order selections.
    pub pre_order: Vec<PreOrderItem>,
}

impl NewReservation {
    /// Starts building a booking request.
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::NaiveDate;
    /// use tablebook::{Customer, NewReservation, TableId};
    ///
    /// let customer = Customer::new("Ada Lovelace", "ada@example.com", None).unwrap();
    /// let date = NaiveDate::from_ymd_opt(2025, 6, 10).unwrap();
    /// let request = NewReservation::builder(customer, date, "18:00".parse().unwrap(), TableId(5), 4)
    ///     .special_requests(Some("Window seat".into()))
    ///     .build()
    ///     .unwrap();
    /// assert_eq!(request.guests, 4);
    /// ```
    #[must_use]
    pub fn builder(
        customer: Customer,
        date: NaiveDate,
        time: SlotTime,
        table_id: TableId,
        guests: u32,
    ) -> NewReservationBuilder {
        NewReservationBuilder {
            request: Self {
                customer,
                date,
                time,
                guests,
                table_id,
                special_requests: None,
                dietary_notes: None,
                pre_order: Vec::new(),
            },
        }
    }
}

/// Builder for [`NewReservation`].
#[derive(Debug)]
pub struct NewReservationBuilder {
    request: NewReservation,
}

/// Trims a free-form note, dropping it when blank.
pub(crate) fn normalize_note(note: Option<String>) -> Option<String> {
    note.map(|n| n.trim().to_string()).filter(|n| !n.is_empty())
}

impl NewReservationBuilder {
    /// Sets special requests. Blank text is dropped.
    #[must_use]
    pub fn special_requests(mut self, text: Option<String>) -> Self {
        self.request.special_requests = normalize_note(text);
        self
    }

    /// Sets dietary notes. Blank text is dropped.
    #[must_use]
    pub fn dietary_notes(mut self, text: Option<String>) -> Self {
        self.request.dietary_notes = normalize_note(text);
        self
    }

    /// Sets the per-guest pre-order.
    #[must_use]
    pub fn pre_order(mut self, items: Vec<PreOrderItem>) -> Self {
        self.request.pre_order = items;
        self
    }

    /// Validates and builds the request.
    ///
    /// # Errors
    ///
    /// Returns a validation error if the party is empty or the pre-order
    /// lists more guests than the party has.
    pub fn build(self) -> Result<NewReservation> {
        let request = self.request;
        if request.guests == 0 {
            return Err(Error::validation("guests", "party size must be at least 1"));
        }
        if request.pre_order.len() > request.guests as usize {
            return Err(Error::validation(
                "pre_order",
                format!(
                    "{} pre-order selections for a party of {}",
                    request.pre_order.len(),
                    request.guests
                ),
            ));
        }
        Ok(request)
    }
}
