//! Dining tables and their occupancy states.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::floorplan::{default_position, zone_for, Position, Zone};

/// Store-assigned table identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TableId(pub i64);

impl fmt::Display for TableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Occupancy state of a table.
///
/// Staff may move a table between any two states; the state is advisory and
/// does not by itself block bookings, except that tables under
/// [`TableStatus::Maintenance`] are never offered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TableStatus {
    /// Free to seat guests.
    Available,
    /// Held for an upcoming reservation.
    Reserved,
    /// Guests are seated.
    Occupied,
    /// Out of service.
    Maintenance,
}

impl TableStatus {
    /// All statuses.
    pub const ALL: [Self; 4] = [
        Self::Available,
        Self::Reserved,
        Self::Occupied,
        Self::Maintenance,
    ];

    /// The stored and displayed name, e.g. `AVAILABLE`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Available => "AVAILABLE",
            Self::Reserved => "RESERVED",
            Self::Occupied => "OCCUPIED",
            Self::Maintenance => "MAINTENANCE",
        }
    }

    /// Returns `true` for states that count toward occupancy.
    #[must_use]
    pub const fn is_occupying(self) -> bool {
        matches!(self, Self::Reserved | Self::Occupied)
    }
}

impl fmt::Display for TableStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TableStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::validation("status", format!("unknown table status '{s}'")))
    }
}

/// Table shape. Only used for rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TableShape {
    /// Square top.
    #[default]
    Square,
    /// Round top.
    Round,
    /// Rectangular top.
    Rectangle,
    /// Oval top.
    Oval,
}

impl TableShape {
    const ALL: [Self; 4] = [Self::Square, Self::Round, Self::Rectangle, Self::Oval];

    /// The stored and displayed name, e.g. `ROUND`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Square => "SQUARE",
            Self::Round => "ROUND",
            Self::Rectangle => "RECTANGLE",
            Self::Oval => "OVAL",
        }
    }
}

impl fmt::Display for TableShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TableShape {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|shape| shape.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::validation("shape", format!("unknown table shape '{s}'")))
    }
}

/// A stored dining table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    /// Store-assigned identifier.
    pub id: TableId,
    /// Unique display number.
    pub number: u32,
    /// Maximum party size.
    pub capacity: u32,
    /// Dining zone.
    pub zone: Zone,
    /// Rendering shape.
    pub shape: TableShape,
    /// Occupancy state.
    pub status: TableStatus,
    /// Canvas position, if the table has been placed.
    pub position: Option<Position>,
    /// Free-form description.
    pub description: Option<String>,
    /// When the table was created.
    pub created_at: NaiveDateTime,
}

impl Table {
    /// Returns `true` if a party of `party_size` fits at this table.
    #[must_use]
    pub const fn seats(&self, party_size: u32) -> bool {
        self.capacity >= party_size
    }

    /// The table's position, or its default grid slot when it was never
    /// placed. `index` is the table's rank among unplaced tables in its zone.
    #[must_use]
    pub fn position_or_default(&self, index: usize) -> Position {
        self.position
            .unwrap_or_else(|| default_position(self.zone, index))
    }
}

/// A table that has not been stored yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTable {
    /// Unique display number.
    pub number: u32,
    /// Maximum party size.
    pub capacity: u32,
    /// Dining zone.
    pub zone: Zone,
    /// Rendering shape.
    pub shape: TableShape,
    /// Initial occupancy state.
    pub status: TableStatus,
    /// Initial canvas position.
    pub position: Option<Position>,
    /// Free-form description.
    pub description: Option<String>,
}

impl NewTable {
    /// Starts building a table with the given number and capacity.
    ///
    /// # Examples
    ///
    /// ```
    /// use tablebook::floorplan::{Position, Zone};
    /// use tablebook::NewTable;
    ///
    /// let table = NewTable::builder(5, 4)
    ///     .position(Position::new(100.0, 350.0))
    ///     .build()
    ///     .unwrap();
    /// // The zone follows the position.
    /// assert_eq!(table.zone, Zone::Patio);
    ///
    /// assert!(NewTable::builder(6, 0).build().is_err());
    /// ```
    #[must_use]
    pub fn builder(number: u32, capacity: u32) -> TableBuilder {
        TableBuilder {
            number,
            capacity,
            zone: Zone::Center,
            shape: TableShape::default(),
            status: TableStatus::Available,
            position: None,
            description: None,
        }
    }
}

/// Builder for [`NewTable`].
#[derive(Debug)]
pub struct TableBuilder {
    number: u32,
    capacity: u32,
    zone: Zone,
    shape: TableShape,
    status: TableStatus,
    position: Option<Position>,
    description: Option<String>,
}

impl TableBuilder {
    /// Sets the zone. Ignored when a position is also given.
    #[must_use]
    pub const fn zone(mut self, zone: Zone) -> Self {
        self.zone = zone;
        self
    }

    /// Sets the shape.
    #[must_use]
    pub const fn shape(mut self, shape: TableShape) -> Self {
        self.shape = shape;
        self
    }

    /// Sets the initial status.
    #[must_use]
    pub const fn status(mut self, status: TableStatus) -> Self {
        self.status = status;
        self
    }

    /// Places the table on the canvas.
    #[must_use]
    pub const fn position(mut self, position: Position) -> Self {
        self.position = Some(position);
        self
    }

    /// Sets the description. Blank descriptions are dropped.
    #[must_use]
    pub fn description(mut self, description: Option<String>) -> Self {
        self.description = description
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty());
        self
    }

    /// Validates and builds the table.
    ///
    /// # Errors
    ///
    /// Returns a validation error if the number or capacity is zero, or the
    /// position is off the canvas.
    pub fn build(self) -> Result<NewTable> {
        if self.number == 0 {
            return Err(Error::validation("number", "table number must be at least 1"));
        }
        if self.capacity == 0 {
            return Err(Error::validation("capacity", "capacity must be at least 1"));
        }
        let position = self.position.map(Position::validate).transpose()?;
        let zone = position.map_or(self.zone, zone_for);

        Ok(NewTable {
            number: self.number,
            capacity: self.capacity,
            zone,
            shape: self.shape,
            status: self.status,
            position,
            description: self.description,
        })
    }
}
