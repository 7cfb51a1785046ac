//! Floor-plan geometry: dining zones, default table placement, and the
//! drag-to-relocate protocol.
//!
//! The floor plan is an 840×470 canvas divided into five fixed zone
//! rectangles. A table's zone is always derived from its position, never
//! chosen independently.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

#[cfg(test)]
mod proptests;

/// Canvas width in floor-plan units.
pub const CANVAS_WIDTH: f64 = 840.0;

/// Canvas height in floor-plan units.
pub const CANVAS_HEIGHT: f64 = 470.0;

const GRID_COLUMN_WIDTH: f64 = 80.0;
const GRID_ROW_HEIGHT: f64 = 70.0;
const GRID_OFFSET_X: f64 = 30.0;
const GRID_OFFSET_Y: f64 = 50.0;

/// A dining zone of the restaurant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Zone {
    /// Tables along the front windows.
    Window,
    /// The main room.
    Center,
    /// Bar seating.
    Bar,
    /// Outdoor patio.
    Patio,
    /// Private dining room.
    Private,
}

impl Zone {
    /// All zones, in containment priority order.
    pub const ALL: [Self; 5] = [
        Self::Window,
        Self::Center,
        Self::Bar,
        Self::Patio,
        Self::Private,
    ];

    /// The stored and displayed name, e.g. `PATIO`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Window => "WINDOW",
            Self::Center => "CENTER",
            Self::Bar => "BAR",
            Self::Patio => "PATIO",
            Self::Private => "PRIVATE",
        }
    }

    /// The zone's rectangle on the canvas.
    #[must_use]
    pub const fn rect(self) -> ZoneRect {
        match self {
            Self::Window => ZoneRect::new(0.0, 0.0, 300.0, 250.0),
            Self::Center => ZoneRect::new(320.0, 0.0, 300.0, 250.0),
            Self::Bar => ZoneRect::new(640.0, 0.0, 200.0, 250.0),
            Self::Patio => ZoneRect::new(0.0, 270.0, 420.0, 200.0),
            Self::Private => ZoneRect::new(440.0, 270.0, 400.0, 200.0),
        }
    }
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Zone {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|zone| zone.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                Error::validation(
                    "zone",
                    format!("unknown zone '{s}' (expected WINDOW, CENTER, BAR, PATIO or PRIVATE)"),
                )
            })
    }
}

/// An axis-aligned rectangle on the canvas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoneRect {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Width.
    pub width: f64,
    /// Height.
    pub height: f64,
}

impl ZoneRect {
    const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Returns `true` if the point lies inside the rectangle, edges included.
    #[must_use]
    pub fn contains(&self, position: Position) -> bool {
        position.x >= self.x
            && position.x <= self.x + self.width
            && position.y >= self.y
            && position.y <= self.y + self.height
    }
}

/// A point on the floor-plan canvas.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// Horizontal coordinate.
    pub x: f64,
    /// Vertical coordinate.
    pub y: f64,
}

impl Position {
    /// Creates a position.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Returns `true` if the position is finite and lies within the canvas.
    #[must_use]
    pub fn is_on_canvas(&self) -> bool {
        self.x.is_finite()
            && self.y.is_finite()
            && (0.0..=CANVAS_WIDTH).contains(&self.x)
            && (0.0..=CANVAS_HEIGHT).contains(&self.y)
    }

    /// Validates that the position lies on the canvas.
    ///
    /// # Errors
    ///
    /// Returns a validation error for off-canvas or non-finite coordinates.
    pub fn validate(self) -> Result<Self> {
        if self.is_on_canvas() {
            Ok(self)
        } else {
            Err(Error::validation(
                "position",
                format!(
                    "({}, {}) is outside the {CANVAS_WIDTH}x{CANVAS_HEIGHT} floor plan",
                    self.x, self.y
                ),
            ))
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Returns the zone containing `position`.
///
/// Zones are tested in priority order (WINDOW, CENTER, BAR, PATIO, PRIVATE)
/// with inclusive edges. Points in the gaps between zones, or off the
/// canvas, fall back to CENTER.
///
/// # Examples
///
/// ```
/// use tablebook::floorplan::{zone_for, Position, Zone};
///
/// assert_eq!(zone_for(Position::new(100.0, 350.0)), Zone::Patio);
/// assert_eq!(zone_for(Position::new(300.0, 100.0)), Zone::Window);
/// assert_eq!(zone_for(Position::new(310.0, 100.0)), Zone::Center);
/// ```
#[must_use]
pub fn zone_for(position: Position) -> Zone {
    Zone::ALL
        .into_iter()
        .find(|zone| zone.rect().contains(position))
        .unwrap_or(Zone::Center)
}

/// Returns the default grid position for the `index`-th table in `zone`.
///
/// Tables are laid out row-major in 80×70 cells starting 30 units right and
/// 50 units below the zone's top-left corner.
///
/// # Examples
///
/// ```
/// use tablebook::floorplan::{default_position, Position, Zone};
///
/// assert_eq!(default_position(Zone::Window, 0), Position::new(30.0, 50.0));
/// // WINDOW is 300 wide: three columns per row.
/// assert_eq!(default_position(Zone::Window, 3), Position::new(30.0, 120.0));
/// ```
#[must_use]
pub fn default_position(zone: Zone, index: usize) -> Position {
    let rect = zone.rect();
    // Zone widths are small positive constants.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let columns = ((rect.width / GRID_COLUMN_WIDTH).floor() as usize).max(1);
    #[allow(clippy::cast_precision_loss)]
    let (col, row) = ((index % columns) as f64, (index / columns) as f64);
    Position::new(
        rect.x + GRID_OFFSET_X + col * GRID_COLUMN_WIDTH,
        rect.y + GRID_OFFSET_Y + row * GRID_ROW_HEIGHT,
    )
}

/// Local state of one table being dragged on the floor plan.
///
/// The local position follows the pointer while dragging. On release the
/// zone is derived once and position and zone are persisted together. If
/// persisting fails, the local position rolls back to the last confirmed
/// position so the plan never shows a table where the store does not have
/// it.
///
/// # Examples
///
/// ```
/// use tablebook::floorplan::{DragSession, Position, Zone};
///
/// let mut drag = DragSession::begin(Position::new(350.0, 50.0));
/// drag.drag_to(Position::new(100.0, 350.0));
///
/// let zone = drag
///     .release(|_position, zone| -> tablebook::Result<Zone> { Ok(zone) })
///     .unwrap();
/// assert_eq!(zone, Zone::Patio);
/// assert_eq!(drag.confirmed(), Position::new(100.0, 350.0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragSession {
    confirmed: Position,
    current: Position,
}

impl DragSession {
    /// Starts a drag from the table's last persisted position.
    #[must_use]
    pub const fn begin(confirmed: Position) -> Self {
        Self {
            confirmed,
            current: confirmed,
        }
    }

    /// Moves the table locally. Nothing is persisted.
    pub fn drag_to(&mut self, position: Position) {
        self.current = position;
    }

    /// The position currently shown.
    #[must_use]
    pub const fn current(&self) -> Position {
        self.current
    }

    /// The last position known to be persisted.
    #[must_use]
    pub const fn confirmed(&self) -> Position {
        self.confirmed
    }

    /// Ends the drag: derives the zone and hands position and zone to
    /// `persist` in a single call.
    ///
    /// # Errors
    ///
    /// Returns whatever `persist` returns; the local position is rolled back
    /// to the confirmed one first.
    pub fn release<T, F>(&mut self, persist: F) -> Result<T>
    where
        F: FnOnce(Position, Zone) -> Result<T>,
    {
        let zone = zone_for(self.current);
        match persist(self.current, zone) {
            Ok(value) => {
                self.confirmed = self.current;
                Ok(value)
            }
            Err(err) => {
                log::warn!(
                    "could not save table position {}; restoring {}",
                    self.current,
                    self.confirmed
                );
                self.current = self.confirmed;
                Err(err)
            }
        }
    }
}
