use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use super::schedule::TimeSlot;

/// `YYYY-MM-DD` (de)serialization for calendar dates.
pub mod iso_date {
    use serde::{de, ser, Deserialize, Deserializer, Serializer};
    use time::{format_description::FormatItem, macros::format_description, Date};

    pub const FORMAT: &[FormatItem<'static>] = format_description!("[year]-[month]-[day]");

    pub fn parse(raw: &str) -> Result<Date, time::error::Parse> {
        Date::parse(raw.trim(), FORMAT)
    }

    pub fn format(date: Date) -> Result<String, time::error::Format> {
        date.format(FORMAT)
    }

    pub fn serialize<S: Serializer>(date: &Date, serializer: S) -> Result<S::Ok, S::Error> {
        let raw = format(*date).map_err(ser::Error::custom)?;
        serializer.serialize_str(&raw)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Date, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).map_err(de::Error::custom)
    }
}

/// Reservation lifecycle. Stored and serialized as the lowercase name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReservationStatus {
    Pending,
    Confirmed,
    Completed,
    Cancelled,
}

/// Outcome of asking whether a status may move to another.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Allowed,
    NoOp,
    Rejected,
}

impl ReservationStatus {
    pub const ALL: [ReservationStatus; 4] = [
        ReservationStatus::Pending,
        ReservationStatus::Confirmed,
        ReservationStatus::Completed,
        ReservationStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ReservationStatus::Pending => "pending",
            ReservationStatus::Confirmed => "confirmed",
            ReservationStatus::Completed => "completed",
            ReservationStatus::Cancelled => "cancelled",
        }
    }

    /// Whether a reservation in this status occupies its slot.
    pub fn holds_slot(&self) -> bool {
        !matches!(self, ReservationStatus::Cancelled)
    }

    /// Whether the owner may still move the reservation or change its notes.
    pub fn is_editable(&self) -> bool {
        matches!(self, ReservationStatus::Pending | ReservationStatus::Confirmed)
    }

    /// Transitions reachable from the booking flow. Only cancellation is
    /// exposed; confirm/complete belong to an administrative path.
    pub fn transition_to(&self, next: ReservationStatus) -> Transition {
        use ReservationStatus::*;
        match (self, next) {
            (a, b) if *a == b => Transition::NoOp,
            (Pending, Cancelled) | (Confirmed, Cancelled) => Transition::Allowed,
            _ => Transition::Rejected,
        }
    }
}

impl fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReservationStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ReservationStatus::ALL
            .into_iter()
            .find(|st| st.as_str() == s)
            .ok_or_else(|| anyhow::anyhow!("unknown reservation status {s:?}"))
    }
}

/// Reservation as stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reservation {
    pub id: Uuid,
    pub user_id: Uuid,
    pub service_id: Uuid,
    pub date: Date,
    pub time: TimeSlot,
    pub notes: String,
    pub status: ReservationStatus,
    pub created_at: OffsetDateTime,
}

/// Raw `reservations` row; `time` and `status` are TEXT columns.
#[derive(Debug, FromRow)]
pub struct ReservationRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub service_id: Uuid,
    pub date: Date,
    pub time: String,
    pub notes: String,
    pub status: String,
    pub created_at: OffsetDateTime,
}

impl TryFrom<ReservationRow> for Reservation {
    type Error = anyhow::Error;

    fn try_from(r: ReservationRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: r.id,
            user_id: r.user_id,
            service_id: r.service_id,
            date: r.date,
            time: r.time.parse()?,
            notes: r.notes,
            status: r.status.parse()?,
            created_at: r.created_at,
        })
    }
}

/// Fields needed to claim a slot.
#[derive(Debug, Clone)]
pub struct NewReservation {
    pub user_id: Uuid,
    pub service_id: Uuid,
    pub date: Date,
    pub time: TimeSlot,
    pub notes: String,
}

/// Replacement values for an owner's edit.
#[derive(Debug, Clone)]
pub struct ReservationChange {
    pub date: Date,
    pub time: TimeSlot,
    pub notes: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[test]
    fn status_strings_round_trip() {
        for st in ReservationStatus::ALL {
            assert_eq!(st.as_str().parse::<ReservationStatus>().unwrap(), st);
            let json = serde_json::to_string(&st).unwrap();
            assert_eq!(json, format!("\"{}\"", st.as_str()));
            let back: ReservationStatus = serde_json::from_str(&json).unwrap();
            assert_eq!(back, st);
        }
        assert!("cancelada".parse::<ReservationStatus>().is_err());
        assert!("Pending".parse::<ReservationStatus>().is_err());
    }

    #[test]
    fn only_cancelled_frees_the_slot() {
        assert!(ReservationStatus::Pending.holds_slot());
        assert!(ReservationStatus::Confirmed.holds_slot());
        assert!(ReservationStatus::Completed.holds_slot());
        assert!(!ReservationStatus::Cancelled.holds_slot());
    }

    #[test]
    fn only_open_reservations_are_editable() {
        assert!(ReservationStatus::Pending.is_editable());
        assert!(ReservationStatus::Confirmed.is_editable());
        assert!(!ReservationStatus::Completed.is_editable());
        assert!(!ReservationStatus::Cancelled.is_editable());
    }

    #[test]
    fn transition_table() {
        use ReservationStatus::*;
        assert_eq!(Pending.transition_to(Cancelled), Transition::Allowed);
        assert_eq!(Confirmed.transition_to(Cancelled), Transition::Allowed);
        assert_eq!(Completed.transition_to(Cancelled), Transition::Rejected);
        assert_eq!(Cancelled.transition_to(Cancelled), Transition::NoOp);
        // cancelled is terminal
        assert_eq!(Cancelled.transition_to(Pending), Transition::Rejected);
        assert_eq!(Cancelled.transition_to(Confirmed), Transition::Rejected);
        // confirm/complete are not reachable from here
        assert_eq!(Pending.transition_to(Confirmed), Transition::Rejected);
        assert_eq!(Confirmed.transition_to(Completed), Transition::Rejected);
    }

    #[test]
    fn row_converts_and_rejects_garbage() {
        let row = || ReservationRow {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            service_id: Uuid::new_v4(),
            date: date!(2025 - 06 - 01),
            time: "09:00".into(),
            notes: String::new(),
            status: "pending".into(),
            created_at: OffsetDateTime::now_utc(),
        };
        let r = Reservation::try_from(row()).unwrap();
        assert_eq!(r.time.to_string(), "09:00");
        assert_eq!(r.status, ReservationStatus::Pending);

        let mut bad = row();
        bad.status = "archived".into();
        assert!(Reservation::try_from(bad).is_err());

        let mut bad = row();
        bad.time = "9am".into();
        assert!(Reservation::try_from(bad).is_err());
    }

    #[test]
    fn iso_date_parses_and_formats() {
        let d = iso_date::parse("2025-06-01").unwrap();
        assert_eq!(d, date!(2025 - 06 - 01));
        assert_eq!(iso_date::format(d).unwrap(), "2025-06-01");
        assert_eq!(iso_date::format(date!(987 - 01 - 09)).unwrap(), "0987-01-09");
        assert!(iso_date::parse("01/06/2025").is_err());
        assert!(iso_date::parse("2025-02-30").is_err());
    }
}
