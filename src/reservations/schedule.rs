use std::{collections::HashSet, fmt, str::FromStr};

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// A bookable time of day, rendered as 24-hour `HH:MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimeSlot {
    hour: u8,
    minute: u8,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SlotParseError {
    #[error("time must be formatted as HH:MM, got {0:?}")]
    Malformed(String),
    #[error("time out of range: {0:?}")]
    OutOfRange(String),
}

impl TimeSlot {
    pub const fn new(hour: u8, minute: u8) -> Self {
        Self { hour, minute }
    }

    pub fn hour(&self) -> u8 {
        self.hour
    }

    pub fn minute(&self) -> u8 {
        self.minute
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

impl FromStr for TimeSlot {
    type Err = SlotParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || SlotParseError::Malformed(s.to_string());
        let (h, m) = s.trim().split_once(':').ok_or_else(malformed)?;
        if h.len() != 2 || m.len() != 2 {
            return Err(malformed());
        }
        if !h.bytes().chain(m.bytes()).all(|b| b.is_ascii_digit()) {
            return Err(malformed());
        }
        let hour: u8 = h.parse().map_err(|_| malformed())?;
        let minute: u8 = m.parse().map_err(|_| malformed())?;
        if hour > 23 || minute > 59 {
            return Err(SlotParseError::OutOfRange(s.to_string()));
        }
        Ok(Self { hour, minute })
    }
}

impl Serialize for TimeSlot {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TimeSlot {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(de::Error::custom)
    }
}

const DEFAULT_SLOTS: [TimeSlot; 9] = [
    TimeSlot::new(9, 0),
    TimeSlot::new(10, 0),
    TimeSlot::new(11, 0),
    TimeSlot::new(12, 0),
    // 13:00 is the lunch break
    TimeSlot::new(14, 0),
    TimeSlot::new(15, 0),
    TimeSlot::new(16, 0),
    TimeSlot::new(17, 0),
    TimeSlot::new(18, 0),
];

/// The ordered set of slots offered every day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<TimeSlot>", into = "Vec<TimeSlot>")]
pub struct DailySchedule {
    slots: Vec<TimeSlot>,
}

impl Default for DailySchedule {
    fn default() -> Self {
        Self {
            slots: DEFAULT_SLOTS.to_vec(),
        }
    }
}

impl TryFrom<Vec<TimeSlot>> for DailySchedule {
    type Error = anyhow::Error;

    fn try_from(slots: Vec<TimeSlot>) -> Result<Self, Self::Error> {
        Self::new(slots)
    }
}

impl From<DailySchedule> for Vec<TimeSlot> {
    fn from(schedule: DailySchedule) -> Self {
        schedule.slots
    }
}

impl DailySchedule {
    /// Builds a schedule from explicit slots. They must be strictly ascending.
    pub fn new(slots: Vec<TimeSlot>) -> anyhow::Result<Self> {
        anyhow::ensure!(!slots.is_empty(), "schedule must contain at least one slot");
        if let Some(pair) = slots.windows(2).find(|w| w[0] >= w[1]) {
            anyhow::bail!(
                "schedule slots must be strictly ascending ({} then {})",
                pair[0],
                pair[1]
            );
        }
        Ok(Self { slots })
    }

    /// Parses a comma-separated list such as `"09:00,10:00,14:00"`.
    pub fn parse_list(raw: &str) -> anyhow::Result<Self> {
        let slots = raw
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| s.parse::<TimeSlot>())
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(slots)
    }

    pub fn slots(&self) -> &[TimeSlot] {
        &self.slots
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn contains(&self, slot: &TimeSlot) -> bool {
        self.slots.binary_search(slot).is_ok()
    }

    /// Every slot of the day that is not in `booked`, in schedule order.
    pub fn free_slots(&self, booked: &HashSet<TimeSlot>) -> Vec<TimeSlot> {
        self.slots
            .iter()
            .filter(|slot| !booked.contains(slot))
            .copied()
            .collect()
    }
}
