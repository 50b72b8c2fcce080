//! Core vocabulary types: directions, zones and sensors.

/// Direction of travel along the staircase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    /// Bottom to top. Lights zone 0 first.
    Up,

    /// Top to bottom. Lights the last zone first.
    Down,
}

impl Direction {
    /// Both directions, in the order the engines visit them.
    pub const ALL: [Direction; 2] = [Direction::Up, Direction::Down];

    /// Returns the other direction.
    #[inline]
    pub fn opposite(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
        }
    }

    /// Table index used by the per-direction pools and lit tables.
    #[inline]
    pub(crate) fn index(self) -> usize {
        match self {
            Direction::Up => 0,
            Direction::Down => 1,
        }
    }

    /// Zone a fresh run in this direction starts from. `ZONES` is assumed
    /// non-zero; slot pools refuse to build for an empty strip.
    #[inline]
    pub fn first_zone<const ZONES: usize>(self) -> ZoneIndex {
        match self {
            Direction::Up => ZoneIndex(0),
            Direction::Down => ZoneIndex(ZONES.saturating_sub(1)),
        }
    }

    /// Zone after `zone` in this direction, or `None` past the far end.
    #[inline]
    pub fn step_from<const ZONES: usize>(self, zone: ZoneIndex) -> Option<ZoneIndex> {
        match self {
            Direction::Up => {
                let next = zone.0 + 1;
                (next < ZONES).then_some(ZoneIndex(next))
            }
            Direction::Down => zone.0.checked_sub(1).map(ZoneIndex),
        }
    }
}

/// Internal, 0-based index of a lighting zone.
///
/// The physical lighting bus is addressed 1-based: zone `0` is written to
/// address `1`, zone `ZONES - 1` to address `ZONES`. Use [`ZoneIndex::address`]
/// at the output boundary and the raw index everywhere else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ZoneIndex(pub usize);

impl ZoneIndex {
    /// Returns the 0-based index.
    #[inline]
    pub fn get(self) -> usize {
        self.0
    }

    /// Returns the 1-based physical bus address.
    #[inline]
    pub fn address(self) -> u16 {
        self.0
            .checked_add(1)
            .and_then(|address| u16::try_from(address).ok())
            .unwrap_or(u16::MAX)
    }
}

impl From<usize> for ZoneIndex {
    fn from(index: usize) -> Self {
        ZoneIndex(index)
    }
}

impl From<ZoneIndex> for usize {
    fn from(zone: ZoneIndex) -> Self {
        zone.0
    }
}

/// One of the two motion sensors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SensorId {
    /// Sensor at the foot of the stairs; starts Up runs.
    Bottom,

    /// Sensor at the head of the stairs; starts Down runs.
    Top,
}

impl SensorId {
    /// Both sensors, in polling order.
    pub const ALL: [SensorId; 2] = [SensorId::Bottom, SensorId::Top];

    /// Direction of travel a trigger on this sensor starts.
    #[inline]
    pub fn direction(self) -> Direction {
        match self {
            SensorId::Bottom => Direction::Up,
            SensorId::Top => Direction::Down,
        }
    }

    #[inline]
    pub(crate) fn index(self) -> usize {
        match self {
            SensorId::Bottom => 0,
            SensorId::Top => 1,
        }
    }
}

/// Raw electrical level read from a sensor input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SensorLevel {
    High,
    Low,
}

impl From<bool> for SensorLevel {
    fn from(high: bool) -> Self {
        if high { SensorLevel::High } else { SensorLevel::Low }
    }
}

/// Which raw level means "someone is there" for a given deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ActiveLevel {
    /// Sensor drives the line high when triggered (PIR modules, pull-down wiring).
    #[default]
    High,

    /// Sensor pulls the line low when triggered (open-collector, pull-up wiring).
    Low,
}

impl ActiveLevel {
    /// Interprets a raw level under this polarity.
    #[inline]
    pub fn is_triggered(self, level: SensorLevel) -> bool {
        matches!(
            (self, level),
            (ActiveLevel::High, SensorLevel::High) | (ActiveLevel::Low, SensorLevel::Low)
        )
    }
}

/// How the debounce window is shared between the two sensors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DebouncePolicy {
    /// One window for both sensors. Any eligible edge on either sensor
    /// restarts it, even one blocked by the opposite direction, so
    /// alternating triggers are rate-limited together.
    #[default]
    Shared,

    /// Each sensor keeps its own window.
    PerSensor,
}
