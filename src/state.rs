//! Owned sequencer state: run slots, per-zone lit records and debounce stamps.
//!
//! Everything the engines mutate lives in one [`StairState`] owned by the
//! control loop and lent out by `&mut` to each phase. Storage is fixed-size
//! arrays indexed through [`Direction`] and [`ZoneIndex`] accessors, so an Up
//! slot can never be looked up in the Down table by accident.

use heapless::Vec;

use crate::time::TimeInstant;
use crate::types::{DebouncePolicy, Direction, SensorId, ZoneIndex};

/// Index of a slot inside its direction's pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SlotHandle(pub usize);

/// Returned when every slot in a pool is already running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PoolFull;

/// Result of moving a slot's cursor one zone along.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// Cursor now points at the next zone to light.
    Moved(ZoneIndex),

    /// Cursor ran off the far end; the slot is free again.
    Finished,
}

/// Bookkeeping for one in-flight run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SequenceSlot<I> {
    active: bool,
    cursor: ZoneIndex,
    last_advance: Option<I>,
}

impl<I: TimeInstant> SequenceSlot<I> {
    fn idle(start: ZoneIndex) -> Self {
        Self {
            active: false,
            cursor: start,
            last_advance: None,
        }
    }

    /// Returns true while the run is in flight.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Next zone this run will light.
    pub fn cursor(&self) -> ZoneIndex {
        self.cursor
    }

    /// When this run last lit a zone, `None` before its first step.
    pub fn last_advance(&self) -> Option<I> {
        self.last_advance
    }

    /// Returns true if the cadence gate lets this run light its next zone.
    ///
    /// A freshly allocated slot is always due, so a run lights its first zone
    /// on the same tick it was triggered.
    pub fn is_due(&self, now: I, interval: I::Duration) -> bool {
        match self.last_advance {
            None => true,
            Some(last) => crate::time::has_elapsed(now, last, interval),
        }
    }

    /// Records a step at `now` and moves the cursor in `direction`.
    pub(crate) fn step<const ZONES: usize>(&mut self, direction: Direction, now: I) -> StepOutcome {
        self.last_advance = Some(now);
        match direction.step_from::<ZONES>(self.cursor) {
            Some(next) => {
                self.cursor = next;
                StepOutcome::Moved(next)
            }
            None => {
                *self = Self::idle(direction.first_zone::<ZONES>());
                StepOutcome::Finished
            }
        }
    }
}

/// Fixed-capacity pool of run slots for one direction.
#[derive(Debug, Clone)]
pub struct SlotPool<I, const ZONES: usize, const SLOTS: usize> {
    direction: Direction,
    slots: [SequenceSlot<I>; SLOTS],
}

impl<I: TimeInstant, const ZONES: usize, const SLOTS: usize> SlotPool<I, ZONES, SLOTS> {
    /// Creates a pool with every slot idle.
    ///
    /// `ZONES` must be at least one; an empty strip fails to compile.
    pub fn new(direction: Direction) -> Self {
        const { assert!(ZONES > 0, "a staircase needs at least one zone") };
        Self {
            direction,
            slots: core::array::from_fn(|_| SequenceSlot::idle(direction.first_zone::<ZONES>())),
        }
    }

    /// Direction every slot in this pool travels.
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Activates the first free slot.
    ///
    /// # Errors
    /// Returns `PoolFull` if all `SLOTS` runs are in flight.
    pub fn allocate(&mut self) -> Result<SlotHandle, PoolFull> {
        let start = self.direction.first_zone::<ZONES>();
        let (index, slot) = self
            .slots
            .iter_mut()
            .enumerate()
            .find(|(_, slot)| !slot.active)
            .ok_or(PoolFull)?;

        *slot = SequenceSlot {
            active: true,
            cursor: start,
            last_advance: None,
        };
        Ok(SlotHandle(index))
    }

    /// Returns the slot behind a handle.
    pub fn slot(&self, handle: SlotHandle) -> Option<&SequenceSlot<I>> {
        self.slots.get(handle.0)
    }

    pub(crate) fn slot_mut(&mut self, handle: SlotHandle) -> Option<&mut SequenceSlot<I>> {
        self.slots.get_mut(handle.0)
    }

    /// Iterates over in-flight runs.
    pub fn active(&self) -> impl Iterator<Item = (SlotHandle, &SequenceSlot<I>)> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.active)
            .map(|(index, slot)| (SlotHandle(index), slot))
    }

    /// Calls `f` for every in-flight run.
    pub fn for_each_active<F>(&mut self, mut f: F)
    where
        F: FnMut(SlotHandle, &mut SequenceSlot<I>),
    {
        for (index, slot) in self.slots.iter_mut().enumerate() {
            if slot.active {
                f(SlotHandle(index), slot);
            }
        }
    }

    /// Number of in-flight runs.
    pub fn active_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.active).count()
    }

    /// Returns true if any run is in flight.
    pub fn is_busy(&self) -> bool {
        self.slots.iter().any(|slot| slot.active)
    }

    /// Returns every slot to idle.
    pub fn reset(&mut self) {
        *self = Self::new(self.direction);
    }
}

/// When a zone was last lit in one direction and whether it still needs clearing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZoneLitRecord<I> {
    lit_at: Option<I>,
    pending_clear: bool,
}

impl<I: TimeInstant> ZoneLitRecord<I> {
    const fn empty() -> Self {
        Self {
            lit_at: None,
            pending_clear: false,
        }
    }

    /// Returns true while the zone is lit and waiting for its clear.
    pub fn is_pending(&self) -> bool {
        self.pending_clear
    }

    /// Time of the most recent light, if any.
    pub fn lit_at(&self) -> Option<I> {
        self.lit_at
    }

    /// Returns true once a pending record has been lit for at least `delay`.
    pub fn is_expired(&self, now: I, delay: I::Duration) -> bool {
        match (self.pending_clear, self.lit_at) {
            (true, Some(lit_at)) => crate::time::has_elapsed(now, lit_at, delay),
            _ => false,
        }
    }

    fn mark(&mut self, now: I) {
        self.lit_at = Some(now);
        self.pending_clear = true;
    }

    fn settle(&mut self) {
        self.pending_clear = false;
    }
}

/// Lit records for every zone in one direction.
#[derive(Debug, Clone)]
pub struct LitTable<I, const ZONES: usize> {
    records: [ZoneLitRecord<I>; ZONES],
}

impl<I: TimeInstant, const ZONES: usize> LitTable<I, ZONES> {
    /// Creates a table with no zone lit.
    pub fn new() -> Self {
        Self {
            records: core::array::from_fn(|_| ZoneLitRecord::empty()),
        }
    }

    /// Returns the record for one zone.
    pub fn record(&self, zone: ZoneIndex) -> Option<&ZoneLitRecord<I>> {
        self.records.get(zone.0)
    }

    /// Marks a zone lit at `now`, restarting its clear timer.
    pub(crate) fn mark_lit(&mut self, zone: ZoneIndex, now: I) {
        if let Some(record) = self.records.get_mut(zone.0) {
            record.mark(now);
        }
    }

    /// Settles every record that has been lit for at least `delay`, calling
    /// `on_expired` for each zone settled.
    pub(crate) fn settle_expired<F>(&mut self, now: I, delay: I::Duration, mut on_expired: F)
    where
        F: FnMut(ZoneIndex),
    {
        for (index, record) in self.records.iter_mut().enumerate() {
            if record.is_expired(now, delay) {
                record.settle();
                on_expired(ZoneIndex(index));
            }
        }
    }

    /// Returns true if this zone is still waiting for its clear.
    pub fn is_pending(&self, zone: ZoneIndex) -> bool {
        self.record(zone).is_some_and(ZoneLitRecord::is_pending)
    }

    /// Returns true if any zone is waiting for its clear.
    pub fn any_pending(&self) -> bool {
        self.records.iter().any(ZoneLitRecord::is_pending)
    }

    /// Number of zones waiting for their clear.
    pub fn pending_count(&self) -> usize {
        self.records.iter().filter(|record| record.is_pending()).count()
    }

    /// Zones waiting for their clear, in index order.
    pub fn pending_zones(&self) -> Vec<ZoneIndex, ZONES> {
        let mut zones = Vec::new();
        for (index, record) in self.records.iter().enumerate() {
            if record.is_pending() {
                // Capacity is ZONES; one entry per record at most.
                let _ = zones.push(ZoneIndex(index));
            }
        }
        zones
    }

    /// Forgets every record.
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

impl<I: TimeInstant, const ZONES: usize> Default for LitTable<I, ZONES> {
    fn default() -> Self {
        Self::new()
    }
}

/// Time of the last honored trigger, shared or per sensor.
#[derive(Debug, Clone, Copy)]
pub struct DebounceState<I> {
    last_trigger: [Option<I>; 2],
}

impl<I: TimeInstant> DebounceState<I> {
    /// Creates a state where no trigger has been honored yet.
    pub fn new() -> Self {
        Self {
            last_trigger: [None, None],
        }
    }

    fn index(sensor: SensorId, policy: DebouncePolicy) -> usize {
        match policy {
            DebouncePolicy::Shared => 0,
            DebouncePolicy::PerSensor => sensor.index(),
        }
    }

    /// Last honored trigger that gates `sensor` under `policy`.
    pub fn last_trigger(&self, sensor: SensorId, policy: DebouncePolicy) -> Option<I> {
        self.last_trigger[Self::index(sensor, policy)]
    }

    /// Returns true if the debounce window for `sensor` has passed.
    pub fn is_open(
        &self,
        sensor: SensorId,
        policy: DebouncePolicy,
        now: I,
        window: I::Duration,
    ) -> bool {
        match self.last_trigger(sensor, policy) {
            None => true,
            Some(last) => crate::time::has_elapsed(now, last, window),
        }
    }

    /// Restarts the window for `sensor` at `now`.
    pub(crate) fn record(&mut self, sensor: SensorId, policy: DebouncePolicy, now: I) {
        self.last_trigger[Self::index(sensor, policy)] = Some(now);
    }
}

impl<I: TimeInstant> Default for DebounceState<I> {
    fn default() -> Self {
        Self::new()
    }
}

/// All mutable state of a staircase sequencer.
#[derive(Debug, Clone)]
pub struct StairState<I, const ZONES: usize, const SLOTS: usize> {
    pools: [SlotPool<I, ZONES, SLOTS>; 2],
    lit: [LitTable<I, ZONES>; 2],
    debounce: DebounceState<I>,
}

impl<I: TimeInstant, const ZONES: usize, const SLOTS: usize> StairState<I, ZONES, SLOTS> {
    /// Creates an idle state: no runs, nothing lit, no trigger seen.
    ///
    /// A strip without zones is rejected at compile time:
    ///
    /// ```compile_fail
    /// use stair_sequencer::{Millis, StairState};
    ///
    /// let _ = StairState::<Millis, 0, 3>::new();
    /// ```
    pub fn new() -> Self {
        Self {
            pools: Direction::ALL.map(SlotPool::new),
            lit: [LitTable::new(), LitTable::new()],
            debounce: DebounceState::new(),
        }
    }

    /// Run slots for one direction.
    pub fn pool(&self, direction: Direction) -> &SlotPool<I, ZONES, SLOTS> {
        &self.pools[direction.index()]
    }

    pub(crate) fn pool_mut(&mut self, direction: Direction) -> &mut SlotPool<I, ZONES, SLOTS> {
        &mut self.pools[direction.index()]
    }

    /// Lit records for one direction.
    pub fn lit(&self, direction: Direction) -> &LitTable<I, ZONES> {
        &self.lit[direction.index()]
    }

    pub(crate) fn lit_mut(&mut self, direction: Direction) -> &mut LitTable<I, ZONES> {
        &mut self.lit[direction.index()]
    }

    /// Borrows a direction's pool and lit table together.
    pub(crate) fn parts_mut(
        &mut self,
        direction: Direction,
    ) -> (&mut SlotPool<I, ZONES, SLOTS>, &mut LitTable<I, ZONES>) {
        let index = direction.index();
        (&mut self.pools[index], &mut self.lit[index])
    }

    /// Debounce bookkeeping.
    pub fn debounce(&self) -> &DebounceState<I> {
        &self.debounce
    }

    pub(crate) fn debounce_mut(&mut self) -> &mut DebounceState<I> {
        &mut self.debounce
    }

    /// Returns true if `direction` still has a run in flight or a zone lit.
    pub fn has_unfinished(&self, direction: Direction) -> bool {
        self.pool(direction).is_busy() || self.lit(direction).any_pending()
    }

    /// Returns true when neither direction has anything in flight or lit.
    pub fn is_idle(&self) -> bool {
        Direction::ALL.iter().all(|&direction| !self.has_unfinished(direction))
    }

    /// Stops every run in flight. Lit records are kept, so zones already on
    /// still receive their clear.
    pub fn drop_runs(&mut self) {
        for pool in &mut self.pools {
            pool.reset();
        }
    }

    /// Drops every run and lit record. Debounce history is kept.
    pub fn reset(&mut self) {
        for pool in &mut self.pools {
            pool.reset();
        }
        for table in &mut self.lit {
            table.reset();
        }
    }
}

impl<I: TimeInstant, const ZONES: usize, const SLOTS: usize> Default
    for StairState<I, ZONES, SLOTS>
{
    fn default() -> Self {
        Self::new()
    }
}
