use ecu_config::{ScenarioRow, VehicleCfg};
use ecu_traits::{ParkGap, Reading, Sensors};

/// Replays scenario rows against the engine clock.
///
/// Each reading carries its row's `ms` as capture time, so a scenario that
/// stops updating goes stale on its own. Speed-limit and setpoint events
/// latch until polled; a later row overwrites an unpolled one.
#[derive(Debug, Clone)]
pub struct ScenarioSensors {
    rows: Vec<ScenarioRow>,
    next: usize,
    current: Option<ScenarioRow>,
    vehicle: VehicleCfg,
    tail_ms: u32,
    now_ms: u32,
    pending_limit_kph: Option<u16>,
    pending_setpoint_x10: Option<i16>,
}

impl ScenarioSensors {
    pub fn new(rows: Vec<ScenarioRow>, vehicle: VehicleCfg) -> Self {
        Self {
            rows,
            next: 0,
            current: None,
            vehicle,
            tail_ms: 0,
            now_ms: 0,
            pending_limit_kph: None,
            pending_setpoint_x10: None,
        }
    }

    /// Keep reporting the last row for `tail_ms` before exhausting.
    #[must_use]
    pub fn with_tail_ms(mut self, tail_ms: u32) -> Self {
        self.tail_ms = tail_ms;
        self
    }

    /// Timestamp of the first row, a natural clock origin for replay.
    pub fn start_ms(&self) -> u32 {
        self.rows.first().map_or(0, |r| r.ms)
    }

    pub fn rows_applied(&self) -> usize {
        self.next
    }

    pub fn current_row(&self) -> Option<&ScenarioRow> {
        self.current.as_ref()
    }

    fn read<T: Copy + Default>(&self, pick: impl Fn(&ScenarioRow) -> Option<T>) -> Reading<T> {
        self.current
            .as_ref()
            .and_then(|row| pick(row).map(|v| Reading::new(v, row.ms)))
            .unwrap_or_else(Reading::invalid)
    }
}

impl Sensors for ScenarioSensors {
    fn sample(&mut self, now_ms: u32) {
        self.now_ms = now_ms;
        while let Some(row) = self.rows.get(self.next) {
            if row.ms > now_ms {
                break;
            }
            if let Some(kph) = row.speed_limit_event() {
                self.pending_limit_kph = Some(kph);
            }
            if let Some(sp) = row.setpoint_event() {
                self.pending_setpoint_x10 = Some(sp);
            }
            tracing::trace!(row = self.next, ms = row.ms, "scenario row applied");
            self.current = Some(row.clone());
            self.next += 1;
        }
    }

    /// A source with no rows never exhausts; `max_ticks` bounds such runs.
    fn exhausted(&self) -> bool {
        match self.rows.last() {
            Some(last) => {
                self.next == self.rows.len() && self.now_ms.wrapping_sub(last.ms) >= self.tail_ms
            }
            None => false,
        }
    }

    fn vehicle_ready(&mut self) -> bool {
        self.current
            .as_ref()
            .and_then(|r| r.vehicle_ready)
            .map_or(self.vehicle.ready, |v| v != 0)
    }

    fn driver_brake_pressed(&mut self) -> bool {
        self.current
            .as_ref()
            .and_then(|r| r.driver_brake)
            .map_or(self.vehicle.driver_brake, |v| v != 0)
    }

    fn distance_mm(&mut self) -> Reading<u16> {
        self.read(|r| r.distance_mm)
    }

    fn rain_pct(&mut self) -> Reading<u8> {
        self.read(|r| r.rain_pct)
    }

    fn speed_kph(&mut self) -> Reading<u16> {
        self.read(|r| r.speed_kph)
    }

    fn poll_speed_limit_kph(&mut self) -> Option<u16> {
        self.pending_limit_kph.take()
    }

    fn parking_gap(&mut self) -> Reading<ParkGap> {
        self.read(|r| r.gap().map(|(found, width_mm)| ParkGap { found, width_mm }))
    }

    fn cabin_temp_x10(&mut self) -> Reading<i16> {
        self.read(|r| r.cabin_tc_x10)
    }

    fn ambient_temp_x10(&mut self) -> Reading<i16> {
        self.read(|r| r.ambient_tc_x10)
    }

    fn humidity_pct(&mut self) -> Reading<u8> {
        self.read(|r| r.humid_pct)
    }

    fn poll_setpoint_x10(&mut self) -> Option<i16> {
        self.pending_setpoint_x10.take()
    }
}
