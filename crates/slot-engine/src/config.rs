//! Working hours and slot parameters, passed explicitly into the engine.

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::clock::ClockTime;
use crate::error::{Result, ScheduleError};
use crate::slots::{SlotMode, SlotParams, DEFAULT_GRANULARITY};

const OFFICE_OPENS: ClockTime = ClockTime::hm(9, 0);
const OFFICE_CLOSES: ClockTime = ClockTime::hm(17, 0);

/// Whole-hour bounds of the bookable part of a day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkingWindow {
    pub start_hour: u32,
    pub end_hour: u32,
}

impl Default for WorkingWindow {
    fn default() -> Self {
        WorkingWindow {
            start_hour: 9,
            end_hour: 18,
        }
    }
}

impl WorkingWindow {
    pub fn new(start_hour: u32, end_hour: u32) -> Self {
        WorkingWindow {
            start_hour,
            end_hour,
        }
    }

    /// A window that opens at or after it closes offers no slots.
    pub fn is_empty(&self) -> bool {
        self.start_hour >= self.end_hour
    }

    /// The window as `(start, end)` clock times.
    ///
    /// # Errors
    /// Returns `ScheduleError::InvalidTime` if either hour is past 24.
    pub fn bounds(&self) -> Result<(ClockTime, ClockTime)> {
        let hour = |h: u32| {
            ClockTime::from_hour(h).ok_or_else(|| ScheduleError::InvalidTime(format!("{h}:00")))
        };
        Ok((hour(self.start_hour)?, hour(self.end_hour)?))
    }
}

/// Working hours for one weekday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaySchedule {
    pub start: ClockTime,
    pub end: ClockTime,
    pub is_working_day: bool,
}

impl DaySchedule {
    pub fn working(start: ClockTime, end: ClockTime) -> Self {
        DaySchedule {
            start,
            end,
            is_working_day: true,
        }
    }

    pub fn day_off() -> Self {
        DaySchedule {
            is_working_day: false,
            ..Self::office_hours()
        }
    }

    fn office_hours() -> Self {
        DaySchedule {
            start: OFFICE_OPENS,
            end: OFFICE_CLOSES,
            is_working_day: true,
        }
    }
}

/// Per-weekday working hours. Defaults to Monday-Friday 09:00-17:00.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeeklySchedule {
    pub monday: DaySchedule,
    pub tuesday: DaySchedule,
    pub wednesday: DaySchedule,
    pub thursday: DaySchedule,
    pub friday: DaySchedule,
    pub saturday: DaySchedule,
    pub sunday: DaySchedule,
}

impl Default for WeeklySchedule {
    fn default() -> Self {
        let weekday = DaySchedule::office_hours();
        WeeklySchedule {
            monday: weekday,
            tuesday: weekday,
            wednesday: weekday,
            thursday: weekday,
            friday: weekday,
            saturday: DaySchedule::day_off(),
            sunday: DaySchedule::day_off(),
        }
    }
}

impl WeeklySchedule {
    pub fn day(&self, weekday: Weekday) -> &DaySchedule {
        match weekday {
            Weekday::Mon => &self.monday,
            Weekday::Tue => &self.tuesday,
            Weekday::Wed => &self.wednesday,
            Weekday::Thu => &self.thursday,
            Weekday::Fri => &self.friday,
            Weekday::Sat => &self.saturday,
            Weekday::Sun => &self.sunday,
        }
    }

    pub fn set_day(&mut self, weekday: Weekday, schedule: DaySchedule) {
        let slot = match weekday {
            Weekday::Mon => &mut self.monday,
            Weekday::Tue => &mut self.tuesday,
            Weekday::Wed => &mut self.wednesday,
            Weekday::Thu => &mut self.thursday,
            Weekday::Fri => &mut self.friday,
            Weekday::Sat => &mut self.saturday,
            Weekday::Sun => &mut self.sunday,
        };
        *slot = schedule;
    }

    pub fn for_date(&self, date: NaiveDate) -> &DaySchedule {
        self.day(date.weekday())
    }

    fn days(&self) -> [(Weekday, &DaySchedule); 7] {
        [
            (Weekday::Mon, &self.monday),
            (Weekday::Tue, &self.tuesday),
            (Weekday::Wed, &self.wednesday),
            (Weekday::Thu, &self.thursday),
            (Weekday::Fri, &self.friday),
            (Weekday::Sat, &self.saturday),
            (Weekday::Sun, &self.sunday),
        ]
    }
}

/// Everything the scheduler needs besides the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Window used when a slot request names no hours.
    pub window: WorkingWindow,
    /// Slot length in minutes when a request names none.
    pub slot_duration: u32,
    /// Minutes between candidate starts and between booked marks.
    pub granularity: u32,
    pub slot_mode: SlotMode,
    pub week: WeeklySchedule,
    /// Block length used by the empty-hours computation.
    pub empty_slot_minutes: u32,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        SchedulerConfig {
            window: WorkingWindow::default(),
            slot_duration: 30,
            granularity: DEFAULT_GRANULARITY,
            slot_mode: SlotMode::default(),
            week: WeeklySchedule::default(),
            empty_slot_minutes: 60,
        }
    }
}

impl SchedulerConfig {
    /// Parse a JSON config. Missing fields take their defaults.
    ///
    /// # Errors
    /// Returns `ScheduleError::InvalidConfig` if the JSON does not decode or the
    /// result fails [`validate`](Self::validate).
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: SchedulerConfig =
            serde_json::from_str(json).map_err(|e| ScheduleError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// # Errors
    /// Returns `ScheduleError::InvalidConfig` when the granularity does not evenly
    /// divide an hour, a duration is zero, the default window reaches past 24:00,
    /// or a working day does not start before it ends.
    pub fn validate(&self) -> Result<()> {
        if self.granularity == 0 || 60 % self.granularity != 0 {
            return Err(ScheduleError::InvalidConfig(format!(
                "granularity {} does not evenly divide an hour",
                self.granularity
            )));
        }
        if self.slot_duration == 0 {
            return Err(ScheduleError::InvalidConfig(
                "slot_duration must be positive".to_string(),
            ));
        }
        if self.empty_slot_minutes == 0 {
            return Err(ScheduleError::InvalidConfig(
                "empty_slot_minutes must be positive".to_string(),
            ));
        }
        self.window
            .bounds()
            .map_err(|e| ScheduleError::InvalidConfig(format!("window: {e}")))?;
        for (weekday, day) in self.week.days() {
            if day.is_working_day && day.start >= day.end {
                return Err(ScheduleError::InvalidConfig(format!(
                    "{weekday} starts at {} but ends at {}",
                    day.start, day.end
                )));
            }
        }
        Ok(())
    }

    /// Slot parameters for a request, falling back to the configured duration.
    pub fn slot_params(&self, duration: Option<u32>) -> SlotParams {
        SlotParams {
            duration: duration.unwrap_or(self.slot_duration),
            granularity: self.granularity,
            mode: self.slot_mode,
        }
    }
}
