//! Background jobs run on cron schedules.

pub mod presence_sweep;
