//! Record types the CLI can materialize.

use chrono::NaiveDateTime;
use clap::ValueEnum;
use rowmap::record;
use serde::Serialize;
use uuid::Uuid;

/// General-purpose record over columns `A` to `D`.
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct Dto {
    pub a: i32,
    pub b: Option<i32>,
    pub c: Option<i16>,
    pub d: Option<String>,
}

record! {
    Dto {
        a: i32 => "A",
        b: Option<i32> => "B",
        c: Option<i16> => "C",
        d: Option<String> => "D",
    }
}

/// Sensor reading keyed by column names in snake case.
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct Measurement {
    pub id: i64,
    pub sensor: Uuid,
    pub taken_at: Option<NaiveDateTime>,
    pub value: Option<f64>,
}

record! {
    Measurement {
        id: i64,
        sensor: Uuid,
        taken_at: Option<NaiveDateTime>,
        value: Option<f64>,
    }
}

/// Record selected on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RecordKind {
    Dto,
    Measurement,
}
