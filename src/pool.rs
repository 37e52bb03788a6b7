//! Candidate argument values.
//!
//! The generator never invents values on its own; it asks a [`ValuePool`] for
//! every candidate of the kinds a slot accepts. The pool is an external
//! capability: anything implementing the trait can stand in for it, as long as
//! it answers with a finite sequence in a stable order. [`StaticValuePool`]
//! is the in-memory implementation used by the binary and the tests, and
//! [`StaticValuePool::standard`] fills it with a library of typed literals.

use chrono::{Datelike, FixedOffset, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::characteristic::{Characteristic, CharacteristicSet};
use crate::datatype::{ValueKind, ValueKinds};

// chrono prefixes years past 9999 with a sign, engines do not expect one
fn iso_date(date: NaiveDate) -> String {
    format!("{:04}-{:02}-{:02}", date.year(), date.month(), date.day())
}

// ------------- Candidate -------------
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Candidate {
    syntax: String,
    kind: ValueKind,
    characteristics: CharacteristicSet,
}

impl Candidate {
    pub fn new(
        syntax: impl Into<String>,
        kind: ValueKind,
        characteristics: CharacteristicSet,
    ) -> Self {
        Self {
            syntax: syntax.into(),
            kind,
            characteristics,
        }
    }
    pub fn syntax(&self) -> &str {
        &self.syntax
    }
    pub fn kind(&self) -> ValueKind {
        self.kind
    }
    pub fn characteristics(&self) -> &CharacteristicSet {
        &self.characteristics
    }
}
impl fmt::Display for Candidate {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}::<{}>", self.syntax, self.kind)
    }
}

pub trait ValuePool: Send + Sync {
    /// All candidates whose kind is in `kinds`, in the pool's own stable order.
    fn candidates(&self, kinds: ValueKinds) -> Vec<Candidate>;
}

// ------------- StaticValuePool -------------
#[derive(Debug, Default, Clone)]
pub struct StaticValuePool {
    kept: Vec<Candidate>,
}

impl StaticValuePool {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn keep(&mut self, candidate: Candidate) -> &mut Self {
        self.kept.push(candidate);
        self
    }
    pub fn len(&self) -> usize {
        self.kept.len()
    }
    pub fn is_empty(&self) -> bool {
        self.kept.is_empty()
    }

    fn literal(&mut self, kind: ValueKind, text: String, characteristics: &[Characteristic]) {
        self.kept.push(Candidate::new(
            format!("{} '{}'", kind.name(), text),
            kind,
            CharacteristicSet::of(characteristics),
        ));
    }
    fn null(&mut self, kind: ValueKind, type_name: &str) {
        self.kept.push(Candidate::new(
            format!("NULL::{type_name}"),
            kind,
            CharacteristicSet::of(&[Characteristic::Null]),
        ));
    }
    fn date(&mut self, y: i32, m: u32, d: u32, characteristics: &[Characteristic]) {
        if let Some(date) = NaiveDate::from_ymd_opt(y, m, d) {
            self.literal(ValueKind::Date, iso_date(date), characteristics);
        }
    }
    fn timestamp(&mut self, at: Option<NaiveDateTime>, characteristics: &[Characteristic]) {
        if let Some(at) = at {
            self.literal(
                ValueKind::Timestamp,
                format!("{} {}", iso_date(at.date()), at.time().format("%H:%M:%S%.f")),
                characteristics,
            );
        }
    }
    fn timestamp_tz(
        &mut self,
        at: Option<NaiveDateTime>,
        offset_secs: i32,
        characteristics: &[Characteristic],
    ) {
        let zoned = FixedOffset::east_opt(offset_secs)
            .zip(at)
            .and_then(|(offset, at)| at.and_local_timezone(offset).single());
        if let Some(zoned) = zoned {
            self.literal(
                ValueKind::TimestampTz,
                format!(
                    "{} {}{}",
                    iso_date(zoned.date_naive()),
                    zoned.time().format("%H:%M:%S%.f"),
                    zoned.offset()
                ),
                characteristics,
            );
        }
    }

    /// The standard library of literals for every kind the built-in catalog uses.
    pub fn standard() -> Self {
        use Characteristic::*;
        let mut pool = Self::new();
        let at = |y, mo, d, h, mi, s, us| {
            NaiveDate::from_ymd_opt(y, mo, d).and_then(|date| date.and_hms_micro_opt(h, mi, s, us))
        };

        pool.date(2024, 2, 29, &[]);
        pool.date(1, 1, 1, &[]);
        pool.date(99999, 12, 31, &[MaxValue, LargeValue]);
        pool.null(ValueKind::Date, "DATE");

        pool.literal(ValueKind::Time, "00:00:00".into(), &[]);
        pool.literal(ValueKind::Time, "12:34:56.789".into(), &[]);
        pool.literal(ValueKind::Time, "23:59:59.999999".into(), &[MaxValue]);
        pool.null(ValueKind::Time, "TIME");

        pool.timestamp(at(2024, 2, 29, 11, 50, 0, 0), &[]);
        pool.timestamp(at(1, 1, 1, 0, 0, 0, 0), &[]);
        pool.timestamp(at(99999, 12, 31, 23, 59, 59, 999_999), &[MaxValue, LargeValue]);
        pool.null(ValueKind::Timestamp, "TIMESTAMP");

        pool.timestamp_tz(at(2024, 2, 29, 11, 50, 0, 0), 3600, &[]);
        pool.timestamp_tz(at(1999, 12, 31, 23, 59, 59, 123_456), -5 * 3600, &[]);
        pool.timestamp_tz(at(99999, 12, 31, 23, 59, 59, 999_999), 0, &[MaxValue, LargeValue]);
        pool.null(ValueKind::TimestampTz, "TIMESTAMPTZ");

        pool.literal(ValueKind::Interval, "1 day".into(), &[]);
        pool.literal(ValueKind::Interval, "2 hours 30 minutes".into(), &[]);
        pool.literal(ValueKind::Interval, "-3 hours".into(), &[Negative]);
        pool.literal(ValueKind::Interval, "0 seconds".into(), &[Zero]);
        pool.literal(ValueKind::Interval, "2 months".into(), &[IntervalWithMonths]);
        pool.literal(ValueKind::Interval, "1 year 2 months 3 days".into(), &[IntervalWithMonths]);
        pool.literal(
            ValueKind::Interval,
            "178000000 years".into(),
            &[IntervalWithMonths, LargeValue, MaxValue],
        );
        pool.null(ValueKind::Interval, "INTERVAL");

        for (syntax, characteristics) in [
            ("0", &[Zero][..]),
            ("1", &[One][..]),
            ("-1", &[Negative][..]),
            ("0.5", &[Decimal][..]),
            ("0.000001", &[Decimal, TinyValue][..]),
            ("1e100", &[LargeValue][..]),
            ("9223372036854775807", &[LargeValue, MaxValue][..]),
        ] {
            let characteristics = CharacteristicSet::of(characteristics);
            pool.keep(Candidate::new(syntax, ValueKind::Numeric, characteristics));
        }
        pool.null(ValueKind::Numeric, "NUMERIC");

        for (syntax, characteristics) in [
            ("'abc'", &[][..]),
            ("''", &[TextEmpty][..]),
            ("' a''b\t '", &[TextWithSpecialChars][..]),
        ] {
            let characteristics = CharacteristicSet::of(characteristics);
            pool.keep(Candidate::new(syntax, ValueKind::Text, characteristics));
        }
        pool.null(ValueKind::Text, "TEXT");

        pool
    }
}

impl ValuePool for StaticValuePool {
    fn candidates(&self, kinds: ValueKinds) -> Vec<Candidate> {
        self.kept
            .iter()
            .filter(|c| kinds.admits(c.kind()))
            .cloned()
            .collect()
    }
}
