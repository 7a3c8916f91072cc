use serde::Serialize;
use tcodec::Time;

use crate::field::FieldMeta;
use crate::indicators::Indicators;
use crate::writer::IndicatorRow;

/// An enriched output row: the source event plus the standard columns.
#[derive(Debug, Clone, Default, Serialize)]
pub struct LogRow<E> {
    /// Source-specific event, flattened into the row
    #[serde(flatten)]
    pub event: E,

    #[serde(rename = "p_log_type")]
    pub log_type: String,

    /// Normalized event time; `null` when the event carries none
    #[serde(rename = "p_event_time")]
    pub event_time: Time,

    #[serde(rename = "p_parse_time")]
    pub parse_time: Time,

    #[serde(flatten)]
    pub indicators: Indicators,
}

impl<E> LogRow<E> {
    pub fn new(log_type: impl Into<String>, event: E, parse_time: Time) -> Self {
        Self {
            event,
            log_type: log_type.into(),
            event_time: Time::ZERO,
            parse_time,
            indicators: Indicators::new(),
        }
    }
}

impl<E> IndicatorRow for LogRow<E> {
    fn append_indicator(&mut self, meta: &FieldMeta, values: &[&str]) {
        self.indicators.append_indicator(meta, values);
    }
}
