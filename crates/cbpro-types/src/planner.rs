//! Candle request planning
//!
//! The candles endpoint returns at most [`MAX_CANDLES_PER_REQUEST`] candles
//! per call and rejects larger spans. [`IntervalPlan`] splits an arbitrary
//! [`TimeRange`] into consecutive [`RequestWindow`]s that each fit in one
//! request.
//!
//! Windows are inclusive on both ends and neighbouring windows share their
//! boundary second, so the exchange may return the boundary candle twice.
//!
//! # Example
//!
//! ```
//! use cbpro_types::{Granularity, IntervalPlan, TimeRange};
//!
//! let range = TimeRange::new(0, 900 * 300);
//! let plan = IntervalPlan::new(range, Granularity::FiveMinutes)?;
//!
//! let windows: Vec<_> = plan.windows().map(|w| (w.start, w.end)).collect();
//! assert_eq!(windows, vec![(0, 90_000), (90_000, 180_000), (180_000, 270_000)]);
//! # Ok::<(), cbpro_types::PlanError>(())
//! ```

use std::iter::FusedIterator;

use crate::enums::Granularity;
use crate::error::{PlanError, PlanResult};
use crate::range::{RequestWindow, TimeRange};

/// Maximum number of candles the exchange returns for a single request
pub const MAX_CANDLES_PER_REQUEST: u32 = 300;

/// Validated plan for fetching a time range in API-sized windows
///
/// The plan is cheap to copy and can be iterated any number of times;
/// each call to [`IntervalPlan::windows`] starts from the beginning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntervalPlan {
    range: TimeRange,
    granularity: Granularity,
    window_span: i64,
}

impl IntervalPlan {
    /// Plan a range using the exchange's per-request candle limit
    pub fn new(range: TimeRange, granularity: Granularity) -> PlanResult<Self> {
        Self::with_max_candles(range, granularity, MAX_CANDLES_PER_REQUEST)
    }

    /// Plan a range with a custom per-request candle limit
    pub fn with_max_candles(
        range: TimeRange,
        granularity: Granularity,
        max_candles: u32,
    ) -> PlanResult<Self> {
        if max_candles == 0 {
            return Err(PlanError::InvalidMaxCandles);
        }
        if range.start > range.end {
            return Err(PlanError::InvalidRange {
                start: range.start,
                end: range.end,
            });
        }

        Ok(Self {
            range,
            granularity,
            window_span: i64::from(max_candles) * i64::from(granularity.as_secs()),
        })
    }

    /// Plan from raw values, validating the granularity first
    pub fn from_raw(start: i64, end: i64, granularity: u32) -> PlanResult<Self> {
        let granularity = Granularity::try_from(granularity)?;
        Self::new(TimeRange::new(start, end), granularity)
    }

    /// The planned range
    pub fn range(&self) -> TimeRange {
        self.range
    }

    /// The candle granularity
    pub fn granularity(&self) -> Granularity {
        self.granularity
    }

    /// Seconds covered by one full window
    pub fn window_span(&self) -> i64 {
        self.window_span
    }

    /// Iterate the request windows in ascending time order
    pub fn windows(&self) -> Windows {
        Windows {
            next_start: Some(self.range.start),
            end: self.range.end,
            span: self.window_span,
        }
    }

    /// Number of windows (and therefore requests) in this plan
    pub fn len(&self) -> usize {
        self.windows().len()
    }

    /// Always false: even an empty span yields one degenerate window
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<'a> IntoIterator for &'a IntervalPlan {
    type Item = RequestWindow;
    type IntoIter = Windows;

    fn into_iter(self) -> Self::IntoIter {
        self.windows()
    }
}

/// Iterator over the windows of an [`IntervalPlan`]
#[derive(Debug, Clone)]
pub struct Windows {
    next_start: Option<i64>,
    end: i64,
    span: i64,
}

impl Iterator for Windows {
    type Item = RequestWindow;

    fn next(&mut self) -> Option<Self::Item> {
        let cursor = self.next_start?;
        let window_end = cursor.saturating_add(self.span).min(self.end);

        // The window that reaches `end` is the last one
        self.next_start = (window_end < self.end).then_some(window_end);

        Some(RequestWindow::new(cursor, window_end))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = match self.next_start {
            None => 0,
            Some(cursor) if cursor >= self.end => 1,
            Some(cursor) => {
                let span = self.end.abs_diff(cursor);
                span.div_ceil(self.span as u64) as usize
            }
        };
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Windows {}

impl FusedIterator for Windows {}

#[cfg(test)]
mod tests {
    use super::*;

    const JAN_1_2021: i64 = 1_609_459_200;

    fn collect(plan: &IntervalPlan) -> Vec<RequestWindow> {
        plan.windows().collect()
    }

    /// Checks coverage, ordering, and the size bound for one plan
    fn assert_plan_invariants(plan: &IntervalPlan, max_candles: u64) {
        let windows = collect(plan);
        let range = plan.range();
        let granularity = plan.granularity();

        assert!(!windows.is_empty());
        assert_eq!(windows.len(), plan.len());
        assert_eq!(windows.first().unwrap().start, range.start);
        assert_eq!(windows.last().unwrap().end, range.end);

        for window in &windows {
            assert!(window.start <= window.end, "inverted window {window}");
            assert!(window.end <= range.end, "window {window} overshoots end");
            assert!(window.candle_count(granularity) <= max_candles);
        }

        // Contiguous: each window starts where the previous one ended
        for pair in windows.windows(2) {
            assert_eq!(pair[0].end, pair[1].start);
            assert!(pair[0].start < pair[1].start);
        }
    }

    #[test]
    fn test_900_candles_split_into_three_windows() {
        let range = TimeRange::new(JAN_1_2021, JAN_1_2021 + 900 * 300);
        let plan = IntervalPlan::new(range, Granularity::FiveMinutes).unwrap();

        let windows = collect(&plan);
        assert_eq!(windows.len(), 3);
        assert_eq!(windows[0], RequestWindow::new(JAN_1_2021, JAN_1_2021 + 90_000));
        assert_eq!(windows[1], RequestWindow::new(JAN_1_2021 + 90_000, JAN_1_2021 + 180_000));
        assert_eq!(windows[2], RequestWindow::new(JAN_1_2021 + 180_000, JAN_1_2021 + 270_000));

        for window in &windows {
            assert_eq!(window.candle_count(Granularity::FiveMinutes), 300);
        }
        assert_plan_invariants(&plan, 300);
    }

    #[test]
    fn test_single_window_when_range_fits() {
        let range = TimeRange::new(JAN_1_2021, JAN_1_2021 + 3600 * 24);
        let plan = IntervalPlan::new(range, Granularity::OneHour).unwrap();

        let windows = collect(&plan);
        assert_eq!(windows, vec![RequestWindow::new(range.start, range.end)]);
    }

    #[test]
    fn test_exactly_max_candles_is_one_window() {
        let range = TimeRange::new(0, 300 * 60);
        let plan = IntervalPlan::new(range, Granularity::OneMinute).unwrap();
        assert_eq!(collect(&plan), vec![RequestWindow::new(0, 18_000)]);
    }

    #[test]
    fn test_one_second_over_max_adds_window() {
        let range = TimeRange::new(0, 300 * 60 + 1);
        let plan = IntervalPlan::new(range, Granularity::OneMinute).unwrap();

        let windows = collect(&plan);
        assert_eq!(
            windows,
            vec![RequestWindow::new(0, 18_000), RequestWindow::new(18_000, 18_001)]
        );
        assert_plan_invariants(&plan, 300);
    }

    #[test]
    fn test_degenerate_range() {
        let range = TimeRange::new(JAN_1_2021, JAN_1_2021);
        let plan = IntervalPlan::new(range, Granularity::OneDay).unwrap();

        assert_eq!(collect(&plan), vec![RequestWindow::new(JAN_1_2021, JAN_1_2021)]);
        assert_eq!(plan.len(), 1);
        assert!(!plan.is_empty());
    }

    #[test]
    fn test_inverted_range_rejected() {
        let range = TimeRange::new(JAN_1_2021 + 1, JAN_1_2021);
        let err = IntervalPlan::new(range, Granularity::OneMinute).unwrap_err();
        assert_eq!(
            err,
            PlanError::InvalidRange {
                start: JAN_1_2021 + 1,
                end: JAN_1_2021,
            }
        );
    }

    #[test]
    fn test_from_raw_rejects_unknown_granularity() {
        let err = IntervalPlan::from_raw(0, 100, 120).unwrap_err();
        assert_eq!(err, PlanError::InvalidGranularity { value: 120 });

        // Granularity is checked before the range
        let err = IntervalPlan::from_raw(100, 0, 7).unwrap_err();
        assert_eq!(err, PlanError::InvalidGranularity { value: 7 });
    }

    #[test]
    fn test_zero_max_candles_rejected() {
        let range = TimeRange::new(0, 100);
        let err = IntervalPlan::with_max_candles(range, Granularity::OneMinute, 0).unwrap_err();
        assert_eq!(err, PlanError::InvalidMaxCandles);
    }

    #[test]
    fn test_plan_is_restartable() {
        let range = TimeRange::new(0, 1_000_000);
        let plan = IntervalPlan::new(range, Granularity::FifteenMinutes).unwrap();

        let first: Vec<_> = plan.windows().collect();
        let second: Vec<_> = (&plan).into_iter().collect();
        assert_eq!(first, second);

        // A partially consumed iterator does not affect fresh ones
        let mut partial = plan.windows();
        partial.next();
        assert_eq!(partial.len(), first.len() - 1);
        assert_eq!(plan.windows().next(), first.first().copied());
    }

    #[test]
    fn test_iterator_is_fused() {
        let plan = IntervalPlan::new(TimeRange::new(0, 60), Granularity::OneMinute).unwrap();
        let mut windows = plan.windows();
        assert!(windows.next().is_some());
        assert!(windows.next().is_none());
        assert!(windows.next().is_none());
        assert_eq!(windows.len(), 0);
    }

    #[test]
    fn test_unaligned_ranges_hold_invariants() {
        let spans = [1, 59, 61, 17_999, 18_000, 18_001, 86_399, 1_234_567, 31_536_000];

        for &granularity in Granularity::all() {
            for &span in &spans {
                let range = TimeRange::new(JAN_1_2021 + 7, JAN_1_2021 + 7 + span);
                let plan = IntervalPlan::new(range, granularity).unwrap();
                assert_plan_invariants(&plan, 300);
            }
        }
    }

    #[test]
    fn test_custom_max_candles() {
        let range = TimeRange::new(0, 10 * 60);
        let plan = IntervalPlan::with_max_candles(range, Granularity::OneMinute, 4).unwrap();

        let bounds: Vec<_> = plan.windows().map(|w| (w.start, w.end)).collect();
        assert_eq!(bounds, vec![(0, 240), (240, 480), (480, 600)]);
        assert_plan_invariants(&plan, 4);
    }

    #[test]
    fn test_window_end_saturates_near_max() {
        let range = TimeRange::new(i64::MAX - 10, i64::MAX);
        let plan = IntervalPlan::new(range, Granularity::OneDay).unwrap();
        assert_eq!(collect(&plan), vec![RequestWindow::new(i64::MAX - 10, i64::MAX)]);
    }
}
