use crate::algorithms::errors::{QueryError, QueryResult};
use crate::algorithms::queries::earliest_arrival::PlanQuery;
use crate::algorithms::queries::range::RangeQuery;
use crate::algorithms::RoutingAlgorithm;
use crate::dataset::builder::{BuildOptions, DatasetBuilder};
use crate::dataset::{Dataset, DatasetError};
use crate::journey::{Journey, Segment};
use crate::raptor::{RaptorAlgorithm, RaptorParams};
use crate::tests::{case_1, case_2, case_3, case_4, case_5, case_6, case_7, case_8};
use common::types::gtfs::GtfsRecords;
use common::types::{RouteIdx, StopIdx};
use common::util::date::Date;
use common::util::time::Time;
use std::str::FromStr;
use std::sync::Arc;

const FRIDAY: &str = "2024-09-06";

fn t(time: &str) -> Time {
    Time::from_str(time).unwrap()
}

fn d(date: &str) -> Date {
    Date::from_str(date).unwrap()
}

fn dataset(records: GtfsRecords) -> Dataset {
    let mut builder = DatasetBuilder::default();
    builder.load_records(records);
    builder.build(&BuildOptions::default());
    builder.into_dataset()
}

fn algorithm(records: GtfsRecords, params: RaptorParams) -> RaptorAlgorithm {
    RaptorAlgorithm::new(Arc::new(dataset(records)), params).unwrap()
}

fn with_max_days(max_days: usize) -> RaptorParams {
    RaptorParams { max_days, ..Default::default() }
}

fn plan(alg: &RaptorAlgorithm, from: &str, to: &str, date: &str, time: &str) -> QueryResult<Vec<Journey>> {
    alg.plan(PlanQuery {
        source_stop_id: from.into(),
        target_stop_id: to.into(),
        date: d(date),
        time: t(time),
    })
}

fn range(alg: &RaptorAlgorithm, from: &str, to: &str, date: &str) -> QueryResult<Vec<Journey>> {
    alg.range(RangeQuery { source_stop_id: from.into(), target_stop_id: to.into(), date: d(date) })
}

fn stop_idx(alg: &RaptorAlgorithm, stop_id: &str) -> StopIdx {
    alg.stop_mapping.translate_to_local(stop_id).unwrap()
}

fn times(journeys: &[Journey]) -> Vec<(Time, Time)> {
    journeys.iter().map(|journey| (journey.departure_time, journey.arrival_time)).collect()
}

fn assert_no_time_travel(journeys: &[Journey]) {
    for journey in journeys {
        for segment in &journey.segments {
            assert!(segment.departure_time() <= segment.arrival_time(), "{segment:?}");
        }
        for (earlier, later) in journey.segments.iter().zip(journey.segments.iter().skip(1)) {
            assert!(earlier.arrival_time() <= later.departure_time(), "{earlier:?} -> {later:?}");
            assert_eq!(earlier.target_stop_id(), later.source_stop_id());
        }
    }
}

#[test]
fn test_direct_trip() {
    let alg = algorithm(case_1::records(), RaptorParams::default());
    let journeys = plan(&alg, "A", "B", FRIDAY, "07:00:00").unwrap();

    assert_eq!(journeys.len(), 1);
    let journey = &journeys[0];
    assert_eq!(journey.segments.len(), 1);
    assert_eq!(journey.segments[0].trip_id(), Some("T1"));
    assert_eq!(journey.source_stop_id(), Some("A"));
    assert_eq!(journey.target_stop_id(), Some("B"));
    assert_eq!(journey.departure_time, t("08:00:00"));
    assert_eq!(journey.arrival_time, t("08:30:00"));
}

#[test]
fn test_trip_is_caught_at_departure_time() {
    let alg = algorithm(case_1::records(), RaptorParams::default());

    assert_eq!(plan(&alg, "A", "B", FRIDAY, "08:00:00").unwrap().len(), 1);
    assert!(plan(&alg, "A", "B", FRIDAY, "08:00:01").unwrap().is_empty());
}

#[test]
fn test_disconnected_stops() {
    let alg = algorithm(case_1::records(), RaptorParams::default());
    assert_eq!(plan(&alg, "B", "A", FRIDAY, "00:00:00"), Ok(vec![]));
}

#[test]
fn test_unknown_stops() {
    let alg = algorithm(case_1::records(), RaptorParams::default());

    assert_eq!(plan(&alg, "Z", "B", FRIDAY, "07:00:00"), Err(QueryError::UnknownStop("Z".into())));
    assert_eq!(plan(&alg, "A", "Z", FRIDAY, "07:00:00"), Err(QueryError::UnknownStop("Z".into())));
    assert_eq!(range(&alg, "Z", "B", FRIDAY), Err(QueryError::UnknownStop("Z".into())));
}

#[test]
fn test_faster_trip_of_another_route() {
    let alg = algorithm(case_2::records(), RaptorParams::default());
    let journeys = plan(&alg, "A", "C", FRIDAY, "07:00:00").unwrap();

    // T1 departs earlier, but the express arrives first
    assert_eq!(journeys.len(), 1);
    assert_eq!(journeys[0].segments[0].trip_id(), Some("X1"));
    assert_eq!(times(&journeys), [(t("08:10:00"), t("08:30:00"))]);
}

#[test]
fn test_intermediate_stop() {
    let alg = algorithm(case_2::records(), RaptorParams::default());
    let journeys = plan(&alg, "A", "B", FRIDAY, "08:30:00").unwrap();

    assert_eq!(journeys.len(), 1);
    assert_eq!(journeys[0].segments[0].trip_id(), Some("T2"));
    assert_eq!(times(&journeys), [(t("09:00:00"), t("09:20:00"))]);
}

#[test]
fn test_transfer_via_footpath() {
    let alg = algorithm(case_3::records(), RaptorParams::default());
    let journeys = plan(&alg, "A", "D", FRIDAY, "07:00:00").unwrap();

    // One journey per number of trips: the slow direct trip and the faster one with a transfer
    assert_eq!(journeys.len(), 2);
    assert_eq!(journeys[0].number_of_trips(), 1);
    assert_eq!(journeys[0].segments[0].trip_id(), Some("S1"));
    assert_eq!(journeys[0].arrival_time, t("10:00:00"));

    let journey = &journeys[1];
    assert_eq!(journey.number_of_trips(), 2);
    assert_eq!(journey.segments.len(), 3);
    assert_eq!(journey.segments[0].trip_id(), Some("T1"));
    assert!(matches!(journey.segments[1], Segment::Walk { .. }));
    assert_eq!(journey.segments[1].trip_id(), None);
    assert_eq!(journey.segments[1].departure_time(), journey.segments[0].arrival_time());
    assert_eq!(journey.segments[1].arrival_time(), t("08:32:00"));
    assert_eq!(journey.segments[2].trip_id(), Some("T2"));
    assert_eq!(journey.arrival_time, t("09:00:00"));
    assert_no_time_travel(&journeys);
}

#[test]
fn test_transfer_via_generated_footpath() {
    let alg = algorithm(case_3::records_without_transfers(), RaptorParams::default());
    let journeys = plan(&alg, "A", "D", FRIDAY, "07:00:00").unwrap();

    let journey = journeys.last().unwrap();
    assert_eq!(journey.segments.len(), 3);

    let b = stop_idx(&alg, "B");
    let walking_time = alg.dataset().footpaths_of(b)[0].walking_time;
    let walk = &journey.segments[1];
    assert_eq!(walk.arrival_time().as_secs() - walk.departure_time().as_secs(), walking_time);
}

#[test]
fn test_max_rounds_limits_trips() {
    let params = RaptorParams { max_rounds: 1, ..Default::default() };
    let alg = algorithm(case_3::records(), params);
    let journeys = plan(&alg, "A", "D", FRIDAY, "07:00:00").unwrap();

    assert_eq!(journeys.len(), 1);
    assert_eq!(journeys[0].segments[0].trip_id(), Some("S1"));
}

#[test]
fn test_range_sorted_and_non_dominated() {
    let alg = algorithm(case_2::records(), RaptorParams::default());
    let journeys = range(&alg, "A", "C", FRIDAY).unwrap();

    assert_eq!(times(&journeys), [
        (t("08:10:00"), t("08:30:00")),
        (t("09:00:00"), t("09:40:00")),
    ]);
    assert_eq!(journeys[0].segments[0].trip_id(), Some("X1"));
    assert_eq!(journeys[1].segments[0].trip_id(), Some("T2"));

    for a in &journeys {
        for b in &journeys {
            let dominates = b.departure_time >= a.departure_time
                && b.arrival_time <= a.arrival_time
                && (b.departure_time > a.departure_time || b.arrival_time < a.arrival_time);
            assert!(!dominates);
        }
    }
}

#[test]
fn test_range_drops_dominated_journeys() {
    let alg = algorithm(case_3::records(), RaptorParams::default());
    let journeys = range(&alg, "A", "D", FRIDAY).unwrap();

    // S1 departs at the same time as T1, but arrives later
    assert_eq!(times(&journeys), [(t("08:00:00"), t("09:00:00"))]);
    assert_eq!(journeys[0].number_of_trips(), 2);
}

#[test]
fn test_range_without_connection() {
    let alg = algorithm(case_2::records(), RaptorParams::default());
    assert_eq!(range(&alg, "C", "A", FRIDAY), Ok(vec![]));
}

#[test]
fn test_trip_across_midnight() {
    let alg = algorithm(case_4::records(), with_max_days(1));
    let journeys = plan(&alg, "A", "B", FRIDAY, "23:00:00").unwrap();

    assert_eq!(journeys.len(), 1);
    assert_eq!(journeys[0].segments[0].trip_id(), Some("N1"));
    assert_eq!(journeys[0].arrival_time, Time::from(87_600));
    assert_eq!(journeys[0].arrival_time.to_string(), "24:20:00");
}

#[test]
fn test_next_day_trip() {
    let single_day = algorithm(case_4::records(), with_max_days(1));
    assert_eq!(plan(&single_day, "A", "B", FRIDAY, "23:55:00"), Ok(vec![]));

    let two_days = algorithm(case_4::records(), with_max_days(2));
    let journeys = plan(&two_days, "A", "B", FRIDAY, "23:55:00").unwrap();

    assert_eq!(journeys.len(), 1);
    assert_eq!(journeys[0].segments[0].trip_id(), Some("M1"));
    assert_eq!(journeys[0].departure_time, Time::from(86_400 + 6 * 3600));
    assert_eq!(journeys[0].arrival_time, Time::from(86_400 + 6 * 3600 + 1800));
}

#[test]
fn test_overnight_trip_found_from_midnight_of_next_day() {
    // The night trip doesn't run on friday, and has already left by 23:40 on any day
    let single_day = algorithm(case_8::records(), with_max_days(1));
    assert_eq!(plan(&single_day, "A", "B", FRIDAY, "23:40:00"), Ok(vec![]));

    // Saturday is searched from 00:00:00 on, where the trip departs at 85000 and arrives at 90200
    let two_days = algorithm(case_8::records(), with_max_days(2));
    let journeys = plan(&two_days, "A", "B", FRIDAY, "23:40:00").unwrap();

    assert_eq!(journeys.len(), 1);
    assert_eq!(journeys[0].segments[0].trip_id(), Some("N"));
    assert_eq!(journeys[0].departure_time, Time::from(86_400 + 85_000));
    assert_eq!(journeys[0].arrival_time, Time::from(86_400 + 90_200));

    // The same trip, asked for on saturday itself
    let journeys = plan(&single_day, "A", "B", "2024-09-07", "00:00:00").unwrap();
    assert_eq!(times(&journeys), [(Time::from(85_000), Time::from(90_200))]);
}

#[test]
fn test_calendar_exceptions() {
    let alg = algorithm(case_5::records(), with_max_days(1));
    let runs = |date: &str| !plan(&alg, "X", "Y", date, "09:00:00").unwrap().is_empty();

    // regular thursday
    assert!(runs("2024-09-05"));
    // friday, but removed by a calendar date
    assert!(!runs("2024-09-06"));
    // saturday, but added by a calendar date
    assert!(runs("2024-09-07"));
    assert!(!runs("2024-09-08"));
    // after the calendar ends
    assert!(!runs("2025-01-02"));
}

#[test]
fn test_excluded_day_falls_back_to_next_day() {
    let alg = algorithm(case_5::records(), with_max_days(2));
    let journeys = plan(&alg, "X", "Y", FRIDAY, "09:00:00").unwrap();

    assert_eq!(journeys.len(), 1);
    assert_eq!(journeys[0].departure_time, Time::from(86_400 + 10 * 3600));
}

#[test]
fn test_deterministic() {
    let first = algorithm(case_3::records(), RaptorParams::default());
    let second = algorithm(case_3::records(), RaptorParams::default());

    let expected = plan(&first, "A", "D", FRIDAY, "07:00:00").unwrap();
    assert_eq!(plan(&first, "A", "D", FRIDAY, "07:00:00").unwrap(), expected);
    assert_eq!(plan(&second, "A", "D", FRIDAY, "07:00:00").unwrap(), expected);
    assert_eq!(range(&first, "A", "D", FRIDAY), range(&second, "A", "D", FRIDAY));
}

#[test]
fn test_arrivals_never_get_worse() {
    let alg = algorithm(case_3::records(), RaptorParams::default());
    let source = stop_idx(&alg, "A");
    let target = stop_idx(&alg, "D");
    let state = alg.run(source, target, d(FRIDAY), t("07:00:00"));

    assert!(state.k >= 2);
    for k in 1..=state.k {
        for (current, previous) in state.k_arrivals[k].iter().zip(&state.k_arrivals[k - 1]) {
            assert!(current <= previous);
        }
    }
}

#[test]
fn test_no_time_travel() {
    let cases = [
        (algorithm(case_2::records(), RaptorParams::default()), "A", "C"),
        (algorithm(case_3::records(), RaptorParams::default()), "A", "D"),
        (algorithm(case_3::records_without_transfers(), RaptorParams::default()), "A", "D"),
        (algorithm(case_4::records(), with_max_days(2)), "A", "B"),
    ];

    for (alg, from, to) in &cases {
        for time in ["00:00:00", "07:00:00", "08:05:00", "23:55:00"] {
            assert_no_time_travel(&plan(alg, from, to, FRIDAY, time).unwrap());
        }
        assert_no_time_travel(&range(alg, from, to, FRIDAY).unwrap());
    }
}

#[test]
fn test_concurrent_queries() {
    let alg = algorithm(case_3::records(), RaptorParams::default());
    let expected = plan(&alg, "A", "D", FRIDAY, "07:00:00").unwrap();

    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| scope.spawn(|| plan(&alg, "A", "D", FRIDAY, "07:00:00").unwrap()))
            .collect();

        for handle in handles {
            assert_eq!(handle.join().unwrap(), expected);
        }
    });
}

#[test]
fn test_rejects_invalid_dataset() {
    let mut invalid = dataset(case_2::records());
    invalid.route_stops[0] = StopIdx(42);

    let res = RaptorAlgorithm::new(Arc::new(invalid), RaptorParams::default());
    assert!(matches!(res, Err(DatasetError::StopOutOfBounds(StopIdx(42)))));
}

#[test]
fn test_earliest_trip() {
    let line = RouteIdx(0);
    let friday = d(FRIDAY);

    let alg = algorithm(case_2::records(), with_max_days(1));
    let trip = |position: usize, min_time: &str| alg.earliest_trip(line, position, friday, t(min_time));

    assert_eq!(trip(0, "00:00:00").map(|trip| (trip.trip_offset, trip.day_shift)), Some((0, 0)));
    assert_eq!(trip(0, "08:00:01").map(|trip| trip.trip_offset), Some(1));
    assert_eq!(trip(2, "08:40:00").map(|trip| trip.trip_offset), Some(0));
    assert_eq!(trip(0, "09:00:01"), None);

    let alg = algorithm(case_2::records(), with_max_days(2));
    let next_day = alg.earliest_trip(line, 0, friday, t("09:00:01")).unwrap();
    assert_eq!((next_day.trip_offset, next_day.day_shift), (0, 86_400));
}

#[test]
fn test_build_queue() {
    let alg = algorithm(case_2::records(), RaptorParams::default());
    let [a, b, c] = ["A", "B", "C"].map(|stop_id| stop_idx(&alg, stop_id));

    assert_eq!(alg.build_queue(&[a]), [(RouteIdx(0), 0), (RouteIdx(1), 0)]);
    // each route is scanned from its earliest marked stop
    assert_eq!(alg.build_queue(&[c, b]), [(RouteIdx(0), 1), (RouteIdx(1), 1)]);
    assert!(alg.build_queue(&[]).is_empty());
}

fn trip_ids(journey: &Journey) -> Vec<&str> {
    journey.segments.iter().filter_map(|segment| segment.trip_id()).collect()
}

#[test]
fn test_stays_on_trip_waiting_at_stop() {
    for max_rounds in [2, 10] {
        let alg = algorithm(case_6::records(), RaptorParams { max_rounds, ..Default::default() });
        let journeys = plan(&alg, "A", "C", FRIDAY, "06:00:00").unwrap();

        // Z reaches B after T1 arrived there. T1 is boarded at P anyway and must not be swapped for T2.
        assert_eq!(journeys.len(), 1, "max_rounds = {max_rounds}");
        assert_eq!(trip_ids(&journeys[0]), ["Y", "T1"]);
        assert_eq!(journeys[0].departure_time, t("07:30:00"));
        assert_eq!(journeys[0].segments[1].departure_time(), t("08:00:00"));
        assert_eq!(journeys[0].arrival_time, t("08:40:00"));
        assert_no_time_travel(&journeys);
    }
}

#[test]
fn test_boarding_at_stop_with_dwell_time() {
    let alg = algorithm(case_6::records(), RaptorParams::default());

    // The journey starts when T1 leaves B, not when it arrives there
    let journeys = plan(&alg, "B", "C", FRIDAY, "08:15:00").unwrap();
    assert_eq!(times(&journeys), [(t("08:30:00"), t("08:40:00"))]);
    assert_eq!(journeys[0].segments[0].trip_id(), Some("T1"));
}

#[test]
fn test_trip_departing_before_arrival_is_not_boarded_late() {
    let alg = algorithm(case_7::records(), RaptorParams::default());
    let journeys = plan(&alg, "A", "C", FRIDAY, "07:00:00").unwrap();

    // T is listed to leave B at 08:05, before Z gets there
    assert_eq!(journeys.len(), 1);
    assert_eq!(trip_ids(&journeys[0]), ["Z", "T2"]);
    assert_eq!(journeys[0].arrival_time, t("09:30:00"));
    assert_no_time_travel(&journeys);

    // Starting at B early enough, T is still taken at its listed departure
    let journeys = plan(&alg, "B", "C", FRIDAY, "08:00:00").unwrap();
    assert_eq!(times(&journeys), [(t("08:05:00"), t("08:40:00"))]);
}
