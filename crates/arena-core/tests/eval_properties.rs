use arena_core::eval::{cost_quality, summarize, win_rate, EventTable};
use arena_core::model::{GenerationEvent, Rating};

fn ev(id: i64, prompt: &str, backend: &str, rating: Option<i64>) -> GenerationEvent {
    GenerationEvent {
        id,
        prompt: prompt.into(),
        backend_id: backend.into(),
        output: "out".into(),
        latency_ms: Some(10.0),
        tokens: Some(5),
        cost: Some(0.0),
        rating: rating.map(|r| Rating::new(r).unwrap()),
        created_at: format!("2026-01-01T00:00:{:02}.000000Z", 59 - id),
    }
}

fn mixed_table() -> EventTable {
    EventTable::from_events(vec![
        ev(1, "P1", "a", Some(5)),
        ev(2, "P1", "b", Some(3)),
        ev(3, "P2", "b", None),
        ev(4, "P2", "c", None),
        ev(5, "P3", "a", Some(2)),
        ev(6, "P3", "b", Some(2)),
        ev(7, "P4", "d", Some(4)),
    ])
}

#[test]
fn run_counts_cover_every_row() {
    let t = mixed_table();
    let total: usize = summarize(&t).iter().map(|s| s.run_count).sum();
    assert_eq!(total, t.len());
}

#[test]
fn unrated_rows_count_as_runs_but_not_ratings() {
    let t = mixed_table();
    let s = summarize(&t);
    let b = s.iter().find(|s| s.backend_id == "b").unwrap();
    assert_eq!(b.run_count, 3);
    assert_eq!(b.avg_rating, Some(2.5));

    let c = s.iter().find(|s| s.backend_id == "c").unwrap();
    assert_eq!(c.run_count, 1);
    assert_eq!(c.avg_rating, None);
}

#[test]
fn rated_groups_precede_unrated_groups() {
    let t = EventTable::from_events(vec![
        ev(1, "P", "unrated-1", None),
        ev(2, "P", "low", Some(1)),
        ev(3, "P", "unrated-2", None),
        ev(4, "P", "high", Some(5)),
    ]);
    let order: Vec<_> = summarize(&t).into_iter().map(|s| s.backend_id).collect();
    assert_eq!(order, vec!["high", "low", "unrated-1", "unrated-2"]);
}

#[test]
fn win_rates_sum_to_one() {
    let w = win_rate(&mixed_table());
    let sum: f64 = w.values().sum();
    assert!((sum - 1.0).abs() < 1e-9);
    // P1 -> a, P3 -> a and b, P4 -> d; P2 has no ratings
    assert!((w["a"] - 0.5).abs() < 1e-9);
    assert!((w["b"] - 0.25).abs() < 1e-9);
    assert!((w["d"] - 0.25).abs() < 1e-9);
    assert!(!w.contains_key("c"));
}

#[test]
fn tie_scenario_awards_every_co_maximal_backend() {
    let t = EventTable::from_events(vec![
        ev(1, "P", "A", Some(5)),
        ev(2, "P", "B", Some(5)),
        ev(3, "P", "C", Some(3)),
    ]);
    let w = win_rate(&t);
    assert_eq!(w.len(), 2);
    assert!((w["A"] - 0.5).abs() < 1e-9);
    assert!((w["B"] - 0.5).abs() < 1e-9);
}

#[test]
fn single_event_scenario() {
    let t = EventTable::from_events(vec![ev(1, "hello", "mock", Some(4))]);
    let s = summarize(&t);
    assert_eq!(s.len(), 1);
    assert_eq!(s[0].backend_id, "mock");
    assert_eq!(s[0].run_count, 1);
    assert_eq!(s[0].avg_rating, Some(4.0));

    let w = win_rate(&t);
    assert_eq!(w.len(), 1);
    assert_eq!(w["mock"], 1.0);
}

#[test]
fn cross_prompt_isolation() {
    let t = EventTable::from_events(vec![ev(1, "P1", "A", Some(2)), ev(2, "P2", "B", Some(5))]);
    let w = win_rate(&t);
    assert_eq!(w["A"], 0.5);
    assert_eq!(w["B"], 0.5);
}

#[test]
fn cost_quality_projects_two_fields_per_backend() {
    let pts = cost_quality(&mixed_table());
    let ids: Vec<_> = pts.iter().map(|p| p.backend_id.as_str()).collect();
    assert_eq!(ids, vec!["a", "b", "c", "d"]);
    assert_eq!(pts[0].avg_rating, Some(3.5));
    assert_eq!(pts[2].avg_rating, None);
    assert_eq!(pts[2].avg_cost, Some(0.0));
}

#[test]
fn aggregation_is_safe_across_threads() {
    let t = mixed_table();
    let expected = summarize(&t);
    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| scope.spawn(|| (summarize(&t), win_rate(&t))))
            .collect();
        for h in handles {
            let (s, w) = h.join().unwrap();
            assert_eq!(s, expected);
            assert_eq!(w.len(), 3);
        }
    });
}
