use gradingd::{
    rank, rank_ordered, GradeBand, GradingEngine, GradingPolicy, PolicyConfig, PolicySettings,
};
use rust_decimal::Decimal;
use serde_json::json;
use std::collections::{BTreeSet, HashMap};

fn d(s: &str) -> Decimal {
    s.parse().expect("decimal")
}

fn band(
    grade: &str,
    min: &str,
    max: &str,
    gpa: Option<&str>,
    is_passing: bool,
    order: i64,
) -> GradeBand {
    GradeBand {
        grade: grade.to_string(),
        min_score: d(min),
        max_score: d(max),
        gpa_points: gpa.map(d),
        points: None,
        is_passing,
        sort_order: order,
    }
}

fn abf_bands() -> Vec<GradeBand> {
    vec![
        band("A", "80", "100", None, true, 1),
        band("B", "60", "79.99", None, true, 2),
        band("F", "0", "59.99", None, false, 3),
    ]
}

fn engine(min_subjects: i64, priority: &[&str]) -> GradingEngine {
    let policy = GradingPolicy::new(
        PolicySettings {
            min_subjects_to_pass: min_subjects,
            priority_subjects: priority.iter().map(|s| s.to_string()).collect::<BTreeSet<_>>(),
            ..PolicySettings::default()
        },
        abf_bands(),
    )
    .expect("valid policy");
    GradingEngine::new(policy)
}

fn subject_map(pairs: &[(&str, &str)]) -> HashMap<String, Option<Decimal>> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), Some(d(v))))
        .collect()
}

#[test]
fn scenario_a_single_score_lookup() {
    let e = engine(0, &[]);
    let a = e.calculate_grade(d("85")).expect("85 is graded");
    assert_eq!(a.grade, "A");
    assert!(a.is_passing);
    let f = e.calculate_grade(d("45")).expect("45 is graded");
    assert_eq!(f.grade, "F");
    assert!(!f.is_passing);
}

#[test]
fn every_score_inside_a_band_resolves_to_it() {
    let e = engine(0, &[]);
    for b in abf_bands() {
        let mut s = b.min_score;
        while s <= b.max_score {
            assert_eq!(
                e.calculate_grade(s).map(|r| r.grade.as_str()),
                Some(b.grade.as_str()),
                "score {}",
                s
            );
            s += d("0.25");
        }
        assert_eq!(
            e.calculate_grade(b.max_score).map(|r| r.grade.as_str()),
            Some(b.grade.as_str())
        );
    }
}

#[test]
fn scores_outside_the_scale_are_ungraded_and_failing() {
    let e = engine(0, &[]);
    for s in ["-0.01", "-50", "100.01", "250"] {
        assert!(e.calculate_grade(d(s)).is_none(), "score {}", s);
        assert!(!e.is_passing(d(s)));
    }
}

#[test]
fn is_passing_is_defined_by_the_band() {
    let e = engine(0, &[]);
    let mut s = d("-5");
    while s <= d("105") {
        let expected = e.calculate_grade(s).map(|b| b.is_passing).unwrap_or(false);
        assert_eq!(e.is_passing(s), expected, "score {}", s);
        s += d("0.5");
    }
}

#[test]
fn scenario_b_count_failure_and_priority_veto() {
    let e = engine(6, &["ENG"]);
    let r = e.calculate_overall_result(&subject_map(&[
        ("ENG", "35"),
        ("MAT", "75"),
        ("PHY", "65"),
        ("CHE", "70"),
        ("BIO", "60"),
        ("GEO", "80"),
    ]));
    assert_eq!(r.total_subjects, 6);
    assert_eq!(r.subjects_passed, 5);
    assert!(!r.meets_pass_criteria);

    // Seven subjects, six passing: the count check is satisfied and only the
    // failing priority subject holds the student back.
    let r = e.calculate_overall_result(&subject_map(&[
        ("ENG", "35"),
        ("MAT", "75"),
        ("PHY", "65"),
        ("CHE", "70"),
        ("BIO", "60"),
        ("GEO", "80"),
        ("HIS", "62"),
    ]));
    assert_eq!(r.subjects_passed, 6);
    assert!(!r.meets_pass_criteria);

    // Same marks with ENG passing certifies.
    let r = e.calculate_overall_result(&subject_map(&[
        ("ENG", "61"),
        ("MAT", "75"),
        ("PHY", "65"),
        ("CHE", "70"),
        ("BIO", "60"),
        ("GEO", "80"),
    ]));
    assert_eq!(r.subjects_passed, 6);
    assert!(r.meets_pass_criteria);
}

#[test]
fn absent_priority_subject_does_not_veto() {
    let e = engine(2, &["ENG"]);
    let mut scores = subject_map(&[("MAT", "75"), ("PHY", "65")]);
    scores.insert("ENG".to_string(), None);
    let r = e.calculate_overall_result(&scores);
    assert_eq!(r.total_subjects, 2);
    assert!(r.meets_pass_criteria);
}

#[test]
fn scenario_c_competition_ranking() {
    let scores: HashMap<String, Decimal> = [("s1", "85"), ("s2", "92"), ("s3", "78"), ("s4", "92")]
        .iter()
        .map(|(k, v)| (k.to_string(), d(v)))
        .collect();
    let ranked = rank(&scores);
    let r = |id: &str| ranked.get(id).map(|e| e.rank).expect("ranked");
    assert_eq!(r("s2"), 1);
    assert_eq!(r("s4"), 1);
    assert_eq!(r("s1"), 3);
    assert_eq!(r("s3"), 4);
}

#[test]
fn re_ranking_ranks_reproduces_tie_groups() {
    let scores: HashMap<String, Decimal> = [
        ("a", "70"),
        ("b", "88"),
        ("c", "70"),
        ("d", "91"),
        ("e", "88"),
        ("f", "88"),
        ("g", "12"),
    ]
    .iter()
    .map(|(k, v)| (k.to_string(), d(v)))
    .collect();
    let first = rank(&scores);

    // Lower rank is better, so negate to keep "higher score first".
    let as_scores: HashMap<String, Decimal> = first
        .iter()
        .map(|(k, e)| (k.clone(), -Decimal::from(e.rank)))
        .collect();
    let second = rank(&as_scores);

    for (id, entry) in &first {
        assert_eq!(second[id].rank, entry.rank, "entity {}", id);
    }

    let mut ranks: Vec<u32> = rank_ordered(&scores).iter().map(|e| e.rank).collect();
    ranks.sort_unstable();
    assert_eq!(ranks, vec![1, 2, 2, 2, 5, 5, 7]);
}

#[test]
fn scenario_d_four_point_gpa() {
    let policy = GradingPolicy::new(
        PolicySettings::default(),
        vec![
            band("A", "90", "100", Some("4.0"), true, 1),
            band("B", "80", "89.99", Some("3.0"), true, 2),
            band("C", "70", "79.99", Some("2.0"), true, 3),
            band("D", "60", "69.99", Some("1.0"), true, 4),
            band("F", "0", "59.99", Some("0.0"), false, 5),
        ],
    )
    .expect("valid policy");
    let e = GradingEngine::new(policy);
    let gpa = e.calculate_gpa(vec![d("95"), d("85"), d("75"), d("65")]);
    assert_eq!(gpa, d("2.5"));
}

#[test]
fn scenario_e_empty_scores() {
    let e = engine(6, &["ENG"]);
    let r = e.calculate_overall_result(&HashMap::<String, Option<Decimal>>::new());
    assert_eq!(r.total_subjects, 0);
    assert_eq!(r.subjects_passed, 0);
    assert_eq!(r.average_score, Decimal::ZERO);
    // The zero average is graded like any other score.
    assert_eq!(r.overall_grade.as_deref(), Some("F"));
    assert!(!r.meets_pass_criteria);

    // A scale with no band covering zero leaves the empty result ungraded.
    let policy = GradingPolicy::new(
        PolicySettings::default(),
        vec![band("P", "50", "100", None, true, 1)],
    )
    .expect("valid policy");
    let r = GradingEngine::new(policy)
        .calculate_overall_result(&HashMap::<String, Option<Decimal>>::new());
    assert_eq!(r.overall_grade, None);
}

#[test]
fn aggregation_ignores_insertion_order() {
    let e = engine(3, &["MAT"]);
    let pairs = [("ENG", "55"), ("MAT", "81"), ("PHY", "66.5"), ("CHE", "90")];

    let forward = subject_map(&pairs);
    let mut reversed: HashMap<String, Option<Decimal>> = HashMap::new();
    for (k, v) in pairs.iter().rev() {
        reversed.insert(k.to_string(), Some(d(v)));
    }

    let a = e.calculate_overall_result(&forward);
    let b = e.calculate_overall_result(&reversed);
    assert_eq!(a.average_score, b.average_score);
    assert_eq!(a.subjects_passed, b.subjects_passed);
    assert_eq!(a.meets_pass_criteria, b.meets_pass_criteria);
    assert_eq!(a, b);
    assert_eq!(a.average_score, d("73.125"));
    assert_eq!(a.overall_grade.as_deref(), Some("B"));
}

#[test]
fn declared_domain_does_not_clamp_lookup() {
    let policy = GradingPolicy::from_config(
        &serde_json::from_value::<PolicyConfig>(json!({
            "minScore": 0,
            "maxScore": 100,
            "bands": [
                { "grade": "X", "minScore": 100, "maxScore": 110, "isPassing": true },
                { "grade": "P", "minScore": 0, "maxScore": 99.99, "isPassing": true }
            ]
        }))
        .expect("config json"),
    )
    .expect("valid policy");
    let e = GradingEngine::new(policy);
    assert_eq!(e.calculate_grade(d("105")).map(|b| b.grade.as_str()), Some("X"));
}

#[test]
fn engine_is_shareable_across_threads() {
    let e = std::sync::Arc::new(engine(1, &[]));
    let handles: Vec<_> = (0..4)
        .map(|i| {
            let e = std::sync::Arc::clone(&e);
            std::thread::spawn(move || e.is_passing(Decimal::from(50 + i * 10)))
        })
        .collect();
    let passes: Vec<bool> = handles
        .into_iter()
        .map(|h| h.join().expect("thread"))
        .collect();
    assert_eq!(passes, vec![false, true, true, true]);
}
