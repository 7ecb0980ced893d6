use notegraph_core::{infer_connections, infer_pair, ConnectionTier, Note};

fn note(id: &str, title: &str, content: &str, tags: &[&str]) -> Note {
    let tags = tags.iter().map(|tag| tag.to_string()).collect::<Vec<_>>();
    Note::new(id, title, content, &tags, "2026-01-01T00:00:00.000Z")
}

fn corpus() -> Vec<Note> {
    vec![
        note("1", "Intro to AI", "neural networks overview", &["ai", "ml"]),
        note("2", "Advanced AI", "transformers and attention", &["ai"]),
        note("3", "Machine learning", "gradient descent", &["machinelearning"]),
        note("4", "Learning plan", "learning resources", &["learning"]),
        note(
            "5",
            "Quantum computing basics",
            "superposition qubits",
            &[],
        ),
        note(
            "6",
            "Basics of quantum algorithms",
            "qubits gates",
            &[],
        ),
        note("7", "Groceries", "milk eggs bread", &["home"]),
    ]
}

#[test]
fn shared_tag_pair_uses_jaccard_with_floor() {
    let notes = vec![
        note("1", "Intro to AI", "", &["ai", "ml"]),
        note("2", "Advanced AI", "", &["ai"]),
    ];
    let connections = infer_connections(&notes);

    let conn = connections.get("1", "2").unwrap();
    assert_eq!(conn.tier, ConnectionTier::SharedTags);
    assert!((conn.strength - 0.5).abs() < 1e-12);
    assert_eq!(conn.reason, "Shared tags: #ai");
    assert_eq!(connections.len(), 1);
}

#[test]
fn weak_tag_overlap_is_floored() {
    let notes = vec![
        note("a", "", "", &["one", "two", "three"]),
        note("b", "", "", &["one", "four", "five"]),
    ];
    let conn = infer_pair(&notes[0], &notes[1]).unwrap();
    assert_eq!(conn.tier, ConnectionTier::SharedTags);
    assert!((conn.strength - 0.4).abs() < 1e-12);
}

#[test]
fn substring_tags_fall_back_to_related_tier() {
    let notes = vec![
        note("3", "", "", &["machinelearning"]),
        note("4", "", "", &["learning"]),
    ];
    let conn = infer_pair(&notes[0], &notes[1]).unwrap();
    assert_eq!(conn.tier, ConnectionTier::RelatedTags);
    assert!((conn.strength - 0.35).abs() < 1e-12);
    assert_eq!(conn.reason, "Related tags");
}

#[test]
fn keyword_pair_mentions_shared_terms() {
    let notes = vec![
        note("q1", "Quantum computing basics", "superposition qubits", &[]),
        note("q2", "Basics of quantum algorithms", "qubits gates", &[]),
    ];
    let connections = infer_connections(&notes);

    let conn = connections.get("q1", "q2").unwrap();
    assert_eq!(conn.tier, ConnectionTier::Keywords);
    assert!(conn.reason.starts_with("Related concepts: "));
    assert!(conn.reason.contains("qubits"));
    assert!(conn.strength > 0.0 && conn.strength <= 0.9);
}

#[test]
fn unrelated_notes_are_not_connected() {
    let notes = vec![
        note("x", "Groceries", "milk eggs bread", &["home"]),
        note("y", "Kernel tuning", "scheduler latency", &["ops"]),
    ];
    assert!(infer_connections(&notes).is_empty());
    assert!(infer_pair(&notes[0], &notes[1]).is_none());
}

#[test]
fn connections_are_symmetric_and_bounded() {
    let notes = corpus();
    let connections = infer_connections(&notes);
    assert!(!connections.is_empty());

    for conn in &connections {
        match conn.tier {
            ConnectionTier::SharedTags | ConnectionTier::RelatedTags => {
                assert!(
                    (0.35..=1.0).contains(&conn.strength),
                    "{} {:?} {}",
                    conn.key,
                    conn.tier,
                    conn.strength
                );
            }
            ConnectionTier::Keywords => {
                assert!(
                    conn.strength > 0.0 && conn.strength <= 0.9,
                    "{} {}",
                    conn.key,
                    conn.strength
                );
            }
        }
        assert!(conn.source() < conn.target());
        assert_eq!(
            connections.get(conn.target(), conn.source()).unwrap(),
            conn
        );
    }

    for left in &notes {
        for right in &notes {
            assert_eq!(infer_pair(left, right), infer_pair(right, left));
        }
    }
}

#[test]
fn tier_bounds_hold_over_a_generated_corpus() {
    const TAGS: &[&str] = &["ml", "mlops", "rust", "rustlang", "db", "graph", "graphs"];
    const WORDS: &[&str] = &[
        "kernel", "parser", "tensor", "storage", "network", "compiler", "vector", "cache",
    ];
    let notes = (0..40)
        .map(|i| {
            let tags = [TAGS[i % TAGS.len()], TAGS[(i * 3 + 1) % TAGS.len()]];
            let tags = if i % 5 == 0 { &tags[..0] } else { &tags[..1 + i % 2] };
            let title = format!("{} notes", WORDS[i % WORDS.len()]);
            let content = format!(
                "{} {} {}",
                WORDS[(i * 7) % WORDS.len()],
                WORDS[(i + 3) % WORDS.len()],
                WORDS[(i * 5 + 2) % WORDS.len()]
            );
            note(&format!("n{i:02}"), &title, &content, tags)
        })
        .collect::<Vec<_>>();

    let connections = infer_connections(&notes);
    assert!(connections.len() > 40);
    for conn in &connections {
        let range = match conn.tier {
            ConnectionTier::SharedTags => 0.4..=1.0,
            ConnectionTier::RelatedTags => 0.35..=0.35,
            ConnectionTier::Keywords => f64::MIN_POSITIVE..=0.9,
        };
        assert!(range.contains(&conn.strength), "{} {:?}", conn.key, conn.tier);
    }
}

#[test]
fn shared_tags_outrank_related_tags_and_keywords() {
    let left = note(
        "p1",
        "Gradient descent tuning",
        "learning rate schedules",
        &["ml", "mlops"],
    );
    let right = note(
        "p2",
        "Gradient descent pitfalls",
        "learning rate warmup",
        &["ml", "mlflow"],
    );
    let conn = infer_pair(&left, &right).unwrap();
    assert_eq!(conn.tier, ConnectionTier::SharedTags);
    assert_eq!(conn.reason, "Shared tags: #ml");
    assert!((conn.strength - 0.4).abs() < 1e-12);
}

#[test]
fn related_tags_outrank_keywords() {
    let left = note(
        "r1",
        "Gradient descent tuning",
        "learning rate schedules",
        &["machinelearning"],
    );
    let right = note(
        "r2",
        "Gradient descent pitfalls",
        "learning rate warmup",
        &["learning"],
    );
    let conn = infer_pair(&left, &right).unwrap();
    assert_eq!(conn.tier, ConnectionTier::RelatedTags);
    assert_eq!(conn.reason, "Related tags");
    assert!((conn.strength - 0.35).abs() < 1e-12);

    let connections = infer_connections(&corpus());
    assert_eq!(
        connections.get("3", "4").map(|conn| conn.tier),
        Some(ConnectionTier::RelatedTags)
    );
}

#[test]
fn inference_is_independent_of_snapshot_order() {
    let notes = corpus();
    let mut reversed = notes.clone();
    reversed.reverse();

    assert_eq!(infer_connections(&notes), infer_connections(&reversed));
    assert_eq!(infer_connections(&notes), infer_connections(&notes));
}

#[test]
fn note_never_connects_to_itself() {
    let single = note("solo", "Rust ownership", "borrowing rules", &["rust"]);
    let notes = vec![single.clone(), single.clone()];
    assert!(infer_connections(&notes).is_empty());
    assert!(infer_pair(&single, &single).is_none());
}

#[test]
fn deleting_a_note_leaves_other_connections_identical() {
    let notes = corpus();
    let before = infer_connections(&notes);
    assert!(before.touching("2").count() > 0);

    let remaining = notes
        .iter()
        .filter(|note| note.id != "2")
        .cloned()
        .collect::<Vec<_>>();
    let after = infer_connections(&remaining);

    assert_eq!(after.touching("2").count(), 0);
    for conn in &before {
        if conn.key.touches("2") {
            continue;
        }
        assert_eq!(after.get(conn.source(), conn.target()), Some(conn));
    }
    assert_eq!(after.len(), before.len() - before.touching("2").count());
}
