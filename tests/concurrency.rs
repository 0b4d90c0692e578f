//! Concurrent filing must never duplicate a complaint number.
//!
//! The same property is exercised twice: once with OS threads, once with
//! `may` coroutines, since the desk is meant to sit inside a coroutine-based
//! request layer.

mod common;

use std::collections::HashMap;
use std::sync::Arc;
use std::thread;

use rand::Rng;

use ombud::NewComplaint;

fn filing(campus: &common::Campus) -> NewComplaint {
    NewComplaint {
        title: "Wifi down in block C".to_string(),
        description: "No connectivity since last night".to_string(),
        category_id: campus.category.id,
        subcategory_id: Some(campus.subcategory.id),
        attachment: None,
    }
}

/// Distinct numbers, and within each day's batch the sequence is gapless
/// starting at 1.
fn assert_numbers_gapless(numbers: &[String]) {
    let mut by_date: HashMap<String, Vec<u32>> = HashMap::new();
    for number in numbers {
        let parts: Vec<&str> = number.split('-').collect();
        assert_eq!(parts.len(), 3, "malformed number {number}");
        by_date
            .entry(parts[1].to_string())
            .or_default()
            .push(parts[2].parse().unwrap());
    }
    for (date, mut sequences) in by_date {
        sequences.sort_unstable();
        let expected: Vec<u32> = (1..=sequences.len() as u32).collect();
        assert_eq!(sequences, expected, "gap or duplicate in day {date}");
    }
}

#[test]
fn test_parallel_threads_get_distinct_gapless_numbers() {
    let campus = Arc::new(common::campus());
    const WRITERS: usize = 16;

    let handles: Vec<_> = (0..WRITERS)
        .map(|_| {
            let campus = Arc::clone(&campus);
            thread::spawn(move || {
                // Stagger slightly so lock acquisition order varies.
                let jitter = rand::thread_rng().gen_range(0..3);
                thread::sleep(std::time::Duration::from_millis(jitter));
                campus
                    .desk
                    .file_complaint(campus.student.id, filing(&campus))
                    .unwrap()
                    .number
            })
        })
        .collect();

    let numbers: Vec<String> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert_numbers_gapless(&numbers);
}

#[test]
fn test_coroutine_writers_get_distinct_gapless_numbers() {
    let campus = Arc::new(common::campus());
    const WRITERS: usize = 16;

    let (tx, rx) = crossbeam_channel::unbounded();
    let mut handles = Vec::new();
    for _ in 0..WRITERS {
        let campus = Arc::clone(&campus);
        let tx = tx.clone();
        handles.push(may::go!(move || {
            let number = campus
                .desk
                .file_complaint(campus.student.id, filing(&campus))
                .unwrap()
                .number;
            tx.send(number).unwrap();
        }));
    }
    drop(tx);
    for handle in handles {
        handle.join().unwrap();
    }

    let numbers: Vec<String> = rx.iter().collect();
    assert_eq!(numbers.len(), WRITERS);
    assert_numbers_gapless(&numbers);
}

#[test]
fn test_restarted_desk_continues_the_day_sequence() {
    // A desk opened over an already-populated store seeds its arena from the
    // issued numbers instead of starting at 0001 again.
    use ombud::Store as _;

    let campus = common::campus();
    campus
        .desk
        .file_complaint(campus.student.id, filing(&campus))
        .unwrap();
    campus
        .desk
        .file_complaint(campus.student.id, filing(&campus))
        .unwrap();
    let numbers = campus.desk.store().complaint_numbers().unwrap();

    let arena = ombud::numbering::SequenceArena::new();
    arena.seed(numbers.iter().map(String::as_str)).unwrap();
    let today = chrono::Utc::now().date_naive();
    let next = arena.next(today).unwrap();
    assert!(next.ends_with("-0003"), "expected -0003, got {next}");
}
