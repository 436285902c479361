//! Occupancy and ordering properties of the rolling window.

use live_roll::{RollError, RollingBuffer, SharedRollingBuffer};

#[test]
fn test_length_and_contents_match_last_appends() {
    for capacity in [1usize, 2, 3, 7, 16] {
        for appended in 0..40usize {
            let mut rb = RollingBuffer::new(capacity).unwrap();
            let values: Vec<f64> = (0..appended).map(|i| i as f64 * 1.5).collect();
            for &v in &values {
                rb.push(v);
            }

            let expected_len = appended.min(capacity);
            assert_eq!(rb.len(), expected_len);
            assert_eq!(rb.to_vec(), values[appended - expected_len..].to_vec());
        }
    }
}

#[test]
fn test_full_buffer_evicts_oldest() {
    let mut rb = RollingBuffer::new(5).unwrap();
    rb.extend_from_slice(&[10.0, 11.0, 12.0, 13.0, 14.0]);
    assert!(rb.is_full());

    for next in 15..30 {
        let oldest = rb.to_vec()[0];
        rb.push(f64::from(next));
        let window = rb.to_vec();
        assert_eq!(window.len(), 5);
        assert!(!window.contains(&oldest));
        assert_eq!(window[4], f64::from(next));
    }
}

#[test]
fn test_read_is_idempotent() {
    let mut rb = RollingBuffer::new(4).unwrap();
    rb.extend_from_slice(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    assert_eq!(rb.to_vec(), rb.to_vec());
    assert_eq!(rb.len(), rb.len());
}

#[test]
fn test_capacity_three_scenario() {
    let mut rb = RollingBuffer::new(3).unwrap();
    for v in [1.0, 2.0, 3.0, 4.0] {
        rb.push(v);
    }
    assert_eq!(rb.to_vec(), vec![2.0, 3.0, 4.0]);
    assert_eq!(rb.len(), 3);
}

#[test]
fn test_invalid_capacities() {
    assert!(matches!(
        RollingBuffer::new(0),
        Err(RollError::InvalidConfiguration(_))
    ));
    assert!(matches!(
        RollingBuffer::new(-3),
        Err(RollError::InvalidConfiguration(_))
    ));
    assert!(matches!(
        SharedRollingBuffer::new(i64::MIN),
        Err(RollError::InvalidConfiguration(_))
    ));
}

#[test]
fn test_shared_buffer_batches() {
    let shared = SharedRollingBuffer::new(3).unwrap();
    shared.extend_from_slice(&[1.0, 2.0, 3.0, 4.0]);
    assert_eq!(shared.to_vec(), vec![2.0, 3.0, 4.0]);
    assert_eq!(shared.capacity(), 3);
    assert!(!shared.is_empty());
    let sum: f64 = shared.with(|rb| rb.iter().sum());
    assert_eq!(sum, 9.0);
}
