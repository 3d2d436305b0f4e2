/*!
 * Comparison Tests
 */

use ai_os_buffer::BufferView;
use pretty_assertions::assert_eq;
use std::cmp::Ordering;

fn view(bytes: &[u8]) -> BufferView {
    BufferView::from_bytes(bytes).unwrap()
}

#[test]
fn test_compare_scenario() {
    assert_eq!(BufferView::compare(&view(&[1, 2, 3]), &view(&[1, 2, 4])), Ordering::Less);
    assert_eq!(BufferView::compare(&view(&[1, 2, 3]), &view(&[1, 2, 3])), Ordering::Equal);
    assert!(view(&[1, 2, 3]) < view(&[1, 2, 4]));
}

#[test]
fn test_equals_requires_same_length() {
    assert!(view(&[1, 2]).equals(&view(&[1, 2])));
    assert!(!view(&[1, 2]).equals(&view(&[1, 2, 0])));
    assert!(view(&[]).equals(&view(&[])));
}

#[test]
fn test_sorting() {
    let mut list = vec![view(b"b"), view(b"abc"), view(b""), view(b"ab"), view(b"a")];
    list.sort();
    let sorted: Vec<Vec<u8>> = list.iter().map(BufferView::to_vec).collect();
    assert_eq!(
        sorted,
        vec![b"".to_vec(), b"a".to_vec(), b"ab".to_vec(), b"abc".to_vec(), b"b".to_vec()]
    );
}

#[test]
fn test_compare_range() {
    let source = view(&[1, 2, 3, 4, 5]);
    let target = view(&[3, 4]);
    assert_eq!(
        source
            .compare_range(&target, None, None, Some(2), Some(4))
            .unwrap(),
        Ordering::Equal
    );
    assert_eq!(
        source
            .compare_range(&target, Some(0), Some(1), Some(2), None)
            .unwrap(),
        Ordering::Greater
    );

    let err = source
        .compare_range(&target, None, Some(3), None, None)
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "The value of \"targetEnd\" is out of range. It must be >= 0 and <= 2. Received 3"
    );

    assert_eq!(err.code(), "ERR_OUT_OF_RANGE");

    // Empty ranges order by emptiness alone
    assert_eq!(
        source
            .compare_range(&target, Some(2), None, Some(5), None)
            .unwrap(),
        Ordering::Equal
    );
    assert_eq!(
        source
            .compare_range(&target, None, None, Some(3), Some(3))
            .unwrap(),
        Ordering::Less
    );
    assert_eq!(
        source
            .compare_range(&target, Some(5), None, None, None)
            .unwrap(),
        Ordering::Greater
    );
}
