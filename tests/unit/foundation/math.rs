use super::*;

#[test]
fn rng_is_deterministic() {
    let mut a = Rng64::new(123);
    let mut b = Rng64::new(123);
    for _ in 0..10 {
        assert_eq!(a.next_u64(), b.next_u64());
    }
}

#[test]
fn shuffle_is_a_permutation() {
    let mut items: Vec<u32> = (0..32).collect();
    let mut rng = Rng64::new(7);
    shuffle(&mut items, &mut rng);

    let mut sorted = items.clone();
    sorted.sort_unstable();
    assert_eq!(sorted, (0..32).collect::<Vec<_>>());
}

#[test]
fn shuffle_replays_for_equal_seeds() {
    let mut a: Vec<u32> = (0..16).collect();
    let mut b: Vec<u32> = (0..16).collect();
    shuffle(&mut a, &mut Rng64::new(42));
    shuffle(&mut b, &mut Rng64::new(42));
    assert_eq!(a, b);

    let mut c: Vec<u32> = (0..16).collect();
    shuffle(&mut c, &mut Rng64::new(43));
    assert_ne!(a, c);
}

#[test]
fn fnv_seeded_hash_is_stable() {
    let mut a = Fnv1a64::new_default();
    a.write_bytes(b"geoquiz");
    a.write_u64(5);

    let mut b = Fnv1a64::new_default();
    b.write_bytes(b"geo");
    b.write_bytes(b"quiz");
    b.write_u64(5);

    assert_eq!(a.finish(), b.finish());
}
