use valo::memory::Arena;

#[test]
fn alloc_returns_the_value() {
    let arena = Arena::with_block_size(1024);
    let a = arena.alloc(42_u32);
    assert_eq!(*a, 42);

    *a = 43;
    assert_eq!(*a, 43);
}

#[test]
fn allocations_stay_disjoint() {
    let arena = Arena::with_block_size(1024);

    let a = arena.alloc([1_u8; 16]);
    let b = arena.alloc([2_u8; 16]);
    let c = arena.alloc(3.0_f64);

    assert!(a.iter().all(|v| *v == 1));
    assert!(b.iter().all(|v| *v == 2));
    assert_eq!(*c, 3.0);
}

#[test]
fn allocations_are_aligned() {
    let arena = Arena::with_block_size(1024);

    let _ = arena.alloc(1_u8);
    let a = arena.alloc(2.0_f64);
    assert_eq!((a as *const f64 as usize) % std::mem::align_of::<f64>(), 0);

    let _ = arena.alloc(3_u8);
    let b = arena.alloc(4_u64);
    assert_eq!((b as *const u64 as usize) % std::mem::align_of::<u64>(), 0);
}

#[test]
fn overflowing_a_block_starts_the_next() {
    let arena = Arena::with_block_size(64);

    for i in 0..32 {
        let v = arena.alloc([i as u8; 16]);
        assert!(v.iter().all(|b| *b == i as u8));
    }

    // 32 * 16 bytes cannot fit in one 64 byte block
    assert!(arena.allocated_bytes() >= 32 * 16);
}

#[test]
fn oversized_requests_get_a_dedicated_block() {
    let arena = Arena::with_block_size(64);

    let big = arena.alloc([7_u8; 256]);
    assert!(big.iter().all(|v| *v == 7));
    assert!(arena.allocated_bytes() >= 256);
}

#[test]
fn reset_retains_blocks_for_reuse() {
    let mut arena = Arena::with_block_size(64);

    for _ in 0..16 {
        let _ = arena.alloc([0_u8; 32]);
    }
    let capacity = arena.allocated_bytes();

    arena.reset();
    assert_eq!(arena.allocated_bytes(), capacity);

    // Refilling after reset should not grow the arena
    for _ in 0..16 {
        let _ = arena.alloc([0_u8; 32]);
    }
    assert_eq!(arena.allocated_bytes(), capacity);
}

#[test]
fn release_unused_frees_surplus_blocks() {
    let mut arena = Arena::with_block_size(64);

    for _ in 0..16 {
        let _ = arena.alloc([0_u8; 32]);
    }
    let grown = arena.allocated_bytes();

    arena.reset();
    assert!(arena.release_unused());
    assert!(arena.allocated_bytes() < grown);

    // Nothing left to free
    assert!(!arena.release_unused());
}
