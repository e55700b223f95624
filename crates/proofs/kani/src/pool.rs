//! Kani proofs for the constant product pool
//!
//! These proofs check the pool transitions against their safety properties:
//! - **P1: No mutation on error** - a failed transition leaves the pool untouched
//! - **P2: k non-decreasing** - swaps never lower reserve_a * reserve_b
//! - **P3: No drain** - a swap never pays out the full opposing reserve
//! - **P4: No dilution** - deposits and withdrawals keep reserve per share
//! - **P5: Full exit** - burning every share empties both reserves
//! - **P6: Layout round trip** - every reachable pool survives store and load

use xyk_model::{Pool, PoolError, SwapDirection, MAX_FEE_BPS};

const BOUND: u64 = 1 << 20;

fn any_direction() -> SwapDirection {
    if kani::any() {
        SwapDirection::AToB
    } else {
        SwapDirection::BToA
    }
}

/// Symbolic initialized pool with shares outstanding
fn any_live_pool() -> Pool {
    let reserve_a: u64 = kani::any();
    let reserve_b: u64 = kani::any();
    let total_shares: u64 = kani::any();
    let fee_bps: u16 = kani::any();

    kani::assume(reserve_a > 0 && reserve_a < BOUND);
    kani::assume(reserve_b > 0 && reserve_b < BOUND);
    kani::assume(total_shares > 0 && total_shares < BOUND);
    kani::assume(fee_bps <= MAX_FEE_BPS);

    let mut pool = Pool::new();
    pool.initialize_with_fee(reserve_a, reserve_b, fee_bps).unwrap();
    pool.total_shares = total_shares;
    pool
}

/// P1: Swap errors leave the pool unchanged, even with unbounded inputs
#[kani::proof]
#[kani::unwind(4)]
fn p1_swap_error_no_mutation() {
    let mut pool = any_live_pool();
    let before = pool;
    let amount_in: u64 = kani::any();
    let min_out: u64 = kani::any();

    if pool.swap(amount_in, min_out, any_direction()).is_err() {
        assert!(pool == before, "P1: failed swap mutated the pool");
    }
}

/// P1: Deposit errors leave the pool unchanged
#[kani::proof]
#[kani::unwind(4)]
fn p1_add_liquidity_error_no_mutation() {
    let mut pool = any_live_pool();
    let before = pool;
    let amount_a: u64 = kani::any();
    let amount_b: u64 = kani::any();

    if pool.add_liquidity(amount_a, amount_b).is_err() {
        assert!(pool == before, "P1: failed deposit mutated the pool");
    }
}

/// P2: Swaps never decrease k, and strictly increase it under a fee
#[kani::proof]
#[kani::unwind(4)]
fn p2_invariant_non_decreasing() {
    let mut pool = any_live_pool();
    let k0 = pool.invariant_k();
    let amount_in: u64 = kani::any();
    kani::assume(amount_in > 0 && amount_in < BOUND);

    if pool.swap(amount_in, 0, any_direction()).is_ok() {
        let k1 = pool.invariant_k();
        assert!(k1 >= k0, "P2: k decreased");
        if pool.fee_bps > 0 {
            assert!(k1 > k0, "P2: fee did not grow k");
        }
    }
}

/// P3: Output stays strictly below the output reserve
#[kani::proof]
#[kani::unwind(4)]
fn p3_swap_never_drains() {
    let pool = any_live_pool();
    let direction = any_direction();
    let amount_in: u64 = kani::any();

    let (_, reserve_out) = pool.reserves(direction);
    match pool.quote_swap(amount_in, direction) {
        Ok(quote) => {
            assert!(quote.amount_out > 0, "P3: zero output accepted");
            assert!(quote.amount_out < reserve_out, "P3: swap drains reserve");
            assert!(quote.new_reserve_out > 0, "P3: reserve reached zero");
        }
        Err(e) => assert!(e != PoolError::PoolNotInitialized),
    }
}

/// P4: Deposit never lowers reserve per share
#[kani::proof]
#[kani::unwind(4)]
fn p4_add_liquidity_no_dilution() {
    let mut pool = any_live_pool();
    let before = pool;
    let amount_a: u64 = kani::any();
    let amount_b: u64 = kani::any();
    kani::assume(amount_a < BOUND && amount_b < BOUND);

    if let Ok(minted) = pool.add_liquidity(amount_a, amount_b) {
        let ts0 = before.total_shares as u128;
        let ts1 = pool.total_shares as u128;
        assert!(ts1 == ts0 + minted as u128);
        assert!(pool.reserve_a as u128 * ts0 >= before.reserve_a as u128 * ts1, "P4: A diluted");
        assert!(pool.reserve_b as u128 * ts0 >= before.reserve_b as u128 * ts1, "P4: B diluted");
    }
}

/// P4: Withdrawal never lowers reserve per share for remaining holders
#[kani::proof]
#[kani::unwind(4)]
fn p4_remove_liquidity_no_dilution() {
    let mut pool = any_live_pool();
    let before = pool;
    let shares: u64 = kani::any();

    if let Ok((out_a, out_b)) = pool.remove_liquidity(shares) {
        assert!(out_a <= before.reserve_a && out_b <= before.reserve_b);
        let ts0 = before.total_shares as u128;
        let ts1 = pool.total_shares as u128;
        assert!(pool.reserve_a as u128 * ts0 >= before.reserve_a as u128 * ts1, "P4: A diluted");
        assert!(pool.reserve_b as u128 * ts0 >= before.reserve_b as u128 * ts1, "P4: B diluted");
    } else {
        assert!(pool == before);
    }
}

/// P5: Burning the entire supply pays out both reserves exactly
#[kani::proof]
#[kani::unwind(4)]
fn p5_full_exit_empties_pool() {
    let mut pool = any_live_pool();
    let (reserve_a, reserve_b) = (pool.reserve_a, pool.reserve_b);

    let result = pool.remove_liquidity(pool.total_shares);

    assert!(result == Ok((reserve_a, reserve_b)), "P5: full exit left dust");
    assert!(pool.reserve_a == 0 && pool.reserve_b == 0 && pool.total_shares == 0);
    assert!(pool.is_initialized());
}

/// P6: Stored record decodes to the same pool
#[kani::proof]
#[kani::unwind(34)]
fn p6_layout_round_trip() {
    let pool = any_live_pool();
    let bytes = pool.to_bytes();
    assert!(Pool::unpack(&bytes) == Ok(pool), "P6: layout round trip failed");
}
