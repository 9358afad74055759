// Accounting invariant: however reserve / confirm / cancel / expire
// interleave, every unit of stock is either available, held by a live
// reservation, or retired by a confirmed one. Nothing is ever minted or
// leaked.

use std::sync::Arc;

use proptest::prelude::*;

use reservations::{
    CancelCommand, CancelUseCase, ConfirmCommand, ConfirmUseCase, ExpireReservationsUseCase,
    Item, ItemCache, ManualClock, MemoryStore, ReservationStatus, ReservationStore,
    ReserveCommand, ReserveOutcome, ReserveUseCase,
};

const INITIAL_STOCK: i64 = 25;
const TTL_MS: i64 = 600_000;

#[derive(Debug, Clone)]
enum Op {
    Reserve { user: u8, qty: i64 },
    Confirm { pick: usize },
    Cancel { pick: usize },
    Advance { ms: i64 },
    Expire,
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0u8..4, -1i64..=7).prop_map(|(user, qty)| Op::Reserve { user, qty }),
        any::<usize>().prop_map(|pick| Op::Confirm { pick }),
        any::<usize>().prop_map(|pick| Op::Cancel { pick }),
        (1i64..400_000).prop_map(|ms| Op::Advance { ms }),
        Just(Op::Expire),
    ]
}

async fn run_ops(ops: Vec<Op>) {
    let store = Arc::new(MemoryStore::new());
    store.put_item(Item::new("item_1", "Espresso Machine", INITIAL_STOCK, 0));
    let clock = Arc::new(ManualClock::new(1_000));
    let cache = Arc::new(ItemCache::new(clock.clone(), 30_000));

    let reserve = ReserveUseCase::new(store.clone(), cache.clone(), clock.clone(), TTL_MS);
    let confirm = ConfirmUseCase::new(store.clone(), cache.clone(), clock.clone());
    let cancel = CancelUseCase::new(store.clone(), cache.clone(), clock.clone());
    let expire = ExpireReservationsUseCase::new(store.clone(), cache, clock.clone());

    // (reservation id, owning user) pairs created so far.
    let mut holds: Vec<(String, String)> = Vec::new();

    for op in ops {
        match op {
            Op::Reserve { user, qty } => {
                let user_id = format!("user_{user}");
                let outcome = reserve
                    .execute(ReserveCommand {
                        user_id: user_id.clone(),
                        item_id: "item_1".to_string(),
                        qty,
                    })
                    .await
                    .unwrap();
                if let ReserveOutcome::Reserved(response) = outcome {
                    holds.push((response.id, user_id));
                }
            }
            Op::Confirm { pick } => {
                if holds.is_empty() {
                    continue;
                }
                let (id, user_id) = &holds[pick % holds.len()];
                confirm
                    .execute(ConfirmCommand {
                        user_id: user_id.clone(),
                        reservation_id: id.clone(),
                    })
                    .await
                    .unwrap();
            }
            Op::Cancel { pick } => {
                if holds.is_empty() {
                    continue;
                }
                let (id, user_id) = &holds[pick % holds.len()];
                cancel
                    .execute(CancelCommand {
                        user_id: user_id.clone(),
                        reservation_id: id.clone(),
                    })
                    .await
                    .unwrap();
            }
            Op::Advance { ms } => clock.advance(ms),
            Op::Expire => {
                expire.execute().await.unwrap();
            }
        }

        // The books must balance after every committed operation.
        let available = store
            .find_item("item_1")
            .await
            .unwrap()
            .unwrap()
            .available_qty();
        assert!(available >= 0);

        let mut held = 0;
        let mut retired = 0;
        for (id, _) in &holds {
            let reservation = store.find_reservation(id).await.unwrap().unwrap();
            match reservation.status() {
                ReservationStatus::Reserved => held += reservation.qty(),
                ReservationStatus::Confirmed => retired += reservation.qty(),
                ReservationStatus::Cancelled | ReservationStatus::Expired => {}
            }
        }
        assert_eq!(available + held + retired, INITIAL_STOCK);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn stock_is_conserved_across_interleavings(ops in proptest::collection::vec(op_strategy(), 1..60)) {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .build()
            .unwrap();
        runtime.block_on(run_ops(ops));
    }
}
