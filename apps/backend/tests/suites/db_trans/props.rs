// Property: after any sequence of stack operations, get_trx is the most
// recently opened handle that has not been popped.

use proptest::prelude::*;
use proptest::test_runner::TestCaseError;
use trxscope::{trans, TrxNesting};

use crate::common::{memory_state, request_for};

#[derive(Debug, Clone, Copy)]
enum Op {
    Begin,
    Commit,
    Rollback,
    CommitAll,
    RollbackAll,
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => Just(Op::Begin),
        2 => Just(Op::Commit),
        2 => Just(Op::Rollback),
        1 => Just(Op::CommitAll),
        1 => Just(Op::RollbackAll),
    ]
}

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("runtime")
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn get_trx_matches_a_vec_model(ops in prop::collection::vec(op(), 0..12)) {
        runtime().block_on(async {
            let state = memory_state(TrxNesting::Independent).await;
            let req = request_for(&state);
            let mut model: Vec<u64> = Vec::new();

            for op in ops {
                match op {
                    Op::Begin => {
                        trans::begin(Some(&req)).await.unwrap();
                        let top = trans::get_trx(Some(&req)).unwrap().unwrap();
                        prop_assert_eq!(top.depth(), model.len());
                        model.push(top.id());
                    }
                    Op::Commit => {
                        trans::commit(Some(&req)).await.unwrap();
                        model.pop();
                    }
                    Op::Rollback => {
                        trans::rollback(Some(&req)).await.unwrap();
                        model.pop();
                    }
                    Op::CommitAll => {
                        trans::commit_all(Some(&req)).await.unwrap();
                        model.clear();
                    }
                    Op::RollbackAll => {
                        trans::rollback_all(Some(&req)).await.unwrap();
                        model.clear();
                    }
                }

                let top = trans::get_trx(Some(&req)).unwrap().map(|h| h.id());
                prop_assert_eq!(top, model.last().copied());
            }

            trans::rollback_all(Some(&req)).await.unwrap();
            prop_assert!(trans::get_trx(Some(&req)).unwrap().is_none());
            Ok::<(), TestCaseError>(())
        })?;
    }

    #[test]
    fn begins_without_commit_expose_the_last(n in 1usize..6) {
        runtime().block_on(async {
            let state = memory_state(TrxNesting::Independent).await;
            let req = request_for(&state);

            let mut last = None;
            for _ in 0..n {
                trans::begin(Some(&req)).await.unwrap();
                last = trans::get_trx(Some(&req)).unwrap();
            }
            let top = trans::get_trx(Some(&req)).unwrap().unwrap();
            prop_assert!(top.same_as(last.as_ref().unwrap()));
            prop_assert_eq!(top.depth(), n - 1);

            trans::commit_all(Some(&req)).await.unwrap();
            prop_assert!(trans::get_trx(Some(&req)).unwrap().is_none());
            Ok::<(), TestCaseError>(())
        })?;
    }
}
