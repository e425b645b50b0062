//! Property tests for pipeline ordering and failure semantics.

use plinth_hooks::{HookPoint, Hooks};
use plinth_registry::Context;
use proptest::prelude::*;

#[derive(Debug, Clone, Default, PartialEq)]
struct Trace {
    seen: Vec<u8>,
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// For any mix of hooks across the six points, each point's pipeline
    /// executes its hooks in exactly the order they were registered.
    #[test]
    fn prop_execution_order_matches_registration(
        labels in proptest::collection::vec((0usize..6, any::<u8>()), 0..24)
    ) {
        let hooks: Hooks<Trace> = Hooks::new();
        let mut expected: Vec<Vec<u8>> = vec![Vec::new(); 6];

        for (point_idx, label) in labels {
            let point = HookPoint::ALL[point_idx];
            expected[point_idx].push(label);
            hooks.register(point, move |_ctx, mut trace: Trace| {
                trace.seen.push(label);
                Ok(trace)
            });
        }
        hooks.build();

        for (idx, point) in HookPoint::ALL.into_iter().enumerate() {
            let out = hooks
                .execute(&Context::new(), point, &Trace::default())
                .unwrap();
            prop_assert_eq!(&out.seen, &expected[idx]);
        }
    }

    /// However many hooks succeed before one fails, the caller's input is
    /// untouched and the failure surfaces unchanged.
    #[test]
    fn prop_failure_leaves_input_untouched(
        prefix in proptest::collection::vec(any::<u8>(), 0..8)
    ) {
        let hooks: Hooks<Trace> = Hooks::new();
        for label in prefix {
            hooks.register(HookPoint::BeforeUpdate, move |_ctx, mut trace: Trace| {
                trace.seen.push(label);
                Ok(trace)
            });
        }
        hooks.register(HookPoint::BeforeUpdate, |_ctx, _trace: Trace| Err("stop".into()));

        let input = Trace { seen: vec![9] };
        let err = hooks
            .execute(&Context::new(), HookPoint::BeforeUpdate, &input)
            .unwrap_err();

        prop_assert_eq!(err.to_string(), "stop");
        prop_assert_eq!(&input.seen, &vec![9]);
    }
}
