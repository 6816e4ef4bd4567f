use ovr_core::prelude::*;
use ovr_host::HostDocument;
use ovr_merge::merge;
use ovr_test_utils::{arb_descriptor, arb_descriptor_with_visibility, Fixture};
use proptest::prelude::*;

fn arb_fill_part() -> impl Strategy<Value = FillPart> {
    prop_oneof![Just(FillPart::Foreground), Just(FillPart::Background), Just(FillPart::Both)]
}

/// `All` or any valid partial selector
fn arb_selector() -> impl Strategy<Value = FieldSelector> {
    let partial = (
        proptest::collection::vec(any::<bool>(), 5),
        proptest::option::of(arb_fill_part()),
        proptest::option::of(arb_fill_part()),
    )
        .prop_filter_map("empty selector", |(flags, projection, cut)| {
            let simple = [
                PropertyGroup::ProjectionLines,
                PropertyGroup::CutLines,
                PropertyGroup::Transparency,
                PropertyGroup::Halftone,
                PropertyGroup::DetailLevel,
            ];
            let mut selector = FieldSelector::new();
            for (group, on) in simple.into_iter().zip(flags) {
                if on {
                    selector = selector.with(group);
                }
            }
            if let Some(part) = projection {
                selector = selector.with_projection_fills(part);
            }
            if let Some(part) = cut {
                selector = selector.with_cut_fills(part);
            }
            selector.validate().is_ok().then_some(selector)
        });
    prop_oneof![1 => Just(FieldSelector::all()), 4 => partial]
}

proptest! {
    #[test]
    fn every_target_ends_as_merge_of_source_and_baseline(
        source in arb_descriptor(),
        baselines in proptest::collection::vec(arb_descriptor(), 1..5),
        selector in arb_selector(),
    ) {
        let names: Vec<String> = (0..=baselines.len()).map(|i| format!("Filter {i}")).collect();
        let names: Vec<&str> = names.iter().map(String::as_str).collect();
        let mut fx = Fixture::new(&names);
        fx.seed(0, source);
        for (index, baseline) in baselines.iter().enumerate() {
            fx.seed(index + 1, *baseline);
        }

        let source_read = fx.doc.read_override(&fx.scope(0)).unwrap();
        let baseline_reads: Vec<_> = (1..names.len())
            .map(|index| fx.doc.read_override(&fx.scope(index)).unwrap())
            .collect();

        let job = PropagationJob::within_view(
            fx.view,
            fx.filters[0],
            fx.filters[1..].to_vec(),
            selector.clone(),
        );
        let report = job.run(&mut fx.doc, &EngineConfig::default()).unwrap();
        prop_assert!(report.is_complete_success());

        for (offset, baseline) in baseline_reads.iter().enumerate() {
            let written = fx.doc.read_override(&fx.scope(offset + 1)).unwrap();
            prop_assert_eq!(written, merge(&source_read, baseline, &selector));
        }
        prop_assert_eq!(fx.doc.read_override(&fx.scope(0)).unwrap(), source_read);
    }

    #[test]
    fn full_copy_with_visibility_reproduces_source(
        source in arb_descriptor_with_visibility(),
        baseline in arb_descriptor_with_visibility(),
    ) {
        let mut fx = Fixture::new(&["Walls", "Doors"]).with_visibility_support();
        fx.seed(0, source);
        fx.seed(1, baseline);
        let source_read = fx.doc.read_override(&fx.scope(0)).unwrap();

        let job = PropagationJob::within_view(fx.view, fx.filters[0], [fx.filters[1]], FieldSelector::all());
        job.run(&mut fx.doc, &EngineConfig::default()).unwrap();

        prop_assert_eq!(fx.doc.read_override(&fx.scope(1)).unwrap(), source_read);
        prop_assert_eq!(fx.doc.read_override(&fx.scope(0)).unwrap(), source_read);
    }
}
