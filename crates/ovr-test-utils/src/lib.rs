//! Testing utilities for the override workspace
//!
//! Shared fixtures and proptest strategies.

#![allow(missing_docs)]

use ovr_host::InMemoryDocument;
use ovr_model::{
    CategoryId, CategorySet, Color, DetailLevel, FillLayer, FillOverride, FilterDefinition, FilterId,
    LineOverride, LineWeight, OverrideDescriptor, OverrideScope, PatternId, RulePredicate, Transparency,
    ViewId, ViewKind,
};
use proptest::prelude::*;

pub const RED: Color = Color::rgb(255, 0, 0);
pub const GREEN: Color = Color::rgb(0, 255, 0);
pub const BLUE: Color = Color::rgb(0, 0, 255);

pub const SOLID: PatternId = PatternId(1);
pub const HATCH: PatternId = PatternId(7);

pub fn test_filter(name: &str) -> FilterDefinition {
    let categories: CategorySet = [CategoryId(-2_000_011)].into_iter().collect();
    FilterDefinition::new(name, categories, RulePredicate::default()).unwrap()
}

/// Document with one view (all filters attached, unset overrides), a second
/// empty view and an empty template
#[derive(Debug, Clone)]
pub struct Fixture {
    pub doc: InMemoryDocument,
    pub view: ViewId,
    pub other_view: ViewId,
    pub template: ViewId,
    pub filters: Vec<FilterId>,
}

impl Fixture {
    pub fn new(names: &[&str]) -> Self {
        let mut doc = InMemoryDocument::new();
        let view = doc.add_view("Level 1", ViewKind::View);
        let other_view = doc.add_view("Level 2", ViewKind::View);
        let template = doc.add_view("Presentation", ViewKind::Template);
        let filters = names
            .iter()
            .map(|name| {
                let id = doc.add_filter(test_filter(name));
                doc.seed(OverrideScope::new(id, view), OverrideDescriptor::unset())
                    .unwrap();
                id
            })
            .collect();
        Self {
            doc,
            view,
            other_view,
            template,
            filters,
        }
    }

    pub fn with_visibility_support(mut self) -> Self {
        self.doc = self.doc.with_visibility_support(true);
        self
    }

    /// Scope of the `index`th filter in the primary view
    pub fn scope(&self, index: usize) -> OverrideScope {
        OverrideScope::new(self.filters[index], self.view)
    }

    pub fn seed(&mut self, index: usize, descriptor: OverrideDescriptor) {
        let scope = self.scope(index);
        self.doc.seed(scope, descriptor).unwrap();
    }

    pub fn stored(&self, scope: &OverrideScope) -> OverrideDescriptor {
        *self.doc.stored(scope).unwrap()
    }
}

pub fn arb_color() -> impl Strategy<Value = Color> {
    any::<(u8, u8, u8)>().prop_map(|(r, g, b)| Color::rgb(r, g, b))
}

/// Includes the invalid sentinel
pub fn arb_pattern() -> impl Strategy<Value = Option<PatternId>> {
    prop_oneof![
        Just(None),
        Just(Some(PatternId::INVALID)),
        (0i64..50).prop_map(|id| Some(PatternId(id))),
    ]
}

pub fn arb_line() -> impl Strategy<Value = LineOverride> {
    (
        proptest::option::of(arb_color()),
        arb_pattern(),
        proptest::option::of((LineWeight::MIN..=LineWeight::MAX).prop_map(|w| LineWeight::new(w).unwrap())),
    )
        .prop_map(|(color, pattern, weight)| LineOverride { color, pattern, weight })
}

pub fn arb_layer() -> impl Strategy<Value = FillLayer> {
    (arb_pattern(), proptest::option::of(arb_color())).prop_map(|(pattern, color)| FillLayer { pattern, color })
}

pub fn arb_fill() -> impl Strategy<Value = FillOverride> {
    (arb_layer(), arb_layer()).prop_map(|(foreground, background)| FillOverride { foreground, background })
}

pub fn arb_detail_level() -> impl Strategy<Value = DetailLevel> {
    prop_oneof![Just(DetailLevel::Coarse), Just(DetailLevel::Medium), Just(DetailLevel::Fine)]
}

/// Descriptor as read from a host without visibility support
pub fn arb_descriptor() -> impl Strategy<Value = OverrideDescriptor> {
    (
        (arb_line(), arb_line(), arb_fill(), arb_fill()),
        proptest::option::of((0u8..=100).prop_map(|t| Transparency::new(t).unwrap())),
        any::<bool>(),
        proptest::option::of(arb_detail_level()),
    )
        .prop_map(
            |((projection_line, cut_line, projection_fill, cut_fill), transparency, halftone, detail_level)| {
                OverrideDescriptor {
                    projection_line,
                    cut_line,
                    projection_fill,
                    cut_fill,
                    transparency,
                    halftone,
                    detail_level,
                    visibility: None,
                }
            },
        )
}

pub fn arb_descriptor_with_visibility() -> impl Strategy<Value = OverrideDescriptor> {
    (arb_descriptor(), any::<bool>()).prop_map(|(d, visible)| d.with_visibility(visible))
}
