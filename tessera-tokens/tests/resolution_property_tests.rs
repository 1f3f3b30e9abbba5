//! Property-Based Tests for Token Resolution
//!
//! Properties:
//! - Concrete resolution of an acyclic document leaves no `{...}` reference behind.
//! - Resolution is idempotent and equal across fresh engines built from one input.
//! - A suffix claimed by exactly one entry resolves to that entry.
//! - Sanitized names never contain characters outside `[a-z0-9-]`.
//! - The runtime reader agrees with itself across fresh instances.

use proptest::prelude::*;
use serde_json::{json, Map, Value};
use tessera_core::{ReferencePolicy, Target};
use tessera_test_utils::assertions::assert_no_brace_references;
use tessera_test_utils::generators::{arb_path, arb_sheet, arb_shadow_layer, arb_token_tree};
use tessera_tokens::format::ShapeKind;
use tessera_tokens::{build_name, stringify, RuntimeTokens, TokenDocument, TokenEngine};

fn engine(doc: &Value) -> TokenEngine {
    let document = TokenDocument::from_value(doc.clone()).expect("object root");
    TokenEngine::from_document(&document, ReferencePolicy::Ignore)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn prop_concrete_is_fully_dereferenced(doc in arb_token_tree()) {
        let engine = engine(&doc);
        for idx in 0..engine.len() {
            assert_no_brace_references(&engine.resolve_entry(idx, Target::Concrete));
        }
        prop_assert!(engine.diagnostics().is_empty());
    }

    #[test]
    fn prop_idempotent_and_deterministic(doc in arb_token_tree()) {
        let first = engine(&doc);
        let fresh = engine(&doc);
        for idx in (0..first.len()).rev() {
            for target in [Target::Concrete, Target::Symbolic] {
                let once = first.resolve_entry(idx, target);
                prop_assert_eq!(&once, &first.resolve_entry(idx, target));
                prop_assert_eq!(&once, &fresh.resolve_entry(idx, target));
            }
        }
    }

    #[test]
    fn prop_unique_suffix_resolves_to_owner(
        leaf in "[a-z]{3,8}",
        depth in 1usize..5,
        siblings in prop::collection::vec("[A-Z][a-z]{2,6}", 0..4),
    ) {
        let mut group = Map::new();
        for sibling in &siblings {
            group.insert(sibling.clone(), json!({"$value": 1}));
        }
        let mut node = json!({"$value": "owned"});
        for level in (0..depth).rev() {
            let mut wrapper = Map::new();
            wrapper.insert(format!("lvl{}", level), node);
            node = Value::Object(wrapper);
        }
        group.insert(leaf.clone(), node);
        let engine = engine(&json!({ "Tokens": group }));

        let mut path: Vec<String> = vec![leaf.clone()];
        path.extend((0..depth).map(|level| format!("lvl{}", level)));
        let full = format!("Tokens.{}", path.join("."));
        for start in 0..path.len() {
            let key = path[start..].join(".");
            let owner = engine.lookup_alias(&key).map(|entry| entry.path_key.clone());
            prop_assert_eq!(owner, Some(full.clone()));
        }
    }

    #[test]
    fn prop_generated_names_are_identifiers(path in arb_path()) {
        let name = build_name(&path);
        prop_assert!(name.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-'));
        prop_assert!(!name.starts_with('-') && !name.ends_with('-'));
        prop_assert!(!name.contains("--"));
    }

    #[test]
    fn prop_shadow_layers_classified(layers in prop::collection::vec(arb_shadow_layer(), 1..4)) {
        let value = Value::from(layers.clone());
        prop_assert_eq!(ShapeKind::of(&value), ShapeKind::Shadow);
        let text = stringify(&value, tessera_core::Dialect::Scss);
        prop_assert!(!text.is_empty());
        let inner = layers.iter().filter(|l| l["type"] == "innerShadow").count();
        prop_assert_eq!(text.matches("inset ").count(), inner);
    }

    #[test]
    fn prop_reader_deterministic(sheet in arb_sheet()) {
        let first = RuntimeTokens::from_sheets([sheet.as_str()]);
        let fresh = RuntimeTokens::from_sheets([sheet.as_str()]);
        let names: Vec<String> = first.all_tokens().into_iter().map(|r| r.name).collect();
        for name in names.iter().rev() {
            let value = first.resolve_token_value(name);
            prop_assert!(value.is_some());
            prop_assert_eq!(&value, &first.resolve_token_value(name));
            prop_assert_eq!(value, fresh.resolve_token_value(name));
        }
    }
}
