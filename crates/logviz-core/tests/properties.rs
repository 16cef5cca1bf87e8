use logviz_core::model::{PromptTurn, SamplingEvent, SamplingEventData};
use logviz_core::{
    build_tables, compute_nav_state, decode, encode, render::html::escape_html, PageIndex,
    RowShading,
};
use proptest::prelude::*;
use serde_json::{Map, Value};

fn event(turns: usize, sampled: String) -> SamplingEvent {
    SamplingEvent {
        event_id: format!("{}", turns),
        data: SamplingEventData {
            prompt: (0..turns)
                .map(|i| PromptTurn {
                    role: if i % 2 == 0 { "user" } else { "assistant" }.to_string(),
                    content: format!("turn {}", i),
                    name: None,
                })
                .collect(),
            sampled,
        },
    }
}

fn flat_object() -> impl Strategy<Value = Map<String, Value>> {
    prop::collection::btree_map(
        "[a-z_]{1,8}",
        prop_oneof![
            any::<i64>().prop_map(Value::from),
            any::<bool>().prop_map(Value::from),
            "[ -~]{0,16}".prop_map(Value::from),
            Just(Value::Null),
        ],
        0..8,
    )
    .prop_map(|entries| entries.into_iter().collect())
}

proptest! {
    #[test]
    fn nav_controls_follow_bounds(total in 0u32..500, page in 1u32..600) {
        let current = PageIndex::new(page).unwrap();
        let nav = compute_nav_state(current, total);

        prop_assert_eq!(nav.prev_enabled, page > 1);
        prop_assert_eq!(nav.next_enabled, page < total);
        prop_assert_eq!(&nav.label, &format!("Page {} of {}", page, total));
        if page == 1 {
            prop_assert!(nav.prev_page().is_none());
        }
        if page >= total {
            prop_assert!(nav.next_page().is_none());
        }
    }

    #[test]
    fn one_collapsed_table_per_event(turns in prop::collection::vec(0usize..6, 0..12)) {
        let events: Vec<_> = turns.iter().map(|&k| event(k, "out".to_string())).collect();
        let tables = build_tables(&events);

        prop_assert_eq!(tables.len(), events.len());
        for (table, &k) in tables.iter().zip(&turns) {
            prop_assert!(!table.expanded);
            prop_assert_eq!(table.rows.len(), k + 1);
            prop_assert!(table.rows.last().unwrap().is_sampled());
            prop_assert_eq!(table.rows.iter().filter(|r| r.is_sampled()).count(), 1);
        }
    }

    #[test]
    fn prompt_rows_alternate_by_parity(event_index in 0usize..100, prompt_index in 0usize..100) {
        let shading = RowShading::for_position(event_index, prompt_index);
        let expected = if (event_index + prompt_index) % 2 == 0 {
            RowShading::Shaded
        } else {
            RowShading::Plain
        };
        prop_assert_eq!(shading, expected);
    }

    #[test]
    fn strict_json_objects_decode_unchanged(map in flat_object()) {
        let text = encode(&Value::Object(map.clone()));
        let decoded = decode(&text).unwrap();
        prop_assert_eq!(decoded, map);
    }

    #[test]
    fn escaped_text_has_no_markup(input in "\\PC{0,64}") {
        let escaped = escape_html(&input);
        prop_assert!(!escaped.contains('<'));
        prop_assert!(!escaped.contains('>'));
        prop_assert!(!escaped.contains('"'));
    }
}
