//! Formatted output always re-parses to the linted data.

use jsonlint_core::{FileRecord, Indent, LintOptions};
use jsonlint_stream::LintStage;
use proptest::prelude::*;
use serde_json::Value;

fn json_value() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i32>().prop_map(Value::from),
        "[a-zA-Z0-9 _-]{0,8}".prop_map(Value::String),
    ];
    leaf.prop_recursive(4, 32, 5, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..5).prop_map(Value::Array),
            prop::collection::hash_map("[a-z]{1,5}", inner, 0..5)
                .prop_map(|map| Value::Object(map.into_iter().collect())),
        ]
    })
}

fn lint(options: &LintOptions, text: String) -> FileRecord {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .build()
        .unwrap();
    runtime.block_on(LintStage::new(options).lint_file(FileRecord::new("p.json", text)))
}

proptest! {
    #[test]
    fn test_formatted_output_reparses_to_same_data(
        value in json_value(),
        indent in 0usize..5,
        sort_keys in any::<bool>(),
    ) {
        let options = LintOptions {
            format: true,
            indent: Indent::Spaces(indent),
            sort_keys,
            ..LintOptions::default()
        };
        let first = lint(&options, serde_json::to_string(&value).unwrap());
        prop_assert!(first.lint_result().unwrap().success());
        prop_assert!(first.contents().ends_with(b"\n"));

        let reparsed: Value = serde_json::from_slice(first.contents()).unwrap();
        prop_assert_eq!(&reparsed, &value);

        let second = lint(&options, first.contents_str().into_owned());
        prop_assert_eq!(second.contents(), first.contents());
    }
}
