//! End-to-end query tests
//!
//! Exercises `get` over realistic documents: scalar lookups, array
//! indexing and slicing, wildcards, functions, and the zero-copy
//! guarantees for pass-through results.

use std::borrow::Cow;

use sliq::{ErrorKind, get};

const CATALOG: &[u8] = br#"{"sku":[{"id":1,"name":"Bicycle","price":160,"extras":["flashlight","pump"]},{"id":2,"name":"Scooter","price":280,"extras":["helmet","gloves","spare wheel"]}]}"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_query_returns_input_verbatim() {
        assert_eq!(get(CATALOG, "$").expect("root").as_ref(), CATALOG);

        let scalar_doc = b"42";
        assert_eq!(get(scalar_doc, "$").expect("root").as_ref(), b"42");
    }

    #[test]
    fn scalar_lookups() {
        let cases: Vec<(&str, &[u8])> = vec![
            ("$.sku[0].price", &b"160"[..]),
            ("$.sku[0].name", b"\"Bicycle\""),
            ("$.sku[1].id", b"2"),
            ("$.sku[0].extras[1]", b"\"pump\""),
            ("$.sku[-1].id", b"2"),
        ];
        for (path, expected) in cases {
            let result = get(CATALOG, path).expect(path);
            assert_eq!(result.as_ref(), expected, "query {path}");
        }
    }

    #[test]
    fn pass_through_results_are_subslices() {
        let result = get(CATALOG, "$.sku[0].price").expect("lookup");
        let Cow::Borrowed(bytes) = result else {
            panic!("unique scalar lookup must not allocate");
        };
        let base = CATALOG.as_ptr() as usize;
        let offset = bytes.as_ptr() as usize - base;
        assert!(offset + bytes.len() <= CATALOG.len());
        assert_eq!(&CATALOG[offset..offset + bytes.len()], bytes);
    }

    #[test]
    fn nested_descent_is_a_subslice() {
        let doc = br#"{"a":{"b":{"c":42}}}"#;
        let result = get(doc, "$.a.b.c").expect("lookup");
        assert_eq!(result.as_ref(), b"42");
        assert!(matches!(result, Cow::Borrowed(_)));
    }

    #[test]
    fn functions_over_arrays_and_strings() {
        assert_eq!(get(CATALOG, "$.sku[1].extras.count()").expect("count").as_ref(), b"3");
        assert_eq!(get(CATALOG, "$.sku.length()").expect("length").as_ref(), b"2");

        let doc = br#"{"t":"Moby Dick"}"#;
        // spans include the surrounding quotes
        assert_eq!(get(doc, "$.t.length()").expect("length").as_ref(), b"11");
        assert_eq!(get(doc, "$.t.size()").expect("size").as_ref(), b"11");
        assert_eq!(get(doc, "$.size()").expect("size").as_ref(), b"17");
    }

    #[test]
    fn length_rejects_scalar_subject() {
        let doc = br#"{"n":5}"#;
        assert_eq!(
            get(doc, "$.n.length()").map_err(|e| e.kind()),
            Err(ErrorKind::InvalidLengthUsage)
        );
    }

    #[test]
    fn root_level_array_document() {
        let doc = br#"[{"author":"X"},{"author":"Y"}]"#;
        assert_eq!(get(doc, "$[1].author").expect("lookup").as_ref(), b"\"Y\"");
        assert_eq!(get(doc, "$[0]").expect("lookup").as_ref(), br#"{"author":"X"}"#);
        assert_eq!(
            get(doc, "$[0:1]").expect("slice").as_ref(),
            br#"[{"author":"X"}]"#
        );
    }

    #[test]
    fn ranges_and_lists_aggregate() {
        let doc = br#"{"n":[10,11,12,13,14]}"#;
        let cases: Vec<(&str, &[u8])> = vec![
            ("$.n[1:3]", &b"[11,12]"[..]),
            ("$.n[:]", b"[10,11,12,13,14]"),
            ("$.n[0:]", b"[10,11,12,13,14]"),
            ("$.n[-2:]", b"[13,14]"),
            ("$.n[1:-1]", b"[11,12,13]"),
            ("$.n[0,2,4]", b"[10,12,14]"),
            ("$.n[4,0]", b"[14,10]"),
            ("$.n[-1,0]", b"[14,10]"),
            ("$.n[:0]", b"[]"),
        ];
        for (path, expected) in cases {
            let result = get(doc, path).expect(path);
            assert_eq!(result.as_ref(), expected, "query {path}");
        }
    }

    #[test]
    fn aggregates_parse_as_json() {
        let result = get(CATALOG, "$.sku[0:]").expect("slice");
        let parsed: serde_json::Value =
            serde_json::from_slice(&result).expect("aggregate is valid JSON");
        assert_eq!(parsed.as_array().map(Vec::len), Some(2));
    }

    #[test]
    fn range_over_empty_array_is_empty() {
        let doc = br#"{"n":[]}"#;
        assert_eq!(get(doc, "$.n[1:3]").expect("slice").as_ref(), b"[]");
    }

    #[test]
    fn range_out_of_bounds_is_an_error() {
        let doc = br#"{"n":[1,2]}"#;
        let cases = vec!["$.n[0:9]", "$.n[-3:]", "$.n[5]", "$.n[-3]"];
        for path in cases {
            assert_eq!(
                get(doc, path).map_err(|e| e.kind()),
                Err(ErrorKind::ArrayElementNotFound),
                "query {path}"
            );
        }
    }

    #[test]
    fn aggregating_step_applies_successor_per_element() {
        let doc = br#"{"items":[{"tags":["red","big"]},{"tags":["blue"]}]}"#;
        assert_eq!(
            get(doc, "$.items[:].tags[0]").expect("query").as_ref(),
            br#"["red","blue"]"#
        );
    }

    #[test]
    fn aggregation_drops_elements_missing_the_key() {
        let doc = br#"{"items":[{"v":1},{"w":2},{"v":3}]}"#;
        assert_eq!(get(doc, "$.items[:].v").expect("query").as_ref(), b"[1,3]");
    }

    #[test]
    fn wildcard_expansion() {
        let doc = br#"{"a":1,"b":"two","c":[3],"d":{"e":4}}"#;
        assert_eq!(
            get(doc, "$.*").expect("wildcard").as_ref(),
            br#"[1,"two",[3],{"e":4}]"#
        );

        let doc = br#"{"a":{"v":1},"b":{"v":2}}"#;
        assert_eq!(get(doc, "$.*.v").expect("wildcard").as_ref(), b"[1,2]");
    }

    #[test]
    fn wildcard_over_array_elements() {
        let doc = br#"[{"v":1},{"v":2}]"#;
        assert_eq!(get(doc, "$.*.v").expect("wildcard").as_ref(), b"[1,2]");
    }

    #[test]
    fn key_list_harvest() {
        let doc = br#"{"id":7,"name":"n","price":10}"#;
        assert_eq!(
            get(doc, "$['name','id']").expect("harvest").as_ref(),
            br#"["n",7]"#
        );
    }

    #[test]
    fn key_list_with_downstream_step() {
        let doc = br#"{"a":{"v":1},"b":{"v":2},"c":{"v":3}}"#;
        assert_eq!(
            get(doc, "$['a','c'].v").expect("harvest").as_ref(),
            b"[1,3]"
        );
    }

    #[test]
    fn deep_prefix_parses_and_acts_as_child() {
        let doc = br#"{"a":{"b":1}}"#;
        assert_eq!(get(doc, "$..a.b").expect("deep").as_ref(), b"1");
    }

    #[test]
    fn values_with_tricky_interiors() {
        let doc = br#"{"s":"br]ace} \" done","e":1.5e-3,"after":true}"#;
        assert_eq!(
            get(doc, "$.s").expect("string").as_ref(),
            br#""br]ace} \" done""#
        );
        assert_eq!(get(doc, "$.e").expect("exponent").as_ref(), b"1.5e-3");
        assert_eq!(get(doc, "$.after").expect("bool").as_ref(), b"true");
    }

    #[test]
    fn separators_are_forgiving() {
        // commas count as whitespace, so unconventional separators pass
        let doc = b"[1 2 3]";
        assert_eq!(get(doc, "$[1]").expect("lookup").as_ref(), b"2");
    }

    #[test]
    fn shape_mismatches_are_reported() {
        let doc = br#"{"a":[1,2],"s":5}"#;
        let cases = vec![
            ("$.a.b", ErrorKind::ObjectExpected),
            ("$.s[0]", ErrorKind::ArrayExpected),
            ("$.s.x", ErrorKind::ObjectExpected),
            ("$.missing", ErrorKind::FieldNotFound),
        ];
        for (path, expected) in cases {
            assert_eq!(
                get(doc, path).map_err(|e| e.kind()),
                Err(expected),
                "query {path}"
            );
        }
        assert_eq!(
            get(b"5", "$.x").map_err(|e| e.kind()),
            Err(ErrorKind::ObjectOrArrayExpected)
        );
    }

    #[test]
    fn entry_point_guards() {
        assert_eq!(
            get(CATALOG, "").map_err(|e| e.kind()),
            Err(ErrorKind::PathEmpty)
        );
        assert_eq!(
            get(CATALOG, "sku").map_err(|e| e.kind()),
            Err(ErrorKind::PathRootExpected)
        );
    }

    #[test]
    fn truncated_documents_fail_cleanly() {
        let doc = br#"{"a":{"b":1"#;
        assert_eq!(
            get(doc, "$.a.b.c").map_err(|e| e.kind()),
            Err(ErrorKind::UnexpectedEnd)
        );
    }
}
