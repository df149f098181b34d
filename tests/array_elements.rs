//! `get_array_elements` tests
//!
//! Element-span retrieval: every returned element is a verbatim
//! sub-slice of the input, and chain shapes that could not keep that
//! guarantee are rejected with their specific errors.

use sliq::{ErrorKind, get, get_array_elements};

const CATALOG: &[u8] = br#"{"sku":[{"id":1,"name":"Bicycle","price":160},{"id":2,"name":"Scooter","price":280}]}"#;

fn assert_subslice(input: &[u8], elem: &[u8]) {
    let base = input.as_ptr() as usize;
    let offset = elem.as_ptr() as usize - base;
    assert!(offset + elem.len() <= input.len());
    assert_eq!(&input[offset..offset + elem.len()], elem);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn returns_every_element_of_the_resolved_array() {
        let elems = get_array_elements(CATALOG, "$.sku", 8).expect("elements");
        assert_eq!(elems.len(), 2);
        assert_eq!(elems[0], &br#"{"id":1,"name":"Bicycle","price":160}"#[..]);
        assert_eq!(elems[1], &br#"{"id":2,"name":"Scooter","price":280}"#[..]);
        for elem in &elems {
            assert_subslice(CATALOG, elem);
        }
    }

    #[test]
    fn root_array_document() {
        let doc = br#"[1,"two",{"v":3}]"#;
        let elems = get_array_elements(doc, "$", 0).expect("elements");
        assert_eq!(elems, vec![&b"1"[..], br#""two""#, br#"{"v":3}"#]);
    }

    #[test]
    fn descends_through_keys_and_single_indexes() {
        let doc = br#"{"store":[{"book":[1,2,3]}]}"#;
        let elems = get_array_elements(doc, "$.store[0].book", 4).expect("elements");
        assert_eq!(elems, vec![&b"1"[..], b"2", b"3"]);
    }

    #[test]
    fn terminal_range_selects_spans() {
        let doc = br#"{"n":[10,11,12,13]}"#;
        let elems = get_array_elements(doc, "$.n[1:3]", 4).expect("elements");
        assert_eq!(elems, vec![&b"11"[..], b"12"]);

        let elems = get_array_elements(doc, "$.n[0,3]", 4).expect("elements");
        assert_eq!(elems, vec![&b"10"[..], b"13"]);

        let elems = get_array_elements(doc, "$.n[:0]", 4).expect("elements");
        assert!(elems.is_empty());
    }

    #[test]
    fn terminal_filter_selects_spans() {
        let elems =
            get_array_elements(CATALOG, "$.sku[?(@.price > 200)]", 4).expect("elements");
        assert_eq!(elems.len(), 1);
        assert_eq!(elems[0], &br#"{"id":2,"name":"Scooter","price":280}"#[..]);
        assert_subslice(CATALOG, elems[0]);
    }

    #[test]
    fn concatenation_matches_get() {
        let whole = get(CATALOG, "$.sku").expect("get");
        let elems = get_array_elements(CATALOG, "$.sku", 2).expect("elements");
        let mut rebuilt = vec![b'['];
        for (n, elem) in elems.iter().enumerate() {
            if n > 0 {
                rebuilt.push(b',');
            }
            rebuilt.extend_from_slice(elem);
        }
        rebuilt.push(b']');
        assert_eq!(rebuilt, whole.as_ref());
    }

    #[test]
    fn unsupported_chain_shapes_are_rejected() {
        let cases = vec![
            ("$.*", ErrorKind::WildcardsNotSupported),
            ("$.sku.*.id", ErrorKind::WildcardsNotSupported),
            ("$.sku.count()", ErrorKind::FunctionsNotSupported),
            ("$.sku[0:1].id", ErrorKind::SubSlicingNotSupported),
            ("$.sku[?(@.id)].id", ErrorKind::SubSlicingNotSupported),
            ("$.sku[0]", ErrorKind::TerminalNodeArray),
            ("$['a','b']", ErrorKind::TerminalNodeArray),
        ];
        for (path, expected) in cases {
            assert_eq!(
                get_array_elements(CATALOG, path, 0).map(|_| ()).map_err(|e| e.kind()),
                Err(expected),
                "query {path}"
            );
        }
    }

    #[test]
    fn non_array_terminal_is_rejected() {
        let doc = br#"{"a":{"b":1}}"#;
        assert_eq!(
            get_array_elements(doc, "$.a", 0).map(|_| ()).map_err(|e| e.kind()),
            Err(ErrorKind::ArrayExpected)
        );
        assert_eq!(
            get_array_elements(doc, "$", 0).map(|_| ()).map_err(|e| e.kind()),
            Err(ErrorKind::ArrayExpected)
        );
    }

    #[test]
    fn entry_point_guards() {
        assert_eq!(
            get_array_elements(CATALOG, "", 0).map(|_| ()).map_err(|e| e.kind()),
            Err(ErrorKind::PathEmpty)
        );
        assert_eq!(
            get_array_elements(CATALOG, "sku", 0).map(|_| ()).map_err(|e| e.kind()),
            Err(ErrorKind::PathRootExpected)
        );
    }
}
