use std::cmp::Ordering;

use proptest::prelude::*;

use super::*;

fn step_token() -> impl Strategy<Value = String> {
    (1u32..200, proptest::option::of("[a-z0-9]{1,6}")).prop_map(|(raw, id)| match id {
        Some(id) => format!("{raw}[{id}]"),
        None => raw.to_string(),
    })
}

fn segment() -> impl Strategy<Value = String> {
    (
        proptest::collection::vec(step_token(), 1..6),
        proptest::option::of(0u32..500),
    )
        .prop_map(|(steps, offset)| {
            let mut s = format!("/{}", steps.join("/"));
            if let Some(offset) = offset {
                s.push_str(&format!(":{offset}"));
            }
            s
        })
}

fn cfi_string() -> impl Strategy<Value = String> {
    (
        1u32..20,
        segment(),
        proptest::option::of((segment(), segment())),
    )
        .prop_map(|(spine, path, range)| match range {
            Some((start, end)) => format!("epubcfi(/6/{}!{path},{start},{end})", spine * 2),
            None => format!("epubcfi(/6/{}!{path})", spine * 2),
        })
}

proptest! {
    #[test]
    fn roundtrip_is_stable(s in cfi_string()) {
        let cfi = parse(&s).unwrap();
        let reparsed = parse(&cfi.to_string()).unwrap();
        prop_assert_eq!(&reparsed, &cfi);
        prop_assert_eq!(reparsed.to_string(), cfi.to_string());
    }

    #[test]
    fn step_encoding_is_inverse(raw in 1u64..=(2 * u64::from(u32::MAX) + 2)) {
        let step = Step::from_raw(raw).unwrap();
        prop_assert_eq!(step.raw(), raw);
    }

    #[test]
    fn ordering_is_antisymmetric(a in cfi_string(), b in cfi_string()) {
        let a = parse(&a).unwrap();
        let b = parse(&b).unwrap();
        prop_assert_eq!(document_order(&a, &b), document_order(&b, &a).reverse());
    }

    #[test]
    fn ordering_is_transitive(a in cfi_string(), b in cfi_string(), c in cfi_string()) {
        let mut cfis = [parse(&a).unwrap(), parse(&b).unwrap(), parse(&c).unwrap()];
        cfis.sort_by(document_order);
        prop_assert_ne!(document_order(&cfis[0], &cfis[1]), Ordering::Greater);
        prop_assert_ne!(document_order(&cfis[1], &cfis[2]), Ordering::Greater);
        prop_assert_ne!(document_order(&cfis[0], &cfis[2]), Ordering::Greater);
    }

    #[test]
    fn sorting_is_idempotent(list in proptest::collection::vec(cfi_string(), 0..12)) {
        let mut once: Vec<Cfi> = list.iter().map(|s| parse(s).unwrap()).collect();
        once.sort_by(document_order);
        let mut twice = once.clone();
        twice.sort_by(document_order);
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn spine_dominates(a in cfi_string(), b in cfi_string()) {
        let a = parse(&a).unwrap();
        let b = parse(&b).unwrap();
        let (sa, sb) = (a.spine_pos().unwrap(), b.spine_pos().unwrap());
        if sa < sb {
            prop_assert_eq!(document_order(&a, &b), Ordering::Less);
        } else if sa > sb {
            prop_assert_eq!(document_order(&a, &b), Ordering::Greater);
        }
    }

    #[test]
    fn identical_points_build_a_point(s in cfi_string()) {
        let point = parse(&s).unwrap().collapse(true).to_string();
        let built = range_from_points(&point, &point).unwrap();
        prop_assert_eq!(built, point);
    }
}
