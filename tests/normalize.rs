use finance_screening::data::{CellValue, first_non_empty, normalize_text};
use proptest::prelude::*;

fn messy_text() -> impl Strategy<Value = String> {
    prop::collection::vec(
        prop_oneof![
            Just(" ".to_string()),
            Just("\t".to_string()),
            Just("\n".to_string()),
            "[A-Za-z0-9ก-ฮ]{1,6}",
        ],
        0..8,
    )
    .prop_map(|parts| parts.concat())
}

proptest! {
    #[test]
    fn normalized_text_is_a_fixed_point(raw in messy_text()) {
        let once = normalize_text(&CellValue::Text(raw));
        let twice = normalize_text(&CellValue::Text(once.clone()));
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn normalized_text_has_single_inner_spaces(raw in messy_text()) {
        let normalized = normalize_text(&CellValue::Text(raw));
        prop_assert_eq!(normalized.trim(), normalized.as_str());
        prop_assert!(!normalized.contains("  "));
        prop_assert!(!normalized.contains('\t'));
        prop_assert!(!normalized.contains('\n'));
    }

    #[test]
    fn surrounding_whitespace_does_not_change_identity(
        raw in messy_text(),
        left in "[ \t]{0,3}",
        right in "[ \t\n]{0,3}",
    ) {
        let padded = format!("{left}{raw}{right}");
        prop_assert_eq!(
            normalize_text(&CellValue::Text(padded)),
            normalize_text(&CellValue::Text(raw))
        );
    }

    #[test]
    fn first_non_empty_skips_leading_blanks(
        blanks in 0usize..5,
        value in "T[0-9]{1,7}",
        trailing in "T[0-9]{1,7}",
    ) {
        let mut values = vec![CellValue::Empty; blanks];
        values.push(CellValue::Text(value.clone()));
        values.push(CellValue::Text(trailing));
        prop_assert_eq!(first_non_empty(&values), CellValue::Text(value));
    }
}

#[test]
fn placeholder_strings_normalize_to_empty() {
    for raw in ["nan", "NaN", " None ", "none", "   "] {
        assert_eq!(normalize_text(&CellValue::text(raw)), "");
    }
    assert_eq!(normalize_text(&CellValue::Empty), "");
}
