use batchname_core::modules::{render_counter, CounterSpec};
use batchname_core::transliterate::greek_to_latin;
use batchname_core::{
    build_preview, transform, CaseStyle, DefaultValidator, FileRecord, ModuleChain, ModuleSpec, NoMetadata,
    SeparatorStyle,
};
use proptest::prelude::*;

proptest! {
    #[test]
    fn counter_renders_its_value(start in -10_000i64..10_000, step in -100i64..100, padding in 0i64..=12, index in 0usize..500) {
        let rendered = render_counter(&CounterSpec::new(start, step, padding), index);
        let expected = start + step * i64::try_from(index).unwrap();

        prop_assert_eq!(rendered.parse::<i64>().unwrap(), expected);
        let digits = rendered.trim_start_matches('-');
        prop_assert!(digits.len() >= usize::try_from(padding).unwrap());
        prop_assert!(digits.chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn lower_snake_is_idempotent(name in "[A-Za-z0-9 _-]{0,40}") {
        let once = transform(&name, CaseStyle::Lower, SeparatorStyle::Snake);
        let twice = transform(&once, CaseStyle::Lower, SeparatorStyle::Snake);
        prop_assert_eq!(&once, &twice);
        prop_assert!(!once.contains(' ') && !once.contains('-'));
    }

    #[test]
    fn kebab_keeps_every_letter(name in "[a-z]{1,8}( [a-z]{1,8}){0,4}") {
        let kebab = transform(&name, CaseStyle::Original, SeparatorStyle::Kebab);
        prop_assert_eq!(kebab.replace('-', ""), name.replace(' ', ""));
    }

    #[test]
    fn transliteration_leaves_ascii_alone(text in "[ -~]{0,40}") {
        prop_assert_eq!(greek_to_latin(&text), text);
    }

    #[test]
    fn preview_is_deterministic(names in prop::collection::btree_set("[a-z]{1,6}", 1..8)) {
        let files: Vec<FileRecord> = names
            .iter()
            .map(|n| FileRecord::from_path(format!("/batch/{}.txt", n)).unwrap())
            .collect();
        let chain = ModuleChain::new(vec![ModuleSpec::literal("f_"), ModuleSpec::counter(1, 1, 2)]);

        let first = build_preview(&files, &chain, &NoMetadata, &DefaultValidator::default());
        let second = build_preview(&files, &chain, &NoMetadata, &DefaultValidator::default());

        prop_assert_eq!(&first, &second);
        prop_assert!(!first.has_blocking_error);
        prop_assert_eq!(first.counts.valid, files.len());
    }
}
