use proptest::prelude::*;

use relata_core::{ProgramTrack, ReportMetadata, TermCode};

fn term_code() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec!["1Q", "2Q", "3Q", "1S", "2S"])
}

proptest! {
    #[test]
    fn parsed_folders_always_pair_track_with_its_calendar(
        year in 2020i32..=2030,
        term in term_code(),
        academic in 2u8..=5,
        ordinal in 1u8..=5,
    ) {
        let folder = format!("{year}-{term}-{academic}roAno-{ordinal}");
        let metadata = ReportMetadata::from_folder_name(&folder).unwrap();
        prop_assert!(metadata.track.valid_terms().contains(&metadata.term));
        let quarterly = TermCode::parse(term).unwrap().is_quarterly();
        prop_assert_eq!(quarterly, metadata.track == ProgramTrack::ComputerEngineering);
    }

    #[test]
    fn out_of_range_ordinals_are_rejected(ordinal in 6u8..=99) {
        let folder = format!("2024-1S-3roAno-{ordinal}");
        prop_assert!(ReportMetadata::from_folder_name(&folder).is_err());
    }

    #[test]
    fn arbitrary_folder_names_never_panic(name in ".{0,40}") {
        let _ = ReportMetadata::from_folder_name(&name);
    }
}
