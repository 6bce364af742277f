// Copyright (c) The fixture-realm Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Merging statistics documents.
//!
//! Two kinds of merge happen during a flush. Documents read from disk are [overlaid](overlay),
//! with the newer document winning outright. The current run is [merged](merge_run) against prior
//! records, which tracks when each case's result last changed.

use realm_metadata::{CaseStats, FileStats, StatsDocument};

/// Overlays `newer` onto `base`. For every file in `newer`, its metadata replaces the metadata in
/// `base`, and each of its cases replaces the case of the same name.
pub(crate) fn overlay(base: &mut StatsDocument, newer: StatsDocument) {
    for (filename, newer_file) in newer {
        let FileStats {
            class_name,
            seconds,
            cases,
        } = newer_file;
        let file = base.file_mut(filename);
        file.class_name = class_name;
        file.seconds = seconds;
        file.cases.extend(cases);
    }
}

/// Returns the files and cases of `run`, with `since` set from the prior record of each case.
///
/// The prior record of a case is looked up in each of `priors` in turn, and the first document
/// that has the case wins.
pub(crate) fn merge_run(priors: &[&StatsDocument], run: &StatsDocument) -> StatsDocument {
    run.iter()
        .map(|(filename, run_file)| {
            let cases = run_file
                .cases
                .iter()
                .map(|(case_name, run_case)| {
                    let prior = priors.iter().find_map(|doc| {
                        doc.get(filename)
                            .and_then(|file| file.cases.get(case_name))
                    });
                    let since = since_for(prior, run_case);
                    let case = CaseStats {
                        since: Some(since),
                        ..run_case.clone()
                    };
                    (case_name.clone(), case)
                })
                .collect();

            let file = FileStats {
                class_name: run_file.class_name.clone(),
                seconds: run_file.seconds,
                cases,
            };
            (filename.clone(), file)
        })
        .collect()
}

/// Merges the statistics of a run into `base`, using `base` as the prior record.
///
/// Files and cases that the run didn't touch are left exactly as they were.
pub(crate) fn merge_run_into(base: &mut StatsDocument, run: &StatsDocument) {
    let merged = merge_run(&[&*base], run);
    overlay(base, merged);
}

/// Returns the `since` value for a case that just ran, given its previous record.
fn since_for(prior: Option<&CaseStats>, current: &CaseStats) -> String {
    match prior {
        Some(prior) if prior.last_result == current.last_result => prior
            .since
            .clone()
            .unwrap_or_else(|| current.last_run.clone()),
        // Either the result changed, or this case has never been recorded.
        _ => current.last_run.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;
    use pretty_assertions::assert_eq;
    use realm_metadata::LastResult;

    const T1: &str = "1700000000 Tue, 14 Nov 2023 22:13:20 +0000";
    const T2: &str = "1700003600 Tue, 14 Nov 2023 23:13:20 +0000";
    const T3: &str = "1700007200 Wed, 15 Nov 2023 00:13:20 +0000";

    fn case(last_result: LastResult, last_run: &str, since: Option<&str>) -> CaseStats {
        CaseStats {
            seconds: 0.5,
            last_result,
            last_run: last_run.to_owned(),
            since: since.map(str::to_owned),
        }
    }

    fn document(filename: &str, case_name: &str, stats: CaseStats) -> StatsDocument {
        let mut doc = StatsDocument::new();
        let file = doc.file_mut(filename);
        file.class_name = "WidgetTest".to_owned();
        file.seconds = stats.seconds;
        file.cases.insert(case_name.to_owned(), stats);
        doc
    }

    const FILE: &str = "test/unit/widget_test.rb";

    #[test]
    fn transition_sets_since() {
        let mut base = document(FILE, "test_spin", case(LastResult::Success, T1, Some(T1)));
        let run = document(FILE, "test_spin", case(LastResult::Failure, T2, None));
        merge_run_into(&mut base, &run);

        let merged = &base.get(FILE).unwrap().cases["test_spin"];
        assert_eq!(merged.last_result, LastResult::Failure);
        assert_eq!(merged.last_run, T2);
        assert_eq!(merged.since.as_deref(), Some(T2));
    }

    #[test]
    fn same_result_keeps_since() {
        let mut base = document(FILE, "test_spin", case(LastResult::Success, T2, Some(T1)));
        let run = document(FILE, "test_spin", case(LastResult::Success, T3, None));
        merge_run_into(&mut base, &run);

        let merged = &base.get(FILE).unwrap().cases["test_spin"];
        assert_eq!(merged.last_run, T3);
        assert_eq!(merged.since.as_deref(), Some(T1));
    }

    #[test]
    fn same_result_without_prior_since() {
        let mut base = document(FILE, "test_spin", case(LastResult::Failure, T1, None));
        let run = document(FILE, "test_spin", case(LastResult::Failure, T2, None));
        merge_run_into(&mut base, &run);

        let merged = &base.get(FILE).unwrap().cases["test_spin"];
        assert_eq!(merged.since.as_deref(), Some(T2));
    }

    #[test]
    fn new_case_sets_since() {
        let mut base = StatsDocument::new();
        let run = document(FILE, "test_spin", case(LastResult::Success, T1, None));
        merge_run_into(&mut base, &run);

        let file = base.get(FILE).unwrap();
        assert_eq!(file.class_name, "WidgetTest");
        assert_eq!(file.cases["test_spin"].since.as_deref(), Some(T1));
    }

    #[test]
    fn disjoint_keys_are_unchanged() {
        let existing = indoc! {"
            test/unit/gadget_test.rb:
              _class: GadgetTest
              _seconds: 1.5
              test_a:
                seconds: 1.5
                last_result: failure
                last_run: 1700000000 Tue, 14 Nov 2023 22:13:20 +0000
                since: 1699990000 Tue, 14 Nov 2023 19:26:40 +0000
        "};
        let mut base = StatsDocument::from_yaml_str(existing).unwrap();
        let gadget = |doc: &StatsDocument| {
            let file = doc.get("test/unit/gadget_test.rb").unwrap().clone();
            std::iter::once(("test/unit/gadget_test.rb".to_owned(), file))
                .collect::<StatsDocument>()
                .to_yaml_string()
                .unwrap()
        };
        let before = gadget(&base);

        let run = document(FILE, "test_spin", case(LastResult::Success, T2, None));
        merge_run_into(&mut base, &run);

        assert_eq!(base.len(), 2);
        assert_eq!(gadget(&base), before);
    }

    #[test]
    fn file_metadata_is_overwritten() {
        let mut base = document(FILE, "test_old", case(LastResult::Success, T1, Some(T1)));
        base.get_mut(FILE).unwrap().seconds = 42.0;

        let mut run = document(FILE, "test_spin", case(LastResult::Success, T2, None));
        {
            let file = run.get_mut(FILE).unwrap();
            file.class_name = "RenamedWidgetTest".to_owned();
            file.seconds = 0.25;
        }
        merge_run_into(&mut base, &run);

        let file = base.get(FILE).unwrap();
        assert_eq!(file.class_name, "RenamedWidgetTest");
        assert_eq!(file.seconds, 0.25);
        assert_eq!(file.cases.len(), 2, "cases not in the run are kept");
        assert_eq!(file.cases["test_old"], case(LastResult::Success, T1, Some(T1)));
    }

    #[test]
    fn overlay_prefers_newer() {
        let mut base = document(FILE, "test_spin", case(LastResult::Success, T1, Some(T1)));
        base.file_mut("test/unit/gadget_test.rb").class_name = "GadgetTest".to_owned();

        let mut newer = document(FILE, "test_spin", case(LastResult::Failure, T2, Some(T2)));
        newer
            .get_mut(FILE)
            .unwrap()
            .cases
            .insert("test_wobble".to_owned(), case(LastResult::Success, T2, Some(T2)));
        overlay(&mut base, newer);

        assert_eq!(base.len(), 2);
        let file = base.get(FILE).unwrap();
        assert_eq!(file.cases.len(), 2);
        assert_eq!(
            file.cases["test_spin"],
            case(LastResult::Failure, T2, Some(T2))
        );
        assert_eq!(
            base.get("test/unit/gadget_test.rb").unwrap().class_name,
            "GadgetTest"
        );
    }

    #[test]
    fn first_prior_with_the_case_wins() {
        const T5: &str = "1700014400 Wed, 15 Nov 2023 02:13:20 +0000";
        let baseline = document(FILE, "test_spin", case(LastResult::Failure, T3, Some(T5)));
        let local = document(FILE, "test_spin", case(LastResult::Success, T1, Some(T1)));
        let run = document(FILE, "test_spin", case(LastResult::Failure, T2, None));

        let merged = merge_run(&[&baseline, &local], &run);
        assert_eq!(
            merged.get(FILE).unwrap().cases["test_spin"].since.as_deref(),
            Some(T5)
        );

        let empty = StatsDocument::new();
        let merged = merge_run(&[&empty, &local], &run);
        assert_eq!(
            merged.get(FILE).unwrap().cases["test_spin"].since.as_deref(),
            Some(T2),
            "falls back to the next prior, where the result changed"
        );
    }
}
