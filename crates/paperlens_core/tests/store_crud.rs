use paperlens_core::{
    default_folder_id, LibraryStore, MethodologyAnalysis, PaperAnalysis, PartitionSnapshot,
    StoreObserver,
};
use std::cell::RefCell;
use std::rc::Rc;
use uuid::Uuid;

fn sample_analysis(title_en: &str) -> PaperAnalysis {
    PaperAnalysis {
        title_en: title_en.to_string(),
        title_cn: format!("{title_en} (cn)"),
        authors: vec!["A. Author".to_string()],
        keywords: vec!["keyword".to_string()],
        summary_cn: "summary".to_string(),
        conclusions: vec!["conclusion".to_string()],
        methodology: MethodologyAnalysis {
            level_1_concept: "concept".to_string(),
            level_2_process: "process".to_string(),
            level_3_technical: "technical".to_string(),
            key_methods: Vec::new(),
        },
        figures: Vec::new(),
    }
}

#[test]
fn new_store_seeds_the_default_folder() {
    let store = LibraryStore::new();
    assert_eq!(store.folders().len(), 1);
    assert!(store.folders()[0].is_default());
    assert_eq!(store.folders()[0].id, default_folder_id());
}

#[test]
fn create_paper_prepends_and_defaults_to_the_default_folder() {
    let mut store = LibraryStore::new();
    let first = store.create_paper(sample_analysis("first"), None);
    let second = store.create_paper(sample_analysis("second"), None);

    assert_eq!(store.papers().len(), 2);
    assert_eq!(store.papers()[0].id, second);
    assert_eq!(store.papers()[1].id, first);
    assert_eq!(store.papers()[0].folder_id, default_folder_id());
}

#[test]
fn create_paper_with_unknown_folder_falls_back_to_default() {
    let mut store = LibraryStore::new();
    let id = store.create_paper(sample_analysis("stray"), Some(Uuid::new_v4()));
    assert_eq!(store.paper(id).unwrap().folder_id, default_folder_id());
}

#[test]
fn delete_paper_is_a_no_op_for_unknown_ids() {
    let mut store = LibraryStore::new();
    store.create_paper(sample_analysis("keep"), None);
    assert!(!store.delete_paper(Uuid::new_v4()));
    assert_eq!(store.papers().len(), 1);
}

#[test]
fn delete_paper_leaves_highlights_dangling() {
    let mut store = LibraryStore::new();
    let paper_id = store.create_paper(sample_analysis("annotated"), None);
    let highlight_id = store
        .create_highlight(paper_id, "selected text", "note", "Abstract")
        .unwrap();

    assert!(store.delete_paper(paper_id));
    let highlight = store.highlight(highlight_id).unwrap();
    assert_eq!(highlight.paper_id, paper_id);

    let orphans = store.orphaned_highlights();
    assert_eq!(orphans.len(), 1);
    assert_eq!(orphans[0].id, highlight_id);
}

#[test]
fn move_paper_is_silent_for_unknown_papers_and_refuses_unknown_folders() {
    let mut store = LibraryStore::new();
    let paper_id = store.create_paper(sample_analysis("mover"), None);
    let folder_id = store.create_folder("Methods").unwrap();

    assert!(!store.move_paper(Uuid::new_v4(), folder_id));
    assert!(!store.move_paper(paper_id, Uuid::new_v4()));
    assert_eq!(store.paper(paper_id).unwrap().folder_id, default_folder_id());

    assert!(store.move_paper(paper_id, folder_id));
    assert_eq!(store.paper(paper_id).unwrap().folder_id, folder_id);
}

#[test]
fn create_folder_refuses_blank_names() {
    let mut store = LibraryStore::new();
    assert!(store.create_folder("   ").is_none());
    assert!(store.create_folder("").is_none());
    assert_eq!(store.folders().len(), 1);

    let id = store.create_folder("  Spectroscopy  ").unwrap();
    assert_eq!(store.folder(id).unwrap().name, "Spectroscopy");
}

#[test]
fn default_folder_can_never_be_deleted() {
    let mut store = LibraryStore::new();
    assert!(!store.delete_folder(default_folder_id()));
    assert_eq!(store.folders().len(), 1);
}

#[test]
fn delete_folder_reassigns_papers_before_removal() {
    let mut store = LibraryStore::new();
    let folder_id = store.create_folder("Doomed").unwrap();
    let in_folder = store.create_paper(sample_analysis("inside"), Some(folder_id));
    let elsewhere = store.create_paper(sample_analysis("outside"), None);

    assert!(store.delete_folder(folder_id));

    assert!(store.folder(folder_id).is_none());
    assert_eq!(store.paper(in_folder).unwrap().folder_id, default_folder_id());
    assert_eq!(store.paper(elsewhere).unwrap().folder_id, default_folder_id());
    for paper in store.papers() {
        assert!(store.folder_exists(paper.folder_id));
    }
}

#[test]
fn folder_references_resolve_after_arbitrary_op_sequences() {
    let mut store = LibraryStore::new();
    let methods = store.create_folder("Methods").unwrap();
    let results = store.create_folder("Results").unwrap();

    let a = store.create_paper(sample_analysis("a"), Some(methods));
    let b = store.create_paper(sample_analysis("b"), Some(results));
    let c = store.create_paper(sample_analysis("c"), None);

    store.move_paper(a, results);
    store.delete_folder(results);
    store.move_paper(b, methods);
    store.delete_paper(c);
    store.delete_folder(methods);

    for paper in store.papers() {
        assert!(
            store.folder_exists(paper.folder_id),
            "paper {} references missing folder {}",
            paper.id,
            paper.folder_id
        );
    }
}

#[test]
fn create_highlight_requires_a_known_paper_and_non_blank_text() {
    let mut store = LibraryStore::new();
    let paper_id = store.create_paper(sample_analysis("target"), None);

    assert!(store.create_highlight(Uuid::new_v4(), "valid text", "", "General").is_none());
    assert!(store.create_highlight(paper_id, "   ", "", "General").is_none());
    assert!(store.highlights().is_empty());

    let id = store
        .create_highlight(paper_id, "  trimmed text  ", "a note", "Abstract")
        .unwrap();
    let highlight = store.highlight(id).unwrap();
    assert_eq!(highlight.text, "trimmed text");
    assert_eq!(highlight.paper_title, "target (cn)");
    assert_eq!(highlight.section, "Abstract");
}

#[test]
fn highlight_title_snapshot_survives_paper_deletion() {
    let mut store = LibraryStore::new();
    let paper_id = store.create_paper(sample_analysis("snapshot"), None);
    let id = store
        .create_highlight(paper_id, "remembered words", "", "General")
        .unwrap();

    store.delete_paper(paper_id);
    assert_eq!(store.highlight(id).unwrap().paper_title, "snapshot (cn)");
}

#[test]
fn highlight_create_then_delete_restores_prior_state() {
    let mut store = LibraryStore::new();
    let paper_id = store.create_paper(sample_analysis("roundtrip"), None);
    store
        .create_highlight(paper_id, "existing highlight", "", "General")
        .unwrap();
    let before: Vec<_> = store.highlights().to_vec();

    let id = store
        .create_highlight(paper_id, "ephemeral highlight", "temp", "General")
        .unwrap();
    assert_eq!(store.highlights().len(), before.len() + 1);

    assert!(store.delete_highlight(id));
    assert_eq!(store.highlights(), before.as_slice());

    assert!(!store.delete_highlight(id));
}

#[test]
fn set_paper_tags_normalizes_and_replaces() {
    let mut store = LibraryStore::new();
    let paper_id = store.create_paper(sample_analysis("tagged"), None);

    assert!(store.set_paper_tags(
        paper_id,
        &["NIR".to_string(), " nir ".to_string(), "Chemometrics".to_string(), "  ".to_string()],
    ));
    assert_eq!(store.paper(paper_id).unwrap().tags, vec!["chemometrics", "nir"]);

    assert!(!store.set_paper_tags(Uuid::new_v4(), &["x".to_string()]));
}

struct RecordingObserver {
    events: Rc<RefCell<Vec<String>>>,
}

impl StoreObserver for RecordingObserver {
    fn collection_changed(&mut self, snapshot: PartitionSnapshot<'_>) {
        let event = match snapshot {
            PartitionSnapshot::Papers(papers) => format!("papers:{}", papers.len()),
            PartitionSnapshot::Folders(folders) => format!("folders:{}", folders.len()),
            PartitionSnapshot::Highlights(highlights) => {
                format!("highlights:{}", highlights.len())
            }
        };
        self.events.borrow_mut().push(event);
    }
}

#[test]
fn every_mutation_notifies_the_observer_before_returning() {
    let events = Rc::new(RefCell::new(Vec::new()));
    let mut store = LibraryStore::new();
    store.set_observer(Box::new(RecordingObserver {
        events: Rc::clone(&events),
    }));

    let folder_id = store.create_folder("Methods").unwrap();
    let paper_id = store.create_paper(sample_analysis("observed"), Some(folder_id));
    store.create_highlight(paper_id, "watched text", "", "General").unwrap();

    assert_eq!(
        events.borrow().as_slice(),
        ["folders:2", "papers:1", "highlights:1"]
    );
}

#[test]
fn refused_operations_do_not_notify() {
    let events = Rc::new(RefCell::new(Vec::new()));
    let mut store = LibraryStore::new();
    store.set_observer(Box::new(RecordingObserver {
        events: Rc::clone(&events),
    }));

    store.create_folder("   ");
    store.delete_folder(default_folder_id());
    store.delete_paper(Uuid::new_v4());
    store.create_highlight(Uuid::new_v4(), "valid text", "", "General");

    assert!(events.borrow().is_empty());
}

#[test]
fn folder_deletion_flushes_papers_before_folders() {
    let events = Rc::new(RefCell::new(Vec::new()));
    let mut store = LibraryStore::new();
    let folder_id = store.create_folder("Transient").unwrap();
    store.create_paper(sample_analysis("resident"), Some(folder_id));

    store.set_observer(Box::new(RecordingObserver {
        events: Rc::clone(&events),
    }));
    store.delete_folder(folder_id);

    // The paper snapshot (already reassigned) lands before the folder
    // snapshot, so no durable state references the removed folder.
    assert_eq!(events.borrow().as_slice(), ["papers:1", "folders:1"]);
}
