use paperlens_core::{mark_terms, MethodDetail, MethodologyAnalysis, MethodologyLevel, ProseSpan, TermPopover};

fn method(name: &str, full_name: &str) -> MethodDetail {
    MethodDetail {
        name: name.to_string(),
        full_name: full_name.to_string(),
        description: format!("{full_name} explained"),
    }
}

fn reconstruct(spans: &[ProseSpan<'_>]) -> String {
    spans.iter().map(|span| span.text()).collect()
}

fn term_names<'a>(spans: &'a [ProseSpan<'_>]) -> Vec<&'a str> {
    spans
        .iter()
        .filter_map(|span| match span {
            ProseSpan::Term { method, .. } => Some(method.name.as_str()),
            ProseSpan::Plain(_) => None,
        })
        .collect()
}

#[test]
fn longer_term_wins_over_its_prefix() {
    let methods = vec![
        method("PLS", "Partial Least Squares"),
        method("PLSR", "Partial Least Squares Regression"),
    ];
    let prose = "We used PLSR for regression.";
    let spans = mark_terms(prose, &methods);

    assert_eq!(term_names(&spans), vec!["PLSR"]);
    assert_eq!(reconstruct(&spans), prose);
}

#[test]
fn glossary_order_does_not_matter_for_precedence() {
    // Same fixture with the longer name listed first.
    let methods = vec![
        method("PLSR", "Partial Least Squares Regression"),
        method("PLS", "Partial Least Squares"),
    ];
    let spans = mark_terms("PLS differs from PLSR.", &methods);
    assert_eq!(term_names(&spans), vec!["PLS", "PLSR"]);
}

#[test]
fn plain_prose_passes_through_byte_for_byte() {
    let methods = vec![method("MCMC", "Markov Chain Monte Carlo")];
    let prose = "Nothing here mentions sampling,\n  but whitespace\tmatters.";
    let spans = mark_terms(prose, &methods);

    assert_eq!(spans.len(), 1);
    assert!(matches!(spans[0], ProseSpan::Plain(_)));
    assert_eq!(reconstruct(&spans), prose);
}

#[test]
fn empty_glossary_is_the_identity_transform() {
    let prose = "Any text with PLSR stays untouched.";
    let spans = mark_terms(prose, &[]);
    assert_eq!(spans, vec![ProseSpan::Plain(prose)]);
}

#[test]
fn matches_are_case_insensitive_but_keep_source_casing() {
    let methods = vec![method("ANOVA", "Analysis of Variance")];
    let prose = "We ran anova and then Anova again.";
    let spans = mark_terms(prose, &methods);

    let terms: Vec<_> = spans
        .iter()
        .filter_map(|span| match span {
            ProseSpan::Term { text, method } => Some((*text, method.name.as_str())),
            ProseSpan::Plain(_) => None,
        })
        .collect();
    assert_eq!(terms, vec![("anova", "ANOVA"), ("Anova", "ANOVA")]);
    assert_eq!(reconstruct(&spans), prose);
}

#[test]
fn every_occurrence_is_marked_in_source_order() {
    let methods = vec![
        method("SVM", "Support Vector Machine"),
        method("PCA", "Principal Component Analysis"),
    ];
    let prose = "PCA first, then SVM, then PCA again.";
    let spans = mark_terms(prose, &methods);

    assert_eq!(term_names(&spans), vec!["PCA", "SVM", "PCA"]);
    assert_eq!(reconstruct(&spans), prose);
}

#[test]
fn terms_embedded_in_cjk_prose_are_matched() {
    let methods = vec![method("PLSR", "Partial Least Squares Regression")];
    let prose = "本文采用PLSR建立预测模型。";
    let spans = mark_terms(prose, &methods);

    assert_eq!(term_names(&spans), vec!["PLSR"]);
    assert_eq!(reconstruct(&spans), prose);
}

#[test]
fn word_boundaries_block_partial_matches() {
    let methods = vec![method("PLS", "Partial Least Squares")];
    let prose = "PLSR is not PLS, and SPLS is neither.";
    let spans = mark_terms(prose, &methods);

    // Only the standalone mention is a term.
    assert_eq!(term_names(&spans), vec!["PLS"]);
    assert_eq!(reconstruct(&spans), prose);
}

#[test]
fn punctuation_adjacent_terms_still_match() {
    let methods = vec![method("MCMC", "Markov Chain Monte Carlo")];
    let prose = "Sampling (MCMC) converged; MCMC, again.";
    let spans = mark_terms(prose, &methods);
    assert_eq!(term_names(&spans), vec!["MCMC", "MCMC"]);
    assert_eq!(reconstruct(&spans), prose);
}

#[test]
fn regex_metacharacters_in_names_are_literal() {
    let methods = vec![method("C4.5", "C4.5 Decision Tree")];
    let prose = "The C4.5 learner beat C405 easily.";
    let spans = mark_terms(prose, &methods);
    assert_eq!(term_names(&spans), vec!["C4.5"]);
    assert_eq!(reconstruct(&spans), prose);
}

#[test]
fn popover_shows_one_entry_and_replaces_on_reselect() {
    let pls = method("PLS", "Partial Least Squares");
    let mcmc = method("MCMC", "Markov Chain Monte Carlo");
    let mut popover = TermPopover::new();
    assert!(!popover.is_open());

    popover.select(&pls);
    assert_eq!(popover.selected().unwrap().name, "PLS");

    popover.select(&mcmc);
    assert_eq!(popover.selected().unwrap().name, "MCMC");

    popover.dismiss();
    assert!(!popover.is_open());
    assert!(popover.selected().is_none());
}

#[test]
fn methodology_levels_select_their_narratives() {
    let methodology = MethodologyAnalysis {
        level_1_concept: "concept text".to_string(),
        level_2_process: "process text".to_string(),
        level_3_technical: "technical text".to_string(),
        key_methods: Vec::new(),
    };

    assert_eq!(MethodologyLevel::default(), MethodologyLevel::Technical);
    assert_eq!(
        MethodologyLevel::Concept.narrative(&methodology),
        "concept text"
    );
    assert_eq!(
        MethodologyLevel::Process.narrative(&methodology),
        "process text"
    );
    assert_eq!(
        MethodologyLevel::Technical.narrative(&methodology),
        "technical text"
    );
    assert_eq!(MethodologyLevel::ALL.len(), 3);
}
