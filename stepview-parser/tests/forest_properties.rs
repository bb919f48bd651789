//! Behavior of identifier indexing and the reference forest over whole files

use rstest::rstest;
use stepview_parser::step::testing::{sample_line_of, CYCLIC_FILE, SAMPLE_EXCHANGE_FILE};
use stepview_parser::step::{parse_document, Document, ForestError, SplitMode, TokenKind};

fn root_identifiers(doc: &Document) -> Vec<u64> {
    doc.forest()
        .expect("forest available")
        .root_nodes()
        .map(|node| node.identifier)
        .collect()
}

fn child_identifiers(doc: &Document, identifier: u64) -> Vec<u64> {
    let forest = doc.forest().expect("forest available");
    let line = doc.lookup(identifier).expect("identifier declared");
    let node = forest.node(forest.node_at_line(line).unwrap()).unwrap();
    node.children
        .iter()
        .map(|&child| forest.nodes()[child].identifier)
        .collect()
}

#[test]
fn sample_file_has_single_root() {
    let doc = parse_document(SAMPLE_EXCHANGE_FILE);
    assert_eq!(root_identifiers(&doc), vec![1]);
    assert_eq!(child_identifiers(&doc, 1), vec![2, 7, 8]);
    assert_eq!(child_identifiers(&doc, 3), vec![5, 6]);
    assert_eq!(child_identifiers(&doc, 11), Vec::<u64>::new());
}

#[test]
fn header_lines_are_not_records() {
    let doc = parse_document(SAMPLE_EXCHANGE_FILE);
    let forest = doc.forest().unwrap();
    assert_eq!(forest.len(), 11);
    for line in 0..sample_line_of(1) {
        assert!(forest.node_at_line(line).is_none());
    }
}

#[test]
fn shared_child_appears_under_each_parent() {
    let doc = parse_document(SAMPLE_EXCHANGE_FILE);
    // #6 is referenced by both #3 and #4
    assert!(child_identifiers(&doc, 3).contains(&6));
    assert!(child_identifiers(&doc, 4).contains(&6));
}

#[test]
fn repeated_reference_yields_repeated_child() {
    let doc = parse_document("#1=A(#3,#3);\n#2=B(#3);\n#3=C();");
    assert_eq!(root_identifiers(&doc), vec![1, 2]);
    assert_eq!(child_identifiers(&doc, 1), vec![3, 3]);
    assert_eq!(child_identifiers(&doc, 2), vec![3]);
}

#[rstest]
#[case("#12=X();", Some(12))]
#[case("  #12=X();", None)]
#[case("#0=X();", None)]
#[case("#12 =X();", None)]
#[case("#99999999999999999999=X();", None)]
fn identifier_extraction(#[case] text: &str, #[case] expected: Option<u64>) {
    let doc = parse_document(text);
    assert_eq!(doc.lines()[0].identifier, expected);
}

#[rstest]
#[case("'#1'", TokenKind::String)]
#[case(".T.", TokenKind::Flag)]
#[case("1.E-05", TokenKind::Number)]
#[case("#1", TokenKind::Reference)]
#[case("IFCWALL", TokenKind::Keyword)]
#[case("$", TokenKind::Sign)]
fn classification_priority(#[case] text: &str, #[case] kind: TokenKind) {
    assert_eq!(stepview_parser::step::lexing::classify(text), kind);
}

#[test]
fn duplicate_identifier_last_write_wins() {
    let doc = parse_document("#1=A();\n#2=B(#1);\n#1=C();");
    assert_eq!(doc.lookup(1), Some(2));
    assert_eq!(doc.resolve_reference("#1"), Some(2));
}

#[test]
fn self_reference_is_ignored() {
    let doc = parse_document("#1=A(#1,#2);\n#2=B();");
    assert_eq!(root_identifiers(&doc), vec![1]);
    assert_eq!(child_identifiers(&doc, 1), vec![2]);
}

#[test]
fn dangling_reference_is_ignored() {
    let doc = parse_document("#1=A(#404,#2);\n#2=B();");
    assert_eq!(child_identifiers(&doc, 1), vec![2]);
}

#[test]
fn roots_are_sorted_by_line() {
    let doc = parse_document("#9=A();\n#3=B(#4);\n#4=C();\n#1=D();");
    assert_eq!(root_identifiers(&doc), vec![9, 3, 1]);
}

#[test]
fn cyclic_file_reports_cycle() {
    let doc = parse_document(CYCLIC_FILE);
    let forest = doc.forest().unwrap();
    assert_eq!(root_identifiers(&doc), vec![3]);
    assert_eq!(forest.cycle_edges(), vec![(2, 1)]);
    assert!(forest.unreachable().is_empty());
    assert_eq!(forest.path_to_line(1), Some(vec![0, 0, 0]));
}

#[test]
fn closed_cycle_is_unreachable() {
    let doc = parse_document("#1=A(#2);\n#2=B(#1);");
    let forest = doc.forest().unwrap();
    assert!(forest.roots().is_empty());
    assert_eq!(forest.unreachable(), vec![0, 1]);
    assert_eq!(forest.path_to_line(0), None);
}

#[test]
fn overflowing_reference_makes_forest_unavailable() {
    let doc = parse_document("#1=A(#2);\n#2=B(#123456789012345678901234);");
    assert!(doc.forest().is_none());
    assert_eq!(
        doc.forest_error(),
        Some(&ForestError::MalformedReference {
            line: 1,
            text: "#123456789012345678901234".to_string()
        })
    );
    // the flat view is unaffected
    assert_eq!(doc.lookup(2), Some(1));
    assert_eq!(doc.line_count(), 2);
}

#[test]
fn quote_aware_mode_keeps_quoted_delimiters() {
    let text = "#1=A('a,b(c)',#2);";
    let naive = Document::parse(text, SplitMode::Naive);
    let aware = Document::parse(text, SplitMode::QuoteAware);
    let strings = |doc: &Document| {
        doc.lines()[0]
            .tokens
            .iter()
            .filter(|t| t.kind == TokenKind::String)
            .map(|t| t.text.clone())
            .collect::<Vec<_>>()
    };
    assert!(strings(&naive).is_empty());
    assert_eq!(strings(&aware), vec!["'a,b(c)'".to_string()]);
    assert_eq!(naive.lines()[0].reconstruct(), text);
    assert_eq!(aware.lines()[0].reconstruct(), text);
}

#[test]
fn crlf_source_matches_lf_source() {
    let lf = parse_document(SAMPLE_EXCHANGE_FILE);
    let crlf = parse_document(&SAMPLE_EXCHANGE_FILE.replace('\n', "\r\n"));
    assert_eq!(lf, crlf);
}
