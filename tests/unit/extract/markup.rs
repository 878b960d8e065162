use super::*;

fn block_syntax() -> MarkupSyntax {
    MarkupSyntax {
        begin: "BEGIN-BLOCK".to_owned(),
        end: "END-BLOCK".to_owned(),
        ..MarkupSyntax::default()
    }
}

fn texts(records: &[SlideLine]) -> Vec<&str> {
    records.iter().map(SlideLine::text).collect()
}

#[test]
fn extracts_lines_and_joins_escaped_breaks() {
    let ex = Extractor::new(block_syntax());
    let records = ex
        .extract("BEGIN-BLOCK\nHello\nWorld\\nAgain\nEND-BLOCK")
        .unwrap();
    assert_eq!(texts(&records), vec!["Hello", "World\nAgain"]);
    assert_eq!(records[1].lines(), vec!["World", "Again"]);
}

#[test]
fn unbalanced_delimiters_are_malformed() {
    let ex = Extractor::new(block_syntax());
    for raw in [
        "BEGIN-BLOCK\nHello",
        "Hello\nEND-BLOCK",
        "BEGIN-BLOCK\nA\nEND-BLOCK\nBEGIN-BLOCK\nB",
    ] {
        let err = ex.extract(raw).unwrap_err();
        assert!(matches!(err, RavaError::MalformedMarkup(_)), "{raw:?}");
    }
}

#[test]
fn misordered_and_nested_delimiters_are_malformed() {
    let ex = Extractor::new(block_syntax());
    let misordered = ex.extract("END-BLOCK\nA\nBEGIN-BLOCK").unwrap_err();
    assert!(matches!(misordered, RavaError::MalformedMarkup(_)));

    let nested = ex
        .extract("BEGIN-BLOCK\nBEGIN-BLOCK\nA\nEND-BLOCK\nEND-BLOCK")
        .unwrap_err();
    assert!(nested.to_string().contains("line 2"));
}

#[test]
fn input_without_blocks_reports_no_blocks() {
    let ex = Extractor::new(block_syntax());
    let err = ex.extract("just a title\nand some notes").unwrap_err();
    assert!(matches!(err, RavaError::NoBlocks(_)));
}

#[test]
fn blocks_without_lyric_lines_report_no_blocks() {
    let ex = Extractor::new(block_syntax());
    let err = ex
        .extract("BEGIN-BLOCK\n% comment only\n\\vspace{1em}\n\nEND-BLOCK\n")
        .unwrap_err();
    assert!(matches!(err, RavaError::NoBlocks(_)));

    // A lone blank token is still a slide.
    let records = ex.extract("BEGIN-BLOCK\n~\nEND-BLOCK").unwrap();
    assert_eq!(records.len(), 1);
}

#[test]
fn blank_token_yields_exactly_one_empty_record() {
    let ex = Extractor::new(block_syntax());
    let records = ex
        .extract("BEGIN-BLOCK\nVerse\n  ~  \nChorus\nEND-BLOCK")
        .unwrap();
    assert_eq!(texts(&records), vec!["Verse", "", "Chorus"]);
    assert!(records[1].is_blank());
    assert!(records[1].lines().is_empty());
}

#[test]
fn material_outside_blocks_and_directives_are_ignored() {
    let ex = Extractor::new(block_syntax());
    let raw = "\
Title: Opening
BEGIN-BLOCK
% stage direction
\\textbf{not lyrics}

First   line   here
END-BLOCK
commentary between blocks
BEGIN-BLOCK
   Second block
END-BLOCK
";
    let records = ex.extract(raw).unwrap();
    assert_eq!(texts(&records), vec!["First line here", "Second block"]);
}

#[test]
fn default_syntax_reads_latex_obeylines() {
    let ex = Extractor::default();
    let raw = "\
\\section{Finale}
\\begin{obeylines}
Sing it loud \\\\
Sing it\\nproud
~
\\end{obeylines}
";
    let records = ex.extract(raw).unwrap();
    assert_eq!(texts(&records), vec!["Sing it loud", "Sing it\nproud", ""]);
}

#[test]
fn syntax_validation_rejects_empty_and_identical_delimiters() {
    let mut s = MarkupSyntax::default();
    s.begin = "  ".to_owned();
    assert!(s.validate().is_err());

    let mut s = MarkupSyntax::default();
    s.end = s.begin.clone();
    assert!(s.validate().is_err());

    MarkupSyntax::default().validate().unwrap();
}
