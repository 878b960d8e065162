use super::*;

#[test]
fn multi_line_records_stay_on_one_physical_line() {
    let records = vec![
        SlideLine::new("Hello"),
        SlideLine::new("World\nAgain"),
        SlideLine::blank(),
    ];
    let text = render_preprocessed(&records);
    assert_eq!(text, "Hello\nWorld\u{b}Again\n\n");
    assert_eq!(text.lines().count(), 3);
    assert_eq!(parse_preprocessed(&text), records);
}

#[test]
fn plain_text_is_one_record_per_line() {
    let records = parse_preprocessed("First line\r\n\r\n  Second line  \n");
    assert_eq!(
        records,
        vec![
            SlideLine::new("First line"),
            SlideLine::blank(),
            SlideLine::new("Second line"),
        ]
    );
}
