//! Unit tests for the Content Extractor: strategy priority, length
//! thresholds, fallbacks and chat transcript extraction.

use pagekeeper::services::content_extractor::{
    ContentExtractor, ContentExtractorTrait, Pick, Strategy,
};
use pagekeeper::services::document::Document;

fn words(n: usize) -> String {
    vec!["lorem"; n].join(" ")
}

fn extract(html: &str) -> String {
    let doc = Document::parse("https://ex.com/page", None, html);
    ContentExtractor::new().extract(&doc).content
}

#[test]
fn test_article_wins_over_everything_else() {
    let html = format!(
        "<html><head><title>T</title></head><body><main>{}</main><article>{}</article></body></html>",
        words(60),
        format!("ARTICLE {}", words(30))
    );
    assert!(extract(&html).starts_with("ARTICLE"));
}

#[test]
fn test_short_article_falls_through_to_main() {
    let html = format!(
        "<body><article>too short</article><main>MAIN {}</main></body>",
        words(30)
    );
    assert!(extract(&html).starts_with("MAIN"));
}

#[test]
fn test_threshold_is_strictly_greater_than() {
    // exactly 100 characters is not enough for an article
    let exact = "a".repeat(100);
    let html = format!("<body><article>{}</article><p>tail</p></body>", exact);
    let content = extract(&html);
    assert!(content.ends_with("tail"));

    let over = "a".repeat(101);
    let html = format!("<body><article>{}</article><p>tail</p></body>", over);
    assert_eq!(extract(&html), over);
}

#[test]
fn test_webmail_body_selectors() {
    let gmail = "<body><div class=\"a3s ii gt\">Meeting moved to 3pm, see you</div></body>";
    assert_eq!(extract(gmail), "Meeting moved to 3pm, see you");

    let outlook = "<body><div aria-label=\"Message body\">Please submit the report by Friday</div></body>";
    assert_eq!(extract(outlook), "Please submit the report by Friday");
}

#[test]
fn test_longest_block_over_three_hundred_chars() {
    let short = format!("SHORT {}", words(55));
    let long = format!("LONG {}", words(70));
    let html = format!(
        "<body><section>{}</section><div>{}</div><nav>menu</nav></body>",
        short, long
    );
    assert!(extract(&html).starts_with("LONG"));
}

#[test]
fn test_fallback_to_body_text() {
    let html = "<html><head><title>Tiny</title></head><body><h1>Hello</h1><p>World</p></body></html>";
    assert_eq!(extract(html), "Hello\nWorld");
}

#[test]
fn test_fallback_without_body_uses_whole_document() {
    assert_eq!(extract("just some text"), "just some text");
}

#[test]
fn test_empty_document_yields_empty_content() {
    assert_eq!(extract(""), "");
}

#[test]
fn test_title_from_document_or_host() {
    let html = "<html><head><title> Quarterly\n Plan </title></head><body>x</body></html>";
    let doc = Document::parse("https://ex.com", None, html);
    assert_eq!(ContentExtractor::new().extract(&doc).title, "Quarterly Plan");

    let doc = Document::parse("https://ex.com", Some("From tab"), html);
    let content = ContentExtractor::new().extract(&doc);
    assert_eq!(content.title, "From tab");
    assert_eq!(content.url, "https://ex.com");
}

#[test]
fn test_scripts_do_not_count_toward_text() {
    let html = format!(
        "<body><article><script>{}</script>short</article><p>rest</p></body>",
        words(50)
    );
    assert_eq!(extract(&html), "short\nrest");
}

#[test]
fn test_custom_strategies() {
    let extractor = ContentExtractor::with_strategies(vec![Strategy {
        selector: ".post",
        min_chars: 3,
        pick: Pick::First,
    }]);
    let doc = Document::parse("u", None, "<body><div class=\"post\">Body text</div><p>x</p></body>");
    assert_eq!(extractor.extract(&doc).content, "Body text");
}

#[test]
fn test_named_entities_are_decoded() {
    let html = format!(
        "<body><article>It&rsquo;s the team&mdash;and it&hellip; costs &euro;5. {}</article></body>",
        words(20)
    );
    let content = extract(&html);
    assert!(content.starts_with("It\u{2019}s the team\u{2014}and it\u{2026} costs \u{20ac}5."));
    assert!(!content.contains('&'));
}

#[test]
fn test_deeply_nested_page_extracts_on_a_small_stack() {
    let depth = 5_000;
    let html = format!(
        "<body>{}deep text{}</body>",
        "<div>".repeat(depth),
        "</div>".repeat(depth)
    );
    let content = std::thread::Builder::new()
        .stack_size(512 * 1024)
        .spawn(move || extract(&html))
        .unwrap()
        .join()
        .expect("extraction must not overflow the stack");
    assert_eq!(content, "deep text");
}

// ─── Chat transcripts ───

fn chat_page(count: usize) -> String {
    let mut html = String::from("<body><div id=\"main\">");
    for i in 0..count {
        html.push_str(&format!(
            "<div class=\"copyable-text\" data-pre-plain-text=\"[10:{:02}, 1/2/2025] Ana: \"><span>msg {}</span></div>",
            i % 60,
            i
        ));
    }
    html.push_str("<div data-pre-plain-text=\"[11:00, 1/2/2025] Bo: \">   </div>");
    html.push_str("</div></body>");
    html
}

#[test]
fn test_extract_chat_reads_meta_and_text() {
    let doc = Document::parse("https://web.whatsapp.com", None, &chat_page(2));
    let messages = ContentExtractor::new().extract_chat(&doc, 200);
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].meta, "[10:00, 1/2/2025] Ana: ");
    assert_eq!(messages[0].text, "msg 0");
}

#[test]
fn test_extract_chat_keeps_last_messages_only() {
    let doc = Document::parse("https://web.whatsapp.com", None, &chat_page(250));
    let messages = ContentExtractor::new().extract_chat(&doc, 200);
    assert_eq!(messages.len(), 200);
    assert_eq!(messages[0].text, "msg 50");
    assert_eq!(messages[199].text, "msg 249");
}

#[test]
fn test_extract_chat_on_page_without_messages() {
    let doc = Document::parse("https://ex.com", None, "<body><p>hi</p></body>");
    assert!(ContentExtractor::new().extract_chat(&doc, 200).is_empty());
}
