//! Integration tests for the content-store wire format.

use richblocks::render::{to_wire, BlockBody};
use richblocks::{parse_html, to_json, JsonFormat, WireBlock};
use serde_json::{json, Value};

#[test]
fn test_linked_bold_run_on_the_wire() {
    let json = to_json(
        r#"<p><b><a href="https://example.com">Go</a></b></p>"#,
        JsonFormat::Compact,
    )
    .unwrap();
    let value: Value = serde_json::from_str(&json).unwrap();

    let runs = &value[0]["paragraph"]["rich_text"];
    assert_eq!(runs.as_array().unwrap().len(), 2);

    assert_eq!(runs[0]["text"]["content"], "Go");
    assert_eq!(runs[0]["text"]["link"], json!({ "url": "https://example.com" }));
    assert_eq!(runs[0]["href"], "https://example.com");
    assert_eq!(runs[0]["annotations"]["bold"], true);
    assert_eq!(runs[0]["annotations"]["color"], "default");

    // the spacer after a link inherits enclosing styles but no link
    assert_eq!(runs[1]["text"]["content"], " ");
    assert_eq!(runs[1]["text"]["link"], Value::Null);
    assert_eq!(runs[1]["href"], Value::Null);
    assert_eq!(runs[1]["annotations"]["bold"], true);
}

#[test]
fn test_every_block_repeats_its_type_key() {
    let blocks = parse_html("<p>a</p><ul><li>b</li></ul>");
    let value = serde_json::to_value(to_wire(&blocks)).unwrap();

    for block in value.as_array().unwrap() {
        assert_eq!(block["object"], "block");
        let kind = block["type"].as_str().unwrap();
        assert!(block[kind]["rich_text"].is_array(), "missing payload for {}", kind);
    }
    assert_eq!(value[1]["type"], "bulleted_list_item");
}

#[test]
fn test_empty_document_is_an_empty_array() {
    assert_eq!(to_json("", JsonFormat::Compact).unwrap(), "[]");
    assert_eq!(to_json("<div></div>", JsonFormat::Pretty).unwrap(), "[]");
}

#[test]
fn test_client_blocks_are_accepted() {
    // blocks as converted in the browser, without the optional fields
    let client = json!([
        {
            "object": "block",
            "type": "paragraph",
            "paragraph": {
                "rich_text": [{
                    "type": "text",
                    "text": { "content": "Hello ", "link": null },
                    "annotations": { "bold": true, "italic": false, "strikethrough": false,
                                     "underline": false, "code": false, "color": "default" }
                }]
            }
        },
        {
            "type": "numbered_list_item",
            "numbered_list_item": { "rich_text": [{ "text": { "content": "one" } }] }
        }
    ]);

    let blocks: Vec<WireBlock> = serde_json::from_value(client).unwrap();
    assert_eq!(blocks.len(), 2);
    assert_eq!(blocks[0].type_name(), "paragraph");
    assert_eq!(blocks[1].object, "block");

    let first = blocks[0].to_block().unwrap();
    assert!(first.runs[0].style.bold);
    assert_eq!(first.runs[0].text, "Hello ");

    match &blocks[1].body {
        BlockBody::NumberedListItem { numbered_list_item } => {
            assert_eq!(numbered_list_item.rich_text[0].text.content, "one");
            assert!(!numbered_list_item.rich_text[0].annotations.has_styling());
        }
        other => panic!("unexpected body {:?}", other),
    }
}

#[test]
fn test_media_blocks() {
    let image = serde_json::to_value(WireBlock::image("https://img/x.jpg", "https://ep/1")).unwrap();
    assert_eq!(image["type"], "image");
    assert_eq!(image["image"]["type"], "external");
    assert_eq!(image["image"]["external"]["url"], "https://img/x.jpg");
    assert_eq!(image["image"]["caption"][0]["text"]["content"], "https://ep/1");

    let embed = serde_json::to_value(WireBlock::embed("https://audio/1.mp3")).unwrap();
    assert_eq!(embed, json!({
        "object": "block",
        "type": "embed",
        "embed": { "url": "https://audio/1.mp3" }
    }));
    assert!(WireBlock::embed("x").to_block().is_none());
}
