// Copyright 2026 The Vellum Authors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use indoc::indoc;
use speculoos::assert_that;

use vellum::{
    Attributor, BlotSpec, Definition, ModelError, MutationRecord, Scope, Scroll, Value,
};

/// A scroll with the formats most tests need: `bold` (STRONG), `italic`
/// (EM), `header` (H1), a `size` class attributor, a `color` style
/// attributor, and a block-level `align` style attributor.
fn rich_scroll() -> Scroll {
    let mut scroll = Scroll::new();
    scroll
        .register(Definition::Blot(BlotSpec::inline("bold", "strong")))
        .unwrap();
    scroll
        .register(Definition::Blot(BlotSpec::inline("italic", "em")))
        .unwrap();
    scroll
        .register(Definition::Blot(BlotSpec::block("header", "h1")))
        .unwrap();
    scroll
        .register(Definition::Attr(
            Attributor::class("size", "size").with_scope(Scope::INLINE),
        ))
        .unwrap();
    scroll
        .register(Definition::Attr(
            Attributor::style("color", "color").with_scope(Scope::INLINE),
        ))
        .unwrap();
    scroll
        .register(Definition::Attr(
            Attributor::style("align", "text-align").with_scope(Scope::BLOCK),
        ))
        .unwrap();
    scroll
}

#[test]
fn insert_and_read_back_round_trip() {
    let mut scroll = Scroll::new();
    scroll.insert(0, "hello world").unwrap();
    assert_eq!(scroll.html(), "<p>hello world</p>");
    assert_that(&scroll.doc_length()).is_equal_to(11);
    assert_eq!(
        scroll.to_tree(),
        indoc! {r#"
            scroll <DIV>
              block <P>
                text "hello world"
        "#}
    );
    scroll.assert_invariants();
}

#[test]
fn insert_at_the_end_is_an_append() {
    let mut scroll = Scroll::new();
    scroll.insert(0, "hello").unwrap();
    let end = scroll.doc_length();
    scroll.insert(end, "!").unwrap();
    assert_eq!(scroll.html(), "<p>hello!</p>");
    assert_eq!(scroll.doc_length(), 6);
}

#[test]
fn lengths_count_utf16_code_units() {
    let mut scroll = Scroll::new();
    scroll.insert(0, "a\u{1F600}b").unwrap();
    // The emoji is a surrogate pair.
    assert_eq!(scroll.doc_length(), 4);
    scroll.insert(3, "x").unwrap();
    assert_eq!(scroll.html(), "<p>a\u{1F600}xb</p>");
}

#[test]
fn bold_wraps_a_sub_range_and_unbolding_merges_back() {
    let mut scroll = rich_scroll();
    scroll.insert(0, "hello world").unwrap();
    scroll.format(0, 5, "bold", &Value::Bool(true)).unwrap();
    assert_eq!(scroll.html(), "<p><strong>hello</strong> world</p>");
    assert_eq!(scroll.doc_length(), 11);

    let block = scroll.children(scroll.root())[0];
    let strong = scroll.children(block)[0];
    assert_eq!(scroll.formats(strong).get("bold"), Some(&Value::Bool(true)));

    scroll.format(0, 5, "bold", &Value::Bool(false)).unwrap();
    assert_eq!(scroll.html(), "<p>hello world</p>");
    scroll.assert_invariants();
}

#[test]
fn unbolding_the_middle_splits_the_inline() {
    let mut scroll = rich_scroll();
    scroll.insert(0, "hello").unwrap();
    scroll.format(0, 5, "bold", &Value::Bool(true)).unwrap();
    scroll.format(1, 3, "bold", &Value::Bool(false)).unwrap();
    assert_eq!(
        scroll.html(),
        "<p><strong>h</strong>ell<strong>o</strong></p>"
    );
    assert_eq!(scroll.doc_length(), 5);
}

#[test]
fn adjacent_identical_inlines_merge() {
    let mut scroll = rich_scroll();
    scroll.insert(0, "hello").unwrap();
    scroll.format(0, 3, "bold", &Value::Bool(true)).unwrap();
    scroll.format(3, 2, "bold", &Value::Bool(true)).unwrap();
    assert_eq!(scroll.html(), "<p><strong>hello</strong></p>");
}

#[test]
fn differing_format_sets_stay_apart() {
    let mut scroll = rich_scroll();
    scroll.insert(0, "hello").unwrap();
    scroll.format(0, 3, "bold", &Value::Bool(true)).unwrap();
    scroll.format(3, 2, "italic", &Value::Bool(true)).unwrap();
    assert_eq!(scroll.html(), "<p><strong>hel</strong><em>lo</em></p>");
}

#[test]
fn class_and_style_attributors_realize_and_clear() {
    let mut scroll = rich_scroll();
    scroll.insert(0, "hello world").unwrap();
    scroll
        .format(0, 5, "size", &Value::from("large"))
        .unwrap();
    assert_eq!(
        scroll.html(),
        "<p><span class=\"size-large\">hello</span> world</p>"
    );
    scroll.format(0, 5, "color", &Value::from("red")).unwrap();
    assert_eq!(
        scroll.html(),
        "<p><span class=\"size-large\" style=\"color: red\">hello</span> world</p>"
    );

    scroll.format(0, 5, "size", &Value::Bool(false)).unwrap();
    scroll.format(0, 5, "color", &Value::Bool(false)).unwrap();
    assert_eq!(scroll.html(), "<p>hello world</p>");
    scroll.assert_invariants();
}

#[test]
fn block_formats_replace_the_whole_block() {
    let mut scroll = rich_scroll();
    scroll.insert(0, "title").unwrap();
    scroll.format(0, 1, "header", &Value::Bool(true)).unwrap();
    assert_eq!(scroll.html(), "<h1>title</h1>");
    scroll.format(2, 1, "header", &Value::Bool(false)).unwrap();
    assert_eq!(scroll.html(), "<p>title</p>");
}

#[test]
fn block_attributes_cover_the_block_without_splitting_it() {
    let mut scroll = rich_scroll();
    scroll.insert(0, "hello world").unwrap();
    scroll
        .format(2, 3, "align", &Value::from("center"))
        .unwrap();
    assert_eq!(
        scroll.html(),
        "<p style=\"text-align: center\">hello world</p>"
    );
    let block = scroll.children(scroll.root())[0];
    assert_eq!(
        scroll.formats(block).get("align"),
        Some(&Value::from("center"))
    );
}

#[test]
fn full_range_delete_leaves_the_default_child() {
    let mut scroll = rich_scroll();
    scroll.insert(0, "hello world").unwrap();
    scroll.format(0, 5, "bold", &Value::Bool(true)).unwrap();
    scroll.delete(0, scroll.doc_length()).unwrap();
    assert_eq!(scroll.html(), "<p></p>");
    assert_eq!(scroll.doc_length(), 0);

    scroll.insert(0, "fresh").unwrap();
    assert_eq!(scroll.html(), "<p>fresh</p>");
    scroll.assert_invariants();
}

#[test]
fn partial_delete_spans_blocks() {
    let mut scroll = Scroll::new();
    scroll.insert(0, "abc").unwrap();
    let root = scroll.root();
    let second = scroll.create("block", None).unwrap();
    scroll.append(root, second);
    scroll.insert_at(second, 0, "def").unwrap();
    scroll.update(None).unwrap();
    assert_eq!(scroll.html(), "<p>abc</p><p>def</p>");

    scroll.delete(1, 4).unwrap();
    assert_eq!(scroll.html(), "<p>a</p><p>f</p>");
    assert_eq!(scroll.doc_length(), 2);
}

#[test]
fn deleting_a_whole_block_removes_the_block_itself() {
    let mut scroll = Scroll::new();
    scroll.insert(0, "abc").unwrap();
    let root = scroll.root();
    for data in ["def", "ghi"] {
        let block = scroll.create("block", None).unwrap();
        scroll.append(root, block);
        scroll.insert_at(block, 0, data).unwrap();
    }
    scroll.update(None).unwrap();
    assert_eq!(scroll.html(), "<p>abc</p><p>def</p><p>ghi</p>");

    // Exactly the middle block's content: the emptied paragraph must
    // not linger.
    scroll.delete(3, 3).unwrap();
    assert_eq!(scroll.html(), "<p>abc</p><p>ghi</p>");
    assert_eq!(scroll.doc_length(), 6);
    scroll.assert_invariants();
}

#[test]
fn an_externally_emptied_block_removes_itself() {
    let mut scroll = Scroll::new();
    scroll.insert(0, "abc").unwrap();
    let root = scroll.root();
    let second = scroll.create("block", None).unwrap();
    scroll.append(root, second);
    scroll.insert_at(second, 0, "def").unwrap();
    scroll.update(None).unwrap();

    let text = scroll.children(second)[0];
    let text_node = scroll.host_node(text);
    scroll.host_mut().remove(text_node);
    scroll.update(None).unwrap();

    assert!(!scroll.is_alive(second));
    assert_eq!(scroll.html(), "<p>abc</p>");
    assert_eq!(scroll.doc_length(), 3);
    scroll.assert_invariants();
}

#[test]
fn embeds_round_trip_their_value() {
    let mut scroll = Scroll::new();
    scroll
        .register(Definition::Blot(
            BlotSpec::embed("image", "img")
                .with_create_node(|host, value| {
                    let node = host.create_element("img");
                    if let Some(src) = value.and_then(Value::as_str) {
                        host.set_attribute(node, "src", src);
                    }
                    node
                })
                .with_value_of(|host, node| {
                    Value::from(host.attribute(node, "src").unwrap_or_default())
                }),
        ))
        .unwrap();
    scroll.insert(0, "hello world").unwrap();
    scroll
        .insert_embed(5, "image", &Value::from("pic.png"))
        .unwrap();
    assert_eq!(scroll.html(), "<p>hello<img src=\"pic.png\"> world</p>");
    assert_eq!(scroll.doc_length(), 12);

    let image = scroll
        .children(scroll.root())
        .into_iter()
        .flat_map(|block| scroll.children(block))
        .find(|&child| scroll.name(child) == "image")
        .unwrap();
    assert_eq!(
        scroll.value(image),
        Some(("image".to_string(), Value::from("pic.png")))
    );

    scroll.delete(5, 1).unwrap();
    assert_eq!(scroll.html(), "<p>hello world</p>");
    scroll.assert_invariants();
}

#[test]
fn external_subtree_insertion_reconciles() {
    let mut scroll = rich_scroll();
    scroll.insert(0, "hello").unwrap();
    let block = scroll.children(scroll.root())[0];
    let block_node = scroll.host_node(block);

    let host = scroll.host_mut();
    let strong = host.create_element("strong");
    let shout = host.create_text("!");
    host.append_child(strong, shout);
    host.append_child(block_node, strong);

    scroll.update(None).unwrap();
    assert_eq!(scroll.html(), "<p>hello<strong>!</strong></p>");
    assert_eq!(scroll.doc_length(), 6);
    // The paragraph kept its identity through reconciliation.
    assert_eq!(scroll.find(block_node, false), Some(block));
    let adopted = scroll.find(strong, false).unwrap();
    assert_eq!(scroll.name(adopted), "bold");
    scroll.assert_invariants();
}

#[test]
fn synthetic_record_batches_reconcile_too() {
    let mut scroll = rich_scroll();
    scroll.insert(0, "hello").unwrap();
    let block = scroll.children(scroll.root())[0];
    let block_node = scroll.host_node(block);

    let host = scroll.host_mut();
    let em = host.create_element("em");
    let more = host.create_text("?!");
    host.append_child(em, more);
    host.append_child(block_node, em);
    // Deliver the drained batch explicitly, as an integration would.
    let records = host.take_records();
    scroll.apply_change_batch(records).unwrap();
    assert_eq!(scroll.html(), "<p>hello<em>?!</em></p>");
    assert_eq!(scroll.doc_length(), 7);

    let adopted = scroll.find(more, false).unwrap();
    assert_eq!(
        scroll.value(adopted),
        Some(("text".to_string(), Value::from("?!")))
    );
    assert_eq!(scroll.offset(adopted, None), 5);
}

#[test]
fn unknown_host_nodes_are_adopted_through_a_generic_inline() {
    let mut scroll = rich_scroll();
    scroll.insert(0, "hello").unwrap();
    let block = scroll.children(scroll.root())[0];
    let block_node = scroll.host_node(block);

    let host = scroll.host_mut();
    let mystery = host.create_element("blink");
    let tail = host.create_text("zz");
    host.append_child(mystery, tail);
    host.append_child(block_node, mystery);

    scroll.update(None).unwrap();
    // The wrapper carries no formats, so its content settles as plain
    // text merged with the neighbor.
    assert_eq!(scroll.html(), "<p>hellozz</p>");
    assert_eq!(scroll.doc_length(), 7);
    scroll.assert_invariants();
}

#[test]
fn external_character_data_changes_resync_the_cache() {
    let mut scroll = Scroll::new();
    scroll.insert(0, "hello").unwrap();
    let block = scroll.children(scroll.root())[0];
    let text = scroll.children(block)[0];
    let text_node = scroll.host_node(text);

    scroll.host_mut().set_text(text_node, "goodbye");
    scroll.update(None).unwrap();
    assert_eq!(scroll.text_of(text), Some("goodbye"));
    assert_eq!(scroll.doc_length(), 7);
}

#[test]
fn external_attribute_changes_rebuild_the_store() {
    let mut scroll = rich_scroll();
    scroll.insert(0, "hello").unwrap();
    scroll.format(0, 5, "bold", &Value::Bool(true)).unwrap();
    let block = scroll.children(scroll.root())[0];
    let strong = scroll.children(block)[0];
    let strong_node = scroll.host_node(strong);

    scroll.host_mut().add_class(strong_node, "size-huge");
    scroll.update(None).unwrap();
    let formats = scroll.formats(strong);
    assert_eq!(formats.get("bold"), Some(&Value::Bool(true)));
    assert_eq!(formats.get("size"), Some(&Value::from("huge")));
}

#[test]
fn transient_reparenting_preserves_identity() {
    let mut scroll = rich_scroll();
    scroll.insert(0, "ab").unwrap();
    scroll.format(0, 1, "bold", &Value::Bool(true)).unwrap();
    let root = scroll.root();
    let second = scroll.create("block", None).unwrap();
    scroll.append(root, second);
    scroll.insert_at(second, 0, "cd").unwrap();
    scroll.update(None).unwrap();

    let first = scroll.children(root)[0];
    let strong = scroll.children(first)[0];
    let strong_node = scroll.host_node(strong);
    let second_node = scroll.host_node(second);

    // Externally move the strong into the second paragraph: the removal
    // record must not detach it.
    scroll
        .host_mut()
        .insert_before(second_node, strong_node, None);
    scroll.update(None).unwrap();

    assert_eq!(scroll.find(strong_node, false), Some(strong));
    assert_eq!(scroll.parent_of(strong), Some(second));
    assert_eq!(scroll.html(), "<p>b</p><p>cd<strong>a</strong></p>");
    scroll.assert_invariants();
}

#[test]
fn a_record_generator_that_never_quiesces_fails_the_bound() {
    let mut scroll = Scroll::new();
    scroll.insert(0, "hello").unwrap();
    let block = scroll.children(scroll.root())[0];
    let text_node = scroll.host_node(scroll.children(block)[0]);

    scroll
        .host_mut()
        .set_record_generator(move || vec![MutationRecord::character_data(text_node)]);
    assert_eq!(scroll.update(None), Err(ModelError::MaxIterationsExceeded));

    scroll.host_mut().clear_record_generator();
    scroll.update(None).unwrap();
    assert_eq!(scroll.html(), "<p>hello</p>");
}

#[test]
fn reconciliation_is_idempotent() {
    let mut scroll = rich_scroll();
    scroll.insert(0, "hello world").unwrap();
    scroll.format(0, 5, "bold", &Value::Bool(true)).unwrap();
    scroll
        .format(6, 5, "size", &Value::from("large"))
        .unwrap();
    let snapshot = scroll.html();
    scroll.update(None).unwrap();
    scroll.update(None).unwrap();
    assert_eq!(scroll.html(), snapshot);
    scroll.assert_invariants();
}

#[test]
fn wrap_rejects_leaf_targets() {
    let mut scroll = Scroll::new();
    scroll.insert(0, "hello").unwrap();
    let block = scroll.children(scroll.root())[0];
    let text = scroll.children(block)[0];
    assert_eq!(
        scroll.wrap(text, "text", None),
        Err(ModelError::CannotWrap("text".to_string()))
    );
}

#[test]
fn isolate_past_the_end_fails() {
    let mut scroll = Scroll::new();
    scroll.insert(0, "ab").unwrap();
    let block = scroll.children(scroll.root())[0];
    let text = scroll.children(block)[0];
    assert_eq!(
        scroll.isolate(text, 2, 1),
        Err(ModelError::IsolateAtEnd)
    );
}

#[test]
fn paths_descend_to_the_leaf() {
    let mut scroll = Scroll::new();
    scroll.insert(0, "hello world").unwrap();
    let root = scroll.root();
    let path = scroll.path(root, 7, false);
    let names: Vec<&str> = path.iter().map(|&(blot, _)| scroll.name(blot)).collect();
    assert_eq!(names, vec!["scroll", "block", "text"]);
    assert_eq!(path[2].1, 7);
}

#[test]
fn leaf_mapping_round_trips() {
    let mut scroll = Scroll::new();
    scroll.insert(0, "hello").unwrap();
    let block = scroll.children(scroll.root())[0];
    let text = scroll.children(block)[0];
    let text_node = scroll.host_node(text);

    assert_eq!(scroll.index_of_node(text, text_node, 3), Some(3));
    assert_eq!(scroll.index_of_node(text, text_node, 99), Some(5));
    assert_eq!(scroll.position(text, 3, false), (text_node, 3));
}

#[test]
fn lengths_hold_after_every_mutating_operation() {
    let mut scroll = rich_scroll();
    scroll.insert(0, "hello world").unwrap();
    assert_that(&scroll.doc_length()).is_equal_to(11);
    scroll.format(0, 5, "bold", &Value::Bool(true)).unwrap();
    assert_that(&scroll.doc_length()).is_equal_to(11);
    scroll.delete(4, 2).unwrap();
    assert_that(&scroll.doc_length()).is_equal_to(9);
    scroll.insert(4, "o w").unwrap();
    assert_that(&scroll.doc_length()).is_equal_to(12);
    scroll.assert_invariants();
}
