use super::*;
use serde_json::json;

#[test]
fn comment_path_by_id() {
    assert_eq!(comment_endpoint(12), "/comments/12/");
}

#[test]
fn new_comment_wire_shape() {
    let body = serde_json::to_value(NewComment { blog_id: 3, content: "Nice".into() }).unwrap();
    assert_eq!(body, json!({ "blog_id": 3, "content": "Nice" }));
}
