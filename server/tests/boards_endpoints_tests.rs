use axum::http::StatusCode;
use serde_json::json;
use taskboard_server::store::DocumentStore;

mod common;

use common::{BOARDS_TABLE, body_json, get, send, setup};

#[tokio::test]
async fn can_list_boards_with_pass_through_attributes() {
    let app = setup();
    let board = json!({"id": "b1", "name": "Launch", "color": "teal", "pinned": true});
    app.store
        .put_item(BOARDS_TABLE, board.as_object().cloned().unwrap())
        .await
        .unwrap();

    let response = send(&app, get("/boards")).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["total"], json!(1));
    assert_eq!(body["boards"][0], board);
}

#[tokio::test]
async fn listing_an_empty_board_table_yields_zero_total() {
    let app = setup();

    let body = body_json(send(&app, get("/boards")).await).await;

    assert_eq!(body["total"], json!(0));
    assert_eq!(body["boards"], json!([]));
}
