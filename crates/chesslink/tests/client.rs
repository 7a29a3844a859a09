//! End-to-end tests: a real `GameClient` against a loopback WebSocket
//! server played by the test.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use chesslink::prelude::*;
use chesslink::{
    Applied, Board, GameClientBuilder, RejectReason, ReconnectConfig, Selection, SessionConfig,
};
use futures_util::{SinkExt, StreamExt};
use tokio::net::{TcpListener, TcpStream};
use tokio_tungstenite::WebSocketStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::tungstenite::handshake::server::{ErrorResponse, Request, Response};

// =========================================================================
// Helpers
// =========================================================================

type ServerSocket = WebSocketStream<TcpStream>;

/// Binds a loopback listener and returns it with its `host:port`.
async fn listen() -> (TcpListener, String) {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("should bind");
    let addr = listener.local_addr().expect("should have addr");
    (listener, addr.to_string())
}

/// Accepts one client and reports the request path it dialed.
async fn accept(listener: TcpListener) -> (ServerSocket, String) {
    let (stream, _) = listener.accept().await.expect("should accept");
    let path = Arc::new(Mutex::new(String::new()));
    let seen = Arc::clone(&path);
    let record_path = move |req: &Request, resp: Response| -> Result<Response, ErrorResponse> {
        *seen.lock().unwrap() = req.uri().path().to_string();
        Ok(resp)
    };
    let ws = tokio_tungstenite::accept_hdr_async(stream, record_path)
        .await
        .expect("handshake should succeed");
    let path = path.lock().unwrap().clone();
    (ws, path)
}

fn snapshot(turn: bool, previous: serde_json::Value) -> Message {
    let board: Vec<i8> = Board::standard().into();
    let json = serde_json::json!({
        "messageType": 0,
        "messageContent": "",
        "gameState": {
            "turn": turn,
            "board": board,
            "possibleMoves": [{"moveType": "Normal", "oldSquare": 52, "newSquare": 36}],
            "previousMoves": previous
        }
    });
    Message::text(json.to_string())
}

async fn next_json(ws: &mut ServerSocket) -> serde_json::Value {
    let msg = tokio::time::timeout(Duration::from_secs(5), ws.next())
        .await
        .expect("client should send")
        .expect("stream open")
        .expect("frame ok");
    serde_json::from_str(msg.into_text().expect("text frame").as_str()).expect("valid JSON")
}

/// Pumps client events until `want` has been applied.
async fn wait_applied(client: &mut GameClient, want: Applied) {
    tokio::time::timeout(Duration::from_secs(5), async {
        while let Some(event) = client.next_event().await {
            if event == ClientEvent::Applied(want) {
                return;
            }
        }
        panic!("client stream ended before {want:?}");
    })
    .await
    .expect("timed out waiting for event");
}

fn sq(i: u8) -> Square {
    Square::new(i).unwrap()
}

// =========================================================================
// Tests
// =========================================================================

#[test]
fn test_endpoint_format() {
    let id = GameId::new("g42");
    assert_eq!(
        GameClientBuilder::new().host("example.com/").endpoint(&id),
        "ws://example.com/game/g42"
    );
    assert_eq!(
        GameClient::builder()
            .host("example.com:8443")
            .secure(true)
            .endpoint(&id),
        "wss://example.com:8443/game/g42"
    );
}

#[tokio::test]
async fn test_two_clicks_put_a_move_on_the_wire() {
    let (listener, host) = listen().await;
    let server = tokio::spawn(accept(listener));

    let mut client = GameClient::builder()
        .host(&host)
        .find_and_connect(WebSocketConnector, &FixedGame::new("g1"), "classic")
        .await
        .expect("lookup should succeed");

    let (mut ws, path) = server.await.unwrap();
    assert_eq!(path, "/game/g1");

    ws.send(snapshot(true, serde_json::Value::Null)).await.unwrap();
    wait_applied(&mut client, Applied::StateReplaced).await;
    assert!(client.store().turn());

    assert_eq!(client.click(sq(52)).await.unwrap(), ClickOutcome::Selected(sq(52)));
    assert_eq!(client.highlighted(), vec![sq(36)]);
    assert!(matches!(
        client.click(sq(36)).await.unwrap(),
        ClickOutcome::MoveEmitted(_)
    ));

    assert_eq!(
        next_json(&mut ws).await,
        serde_json::json!({"moveType": "Normal", "oldSquare": 52, "newSquare": 36})
    );

    ws.send(Message::text(
        r#"{"messageType":1,"messageContent":"Checkmate"}"#.to_string(),
    ))
    .await
    .unwrap();
    wait_applied(&mut client, Applied::GameEnded).await;

    let info = client.info();
    assert_eq!(info.game_id, GameId::new("g1"));
    assert_eq!(info.game_end, "Checkmate");
    assert_eq!(info.connection, "Open");
    assert_eq!(client.store().board(), &Board::standard());
}

#[tokio::test]
async fn test_game_end_clears_pending_selection() {
    let (listener, host) = listen().await;
    let server = tokio::spawn(accept(listener));

    let mut client = GameClient::builder()
        .host(&host)
        .connect(WebSocketConnector, GameId::new("g7"));
    let (mut ws, _) = server.await.unwrap();

    ws.send(snapshot(true, serde_json::Value::Null)).await.unwrap();
    wait_applied(&mut client, Applied::StateReplaced).await;
    client.click(sq(52)).await.unwrap();
    assert_eq!(client.selection().selection(), Selection::Selected(sq(52)));

    ws.send(Message::text(
        r#"{"messageType":1,"messageContent":"Black resigns"}"#.to_string(),
    ))
    .await
    .unwrap();
    wait_applied(&mut client, Applied::GameEnded).await;

    assert_eq!(client.selection().selection(), Selection::Idle);
    assert!(client.highlighted().is_empty());
    assert!(client.store().is_over());
}

#[tokio::test]
async fn test_out_of_turn_click_sends_nothing() {
    let (listener, host) = listen().await;
    let server = tokio::spawn(accept(listener));

    let mut client = GameClient::builder()
        .host(&host)
        .connect(WebSocketConnector, GameId::new("g2"));
    let (mut ws, _) = server.await.unwrap();

    ws.send(snapshot(false, serde_json::Value::Null)).await.unwrap();
    wait_applied(&mut client, Applied::StateReplaced).await;

    client.click(sq(52)).await.unwrap();
    let outcome = client.click(sq(36)).await.unwrap();
    assert!(matches!(
        outcome,
        ClickOutcome::Rejected {
            reason: RejectReason::NotYourTurn,
            ..
        }
    ));

    // The next thing the server sees is the history query, not a move.
    ws.send(snapshot(
        false,
        serde_json::json!([{"moveType": "Normal", "oldSquare": 12, "newSquare": 28}]),
    ))
    .await
    .unwrap();
    wait_applied(&mut client, Applied::StateReplaced).await;
    client.search_history(0).await.unwrap();
    assert_eq!(
        next_json(&mut ws).await,
        serde_json::json!({"messageType": 0, "index": 0})
    );
}

#[tokio::test]
async fn test_history_pairs_and_bounds() {
    let (listener, host) = listen().await;
    let server = tokio::spawn(accept(listener));

    let mut client = GameClient::builder()
        .host(&host)
        .connect(WebSocketConnector, GameId::new("g3"));
    let (mut ws, _) = server.await.unwrap();

    ws.send(snapshot(
        true,
        serde_json::json!([
            {"moveType": "Normal", "oldSquare": 52, "newSquare": 36},
            {"moveType": "Normal", "oldSquare": 12, "newSquare": 28},
            {"moveType": "Normal", "oldSquare": 62, "newSquare": 45}
        ]),
    ))
    .await
    .unwrap();
    wait_applied(&mut client, Applied::StateReplaced).await;

    let rendered: Vec<String> = client.history().iter().map(ToString::to_string).collect();
    assert_eq!(rendered, vec!["1. 52-36 12-28", "2. 62-45"]);

    let err = client.search_history(3).await.unwrap_err();
    assert!(matches!(err, ChesslinkError::Game(_)));

    client.search_history(2).await.unwrap();
    assert_eq!(
        next_json(&mut ws).await,
        serde_json::json!({"messageType": 0, "index": 2})
    );
}

#[tokio::test]
async fn test_reversed_board_clicks() {
    let (listener, host) = listen().await;
    let server = tokio::spawn(accept(listener));

    let mut client = GameClient::builder()
        .host(&host)
        .orientation(Orientation::Reversed)
        .connect(WebSocketConnector, GameId::new("g4"));
    let (mut ws, _) = server.await.unwrap();

    ws.send(snapshot(true, serde_json::Value::Null)).await.unwrap();
    wait_applied(&mut client, Applied::StateReplaced).await;

    // Canonical 52 and 36 sit at visual 11 and 27 on a turned board.
    client.click(sq(11)).await.unwrap();
    assert_eq!(client.highlighted(), vec![sq(27)]);
    assert!(matches!(
        client.click(sq(27)).await.unwrap(),
        ClickOutcome::MoveEmitted(_)
    ));
    assert_eq!(next_json(&mut ws).await["oldSquare"], 52);
}

#[tokio::test]
async fn test_server_hangup_without_reconnect_ends_in_lost() {
    let (listener, host) = listen().await;
    let server = tokio::spawn(accept(listener));

    let mut client = GameClient::builder()
        .host(&host)
        .session_config(SessionConfig {
            reconnect: ReconnectConfig::disabled(),
            ..SessionConfig::default()
        })
        .connect(WebSocketConnector, GameId::new("g5"));
    let (mut ws, _) = server.await.unwrap();
    ws.close(None).await.unwrap();

    let mut last = None;
    tokio::time::timeout(Duration::from_secs(5), async {
        while let Some(event) = client.next_event().await {
            last = Some(event);
        }
    })
    .await
    .expect("client stream should end");

    assert_eq!(last, Some(ClientEvent::StatusChanged(ConnectionStatus::Lost)));
    assert!(matches!(
        client.click(sq(52)).await,
        Ok(ClickOutcome::Selected(_))
    ));
    assert!(matches!(
        client.click(sq(44)).await,
        Ok(ClickOutcome::Rejected { .. })
    ));
}

#[tokio::test]
async fn test_close_reports_closed() {
    let (listener, host) = listen().await;
    let server = tokio::spawn(accept(listener));

    let mut client = GameClient::builder()
        .host(&host)
        .connect(WebSocketConnector, GameId::new("g6"));
    let (_ws, _) = server.await.unwrap();

    tokio::time::timeout(Duration::from_secs(5), async {
        while client.status() != ConnectionStatus::Open {
            client.next_event().await.expect("still running");
        }
    })
    .await
    .expect("should open");

    client.close().await.unwrap();
    assert_eq!(client.status(), ConnectionStatus::Closed);
    assert_eq!(client.info().connection, "Closed");
}
