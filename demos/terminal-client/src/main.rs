//! Plays one game from the terminal.
//!
//! ```text
//! terminal-client <host> <game-id> [--secure] [--black]
//! ```
//!
//! Type a square number (0-63, as drawn) to click it, or one of:
//! `history`, `search <ply>`, `info`, `flip`, `quit`.

use std::error::Error;

use chesslink::prelude::*;
use chesslink::{Applied, Board};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::warn;

struct Args {
    host: String,
    game_id: String,
    secure: bool,
    black: bool,
}

fn parse_args() -> Option<Args> {
    let mut positional = Vec::new();
    let mut secure = false;
    let mut black = false;
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--secure" => secure = true,
            "--black" => black = true,
            _ => positional.push(arg),
        }
    }
    let [host, game_id] = <[String; 2]>::try_from(positional).ok()?;
    Some(Args {
        host,
        game_id,
        secure,
        black,
    })
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    chesslink::init_tracing("warn,chesslink=info");

    let Some(args) = parse_args() else {
        eprintln!("usage: terminal-client <host> <game-id> [--secure] [--black]");
        std::process::exit(2);
    };

    let orientation = if args.black {
        Orientation::Reversed
    } else {
        Orientation::Canonical
    };
    let mut client = GameClient::builder()
        .host(&args.host)
        .secure(args.secure)
        .orientation(orientation)
        .find_and_connect(WebSocketConnector, &FixedGame::new(args.game_id), "classic")
        .await?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            event = client.next_event() => match event {
                Some(ClientEvent::Applied(Applied::StatusUpdated)) => print_info(&client),
                Some(ClientEvent::Applied(_)) => draw(&client),
                Some(ClientEvent::StatusChanged(status)) => println!("connection: {status}"),
                None => {
                    println!("connection finished: {}", client.status());
                    break;
                }
            },
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                if !run_command(&mut client, line.trim()).await {
                    break;
                }
            }
        }
    }

    client.close().await?;
    Ok(())
}

/// Runs one input line. Returns `false` to quit.
async fn run_command(client: &mut GameClient, line: &str) -> bool {
    let mut words = line.split_whitespace();
    match (words.next(), words.next()) {
        (None, _) => {}
        (Some("quit" | "q"), _) => return false,
        (Some("info"), _) => print_info(client),
        (Some("flip"), _) => {
            client.flip_board();
            draw(client);
        }
        (Some("history"), _) => {
            for turn in client.history() {
                println!("{turn}");
            }
        }
        (Some("search"), Some(ply)) => match ply.parse() {
            Ok(ply) => {
                if let Err(e) = client.search_history(ply).await {
                    println!("{e}");
                }
            }
            Err(_) => println!("not a ply number: {ply}"),
        },
        (Some(word), _) => match word.parse::<u8>().map(Square::new) {
            Ok(Ok(square)) => click(client, square).await,
            _ => println!("unknown command: {line}"),
        },
    }
    true
}

async fn click(client: &mut GameClient, square: Square) {
    if client.store().is_over() {
        println!("game over: {}", client.store().game_end());
        return;
    }
    match client.click(square).await {
        Ok(ClickOutcome::MoveEmitted(mv)) => println!("sent {mv}"),
        Ok(ClickOutcome::Rejected { from, to, reason }) => println!("{from}-{to}: {reason}"),
        Ok(ClickOutcome::Selected(_) | ClickOutcome::Deselected | ClickOutcome::Ignored) => {}
        Err(e) => warn!(error = %e, "move not sent"),
    }
    draw(client);
}

fn print_info(client: &GameClient) {
    let info = client.info();
    println!(
        "game {} | {} | {} | {} | {}",
        info.game_id,
        info.connection,
        if info.turn { "your move" } else { "waiting" },
        info.status,
        info.game_end
    );
}

/// Prints the board as seen from the client's orientation, with visual
/// square numbers in the margin.
///
/// `[P]` is the selected piece, `*` an empty target and `(p)` a capture
/// target. Empty dark squares show as `:`.
fn draw(client: &GameClient) {
    let board: &Board = client.store().board();
    let orientation = client.orientation();
    let highlighted = client.highlighted();
    let selected = client
        .selection()
        .selected()
        .map(|sq| orientation.to_visual(sq));

    for row in 0..8u8 {
        let mut line = format!("{:>2} ", row * 8);
        for col in 0..8u8 {
            let Ok(visual) = Square::new(row * 8 + col) else {
                continue;
            };
            let canonical = orientation.to_canonical(visual);
            let target = highlighted.contains(&visual);
            let cell = match board.piece_at(canonical) {
                Some(piece) if selected == Some(visual) => format!("[{}]", piece.symbol()),
                Some(piece) if target => format!("({})", piece.symbol()),
                Some(piece) => format!(" {} ", piece.symbol()),
                None if target => " * ".to_string(),
                None if canonical.is_dark() => " : ".to_string(),
                None => " . ".to_string(),
            };
            line.push_str(&cell);
        }
        println!("{line}");
    }
    print_info(client);
}
