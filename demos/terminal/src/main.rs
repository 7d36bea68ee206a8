use gomoku::prelude::*;
use tokio::io::{AsyncBufReadExt, BufReader};

const USAGE: &str = "\
usage:
  gomoku-terminal offline
  gomoku-terminal host [ADDR]         (default 0.0.0.0:9000)
  gomoku-terminal join ADDR CODE

commands while playing:
  X Y        place a stone at column X, row Y (0-14)
  u          undo (online: ask the opponent)
  y / n      accept / reject the opponent's undo request
  r          restart
  say TEXT   chat
  q          quit";

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    Place(Point),
    Undo,
    Answer(bool),
    Restart,
    Say(String),
    Quit,
}

fn parse_command(line: &str) -> Option<Command> {
    let line = line.trim();
    if let Some(text) = line.strip_prefix("say ") {
        return Some(Command::Say(text.trim().to_string()));
    }
    match line {
        "u" => return Some(Command::Undo),
        "y" => return Some(Command::Answer(true)),
        "n" => return Some(Command::Answer(false)),
        "r" => return Some(Command::Restart),
        "q" => return Some(Command::Quit),
        _ => {}
    }
    let mut parts = line.split_whitespace();
    let x = parts.next()?.parse().ok()?;
    let y = parts.next()?.parse().ok()?;
    if parts.next().is_some() {
        return None;
    }
    Some(Command::Place(Point::new(x, y)))
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

fn render(view: &MatchView) -> String {
    let line = view.win_line.as_deref().unwrap_or(&[]);
    let mut out = String::from("   ");
    for x in 0..BOARD_SIZE {
        out.push_str(&format!("{:>2}", x % 10));
    }
    out.push('\n');
    for (y, row) in view.board.rows().enumerate() {
        out.push_str(&format!("{y:>2} "));
        for (x, cell) in row.iter().enumerate() {
            let here = Point::new(x, y);
            let mark = match cell {
                Some(Color::Black) if line.contains(&here) => '@',
                Some(Color::White) if line.contains(&here) => 'O',
                Some(Color::Black) => 'x',
                Some(Color::White) => 'o',
                None if view.pending == Some(here) => '?',
                None => '.',
            };
            out.push(' ');
            out.push(mark);
        }
        out.push('\n');
    }
    out.push_str(&format!(
        "{}   (black {} : {} white)\n",
        view.state, view.tally.black, view.tally.white
    ));
    out
}

// ---------------------------------------------------------------------------
// Offline (hotseat)
// ---------------------------------------------------------------------------

async fn run_offline() -> Result<(), Box<dyn std::error::Error>> {
    let mut game = Match::new(Seat::Hotseat);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    println!("{}", render(&game.view()));

    while let Some(line) = lines.next_line().await? {
        let Some(cmd) = parse_command(&line) else {
            println!("{USAGE}");
            continue;
        };
        let result = match cmd {
            Command::Place(point) => game
                .propose_local_move(point)
                .and_then(|()| game.commit_local_move())
                .map(|c| {
                    if let Some(win) = c.win {
                        println!("{} wins!", win.winner);
                    }
                }),
            Command::Undo => game.take_back().map(|_| ()),
            Command::Restart => {
                game.restart();
                Ok(())
            }
            Command::Quit => break,
            Command::Answer(_) | Command::Say(_) => {
                println!("nobody to talk to in offline mode");
                continue;
            }
        };
        if let Err(e) = result {
            println!("! {e}");
        }
        println!("{}", render(&game.view()));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Online
// ---------------------------------------------------------------------------

async fn run_online(peer: GomokuPeer) -> Result<(), Box<dyn std::error::Error>> {
    let (handle, mut events) = peer.split();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    println!("waiting for the other player...");

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                let Some(cmd) = parse_command(&line) else {
                    println!("{USAGE}");
                    continue;
                };
                let result = match cmd {
                    Command::Place(point) => handle.play(point).await.map(|c| {
                        if let Some(win) = c.win {
                            println!("you win! ({})", win.winner);
                        }
                    }),
                    Command::Undo => handle.request_undo().await.map(|()| {
                        println!("undo requested, waiting for the answer");
                    }),
                    Command::Answer(accept) => handle.answer_undo(accept).await.map(|_| ()),
                    Command::Restart => handle.restart().await,
                    Command::Say(text) => handle.chat(text, "").await,
                    Command::Quit => {
                        handle.leave().await?;
                        break;
                    }
                };
                if let Err(e) = result {
                    println!("! {e}");
                }
            }
            event = events.next() => {
                let Some(event) = event else { break };
                match event {
                    SessionEvent::PeerJoined { nickname } => {
                        println!("{nickname} joined");
                    }
                    SessionEvent::PeerConsidering(point) => {
                        println!("opponent is looking at {point}");
                        continue;
                    }
                    SessionEvent::OpponentMoved(c) => {
                        if let Some(win) = c.win {
                            println!("{} wins!", win.winner);
                        }
                    }
                    SessionEvent::UndoRequested => {
                        println!("opponent asks to undo, answer y or n");
                    }
                    SessionEvent::UndoAccepted(u) => println!("undo accepted: {} removed", u.point),
                    SessionEvent::UndoRejected => println!("undo rejected"),
                    SessionEvent::Chat { text, .. } => {
                        println!("> {text}");
                        continue;
                    }
                    SessionEvent::Restarted => println!("opponent restarted the match"),
                    SessionEvent::Ended(reason) => {
                        println!("match ended: {reason}");
                        break;
                    }
                }
            }
        }

        let snap = handle.snapshot().await?;
        println!("{}", render(&snap.view));
        if snap.is_local_turn() {
            println!("your move ({})", snap.color);
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    gomoku::init_tracing();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let args: Vec<&str> = args.iter().map(String::as_str).collect();
    let nickname = std::env::var("GOMOKU_NICK").unwrap_or_else(|_| "Player".into());

    match args.as_slice() {
        ["offline"] => run_offline().await,
        ["host", rest @ ..] => {
            let addr = rest.first().copied().unwrap_or("0.0.0.0:9000");
            let lobby = GomokuPeer::builder().nickname(nickname).host(addr).await?;
            eprintln!(
                "hosting on {}, room code {}",
                lobby.local_addr()?,
                lobby.room_code()
            );
            run_online(lobby.accept().await?).await
        }
        ["join", addr, code] => {
            let code: RoomCode = code.parse()?;
            let peer = GomokuPeer::builder().nickname(nickname).join(addr, &code).await?;
            run_online(peer).await
        }
        _ => {
            eprintln!("{USAGE}");
            Ok(())
        }
    }
}
