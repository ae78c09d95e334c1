use crate::board::Board;
use crate::search::{Search, SearchLimits};

use regex::Regex;
use rustyline::config::Configurer;
use rustyline::Editor;
use std::fmt::{Display, Error, Formatter};
use std::str::FromStr;
use tracing::debug;

pub struct UCI {
    board: Board,
    search: Search,
    options: Vec<SpinOption>,
}

impl Default for UCI {
    fn default() -> Self {
        UCI {
            board: Board::startpos(),
            search: Search::new(),
            options: vec![
                SpinOption {
                    name: "Hash",
                    default: 64,
                    min: 1,
                    max: 4096,
                },
                SpinOption {
                    name: "Threads",
                    default: 1,
                    min: 1,
                    max: 1,
                },
            ],
        }
    }
}

impl UCI {
    pub fn new() -> UCI {
        Default::default()
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Reads commands from standard input until `quit`/`exit` or EOF
    pub fn run() {
        let mut uci = UCI::new();
        let mut editor = Editor::<()>::new();
        editor.set_auto_add_history(true);
        while let Ok(line) = editor.readline("") {
            if !uci.handle_command(&line) {
                break;
            }
        }
        uci.search.stop();
    }

    /// Handles a single command line. Returns false when the engine should
    /// terminate. Unknown or malformed commands are ignored.
    pub fn handle_command(&mut self, line: &str) -> bool {
        let tokens: Vec<String> = Self::args_regex()
            .find_iter(line)
            .map(|m| m.as_str().replace('"', ""))
            .collect();
        let cmd = match tokens.first() {
            Some(c) => c.as_str(),
            None => return true,
        };

        match cmd {
            "uci" => {
                println!("id name redfin {}", env!("CARGO_PKG_VERSION"));
                println!("id author {}", env!("CARGO_PKG_AUTHORS"));
                for option in &self.options {
                    println!("option {}", option);
                }
                println!("uciok");
            }
            "isready" => println!("readyok"),
            "ucinewgame" => {
                self.board.set_startpos();
                self.search.clear();
            }
            "setoption" => self.set_option(&tokens),
            "position" => self.set_position(&tokens),
            "go" => {
                let limits = Self::parse_go(&tokens);
                self.search.start(&self.board, limits);
            }
            "stop" => {
                self.search.stop();
            }
            "show" => println!("{}", self.board),
            "quit" | "exit" => {
                self.search.stop();
                return false;
            }
            _ => debug!(command = cmd, "ignoring unknown command"),
        }
        true
    }

    fn set_option(&mut self, tokens: &[String]) {
        let mut name = String::new();
        let mut value = String::new();
        let mut i = 1;
        while i < tokens.len() {
            match tokens[i].as_str() {
                "name" => {
                    i += 1;
                    while i < tokens.len() && tokens[i] != "value" {
                        if !name.is_empty() {
                            name.push(' ');
                        }
                        name.push_str(&tokens[i]);
                        i += 1;
                    }
                }
                "value" => {
                    i += 1;
                    if i < tokens.len() {
                        value = tokens[i].clone();
                        i += 1;
                    }
                }
                _ => i += 1,
            }
        }

        match name.as_str() {
            "Hash" => {
                let megabytes = value.parse::<i64>().unwrap_or(64).clamp(1, 4096);
                self.search.set_hash_mb(megabytes as usize);
            }
            "Threads" => {
                // accepted for GUI compatibility; the engine is single-searcher
                if value.parse::<i64>().map(|v| v != 1).unwrap_or(false) {
                    debug!("only a single search thread is supported");
                }
            }
            _ => debug!(option = %name, "ignoring unknown option"),
        }
    }

    fn set_position(&mut self, tokens: &[String]) {
        let mut i = 1;
        match tokens.get(i).map(String::as_str) {
            Some("startpos") => {
                self.board.set_startpos();
                i += 1;
            }
            Some("fen") => {
                i += 1;
                let mut fen = String::new();
                while i < tokens.len() && tokens[i] != "moves" {
                    if !fen.is_empty() {
                        fen.push(' ');
                    }
                    fen.push_str(&tokens[i]);
                    i += 1;
                }
                if let Err(e) = self.board.set_fen(&fen) {
                    debug!(error = %e, "rejected FEN, board left cleared");
                }
            }
            _ => return,
        }

        if tokens.get(i).map(String::as_str) == Some("moves") {
            for move_str in &tokens[i + 1..] {
                let mv = self.board.parse_uci_move(move_str);
                if mv.is_null() {
                    debug!(uci_move = %move_str, "stopping at unparseable move");
                    break;
                }
                self.board.make_move(mv);
            }
        }
    }

    fn parse_go(tokens: &[String]) -> SearchLimits {
        let mut limits = SearchLimits::default();
        let mut iter = tokens.iter().skip(1);
        while let Some(arg) = iter.next() {
            match arg.as_str() {
                "infinite" => limits.infinite = true,
                "wtime" => limits.wtime_ms = Self::next_number(&mut iter).unwrap_or(0),
                "btime" => limits.btime_ms = Self::next_number(&mut iter).unwrap_or(0),
                "winc" => limits.winc_ms = Self::next_number(&mut iter).unwrap_or(0),
                "binc" => limits.binc_ms = Self::next_number(&mut iter).unwrap_or(0),
                "movetime" => limits.movetime_ms = Self::next_number(&mut iter).unwrap_or(0),
                "movestogo" => limits.movestogo = Self::next_number(&mut iter).unwrap_or(0),
                "depth" => limits.depth = Self::next_number(&mut iter).unwrap_or(0),
                "nodes" => limits.nodes = Self::next_number(&mut iter).unwrap_or(0),
                _ => debug!(argument = %arg, "ignoring unknown go argument"),
            }
        }
        limits
    }

    fn next_number<'a, T: FromStr>(iter: &mut impl Iterator<Item = &'a String>) -> Option<T> {
        iter.next().and_then(|s| s.parse().ok())
    }

    fn args_regex() -> Regex {
        Regex::new(r#"(".*?"|[^"\s]+)"#).unwrap()
    }
}

struct SpinOption {
    name: &'static str,
    default: i64,
    min: i64,
    max: i64,
}

impl Display for SpinOption {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        write!(
            f,
            "name {} type spin default {} min {} max {}",
            self.name, self.default, self.min, self.max
        )
    }
}
