//! Parsing of the terminal commands. The same grammar is used for one-shot
//! invocations (`bookpal books 高数`) and REPL lines.

use serde_json::Value;

use crate::identity::Role;

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Login { username: String, password: String, role: Option<Role> },
    Logout,
    Session,
    Whoami,
    Go(String),
    Routes,
    Endpoints,
    Call { endpoint: String, params: Vec<(String, String)>, body: Option<Value> },
    Books(Option<String>),
    Book(i64),
    Hot(Option<u32>),
    Cart,
    Orders,
    Help,
    Quit,
}

pub const COMMAND_HELP: &str = "\
Commands:
  login <username> <password> [role]   log in; role is buyer, seller or admin
  logout                               log out and clear the stored session
  session                              show the stored session
  whoami                               fetch the current user from the backend
  go <path>                            resolve a page through the role guard
  routes                               list the page table
  endpoints                            list every backend endpoint
  call <endpoint> [k=v ...] [--json B] call an endpoint by name; k=v fill path
                                       placeholders first, the rest go to the query
  books [keyword]                      search listings
  book <id>                            show one listing
  hot [limit]                          most popular listings
  cart                                 show the cart
  orders                               show my orders
  help                                 show this help
  quit | exit                          leave the interpreter";

impl Command {
    /// Split a REPL line on whitespace, keeping `'...'`/`"..."` groups together.
    pub fn parse_line(line: &str) -> Result<Command, String> {
        let words = split_words(line)?;
        Self::parse(&words)
    }

    pub fn parse(words: &[String]) -> Result<Command, String> {
        let (head, rest) = match words.split_first() {
            Some((h, r)) => (h.to_ascii_lowercase(), r),
            None => return Err("empty command".to_string()),
        };
        let cmd = match head.as_str() {
            "login" => {
                let (username, password) = match rest {
                    [u, p, ..] => (u.clone(), p.clone()),
                    _ => return Err("usage: login <username> <password> [role]".to_string()),
                };
                let role = match rest.get(2) {
                    Some(r) => Some(Role::parse(r).ok_or_else(|| format!("unknown role '{}'", r))?),
                    None => None,
                };
                expect_at_most(rest, 3, "login")?;
                Command::Login { username, password, role }
            }
            "logout" => no_args(rest, Command::Logout, "logout")?,
            "session" => no_args(rest, Command::Session, "session")?,
            "whoami" => no_args(rest, Command::Whoami, "whoami")?,
            "go" => match rest {
                [p] => Command::Go(p.clone()),
                _ => return Err("usage: go <path>".to_string()),
            },
            "routes" => no_args(rest, Command::Routes, "routes")?,
            "endpoints" => no_args(rest, Command::Endpoints, "endpoints")?,
            "call" => parse_call(rest)?,
            "books" => Command::Books(if rest.is_empty() { None } else { Some(rest.join(" ")) }),
            "book" => match rest {
                [id] => Command::Book(id.parse().map_err(|_| format!("invalid book id '{}'", id))?),
                _ => return Err("usage: book <id>".to_string()),
            },
            "hot" => match rest {
                [] => Command::Hot(None),
                [n] => Command::Hot(Some(n.parse().map_err(|_| format!("invalid limit '{}'", n))?)),
                _ => return Err("usage: hot [limit]".to_string()),
            },
            "cart" => no_args(rest, Command::Cart, "cart")?,
            "orders" => no_args(rest, Command::Orders, "orders")?,
            "help" | "?" => Command::Help,
            "quit" | "exit" => Command::Quit,
            other => return Err(format!("unknown command '{}' (try 'help')", other)),
        };
        Ok(cmd)
    }
}

fn no_args(rest: &[String], cmd: Command, name: &str) -> Result<Command, String> {
    if rest.is_empty() { Ok(cmd) } else { Err(format!("'{}' takes no arguments", name)) }
}

fn expect_at_most(rest: &[String], n: usize, name: &str) -> Result<(), String> {
    if rest.len() > n { Err(format!("too many arguments for '{}'", name)) } else { Ok(()) }
}

fn parse_call(rest: &[String]) -> Result<Command, String> {
    let (endpoint, args) = rest.split_first().ok_or_else(|| "usage: call <endpoint> [k=v ...] [--json BODY]".to_string())?;
    let mut params = Vec::new();
    let mut body = None;
    let mut i = 0;
    while i < args.len() {
        let a = &args[i];
        if a == "--json" {
            let raw = args.get(i + 1).ok_or_else(|| "--json requires a value".to_string())?;
            body = Some(serde_json::from_str(raw).map_err(|e| format!("invalid --json body: {}", e))?);
            i += 2;
            continue;
        }
        match a.split_once('=') {
            Some((k, v)) if !k.is_empty() => params.push((k.to_string(), v.to_string())),
            _ => return Err(format!("expected key=value, got '{}'", a)),
        }
        i += 1;
    }
    Ok(Command::Call { endpoint: endpoint.clone(), params, body })
}

fn split_words(line: &str) -> Result<Vec<String>, String> {
    let mut words = Vec::new();
    let mut cur = String::new();
    let mut quote: Option<char> = None;
    let mut in_word = false;
    for ch in line.chars() {
        match quote {
            Some(q) if ch == q => quote = None,
            Some(_) => cur.push(ch),
            None if ch == '"' || ch == '\'' => { quote = Some(ch); in_word = true; }
            None if ch.is_whitespace() => {
                if in_word { words.push(std::mem::take(&mut cur)); in_word = false; }
            }
            None => { cur.push(ch); in_word = true; }
        }
    }
    if quote.is_some() { return Err("unterminated quote".to_string()); }
    if in_word { words.push(cur); }
    Ok(words)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn login_with_and_without_role() {
        assert_eq!(
            Command::parse_line("login alice s3cret seller").unwrap(),
            Command::Login { username: "alice".into(), password: "s3cret".into(), role: Some(Role::Seller) }
        );
        assert_eq!(
            Command::parse_line("LOGIN bob pw").unwrap(),
            Command::Login { username: "bob".into(), password: "pw".into(), role: None }
        );
        assert!(Command::parse_line("login bob").is_err());
        assert!(Command::parse_line("login bob pw wizard").unwrap_err().contains("unknown role"));
    }

    #[test]
    fn call_splits_params_and_json_body() {
        let cmd = Command::parse_line(r#"call admin.user_status username=alice --json '{"status":"blacklisted"}'"#).unwrap();
        assert_eq!(
            cmd,
            Command::Call {
                endpoint: "admin.user_status".into(),
                params: vec![("username".into(), "alice".into())],
                body: Some(json!({"status": "blacklisted"})),
            }
        );
        assert!(Command::parse_line("call books.page nonsense").is_err());
        assert!(Command::parse_line("call books.page --json").is_err());
    }

    #[test]
    fn books_keyword_may_contain_spaces() {
        assert_eq!(Command::parse_line("books \"高等 数学\"").unwrap(), Command::Books(Some("高等 数学".into())));
        assert_eq!(Command::parse_line("books 高等 数学").unwrap(), Command::Books(Some("高等 数学".into())));
        assert_eq!(Command::parse_line("books").unwrap(), Command::Books(None));
    }

    #[test]
    fn numeric_arguments_are_checked() {
        assert_eq!(Command::parse_line("book 42").unwrap(), Command::Book(42));
        assert!(Command::parse_line("book x").is_err());
        assert_eq!(Command::parse_line("hot 3").unwrap(), Command::Hot(Some(3)));
        assert!(Command::parse_line("hot -1").is_err());
    }

    #[test]
    fn misc() {
        assert_eq!(Command::parse_line("  exit ").unwrap(), Command::Quit);
        assert_eq!(Command::parse_line("go /buyer/home").unwrap(), Command::Go("/buyer/home".into()));
        assert!(Command::parse_line("").is_err());
        assert!(Command::parse_line("cart now").is_err());
        assert!(Command::parse_line("frobnicate").unwrap_err().contains("unknown command"));
        assert!(Command::parse_line("go 'unterminated").is_err());
    }
}
