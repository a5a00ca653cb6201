//! # Request Body Extraction
//!
//! Accepts JSON objects and URL-encoded forms. Repeated form keys become
//! arrays (`hobbies=chess&hobbies=music`), and bracketed keys nest:
//! `address[city]=Pune` sets `address.city`, `hobbies[]=chess` appends to
//! `hobbies`. Requests with any other content type are read as an empty
//! record.

use axum::async_trait;
use axum::extract::{FromRequest, Request};
use axum::http::header::CONTENT_TYPE;
use axum::{Form, Json};
use serde_json::{Map, Value};

use super::errors::RestError;

/// Candidate record fields taken from the request body
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StudentBody(pub Map<String, Value>);

#[async_trait]
impl<S> FromRequest<S> for StudentBody
where
    S: Send + Sync,
{
    type Rejection = RestError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_ascii_lowercase();

        if content_type.starts_with("application/json") {
            let Json(value) = Json::<Value>::from_request(req, state)
                .await
                .map_err(|e| RestError::InvalidBody(e.body_text()))?;
            match value {
                Value::Object(map) => Ok(StudentBody(map)),
                _ => Err(RestError::InvalidBody("expected a JSON object".into())),
            }
        } else if content_type.starts_with("application/x-www-form-urlencoded") {
            let Form(pairs) = Form::<Vec<(String, String)>>::from_request(req, state)
                .await
                .map_err(|e| RestError::InvalidBody(e.body_text()))?;
            Ok(StudentBody(collect_form(pairs)))
        } else {
            Ok(StudentBody::default())
        }
    }
}

/// Bracket groups parsed per key; anything deeper stays one literal segment
const MAX_FORM_DEPTH: usize = 5;

/// One bracket group of a form key
#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    /// `[city]`
    Key(String),
    /// `[0]`
    Index(usize),
    /// `[]`
    Push,
}

/// Folds form pairs into an object, nesting bracketed keys
fn collect_form(pairs: Vec<(String, String)>) -> Map<String, Value> {
    let mut map = Map::new();
    for (key, value) in pairs {
        let (root, path) = split_key(&key);
        let slot = map.entry(root).or_insert(Value::Null);
        assign(slot, &path, Value::String(value));
    }
    map
}

/// Splits `address[city]` into `("address", [Key("city")])`.
///
/// Keys without a well-formed bracket suffix are kept whole.
fn split_key(key: &str) -> (String, Vec<Segment>) {
    let literal = || (key.to_string(), Vec::new());

    let open = match key.find('[') {
        Some(i) if i > 0 => i,
        _ => return literal(),
    };

    let mut path = Vec::new();
    let mut rest = &key[open..];
    while !rest.is_empty() {
        if path.len() == MAX_FORM_DEPTH {
            path.push(Segment::Key(rest.to_string()));
            break;
        }

        let Some((name, tail)) = rest
            .strip_prefix('[')
            .and_then(|r| r.find(']').map(|end| (&r[..end], &r[end + 1..])))
        else {
            return literal();
        };

        path.push(match name {
            "" => Segment::Push,
            n if n.bytes().all(|b| b.is_ascii_digit()) => match n.parse() {
                Ok(index) => Segment::Index(index),
                Err(_) => Segment::Key(n.to_string()),
            },
            n => Segment::Key(n.to_string()),
        });
        rest = tail;
    }

    (key[..open].to_string(), path)
}

/// Stores `value` at `path` below `slot`, creating objects and arrays on the
/// way. A repeated leaf turns into an array.
fn assign(slot: &mut Value, path: &[Segment], value: Value) {
    let Some((head, rest)) = path.split_first() else {
        if slot.is_null() {
            *slot = value;
        } else if let Value::Array(items) = slot {
            items.push(value);
        } else {
            let first = slot.take();
            *slot = Value::Array(vec![first, value]);
        }
        return;
    };

    match head {
        Segment::Key(name) => {
            if slot.is_null() {
                *slot = Value::Object(Map::new());
            }
            // A scalar already stored under this name keeps its value
            if let Value::Object(map) = slot {
                let child = map.entry(name.clone()).or_insert(Value::Null);
                assign(child, rest, value);
            }
        }
        Segment::Index(_) | Segment::Push => {
            if slot.is_null() {
                *slot = Value::Array(Vec::new());
            }
            if let Value::Array(items) = slot {
                let index = match head {
                    Segment::Index(i) if *i < items.len() => *i,
                    _ => {
                        items.push(Value::Null);
                        items.len() - 1
                    }
                };
                assign(&mut items[index], rest, value);
            }
        }
    }
}
